use chat_store::{ChatStore, ExportFormat, Message, Model, Settings, StoreError};
use completion_api::{CompletionError, CompletionOptions};
use quick_chat::format_message;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::ui::{ChatUi, NotificationKind, RenderedMessage};

pub type RequestId = u64;

/// Longest accepted submission, in characters.
pub const MAX_MESSAGE_LENGTH: usize = 10_000;
pub const SETTINGS_SAVED: &str = "Settings saved successfully!";

/// Identifies one dispatched completion. A result is applied only while its
/// ticket is still the active one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub request_id: RequestId,
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingResponse { ticket: Ticket },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceMode {
    Durable,
    /// Nothing outlives the process. Entered at startup or after a failed write.
    InMemory,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionJob {
    pub ticket: Ticket,
    pub prompt: String,
    pub options: CompletionOptions,
}

/// Runs completions on behalf of the controller and reports back through
/// [`SessionController::on_completion_settled`].
pub trait CompletionHost {
    fn dispatch(&mut self, job: CompletionJob);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("Message cannot be empty")]
    Empty,
    #[error("Message is too long (maximum {} characters)", MAX_MESSAGE_LENGTH)]
    TooLong,
    #[error("Please configure your API key in settings")]
    NoCredential,
    #[error("Still waiting for the previous response")]
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("Please enter your API key")]
    MissingCredential,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    Applied,
    Stale,
}

/// Owns the conversation for one overlay session.
pub struct SessionController<U> {
    ui: U,
    store: ChatStore,
    persistence: PersistenceMode,
    settings: Settings,
    log: Vec<Message>,
    state: SessionState,
    generation: u64,
    next_request_id: RequestId,
}

impl<U: ChatUi> SessionController<U> {
    /// Loads settings and, with auto-persist on, the saved conversation, then
    /// renders whatever was restored.
    pub fn start(ui: U, store: ChatStore, persistence: PersistenceMode) -> Self {
        let settings = store.load_settings();
        let log = if settings.auto_persist {
            store.load_conversation()
        } else {
            Vec::new()
        };

        let mut controller = Self {
            ui,
            store,
            persistence,
            settings,
            log,
            state: SessionState::Idle,
            generation: 0,
            next_request_id: 1,
        };

        let restored = std::mem::take(&mut controller.log);
        for message in &restored {
            controller.render(message);
        }
        controller.log = restored;
        info!(
            restored = controller.log.len(),
            model = controller.settings.model.id(),
            persistence = ?controller.persistence,
            "session started"
        );
        controller
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_waiting(&self) -> bool {
        matches!(self.state, SessionState::AwaitingResponse { .. })
    }

    pub fn log(&self) -> &[Message] {
        &self.log
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn persistence(&self) -> PersistenceMode {
        self.persistence
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut U {
        &mut self.ui
    }

    pub fn into_ui(self) -> U {
        self.ui
    }

    pub fn notify(&mut self, text: &str, kind: NotificationKind) {
        self.ui.notify(text, kind);
    }

    pub fn on_submit(
        &mut self,
        text: &str,
        host: &mut dyn CompletionHost,
    ) -> Result<Ticket, SubmitError> {
        if self.is_waiting() {
            debug!("submission ignored while a response is pending");
            return Err(SubmitError::Busy);
        }

        let prompt = text.trim();
        if prompt.is_empty() {
            return Err(SubmitError::Empty);
        }
        if prompt.chars().count() > MAX_MESSAGE_LENGTH {
            self.ui
                .notify(&SubmitError::TooLong.to_string(), NotificationKind::Warning);
            return Err(SubmitError::TooLong);
        }
        if !self.settings.has_credential() {
            self.ui.notify(
                &SubmitError::NoCredential.to_string(),
                NotificationKind::Warning,
            );
            self.ui.open_settings();
            return Err(SubmitError::NoCredential);
        }

        self.append(Message::user(prompt));

        let ticket = Ticket {
            request_id: self.next_request_id,
            generation: self.generation,
        };
        self.next_request_id += 1;
        self.state = SessionState::AwaitingResponse { ticket };
        self.ui.set_waiting(true);

        debug!(
            request_id = ticket.request_id,
            generation = ticket.generation,
            "dispatching completion"
        );
        host.dispatch(CompletionJob {
            ticket,
            prompt: prompt.to_string(),
            options: self.completion_options(),
        });
        Ok(ticket)
    }

    pub fn on_completion_settled(
        &mut self,
        ticket: Ticket,
        outcome: Result<String, CompletionError>,
    ) -> Settled {
        match self.state {
            SessionState::AwaitingResponse { ticket: active } if active == ticket => {}
            _ => {
                debug!(
                    request_id = ticket.request_id,
                    generation = ticket.generation,
                    current_generation = self.generation,
                    "dropping stale completion"
                );
                return Settled::Stale;
            }
        }

        self.state = SessionState::Idle;
        match outcome {
            Ok(reply) => self.append(Message::assistant(reply)),
            Err(error) => {
                warn!(request_id = ticket.request_id, error = %error, "completion failed");
                self.append(Message::assistant(format!(
                    "Sorry, I encountered an error: {error}"
                )));
                self.ui.notify(&error.to_string(), NotificationKind::Error);
            }
        }
        self.ui.set_waiting(false);
        Settled::Applied
    }

    /// Empties the conversation in any state. A response still in flight is
    /// discarded when it arrives.
    pub fn on_clear(&mut self) {
        self.log.clear();
        if let Err(err) = self.store.clear_conversation() {
            self.degrade(err);
        }
        self.state = SessionState::Idle;
        self.generation += 1;
        self.ui.set_waiting(false);
        self.ui.clear_messages();
        info!(generation = self.generation, "conversation cleared");
    }

    pub fn on_open_settings(&mut self) {
        self.ui.open_settings();
    }

    pub fn on_settings_save(&mut self, settings: Settings) -> Result<(), SettingsError> {
        if !settings.has_credential() {
            self.ui.notify(
                &SettingsError::MissingCredential.to_string(),
                NotificationKind::Error,
            );
            return Err(SettingsError::MissingCredential);
        }

        self.settings = settings.normalized();
        self.persist_settings();
        self.ui.notify(SETTINGS_SAVED, NotificationKind::Success);
        info!(model = self.settings.model.id(), "settings saved");
        Ok(())
    }

    pub fn on_model_select(&mut self, model: Model) {
        if self.settings.model == model {
            return;
        }
        self.settings.model = model;
        self.persist_settings();
        info!(model = model.id(), "model selected");
    }

    /// Renders the current conversation in `format`. Unknown formats are
    /// reported to the UI and yield `None`.
    pub fn on_export_request(&mut self, format: &str) -> Option<String> {
        let Some(parsed) = ExportFormat::parse(format) else {
            self.ui.notify(
                &format!("Unsupported export format: {}", format.trim()),
                NotificationKind::Error,
            );
            return None;
        };

        let contents = self.store.export_conversation(&self.log, format)?;
        self.ui.present_export(parsed.extension(), &contents);
        Some(contents)
    }

    fn completion_options(&self) -> CompletionOptions {
        CompletionOptions::new(
            self.settings.credential.expose(),
            self.settings.model.id(),
            self.settings.temperature,
            self.settings.max_output_tokens,
        )
    }

    fn append(&mut self, message: Message) {
        self.render(&message);
        self.log.push(message);
        if self.settings.auto_persist {
            if let Err(err) = self.store.save_conversation(&self.log) {
                self.degrade(err);
            }
        }
    }

    fn render(&mut self, message: &Message) {
        let rendered = RenderedMessage {
            role: message.role,
            content: message.content.clone(),
            html: format_message(&message.content),
            created_at: message.created_at,
        };
        self.ui.render_message(&rendered);
    }

    fn persist_settings(&mut self) {
        if let Err(err) = self.store.save_settings(&self.settings) {
            self.degrade(err);
        }
    }

    /// Swaps in a memory store after a failed write so the session keeps
    /// working without durable state.
    fn degrade(&mut self, err: StoreError) {
        warn!(error = %err, "persistence failed; continuing in memory");
        self.store = ChatStore::in_memory();
        self.persistence = PersistenceMode::InMemory;
    }
}
