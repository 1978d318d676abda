use std::sync::Arc;

use chat_store::{Credential, Model};
use completion_api::CompletionError;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::backend::CompletionBackend;
use crate::commands::{SessionCommand, HELP_TEXT};
use crate::controller::{CompletionHost, CompletionJob, SessionController, Ticket};
use crate::ui::{ChatUi, NotificationKind};

/// A finished completion on its way back to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub ticket: Ticket,
    pub outcome: Result<String, CompletionError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Spawns each job as a tokio task and posts the result to the runtime loop.
pub struct TaskHost {
    backend: Arc<dyn CompletionBackend>,
    settled_tx: mpsc::UnboundedSender<Settlement>,
}

impl TaskHost {
    pub fn new(
        backend: Arc<dyn CompletionBackend>,
        settled_tx: mpsc::UnboundedSender<Settlement>,
    ) -> Self {
        Self {
            backend,
            settled_tx,
        }
    }
}

impl CompletionHost for TaskHost {
    fn dispatch(&mut self, job: CompletionJob) {
        let CompletionJob {
            ticket,
            prompt,
            options,
        } = job;
        let completion = self.backend.complete(prompt, options);
        let settled_tx = self.settled_tx.clone();
        tokio::spawn(async move {
            let outcome = completion.await;
            if settled_tx.send(Settlement { ticket, outcome }).is_err() {
                debug!(request_id = ticket.request_id, "runtime gone; dropping completion");
            }
        });
    }
}

/// Drives a [`SessionController`] from a command channel. All controller
/// calls happen on the task running [`SessionRuntime::run`].
pub struct SessionRuntime<U> {
    controller: SessionController<U>,
    host: TaskHost,
    settled_rx: mpsc::UnboundedReceiver<Settlement>,
}

impl<U: ChatUi> SessionRuntime<U> {
    pub fn new(controller: SessionController<U>, backend: Arc<dyn CompletionBackend>) -> Self {
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();
        Self {
            controller,
            host: TaskHost::new(backend, settled_tx),
            settled_rx,
        }
    }

    pub fn controller(&self) -> &SessionController<U> {
        &self.controller
    }

    /// Processes commands until `/quit` or until the channel closes and no
    /// response is pending. Returns the controller for inspection.
    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<SessionCommand>,
    ) -> SessionController<U> {
        let mut input_open = true;

        loop {
            if !input_open && !self.controller.is_waiting() {
                break;
            }

            tokio::select! {
                Some(settlement) = self.settled_rx.recv() => {
                    self.controller
                        .on_completion_settled(settlement.ticket, settlement.outcome);
                }
                command = commands.recv(), if input_open => match command {
                    Some(command) => {
                        if self.apply(command) == Flow::Quit {
                            break;
                        }
                    }
                    None => input_open = false,
                },
                else => break,
            }
        }

        info!("session runtime stopped");
        self.controller
    }

    pub fn apply(&mut self, command: SessionCommand) -> Flow {
        match command {
            SessionCommand::Submit(text) => {
                if let Err(err) = self.controller.on_submit(&text, &mut self.host) {
                    debug!(error = %err, "submission rejected");
                }
            }
            SessionCommand::Clear => self.controller.on_clear(),
            SessionCommand::Settings => self.controller.on_open_settings(),
            SessionCommand::SetCredential(key) => {
                let mut settings = self.controller.settings().clone();
                settings.credential = Credential::new(key);
                // Rejections are already shown to the user.
                let _ = self.controller.on_settings_save(settings);
            }
            SessionCommand::SelectModel(id) => match id.parse::<Model>() {
                Ok(model) => {
                    self.controller.on_model_select(model);
                    self.controller.notify(
                        &format!("Model set to {}", model.label()),
                        NotificationKind::Info,
                    );
                }
                Err(err) => self
                    .controller
                    .notify(&err.to_string(), NotificationKind::Warning),
            },
            SessionCommand::ListModels => {
                let listing = model_listing(self.controller.settings().model);
                self.controller.notify(&listing, NotificationKind::Info);
            }
            SessionCommand::Export(format) => {
                self.controller.on_export_request(&format);
            }
            SessionCommand::Help => self.controller.notify(HELP_TEXT, NotificationKind::Info),
            SessionCommand::Quit => return Flow::Quit,
            SessionCommand::Unknown(name) => self.controller.notify(
                &format!("Unknown command: {name}"),
                NotificationKind::Warning,
            ),
        }
        Flow::Continue
    }
}

fn model_listing(current: Model) -> String {
    Model::ALL
        .iter()
        .map(|model| {
            let marker = if *model == current { "*" } else { " " };
            format!(
                "{marker} {} ({}): {}",
                model.id(),
                model.label(),
                model.description()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_marks_the_current_model() {
        let listing = model_listing(Model::Gemini15Pro);
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines.len(), Model::ALL.len());
        assert!(lines
            .iter()
            .any(|line| line.starts_with("* gemini-1.5-pro (Gemini 1.5 Pro)")));
        assert_eq!(lines.iter().filter(|line| line.starts_with('*')).count(), 1);
    }
}
