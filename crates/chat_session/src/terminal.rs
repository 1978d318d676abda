use std::io::{self, Write};

use quick_chat::format_timestamp;
use time::OffsetDateTime;
use tracing::warn;

use crate::ui::{
    BindingId, ChatUi, ElementLookup, MissingBindings, NotificationKind, RenderedMessage,
    UiBindings,
};

/// Regions of the line-oriented terminal front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Prompt,
    Transcript,
    Status,
    /// Reached through a slash command or shortcut instead of a widget.
    Command(&'static str),
}

/// The terminal's element table.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalLayout;

impl ElementLookup for TerminalLayout {
    type Handle = Region;

    fn lookup(&self, element_id: &str) -> Option<Region> {
        let id = BindingId::ALL
            .into_iter()
            .find(|id| id.element_id() == element_id)?;
        Some(match id {
            BindingId::Input => Region::Prompt,
            BindingId::Conversation => Region::Transcript,
            BindingId::Loader => Region::Status,
            BindingId::ModelSelect => Region::Command("/model"),
            BindingId::SendButton => Region::Prompt,
            BindingId::ClearButton => Region::Command("/clear"),
            BindingId::SettingsButton => Region::Command("/settings"),
        })
    }
}

/// Plain-text [`ChatUi`]. Shows raw message content since a terminal cannot
/// display the HTML rendering.
pub struct TerminalUi<W> {
    out: W,
    bindings: UiBindings<Region>,
}

impl TerminalUi<io::Stdout> {
    pub fn stdout() -> Result<Self, MissingBindings> {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalUi<W> {
    pub fn new(out: W) -> Result<Self, MissingBindings> {
        Self::with_layout(out, &TerminalLayout)
    }

    pub fn with_layout<L>(out: W, layout: &L) -> Result<Self, MissingBindings>
    where
        L: ElementLookup<Handle = Region> + ?Sized,
    {
        let bindings = UiBindings::bind(layout)?;
        Ok(Self { out, bindings })
    }

    pub fn bindings(&self) -> &UiBindings<Region> {
        &self.bindings
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    fn emit(&mut self, text: &str) {
        let result = writeln!(self.out, "{text}").and_then(|()| self.out.flush());
        if let Err(err) = result {
            warn!(error = %err, "failed to write to terminal");
        }
    }
}

impl<W: Write> ChatUi for TerminalUi<W> {
    fn render_message(&mut self, message: &RenderedMessage) {
        let when = format_timestamp(message.created_at, OffsetDateTime::now_utc());
        self.emit(&format!(
            "{} ({when}): {}",
            message.role.label(),
            message.content
        ));
    }

    fn set_waiting(&mut self, waiting: bool) {
        if waiting {
            self.emit("...");
        }
    }

    fn notify(&mut self, text: &str, kind: NotificationKind) {
        let tag = match kind {
            NotificationKind::Info => "info",
            NotificationKind::Success => "ok",
            NotificationKind::Warning => "warning",
            NotificationKind::Error => "error",
        };
        self.emit(&format!("[{tag}] {text}"));
    }

    fn clear_messages(&mut self) {
        self.emit("-- conversation cleared --");
    }

    fn open_settings(&mut self) {
        self.emit("[settings] set your API key with /key <api key>, pick a model with /model <id>");
    }

    fn present_export(&mut self, format: &str, contents: &str) {
        self.emit(&format!("-- export ({format}) --"));
        self.emit(contents);
        self.emit("-- end of export --");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_store::Role;

    fn output(ui: &TerminalUi<Vec<u8>>) -> String {
        String::from_utf8_lossy(ui.writer()).into_owned()
    }

    #[test]
    fn layout_provides_every_binding() {
        let ui = TerminalUi::new(Vec::new()).expect("terminal layout is complete");
        assert_eq!(ui.bindings().input, Region::Prompt);
        assert_eq!(ui.bindings().clear_button, Region::Command("/clear"));
    }

    #[test]
    fn writes_messages_and_notifications() {
        let mut ui = TerminalUi::new(Vec::new()).expect("terminal layout is complete");
        ui.render_message(&RenderedMessage {
            role: Role::Assistant,
            content: "**hi**".to_string(),
            html: "<p class=\"message-paragraph\"><strong>hi</strong></p>".to_string(),
            created_at: OffsetDateTime::now_utc(),
        });
        ui.notify("Settings saved successfully!", NotificationKind::Success);
        assert_eq!(output(&ui), "AI (Just now): **hi**\n[ok] Settings saved successfully!\n");
    }

    #[test]
    fn layout_missing_regions_fails_to_bind() {
        struct PromptOnly;
        impl ElementLookup for PromptOnly {
            type Handle = Region;
            fn lookup(&self, element_id: &str) -> Option<Region> {
                (element_id == "raycast-input").then_some(Region::Prompt)
            }
        }

        let err = TerminalUi::with_layout(Vec::new(), &PromptOnly)
            .err()
            .expect("bindings are missing");
        assert_eq!(err.missing.len(), BindingId::ALL.len() - 1);
    }
}
