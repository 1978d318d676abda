#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Submit(String),
    Clear,
    Settings,
    SetCredential(String),
    SelectModel(String),
    ListModels,
    Export(String),
    Help,
    Quit,
    Unknown(String),
}

/// Keyboard shortcuts understood by the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Ctrl+L
    ClearConversation,
    /// Ctrl+,
    OpenSettings,
    /// Escape
    Hide,
}

impl Shortcut {
    pub fn command(self) -> SessionCommand {
        match self {
            Shortcut::ClearConversation => SessionCommand::Clear,
            Shortcut::OpenSettings => SessionCommand::Settings,
            Shortcut::Hide => SessionCommand::Quit,
        }
    }
}

pub const HELP_TEXT: &str = "Commands: /clear (Ctrl+L), /settings (Ctrl+,), /key <api key>, \
/model [id], /export <json|text|markdown>, /help, /quit (Esc)";

/// Parses one line of input. Anything not starting with `/` is a message.
pub fn parse_input(line: &str) -> SessionCommand {
    let trimmed = line.trim();
    if !trimmed.starts_with('/') {
        return SessionCommand::Submit(trimmed.to_string());
    }

    let (head, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (trimmed, ""),
    };

    match head {
        "/clear" => SessionCommand::Clear,
        "/settings" => SessionCommand::Settings,
        "/key" => SessionCommand::SetCredential(rest.to_string()),
        "/model" if rest.is_empty() => SessionCommand::ListModels,
        "/model" => SessionCommand::SelectModel(rest.to_string()),
        "/export" => SessionCommand::Export(rest.to_string()),
        "/help" => SessionCommand::Help,
        "/quit" | "/exit" => SessionCommand::Quit,
        _ => SessionCommand::Unknown(head.to_string()),
    }
}

/// Maps a control character typed at a raw terminal to its shortcut.
pub fn shortcut_for_control(byte: u8) -> Option<Shortcut> {
    match byte {
        0x0c => Some(Shortcut::ClearConversation),
        0x1b => Some(Shortcut::Hide),
        _ => None,
    }
}
