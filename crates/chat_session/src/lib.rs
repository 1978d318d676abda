//! Session controller for the quick chat overlay.
//!
//! [`SessionController`] is a synchronous state machine over the conversation
//! log. [`SessionRuntime`] feeds it commands and completion results on one
//! tokio task. Front ends implement [`ChatUi`].

pub mod backend;
pub mod commands;
pub mod controller;
pub mod runtime;
pub mod terminal;
pub mod ui;

pub use backend::CompletionBackend;
pub use commands::{parse_input, shortcut_for_control, SessionCommand, Shortcut, HELP_TEXT};
pub use controller::{
    CompletionHost, CompletionJob, PersistenceMode, RequestId, SessionController, SessionState,
    Settled, SettingsError, SubmitError, Ticket, MAX_MESSAGE_LENGTH, SETTINGS_SAVED,
};
pub use runtime::{Flow, SessionRuntime, Settlement, TaskHost};
pub use terminal::{Region, TerminalLayout, TerminalUi};
pub use ui::{
    BindingId, ChatUi, ElementLookup, MissingBindings, NotificationKind, RenderedMessage,
    UiBindings,
};
