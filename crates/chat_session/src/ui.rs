use std::fmt;

use chat_store::Role;
use thiserror::Error;
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

/// One conversation entry ready for display. `html` is the formatter output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub role: Role,
    pub content: String,
    pub html: String,
    pub created_at: OffsetDateTime,
}

/// Presentation seam driven by the session controller.
pub trait ChatUi {
    fn render_message(&mut self, message: &RenderedMessage);
    fn set_waiting(&mut self, waiting: bool);
    fn notify(&mut self, text: &str, kind: NotificationKind);
    fn clear_messages(&mut self);
    fn open_settings(&mut self);

    /// Hands a finished export to the front end. Front ends without a save
    /// dialog can ignore it.
    fn present_export(&mut self, _format: &str, _contents: &str) {}
}

/// Elements the overlay cannot work without.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingId {
    Input,
    Conversation,
    Loader,
    ModelSelect,
    SendButton,
    ClearButton,
    SettingsButton,
}

impl BindingId {
    pub const ALL: [BindingId; 7] = [
        BindingId::Input,
        BindingId::Conversation,
        BindingId::Loader,
        BindingId::ModelSelect,
        BindingId::SendButton,
        BindingId::ClearButton,
        BindingId::SettingsButton,
    ];

    pub fn element_id(self) -> &'static str {
        match self {
            BindingId::Input => "raycast-input",
            BindingId::Conversation => "raycast-conversation",
            BindingId::Loader => "raycast-loader",
            BindingId::ModelSelect => "raycast-model-select",
            BindingId::SendButton => "raycast-send-btn",
            BindingId::ClearButton => "raycast-clear-btn",
            BindingId::SettingsButton => "raycast-settings-btn",
        }
    }
}

impl fmt::Display for BindingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_id())
    }
}

/// Resolves element ids to front-end handles.
pub trait ElementLookup {
    type Handle;

    fn lookup(&self, element_id: &str) -> Option<Self::Handle>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing UI elements: {}", join_ids(.missing))]
pub struct MissingBindings {
    pub missing: Vec<BindingId>,
}

fn join_ids(ids: &[BindingId]) -> String {
    ids.iter()
        .map(|id| id.element_id())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Every required element, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiBindings<H> {
    pub input: H,
    pub conversation: H,
    pub loader: H,
    pub model_select: H,
    pub send_button: H,
    pub clear_button: H,
    pub settings_button: H,
}

impl<H> UiBindings<H> {
    /// Looks up every [`BindingId`] and reports all of the missing ones
    /// together rather than stopping at the first.
    pub fn bind<L>(lookup: &L) -> Result<Self, MissingBindings>
    where
        L: ElementLookup<Handle = H> + ?Sized,
    {
        let mut missing = Vec::new();
        let mut resolve = |id: BindingId| {
            let handle = lookup.lookup(id.element_id());
            if handle.is_none() {
                missing.push(id);
            }
            handle
        };

        let input = resolve(BindingId::Input);
        let conversation = resolve(BindingId::Conversation);
        let loader = resolve(BindingId::Loader);
        let model_select = resolve(BindingId::ModelSelect);
        let send_button = resolve(BindingId::SendButton);
        let clear_button = resolve(BindingId::ClearButton);
        let settings_button = resolve(BindingId::SettingsButton);

        match (
            input,
            conversation,
            loader,
            model_select,
            send_button,
            clear_button,
            settings_button,
        ) {
            (
                Some(input),
                Some(conversation),
                Some(loader),
                Some(model_select),
                Some(send_button),
                Some(clear_button),
                Some(settings_button),
            ) => Ok(Self {
                input,
                conversation,
                loader,
                model_select,
                send_button,
                clear_button,
                settings_button,
            }),
            _ => Err(MissingBindings { missing }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    struct Page(BTreeMap<&'static str, u32>);

    impl ElementLookup for Page {
        type Handle = u32;

        fn lookup(&self, element_id: &str) -> Option<u32> {
            self.0.get(element_id).copied()
        }
    }

    fn full_page() -> Page {
        Page(
            BindingId::ALL
                .iter()
                .zip(1..)
                .map(|(id, handle)| (id.element_id(), handle))
                .collect(),
        )
    }

    #[test]
    fn binds_every_element() {
        let bindings = UiBindings::bind(&full_page()).expect("all elements present");
        assert_eq!(bindings.input, 1);
        assert_eq!(bindings.settings_button, 7);
    }

    #[test]
    fn reports_every_missing_element() {
        let mut page = full_page();
        page.0.remove("raycast-loader");
        page.0.remove("raycast-send-btn");

        let err = UiBindings::bind(&page).expect_err("two elements missing");
        assert_eq!(err.missing, vec![BindingId::Loader, BindingId::SendButton]);
        assert_eq!(
            err.to_string(),
            "missing UI elements: raycast-loader, raycast-send-btn"
        );
    }

    #[test]
    fn empty_page_lists_everything() {
        let err = UiBindings::bind(&Page(BTreeMap::new())).expect_err("nothing present");
        assert_eq!(err.missing, BindingId::ALL.to_vec());
    }
}
