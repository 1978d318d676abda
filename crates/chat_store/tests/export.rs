use chat_store::{export_conversation, export_conversation_at, Message, Role};
use pretty_assertions::assert_eq;
use time::macros::datetime;

fn conversation() -> Vec<Message> {
    vec![
        Message::new(Role::User, "What is Rust?", datetime!(2025-03-01 09:15:00 UTC)),
        Message::new(
            Role::Assistant,
            "A systems programming language.",
            datetime!(2025-03-01 09:15:04 UTC),
        ),
    ]
}

#[test]
fn json_export_parses_back_to_the_same_messages() {
    let messages = conversation();
    let json = export_conversation(&messages, "json").expect("json export");

    assert!(json.contains('\n'), "pretty printed");
    let parsed: Vec<Message> = serde_json::from_str(&json).expect("parse export");
    assert_eq!(parsed, messages);
}

#[test]
fn text_export_lists_one_line_per_message() {
    let text = export_conversation(&conversation(), "TXT").expect("text export");

    assert_eq!(
        text,
        "[2025-03-01 09:15:00 UTC] You: What is Rust?\n\
         \n\
         [2025-03-01 09:15:04 UTC] AI: A systems programming language.\n"
    );
    assert_eq!(export_conversation(&conversation(), "text"), Some(text));
}

#[test]
fn markdown_export_has_header_and_blocks() {
    let markdown = export_conversation_at(
        &conversation(),
        "md",
        datetime!(2025-03-02 12:00:00 UTC),
    )
    .expect("markdown export");

    assert_eq!(
        markdown,
        "# Conversation Export\n\n\
         *Exported on 2025-03-02 12:00:00 UTC*\n\n---\n\n\
         ### **You** *(2025-03-01 09:15:00 UTC)*\n\nWhat is Rust?\n\n---\n\n\
         ### **AI Assistant** *(2025-03-01 09:15:04 UTC)*\n\nA systems programming language.\n\n---\n\n"
    );
}

#[test]
fn empty_markdown_export_has_only_the_header() {
    let markdown = export_conversation_at(&[], "markdown", datetime!(2025-03-02 12:00:00 UTC))
        .expect("markdown export");

    assert!(markdown.contains("# Conversation Export"));
    assert!(markdown.contains("*Exported on 2025-03-02 12:00:00 UTC*"));
    assert!(!markdown.contains("###"));
}

#[test]
fn non_utc_timestamps_are_shown_in_utc() {
    let messages = vec![Message::new(
        Role::User,
        "hi",
        datetime!(2025-03-01 11:15:00 +02:00),
    )];
    let text = export_conversation(&messages, "text").expect("text export");
    assert_eq!(text, "[2025-03-01 09:15:00 UTC] You: hi\n");
}

#[test]
fn unsupported_format_is_none() {
    assert_eq!(export_conversation(&conversation(), "pdf"), None);
    assert_eq!(export_conversation(&[], ""), None);
}
