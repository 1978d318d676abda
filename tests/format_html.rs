use pretty_assertions::assert_eq;
use quick_chat::format_message;

const P: &str = "<p class=\"message-paragraph\">";

#[test]
fn headings_and_inline_styles() {
    assert_eq!(
        format_message("# Title\n\nSome **bold** and *em* and ~~gone~~."),
        format!(
            "<h1 class=\"message-heading\">Title</h1>{P}Some <strong>bold</strong> and \
             <em>em</em> and <del>gone</del>.</p>"
        )
    );
}

#[test]
fn deep_headings_clamp_to_h3() {
    assert_eq!(
        format_message("#### deep"),
        "<h3 class=\"message-heading\">deep</h3>"
    );
}

#[test]
fn raw_html_is_escaped() {
    let html = format_message("<script>alert(1)</script>");
    assert!(!html.contains("<script"), "{html}");
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"), "{html}");

    let inline = format_message("hello <b onclick=\"x\">world</b>");
    assert!(!inline.contains("<b "), "{inline}");
    assert!(inline.contains("&lt;b onclick=&quot;x&quot;&gt;"), "{inline}");
}

#[test]
fn inline_code_is_escaped() {
    assert_eq!(
        format_message("use `a<b>` here"),
        format!("{P}use <code class=\"inline-code\">a&lt;b&gt;</code> here</p>")
    );
}

#[test]
fn links_open_in_new_window_and_unsafe_targets_are_neutralized() {
    let html = format_message("[ok](https://example.com) [bad](javascript:alert(1))");
    assert!(
        html.contains(
            "<a href=\"https://example.com\" target=\"_blank\" rel=\"noopener noreferrer\" \
             class=\"message-link\">ok</a>"
        ),
        "{html}"
    );
    assert!(
        html.contains(
            "<a href=\"#\" target=\"_blank\" rel=\"noopener noreferrer\" \
             class=\"message-link\">bad</a>"
        ),
        "{html}"
    );
    assert!(!html.contains("javascript:"), "{html}");
}

#[test]
fn bare_urls_become_links() {
    let html = format_message("see https://example.com/docs");
    assert!(html.contains("href=\"https://example.com/docs\""), "{html}");
}

#[test]
fn unordered_list() {
    assert_eq!(
        format_message("- one\n- two"),
        "<ul class=\"message-list\"><li class=\"list-item\">one</li>\
         <li class=\"list-item\">two</li></ul>"
    );
}

#[test]
fn ordered_list_and_custom_start() {
    assert_eq!(
        format_message("1. first\n2. second"),
        "<ol class=\"message-list numbered\"><li class=\"list-item numbered\">first</li>\
         <li class=\"list-item numbered\">second</li></ol>"
    );
    assert_eq!(
        format_message("3. three\n4. four"),
        "<ol class=\"message-list numbered\" start=\"3\"><li class=\"list-item numbered\">three</li>\
         <li class=\"list-item numbered\">four</li></ol>"
    );
}

#[test]
fn blockquote_and_divider() {
    assert_eq!(
        format_message("> quoted"),
        format!("<blockquote class=\"message-quote\">{P}quoted</p></blockquote>")
    );
    assert_eq!(
        format_message("above\n\n---\n\nbelow"),
        format!("{P}above</p><hr class=\"message-divider\">{P}below</p>")
    );
}

#[test]
fn fenced_code_uses_declared_language() {
    let html = format_message("```python\nprint('hi')\n```");
    assert!(
        html.starts_with("<div class=\"raycast-code\" data-language=\"python\""),
        "{html}"
    );
    assert!(
        html.contains("<span class=\"raycast-code-language\">python</span>"),
        "{html}"
    );
    assert!(html.contains("raycast-copy-btn"), "{html}");
    assert!(html.contains("<pre><code class=\"language-python\">"), "{html}");
    assert!(html.contains("syntax-"), "{html}");
}

#[test]
fn fenced_code_without_language_is_detected() {
    let html = format_message("```\necho hi\n```");
    assert!(html.contains("data-language=\"bash\""), "{html}");

    let plain = format_message("```\njust words & things\n```");
    assert!(plain.contains("data-language=\"plaintext\""), "{plain}");
    assert!(plain.contains("just words &amp; things"), "{plain}");
}

#[test]
fn code_block_counter_restarts_per_call() {
    let text = "```\none\n```\n\n```\ntwo\n```";
    let first = format_message(text);
    assert!(first.contains("data-code-index=\"0\""), "{first}");
    assert!(first.contains("data-code-index=\"1\""), "{first}");

    let second = format_message("```\nthree\n```");
    assert!(second.contains("data-code-index=\"0\""), "{second}");
    assert!(!second.contains("data-code-index=\"1\""), "{second}");
}
