//! Markdown to HTML formatting for chat messages.
//!
//! Output is a fragment meant to be injected into the conversation view. All
//! text is escaped, raw HTML from the input is shown as text, and link targets
//! are restricted to `http`, `https` and `mailto`.

mod code;
mod timestamp;

pub use code::{detect_language, highlight_code, prewarm_highlighting};
pub use timestamp::format_timestamp;

use markdown::{mdast, to_mdast, ParseOptions};

const ALLOWED_LINK_SCHEMES: &[&str] = &["http:", "https:", "mailto:"];

/// Formats one message body. Empty or whitespace-only input yields an empty string.
pub fn format_message(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    let root = match to_mdast(text, &ParseOptions::gfm()) {
        Ok(node) => node,
        Err(_) => mdast::Node::Text(mdast::Text {
            value: text.to_string(),
            position: None,
        }),
    };

    let nodes = match root {
        mdast::Node::Root(root) => root.children,
        mdast::Node::Text(text) => vec![mdast::Node::Paragraph(mdast::Paragraph {
            children: vec![mdast::Node::Text(text)],
            position: None,
        })],
        other => vec![other],
    };

    let mut writer = HtmlWriter::default();
    for node in &nodes {
        writer.block(node);
    }
    writer.out
}

#[derive(Default)]
struct HtmlWriter {
    out: String,
    code_blocks: usize,
}

impl HtmlWriter {
    fn block(&mut self, node: &mdast::Node) {
        match node {
            mdast::Node::Heading(heading) => {
                let level = heading.depth.clamp(1, 3);
                self.out
                    .push_str(&format!("<h{level} class=\"message-heading\">"));
                self.inline_nodes(&heading.children);
                self.out.push_str(&format!("</h{level}>"));
            }
            mdast::Node::Paragraph(paragraph) => {
                self.out.push_str("<p class=\"message-paragraph\">");
                self.inline_nodes(&paragraph.children);
                self.out.push_str("</p>");
            }
            mdast::Node::Code(code) => self.code_block(code),
            mdast::Node::List(list) => self.list(list),
            mdast::Node::Blockquote(blockquote) => {
                self.out.push_str("<blockquote class=\"message-quote\">");
                for child in &blockquote.children {
                    self.block(child);
                }
                self.out.push_str("</blockquote>");
            }
            mdast::Node::ThematicBreak(_) => self.out.push_str("<hr class=\"message-divider\">"),
            mdast::Node::Html(html) => {
                self.out.push_str("<p class=\"message-paragraph\">");
                self.text(&html.value);
                self.out.push_str("</p>");
            }
            mdast::Node::Table(table) => self.table(table),
            mdast::Node::FootnoteDefinition(definition) => {
                self.out.push_str("<div class=\"message-footnote\">");
                self.text(&format!("[^{}]: ", definition.identifier));
                for child in &definition.children {
                    self.block(child);
                }
                self.out.push_str("</div>");
            }
            mdast::Node::Definition(_) => {}
            other => {
                let plain = plain_text(std::slice::from_ref(other));
                if !plain.is_empty() {
                    self.out.push_str("<p class=\"message-paragraph\">");
                    self.text(&plain);
                    self.out.push_str("</p>");
                }
            }
        }
    }

    fn inline_nodes(&mut self, nodes: &[mdast::Node]) {
        for node in nodes {
            self.inline(node);
        }
    }

    fn inline(&mut self, node: &mdast::Node) {
        match node {
            mdast::Node::Text(text) => self.text(&text.value),
            mdast::Node::Strong(strong) => {
                self.out.push_str("<strong>");
                self.inline_nodes(&strong.children);
                self.out.push_str("</strong>");
            }
            mdast::Node::Emphasis(emphasis) => {
                self.out.push_str("<em>");
                self.inline_nodes(&emphasis.children);
                self.out.push_str("</em>");
            }
            mdast::Node::Delete(delete) => {
                self.out.push_str("<del>");
                self.inline_nodes(&delete.children);
                self.out.push_str("</del>");
            }
            mdast::Node::InlineCode(code) => {
                self.out.push_str("<code class=\"inline-code\">");
                self.out.push_str(&escape_html(&code.value));
                self.out.push_str("</code>");
            }
            mdast::Node::Link(link) => {
                self.out.push_str(&format!(
                    "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\" class=\"message-link\">",
                    escape_html(sanitize_href(&link.url))
                ));
                self.inline_nodes(&link.children);
                self.out.push_str("</a>");
            }
            mdast::Node::Break(_) => self.out.push_str("<br>"),
            mdast::Node::Html(html) => self.text(&html.value),
            mdast::Node::Image(image) => {
                let label = if image.alt.is_empty() {
                    image.url.as_str()
                } else {
                    image.alt.as_str()
                };
                self.text(label);
            }
            mdast::Node::FootnoteReference(reference) => {
                self.text(&format!("[^{}]", reference.identifier));
            }
            mdast::Node::Paragraph(paragraph) => self.inline_nodes(&paragraph.children),
            other => self.text(&plain_text(std::slice::from_ref(other))),
        }
    }

    /// Escaped text with soft line breaks turned into `<br>`.
    fn text(&mut self, value: &str) {
        let mut lines = value.split('\n');
        if let Some(first) = lines.next() {
            self.out.push_str(&escape_html(first));
        }
        for line in lines {
            self.out.push_str("<br>");
            self.out.push_str(&escape_html(line));
        }
    }

    fn list(&mut self, list: &mdast::List) {
        let (open, close, item_class) = if list.ordered {
            ("<ol class=\"message-list numbered\"", "</ol>", "list-item numbered")
        } else {
            ("<ul class=\"message-list\"", "</ul>", "list-item")
        };
        self.out.push_str(open);
        if let Some(start) = list.start.filter(|start| list.ordered && *start != 1) {
            self.out.push_str(&format!(" start=\"{start}\""));
        }
        self.out.push('>');

        for node in &list.children {
            let mdast::Node::ListItem(item) = node else {
                continue;
            };
            self.out.push_str(&format!("<li class=\"{item_class}\">"));
            match item.checked {
                Some(true) => self.out.push_str("[x] "),
                Some(false) => self.out.push_str("[ ] "),
                None => {}
            }
            self.list_item(item);
            self.out.push_str("</li>");
        }

        self.out.push_str(close);
    }

    fn list_item(&mut self, item: &mdast::ListItem) {
        let mut first_paragraph = true;
        for child in &item.children {
            match child {
                mdast::Node::Paragraph(paragraph) if !item.spread => {
                    if !first_paragraph {
                        self.out.push_str("<br>");
                    }
                    first_paragraph = false;
                    self.inline_nodes(&paragraph.children);
                }
                other => self.block(other),
            }
        }
    }

    fn code_block(&mut self, code: &mdast::Code) {
        let language = code::resolve_language(code.lang.as_deref(), &code.value);
        let highlighted = highlight_code(&code.value, &language);
        let index = self.code_blocks;
        self.code_blocks += 1;

        self.out.push_str(&format!(
            "<div class=\"raycast-code\" data-language=\"{language}\" data-code-index=\"{index}\">\
             <div class=\"raycast-code-header\">\
             <span class=\"raycast-code-language\">{language}</span>\
             <button class=\"raycast-copy-btn\" type=\"button\">Copy</button>\
             </div>\
             <pre><code class=\"language-{language}\">{highlighted}</code></pre>\
             </div>"
        ));
    }

    fn table(&mut self, table: &mdast::Table) {
        self.out.push_str("<table class=\"message-table\">");
        for (row_index, row) in table.children.iter().enumerate() {
            let mdast::Node::TableRow(row) = row else {
                continue;
            };
            let cell_tag = if row_index == 0 { "th" } else { "td" };
            self.out.push_str("<tr>");
            for cell in &row.children {
                let mdast::Node::TableCell(cell) = cell else {
                    continue;
                };
                self.out.push_str(&format!("<{cell_tag}>"));
                self.inline_nodes(&cell.children);
                self.out.push_str(&format!("</{cell_tag}>"));
            }
            self.out.push_str("</tr>");
        }
        self.out.push_str("</table>");
    }
}

pub(crate) fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn sanitize_href(url: &str) -> &str {
    let trimmed = url.trim();
    let lowered = trimmed.to_ascii_lowercase();
    if ALLOWED_LINK_SCHEMES
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
    {
        trimmed
    } else {
        "#"
    }
}

fn plain_text(nodes: &[mdast::Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            mdast::Node::Text(text) => out.push_str(&text.value),
            mdast::Node::InlineCode(code) => out.push_str(&code.value),
            mdast::Node::InlineMath(math) => out.push_str(&math.value),
            mdast::Node::Math(math) => out.push_str(&math.value),
            mdast::Node::Html(html) => out.push_str(&html.value),
            mdast::Node::Image(image) => out.push_str(&image.alt),
            other => {
                if let Some(children) = other.children() {
                    out.push_str(&plain_text(children));
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_all_special_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#039;&amp;&#039;&lt;/a&gt;"
        );
    }

    #[test]
    fn only_safe_schemes_survive() {
        assert_eq!(sanitize_href("https://example.com"), "https://example.com");
        assert_eq!(sanitize_href("HTTP://EXAMPLE.COM"), "HTTP://EXAMPLE.COM");
        assert_eq!(sanitize_href("mailto:hi@example.com"), "mailto:hi@example.com");
        assert_eq!(sanitize_href("javascript:alert(1)"), "#");
        assert_eq!(sanitize_href("data:text/html,hi"), "#");
        assert_eq!(sanitize_href("/relative/path"), "#");
    }

    #[test]
    fn blank_input_is_empty() {
        assert_eq!(format_message(""), "");
        assert_eq!(format_message("  \n\t "), "");
    }

    #[test]
    fn soft_breaks_become_br() {
        assert_eq!(
            format_message("one\ntwo"),
            "<p class=\"message-paragraph\">one<br>two</p>"
        );
    }
}
