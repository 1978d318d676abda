//! Fenced code blocks: language resolution and class-based highlighting.

use std::sync::OnceLock;

use once_cell::sync::Lazy;
use regex::Regex;
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use super::escape_html;

pub const PLAIN_TEXT: &str = "plaintext";

static SYNTAX_SET: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);

const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "syntax-" };

/// Loads the bundled syntax definitions ahead of the first code block.
pub fn prewarm_highlighting() {
    Lazy::force(&SYNTAX_SET);
}

fn language_patterns() -> &'static [(&'static str, Regex)] {
    static PATTERNS: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            (
                "javascript",
                r"\b(const|let|var|function)\b|=>|console\.log",
            ),
            ("python", r"\b(def|import|from|print|class)\b|if __name__"),
            ("java", r"\b(public|private|class|void|static|extends)\b"),
            ("cpp", r"#include|std::|\b(cout|cin|namespace)\b"),
            ("html", r"(?is)</?[a-z].*>"),
            ("css", r"\{[^}]*:[^}]*\}"),
            ("json", r"^\s*[\{\[]"),
            ("bash", r"\b(echo|cd|ls|mkdir|rm|sudo)\b"),
            ("sql", r"(?i)\b(SELECT|INSERT|UPDATE|DELETE|FROM|WHERE)\b"),
        ]
        .into_iter()
        .map(|(language, pattern)| {
            (
                language,
                Regex::new(pattern).expect("language pattern must compile"),
            )
        })
        .collect()
    })
}

/// Guesses a language from the code body. First matching pattern wins.
pub fn detect_language(code: &str) -> &'static str {
    language_patterns()
        .iter()
        .find(|(_, pattern)| pattern.is_match(code))
        .map(|(language, _)| *language)
        .unwrap_or(PLAIN_TEXT)
}

/// Language for a fenced block: the first word of the info string when it is
/// usable, otherwise a guess from the body. Always safe to embed in markup.
pub(crate) fn resolve_language(info: Option<&str>, code: &str) -> String {
    let declared = info
        .and_then(|info| info.split_whitespace().next())
        .map(|word| {
            word.chars()
                .filter(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '+' | '#' | '-' | '_' | '.'))
                .collect::<String>()
                .to_ascii_lowercase()
        })
        .filter(|word| !word.is_empty() && word != PLAIN_TEXT);

    declared.unwrap_or_else(|| detect_language(code).to_string())
}

/// Highlights `code` as `language` with `syntax-` prefixed span classes. Falls
/// back to escaped text when the language is unknown.
pub fn highlight_code(code: &str, language: &str) -> String {
    if language == PLAIN_TEXT {
        return escape_html(code);
    }
    let Some(syntax) = SYNTAX_SET.find_syntax_by_token(language) else {
        return escape_html(code);
    };
    if syntax.name == "Plain Text" {
        return escape_html(code);
    }

    let mut generator =
        ClassedHTMLGenerator::new_with_class_style(syntax, &SYNTAX_SET, CLASS_STYLE);
    for line in LinesWithEndings::from(code) {
        if generator
            .parse_html_for_line_which_includes_newline(line)
            .is_err()
        {
            return escape_html(code);
        }
    }
    generator.finalize()
}
