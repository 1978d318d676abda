use std::fmt;

/// Per-call parameters taken from the user's settings.
#[derive(Clone, PartialEq)]
pub struct CompletionOptions {
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl CompletionOptions {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
        max_output_tokens: u32,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            temperature,
            max_output_tokens,
        }
    }

    pub fn has_credential(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl fmt::Debug for CompletionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionOptions")
            .field("api_key", &if self.has_credential() { "<redacted>" } else { "<unset>" })
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_never_prints_the_key() {
        let options = CompletionOptions::new("AIzaSecret", "gemini-2.0-flash", 0.7, 2048);
        let rendered = format!("{options:?}");
        assert!(!rendered.contains("AIzaSecret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn blank_key_is_not_a_credential() {
        assert!(!CompletionOptions::new("  ", "m", 0.0, 1).has_credential());
        assert!(CompletionOptions::new("k", "m", 0.0, 1).has_credential());
    }
}
