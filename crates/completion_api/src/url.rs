/// Default base URL for the Generative Language API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const API_VERSION_SEGMENT: &str = "v1beta";

/// Builds `{base}/v1beta/models/{model}:generateContent`.
///
/// A base that already ends in `/v1beta` is not given a second version
/// segment, and an empty base falls back to [`DEFAULT_BASE_URL`].
pub fn generate_content_url(base_url: &str, model: &str) -> String {
    let base = if base_url.trim().is_empty() {
        DEFAULT_BASE_URL
    } else {
        base_url.trim()
    };
    let trimmed = base.trim_end_matches('/');
    let model = model.trim().trim_start_matches("models/");

    if trimmed.ends_with(API_VERSION_SEGMENT) {
        format!("{trimmed}/models/{model}:generateContent")
    } else {
        format!("{trimmed}/{API_VERSION_SEGMENT}/models/{model}:generateContent")
    }
}
