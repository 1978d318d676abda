use completion_api::error::parse_error_message;
use completion_api::{classify, AttemptError, CompletionError, TransportFailure};
use reqwest::StatusCode;

#[test]
fn error_display_is_user_facing() {
    assert_eq!(CompletionError::Validation.to_string(), "Message cannot be empty");
    assert_eq!(
        CompletionError::NoCredential.to_string(),
        "Please configure your API key in settings"
    );
    assert_eq!(
        CompletionError::RateLimited.to_string(),
        "Rate limit exceeded. Please wait a moment and try again."
    );
    assert_eq!(
        CompletionError::NetworkError.to_string(),
        "Network error. Please check your internet connection."
    );
    assert_eq!(
        CompletionError::InvalidResponse.to_string(),
        "Received invalid response from AI. Please try again."
    );
    assert_eq!(
        CompletionError::Unknown("boom".into()).to_string(),
        "Error: boom"
    );
}

#[test]
fn classify_credential_first() {
    assert_eq!(
        classify(&AttemptError::status(401, "nope")),
        CompletionError::NoCredential
    );
    assert_eq!(
        classify(&AttemptError::status(403, "forbidden")),
        CompletionError::NoCredential
    );
    // Mentions both a key and an invalid argument; the key wins.
    assert_eq!(
        classify(&AttemptError::status(
            400,
            "API key not valid. Please pass a valid API key."
        )),
        CompletionError::NoCredential
    );
}

#[test]
fn classify_rate_limit() {
    assert_eq!(
        classify(&AttemptError::status(429, "Resource has been exhausted")),
        CompletionError::RateLimited
    );
    assert_eq!(
        classify(&AttemptError::status(400, "quota exceeded for this project")),
        CompletionError::RateLimited
    );
}

#[test]
fn classify_network() {
    assert_eq!(
        classify(&AttemptError::transport(
            TransportFailure::Connect,
            "error sending request"
        )),
        CompletionError::NetworkError
    );
    assert_eq!(
        classify(&AttemptError::transport(
            TransportFailure::Timeout,
            "deadline"
        )),
        CompletionError::NetworkError
    );
    assert_eq!(
        classify(&AttemptError::transport(
            TransportFailure::Other,
            "getaddrinfo ENOTFOUND generativelanguage.googleapis.com"
        )),
        CompletionError::NetworkError
    );
}

#[test]
fn classify_invalid_response() {
    assert_eq!(classify(&AttemptError::EmptyText), CompletionError::InvalidResponse);
    assert_eq!(
        classify(&AttemptError::Malformed("expected value at line 1".into())),
        CompletionError::InvalidResponse
    );
    assert_eq!(
        classify(&AttemptError::status(400, "Invalid JSON payload received")),
        CompletionError::InvalidResponse
    );
}

#[test]
fn classify_unknown_keeps_detail() {
    assert_eq!(
        classify(&AttemptError::status(500, "Internal error encountered.")),
        CompletionError::Unknown("Internal error encountered.".into())
    );
    assert_eq!(
        classify(&AttemptError::Blocked("SAFETY".into())),
        CompletionError::Unknown("response blocked (SAFETY)".into())
    );
}

#[test]
fn parse_error_message_reads_error_payload() {
    let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
    assert_eq!(
        parse_error_message(StatusCode::BAD_REQUEST, body),
        "API key not valid."
    );
}

#[test]
fn parse_error_message_falls_back_to_status_field() {
    let body = r#"{"error":{"code":429,"message":"","status":"RESOURCE_EXHAUSTED"}}"#;
    assert_eq!(
        parse_error_message(StatusCode::TOO_MANY_REQUESTS, body),
        "RESOURCE_EXHAUSTED"
    );
}

#[test]
fn parse_error_message_falls_back_to_raw_body_or_reason() {
    assert_eq!(
        parse_error_message(StatusCode::BAD_GATEWAY, "upstream gone"),
        "upstream gone"
    );
    assert_eq!(
        parse_error_message(StatusCode::SERVICE_UNAVAILABLE, ""),
        "Service Unavailable"
    );
}
