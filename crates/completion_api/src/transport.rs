use futures_util::future::BoxFuture;
use reqwest::Client;
use tracing::debug;

use crate::config::CompletionApiConfig;
use crate::error::{parse_error_message, AttemptError};
use crate::options::CompletionOptions;
use crate::payload::{GenerateRequest, GenerateResponse};
use crate::url::generate_content_url;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// One request attempt. Retry lives in [`CompletionClient`](crate::CompletionClient).
pub trait Transport: Send + Sync + 'static {
    fn generate<'a>(
        &'a self,
        options: &'a CompletionOptions,
        request: &'a GenerateRequest,
    ) -> BoxFuture<'a, Result<String, AttemptError>>;
}

#[derive(Debug)]
pub struct HttpTransport {
    http: Client,
    config: CompletionApiConfig,
}

impl HttpTransport {
    pub fn new(config: CompletionApiConfig) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = config.user_agent.as_deref() {
            builder = builder.user_agent(user_agent);
        }
        let http = builder.build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &CompletionApiConfig {
        &self.config
    }

    pub fn endpoint(&self, model: &str) -> String {
        generate_content_url(&self.config.base_url, model)
    }

    pub fn build_request(
        &self,
        options: &CompletionOptions,
        request: &GenerateRequest,
    ) -> reqwest::RequestBuilder {
        self.http
            .post(self.endpoint(&options.model))
            .header(API_KEY_HEADER, options.api_key.trim())
            .json(request)
    }
}

impl Transport for HttpTransport {
    fn generate<'a>(
        &'a self,
        options: &'a CompletionOptions,
        request: &'a GenerateRequest,
    ) -> BoxFuture<'a, Result<String, AttemptError>> {
        Box::pin(async move {
            let response = self
                .build_request(options, request)
                .send()
                .await
                .map_err(|error| AttemptError::from_reqwest(&error))?;
            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|error| AttemptError::from_reqwest(&error))?;
            debug!(status = status.as_u16(), bytes = body.len(), "completion response received");

            if !status.is_success() {
                return Err(AttemptError::status(
                    status.as_u16(),
                    parse_error_message(status, &body),
                ));
            }

            let parsed: GenerateResponse = serde_json::from_str(&body)
                .map_err(|error| AttemptError::Malformed(error.to_string()))?;
            match parsed.text() {
                Some(text) => Ok(text),
                None => match parsed.block_reason() {
                    Some(reason) => Err(AttemptError::Blocked(reason.to_string())),
                    None => Err(AttemptError::EmptyText),
                },
            }
        })
    }
}
