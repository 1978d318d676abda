use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::CompletionApiConfig;
use crate::error::{classify, AttemptError, CompletionError};
use crate::options::CompletionOptions;
use crate::payload::GenerateRequest;
use crate::retry::{is_retryable, RetryPolicy};
use crate::transport::{HttpTransport, Transport};

#[derive(Debug)]
pub struct CompletionClient<T = HttpTransport> {
    transport: Arc<T>,
    policy: RetryPolicy,
}

impl<T> Clone for CompletionClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            policy: self.policy,
        }
    }
}

impl CompletionClient<HttpTransport> {
    pub fn new(config: CompletionApiConfig) -> Result<Self, reqwest::Error> {
        let policy = config.retry;
        Ok(Self::with_transport(HttpTransport::new(config)?, policy))
    }
}

impl<T: Transport> CompletionClient<T> {
    pub fn with_transport(transport: T, policy: RetryPolicy) -> Self {
        Self {
            transport: Arc::new(transport),
            policy,
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sends `message` as a single user turn and returns the non-empty reply.
    ///
    /// Fails with [`CompletionError::Validation`] for blank input and with
    /// [`CompletionError::NoCredential`] when no key is set, in both cases
    /// without touching the network.
    pub async fn send(
        &self,
        message: &str,
        options: &CompletionOptions,
    ) -> Result<String, CompletionError> {
        if message.trim().is_empty() {
            return Err(CompletionError::Validation);
        }
        if !options.has_credential() {
            return Err(CompletionError::NoCredential);
        }

        let request =
            GenerateRequest::user_prompt(message, options.temperature, options.max_output_tokens);
        let attempts = self.policy.attempts();
        let mut last_error = AttemptError::EmptyText;

        for attempt in 0..attempts {
            if attempt > 0 {
                let delay = self.policy.delay_for(attempt - 1);
                warn!(
                    attempt,
                    max_attempts = attempts,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %last_error,
                    "completion attempt failed; retrying"
                );
                tokio::time::sleep(delay).await;
            }

            debug!(
                attempt = attempt + 1,
                max_attempts = attempts,
                model = %options.model,
                "sending completion request"
            );
            match self.transport.generate(options, &request).await {
                Ok(text) if !text.trim().is_empty() => return Ok(text),
                Ok(_) => last_error = AttemptError::EmptyText,
                Err(error) => last_error = error,
            }

            if !is_retryable(&last_error) {
                break;
            }
        }

        let classified = classify(&last_error);
        warn!(error = %last_error, classified = ?classified, "completion failed");
        Err(classified)
    }
}
