use completion_api::{CompletionClient, CompletionError, CompletionOptions, Transport};
use futures_util::future::BoxFuture;

/// Produces completions for the runtime. The returned future owns its inputs
/// so it can be spawned.
pub trait CompletionBackend: Send + Sync + 'static {
    fn complete(
        &self,
        prompt: String,
        options: CompletionOptions,
    ) -> BoxFuture<'static, Result<String, CompletionError>>;
}

impl<T: Transport> CompletionBackend for CompletionClient<T> {
    fn complete(
        &self,
        prompt: String,
        options: CompletionOptions,
    ) -> BoxFuture<'static, Result<String, CompletionError>> {
        let client = self.clone();
        Box::pin(async move { client.send(&prompt, &options).await })
    }
}
