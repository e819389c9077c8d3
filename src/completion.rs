use reqwest::Client;
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, warn};

use crate::config::Config;
use crate::providers::groq::{self, ChatCompletionRequest};
use crate::providers::http_errors::AttemptFailure;

/// Failure of a whole completion. The `Display` text is what the chat shows
/// in place of a reply.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompletionError {
    #[error("Error: API Key is not set in environment variables.")]
    MissingApiKey,
    #[error("Error: Maximum retries exceeded.")]
    RetriesExhausted { attempts: u32 },
    #[error("Error: Unexpected response structure.")]
    UnexpectedResponse,
}

pub type TransportFuture<'a> = Pin<Box<dyn Future<Output = Result<String, AttemptFailure>> + 'a>>;

/// One POST of a completion request, yielding the raw success body.
pub trait CompletionTransport {
    fn post<'a>(&'a self, api_key: &'a str, request: &'a ChatCompletionRequest)
    -> TransportFuture<'a>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    api_url: String,
    timeout_secs: u64,
}

impl HttpTransport {
    pub fn new(client: Client, cfg: &Config) -> Self {
        Self {
            client,
            api_url: groq::chat_url(&cfg.model_base_url),
            timeout_secs: cfg.model_timeout_secs,
        }
    }
}

impl CompletionTransport for HttpTransport {
    fn post<'a>(
        &'a self,
        api_key: &'a str,
        request: &'a ChatCompletionRequest,
    ) -> TransportFuture<'a> {
        Box::pin(async move {
            groq::post_chat_completion(
                &self.client,
                &self.api_url,
                api_key,
                self.timeout_secs,
                request,
            )
            .await
        })
    }
}

pub struct CompletionClient<T = HttpTransport> {
    transport: T,
    api_key: Option<String>,
    max_retries: u32,
}

impl CompletionClient<HttpTransport> {
    pub fn new(client: Client, cfg: &Config) -> Self {
        Self::with_transport(
            HttpTransport::new(client, cfg),
            cfg.api_key.clone(),
            cfg.max_retries,
        )
    }
}

impl<T> CompletionClient<T> {
    pub fn with_transport(transport: T, api_key: Option<String>, max_retries: u32) -> Self {
        Self {
            transport,
            api_key,
            max_retries,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T> CompletionClient<T>
where
    T: CompletionTransport,
{
    /// Sends `user_text` as a single-message conversation and returns the
    /// model's reply verbatim. Failed attempts are retried immediately up to
    /// `max_retries` in total; a reply that does not decode is not retried.
    pub async fn complete(&self, model: &str, user_text: &str) -> Result<String, CompletionError> {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("GROQ_API_KEY is not set; skipping completion request");
            return Err(CompletionError::MissingApiKey);
        };

        let request = ChatCompletionRequest::single_turn(model, user_text);
        let mut attempts = 0;
        while attempts < self.max_retries {
            attempts += 1;
            match self.transport.post(api_key, &request).await {
                Ok(body) => {
                    debug!(model, attempt = attempts, "completion attempt succeeded");
                    return groq::extract_reply(&body).ok_or_else(|| {
                        warn!(
                            model,
                            body_len = body.len(),
                            "completion response is missing choices[0].message.content"
                        );
                        CompletionError::UnexpectedResponse
                    });
                }
                Err(failure) => {
                    warn!(
                        model,
                        attempt = attempts,
                        max_retries = self.max_retries,
                        error = %failure,
                        "completion attempt failed"
                    );
                }
            }
        }

        Err(CompletionError::RetriesExhausted { attempts })
    }
}
