use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::providers::http_errors::{AttemptFailure, classify_request_error};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

impl ChatCompletionRequest {
    /// One user message, no system prompt and no history.
    pub fn single_turn(model: &str, user_text: &str) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: user_text.to_string(),
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

pub fn chat_url(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

/// Pulls `choices[0].message.content` out of a response body. `None` when the
/// body is not JSON or any level of that path is missing.
pub fn extract_reply(body: &str) -> Option<String> {
    let parsed: ChatCompletionResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(err) => {
            debug!(error = %err, body_len = body.len(), "failed to decode completion response");
            return None;
        }
    };

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
}

pub async fn post_chat_completion(
    client: &Client,
    api_url: &str,
    api_key: &str,
    timeout_secs: u64,
    request: &ChatCompletionRequest,
) -> Result<String, AttemptFailure> {
    debug!(
        api_url = %api_url,
        model = %request.model,
        "sending chat completion request"
    );

    let response = client
        .post(api_url)
        .bearer_auth(api_key)
        .json(request)
        .send()
        .await
        .map_err(|err| {
            debug!(api_url = %api_url, error = ?err, "chat completion request failed");
            classify_request_error(&err, api_url, timeout_secs)
        })?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|err| classify_request_error(&err, api_url, timeout_secs))?;

    if !status.is_success() {
        return Err(AttemptFailure::Status { status, body });
    }

    debug!(
        model = %request.model,
        response_len = body.len(),
        "received chat completion response"
    );
    Ok(body)
}
