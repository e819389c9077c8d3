use reqwest::StatusCode;
use std::error::Error as StdError;
use std::io::ErrorKind;

const BODY_EXCERPT_CHARS: usize = 200;

/// Why a single completion attempt failed. Every variant is retryable.
#[derive(Debug, thiserror::Error)]
pub enum AttemptFailure {
    #[error("Model API returned status {status}: {}", body_excerpt(.body))]
    Status { status: StatusCode, body: String },

    #[error(
        "Model request timed out after {timeout_secs}s while calling '{api_url}'. \
         Increase MODEL_TIMEOUT_SECS or check model responsiveness."
    )]
    TimedOut { api_url: String, timeout_secs: u64 },

    #[error(
        "Connection refused by model API at '{api_url}'. \
         Check MODEL_BASE_URL and that the endpoint is reachable."
    )]
    ConnectionRefused { api_url: String },

    #[error(
        "Failed to connect to model API at '{api_url}'. \
         Check MODEL_BASE_URL and network connectivity."
    )]
    Connect { api_url: String },

    #[error("Failed to call model API at '{api_url}': {reason}")]
    Transport { api_url: String, reason: String },
}

fn body_excerpt(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return "<empty body>".to_string();
    }
    match body.char_indices().nth(BODY_EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

fn error_chain_matches(err: &(dyn StdError + 'static), kind: ErrorKind, needle: &str) -> bool {
    let mut current: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(source) = current {
        if let Some(io_err) = source.downcast_ref::<std::io::Error>()
            && io_err.kind() == kind
        {
            return true;
        }

        if source.to_string().to_ascii_lowercase().contains(needle) {
            return true;
        }

        current = source.source();
    }

    false
}

pub(crate) fn classify_request_error(
    err: &reqwest::Error,
    api_url: &str,
    timeout_secs: u64,
) -> AttemptFailure {
    let api_url = api_url.to_string();

    if err.is_timeout() || error_chain_matches(err, ErrorKind::TimedOut, "timed out") {
        return AttemptFailure::TimedOut {
            api_url,
            timeout_secs,
        };
    }

    if err.is_connect() {
        if error_chain_matches(err, ErrorKind::ConnectionRefused, "connection refused") {
            return AttemptFailure::ConnectionRefused { api_url };
        }
        return AttemptFailure::Connect { api_url };
    }

    AttemptFailure::Transport {
        api_url,
        reason: err.to_string(),
    }
}
