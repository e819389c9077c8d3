use std::env;
use std::fmt;
use std::path::PathBuf;

const API_KEY_VAR: &str = "GROQ_API_KEY";
const DEFAULT_MODEL_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MAX_RETRIES: u32 = 3;
const CHAT_LOG_FILE_NAME: &str = "chat_log.txt";

#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: Option<String>,
    pub model_base_url: String,
    pub model_timeout_secs: u64,
    pub max_retries: u32,
    pub chat_log_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_env_with(|key| env::var(key).ok())
    }

    fn from_env_with(mut get_var: impl FnMut(&str) -> Option<String>) -> Self {
        let api_key = parse_api_key(get_var(API_KEY_VAR).as_deref());
        let model_base_url = get_var("MODEL_BASE_URL")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL_BASE_URL.to_string());
        let model_timeout_secs = parse_positive_u64(
            get_var("MODEL_TIMEOUT_SECS").as_deref(),
            DEFAULT_MODEL_TIMEOUT_SECS,
        );
        let max_retries = parse_max_retries(get_var("MODEL_MAX_RETRIES").as_deref());
        let chat_log_path = parse_chat_log_path(get_var("CHAT_LOG_PATH").as_deref());

        Self {
            api_key,
            model_base_url,
            model_timeout_secs,
            max_retries,
            chat_log_path,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model_base_url", &self.model_base_url)
            .field("model_timeout_secs", &self.model_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("chat_log_path", &self.chat_log_path)
            .finish()
    }
}

fn parse_api_key(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn parse_positive_u64(raw: Option<&str>, default: u64) -> u64 {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

fn parse_max_retries(raw: Option<&str>) -> u32 {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_MAX_RETRIES)
}

fn parse_chat_log_path(raw: Option<&str>) -> PathBuf {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(default_chat_log_path)
}

/// The transcript lives on the desktop; machines without one fall back to the
/// home directory, then the working directory.
pub fn default_chat_log_path() -> PathBuf {
    dirs::desktop_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CHAT_LOG_FILE_NAME)
}
