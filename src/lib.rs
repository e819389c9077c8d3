pub mod completion;
pub mod config;
pub mod logging;
pub mod models;
pub mod providers;
pub mod repl;
pub mod transcript;

use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::info;

use completion::CompletionClient;
use config::Config;
use repl::run_repl;

pub async fn run() -> Result<()> {
    let cfg = Config::from_env();
    info!(
        model_base_url = %cfg.model_base_url,
        model_timeout_secs = cfg.model_timeout_secs,
        max_retries = cfg.max_retries,
        chat_log_path = %cfg.chat_log_path.display(),
        api_key_set = cfg.api_key.is_some(),
        "loaded runtime configuration"
    );

    let client = Client::builder()
        .timeout(Duration::from_secs(cfg.model_timeout_secs))
        .build()
        .context("Failed to initialize HTTP client")?;
    let completions = CompletionClient::new(client, &cfg);

    run_repl(&completions, &cfg).await
}
