use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};
use tracing::{info, warn};

use crate::completion::{CompletionClient, CompletionTransport};
use crate::config::Config;
use crate::models::{self, MODELS};
use crate::transcript::{self, TranscriptLogger};

pub async fn run_repl<T>(client: &CompletionClient<T>, cfg: &Config) -> Result<()>
where
    T: CompletionTransport,
{
    let logger = TranscriptLogger::new(cfg.chat_log_path.clone());
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    run_session(&mut input, &mut output, client, &logger).await
}

pub async fn run_session<R, W, T>(
    input: &mut R,
    output: &mut W,
    client: &CompletionClient<T>,
    logger: &TranscriptLogger,
) -> Result<()>
where
    R: BufRead,
    W: Write,
    T: CompletionTransport,
{
    models::write_menu(output).context("Failed to write model menu")?;
    let Some(model) = prompt_for_model(input, output)? else {
        info!("input closed before a model was selected");
        return Ok(());
    };
    info!(model, "model selected");

    writeln!(output, "Welcome to your AI chatbot! Type 'exit' to quit.")
        .context("Failed to write to stdout")?;
    if let Err(err) = logger.append_session_start() {
        report_log_failure(output, logger, &err)?;
    }

    loop {
        let stamp = transcript::timestamp_now();
        write!(output, "\n{stamp} You: ").context("Failed to write to stdout")?;
        output.flush().context("Failed to flush stdout")?;

        let Some(line) = read_line(input)? else {
            info!("input closed; ending chat session");
            break;
        };

        let prompt = line.trim_end_matches(['\r', '\n']);
        let command = prompt.trim();
        if command.is_empty() {
            writeln!(output, "Please enter a message.").context("Failed to write to stdout")?;
            continue;
        }
        if is_exit_command(command) {
            writeln!(output, "\nGoodbye! 👋").context("Failed to write to stdout")?;
            break;
        }

        let reply = match client.complete(model, prompt).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(model, error = ?err, "completion failed");
                err.to_string()
            }
        };

        if let Err(err) = logger.append(prompt, &reply) {
            report_log_failure(output, logger, &err)?;
        }
        writeln!(output, "{stamp} AI: {reply}").context("Failed to write to stdout")?;
    }

    Ok(())
}

fn prompt_for_model<R, W>(input: &mut R, output: &mut W) -> Result<Option<&'static str>>
where
    R: BufRead,
    W: Write,
{
    loop {
        let Some(line) = read_line(input)? else {
            return Ok(None);
        };

        match models::select_model(&line) {
            Ok(model) => return Ok(Some(model)),
            Err(err) => {
                warn!(input = %line.trim(), error = %err, "invalid model selection");
                writeln!(
                    output,
                    "Invalid selection: {err}. Enter a number from 1 to {}.",
                    MODELS.len()
                )
                .context("Failed to write to stdout")?;
            }
        }
    }
}

/// Reads one line, replacing invalid UTF-8 with U+FFFD rather than failing.
fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut buf = Vec::new();
    let read = input
        .read_until(b'\n', &mut buf)
        .context("Failed to read stdin")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}

fn is_exit_command(prompt: &str) -> bool {
    prompt.eq_ignore_ascii_case("exit") || prompt.eq_ignore_ascii_case("quit")
}

fn report_log_failure<W: Write>(
    output: &mut W,
    logger: &TranscriptLogger,
    err: &io::Error,
) -> Result<()> {
    warn!(
        path = %logger.path().display(),
        error = %err,
        "failed to write chat transcript"
    );
    writeln!(output, "Error writing to log file: {err}").context("Failed to write to stdout")
}
