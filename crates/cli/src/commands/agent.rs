//! `rustedreact agent` — Interactive REPL or single-message mode.

use std::io::Write;
use std::sync::Arc;

use rustedreact_agent::{AgentLoop, Termination};
use rustedreact_config::{AppConfig, ConfigError};
use rustedreact_core::message::Transcript;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub async fn run(message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // Check for the API key early so the error is actionable
    let provider = match rustedreact_providers::build_from_config(&config) {
        Ok(provider) => provider,
        Err(ConfigError::MissingApiKey) => {
            print_missing_key_help();
            return Err("No API key found. See above for setup instructions.".into());
        }
        Err(e) => return Err(e.into()),
    };

    let tools = Arc::new(rustedreact_tools::default_registry(&config.tools)?);
    debug!(provider = provider.name(), tools = tools.len(), "Agent assembled");
    let agent = AgentLoop::from_config(provider, tools, &config);

    // Ctrl-C cancels the current run and ends the session.
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    if let Some(msg) = message {
        // Single message mode
        eprint!("  Thinking...");
        let outcome = agent.run_with_cancel(&msg, &cancel).await;
        eprint!("\r              \r");
        println!("{}", outcome.answer);
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║     RustedReact Agent — Interactive Mode     ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Provider:  {}", config.default_provider);
    println!("  Model:     {}", config.default_model);
    println!("  Tools:     {}", agent.tools().names().join(", "));
    println!("  Budget:    {} steps per question", agent.max_iterations());
    println!();
    println!("  Type 'quit' or 'exit' to end the session.");
    println!("  Type 'history' to see the last conversation.");
    println!();

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    repl(&agent, stdin, &mut std::io::stdout(), &cancel).await?;
    Ok(())
}

fn print_missing_key_help() {
    eprintln!();
    eprintln!("  ERROR: No API key configured!");
    eprintln!();
    eprintln!("  Set one of these environment variables:");
    eprintln!("    export OPENROUTER_API_KEY='sk-or-v1-...'   (recommended)");
    eprintln!("    export OPENAI_API_KEY='sk-...'             (for OpenAI direct)");
    eprintln!("    export RUSTEDREACT_API_KEY='sk-...'        (generic)");
    eprintln!();
    eprintln!("  Or add it to your config file:");
    eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
    eprintln!();
    eprintln!("  Get an OpenRouter key at: https://openrouter.ai/keys");
    eprintln!();
}

/// One line of REPL input.
#[derive(Debug, PartialEq, Eq)]
enum ReplCommand<'a> {
    Empty,
    Quit,
    History,
    Ask(&'a str),
}

fn classify(line: &str) -> ReplCommand<'_> {
    let line = line.trim();
    if line.is_empty() {
        ReplCommand::Empty
    } else if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
        ReplCommand::Quit
    } else if line.eq_ignore_ascii_case("history") {
        ReplCommand::History
    } else {
        ReplCommand::Ask(line)
    }
}

/// Read questions from `input` until quit, end of input or cancellation.
///
/// Each question is a fresh run; `history` prints the transcript of the
/// most recent one as JSON.
async fn repl<R, W>(
    agent: &AgentLoop,
    input: R,
    out: &mut W,
    cancel: &CancellationToken,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut last = Transcript::new();

    loop {
        write!(out, "  You > ")?;
        out.flush()?;

        let line = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            line = lines.next_line() => line?,
        };
        let Some(line) = line else {
            break;
        };

        match classify(&line) {
            ReplCommand::Empty => continue,
            ReplCommand::Quit => break,
            ReplCommand::History => {
                writeln!(out, "{}", serde_json::to_string_pretty(&last)?)?;
            }
            ReplCommand::Ask(question) => {
                let outcome = agent.run_with_cancel(question, cancel).await;
                writeln!(out)?;
                for line in outcome.answer.lines() {
                    writeln!(out, "  Assistant > {line}")?;
                }
                writeln!(out)?;
                last = outcome.transcript;
                if outcome.termination == Termination::Cancelled {
                    break;
                }
            }
        }
    }

    writeln!(out)?;
    writeln!(out, "  Goodbye!")?;
    Ok(())
}
