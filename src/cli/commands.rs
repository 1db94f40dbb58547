//! Command handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use netops_voice::{
    create_service, get_metrics, CommandMatcher, Config, DispatchEngine, RecordingSurface,
    TracingSynthesizer,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::output;

/// Build an engine against the configured data service and probe the
/// intelligence subsystem.
pub async fn build_engine(mut config: Config, offline: bool) -> Result<DispatchEngine> {
    if offline {
        config.service.offline = true;
    }
    let service = create_service(&config).context("failed to create data service")?;
    tracing::info!("Using {} data service", service.name());
    Ok(DispatchEngine::start(
        config,
        service,
        Arc::new(RecordingSurface::new()),
        Arc::new(TracingSynthesizer),
    )
    .await)
}

/// Dispatch a single utterance and print what was announced.
pub async fn run_say(config: Config, offline: bool, text: &str, json: bool) -> Result<()> {
    let mut engine = build_engine(config, offline).await?;
    let outcome = engine.dispatch(text).await;
    output::print_outcome(&engine, &outcome, json)
}

/// Press a shortcut chord such as `Ctrl+Shift+H`.
pub async fn run_key(config: Config, offline: bool, chord: &str, json: bool) -> Result<()> {
    let mut engine = build_engine(config, offline).await?;
    let action = engine.handle_key(chord).await?;
    output::print_shortcut(&engine, chord, action, json)
}

/// List the exact phrases and grammar rules in match order.
pub fn run_patterns(json: bool) -> Result<()> {
    output::print_patterns(&CommandMatcher::standard(), json)
}

/// Read utterances from stdin until EOF or `/quit`.
///
/// Lines starting with `/` are REPL commands: `/key <chord>`, `/state`,
/// `/context`, `/metrics`, `/quit`.
pub async fn run_repl(config: Config, offline: bool, json: bool) -> Result<()> {
    let mut engine = build_engine(config, offline).await?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    eprintln!("netops-voice ready. Type a command, or /quit to exit.");
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line.split_once(' ').unwrap_or((line, "")) {
            ("/quit" | "/exit", _) => break,
            ("/key", chord) => match engine.handle_key(chord.trim()).await {
                Ok(action) => output::print_shortcut(&engine, chord.trim(), action, json)?,
                Err(e) => eprintln!("{}", e),
            },
            ("/state", _) => output::print_state(&engine, json)?,
            ("/context", _) => output::print_context(&engine, json)?,
            ("/metrics", _) => output::print_metrics(&get_metrics(), json)?,
            (command, _) if command.starts_with('/') => {
                eprintln!("Unknown command: {}", command);
            }
            _ => {
                let outcome = engine.dispatch(line).await;
                output::print_outcome(&engine, &outcome, json)?;
            }
        }
    }

    Ok(())
}
