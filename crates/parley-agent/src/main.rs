//! Parley — interactive agent that routes free-text requests to the tool
//! provider process.
//!
//! stdout carries the dialogue; logs go to stderr.

use std::process::ExitCode;

use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use parley_agent::dispatcher::{Dispatcher, missing_capabilities};
use parley_agent::repl::{self, Prompts, ReplExit};
use parley_agent::AgentConfig;
use parley_transport::StdioSession;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    // ── Load config ─────────────────────────────────────────────
    let config_path = std::env::args().nth(1);
    let config = AgentConfig::load(config_path.as_deref())?;
    tracing::info!(
        command = %config.provider.command,
        config = ?config_path,
        "config loaded"
    );

    // ── Provider session ────────────────────────────────────────
    let session = StdioSession::spawn(&config.provider).await?;

    match session.list_tools().await {
        Ok(tools) => {
            for capability in missing_capabilities(&tools) {
                tracing::warn!(tool = %capability, "provider does not advertise tool");
            }
        }
        Err(e) => tracing::warn!(error = %e, "tools/list failed"),
    }

    // ── Dialogue ────────────────────────────────────────────────
    let prompts = Prompts {
        prompt: config.prompt.clone(),
        reply_prefix: config.reply_prefix.clone(),
    };
    let outcome = {
        let mut dispatcher = Dispatcher::new(&session);
        let stdin = BufReader::new(tokio::io::stdin());
        let mut stdout = tokio::io::stdout();

        tokio::select! {
            result = repl::run(&mut dispatcher, stdin, &mut stdout, &prompts) => result,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("received Ctrl+C, shutting down");
                Ok(ReplExit::Quit)
            }
        }
    };

    // Teardown runs on every path out of the loop.
    if let Err(e) = session.shutdown().await {
        tracing::warn!(error = %e, "provider shutdown failed");
    }

    match outcome? {
        ReplExit::ConnectionLost(e) => {
            tracing::error!(error = %e, "exiting after provider failure");
            Ok(ExitCode::FAILURE)
        }
        ReplExit::Quit | ReplExit::EndOfInput => Ok(ExitCode::SUCCESS),
    }
}
