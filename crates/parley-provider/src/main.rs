//! Parley tool provider — serves get_weather, count_vowels and
//! system_diagnostics as MCP tools over stdin/stdout.
//!
//! stdout is the protocol channel; logs go to stderr.

use tracing_subscriber::EnvFilter;

use parley_provider::{ParleyProvider, ProviderConfig, serve};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "parley-provider starting"
    );

    let config = ProviderConfig::from_env();
    let provider = ParleyProvider::new(&config)?;
    tracing::info!(disk_path = %config.disk_path, "tools initialized");

    tokio::select! {
        result = serve(provider, tokio::io::stdin(), tokio::io::stdout()) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
