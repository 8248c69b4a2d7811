//! MCP surface of the provider.
//!
//! `ParleyProvider` exposes the three capabilities as `rmcp` tools. Tool
//! failures come back inside the result (`isError`); protocol errors are
//! left to `rmcp` (unknown tool, undecodable arguments).

use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::io::{AsyncRead, AsyncWrite};

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{ErrorData as McpError, ServerHandler, ServiceExt, tool, tool_handler, tool_router};

use parley_protocol::{DiagnosticsArgs, VowelArgs, WeatherArgs};
use parley_tools::{
    GetWeather, HostSampler, ProcfsHost, SystemDiagnostics, ToolResult, count_vowels,
};

use crate::config::ProviderConfig;

/// Name reported in `serverInfo`.
pub const SERVER_NAME: &str = "parley-provider";

/// The tool provider service.
#[derive(Clone)]
pub struct ParleyProvider {
    weather: Arc<GetWeather>,
    diagnostics: Arc<SystemDiagnostics>,
    tool_router: ToolRouter<Self>,
}

impl ParleyProvider {
    /// Provider sampling the live host.
    pub fn new(config: &ProviderConfig) -> ToolResult<Self> {
        Self::with_host(config, Box::new(ProcfsHost::new(config.disk_path.clone())))
    }

    /// Provider with an explicit host sampler (tests use `MockHost`).
    pub fn with_host(config: &ProviderConfig, host: Box<dyn HostSampler>) -> ToolResult<Self> {
        Ok(Self {
            weather: Arc::new(GetWeather::new(config.weather.clone())?),
            diagnostics: Arc::new(SystemDiagnostics::new(host)),
            tool_router: Self::tool_router(),
        })
    }
}

#[tool_router]
impl ParleyProvider {
    #[tool(description = "Fetch real-time weather using Open-Meteo API")]
    async fn get_weather(
        &self,
        Parameters(args): Parameters<WeatherArgs>,
    ) -> Result<CallToolResult, McpError> {
        let start = Instant::now();
        let outcome = self.weather.lookup(&args.city).await;
        reply("get_weather", start, outcome)
    }

    #[tool(description = "Count vowels in a given text")]
    async fn count_vowels(
        &self,
        Parameters(args): Parameters<VowelArgs>,
    ) -> Result<CallToolResult, McpError> {
        let start = Instant::now();
        reply("count_vowels", start, Ok(count_vowels(&args.text)))
    }

    #[tool(
        description = "Provide detailed local system diagnostics. Covers OS, CPU, memory, disk, uptime, and VM heuristics."
    )]
    async fn system_diagnostics(
        &self,
        Parameters(args): Parameters<DiagnosticsArgs>,
    ) -> Result<CallToolResult, McpError> {
        let start = Instant::now();
        let outcome = self.diagnostics.sample(&args.detail).await;
        reply("system_diagnostics", start, outcome)
    }
}

#[tool_handler]
impl ServerHandler for ParleyProvider {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }
}

/// Serialize a tool outcome into its reply envelope.
fn reply<T: Serialize>(
    tool: &str,
    start: Instant,
    outcome: ToolResult<T>,
) -> Result<CallToolResult, McpError> {
    let latency_ms = start.elapsed().as_millis() as u64;
    match outcome {
        Ok(record) => {
            let text = serde_json::to_string_pretty(&record)
                .map_err(|e| McpError::internal_error(e.to_string(), None))?;
            tracing::info!(tool, latency_ms, "tool succeeded");
            Ok(CallToolResult::success(vec![Content::text(text)]))
        }
        Err(e) => {
            tracing::warn!(tool, latency_ms, error = %e, "tool failed");
            Ok(CallToolResult::error(vec![Content::text(e.to_string())]))
        }
    }
}

/// Serve `provider` on a byte stream until the peer hangs up.
pub async fn serve<R, W>(provider: ParleyProvider, reader: R, writer: W) -> anyhow::Result<()>
where
    R: AsyncRead + Send + Unpin + 'static,
    W: AsyncWrite + Send + Unpin + 'static,
{
    let service = provider.serve((reader, writer)).await?;
    let reason = service.waiting().await?;
    tracing::info!(?reason, "input closed, provider exiting");
    Ok(())
}
