//! Stdio transport session — one provider process, one request at a time.
//!
//! The provider is spawned once and driven as an MCP client (`rmcp`) over
//! its stdin/stdout. `rmcp` handles framing, the `initialize` handshake and
//! reply correlation; this module adds the turn lock (no pipelining), the
//! per-call timeout, and the process lifecycle around it.

use std::future::Future;
use std::process::Stdio;
use std::time::Instant;

use async_trait::async_trait;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, ClientCapabilities, ClientInfo, Implementation,
    ProtocolVersion, Tool,
};
use rmcp::service::{RoleClient, RunningService, ServiceError};
use rmcp::ServiceExt;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, BufReader};
use tokio::process::{Child, ChildStderr, Command};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::error::{TransportError, TransportResult};

// ── ToolTransport trait ───────────────────────────────────────

/// Invoke a named capability and wait for its reply envelope.
///
/// Enables mocking the provider in tests.
#[async_trait]
pub trait ToolTransport: Send + Sync {
    /// Call `name` with a complete argument record (a JSON object).
    async fn call_tool(&self, name: &str, arguments: Value) -> TransportResult<CallToolResult>;
}

// ── StdioSession ──────────────────────────────────────────────

/// A handshaken session with one tool provider.
///
/// Owns the provider process (when spawned) for the session's lifetime.
/// Call `shutdown()` to release it; dropping the session kills the child.
pub struct StdioSession {
    service: RunningService<RoleClient, ClientInfo>,
    /// Held from request to reply.
    turn: Mutex<()>,
    child: Option<Child>,
    config: SessionConfig,
    server_info: Implementation,
    session_id: Uuid,
}

fn client_info() -> ClientInfo {
    ClientInfo {
        protocol_version: ProtocolVersion::V_2024_11_05,
        capabilities: ClientCapabilities::default(),
        client_info: Implementation {
            name: "parley".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            ..Implementation::from_build_env()
        },
    }
}

impl StdioSession {
    /// Spawn the provider and complete the handshake.
    pub async fn spawn(config: &SessionConfig) -> TransportResult<Self> {
        tracing::info!(
            command = %config.command,
            args = ?config.args,
            "starting tool provider"
        );

        let mut child = Command::new(&config.command)
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| TransportError::Spawn(format!("{}: {e}", config.command)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| TransportError::Spawn("provider stdin not captured".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| TransportError::Spawn("provider stdout not captured".into()))?;
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(forward_stderr(stderr));
        }

        Self::handshake(stdout, stdin, config, Some(child)).await
    }

    /// Run the handshake over existing streams (no child process).
    pub async fn connect<R, W>(reader: R, writer: W, config: &SessionConfig) -> TransportResult<Self>
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        Self::handshake(reader, writer, config, None).await
    }

    async fn handshake<R, W>(
        reader: R,
        writer: W,
        config: &SessionConfig,
        child: Option<Child>,
    ) -> TransportResult<Self>
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let service =
            match tokio::time::timeout(config.handshake_timeout(), client_info().serve((reader, writer)))
                .await
            {
                Ok(Ok(service)) => service,
                Ok(Err(e)) => return Err(TransportError::Handshake(e.to_string())),
                Err(_) => {
                    return Err(TransportError::Handshake(format!(
                        "no initialize reply within {}s",
                        config.handshake_timeout_secs
                    )));
                }
            };

        let Some(init) = service.peer_info() else {
            return Err(TransportError::Handshake(
                "provider did not identify itself".into(),
            ));
        };
        let server_info = init.server_info.clone();
        if init.capabilities.tools.is_none() {
            tracing::warn!(provider = %server_info.name, "provider does not advertise tools");
        }

        let session_id = Uuid::now_v7();
        tracing::info!(
            %session_id,
            provider = %server_info.name,
            provider_version = %server_info.version,
            protocol = ?init.protocol_version,
            "tool provider session established"
        );

        Ok(Self {
            service,
            turn: Mutex::new(()),
            child,
            config: config.clone(),
            server_info,
            session_id,
        })
    }

    pub fn server_info(&self) -> &Implementation {
        &self.server_info
    }

    /// Ask the provider which tools it exposes.
    pub async fn list_tools(&self) -> TransportResult<Vec<Tool>> {
        self.exchange(self.service.list_all_tools()).await
    }

    /// One request/response round-trip under the turn lock.
    async fn exchange<T, F>(&self, request: F) -> TransportResult<T>
    where
        F: Future<Output = Result<T, ServiceError>>,
    {
        let _turn = self.turn.lock().await;
        match tokio::time::timeout(self.config.call_timeout(), request).await {
            Ok(result) => result.map_err(TransportError::from),
            Err(_) => Err(TransportError::Timeout {
                secs: self.config.call_timeout_secs,
            }),
        }
    }

    /// Stop the client, close the provider's stdin and wait for it to exit,
    /// killing it after the grace period.
    pub async fn shutdown(self) -> TransportResult<()> {
        let Self {
            service,
            child,
            config,
            session_id,
            ..
        } = self;

        match service.cancel().await {
            Ok(reason) => tracing::debug!(%session_id, ?reason, "client service stopped"),
            Err(e) => tracing::warn!(%session_id, error = %e, "client service task failed"),
        }

        let Some(mut child) = child else {
            tracing::info!(%session_id, "tool provider session closed");
            return Ok(());
        };

        match tokio::time::timeout(config.shutdown_grace(), child.wait()).await {
            Ok(Ok(status)) => {
                tracing::info!(%session_id, %status, "tool provider exited");
                Ok(())
            }
            Ok(Err(e)) => Err(e.into()),
            Err(_) => {
                tracing::warn!(
                    %session_id,
                    grace_secs = config.shutdown_grace_secs,
                    "tool provider did not exit, killing it"
                );
                child.kill().await?;
                Ok(())
            }
        }
    }
}

#[async_trait]
impl ToolTransport for StdioSession {
    async fn call_tool(&self, name: &str, arguments: Value) -> TransportResult<CallToolResult> {
        let Value::Object(arguments) = arguments else {
            return Err(TransportError::Protocol(format!(
                "arguments for {name} must be a JSON object"
            )));
        };
        let params = CallToolRequestParam {
            name: name.to_string().into(),
            arguments: Some(arguments),
        };

        let start = Instant::now();
        let result = self.exchange(self.service.call_tool(params)).await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(_) => tracing::info!(tool = %name, latency_ms, "tool call completed"),
            Err(e) => tracing::warn!(tool = %name, latency_ms, error = %e, "tool call failed"),
        }
        result
    }
}

/// Relay provider diagnostics into our own log.
async fn forward_stderr(stderr: ChildStderr) {
    let mut lines = BufReader::new(stderr).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        tracing::debug!(target: "parley::provider", "{line}");
    }
}
