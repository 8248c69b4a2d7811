//! Transport error types.

use rmcp::service::ServiceError;
use thiserror::Error;

/// Errors that can occur while talking to the tool provider.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to start tool provider: {0}")]
    Spawn(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("tool provider closed the connection")]
    Closed,

    #[error("handshake failed: {0}")]
    Handshake(String),

    #[error("no reply within {secs}s")]
    Timeout { secs: u64 },

    #[error("provider error: {message} (code {code})")]
    Rpc { code: i32, message: String },

    #[error("malformed reply: {0}")]
    Protocol(String),
}

impl TransportError {
    /// Whether the session is unusable after this error.
    ///
    /// There is no reconnection or replay protocol, so a broken channel
    /// ends the session. Timeouts and error replies only affect one call.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Spawn(_) | Self::Io(_) | Self::Closed | Self::Handshake(_)
        )
    }
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::BrokenPipe | std::io::ErrorKind::UnexpectedEof => Self::Closed,
            _ => Self::Io(err.to_string()),
        }
    }
}

impl From<ServiceError> for TransportError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::McpError(e) => Self::Rpc {
                code: e.code.0,
                message: e.message.into_owned(),
            },
            ServiceError::TransportClosed => Self::Closed,
            ServiceError::TransportSend(e) => Self::Io(e.to_string()),
            ServiceError::Timeout { timeout } => Self::Timeout {
                secs: timeout.as_secs(),
            },
            other => Self::Protocol(other.to_string()),
        }
    }
}

/// Convenience alias for transport results.
pub type TransportResult<T> = Result<T, TransportError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::ErrorData;

    #[test]
    fn channel_failures_are_fatal() {
        assert!(TransportError::Closed.is_fatal());
        assert!(TransportError::Io("reset".into()).is_fatal());
        assert!(TransportError::Spawn("not found".into()).is_fatal());
        assert!(TransportError::Handshake("timed out".into()).is_fatal());
    }

    #[test]
    fn per_call_failures_are_not_fatal() {
        assert!(!TransportError::Timeout { secs: 30 }.is_fatal());
        let rpc = TransportError::Rpc {
            code: -32602,
            message: "unknown tool".into(),
        };
        assert!(!rpc.is_fatal());
        assert!(!TransportError::Protocol("bad envelope".into()).is_fatal());
    }

    #[test]
    fn broken_pipe_maps_to_closed() {
        let err: TransportError = std::io::Error::from(std::io::ErrorKind::BrokenPipe).into();
        assert!(matches!(err, TransportError::Closed));
    }

    #[test]
    fn error_reply_maps_to_rpc() {
        let err: TransportError =
            ServiceError::McpError(ErrorData::invalid_params("tool not found", None)).into();
        assert!(matches!(err, TransportError::Rpc { code: -32602, ref message } if message == "tool not found"));
        assert_eq!(err.to_string(), "provider error: tool not found (code -32602)");
        assert!(!err.is_fatal());
    }

    #[test]
    fn closed_service_maps_to_closed() {
        let err: TransportError = ServiceError::TransportClosed.into();
        assert!(matches!(err, TransportError::Closed));
        assert!(err.is_fatal());
    }
}
