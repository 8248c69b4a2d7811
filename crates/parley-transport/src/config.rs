use std::time::Duration;

use serde::Deserialize;

/// How to launch and talk to the tool provider.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Provider executable.
    #[serde(default = "default_command")]
    pub command: String,
    /// Arguments passed to the provider.
    #[serde(default)]
    pub args: Vec<String>,
    /// Upper bound on a single tool call, in seconds.
    #[serde(default = "default_call_timeout")]
    pub call_timeout_secs: u64,
    /// Upper bound on the `initialize` exchange, in seconds.
    #[serde(default = "default_handshake_timeout")]
    pub handshake_timeout_secs: u64,
    /// How long to wait for the provider to exit after stdin closes.
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace_secs: u64,
}

fn default_command() -> String {
    "parley-provider".to_string()
}

fn default_call_timeout() -> u64 {
    30
}

fn default_handshake_timeout() -> u64 {
    10
}

fn default_shutdown_grace() -> u64 {
    2
}

impl SessionConfig {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_secs(self.handshake_timeout_secs)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            args: Vec::new(),
            call_timeout_secs: default_call_timeout(),
            handshake_timeout_secs: default_handshake_timeout(),
            shutdown_grace_secs: default_shutdown_grace(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.command, "parley-provider");
        assert!(config.args.is_empty());
        assert_eq!(config.call_timeout(), Duration::from_secs(30));
        assert_eq!(config.handshake_timeout(), Duration::from_secs(10));
        assert_eq!(config.shutdown_grace(), Duration::from_secs(2));
    }

    #[test]
    fn partial_deserialize_keeps_defaults() {
        let config: SessionConfig =
            serde_json::from_str(r#"{"command": "python", "args": ["server.py"]}"#).unwrap();
        assert_eq!(config.command, "python");
        assert_eq!(config.args, vec!["server.py"]);
        assert_eq!(config.call_timeout_secs, 30);
    }
}
