//! Agent configuration, loadable from TOML with an environment override
//! for the provider command line.

use serde::Deserialize;
use thiserror::Error;

use parley_transport::SessionConfig;

/// Environment variable holding a full provider command line.
pub const PROVIDER_COMMAND_ENV: &str = "PARLEY_PROVIDER_COMMAND";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },

    #[error("invalid PARLEY_PROVIDER_COMMAND: {0}")]
    ProviderCommand(String),
}

/// Top-level configuration for the agent binary.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Printed before each line of input.
    #[serde(default = "default_prompt")]
    pub prompt: String,
    /// Printed before each reply.
    #[serde(default = "default_reply_prefix")]
    pub reply_prefix: String,
    /// How to launch and talk to the tool provider.
    #[serde(default)]
    pub provider: SessionConfig,
}

fn default_prompt() -> String {
    "User: ".into()
}

fn default_reply_prefix() -> String {
    "Agent: ".into()
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            reply_prefix: default_reply_prefix(),
            provider: SessionConfig::default(),
        }
    }
}

impl AgentConfig {
    /// Load config from a TOML file path.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    /// Load from `path` if given, defaults otherwise, then apply the
    /// environment override.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.with_provider_command(std::env::var(PROVIDER_COMMAND_ENV).ok().as_deref())
    }

    /// Replace the provider command and args with a shell-style command
    /// line, if one is given.
    pub fn with_provider_command(mut self, command_line: Option<&str>) -> Result<Self, ConfigError> {
        let Some(command_line) = command_line else {
            return Ok(self);
        };

        let mut words = shell_words::split(command_line)
            .map_err(|e| ConfigError::ProviderCommand(e.to_string()))?
            .into_iter();
        let command = words
            .next()
            .ok_or_else(|| ConfigError::ProviderCommand("empty command line".into()))?;

        self.provider.command = command;
        self.provider.args = words.collect();
        Ok(self)
    }
}
