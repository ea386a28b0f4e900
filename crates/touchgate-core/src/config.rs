//! Gate configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{GateError, Result};
use crate::provider::CommandProviderConfig;
use crate::types::ChallengeRequest;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "TOUCHGATE_CONFIG";

/// Default text shown in the sensor prompt
pub const DEFAULT_PROMPT: &str = "Authenticate to sign in";

/// Gate configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Text shown in the sensor prompt
    pub prompt_message: String,

    /// Whether the device may fall back to its passcode during a challenge
    pub allow_device_fallback: bool,

    /// Helper commands for the command-backed provider
    pub provider: CommandProviderConfig,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            prompt_message: DEFAULT_PROMPT.to_string(),
            allow_device_fallback: false,
            provider: CommandProviderConfig::default(),
        }
    }
}

impl GateConfig {
    /// Config path from `TOUCHGATE_CONFIG`, else the platform config dir
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                dirs::config_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("touchgate")
                    .join("config.json")
            })
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from file, or fall back to defaults when the file is absent
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.prompt_message.trim().is_empty() {
            return Err(GateError::Config("prompt_message must not be empty".to_string()));
        }

        let commands = [
            ("hardware_command", &self.provider.hardware_command),
            ("enrollment_command", &self.provider.enrollment_command),
            ("challenge_command", &self.provider.challenge_command),
        ];
        for (name, argv) in commands {
            if argv.is_empty() {
                return Err(GateError::Config(format!("provider.{} must not be empty", name)));
            }
        }

        Ok(())
    }

    /// Challenge parameters derived from this config
    pub fn challenge_request(&self) -> ChallengeRequest {
        ChallengeRequest {
            prompt: self.prompt_message.clone(),
            allow_device_fallback: self.allow_device_fallback,
        }
    }
}
