//! Error types for the touchgate core

use thiserror::Error;

/// Result type alias for gate operations
pub type Result<T> = std::result::Result<T, GateError>;

/// Errors raised by a biometric provider
///
/// These never cross the prober or controller boundary. The prober downgrades
/// them to `false` capabilities and the controller turns them into a
/// `device-error` failure outcome.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Hardware or enrollment query failed
    #[error("Capability query failed: {0}")]
    Query(String),

    /// The challenge itself failed at the device level
    #[error("Challenge failed at device level: {0}")]
    Challenge(String),

    /// Helper process could not be started
    #[error("Failed to run provider helper: {0}")]
    Spawn(#[from] std::io::Error),

    /// No biometric backend on this platform
    #[error("Biometric authentication is not supported on this platform")]
    Unsupported,
}

/// Errors that can occur outside the authentication path
#[derive(Debug, Error)]
pub enum GateError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for GateError {
    fn from(e: serde_json::Error) -> Self {
        GateError::Serialization(e.to_string())
    }
}
