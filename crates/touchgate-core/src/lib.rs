//! touchgate core - device-local biometric authentication gate
//!
//! This crate provides:
//! - A provider abstraction over the device's biometric sensor
//! - A one-shot capability probe (hardware present, credential enrolled)
//! - The auth session controller that gates and runs challenges
//! - Advisory mapping from outcomes to user-facing status
//!
//! # Optional Features
//!
//! - `mock` - Scripted `MockProvider` for tests and demos

pub mod advisory;
pub mod config;
pub mod controller;
pub mod error;
pub mod prober;
pub mod provider;
pub mod session;
pub mod types;

pub use advisory::Advisory;
pub use config::GateConfig;
pub use controller::AuthController;
pub use error::{GateError, ProviderError, Result};
pub use prober::CapabilityProber;
pub use provider::{BiometricProvider, CommandProvider, CommandProviderConfig, UnsupportedProvider};
pub use session::SessionHandle;
pub use types::{
    AuthEvent, AuthOutcome, AuthState, CapabilityState, ChallengeRequest, ChallengeResponse,
    REASON_DEVICE_ERROR, REASON_UNKNOWN, REASON_UNSUPPORTED,
};

#[cfg(feature = "mock")]
pub use provider::{MockProvider, ScriptedChallenge};
