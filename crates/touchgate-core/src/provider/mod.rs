//! Biometric provider abstraction
//!
//! The gate talks to the device sensor only through [`BiometricProvider`]:
//! - [`CommandProvider`] runs external helper programs (fprintd and friends)
//! - [`UnsupportedProvider`] stands in on platforms with no backend
//! - `MockProvider` (feature `mock`) replays scripted answers in tests
//!
//! Every method may suspend while the device answers. Errors returned here
//! are device-level faults; a user declining the prompt is a normal
//! [`ChallengeResponse`] with `success: false`.

pub mod command;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod unsupported;

pub use command::{CommandProvider, CommandProviderConfig};
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockProvider, ScriptedChallenge};
pub use unsupported::UnsupportedProvider;

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::types::{ChallengeRequest, ChallengeResponse};

/// Device-provided biometric capability
#[async_trait]
pub trait BiometricProvider: Send + Sync {
    /// Whether the device has a biometric sensor
    async fn has_hardware(&self) -> Result<bool, ProviderError>;

    /// Whether at least one biometric credential is enrolled
    ///
    /// Only meaningful when [`Self::has_hardware`] returned `true`.
    async fn is_enrolled(&self) -> Result<bool, ProviderError>;

    /// Present the sensor prompt and wait for it to resolve
    async fn challenge(&self, request: &ChallengeRequest)
        -> Result<ChallengeResponse, ProviderError>;

    /// Short backend name for logs
    fn provider_name(&self) -> &'static str;
}
