//! User-facing status for an authentication outcome
//!
//! Distinguishes the cases a presentation layer has to render differently:
//! the gate refused, the challenge failed, the device faulted, or success.

use std::fmt;

use crate::types::{AuthOutcome, REASON_DEVICE_ERROR, REASON_UNSUPPORTED};

/// Advisory to show after an attempt
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Advisory {
    Authenticated,
    /// No sensor or nothing enrolled; the prompt was never shown
    Unsupported,
    /// The provider faulted during the challenge
    DeviceError,
    /// The user or device rejected the challenge
    Failed { reason: String },
}

impl Advisory {
    pub fn from_outcome(outcome: &AuthOutcome) -> Self {
        match outcome {
            AuthOutcome::Success => Advisory::Authenticated,
            AuthOutcome::Failure { reason } => match reason.as_str() {
                REASON_UNSUPPORTED => Advisory::Unsupported,
                REASON_DEVICE_ERROR => Advisory::DeviceError,
                _ => Advisory::Failed {
                    reason: reason.clone(),
                },
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Advisory::Authenticated)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Advisory::Authenticated => "Success",
            Advisory::Unsupported => "Authentication",
            Advisory::DeviceError => "Error",
            Advisory::Failed { .. } => "Failed",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Advisory::Authenticated => "Authentication succeeded".to_string(),
            Advisory::Unsupported => {
                "This device has no biometric sensor or no fingerprint/face is enrolled"
                    .to_string()
            }
            Advisory::DeviceError => "An error occurred during authentication".to_string(),
            Advisory::Failed { reason } => format!("Authentication failed: {}", reason),
        }
    }
}

impl From<&AuthOutcome> for Advisory {
    fn from(outcome: &AuthOutcome) -> Self {
        Advisory::from_outcome(outcome)
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title(), self.message())
    }
}
