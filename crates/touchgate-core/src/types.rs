//! Core data model: capabilities, session state and attempt outcomes

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Reason reported when the gate refuses to present the sensor prompt
pub const REASON_UNSUPPORTED: &str = "unsupported-or-not-enrolled";

/// Reason reported when the provider failed at the device level
pub const REASON_DEVICE_ERROR: &str = "device-error";

/// Reason used when the provider reports failure without a diagnostic
pub const REASON_UNKNOWN: &str = "unknown";

/// What the device can do, as reported by the capability probe
///
/// Enrollment without hardware cannot be represented: the constructor
/// clears `enrolled` whenever `hardware_supported` is false.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct CapabilityState {
    hardware_supported: bool,
    enrolled: bool,
}

impl CapabilityState {
    pub fn new(hardware_supported: bool, enrolled: bool) -> Self {
        Self {
            hardware_supported,
            enrolled: hardware_supported && enrolled,
        }
    }

    /// No hardware, nothing enrolled
    pub fn unsupported() -> Self {
        Self::default()
    }

    pub fn hardware_supported(&self) -> bool {
        self.hardware_supported
    }

    pub fn enrolled(&self) -> bool {
        self.enrolled
    }

    /// Whether a challenge can be presented at all
    pub fn is_usable(&self) -> bool {
        self.hardware_supported && self.enrolled
    }
}

impl fmt::Display for CapabilityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hardware: {}, enrolled: {}",
            if self.hardware_supported { "yes" } else { "no" },
            if self.enrolled { "yes" } else { "no" },
        )
    }
}

/// Authentication state of the session
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthState {
    #[default]
    Unauthenticated,
    Authenticated,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated)
    }
}

/// Result of a single authentication attempt
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AuthOutcome {
    Success,
    Failure {
        /// Opaque diagnostic, passed through from the provider verbatim
        reason: String,
    },
}

impl AuthOutcome {
    pub fn failure(reason: impl Into<String>) -> Self {
        AuthOutcome::Failure {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AuthOutcome::Success)
    }

    /// The failure reason, if this attempt failed
    pub fn reason(&self) -> Option<&str> {
        match self {
            AuthOutcome::Success => None,
            AuthOutcome::Failure { reason } => Some(reason),
        }
    }
}

/// Parameters handed to the provider's challenge
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChallengeRequest {
    /// Text shown in the system prompt
    pub prompt: String,
    /// Whether the device may fall back to its passcode
    pub allow_device_fallback: bool,
}

/// Provider's answer to a challenge that ran to completion
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChallengeResponse {
    pub success: bool,
    /// Diagnostic for a failed challenge (mismatch, user cancel, lockout)
    pub error_reason: Option<String>,
}

impl ChallengeResponse {
    pub fn success() -> Self {
        Self {
            success: true,
            error_reason: None,
        }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            error_reason: Some(reason.into()),
        }
    }
}

/// Event emitted to session observers
#[derive(Clone, Debug)]
pub enum AuthEvent {
    /// A completed attempt wrote the session state
    StateChanged {
        from: AuthState,
        to: AuthState,
        at: DateTime<Utc>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enrollment_requires_hardware() {
        let caps = CapabilityState::new(false, true);
        assert!(!caps.hardware_supported());
        assert!(!caps.enrolled());
        assert!(!caps.is_usable());
    }

    #[test]
    fn test_usable_capabilities() {
        let caps = CapabilityState::new(true, true);
        assert!(caps.is_usable());
        assert!(!CapabilityState::new(true, false).is_usable());
        assert_eq!(CapabilityState::unsupported(), CapabilityState::new(false, false));
    }

    #[test]
    fn test_default_state_is_unauthenticated() {
        assert_eq!(AuthState::default(), AuthState::Unauthenticated);
        assert!(!AuthState::default().is_authenticated());
    }

    #[test]
    fn test_outcome_reason() {
        assert_eq!(AuthOutcome::Success.reason(), None);
        assert_eq!(AuthOutcome::failure("user_cancel").reason(), Some("user_cancel"));
    }

    #[test]
    fn test_outcome_serializes_with_tag() {
        let json = serde_json::to_string(&AuthOutcome::failure("lockout")).unwrap();
        assert_eq!(json, r#"{"outcome":"failure","reason":"lockout"}"#);
    }
}
