//! One-shot capability probe
//!
//! Queries the provider for hardware, then for enrollment. Provider errors
//! are downgraded to "unsupported" here and never reach the caller.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::provider::BiometricProvider;
use crate::types::CapabilityState;

/// Probes what the device sensor can do
pub struct CapabilityProber {
    provider: Arc<dyn BiometricProvider>,
}

impl CapabilityProber {
    pub fn new(provider: Arc<dyn BiometricProvider>) -> Self {
        Self { provider }
    }

    /// Query hardware and enrollment once
    ///
    /// Enrollment is only queried when hardware is present. Calling this again
    /// re-queries the device; nothing polls on its own.
    pub async fn probe(&self) -> CapabilityState {
        let name = self.provider.provider_name();
        debug!("Probing biometric capabilities via {}", name);

        let hardware = match self.provider.has_hardware().await {
            Ok(present) => present,
            Err(e) => {
                warn!("Hardware query failed, treating as unsupported: {}", e);
                false
            }
        };

        let enrolled = if hardware {
            match self.provider.is_enrolled().await {
                Ok(enrolled) => enrolled,
                Err(e) => {
                    warn!("Enrollment query failed, treating as not enrolled: {}", e);
                    false
                }
            }
        } else {
            false
        };

        let state = CapabilityState::new(hardware, enrolled);
        info!("Biometric capabilities ({}): {}", name, state);
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockProvider;

    async fn probe(provider: &Arc<MockProvider>) -> CapabilityState {
        CapabilityProber::new(provider.clone()).probe().await
    }

    #[tokio::test]
    async fn test_no_hardware_skips_enrollment_query() {
        let provider = Arc::new(MockProvider::new(false, true));
        let state = probe(&provider).await;

        assert_eq!(state, CapabilityState::unsupported());
        assert_eq!(provider.hardware_calls(), 1);
        assert_eq!(provider.enrollment_calls(), 0);
    }

    #[tokio::test]
    async fn test_hardware_and_enrollment() {
        let provider = Arc::new(MockProvider::ready());
        let state = probe(&provider).await;

        assert!(state.hardware_supported());
        assert!(state.enrolled());
        assert_eq!(provider.enrollment_calls(), 1);
    }

    #[tokio::test]
    async fn test_hardware_without_enrollment() {
        let provider = Arc::new(MockProvider::new(true, false));
        let state = probe(&provider).await;

        assert!(state.hardware_supported());
        assert!(!state.enrolled());
    }

    #[tokio::test]
    async fn test_hardware_error_degrades_to_unsupported() {
        let provider = Arc::new(MockProvider::ready().with_hardware_error("sensor offline"));
        let state = probe(&provider).await;

        assert_eq!(state, CapabilityState::unsupported());
        assert_eq!(provider.enrollment_calls(), 0);
    }

    #[tokio::test]
    async fn test_enrollment_error_degrades_to_not_enrolled() {
        let provider = Arc::new(MockProvider::ready().with_enrollment_error("store locked"));
        let state = probe(&provider).await;

        assert!(state.hardware_supported());
        assert!(!state.enrolled());
    }

    #[tokio::test]
    async fn test_reprobe_is_stable() {
        let provider = Arc::new(MockProvider::new(true, false));
        let prober = CapabilityProber::new(provider.clone());

        let first = prober.probe().await;
        let second = prober.probe().await;

        assert_eq!(first, second);
        assert_eq!(provider.hardware_calls(), 2);
    }
}
