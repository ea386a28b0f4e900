use async_trait::async_trait;

use super::BiometricProvider;
use crate::error::ProviderError;
use crate::types::{ChallengeRequest, ChallengeResponse};

/// Provider for platforms without any biometric backend
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedProvider;

#[async_trait]
impl BiometricProvider for UnsupportedProvider {
    async fn has_hardware(&self) -> Result<bool, ProviderError> {
        Ok(false)
    }

    async fn is_enrolled(&self) -> Result<bool, ProviderError> {
        Ok(false)
    }

    async fn challenge(
        &self,
        _request: &ChallengeRequest,
    ) -> Result<ChallengeResponse, ProviderError> {
        Err(ProviderError::Unsupported)
    }

    fn provider_name(&self) -> &'static str {
        "unsupported"
    }
}
