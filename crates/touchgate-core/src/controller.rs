//! Auth session controller
//!
//! Owns the session's authentication state. Each `authenticate()` call is one
//! independent attempt:
//!
//! 1. Capability gate: without hardware or enrollment the sensor prompt is
//!    never presented and the state is left untouched
//! 2. Challenge: the provider's prompt runs until the user or the device
//!    resolves it
//! 3. Mapping: success authenticates the session, anything else leaves it
//!    unauthenticated
//!
//! Only one attempt is in flight at a time. Overlapping callers wait for the
//! attempt ahead of them, so completions are applied in order.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{broadcast, Mutex, RwLock};
use tracing::{debug, error, info};

use crate::prober::CapabilityProber;
use crate::provider::BiometricProvider;
use crate::session::SessionHandle;
use crate::types::{
    AuthEvent, AuthOutcome, AuthState, CapabilityState, ChallengeRequest, REASON_DEVICE_ERROR,
    REASON_UNKNOWN, REASON_UNSUPPORTED,
};

/// Capacity of the state event channel
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Drives authentication attempts against a biometric provider
pub struct AuthController {
    provider: Arc<dyn BiometricProvider>,

    /// Prompt text and fallback policy for every challenge
    request: ChallengeRequest,

    /// Result of the startup probe
    capabilities: CapabilityState,

    /// Current session state, shared with handles
    state: Arc<RwLock<AuthState>>,

    /// Held for the whole of an attempt
    attempt: Mutex<()>,

    event_tx: broadcast::Sender<AuthEvent>,
}

impl AuthController {
    /// Probe the device, then build a controller around the result
    ///
    /// The probe completes before the controller exists, so no attempt can
    /// read capabilities that have not been populated yet.
    pub async fn start(provider: Arc<dyn BiometricProvider>, request: ChallengeRequest) -> Self {
        let capabilities = CapabilityProber::new(Arc::clone(&provider)).probe().await;
        Self::with_capabilities(provider, request, capabilities)
    }

    /// Build a controller from an already completed probe
    pub fn with_capabilities(
        provider: Arc<dyn BiometricProvider>,
        request: ChallengeRequest,
        capabilities: CapabilityState,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            provider,
            request,
            capabilities,
            state: Arc::new(RwLock::new(AuthState::Unauthenticated)),
            attempt: Mutex::new(()),
            event_tx,
        }
    }

    /// Run one authentication attempt
    ///
    /// Never fails: every path ends in an [`AuthOutcome`].
    pub async fn authenticate(&self) -> AuthOutcome {
        if !self.capabilities.is_usable() {
            info!(
                "Authentication refused without prompting ({})",
                self.capabilities
            );
            return AuthOutcome::failure(REASON_UNSUPPORTED);
        }

        let _attempt = self.attempt.lock().await;

        debug!(
            "Presenting biometric challenge via {} (device fallback: {})",
            self.provider.provider_name(),
            self.request.allow_device_fallback
        );

        let outcome = match self.provider.challenge(&self.request).await {
            Ok(response) if response.success => AuthOutcome::Success,
            Ok(response) => AuthOutcome::failure(
                response
                    .error_reason
                    .unwrap_or_else(|| REASON_UNKNOWN.to_string()),
            ),
            Err(e) => {
                error!("Biometric authentication error: {}", e);
                AuthOutcome::failure(REASON_DEVICE_ERROR)
            }
        };

        let next = if outcome.is_success() {
            AuthState::Authenticated
        } else {
            AuthState::Unauthenticated
        };
        self.set_state(next).await;

        match &outcome {
            AuthOutcome::Success => info!("Biometric authentication succeeded"),
            AuthOutcome::Failure { reason } => info!("Biometric authentication failed: {}", reason),
        }

        outcome
    }

    async fn set_state(&self, next: AuthState) {
        let previous = {
            let mut state = self.state.write().await;
            std::mem::replace(&mut *state, next)
        };

        // No subscribers is fine
        let _ = self.event_tx.send(AuthEvent::StateChanged {
            from: previous,
            to: next,
            at: Utc::now(),
        });
    }

    /// Capabilities found by the startup probe
    pub fn capabilities(&self) -> CapabilityState {
        self.capabilities
    }

    /// Current session state
    pub async fn state(&self) -> AuthState {
        *self.state.read().await
    }

    /// Subscribe to state events
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.event_tx.subscribe()
    }

    /// Read-only view for the presentation layer
    pub fn handle(&self) -> SessionHandle {
        SessionHandle::new(
            self.capabilities,
            Arc::clone(&self.state),
            self.event_tx.clone(),
        )
    }
}
