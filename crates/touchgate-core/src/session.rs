//! Read-only session view for the presentation layer
//!
//! The handle can be cloned freely. It observes the controller's state but has
//! no way to change it.

use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

use crate::types::{AuthEvent, AuthState, CapabilityState};

/// Observer handle on an [`AuthController`](crate::AuthController) session
#[derive(Clone, Debug)]
pub struct SessionHandle {
    capabilities: CapabilityState,
    state: Arc<RwLock<AuthState>>,
    event_tx: broadcast::Sender<AuthEvent>,
}

impl SessionHandle {
    pub(crate) fn new(
        capabilities: CapabilityState,
        state: Arc<RwLock<AuthState>>,
        event_tx: broadcast::Sender<AuthEvent>,
    ) -> Self {
        Self {
            capabilities,
            state,
            event_tx,
        }
    }

    pub fn capabilities(&self) -> CapabilityState {
        self.capabilities
    }

    pub async fn state(&self) -> AuthState {
        *self.state.read().await
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state().await.is_authenticated()
    }

    /// Whether an "authenticate" affordance should be enabled
    ///
    /// Mirrors the controller's own gate; the controller still enforces it.
    pub fn can_authenticate(&self) -> bool {
        self.capabilities.is_usable()
    }

    /// Subscribe to state events
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.event_tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockProvider;
    use crate::types::ChallengeRequest;
    use crate::AuthController;

    fn request() -> ChallengeRequest {
        ChallengeRequest {
            prompt: "Authenticate".to_string(),
            allow_device_fallback: false,
        }
    }

    #[tokio::test]
    async fn test_handle_tracks_controller() {
        let controller = AuthController::start(Arc::new(MockProvider::ready()), request()).await;
        let handle = controller.handle();

        assert!(handle.can_authenticate());
        assert!(!handle.is_authenticated().await);

        controller.authenticate().await;
        assert!(handle.is_authenticated().await);
        assert!(handle.clone().is_authenticated().await);
    }

    #[tokio::test]
    async fn test_handle_disables_affordance() {
        let controller =
            AuthController::start(Arc::new(MockProvider::new(true, false)), request()).await;
        let handle = controller.handle();

        assert!(!handle.can_authenticate());
        assert_eq!(handle.capabilities(), CapabilityState::new(true, false));
    }

    #[tokio::test]
    async fn test_handle_subscription() {
        let controller = AuthController::start(Arc::new(MockProvider::ready()), request()).await;
        let mut events = controller.handle().subscribe();

        controller.authenticate().await;

        let AuthEvent::StateChanged { to, .. } = events.recv().await.unwrap();
        assert_eq!(to, AuthState::Authenticated);
    }
}
