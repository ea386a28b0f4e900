//! Scripted provider for tests and demos
//!
//! Answers come from a script fixed at construction. Every call is counted so
//! tests can assert that the gate never reached the sensor.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use super::BiometricProvider;
use crate::error::ProviderError;
use crate::types::{ChallengeRequest, ChallengeResponse};

/// A scripted answer to one challenge
#[derive(Clone, Debug)]
pub enum ScriptedChallenge {
    /// The prompt resolves with this response
    Respond(ChallengeResponse),
    /// The provider faults with a device-level error
    DeviceError(String),
}

/// Provider that replays a fixed script
#[derive(Debug)]
pub struct MockProvider {
    hardware: Result<bool, String>,
    enrolled: Result<bool, String>,
    /// Consumed front to back, then `fallback` answers every later call
    queued: Mutex<VecDeque<ScriptedChallenge>>,
    fallback: ScriptedChallenge,
    challenge_delay: Option<Duration>,

    hardware_calls: AtomicUsize,
    enrollment_calls: AtomicUsize,
    challenge_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    last_request: Mutex<Option<ChallengeRequest>>,
}

impl MockProvider {
    /// Device with the given capabilities whose challenges succeed
    pub fn new(hardware: bool, enrolled: bool) -> Self {
        Self {
            hardware: Ok(hardware),
            enrolled: Ok(enrolled),
            queued: Mutex::new(VecDeque::new()),
            fallback: ScriptedChallenge::Respond(ChallengeResponse::success()),
            challenge_delay: None,
            hardware_calls: AtomicUsize::new(0),
            enrollment_calls: AtomicUsize::new(0),
            challenge_calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Device with hardware and an enrolled credential
    pub fn ready() -> Self {
        Self::new(true, true)
    }

    /// Hardware query fails with a device error
    pub fn with_hardware_error(mut self, message: impl Into<String>) -> Self {
        self.hardware = Err(message.into());
        self
    }

    /// Enrollment query fails with a device error
    pub fn with_enrollment_error(mut self, message: impl Into<String>) -> Self {
        self.enrolled = Err(message.into());
        self
    }

    /// Every challenge resolves with `response`
    pub fn responding(mut self, response: ChallengeResponse) -> Self {
        self.fallback = ScriptedChallenge::Respond(response);
        self
    }

    /// Every challenge faults with a device-level error
    pub fn faulting(mut self, message: impl Into<String>) -> Self {
        self.fallback = ScriptedChallenge::DeviceError(message.into());
        self
    }

    /// Answer the next unanswered challenge with `answer`
    pub fn then(self, answer: ScriptedChallenge) -> Self {
        lock(&self.queued).push_back(answer);
        self
    }

    /// Hold each challenge open for `delay` before answering
    pub fn with_challenge_delay(mut self, delay: Duration) -> Self {
        self.challenge_delay = Some(delay);
        self
    }

    pub fn hardware_calls(&self) -> usize {
        self.hardware_calls.load(Ordering::SeqCst)
    }

    pub fn enrollment_calls(&self) -> usize {
        self.enrollment_calls.load(Ordering::SeqCst)
    }

    pub fn challenge_calls(&self) -> usize {
        self.challenge_calls.load(Ordering::SeqCst)
    }

    /// Highest number of challenges that were open at the same time
    pub fn max_concurrent_challenges(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Request passed to the most recent challenge
    pub fn last_request(&self) -> Option<ChallengeRequest> {
        lock(&self.last_request).clone()
    }
}

#[async_trait]
impl BiometricProvider for MockProvider {
    async fn has_hardware(&self) -> Result<bool, ProviderError> {
        self.hardware_calls.fetch_add(1, Ordering::SeqCst);
        self.hardware.clone().map_err(ProviderError::Query)
    }

    async fn is_enrolled(&self) -> Result<bool, ProviderError> {
        self.enrollment_calls.fetch_add(1, Ordering::SeqCst);
        self.enrolled.clone().map_err(ProviderError::Query)
    }

    async fn challenge(
        &self,
        request: &ChallengeRequest,
    ) -> Result<ChallengeResponse, ProviderError> {
        self.challenge_calls.fetch_add(1, Ordering::SeqCst);
        *lock(&self.last_request) = Some(request.clone());

        let open = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(open, Ordering::SeqCst);

        if let Some(delay) = self.challenge_delay {
            tokio::time::sleep(delay).await;
        }

        let answer = lock(&self.queued)
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match answer {
            ScriptedChallenge::Respond(response) => Ok(response),
            ScriptedChallenge::DeviceError(message) => Err(ProviderError::Challenge(message)),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
