//! Provider backed by external helper programs
//!
//! Each operation is a separate command line. Capability queries succeed
//! when the helper exits with status zero. The challenge helper reports a
//! match with exit status zero; any other status is a failed challenge whose
//! reason is the helper's last line of output.

use std::process::{Output, Stdio};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::{debug, error};

use super::BiometricProvider;
use crate::error::ProviderError;
use crate::types::{ChallengeRequest, ChallengeResponse};

/// Environment variable carrying the prompt text to the challenge helper
pub const PROMPT_ENV: &str = "TOUCHGATE_PROMPT";

/// Environment variable carrying the passcode fallback policy ("1" or "0")
pub const FALLBACK_ENV: &str = "TOUCHGATE_ALLOW_FALLBACK";

/// Command lines for each provider operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandProviderConfig {
    /// Exits zero when a sensor is present
    pub hardware_command: Vec<String>,
    /// Exits zero when a credential is enrolled
    pub enrollment_command: Vec<String>,
    /// Runs the prompt; exits zero on a match
    pub challenge_command: Vec<String>,
}

impl Default for CommandProviderConfig {
    fn default() -> Self {
        Self {
            hardware_command: shell(
                r#"fprintd-list "$USER" 2>/dev/null | grep -q -e '^Fingerprints for user' -e 'has no fingers enrolled'"#,
            ),
            enrollment_command: shell(r#"fprintd-list "$USER" 2>/dev/null | grep -q ' - #'"#),
            challenge_command: vec!["fprintd-verify".to_string()],
        }
    }
}

fn shell(script: &str) -> Vec<String> {
    vec!["sh".to_string(), "-c".to_string(), script.to_string()]
}

/// Provider that shells out to helper programs
#[derive(Debug, Clone)]
pub struct CommandProvider {
    config: CommandProviderConfig,
}

impl CommandProvider {
    pub fn new(config: CommandProviderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CommandProviderConfig {
        &self.config
    }

    async fn run(
        &self,
        argv: &[String],
        request: Option<&ChallengeRequest>,
    ) -> Result<Output, ProviderError> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| ProviderError::Query("empty helper command".to_string()))?;

        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(request) = request {
            command
                .env(PROMPT_ENV, &request.prompt)
                .env(FALLBACK_ENV, if request.allow_device_fallback { "1" } else { "0" });
        }

        debug!("executing {}", program);

        match command.output().await {
            Ok(output) => Ok(output),
            Err(e) => {
                error!("{} failed with {}", program, e);
                Err(ProviderError::Spawn(e))
            }
        }
    }

    async fn query(&self, argv: &[String]) -> Result<bool, ProviderError> {
        let output = self.run(argv, None).await?;
        Ok(output.status.success())
    }
}

#[async_trait]
impl BiometricProvider for CommandProvider {
    async fn has_hardware(&self) -> Result<bool, ProviderError> {
        self.query(&self.config.hardware_command).await
    }

    async fn is_enrolled(&self) -> Result<bool, ProviderError> {
        self.query(&self.config.enrollment_command).await
    }

    async fn challenge(
        &self,
        request: &ChallengeRequest,
    ) -> Result<ChallengeResponse, ProviderError> {
        let output = self
            .run(&self.config.challenge_command, Some(request))
            .await
            .map_err(|e| match e {
                ProviderError::Query(msg) => ProviderError::Challenge(msg),
                other => other,
            })?;

        if output.status.success() {
            return Ok(ChallengeResponse::success());
        }

        let reason = last_line(&output.stdout)
            .or_else(|| last_line(&output.stderr))
            .unwrap_or_else(|| match output.status.code() {
                Some(code) => format!("exit status {}", code),
                None => "terminated by signal".to_string(),
            });

        Ok(ChallengeResponse::failure(reason))
    }

    fn provider_name(&self) -> &'static str {
        "command"
    }
}

/// Last non-empty line of helper output
fn last_line(bytes: &[u8]) -> Option<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::trim)
        .rev()
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn provider(hardware: &str, enrolled: &str, challenge: &str) -> CommandProvider {
        CommandProvider::new(CommandProviderConfig {
            hardware_command: shell(hardware),
            enrollment_command: shell(enrolled),
            challenge_command: shell(challenge),
        })
    }

    fn request(allow_device_fallback: bool) -> ChallengeRequest {
        ChallengeRequest {
            prompt: "Touch the sensor".to_string(),
            allow_device_fallback,
        }
    }

    #[test]
    fn test_last_line() {
        assert_eq!(last_line(b"Using device\nverify-no-match\n\n"), Some("verify-no-match".to_string()));
        assert_eq!(last_line(b"  \n"), None);
    }

    #[tokio::test]
    async fn test_exit_status_drives_queries() {
        let provider = provider("exit 0", "exit 1", "exit 0");
        assert!(provider.has_hardware().await.unwrap());
        assert!(!provider.is_enrolled().await.unwrap());
    }

    #[tokio::test]
    async fn test_challenge_success() {
        let provider = provider("true", "true", "exit 0");
        let response = provider.challenge(&request(false)).await.unwrap();
        assert_eq!(response, ChallengeResponse::success());
    }

    #[tokio::test]
    async fn test_challenge_failure_reason_from_output() {
        let provider = provider("true", "true", "echo scanning; echo user_cancel; exit 1");
        let response = provider.challenge(&request(false)).await.unwrap();
        assert_eq!(response, ChallengeResponse::failure("user_cancel"));
    }

    #[tokio::test]
    async fn test_challenge_failure_reason_from_status() {
        let provider = provider("true", "true", "exit 3");
        let response = provider.challenge(&request(false)).await.unwrap();
        assert_eq!(response, ChallengeResponse::failure("exit status 3"));
    }

    #[tokio::test]
    async fn test_request_passed_through_environment() {
        let provider = provider(
            "true",
            "true",
            r#"echo "$TOUCHGATE_PROMPT/$TOUCHGATE_ALLOW_FALLBACK"; exit 1"#,
        );
        let response = provider.challenge(&request(true)).await.unwrap();
        assert_eq!(response.error_reason.as_deref(), Some("Touch the sensor/1"));
    }

    #[tokio::test]
    async fn test_missing_helper_is_device_error() {
        let provider = CommandProvider::new(CommandProviderConfig {
            hardware_command: vec!["/nonexistent/touchgate-helper".to_string()],
            enrollment_command: Vec::new(),
            challenge_command: Vec::new(),
        });
        assert!(matches!(provider.has_hardware().await, Err(ProviderError::Spawn(_))));
        assert!(matches!(provider.is_enrolled().await, Err(ProviderError::Query(_))));
        assert!(matches!(
            provider.challenge(&request(false)).await,
            Err(ProviderError::Challenge(_))
        ));
    }
}
