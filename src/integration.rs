use crate::config::IntegrationConfig;
use crate::error::{Error, Result};
use crate::sources::{IntegrationProbe, SimulatedProbe};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

/// Result of verifying the widget installation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationStatus {
    #[default]
    Idle,
    Testing,
    Success,
    Failed,
}

impl std::fmt::Display for IntegrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Testing => "testing",
            Self::Success => "success",
            Self::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// Verifies that the chatbot widget is live on the customer's website
pub struct IntegrationTester {
    config: IntegrationConfig,
    probe: Arc<dyn IntegrationProbe>,
    state: watch::Sender<IntegrationStatus>,
}

impl IntegrationTester {
    pub fn new(config: IntegrationConfig) -> Self {
        Self::with_probe(config, Arc::new(SimulatedProbe))
    }

    pub fn with_probe(config: IntegrationConfig, probe: Arc<dyn IntegrationProbe>) -> Self {
        let (state, _rx) = watch::channel(IntegrationStatus::Idle);
        Self { config, probe, state }
    }

    pub fn status(&self) -> IntegrationStatus {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<IntegrationStatus> {
        self.state.subscribe()
    }

    /// Run one verification. Rejected while a verification is already running.
    pub async fn test_integration(&self) -> Result<IntegrationStatus> {
        let mut previous = IntegrationStatus::Idle;
        let started = self.state.send_if_modified(|status| {
            previous = *status;
            if *status == IntegrationStatus::Testing {
                return false;
            }
            *status = IntegrationStatus::Testing;
            true
        });
        if !started {
            return Err(Error::transition(previous, IntegrationStatus::Testing));
        }

        tokio::time::sleep(self.config.integration_delay()).await;

        let outcome = match self.probe.verify().await {
            Ok(true) => IntegrationStatus::Success,
            Ok(false) => IntegrationStatus::Failed,
            Err(err) => {
                ::log::warn!("Integration check failed: {}", err);
                IntegrationStatus::Failed
            }
        };
        ::log::info!("Integration check finished: {}", outcome);
        self.state.send_replace(outcome);
        Ok(outcome)
    }

    /// Close the result dialog and return to idle. Rejected while a verification is running.
    pub fn dismiss(&self) -> Result<()> {
        let mut previous = IntegrationStatus::Idle;
        self.state.send_if_modified(|status| {
            previous = *status;
            match *status {
                IntegrationStatus::Success | IntegrationStatus::Failed => {
                    *status = IntegrationStatus::Idle;
                    true
                }
                IntegrationStatus::Idle | IntegrationStatus::Testing => false,
            }
        });
        if previous == IntegrationStatus::Testing {
            return Err(Error::transition(previous, IntegrationStatus::Idle));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Duration;

    struct Unreachable;

    #[async_trait]
    impl IntegrationProbe for Unreachable {
        async fn verify(&self) -> Result<bool> {
            Err(Error::Config("widget not found".to_string()))
        }
    }

    struct Missing;

    #[async_trait]
    impl IntegrationProbe for Missing {
        async fn verify(&self) -> Result<bool> {
            Ok(false)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_integration_succeeds() {
        let tester = Arc::new(IntegrationTester::new(IntegrationConfig::default()));
        assert_eq!(tester.status(), IntegrationStatus::Idle);

        let running = Arc::clone(&tester);
        let task = tokio::spawn(async move { running.test_integration().await });

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(tester.status(), IntegrationStatus::Testing);

        assert_eq!(task.await.unwrap().unwrap(), IntegrationStatus::Success);
        assert_eq!(tester.status(), IntegrationStatus::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_while_testing() {
        let tester = Arc::new(IntegrationTester::new(IntegrationConfig::default()));
        let running = Arc::clone(&tester);
        let task = tokio::spawn(async move { running.test_integration().await });
        tokio::time::sleep(Duration::from_millis(10)).await;

        let second = tester.test_integration().await;
        assert!(matches!(second, Err(Error::InvalidTransition { .. })));
        assert_eq!(task.await.unwrap().unwrap(), IntegrationStatus::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn test_probe_errors_mark_failed_and_allow_retry() {
        let tester = IntegrationTester::with_probe(IntegrationConfig::default(), Arc::new(Unreachable));
        assert_eq!(tester.test_integration().await.unwrap(), IntegrationStatus::Failed);
        assert_eq!(tester.status(), IntegrationStatus::Failed);
        assert_eq!(tester.test_integration().await.unwrap(), IntegrationStatus::Failed);

        let tester = IntegrationTester::with_probe(IntegrationConfig::default(), Arc::new(Missing));
        assert_eq!(tester.test_integration().await.unwrap(), IntegrationStatus::Failed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_returns_to_idle() {
        let tester = Arc::new(IntegrationTester::new(IntegrationConfig::default()));
        tester.dismiss().unwrap();
        assert_eq!(tester.status(), IntegrationStatus::Idle);

        let running = Arc::clone(&tester);
        let task = tokio::spawn(async move { running.test_integration().await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(matches!(tester.dismiss(), Err(Error::InvalidTransition { .. })));
        assert_eq!(tester.status(), IntegrationStatus::Testing);

        assert_eq!(task.await.unwrap().unwrap(), IntegrationStatus::Success);
        tester.dismiss().unwrap();
        assert_eq!(tester.status(), IntegrationStatus::Idle);

        let tester = IntegrationTester::with_probe(IntegrationConfig::default(), Arc::new(Unreachable));
        tester.test_integration().await.unwrap();
        tester.dismiss().unwrap();
        assert_eq!(tester.status(), IntegrationStatus::Idle);
    }
}
