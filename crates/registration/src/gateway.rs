//! Where a finished registration is sent.

use std::time::Duration;

use thiserror::Error;

use crate::wizard::Registration;

/// Default simulated round-trip.
pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("registration rejected: {0}")]
    Rejected(String),

    #[error("registration service unavailable")]
    Unavailable,
}

/// Receiver of finished registrations.
///
/// Implementations must not retain the password beyond the call.
#[async_trait::async_trait]
pub trait RegistrationGateway: Send + Sync {
    async fn register(&self, registration: &Registration) -> Result<(), GatewayError>;
}

/// Gateway with no backend: waits, logs, accepts.
#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    delay: Duration,
}

impl SimulatedGateway {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self::new(DEFAULT_SUBMIT_DELAY)
    }
}

#[async_trait::async_trait]
impl RegistrationGateway for SimulatedGateway {
    async fn register(&self, registration: &Registration) -> Result<(), GatewayError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        tracing::info!(
            email = %registration.email,
            role = %registration.role,
            "registration accepted"
        );
        Ok(())
    }
}

#[async_trait::async_trait]
impl<T: RegistrationGateway + ?Sized> RegistrationGateway for std::sync::Arc<T> {
    async fn register(&self, registration: &Registration) -> Result<(), GatewayError> {
        (**self).register(registration).await
    }
}
