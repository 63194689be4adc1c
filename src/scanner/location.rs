//! One-shot device geolocation.

use std::time::Duration;

use async_trait::async_trait;
use rollcall_core::ClientError;
use rollcall_models::Coordinates;
use tokio::time::timeout;

/// Shown when no position could be obtained.
pub const LOCATION_REQUIRED_MESSAGE: &str = "Location access required for attendance marking";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// Oldest cached fix the provider may return.
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            maximum_age: Duration::from_secs(60),
        }
    }
}

#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_position(&self, options: &PositionOptions)
    -> Result<Coordinates, ClientError>;
}

/// Asks the provider once, giving up after `options.timeout`.
pub async fn locate(
    provider: &dyn LocationProvider,
    options: &PositionOptions,
) -> Result<Coordinates, ClientError> {
    match timeout(options.timeout, provider.current_position(options)).await {
        Ok(result) => result,
        Err(_) => Err(ClientError::Location(format!(
            "no position within {}s",
            options.timeout.as_secs()
        ))),
    }
}

/// A provider that always reports the same position, or none.
///
/// The terminal front-end builds one from `--lat`/`--lng`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocation(pub Option<Coordinates>);

impl FixedLocation {
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self(Some(Coordinates::new(latitude, longitude)))
    }

    pub fn unavailable() -> Self {
        Self(None)
    }
}

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<Coordinates, ClientError> {
        self.0
            .ok_or_else(|| ClientError::Location("position unavailable".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NeverResolves;

    #[async_trait]
    impl LocationProvider for NeverResolves {
        async fn current_position(
            &self,
            _options: &PositionOptions,
        ) -> Result<Coordinates, ClientError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_fixed_location() {
        let options = PositionOptions::default();
        let position = locate(&FixedLocation::at(12.9, 77.6), &options).await.unwrap();
        assert_eq!(position, Coordinates::new(12.9, 77.6));

        let err = locate(&FixedLocation::unavailable(), &options).await.unwrap_err();
        assert!(matches!(err, ClientError::Location(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_provider_times_out() {
        let err = locate(&NeverResolves, &PositionOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err, ClientError::Location("no position within 10s".to_string()));
    }

    #[test]
    fn test_default_options() {
        let options = PositionOptions::default();
        assert!(options.high_accuracy);
        assert_eq!(options.timeout, Duration::from_secs(10));
        assert_eq!(options.maximum_age, Duration::from_secs(60));
    }
}
