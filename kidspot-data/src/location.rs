//! Resolve the user's position with a bounded wait and a fixed fallback.

use std::time::Duration;

use async_trait::async_trait;
use geo::Coord;
use thiserror::Error;

/// Praca da Se, Sao Paulo; used whenever the device position is unknown.
pub const FALLBACK_LOCATION: Coord<f64> = Coord {
    x: -46.633_308,
    y: -23.550_52,
};

/// Default wait for a position fix.
pub const DEFAULT_LOCATION_TIMEOUT: Duration = Duration::from_secs(15);

/// Reasons a position could not be obtained.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    /// The user declined location access.
    #[error("location permission denied")]
    PermissionDenied,
    /// The platform could not produce a fix.
    #[error("location unavailable: {message}")]
    Unavailable {
        /// Platform error description.
        message: String,
    },
}

/// Source of the device position.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Return the current position, `x = longitude`, `y = latitude`.
    async fn current_location(&self) -> Result<Coord<f64>, LocationError>;
}

/// Wraps a [`LocationProvider`] so callers always receive a coordinate.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use kidspot_data::location::{FALLBACK_LOCATION, FallbackLocator, LocationError};
/// use kidspot_data::test_support::StubLocationProvider;
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// let locator = FallbackLocator::new(StubLocationProvider::failing(LocationError::PermissionDenied));
/// assert_eq!(locator.locate().await, FALLBACK_LOCATION);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct FallbackLocator<P> {
    provider: P,
    timeout: Duration,
    fallback: Coord<f64>,
}

impl<P: LocationProvider> FallbackLocator<P> {
    /// Wrap `provider` with the default timeout and fallback.
    #[must_use]
    pub const fn new(provider: P) -> Self {
        Self {
            provider,
            timeout: DEFAULT_LOCATION_TIMEOUT,
            fallback: FALLBACK_LOCATION,
        }
    }

    /// Set the wait for a position fix.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the coordinate returned on failure.
    #[must_use]
    pub const fn with_fallback(mut self, fallback: Coord<f64>) -> Self {
        self.fallback = fallback;
        self
    }

    /// Resolve the position, falling back on denial, error, timeout or a
    /// non-finite fix.
    pub async fn locate(&self) -> Coord<f64> {
        match tokio::time::timeout(self.timeout, self.provider.current_location()).await {
            Ok(Ok(position)) if position.x.is_finite() && position.y.is_finite() => position,
            Ok(Ok(_)) => {
                log::info!("location provider returned a non-finite fix; using fallback");
                self.fallback
            }
            Ok(Err(LocationError::PermissionDenied)) => self.fallback,
            Ok(Err(err)) => {
                log::info!("failed to resolve user location; using fallback: {err}");
                self.fallback
            }
            Err(_) => {
                log::info!("location lookup timed out; using fallback coordinates");
                self.fallback
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubLocationProvider;
    use rstest::rstest;

    const HERE: Coord<f64> = Coord { x: -43.2, y: -22.9 };

    #[rstest]
    #[tokio::test]
    async fn returns_provider_fix() {
        let locator = FallbackLocator::new(StubLocationProvider::at(HERE));
        assert_eq!(locator.locate().await, HERE);
    }

    #[rstest]
    #[case(LocationError::PermissionDenied)]
    #[case(LocationError::Unavailable { message: "gps off".to_owned() })]
    #[tokio::test]
    async fn errors_use_fallback(#[case] error: LocationError) {
        let locator = FallbackLocator::new(StubLocationProvider::failing(error));
        assert_eq!(locator.locate().await, FALLBACK_LOCATION);
    }

    #[rstest]
    #[tokio::test]
    async fn slow_provider_times_out() {
        let locator = FallbackLocator::new(
            StubLocationProvider::at(HERE).with_delay(Duration::from_secs(5)),
        )
        .with_timeout(Duration::from_millis(20))
        .with_fallback(Coord { x: 1.0, y: 2.0 });
        assert_eq!(locator.locate().await, Coord { x: 1.0, y: 2.0 });
    }

    #[rstest]
    #[tokio::test]
    async fn non_finite_fix_uses_fallback() {
        let locator = FallbackLocator::new(StubLocationProvider::at(Coord {
            x: f64::NAN,
            y: 0.0,
        }));
        assert_eq!(locator.locate().await, FALLBACK_LOCATION);
    }
}
