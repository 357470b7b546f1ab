//! Timeout helper.

use std::future::Future;
use std::time::Duration;

use crate::error::TripError;

/// Wrap a fallible future with a timeout.
pub async fn with_timeout<T>(
    duration: Duration,
    future: impl Future<Output = Result<T, TripError>>,
) -> Result<T, TripError> {
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(TripError::Timeout(duration.as_millis() as u64)),
    }
}
