//! Shared HTTP client and status handling.

use std::sync::OnceLock;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::error::TripError;

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Get (or create) the shared reqwest client.
///
/// The 120 s ceiling covers model calls; travel back-ends set a shorter
/// per-request timeout.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .pool_max_idle_per_host(10)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new())
    })
}

/// Build default headers for a Bearer-token API.
pub fn bearer_headers(api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(val) = HeaderValue::from_str(&format!("Bearer {api_key}")) {
        headers.insert(AUTHORIZATION, val);
    }
    headers
}

/// Map a non-success HTTP status to an error.
pub fn status_to_error(status: u16, body: &str) -> TripError {
    match status {
        401 | 403 => TripError::Authentication(body.to_string()),
        429 => TripError::RateLimited {
            retry_after_ms: extract_retry_after(body),
        },
        _ => TripError::api(status, body),
    }
}

fn extract_retry_after(body: &str) -> Option<u64> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("retry_after"))
                .and_then(|r| r.as_f64())
                .map(|s| (s * 1000.0) as u64)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_body_carries_retry_after() {
        let err = status_to_error(429, r#"{"error":{"retry_after":1.5}}"#);
        assert!(matches!(
            err,
            TripError::RateLimited {
                retry_after_ms: Some(1500)
            }
        ));
    }

    #[test]
    fn forbidden_is_authentication() {
        assert!(matches!(
            status_to_error(403, "denied"),
            TripError::Authentication(_)
        ));
    }

    #[test]
    fn other_statuses_are_api_errors() {
        assert!(matches!(
            status_to_error(500, "oops"),
            TripError::Api { status: 500, .. }
        ));
    }
}
