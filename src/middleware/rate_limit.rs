/// Sliding-window rate limiting for the validation boundary.
///
/// The window state is an in-process map from caller IP to request
/// timestamps, so the guarantee is per-process. A multi-instance deployment
/// needs a shared counter to keep a global limit.
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub struct RateLimiter {
    requests: Mutex<HashMap<String, Vec<Instant>>>,
    limit: usize,
    window: Duration,
}

pub enum RateDecision {
    Allowed {
        remaining: usize,
        /// Time until the caller's window is fully clear again.
        reset_after: Duration,
    },
    Limited {
        retry_after: Duration,
    },
}

impl RateLimiter {
    pub fn new(limit: usize, window: Duration) -> Self {
        Self {
            requests: Mutex::new(HashMap::new()),
            limit,
            window,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Prune, count and append under a single lock: concurrent requests from
    /// the same key contend on the same window list.
    pub fn check(&self, key: &str) -> RateDecision {
        let now = Instant::now();
        let mut requests = self
            .requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // Sweep every key, not just the caller's, so idle addresses do not
        // accumulate in the map forever.
        requests.retain(|_, entries| {
            entries.retain(|t| now.duration_since(*t) < self.window);
            !entries.is_empty()
        });

        let entries = requests.entry(key.to_string()).or_default();

        if entries.len() >= self.limit {
            let retry_after = entries
                .first()
                .map(|oldest| self.window.saturating_sub(now.duration_since(*oldest)))
                .unwrap_or(self.window);
            return RateDecision::Limited { retry_after };
        }

        entries.push(now);
        let reset_after = entries
            .first()
            .map(|oldest| self.window.saturating_sub(now.duration_since(*oldest)))
            .unwrap_or(self.window);
        RateDecision::Allowed {
            remaining: self.limit - entries.len(),
            reset_after,
        }
    }

    #[cfg(test)]
    fn tracked_keys(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

/// Axum middleware wrapping `RateLimiter::check` around a route.
pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let key = client_key(&request);

    match limiter.check(&key) {
        RateDecision::Allowed {
            remaining,
            reset_after,
        } => {
            let mut response = next.run(request).await;
            let headers = response.headers_mut();
            if let Ok(value) = limiter.limit().to_string().parse() {
                headers.insert("x-ratelimit-limit", value);
            }
            if let Ok(value) = remaining.to_string().parse() {
                headers.insert("x-ratelimit-remaining", value);
            }
            if let Ok(value) = reset_timestamp(reset_after).parse() {
                headers.insert("x-ratelimit-reset", value);
            }
            response
        }
        RateDecision::Limited { retry_after } => {
            let retry_secs = retry_after.as_secs().max(1);
            tracing::warn!(%key, retry_secs, "rate limit exceeded");

            let mut response = (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({
                    "error": "Rate limit exceeded",
                    "status": StatusCode::TOO_MANY_REQUESTS.as_u16(),
                    "retry_after": retry_secs,
                })),
            )
                .into_response();

            let headers = response.headers_mut();
            if let Ok(value) = limiter.limit().to_string().parse() {
                headers.insert("x-ratelimit-limit", value);
            }
            headers.insert(
                "x-ratelimit-remaining",
                axum::http::HeaderValue::from_static("0"),
            );
            if let Ok(value) = reset_timestamp(retry_after).parse() {
                headers.insert("x-ratelimit-reset", value);
            }
            if let Ok(value) = retry_secs.to_string().parse() {
                headers.insert("retry-after", value);
            }
            response
        }
    }
}

/// RFC3339 wall-clock instant at which the caller's window resets.
fn reset_timestamp(reset_after: Duration) -> String {
    let reset_after =
        chrono::Duration::from_std(reset_after).unwrap_or_else(|_| chrono::Duration::zero());
    (chrono::Utc::now() + reset_after).to_rfc3339()
}

fn client_key(request: &Request) -> String {
    // Proxy header first, socket address otherwise.
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|ip| ip.trim().to_string())
        .or_else(|| {
            request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|info| info.0.ip().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_up_to_limit_then_rejects() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));

        for expected_remaining in [2, 1, 0] {
            match limiter.check("10.0.0.1") {
                RateDecision::Allowed { remaining, .. } => {
                    assert_eq!(remaining, expected_remaining)
                }
                RateDecision::Limited { .. } => panic!("should be under the limit"),
            }
        }

        assert!(matches!(
            limiter.check("10.0.0.1"),
            RateDecision::Limited { .. }
        ));
    }

    #[test]
    fn keys_are_independent() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));

        assert!(matches!(
            limiter.check("10.0.0.1"),
            RateDecision::Allowed { .. }
        ));
        assert!(matches!(
            limiter.check("10.0.0.2"),
            RateDecision::Allowed { .. }
        ));
        assert!(matches!(
            limiter.check("10.0.0.1"),
            RateDecision::Limited { .. }
        ));
    }

    #[test]
    fn window_expiry_frees_capacity() {
        let limiter = RateLimiter::new(1, Duration::from_millis(40));

        assert!(matches!(
            limiter.check("10.0.0.1"),
            RateDecision::Allowed { .. }
        ));
        assert!(matches!(
            limiter.check("10.0.0.1"),
            RateDecision::Limited { .. }
        ));

        std::thread::sleep(Duration::from_millis(60));

        assert!(matches!(
            limiter.check("10.0.0.1"),
            RateDecision::Allowed { .. }
        ));
    }

    #[test]
    fn reset_is_bounded_by_the_window() {
        let window = Duration::from_secs(60);
        let limiter = RateLimiter::new(2, window);

        match limiter.check("10.0.0.1") {
            RateDecision::Allowed { reset_after, .. } => {
                assert!(reset_after <= window);
                assert!(reset_after > Duration::ZERO);
            }
            RateDecision::Limited { .. } => panic!("should be under the limit"),
        }

        limiter.check("10.0.0.1");
        match limiter.check("10.0.0.1") {
            RateDecision::Limited { retry_after } => assert!(retry_after <= window),
            RateDecision::Allowed { .. } => panic!("should be over the limit"),
        }
    }

    #[test]
    fn idle_keys_are_swept_once_their_window_passes() {
        let limiter = RateLimiter::new(5, Duration::from_millis(40));

        limiter.check("10.0.0.1");
        limiter.check("10.0.0.2");
        assert_eq!(limiter.tracked_keys(), 2);

        std::thread::sleep(Duration::from_millis(60));

        // Any later check drops every key whose window has fully expired.
        limiter.check("10.0.0.3");
        assert_eq!(limiter.tracked_keys(), 1);
    }

    #[test]
    fn concurrent_checks_admit_exactly_limit() {
        let limiter = Arc::new(RateLimiter::new(5, Duration::from_secs(60)));

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                std::thread::spawn(move || {
                    matches!(limiter.check("10.0.0.1"), RateDecision::Allowed { .. })
                })
            })
            .collect();

        let admitted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|allowed| *allowed)
            .count();

        assert_eq!(admitted, 5);
    }
}
