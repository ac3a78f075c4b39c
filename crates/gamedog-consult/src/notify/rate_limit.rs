use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use axum::http::HeaderMap;

use crate::config::RateLimitConfig;

/// Bucket used when the request carries no forwarding headers.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Map size at which expired windows are first swept.
const PRUNE_THRESHOLD: usize = 1024;

#[derive(Debug, Clone, Copy)]
struct WindowEntry {
    count: u32,
    reset_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

impl RateDecision {
    pub fn is_allowed(self) -> bool {
        matches!(self, RateDecision::Allowed { .. })
    }
}

/// Fixed-window counter keyed by client identifier.
///
/// State lives in this process only; separate instances each keep their own
/// counts and everything resets on restart.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    windows: Mutex<Windows>,
}

#[derive(Debug)]
struct Windows {
    entries: HashMap<String, WindowEntry>,
    prune_at: usize,
}

impl Windows {
    /// Drops expired windows once the map reaches `prune_at`. The next sweep
    /// waits until the surviving set has doubled, so a flood of live keys
    /// does not turn every insert into a full scan.
    fn prune_expired(&mut self, now: Instant) {
        if self.entries.len() < self.prune_at {
            return;
        }
        let before = self.entries.len();
        self.entries.retain(|_, entry| now <= entry.reset_at);
        self.prune_at = (self.entries.len() * 2).max(PRUNE_THRESHOLD);
        tracing::debug!(
            before,
            after = self.entries.len(),
            "pruned expired rate limit windows"
        );
    }
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            max_requests: config.max_requests,
            window: config.window,
            windows: Mutex::new(Windows {
                entries: HashMap::new(),
                prune_at: PRUNE_THRESHOLD,
            }),
        }
    }

    pub fn check(&self, client_id: &str) -> RateDecision {
        self.check_at(client_id, Instant::now())
    }

    pub fn check_at(&self, client_id: &str, now: Instant) -> RateDecision {
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(entry) = windows.entries.get_mut(client_id) {
            if now <= entry.reset_at {
                if entry.count >= self.max_requests {
                    return RateDecision::Limited {
                        retry_after: entry.reset_at.saturating_duration_since(now),
                    };
                }
                entry.count += 1;
                return RateDecision::Allowed {
                    remaining: self.max_requests - entry.count,
                };
            }
        }

        windows.prune_expired(now);
        windows.entries.insert(
            client_id.to_string(),
            WindowEntry {
                count: 1,
                reset_at: now + self.window,
            },
        );
        RateDecision::Allowed {
            remaining: self.max_requests.saturating_sub(1),
        }
    }

    pub fn tracked_clients(&self) -> usize {
        self.windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }
}

/// First hop of `x-forwarded-for`, then `x-real-ip`, then [`UNKNOWN_CLIENT`].
pub fn client_identifier(headers: &HeaderMap) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    };

    forwarded
        .or_else(real_ip)
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn limiter() -> RateLimiter {
        RateLimiter::new(RateLimitConfig::default())
    }

    #[test]
    fn sixth_request_in_window_is_limited() {
        let limiter = limiter();
        let start = Instant::now();

        for attempt in 0..5u32 {
            let decision = limiter.check_at("10.0.0.1", start + Duration::from_secs(attempt.into()));
            assert_eq!(
                decision,
                RateDecision::Allowed {
                    remaining: 4 - attempt
                }
            );
        }

        let sixth = limiter.check_at("10.0.0.1", start + Duration::from_secs(60));
        assert_eq!(
            sixth,
            RateDecision::Limited {
                retry_after: Duration::from_secs(3600 - 60)
            }
        );
    }

    #[test]
    fn window_expiry_resets_the_counter() {
        let limiter = limiter();
        let start = Instant::now();
        for _ in 0..5 {
            assert!(limiter.check_at("10.0.0.1", start).is_allowed());
        }
        assert!(!limiter.check_at("10.0.0.1", start).is_allowed());

        let at_boundary = start + Duration::from_secs(3600);
        assert!(!limiter.check_at("10.0.0.1", at_boundary).is_allowed());

        let after = at_boundary + Duration::from_millis(1);
        assert_eq!(
            limiter.check_at("10.0.0.1", after),
            RateDecision::Allowed { remaining: 4 }
        );
    }

    #[test]
    fn limited_requests_do_not_extend_the_window() {
        let limiter = limiter();
        let start = Instant::now();
        for _ in 0..7 {
            limiter.check_at("10.0.0.1", start);
        }
        let after = start + Duration::from_secs(3601);
        assert!(limiter.check_at("10.0.0.1", after).is_allowed());
    }

    #[test]
    fn clients_are_counted_independently() {
        let limiter = limiter();
        let now = Instant::now();
        for _ in 0..5 {
            limiter.check_at("10.0.0.1", now);
        }
        assert!(!limiter.check_at("10.0.0.1", now).is_allowed());
        assert!(limiter.check_at("10.0.0.2", now).is_allowed());
        assert_eq!(limiter.tracked_clients(), 2);
    }

    #[test]
    fn expired_windows_are_swept_once_the_map_grows() {
        let limiter = limiter();
        let start = Instant::now();
        for i in 0..PRUNE_THRESHOLD * 2 {
            limiter.check_at(&format!("198.51.100.{i}"), start);
        }
        assert_eq!(limiter.tracked_clients(), PRUNE_THRESHOLD * 2);

        let later = start + Duration::from_secs(2 * 3600);
        assert!(limiter.check_at("203.0.113.9", later).is_allowed());
        assert_eq!(limiter.tracked_clients(), 1);
    }

    #[test]
    fn live_windows_survive_a_sweep() {
        let limiter = limiter();
        let start = Instant::now();
        for i in 0..PRUNE_THRESHOLD - 1 {
            limiter.check_at(&format!("198.51.100.{i}"), start);
        }
        let opened = start + Duration::from_secs(3000);
        for _ in 0..5 {
            limiter.check_at("10.0.0.1", opened);
        }
        assert_eq!(limiter.tracked_clients(), PRUNE_THRESHOLD);

        let swept = start + Duration::from_secs(3601);
        assert!(limiter.check_at("203.0.113.9", swept).is_allowed());
        assert_eq!(limiter.tracked_clients(), 2);
        assert!(!limiter.check_at("10.0.0.1", swept).is_allowed());
    }

    #[test]
    fn identifier_prefers_first_forwarded_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.1"));
        assert_eq!(client_identifier(&headers), "203.0.113.9");
    }

    #[test]
    fn identifier_falls_back_to_real_ip_then_unknown() {
        let mut headers = HeaderMap::new();
        assert_eq!(client_identifier(&headers), UNKNOWN_CLIENT);

        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.4"));
        assert_eq!(client_identifier(&headers), "198.51.100.4");

        headers.insert("x-forwarded-for", HeaderValue::from_static(" "));
        assert_eq!(client_identifier(&headers), "198.51.100.4");
    }
}
