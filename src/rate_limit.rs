//! In-memory rate limiting for video-generation requests.
//!
//! DESIGN
//! ======
//! Fixed-window counters backed by `HashMap<String, Window>`, keyed by
//! client network identity. A denied request still increments its window's
//! counter, so bursts of up to 2x the quota are possible across a window
//! boundary. That is the documented fixed-window characteristic, not a bug.
//!
//! State is process-local and ephemeral. Deployments running more than one
//! instance must move this to a shared store with atomic
//! increment-with-expiry semantics.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Admission decision for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    /// Over quota; `retry_after` is the remaining time in the window.
    Deny { retry_after: Duration },
}

struct Window {
    started: Instant,
    count: u32,
}

struct RateLimiterInner {
    windows: HashMap<String, Window>,
    last_sweep: Instant,
}

/// Fixed-window rate limiter shared across request tasks.
#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<Mutex<RateLimiterInner>>,
    quota: u32,
    window: Duration,
}

impl RateLimiter {
    #[must_use]
    pub fn new(quota: u32, window: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(RateLimiterInner {
                windows: HashMap::new(),
                last_sweep: Instant::now(),
            })),
            quota,
            window,
        }
    }

    /// Admit or deny one request for the given client key.
    pub fn admit(&self, client_key: &str) -> Decision {
        self.admit_at(client_key, Instant::now())
    }

    /// Internal: admit with an explicit timestamp (for testing).
    fn admit_at(&self, client_key: &str, now: Instant) -> Decision {
        let mut inner = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        // Amortized sweep so long-gone clients do not pin memory forever.
        if now.duration_since(inner.last_sweep) >= self.window {
            let window = self.window;
            inner.windows.retain(|_, w| now.duration_since(w.started) < window);
            inner.last_sweep = now;
        }

        match inner.windows.entry(client_key.to_owned()) {
            Entry::Vacant(slot) => {
                slot.insert(Window { started: now, count: 1 });
                Decision::Allow
            }
            Entry::Occupied(mut slot) => {
                let w = slot.get_mut();
                if now.duration_since(w.started) >= self.window {
                    *w = Window { started: now, count: 1 };
                    return Decision::Allow;
                }

                // Rejected calls count against the window too.
                w.count = w.count.saturating_add(1);
                if w.count <= self.quota {
                    Decision::Allow
                } else {
                    Decision::Deny { retry_after: self.window - now.duration_since(w.started) }
                }
            }
        }
    }

    #[cfg(test)]
    fn tracked_keys(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .windows
            .len()
    }
}

#[cfg(test)]
#[path = "rate_limit_test.rs"]
mod tests;
