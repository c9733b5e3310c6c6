use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

/// Fixed-window limiter keyed by client IP. Each key gets `points` requests
/// per `window`; the window resets in full once it has elapsed.
pub struct RateLimiter {
    points: u32,
    window: Duration,
    windows: Mutex<HashMap<String, WindowState>>,
}

struct WindowState {
    started: Instant,
    used: u32,
}

impl RateLimiter {
    pub fn new(points: u32, window: Duration) -> Self {
        Self {
            points,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Consumes one point for `key`. Returns `false` once the budget for the
    /// current window is spent.
    pub async fn check(&self, key: &str) -> bool {
        let mut windows = self.windows.lock().await;
        let now = Instant::now();
        let state = windows.entry(key.to_string()).or_insert(WindowState {
            started: now,
            used: 0,
        });
        if now.duration_since(state.started) >= self.window {
            state.started = now;
            state.used = 0;
        }
        if state.used >= self.points {
            return false;
        }
        state.used += 1;
        true
    }
}

/// The per-endpoint budgets. Uploads are the most abusable surface, so they
/// get both a tight per-IP budget and a separate budget for addresses that
/// do not look local to the event.
pub struct RateLimits {
    pub rsvp: RateLimiter,
    pub carpool: RateLimiter,
    pub photo: RateLimiter,
    pub general: RateLimiter,
    pub geographic: RateLimiter,
}

impl Default for RateLimits {
    fn default() -> Self {
        Self {
            rsvp: RateLimiter::new(3, Duration::from_secs(5 * 60)),
            carpool: RateLimiter::new(5, Duration::from_secs(5 * 60)),
            photo: RateLimiter::new(10, Duration::from_secs(60 * 60)),
            general: RateLimiter::new(50, Duration::from_secs(15 * 60)),
            geographic: RateLimiter::new(1, Duration::from_secs(60 * 60)),
        }
    }
}
