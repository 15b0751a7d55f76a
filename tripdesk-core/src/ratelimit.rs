use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Outcome of one admission check.
#[derive(Debug, Clone, Copy)]
pub struct Admission {
    pub allowed: bool,
    pub remaining: u32,
}

/// Time source, injected so admission is a pure function of
/// (identity, clock) in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Per-identity admission control for booking attempts.
pub trait RateLimiter: Send + Sync {
    fn admit(&self, identity: &str) -> Admission;
}

struct Window {
    count: u32,
    reset_at: Instant,
}

/// Fixed-window limiter: `max_requests` admissions per identity per
/// `window` duration. Windows reset lazily on the first admit after
/// expiry. State is per-process only; there is no cross-instance
/// coordination, so a sharded deployment multiplies the effective cap.
pub struct WindowLimiter<C: Clock = SystemClock> {
    max_requests: u32,
    window: Duration,
    clock: C,
    windows: Mutex<HashMap<String, Window>>,
}

impl WindowLimiter<SystemClock> {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self::with_clock(max_requests, window, SystemClock)
    }
}

impl<C: Clock> WindowLimiter<C> {
    pub fn with_clock(max_requests: u32, window: Duration, clock: C) -> Self {
        Self {
            max_requests,
            window,
            clock,
            windows: Mutex::new(HashMap::new()),
        }
    }
}

impl<C: Clock> RateLimiter for WindowLimiter<C> {
    fn admit(&self, identity: &str) -> Admission {
        let now = self.clock.now();
        // A poisoned lock only means another admit panicked mid-update;
        // the counter state is still usable.
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let window = windows.entry(identity.to_string()).or_insert(Window {
            count: 0,
            reset_at: now + self.window,
        });

        if now > window.reset_at {
            window.count = 1;
            window.reset_at = now + self.window;
        } else {
            window.count += 1;
        }

        Admission {
            allowed: window.count <= self.max_requests,
            remaining: self.max_requests.saturating_sub(window.count),
        }
    }
}
