//! Time source for message timestamps

/// Wall-clock capability injected into builders
pub trait Clock: Send + Sync {
    /// Current unix time in seconds (UTC)
    fn now_unix(&self) -> u64;
}

/// Reads the system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> u64 {
        // pre-epoch clocks clamp to zero
        chrono::Utc::now().timestamp().max(0) as u64
    }
}

/// Always returns the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now_unix(&self) -> u64 {
        self.0
    }
}
