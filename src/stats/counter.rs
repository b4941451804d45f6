//! Plastic Counter
//! Rough tally of plastic reaching the oceans since the dashboard opened.

use std::time::{Duration, Instant};

/// Kilograms added per elapsed second (~8 Mt per year, rounded down).
pub const KG_PER_SECOND: u64 = 17;

/// Counter anchored at the moment it was created.
#[derive(Debug, Clone, Copy)]
pub struct PlasticCounter {
    started: Instant,
}

impl Default for PlasticCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl PlasticCounter {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn kilograms(&self) -> u64 {
        Self::kilograms_after(self.started.elapsed())
    }

    /// Only whole seconds count, like a one-second ticker.
    pub fn kilograms_after(elapsed: Duration) -> u64 {
        elapsed.as_secs() * KG_PER_SECOND
    }

    /// Time left until the next tick.
    pub fn until_next_tick(&self) -> Duration {
        let subsec = self.started.elapsed().subsec_nanos();
        Duration::from_nanos(1_000_000_000 - subsec as u64)
    }
}

/// Thousands-separated integer, e.g. `12,345`.
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
