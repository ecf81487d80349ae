//! Eligibility gate
//!
//! Cooldown policy is applied by the caller before requesting a spin; the
//! controller never consults it. Timestamps are epoch milliseconds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One spin per day
pub const DEFAULT_COOLDOWN_MS: u64 = 24 * 60 * 60 * 1000;

/// True iff there is no previous spin or the cooldown has fully elapsed.
///
/// A `last_spin_ms` in the future (clock skew) is not eligible.
#[inline]
pub fn is_eligible(last_spin_ms: Option<i64>, now_ms: i64, cooldown_ms: u64) -> bool {
    match last_spin_ms {
        None => true,
        Some(last) => {
            let elapsed = i128::from(now_ms) - i128::from(last);
            elapsed >= i128::from(cooldown_ms)
        }
    }
}

/// Milliseconds until the next spin is allowed, within `[0, cooldown_ms]`
#[inline]
pub fn remaining_ms(last_spin_ms: Option<i64>, now_ms: i64, cooldown_ms: u64) -> u64 {
    let Some(last) = last_spin_ms else {
        return 0;
    };
    let elapsed = (i128::from(now_ms) - i128::from(last)).max(0);
    (i128::from(cooldown_ms) - elapsed).clamp(0, i128::from(cooldown_ms)) as u64
}

/// Cooldown policy with a fixed window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityGate {
    pub cooldown_ms: u64,
}

impl EligibilityGate {
    pub fn new(cooldown_ms: u64) -> Self {
        Self { cooldown_ms }
    }

    /// Check eligibility
    pub fn is_eligible(&self, last_spin_ms: Option<i64>, now_ms: i64) -> bool {
        is_eligible(last_spin_ms, now_ms, self.cooldown_ms)
    }

    /// Remaining wait in milliseconds
    pub fn remaining_ms(&self, last_spin_ms: Option<i64>, now_ms: i64) -> u64 {
        remaining_ms(last_spin_ms, now_ms, self.cooldown_ms)
    }

    /// Remaining wait as a countdown, `None` when eligible
    pub fn countdown(&self, last_spin_ms: Option<i64>, now_ms: i64) -> Option<Countdown> {
        if self.is_eligible(last_spin_ms, now_ms) {
            None
        } else {
            Some(Countdown::from_ms(self.remaining_ms(last_spin_ms, now_ms)))
        }
    }
}

impl Default for EligibilityGate {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN_MS)
    }
}

/// Hours/minutes/seconds until the next spin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Countdown {
    /// Split milliseconds, truncating partial seconds
    pub fn from_ms(ms: u64) -> Self {
        let total_secs = ms / 1000;
        Self {
            hours: total_secs / 3600,
            minutes: (total_secs % 3600) / 60,
            seconds: total_secs % 60,
        }
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {}m {}s", self.hours, self.minutes, self.seconds)
    }
}
