//! Sliding-window duty-cycle limiter (§2 "Duty limiter", §5 "owned, no
//! locking required under the single-threaded contract").
//!
//! Airtime spends are timestamped against a caller-supplied simulated clock
//! rather than [`std::time::Instant`], matching the engine's step-synchronous
//! model and the determinism knob in §5: fixing the step clock plus the PRNG
//! seed yields reproducible duty-cycle behavior across runs.

use std::collections::VecDeque;

/// Tracks airtime spent within a trailing `window_s` and rejects spends that
/// would push utilization over `cap_fraction`.
#[derive(Debug, Clone)]
pub struct DutyLimiter {
    window_s: f64,
    cap_fraction: f64,
    spends: VecDeque<(f64, f64)>,
    accumulated_s: f64,
}

impl DutyLimiter {
    /// `window_s` is the rolling duty-cycle window; `cap_fraction` the
    /// regulation- or `Intention`-derived airtime cap in `[0, 1]`.
    pub fn new(window_s: f64, cap_fraction: f64) -> Self {
        Self {
            window_s: window_s.max(0.001),
            cap_fraction: cap_fraction.clamp(0.0, 1.0),
            spends: VecDeque::new(),
            accumulated_s: 0.0,
        }
    }

    fn evict_before(&mut self, now_s: f64) {
        let horizon = now_s - self.window_s;
        while let Some(&(ts, airtime)) = self.spends.front() {
            if ts < horizon {
                self.spends.pop_front();
                self.accumulated_s -= airtime;
            } else {
                break;
            }
        }
        if self.accumulated_s < 0.0 {
            self.accumulated_s = 0.0;
        }
    }

    /// Fraction of the duty budget still available at `now_s`, in `[0, 1]`.
    pub fn duty_left(&mut self, now_s: f64) -> f64 {
        self.evict_before(now_s);
        let cap_s = self.cap_fraction * self.window_s;
        if cap_s <= 0.0 {
            return 0.0;
        }
        (1.0 - self.accumulated_s / cap_s).clamp(0.0, 1.0)
    }

    /// Attempt to spend `airtime_s` of transmit time at `now_s`. Returns
    /// `false` (duty-cycle exhausted, §7) without mutating state when the
    /// spend would exceed the cap within the window.
    pub fn try_spend(&mut self, now_s: f64, airtime_s: f64) -> bool {
        self.evict_before(now_s);
        let cap_s = self.cap_fraction * self.window_s;
        if self.accumulated_s + airtime_s > cap_s {
            return false;
        }
        self.spends.push_back((now_s, airtime_s));
        self.accumulated_s += airtime_s;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duty_left_starts_at_one() {
        let mut limiter = DutyLimiter::new(10.0, 0.1);
        assert_eq!(limiter.duty_left(0.0), 1.0);
    }

    #[test]
    fn spend_reduces_duty_left_and_rejects_overspend() {
        let mut limiter = DutyLimiter::new(10.0, 0.1); // 1s cap in a 10s window
        assert!(limiter.try_spend(0.0, 0.4));
        assert!(limiter.duty_left(0.0) < 1.0);
        assert!(!limiter.try_spend(0.0, 0.7), "spend beyond the cap must be rejected");
    }

    #[test]
    fn old_spends_fall_out_of_window() {
        let mut limiter = DutyLimiter::new(5.0, 0.2); // 1s cap
        assert!(limiter.try_spend(0.0, 0.9));
        assert!(limiter.duty_left(0.0) < 1.0);
        // Past the 5s window, the old spend should no longer count.
        assert_eq!(limiter.duty_left(6.0), 1.0);
    }

    #[test]
    fn bounds_are_respected_under_repeated_spends() {
        let mut limiter = DutyLimiter::new(20.0, 0.5);
        let mut now = 0.0;
        for _ in 0..100 {
            limiter.try_spend(now, 0.05);
            let left = limiter.duty_left(now);
            assert!((0.0..=1.0).contains(&left));
            now += 0.3;
        }
    }
}
