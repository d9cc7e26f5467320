//! Sliding-window safety classifier (§4.4).
//!
//! Holds the last 50 per-step telemetry samples and classifies the link as
//! `HEALTHY`/`DEGRADED`/`CRITICAL` from the window's minimum observed duty
//! budget and mean per-class failure rate. Fewer than 5 samples always reads
//! `HEALTHY` — there isn't enough history yet to call anything worse.

use aurora_core::SafetyStatus;
use std::collections::VecDeque;

const WINDOW_LEN: usize = 50;
const MIN_SAMPLES: usize = 5;

/// One step's worth of duty/fail-rate telemetry (§4.4).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetrySample {
    pub duty_left: f64,
    pub nerve_fail_rate: f64,
    pub gland_fail_rate: f64,
    pub muscle_fail_rate: f64,
}

impl TelemetrySample {
    fn avg_fail_rate(&self) -> f64 {
        (self.nerve_fail_rate + self.gland_fail_rate + self.muscle_fail_rate) / 3.0
    }
}

/// Sliding window of [`TelemetrySample`]s feeding the §4.4 classifier.
#[derive(Debug, Clone, Default)]
pub struct SafetyMonitor {
    samples: VecDeque<TelemetrySample>,
}

impl SafetyMonitor {
    pub fn new() -> Self {
        Self {
            samples: VecDeque::with_capacity(WINDOW_LEN),
        }
    }

    /// Append one sample, evicting the oldest once the window is full.
    pub fn observe(&mut self, sample: TelemetrySample) {
        if self.samples.len() == WINDOW_LEN {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Minimum `duty_left` observed across the window.
    pub fn min_duty(&self) -> f64 {
        self.samples
            .iter()
            .map(|s| s.duty_left)
            .fold(f64::INFINITY, f64::min)
    }

    /// Mean of the three per-class failure rates, averaged over the window.
    pub fn avg_fail_rate(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.samples.iter().map(TelemetrySample::avg_fail_rate).sum();
        sum / self.samples.len() as f64
    }

    /// Classify current link health (§4.4).
    pub fn classify(&self) -> SafetyStatus {
        if self.samples.len() < MIN_SAMPLES {
            return SafetyStatus::Healthy;
        }
        let min_duty = self.min_duty();
        let avg_fail = self.avg_fail_rate();
        if min_duty < 0.2 || avg_fail > 0.3 {
            SafetyStatus::Critical
        } else if min_duty < 0.3 || avg_fail > 0.21 {
            SafetyStatus::Degraded
        } else {
            SafetyStatus::Healthy
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(duty_left: f64, fail: f64) -> TelemetrySample {
        TelemetrySample {
            duty_left,
            nerve_fail_rate: fail,
            gland_fail_rate: fail,
            muscle_fail_rate: fail,
        }
    }

    #[test]
    fn fewer_than_five_samples_is_always_healthy() {
        let mut m = SafetyMonitor::new();
        for _ in 0..4 {
            m.observe(sample(0.05, 0.9));
        }
        assert_eq!(m.classify(), SafetyStatus::Healthy);
    }

    #[test]
    fn low_duty_held_steady_reports_critical() {
        let mut m = SafetyMonitor::new();
        for _ in 0..10 {
            m.observe(sample(0.15, 0.0));
        }
        assert_eq!(m.classify(), SafetyStatus::Critical);
    }

    #[test]
    fn high_fail_rate_reports_critical() {
        let mut m = SafetyMonitor::new();
        for _ in 0..10 {
            m.observe(sample(0.9, 0.35));
        }
        assert_eq!(m.classify(), SafetyStatus::Critical);
    }

    #[test]
    fn moderate_degradation_reports_degraded_not_critical() {
        let mut m = SafetyMonitor::new();
        for _ in 0..10 {
            m.observe(sample(0.25, 0.05));
        }
        assert_eq!(m.classify(), SafetyStatus::Degraded);
    }

    #[test]
    fn comfortable_margins_report_healthy() {
        let mut m = SafetyMonitor::new();
        for _ in 0..10 {
            m.observe(sample(0.9, 0.01));
        }
        assert_eq!(m.classify(), SafetyStatus::Healthy);
    }

    #[test]
    fn window_evicts_beyond_fifty_samples() {
        let mut m = SafetyMonitor::new();
        for _ in 0..80 {
            m.observe(sample(0.9, 0.0));
        }
        assert_eq!(m.sample_count(), 50);
    }
}
