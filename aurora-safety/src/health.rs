//! Per-flow-class health EWMAs (§3 `FlowHealth`, §4.5 step 10) and the
//! regime-mapping inputs they feed into the optimizer (§4.4).

use aurora_core::FlowClass;

const ALPHA_COV: f64 = 0.2;
const ALPHA_FAIL: f64 = 0.1;
const ALPHA_PANIC: f64 = 0.1;

/// Rolling health picture for one [`FlowClass`], maintained at engine scope
/// and refreshed once per step from that step's `Organism::integrate`
/// outcome (§4.5 step 10).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowHealth {
    pub ewma_coverage: f64,
    pub ewma_fail_rate: f64,
    pub ewma_panic_rate: f64,
    pub success_count: u64,
    pub fail_count: u64,
    pub recent_good_streak: u32,
    pub recent_bad_streak: u32,
}

impl Default for FlowHealth {
    fn default() -> Self {
        Self {
            ewma_coverage: 0.0,
            ewma_fail_rate: 0.0,
            ewma_panic_rate: 0.0,
            success_count: 0,
            fail_count: 0,
            recent_good_streak: 0,
            recent_bad_streak: 0,
        }
    }
}

impl FlowHealth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold in one step's integrate outcome for this flow class.
    pub fn observe(&mut self, coverage: f64, delivered: bool, panicking: bool, good_streak: u32, bad_streak: u32) {
        self.ewma_coverage = ALPHA_COV * coverage + (1.0 - ALPHA_COV) * self.ewma_coverage;
        let fail_sample = if delivered { 0.0 } else { 1.0 };
        self.ewma_fail_rate = ALPHA_FAIL * fail_sample + (1.0 - ALPHA_FAIL) * self.ewma_fail_rate;
        let panic_sample = if panicking { 1.0 } else { 0.0 };
        self.ewma_panic_rate = ALPHA_PANIC * panic_sample + (1.0 - ALPHA_PANIC) * self.ewma_panic_rate;
        if delivered {
            self.success_count += 1;
        } else {
            self.fail_count += 1;
        }
        self.recent_good_streak = good_streak;
        self.recent_bad_streak = bad_streak;
    }
}

/// The subset of per-class health the §4.4 regime mapping reads when
/// deciding whether `HEALTHY` telemetry can promote the optimizer all the
/// way to `AGGRESSIVE`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegimeInputs {
    pub nerve_fail: f64,
    pub gland_fail: f64,
    pub nerve_cov: f64,
    pub gland_cov: f64,
}

impl RegimeInputs {
    pub fn from_health(by_class: impl Fn(FlowClass) -> FlowHealth) -> Self {
        let nerve = by_class(FlowClass::Nerve);
        let gland = by_class(FlowClass::Gland);
        Self {
            nerve_fail: nerve.ewma_fail_rate,
            gland_fail: gland.ewma_fail_rate,
            nerve_cov: nerve.ewma_coverage,
            gland_cov: gland.ewma_coverage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coverage_ewma_tracks_repeated_success() {
        let mut h = FlowHealth::new();
        for _ in 0..20 {
            h.observe(1.0, true, false, 5, 0);
        }
        assert!(h.ewma_coverage > 0.95);
        assert!(h.ewma_fail_rate < 0.05);
    }

    #[test]
    fn fail_rate_ewma_tracks_repeated_failure() {
        let mut h = FlowHealth::new();
        for _ in 0..20 {
            h.observe(0.1, false, true, 0, 5);
        }
        assert!(h.ewma_fail_rate > 0.8);
        assert!(h.ewma_panic_rate > 0.8);
    }

    #[test]
    fn counts_accumulate_independent_of_ewmas() {
        let mut h = FlowHealth::new();
        h.observe(1.0, true, false, 1, 0);
        h.observe(0.0, false, true, 0, 1);
        assert_eq!(h.success_count, 1);
        assert_eq!(h.fail_count, 1);
    }

    #[test]
    fn regime_inputs_reads_nerve_and_gland_only() {
        let mut nerve = FlowHealth::new();
        nerve.observe(1.0, true, false, 10, 0);
        let mut gland = FlowHealth::new();
        gland.observe(0.9, true, false, 10, 0);
        let inputs = RegimeInputs::from_health(|class| match class {
            FlowClass::Nerve => nerve,
            FlowClass::Gland => gland,
            FlowClass::Muscle => FlowHealth::new(),
        });
        assert_eq!(inputs.nerve_cov, nerve.ewma_coverage);
        assert_eq!(inputs.gland_cov, gland.ewma_coverage);
    }
}
