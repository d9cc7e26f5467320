//! The immune-system-style feedback law that sizes per-segment redundancy
//! (§4.2 "Adaptation rule").

use crate::flow::FlowState;
use aurora_core::{FlowClass, GenotypeParams};

impl FlowState {
    /// Apply one `integrate` outcome to this flow's adaptation state.
    ///
    /// `symbols_used`/`total_symbols_seen` come from
    /// [`aurora_fec::SegmentedOutcome`], summed across both segments.
    #[allow(clippy::too_many_arguments)]
    pub fn adapt(
        &mut self,
        flow_class: FlowClass,
        coverage: f64,
        delivered: bool,
        symbols_used: usize,
        total_symbols_seen: usize,
        gp: GenotypeParams,
        panic_steps: u32,
    ) {
        self.age += 1;

        // 1. Coverage EWMA, initialized to the first observed coverage.
        self.avg_coverage = if self.initialized {
            0.2 * coverage + 0.8 * self.avg_coverage
        } else {
            coverage
        };
        self.initialized = true;

        // 2. Streak/counter bookkeeping.
        if delivered {
            self.success_count += 1;
            self.good_streak += 1;
            self.bad_streak = 0;
        } else {
            self.fail_count += 1;
            self.bad_streak += 1;
            self.good_streak = 0;
        }

        // 3. Failure path.
        if !delivered {
            self.crit_overhead += gp.alpha_up * gp.panic_mult;
            self.bulk_overhead += 0.5 * gp.alpha_up * gp.panic_mult;
            if matches!(flow_class, FlowClass::Nerve | FlowClass::Gland) {
                self.panic_boost = self.panic_boost.max(panic_steps);
                self.crit_overhead += gp.alpha_up * gp.panic_mult;
                if self.bad_streak >= 3 {
                    self.crit_overhead += 0.5 * gp.alpha_up * gp.panic_mult;
                    self.bulk_overhead += 0.5 * gp.alpha_up * gp.panic_mult;
                }
            }
        }

        // 4. Thinning after an efficient success.
        if delivered && total_symbols_seen > 0 {
            let efficiency = symbols_used as f64 / total_symbols_seen as f64;
            if efficiency < 0.5 {
                self.crit_overhead -= gp.alpha_down;
                self.bulk_overhead -= gp.alpha_down;
            }
        }

        // 5. Calm-state thinning.
        if delivered && self.panic_boost == 0 && self.good_streak >= 4 && self.avg_coverage >= 0.85 {
            let thin_mult = if matches!(flow_class, FlowClass::Muscle) { 1.5 } else { 1.0 };
            self.crit_overhead -= gp.alpha_down * thin_mult;
            self.bulk_overhead -= gp.alpha_down * thin_mult;
        }

        // 6. Clamp.
        self.crit_overhead = self
            .crit_overhead
            .clamp(self.base_crit_overhead.max(1.0), gp.max_overhead);
        self.bulk_overhead = self
            .bulk_overhead
            .clamp(self.base_bulk_overhead.max(1.0), gp.max_overhead);
    }

    /// Decrement a live panic boost by one step, called once per `spawn` (§4.2).
    pub fn decay_panic_boost(&mut self) {
        self.panic_boost = self.panic_boost.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurora_core::{FlowClass, Genotype};

    fn gp() -> GenotypeParams {
        Genotype::Baseline.params(0.10, 0.02)
    }

    #[test]
    fn failure_never_decreases_crit_overhead() {
        let mut fs = FlowState::new(FlowClass::Gland, None);
        let before = fs.crit_overhead;
        fs.adapt(FlowClass::Gland, 0.4, false, 0, 1, gp(), 3);
        assert!(fs.crit_overhead >= before);
    }

    #[test]
    fn nerve_gland_failure_arms_panic_boost() {
        let mut fs = FlowState::new(FlowClass::Nerve, None);
        fs.adapt(FlowClass::Nerve, 0.2, false, 0, 1, gp(), 3);
        assert!(fs.panic_boost >= 3);
    }

    #[test]
    fn muscle_failure_does_not_arm_panic_boost() {
        let mut fs = FlowState::new(FlowClass::Muscle, None);
        fs.adapt(FlowClass::Muscle, 0.2, false, 0, 1, gp(), 3);
        assert_eq!(fs.panic_boost, 0);
    }

    #[test]
    fn calm_success_streak_thins_overhead() {
        let mut fs = FlowState::new(FlowClass::Gland, None);
        // Drive coverage/avg_coverage up and build a good streak without
        // ever calling through panic paths.
        for _ in 0..5 {
            fs.adapt(FlowClass::Gland, 1.0, true, 10, 12, gp(), 3);
        }
        assert!(fs.good_streak >= 4);
        let before = fs.crit_overhead;
        fs.adapt(FlowClass::Gland, 1.0, true, 10, 12, gp(), 3);
        assert!(fs.crit_overhead <= before);
    }

    #[test]
    fn overhead_stays_within_bounds() {
        let mut fs = FlowState::new(FlowClass::Nerve, None);
        for _ in 0..50 {
            fs.adapt(FlowClass::Nerve, 0.1, false, 0, 1, gp(), 3);
        }
        let params = Genotype::Baseline.params(0.10, 0.02);
        assert!(fs.crit_overhead <= params.max_overhead);
        assert!(fs.crit_overhead >= fs.base_crit_overhead);
    }
}
