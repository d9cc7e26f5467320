//! The per-step joint decision maker (§4.3) and its regime state machine
//! (§4.4's mapping, applied here per the spec's "in Optimizer.update_mode").

use crate::bandit::{ArgmaxSelector, UcbSelector};
use crate::decision::{Decision, NetworkState};
use crate::{model, reliability, selector, timing};
use aurora_channel::ChannelState;
use aurora_core::config::Intention;
use aurora_core::prng::Xorshift64;
use aurora_core::{Mode, Regime, SafetyStatus};
use aurora_safety::RegimeInputs;

/// Owns the bandit/argmax selectors and the current operating regime.
#[derive(Debug, Clone)]
pub struct Optimizer {
    ucb: UcbSelector,
    argmax: ArgmaxSelector,
    regime: Regime,
}

impl Default for Optimizer {
    fn default() -> Self {
        Self {
            ucb: UcbSelector::new(),
            argmax: ArgmaxSelector::new(),
            regime: Regime::Normal,
        }
    }
}

impl Optimizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn regime(&self) -> Regime {
        self.regime
    }

    /// Joint mode/attempts/redundancy/timing decision for one step (§4.3).
    pub fn decide(
        &mut self,
        intention: &Intention,
        net: &NetworkState,
        chan: &ChannelState,
        rng: &mut Xorshift64,
    ) -> Decision {
        let mode = selector::select_mode(intention, net.soc_src, chan, &self.ucb, &mut self.argmax);

        let target_r = reliability::target_reliability(net.priority, net.emergency_mode, self.regime);
        let urgency = reliability::urgency(
            net.symbols_have,
            net.symbols_need,
            net.deadline_left_s,
            net.deadline_total_s,
        );
        let budget = reliability::budget(urgency, net.duty_left_rf);

        let per = model::per_est(chan, mode);
        let p_s = 1.0 - per;
        let tries = model::solve_tries(target_r, p_s, budget, self.regime);
        let redundancy_hint = model::redundancy_hint(target_r, per, self.regime, net.priority);

        let t = timing::compute(net.duty_left_rf, net.soc_src, urgency, rng);

        Decision {
            mode,
            tries,
            redundancy_hint,
            jitter_ms: t.jitter_ms,
            min_spacing_ms: t.min_spacing_ms,
            preamble_sym: t.preamble_sym,
            rf_bw_khz: t.rf_bw_khz,
            emergency: net.emergency_mode,
            covert_seq: net.covert_seq,
        }
    }

    /// Fold in this step's outcome: `reward = ok_count / max(1, tries_real)`,
    /// clamped to `[0, 1]` (§4.3).
    pub fn feedback(&mut self, mode: Mode, ok_count: u32, tries_real: u32) {
        let reward = ok_count as f64 / tries_real.max(1) as f64;
        self.ucb.update(mode, reward.clamp(0.0, 1.0));
    }

    /// Map the safety classification onto an operating regime (§4.4) and log
    /// a single line if it changed.
    pub fn update_mode(&mut self, status: SafetyStatus, inputs: RegimeInputs) -> Regime {
        let next = match status {
            SafetyStatus::Critical => Regime::Conservative,
            SafetyStatus::Degraded => Regime::Normal,
            SafetyStatus::Healthy => {
                if inputs.nerve_fail < 0.05
                    && inputs.gland_fail < 0.05
                    && inputs.nerve_cov > 0.95
                    && inputs.gland_cov > 0.95
                {
                    Regime::Aggressive
                } else {
                    Regime::Normal
                }
            }
        };
        if next != self.regime {
            tracing::info!(from = %self.regime, to = %next, "operating regime changed");
            self.regime = next;
        }
        next
    }
}
