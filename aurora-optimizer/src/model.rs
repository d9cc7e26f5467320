//! Per-attempt success modeling: `per_from_snr`, the blended `per_est`, the
//! attempt-count solve, and the redundancy hint (§4.3).

use aurora_channel::ChannelState;
use aurora_core::{Mode, Regime};

fn mode_logistic_params(mode: Mode) -> (f64, f64) {
    match mode {
        Mode::Rf => (-7.5, 0.9),
        Mode::Ir => (4.0, 1.1),
        Mode::Backscatter => (1.5, 1.0),
    }
}

/// The SNR (dB) at which `mode`'s logistic PER model crosses 0.5 (§4.3).
/// Exposed so the engine's outcome classifier (§4.5 step 6, `snr_eff >
/// mode_threshold`) shares the same per-mode threshold the optimizer's own
/// attempt-count solve uses, rather than hand-copying the constants.
pub fn mode_threshold_db(mode: Mode) -> f64 {
    mode_logistic_params(mode).0
}

/// Logistic PER model centered on a mode-specific SNR threshold.
pub fn per_from_snr(snr_db: f64, mode: Mode) -> f64 {
    let (x0, k) = mode_logistic_params(mode);
    1.0 / (1.0 + (k * (snr_db - x0)).exp())
}

/// Blend of historical PER and the SNR-derived logistic model, weighted by
/// the channel's jamming score (§4.3).
pub fn per_est(chan: &ChannelState, mode: Mode) -> f64 {
    let w = (0.5 + 0.4 * chan.jamming_score()).clamp(0.1, 0.9);
    let modeled = per_from_snr(chan.snr_db(mode), mode);
    (w * chan.per_history(mode) + (1.0 - w) * modeled).clamp(0.0, 1.0)
}

fn attempt_cap(budget: f64, regime: Regime) -> u32 {
    let base: i64 = if budget >= 0.5 {
        48
    } else if budget >= 0.25 {
        32
    } else {
        20
    };
    let adjust: i64 = match regime {
        Regime::Conservative => -8,
        Regime::Normal => 0,
        Regime::Aggressive => 8,
    };
    (base + adjust).max(1) as u32
}

/// `tries = clamp(ceil(ln(1-R) / ln(1-p_s)), 1, cap)` (§4.3).
pub fn solve_tries(target_reliability: f64, p_s: f64, budget: f64, regime: Regime) -> u32 {
    let cap = attempt_cap(budget, regime);
    let p_s = p_s.clamp(1e-6, 1.0 - 1e-9);
    let r = target_reliability.min(1.0 - 1e-12);
    let ratio = (1.0 - r).ln() / (1.0 - p_s).ln();
    if !ratio.is_finite() || ratio <= 0.0 {
        return 1;
    }
    (ratio.ceil() as u32).clamp(1, cap)
}

/// `redundancy = max(5, ceil(0.6 * ln(1-R) / ln(per)))`, regime/priority
/// adjusted (§4.3).
pub fn redundancy_hint(
    target_reliability: f64,
    per: f64,
    regime: Regime,
    priority: aurora_core::Priority,
) -> u32 {
    use aurora_core::Priority;

    let per = per.clamp(1e-9, 1.0 - 1e-9);
    let r = target_reliability.min(1.0 - 1e-12);
    let raw = 0.6 * (1.0 - r).ln() / per.ln();
    let base = if raw.is_finite() { raw.ceil().max(0.0) } else { 0.0 } as u32;
    let base = base.max(5);

    let scaled = match (regime, priority) {
        (Regime::Conservative, Priority::Critical | Priority::Normal) => (base as f64 * 1.2).ceil() as u32,
        (Regime::Aggressive, Priority::Bulk) => (base as f64 * 0.9).ceil() as u32,
        _ => base,
    };
    scaled.max(3)
}
