//! Target reliability `R` derivation (§4.3).

use aurora_core::{Priority, Regime};

/// Baseline from priority, raised for emergencies, then regime-adjusted.
pub fn target_reliability(priority: Priority, emergency_mode: bool, regime: Regime) -> f64 {
    let mut r = priority.base_reliability();
    if emergency_mode {
        r = r.max(0.999);
    }
    match (regime, priority) {
        (Regime::Conservative, Priority::Critical | Priority::Normal) => r = r.max(0.995),
        (Regime::Aggressive, Priority::Bulk) => r = (r - 0.05).max(0.85),
        _ => {}
    }
    r
}

/// `urgency = max(time_press, sym_press)` (§4.3). `need == 0` means the
/// segment is already fully covered, so symbol pressure is zero regardless
/// of `have`.
pub fn urgency(have: u64, need: u64, deadline_left_s: f64, deadline_total_s: f64) -> f64 {
    let dl_total = deadline_total_s.max(1e-9);
    let dl_left_frac = (deadline_left_s / dl_total).clamp(0.0, 1.0);
    let time_press = 1.0 - (-6.0 * (1.0 - dl_left_frac)).exp();

    let sym_press = if need == 0 {
        0.0
    } else {
        let frac = (need as f64 - have as f64) / need as f64;
        sigmoid(10.0 * (frac - 0.5))
    };

    time_press.max(sym_press)
}

/// Per-step duty spend allocation (§4.3).
pub fn budget(urgency: f64, duty_left: f64) -> f64 {
    let hi = duty_left.max(0.02);
    let lo = 0.02_f64.min(duty_left);
    let raw = (0.6 * duty_left).min(0.1 + 0.7 * urgency * duty_left);
    raw.clamp(lo, hi)
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn critical_base_is_highest() {
        assert!(Priority::Critical.base_reliability() > Priority::Normal.base_reliability());
        assert!(Priority::Normal.base_reliability() > Priority::Bulk.base_reliability());
    }

    #[test]
    fn emergency_raises_any_priority_to_999() {
        let r = target_reliability(Priority::Bulk, true, Regime::Normal);
        assert!(r >= 0.999);
    }

    #[test]
    fn conservative_raises_critical_and_normal() {
        let r = target_reliability(Priority::Normal, false, Regime::Conservative);
        assert!(r >= 0.995);
    }

    #[test]
    fn aggressive_lowers_bulk_with_floor() {
        let r = target_reliability(Priority::Bulk, false, Regime::Aggressive);
        assert!(r >= 0.85);
        assert!(r <= Priority::Bulk.base_reliability());
    }

    #[test]
    fn urgency_rises_as_deadline_closes_in() {
        let early = urgency(0, 100, 29.0, 30.0);
        let late = urgency(0, 100, 1.0, 30.0);
        assert!(late >= early);
    }

    #[test]
    fn urgency_rises_when_far_from_complete() {
        let close = urgency(95, 100, 30.0, 30.0);
        let far = urgency(5, 100, 30.0, 30.0);
        assert!(far >= close);
    }

    #[test]
    fn budget_never_exceeds_duty_left() {
        for urgency in [0.0, 0.5, 1.0] {
            for duty_left in [0.0, 0.01, 0.5, 1.0] {
                let b = budget(urgency, duty_left);
                assert!(b <= duty_left.max(0.02) + 1e-12);
                assert!(b >= 0.0);
            }
        }
    }
}
