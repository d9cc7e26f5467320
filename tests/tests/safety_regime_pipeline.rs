//! The safety monitor and optimizer are separate crates; together they
//! implement "ten samples at `duty_left=0.15` drives the regime to
//! CONSERVATIVE" (§8) as a two-stage pipeline rather than a single
//! hand-constructed `SafetyStatus`.

use aurora_core::{Regime, SafetyStatus};
use aurora_optimizer::Optimizer;
use aurora_safety::{RegimeInputs, SafetyMonitor, TelemetrySample};

#[test]
fn sustained_low_duty_drives_optimizer_to_conservative() {
    let mut monitor = SafetyMonitor::new();
    for _ in 0..10 {
        monitor.observe(TelemetrySample {
            duty_left: 0.15,
            nerve_fail_rate: 0.0,
            gland_fail_rate: 0.0,
            muscle_fail_rate: 0.0,
        });
    }
    assert_eq!(monitor.classify(), SafetyStatus::Critical);

    let mut optimizer = Optimizer::new();
    let inputs = RegimeInputs {
        nerve_fail: 0.0,
        gland_fail: 0.0,
        nerve_cov: 1.0,
        gland_cov: 1.0,
    };
    let regime = optimizer.update_mode(monitor.classify(), inputs);
    assert_eq!(regime, Regime::Conservative);
}

#[test]
fn recovering_duty_eventually_returns_to_normal_or_better() {
    let mut monitor = SafetyMonitor::new();
    for _ in 0..10 {
        monitor.observe(TelemetrySample {
            duty_left: 0.15,
            nerve_fail_rate: 0.0,
            gland_fail_rate: 0.0,
            muscle_fail_rate: 0.0,
        });
    }
    let mut optimizer = Optimizer::new();
    let inputs = RegimeInputs {
        nerve_fail: 0.0,
        gland_fail: 0.0,
        nerve_cov: 1.0,
        gland_cov: 1.0,
    };
    optimizer.update_mode(monitor.classify(), inputs);

    for _ in 0..50 {
        monitor.observe(TelemetrySample {
            duty_left: 0.95,
            nerve_fail_rate: 0.0,
            gland_fail_rate: 0.0,
            muscle_fail_rate: 0.0,
        });
    }
    let regime = optimizer.update_mode(monitor.classify(), inputs);
    assert_ne!(regime, Regime::Conservative);
}
