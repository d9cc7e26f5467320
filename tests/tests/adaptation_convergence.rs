//! Five failing deliveries followed by ten succeeding ones should show the
//! organism's redundancy rise under repeated failure, then come back down
//! as it re-earns trust (§8 "adaptation rise-then-converge").

use aurora_core::prng::Xorshift64;
use aurora_core::{FlowClass, FlowKey, Priority};
use aurora_organism::{FlowProfile, Organism};

fn profile() -> FlowProfile {
    FlowProfile {
        deadline_s: 10.0,
        reliability: 0.97,
        duty_limit: 1.0,
        priority: Priority::Normal,
        flow_class: FlowClass::Gland,
        genotype_hint: None,
    }
}

fn payload(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = Xorshift64::new(seed);
    (0..len).map(|_| rng.next_u32() as u8).collect()
}

#[test]
fn overhead_rises_under_failure_then_converges_under_success() {
    let mut org = Organism::new(128);
    let key = FlowKey::new(FlowClass::Gland, Priority::Normal);
    let profile = profile();
    let bytes = payload(2048, 99);

    // Prime the flow state so it exists before we start measuring.
    let _ = org.spawn(&profile, "tok", &bytes, 1);
    let base_crit = org.flow_state(key).unwrap().base_crit_overhead;

    // Five failing integrates: feed no packets at all, guaranteeing
    // `delivered == false` every time.
    for _ in 0..5 {
        let outcome = org.integrate(&profile, "tok", &[]);
        assert!(!outcome.delivered);
    }
    let overhead_after_failures = org.flow_state(key).unwrap().crit_overhead;
    assert!(
        overhead_after_failures > base_crit,
        "overhead should have risen above the base after five failures"
    );

    // Ten succeeding integrates: feed a fresh, fully redundant encode of
    // the same payload each time so decode always completes.
    for i in 0..10 {
        let respawn = org.spawn(&profile, "tok", &bytes, 1000 + i);
        let outcome = org.integrate(&profile, "tok", &respawn.packets);
        assert!(outcome.delivered, "fully redundant encode must decode");
    }
    let overhead_after_successes = org.flow_state(key).unwrap().crit_overhead;
    assert!(
        overhead_after_successes < overhead_after_failures,
        "ten clean deliveries should thin overhead back down from its failure peak"
    );
    assert!(overhead_after_successes >= base_crit, "overhead never drops below its base");
}
