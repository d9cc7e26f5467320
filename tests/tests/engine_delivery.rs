//! End-to-end delivery across the three flow classes under a good channel:
//! the full `Engine::run` loop (optimizer decisions, HAL dispatch, fountain
//! decode, signature verification), not just the organism's spawn/integrate
//! contract in isolation.

use aurora_core::config::Intention;
use aurora_core::Priority;
use aurora_core::prng::Xorshift64;
use aurora_core::FlowClass;
use aurora_crypto::{keypair, Token};
use aurora_engine::{Engine, EngineOptions, EngineState};
use aurora_hal::SimulatedHal;
use aurora_organism::FlowProfile;

fn payload(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = Xorshift64::new(seed);
    (0..len).map(|_| rng.next_u32() as u8).collect()
}

fn run_good_channel(flow_class: FlowClass, priority: Priority, deadline_s: f64, len: usize, seed: u64) -> aurora_engine::RunOutcome {
    let bytes = payload(len, seed);
    let (_pk, sk) = keypair();
    let token = Token::new(bytes, deadline_s.ceil() as u64 + 10, seed, &sk);
    let profile = FlowProfile {
        deadline_s,
        reliability: priority.base_reliability(),
        duty_limit: 1.0,
        priority,
        flow_class,
        genotype_hint: None,
    };
    let intention = Intention {
        deadline_s,
        ..Intention::default()
    };
    let hal = SimulatedHal::new(seed);
    let mut options = EngineOptions::default();
    options.seed = seed;
    let mut engine = Engine::new(token, profile, intention, hal, options);
    engine.run()
}

#[test]
fn muscle_bulk_traffic_delivers_with_valid_signature() {
    let outcome = run_good_channel(FlowClass::Muscle, Priority::Bulk, 30.0, 1536, 101);
    assert_eq!(outcome.state, EngineState::Delivered);
    assert!(outcome.coverage >= 0.99);
    assert_eq!(outcome.signature_ok, Some(true));
}

#[test]
fn nerve_critical_traffic_delivers_with_valid_signature() {
    let outcome = run_good_channel(FlowClass::Nerve, Priority::Critical, 30.0, 512, 202);
    assert_eq!(outcome.state, EngineState::Delivered);
    assert!(outcome.coverage >= 0.99);
    assert_eq!(outcome.signature_ok, Some(true));
}

#[test]
fn gland_normal_traffic_delivers_with_valid_signature() {
    let outcome = run_good_channel(FlowClass::Gland, Priority::Normal, 30.0, 2048, 303);
    assert_eq!(outcome.state, EngineState::Delivered);
    assert!(outcome.coverage >= 0.99);
    assert_eq!(outcome.signature_ok, Some(true));
}
