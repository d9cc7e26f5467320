//! Shared scenario setup: builds the `Token`/`FlowProfile`/`Intention`/
//! `SimulatedHal` quadruple both drivers hand to [`aurora_engine::Engine`]
//! (§9: "implement once as a step function ... run it from both drivers").

use anyhow::{anyhow, Result};
use aurora_core::config::Intention;
use aurora_core::config::Selector;
use aurora_core::prng::Xorshift64;
use aurora_core::{FlowClass, Priority};
use aurora_crypto::{keypair, Token};
use aurora_engine::{Engine, EngineOptions, RunOutcome};
use aurora_hal::SimulatedHal;
use aurora_organism::FlowProfile;

/// One token-delivery run's static parameters, independent of whether it
/// comes from a batch CSV row or interactive CLI flags.
#[derive(Debug, Clone)]
pub struct ScenarioSpec {
    pub name: String,
    pub flow_class: FlowClass,
    pub priority: Priority,
    pub deadline_s: f64,
    pub payload_bytes: usize,
    pub duty: f64,
    pub optical: bool,
    pub backscatter: bool,
    pub seed: u64,
}

impl Default for ScenarioSpec {
    fn default() -> Self {
        Self {
            name: "interactive".to_string(),
            flow_class: FlowClass::Gland,
            priority: Priority::Normal,
            deadline_s: 30.0,
            payload_bytes: 2048,
            duty: 1.0,
            optical: true,
            backscatter: true,
            seed: 1,
        }
    }
}

pub fn parse_flow_class(s: &str) -> Result<FlowClass> {
    match s.to_ascii_uppercase().as_str() {
        "NERVE" => Ok(FlowClass::Nerve),
        "GLAND" => Ok(FlowClass::Gland),
        "MUSCLE" => Ok(FlowClass::Muscle),
        other => Err(anyhow!("unknown flow class '{other}' (expected NERVE/GLAND/MUSCLE)")),
    }
}

pub fn parse_priority(s: &str) -> Result<Priority> {
    match s.to_ascii_uppercase().as_str() {
        "CRITICAL" => Ok(Priority::Critical),
        "NORMAL" => Ok(Priority::Normal),
        "BULK" => Ok(Priority::Bulk),
        other => Err(anyhow!("unknown priority '{other}' (expected CRITICAL/NORMAL/BULK)")),
    }
}

/// Deterministic pseudo-random payload of `len` bytes, seeded so batch runs
/// are reproducible without pulling a general-purpose RNG into this crate.
fn synthetic_payload(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = Xorshift64::new(seed ^ 0x50_41_59_4C_4F_41_44);
    (0..len).map(|_| rng.next_u32() as u8).collect()
}

/// Build and run one scenario to completion against a [`SimulatedHal`].
pub fn run_scenario(spec: &ScenarioSpec, max_steps: u64, realtime: bool) -> RunOutcome {
    let payload = synthetic_payload(spec.payload_bytes, spec.seed);
    let (_pk, sk) = keypair();
    let ttl_s = spec.deadline_s.ceil() as u64 + 5;
    let token = Token::new(payload, ttl_s, spec.seed, &sk);

    let profile = FlowProfile {
        deadline_s: spec.deadline_s,
        reliability: spec.priority.base_reliability(),
        duty_limit: spec.duty,
        priority: spec.priority,
        flow_class: spec.flow_class,
        genotype_hint: None,
    };
    let intention = Intention {
        deadline_s: spec.deadline_s,
        reliability: spec.priority.base_reliability(),
        duty: spec.duty,
        optical: spec.optical,
        backscatter: spec.backscatter,
        ris_tiles: 0,
        selector: Selector::Ucb,
    };

    let hal = SimulatedHal::new(spec.seed);
    let mut options = EngineOptions::default();
    options.seed = spec.seed;
    options.max_steps = max_steps;

    let mut engine = Engine::new(token, profile, intention, hal, options).with_realtime(realtime);
    engine.run()
}
