//! Interactive single-token driver: wires telemetry, stdout health events,
//! and config hot-reload, and runs in real time (§6, §9).

use crate::scenario::{parse_flow_class, parse_priority, ScenarioSpec};
use anyhow::Result;
use aurora_core::config::{ConfigReloader, Intention, Selector};
use aurora_core::prng::Xorshift64;
use aurora_crypto::{keypair, Token};
use aurora_engine::telemetry::TelemetrySink;
use aurora_engine::{Engine, EngineOptions, EngineState};
use aurora_hal::SimulatedHal;
use aurora_organism::FlowProfile;
use std::io::stdout;
use std::path::PathBuf;

/// Flags specific to the interactive driver (parsed from clap in `main.rs`).
pub struct InteractiveArgs {
    pub flow_class: String,
    pub priority: String,
    pub deadline_s: f64,
    pub payload_bytes: usize,
    pub duty: f64,
    pub optical: bool,
    pub backscatter: bool,
    pub seed: u64,
    pub config_path: PathBuf,
    pub max_steps: u64,
}

/// Run a single token to completion in real time, streaming telemetry and
/// health events as it goes. Returns whether the token was delivered.
pub fn run_interactive(args: &InteractiveArgs) -> Result<bool> {
    let flow_class = parse_flow_class(&args.flow_class)?;
    let priority = parse_priority(&args.priority)?;
    let spec = ScenarioSpec {
        name: "interactive".to_string(),
        flow_class,
        priority,
        deadline_s: args.deadline_s,
        payload_bytes: args.payload_bytes,
        duty: args.duty,
        optical: args.optical,
        backscatter: args.backscatter,
        seed: args.seed,
    };

    let mut rng = Xorshift64::new(spec.seed ^ 0x50_41_59_4C_4F_41_44);
    let payload: Vec<u8> = (0..spec.payload_bytes).map(|_| rng.next_u32() as u8).collect();
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
    options.max_steps = args.max_steps;
    options.emit_health_events = true;

    let telemetry = TelemetrySink::open_default()?;
    let reloader = ConfigReloader::new(args.config_path.clone());

    let mut engine = Engine::new(token, profile, intention, hal, options)
        .with_telemetry(telemetry)
        .with_health_output(Box::new(stdout()))
        .with_config_reloader(reloader)
        .with_realtime(true);

    let outcome = engine.run();
    tracing::info!(
        state = ?outcome.state,
        coverage = outcome.coverage,
        steps = outcome.steps,
        elapsed_s = outcome.elapsed_s,
        "interactive run complete"
    );
    Ok(outcome.state == EngineState::Delivered)
}
