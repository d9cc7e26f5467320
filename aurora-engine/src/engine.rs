//! The orchestration loop (§4.5): token lifecycle, the single step
//! function, and the adaptive inter-step/inter-attempt sleeps.
//!
//! Grounded in the teacher's daemon main loop / session manager: one
//! `step()` call per tick, invoked identically from both drivers (§9
//! redesign flag: "implement once as a step function ... run it from both
//! drivers") — here, `aurora-cli`'s batch and interactive binaries both
//! call [`Engine::step`] in a loop rather than duplicating it.

use crate::channel_model;
use crate::node::{DestNode, SourceNode};
use crate::telemetry::{HealthEvent, TelemetryRecord, TelemetrySink};
use aurora_channel::{ChannelState, DutyLimiter, EnergyStore};
use aurora_core::config::{ConfigReloader, Intention};
use aurora_core::prng::Xorshift64;
use aurora_core::{FlowClass, Mode, Priority};
use aurora_crypto::Token;
use aurora_fec::Packet;
use aurora_hal::Hal;
use aurora_optimizer::{NetworkState, Optimizer};
use aurora_organism::{FlowProfile, Organism};
use aurora_safety::{FlowHealth, RegimeInputs, SafetyMonitor, TelemetrySample};
use std::collections::HashMap;
use std::io::Write;

/// Default per-node energy store capacity, in joules.
pub const DEFAULT_ENERGY_CAPACITY_J: f64 = 50.0;
/// Ambient energy harvest rate, in joules/second, applied once per step.
pub const HARVEST_RATE_J_PER_S: f64 = 0.03;
/// Rolling duty-cycle window, in seconds (§2 "Duty limiter").
pub const DUTY_WINDOW_S: f64 = 10.0;
/// Default max-steps cap for the batch driver (§4.5).
pub const DEFAULT_MAX_STEPS: u64 = 500;
/// Max-steps cap for the interactive-lab driver (§4.5, §9 open question).
pub const LAB_MAX_STEPS: u64 = 5000;
/// Interactive config reload poll cadence, in steps (§6).
pub const CONFIG_POLL_INTERVAL_STEPS: u64 = 20;

/// §4.5 lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Initializing,
    Running,
    Delivered,
    Timeout,
}

/// Per-step return value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub state: EngineState,
    pub coverage: f64,
    pub have: u64,
    pub need: u64,
    pub elapsed_s: f64,
}

/// Final return value of [`Engine::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub state: EngineState,
    pub payload: Option<Vec<u8>>,
    /// `None` until a payload is recovered; `Some(false)` is the §7
    /// `sig=BAD` path — the run is still reported `Delivered`.
    pub signature_ok: Option<bool>,
    pub coverage: f64,
    pub steps: u64,
    pub elapsed_s: f64,
}

/// Construction parameters outside the `Token`/`FlowProfile`/`Intention`
/// triple, broken out so tests can override energy/duty defaults without a
/// long positional constructor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineOptions {
    pub block_size: usize,
    pub energy_capacity_j: f64,
    pub initial_soc: f64,
    pub duty_window_s: f64,
    pub max_steps: u64,
    pub emit_health_events: bool,
    pub seed: u64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            block_size: 128,
            energy_capacity_j: DEFAULT_ENERGY_CAPACITY_J,
            initial_soc: 1.0,
            duty_window_s: DUTY_WINDOW_S,
            max_steps: DEFAULT_MAX_STEPS,
            emit_health_events: false,
            seed: 1,
        }
    }
}

/// Owns the organism/optimizer/safety-monitor triple, the channel
/// telemetry, the source/destination nodes, and the token lifecycle state
/// machine for delivering one token (§2, §3 "Ownership").
pub struct Engine<H: Hal> {
    hal: H,
    token: Token,
    profile: FlowProfile,
    intention: Intention,
    organism: Organism,
    optimizer: Optimizer,
    safety: SafetyMonitor,
    chan: ChannelState,
    duty: DutyLimiter,
    src: SourceNode,
    dst: DestNode,
    health: HashMap<FlowClass, FlowHealth>,
    rng: Xorshift64,
    state: EngineState,
    step: u64,
    elapsed_s: f64,
    next_sleep_s: f64,
    k_total: usize,
    delivered_payload: Option<Vec<u8>>,
    last_coverage: f64,
    covert_seq: u8,
    max_steps: u64,
    telemetry: Option<TelemetrySink>,
    health_out: Option<Box<dyn Write + Send>>,
    config_reloader: Option<ConfigReloader>,
    realtime: bool,
}

impl<H: Hal> Engine<H> {
    /// Construct a new engine and spawn the token's initial symbol queue
    /// (§4.5: "payload → Organism.spawn → symbol queue at source").
    pub fn new(token: Token, profile: FlowProfile, intention: Intention, hal: H, options: EngineOptions) -> Self {
        let mut organism = Organism::new(options.block_size);
        let spawn = organism.spawn(&profile, &token.id, &token.payload, options.seed);

        let mut health = HashMap::new();
        for class in [FlowClass::Nerve, FlowClass::Gland, FlowClass::Muscle] {
            health.insert(class, FlowHealth::new());
        }

        Self {
            hal,
            token,
            profile,
            intention: intention.clone(),
            organism,
            optimizer: Optimizer::new(),
            safety: SafetyMonitor::new(),
            chan: ChannelState::new(),
            duty: DutyLimiter::new(options.duty_window_s, intention.duty),
            src: SourceNode::new(EnergyStore::new(options.energy_capacity_j, options.initial_soc), spawn.packets),
            dst: DestNode::new(EnergyStore::new(options.energy_capacity_j, options.initial_soc)),
            health,
            rng: Xorshift64::new(options.seed),
            state: EngineState::Running,
            step: 0,
            elapsed_s: 0.0,
            next_sleep_s: 0.012,
            k_total: spawn.k_total,
            delivered_payload: None,
            last_coverage: 0.0,
            covert_seq: 0,
            max_steps: options.max_steps,
            telemetry: None,
            health_out: None,
            config_reloader: None,
            realtime: false,
        }
    }

    /// Attach a telemetry sink; steps after this call append a JSONL record
    /// each.
    pub fn with_telemetry(mut self, sink: TelemetrySink) -> Self {
        self.telemetry = Some(sink);
        self
    }

    /// Attach a destination for interactive stdout health events (§6).
    pub fn with_health_output(mut self, out: Box<dyn Write + Send>) -> Self {
        self.health_out = Some(out);
        self
    }

    /// Attach an interactive config reloader, polled every
    /// [`CONFIG_POLL_INTERVAL_STEPS`] (§6).
    pub fn with_config_reloader(mut self, reloader: ConfigReloader) -> Self {
        self.config_reloader = Some(reloader);
        self
    }

    /// Enable real-time sleeping (`std::thread::sleep`) between attempts and
    /// steps. Off by default so tests run instantly; the CLI binaries turn
    /// it on.
    pub fn with_realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn step_count(&self) -> u64 {
        self.step
    }

    pub fn elapsed_s(&self) -> f64 {
        self.elapsed_s
    }

    fn deadline_left_s(&self) -> f64 {
        (self.profile.deadline_s - self.elapsed_s).max(0.0)
    }

    fn sleep(&mut self, seconds: f64) {
        if seconds <= 0.0 {
            return;
        }
        if self.realtime {
            std::thread::sleep(std::time::Duration::from_secs_f64(seconds));
        }
        self.elapsed_s += seconds;
    }

    /// Run one step of the §4.5 loop. Returns the current [`StepOutcome`];
    /// once `state()` leaves [`EngineState::Running`] further calls are
    /// no-ops that just re-report the terminal outcome.
    pub fn step(&mut self) -> StepOutcome {
        if self.state != EngineState::Running {
            return self.outcome();
        }

        // 1. Time advance + harvest.
        let dt = self.next_sleep_s;
        self.src.harvest(HARVEST_RATE_J_PER_S * dt);
        self.dst.harvest(HARVEST_RATE_J_PER_S * dt);

        // 2. Symbol accounting (diagnostic only; surfaced via telemetry).
        let have = self.dst.have();

        // 3. Probe SNR for all three modes.
        for mode in Mode::ALL {
            let probe = self.probe_snr_db(mode);
            self.chan.observe_snr(mode, probe);
        }

        // 4. Priority + emergency mode from remaining deadline fraction.
        let deadline_left = self.deadline_left_s();
        let frac_left = if self.profile.deadline_s > 0.0 {
            (deadline_left / self.profile.deadline_s).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let priority = if frac_left < 0.15 {
            Priority::Critical
        } else if frac_left < 0.40 {
            Priority::Normal
        } else {
            Priority::Bulk
        };
        let emergency_mode = frac_left < 0.08 && (have as f64) < 0.75 * self.k_total as f64;

        // 5. Optimizer decides.
        let net = NetworkState {
            soc_src: self.src.energy.soc(),
            duty_left_rf: self.duty.duty_left(self.elapsed_s),
            symbols_have: have,
            symbols_need: self.k_total as u64,
            deadline_left_s: deadline_left,
            deadline_total_s: self.profile.deadline_s,
            priority,
            emergency_mode,
            covert_seq: self.covert_seq,
        };
        self.covert_seq = self.covert_seq.wrapping_add(1);
        let decision = self.optimizer.decide(&self.intention, &net, &self.chan, &mut self.rng);
        let tries = if priority == Priority::Critical {
            decision.tries.max(2)
        } else {
            decision.tries
        };

        // 6. Send loop.
        let mut ok_count = 0u32;
        let mut tries_real = 0u32;
        for _ in 0..tries {
            tries_real += 1;
            if self.attempt_transmit(decision.mode, decision.redundancy_hint, decision.rf_bw_khz, decision.preamble_sym) {
                ok_count += 1;
            }
            let jitter = self.rng.range_inclusive(0, decision.jitter_ms);
            self.sleep((decision.min_spacing_ms + jitter) as f64 / 1000.0);
        }

        // 7. Low-energy backscatter top-up.
        if self.src.energy.soc() < 0.25 && self.intention.backscatter {
            let extra = (decision.redundancy_hint / 3).clamp(2, 8);
            for _ in 0..extra {
                tries_real += 1;
                if self.attempt_transmit(Mode::Backscatter, decision.redundancy_hint, decision.rf_bw_khz, decision.preamble_sym) {
                    ok_count += 1;
                }
                let jitter = self.rng.range_inclusive(0, (decision.jitter_ms as f64 * 1.5) as u32);
                self.sleep((decision.min_spacing_ms as f64 * 1.5 + jitter as f64) / 1000.0);
            }
        }

        // 8. Bandit feedback.
        self.optimizer.feedback(decision.mode, ok_count, tries_real);

        // 9/10. Decode attempt + adaptation (collapsed into one
        // `Organism::integrate` call — see DESIGN.md for why the spec's
        // "fast path vs standard path" distinction doesn't change the
        // decoder's final state in a synchronous implementation). The
        // decoder dedups by symbol seed, so re-feeding the full received
        // set every step is correct, not just a fast path.
        let integrate = self.organism.integrate(&self.profile, &self.token.id, self.dst.received());
        self.last_coverage = integrate.coverage;
        if integrate.delivered {
            self.delivered_payload = integrate.payload_bytes;
        }

        let flow_state = self.organism.flow_state(aurora_core::FlowKey::new(
            self.profile.flow_class,
            self.profile.priority,
        ));
        let (panicking, good_streak, bad_streak) = flow_state
            .map(|s| (s.panic_boost > 0, s.good_streak, s.bad_streak))
            .unwrap_or((false, 0, 0));
        if let Some(h) = self.health.get_mut(&self.profile.flow_class) {
            h.observe(integrate.coverage, integrate.delivered, panicking, good_streak, bad_streak);
        }

        let sample = TelemetrySample {
            duty_left: net.duty_left_rf,
            nerve_fail_rate: self.health[&FlowClass::Nerve].ewma_fail_rate,
            gland_fail_rate: self.health[&FlowClass::Gland].ewma_fail_rate,
            muscle_fail_rate: self.health[&FlowClass::Muscle].ewma_fail_rate,
        };
        self.safety.observe(sample);
        let regime_inputs = RegimeInputs::from_health(|class| self.health[&class]);
        self.optimizer.update_mode(self.safety.classify(), regime_inputs);

        // 11. Telemetry emission.
        if let Some(sink) = &mut self.telemetry {
            let record = TelemetryRecord::new(
                self.step,
                have,
                self.k_total as u64,
                decision.mode,
                tries_real,
                ok_count,
                ok_count as f64 / tries_real.max(1) as f64,
                self.chan.snr_db(Mode::Rf),
                self.chan.snr_db(Mode::Ir),
                self.chan.snr_db(Mode::Backscatter),
                net.soc_src,
                net.duty_left_rf,
                self.elapsed_s,
            );
            if let Err(e) = sink.record(&record) {
                tracing::warn!(error = %e, "failed to append telemetry record");
            }
        }
        if let Some(out) = &mut self.health_out {
            let event = HealthEvent::new(
                self.step,
                self.profile.flow_class,
                integrate.coverage,
                self.health[&self.profile.flow_class].ewma_fail_rate,
                good_streak,
                bad_streak,
                self.safety.classify(),
                decision.mode,
            );
            if let Err(e) = event.emit(&mut **out) {
                tracing::warn!(error = %e, "failed to emit health event");
            }
        }

        // Interactive config reload poll (§6).
        if self.step % CONFIG_POLL_INTERVAL_STEPS == 0 {
            if let Some(reloader) = &mut self.config_reloader {
                reloader.poll();
                let cfg = reloader.current();
                self.organism.set_base_gains(cfg.alpha_up, cfg.alpha_down, cfg.panic_boost_steps);
            }
        }

        // 12. Exit conditions.
        self.step += 1;
        if integrate.delivered {
            self.state = EngineState::Delivered;
            tracing::info!(step = self.step, "token delivered");
        } else if self.deadline_left_s() <= 0.0 || self.step >= self.max_steps {
            self.state = EngineState::Timeout;
            tracing::warn!(step = self.step, coverage = integrate.coverage, "deadline exceeded or step cap reached");
        } else {
            // Adaptive inter-step sleep.
            let dl = self.deadline_left_s();
            self.next_sleep_s = if dl < 2.0 {
                0.002
            } else if dl < 5.0 {
                0.006
            } else {
                0.012
            };
            self.sleep(self.next_sleep_s);
        }

        self.outcome()
    }

    /// Run to completion, returning the terminal [`RunOutcome`].
    pub fn run(&mut self) -> RunOutcome {
        while self.state == EngineState::Running {
            self.step();
        }
        let signature_ok = self.delivered_payload.as_ref().map(|_| self.token.verify_signature());
        RunOutcome {
            state: self.state,
            payload: self.delivered_payload.clone(),
            signature_ok,
            coverage: self.last_coverage,
            steps: self.step,
            elapsed_s: self.elapsed_s,
        }
    }

    fn outcome(&self) -> StepOutcome {
        StepOutcome {
            state: self.state,
            coverage: self.last_coverage,
            have: self.dst.have(),
            need: self.k_total as u64,
            elapsed_s: self.elapsed_s,
        }
    }

    /// Baseline SNR per mode plus a per-step random walk perturbation, fed
    /// through [`ChannelState::observe_snr`] (§4.5 step 3). Purely a
    /// simulation concern — a real HAL would read `lora_rssi()` etc.
    /// instead; `aurora-cli`'s batch driver seeds these baselines from its
    /// scenario CSV.
    fn probe_snr_db(&mut self, mode: Mode) -> f64 {
        let base = match mode {
            Mode::Rf => -2.0,
            Mode::Ir => 6.0,
            Mode::Backscatter => 2.0,
        };
        base + channel_model::fading_db(&mut self.rng)
    }

    /// One physical transmit attempt: duty/energy admission, HAL call,
    /// channel-model classification, dedup insertion (§4.5 step 6, §7).
    fn attempt_transmit(&mut self, mode: Mode, redundancy: u32, rf_bw_khz: u32, preamble_sym: u32) -> bool {
        let airtime = channel_model::airtime_s(mode);
        if !self.duty.try_spend(self.elapsed_s, airtime) {
            // Duty-cycle exhausted: no-op (§7).
            return false;
        }
        if !self.src.energy.try_spend(channel_model::energy_cost_j(mode)) {
            // Energy insufficient: no-op (§7).
            return false;
        }

        let packet = match self.src.next_packet() {
            Some(p) => p.clone(),
            None => return false,
        };
        self.dispatch_hal(mode, &packet, rf_bw_khz, preamble_sym);

        let snr_db = self.chan.snr_db(mode);
        let success = channel_model::classify_attempt(snr_db, mode, redundancy, &mut self.rng);
        self.chan.observe_outcome(mode, success);
        if success {
            self.dst.accept(packet);
        }
        success
    }

    fn dispatch_hal(&mut self, mode: Mode, packet: &Packet, rf_bw_khz: u32, preamble_sym: u32) {
        let bytes = packet_wire_bytes(packet);
        match mode {
            Mode::Rf => {
                let freq_hz = self.hal.fhss_next((packet.seq % 256) as u8);
                self.hal.lora_cfg(freq_hz, rf_bw_khz, 7, 5, preamble_sym);
                self.hal.lora_tx(&bytes);
            }
            Mode::Ir => {
                self.hal.ir_tx(&bytes, 115_200);
            }
            Mode::Backscatter => {
                self.hal.bs_modulate(&bytes, 9_600);
            }
        }
    }
}

/// Minimal ad hoc byte representation of a packet's fountain symbol, passed
/// to the HAL's transmit primitives. Not a decode-capable wire form — the
/// engine keeps the authoritative `Packet` in memory and never needs to
/// parse this back; it exists only because the HAL's interface is "opaque
/// bytes" (§6).
fn packet_wire_bytes(packet: &Packet) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + packet.fp.data.len());
    out.extend_from_slice(&packet.fp.seed.to_le_bytes());
    out.extend_from_slice(&packet.fp.data);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurora_core::Genotype;
    use aurora_crypto::keypair;
    use aurora_hal::SimulatedHal;

    fn make_token(payload: Vec<u8>) -> Token {
        let (_pk, sk) = keypair();
        Token::new(payload, 3600, 1, &sk)
    }

    fn good_profile(flow_class: FlowClass, deadline_s: f64) -> FlowProfile {
        FlowProfile {
            deadline_s,
            reliability: 0.97,
            duty_limit: 1.0,
            priority: Priority::Normal,
            flow_class,
            genotype_hint: Some(Genotype::Baseline),
        }
    }

    #[test]
    fn good_channel_delivers_before_deadline() {
        let token = make_token(vec![7u8; 1024]);
        let profile = good_profile(FlowClass::Muscle, 30.0);
        let intention = Intention::default();
        let hal = SimulatedHal::new(1);
        let mut options = EngineOptions::default();
        options.seed = 42;
        let mut engine = Engine::new(token, profile, intention, hal, options);
        let outcome = engine.run();
        assert_eq!(outcome.state, EngineState::Delivered);
        assert_eq!(outcome.payload.as_deref(), Some([7u8; 1024].as_slice()));
        assert_eq!(outcome.signature_ok, Some(true));
    }

    #[test]
    fn zero_deadline_times_out_immediately() {
        // Large enough that a single step's attempt budget cannot possibly
        // transmit all the symbols a full decode would need.
        let token = make_token(vec![1u8; 50_000]);
        let profile = good_profile(FlowClass::Gland, 0.0);
        let intention = Intention::default();
        let hal = SimulatedHal::new(2);
        let engine_opts = EngineOptions::default();
        let mut engine = Engine::new(token, profile, intention, hal, engine_opts);
        let outcome = engine.run();
        assert_eq!(outcome.state, EngineState::Timeout);
        assert_eq!(outcome.payload, None);
    }

    #[test]
    fn soc_and_duty_stay_within_unit_interval_throughout() {
        let token = make_token(vec![3u8; 2048]);
        let profile = good_profile(FlowClass::Nerve, 5.0);
        let intention = Intention::default();
        let hal = SimulatedHal::new(3);
        let mut options = EngineOptions::default();
        options.max_steps = 50;
        let mut engine = Engine::new(token, profile, intention, hal, options);
        for _ in 0..50 {
            let outcome = engine.step();
            assert!((0.0..=1.0).contains(&engine.src.energy.soc()));
            assert!(engine.duty.duty_left(engine.elapsed_s) >= 0.0);
            if outcome.state != EngineState::Running {
                break;
            }
        }
    }

    #[test]
    fn telemetry_sink_receives_one_record_per_step() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("telemetry.jsonl");
        let token = make_token(vec![2u8; 512]);
        let profile = good_profile(FlowClass::Gland, 20.0);
        let intention = Intention::default();
        let hal = SimulatedHal::new(4);
        let sink = TelemetrySink::open(&path).unwrap();
        let mut engine = Engine::new(token, profile, intention, hal, EngineOptions::default()).with_telemetry(sink);
        let outcome = engine.run();
        assert_eq!(outcome.state, EngineState::Delivered);
        let lines = std::fs::read_to_string(&path).unwrap().lines().count() as u64;
        assert_eq!(lines, engine.step_count());
    }
}
