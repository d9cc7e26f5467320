//! A deterministic [`Hal`] double used by tests and both drivers when no
//! real radio is present (§6, §9).
//!
//! Every call is logged at `trace!`/`debug!` and recorded in a small call
//! counter so tests can assert on HAL usage without inspecting a log
//! capture. RSSI and duty-left readings are test-settable rather than
//! modeled physically — the engine's own channel model (§4.5 step 6) is
//! what decides pass/fail per attempt, not the HAL.

use crate::hal::Hal;
use aurora_core::prng::Xorshift64;

/// Call counters exposed for test assertions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub radio_init: u32,
    pub lora_cfg: u32,
    pub lora_tx: u32,
    pub lora_rssi: u32,
    pub cw_on: u32,
    pub cw_off: u32,
    pub ir_tx: u32,
    pub bs_modulate: u32,
    pub ris_set_phases: u32,
    pub fhss_next: u32,
    pub duty_left_hint: u32,
}

/// A simulated radio/IR/backscatter/RIS stack with deterministic readings.
#[derive(Debug, Clone)]
pub struct SimulatedHal {
    rng: Xorshift64,
    rssi_dbm: f64,
    duty_left_hint: f64,
    last_freq_hz: u64,
    calls: CallCounts,
}

impl SimulatedHal {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Xorshift64::new(seed),
            rssi_dbm: -60.0,
            duty_left_hint: 1.0,
            last_freq_hz: 915_000_000,
            calls: CallCounts::default(),
        }
    }

    /// Override the RSSI reading future `lora_rssi` calls return.
    pub fn set_rssi_dbm(&mut self, rssi_dbm: f64) {
        self.rssi_dbm = rssi_dbm;
    }

    /// Override the reading future `duty_left_hint` calls return.
    pub fn set_duty_left_hint(&mut self, duty_left: f64) {
        self.duty_left_hint = duty_left.clamp(0.0, 1.0);
    }

    pub fn calls(&self) -> CallCounts {
        self.calls
    }
}

impl Hal for SimulatedHal {
    fn radio_init(&mut self) {
        self.calls.radio_init += 1;
        tracing::debug!("HAL radio_init");
    }

    fn lora_cfg(&mut self, freq_hz: u64, bw_khz: u32, sf: u8, cr: u8, preamble_sym: u32) {
        self.calls.lora_cfg += 1;
        self.last_freq_hz = freq_hz;
        tracing::trace!(freq_hz, bw_khz, sf, cr, preamble_sym, "HAL lora_cfg");
    }

    fn lora_tx(&mut self, bytes: &[u8]) {
        self.calls.lora_tx += 1;
        tracing::trace!(len = bytes.len(), "HAL lora_tx");
    }

    fn lora_rssi(&mut self) -> f64 {
        self.calls.lora_rssi += 1;
        self.rssi_dbm
    }

    fn cw_on(&mut self, seconds: f64) {
        self.calls.cw_on += 1;
        tracing::trace!(seconds, "HAL cw_on");
    }

    fn cw_off(&mut self) {
        self.calls.cw_off += 1;
        tracing::trace!("HAL cw_off");
    }

    fn ir_tx(&mut self, bytes: &[u8], bitrate_bps: u32) {
        self.calls.ir_tx += 1;
        tracing::trace!(len = bytes.len(), bitrate_bps, "HAL ir_tx");
    }

    fn bs_modulate(&mut self, bits: &[u8], bitrate_bps: u32) {
        self.calls.bs_modulate += 1;
        tracing::trace!(len = bits.len(), bitrate_bps, "HAL bs_modulate");
    }

    fn ris_set_phases(&mut self, phases: &[u8]) {
        self.calls.ris_set_phases += 1;
        tracing::trace!(tiles = phases.len(), "HAL ris_set_phases");
    }

    fn fhss_next(&mut self, salt: u8) -> u64 {
        self.calls.fhss_next += 1;
        let hop = self.rng.next_below(64) as u64 + salt as u64;
        self.last_freq_hz = 902_000_000 + hop * 200_000;
        self.last_freq_hz
    }

    fn duty_left_hint(&mut self) -> f64 {
        self.calls.duty_left_hint += 1;
        self.duty_left_hint
    }
}
