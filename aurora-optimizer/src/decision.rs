//! The optimizer's input/output value types (§3 `NetworkState`, §4.3
//! `Decision`).

use aurora_core::{Mode, Priority};

/// Snapshot the engine hands the optimizer once per step (§3). `deadline_total_s`
/// is carried alongside `deadline_left_s` so the urgency formula's
/// `1 - dl_left/dl_total` term is computable from the snapshot alone, rather
/// than the optimizer reaching back into the `FlowProfile`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetworkState {
    pub soc_src: f64,
    pub duty_left_rf: f64,
    pub symbols_have: u64,
    pub symbols_need: u64,
    pub deadline_left_s: f64,
    pub deadline_total_s: f64,
    pub priority: Priority,
    pub emergency_mode: bool,
    pub covert_seq: u8,
}

/// The per-step joint decision (§4.3). A plain named struct per the §9
/// redesign flag — no bit-packed `tries`/`overhead` fields; the engine
/// consumes this directly, no unpack step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub mode: Mode,
    pub tries: u32,
    pub redundancy_hint: u32,
    pub jitter_ms: u32,
    pub min_spacing_ms: u32,
    pub preamble_sym: u32,
    pub rf_bw_khz: u32,
    pub emergency: bool,
    pub covert_seq: u8,
}
