#![forbid(unsafe_code)]

//! The organism: per-flow-class redundancy adaptation via a fountain-coded
//! spawn/integrate contract (§4.2).

mod adaptation;
mod flow;

pub use flow::{FlowProfile, FlowState};

use aurora_core::{FlowKey, SegmentKind};
use aurora_fec::{Packet, SegmentedDecoder, SegmentedEncoder, SegmentedOutcome};
use std::collections::HashMap;

/// Result of [`Organism::spawn`].
pub struct SpawnOutcome {
    pub packets: Vec<Packet>,
    pub k_total: usize,
    pub payload_size: usize,
}

/// Result of [`Organism::integrate`].
pub struct IntegrateOutcome {
    pub delivered: bool,
    pub coverage: f64,
    pub symbols_used: usize,
    pub total_symbols_seen: usize,
    pub payload_bytes: Option<Vec<u8>>,
}

struct ReceiveSlot {
    decoder: SegmentedDecoder,
}

/// Owns one [`FlowState`] per flow key and one in-flight decode per active
/// token id. `block_size` is the fixed `T` used for every spawn (§4.1).
pub struct Organism {
    block_size: usize,
    alpha_up_base: f64,
    alpha_down_base: f64,
    panic_steps: u32,
    flow_states: HashMap<FlowKey, FlowState>,
    receivers: HashMap<String, ReceiveSlot>,
}

impl Organism {
    pub fn new(block_size: usize) -> Self {
        Self::with_config(block_size, 0.10, 0.02, 3)
    }

    /// Construct with explicit interactive-config base gains (§4.2, §6).
    pub fn with_config(block_size: usize, alpha_up_base: f64, alpha_down_base: f64, panic_steps: u32) -> Self {
        Self {
            block_size,
            alpha_up_base,
            alpha_down_base,
            panic_steps,
            flow_states: HashMap::new(),
            receivers: HashMap::new(),
        }
    }

    /// Update the base adaptation gains, e.g. from a polled interactive config.
    pub fn set_base_gains(&mut self, alpha_up_base: f64, alpha_down_base: f64, panic_steps: u32) {
        self.alpha_up_base = alpha_up_base;
        self.alpha_down_base = alpha_down_base;
        self.panic_steps = panic_steps;
    }

    pub fn flow_state(&self, key: FlowKey) -> Option<&FlowState> {
        self.flow_states.get(&key)
    }

    fn flow_key(profile: &FlowProfile) -> FlowKey {
        FlowKey::new(profile.flow_class, profile.priority)
    }

    /// §4.2 `spawn`: segment the payload, size redundancy from the flow's
    /// current overheads (applying panic boost if armed), and emit symbols.
    pub fn spawn(&mut self, profile: &FlowProfile, token_id: &str, payload: &[u8], seed: u64) -> SpawnOutcome {
        let key = Self::flow_key(profile);
        let state = self
            .flow_states
            .entry(key)
            .or_insert_with(|| FlowState::new(profile.flow_class, profile.genotype_hint));

        let panicking = state.panic_boost > 0;
        let crit_mult = if panicking { 2.0 } else { 1.0 };
        let bulk_mult = if panicking { 1.5 } else { 1.0 };
        state.decay_panic_boost();

        let mut encoder = SegmentedEncoder::new(payload, profile.flow_class, self.block_size, seed);
        let k_crit = encoder.k_critical();
        let k_bulk = encoder.k_bulk();

        let n_crit = (k_crit as f64 * state.crit_overhead * crit_mult).ceil() as usize;
        let n_bulk = (k_bulk as f64 * state.bulk_overhead * bulk_mult).ceil() as usize;

        let mut packets = Vec::with_capacity(n_crit + n_bulk);
        let mut seq = 0u32;
        for _ in 0..n_crit {
            if let Some(sym) = encoder.emit(SegmentKind::Critical) {
                packets.push(Packet::new(sym, seq, token_id, SegmentKind::Critical));
                seq += 1;
            }
        }
        for _ in 0..n_bulk {
            if let Some(sym) = encoder.emit(SegmentKind::Bulk) {
                packets.push(Packet::new(sym, seq, token_id, SegmentKind::Bulk));
                seq += 1;
            }
        }

        self.receivers.insert(
            token_id.to_string(),
            ReceiveSlot {
                decoder: SegmentedDecoder::new(
                    k_crit.max(1),
                    k_bulk,
                    self.block_size,
                    encoder.critical_len(),
                    encoder.bulk_len(),
                ),
            },
        );

        SpawnOutcome {
            packets,
            k_total: k_crit + k_bulk,
            payload_size: payload.len(),
        }
    }

    /// §4.2 `integrate`: filter by `token_id`, feed the right decoder, solve,
    /// then run the adaptation rule.
    pub fn integrate(&mut self, profile: &FlowProfile, token_id: &str, received: &[Packet]) -> IntegrateOutcome {
        let slot = self
            .receivers
            .entry(token_id.to_string())
            .or_insert_with(|| ReceiveSlot {
                decoder: SegmentedDecoder::new(1, 0, self.block_size, 0, 0),
            });
        for packet in received.iter().filter(|p| p.token_id == token_id) {
            slot.decoder.add(packet.kind, &packet.fp);
        }

        let SegmentedOutcome {
            delivered,
            coverage,
            symbols_used,
            total_symbols_seen,
            payload,
        } = slot.decoder.reconstruct();

        let key = Self::flow_key(profile);
        let state = self
            .flow_states
            .entry(key)
            .or_insert_with(|| FlowState::new(profile.flow_class, profile.genotype_hint));
        let gp = state.genotype.params(self.alpha_up_base, self.alpha_down_base);
        state.adapt(
            profile.flow_class,
            coverage,
            delivered,
            symbols_used,
            total_symbols_seen,
            gp,
            self.panic_steps,
        );

        IntegrateOutcome {
            delivered,
            coverage,
            symbols_used,
            total_symbols_seen,
            payload_bytes: payload,
        }
    }
}
