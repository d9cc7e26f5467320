//! Node-owned state (§3 "Ownership", §5 "Shared resources"): each node owns
//! its energy store, outbound symbol buffer, and dedup set. The duty
//! limiter is owned by the transmitting (source) node only — the
//! destination never transmits in this single-hop model.

use aurora_channel::EnergyStore;
use aurora_fec::{Packet, SeqDedup};

/// The source node: holds the full pre-computed outbound symbol queue from
/// `Organism::spawn`, its energy store, and a cursor that cycles through
/// the queue across steps (a rateless code tolerates resending the same
/// symbol more than once — it simply contributes a duplicate row the
/// receiver's decoder already knows to drop).
pub struct SourceNode {
    pub energy: EnergyStore,
    outbound: Vec<Packet>,
    cursor: usize,
}

impl SourceNode {
    pub fn new(energy: EnergyStore, outbound: Vec<Packet>) -> Self {
        Self {
            energy,
            outbound,
            cursor: 0,
        }
    }

    /// Harvest ambient energy, capped at capacity.
    pub fn harvest(&mut self, amount_j: f64) {
        self.energy.harvest(amount_j);
    }

    /// Next packet to transmit, cycling back to the start once exhausted.
    /// Returns `None` only if the queue is empty (degenerate zero-byte
    /// payload).
    pub fn next_packet(&mut self) -> Option<&Packet> {
        if self.outbound.is_empty() {
            return None;
        }
        let packet = &self.outbound[self.cursor];
        self.cursor = (self.cursor + 1) % self.outbound.len();
        Some(packet)
    }

    pub fn queue_len(&self) -> usize {
        self.outbound.len()
    }
}

/// The destination node: accumulates deduped packets for `Organism::integrate`.
pub struct DestNode {
    pub energy: EnergyStore,
    dedup: SeqDedup,
    received: Vec<Packet>,
}

impl DestNode {
    pub fn new(energy: EnergyStore) -> Self {
        Self {
            energy,
            dedup: SeqDedup::new(),
            received: Vec::new(),
        }
    }

    pub fn harvest(&mut self, amount_j: f64) {
        self.energy.harvest(amount_j);
    }

    /// Accept `packet` if its `seq` is new for its sender; returns whether
    /// it was accepted (i.e. not a duplicate).
    pub fn accept(&mut self, packet: Packet) -> bool {
        if self.dedup.accept(&packet) {
            self.received.push(packet);
            true
        } else {
            false
        }
    }

    pub fn received(&self) -> &[Packet] {
        &self.received
    }

    pub fn have(&self) -> u64 {
        self.received.len() as u64
    }
}
