//! The wire unit a sender transmits and a receiver dedups on (§3).

use crate::fountain::Symbol;
use aurora_core::SegmentKind;

/// `Pkt` from §3: one fountain symbol plus routing metadata.
///
/// `seq` is assigned by the sender and is globally unique per sender;
/// receivers suppress duplicates by `seq`, independent of the fountain
/// decoder's own seed-based duplicate suppression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub fp: Symbol,
    pub seq: u32,
    pub token_id: String,
    pub kind: SegmentKind,
}

impl Packet {
    pub fn new(fp: Symbol, seq: u32, token_id: impl Into<String>, kind: SegmentKind) -> Self {
        Self {
            fp,
            seq,
            token_id: token_id.into(),
            kind,
        }
    }
}

/// Suppresses duplicate packets by `seq`, per sender `token_id`.
#[derive(Debug, Default)]
pub struct SeqDedup {
    seen: std::collections::HashMap<String, std::collections::HashSet<u32>>,
}

impl SeqDedup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `packet` is new (and is now recorded as seen).
    pub fn accept(&mut self, packet: &Packet) -> bool {
        self.seen
            .entry(packet.token_id.clone())
            .or_default()
            .insert(packet.seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbol() -> Symbol {
        Symbol {
            seed: 1,
            degree: 1,
            data: vec![0u8; 4],
        }
    }

    #[test]
    fn duplicate_seq_is_suppressed() {
        let mut dedup = SeqDedup::new();
        let p1 = Packet::new(symbol(), 7, "tok-a", SegmentKind::Critical);
        let p2 = Packet::new(symbol(), 7, "tok-a", SegmentKind::Critical);
        assert!(dedup.accept(&p1));
        assert!(!dedup.accept(&p2));
    }

    #[test]
    fn same_seq_different_sender_is_accepted() {
        let mut dedup = SeqDedup::new();
        let p1 = Packet::new(symbol(), 3, "tok-a", SegmentKind::Critical);
        let p2 = Packet::new(symbol(), 3, "tok-b", SegmentKind::Critical);
        assert!(dedup.accept(&p1));
        assert!(dedup.accept(&p2));
    }
}
