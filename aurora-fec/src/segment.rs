//! Critical/bulk segmentation (§4.1): every spawn is split into a prefix
//! "critical" segment and a suffix "bulk" segment, each carried by its own
//! independent encoder/decoder pair so a receiver can route packets to the
//! right one purely from their [`aurora_core::SegmentKind`].

use crate::fountain::{DecodeResult, Decoder, Encoder, Symbol};
use crate::stats::{DecodingStats, EncodingStats};
use aurora_core::{FlowClass, SegmentKind};

/// Split `payload` into `(critical, bulk)` per the flow class's size hint.
/// If the payload is shorter than the hint, everything is critical.
pub fn segment_payload(payload: &[u8], flow_class: FlowClass) -> (Vec<u8>, Vec<u8>) {
    let hint = flow_class.size_hint().min(payload.len());
    (payload[..hint].to_vec(), payload[hint..].to_vec())
}

/// Owns one encoder per non-empty segment.
pub struct SegmentedEncoder {
    critical: Encoder,
    bulk: Option<Encoder>,
    crit_len: usize,
    bulk_len: usize,
    block_size: usize,
    stats: EncodingStats,
}

impl SegmentedEncoder {
    pub fn new(payload: &[u8], flow_class: FlowClass, block_size: usize, seed: u64) -> Self {
        let (crit, bulk) = segment_payload(payload, flow_class);
        let crit_len = crit.len();
        let bulk_len = bulk.len();
        let critical = Encoder::new(&crit, block_size, seed);
        let bulk_enc = if bulk.is_empty() {
            None
        } else {
            Some(Encoder::new(&bulk, block_size, seed ^ 0x4255_4C4B_5345_4544))
        };
        Self {
            critical,
            bulk: bulk_enc,
            crit_len,
            bulk_len,
            block_size,
            stats: EncodingStats::default(),
        }
    }

    pub fn k_critical(&self) -> usize {
        self.critical.k()
    }

    pub fn k_bulk(&self) -> usize {
        self.bulk.as_ref().map_or(0, Encoder::k)
    }

    pub fn critical_len(&self) -> usize {
        self.crit_len
    }

    pub fn bulk_len(&self) -> usize {
        self.bulk_len
    }

    pub fn emit(&mut self, kind: SegmentKind) -> Option<Symbol> {
        let symbol = match kind {
            SegmentKind::Critical => Some(self.critical.emit()),
            SegmentKind::Bulk => self.bulk.as_mut().map(Encoder::emit),
        };
        if symbol.is_some() {
            self.stats.record_emit(self.block_size);
        }
        symbol
    }

    /// Snapshot of this encoder's cumulative emit counters (§4.1).
    pub fn stats(&self) -> EncodingStats {
        self.stats
    }
}

/// Outcome of [`SegmentedDecoder::reconstruct`] (§4.2 `integrate` return shape).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentedOutcome {
    pub delivered: bool,
    pub coverage: f64,
    pub symbols_used: usize,
    pub total_symbols_seen: usize,
    pub payload: Option<Vec<u8>>,
}

/// Owns one decoder per non-empty segment and reassembles `critical ∥ bulk`.
pub struct SegmentedDecoder {
    critical: Decoder,
    bulk: Option<Decoder>,
    crit_len: usize,
    bulk_len: usize,
    stats: DecodingStats,
}

impl SegmentedDecoder {
    pub fn new(k_critical: usize, k_bulk: usize, block_size: usize, crit_len: usize, bulk_len: usize) -> Self {
        Self {
            critical: Decoder::new(k_critical.max(1), block_size),
            bulk: if k_bulk > 0 {
                Some(Decoder::new(k_bulk, block_size))
            } else {
                None
            },
            crit_len,
            bulk_len,
            stats: DecodingStats::default(),
        }
    }

    pub fn add(&mut self, kind: SegmentKind, symbol: &Symbol) {
        let seen_before = match kind {
            SegmentKind::Critical => self.critical.symbols_seen(),
            SegmentKind::Bulk => self.bulk.as_ref().map_or(0, Decoder::symbols_seen),
        };
        match kind {
            SegmentKind::Critical => self.critical.add_symbol(symbol),
            SegmentKind::Bulk => {
                if let Some(b) = &mut self.bulk {
                    b.add_symbol(symbol);
                }
            }
        }
        let seen_after = match kind {
            SegmentKind::Critical => self.critical.symbols_seen(),
            SegmentKind::Bulk => self.bulk.as_ref().map_or(0, Decoder::symbols_seen),
        };
        self.stats.record_receipt(seen_after == seen_before);
    }

    /// Snapshot of this decoder's cumulative receipt/attempt counters (§4.1).
    pub fn stats(&self) -> DecodingStats {
        self.stats
    }

    /// Attempt to decode both segments and report coverage (§4.2).
    pub fn reconstruct(&mut self) -> SegmentedOutcome {
        let total_bytes = self.crit_len + self.bulk_len;
        let crit_result = self.critical.solve();
        let bulk_result = match &mut self.bulk {
            Some(b) => b.solve(),
            None => DecodeResult::Recovered(Vec::new()),
        };

        let crit_recovered = matches!(crit_result, DecodeResult::Recovered(_));
        let bulk_recovered = matches!(bulk_result, DecodeResult::Recovered(_));

        let recovered_crit_bytes = if crit_recovered { self.crit_len } else { 0 };
        let recovered_bulk_bytes = if bulk_recovered { self.bulk_len } else { 0 };
        let coverage = if total_bytes == 0 {
            1.0
        } else {
            ((recovered_crit_bytes + recovered_bulk_bytes) as f64 / total_bytes as f64).clamp(0.0, 1.0)
        };
        let delivered = coverage >= 1.0;
        self.stats.record_attempt(delivered);

        let total_symbols_seen = self.critical.symbols_seen()
            + self.bulk.as_ref().map_or(0, Decoder::symbols_seen);
        let symbols_used = if delivered {
            self.critical.k() + self.bulk.as_ref().map_or(0, Decoder::k)
        } else {
            0
        };

        let payload = if delivered {
            let (DecodeResult::Recovered(mut crit_bytes), DecodeResult::Recovered(mut bulk_bytes)) =
                (crit_result, bulk_result)
            else {
                unreachable!("delivered implies both segments recovered")
            };
            crit_bytes.truncate(self.crit_len);
            bulk_bytes.truncate(self.bulk_len);
            crit_bytes.extend_from_slice(&bulk_bytes);
            Some(crit_bytes)
        } else {
            None
        };

        SegmentedOutcome {
            delivered,
            coverage,
            symbols_used,
            total_symbols_seen,
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_scenario(payload_len: usize, flow_class: FlowClass, block_size: usize, extra: usize) -> SegmentedOutcome {
        let payload: Vec<u8> = (0..payload_len).map(|i| (i % 251) as u8).collect();
        let mut enc = SegmentedEncoder::new(&payload, flow_class, block_size, 55);
        let mut dec = SegmentedDecoder::new(
            enc.k_critical(),
            enc.k_bulk(),
            block_size,
            enc.critical_len(),
            enc.bulk_len(),
        );
        for _ in 0..(enc.k_critical() + extra) {
            if let Some(s) = enc.emit(SegmentKind::Critical) {
                dec.add(SegmentKind::Critical, &s);
            }
        }
        for _ in 0..(enc.k_bulk() + extra) {
            if let Some(s) = enc.emit(SegmentKind::Bulk) {
                dec.add(SegmentKind::Bulk, &s);
            }
        }
        let outcome = dec.reconstruct();
        if let Some(ref p) = outcome.payload {
            assert_eq!(p, &payload);
        }
        outcome
    }

    #[test]
    fn full_recovery_with_redundancy() {
        let outcome = run_scenario(4096, FlowClass::Muscle, 128, 8);
        assert!(outcome.delivered);
        assert!(outcome.coverage >= 0.99);
    }

    #[test]
    fn encoder_and_decoder_stats_track_emit_and_decode_counts() {
        let payload: Vec<u8> = (0..4096).map(|i| (i % 251) as u8).collect();
        let mut enc = SegmentedEncoder::new(&payload, FlowClass::Muscle, 128, 55);
        let mut dec = SegmentedDecoder::new(
            enc.k_critical(),
            enc.k_bulk(),
            128,
            enc.critical_len(),
            enc.bulk_len(),
        );
        let crit_emits = enc.k_critical() + 8;
        for _ in 0..crit_emits {
            if let Some(s) = enc.emit(SegmentKind::Critical) {
                dec.add(SegmentKind::Critical, &s);
            }
        }
        let outcome = dec.reconstruct();
        assert!(outcome.delivered);
        assert_eq!(enc.stats().symbols_emitted as usize, crit_emits);
        assert_eq!(dec.stats().symbols_received as usize, crit_emits);
        assert_eq!(dec.stats().decode_attempts, 1);
        assert_eq!(dec.stats().recoveries, 1);
        assert_eq!(dec.stats().unique_rate(), 1.0);
    }

    #[test]
    fn short_payload_is_entirely_critical() {
        let payload = vec![7u8; 64]; // shorter than NERVE's 256B hint
        let (crit, bulk) = segment_payload(&payload, FlowClass::Nerve);
        assert_eq!(crit.len(), 64);
        assert!(bulk.is_empty());
    }

    #[test]
    fn partial_symbols_do_not_deliver() {
        let payload: Vec<u8> = vec![3u8; 2048];
        let mut enc = SegmentedEncoder::new(&payload, FlowClass::Gland, 128, 11);
        let mut dec = SegmentedDecoder::new(
            enc.k_critical(),
            enc.k_bulk(),
            128,
            enc.critical_len(),
            enc.bulk_len(),
        );
        // Feed fewer than K for both segments.
        for _ in 0..(enc.k_critical().saturating_sub(1)) {
            if let Some(s) = enc.emit(SegmentKind::Critical) {
                dec.add(SegmentKind::Critical, &s);
            }
        }
        let outcome = dec.reconstruct();
        assert!(!outcome.delivered);
        assert!(outcome.coverage < 0.9);
    }
}
