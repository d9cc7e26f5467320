#![forbid(unsafe_code)]

//! Rateless fountain codec and critical/bulk segmentation (§4.1).

pub mod fountain;
pub mod packet;
pub mod segment;
pub mod stats;

pub use fountain::{DecodeResult, Decoder, Encoder, Symbol};
pub use packet::{Packet, SeqDedup};
pub use segment::{segment_payload, SegmentedDecoder, SegmentedEncoder, SegmentedOutcome};
pub use stats::{DecodingStats, EncodingStats};
