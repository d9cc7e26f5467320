#![forbid(unsafe_code)]

//! Core types, error handling, Intention/config parsing, and the shared PRNG
//! for Aurora-X.
//!
//! Stays lightweight and pure Rust, same as the crate it is split along the
//! lines of: a small dependency-minimized surface that every other Aurora-X
//! crate builds on.

pub mod config;
pub mod error;
pub mod prng;
pub mod types;

pub use error::{Error, Result};
pub use types::{
    FlowClass, FlowKey, Genotype, GenotypeParams, Mode, Priority, Regime, SafetyStatus,
    SegmentKind,
};
