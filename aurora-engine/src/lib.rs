#![forbid(unsafe_code)]

//! The Aurora-X engine: owns the per-token organism/optimizer/safety
//! triple and drives the step loop both CLI binaries share (§4.5, §9).

mod channel_model;
mod engine;
mod node;
pub mod telemetry;

pub use engine::{Engine, EngineOptions, EngineState, RunOutcome, StepOutcome};
pub use node::{DestNode, SourceNode};
