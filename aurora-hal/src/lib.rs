#![forbid(unsafe_code)]

//! The Aurora-X hardware abstraction layer: a capability-set trait injected
//! into the engine, plus a deterministic simulated implementation for tests
//! and the CLI drivers (§6, §9).

mod hal;
mod simulated;

pub use hal::Hal;
pub use simulated::{CallCounts, SimulatedHal};
