#![forbid(unsafe_code)]

//! Channel telemetry, the duty-cycle limiter, and the energy store (§2, §3).
//!
//! Three small, independently-owned pieces of per-node state: [`ChannelState`]
//! (rolling SNR/PER estimators), [`DutyLimiter`] (sliding-window airtime cap),
//! and [`EnergyStore`] (capacity-bounded charge). None of them lock — per §5
//! each is mutated only by the single-threaded step loop or the transmit path
//! that owns it.

pub mod duty;
pub mod energy;
pub mod telemetry;

pub use duty::DutyLimiter;
pub use energy::EnergyStore;
pub use telemetry::{ChannelState, PerWindow, SnrEstimator};
