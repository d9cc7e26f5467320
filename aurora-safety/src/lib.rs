#![forbid(unsafe_code)]

//! Safety monitor: sliding-window regime classification and per-flow-class
//! health EWMAs (§4.4).

pub mod health;
pub mod monitor;

pub use health::{FlowHealth, RegimeInputs};
pub use monitor::{SafetyMonitor, TelemetrySample};
