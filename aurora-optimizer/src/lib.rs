#![forbid(unsafe_code)]

//! The per-step optimizer: mode selection (ARGMAX/UCB with hysteresis),
//! target reliability, urgency/budget, attempt count, redundancy hint,
//! timing, and the bandit feedback loop (§4.3), plus the regime state
//! machine driven by the safety monitor's classification (§4.4).

mod bandit;
mod decision;
mod model;
mod reliability;
mod selector;
mod optimizer;
mod timing;

pub use bandit::{ArgmaxSelector, UcbSelector};
pub use decision::{Decision, NetworkState};
pub use model::mode_threshold_db;
pub use optimizer::Optimizer;
pub use selector::candidates;
