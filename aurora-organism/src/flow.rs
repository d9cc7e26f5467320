//! Flow-scoped data: the invariant profile a token carries and the mutable
//! adaptation state the organism evolves per flow key (§3).

use aurora_core::{FlowClass, Genotype, Priority};

/// Invariant-for-a-token's-lifetime profile, derived from an Intention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowProfile {
    pub deadline_s: f64,
    pub reliability: f64,
    pub duty_limit: f64,
    pub priority: Priority,
    pub flow_class: FlowClass,
    pub genotype_hint: Option<Genotype>,
}

/// Per-flow-key mutable adaptation state (§3, §4.2).
///
/// Invariants upheld by [`crate::Organism`]: `crit_overhead >= base_crit_overhead`,
/// `bulk_overhead >= base_bulk_overhead`, both within `[1.0, max_overhead(genotype)]`;
/// `good_streak * bad_streak == 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowState {
    pub base_crit_overhead: f64,
    pub base_bulk_overhead: f64,
    pub crit_overhead: f64,
    pub bulk_overhead: f64,
    pub avg_coverage: f64,
    pub success_count: u64,
    pub fail_count: u64,
    pub panic_boost: u32,
    pub good_streak: u32,
    pub bad_streak: u32,
    pub genotype: Genotype,
    pub initialized: bool,
    pub age: u64,
}

impl FlowState {
    /// First-use initialization for a flow key (§4.2 `spawn`).
    pub fn new(flow_class: FlowClass, genotype_hint: Option<Genotype>) -> Self {
        let genotype = genotype_hint.unwrap_or_else(|| flow_class.default_genotype());
        let base_crit_overhead = flow_class.crit_overhead_factor();
        let base_bulk_overhead = flow_class.bulk_overhead_factor();
        Self {
            base_crit_overhead,
            base_bulk_overhead,
            crit_overhead: base_crit_overhead,
            bulk_overhead: base_bulk_overhead,
            avg_coverage: 0.0,
            success_count: 0,
            fail_count: 0,
            panic_boost: 0,
            good_streak: 0,
            bad_streak: 0,
            genotype,
            initialized: false,
            age: 0,
        }
    }
}
