//! Shared enums and small value types used across the Aurora-X workspace.

use serde::{Deserialize, Serialize};

/// Physical delivery mode a [`crate::config::Intention`] and the optimizer choose between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mode {
    /// Narrowband RF (LoRa-style).
    Rf,
    /// Optical / IR link.
    Ir,
    /// Ambient backscatter.
    Backscatter,
}

impl Mode {
    /// All modes, in a stable order used by the bandit's arm indexing.
    pub const ALL: [Mode; 3] = [Mode::Rf, Mode::Ir, Mode::Backscatter];
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Mode::Rf => "RF",
            Mode::Ir => "IR",
            Mode::Backscatter => "BACKSCATTER",
        };
        write!(f, "{s}")
    }
}

/// Delivery priority, derived each step from remaining deadline fraction (§4.5) or
/// carried statically on a [`crate::config::Intention`]-derived profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Critical,
    Normal,
    Bulk,
}

/// Packet segment kind. Distinct from [`Priority`] even though the variant names
/// coincide for `CRITICAL`/`BULK` — a packet's kind routes it to one of the two
/// parallel fountain decoders, independent of the priority the engine derived
/// for the step that sent it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SegmentKind {
    Critical,
    Bulk,
}

/// Organism flow class — the tissue-style grouping that picks default genotype,
/// overhead factors, and critical-segment size hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FlowClass {
    Nerve,
    Gland,
    Muscle,
}

impl FlowClass {
    /// Critical-segment size hint in bytes (§4.1).
    pub fn size_hint(self) -> usize {
        match self {
            FlowClass::Nerve => 256,
            FlowClass::Gland => 512,
            FlowClass::Muscle => 128,
        }
    }

    /// Base critical-segment overhead factor (§4.2).
    pub fn crit_overhead_factor(self) -> f64 {
        match self {
            FlowClass::Nerve => 3.0,
            FlowClass::Gland => 2.5,
            FlowClass::Muscle => 1.5,
        }
    }

    /// Base bulk-segment overhead factor (§4.2).
    pub fn bulk_overhead_factor(self) -> f64 {
        match self {
            FlowClass::Nerve => 1.0,
            FlowClass::Gland => 1.5,
            FlowClass::Muscle => 1.2,
        }
    }

    /// Default genotype for flows that never set a `genotype_hint` (§4.2).
    pub fn default_genotype(self) -> Genotype {
        match self {
            FlowClass::Nerve => Genotype::Hypervigilant,
            FlowClass::Gland => Genotype::Baseline,
            FlowClass::Muscle => Genotype::Experimental,
        }
    }
}

/// A tagged key identifying one adaptation slot in the [`crate::Organism`]'s
/// flow-state table. Replaces the source's `"CLASS:PRIORITY"` string key (§9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlowKey {
    pub flow_class: FlowClass,
    pub priority: Priority,
}

impl FlowKey {
    pub fn new(flow_class: FlowClass, priority: Priority) -> Self {
        Self { flow_class, priority }
    }
}

/// Adaptation-gain genotype (§4.2). Each genotype parameterizes one organism's
/// redundancy feedback law.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Genotype {
    Baseline,
    Hypervigilant,
    Stoic,
    Experimental,
}

/// Gains derived from a [`Genotype`] (§4.2 table), scaled from the interactive
/// config's base values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenotypeParams {
    pub alpha_up: f64,
    pub alpha_down: f64,
    pub panic_mult: f64,
    pub max_overhead: f64,
}

impl Genotype {
    /// Resolve gains for this genotype given the interactive config's base
    /// `alpha_up`/`alpha_down` (§4.2).
    pub fn params(self, alpha_up_base: f64, alpha_down_base: f64) -> GenotypeParams {
        let (up_mult, down_mult, panic_mult, max_overhead) = match self {
            Genotype::Baseline => (1.0, 1.0, 1.0, 4.0),
            Genotype::Hypervigilant => (1.5, 0.5, 2.0, 6.0),
            Genotype::Stoic => (0.5, 1.0, 0.5, 3.5),
            Genotype::Experimental => (0.8, 2.5, 0.7, 3.0),
        };
        GenotypeParams {
            alpha_up: alpha_up_base * up_mult,
            alpha_down: alpha_down_base * down_mult,
            panic_mult,
            max_overhead,
        }
    }
}

/// Optimizer operating regime, driven by the [`crate::SafetyStatus`] classification (§4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Regime {
    Conservative,
    Normal,
    Aggressive,
}

impl std::fmt::Display for Regime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Regime::Conservative => "CONSERVATIVE",
            Regime::Normal => "NORMAL",
            Regime::Aggressive => "AGGRESSIVE",
        };
        write!(f, "{s}")
    }
}

/// Safety monitor classification (§4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SafetyStatus {
    Healthy,
    Degraded,
    Critical,
}

impl std::fmt::Display for SafetyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SafetyStatus::Healthy => "HEALTHY",
            SafetyStatus::Degraded => "DEGRADED",
            SafetyStatus::Critical => "CRITICAL",
        };
        write!(f, "{s}")
    }
}

impl Priority {
    /// Baseline target reliability before regime/emergency adjustment (§4.3).
    pub fn base_reliability(self) -> f64 {
        match self {
            Priority::Critical => 0.999,
            Priority::Normal => 0.97,
            Priority::Bulk => 0.9,
        }
    }
}
