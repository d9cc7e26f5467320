//! Per-step timing parameters: jitter, inter-attempt spacing, preamble
//! length, RF bandwidth (§4.3).

use aurora_core::prng::Xorshift64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    pub jitter_ms: u32,
    pub min_spacing_ms: u32,
    pub preamble_sym: u32,
    pub rf_bw_khz: u32,
}

pub fn compute(duty_left: f64, soc: f64, urgency: f64, rng: &mut Xorshift64) -> Timing {
    let base_jitter = ((1.0 - duty_left) * 40.0).round() as u32;
    let low_soc_bump = if soc < 0.3 { 12 } else { 0 };
    let jitter_ms = base_jitter + low_soc_bump + rng.range_inclusive(0, 4);

    let min_spacing_ms = if soc < 0.3 { 18 } else { 8 };

    let urgency_bump = (10.0 * urgency).floor() as u32;
    let preamble_sym = (8 + urgency_bump + rng.range_inclusive(0, 4)).clamp(6, 24);

    let rf_bw_khz = if rng.next_below(2) == 0 { 125 } else { 250 };

    Timing {
        jitter_ms,
        min_spacing_ms,
        preamble_sym,
        rf_bw_khz,
    }
}
