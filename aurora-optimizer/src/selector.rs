//! Mode selection: candidate restriction from the Intention, ARGMAX-or-UCB
//! choice, and the low-energy backscatter override (§4.3).

use crate::bandit::{ArgmaxSelector, UcbSelector};
use aurora_channel::ChannelState;
use aurora_core::config::{Intention, Selector};
use aurora_core::Mode;

/// Modes an [`Intention`] permits this token to use. RF is always allowed.
pub fn candidates(intention: &Intention) -> Vec<Mode> {
    let mut out = vec![Mode::Rf];
    if intention.optical {
        out.push(Mode::Ir);
    }
    if intention.backscatter {
        out.push(Mode::Backscatter);
    }
    out
}

/// Choose a mode for this step. `soc_src < 0.18` with backscatter allowed
/// forces BACKSCATTER regardless of the selector (energy override, §4.3).
pub fn select_mode(
    intention: &Intention,
    soc_src: f64,
    chan: &ChannelState,
    ucb: &UcbSelector,
    argmax: &mut ArgmaxSelector,
) -> Mode {
    let cands = candidates(intention);

    if soc_src < 0.18 && intention.backscatter {
        return Mode::Backscatter;
    }

    match intention.selector {
        Selector::Argmax => argmax.select(&cands, |m| chan.snr_db(m)),
        Selector::Ucb => ucb.select(&cands),
    }
}
