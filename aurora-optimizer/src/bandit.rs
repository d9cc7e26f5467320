//! UCB1-style multi-armed bandit over the three physical [`Mode`]s (§4.3).

use aurora_core::Mode;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Arm {
    pulls: u64,
    avg_reward: f64,
}

impl Default for Arm {
    fn default() -> Self {
        Self {
            pulls: 0,
            avg_reward: 0.0,
        }
    }
}

/// Three-armed UCB bandit, one arm per [`Mode`]. Untouched arms score as if
/// `avg_reward=0.7, conf=1.0` so every mode gets tried at least once before
/// the running averages take over.
#[derive(Debug, Clone)]
pub struct UcbSelector {
    arms: [Arm; 3],
}

impl Default for UcbSelector {
    fn default() -> Self {
        Self {
            arms: [Arm::default(); 3],
        }
    }
}

fn mode_index(mode: Mode) -> usize {
    match mode {
        Mode::Rf => 0,
        Mode::Ir => 1,
        Mode::Backscatter => 2,
    }
}

impl UcbSelector {
    pub fn new() -> Self {
        Self::default()
    }

    fn score(&self, mode: Mode, total_pulls: u64) -> f64 {
        let arm = self.arms[mode_index(mode)];
        if arm.pulls == 0 {
            return 0.7 + 1.2 * 1.0;
        }
        let t = (total_pulls + 1) as f64;
        let conf = (t.ln() / arm.pulls as f64).sqrt();
        arm.avg_reward + 1.2 * conf
    }

    /// Pick the arm with the highest UCB score among `candidates`. `candidates`
    /// must be non-empty; returns the first candidate if scores tie exactly.
    pub fn select(&self, candidates: &[Mode]) -> Mode {
        let total_pulls: u64 = self.arms.iter().map(|a| a.pulls).sum();
        candidates
            .iter()
            .copied()
            .max_by(|a, b| {
                self.score(*a, total_pulls)
                    .partial_cmp(&self.score(*b, total_pulls))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(Mode::Rf)
    }

    /// Fold in one step's observed reward for the mode that was used.
    pub fn update(&mut self, mode: Mode, reward: f64) {
        let reward = reward.clamp(0.0, 1.0);
        let arm = &mut self.arms[mode_index(mode)];
        let n = arm.pulls;
        arm.avg_reward = (arm.avg_reward * n as f64 + reward) / (n + 1) as f64;
        arm.pulls = n + 1;
    }

    pub fn pulls(&self, mode: Mode) -> u64 {
        self.arms[mode_index(mode)].pulls
    }

    pub fn avg_reward(&self, mode: Mode) -> f64 {
        self.arms[mode_index(mode)].avg_reward
    }
}

/// ARGMAX selector with 1 dB hysteresis (§4.3, §8 "Hysteresis" property).
#[derive(Debug, Clone, Default)]
pub struct ArgmaxSelector {
    last_mode: Option<Mode>,
}

impl ArgmaxSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick the candidate with the highest `snr_db(mode)`; only switch away
    /// from the previously selected mode if the challenger beats it by more
    /// than 1 dB.
    pub fn select(&mut self, candidates: &[Mode], snr_db: impl Fn(Mode) -> f64) -> Mode {
        let best = candidates
            .iter()
            .copied()
            .max_by(|a, b| snr_db(*a).partial_cmp(&snr_db(*b)).unwrap_or(std::cmp::Ordering::Equal))
            .unwrap_or(Mode::Rf);

        let chosen = match self.last_mode {
            Some(last) if candidates.contains(&last) => {
                if snr_db(best) > snr_db(last) + 1.0 {
                    best
                } else {
                    last
                }
            }
            _ => best,
        };
        self.last_mode = Some(chosen);
        chosen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untouched_arms_score_above_zero() {
        let b = UcbSelector::new();
        let chosen = b.select(&Mode::ALL);
        assert!(Mode::ALL.contains(&chosen));
    }

    #[test]
    fn rewarding_one_arm_repeatedly_favors_it() {
        let mut b = UcbSelector::new();
        for _ in 0..50 {
            b.update(Mode::Rf, 1.0);
            b.update(Mode::Ir, 0.0);
            b.update(Mode::Backscatter, 0.0);
        }
        assert_eq!(b.select(&Mode::ALL), Mode::Rf);
    }

    #[test]
    fn argmax_does_not_switch_within_one_db_margin() {
        let mut sel = ArgmaxSelector::new();
        let snr = |m: Mode| match m {
            Mode::Rf => 5.0,
            Mode::Ir => 5.5,
            Mode::Backscatter => -10.0,
        };
        let first = sel.select(&Mode::ALL, snr);
        let second = sel.select(&Mode::ALL, snr);
        assert_eq!(first, second, "0.5 dB margin must not trigger a switch");
    }

    #[test]
    fn argmax_switches_beyond_one_db_margin() {
        let mut sel = ArgmaxSelector::new();
        let first = sel.select(&Mode::ALL, |m| match m {
            Mode::Rf => 5.0,
            Mode::Ir => 0.0,
            Mode::Backscatter => -10.0,
        });
        assert_eq!(first, Mode::Rf);
        let second = sel.select(&Mode::ALL, |m| match m {
            Mode::Rf => 5.0,
            Mode::Ir => 8.0,
            Mode::Backscatter => -10.0,
        });
        assert_eq!(second, Mode::Ir);
    }
}
