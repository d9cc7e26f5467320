//! Intention grammar parsing (§6) and interactive config reload (§6, §9).
//!
//! The Intention parser replaces the stub described in the source (§9
//! redesign flag): unknown keys are ignored, malformed values are rejected
//! with an explicit [`Error::Config`].

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::SystemTime;

/// Mode-selection strategy requested by an [`Intention`] (§4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selector {
    /// Highest-EWMA-SNR selector with hysteresis.
    Argmax,
    /// UCB1-style multi-armed bandit (the default when `selector` is absent).
    Ucb,
}

/// A parsed Intention string (§6): `key:value` pairs separated by `;`.
#[derive(Debug, Clone, PartialEq)]
pub struct Intention {
    pub deadline_s: f64,
    pub reliability: f64,
    pub duty: f64,
    pub optical: bool,
    pub backscatter: bool,
    pub ris_tiles: u32,
    pub selector: Selector,
}

impl Default for Intention {
    fn default() -> Self {
        Self {
            deadline_s: 30.0,
            reliability: 0.97,
            duty: 1.0,
            optical: true,
            backscatter: true,
            ris_tiles: 0,
            selector: Selector::Ucb,
        }
    }
}

impl Intention {
    /// Parse an Intention string per §6's grammar.
    ///
    /// Unknown keys are ignored (logged at `debug!`). A recognized key with a
    /// value that fails to parse into its expected type is rejected with
    /// [`Error::Config`] — the whole Intention is invalid, not just that key.
    pub fn parse(s: &str) -> Result<Self> {
        let mut out = Intention::default();
        for raw_pair in s.split(';') {
            let pair = raw_pair.trim();
            if pair.is_empty() {
                continue;
            }
            let (key, value) = pair.split_once(':').ok_or_else(|| {
                Error::config(format!("malformed intention segment (missing ':'): {pair}"))
            })?;
            let key = key.trim();
            let value = value.trim();
            match key {
                "deadline" => {
                    out.deadline_s = parse_f64(key, value)?;
                }
                "reliability" => {
                    out.reliability = parse_unit_interval(key, value)?;
                }
                "duty" => {
                    out.duty = parse_unit_interval(key, value)?;
                }
                "optical" => {
                    out.optical = parse_on_off(key, value)?;
                }
                "backscatter" => {
                    out.backscatter = parse_on_off(key, value)?;
                }
                "ris" => {
                    out.ris_tiles = value.parse::<u32>().map_err(|_| {
                        Error::config(format!("malformed value for 'ris': {value}"))
                    })?;
                }
                "selector" => {
                    out.selector = match value {
                        "argmax" => Selector::Argmax,
                        other => {
                            return Err(Error::config(format!(
                                "unrecognized selector '{other}' (expected 'argmax')"
                            )))
                        }
                    };
                }
                unknown => {
                    tracing::debug!(key = unknown, "ignoring unknown intention key");
                }
            }
        }
        Ok(out)
    }
}

fn parse_f64(key: &str, value: &str) -> Result<f64> {
    value
        .parse::<f64>()
        .map_err(|_| Error::config(format!("malformed float value for '{key}': {value}")))
}

fn parse_unit_interval(key: &str, value: &str) -> Result<f64> {
    let v = parse_f64(key, value)?;
    if !(0.0..=1.0).contains(&v) {
        return Err(Error::config(format!(
            "'{key}' must be within [0,1], got {v}"
        )));
    }
    Ok(v)
}

fn parse_on_off(key: &str, value: &str) -> Result<bool> {
    match value {
        "on" => Ok(true),
        "off" => Ok(false),
        other => Err(Error::config(format!(
            "'{key}' must be 'on' or 'off', got '{other}'"
        ))),
    }
}

/// The small fixed schema polled from `aurora_interactive_config.json` every
/// 20 steps (§6).
///
/// `success_prob_nerve`/`gland`/`muscle` are parsed for wire compatibility
/// but are not consumed anywhere in the adaptation path — see `DESIGN.md`
/// for the Open Question resolution (§9).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct InteractiveConfig {
    pub alpha_up: f64,
    pub alpha_down: f64,
    pub panic_boost_steps: u32,
    pub success_prob_nerve: f64,
    pub success_prob_gland: f64,
    pub success_prob_muscle: f64,
}

impl Default for InteractiveConfig {
    fn default() -> Self {
        Self {
            alpha_up: 0.10,
            alpha_down: 0.02,
            panic_boost_steps: 3,
            success_prob_nerve: 0.999,
            success_prob_gland: 0.97,
            success_prob_muscle: 0.9,
        }
    }
}

impl InteractiveConfig {
    fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(Error::from)?;
        serde_json::from_str(&data).map_err(Error::from)
    }
}

/// Polls `path` for [`InteractiveConfig`] changes, debouncing parse errors by
/// keeping the prior configuration (§9 redesign flag: "implement a proper
/// JSON parse of a small fixed schema, and debounce reload errors").
pub struct ConfigReloader {
    path: std::path::PathBuf,
    current: InteractiveConfig,
    last_mtime: Option<SystemTime>,
}

impl ConfigReloader {
    /// Create a reloader. If `path` does not exist yet, the default
    /// configuration is used until it appears.
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        let path = path.into();
        let current = InteractiveConfig::from_file(&path).unwrap_or_default();
        let last_mtime = std::fs::metadata(&path).ok().and_then(|m| m.modified().ok());
        Self {
            path,
            current,
            last_mtime,
        }
    }

    /// Current configuration (always valid, possibly stale).
    pub fn current(&self) -> InteractiveConfig {
        self.current
    }

    /// Re-check the file on disk. Call this every 20 steps per §6. On parse
    /// failure, the prior configuration is kept and a warning is logged.
    pub fn poll(&mut self) {
        let mtime = match std::fs::metadata(&self.path).ok().and_then(|m| m.modified().ok()) {
            Some(t) => t,
            None => return,
        };
        if Some(mtime) == self.last_mtime {
            return;
        }
        self.last_mtime = Some(mtime);
        match InteractiveConfig::from_file(&self.path) {
            Ok(cfg) => {
                tracing::info!("interactive config reloaded");
                self.current = cfg;
            }
            Err(e) => {
                tracing::warn!(error = %e, "interactive config reload failed, keeping prior config");
            }
        }
    }
}
