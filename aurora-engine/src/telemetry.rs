//! The per-step JSONL telemetry sink and interactive stdout health events
//! (§6).
//!
//! Grounded in the corpus's append-mode JSONL file pattern
//! (`OpenOptions::new().append(true)`), generalized here to a single
//! per-run log rather than one file per entity.

use aurora_core::Mode;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Default telemetry path when `$AURORA_TELEMETRY_PATH` is unset (§6).
pub const DEFAULT_TELEMETRY_FILENAME: &str = "aurora_telemetry.jsonl";

/// Round to 3 decimal places, matching §6's "3 decimal places on floats".
fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

/// One step's JSONL telemetry record (§6).
#[derive(Debug, Clone, Serialize)]
pub struct TelemetryRecord {
    pub step: u64,
    pub have: u64,
    pub need: u64,
    pub mode: Mode,
    pub tries: u32,
    pub successes: u32,
    pub reward: f64,
    pub snr_rf: f64,
    pub snr_ir: f64,
    pub snr_bs: f64,
    pub soc_src: f64,
    pub duty_left: f64,
    pub elapsed_s: f64,
}

impl TelemetryRecord {
    /// Construct with every float pre-rounded to 3 decimal places.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        step: u64,
        have: u64,
        need: u64,
        mode: Mode,
        tries: u32,
        successes: u32,
        reward: f64,
        snr_rf: f64,
        snr_ir: f64,
        snr_bs: f64,
        soc_src: f64,
        duty_left: f64,
        elapsed_s: f64,
    ) -> Self {
        Self {
            step,
            have,
            need,
            mode,
            tries,
            successes,
            reward: round3(reward),
            snr_rf: round3(snr_rf),
            snr_ir: round3(snr_ir),
            snr_bs: round3(snr_bs),
            soc_src: round3(soc_src),
            duty_left: round3(duty_left),
            elapsed_s: round3(elapsed_s),
        }
    }
}

/// Appends one [`TelemetryRecord`] per step to a JSONL file, flushing after
/// every write.
pub struct TelemetrySink {
    file: File,
}

impl TelemetrySink {
    /// Open (creating if absent, appending otherwise) the telemetry file at
    /// `path`.
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file })
    }

    /// Resolve the path from `$AURORA_TELEMETRY_PATH`, falling back to
    /// [`DEFAULT_TELEMETRY_FILENAME`] (§6).
    pub fn default_path() -> PathBuf {
        std::env::var_os("AURORA_TELEMETRY_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TELEMETRY_FILENAME))
    }

    /// Open at the environment-resolved default path.
    pub fn open_default() -> std::io::Result<Self> {
        Self::open(Self::default_path())
    }

    /// Append one record as a single JSON line.
    pub fn record(&mut self, record: &TelemetryRecord) -> std::io::Result<()> {
        let line = serde_json::to_string(record)?;
        writeln!(self.file, "{line}")?;
        self.file.flush()
    }
}

/// One interactive-mode health event line (§6): written to stdout, flushed
/// immediately, one per flow class per step.
#[derive(Debug, Clone, Serialize)]
pub struct HealthEvent {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub step: u64,
    pub class: aurora_core::FlowClass,
    pub cov: f64,
    pub fail: f64,
    pub gs: u32,
    pub bs: u32,
    pub safety: aurora_core::SafetyStatus,
    pub mode: Mode,
}

impl HealthEvent {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        step: u64,
        class: aurora_core::FlowClass,
        cov: f64,
        fail: f64,
        gs: u32,
        bs: u32,
        safety: aurora_core::SafetyStatus,
        mode: Mode,
    ) -> Self {
        Self {
            kind: "health",
            step,
            class,
            cov: round3(cov),
            fail: round3(fail),
            gs,
            bs,
            safety,
            mode,
        }
    }

    /// Write this event as one JSON line to `out`, flushing immediately.
    pub fn emit(&self, mut out: impl Write) -> std::io::Result<()> {
        let line = serde_json::to_string(self)?;
        writeln!(out, "{line}")?;
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurora_core::{FlowClass, SafetyStatus};

    #[test]
    fn telemetry_record_rounds_floats_to_three_decimals() {
        let r = TelemetryRecord::new(
            1, 10, 20, Mode::Rf, 4, 2, 0.123456, 1.0, 2.0, 3.0, 0.87654, 0.5, 1.23456,
        );
        assert_eq!(r.reward, 0.123);
        assert_eq!(r.soc_src, 0.877);
        assert_eq!(r.elapsed_s, 1.235);
    }

    #[test]
    fn sink_appends_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("telemetry.jsonl");
        {
            let mut sink = TelemetrySink::open(&path).unwrap();
            for step in 0..3 {
                let record = TelemetryRecord::new(
                    step, 0, 10, Mode::Ir, 1, 1, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0, step as f64,
                );
                sink.record(&record).unwrap();
            }
        }
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 3);
    }

    #[test]
    fn health_event_serializes_expected_shape() {
        let event = HealthEvent::new(5, FlowClass::Nerve, 0.9, 0.1, 3, 0, SafetyStatus::Healthy, Mode::Rf);
        let mut buf = Vec::new();
        event.emit(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("\"type\":\"health\""));
        assert!(text.contains("\"class\":\"NERVE\""));
        assert!(text.ends_with('\n'));
    }
}
