//! Batch scenario driver: reads a fixed-schema CSV of scenarios, runs each
//! to completion against a `SimulatedHal`, and writes one result row per
//! scenario (§6 "batch harness"). No `csv` crate sits in the dependency
//! stack for this — the schema is small and fixed, so a hand-rolled split
//! mirrors how the corpus's own fixed-shape config files get parsed
//! without reaching for a full parser.

use crate::scenario::{parse_flow_class, parse_priority, run_scenario, ScenarioSpec};
use anyhow::{bail, Context, Result};
use aurora_engine::EngineState;
use std::fs;
use std::io::Write;
use std::path::Path;

const HEADER: &str = "name,flow_class,priority,deadline_s,payload_bytes,duty,optical,backscatter,seed";

fn parse_bool(field: &str) -> Result<bool> {
    match field.trim() {
        "1" | "true" | "TRUE" | "yes" => Ok(true),
        "0" | "false" | "FALSE" | "no" => Ok(false),
        other => bail!("expected a boolean field, got '{other}'"),
    }
}

/// Parse scenario rows out of a CSV file, skipping the header and blank
/// lines.
pub fn load_scenarios(path: &Path) -> Result<Vec<ScenarioSpec>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let mut scenarios = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || lineno == 0 {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != 9 {
            bail!(
                "line {}: expected 9 fields matching '{HEADER}', got {}",
                lineno + 1,
                fields.len()
            );
        }
        scenarios.push(ScenarioSpec {
            name: fields[0].to_string(),
            flow_class: parse_flow_class(fields[1])?,
            priority: parse_priority(fields[2])?,
            deadline_s: fields[3]
                .parse()
                .with_context(|| format!("line {}: deadline_s", lineno + 1))?,
            payload_bytes: fields[4]
                .parse()
                .with_context(|| format!("line {}: payload_bytes", lineno + 1))?,
            duty: fields[5]
                .parse()
                .with_context(|| format!("line {}: duty", lineno + 1))?,
            optical: parse_bool(fields[6])?,
            backscatter: parse_bool(fields[7])?,
            seed: fields[8]
                .parse()
                .with_context(|| format!("line {}: seed", lineno + 1))?,
        });
    }
    Ok(scenarios)
}

/// Run every scenario in `scenarios_path`, writing a results CSV to
/// `out_path`. Returns `true` iff every scenario delivered — the exit code
/// the caller reports to the shell (§6).
pub fn run_batch(scenarios_path: &Path, out_path: &Path, max_steps: u64) -> Result<bool> {
    let scenarios = load_scenarios(scenarios_path)?;
    let mut out = fs::File::create(out_path).with_context(|| format!("creating {}", out_path.display()))?;
    writeln!(out, "name,delivered,coverage,steps,elapsed_s,signature_ok")?;

    let mut all_delivered = true;
    for spec in &scenarios {
        let outcome = run_scenario(spec, max_steps, false);
        let delivered = outcome.state == EngineState::Delivered;
        all_delivered &= delivered;
        writeln!(
            out,
            "{},{},{:.4},{},{:.3},{}",
            spec.name,
            delivered,
            outcome.coverage,
            outcome.steps,
            outcome.elapsed_s,
            outcome.signature_ok.map(|b| b.to_string()).unwrap_or_default(),
        )?;
        tracing::info!(
            name = %spec.name,
            delivered,
            coverage = outcome.coverage,
            steps = outcome.steps,
            "scenario complete"
        );
    }
    Ok(all_delivered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_well_formed_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenarios.csv");
        let mut f = fs::File::create(&path).unwrap();
        writeln!(f, "{HEADER}").unwrap();
        writeln!(f, "one,MUSCLE,NORMAL,30,1024,1.0,true,true,7").unwrap();
        drop(f);
        let scenarios = load_scenarios(&path).unwrap();
        assert_eq!(scenarios.len(), 1);
        assert_eq!(scenarios[0].name, "one");
        assert_eq!(scenarios[0].payload_bytes, 1024);
    }

    #[test]
    fn rejects_malformed_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenarios.csv");
        let mut f = fs::File::create(&path).unwrap();
        writeln!(f, "{HEADER}").unwrap();
        writeln!(f, "bad,row,too,few,fields").unwrap();
        drop(f);
        assert!(load_scenarios(&path).is_err());
    }

    #[test]
    fn runs_batch_and_writes_results() {
        let dir = tempfile::tempdir().unwrap();
        let scenarios_path = dir.path().join("scenarios.csv");
        let out_path = dir.path().join("results.csv");
        let mut f = fs::File::create(&scenarios_path).unwrap();
        writeln!(f, "{HEADER}").unwrap();
        writeln!(f, "good,MUSCLE,NORMAL,30,512,1.0,true,true,11").unwrap();
        drop(f);

        let all_ok = run_batch(&scenarios_path, &out_path, 500).unwrap();
        assert!(all_ok);
        let results = fs::read_to_string(&out_path).unwrap();
        assert_eq!(results.lines().count(), 2);
        assert!(results.lines().nth(1).unwrap().starts_with("good,true,"));
    }
}
