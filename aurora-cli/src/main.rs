//! `aurora-cli`: batch and interactive delivery drivers sharing one
//! engine step loop (§6, §9 redesign flag: "implement once as a step
//! function ... run it from both drivers").

mod batch;
mod interactive;
mod scenario;

use anyhow::Result;
use clap::{Parser, Subcommand};
use interactive::InteractiveArgs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "aurora-cli", about = "Aurora-X batch and interactive delivery drivers")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a CSV of scenarios to completion and write a results CSV.
    Batch {
        /// Path to the scenarios CSV (name,flow_class,priority,deadline_s,payload_bytes,duty,optical,backscatter,seed).
        #[arg(long)]
        scenarios: PathBuf,
        /// Where to write the results CSV.
        #[arg(long)]
        out: PathBuf,
        /// Per-scenario step cap.
        #[arg(long, default_value_t = 500)]
        max_steps: u64,
    },
    /// Run one token interactively in real time, streaming telemetry and
    /// stdout health events.
    Interactive {
        #[arg(long, default_value = "GLAND")]
        flow_class: String,
        #[arg(long, default_value = "NORMAL")]
        priority: String,
        #[arg(long, default_value_t = 30.0)]
        deadline_s: f64,
        #[arg(long, default_value_t = 2048)]
        payload_bytes: usize,
        #[arg(long, default_value_t = 1.0)]
        duty: f64,
        #[arg(long, default_value_t = true)]
        optical: bool,
        #[arg(long, default_value_t = true)]
        backscatter: bool,
        #[arg(long, default_value_t = 1)]
        seed: u64,
        #[arg(long, default_value = "aurora_interactive_config.json")]
        config: PathBuf,
        #[arg(long, default_value_t = 5000)]
        max_steps: u64,
    },
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let delivered = match cli.command {
        Command::Batch { scenarios, out, max_steps } => batch::run_batch(&scenarios, &out, max_steps)?,
        Command::Interactive {
            flow_class,
            priority,
            deadline_s,
            payload_bytes,
            duty,
            optical,
            backscatter,
            seed,
            config,
            max_steps,
        } => interactive::run_interactive(&InteractiveArgs {
            flow_class,
            priority,
            deadline_s,
            payload_bytes,
            duty,
            optical,
            backscatter,
            seed,
            config_path: config,
            max_steps,
        })?,
    };

    Ok(if delivered { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
