//! Flocc Simulator CLI
//!
//! Runs a lending-ledger scenario and reports every action outcome.

use clap::{Parser, Subcommand};
use flocc_simulator::{RunOverrides, Simulator, SimulatorConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "flocc-sim")]
#[command(about = "Deterministic actor/action simulator")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the default scenario as TOML
    Init,

    /// Run a scenario
    Run {
        /// Scenario file (TOML). Defaults apply to anything it omits
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of rounds
        #[arg(short, long, allow_hyphen_values = true)]
        iterations: Option<i64>,

        /// Random seed
        #[arg(short, long)]
        seed: Option<String>,

        /// Number of borrowers
        #[arg(long)]
        borrowers: Option<usize>,

        /// Permute actor order every round
        #[arg(long, overrides_with = "no_shuffle")]
        shuffle: bool,

        /// Keep registration order even if the scenario shuffles
        #[arg(long, overrides_with = "shuffle")]
        no_shuffle: bool,

        /// Stop at the first failed or errored action
        #[arg(long, overrides_with = "no_abort_on_violation")]
        abort_on_violation: bool,

        /// Keep running after violations even if the scenario aborts
        #[arg(long, overrides_with = "abort_on_violation")]
        no_abort_on_violation: bool,

        /// Bound on each execute/validate call (e.g., "500ms", "2s")
        #[arg(long)]
        timeout: Option<humantime::Duration>,

        /// Inject a ledger fault into every Nth borrow
        #[arg(long)]
        fault_every: Option<u64>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Resolve a `--flag` / `--no-flag` pair. Neither set keeps the file value.
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            // No tracing for init - output goes to stdout
            print!("{}", SimulatorConfig::default().to_toml_string()?);
        }

        Commands::Run {
            config,
            iterations,
            seed,
            borrowers,
            shuffle,
            no_shuffle,
            abort_on_violation,
            no_abort_on_violation,
            timeout,
            fault_every,
            json,
        } => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
                )
                .with_writer(std::io::stderr)
                .init();

            let mut scenario = match config {
                Some(path) => SimulatorConfig::load(&path)?,
                None => SimulatorConfig::default(),
            };
            scenario.apply(RunOverrides {
                iterations,
                seed,
                borrowers,
                shuffle_agents: switch(shuffle, no_shuffle),
                abort_on_violation: switch(abort_on_violation, no_abort_on_violation),
                per_action_timeout: timeout.map(|t| t.to_string()),
                fault_every,
            });

            let mut simulator = Simulator::new(&scenario)?;

            let cancel = simulator.cancellation_token();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    cancel.cancel();
                }
            });

            let report = simulator.run().await;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                report.print();
            }

            if !report.is_clean() {
                let summary = report.summary();
                return Err(format!(
                    "run recorded {} failed and {} errored actions ({:?})",
                    summary.fail_count, summary.error_count, summary.final_status
                )
                .into());
            }
        }
    }

    Ok(())
}
