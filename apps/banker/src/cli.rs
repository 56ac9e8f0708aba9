//! Command line interface definition

use banker_types::ColorChoice;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// banker - Deadlock avoidance and recovery toolkit
#[derive(Parser)]
#[command(name = "banker")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Deadlock avoidance and recovery toolkit based on the Banker's Algorithm")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Write debug logs to the log directory
    #[arg(long, global = true)]
    pub debug: bool,

    /// Color output control
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Where the allocation state comes from
///
/// Either a scenario file or inline rows; the two cannot be mixed.
#[derive(Args, Debug, Clone)]
pub struct ScenarioArgs {
    /// Scenario file (TOML, or JSON with a .json extension)
    #[arg(value_name = "FILE", conflicts_with_all = ["allocation", "max_demand", "available"])]
    pub file: Option<PathBuf>,

    /// Allocation row for the next process, e.g. "0,1,0" (repeat per process)
    #[arg(long, value_name = "ROW")]
    pub allocation: Vec<String>,

    /// Maximum demand row for the next process (repeat per process)
    #[arg(long = "max", value_name = "ROW")]
    pub max_demand: Vec<String>,

    /// Available units per resource, e.g. "3,3,2" (an empty row means no resource types)
    #[arg(long, value_name = "ROW")]
    pub available: Option<String>,

    /// Declared number of processes (defaults to the number of rows)
    #[arg(long, value_name = "N")]
    pub processes: Option<usize>,

    /// Declared number of resource types (defaults to the available row length)
    #[arg(long, value_name = "M")]
    pub resources: Option<usize>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Check whether the state is safe and print a safe sequence
    #[command(alias = "c")]
    Check {
        #[command(flatten)]
        scenario: ScenarioArgs,
    },

    /// Preempt the largest holder to recover from an unsafe state
    Recover {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Keep preempting until the state is safe
        #[arg(long)]
        until_safe: bool,

        /// Maximum number of victims with --until-safe
        #[arg(long, value_name = "N", requires = "until_safe")]
        max_preemptions: Option<usize>,
    },

    /// Show the resource-allocation graph
    Graph {
        #[command(flatten)]
        scenario: ScenarioArgs,
    },

    /// Ask whether a process may be granted more resources now
    Request {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Requesting process index
        #[arg(long, short)]
        process: usize,

        /// Requested units per resource, e.g. "1,0,2"
        #[arg(long, short, value_name = "ROW")]
        request: String,
    },
}
