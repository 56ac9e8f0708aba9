//! Command execution
//!
//! Turns parsed CLI arguments into a validated allocation state, runs the
//! requested operation and packages the outcome for rendering.

use std::path::Path;

use banker_config::Config;
use banker_errors::InputError;
use banker_safety::{
    build_graph, check_safety, recover_from_deadlock, recover_until_safe, request_resources,
    AllocationGraph, AllocationState, NodeId, RecoveryOutcome, RecoveryReport, RequestOutcome,
    SafetyResult,
};
use banker_types::{parse_row, Scenario};
use serde::Serialize;
use tracing::debug;

use crate::cli::{Commands, ScenarioArgs};
use crate::error::CliError;

/// Outcome of a command, ready to render
#[derive(Debug, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum OperationResult {
    Check {
        state: AllocationState,
        need: Vec<Vec<u64>>,
        verdict: SafetyResult,
    },
    Recover {
        before: SafetyResult,
        outcome: RecoveryOutcome,
        /// Verdict for the recovered state, when rechecking is enabled
        #[serde(skip_serializing_if = "Option::is_none")]
        after: Option<SafetyResult>,
    },
    RecoverUntilSafe {
        before: SafetyResult,
        report: RecoveryReport,
    },
    Graph {
        graph: AllocationGraph,
        cycle: Option<Vec<NodeId>>,
    },
    Request {
        process: usize,
        request: Vec<u64>,
        outcome: RequestOutcome,
    },
}

/// Run one command against the configuration
pub async fn execute_command(
    command: Commands,
    config: &Config,
) -> Result<OperationResult, CliError> {
    match command {
        Commands::Check { scenario } => {
            let state = load_state(&scenario).await?;
            let verdict = check_safety(&state);
            Ok(OperationResult::Check {
                need: state.need_matrix(),
                state,
                verdict,
            })
        }
        Commands::Recover {
            scenario,
            until_safe,
            ..
        } => {
            let state = load_state(&scenario).await?;
            let before = check_safety(&state);
            if until_safe {
                let report = recover_until_safe(&state, config.recovery.max_preemptions);
                return Ok(OperationResult::RecoverUntilSafe { before, report });
            }

            let outcome = recover_from_deadlock(&state);
            let after = match &outcome {
                RecoveryOutcome::Preempted { state, .. } if config.recovery.recheck => {
                    Some(check_safety(state))
                }
                _ => None,
            };
            Ok(OperationResult::Recover {
                before,
                outcome,
                after,
            })
        }
        Commands::Graph { scenario } => {
            let state = load_state(&scenario).await?;
            let graph = build_graph(&state);
            let cycle = graph.find_cycle();
            Ok(OperationResult::Graph { graph, cycle })
        }
        Commands::Request {
            scenario,
            process,
            request,
        } => {
            let state = load_state(&scenario).await?;
            let request = parse_request(&request)?;
            let outcome = request_resources(&state, process, &request)?;
            Ok(OperationResult::Request {
                process,
                request,
                outcome,
            })
        }
    }
}

/// Build and validate the allocation state described by `args`
async fn load_state(args: &ScenarioArgs) -> Result<AllocationState, CliError> {
    let mut scenario = match (&args.file, &args.available) {
        (Some(path), _) => read_scenario(path).await?,
        (None, Some(available)) => {
            Scenario::from_rows(&args.allocation, &args.max_demand, available)?
        }
        (None, None) => {
            return Err(CliError::InvalidArguments(
                "provide a scenario file or --available with --allocation/--max rows".to_string(),
            ))
        }
    };

    if args.processes.is_some() {
        scenario.processes = args.processes;
    }
    if args.resources.is_some() {
        scenario.resources = args.resources;
    }

    let (processes, resources) = scenario.dimensions();
    debug!(processes, resources, "scenario loaded");
    Ok(scenario.validate()?)
}

async fn read_scenario(path: &Path) -> Result<Scenario, CliError> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| InputError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let scenario = if is_json {
        Scenario::from_json_str(&contents)?
    } else {
        Scenario::from_toml_str(&contents)?
    };
    Ok(scenario)
}

fn parse_request(row: &str) -> Result<Vec<u64>, CliError> {
    parse_row(row)?
        .into_iter()
        .map(|value| {
            u64::try_from(value).map_err(|_| {
                CliError::from(InputError::InvalidNumber {
                    row: row.to_string(),
                    token: value.to_string(),
                })
            })
        })
        .collect()
}
