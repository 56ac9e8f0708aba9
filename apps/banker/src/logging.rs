//! Tracing setup and structured logging of command results
//!
//! Console output stays quiet by default; `--debug` (or `RUST_LOG`) sends JSON
//! logs to a timestamped file instead so they never mix with rendered output.

use banker_config::Config;
use banker_safety::{RecoveryOutcome, RequestOutcome};
use tracing::{info, warn};

use crate::commands::OperationResult;

const DEFAULT_DEBUG_FILTER: &str = "info,banker=debug,banker_safety=debug,banker_types=debug";

/// Initialize the global tracing subscriber
pub fn init_tracing(json_mode: bool, debug_enabled_flag: bool) {
    // Check if debug logging is enabled
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug_enabled_flag;

    if debug_enabled {
        let log_dir = Config::logs_path();
        if let Err(e) = std::fs::create_dir_all(&log_dir) {
            if !json_mode {
                eprintln!("Warning: Failed to create log directory: {e}");
            }
        }

        let log_file = log_dir.join(format!(
            "banker-{}.log",
            chrono::Utc::now().format("%Y%m%d-%H%M%S")
        ));

        match std::fs::File::create(&log_file) {
            Ok(file) => {
                tracing_subscriber::fmt()
                    .json()
                    .with_writer(file)
                    .with_env_filter(
                        tracing_subscriber::EnvFilter::try_from_default_env()
                            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_DEBUG_FILTER)),
                    )
                    .init();

                if !json_mode {
                    eprintln!("Debug logging enabled: {}", log_file.display());
                }
                return;
            }
            Err(e) => {
                if !json_mode {
                    eprintln!("Warning: Failed to create log file: {e}");
                }
            }
        }
    }

    if json_mode {
        // JSON mode: suppress all console output to avoid contaminating JSON
        tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_env_filter("off")
            .init();
    } else {
        // Normal mode: minimal logging to stderr
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .init();
    }
}

/// Log a command result with structured fields
pub fn log_result(result: &OperationResult) {
    match result {
        OperationResult::Check { state, verdict, .. } => {
            info!(
                command = "check",
                processes = state.processes(),
                resources = state.resources(),
                safe = verdict.safe,
                sequence = ?verdict.sequence,
                "Safety check completed"
            );
        }
        OperationResult::Recover {
            before,
            outcome,
            after,
        } => match outcome {
            RecoveryOutcome::AlreadySafe { process } => {
                info!(
                    command = "recover",
                    process,
                    safe_before = before.safe,
                    "Recovery skipped, process can proceed"
                );
            }
            RecoveryOutcome::Preempted { victim, .. } => {
                info!(
                    command = "recover",
                    victim,
                    safe_before = before.safe,
                    safe_after = ?after.as_ref().map(|verdict| verdict.safe),
                    "Recovery preempted a process"
                );
            }
            RecoveryOutcome::NoProcesses => {
                info!(command = "recover", "Recovery found no processes");
            }
        },
        OperationResult::RecoverUntilSafe { before, report } => {
            if report.verdict.safe {
                info!(
                    command = "recover",
                    safe_before = before.safe,
                    preempted = ?report.preempted,
                    "Recovery loop reached a safe state"
                );
            } else {
                warn!(
                    command = "recover",
                    preempted = ?report.preempted,
                    "Recovery loop stopped while still unsafe"
                );
            }
        }
        OperationResult::Graph { graph, cycle } => {
            info!(
                command = "graph",
                nodes = graph.nodes().len(),
                edges = graph.edges().len(),
                cycle = cycle.is_some(),
                "Allocation graph built"
            );
        }
        OperationResult::Request {
            process, outcome, ..
        } => {
            let decision = match outcome {
                RequestOutcome::Granted { .. } => "granted",
                RequestOutcome::MustWait => "must_wait",
                RequestOutcome::Denied { .. } => "denied",
            };
            info!(command = "request", process, decision, "Resource request decided");
        }
    }
}
