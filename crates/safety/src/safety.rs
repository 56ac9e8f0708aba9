//! Banker's Algorithm safety check

use banker_types::{fits_within, AllocationState};
use serde::Serialize;
use tracing::{debug, info};

/// Verdict of a safety check
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SafetyResult {
    /// Whether every process can run to completion
    pub safe: bool,
    /// Completion order found; partial when the state is unsafe
    pub sequence: Vec<usize>,
}

impl SafetyResult {
    /// Processes that could not be shown to finish
    #[must_use]
    pub fn stuck(&self, processes: usize) -> Vec<usize> {
        (0..processes)
            .filter(|process| !self.sequence.contains(process))
            .collect()
    }
}

/// Run the safety algorithm over `state`
///
/// Each round picks the lowest-indexed unfinished process whose need fits in
/// the working vector, reclaims its allocation and restarts the scan from
/// process 0. The same input therefore always yields the same sequence.
#[must_use]
pub fn check_safety(state: &AllocationState) -> SafetyResult {
    let processes = state.processes();
    let need = state.need_matrix();
    let mut work = state.available().to_vec();
    let mut finish = vec![false; processes];
    let mut sequence = Vec::with_capacity(processes);

    while sequence.len() < processes {
        let Some(process) = first_eligible(&need, &work, &finish) else {
            info!(
                completed = sequence.len(),
                processes,
                ?sequence,
                "unsafe state: no remaining process can finish"
            );
            return SafetyResult {
                safe: false,
                sequence,
            };
        };

        reclaim(&mut work, &state.allocation()[process]);
        finish[process] = true;
        sequence.push(process);
        debug!(process, ?work, "process can finish, allocation reclaimed");
    }

    info!(?sequence, "safe state");
    SafetyResult {
        safe: true,
        sequence,
    }
}

/// Check that `sequence` is a complete order in which every process can finish
///
/// Unlike [`check_safety`] this replays a caller-supplied order instead of
/// searching for one.
#[must_use]
pub fn is_safe_sequence(state: &AllocationState, sequence: &[usize]) -> bool {
    let processes = state.processes();
    if sequence.len() != processes {
        return false;
    }

    let mut work = state.available().to_vec();
    let mut finish = vec![false; processes];
    for &process in sequence {
        let Some(need) = state.need(process) else {
            return false;
        };
        if finish[process] || !fits_within(&need, &work) {
            return false;
        }
        reclaim(&mut work, &state.allocation()[process]);
        finish[process] = true;
    }
    true
}

/// Lowest-indexed unfinished process whose need fits in `work`
pub(crate) fn first_eligible(need: &[Vec<u64>], work: &[u64], finish: &[bool]) -> Option<usize> {
    need.iter()
        .zip(finish)
        .position(|(row, &done)| !done && fits_within(row, work))
}

fn reclaim(work: &mut [u64], allocation: &[u64]) {
    for (free, &held) in work.iter_mut().zip(allocation) {
        *free = free.saturating_add(held);
    }
}
