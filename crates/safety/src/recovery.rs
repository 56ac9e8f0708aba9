//! Preemption-based recovery

use banker_types::AllocationState;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::safety::{check_safety, first_eligible, SafetyResult};

/// Result of a single recovery step
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RecoveryOutcome {
    /// `process` can already be satisfied from `available`; nothing changed
    AlreadySafe { process: usize },
    /// `victim`'s allocation was returned to `available`
    Preempted {
        state: AllocationState,
        victim: usize,
    },
    /// There are no processes to preempt
    NoProcesses,
}

/// Outcome of [`recover_until_safe`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RecoveryReport {
    /// State after the last preemption
    pub state: AllocationState,
    /// Victims in the order they were preempted
    pub preempted: Vec<usize>,
    /// Safety verdict for `state`
    pub verdict: SafetyResult,
}

/// Process holding the most units in total, lowest index on ties
///
/// Returns `None` only when there are no processes.
#[must_use]
pub fn select_victim(state: &AllocationState) -> Option<usize> {
    let victim = largest_holder(state, |_| true);
    if let Some(process) = victim {
        debug!(process, held = state.held_by(process), "selected victim");
    }
    victim
}

/// Recover by preempting the largest holder
///
/// If some process's need already fits in `available` the state is reported
/// as [`RecoveryOutcome::AlreadySafe`] and left alone. This is a one-process
/// check, not the full safety algorithm, so run [`check_safety`] on the
/// returned state to confirm the recovery actually helped.
#[must_use]
pub fn recover_from_deadlock(state: &AllocationState) -> RecoveryOutcome {
    let need = state.need_matrix();
    let nobody_finished = vec![false; state.processes()];
    if let Some(process) = first_eligible(&need, state.available(), &nobody_finished) {
        debug!(process, "process can proceed, no preemption needed");
        return RecoveryOutcome::AlreadySafe { process };
    }

    let Some(victim) = select_victim(state) else {
        return RecoveryOutcome::NoProcesses;
    };
    match state.preempt(victim) {
        Some(next) => {
            info!(
                victim,
                released = ?state.allocation()[victim],
                available = ?next.available(),
                "preempted process"
            );
            RecoveryOutcome::Preempted {
                state: next,
                victim,
            }
        }
        None => RecoveryOutcome::NoProcesses,
    }
}

/// Preempt largest holders until the state is safe
///
/// Only processes that still hold something are considered, and at most
/// `max_preemptions` victims are taken. The returned verdict says whether
/// safety was reached.
#[must_use]
pub fn recover_until_safe(state: &AllocationState, max_preemptions: usize) -> RecoveryReport {
    let mut current = state.clone();
    let mut preempted = Vec::new();

    loop {
        let verdict = check_safety(&current);
        if verdict.safe {
            info!(?preempted, "recovered to a safe state");
            return RecoveryReport {
                state: current,
                preempted,
                verdict,
            };
        }

        if preempted.len() >= max_preemptions {
            warn!(max_preemptions, "preemption limit reached, state still unsafe");
            return RecoveryReport {
                state: current,
                preempted,
                verdict,
            };
        }

        let next = largest_holder(&current, |held| held > 0)
            .and_then(|victim| current.preempt(victim).map(|next| (victim, next)));
        let Some((victim, next)) = next else {
            warn!("nothing left to preempt, state still unsafe");
            return RecoveryReport {
                state: current,
                preempted,
                verdict,
            };
        };

        debug!(victim, available = ?next.available(), "preempted process");
        preempted.push(victim);
        current = next;
    }
}

fn largest_holder(state: &AllocationState, eligible: impl Fn(u64) -> bool) -> Option<usize> {
    (0..state.processes())
        .map(|process| (process, state.held_by(process)))
        .filter(|&(_, held)| eligible(held))
        .fold(None, |best, (process, held)| match best {
            Some((_, best_held)) if best_held >= held => best,
            _ => Some((process, held)),
        })
        .map(|(process, _)| process)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(
        allocation: &[Vec<i64>],
        max_demand: &[Vec<i64>],
        available: &[i64],
    ) -> AllocationState {
        AllocationState::validate(
            allocation.len(),
            available.len(),
            allocation,
            max_demand,
            available,
        )
        .unwrap()
    }

    #[test]
    fn test_preempts_largest_holder() {
        let before = state(&[vec![5], vec![1]], &[vec![6], vec![2]], &[0]);
        assert!(!check_safety(&before).safe);

        match recover_from_deadlock(&before) {
            RecoveryOutcome::Preempted { state, victim } => {
                assert_eq!(victim, 0);
                assert_eq!(state.allocation(), &[vec![0], vec![1]]);
                assert_eq!(state.available(), &[5]);
                assert_eq!(state.max_demand(), before.max_demand());
                assert_eq!(state.total_supply(), before.total_supply());
                assert!(check_safety(&state).safe);
            }
            other => panic!("expected preemption, got {other:?}"),
        }
    }

    #[test]
    fn test_already_safe_makes_no_change() {
        let before = state(
            &[vec![0, 1, 0], vec![2, 0, 0]],
            &[vec![7, 5, 3], vec![3, 2, 2]],
            &[3, 3, 2],
        );
        assert_eq!(
            recover_from_deadlock(&before),
            RecoveryOutcome::AlreadySafe { process: 1 }
        );
    }

    #[test]
    fn test_already_safe_can_disagree_with_full_check() {
        // P1 fits right now, but releasing its single unit does not help P0.
        let before = state(&[vec![0], vec![1]], &[vec![3], vec![1]], &[1]);
        assert!(!check_safety(&before).safe);
        assert_eq!(
            recover_from_deadlock(&before),
            RecoveryOutcome::AlreadySafe { process: 1 }
        );
    }

    #[test]
    fn test_victim_ties_go_to_lowest_index() {
        let before = state(
            &[vec![1, 1], vec![2, 0], vec![0, 2]],
            &[vec![3, 3], vec![3, 3], vec![3, 3]],
            &[0, 0],
        );
        assert_eq!(select_victim(&before), Some(0));
        assert!(matches!(
            recover_from_deadlock(&before),
            RecoveryOutcome::Preempted { victim: 0, .. }
        ));
    }

    #[test]
    fn test_zero_holders_still_yield_a_victim() {
        let before = state(&[vec![0], vec![0]], &[vec![1], vec![1]], &[0]);
        assert_eq!(select_victim(&before), Some(0));
        match recover_from_deadlock(&before) {
            RecoveryOutcome::Preempted { state, victim } => {
                assert_eq!(victim, 0);
                assert_eq!(state, before);
            }
            other => panic!("expected preemption, got {other:?}"),
        }
    }

    #[test]
    fn test_no_processes() {
        let empty = state(&[], &[], &[]);
        assert_eq!(select_victim(&empty), None);
        assert_eq!(recover_from_deadlock(&empty), RecoveryOutcome::NoProcesses);
    }

    #[test]
    fn test_recover_until_safe_takes_several_victims() {
        // Releasing the largest holder alone leaves everyone short.
        let before = state(
            &[vec![3], vec![2], vec![2]],
            &[vec![6], vec![6], vec![6]],
            &[0],
        );
        let report = recover_until_safe(&before, 8);
        assert!(report.verdict.safe);
        assert_eq!(report.preempted, vec![0, 1]);
        assert_eq!(report.state.available(), &[5]);
        assert_eq!(report.verdict.sequence, vec![2, 0, 1]);
        assert_eq!(report.state.total_supply(), before.total_supply());
    }

    #[test]
    fn test_recover_until_safe_stops_early_when_safe() {
        let before = state(&[vec![5], vec![1]], &[vec![6], vec![2]], &[0]);
        let report = recover_until_safe(&before, 8);
        assert!(report.verdict.safe);
        assert_eq!(report.preempted, vec![0]);
        assert_eq!(report.verdict.sequence, vec![1, 0]);
    }

    #[test]
    fn test_recover_until_safe_respects_limit() {
        let before = state(
            &[vec![3], vec![2], vec![2]],
            &[vec![6], vec![6], vec![6]],
            &[0],
        );
        let report = recover_until_safe(&before, 1);
        assert!(!report.verdict.safe);
        assert_eq!(report.preempted, vec![0]);
    }

    #[test]
    fn test_recover_until_safe_gives_up_when_nothing_is_held() {
        let before = state(&[vec![0], vec![0]], &[vec![1], vec![1]], &[0]);
        let report = recover_until_safe(&before, 8);
        assert!(!report.verdict.safe);
        assert!(report.preempted.is_empty());
        assert_eq!(report.state, before);
    }

    #[test]
    fn test_recover_until_safe_on_safe_state_is_a_no_op() {
        let before = state(&[vec![1]], &[vec![1]], &[0]);
        let report = recover_until_safe(&before, 0);
        assert!(report.verdict.safe);
        assert!(report.preempted.is_empty());
    }
}
