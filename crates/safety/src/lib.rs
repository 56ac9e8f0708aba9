#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Deadlock avoidance and recovery for banker
//!
//! This crate implements the Banker's Algorithm safety check over a validated
//! [`AllocationState`], the largest-holder preemption heuristic used to
//! recover from an unsafe state, the classic resource-request algorithm, and
//! the resource-allocation graph derived from the same state.
//!
//! Every operation is a pure function of its input snapshot. Operations that
//! change the state return a new [`AllocationState`] and leave the original
//! untouched.

mod graph;
mod recovery;
mod request;
mod safety;

pub use graph::{build_graph, AllocationGraph, EdgeKind, GraphEdge, GraphNode, NodeId, NodeKind};
pub use recovery::{
    recover_from_deadlock, recover_until_safe, select_victim, RecoveryOutcome, RecoveryReport,
};
pub use request::{request_resources, RequestOutcome};
pub use safety::{check_safety, is_safe_sequence, SafetyResult};

pub use banker_types::AllocationState;
