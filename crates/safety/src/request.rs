//! Resource-request algorithm

use banker_errors::RequestError;
use banker_types::{fits_within, AllocationState};
use serde::Serialize;
use tracing::{debug, info};

use crate::safety::check_safety;

/// Decision on a resource request
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RequestOutcome {
    /// The request keeps the system safe and has been applied to `state`
    Granted {
        state: AllocationState,
        sequence: Vec<usize>,
    },
    /// Not enough units are free right now
    MustWait,
    /// Granting would leave the system unsafe
    Denied { sequence: Vec<usize> },
}

/// Decide whether `process` may take `request` units now
///
/// The request is granted only if the state that would result from granting
/// it passes [`check_safety`]. The input state is never modified.
///
/// # Errors
///
/// Returns an error if the process does not exist, the request does not have
/// one entry per resource, or it asks for more than the process still needs.
pub fn request_resources(
    state: &AllocationState,
    process: usize,
    request: &[u64],
) -> Result<RequestOutcome, RequestError> {
    let need = state.need(process).ok_or(RequestError::UnknownProcess {
        process,
        processes: state.processes(),
    })?;
    if request.len() != state.resources() {
        return Err(RequestError::LengthMismatch {
            expected: state.resources(),
            actual: request.len(),
        });
    }
    if let Some((resource, (&requested, &need))) = request
        .iter()
        .zip(&need)
        .enumerate()
        .find(|(_, (requested, need))| requested > need)
    {
        return Err(RequestError::ExceedsClaim {
            process,
            resource,
            requested,
            need,
        });
    }

    if !fits_within(request, state.available()) {
        debug!(process, ?request, available = ?state.available(), "request must wait");
        return Ok(RequestOutcome::MustWait);
    }

    let Some(tentative) = state.grant(process, request) else {
        return Ok(RequestOutcome::MustWait);
    };
    let verdict = check_safety(&tentative);
    if verdict.safe {
        info!(process, ?request, "request granted");
        Ok(RequestOutcome::Granted {
            state: tentative,
            sequence: verdict.sequence,
        })
    } else {
        info!(process, ?request, "request denied, granting would be unsafe");
        Ok(RequestOutcome::Denied {
            sequence: verdict.sequence,
        })
    }
}
