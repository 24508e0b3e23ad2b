//! Failure propagation from node masks to scheduled requests.
//!
//! A request fails in its slot when the path it is served over visits a
//! node that failed in that slot. Each failure costs one extra slot.

use std::collections::BTreeMap;

use crate::config::MissingPathPolicy;
use crate::error::{Result, SchedulingError};
use crate::models::{FailureMask, FailureOutcome, PathIndex, Policy, Round, Schedule};

/// Checks one schedule against a failure mask.
///
/// Requests without a path are recorded as placeholders or abort the
/// check, depending on `missing`. The schedule is never modified.
pub fn check_schedule(
    schedule: &Schedule,
    round: &Round,
    paths: &PathIndex,
    mask: &FailureMask,
    missing: MissingPathPolicy,
) -> Result<FailureOutcome> {
    let mut outcome = FailureOutcome::default();

    for entry in &schedule.entries {
        let path = round
            .get(&entry.request_id)
            .and_then(|request| paths.path_for(request));

        let Some(path) = path else {
            match missing {
                MissingPathPolicy::Abort => {
                    return Err(SchedulingError::NoPathAvailable {
                        schedule: schedule.policy.to_string(),
                        request_id: entry.request_id.clone(),
                    });
                }
                MissingPathPolicy::Placeholder => {
                    log::warn!(
                        "{}: no path for '{}', recorded as placeholder",
                        schedule.policy,
                        entry.request_id
                    );
                    outcome.record_no_path(entry.request_id.clone());
                    continue;
                }
            }
        };

        if let Some(failed) = mask.failed_nodes(entry.slot) {
            if path.intersects(failed) {
                outcome.record_failure(entry.slot, entry.request_id.clone());
            }
        }
    }

    Ok(outcome)
}

/// Checks every schedule of one round against the same failure mask.
pub fn check_failures_across_schedules(
    schedules: &[&Schedule],
    round: &Round,
    paths: &PathIndex,
    mask: &FailureMask,
    missing: MissingPathPolicy,
) -> Result<BTreeMap<Policy, FailureOutcome>> {
    schedules
        .iter()
        .map(|schedule| {
            check_schedule(schedule, round, paths, mask, missing)
                .map(|outcome| (schedule.policy, outcome))
        })
        .collect()
}

/// Makespan plus one retry slot per failed request.
pub fn failure_adjusted_slots(schedule: &Schedule, outcome: &FailureOutcome) -> u64 {
    u64::from(schedule.slots_used()) + outcome.failure_count() as u64
}
