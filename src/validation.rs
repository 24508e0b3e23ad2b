//! Input and output validation for slot scheduling.
//!
//! Checks structural integrity of request batches before scheduling and
//! of schedules after it. Detects:
//! - Empty rounds
//! - Duplicate request IDs within a round
//! - Requests whose source equals their destination
//! - Schedules that miss, invent, or double-assign requests
//! - Slots holding more requests than the concurrency budget

use std::collections::{HashMap, HashSet};

use crate::error::{Result, SchedulingError};
use crate::models::{RequestBatch, Round, Schedule};

/// Validation result.
pub type ValidationResult = std::result::Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A round has no requests.
    EmptyRound,
    /// Two requests in one round share an ID.
    DuplicateId,
    /// A request starts and ends at the same node.
    SelfLoop,
    /// A request of the round is absent from the schedule.
    MissingAssignment,
    /// A request is assigned more than once.
    DuplicateAssignment,
    /// A schedule entry references a request outside the round.
    UnknownRequest,
    /// A slot holds more requests than the budget.
    CapacityExceeded,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a request batch.
///
/// Checks:
/// 1. Every round has at least one request
/// 2. Every round passes [`validate_round`]
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_batch(batch: &RequestBatch) -> ValidationResult {
    let mut errors = Vec::new();

    for round in &batch.rounds {
        if round.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyRound,
                format!("Round {} has no requests", round.number),
            ));
        }
        if let Err(round_errors) = validate_round(round) {
            errors.extend(round_errors);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates the requests of one round.
///
/// Checks that request IDs are unique within the round and that no
/// request has identical source and destination. An empty round passes;
/// the schedulers reject it with `EmptyBatch`.
pub fn validate_round(round: &Round) -> ValidationResult {
    let mut errors = Vec::new();

    let mut ids = HashSet::new();
    for r in &round.requests {
        if !ids.insert(r.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate request ID in round {}: {}", round.number, r.id),
            ));
        }
        if r.source == r.destination {
            errors.push(ValidationError::new(
                ValidationErrorKind::SelfLoop,
                format!("Request '{}' starts and ends at '{}'", r.id, r.source),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a schedule against the round it covers.
///
/// Checks coverage (every request assigned exactly once, nothing extra)
/// and that no slot exceeds `budget` entries.
pub fn validate_schedule(schedule: &Schedule, round: &Round, budget: usize) -> ValidationResult {
    let mut errors = Vec::new();

    let mut assigned: HashMap<&str, usize> = HashMap::new();
    for e in &schedule.entries {
        *assigned.entry(e.request_id.as_str()).or_insert(0) += 1;
        if round.get(&e.request_id).is_none() {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownRequest,
                format!(
                    "{} assigns '{}' which is not in round {}",
                    schedule.policy, e.request_id, round.number
                ),
            ));
        }
    }

    for r in &round.requests {
        match assigned.get(r.id.as_str()) {
            None => errors.push(ValidationError::new(
                ValidationErrorKind::MissingAssignment,
                format!("{} never assigns '{}'", schedule.policy, r.id),
            )),
            Some(&n) if n > 1 => errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateAssignment,
                format!("{} assigns '{}' {} times", schedule.policy, r.id, n),
            )),
            Some(_) => {}
        }
    }

    for (slot, count) in schedule.occupancy() {
        if count > budget {
            errors.push(ValidationError::new(
                ValidationErrorKind::CapacityExceeded,
                format!(
                    "{} slot {} holds {} requests (budget {})",
                    schedule.policy, slot, count, budget
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Fails with `ResourceOverflowInvariantViolation` on the first slot of
/// `schedule` holding more than `budget` entries.
pub fn ensure_within_budget(schedule: &Schedule, budget: usize) -> Result<()> {
    match schedule
        .occupancy()
        .into_iter()
        .find(|&(_, count)| count > budget)
    {
        Some((slot, occupancy)) => {
            log::error!(
                "{} round {}: slot {} over budget ({} > {})",
                schedule.policy,
                schedule.round,
                slot,
                occupancy,
                budget
            );
            Err(SchedulingError::ResourceOverflowInvariantViolation {
                policy: schedule.policy,
                round: schedule.round,
                slot,
                occupancy,
                budget,
            })
        }
        None => Ok(()),
    }
}
