//! Error types for scheduling and failure evaluation.
//!
//! Every variant carries enough context (policy, round, request) to
//! reproduce the failing run.

use thiserror::Error;

use crate::models::{Policy, Slot};

/// Errors raised by the schedulers, the merger, and the failure checker.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchedulingError {
    /// A round with no requests reached a scheduler.
    #[error("{policy}: round {round} contains no requests")]
    EmptyBatch { policy: Policy, round: usize },

    /// A round failed input validation (duplicate IDs, self-loops).
    #[error("round {round} is invalid: {}", .problems.join("; "))]
    InvalidRound { round: usize, problems: Vec<String> },

    /// A concurrency budget, aging constant, or probability is out of range.
    #[error("invalid scheduling parameter `{name}` = {value}: {reason}")]
    InvalidSchedulingParameter {
        name: &'static str,
        value: String,
        reason: &'static str,
    },

    /// A scheduled request has neither a high-weight nor a shortest path.
    #[error("{schedule}: no path available for request '{request_id}'")]
    NoPathAvailable { schedule: String, request_id: String },

    /// A schedule references a request id that is not part of its round.
    #[error("{policy}: round {round} has no request '{request_id}'")]
    UnknownRequest {
        policy: Policy,
        round: usize,
        request_id: String,
    },

    /// A schedule names a round the batch does not contain.
    #[error("{policy}: batch has no round {round}")]
    UnknownRound { policy: Policy, round: usize },

    /// A slot holds more requests than the concurrency budget allows.
    ///
    /// Internal bug indicator; never produced by correct scheduling code.
    #[error(
        "{policy}: round {round} slot {slot} holds {occupancy} requests (budget {budget})"
    )]
    ResourceOverflowInvariantViolation {
        policy: Policy,
        round: usize,
        slot: Slot,
        occupancy: usize,
        budget: usize,
    },
}

impl SchedulingError {
    pub(crate) fn invalid_parameter(
        name: &'static str,
        value: impl ToString,
        reason: &'static str,
    ) -> Self {
        Self::InvalidSchedulingParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SchedulingError>;
