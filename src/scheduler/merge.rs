//! Merge compaction of slot schedules.
//!
//! # Algorithm
//!
//! 1. Walk the entries in admission order (slot ascending, then the order
//!    the base policy admitted them).
//! 2. Compute the request's floor: the latest new slot of any earlier
//!    request it conflicts with.
//! 3. Move it to the lowest slot in `floor..=original` the conflict model
//!    admits.
//!
//! No request moves later than its original slot, so the merged makespan
//! and total delay never exceed the original. Conflicting requests keep
//! their relative order.

use std::sync::Arc;

use super::conflict::{ConflictModel, GlobalBudget, SlotBook};
use crate::config::validate_budget;
use crate::error::{Result, SchedulingError};
use crate::models::{Request, RequestBatch, Round, Schedule, Slot};
use crate::validation::ensure_within_budget;

/// Compacts schedules without breaking precedence or the slot budget.
#[derive(Debug, Clone)]
pub struct ScheduleMerger {
    model: Arc<dyn ConflictModel>,
}

impl ScheduleMerger {
    /// Creates a merger with a single per-slot budget.
    pub fn new() -> Self {
        Self {
            model: Arc::new(GlobalBudget),
        }
    }

    /// Replaces the conflict model.
    pub fn with_conflict_model<M: ConflictModel + 'static>(mut self, model: M) -> Self {
        self.model = Arc::new(model);
        self
    }

    pub(crate) fn with_shared_model(model: Arc<dyn ConflictModel>) -> Self {
        Self { model }
    }

    /// Merges a schedule, looking its round up in `batch`.
    pub fn merge(&self, schedule: &Schedule, batch: &RequestBatch, budget: usize) -> Result<Schedule> {
        let round =
            batch
                .round(schedule.round)
                .ok_or_else(|| SchedulingError::UnknownRound {
                    policy: schedule.policy,
                    round: schedule.round,
                })?;
        self.merge_round(schedule, round, budget)
    }

    /// Merges a schedule of `round`.
    pub fn merge_round(&self, schedule: &Schedule, round: &Round, budget: usize) -> Result<Schedule> {
        validate_budget(budget)?;

        let policy = schedule.policy.merged();
        let mut book = SlotBook::new(self.model.as_ref(), budget);
        let mut placed: Vec<(&Request, Slot)> = Vec::with_capacity(schedule.len());
        let mut merged = Schedule::new(policy, schedule.round);

        for entry in schedule.admission_order() {
            let request =
                round
                    .get(&entry.request_id)
                    .ok_or_else(|| SchedulingError::UnknownRequest {
                        policy,
                        round: schedule.round,
                        request_id: entry.request_id.clone(),
                    })?;

            let floor = placed
                .iter()
                .filter(|(earlier, _)| self.model.conflicts(earlier, request))
                .map(|&(_, slot)| slot)
                .max()
                .unwrap_or(0);
            let slot = book
                .first_fit_within(floor, entry.slot, request)
                .unwrap_or(entry.slot);

            if slot < entry.slot {
                log::debug!(
                    "{} round {}: '{}' pulled from slot {} to {}",
                    policy,
                    schedule.round,
                    request.id,
                    entry.slot,
                    slot
                );
            }
            book.place(slot, request);
            placed.push((request, slot));
            merged.assign(request.id.clone(), slot);
        }

        ensure_within_budget(&merged, budget)?;
        Ok(merged)
    }
}

impl Default for ScheduleMerger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Policy;
    use crate::scheduler::{total_delay, EndpointExclusive};

    fn sample_round() -> Round {
        Round::from_tuples(
            0,
            [
                ("a", "n1", "n2"),
                ("b", "n1", "n3"),
                ("c", "n4", "n5"),
                ("d", "n6", "n7"),
            ],
        )
    }

    #[test]
    fn test_merge_fills_gaps() {
        let sparse = Schedule::new(Policy::Fifo, 0)
            .with_entry("a", 0)
            .with_entry("b", 2)
            .with_entry("c", 5)
            .with_entry("d", 5);
        let merged = ScheduleMerger::new()
            .merge_round(&sparse, &sample_round(), 2)
            .unwrap();

        assert_eq!(merged.policy, Policy::FifoMerge);
        assert_eq!(merged.slot_of("a"), Some(0));
        assert_eq!(merged.slot_of("b"), Some(0));
        assert_eq!(merged.slot_of("c"), Some(1));
        assert_eq!(merged.slot_of("d"), Some(1));
        assert_eq!(total_delay(&merged), 2);
    }

    #[test]
    fn test_merge_keeps_global_precedence() {
        // d was admitted before c inside slot 1; c may not overtake d.
        let s = Schedule::new(Policy::Rrrn, 0)
            .with_entry("a", 0)
            .with_entry("b", 0)
            .with_entry("d", 1)
            .with_entry("c", 1);
        let merged = ScheduleMerger::new()
            .merge_round(&s, &sample_round(), 2)
            .unwrap();
        assert_eq!(merged.policy, Policy::RrrnMerge);
        let ids: Vec<&str> = merged.entries.iter().map(|e| e.request_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "d", "c"]);
        assert!(merged.same_assignment(&s));
    }

    #[test]
    fn test_merge_endpoint_model_compacts_non_conflicting() {
        // a | b c | d
        let fifo = Schedule::new(Policy::Fifo, 0)
            .with_entry("a", 0)
            .with_entry("b", 1)
            .with_entry("c", 1)
            .with_entry("d", 2);
        let merged = ScheduleMerger::new()
            .with_conflict_model(EndpointExclusive)
            .merge_round(&fifo, &sample_round(), 3)
            .unwrap();

        // b shares n1 with a and must stay behind it; c and d join slot 0.
        assert_eq!(merged.slot_of("a"), Some(0));
        assert_eq!(merged.slot_of("b"), Some(1));
        assert_eq!(merged.slot_of("c"), Some(0));
        assert_eq!(merged.slot_of("d"), Some(0));
        assert!(merged.max_slot() <= fifo.max_slot());
    }

    #[test]
    fn test_merge_never_moves_later() {
        let s = Schedule::new(Policy::Fifo, 0)
            .with_entry("a", 3)
            .with_entry("b", 1)
            .with_entry("c", 1)
            .with_entry("d", 0);
        let merged = ScheduleMerger::new().merge_round(&s, &sample_round(), 2).unwrap();
        assert_eq!(merged.slot_of("b"), Some(0));
        assert_eq!(merged.slot_of("a"), Some(1));
        for e in &s.entries {
            assert!(merged.slot_of(&e.request_id).unwrap() <= e.slot);
        }
    }

    #[test]
    fn test_merge_unknown_request() {
        let s = Schedule::new(Policy::Fifo, 0).with_entry("zz", 0);
        assert_eq!(
            ScheduleMerger::new().merge_round(&s, &sample_round(), 1),
            Err(SchedulingError::UnknownRequest {
                policy: Policy::FifoMerge,
                round: 0,
                request_id: "zz".into(),
            })
        );
    }

    #[test]
    fn test_merge_overfull_input_is_reported() {
        let s = Schedule::new(Policy::Fifo, 0)
            .with_entry("a", 0)
            .with_entry("b", 0);
        assert!(matches!(
            ScheduleMerger::new().merge_round(&s, &sample_round(), 1),
            Err(SchedulingError::ResourceOverflowInvariantViolation { slot: 0, .. })
        ));
    }

    #[test]
    fn test_merge_via_batch() {
        let batch = RequestBatch::new().with_round(sample_round());
        let s = Schedule::new(Policy::Fifo, 0).with_entry("a", 4);
        let merged = ScheduleMerger::new().merge(&s, &batch, 1).unwrap();
        assert_eq!(merged.slot_of("a"), Some(0));

        let elsewhere = Schedule::new(Policy::Fifo, 9).with_entry("a", 0);
        assert_eq!(
            ScheduleMerger::new().merge(&elsewhere, &batch, 1),
            Err(SchedulingError::UnknownRound {
                policy: Policy::Fifo,
                round: 9,
            })
        );
    }

    #[test]
    fn test_merge_empty_schedule_of_missing_round() {
        let batch = RequestBatch::new().with_round(sample_round());
        let err = ScheduleMerger::new()
            .merge(&Schedule::new(Policy::Rrrn, 3), &batch, 2)
            .unwrap_err();
        assert_eq!(err.to_string(), "RRRN: batch has no round 3");
    }
}
