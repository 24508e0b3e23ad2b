//! FIFO and aging round-robin (RRRN) slot schedulers.
//!
//! # FIFO
//!
//! 1. Order requests by arrival (round ascending, then index in round).
//! 2. Place each request in the first slot at or after its predecessor's
//!    slot that the conflict model admits.
//!
//! # RRRN
//!
//! 1. Keep a ready set of unscheduled requests.
//! 2. For each slot, rank the ready set by `base + c * wait^a`
//!    (ties by arrival) and admit up to `k` requests.
//! 3. Age every request still waiting, advance the slot, repeat until the
//!    ready set is empty.
//! 4. Compact the result with [`ScheduleMerger`], using the admission
//!    order as precedence.
//!
//! Every round is scheduled independently, starting at slot 0. Request IDs
//! must be unique within a round (see `validation::validate_round`).

use std::sync::Arc;

use super::conflict::{ConflictModel, GlobalBudget, SlotBook};
use super::merge::ScheduleMerger;
use crate::config::{validate_budget, RrrnParams};
use crate::dispatching::{rules, RuleEngine, SchedulingContext};
use crate::error::{Result, SchedulingError};
use crate::models::{Policy, Request, RequestBatch, Round, Schedule, Slot};
use crate::validation::ensure_within_budget;

/// RRRN output: one merged and one pre-merge schedule per round.
#[derive(Debug, Clone, Default)]
pub struct RrrnSchedules {
    /// Schedules after merge compaction.
    pub merged: Vec<Schedule>,
    /// Schedules as admitted by the aging process.
    pub pre_merge: Vec<Schedule>,
}

/// Slot scheduler with a pluggable conflict model.
///
/// # Example
///
/// ```
/// use u_slotsched::models::{RequestBatch, Round};
/// use u_slotsched::scheduler::{total_delay, SlotScheduler};
///
/// let batch = RequestBatch::new().with_round(Round::from_tuples(
///     0,
///     [("r1", "n1", "n4"), ("r2", "n2", "n5"), ("r3", "n3", "n6")],
/// ));
///
/// let schedules = SlotScheduler::new().fifo_schedule(&batch, 1).unwrap();
/// assert_eq!(schedules[0].slot_of("r3"), Some(2));
/// assert_eq!(total_delay(&schedules[0]), 3);
/// ```
#[derive(Debug, Clone)]
pub struct SlotScheduler {
    model: Arc<dyn ConflictModel>,
}

impl SlotScheduler {
    /// Creates a scheduler with a single per-slot budget.
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

    /// The conflict model in use.
    pub fn conflict_model(&self) -> &dyn ConflictModel {
        self.model.as_ref()
    }

    /// A merger sharing this scheduler's conflict model.
    pub fn merger(&self) -> ScheduleMerger {
        ScheduleMerger::with_shared_model(Arc::clone(&self.model))
    }

    /// FIFO schedule for every round of the batch.
    pub fn fifo_schedule(&self, batch: &RequestBatch, budget: usize) -> Result<Vec<Schedule>> {
        validate_budget(budget)?;
        batch
            .rounds
            .iter()
            .map(|round| self.fifo_schedule_round(round, budget))
            .collect()
    }

    /// FIFO schedule for a single round.
    pub fn fifo_schedule_round(&self, round: &Round, budget: usize) -> Result<Schedule> {
        validate_budget(budget)?;
        ensure_not_empty(Policy::Fifo, round)?;

        let context = SchedulingContext::for_round(round);
        let order = RuleEngine::new()
            .with_rule(rules::Fifo)
            .sort_indices(&round.requests, &context);

        let mut book = SlotBook::new(self.model.as_ref(), budget);
        let mut schedule = Schedule::new(Policy::Fifo, round.number);
        let mut floor: Slot = 0;

        for idx in order {
            let request = &round.requests[idx];
            let slot = book.first_fit(floor, request);
            book.place(slot, request);
            schedule.assign(request.id.clone(), slot);
            floor = slot;
        }

        ensure_within_budget(&schedule, budget)?;
        log::info!(
            "FIFO round {}: {} requests over {} slots",
            round.number,
            schedule.len(),
            schedule.slots_used()
        );
        Ok(schedule)
    }

    /// FIFO schedule followed by merge compaction, for every round.
    pub fn fifo_merge_schedule(
        &self,
        batch: &RequestBatch,
        budget: usize,
    ) -> Result<Vec<Schedule>> {
        let merger = self.merger();
        self.fifo_schedule(batch, budget)?
            .iter()
            .zip(&batch.rounds)
            .map(|(schedule, round)| merger.merge_round(schedule, round, budget))
            .collect()
    }

    /// RRRN schedules for every round of the batch.
    pub fn rrrn_schedule(&self, batch: &RequestBatch, params: RrrnParams) -> Result<RrrnSchedules> {
        params.validate()?;
        let mut out = RrrnSchedules::default();
        for round in &batch.rounds {
            let (merged, pre_merge) = self.rrrn_schedule_round(round, params)?;
            out.merged.push(merged);
            out.pre_merge.push(pre_merge);
        }
        Ok(out)
    }

    /// RRRN for a single round: `(merged, pre_merge)`.
    pub fn rrrn_schedule_round(
        &self,
        round: &Round,
        params: RrrnParams,
    ) -> Result<(Schedule, Schedule)> {
        let k = params.validate()?;
        ensure_not_empty(Policy::Rrrn, round)?;

        let engine = RuleEngine::new()
            .with_rule(rules::Aging::new(params.c, params.a))
            .with_tie_breaker(rules::Fifo);
        let mut context = SchedulingContext::for_round(round);
        let mut ready: Vec<&Request> = round.requests.iter().collect();
        let mut schedule = Schedule::new(Policy::Rrrn, round.number);
        let mut slot: Slot = 0;

        while !ready.is_empty() {
            context.current_slot = slot;
            let order = engine.sort_indices(&ready, &context);

            let width = k.min(ready.len());
            let mut admitted: Vec<usize> = Vec::with_capacity(width);
            let mut occupants: Vec<&Request> = Vec::with_capacity(width);
            for idx in order {
                if admitted.len() == k {
                    break;
                }
                let candidate = ready[idx];
                if occupants.is_empty() || self.model.admits(k, &occupants, candidate) {
                    occupants.push(candidate);
                    admitted.push(idx);
                }
            }

            for r in &occupants {
                schedule.assign(r.id.clone(), slot);
            }
            log::debug!(
                "RRRN round {} slot {}: admitted {:?}",
                round.number,
                slot,
                occupants.iter().map(|r| r.id.as_str()).collect::<Vec<_>>()
            );

            admitted.sort_unstable();
            for idx in admitted.into_iter().rev() {
                ready.remove(idx);
            }
            context.age(ready.iter().map(|r| r.id.as_str()));
            slot += 1;
        }

        ensure_within_budget(&schedule, k)?;
        let merged = self.merger().merge_round(&schedule, round, k)?;
        log::info!(
            "RRRN round {}: {} slots before merge, {} after",
            round.number,
            schedule.slots_used(),
            merged.slots_used()
        );
        Ok((merged, schedule))
    }
}

impl Default for SlotScheduler {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_not_empty(policy: Policy, round: &Round) -> Result<()> {
    if round.is_empty() {
        return Err(SchedulingError::EmptyBatch {
            policy,
            round: round.number,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{total_delay, EndpointExclusive};
    use crate::validation::validate_schedule;

    fn three_requests() -> Round {
        Round::from_tuples(0, [("r1", "n1", "n4"), ("r2", "n2", "n5"), ("r3", "n3", "n6")])
    }

    fn batch_of(round: Round) -> RequestBatch {
        RequestBatch::new().with_round(round)
    }

    fn mixed_batch() -> RequestBatch {
        RequestBatch::new()
            .with_round(Round::from_tuples(
                0,
                [
                    ("a", "n1", "n2"),
                    ("b", "n1", "n3"),
                    ("c", "n4", "n5"),
                    ("d", "n2", "n6"),
                    ("e", "n7", "n8"),
                    ("f", "n5", "n9"),
                    ("g", "n3", "n4"),
                ],
            ))
            .with_round(Round::from_tuples(
                1,
                [("h", "n1", "n9"), ("i", "n9", "n1"), ("j", "n2", "n8")],
            ))
    }

    #[test]
    fn test_fifo_budget_one() {
        let schedules = SlotScheduler::new()
            .fifo_schedule(&batch_of(three_requests()), 1)
            .unwrap();
        assert_eq!(schedules.len(), 1);
        let s = &schedules[0];
        assert_eq!(s.slot_of("r1"), Some(0));
        assert_eq!(s.slot_of("r2"), Some(1));
        assert_eq!(s.slot_of("r3"), Some(2));
        assert_eq!(total_delay(s), 3);
    }

    #[test]
    fn test_fifo_budget_three() {
        let schedules = SlotScheduler::new()
            .fifo_schedule(&batch_of(three_requests()), 3)
            .unwrap();
        let s = &schedules[0];
        assert!(s.entries.iter().all(|e| e.slot == 0));
        assert_eq!(total_delay(s), 0);
    }

    #[test]
    fn test_fifo_admission_order_is_monotone() {
        let scheduler = SlotScheduler::new().with_conflict_model(EndpointExclusive);
        let batch = mixed_batch();
        for (schedule, round) in scheduler.fifo_schedule(&batch, 2).unwrap().iter().zip(&batch.rounds) {
            let slots: Vec<Slot> = round
                .requests
                .iter()
                .map(|r| schedule.slot_of(&r.id).unwrap())
                .collect();
            assert!(slots.windows(2).all(|w| w[0] <= w[1]), "{slots:?}");
        }
    }

    #[test]
    fn test_fifo_rounds_start_at_zero() {
        let schedules = SlotScheduler::new().fifo_schedule(&mixed_batch(), 1).unwrap();
        assert_eq!(schedules[1].round, 1);
        assert_eq!(schedules[1].slot_of("h"), Some(0));
        assert_eq!(schedules[1].max_slot(), Some(2));
    }

    #[test]
    fn test_fifo_empty_round() {
        let batch = RequestBatch::new()
            .with_round(three_requests())
            .with_round(Round::new(1));
        assert_eq!(
            SlotScheduler::new().fifo_schedule(&batch, 1),
            Err(SchedulingError::EmptyBatch {
                policy: Policy::Fifo,
                round: 1
            })
        );
    }

    #[test]
    fn test_fifo_zero_budget() {
        let result = SlotScheduler::new().fifo_schedule(&batch_of(three_requests()), 0);
        assert!(matches!(
            result,
            Err(SchedulingError::InvalidSchedulingParameter { .. })
        ));
    }

    #[test]
    fn test_empty_batch_has_no_schedules() {
        let schedules = SlotScheduler::new()
            .fifo_schedule(&RequestBatch::new(), 2)
            .unwrap();
        assert!(schedules.is_empty());
    }

    #[test]
    fn test_rrrn_degenerate_matches_fifo() {
        let batch = batch_of(three_requests());
        let scheduler = SlotScheduler::new();
        let fifo = scheduler.fifo_schedule(&batch, 1).unwrap();
        let rrrn = scheduler
            .rrrn_schedule(&batch, RrrnParams::new(1, 1.0, 1.0))
            .unwrap();

        assert!(rrrn.pre_merge[0].same_assignment(&fifo[0]));
        assert!(rrrn.merged[0].same_assignment(&fifo[0]));
        assert_eq!(rrrn.pre_merge[0].policy, Policy::Rrrn);
        assert_eq!(rrrn.merged[0].policy, Policy::RrrnMerge);
    }

    #[test]
    fn test_rrrn_base_priority_goes_first() {
        let round = Round::new(0)
            .with_request(Request::new("low", 0, "n1", "n2"))
            .with_request(Request::new("high", 0, "n3", "n4").with_priority(5))
            .with_request(Request::new("mid", 0, "n5", "n6").with_priority(2));
        let (_, pre) = SlotScheduler::new()
            .rrrn_schedule_round(&round, RrrnParams::new(1, 1.0, 1.0))
            .unwrap();
        assert_eq!(pre.slot_of("high"), Some(0));
        assert_eq!(pre.slot_of("mid"), Some(1));
        assert_eq!(pre.slot_of("low"), Some(2));
    }

    #[test]
    fn test_rrrn_k_per_slot() {
        let (merged, pre) = SlotScheduler::new()
            .rrrn_schedule_round(&mixed_batch().rounds[0], RrrnParams::new(3, 1.0, 2.0))
            .unwrap();
        assert_eq!(pre.requests_in_slot(0), vec!["a", "b", "c"]);
        assert_eq!(pre.requests_in_slot(1), vec!["d", "e", "f"]);
        assert_eq!(pre.requests_in_slot(2), vec!["g"]);
        assert!(merged.same_assignment(&pre));
    }

    #[test]
    fn test_rrrn_skips_conflicting_requests() {
        let scheduler = SlotScheduler::new().with_conflict_model(EndpointExclusive);
        let round = &mixed_batch().rounds[0];
        let (_, pre) = scheduler
            .rrrn_schedule_round(round, RrrnParams::new(3, 1.0, 1.0))
            .unwrap();
        // b shares n1 with a, d shares n2 with a
        assert_eq!(pre.requests_in_slot(0), vec!["a", "c", "e"]);
        assert!(validate_schedule(&pre, round, 3).is_ok());
    }

    #[test]
    fn test_rrrn_unbounded_k() {
        let round = Round::from_tuples(0, [("r1", "n1", "n4"), ("r2", "n2", "n5")]);
        let (merged, pre) = SlotScheduler::new()
            .rrrn_schedule_round(&round, RrrnParams::new(i64::MAX, 1.0, 1.0))
            .unwrap();
        assert_eq!(pre.requests_in_slot(0), vec!["r1", "r2"]);
        assert_eq!(merged.slots_used(), 0);
    }

    #[test]
    fn test_rrrn_invalid_parameters() {
        let batch = batch_of(three_requests());
        let scheduler = SlotScheduler::new();
        for params in [
            RrrnParams::new(0, 1.0, 1.0),
            RrrnParams::new(-1, 1.0, 1.0),
            RrrnParams::new(1, -1.0, 1.0),
        ] {
            assert!(matches!(
                scheduler.rrrn_schedule(&batch, params),
                Err(SchedulingError::InvalidSchedulingParameter { .. })
            ));
        }
    }

    #[test]
    fn test_rrrn_empty_round() {
        let result = SlotScheduler::new()
            .rrrn_schedule_round(&Round::new(4), RrrnParams::default());
        assert_eq!(
            result,
            Err(SchedulingError::EmptyBatch {
                policy: Policy::Rrrn,
                round: 4
            })
        );
    }

    #[test]
    fn test_all_policies_cover_and_fit() {
        let batch = mixed_batch();
        for scheduler in [
            SlotScheduler::new(),
            SlotScheduler::new().with_conflict_model(EndpointExclusive),
        ] {
            for budget in 1..=4usize {
                let fifo = scheduler.fifo_schedule(&batch, budget).unwrap();
                let fifo_merge = scheduler.fifo_merge_schedule(&batch, budget).unwrap();
                let rrrn = scheduler
                    .rrrn_schedule(&batch, RrrnParams::new(budget as i64, 0.5, 1.5))
                    .unwrap();

                for (i, round) in batch.rounds.iter().enumerate() {
                    for s in [&fifo[i], &fifo_merge[i], &rrrn.pre_merge[i], &rrrn.merged[i]] {
                        assert!(validate_schedule(s, round, budget).is_ok(), "{s:?}");
                    }
                    assert!(fifo_merge[i].max_slot() <= fifo[i].max_slot());
                    assert!(total_delay(&fifo_merge[i]) <= total_delay(&fifo[i]));
                    assert!(rrrn.merged[i].max_slot() <= rrrn.pre_merge[i].max_slot());
                    assert!(total_delay(&rrrn.merged[i]) <= total_delay(&rrrn.pre_merge[i]));
                }
            }
        }
    }
}
