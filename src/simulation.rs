//! End-to-end evaluation of the four scheduling policies under failures.
//!
//! For each round: FIFO, FIFO Merge, RRRN and RRRN Merge schedules are
//! built, one failure mask covering every slot any of them uses is drawn,
//! and each schedule is charged one extra slot per failed request.

use std::collections::BTreeMap;

use rand::Rng;
use serde::Serialize;

use crate::config::SimulationConfig;
use crate::error::{Result, SchedulingError};
use crate::failure::{
    check_failures_across_schedules, failure_adjusted_slots, node_labels, FailureInjector,
};
use crate::models::{
    FailureMask, FailureOutcome, PathIndex, Policy, RequestBatch, Round, Schedule, Slot,
};
use crate::scheduler::{total_delay, SlotScheduler};
use crate::validation::validate_round;

/// Per-policy result line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicySummary {
    /// Policy the line describes.
    pub policy: Policy,
    /// Sum of assigned slots.
    pub total_delay: u64,
    /// Latest slot used.
    pub slots_used: Slot,
    /// Requests invalidated by node failures.
    pub failures: usize,
    /// Requests that had no path to check.
    pub no_path: usize,
    /// `slots_used + failures`.
    pub total_with_failures: u64,
}

/// Everything one round's evaluation produced.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    /// Round number.
    pub round: usize,
    /// Schedules in [`Policy::ALL`] order.
    pub schedules: Vec<Schedule>,
    /// Sampled failure mask.
    pub failure_mask: FailureMask,
    /// Failed requests per policy.
    pub outcomes: BTreeMap<Policy, FailureOutcome>,
    /// Summary lines in [`Policy::ALL`] order.
    pub summaries: Vec<PolicySummary>,
}

impl EvaluationReport {
    /// Schedule produced by a policy.
    pub fn schedule(&self, policy: Policy) -> Option<&Schedule> {
        self.schedules.iter().find(|s| s.policy == policy)
    }

    /// Summary line of a policy.
    pub fn summary(&self, policy: Policy) -> Option<&PolicySummary> {
        self.summaries.iter().find(|s| s.policy == policy)
    }
}

/// Policy comparison driver.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
    scheduler: SlotScheduler,
}

impl Simulation {
    /// Creates a simulation after validating the configuration.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            scheduler: SlotScheduler::new(),
        })
    }

    /// Replaces the scheduler (e.g. to change the conflict model).
    pub fn with_scheduler(mut self, scheduler: SlotScheduler) -> Self {
        self.scheduler = scheduler;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Evaluates every round with the configured random source.
    pub fn run(&self, batch: &RequestBatch, paths: &PathIndex) -> Result<Vec<EvaluationReport>> {
        let mut rng = self.config.rng();
        self.evaluate_batch(batch, paths, &mut rng)
    }

    /// Evaluates every round in order, drawing one mask per round.
    pub fn evaluate_batch<R: Rng + ?Sized>(
        &self,
        batch: &RequestBatch,
        paths: &PathIndex,
        rng: &mut R,
    ) -> Result<Vec<EvaluationReport>> {
        log::info!(
            "evaluating {} rounds, {} requests",
            batch.rounds.len(),
            batch.total_requests()
        );
        batch
            .rounds
            .iter()
            .map(|round| self.evaluate_round(round, paths, &mut *rng))
            .collect()
    }

    /// Evaluates one round.
    ///
    /// Rounds with duplicate request IDs or self-loop requests are
    /// rejected with `InvalidRound` before any scheduling happens.
    pub fn evaluate_round<R: Rng + ?Sized>(
        &self,
        round: &Round,
        paths: &PathIndex,
        rng: &mut R,
    ) -> Result<EvaluationReport> {
        validate_round(round).map_err(|errors| SchedulingError::InvalidRound {
            round: round.number,
            problems: errors.into_iter().map(|e| e.message).collect(),
        })?;

        let budget = self.config.concurrency_budget;
        let fifo = self.scheduler.fifo_schedule_round(round, budget)?;
        let fifo_merge = self.scheduler.merger().merge_round(&fifo, round, budget)?;
        let (rrrn_merge, rrrn) = self.scheduler.rrrn_schedule_round(round, self.config.rrrn)?;
        let schedules = vec![fifo, fifo_merge, rrrn, rrrn_merge];

        let horizon = schedules
            .iter()
            .filter_map(Schedule::max_slot)
            .max()
            .map_or(0, |slot| slot + 1);
        let injector = FailureInjector::new(self.config.failure_probability)?;
        let failure_mask = injector.sample(&node_labels(self.config.node_count), horizon, rng);

        let refs: Vec<&Schedule> = schedules.iter().collect();
        let outcomes = check_failures_across_schedules(
            &refs,
            round,
            paths,
            &failure_mask,
            self.config.missing_path,
        )?;

        let summaries = schedules
            .iter()
            .map(|schedule| {
                let outcome = outcomes.get(&schedule.policy).cloned().unwrap_or_default();
                let summary = PolicySummary {
                    policy: schedule.policy,
                    total_delay: total_delay(schedule),
                    slots_used: schedule.slots_used(),
                    failures: outcome.failure_count(),
                    no_path: outcome.no_path.len(),
                    total_with_failures: failure_adjusted_slots(schedule, &outcome),
                };
                log::info!(
                    "round {} {}: delay {}, slots {}, failures {}, total {}",
                    round.number,
                    summary.policy,
                    summary.total_delay,
                    summary.slots_used,
                    summary.failures,
                    summary.total_with_failures
                );
                summary
            })
            .collect();

        Ok(EvaluationReport {
            round: round.number,
            schedules,
            failure_mask,
            outcomes,
            summaries,
        })
    }
}
