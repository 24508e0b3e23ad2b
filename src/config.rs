//! Configuration types for the scheduling simulation.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulingError};

/// Aging round-robin parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RrrnParams {
    /// Requests admitted per slot.
    pub k: i64,
    /// Priority increment per waiting slot.
    pub c: f64,
    /// Aging exponent.
    pub a: f64,
}

impl Default for RrrnParams {
    fn default() -> Self {
        Self {
            k: 1,
            c: 1.0,
            a: 1.0,
        }
    }
}

impl RrrnParams {
    /// Creates a parameter set.
    pub fn new(k: i64, c: f64, a: f64) -> Self {
        Self { k, c, a }
    }

    /// Checks the parameters and returns `k` as a slot budget.
    pub fn validate(&self) -> Result<usize> {
        if self.k <= 0 {
            return Err(SchedulingError::invalid_parameter(
                "k",
                self.k,
                "concurrency budget must be positive",
            ));
        }
        if !self.c.is_finite() || self.c < 0.0 {
            return Err(SchedulingError::invalid_parameter(
                "c",
                self.c,
                "aging increment must be finite and non-negative",
            ));
        }
        if !self.a.is_finite() || self.a < 0.0 {
            return Err(SchedulingError::invalid_parameter(
                "a",
                self.a,
                "aging exponent must be finite and non-negative",
            ));
        }
        usize::try_from(self.k).map_err(|_| {
            SchedulingError::invalid_parameter("k", self.k, "concurrency budget is too large")
        })
    }
}

/// What the failure checker does with a request that has no path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPathPolicy {
    /// Record a "no path" placeholder and keep checking.
    #[default]
    Placeholder,
    /// Fail the evaluation with `NoPathAvailable`.
    Abort,
}

/// Configuration of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Nodes in the topology, labelled `n1..=nN`.
    pub node_count: usize,
    /// FIFO concurrency budget per slot.
    pub concurrency_budget: usize,
    /// Aging round-robin parameters.
    pub rrrn: RrrnParams,
    /// Per-(node, slot) failure probability.
    pub failure_probability: f64,
    /// Seed for failure sampling; `None` draws from the OS.
    pub seed: Option<u64>,
    /// Handling of requests without a path.
    pub missing_path: MissingPathPolicy,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            node_count: 36,
            concurrency_budget: 1,
            rrrn: RrrnParams::default(),
            failure_probability: 0.1,
            seed: None,
            missing_path: MissingPathPolicy::Placeholder,
        }
    }
}

impl SimulationConfig {
    /// Sets the node count.
    pub fn with_node_count(mut self, node_count: usize) -> Self {
        self.node_count = node_count;
        self
    }

    /// Sets the FIFO concurrency budget.
    pub fn with_concurrency_budget(mut self, budget: usize) -> Self {
        self.concurrency_budget = budget;
        self
    }

    /// Sets the aging round-robin parameters.
    pub fn with_rrrn(mut self, params: RrrnParams) -> Self {
        self.rrrn = params;
        self
    }

    /// Sets the failure probability.
    pub fn with_failure_probability(mut self, p: f64) -> Self {
        self.failure_probability = p;
        self
    }

    /// Sets the sampling seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the missing-path handling.
    pub fn with_missing_path(mut self, policy: MissingPathPolicy) -> Self {
        self.missing_path = policy;
        self
    }

    /// Checks every parameter.
    pub fn validate(&self) -> Result<()> {
        validate_budget(self.concurrency_budget)?;
        self.rrrn.validate()?;
        validate_probability(self.failure_probability)
    }

    /// Random source for failure sampling.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

pub(crate) fn validate_budget(budget: usize) -> Result<()> {
    if budget == 0 {
        return Err(SchedulingError::invalid_parameter(
            "concurrency_budget",
            budget,
            "concurrency budget must be positive",
        ));
    }
    Ok(())
}

pub(crate) fn validate_probability(p: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&p) {
        return Err(SchedulingError::invalid_parameter(
            "failure_probability",
            p,
            "probability must lie in [0, 1]",
        ));
    }
    Ok(())
}
