//! Dispatching rules and rule engine for slot scheduling.
//!
//! Provides the priority rules the policies use to order requests
//! (FIFO arrival order, base priority, aging) and a rule engine that
//! chains them with tie-breakers.
//!
//! # Usage
//!
//! ```
//! use u_slotsched::dispatching::{rules, RuleEngine, SchedulingContext};
//!
//! let engine = RuleEngine::new()
//!     .with_rule(rules::Aging::new(1.0, 2.0))
//!     .with_tie_breaker(rules::Fifo);
//!
//! let context = SchedulingContext::at_slot(0);
//! // let order = engine.sort_indices(&round.requests, &context);
//! ```

mod context;
mod engine;
pub mod rules;

pub use context::SchedulingContext;
pub use engine::RuleEngine;

use crate::models::Request;
use std::fmt::Debug;

/// Score returned by a dispatching rule.
///
/// Lower scores = higher priority (scheduled first).
pub type RuleScore = f64;

/// A dispatching rule that evaluates request priority.
///
/// # Score Convention
/// **Lower score = higher priority.**
pub trait DispatchingRule: Send + Sync + Debug {
    /// Rule name (e.g., "FIFO", "AGING").
    fn name(&self) -> &'static str;

    /// Evaluates the priority of a request given the current context.
    ///
    /// Returns a score where lower = higher priority.
    fn evaluate(&self, request: &Request, context: &SchedulingContext) -> RuleScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
