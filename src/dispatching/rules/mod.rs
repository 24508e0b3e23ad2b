//! Built-in dispatching rules.
//!
//! - **Queue**: FIFO
//! - **Priority**: PRIORITY, AGING
//!
//! # Score Convention
//! All rules return lower scores for higher priority requests.

use super::{DispatchingRule, RuleScore, SchedulingContext};
use crate::models::Request;

/// First In First Out.
///
/// Prioritizes requests by arrival index within their round. Requests
/// without a known arrival index sort last.
#[derive(Debug, Clone, Copy)]
pub struct Fifo;

impl DispatchingRule for Fifo {
    fn name(&self) -> &'static str {
        "FIFO"
    }

    fn evaluate(&self, request: &Request, context: &SchedulingContext) -> RuleScore {
        context
            .arrival_of(&request.id)
            .map(|i| i as f64)
            .unwrap_or(f64::INFINITY)
    }

    fn description(&self) -> &'static str {
        "First In First Out"
    }
}

/// Base request priority.
#[derive(Debug, Clone, Copy)]
pub struct Priority;

impl DispatchingRule for Priority {
    fn name(&self) -> &'static str {
        "PRIORITY"
    }

    fn evaluate(&self, request: &Request, _context: &SchedulingContext) -> RuleScore {
        -(request.priority as f64)
    }

    fn description(&self) -> &'static str {
        "Request Priority"
    }
}

/// Aging priority: `base + c * wait^a`.
///
/// `c` is the increment per waiting slot and `a` controls how
/// super-linearly waiting time raises priority.
#[derive(Debug, Clone, Copy)]
pub struct Aging {
    /// Priority increment per waiting slot.
    pub c: f64,
    /// Aging exponent.
    pub a: f64,
}

impl Aging {
    /// Creates an aging rule.
    pub fn new(c: f64, a: f64) -> Self {
        Self { c, a }
    }

    /// Current priority of a request (higher = sooner).
    pub fn priority(&self, request: &Request, context: &SchedulingContext) -> f64 {
        let wait = context.wait_of(&request.id) as f64;
        request.priority as f64 + self.c * wait.powf(self.a)
    }
}

impl DispatchingRule for Aging {
    fn name(&self) -> &'static str {
        "AGING"
    }

    fn evaluate(&self, request: &Request, context: &SchedulingContext) -> RuleScore {
        -self.priority(request, context)
    }

    fn description(&self) -> &'static str {
        "Aged Priority"
    }
}
