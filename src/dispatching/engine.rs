//! Rule engine for multi-criteria dispatching.
//!
//! Applies dispatching rules in sequence: a later rule is consulted only
//! when every earlier rule ties.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::sync::Arc;

use super::{DispatchingRule, SchedulingContext};
use crate::models::Request;

/// A composable rule engine for request prioritization.
///
/// # Example
/// ```
/// use u_slotsched::dispatching::{rules, RuleEngine, SchedulingContext};
/// use u_slotsched::models::Round;
///
/// let round = Round::from_tuples(0, [("r1", "n1", "n4"), ("r2", "n2", "n5")]);
/// let engine = RuleEngine::new()
///     .with_rule(rules::Aging::new(1.0, 1.0))
///     .with_tie_breaker(rules::Fifo);
///
/// let context = SchedulingContext::for_round(&round);
/// assert_eq!(engine.sort_indices(&round.requests, &context), vec![0, 1]);
/// ```
#[derive(Clone)]
pub struct RuleEngine {
    rules: Vec<Arc<dyn DispatchingRule>>,
    epsilon: f64,
}

impl RuleEngine {
    /// Creates an empty rule engine.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            epsilon: 1e-9,
        }
    }

    /// Adds a primary rule.
    pub fn with_rule<R: DispatchingRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Adds a rule consulted only when the rules before it tie.
    pub fn with_tie_breaker<R: DispatchingRule + 'static>(self, rule: R) -> Self {
        self.with_rule(rule)
    }

    /// Sorts requests by priority (highest priority first).
    ///
    /// Returns indices into the given slice.
    pub fn sort_indices<R: Borrow<Request>>(
        &self,
        requests: &[R],
        context: &SchedulingContext,
    ) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..requests.len()).collect();
        indices.sort_by(|&a, &b| {
            self.compare(requests[a].borrow(), requests[b].borrow(), context)
        });
        indices
    }

    fn compare(&self, a: &Request, b: &Request, context: &SchedulingContext) -> Ordering {
        for rule in &self.rules {
            let score_a = rule.evaluate(a, context);
            let score_b = rule.evaluate(b, context);

            if (score_a - score_b).abs() > self.epsilon {
                return score_a.partial_cmp(&score_b).unwrap_or(Ordering::Equal);
            }
        }

        Ordering::Equal
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field(
                "rules",
                &self.rules.iter().map(|r| r.name()).collect::<Vec<_>>(),
            )
            .field("epsilon", &self.epsilon)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatching::rules;
    use crate::models::Round;

    fn sample_round() -> Round {
        Round::from_tuples(0, [("r1", "n1", "n4"), ("r2", "n2", "n5"), ("r3", "n3", "n6")])
    }

    #[test]
    fn test_fifo_ordering() {
        let round = sample_round();
        let ctx = SchedulingContext::for_round(&round);
        let engine = RuleEngine::new().with_rule(rules::Fifo);

        assert_eq!(engine.sort_indices(&round.requests, &ctx), vec![0, 1, 2]);
    }

    #[test]
    fn test_priority_with_fifo_tie_breaker() {
        let mut round = sample_round();
        round.requests[2].priority = 5;
        let ctx = SchedulingContext::for_round(&round);
        let engine = RuleEngine::new()
            .with_rule(rules::Priority)
            .with_tie_breaker(rules::Fifo);

        let indices = engine.sort_indices(&round.requests, &ctx);
        assert_eq!(round.requests[indices[0]].id, "r3");
        assert_eq!(round.requests[indices[1]].id, "r1");
        assert_eq!(round.requests[indices[2]].id, "r2");
    }

    #[test]
    fn test_aging_promotes_waiting_request() {
        let round = sample_round();
        let ctx = SchedulingContext::for_round(&round).with_wait("r3", 2);
        let engine = RuleEngine::new()
            .with_rule(rules::Aging::new(1.0, 1.0))
            .with_tie_breaker(rules::Fifo);

        assert_eq!(engine.sort_indices(&round.requests, &ctx)[0], 2);
    }

    #[test]
    fn test_sorts_borrowed_requests() {
        let round = sample_round();
        let ctx = SchedulingContext::for_round(&round);
        let ready: Vec<&Request> = round.requests.iter().rev().collect();
        let engine = RuleEngine::new().with_rule(rules::Fifo);

        // ready = [r3, r2, r1]
        assert_eq!(engine.sort_indices(&ready, &ctx), vec![2, 1, 0]);
    }

    #[test]
    fn test_empty_requests() {
        let ctx = SchedulingContext::at_slot(0);
        let engine = RuleEngine::new().with_rule(rules::Fifo);
        let empty: [Request; 0] = [];
        assert!(engine.sort_indices(&empty, &ctx).is_empty());
    }
}
