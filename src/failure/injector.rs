//! Bernoulli node-failure sampling.
//!
//! One independent draw per (node, slot) pair, slot-major: all nodes of
//! slot 0 first, then slot 1, and so on. The random source is always
//! supplied by the caller.

use rand::Rng;

use crate::config::validate_probability;
use crate::error::Result;
use crate::models::{FailureMask, NodeId, Slot};

/// Topology node labels `n1..=nN`.
pub fn node_labels(node_count: usize) -> Vec<NodeId> {
    (1..=node_count).map(|i| format!("n{i}")).collect()
}

/// Samples failure masks with a fixed per-(node, slot) probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FailureInjector {
    probability: f64,
}

impl FailureInjector {
    /// Creates an injector; `probability` must lie in `[0, 1]`.
    pub fn new(probability: f64) -> Result<Self> {
        validate_probability(probability)?;
        Ok(Self { probability })
    }

    /// Failure probability per (node, slot).
    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Draws a mask over slots `0..slot_count` for the given nodes.
    ///
    /// Every slot of the horizon is present in the mask, possibly with no
    /// failed nodes.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        nodes: &[NodeId],
        slot_count: Slot,
        rng: &mut R,
    ) -> FailureMask {
        let mut mask = FailureMask::new();
        for slot in 0..slot_count {
            mask = mask.with_slot(slot);
            for node in nodes {
                if rng.random_bool(self.probability) {
                    mask = mask.with_failed(slot, node.clone());
                }
            }
        }
        log::debug!(
            "sampled {} failures over {} nodes x {} slots (p = {})",
            mask.total_failures(),
            nodes.len(),
            slot_count,
            self.probability
        );
        mask
    }
}

/// Draws a mask for nodes `n1..=n{node_count}` over `0..slot_count`.
///
/// # Example
/// ```
/// use rand::rngs::SmallRng;
/// use rand::SeedableRng;
/// use u_slotsched::failure::generate_failure_nodes;
///
/// let mut rng = SmallRng::seed_from_u64(42);
/// let mask = generate_failure_nodes(36, 5, 1.0, &mut rng).unwrap();
/// assert_eq!(mask.total_failures(), 36 * 5);
/// ```
pub fn generate_failure_nodes<R: Rng + ?Sized>(
    node_count: usize,
    slot_count: Slot,
    probability: f64,
    rng: &mut R,
) -> Result<FailureMask> {
    let injector = FailureInjector::new(probability)?;
    Ok(injector.sample(&node_labels(node_count), slot_count, rng))
}
