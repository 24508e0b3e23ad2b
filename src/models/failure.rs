//! Failure mask and per-schedule failure outcome.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::{NodeId, Slot};

/// Failed nodes per slot.
///
/// A sampled mask holds an entry (possibly empty) for every slot of its
/// horizon. Slots outside the horizon have no failed nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureMask {
    slots: BTreeMap<Slot, BTreeSet<NodeId>>,
}

impl FailureMask {
    /// Creates a mask with no slots.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a slot to the horizon without failing any node.
    pub fn with_slot(mut self, slot: Slot) -> Self {
        self.slots.entry(slot).or_default();
        self
    }

    /// Marks `node` failed in `slot`.
    pub fn with_failed(mut self, slot: Slot, node: impl Into<NodeId>) -> Self {
        self.slots.entry(slot).or_default().insert(node.into());
        self
    }

    /// Failed nodes in a slot, `None` if the slot is outside the horizon.
    pub fn failed_nodes(&self, slot: Slot) -> Option<&BTreeSet<NodeId>> {
        self.slots.get(&slot)
    }

    /// Whether `node` failed in `slot`.
    pub fn is_failed(&self, slot: Slot, node: &str) -> bool {
        self.slots.get(&slot).is_some_and(|nodes| nodes.contains(node))
    }

    /// Number of slots in the horizon.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Total (node, slot) failures.
    pub fn total_failures(&self) -> usize {
        self.slots.values().map(BTreeSet::len).sum()
    }

    /// Slots in ascending order with their failed nodes.
    pub fn iter(&self) -> impl Iterator<Item = (Slot, &BTreeSet<NodeId>)> {
        self.slots.iter().map(|(&slot, nodes)| (slot, nodes))
    }
}

/// Requests invalidated by node failures in one schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureOutcome {
    /// Failed request IDs per slot, in admission order.
    pub failed: BTreeMap<Slot, Vec<String>>,
    /// Requests recorded as "no path" placeholders instead of being checked.
    pub no_path: Vec<String>,
}

impl FailureOutcome {
    /// Records a failed request.
    pub fn record_failure(&mut self, slot: Slot, request_id: impl Into<String>) {
        self.failed.entry(slot).or_default().push(request_id.into());
    }

    /// Records a request that had no path to check.
    pub fn record_no_path(&mut self, request_id: impl Into<String>) {
        self.no_path.push(request_id.into());
    }

    /// Number of failed requests. Placeholders are not counted.
    pub fn failure_count(&self) -> usize {
        self.failed.values().map(Vec::len).sum()
    }

    /// Failed requests in a slot.
    pub fn failed_in(&self, slot: Slot) -> &[String] {
        self.failed.get(&slot).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether a request failed in any slot.
    pub fn is_failed(&self, request_id: &str) -> bool {
        self.failed.values().flatten().any(|id| id == request_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_builders() {
        let mask = FailureMask::new()
            .with_slot(1)
            .with_failed(0, "n1")
            .with_failed(0, "n2");
        assert_eq!(mask.slot_count(), 2);
        assert_eq!(mask.total_failures(), 2);
        assert!(mask.is_failed(0, "n1"));
        assert!(!mask.is_failed(1, "n1"));
        assert!(!mask.is_failed(7, "n1"));
        assert_eq!(mask.failed_nodes(1).map(BTreeSet::len), Some(0));
        assert!(mask.failed_nodes(7).is_none());
    }

    #[test]
    fn test_outcome_counts_exclude_placeholders() {
        let mut outcome = FailureOutcome::default();
        outcome.record_failure(0, "r1");
        outcome.record_failure(2, "r3");
        outcome.record_no_path("r4");

        assert_eq!(outcome.failure_count(), 2);
        assert_eq!(outcome.failed_in(0), ["r1".to_string()]);
        assert!(outcome.failed_in(1).is_empty());
        assert!(outcome.is_failed("r3"));
        assert!(!outcome.is_failed("r4"));
    }
}
