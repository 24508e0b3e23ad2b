//! Schedule (solution) model.
//!
//! A schedule assigns every request of one round to exactly one slot
//! under one policy. Entries are kept in admission order: the order in
//! which the producing policy placed them. Merging relies on that order
//! as the precedence between requests; all other queries treat the
//! schedule as a set.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Discrete allocation unit; slot 0 is the first.
pub type Slot = u32;

/// Scheduling policy variant that produced a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Policy {
    /// Strict arrival order under a per-slot budget.
    #[serde(rename = "FIFO")]
    Fifo,
    /// FIFO schedule after merge compaction.
    #[serde(rename = "FIFO Merge")]
    FifoMerge,
    /// Aging round-robin, before merging.
    #[serde(rename = "RRRN")]
    Rrrn,
    /// Aging round-robin after merge compaction.
    #[serde(rename = "RRRN Merge")]
    RrrnMerge,
}

impl Policy {
    /// All variants in reporting order.
    pub const ALL: [Policy; 4] = [
        Policy::Fifo,
        Policy::FifoMerge,
        Policy::Rrrn,
        Policy::RrrnMerge,
    ];

    /// Display label.
    pub fn name(self) -> &'static str {
        match self {
            Policy::Fifo => "FIFO",
            Policy::FifoMerge => "FIFO Merge",
            Policy::Rrrn => "RRRN",
            Policy::RrrnMerge => "RRRN Merge",
        }
    }

    /// The variant a merge pass turns this policy into.
    pub fn merged(self) -> Policy {
        match self {
            Policy::Fifo | Policy::FifoMerge => Policy::FifoMerge,
            Policy::Rrrn | Policy::RrrnMerge => Policy::RrrnMerge,
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A request-to-slot assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Assigned request ID.
    pub request_id: String,
    /// Assigned slot.
    pub slot: Slot,
}

impl ScheduleEntry {
    /// Creates an entry.
    pub fn new(request_id: impl Into<String>, slot: Slot) -> Self {
        Self {
            request_id: request_id.into(),
            slot,
        }
    }
}

/// Complete slot assignment for one round under one policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Producing policy.
    pub policy: Policy,
    /// Round the schedule covers.
    pub round: usize,
    /// Entries in admission order.
    pub entries: Vec<ScheduleEntry>,
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new(policy: Policy, round: usize) -> Self {
        Self {
            policy,
            round,
            entries: Vec::new(),
        }
    }

    /// Appends an assignment.
    pub fn assign(&mut self, request_id: impl Into<String>, slot: Slot) {
        self.entries.push(ScheduleEntry::new(request_id, slot));
    }

    /// Builder form of [`Schedule::assign`].
    pub fn with_entry(mut self, request_id: impl Into<String>, slot: Slot) -> Self {
        self.assign(request_id, slot);
        self
    }

    /// Latest slot used, `None` for an empty schedule.
    pub fn max_slot(&self) -> Option<Slot> {
        self.entries.iter().map(|e| e.slot).max()
    }

    /// Slots used as reported in summaries: the latest slot, 0 if empty.
    pub fn slots_used(&self) -> Slot {
        self.max_slot().unwrap_or(0)
    }

    /// Slot assigned to a request.
    pub fn slot_of(&self, request_id: &str) -> Option<Slot> {
        self.entries
            .iter()
            .find(|e| e.request_id == request_id)
            .map(|e| e.slot)
    }

    /// Request IDs assigned to a slot, in admission order.
    pub fn requests_in_slot(&self, slot: Slot) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.slot == slot)
            .map(|e| e.request_id.as_str())
            .collect()
    }

    /// Number of requests per used slot.
    pub fn occupancy(&self) -> BTreeMap<Slot, usize> {
        let mut counts = BTreeMap::new();
        for e in &self.entries {
            *counts.entry(e.slot).or_insert(0) += 1;
        }
        counts
    }

    /// Entries ordered by slot, admission order within a slot.
    pub fn admission_order(&self) -> Vec<&ScheduleEntry> {
        let mut ordered: Vec<&ScheduleEntry> = self.entries.iter().collect();
        ordered.sort_by_key(|e| e.slot);
        ordered
    }

    /// Request ID → slot view, independent of entry order.
    pub fn assignment_map(&self) -> BTreeMap<&str, Slot> {
        self.entries
            .iter()
            .map(|e| (e.request_id.as_str(), e.slot))
            .collect()
    }

    /// Whether two schedules assign the same slots to the same requests.
    pub fn same_assignment(&self, other: &Schedule) -> bool {
        self.entries.len() == other.entries.len() && self.assignment_map() == other.assignment_map()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the schedule has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
