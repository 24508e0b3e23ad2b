//! Scheduling context for dispatching rule evaluation.

use std::collections::HashMap;

use crate::models::{Round, Slot};

/// Runtime scheduling state passed to dispatching rules.
///
/// Holds the slot currently being filled, how many slots each waiting
/// request has been deferred, and each request's arrival index in its round.
#[derive(Debug, Clone, Default)]
pub struct SchedulingContext {
    /// Slot being filled.
    pub current_slot: Slot,
    /// Slots each request has waited (request_id → slots).
    pub wait_slots: HashMap<String, u32>,
    /// Arrival index within the round (request_id → index).
    pub arrival_index: HashMap<String, usize>,
}

impl SchedulingContext {
    /// Creates a context at the given slot.
    pub fn at_slot(current_slot: Slot) -> Self {
        Self {
            current_slot,
            ..Default::default()
        }
    }

    /// Creates a slot-0 context with arrival indices taken from a round.
    pub fn for_round(round: &Round) -> Self {
        let arrival_index = round
            .requests
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();
        Self {
            arrival_index,
            ..Default::default()
        }
    }

    /// Sets the wait time of a request.
    pub fn with_wait(mut self, request_id: impl Into<String>, slots: u32) -> Self {
        self.wait_slots.insert(request_id.into(), slots);
        self
    }

    /// Sets the arrival index of a request.
    pub fn with_arrival(mut self, request_id: impl Into<String>, index: usize) -> Self {
        self.arrival_index.insert(request_id.into(), index);
        self
    }

    /// Slots a request has waited (0 if never deferred).
    pub fn wait_of(&self, request_id: &str) -> u32 {
        self.wait_slots.get(request_id).copied().unwrap_or(0)
    }

    /// Arrival index of a request.
    pub fn arrival_of(&self, request_id: &str) -> Option<usize> {
        self.arrival_index.get(request_id).copied()
    }

    /// Adds one slot of waiting to every listed request.
    pub fn age<'a, I>(&mut self, request_ids: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for id in request_ids {
            *self.wait_slots.entry(id.to_string()).or_insert(0) += 1;
        }
    }
}
