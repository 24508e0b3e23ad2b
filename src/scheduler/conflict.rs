//! Resource-conflict models.
//!
//! A conflict model decides whether a request may join the requests
//! already occupying a slot, and which pairs of requests compete for the
//! same resource (and so keep their relative order when merged).
//!
//! Models must be monotone: if a set of requests is admitted into a slot,
//! every subset is admitted too. An empty slot always accepts one request.

use std::fmt::Debug;

use crate::models::{Request, Slot};

/// Pluggable slot-admission rule.
pub trait ConflictModel: Send + Sync + Debug {
    /// Model name.
    fn name(&self) -> &'static str;

    /// Whether `candidate` may join `occupants` in one slot under `budget`.
    fn admits(&self, budget: usize, occupants: &[&Request], candidate: &Request) -> bool;

    /// Whether two requests compete for the same resource class.
    fn conflicts(&self, a: &Request, b: &Request) -> bool;
}

/// Single concurrency budget per slot; every request competes with every
/// other.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalBudget;

impl ConflictModel for GlobalBudget {
    fn name(&self) -> &'static str {
        "global-budget"
    }

    fn admits(&self, budget: usize, occupants: &[&Request], _candidate: &Request) -> bool {
        occupants.len() < budget
    }

    fn conflicts(&self, _a: &Request, _b: &Request) -> bool {
        true
    }
}

/// Per-slot budget plus exclusive endpoints: two requests sharing a source
/// or destination node never run in the same slot.
#[derive(Debug, Clone, Copy, Default)]
pub struct EndpointExclusive;

impl ConflictModel for EndpointExclusive {
    fn name(&self) -> &'static str {
        "endpoint-exclusive"
    }

    fn admits(&self, budget: usize, occupants: &[&Request], candidate: &Request) -> bool {
        occupants.len() < budget && occupants.iter().all(|o| !o.shares_endpoint(candidate))
    }

    fn conflicts(&self, a: &Request, b: &Request) -> bool {
        a.shares_endpoint(b)
    }
}

/// Slot occupancy under a conflict model, used while building a schedule.
pub(crate) struct SlotBook<'a> {
    model: &'a dyn ConflictModel,
    budget: usize,
    slots: Vec<Vec<&'a Request>>,
}

impl<'a> SlotBook<'a> {
    pub(crate) fn new(model: &'a dyn ConflictModel, budget: usize) -> Self {
        Self {
            model,
            budget,
            slots: Vec::new(),
        }
    }

    pub(crate) fn admits(&self, slot: Slot, candidate: &Request) -> bool {
        match self.slots.get(slot as usize) {
            Some(occupants) if !occupants.is_empty() => {
                self.model.admits(self.budget, occupants, candidate)
            }
            _ => true,
        }
    }

    /// Lowest slot `>= from` that admits `candidate`.
    pub(crate) fn first_fit(&self, from: Slot, candidate: &Request) -> Slot {
        let mut slot = from;
        while !self.admits(slot, candidate) {
            slot += 1;
        }
        slot
    }

    /// Lowest slot in `from..=to` that admits `candidate`.
    pub(crate) fn first_fit_within(&self, from: Slot, to: Slot, candidate: &Request) -> Option<Slot> {
        (from..=to).find(|&slot| self.admits(slot, candidate))
    }

    pub(crate) fn place(&mut self, slot: Slot, request: &'a Request) {
        let idx = slot as usize;
        if self.slots.len() <= idx {
            self.slots.resize_with(idx + 1, Vec::new);
        }
        self.slots[idx].push(request);
    }
}
