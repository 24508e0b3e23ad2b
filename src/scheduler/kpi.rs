//! Schedule quality metrics (KPIs).
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Total Delay | Sum of assigned slots (slot 0 = no delay) |
//! | Max Slot | Latest slot used |
//! | Avg Delay | Total delay / requests |
//! | Peak Occupancy | Most requests sharing one slot |

use std::collections::BTreeMap;

use crate::models::{Schedule, Slot};

/// Total delay of a schedule: the sum of every entry's slot.
///
/// Independent of entry order.
///
/// # Example
/// ```
/// use u_slotsched::models::{Policy, Schedule};
/// use u_slotsched::scheduler::total_delay;
///
/// let s = Schedule::new(Policy::Fifo, 0)
///     .with_entry("r1", 0)
///     .with_entry("r2", 1)
///     .with_entry("r3", 2);
/// assert_eq!(total_delay(&s), 3);
/// ```
pub fn total_delay(schedule: &Schedule) -> u64 {
    schedule.entries.iter().map(|e| u64::from(e.slot)).sum()
}

/// Schedule performance indicators.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleKpi {
    /// Number of scheduled requests.
    pub request_count: usize,
    /// Latest slot used (0 if empty).
    pub max_slot: Slot,
    /// Sum of assigned slots.
    pub total_delay: u64,
    /// Mean assigned slot.
    pub avg_delay: f64,
    /// Largest number of requests in one slot.
    pub peak_occupancy: usize,
    /// Requests per used slot.
    pub occupancy: BTreeMap<Slot, usize>,
}

impl ScheduleKpi {
    /// Computes KPIs from a schedule.
    pub fn calculate(schedule: &Schedule) -> Self {
        let request_count = schedule.len();
        let total_delay = total_delay(schedule);
        let occupancy = schedule.occupancy();
        let peak_occupancy = occupancy.values().copied().max().unwrap_or(0);

        let avg_delay = if request_count == 0 {
            0.0
        } else {
            total_delay as f64 / request_count as f64
        };

        Self {
            request_count,
            max_slot: schedule.slots_used(),
            total_delay,
            avg_delay,
            peak_occupancy,
            occupancy,
        }
    }

    /// Fraction of slot capacity used across `0..=max_slot` under `budget`.
    pub fn utilization(&self, budget: usize) -> f64 {
        if self.request_count == 0 || budget == 0 {
            return 0.0;
        }
        let capacity = (self.max_slot as usize + 1) * budget;
        self.request_count as f64 / capacity as f64
    }
}
