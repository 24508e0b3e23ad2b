//! Slot schedulers, merge compaction, and KPI evaluation.
//!
//! # Policies
//!
//! `SlotScheduler` provides strict-arrival FIFO and aging round-robin
//! (RRRN). `ScheduleMerger` pulls requests into earlier underfull slots
//! without breaking the precedence the base policy established.
//!
//! # Conflicts
//!
//! Which requests may share a slot is decided by a [`ConflictModel`]:
//! a single per-slot budget by default, or exclusive endpoints.
//!
//! # KPI
//!
//! `total_delay` and `ScheduleKpi` reduce a schedule to scalar metrics.

mod conflict;
mod kpi;
mod merge;
mod slot;

pub use conflict::{ConflictModel, EndpointExclusive, GlobalBudget};
pub use kpi::{total_delay, ScheduleKpi};
pub use merge::ScheduleMerger;
pub use slot::{RrrnSchedules, SlotScheduler};
