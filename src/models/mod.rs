//! Slot-scheduling domain models.
//!
//! Provides the data types shared by the schedulers, the merger and the
//! failure injector. Requests and paths come from upstream collaborators
//! and are never mutated; schedules, masks and outcomes are produced fresh
//! for every run.
//!
//! # Domain Mappings
//!
//! | u-slotsched | Network simulation |
//! |-------------|--------------------|
//! | Request | Entanglement-distribution demand between two nodes |
//! | Path | Shortest route the demand is served over |
//! | Slot | Time quantum |
//! | Schedule | Slot plan for one round under one policy |
//! | FailureMask | Nodes down per time quantum |

mod failure;
mod path;
mod request;
mod schedule;

pub use failure::{FailureMask, FailureOutcome};
pub use path::{Path, PathIndex};
pub use request::{NodeId, Request, RequestBatch, Round};
pub use schedule::{Policy, Schedule, ScheduleEntry, Slot};
