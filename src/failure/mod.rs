//! Node-failure injection and failure checking.
//!
//! `generate_failure_nodes` samples which nodes are down in each slot;
//! `check_failures_across_schedules` finds the scheduled requests whose
//! path crosses a failed node and `failure_adjusted_slots` charges one
//! retry slot per failed request.

mod checker;
mod injector;

pub use checker::{check_failures_across_schedules, check_schedule, failure_adjusted_slots};
pub use injector::{generate_failure_nodes, node_labels, FailureInjector};
