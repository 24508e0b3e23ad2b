//! Time-slot scheduling of pairwise network requests.
//!
//! Assigns entanglement-distribution requests between network nodes to
//! discrete time slots under competing policies, compacts the resulting
//! schedules, and measures how each schedule degrades when nodes fail at
//! random.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Request`, `Round`, `RequestBatch`, `Path`,
//!   `PathIndex`, `Schedule`, `FailureMask`, `FailureOutcome`
//! - **`dispatching`**: Priority rules (FIFO, base priority, aging) and the
//!   rule engine that chains them
//! - **`scheduler`**: FIFO and aging round-robin (RRRN) schedulers, merge
//!   compaction, conflict models, delay metrics
//! - **`failure`**: Bernoulli node-failure sampling and failure checking
//! - **`simulation`**: Side-by-side evaluation of FIFO, FIFO Merge, RRRN
//!   and RRRN Merge under one failure mask
//! - **`validation`**: Batch and schedule integrity checks
//!
//! # Pipeline
//!
//! ```text
//! RequestBatch + PathIndex → scheduler → merge → { total_delay, failure check }
//! ```
//!
//! Topology construction, shortest-path search and request generation are
//! upstream collaborators; their results enter as `RequestBatch` and
//! `PathIndex`.

pub mod config;
pub mod dispatching;
pub mod error;
pub mod failure;
pub mod models;
pub mod scheduler;
pub mod simulation;
pub mod validation;

pub use config::{MissingPathPolicy, RrrnParams, SimulationConfig};
pub use error::{Result, SchedulingError};
pub use simulation::{EvaluationReport, PolicySummary, Simulation};
