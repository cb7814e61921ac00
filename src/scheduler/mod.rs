//! Resource-constrained scheduling of generated tasks.
//!
//! # Algorithm
//!
//! `SerialScheduler` places tasks one at a time in dependency order, each
//! at the earliest start that respects its predecessors and keeps every
//! resource kind (crews, formwork kits, pumps) within the project pool.
//! It is a fast greedy heuristic and not guaranteed optimal.
//!
//! # Summary
//!
//! `summarize` computes total duration, labor hours, direct cost with
//! markups, and per-kind utilization.
//!
//! # References
//!
//! - Kolisch (1996), "Serial and parallel resource-constrained project
//!   scheduling methods revisited"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 1.2

mod serial;
mod summary;

pub use serial::SerialScheduler;
pub use summary::summarize;
