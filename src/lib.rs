//! Capture-cycle planning for concrete formwork.
//!
//! Splits structural elements into captures (pour zones), expands every
//! capture into its technological task chain, and computes how long one
//! formwork cycle takes and how to deploy formwork sets across captures.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Project`, `Normset`, `Element`, `Capture`,
//!   `Task`, `ResourceMap`, `Schedule`
//! - **`norms`**: Reference tables (curing, formwork systems, crew presets,
//!   rebar norms) with resolve-with-default lookups
//! - **`calc`**: Labor calculators, `TaskChainBuilder`, `CycleCalculator`,
//!   `StrategyOptimizer` and `plan_cycle`
//! - **`generation`**: Capture generation and destructive task regeneration
//! - **`validation`**: Capture-chain and task-graph integrity checks
//! - **`scheduler`**: Serial resource-constrained scheduler and summary
//!
//! # Determinism
//!
//! Every computation is pure: the same inputs and reference data give the
//! same output. Task ids from [`calc::TaskChainBuilder::build`] are random
//! UUIDs; everything else is reproducible.
//!
//! # References
//!
//! - ČSN EN 13670, "Execution of concrete structures"
//! - Kenley & Seppänen (2010), "Location-Based Management for Construction"
//! - Kolisch (1996), "Serial and parallel resource-constrained project
//!   scheduling methods revisited"

pub mod calc;
pub mod config;
pub mod error;
pub mod generation;
pub mod models;
pub mod norms;
pub mod scheduler;
pub mod units;
pub mod validation;

pub use config::EngineDefaults;
pub use error::{Advisory, AdvisoryKind, PlanError, PlanResult};
