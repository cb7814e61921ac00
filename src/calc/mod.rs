//! Calculators.
//!
//! # Modules
//!
//! - **`labor`**: rebar, formwork and concreting work estimates
//! - **`chain`**: the six-task technological chain of one capture
//! - **`cycle`**: formwork cycle of one capture from reference norms
//! - **`strategy`**: sequential, overlapping and parallel set deployment
//! - **`plan`**: cycle + strategies + warnings in one payload

pub mod chain;
pub mod cycle;
pub mod labor;
pub mod plan;
pub mod strategy;

pub use chain::{TaskChain, TaskChainBuilder};
pub use cycle::{
    capture_count, CycleCalculator, CycleInput, CycleOutcome, CycleResult, RebarBreakdown,
    RebarInput, ResolvedKeys, CONCRETE_DAYS,
};
pub use labor::{CrewTerms, WorkEstimate};
pub use plan::{plan_cycle, CyclePlan, DeterministicPlan, LaborCost, PlanInputs};
pub use strategy::{
    PhaseDays, Strategy, StrategyComparison, StrategyInput, StrategyKind, StrategyOptimizer,
};
