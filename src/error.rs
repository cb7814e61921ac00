//! Error and advisory types.
//!
//! Fatal problems are [`PlanError`] values returned through `Result`.
//! Non-fatal findings (fallback lookups, pour-window overruns, planning
//! hints) are [`Advisory`] values returned next to the result; they never
//! abort a computation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias used by every fallible operation of this crate.
pub type PlanResult<T> = Result<T, PlanError>;

/// Errors that reject a planning call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    /// Required reference configuration is absent.
    #[error("{0}")]
    ConfigurationMissing(String),
    /// Nothing to work on.
    #[error("{0}")]
    EmptyInput(String),
    /// A quantity that must be positive is not.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),
    /// An id points to nothing.
    #[error("unknown reference: {0}")]
    UnknownReference(String),
    /// Dependency graph is not acyclic.
    #[error("circular dependency detected involving '{0}'")]
    CyclicDependency(String),
    /// Captures or tasks violate a structural rule.
    #[error("invalid structure: {0}")]
    InvalidStructure(String),
    /// A persisted row could not be decoded.
    #[error("malformed record: {0}")]
    MalformedRecord(String),
    /// A task needs more units of a resource than the pool owns.
    #[error("task '{task_id}' needs {required} x {kind} but only {available} available")]
    InsufficientResource {
        task_id: String,
        kind: String,
        required: u32,
        available: u32,
    },
}

impl PlanError {
    pub(crate) fn no_normset() -> Self {
        Self::ConfigurationMissing("no normset configured".into())
    }

    pub(crate) fn no_captures() -> Self {
        Self::EmptyInput("no captures, generate captures first".into())
    }

    pub(crate) fn no_tasks() -> Self {
        Self::EmptyInput("no tasks to schedule".into())
    }
}

/// Category of a non-fatal finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryKind {
    /// A lookup key was not found and a default was substituted.
    UnknownLookupKey,
    /// Pour duration exceeds the element's continuous-pour window.
    ContinuousPourExceeded,
    /// Cold or transitional season slows curing.
    SeasonRisk,
    /// Slow-strength-gain cement lengthens curing.
    SlowCement,
    /// Many captures; a larger formwork set may pay off.
    ManyCaptures,
    /// Cheapest and fastest strategies differ.
    StrategyDivergence,
    /// A separate rebar crew shortens the cycle.
    ParallelRebarSavings,
}

/// A non-fatal finding surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advisory {
    pub kind: AdvisoryKind,
    pub message: String,
}

impl Advisory {
    pub fn new(kind: AdvisoryKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Creates the advisory and emits it as a `tracing` warning.
    pub(crate) fn warn(kind: AdvisoryKind, message: impl Into<String>) -> Self {
        let advisory = Self::new(kind, message);
        tracing::warn!(kind = ?advisory.kind, "{}", advisory.message);
        advisory
    }
}
