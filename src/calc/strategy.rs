//! Formwork deployment strategies.
//!
//! | Strategy | Sets | Total days |
//! |----------|------|------------|
//! | A sequential | 1 | `n × cycle` |
//! | B overlapping | 2 | `(n − 1) × (cycle − overlap) + cycle` |
//! | C parallel | n | `cycle` (only offered for n > 2) |
//!
//! Rental for every strategy is
//! `sets × set_area × daily_rate × (total_days + 2 × transport_days)`.
//!
//! # Reference
//! Kenley, R. & Seppänen, O. (2010). *Location-Based Management for
//! Construction*. Spon Press.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::cycle::CycleResult;
use crate::units::round2;

/// Deployment plan of the formwork sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyKind {
    /// One set, captures strictly one after another.
    A,
    /// Two sets; the next capture starts while the previous one cures.
    B,
    /// One set per capture, all captures at once.
    C,
}

impl StrategyKind {
    pub fn label(&self) -> &'static str {
        match self {
            StrategyKind::A => "sequential, 1 set",
            StrategyKind::B => "overlapping, 2 sets",
            StrategyKind::C => "parallel, N sets",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            StrategyKind::A => "A",
            StrategyKind::B => "B",
            StrategyKind::C => "C",
        };
        write!(f, "{code} ({})", self.label())
    }
}

/// One evaluated strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub kind: StrategyKind,
    pub label: String,
    /// Formwork sets on site at the same time.
    pub sets: u32,
    pub total_days: f64,
    pub rental_cost: f64,
}

/// Phase days feeding the optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseDays {
    pub assembly: f64,
    pub rebar: f64,
    pub concrete: f64,
    pub curing: f64,
    pub disassembly: f64,
}

impl PhaseDays {
    /// Work done before curing starts.
    pub fn pre_curing(&self) -> f64 {
        self.assembly + self.rebar + self.concrete
    }
}

impl From<&CycleResult> for PhaseDays {
    fn from(r: &CycleResult) -> Self {
        Self {
            assembly: r.assembly_days,
            rebar: r.rebar_days,
            concrete: r.concrete_days,
            curing: r.curing_days,
            disassembly: r.disassembly_days,
        }
    }
}

/// Everything the optimizer needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategyInput {
    pub capture_count: u32,
    pub cycle_days: f64,
    pub phases: PhaseDays,
    pub rental_per_m2_month: f64,
    pub set_area_m2: f64,
    /// Transport days each way.
    pub transport_days: f64,
}

impl StrategyInput {
    /// Input from a cycle result; the rental rate comes from the formwork system.
    pub fn from_cycle(
        result: &CycleResult,
        rental_per_m2_month: f64,
        set_area_m2: f64,
        transport_days: f64,
    ) -> Self {
        Self {
            capture_count: result.capture_count,
            cycle_days: result.cycle_days,
            phases: PhaseDays::from(result),
            rental_per_m2_month,
            set_area_m2,
            transport_days,
        }
    }

    /// Rental per m² per day.
    pub fn daily_rate(&self) -> f64 {
        self.rental_per_m2_month / 30.0
    }
}

/// Strategies plus the picks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyComparison {
    pub strategies: Vec<Strategy>,
    /// Cheapest rental.
    pub recommended_cost: StrategyKind,
    /// Shortest duration.
    pub recommended_time: StrategyKind,
    /// Curing days absorbed per capture by strategy B.
    pub overlap_days: f64,
}

impl StrategyComparison {
    pub fn get(&self, kind: StrategyKind) -> Option<&Strategy> {
        self.strategies.iter().find(|s| s.kind == kind)
    }

    /// The cost and time picks differ.
    pub fn diverges(&self) -> bool {
        self.recommended_cost != self.recommended_time
    }
}

/// Evaluates the three deployment strategies.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrategyOptimizer;

impl StrategyOptimizer {
    pub fn new() -> Self {
        Self
    }

    pub fn compare(&self, input: &StrategyInput) -> StrategyComparison {
        let n = input.capture_count.max(1);
        let cycle = input.cycle_days;

        let overlap_days = round2((input.phases.curing - input.phases.pre_curing()).max(0.0));
        let stride = cycle - overlap_days;

        let mut strategies = vec![
            self.strategy(input, StrategyKind::A, 1, n as f64 * cycle),
            self.strategy(
                input,
                StrategyKind::B,
                2,
                if n == 1 { cycle } else { (n - 1) as f64 * stride + cycle },
            ),
        ];
        if n > 2 {
            strategies.push(self.strategy(input, StrategyKind::C, n, cycle));
        }

        let recommended_cost = pick_min(&strategies, |s| s.rental_cost);
        let recommended_time = pick_min(&strategies, |s| s.total_days);

        tracing::debug!(
            captures = n,
            overlap_days,
            cost = %recommended_cost,
            time = %recommended_time,
            "compared formwork strategies"
        );

        StrategyComparison {
            strategies,
            recommended_cost,
            recommended_time,
            overlap_days,
        }
    }

    fn strategy(&self, input: &StrategyInput, kind: StrategyKind, sets: u32, total_days: f64) -> Strategy {
        let total_days = round2(total_days);
        let rented_days = total_days + 2.0 * input.transport_days;
        Strategy {
            kind,
            label: kind.label().to_string(),
            sets,
            total_days,
            rental_cost: round2(sets as f64 * input.set_area_m2 * input.daily_rate() * rented_days),
        }
    }
}

/// First strategy with the smallest key; later ties do not replace it.
fn pick_min(strategies: &[Strategy], key: impl Fn(&Strategy) -> f64) -> StrategyKind {
    let mut best = &strategies[0];
    for s in &strategies[1..] {
        if key(s) < key(best) {
            best = s;
        }
    }
    best.kind
}
