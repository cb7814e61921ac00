//! Combined cycle and strategy plan with planning warnings.
//!
//! [`plan_cycle`] runs the cycle calculator, feeds the result to the
//! strategy optimizer and collects every advisory into one serializable
//! [`CyclePlan`]. The `deterministic` block depends only on the inputs
//! and the reference data.

use serde::{Deserialize, Serialize};

use super::cycle::{CycleCalculator, CycleInput, CycleResult, RebarBreakdown, ResolvedKeys};
use super::strategy::{StrategyComparison, StrategyInput, StrategyKind, StrategyOptimizer};
use crate::error::{Advisory, AdvisoryKind};
use crate::norms::{CementType, Season};
use crate::units::round2;
use crate::PlanResult;

/// Inputs as they were actually used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanInputs {
    #[serde(flatten)]
    pub keys: ResolvedKeys,
    pub manufacturer: String,
    pub total_area_m2: f64,
    pub set_area_m2: f64,
    pub rental_per_m2_month: f64,
    pub transport_days: f64,
    pub wage_rate_per_hour: f64,
}

/// Labor cost of the formwork and rebar work. Independent of the strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaborCost {
    pub hours_per_capture: f64,
    pub cost_per_capture: f64,
    pub total_hours: f64,
    pub total_cost: f64,
}

/// Numbers that depend only on the inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeterministicPlan {
    pub inputs: PlanInputs,
    pub cycle: CycleResult,
    pub rebar: Option<RebarBreakdown>,
    #[serde(flatten)]
    pub strategies: StrategyComparison,
    pub labor: LaborCost,
}

/// Output of [`plan_cycle`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CyclePlan {
    pub deterministic: DeterministicPlan,
    pub warnings: Vec<Advisory>,
}

impl CyclePlan {
    pub fn has_warning(&self, kind: AdvisoryKind) -> bool {
        self.warnings.iter().any(|w| w.kind == kind)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Cycle, strategies, labor and warnings for one input.
pub fn plan_cycle(calculator: &CycleCalculator, input: &CycleInput) -> PlanResult<CyclePlan> {
    let defaults = calculator.defaults();
    let outcome = calculator.calculate(input)?;
    let mut warnings = outcome.advisories;
    let result = outcome.result;
    let count = result.capture_count;

    let transport_days = input.transport_days.unwrap_or(defaults.transport_days);
    let wage = input.wage_rate_per_hour.unwrap_or(defaults.wage_rate_per_hour);

    let comparison = StrategyOptimizer::new().compare(&StrategyInput::from_cycle(
        &result,
        outcome.system.rental_per_m2_month,
        input.set_area_m2,
        transport_days,
    ));

    let hours_per_capture = result.assembly_hours + result.disassembly_hours + result.rebar_hours;
    let labor = LaborCost {
        hours_per_capture: round2(hours_per_capture),
        cost_per_capture: round2(hours_per_capture * wage),
        total_hours: round2(hours_per_capture * count as f64),
        total_cost: round2(hours_per_capture * wage * count as f64),
    };

    match outcome.keys.season {
        Season::Zima => warnings.push(Advisory::warn(
            AdvisoryKind::SeasonRisk,
            format!(
                "winter concreting: curing {} days, plan heating and insulation of fresh concrete",
                result.curing_days
            ),
        )),
        Season::PodzimJaro => warnings.push(Advisory::warn(
            AdvisoryKind::SeasonRisk,
            format!(
                "transitional season: curing {} days, watch night frosts",
                result.curing_days
            ),
        )),
        Season::Leto => {}
    }

    if outcome.keys.cement_type == CementType::CemIii {
        warnings.push(Advisory::warn(
            AdvisoryKind::SlowCement,
            format!(
                "slow cement: curing extended ×{} from {} to {} days",
                outcome.curing.cement_factor, outcome.curing.base_days, result.curing_days
            ),
        ));
    }

    if count > defaults.many_captures_threshold {
        warnings.push(Advisory::warn(
            AdvisoryKind::ManyCaptures,
            format!(
                "{count} captures for {} m²: consider a larger formwork set",
                input.total_area_m2
            ),
        ));
    }

    if comparison.diverges() {
        warnings.push(divergence_warning(&comparison));
    }

    if let Some(rebar) = outcome.rebar.as_ref().filter(|r| r.parallel_overlap > 0.0) {
        warnings.push(Advisory::warn(
            AdvisoryKind::ParallelRebarSavings,
            format!(
                "separate rebar crew of {} saves {} days per capture, {} days over {count} captures",
                rebar.crew_size,
                rebar.parallel_overlap,
                round2(rebar.parallel_overlap * count as f64)
            ),
        ));
    }

    Ok(CyclePlan {
        deterministic: DeterministicPlan {
            inputs: PlanInputs {
                keys: outcome.keys,
                manufacturer: outcome.system.manufacturer,
                total_area_m2: input.total_area_m2,
                set_area_m2: input.set_area_m2,
                rental_per_m2_month: outcome.system.rental_per_m2_month,
                transport_days,
                wage_rate_per_hour: wage,
            },
            cycle: result,
            rebar: outcome.rebar,
            strategies: comparison,
            labor,
        },
        warnings,
    })
}

fn divergence_warning(cmp: &StrategyComparison) -> Advisory {
    let describe = |kind: StrategyKind| {
        cmp.get(kind)
            .map(|s| format!("{kind}: {} days, rental {}", s.total_days, s.rental_cost))
            .unwrap_or_else(|| kind.to_string())
    };
    Advisory::warn(
        AdvisoryKind::StrategyDivergence,
        format!(
            "cheapest is {}, fastest is {}",
            describe(cmp.recommended_cost),
            describe(cmp.recommended_time)
        ),
    )
}
