//! Formwork cycle calculator.
//!
//! Computes how long one capture occupies a formwork set, phase by phase:
//!
//! | Phase | Source |
//! |-------|--------|
//! | Assembly | set area × system norm × crane factor / crew capacity |
//! | Rebar | main bars + stirrups + mesh hours / rebar crew capacity |
//! | Concrete | fixed 1 day (one continuous pour per capture) |
//! | Curing | curing table × cement factor |
//! | Disassembly | explicit norm, or assembly hours × system ratio |
//!
//! `cycle_days` is the sum of the phases; `work_days` excludes curing.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::EngineDefaults;
use crate::error::Advisory;
use crate::norms::{
    parse_or_default, CementType, ConstructionType, CrewPreset, CuringOutcome, FormworkSystem,
    ReferenceData, Season,
};
use crate::units::round2;
use crate::{PlanError, PlanResult};

/// Concrete phase length (days).
pub const CONCRETE_DAYS: f64 = 1.0;

/// Optional reinforcement parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RebarInput {
    /// Reinforcement ratio (kg/m³).
    pub rebar_kg_per_m3: f64,
    /// Concrete volume of one capture (m³).
    pub concrete_m3_per_tact: f64,
    pub main_diameter_mm: Option<u32>,
    pub stirrup_diameter_mm: Option<u32>,
    /// Stirrup share of rebar mass (0..=1).
    pub stirrup_fraction: Option<f64>,
    /// KARI mesh area (m²).
    pub mesh_area_m2: Option<f64>,
    /// Size of a separate rebar crew. `None` = the formwork crew ties rebar.
    pub crew_size_rebar: Option<u32>,
}

/// Inputs of the standalone cycle/strategy calculation.
///
/// Lookup keys are free text; unknown keys fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleInput {
    pub construction_type: String,
    pub season: String,
    #[serde(default = "default_cement")]
    pub cement_type: String,
    /// Crew preset key, e.g. `4_bez_jeravu`.
    pub crew: String,
    /// Formwork system name, e.g. `Framax Xlife`.
    pub formwork_system: String,
    pub total_area_m2: f64,
    pub set_area_m2: f64,
    #[serde(default)]
    pub rebar: Option<RebarInput>,
    /// Hourly wage for labor costing. `None` = engine default.
    #[serde(default)]
    pub wage_rate_per_hour: Option<f64>,
    /// Transport days each way. `None` = engine default.
    #[serde(default)]
    pub transport_days: Option<f64>,
}

fn default_cement() -> String {
    CementType::CemI.to_string()
}

impl CycleInput {
    pub fn new(total_area_m2: f64, set_area_m2: f64) -> Self {
        Self {
            construction_type: ConstructionType::Steny.to_string(),
            season: Season::Leto.to_string(),
            cement_type: default_cement(),
            crew: "4_bez_jeravu".to_string(),
            formwork_system: "Framax Xlife".to_string(),
            total_area_m2,
            set_area_m2,
            rebar: None,
            wage_rate_per_hour: None,
            transport_days: None,
        }
    }

    pub fn with_construction(mut self, construction_type: impl Into<String>) -> Self {
        self.construction_type = construction_type.into();
        self
    }

    pub fn with_season(mut self, season: impl Into<String>) -> Self {
        self.season = season.into();
        self
    }

    pub fn with_cement(mut self, cement_type: impl Into<String>) -> Self {
        self.cement_type = cement_type.into();
        self
    }

    pub fn with_crew(mut self, crew: impl Into<String>) -> Self {
        self.crew = crew.into();
        self
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.formwork_system = system.into();
        self
    }

    pub fn with_rebar(mut self, rebar: RebarInput) -> Self {
        self.rebar = Some(rebar);
        self
    }

    pub fn with_wage(mut self, per_hour: f64) -> Self {
        self.wage_rate_per_hour = Some(per_hour);
        self
    }

    pub fn with_transport_days(mut self, days: f64) -> Self {
        self.transport_days = Some(days);
        self
    }
}

/// Lookup keys after resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedKeys {
    pub construction_type: ConstructionType,
    pub season: Season,
    pub cement_type: CementType,
    pub crew: String,
    pub formwork_system: String,
}

/// Rebar phase details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RebarBreakdown {
    pub mass_kg: f64,
    pub main_mass_kg: f64,
    pub stirrup_mass_kg: f64,
    pub main_hours_per_t: f64,
    pub stirrup_hours_per_t: f64,
    pub main_hours: f64,
    pub stirrup_hours: f64,
    pub mesh_hours: f64,
    pub total_hours: f64,
    pub crew_size: u32,
    /// Rebar days before any overlap credit.
    pub sequential_days: f64,
    /// Days absorbed by a separate crew working alongside assembly.
    pub parallel_overlap: f64,
    /// Rebar days after the overlap credit.
    pub rebar_days: f64,
    pub spacer_count: u32,
    pub spacer_cost: f64,
}

/// Per-capture cycle figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleResult {
    /// Number of captures: `ceil(total_area / set_area)`.
    #[serde(rename = "pocet_taktu")]
    pub capture_count: u32,
    pub assembly_hours: f64,
    pub disassembly_hours: f64,
    pub rebar_hours: f64,
    pub assembly_days: f64,
    pub rebar_days: f64,
    pub concrete_days: f64,
    pub curing_days: f64,
    pub disassembly_days: f64,
    pub cycle_days: f64,
    /// Cycle without curing.
    pub work_days: f64,
    /// Props minimum for horizontal types; not part of the cycle.
    pub props_minimum_days: Option<f64>,
}

/// Everything the calculator derived for one input.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleOutcome {
    pub keys: ResolvedKeys,
    pub crew: CrewPreset,
    pub system: FormworkSystem,
    pub curing: CuringOutcome,
    pub rebar: Option<RebarBreakdown>,
    pub result: CycleResult,
    pub advisories: Vec<Advisory>,
}

/// `ceil(total / set)`, tolerant of floating-point noise in the ratio.
///
/// # Errors
/// `InvalidQuantity` for a non-positive area or a count beyond `u32`.
pub fn capture_count(total_area_m2: f64, set_area_m2: f64) -> PlanResult<u32> {
    if !(total_area_m2.is_finite() && total_area_m2 > 0.0) {
        return Err(PlanError::InvalidQuantity(format!(
            "total_area_m2 must be positive, got {total_area_m2}"
        )));
    }
    if !(set_area_m2.is_finite() && set_area_m2 > 0.0) {
        return Err(PlanError::InvalidQuantity(format!(
            "set_area_m2 must be positive, got {set_area_m2}"
        )));
    }
    let ratio = total_area_m2 / set_area_m2;
    // a few ulps of division noise must not add a capture
    let count = (ratio - ratio * f64::EPSILON * 4.0).ceil();
    if count > u32::MAX as f64 {
        return Err(PlanError::InvalidQuantity(format!(
            "{total_area_m2} m² over {set_area_m2} m² sets gives {count} captures"
        )));
    }
    Ok((count as u32).max(1))
}

/// Cycle calculator over shared reference data.
#[derive(Debug, Clone, Default)]
pub struct CycleCalculator {
    pub(crate) reference: Arc<ReferenceData>,
    pub(crate) defaults: EngineDefaults,
}

impl CycleCalculator {
    pub fn new(reference: Arc<ReferenceData>) -> Self {
        Self {
            reference,
            defaults: EngineDefaults::default(),
        }
    }

    pub fn with_defaults(mut self, defaults: EngineDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn defaults(&self) -> &EngineDefaults {
        &self.defaults
    }

    /// Computes the cycle of one capture.
    pub fn calculate(&self, input: &CycleInput) -> PlanResult<CycleOutcome> {
        let count = capture_count(input.total_area_m2, input.set_area_m2)?;
        let reference = &*self.reference;
        let mut advisories = Vec::new();

        let d = &self.defaults;
        let construction =
            parse_or_default("construction type", &input.construction_type, d.construction_type)
                .collect(&mut advisories);
        let season = parse_or_default("season", &input.season, d.season).collect(&mut advisories);
        let cement =
            parse_or_default("cement type", &input.cement_type, d.cement_type).collect(&mut advisories);

        let crew_lookup = reference.crews.resolve(&input.crew)?;
        let crew_key = crew_lookup.key.clone();
        let crew = crew_lookup.collect(&mut advisories).clone();

        let system_lookup = reference.formwork.resolve(&input.formwork_system)?;
        let system_key = system_lookup.key.clone();
        let system = system_lookup.collect(&mut advisories).clone();

        let set_area = input.set_area_m2;
        let crew_hours_per_day = crew.hours_per_day();

        let assembly_hours = set_area * system.assembly_hours_per_m2 * crew.crane_factor;
        let assembly_days = round2(day_share(assembly_hours, crew_hours_per_day));

        let disassembly_hours = system.disassembly_hours(set_area, assembly_hours, crew.crane_factor);
        let disassembly_days = round2(day_share(disassembly_hours, crew_hours_per_day));

        let rebar = input
            .rebar
            .as_ref()
            .map(|r| self.rebar_phase(r, &crew, assembly_days, set_area));
        let (rebar_hours, rebar_days) = rebar
            .as_ref()
            .map(|b| (b.total_hours, b.rebar_days))
            .unwrap_or((0.0, 0.0));

        let curing = reference
            .curing
            .curing_days(construction, season, cement)?
            .collect(&mut advisories);

        let cycle_days = round2(
            assembly_days + rebar_days + CONCRETE_DAYS + curing.curing_days + disassembly_days,
        );
        let work_days = round2(cycle_days - curing.curing_days);

        let result = CycleResult {
            capture_count: count,
            assembly_hours: round2(assembly_hours),
            disassembly_hours: round2(disassembly_hours),
            rebar_hours: round2(rebar_hours),
            assembly_days,
            rebar_days,
            concrete_days: CONCRETE_DAYS,
            curing_days: curing.curing_days,
            disassembly_days,
            cycle_days,
            work_days,
            props_minimum_days: curing.props_minimum_days,
        };

        tracing::debug!(
            captures = count,
            cycle_days,
            work_days,
            curing_days = curing.curing_days,
            "computed formwork cycle"
        );

        Ok(CycleOutcome {
            keys: ResolvedKeys {
                construction_type: construction,
                season,
                cement_type: cement,
                crew: crew_key,
                formwork_system: system_key,
            },
            crew,
            system,
            curing,
            rebar,
            result,
            advisories,
        })
    }

    fn rebar_phase(
        &self,
        input: &RebarInput,
        crew: &CrewPreset,
        assembly_days: f64,
        set_area_m2: f64,
    ) -> RebarBreakdown {
        let d = &self.defaults;
        let norms = &self.reference.rebar;

        let mass_kg = (input.rebar_kg_per_m3 * input.concrete_m3_per_tact).max(0.0);
        let stirrup_fraction = input
            .stirrup_fraction
            .unwrap_or(d.stirrup_fraction)
            .clamp(0.0, 1.0);
        let stirrup_mass_kg = mass_kg * stirrup_fraction;
        let main_mass_kg = mass_kg - stirrup_mass_kg;

        let main_hours_per_t = norms.hours_per_t(input.main_diameter_mm.unwrap_or(d.main_bar_diameter_mm));
        let stirrup_hours_per_t =
            norms.hours_per_t(input.stirrup_diameter_mm.unwrap_or(d.stirrup_diameter_mm));
        let main_hours = main_mass_kg / 1000.0 * main_hours_per_t;
        let stirrup_hours = stirrup_mass_kg / 1000.0 * stirrup_hours_per_t;
        let mesh_hours = input.mesh_area_m2.unwrap_or(0.0).max(0.0) * d.mesh_hours_per_m2;
        let total_hours = main_hours + stirrup_hours + mesh_hours;

        let crew_size = input.crew_size_rebar.unwrap_or(crew.crew_size);
        let sequential_days = round2(day_share(total_hours, crew_size as f64 * crew.shift_hours));

        let separate_crew = matches!(input.crew_size_rebar, Some(n) if n != crew.crew_size);
        let (parallel_overlap, rebar_days) = if separate_crew && total_hours > 0.0 {
            let overlap = round2(d.max_parallel_overlap * sequential_days.min(assembly_days));
            (overlap, round2((sequential_days - overlap).max(d.min_rebar_days)))
        } else {
            (0.0, sequential_days)
        };

        let spacer_count = (set_area_m2 * d.spacers_per_m2).ceil() as u32;

        RebarBreakdown {
            mass_kg: round2(mass_kg),
            main_mass_kg: round2(main_mass_kg),
            stirrup_mass_kg: round2(stirrup_mass_kg),
            main_hours_per_t,
            stirrup_hours_per_t,
            main_hours: round2(main_hours),
            stirrup_hours: round2(stirrup_hours),
            mesh_hours: round2(mesh_hours),
            total_hours: round2(total_hours),
            crew_size,
            sequential_days,
            parallel_overlap,
            rebar_days,
            spacer_count,
            spacer_cost: round2(spacer_count as f64 * d.spacer_unit_price),
        }
    }
}

/// Days of work for `hours` at `hours_per_day`; 0 when the crew delivers nothing.
fn day_share(hours: f64, hours_per_day: f64) -> f64 {
    if hours_per_day > 0.0 {
        hours / hours_per_day
    } else {
        0.0
    }
}
