//! Engine defaults.
//!
//! Fixed constants used when the caller does not supply a value. Every
//! field has a default, so a partial JSON document deserializes into a
//! complete configuration.

use serde::{Deserialize, Serialize};

use crate::norms::{CementType, ConstructionType, Season};

/// Defaults applied by the calculators and the strategy optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineDefaults {
    /// Rebar crew size for generated rebar tasks.
    pub rebar_crew_size: u32,
    /// Formwork crew size for generated assembly/disassembly tasks.
    pub formwork_crew_size: u32,
    /// Crew size for the move/clean task.
    pub move_clean_crew_size: u32,
    /// Share of paid time that is productive (0..=1).
    pub utilization_factor: f64,
    /// Effective pump throughput (m³/h).
    pub pump_throughput_m3_h: f64,
    /// Continuous-pour window when the element does not set one (h).
    pub max_continuous_pour_hours: f64,
    /// Transport of the formwork set, applied on the way in and out (days).
    pub transport_days: f64,
    /// KARI-mesh laying norm (h/m²).
    pub mesh_hours_per_m2: f64,
    /// Distance spacers per m² of set area.
    pub spacers_per_m2: f64,
    /// Unit price of one spacer.
    pub spacer_unit_price: f64,
    /// Main bar diameter when none is given (mm).
    pub main_bar_diameter_mm: u32,
    /// Stirrup diameter when none is given (mm).
    pub stirrup_diameter_mm: u32,
    /// Stirrup share of rebar mass when none is given (0..=1).
    pub stirrup_fraction: f64,
    /// Hourly wage used for cycle labor cost.
    pub wage_rate_per_hour: f64,
    /// Capture count above which a larger set is suggested.
    pub many_captures_threshold: u32,
    /// Overlap credit for a separate rebar crew (share of the shorter phase).
    pub max_parallel_overlap: f64,
    /// Lower bound of rebar days once overlap is credited.
    pub min_rebar_days: f64,
    /// Used when the construction type key is unknown.
    pub construction_type: ConstructionType,
    /// Used when the season key is unknown.
    pub season: Season,
    /// Used when the cement type key is unknown.
    pub cement_type: CementType,
}

impl Default for EngineDefaults {
    fn default() -> Self {
        Self {
            rebar_crew_size: 4,
            formwork_crew_size: 4,
            move_clean_crew_size: 2,
            utilization_factor: 0.8,
            pump_throughput_m3_h: 15.0,
            max_continuous_pour_hours: 12.0,
            transport_days: 1.0,
            mesh_hours_per_m2: 0.10,
            spacers_per_m2: 5.0,
            spacer_unit_price: 3.5,
            main_bar_diameter_mm: 12,
            stirrup_diameter_mm: 8,
            stirrup_fraction: 0.15,
            wage_rate_per_hour: 398.0,
            many_captures_threshold: 10,
            max_parallel_overlap: 0.5,
            min_rebar_days: 0.1,
            construction_type: ConstructionType::Steny,
            season: Season::Leto,
            cement_type: CementType::CemI,
        }
    }
}
