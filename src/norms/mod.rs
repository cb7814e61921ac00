//! Reference data: curing, formwork, crew and rebar tables.
//!
//! Tables are plain values, built once and passed to the calculators.
//! [`ReferenceData`] bundles them; wrap it in an `Arc` to share across
//! concurrent planning calls, or build a custom one in tests.

mod curing;
mod formwork;
mod lookup;
mod rebar;

pub use curing::{CementType, ConstructionType, CuringOutcome, CuringTable, Season, SeasonDays};
pub use formwork::{
    CrewCatalog, CrewPreset, FormworkCatalog, FormworkSystem, DEFAULT_DISASSEMBLY_RATIO,
};
pub use lookup::{lookup_or_default, normalize_key, parse_or_default, Resolved};
pub use rebar::{RebarNorm, RebarNormTable};

use serde::{Deserialize, Serialize};

/// All lookup tables used by the cycle calculator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceData {
    pub curing: CuringTable,
    pub formwork: FormworkCatalog,
    pub crews: CrewCatalog,
    pub rebar: RebarNormTable,
}

impl ReferenceData {
    /// Built-in tables.
    pub fn builtin() -> Self {
        Self::default()
    }

    pub fn with_curing(mut self, curing: CuringTable) -> Self {
        self.curing = curing;
        self
    }

    pub fn with_formwork(mut self, formwork: FormworkCatalog) -> Self {
        self.formwork = formwork;
        self
    }

    pub fn with_crews(mut self, crews: CrewCatalog) -> Self {
        self.crews = crews;
        self
    }

    pub fn with_rebar(mut self, rebar: RebarNormTable) -> Self {
        self.rebar = rebar;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_json_round_trip() {
        let r = ReferenceData::builtin();
        let json = serde_json::to_string(&r).unwrap();
        let back: ReferenceData = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn test_partial_reference_json() {
        let r: ReferenceData = serde_json::from_str(
            r#"{"rebar": {"bands": [{"max_diameter_mm": 40, "hours_per_t": 9.0}]}}"#,
        )
        .unwrap();
        assert!((r.rebar.hours_per_t(12) - 9.0).abs() < 1e-10);
        assert_eq!(r.formwork, FormworkCatalog::builtin());
    }
}
