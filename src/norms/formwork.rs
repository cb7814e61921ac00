//! Formwork systems and crew presets.
//!
//! Both catalogs are keyed by display name and looked up through
//! [`lookup_or_default`], so an unknown name costs like the default entry.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::lookup::{lookup_or_default, Resolved};
use crate::PlanResult;

/// Disassembly-to-assembly ratio when a system states no ratio of its own.
pub const DEFAULT_DISASSEMBLY_RATIO: f64 = 0.35;

/// Labor and rental norms of one formwork system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormworkSystem {
    pub manufacturer: String,
    /// Assembly labor (h/m²).
    pub assembly_hours_per_m2: f64,
    /// Explicit disassembly labor (h/m²). Overrides the ratio when set.
    pub disassembly_hours_per_m2: Option<f64>,
    /// Disassembly hours as a share of assembly hours.
    #[serde(default = "default_ratio")]
    pub disassembly_ratio: f64,
    /// Rental per m² per month.
    pub rental_per_m2_month: f64,
}

fn default_ratio() -> f64 {
    DEFAULT_DISASSEMBLY_RATIO
}

impl FormworkSystem {
    pub fn new(manufacturer: impl Into<String>, assembly_hours_per_m2: f64, rental_per_m2_month: f64) -> Self {
        Self {
            manufacturer: manufacturer.into(),
            assembly_hours_per_m2,
            disassembly_hours_per_m2: None,
            disassembly_ratio: DEFAULT_DISASSEMBLY_RATIO,
            rental_per_m2_month,
        }
    }

    pub fn with_disassembly_norm(mut self, hours_per_m2: f64) -> Self {
        self.disassembly_hours_per_m2 = Some(hours_per_m2);
        self
    }

    pub fn with_disassembly_ratio(mut self, ratio: f64) -> Self {
        self.disassembly_ratio = ratio;
        self
    }

    /// Rental per m² per day (month = 30 days).
    pub fn rental_per_m2_day(&self) -> f64 {
        self.rental_per_m2_month / 30.0
    }

    /// Disassembly hours for a given assembly effort.
    pub fn disassembly_hours(&self, area_m2: f64, assembly_hours: f64, crane_factor: f64) -> f64 {
        match self.disassembly_hours_per_m2 {
            Some(norm) => area_m2 * norm * crane_factor,
            None => assembly_hours * self.disassembly_ratio,
        }
    }
}

/// Formwork systems by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormworkCatalog {
    pub systems: BTreeMap<String, FormworkSystem>,
    pub default_system: String,
}

impl FormworkCatalog {
    /// Built-in fallback norms, used when no norms knowledge base is loaded.
    pub fn builtin() -> Self {
        let systems = BTreeMap::from([
            ("Frami Xlife".to_string(), FormworkSystem::new("DOKA", 0.72, 180.0)),
            ("Framax Xlife".to_string(), FormworkSystem::new("DOKA", 0.55, 220.0)),
            ("TRIO".to_string(), FormworkSystem::new("PERI", 0.50, 210.0)),
            (
                "MAXIMO".to_string(),
                FormworkSystem::new("PERI", 0.45, 240.0).with_disassembly_ratio(0.30),
            ),
            (
                "Dokaflex".to_string(),
                FormworkSystem::new("DOKA", 0.45, 150.0).with_disassembly_norm(0.15),
            ),
            (
                "SKYDECK".to_string(),
                FormworkSystem::new("PERI", 0.35, 160.0).with_disassembly_norm(0.12),
            ),
            (
                "Tradiční tesařské".to_string(),
                FormworkSystem::new("-", 1.30, 60.0).with_disassembly_ratio(0.50),
            ),
        ]);

        Self {
            systems,
            default_system: "Framax Xlife".to_string(),
        }
    }

    /// Looks a system up by name, falling back to the default system.
    pub fn resolve(&self, name: &str) -> PlanResult<Resolved<&FormworkSystem>> {
        lookup_or_default(&self.systems, "formwork system", name, &self.default_system)
    }
}

impl Default for FormworkCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Crew size, shift and crane availability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewPreset {
    pub crew_size: u32,
    pub shift_hours: f64,
    pub crane: bool,
    /// Multiplier on assembly hours (< 1 with a crane).
    pub crane_factor: f64,
}

impl CrewPreset {
    pub fn new(crew_size: u32, shift_hours: f64) -> Self {
        Self {
            crew_size,
            shift_hours,
            crane: false,
            crane_factor: 1.0,
        }
    }

    pub fn with_crane(mut self, factor: f64) -> Self {
        self.crane = true;
        self.crane_factor = factor;
        self
    }

    /// Person-hours the crew delivers per day.
    pub fn hours_per_day(&self) -> f64 {
        self.crew_size as f64 * self.shift_hours
    }
}

/// Crew presets by key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewCatalog {
    pub presets: BTreeMap<String, CrewPreset>,
    pub default_preset: String,
}

impl CrewCatalog {
    pub fn builtin() -> Self {
        let presets = BTreeMap::from([
            ("2_bez_jeravu".to_string(), CrewPreset::new(2, 10.0)),
            ("4_bez_jeravu".to_string(), CrewPreset::new(4, 10.0)),
            ("4_s_jeravem".to_string(), CrewPreset::new(4, 10.0).with_crane(0.6)),
            ("6_s_jeravem".to_string(), CrewPreset::new(6, 10.0).with_crane(0.6)),
        ]);

        Self {
            presets,
            default_preset: "4_bez_jeravu".to_string(),
        }
    }

    pub fn resolve(&self, key: &str) -> PlanResult<Resolved<&CrewPreset>> {
        lookup_or_default(&self.presets, "crew configuration", key, &self.default_preset)
    }
}

impl Default for CrewCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_system() {
        let c = FormworkCatalog::builtin();
        let r = c.resolve("Framax Xlife").unwrap();
        assert!(!r.is_fallback());
        assert!((r.value.assembly_hours_per_m2 - 0.55).abs() < 1e-10);
    }

    #[test]
    fn test_unknown_system_uses_default() {
        let c = FormworkCatalog::builtin();
        let r = c.resolve("Alu Deck 3000").unwrap();
        assert!(r.is_fallback());
        assert_eq!(r.key, "Framax Xlife");
    }

    #[test]
    fn test_disassembly_ratio_vs_norm() {
        let framax = FormworkSystem::new("DOKA", 0.55, 220.0);
        assert!((framax.disassembly_hours(25.0, 13.75, 1.0) - 13.75 * 0.35).abs() < 1e-10);

        let flex = FormworkSystem::new("DOKA", 0.45, 150.0).with_disassembly_norm(0.15);
        assert!((flex.disassembly_hours(40.0, 18.0, 0.6) - 40.0 * 0.15 * 0.6).abs() < 1e-10);
    }

    #[test]
    fn test_daily_rental() {
        let s = FormworkSystem::new("DOKA", 0.55, 210.0);
        assert!((s.rental_per_m2_day() - 7.0).abs() < 1e-10);
    }

    #[test]
    fn test_crew_presets() {
        let c = CrewCatalog::builtin();
        let r = c.resolve("6_s_jeravem").unwrap();
        assert!(r.value.crane);
        assert!(r.value.crane_factor < 1.0);
        assert!((r.value.hours_per_day() - 60.0).abs() < 1e-10);

        let r = c.resolve("12_s_vrtulnikem").unwrap();
        assert!(r.is_fallback());
        assert_eq!(r.value.crew_size, 4);
    }

    #[test]
    fn test_system_json_defaults_ratio() {
        let s: FormworkSystem = serde_json::from_str(
            r#"{"manufacturer":"X","assembly_hours_per_m2":0.5,"disassembly_hours_per_m2":null,"rental_per_m2_month":100.0}"#,
        )
        .unwrap();
        assert!((s.disassembly_ratio - DEFAULT_DISASSEMBLY_RATIO).abs() < 1e-10);
    }
}
