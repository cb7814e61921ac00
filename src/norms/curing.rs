//! Curing model.
//!
//! Minimum days concrete must cure before the formwork is struck, by
//! construction type and season, following ČSN EN 13670 practice.
//! Horizontal elements (bridge deck, cornices) carry a second, longer
//! table: props must stay after the formwork is gone.
//!
//! # Seasons
//! - `leto`: average temperature above 15 °C
//! - `podzim_jaro`: 5–15 °C
//! - `zima`: below 5 °C

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::lookup::{fallback_advisory, normalize_key, Resolved};
use crate::units::round2;
use crate::{PlanError, PlanResult};

/// Construction type as used by the curing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstructionType {
    /// Strip footings.
    ZakladovePasy,
    /// Walls.
    Steny,
    /// Bridge piers.
    PilireMostu,
    /// Columns.
    Sloupy,
    /// Bridge deck.
    Mostovka,
    /// Cornices.
    Rimsy,
}

impl ConstructionType {
    pub const ALL: [ConstructionType; 6] = [
        ConstructionType::ZakladovePasy,
        ConstructionType::Steny,
        ConstructionType::PilireMostu,
        ConstructionType::Sloupy,
        ConstructionType::Mostovka,
        ConstructionType::Rimsy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConstructionType::ZakladovePasy => "zakladove_pasy",
            ConstructionType::Steny => "steny",
            ConstructionType::PilireMostu => "pilire_mostu",
            ConstructionType::Sloupy => "sloupy",
            ConstructionType::Mostovka => "mostovka",
            ConstructionType::Rimsy => "rimsy",
        }
    }

    /// Horizontal elements need props after stripping.
    pub fn is_horizontal(&self) -> bool {
        matches!(self, ConstructionType::Mostovka | ConstructionType::Rimsy)
    }
}

impl fmt::Display for ConstructionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConstructionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_key(s);
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == key)
            .ok_or_else(|| format!("unknown construction type '{s}'"))
    }
}

/// Season by average daily temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Leto,
    PodzimJaro,
    Zima,
}

impl Season {
    pub const ALL: [Season; 3] = [Season::Leto, Season::PodzimJaro, Season::Zima];

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Leto => "leto",
            Season::PodzimJaro => "podzim_jaro",
            Season::Zima => "zima",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Season {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_key(s);
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == key)
            .ok_or_else(|| format!("unknown season '{s}'"))
    }
}

/// Cement class by strength gain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CementType {
    /// Portland cement (CEM I).
    CemI,
    /// Slag cement with slow strength gain (CEM III).
    CemIii,
}

impl CementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CementType::CemI => "cem_i",
            CementType::CemIii => "cem_iii",
        }
    }
}

impl fmt::Display for CementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_key(s).as_str() {
            "cem_i" | "cem1" | "cem_1" | "ordinary" => Ok(CementType::CemI),
            "cem_iii" | "cem3" | "cem_3" | "slow" => Ok(CementType::CemIii),
            _ => Err(format!("unknown cement type '{s}'")),
        }
    }
}

/// Days per season for one construction type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeasonDays {
    pub leto: f64,
    pub podzim_jaro: f64,
    pub zima: f64,
}

impl SeasonDays {
    pub const fn new(leto: f64, podzim_jaro: f64, zima: f64) -> Self {
        Self {
            leto,
            podzim_jaro,
            zima,
        }
    }

    pub fn get(&self, season: Season) -> f64 {
        match season {
            Season::Leto => self.leto,
            Season::PodzimJaro => self.podzim_jaro,
            Season::Zima => self.zima,
        }
    }
}

/// Curing result for one combination of inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuringOutcome {
    /// Table value before the cement factor.
    pub base_days: f64,
    pub cement_factor: f64,
    /// `base_days × cement_factor`, rounded.
    pub curing_days: f64,
    /// Props minimum for horizontal types (informational).
    pub props_minimum_days: Option<f64>,
}

/// Curing and props tables plus cement multipliers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuringTable {
    pub curing: BTreeMap<ConstructionType, SeasonDays>,
    pub props_minimum: BTreeMap<ConstructionType, SeasonDays>,
    pub cement_factors: BTreeMap<CementType, f64>,
    /// Row used for a construction type missing from `curing`.
    #[serde(default = "default_construction")]
    pub default_construction: ConstructionType,
}

fn default_construction() -> ConstructionType {
    ConstructionType::Steny
}

impl CuringTable {
    /// Built-in values.
    pub fn builtin() -> Self {
        use ConstructionType::*;

        let curing = BTreeMap::from([
            (ZakladovePasy, SeasonDays::new(1.0, 2.0, 3.0)),
            (Steny, SeasonDays::new(1.0, 2.0, 4.0)),
            (PilireMostu, SeasonDays::new(2.0, 3.0, 5.0)),
            (Sloupy, SeasonDays::new(1.0, 2.0, 4.0)),
            (Mostovka, SeasonDays::new(5.0, 7.0, 10.0)),
            (Rimsy, SeasonDays::new(3.0, 5.0, 7.0)),
        ]);
        let props_minimum = BTreeMap::from([
            (Mostovka, SeasonDays::new(14.0, 21.0, 28.0)),
            (Rimsy, SeasonDays::new(7.0, 10.0, 14.0)),
        ]);
        let cement_factors = BTreeMap::from([(CementType::CemI, 1.0), (CementType::CemIii, 1.8)]);

        Self {
            curing,
            props_minimum,
            cement_factors,
            default_construction: default_construction(),
        }
    }

    /// Multiplier for a cement type (1.0 if not in the table).
    pub fn cement_factor(&self, cement: CementType) -> f64 {
        self.cement_factors.get(&cement).copied().unwrap_or(1.0)
    }

    /// Minimum curing days and props minimum.
    ///
    /// A construction type missing from the table cures like
    /// `default_construction` and the result carries an advisory.
    ///
    /// # Errors
    /// `ConfigurationMissing` when the default row is missing too.
    pub fn curing_days(
        &self,
        construction: ConstructionType,
        season: Season,
        cement: CementType,
    ) -> PlanResult<Resolved<CuringOutcome>> {
        let (key, row, advisory) = match self.curing.get(&construction) {
            Some(row) => (construction, row, None),
            None => {
                let fallback = self.default_construction;
                let row = self.curing.get(&fallback).ok_or_else(|| {
                    PlanError::ConfigurationMissing(format!(
                        "default construction type '{fallback}' not in curing table"
                    ))
                })?;
                let advisory = fallback_advisory(
                    "curing table construction type",
                    construction.as_str(),
                    fallback.as_str(),
                );
                (fallback, row, Some(advisory))
            }
        };
        let base_days = row.get(season).max(0.0);
        let cement_factor = self.cement_factor(cement);

        let props_minimum_days = if construction.is_horizontal() {
            self.props_minimum
                .get(&construction)
                .map(|row| round2(row.get(season) * cement_factor))
        } else {
            None
        };

        Ok(Resolved {
            key: key.to_string(),
            value: CuringOutcome {
                base_days,
                cement_factor,
                curing_days: round2(base_days * cement_factor),
                props_minimum_days,
            },
            advisory,
        })
    }
}

impl Default for CuringTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdvisoryKind;

    fn outcome(
        t: &CuringTable,
        ct: ConstructionType,
        season: Season,
        cement: CementType,
    ) -> CuringOutcome {
        let r = t.curing_days(ct, season, cement).unwrap();
        assert!(!r.is_fallback());
        r.value
    }

    #[test]
    fn test_lookup_walls_summer() {
        let t = CuringTable::builtin();
        let out = outcome(&t, ConstructionType::Steny, Season::Leto, CementType::CemI);
        assert!((out.curing_days - 1.0).abs() < 1e-10);
        assert_eq!(out.props_minimum_days, None);
    }

    #[test]
    fn test_cement_factor_scales() {
        let t = CuringTable::builtin();
        let out = outcome(&t, ConstructionType::PilireMostu, Season::PodzimJaro, CementType::CemIii);
        assert!((out.base_days - 3.0).abs() < 1e-10);
        assert!((out.cement_factor - 1.8).abs() < 1e-10);
        assert!((out.curing_days - 5.4).abs() < 1e-10);
    }

    #[test]
    fn test_winter_exceeds_summer_for_every_type() {
        let t = CuringTable::builtin();
        for ct in ConstructionType::ALL {
            let summer = outcome(&t, ct, Season::Leto, CementType::CemI).curing_days;
            let transition = outcome(&t, ct, Season::PodzimJaro, CementType::CemI).curing_days;
            let winter = outcome(&t, ct, Season::Zima, CementType::CemI).curing_days;
            assert!(winter > summer, "{ct}: {winter} <= {summer}");
            assert!(transition >= summer && winter >= transition, "{ct}");
        }
    }

    #[test]
    fn test_props_only_for_horizontal() {
        let t = CuringTable::builtin();
        for ct in ConstructionType::ALL {
            let out = outcome(&t, ct, Season::Zima, CementType::CemI);
            assert_eq!(out.props_minimum_days.is_some(), ct.is_horizontal(), "{ct}");
            if let Some(props) = out.props_minimum_days {
                assert!(props > out.curing_days);
            }
        }
    }

    #[test]
    fn test_missing_row_falls_back_to_walls_with_advisory() {
        let mut t = CuringTable::builtin();
        t.curing.remove(&ConstructionType::Sloupy);
        let r = t
            .curing_days(ConstructionType::Sloupy, Season::Zima, CementType::CemI)
            .unwrap();
        assert!((r.value.curing_days - 4.0).abs() < 1e-10);
        assert_eq!(r.key, "steny");
        let a = r.advisory.unwrap();
        assert_eq!(a.kind, AdvisoryKind::UnknownLookupKey);
        assert!(a.message.contains("sloupy"));
    }

    #[test]
    fn test_missing_default_row_is_error() {
        let mut t = CuringTable::builtin();
        t.curing.remove(&ConstructionType::Sloupy);
        t.curing.remove(&ConstructionType::Steny);
        let err = t
            .curing_days(ConstructionType::Sloupy, Season::Leto, CementType::CemI)
            .unwrap_err();
        assert!(matches!(err, PlanError::ConfigurationMissing(_)));
    }

    #[test]
    fn test_table_without_default_key_deserializes() {
        let mut json = serde_json::to_value(CuringTable::builtin()).unwrap();
        json.as_object_mut().unwrap().remove("default_construction");
        let t: CuringTable = serde_json::from_value(json).unwrap();
        assert_eq!(t.default_construction, ConstructionType::Steny);
    }

    #[test]
    fn test_parse_keys() {
        assert_eq!("pilire-mostu".parse::<ConstructionType>(), Ok(ConstructionType::PilireMostu));
        assert_eq!("Podzim_Jaro".parse::<Season>(), Ok(Season::PodzimJaro));
        assert_eq!("CEM III".parse::<CementType>(), Ok(CementType::CemIii));
        assert!("tunel".parse::<ConstructionType>().is_err());
    }

    #[test]
    fn test_table_json_round_trip_keys() {
        let t = CuringTable::builtin();
        let json = serde_json::to_string(&t).unwrap();
        assert!(json.contains("\"mostovka\""));
        let back: CuringTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }
}
