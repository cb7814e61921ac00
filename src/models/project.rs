//! Project and normset models.
//!
//! A project carries the resource pool and the money side of a run
//! (wages, rental and markup rates). A normset carries production norms.
//! Both are read-only for the duration of a planning call.

use serde::{Deserialize, Serialize};

use super::ResourceKind;

/// Project-level configuration for one scheduling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Unique project identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Working hours per day.
    pub shift_hours: f64,
    /// Working days per month (used by callers that report in months).
    pub days_per_month: f64,
    /// Number of rebar crews.
    pub crews_rebar: u32,
    /// Number of formwork crews.
    pub crews_formwork: u32,
    /// Number of concreting crews.
    pub crews_concreting: u32,
    /// Number of formwork kits.
    pub formwork_kits: u32,
    /// Number of concrete pumps.
    pub pumps: u32,
    /// Hourly wage, rebar trade.
    pub wage_rebar: f64,
    /// Hourly wage, formwork trade.
    pub wage_formwork: f64,
    /// Hourly wage, concreting trade.
    pub wage_concreting: f64,
    /// Pump rental per hour.
    pub pump_rate_per_hour: f64,
    /// Formwork kit rental per day.
    pub formwork_rental_per_day: f64,
    /// Overhead markup (%).
    pub overhead_pct: f64,
    /// Profit markup (%).
    pub profit_pct: f64,
    /// Reserve markup (%).
    pub reserve_pct: f64,
}

impl Project {
    /// Creates a project with one crew per trade, one kit, one pump and
    /// a 10-hour shift.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            shift_hours: 10.0,
            days_per_month: 22.0,
            crews_rebar: 1,
            crews_formwork: 1,
            crews_concreting: 1,
            formwork_kits: 1,
            pumps: 1,
            wage_rebar: 398.0,
            wage_formwork: 398.0,
            wage_concreting: 398.0,
            pump_rate_per_hour: 2500.0,
            formwork_rental_per_day: 1200.0,
            overhead_pct: 0.0,
            profit_pct: 0.0,
            reserve_pct: 0.0,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_shift_hours(mut self, hours: f64) -> Self {
        self.shift_hours = hours;
        self
    }

    /// Sets crew counts for rebar, formwork and concreting.
    pub fn with_crews(mut self, rebar: u32, formwork: u32, concreting: u32) -> Self {
        self.crews_rebar = rebar;
        self.crews_formwork = formwork;
        self.crews_concreting = concreting;
        self
    }

    pub fn with_formwork_kits(mut self, kits: u32) -> Self {
        self.formwork_kits = kits;
        self
    }

    pub fn with_pumps(mut self, pumps: u32) -> Self {
        self.pumps = pumps;
        self
    }

    /// Sets hourly wages for rebar, formwork and concreting.
    pub fn with_wages(mut self, rebar: f64, formwork: f64, concreting: f64) -> Self {
        self.wage_rebar = rebar;
        self.wage_formwork = formwork;
        self.wage_concreting = concreting;
        self
    }

    pub fn with_pump_rate(mut self, per_hour: f64) -> Self {
        self.pump_rate_per_hour = per_hour;
        self
    }

    pub fn with_formwork_rental(mut self, per_day: f64) -> Self {
        self.formwork_rental_per_day = per_day;
        self
    }

    /// Sets overhead, profit and reserve percentages.
    pub fn with_markups(mut self, overhead: f64, profit: f64, reserve: f64) -> Self {
        self.overhead_pct = overhead;
        self.profit_pct = profit;
        self.reserve_pct = reserve;
        self
    }

    /// Pool size for a resource kind.
    pub fn capacity(&self, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::CrewRebar => self.crews_rebar,
            ResourceKind::CrewFormwork => self.crews_formwork,
            ResourceKind::CrewConcreting => self.crews_concreting,
            ResourceKind::FormworkKit => self.formwork_kits,
            ResourceKind::Pump => self.pumps,
        }
    }
}

/// Named set of production norms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Normset {
    pub id: String,
    pub name: String,
    /// Whether this is the system default.
    pub is_default: bool,
    /// Rebar labor (h/t).
    pub rebar_hours_per_t: f64,
    /// Formwork assembly labor (h/m²).
    pub assembly_hours_per_m2: f64,
    /// Formwork disassembly labor (h/m²).
    pub disassembly_hours_per_m2: f64,
    /// Wait between pour and stripping (h).
    pub strip_wait_hours: f64,
    /// Move and clean the kit (h).
    pub move_clean_hours: f64,
    /// Pour team size.
    pub pour_team_size: u32,
    /// Pump setup before the pour (h).
    pub pour_setup_hours: f64,
    /// Washout after the pour (h).
    pub washout_hours: f64,
}

impl Normset {
    /// Creates a normset with typical values for wall formwork.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            is_default: false,
            rebar_hours_per_t: 20.0,
            assembly_hours_per_m2: 0.6,
            disassembly_hours_per_m2: 0.25,
            strip_wait_hours: 24.0,
            move_clean_hours: 4.0,
            pour_team_size: 4,
            pour_setup_hours: 1.0,
            washout_hours: 0.5,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Marks this normset as the system default.
    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    pub fn with_rebar_norm(mut self, hours_per_t: f64) -> Self {
        self.rebar_hours_per_t = hours_per_t;
        self
    }

    /// Sets assembly and disassembly norms (h/m²).
    pub fn with_formwork_norms(mut self, assembly: f64, disassembly: f64) -> Self {
        self.assembly_hours_per_m2 = assembly;
        self.disassembly_hours_per_m2 = disassembly;
        self
    }

    pub fn with_strip_wait(mut self, hours: f64) -> Self {
        self.strip_wait_hours = hours;
        self
    }

    pub fn with_move_clean(mut self, hours: f64) -> Self {
        self.move_clean_hours = hours;
        self
    }

    /// Sets pour team size, setup and washout hours.
    pub fn with_pour(mut self, team_size: u32, setup_hours: f64, washout_hours: f64) -> Self {
        self.pour_team_size = team_size;
        self.pour_setup_hours = setup_hours;
        self.washout_hours = washout_hours;
        self
    }
}

/// Picks the normset for a run: the one with `id` if given, else the default.
pub fn select_normset<'a>(normsets: &'a [Normset], id: Option<&str>) -> crate::PlanResult<&'a Normset> {
    match id {
        Some(id) => normsets
            .iter()
            .find(|n| n.id == id)
            .ok_or_else(|| crate::PlanError::UnknownReference(format!("normset '{id}'"))),
        None => normsets
            .iter()
            .find(|n| n.is_default)
            .ok_or_else(crate::PlanError::no_normset),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PlanError;

    #[test]
    fn test_project_builder_and_capacity() {
        let p = Project::new("P1")
            .with_name("Bridge SO-201")
            .with_crews(2, 3, 1)
            .with_formwork_kits(2)
            .with_pumps(1)
            .with_markups(10.0, 5.0, 3.0);

        assert_eq!(p.capacity(ResourceKind::CrewRebar), 2);
        assert_eq!(p.capacity(ResourceKind::CrewFormwork), 3);
        assert_eq!(p.capacity(ResourceKind::CrewConcreting), 1);
        assert_eq!(p.capacity(ResourceKind::FormworkKit), 2);
        assert_eq!(p.capacity(ResourceKind::Pump), 1);
        assert!((p.overhead_pct - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_select_default_normset() {
        let sets = vec![Normset::new("N1"), Normset::new("N2").as_default()];
        assert_eq!(select_normset(&sets, None).unwrap().id, "N2");
        assert_eq!(select_normset(&sets, Some("N1")).unwrap().id, "N1");
    }

    #[test]
    fn test_select_normset_missing() {
        let sets = vec![Normset::new("N1")];
        let err = select_normset(&sets, None).unwrap_err();
        assert_eq!(err, PlanError::ConfigurationMissing("no normset configured".into()));

        let err = select_normset(&sets, Some("X")).unwrap_err();
        assert!(matches!(err, PlanError::UnknownReference(_)));
    }
}
