//! Labor calculators for rebar, formwork and concreting work.
//!
//! Each calculator turns a quantity and a norm into paid person-hours,
//! elapsed hours for a crew of a given size, elapsed working days and a
//! labor cost. Elapsed time is `labor_hours / (crew × utilization)`.

use serde::{Deserialize, Serialize};

use crate::units::hours_to_days;
use crate::{PlanError, PlanResult};

/// Crew, shift and pay used to turn person-hours into time and money.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrewTerms {
    pub crew_size: u32,
    pub shift_hours: f64,
    /// Productive share of paid time (0..=1). Non-positive counts as 1.
    pub utilization: f64,
    pub wage_per_hour: f64,
}

impl CrewTerms {
    /// Person-hours the crew delivers per elapsed hour.
    fn throughput(&self) -> f64 {
        let utilization = if self.utilization > 0.0 { self.utilization } else { 1.0 };
        self.crew_size.max(1) as f64 * utilization
    }
}

/// Time and cost of one piece of crew work.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkEstimate {
    pub labor_hours: f64,
    pub duration_hours: f64,
    pub duration_days: f64,
    pub labor_cost: f64,
}

impl WorkEstimate {
    /// Estimate for a given amount of person-hours.
    pub fn from_labor_hours(labor_hours: f64, terms: &CrewTerms) -> Self {
        let labor_hours = labor_hours.max(0.0);
        let duration_hours = labor_hours / terms.throughput();
        Self {
            labor_hours,
            duration_hours,
            duration_days: hours_to_days(duration_hours, terms.shift_hours),
            labor_cost: labor_hours * terms.wage_per_hour,
        }
    }

    /// Estimate for a fixed elapsed time worked by the whole crew.
    pub fn from_duration_hours(duration_hours: f64, terms: &CrewTerms) -> Self {
        let duration_hours = duration_hours.max(0.0);
        let labor_hours = duration_hours * terms.crew_size as f64;
        Self {
            labor_hours,
            duration_hours,
            duration_days: hours_to_days(duration_hours, terms.shift_hours),
            labor_cost: labor_hours * terms.wage_per_hour,
        }
    }
}

/// Tying rebar: `mass_t × hours_per_t` person-hours.
pub fn rebar_work(mass_t: f64, hours_per_t: f64, terms: &CrewTerms) -> WorkEstimate {
    WorkEstimate::from_labor_hours(mass_t * hours_per_t, terms)
}

/// Inputs for one formwork turn on a capture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormworkWork {
    pub area_m2: f64,
    pub assembly_hours_per_m2: f64,
    pub disassembly_hours_per_m2: f64,
    pub strip_wait_hours: f64,
    pub move_clean_hours: f64,
}

/// Assembly and disassembly estimates plus how long the kit is tied up.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormworkEstimate {
    pub assembly: WorkEstimate,
    pub disassembly: WorkEstimate,
    pub strip_wait_hours: f64,
    pub move_clean_hours: f64,
    /// Elapsed hours from start of assembly to the kit being ready again,
    /// excluding the pour itself.
    pub kit_occupancy_hours: f64,
}

/// Assembly and disassembly of the formwork on one capture.
pub fn formwork_work(work: &FormworkWork, terms: &CrewTerms) -> FormworkEstimate {
    let assembly = WorkEstimate::from_labor_hours(work.area_m2 * work.assembly_hours_per_m2, terms);
    let disassembly =
        WorkEstimate::from_labor_hours(work.area_m2 * work.disassembly_hours_per_m2, terms);
    let strip_wait_hours = work.strip_wait_hours.max(0.0);
    let move_clean_hours = work.move_clean_hours.max(0.0);
    let kit_occupancy_hours =
        assembly.duration_hours + strip_wait_hours + disassembly.duration_hours + move_clean_hours;

    FormworkEstimate {
        assembly,
        disassembly,
        strip_wait_hours,
        move_clean_hours,
        kit_occupancy_hours,
    }
}

/// Inputs for one continuous pour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PourWork {
    pub volume_m3: f64,
    /// Effective pump throughput (m³/h).
    pub pump_throughput_m3_h: f64,
    pub setup_hours: f64,
    pub washout_hours: f64,
    pub pump_rate_per_hour: f64,
    /// Longest allowed continuous pour (h).
    pub max_continuous_pour_hours: f64,
}

/// Time and cost of a pour.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PourEstimate {
    /// Continuous pumping time (h).
    pub pumping_hours: f64,
    pub work: WorkEstimate,
    pub pump_cost: f64,
    pub max_continuous_pour_hours: f64,
    /// The whole pour (setup, pumping, washout) runs past the continuous-pour
    /// window. The duration is not cut.
    pub exceeds_window: bool,
}

/// Concreting a capture: setup, pumping and washout with the whole team.
pub fn pour_work(work: &PourWork, terms: &CrewTerms) -> PlanResult<PourEstimate> {
    if work.pump_throughput_m3_h <= 0.0 {
        return Err(PlanError::InvalidQuantity(format!(
            "pump throughput must be positive, got {}",
            work.pump_throughput_m3_h
        )));
    }

    let pumping_hours = work.volume_m3.max(0.0) / work.pump_throughput_m3_h;
    let duration_hours = work.setup_hours.max(0.0) + pumping_hours + work.washout_hours.max(0.0);
    let estimate = WorkEstimate::from_duration_hours(duration_hours, terms);

    Ok(PourEstimate {
        pumping_hours,
        pump_cost: duration_hours * work.pump_rate_per_hour,
        work: estimate,
        max_continuous_pour_hours: work.max_continuous_pour_hours,
        exceeds_window: duration_hours > work.max_continuous_pour_hours,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(crew: u32) -> CrewTerms {
        CrewTerms {
            crew_size: crew,
            shift_hours: 10.0,
            utilization: 0.8,
            wage_per_hour: 400.0,
        }
    }

    #[test]
    fn test_rebar_work() {
        // 2 t × 20 h/t = 40 person-h; 4 × 0.8 = 3.2 per hour → 12.5 h
        let est = rebar_work(2.0, 20.0, &terms(4));
        assert!((est.labor_hours - 40.0).abs() < 1e-10);
        assert!((est.duration_hours - 12.5).abs() < 1e-10);
        assert!((est.duration_days - 1.25).abs() < 1e-10);
        assert!((est.labor_cost - 16_000.0).abs() < 1e-10);
    }

    #[test]
    fn test_zero_crew_counts_as_one() {
        let est = WorkEstimate::from_labor_hours(8.0, &CrewTerms { utilization: 0.0, ..terms(0) });
        assert!((est.duration_hours - 8.0).abs() < 1e-10);
    }

    #[test]
    fn test_formwork_work() {
        let work = FormworkWork {
            area_m2: 50.0,
            assembly_hours_per_m2: 0.64,
            disassembly_hours_per_m2: 0.32,
            strip_wait_hours: 24.0,
            move_clean_hours: 4.0,
        };
        let est = formwork_work(&work, &terms(4));
        assert!((est.assembly.labor_hours - 32.0).abs() < 1e-10);
        assert!((est.assembly.duration_hours - 10.0).abs() < 1e-10);
        assert!((est.disassembly.duration_hours - 5.0).abs() < 1e-10);
        assert!((est.kit_occupancy_hours - 43.0).abs() < 1e-10);
    }

    #[test]
    fn test_pour_within_window() {
        let work = PourWork {
            volume_m3: 90.0,
            pump_throughput_m3_h: 15.0,
            setup_hours: 1.0,
            washout_hours: 0.5,
            pump_rate_per_hour: 2000.0,
            max_continuous_pour_hours: 12.0,
        };
        let est = pour_work(&work, &terms(5)).unwrap();
        assert!((est.pumping_hours - 6.0).abs() < 1e-10);
        assert!((est.work.duration_hours - 7.5).abs() < 1e-10);
        assert!((est.work.labor_hours - 37.5).abs() < 1e-10);
        assert!((est.pump_cost - 15_000.0).abs() < 1e-10);
        assert!(!est.exceeds_window);
    }

    #[test]
    fn test_pour_over_window_is_flagged_not_cut() {
        let work = PourWork {
            volume_m3: 300.0,
            pump_throughput_m3_h: 15.0,
            setup_hours: 1.0,
            washout_hours: 0.5,
            pump_rate_per_hour: 2000.0,
            max_continuous_pour_hours: 12.0,
        };
        let est = pour_work(&work, &terms(5)).unwrap();
        assert!(est.exceeds_window);
        assert!((est.pumping_hours - 20.0).abs() < 1e-10);
        assert!((est.work.duration_hours - 21.5).abs() < 1e-10);
    }

    #[test]
    fn test_pour_setup_and_washout_count_toward_window() {
        let work = PourWork {
            volume_m3: 170.0,
            pump_throughput_m3_h: 15.0,
            setup_hours: 1.0,
            washout_hours: 0.5,
            pump_rate_per_hour: 2000.0,
            max_continuous_pour_hours: 12.0,
        };
        let est = pour_work(&work, &terms(5)).unwrap();
        // pumping 11.33 h fits, the whole pour (12.83 h) does not
        assert!(est.pumping_hours < 12.0);
        assert!(est.work.duration_hours > 12.0);
        assert!(est.exceeds_window);
    }

    #[test]
    fn test_pour_requires_throughput() {
        let work = PourWork {
            volume_m3: 10.0,
            pump_throughput_m3_h: 0.0,
            setup_hours: 0.0,
            washout_hours: 0.0,
            pump_rate_per_hour: 0.0,
            max_continuous_pour_hours: 12.0,
        };
        assert!(matches!(
            pour_work(&work, &terms(4)),
            Err(PlanError::InvalidQuantity(_))
        ));
    }
}
