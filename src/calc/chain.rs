//! Task chain builder.
//!
//! Expands one capture into its six technological steps:
//!
//! ```text
//! rebar → formwork_in → pour → wait_strip → formwork_out → move_clean
//! ```
//!
//! Each step gets a duration, a cost split, a crew size and the resource
//! kinds it occupies. Steps are linked by single-predecessor edges.

use crate::config::EngineDefaults;
use crate::error::{Advisory, AdvisoryKind};
use crate::models::{
    Capture, Element, Normset, Project, ResourceKind, ResourceMap, Task, TaskCosts, TaskType,
};
use crate::units::{hours_to_days, round2};
use crate::PlanResult;

use super::labor::{
    formwork_work, pour_work, rebar_work, CrewTerms, FormworkWork, PourWork, WorkEstimate,
};

/// The six tasks of one capture plus findings made while costing them.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskChain {
    pub capture_id: String,
    /// Tasks in chain order.
    pub tasks: Vec<Task>,
    pub advisories: Vec<Advisory>,
}

/// Builds task chains from captures.
#[derive(Debug, Clone, Default)]
pub struct TaskChainBuilder {
    defaults: EngineDefaults,
}

impl TaskChainBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(mut self, defaults: EngineDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Builds the chain with fresh random task ids.
    pub fn build(
        &self,
        capture: &Capture,
        element: &Element,
        project: &Project,
        normset: &Normset,
    ) -> PlanResult<TaskChain> {
        self.build_with_ids(capture, element, project, normset, |_| {
            uuid::Uuid::new_v4().to_string()
        })
    }

    /// Builds the chain, taking task ids from `next_id`.
    pub fn build_with_ids(
        &self,
        capture: &Capture,
        element: &Element,
        project: &Project,
        normset: &Normset,
        mut next_id: impl FnMut(TaskType) -> String,
    ) -> PlanResult<TaskChain> {
        let d = &self.defaults;
        let shift = project.shift_hours;
        let mut advisories = Vec::new();

        let rebar_terms = CrewTerms {
            crew_size: d.rebar_crew_size,
            shift_hours: shift,
            utilization: d.utilization_factor,
            wage_per_hour: project.wage_rebar,
        };
        let formwork_terms = CrewTerms {
            crew_size: d.formwork_crew_size,
            shift_hours: shift,
            utilization: d.utilization_factor,
            wage_per_hour: project.wage_formwork,
        };
        let pour_terms = CrewTerms {
            crew_size: normset.pour_team_size,
            shift_hours: shift,
            utilization: 1.0,
            wage_per_hour: project.wage_concreting,
        };

        // 1. Rebar
        let rebar = rebar_work(capture.mass_t, normset.rebar_hours_per_t, &rebar_terms);
        let rebar_task = Task::new(next_id(TaskType::Rebar), &capture.id, TaskType::Rebar)
            .with_duration(round2(rebar.duration_hours), round2(rebar.duration_days))
            .with_labor_hours(rebar.labor_hours)
            .with_costs(TaskCosts {
                labor: round2(rebar.labor_cost),
                ..TaskCosts::default()
            })
            .with_crew(d.rebar_crew_size)
            .with_resources(ResourceMap::new().with(ResourceKind::CrewRebar, 1))
            .with_confidence(if capture.mass_t > 0.0 { 0.8 } else { 0.5 })
            .with_assumption(format!(
                "{:.3} t × {} h/t, crew {}, utilization {}",
                capture.mass_t, normset.rebar_hours_per_t, d.rebar_crew_size, d.utilization_factor
            ));

        // 2. Formwork in / 5. formwork out share one estimate
        let formwork = formwork_work(
            &FormworkWork {
                area_m2: capture.area_m2,
                assembly_hours_per_m2: normset.assembly_hours_per_m2,
                disassembly_hours_per_m2: normset.disassembly_hours_per_m2,
                strip_wait_hours: normset.strip_wait_hours,
                move_clean_hours: normset.move_clean_hours,
            },
            &formwork_terms,
        );
        let kit_and_crew = ResourceMap::new()
            .with(ResourceKind::CrewFormwork, 1)
            .with(ResourceKind::FormworkKit, 1);

        let formwork_in = Task::new(next_id(TaskType::FormworkIn), &capture.id, TaskType::FormworkIn)
            .with_duration(
                round2(formwork.assembly.duration_hours),
                round2(formwork.assembly.duration_days),
            )
            .with_labor_hours(formwork.assembly.labor_hours)
            .with_costs(TaskCosts {
                labor: round2(formwork.assembly.labor_cost),
                ..TaskCosts::default()
            })
            .with_crew(d.formwork_crew_size)
            .with_resources(kit_and_crew.clone())
            .with_confidence(0.8)
            .with_assumption(format!(
                "{:.2} m² × {} h/m² assembly, crew {}",
                capture.area_m2, normset.assembly_hours_per_m2, d.formwork_crew_size
            ))
            .with_assumption(format!(
                "kit occupied {:.1} h per turn excluding pour",
                formwork.kit_occupancy_hours
            ))
            .with_predecessor(&rebar_task.id);

        // 3. Pour
        let max_pour = element
            .max_continuous_pour_hours
            .unwrap_or(d.max_continuous_pour_hours);
        let pour = pour_work(
            &PourWork {
                volume_m3: capture.volume_m3,
                pump_throughput_m3_h: d.pump_throughput_m3_h,
                setup_hours: normset.pour_setup_hours,
                washout_hours: normset.washout_hours,
                pump_rate_per_hour: project.pump_rate_per_hour,
                max_continuous_pour_hours: max_pour,
            },
            &pour_terms,
        )?;
        let mut pour_task = Task::new(next_id(TaskType::Pour), &capture.id, TaskType::Pour)
            .with_duration(
                round2(pour.work.duration_hours),
                round2(pour.work.duration_days),
            )
            .with_labor_hours(pour.work.labor_hours)
            .with_costs(TaskCosts {
                labor: round2(pour.work.labor_cost),
                machine: round2(pour.pump_cost),
                rental: 0.0,
            })
            .with_crew(normset.pour_team_size)
            .with_resources(
                ResourceMap::new()
                    .with(ResourceKind::CrewConcreting, 1)
                    .with(ResourceKind::Pump, 1)
                    .with(ResourceKind::FormworkKit, 1),
            )
            .with_confidence(0.85)
            .with_assumption(format!(
                "{:.2} m³ at {} m³/h, setup {} h, washout {} h",
                capture.volume_m3,
                d.pump_throughput_m3_h,
                normset.pour_setup_hours,
                normset.washout_hours
            ))
            .with_predecessor(&formwork_in.id);

        if pour.exceeds_window {
            let message = format!(
                "capture '{}': pour {:.1} h (pumping {:.1} h) exceeds the {:.1} h window of element '{}'",
                capture.id, pour.work.duration_hours, pour.pumping_hours, max_pour, element.id
            );
            pour_task = pour_task
                .with_confidence(0.5)
                .with_assumption(message.clone());
            advisories.push(Advisory::warn(AdvisoryKind::ContinuousPourExceeded, message));
        }

        // 4. Wait for stripping: the kit sits idle but is paid for
        let wait_days = hours_to_days(formwork.strip_wait_hours, shift);
        let wait_strip = Task::new(next_id(TaskType::WaitStrip), &capture.id, TaskType::WaitStrip)
            .with_duration(round2(formwork.strip_wait_hours), round2(wait_days))
            .with_costs(TaskCosts {
                rental: round2(wait_days * project.formwork_rental_per_day),
                ..TaskCosts::default()
            })
            .with_resources(ResourceMap::new().with(ResourceKind::FormworkKit, 1))
            .with_confidence(0.9)
            .with_assumption(format!("strip wait {} h from normset", normset.strip_wait_hours))
            .with_predecessor(&pour_task.id);

        let formwork_out =
            Task::new(next_id(TaskType::FormworkOut), &capture.id, TaskType::FormworkOut)
                .with_duration(
                    round2(formwork.disassembly.duration_hours),
                    round2(formwork.disassembly.duration_days),
                )
                .with_labor_hours(formwork.disassembly.labor_hours)
                .with_costs(TaskCosts {
                    labor: round2(formwork.disassembly.labor_cost),
                    ..TaskCosts::default()
                })
                .with_crew(d.formwork_crew_size)
                .with_resources(kit_and_crew.clone())
                .with_confidence(0.8)
                .with_assumption(format!(
                    "{:.2} m² × {} h/m² disassembly, crew {}",
                    capture.area_m2, normset.disassembly_hours_per_m2, d.formwork_crew_size
                ))
                .with_predecessor(&wait_strip.id);

        // 6. Move and clean
        let move_terms = CrewTerms {
            crew_size: d.move_clean_crew_size,
            utilization: 1.0,
            ..formwork_terms
        };
        let moving = WorkEstimate::from_duration_hours(formwork.move_clean_hours, &move_terms);
        let move_clean = Task::new(next_id(TaskType::MoveClean), &capture.id, TaskType::MoveClean)
            .with_duration(round2(moving.duration_hours), round2(moving.duration_days))
            .with_labor_hours(moving.labor_hours)
            .with_costs(TaskCosts {
                labor: round2(moving.labor_cost),
                ..TaskCosts::default()
            })
            .with_crew(d.move_clean_crew_size)
            .with_resources(kit_and_crew)
            .with_confidence(0.9)
            .with_assumption(format!(
                "move/clean {} h from normset, crew {}",
                normset.move_clean_hours, d.move_clean_crew_size
            ))
            .with_predecessor(&formwork_out.id);

        tracing::debug!(
            capture = %capture.id,
            rebar_h = rebar.duration_hours,
            assembly_h = formwork.assembly.duration_hours,
            pour_h = pour.work.duration_hours,
            "built task chain"
        );

        Ok(TaskChain {
            capture_id: capture.id.clone(),
            tasks: vec![
                rebar_task,
                formwork_in,
                pour_task,
                wait_strip,
                formwork_out,
                move_clean,
            ],
            advisories,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ElementType;

    fn fixtures() -> (Capture, Element, Project, Normset) {
        let element = Element::new("E1", "P1", ElementType::Wall).with_quantities(60.0, 200.0, 4.0);
        let capture = Capture::new("C1", "E1", 1).with_quantities(30.0, 100.0, 2.0);
        let project = Project::new("P1")
            .with_shift_hours(10.0)
            .with_wages(400.0, 380.0, 360.0)
            .with_pump_rate(2000.0)
            .with_formwork_rental(1000.0);
        let normset = Normset::new("N1")
            .with_rebar_norm(20.0)
            .with_formwork_norms(0.64, 0.32)
            .with_strip_wait(20.0)
            .with_move_clean(4.0)
            .with_pour(5, 1.0, 0.5);
        (capture, element, project, normset)
    }

    fn sequential_ids() -> impl FnMut(TaskType) -> String {
        let mut n = 0;
        move |t| {
            n += 1;
            format!("T{n}-{}", t.as_str())
        }
    }

    #[test]
    fn test_six_tasks_in_canonical_chain() {
        let (c, e, p, n) = fixtures();
        let chain = TaskChainBuilder::new()
            .build_with_ids(&c, &e, &p, &n, sequential_ids())
            .unwrap();

        assert_eq!(chain.tasks.len(), 6);
        let types: Vec<TaskType> = chain.tasks.iter().map(|t| t.task_type).collect();
        assert_eq!(types, TaskType::CHAIN.to_vec());

        assert!(chain.tasks[0].predecessors.is_empty());
        for w in chain.tasks.windows(2) {
            assert_eq!(w[1].predecessors, vec![w[0].id.clone()]);
            assert_eq!(w[1].sequence, w[0].sequence + 1);
        }
        assert!(chain.tasks.iter().all(|t| t.capture_id == "C1"));
    }

    #[test]
    fn test_task_figures() {
        let (c, e, p, n) = fixtures();
        let chain = TaskChainBuilder::new()
            .build_with_ids(&c, &e, &p, &n, sequential_ids())
            .unwrap();
        let t = &chain.tasks;

        // rebar: 2 t × 20 = 40 person-h over 4 × 0.8 → 12.5 h
        assert!((t[0].duration_hours - 12.5).abs() < 1e-9);
        assert!((t[0].costs.labor - 16_000.0).abs() < 1e-9);
        assert_eq!(t[0].crew_size, 4);
        assert_eq!(t[0].resources_required.get(ResourceKind::CrewRebar), 1);

        // formwork in: 100 × 0.64 = 64 person-h → 20 h; cost 64 × 380
        assert!((t[1].duration_hours - 20.0).abs() < 1e-9);
        assert!((t[1].costs.labor - 24_320.0).abs() < 1e-9);
        assert_eq!(t[1].resources_required.get(ResourceKind::FormworkKit), 1);

        // pour: 30 / 15 = 2 h + 1.5 h
        assert!((t[2].duration_hours - 3.5).abs() < 1e-9);
        assert!((t[2].costs.machine - 7_000.0).abs() < 1e-9);
        assert_eq!(t[2].resources_required.get(ResourceKind::Pump), 1);

        // wait strip: 20 h = 2 days × 1000
        assert!((t[3].duration_hours - 20.0).abs() < 1e-9);
        assert!((t[3].duration_days - 2.0).abs() < 1e-9);
        assert_eq!(t[3].costs.labor, 0.0);
        assert!((t[3].costs.rental - 2_000.0).abs() < 1e-9);

        // formwork out: 100 × 0.32 = 32 person-h → 10 h
        assert!((t[4].duration_hours - 10.0).abs() < 1e-9);

        // move/clean: fixed 4 h, crew 2
        assert!((t[5].duration_hours - 4.0).abs() < 1e-9);
        assert_eq!(t[5].crew_size, 2);
        assert!((t[5].labor_hours - 8.0).abs() < 1e-9);

        assert!(chain.advisories.is_empty());
    }

    #[test]
    fn test_pour_window_flagged() {
        let (c, e, p, n) = fixtures();
        let c = c.with_quantities(300.0, 100.0, 2.0);
        let chain = TaskChainBuilder::new()
            .build_with_ids(&c, &e, &p, &n, sequential_ids())
            .unwrap();

        // 1 + 300 / 15 + 0.5 = 21.5 h > 12 h default window; duration kept
        assert!((chain.tasks[2].duration_hours - 21.5).abs() < 1e-9);
        assert_eq!(chain.advisories.len(), 1);
        assert_eq!(chain.advisories[0].kind, AdvisoryKind::ContinuousPourExceeded);
        assert!(chain.tasks[2].confidence < 0.85);
    }

    #[test]
    fn test_pour_window_includes_setup_and_washout() {
        let (c, e, p, n) = fixtures();
        // pumping 11.33 h is inside the window, the 12.83 h pour is not
        let c = c.with_quantities(170.0, 100.0, 2.0);
        let chain = TaskChainBuilder::new()
            .build_with_ids(&c, &e, &p, &n, sequential_ids())
            .unwrap();
        assert!((chain.tasks[2].duration_hours - 12.83).abs() < 1e-9);
        assert_eq!(chain.advisories.len(), 1);
        assert_eq!(chain.advisories[0].kind, AdvisoryKind::ContinuousPourExceeded);
    }

    #[test]
    fn test_element_window_overrides_default() {
        let (c, e, p, n) = fixtures();
        let e = e.with_max_continuous_pour(1.5);
        let chain = TaskChainBuilder::new()
            .build_with_ids(&c, &e, &p, &n, sequential_ids())
            .unwrap();
        assert_eq!(chain.advisories.len(), 1);
    }

    #[test]
    fn test_random_ids_are_unique() {
        let (c, e, p, n) = fixtures();
        let a = TaskChainBuilder::new().build(&c, &e, &p, &n).unwrap();
        let b = TaskChainBuilder::new().build(&c, &e, &p, &n).unwrap();
        for t in &a.tasks {
            assert!(b.tasks.iter().all(|u| u.id != t.id));
        }
    }
}
