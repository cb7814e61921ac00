//! Schedule summary: duration, labor, cost and utilization.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Total duration | Latest end (h), and in working days |
//! | Total labor | Sum of paid person-hours |
//! | Direct cost | Sum of labor, machine and rental cost |
//! | Markups | Overhead, profit and reserve as % of direct cost |
//! | Utilization | Busy unit-hours / (pool × total duration) per kind |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use std::collections::HashMap;

use crate::models::{Project, ResourceKind, Schedule, ScheduleSummary, Task};
use crate::units::{hours_to_days, round2};

/// Summarizes a placed schedule. `tasks` must be the scheduled tasks.
pub fn summarize(schedule: &Schedule, tasks: &[Task], project: &Project) -> ScheduleSummary {
    let makespan = schedule.makespan_hours();
    let total_labor_hours: f64 = tasks.iter().map(|t| t.labor_hours).sum();
    let direct_cost: f64 = tasks.iter().map(Task::total_cost).sum();

    let markup = |pct: f64| round2(direct_cost * pct / 100.0);
    let overhead_cost = markup(project.overhead_pct);
    let profit_cost = markup(project.profit_pct);
    let reserve_cost = markup(project.reserve_pct);

    let mut busy: HashMap<ResourceKind, f64> = HashMap::new();
    for task in tasks {
        let Some(entry) = schedule.entry_for_task(&task.id) else {
            continue;
        };
        for (kind, count) in task.resources_required.iter() {
            *busy.entry(kind).or_default() += count as f64 * entry.duration_hours();
        }
    }

    let utilization = ResourceKind::ALL
        .into_iter()
        .filter(|&k| project.capacity(k) > 0)
        .map(|k| {
            let available = project.capacity(k) as f64 * makespan;
            let used = busy.get(&k).copied().unwrap_or(0.0);
            let share = if available > 0.0 { used / available } else { 0.0 };
            (k, share)
        })
        .collect();

    ScheduleSummary {
        total_duration_hours: makespan,
        total_duration_days: round2(hours_to_days(makespan, project.shift_hours)),
        total_labor_hours,
        direct_cost: round2(direct_cost),
        overhead_cost,
        profit_cost,
        reserve_cost,
        total_cost: round2(direct_cost + overhead_cost + profit_cost + reserve_cost),
        utilization,
    }
}
