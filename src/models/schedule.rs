//! Schedule (solution) model.
//!
//! A schedule places every generated task on a working-hour timeline
//! starting at t=0, marks the tasks on the longest dependency path, and
//! carries an aggregate summary.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::ResourceKind;

/// A task placed on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub task_id: String,
    /// Start (working hours from t=0).
    pub start_hours: f64,
    /// End (working hours from t=0).
    pub end_hours: f64,
    /// Start (working days from t=0).
    pub start_day: f64,
    /// End (working days from t=0).
    pub end_day: f64,
    /// On the longest dependency path.
    pub is_critical: bool,
}

impl ScheduleEntry {
    /// Duration (end - start) in hours.
    #[inline]
    pub fn duration_hours(&self) -> f64 {
        self.end_hours - self.start_hours
    }
}

/// Aggregate figures of a schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    /// Latest end (working hours).
    pub total_duration_hours: f64,
    /// Latest end (working days).
    pub total_duration_days: f64,
    /// Sum of paid person-hours.
    pub total_labor_hours: f64,
    /// Sum of task costs before markups.
    pub direct_cost: f64,
    pub overhead_cost: f64,
    pub profit_cost: f64,
    pub reserve_cost: f64,
    /// Direct cost plus markups.
    pub total_cost: f64,
    /// Busy share of the makespan per resource kind (0..=1).
    pub utilization: HashMap<ResourceKind, f64>,
}

/// A complete schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub entries: Vec<ScheduleEntry>,
    /// Ids of critical tasks in start order.
    pub critical_path: Vec<String>,
    pub summary: ScheduleSummary,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entry(&mut self, entry: ScheduleEntry) {
        self.entries.push(entry);
    }

    /// Finds the entry for a task.
    pub fn entry_for_task(&self, task_id: &str) -> Option<&ScheduleEntry> {
        self.entries.iter().find(|e| e.task_id == task_id)
    }

    /// Latest end time (hours). 0 for an empty schedule.
    pub fn makespan_hours(&self) -> f64 {
        self.entries
            .iter()
            .map(|e| e.end_hours)
            .fold(0.0, f64::max)
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}
