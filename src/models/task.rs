//! Task model.
//!
//! A task is one atomic step of a capture's technological chain. Every
//! capture expands to exactly six tasks, one per [`TaskType`], linked by
//! single-predecessor edges in canonical order.
//!
//! # Time Representation
//! Durations are in working hours, with the day figure derived from the
//! project's shift length at generation time.

use serde::{Deserialize, Serialize};

use super::ResourceMap;
use crate::{PlanError, PlanResult};

/// Step of the technological chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Rebar,
    FormworkIn,
    Pour,
    WaitStrip,
    FormworkOut,
    MoveClean,
}

impl TaskType {
    /// Canonical chain order.
    pub const CHAIN: [TaskType; 6] = [
        TaskType::Rebar,
        TaskType::FormworkIn,
        TaskType::Pour,
        TaskType::WaitStrip,
        TaskType::FormworkOut,
        TaskType::MoveClean,
    ];

    /// Position within the chain (1..=6).
    pub fn sequence(&self) -> u32 {
        match self {
            TaskType::Rebar => 1,
            TaskType::FormworkIn => 2,
            TaskType::Pour => 3,
            TaskType::WaitStrip => 4,
            TaskType::FormworkOut => 5,
            TaskType::MoveClean => 6,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Rebar => "rebar",
            TaskType::FormworkIn => "formwork_in",
            TaskType::Pour => "pour",
            TaskType::WaitStrip => "wait_strip",
            TaskType::FormworkOut => "formwork_out",
            TaskType::MoveClean => "move_clean",
        }
    }
}

/// Cost components of a task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskCosts {
    pub labor: f64,
    pub machine: f64,
    pub rental: f64,
}

impl TaskCosts {
    #[inline]
    pub fn total(&self) -> f64 {
        self.labor + self.machine + self.rental
    }
}

/// One unit of work belonging to a capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: String,
    /// Owning capture.
    pub capture_id: String,
    pub task_type: TaskType,
    /// Position in the capture's chain (1..=6).
    pub sequence: u32,
    /// Elapsed working hours.
    pub duration_hours: f64,
    /// Elapsed working days.
    pub duration_days: f64,
    /// Paid person-hours.
    pub labor_hours: f64,
    pub costs: TaskCosts,
    pub crew_size: u32,
    pub resources_required: ResourceMap,
    /// Confidence in the estimate (0..=1).
    pub confidence: f64,
    /// How the numbers were derived.
    pub assumptions: Vec<String>,
    /// Tasks that must finish before this one starts.
    pub predecessors: Vec<String>,
}

impl Task {
    /// Creates a task with zero duration and cost.
    pub fn new(id: impl Into<String>, capture_id: impl Into<String>, task_type: TaskType) -> Self {
        Self {
            id: id.into(),
            capture_id: capture_id.into(),
            task_type,
            sequence: task_type.sequence(),
            duration_hours: 0.0,
            duration_days: 0.0,
            labor_hours: 0.0,
            costs: TaskCosts::default(),
            crew_size: 0,
            resources_required: ResourceMap::new(),
            confidence: 1.0,
            assumptions: Vec::new(),
            predecessors: Vec::new(),
        }
    }

    /// Sets elapsed duration in hours and days.
    pub fn with_duration(mut self, hours: f64, days: f64) -> Self {
        self.duration_hours = hours;
        self.duration_days = days;
        self
    }

    pub fn with_labor_hours(mut self, hours: f64) -> Self {
        self.labor_hours = hours;
        self
    }

    pub fn with_costs(mut self, costs: TaskCosts) -> Self {
        self.costs = costs;
        self
    }

    pub fn with_crew(mut self, crew_size: u32) -> Self {
        self.crew_size = crew_size;
        self
    }

    pub fn with_resources(mut self, resources: ResourceMap) -> Self {
        self.resources_required = resources;
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    pub fn with_assumption(mut self, note: impl Into<String>) -> Self {
        self.assumptions.push(note.into());
        self
    }

    pub fn with_predecessor(mut self, task_id: impl Into<String>) -> Self {
        self.predecessors.push(task_id.into());
        self
    }

    /// Total cost (labor + machine + rental).
    pub fn total_cost(&self) -> f64 {
        self.costs.total()
    }

    /// Converts to the persisted row form.
    pub fn to_record(&self) -> PlanResult<TaskRecord> {
        let encode = |e: serde_json::Error| PlanError::MalformedRecord(format!("task '{}': {e}", self.id));
        Ok(TaskRecord {
            id: self.id.clone(),
            capture_id: self.capture_id.clone(),
            task_type: self.task_type,
            sequence: self.sequence,
            duration_hours: self.duration_hours,
            duration_days: self.duration_days,
            labor_hours: self.labor_hours,
            cost_labor: self.costs.labor,
            cost_machine: self.costs.machine,
            cost_rental: self.costs.rental,
            cost_total: self.costs.total(),
            crew_size: self.crew_size,
            resources_required: serde_json::to_string(&self.resources_required).map_err(encode)?,
            confidence: self.confidence,
            assumptions: serde_json::to_string(&self.assumptions).map_err(encode)?,
            predecessors: serde_json::to_string(&self.predecessors).map_err(encode)?,
        })
    }
}

/// Persisted row form of a task.
///
/// `predecessors`, `resources_required` and `assumptions` are JSON
/// documents, the way the storage layer keeps them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: String,
    pub capture_id: String,
    pub task_type: TaskType,
    pub sequence: u32,
    pub duration_hours: f64,
    pub duration_days: f64,
    pub labor_hours: f64,
    pub cost_labor: f64,
    pub cost_machine: f64,
    pub cost_rental: f64,
    pub cost_total: f64,
    pub crew_size: u32,
    /// JSON object, e.g. `{"crew_rebar":1}`.
    pub resources_required: String,
    pub confidence: f64,
    /// JSON array of assumption notes.
    pub assumptions: String,
    /// JSON array of predecessor task ids.
    pub predecessors: String,
}

impl TaskRecord {
    /// Parses the JSON columns back into a [`Task`].
    pub fn into_task(self) -> PlanResult<Task> {
        let id = self.id;
        let decode = |e: serde_json::Error| PlanError::MalformedRecord(format!("task '{id}': {e}"));
        let resources_required = serde_json::from_str(&self.resources_required).map_err(decode)?;
        let predecessors = serde_json::from_str(&self.predecessors).map_err(decode)?;
        let assumptions = if self.assumptions.is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(&self.assumptions).map_err(decode)?
        };

        Ok(Task {
            id,
            capture_id: self.capture_id,
            task_type: self.task_type,
            sequence: self.sequence,
            duration_hours: self.duration_hours,
            duration_days: self.duration_days,
            labor_hours: self.labor_hours,
            costs: TaskCosts {
                labor: self.cost_labor,
                machine: self.cost_machine,
                rental: self.cost_rental,
            },
            crew_size: self.crew_size,
            resources_required,
            confidence: self.confidence,
            assumptions,
            predecessors,
        })
    }
}
