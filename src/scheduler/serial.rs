//! Serial resource-constrained scheduler.
//!
//! # Algorithm
//!
//! 1. Validate the task graph and check every demand against the pool.
//! 2. Walk tasks in topological order, lowest input index first among
//!    the ready ones.
//! 3. Start each task at the earliest instant, not before its
//!    predecessors end, at which every resource kind it needs stays within
//!    the pool for the whole duration.
//! 4. Backward pass over precedence edges plus binding resource edges,
//!    in topological order of the combined graph: tasks with zero float
//!    form the critical chain. Both edge sets depend on the placed times
//!    only, so input order does not change the flags.
//!
//! # Complexity
//! O(n² · b) worst case, where b is the number of bookings per resource kind.
//!
//! # Reference
//! Kolisch, R. (1996), "Serial and parallel resource-constrained project
//! scheduling methods revisited", EJOR 90(2).

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap, HashMap};

use super::summary::summarize;
use crate::models::{Project, ResourceKind, Schedule, ScheduleEntry, Task};
use crate::units::{hours_to_days, round2};
use crate::validation::{to_plan_error, validate_tasks};
use crate::{PlanError, PlanResult};

const EPS: f64 = 1e-9;

#[derive(Debug, Clone, Copy)]
struct Booking {
    start: f64,
    end: f64,
    count: u32,
}

/// Bookings of one resource kind.
#[derive(Debug, Default)]
struct Timeline {
    bookings: Vec<Booking>,
}

impl Timeline {
    fn usage_at(&self, t: f64) -> u32 {
        self.bookings
            .iter()
            .filter(|b| b.start <= t + EPS && t < b.end - EPS)
            .map(|b| b.count)
            .sum()
    }

    /// Highest usage anywhere in `[start, end)`.
    fn peak(&self, start: f64, end: f64) -> u32 {
        self.bookings
            .iter()
            .filter(|b| b.start > start + EPS && b.start < end - EPS)
            .map(|b| self.usage_at(b.start))
            .fold(self.usage_at(start), u32::max)
    }

    fn book(&mut self, start: f64, end: f64, count: u32) {
        if end - start > EPS {
            self.bookings.push(Booking { start, end, count });
        }
    }
}

/// Serial schedule-generation scheme over a project's resource pool.
///
/// # Example
///
/// ```
/// use takt_plan::models::{Project, ResourceKind, ResourceMap, Task, TaskType};
/// use takt_plan::scheduler::SerialScheduler;
///
/// let kit = ResourceMap::new().with(ResourceKind::FormworkKit, 1);
/// let tasks = vec![
///     Task::new("a", "C1", TaskType::FormworkIn)
///         .with_duration(8.0, 0.8)
///         .with_resources(kit.clone()),
///     Task::new("b", "C2", TaskType::FormworkIn)
///         .with_duration(8.0, 0.8)
///         .with_resources(kit),
/// ];
///
/// let schedule = SerialScheduler::new().schedule(&tasks, &Project::new("P1")).unwrap();
/// assert_eq!(schedule.entry_count(), 2);
/// assert_eq!(schedule.makespan_hours(), 16.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialScheduler;

impl SerialScheduler {
    pub fn new() -> Self {
        Self
    }

    /// Places every task and computes the critical chain and summary.
    ///
    /// # Errors
    /// - `EmptyInput` for an empty task list
    /// - `CyclicDependency` / `UnknownReference` / `InvalidStructure` for a
    ///   malformed task graph
    /// - `InsufficientResource` when a task needs more units than the pool owns
    pub fn schedule(&self, tasks: &[Task], project: &Project) -> PlanResult<Schedule> {
        if tasks.is_empty() {
            return Err(PlanError::no_tasks());
        }
        validate_tasks(tasks).map_err(|errors| to_plan_error(&errors))?;
        check_capacity(tasks, project)?;

        let index: HashMap<&str, usize> =
            tasks.iter().enumerate().map(|(i, t)| (t.id.as_str(), i)).collect();
        let preds: Vec<Vec<usize>> = tasks
            .iter()
            .map(|t| t.predecessors.iter().filter_map(|p| index.get(p.as_str()).copied()).collect())
            .collect();
        let order = topological_order(&successors(&preds));

        let mut timelines: BTreeMap<ResourceKind, Timeline> = BTreeMap::new();
        let mut ready = vec![0.0_f64; tasks.len()];
        let mut start = vec![0.0_f64; tasks.len()];
        let mut end = vec![0.0_f64; tasks.len()];

        for &i in &order {
            let task = &tasks[i];
            let duration = task.duration_hours.max(0.0);
            ready[i] = preds[i].iter().map(|&p| end[p]).fold(0.0, f64::max);
            start[i] = earliest_start(task, ready[i], duration, project, &timelines);
            end[i] = start[i] + duration;

            for (kind, count) in task.resources_required.iter() {
                timelines.entry(kind).or_default().book(start[i], end[i], count);
            }
            tracing::trace!(task = %task.id, start = start[i], end = end[i], "placed task");
        }

        let critical = critical_flags(tasks, &preds, project, &ready, &start, &end);

        let mut schedule = Schedule::new();
        for (i, task) in tasks.iter().enumerate() {
            schedule.add_entry(ScheduleEntry {
                task_id: task.id.clone(),
                start_hours: start[i],
                end_hours: end[i],
                start_day: round2(hours_to_days(start[i], project.shift_hours)),
                end_day: round2(hours_to_days(end[i], project.shift_hours)),
                is_critical: critical[i],
            });
        }

        let mut chain: Vec<usize> = (0..tasks.len()).filter(|&i| critical[i]).collect();
        chain.sort_by(|&a, &b| start[a].total_cmp(&start[b]).then(a.cmp(&b)));
        schedule.critical_path = chain.into_iter().map(|i| tasks[i].id.clone()).collect();

        schedule.summary = summarize(&schedule, tasks, project);
        tracing::debug!(
            tasks = tasks.len(),
            makespan_hours = schedule.summary.total_duration_hours,
            critical = schedule.critical_path.len(),
            "scheduled tasks"
        );
        Ok(schedule)
    }
}

fn check_capacity(tasks: &[Task], project: &Project) -> PlanResult<()> {
    for task in tasks {
        for (kind, required) in task.resources_required.iter() {
            let available = project.capacity(kind);
            if required > available {
                return Err(PlanError::InsufficientResource {
                    task_id: task.id.clone(),
                    kind: kind.to_string(),
                    required,
                    available,
                });
            }
        }
    }
    Ok(())
}

fn successors(preds: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let mut succs: Vec<Vec<usize>> = vec![Vec::new(); preds.len()];
    for (i, ps) in preds.iter().enumerate() {
        for &p in ps {
            succs[p].push(i);
        }
    }
    succs
}

/// Kahn's algorithm; among ready tasks the lowest input index goes first.
fn topological_order(succs: &[Vec<usize>]) -> Vec<usize> {
    let n = succs.len();
    let mut in_degree = vec![0_usize; n];
    for ss in succs {
        for &s in ss {
            in_degree[s] += 1;
        }
    }

    let mut heap: BinaryHeap<Reverse<usize>> =
        (0..n).filter(|&i| in_degree[i] == 0).map(Reverse).collect();
    let mut order = Vec::with_capacity(n);
    while let Some(Reverse(i)) = heap.pop() {
        order.push(i);
        for &s in &succs[i] {
            in_degree[s] -= 1;
            if in_degree[s] == 0 {
                heap.push(Reverse(s));
            }
        }
    }
    order
}

fn earliest_start(
    task: &Task,
    ready: f64,
    duration: f64,
    project: &Project,
    timelines: &BTreeMap<ResourceKind, Timeline>,
) -> f64 {
    if duration <= EPS || task.resources_required.is_empty() {
        return ready;
    }

    let demands: Vec<(&Timeline, u32, u32)> = task
        .resources_required
        .iter()
        .filter_map(|(kind, count)| timelines.get(&kind).map(|t| (t, count, project.capacity(kind))))
        .collect();

    // Usage only drops at booking ends, so those are the only candidates.
    let mut candidates: Vec<f64> = demands
        .iter()
        .flat_map(|(t, _, _)| t.bookings.iter().map(|b| b.end))
        .filter(|&e| e > ready + EPS)
        .collect();
    candidates.push(ready);
    candidates.sort_by(f64::total_cmp);
    candidates.dedup_by(|a, b| (*a - *b).abs() < EPS);

    let fits = |at: f64| {
        demands
            .iter()
            .all(|(t, count, cap)| t.peak(at, at + duration) + count <= *cap)
    };
    candidates
        .iter()
        .copied()
        .find(|&at| fits(at))
        .unwrap_or_else(|| candidates.last().copied().unwrap_or(ready))
}

/// Zero-float tasks of the placed schedule.
///
/// A task delayed past its predecessors is tied to the tasks releasing a
/// resource kind at its start, for every kind that was at capacity just
/// before that start. Such an edge always runs from an earlier start to a
/// later one, so the combined graph stays acyclic.
fn critical_flags(
    tasks: &[Task],
    preds: &[Vec<usize>],
    project: &Project,
    ready: &[f64],
    start: &[f64],
    end: &[f64],
) -> Vec<bool> {
    let n = tasks.len();
    let mut succs = successors(preds);
    for i in 0..n {
        if start[i] <= ready[i] + EPS {
            continue;
        }
        let before = start[i] - EPS;
        let holders: Vec<usize> = (0..n)
            .filter(|&k| k != i && start[k] < before && end[k] > before)
            .collect();
        for (kind, count) in tasks[i].resources_required.iter() {
            let held: u32 = holders
                .iter()
                .map(|&k| tasks[k].resources_required.get(kind))
                .sum();
            if held + count <= project.capacity(kind) {
                continue;
            }
            for &k in &holders {
                if (end[k] - start[i]).abs() < EPS && tasks[k].resources_required.get(kind) > 0 {
                    succs[k].push(i);
                }
            }
        }
    }

    let makespan = end.iter().copied().fold(0.0, f64::max);
    let mut latest_finish = vec![makespan; n];
    for &i in topological_order(&succs).iter().rev() {
        for &s in &succs[i] {
            let latest_start = latest_finish[s] - (end[s] - start[s]);
            latest_finish[i] = latest_finish[i].min(latest_start);
        }
    }

    (0..n).map(|i| latest_finish[i] - end[i] < EPS).collect()
}
