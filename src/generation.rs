//! Capture generation and task regeneration.
//!
//! Captures come from evenly splitting an element. Tasks are regenerated
//! as a whole: every task of the given captures is deleted from the
//! repository before the new set is inserted, so task ids never survive a
//! regeneration.

use std::collections::{HashMap, HashSet};

use crate::calc::TaskChainBuilder;
use crate::error::Advisory;
use crate::models::{select_normset, Capture, Element, JointType, Normset, Project, Task, TaskRecord};
use crate::validation::{to_plan_error, validate_captures};
use crate::{PlanError, PlanResult};

/// Splits an element into `count` equal captures poured one after another.
///
/// Capture `n` is `{element_id}-T{n}`; each capture after the first has a
/// construction joint and depends on the one before it.
pub fn generate_captures(element: &Element, count: u32) -> PlanResult<Vec<Capture>> {
    if count == 0 {
        return Err(PlanError::InvalidQuantity(format!(
            "capture count for element '{}' must be at least 1",
            element.id
        )));
    }

    let share = 1.0 / count as f64;
    let captures = (1..=count)
        .map(|n| {
            let capture = Capture::new(format!("{}-T{n}", element.id), &element.id, n).with_quantities(
                element.volume_m3 * share,
                element.formwork_area_m2 * share,
                element.rebar_mass_t * share,
            );
            if n == 1 {
                capture
            } else {
                capture
                    .with_joint(JointType::ConstructionJoint)
                    .with_dependency(format!("{}-T{}", element.id, n - 1))
            }
        })
        .collect();

    tracing::debug!(element = %element.id, count, "generated captures");
    Ok(captures)
}

/// Persistence seam for generated tasks.
pub trait TaskRepository {
    /// Deletes every task of the given captures; returns how many were removed.
    fn delete_for_captures(&mut self, capture_ids: &[String]) -> PlanResult<usize>;

    /// Stores new task rows.
    fn insert(&mut self, records: Vec<TaskRecord>) -> PlanResult<()>;

    /// Loads the tasks of the given captures in insertion order.
    fn tasks_for_captures(&self, capture_ids: &[String]) -> PlanResult<Vec<Task>>;
}

/// Task rows kept in memory, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    rows: Vec<TaskRecord>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn records(&self) -> &[TaskRecord] {
        &self.rows
    }
}

impl TaskRepository for InMemoryTaskRepository {
    fn delete_for_captures(&mut self, capture_ids: &[String]) -> PlanResult<usize> {
        let ids: HashSet<&str> = capture_ids.iter().map(String::as_str).collect();
        let before = self.rows.len();
        self.rows.retain(|r| !ids.contains(r.capture_id.as_str()));
        Ok(before - self.rows.len())
    }

    fn insert(&mut self, records: Vec<TaskRecord>) -> PlanResult<()> {
        self.rows.extend(records);
        Ok(())
    }

    fn tasks_for_captures(&self, capture_ids: &[String]) -> PlanResult<Vec<Task>> {
        let ids: HashSet<&str> = capture_ids.iter().map(String::as_str).collect();
        self.rows
            .iter()
            .filter(|r| ids.contains(r.capture_id.as_str()))
            .map(|r| r.clone().into_task())
            .collect()
    }
}

/// Result of [`regenerate_tasks`].
#[derive(Debug, Clone, PartialEq)]
pub struct Regeneration {
    /// New tasks, six per capture, in capture order.
    pub tasks: Vec<Task>,
    pub advisories: Vec<Advisory>,
    /// Tasks removed before the insert.
    pub deleted: usize,
}

/// Everything regeneration reads for one project.
#[derive(Debug, Clone, Copy)]
pub struct ProjectData<'a> {
    pub project: &'a Project,
    pub elements: &'a [Element],
    pub captures: &'a [Capture],
    pub normsets: &'a [Normset],
}

/// Replaces all tasks of the project's captures with a freshly built set.
///
/// `normset_id` picks a normset explicitly; `None` uses the default one.
/// Nothing is deleted unless every chain was built successfully.
pub fn regenerate_tasks<R: TaskRepository>(
    repo: &mut R,
    data: ProjectData<'_>,
    normset_id: Option<&str>,
    builder: &TaskChainBuilder,
) -> PlanResult<Regeneration> {
    let normset = select_normset(data.normsets, normset_id)?;
    if data.captures.is_empty() {
        return Err(PlanError::no_captures());
    }
    validate_captures(data.captures).map_err(|errors| to_plan_error(&errors))?;

    let elements: HashMap<&str, &Element> =
        data.elements.iter().map(|e| (e.id.as_str(), e)).collect();

    let mut ordered: Vec<&Capture> = data.captures.iter().collect();
    ordered.sort_by(|a, b| {
        a.element_id
            .cmp(&b.element_id)
            .then(a.sequence_index.cmp(&b.sequence_index))
    });

    let mut tasks = Vec::with_capacity(ordered.len() * 6);
    let mut advisories = Vec::new();
    for capture in ordered {
        let element = elements.get(capture.element_id.as_str()).ok_or_else(|| {
            PlanError::UnknownReference(format!(
                "capture '{}' belongs to unknown element '{}'",
                capture.id, capture.element_id
            ))
        })?;
        let chain = builder.build(capture, element, data.project, normset)?;
        tasks.extend(chain.tasks);
        advisories.extend(chain.advisories);
    }

    let records = tasks.iter().map(Task::to_record).collect::<PlanResult<Vec<_>>>()?;
    let capture_ids: Vec<String> = data.captures.iter().map(|c| c.id.clone()).collect();
    let deleted = repo.delete_for_captures(&capture_ids)?;
    repo.insert(records)?;

    tracing::info!(
        project = %data.project.id,
        normset = %normset.id,
        captures = capture_ids.len(),
        tasks = tasks.len(),
        deleted,
        "regenerated tasks"
    );

    Ok(Regeneration {
        tasks,
        advisories,
        deleted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ElementType, TaskType};

    fn wall() -> Element {
        Element::new("W1", "P1", ElementType::Wall).with_quantities(120.0, 400.0, 8.0)
    }

    fn project() -> Project {
        Project::new("P1").with_name("Bridge SO 201")
    }

    fn normsets() -> Vec<Normset> {
        vec![Normset::new("N1").as_default(), Normset::new("N2").with_rebar_norm(30.0)]
    }

    #[test]
    fn test_generate_captures_even_split() {
        let captures = generate_captures(&wall(), 4).unwrap();
        assert_eq!(captures.len(), 4);
        for (i, c) in captures.iter().enumerate() {
            assert_eq!(c.sequence_index, i as u32 + 1);
            assert!((c.volume_m3 - 30.0).abs() < 1e-10);
            assert!((c.area_m2 - 100.0).abs() < 1e-10);
            assert!((c.mass_t - 2.0).abs() < 1e-10);
        }
        assert_eq!(captures[0].id, "W1-T1");
        assert_eq!(captures[0].joint_type, JointType::None);
        assert!(captures[0].dependencies.is_empty());
        assert_eq!(captures[3].joint_type, JointType::ConstructionJoint);
        assert_eq!(captures[3].dependencies, vec!["W1-T3".to_string()]);
        assert!(validate_captures(&captures).is_ok());
    }

    #[test]
    fn test_generate_zero_captures_rejected() {
        assert!(matches!(
            generate_captures(&wall(), 0),
            Err(PlanError::InvalidQuantity(_))
        ));
    }

    #[test]
    fn test_regenerate_builds_six_per_capture() {
        let element = wall();
        let captures = generate_captures(&element, 3).unwrap();
        let project = project();
        let normsets = normsets();
        let data = ProjectData {
            project: &project,
            elements: std::slice::from_ref(&element),
            captures: &captures,
            normsets: &normsets,
        };
        let mut repo = InMemoryTaskRepository::new();

        let out = regenerate_tasks(&mut repo, data, None, &TaskChainBuilder::new()).unwrap();
        assert_eq!(out.tasks.len(), 18);
        assert_eq!(out.deleted, 0);
        assert_eq!(repo.len(), 18);

        for (chunk, capture) in out.tasks.chunks(6).zip(&captures) {
            let types: Vec<TaskType> = chunk.iter().map(|t| t.task_type).collect();
            assert_eq!(types, TaskType::CHAIN.to_vec());
            assert!(chunk.iter().all(|t| t.capture_id == capture.id));
        }
    }

    #[test]
    fn test_regenerate_replaces_previous_tasks() {
        let element = wall();
        let captures = generate_captures(&element, 3).unwrap();
        let project = project();
        let normsets = normsets();
        let data = ProjectData {
            project: &project,
            elements: std::slice::from_ref(&element),
            captures: &captures,
            normsets: &normsets,
        };
        let builder = TaskChainBuilder::new();
        let mut repo = InMemoryTaskRepository::new();

        let first = regenerate_tasks(&mut repo, data, None, &builder).unwrap();
        let second = regenerate_tasks(&mut repo, data, Some("N2"), &builder).unwrap();

        assert_eq!(second.deleted, 18);
        assert_eq!(repo.len(), 18);
        let old: HashSet<&str> = first.tasks.iter().map(|t| t.id.as_str()).collect();
        assert!(repo.records().iter().all(|r| !old.contains(r.id.as_str())));

        let ids: Vec<String> = captures.iter().map(|c| c.id.clone()).collect();
        let stored = repo.tasks_for_captures(&ids).unwrap();
        assert_eq!(stored, second.tasks);
    }

    #[test]
    fn test_regenerate_keeps_other_projects_tasks() {
        let element = wall();
        let captures = generate_captures(&element, 2).unwrap();
        let other = Element::new("S9", "P2", ElementType::Slab).with_quantities(10.0, 50.0, 1.0);
        let other_captures = generate_captures(&other, 1).unwrap();
        let project = project();
        let other_project = Project::new("P2");
        let normsets = normsets();
        let builder = TaskChainBuilder::new();
        let mut repo = InMemoryTaskRepository::new();

        let other_data = ProjectData {
            project: &other_project,
            elements: std::slice::from_ref(&other),
            captures: &other_captures,
            normsets: &normsets,
        };
        regenerate_tasks(&mut repo, other_data, None, &builder).unwrap();

        let data = ProjectData {
            project: &project,
            elements: std::slice::from_ref(&element),
            captures: &captures,
            normsets: &normsets,
        };
        regenerate_tasks(&mut repo, data, None, &builder).unwrap();
        regenerate_tasks(&mut repo, data, None, &builder).unwrap();

        assert_eq!(repo.len(), 6 + 12);
    }

    #[test]
    fn test_regenerate_without_captures() {
        let project = project();
        let normsets = normsets();
        let data = ProjectData {
            project: &project,
            elements: &[],
            captures: &[],
            normsets: &normsets,
        };
        let err = regenerate_tasks(&mut InMemoryTaskRepository::new(), data, None, &TaskChainBuilder::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "no captures, generate captures first");
    }

    #[test]
    fn test_regenerate_without_default_normset() {
        let element = wall();
        let captures = generate_captures(&element, 1).unwrap();
        let project = project();
        let normsets = vec![Normset::new("N2")];
        let data = ProjectData {
            project: &project,
            elements: std::slice::from_ref(&element),
            captures: &captures,
            normsets: &normsets,
        };
        let err = regenerate_tasks(&mut InMemoryTaskRepository::new(), data, None, &TaskChainBuilder::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "no normset configured");
    }

    #[test]
    fn test_failed_regeneration_deletes_nothing() {
        let element = wall();
        let captures = generate_captures(&element, 2).unwrap();
        let project = project();
        let normsets = normsets();
        let builder = TaskChainBuilder::new();
        let mut repo = InMemoryTaskRepository::new();
        let data = ProjectData {
            project: &project,
            elements: std::slice::from_ref(&element),
            captures: &captures,
            normsets: &normsets,
        };
        regenerate_tasks(&mut repo, data, None, &builder).unwrap();

        let orphaned = ProjectData { elements: &[], ..data };
        let err = regenerate_tasks(&mut repo, orphaned, None, &builder).unwrap_err();
        assert!(matches!(err, PlanError::UnknownReference(_)));
        assert_eq!(repo.len(), 12);
    }
}
