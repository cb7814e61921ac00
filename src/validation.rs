//! Structural checks for capture chains and task graphs.
//!
//! Runs before task generation and scheduling. Detects:
//! - Duplicate IDs
//! - References to captures or tasks that do not exist
//! - Captures depending on a later (or the same) pour position
//! - Task sequence numbers that do not increase along a chain
//! - Circular dependencies (DAG validation)
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use std::collections::{HashMap, HashSet};

use crate::models::{Capture, Task};
use crate::PlanError;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A dependency or predecessor id does not exist.
    InvalidPredecessor,
    /// A capture depends on a capture of another element.
    CrossElementDependency,
    /// A capture depends on a capture with an equal or higher sequence index.
    ForwardDependency,
    /// A task's sequence does not exceed its predecessor's.
    SequenceOrder,
    /// Negative or non-finite duration.
    InvalidDuration,
    /// Dependency graph contains a cycle.
    CyclicDependency,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Folds a list of validation errors into one [`PlanError`].
///
/// Cycles win over dangling references, which win over everything else.
pub fn to_plan_error(errors: &[ValidationError]) -> PlanError {
    let first = |kind| errors.iter().find(|e| e.kind == kind);
    if let Some(e) = first(ValidationErrorKind::CyclicDependency) {
        return PlanError::CyclicDependency(e.message.clone());
    }
    if let Some(e) = first(ValidationErrorKind::InvalidPredecessor) {
        return PlanError::UnknownReference(e.message.clone());
    }
    let joined = errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ");
    PlanError::InvalidStructure(joined)
}

/// Validates the captures of a project.
///
/// Checks:
/// 1. No duplicate capture IDs
/// 2. Every dependency points to an existing capture
/// 3. Dependencies stay within one element
/// 4. No capture depends on a same-or-later sequence index
/// 5. No circular dependencies
pub fn validate_captures(captures: &[Capture]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut by_id: HashMap<&str, &Capture> = HashMap::new();
    for c in captures {
        if by_id.insert(c.id.as_str(), c).is_some() {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate capture ID: {}", c.id),
            ));
        }
    }

    for c in captures {
        for dep in &c.dependencies {
            let Some(pred) = by_id.get(dep.as_str()) else {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidPredecessor,
                    format!("Capture '{}' depends on unknown capture '{}'", c.id, dep),
                ));
                continue;
            };
            if pred.element_id != c.element_id {
                errors.push(ValidationError::new(
                    ValidationErrorKind::CrossElementDependency,
                    format!(
                        "Capture '{}' of element '{}' depends on '{}' of element '{}'",
                        c.id, c.element_id, pred.id, pred.element_id
                    ),
                ));
            } else if pred.sequence_index >= c.sequence_index {
                errors.push(ValidationError::new(
                    ValidationErrorKind::ForwardDependency,
                    format!(
                        "Capture '{}' (#{}) depends on later capture '{}' (#{})",
                        c.id, c.sequence_index, pred.id, pred.sequence_index
                    ),
                ));
            }
        }
    }

    let edges = captures
        .iter()
        .flat_map(|c| c.dependencies.iter().map(move |d| (d.as_str(), c.id.as_str())));
    if let Some(node) = find_cycle(captures.iter().map(|c| c.id.as_str()), edges) {
        errors.push(ValidationError::new(
            ValidationErrorKind::CyclicDependency,
            format!("Circular dependency detected involving capture '{node}'"),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates a task list before scheduling.
///
/// Checks:
/// 1. No duplicate task IDs
/// 2. Durations are finite and non-negative
/// 3. Every predecessor points to an existing task
/// 4. Within one capture, `sequence` strictly increases along each edge
/// 5. No circular dependencies
pub fn validate_tasks(tasks: &[Task]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut by_id: HashMap<&str, &Task> = HashMap::new();
    for t in tasks {
        if by_id.insert(t.id.as_str(), t).is_some() {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate task ID: {}", t.id),
            ));
        }
        if !(t.duration_hours.is_finite() && t.duration_hours >= 0.0) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDuration,
                format!("Task '{}' has invalid duration {}", t.id, t.duration_hours),
            ));
        }
    }

    for t in tasks {
        for pred_id in &t.predecessors {
            match by_id.get(pred_id.as_str()) {
                None => errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidPredecessor,
                    format!("Task '{}' references unknown predecessor '{}'", t.id, pred_id),
                )),
                Some(pred) if pred.capture_id == t.capture_id && pred.sequence >= t.sequence => {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::SequenceOrder,
                        format!(
                            "Task '{}' (sequence {}) follows '{}' (sequence {})",
                            t.id, t.sequence, pred.id, pred.sequence
                        ),
                    ))
                }
                Some(_) => {}
            }
        }
    }

    let edges = tasks
        .iter()
        .flat_map(|t| t.predecessors.iter().map(move |p| (p.as_str(), t.id.as_str())));
    if let Some(node) = find_cycle(tasks.iter().map(|t| t.id.as_str()), edges) {
        errors.push(ValidationError::new(
            ValidationErrorKind::CyclicDependency,
            format!("Circular dependency detected involving task '{node}'"),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Returns a node on a cycle of the graph given by `(from, to)` edges.
fn find_cycle<'a>(
    nodes: impl Iterator<Item = &'a str>,
    edges: impl Iterator<Item = (&'a str, &'a str)>,
) -> Option<&'a str> {
    let mut adj: HashMap<&str, Vec<&str>> = HashMap::new();
    for (from, to) in edges {
        adj.entry(from).or_default().push(to);
    }

    let mut visited = HashSet::new();
    let mut in_stack = HashSet::new();
    // Input order keeps the reported node stable.
    nodes
        .into_iter()
        .find(|&node| !visited.contains(node) && has_cycle_dfs(node, &adj, &mut visited, &mut in_stack))
}

fn has_cycle_dfs<'a>(
    node: &'a str,
    adj: &HashMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
    in_stack: &mut HashSet<&'a str>,
) -> bool {
    visited.insert(node);
    in_stack.insert(node);

    if let Some(next_nodes) = adj.get(node) {
        for &next in next_nodes {
            if in_stack.contains(next) {
                return true;
            }
            if !visited.contains(next) && has_cycle_dfs(next, adj, visited, in_stack) {
                return true;
            }
        }
    }

    in_stack.remove(node);
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JointType, TaskType};

    fn chain(element: &str, n: u32) -> Vec<Capture> {
        (1..=n)
            .map(|i| {
                let c = Capture::new(format!("{element}-T{i}"), element, i);
                if i == 1 {
                    c
                } else {
                    c.with_joint(JointType::ConstructionJoint)
                        .with_dependency(format!("{element}-T{}", i - 1))
                }
            })
            .collect()
    }

    fn task_chain(capture: &str) -> Vec<Task> {
        let mut prev: Option<String> = None;
        TaskType::CHAIN
            .iter()
            .map(|&tt| {
                let id = format!("{capture}-{}", tt.as_str());
                let mut t = Task::new(id.clone(), capture, tt).with_duration(2.0, 0.2);
                if let Some(p) = prev.replace(id) {
                    t = t.with_predecessor(p);
                }
                t
            })
            .collect()
    }

    #[test]
    fn test_valid_capture_chain() {
        let mut captures = chain("W1", 4);
        captures.extend(chain("S1", 2));
        assert!(validate_captures(&captures).is_ok());
    }

    #[test]
    fn test_duplicate_capture_id() {
        let mut captures = chain("W1", 2);
        captures.push(Capture::new("W1-T1", "W1", 9));
        let errors = validate_captures(&captures).unwrap_err();
        assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::DuplicateId));
    }

    #[test]
    fn test_unknown_capture_dependency() {
        let captures = vec![Capture::new("A", "W1", 2).with_dependency("ghost")];
        let errors = validate_captures(&captures).unwrap_err();
        assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::InvalidPredecessor));
        assert!(matches!(to_plan_error(&errors), PlanError::UnknownReference(_)));
    }

    #[test]
    fn test_forward_dependency() {
        let captures = vec![
            Capture::new("A", "W1", 1).with_dependency("B"),
            Capture::new("B", "W1", 2),
        ];
        let errors = validate_captures(&captures).unwrap_err();
        assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::ForwardDependency));
        assert!(matches!(to_plan_error(&errors), PlanError::InvalidStructure(_)));
    }

    #[test]
    fn test_cross_element_dependency() {
        let captures = vec![
            Capture::new("A", "W1", 1),
            Capture::new("B", "W2", 2).with_dependency("A"),
        ];
        let errors = validate_captures(&captures).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::CrossElementDependency));
    }

    #[test]
    fn test_capture_cycle() {
        let captures = vec![
            Capture::new("A", "W1", 1).with_dependency("C"),
            Capture::new("B", "W1", 2).with_dependency("A"),
            Capture::new("C", "W1", 3).with_dependency("B"),
        ];
        let errors = validate_captures(&captures).unwrap_err();
        assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::CyclicDependency));
        assert!(matches!(to_plan_error(&errors), PlanError::CyclicDependency(_)));
    }

    #[test]
    fn test_valid_task_chains() {
        let mut tasks = task_chain("W1-T1");
        tasks.extend(task_chain("W1-T2"));
        assert!(validate_tasks(&tasks).is_ok());
    }

    #[test]
    fn test_task_sequence_must_increase() {
        let tasks = vec![
            Task::new("pour", "C1", TaskType::Pour),
            Task::new("rebar", "C1", TaskType::Rebar).with_predecessor("pour"),
        ];
        let errors = validate_tasks(&tasks).unwrap_err();
        assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::SequenceOrder));
    }

    #[test]
    fn test_task_cycle_and_unknown() {
        let tasks = vec![
            Task::new("a", "C1", TaskType::Rebar).with_predecessor("b"),
            Task::new("b", "C2", TaskType::Rebar).with_predecessor("a"),
            Task::new("c", "C3", TaskType::Rebar).with_predecessor("zzz"),
        ];
        let errors = validate_tasks(&tasks).unwrap_err();
        assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::CyclicDependency));
        assert!(errors.iter().any(|e| e.kind == ValidationErrorKind::InvalidPredecessor));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_negative_duration() {
        let tasks = vec![Task::new("a", "C1", TaskType::Rebar).with_duration(-1.0, -0.1)];
        let errors = validate_tasks(&tasks).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::InvalidDuration);
    }
}
