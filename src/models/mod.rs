//! Planning domain models.
//!
//! Core data types for one project's concrete work: the project and its
//! norms, elements split into captures, the tasks generated per capture,
//! and the schedule computed from them.
//!
//! # Hierarchy
//!
//! | Model | Meaning |
//! |-------|---------|
//! | Project | Resource pool, wages, rental and markup rates |
//! | Normset | Production norms used to cost tasks |
//! | Element | Slab, wall, beam, footing or column |
//! | Capture | One sequential pour zone of an element |
//! | Task | One step of a capture's technological chain |
//! | Schedule | Tasks placed on a working-hour timeline |

mod element;
mod project;
mod resource;
mod schedule;
mod task;

pub use element::{Capture, Element, ElementType, JointType};
pub use project::{select_normset, Normset, Project};
pub use resource::{ResourceKind, ResourceMap};
pub use schedule::{Schedule, ScheduleEntry, ScheduleSummary};
pub use task::{Task, TaskCosts, TaskRecord, TaskType};
