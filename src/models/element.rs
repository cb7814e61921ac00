//! Element and capture models.
//!
//! An element is a physical structure poured in one or more captures
//! (sequential pour zones). Each capture carries its share of the
//! element's quantities and the ids of the captures poured before it.

use serde::{Deserialize, Serialize};

/// Kind of physical structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    Slab,
    Wall,
    Beam,
    Footing,
    Column,
}

/// A physical concrete element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub element_type: ElementType,
    /// Total concrete volume (m³).
    pub volume_m3: f64,
    /// Total formwork area (m²).
    pub formwork_area_m2: f64,
    /// Total rebar mass (t).
    pub rebar_mass_t: f64,
    /// Longest allowed continuous pour (h). `None` = engine default.
    pub max_continuous_pour_hours: Option<f64>,
    /// Layer thickness (m), where relevant.
    pub layer_thickness_m: Option<f64>,
}

impl Element {
    pub fn new(
        id: impl Into<String>,
        project_id: impl Into<String>,
        element_type: ElementType,
    ) -> Self {
        Self {
            id: id.into(),
            project_id: project_id.into(),
            name: String::new(),
            element_type,
            volume_m3: 0.0,
            formwork_area_m2: 0.0,
            rebar_mass_t: 0.0,
            max_continuous_pour_hours: None,
            layer_thickness_m: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets volume (m³), formwork area (m²) and rebar mass (t).
    pub fn with_quantities(mut self, volume_m3: f64, formwork_area_m2: f64, rebar_mass_t: f64) -> Self {
        self.volume_m3 = volume_m3;
        self.formwork_area_m2 = formwork_area_m2;
        self.rebar_mass_t = rebar_mass_t;
        self
    }

    pub fn with_max_continuous_pour(mut self, hours: f64) -> Self {
        self.max_continuous_pour_hours = Some(hours);
        self
    }

    pub fn with_layer_thickness(mut self, meters: f64) -> Self {
        self.layer_thickness_m = Some(meters);
        self
    }
}

/// Joint between a capture and the one poured before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointType {
    None,
    ConstructionJoint,
}

/// One pourable zone of an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capture {
    pub id: String,
    pub element_id: String,
    /// Pour order within the element (1-based).
    pub sequence_index: u32,
    pub volume_m3: f64,
    pub area_m2: f64,
    pub mass_t: f64,
    pub joint_type: JointType,
    /// Captures that must be poured before this one.
    pub dependencies: Vec<String>,
}

impl Capture {
    pub fn new(id: impl Into<String>, element_id: impl Into<String>, sequence_index: u32) -> Self {
        Self {
            id: id.into(),
            element_id: element_id.into(),
            sequence_index,
            volume_m3: 0.0,
            area_m2: 0.0,
            mass_t: 0.0,
            joint_type: JointType::None,
            dependencies: Vec::new(),
        }
    }

    /// Sets volume (m³), formwork area (m²) and rebar mass (t).
    pub fn with_quantities(mut self, volume_m3: f64, area_m2: f64, mass_t: f64) -> Self {
        self.volume_m3 = volume_m3;
        self.area_m2 = area_m2;
        self.mass_t = mass_t;
        self
    }

    pub fn with_joint(mut self, joint: JointType) -> Self {
        self.joint_type = joint;
        self
    }

    pub fn with_dependency(mut self, capture_id: impl Into<String>) -> Self {
        self.dependencies.push(capture_id.into());
        self
    }

    /// Whether this capture is the first pour of its element.
    pub fn is_first(&self) -> bool {
        self.dependencies.is_empty()
    }
}
