//! Resource kinds and requirement maps.
//!
//! Tasks state what they occupy while running as a map from a closed set
//! of resource kinds to unit counts. The project's pool caps how many
//! units of each kind may be busy at once.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Kind of scarce resource a task occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Rebar crew.
    CrewRebar,
    /// Formwork crew.
    CrewFormwork,
    /// Concreting crew.
    CrewConcreting,
    /// One formwork kit (set of panels).
    FormworkKit,
    /// Concrete pump.
    Pump,
}

impl ResourceKind {
    /// All kinds, in declaration order.
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::CrewRebar,
        ResourceKind::CrewFormwork,
        ResourceKind::CrewConcreting,
        ResourceKind::FormworkKit,
        ResourceKind::Pump,
    ];

    /// Wire name (matches the serde representation).
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::CrewRebar => "crew_rebar",
            ResourceKind::CrewFormwork => "crew_formwork",
            ResourceKind::CrewConcreting => "crew_concreting",
            ResourceKind::FormworkKit => "formwork_kit",
            ResourceKind::Pump => "pump",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Units of each resource kind a task needs simultaneously.
///
/// Ordered map so the persisted JSON form is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceMap(BTreeMap<ResourceKind, u32>);

impl ResourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a requirement; zero counts are not stored.
    pub fn with(mut self, kind: ResourceKind, count: u32) -> Self {
        if count > 0 {
            *self.0.entry(kind).or_insert(0) += count;
        }
        self
    }

    /// Units required of `kind` (0 if absent).
    pub fn get(&self, kind: ResourceKind) -> u32 {
        self.0.get(&kind).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, u32)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_map_builder() {
        let m = ResourceMap::new()
            .with(ResourceKind::CrewFormwork, 1)
            .with(ResourceKind::FormworkKit, 1)
            .with(ResourceKind::Pump, 0);

        assert_eq!(m.get(ResourceKind::CrewFormwork), 1);
        assert_eq!(m.get(ResourceKind::FormworkKit), 1);
        assert_eq!(m.get(ResourceKind::Pump), 0);
        assert_eq!(m.iter().count(), 2);
    }

    #[test]
    fn test_resource_map_json_shape() {
        let m = ResourceMap::new().with(ResourceKind::CrewRebar, 1);
        assert_eq!(serde_json::to_string(&m).unwrap(), r#"{"crew_rebar":1}"#);

        let back: ResourceMap = serde_json::from_str(r#"{"formwork_kit":2,"pump":1}"#).unwrap();
        assert_eq!(back.get(ResourceKind::FormworkKit), 2);
        assert_eq!(back.get(ResourceKind::Pump), 1);
    }

    #[test]
    fn test_display_matches_wire_name() {
        for kind in ResourceKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
        }
    }
}
