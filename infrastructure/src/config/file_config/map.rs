//! Map configuration from TOML (`[map]` section)
//!
//! Without a `[map.rooms]` table the built-in station map is used.
//!
//! ```toml
//! [map.rooms]
//! Hall = ["Lab", "Dock"]
//! Lab = ["Hall"]
//! Dock = ["Hall"]
//! ```

use crew_domain::{DomainError, RoomGraph};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileMapConfig {
    /// Room name to adjacent room names
    pub rooms: BTreeMap<String, Vec<String>>,
}

impl FileMapConfig {
    pub fn is_custom(&self) -> bool {
        !self.rooms.is_empty()
    }

    /// Build the room graph, checking symmetry and connectivity
    pub fn to_graph(&self) -> Result<RoomGraph, DomainError> {
        if self.is_custom() {
            RoomGraph::new(self.rooms.clone())
        } else {
            Ok(RoomGraph::station())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_map_is_station() {
        let graph = FileMapConfig::default().to_graph().unwrap();
        assert_eq!(graph, RoomGraph::station());
    }

    #[test]
    fn test_custom_map() {
        let toml_str = r#"
[map.rooms]
Hall = ["Lab", "Dock"]
Lab = ["Hall"]
Dock = ["Hall"]
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        let graph = config.map.to_graph().unwrap();
        assert_eq!(graph.room_count(), 3);
        assert!(graph.is_adjacent(&"Lab".into(), &"Hall".into()));
    }

    #[test]
    fn test_asymmetric_map_rejected() {
        let toml_str = r#"
[map.rooms]
Hall = ["Lab"]
Lab = []
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert!(matches!(
            config.map.to_graph(),
            Err(DomainError::AsymmetricAdjacency { .. })
        ));
    }
}
