//! Room graph - static adjacency between rooms.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// Identifier of a room on the map.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<T: Into<String>> From<T> for RoomId {
    fn from(s: T) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Read-only adjacency map of room → reachable neighbor rooms.
///
/// Construction validates that every neighbor exists, that adjacency is
/// symmetric and that every room is reachable from every other room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomGraph {
    adjacency: BTreeMap<RoomId, Vec<RoomId>>,
}

impl RoomGraph {
    /// Build a graph from a raw adjacency listing.
    pub fn new<I, R, N>(rooms: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = (R, Vec<N>)>,
        R: Into<RoomId>,
        N: Into<RoomId>,
    {
        let mut adjacency: BTreeMap<RoomId, Vec<RoomId>> = BTreeMap::new();
        for (room, neighbors) in rooms {
            let entry = adjacency.entry(room.into()).or_default();
            for neighbor in neighbors {
                let neighbor = neighbor.into();
                if !entry.contains(&neighbor) {
                    entry.push(neighbor);
                }
            }
        }

        let graph = Self { adjacency };
        graph.validate()?;
        Ok(graph)
    }

    /// The station map shipped with the game (14 rooms, symmetric).
    pub fn station() -> Self {
        let rooms: [(&str, &[&str]); 14] = [
            ("Reactor", &["Security", "UpperEngine", "LowerEngine"]),
            (
                "UpperEngine",
                &["Reactor", "Security", "MedBay", "Cafeteria", "LowerEngine"],
            ),
            (
                "LowerEngine",
                &["Reactor", "Security", "Electrical", "Storage", "UpperEngine"],
            ),
            ("Security", &["Reactor", "UpperEngine", "LowerEngine"]),
            ("MedBay", &["UpperEngine", "Cafeteria"]),
            ("Electrical", &["LowerEngine", "Storage"]),
            (
                "Cafeteria",
                &["UpperEngine", "MedBay", "Weapons", "Admin", "Storage"],
            ),
            ("Admin", &["Cafeteria", "Storage"]),
            (
                "Storage",
                &[
                    "Cafeteria",
                    "Admin",
                    "Electrical",
                    "LowerEngine",
                    "Shields",
                    "Communications",
                ],
            ),
            ("Communications", &["Storage", "Shields"]),
            ("Weapons", &["Cafeteria", "O2", "Navigation", "Shields"]),
            ("O2", &["Weapons", "Navigation", "Shields"]),
            ("Navigation", &["Weapons", "O2", "Shields"]),
            (
                "Shields",
                &["Navigation", "O2", "Storage", "Communications", "Weapons"],
            ),
        ];

        Self {
            adjacency: rooms
                .iter()
                .map(|(room, neighbors)| {
                    (
                        RoomId::new(*room),
                        neighbors.iter().map(|n| RoomId::new(*n)).collect(),
                    )
                })
                .collect(),
        }
    }

    fn validate(&self) -> Result<(), DomainError> {
        let Some(start) = self.adjacency.keys().next() else {
            return Err(DomainError::EmptyMap);
        };

        for (room, neighbors) in &self.adjacency {
            for neighbor in neighbors {
                let Some(back) = self.adjacency.get(neighbor) else {
                    return Err(DomainError::UnknownNeighbor {
                        room: room.to_string(),
                        neighbor: neighbor.to_string(),
                    });
                };
                if !back.contains(room) {
                    return Err(DomainError::AsymmetricAdjacency {
                        room: room.to_string(),
                        neighbor: neighbor.to_string(),
                    });
                }
            }
        }

        let reachable = self.reachable_from(start);
        if reachable.len() != self.adjacency.len() {
            let unreachable = self
                .adjacency
                .keys()
                .filter(|room| !reachable.contains(room))
                .map(|room| room.to_string())
                .collect();
            return Err(DomainError::DisconnectedMap {
                start: start.to_string(),
                unreachable,
            });
        }

        Ok(())
    }

    fn reachable_from<'a>(&'a self, start: &'a RoomId) -> BTreeSet<&'a RoomId> {
        let mut seen = BTreeSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(room) = queue.pop_front() {
            for neighbor in self.neighbors(room) {
                if seen.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }
        seen
    }

    /// All rooms in stable (sorted) order.
    pub fn rooms(&self) -> impl Iterator<Item = &RoomId> {
        self.adjacency.keys()
    }

    pub fn room_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn contains(&self, room: &RoomId) -> bool {
        self.adjacency.contains_key(room)
    }

    /// Neighbors of a room in declaration order; empty for unknown rooms.
    pub fn neighbors(&self, room: &RoomId) -> &[RoomId] {
        self.adjacency.get(room).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_adjacent(&self, from: &RoomId, to: &RoomId) -> bool {
        self.neighbors(from).contains(to)
    }

    /// Look up a room by case-insensitive name.
    pub fn find(&self, name: &str) -> Option<&RoomId> {
        let name = name.trim();
        self.adjacency
            .keys()
            .find(|room| room.as_str().eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> Vec<(&'static str, Vec<&'static str>)> {
        vec![("A", vec!["B"]), ("B", vec!["A", "C"]), ("C", vec!["B"])]
    }

    #[test]
    fn test_station_is_valid() {
        let station = RoomGraph::station();
        assert!(station.validate().is_ok());
        assert_eq!(station.room_count(), 14);
        assert!(station.contains(&RoomId::new("Cafeteria")));
    }

    #[test]
    fn test_symmetric_graph_accepted() {
        let graph = RoomGraph::new(line()).unwrap();
        assert!(graph.is_adjacent(&"A".into(), &"B".into()));
        assert!(graph.is_adjacent(&"B".into(), &"A".into()));
        assert!(!graph.is_adjacent(&"A".into(), &"C".into()));
    }

    #[test]
    fn test_asymmetric_graph_rejected() {
        let result = RoomGraph::new(vec![
            ("A", vec!["B"]),
            ("B", vec!["C"]),
            ("C", vec!["B"]),
        ]);
        assert_eq!(
            result,
            Err(DomainError::AsymmetricAdjacency {
                room: "A".to_string(),
                neighbor: "B".to_string()
            })
        );
    }

    #[test]
    fn test_unknown_neighbor_rejected() {
        let result = RoomGraph::new(vec![("A", vec!["Z"])]);
        assert!(matches!(result, Err(DomainError::UnknownNeighbor { .. })));
    }

    #[test]
    fn test_disconnected_graph_rejected() {
        let result = RoomGraph::new(vec![
            ("A", vec!["B"]),
            ("B", vec!["A"]),
            ("C", vec![]),
        ]);
        match result {
            Err(DomainError::DisconnectedMap { unreachable, .. }) => {
                assert_eq!(unreachable, vec!["C".to_string()]);
            }
            other => panic!("expected DisconnectedMap, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_graph_rejected() {
        let result = RoomGraph::new(Vec::<(&str, Vec<&str>)>::new());
        assert_eq!(result, Err(DomainError::EmptyMap));
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let station = RoomGraph::station();
        assert_eq!(station.find(" medbay "), Some(&RoomId::new("MedBay")));
        assert_eq!(station.find("Bridge"), None);
    }

    #[test]
    fn test_neighbors_of_unknown_room_empty() {
        let station = RoomGraph::station();
        assert!(station.neighbors(&RoomId::new("Bridge")).is_empty());
    }
}
