//! Agent domain module
//!
//! Contains agent identity, faction, status, statistics and the private
//! perception record each agent accumulates while moving.

pub mod entities;
pub mod perception;
pub mod value_objects;

pub use entities::{Agent, AgentSpec, AgentStats, KnownBody};
pub use perception::{PerceptionEntry, PerceptionLog};
pub use value_objects::{AgentId, AgentStatus, Faction};
