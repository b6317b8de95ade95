//! Map domain
//!
//! The map is a static graph of rooms. It is validated once at load time and
//! then only read.

pub mod room_graph;

pub use room_graph::{RoomGraph, RoomId};
