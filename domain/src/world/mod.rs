//! World domain
//!
//! [`WorldState`] is the only mutable aggregate in a game. Every other
//! component reads it or mutates it through its methods.

pub mod state;
pub mod view;

pub use state::{GamePhase, RoomOccupancy, RoundState, WorldState};
pub use view::{MeetingBrief, RoomView, TeammateView, WorldView};
