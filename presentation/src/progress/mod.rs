//! Progress reporting while a game runs

pub mod reporter;
