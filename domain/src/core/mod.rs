//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: domain-level errors
//! - [`rules::GameRules`]: static per-game budgets and roster shape

pub mod error;
pub mod rules;
