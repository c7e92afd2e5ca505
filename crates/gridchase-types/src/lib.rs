//! Shared type definitions for the GridChase simulation.
//!
//! This crate is the single source of truth for the vocabulary used across
//! the workspace: terrain cells, coordinates, movement actions, agent roles
//! and records, and the observation payload handed to policy providers.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe agent identifiers
//! - [`enums`] -- Enumeration types (cells, actions, roles, colours, control)
//! - [`structs`] -- Core entity structs (positions, agents)
//! - [`perception`] -- Observation payload delivered to policy providers

pub mod enums;
pub mod ids;
pub mod perception;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{Action, AgentColor, Cell, Control, Role};
pub use ids::AgentId;
pub use perception::{AgentView, Observation};
pub use structs::{Agent, Position};
