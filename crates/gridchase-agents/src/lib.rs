//! Agent roster and occupancy tracking for the GridChase simulation.
//!
//! This crate owns every [`Agent`] record and the per-role occupancy
//! indices used for fast "who stands here" checks. It reads terrain from
//! `gridchase-world` only to validate placements and moves; agent state is
//! never written into the grid.
//!
//! # Modules
//!
//! - [`error`] -- Error types for registration and movement ([`AgentError`])
//! - [`registry`] -- The [`AgentRegistry`] and its [`OccupancyIndex`]
//!
//! [`Agent`]: gridchase_types::Agent

pub mod error;
pub mod registry;

// Re-export primary types at crate root for convenience.
pub use error::AgentError;
pub use registry::{AgentRegistry, OccupancyIndex};
