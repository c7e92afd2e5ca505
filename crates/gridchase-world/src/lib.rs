//! Terrain, maze generation, and pathfinding for the GridChase simulation.
//!
//! This crate models the physical world: a square grid of cells, the
//! procedural generator that guarantees every open cell is reachable, and
//! the search routines agents use to find rewards and chase each other.
//!
//! # Modules
//!
//! - [`error`] -- Error types for terrain and generation operations.
//! - [`grid`] -- [`GridWorld`]: bounds-checked cell storage and 4-neighbour
//!   adjacency.
//! - [`maze`] -- [`MazeGenerator`]: random sampling plus a restart-on-stall
//!   local search that repairs connectivity.
//! - [`path`] -- Breadth-first nearest-match search, A* shortest path, and
//!   flood-fill connectivity checks.

pub mod error;
pub mod grid;
pub mod maze;
pub mod path;

// Re-export primary types at crate root.
pub use error::WorldError;
pub use grid::GridWorld;
pub use maze::{GeneratedMaze, MazeGenerator, MazeParams};
pub use path::{astar, bfs_nearest, flood_fill, is_connected};
