//! Procedural maze generation with connectivity repair.
//!
//! Generation runs in two stages:
//!
//! 1. **Sampling** -- every cell independently becomes a wall with
//!    probability `wall_ratio`, otherwise open floor (or a reward in
//!    reward-fill mode).
//! 2. **Repair** -- a greedy local search over the walls. The "energy" of a
//!    grid is the size of the component reachable from a fixed anchor (the
//!    first passable cell in row-major order). Walls are visited in a
//!    uniformly shuffled order; each is opened tentatively and kept only if
//!    the anchor's component grows by more than the single freed cell, i.e.
//!    the opening bridged two components. The search stops the moment every
//!    passable cell is reachable.
//!
//! If one full pass over the walls fails to connect the grid, the layout is
//! discarded and sampling starts over. There is no bound on the number of
//! restarts; moderate ratios (below about 0.4) converge quickly.

use gridchase_types::Cell;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use crate::error::WorldError;
use crate::grid::GridWorld;
use crate::path::flood_fill;

/// Construction parameters for the generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MazeParams {
    /// Side length of the grid.
    pub size: usize,
    /// Probability that a sampled cell is a wall. Must lie in `[0, 1)`.
    pub wall_ratio: f64,
    /// Sample open cells as [`Cell::Reward`] instead of [`Cell::Empty`].
    pub fill_rewards: bool,
}

impl MazeParams {
    /// Parameters with reward-fill mode off.
    pub const fn new(size: usize, wall_ratio: f64) -> Self {
        Self {
            size,
            wall_ratio,
            fill_rewards: false,
        }
    }

    /// Toggle reward-fill mode.
    #[must_use]
    pub const fn with_fill_rewards(mut self, fill_rewards: bool) -> Self {
        self.fill_rewards = fill_rewards;
        self
    }
}

/// Outcome of a successful generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedMaze {
    /// The connected terrain.
    pub grid: GridWorld,
    /// Number of discarded layouts before this one.
    pub restarts: u32,
    /// Walls opened by the repair pass on the accepted layout.
    pub walls_opened: usize,
}

/// Generates fully connected terrain.
#[derive(Debug, Clone)]
pub struct MazeGenerator {
    params: MazeParams,
}

impl MazeGenerator {
    /// Validate parameters and create a generator.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidConfiguration`] if `wall_ratio` is not a
    /// finite value in `[0, 1)`.
    pub fn new(params: MazeParams) -> Result<Self, WorldError> {
        if !params.wall_ratio.is_finite() || params.wall_ratio < 0.0 || params.wall_ratio >= 1.0 {
            return Err(WorldError::InvalidConfiguration {
                reason: format!(
                    "wall_ratio must be in [0.0, 1.0), got {}",
                    params.wall_ratio
                ),
            });
        }
        Ok(Self { params })
    }

    /// The validated parameters.
    pub const fn params(&self) -> &MazeParams {
        &self.params
    }

    /// Produce a grid whose passable cells form one connected component.
    ///
    /// Layouts with no passable cell at all (possible on tiny grids) are
    /// discarded like any other stalled layout.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ArithmeticOverflow`] if the grid cannot be
    /// allocated.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<GeneratedMaze, WorldError> {
        let mut restarts: u32 = 0;
        loop {
            let mut grid = self.sample(rng)?;

            if self.params.size > 0 && grid.passable_count() == 0 {
                debug!(restarts, "Sampled layout has no open cell, resampling");
                restarts = restarts.saturating_add(1);
                continue;
            }

            if let Some(walls_opened) = repair(&mut grid, rng)? {
                info!(
                    size = self.params.size,
                    wall_ratio = self.params.wall_ratio,
                    walls = grid.count(Cell::Wall),
                    passable = grid.passable_count(),
                    restarts,
                    walls_opened,
                    "Maze generated"
                );
                return Ok(GeneratedMaze {
                    grid,
                    restarts,
                    walls_opened,
                });
            }

            debug!(restarts, "Repair pass stalled, resampling");
            restarts = restarts.saturating_add(1);
        }
    }

    /// Stage 1: independent per-cell sampling.
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<GridWorld, WorldError> {
        let open = if self.params.fill_rewards {
            Cell::Reward
        } else {
            Cell::Empty
        };
        let mut grid = GridWorld::filled(self.params.size, open)?;
        let positions: Vec<_> = grid.positions().collect();
        for position in positions {
            if rng.random_bool(self.params.wall_ratio) {
                grid.set(position, Cell::Wall)?;
            }
        }
        Ok(grid)
    }
}

/// Stage 2: one shuffled pass of wall openings.
///
/// Returns the number of walls opened when the grid ends up connected, or
/// `None` when the pass finished without reaching full connectivity.
fn repair<R: Rng + ?Sized>(grid: &mut GridWorld, rng: &mut R) -> Result<Option<usize>, WorldError> {
    let Some(anchor) = grid.first_passable() else {
        return Ok(Some(0));
    };

    let mut target = grid.passable_count();
    let mut energy = flood_fill(grid, anchor);
    if energy >= target {
        return Ok(Some(0));
    }

    let mut walls = grid.cells_of(Cell::Wall);
    walls.shuffle(rng);

    let mut opened: usize = 0;
    for wall in walls {
        grid.set(wall, Cell::Empty)?;
        let candidate = flood_fill(grid, anchor);
        if candidate > energy.saturating_add(1) {
            energy = candidate;
            target = target.saturating_add(1);
            opened = opened.saturating_add(1);
            if energy >= target {
                return Ok(Some(opened));
            }
        } else {
            grid.set(wall, Cell::Wall)?;
        }
    }

    Ok(None)
}
