//! Grid terrain: a fixed-size square of [`Cell`]s.
//!
//! The [`GridWorld`] is the spatial backbone of the simulation. It owns the
//! terrain exclusively; every other component reads it through the
//! bounds-checked accessors here. Cells are stored row-major in a flat
//! vector of `size * size` entries.
//!
//! Adjacency is defined in exactly one place, [`GridWorld::neighbors4`],
//! which both the maze generator and the pathfinder use.

use gridchase_types::{Action, Cell, Position};

use crate::error::WorldError;

/// Square terrain grid.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GridWorld {
    /// Side length.
    size: usize,
    /// Row-major cells, `size * size` long.
    cells: Vec<Cell>,
}

impl GridWorld {
    /// Create a grid of the given size with every cell [`Cell::Empty`].
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ArithmeticOverflow`] if `size * size` does not
    /// fit in `usize`.
    pub fn new(size: usize) -> Result<Self, WorldError> {
        Self::filled(size, Cell::Empty)
    }

    /// Create a grid of the given size with every cell set to `cell`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ArithmeticOverflow`] if `size * size` does not
    /// fit in `usize`.
    pub fn filled(size: usize, cell: Cell) -> Result<Self, WorldError> {
        let len = size.checked_mul(size).ok_or(WorldError::ArithmeticOverflow)?;
        Ok(Self {
            size,
            cells: vec![cell; len],
        })
    }

    /// Build a grid from explicit rows.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidConfiguration`] if any row's length
    /// differs from the number of rows.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, WorldError> {
        let size = rows.len();
        if let Some((row, bad)) = rows.iter().enumerate().find(|(_, r)| r.len() != size) {
            return Err(WorldError::InvalidConfiguration {
                reason: format!(
                    "terrain must be square: row {row} has {} cells, expected {size}",
                    bad.len()
                ),
            });
        }
        Ok(Self {
            size,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Side length of the grid.
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Whether `position` lies inside `[0, size)²`.
    pub const fn contains(&self, position: Position) -> bool {
        position.row < self.size && position.col < self.size
    }

    /// Read the cell at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfBounds`] outside the grid.
    pub fn get(&self, position: Position) -> Result<Cell, WorldError> {
        let idx = self.index(position)?;
        self.cells
            .get(idx)
            .copied()
            .ok_or(WorldError::OutOfBounds {
                position,
                size: self.size,
            })
    }

    /// Overwrite the cell at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfBounds`] outside the grid.
    pub fn set(&mut self, position: Position, cell: Cell) -> Result<(), WorldError> {
        let idx = self.index(position)?;
        let size = self.size;
        let slot = self
            .cells
            .get_mut(idx)
            .ok_or(WorldError::OutOfBounds { position, size })?;
        *slot = cell;
        Ok(())
    }

    /// `true` iff `position` is in bounds and not a wall.
    pub fn is_passable(&self, position: Position) -> bool {
        self.get(position).is_ok_and(Cell::is_passable)
    }

    /// In-bounds passable cells one axis-aligned step from `position`, in
    /// the order Up, Down, Left, Right.
    pub fn neighbors4(&self, position: Position) -> Vec<Position> {
        Action::DIRECTIONS
            .into_iter()
            .filter_map(|dir| position.offset(dir))
            .filter(|&next| self.is_passable(next))
            .collect()
    }

    // -------------------------------------------------------------------
    // Whole-grid queries
    // -------------------------------------------------------------------

    /// Every position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.size).flat_map(move |row| (0..self.size).map(move |col| Position::new(row, col)))
    }

    /// Pair every position with its cell, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (Position, Cell)> + '_ {
        self.positions().zip(self.cells.iter().copied())
    }

    /// Iterate over rows as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.size.max(1))
    }

    /// Positions holding exactly `cell`, row-major.
    pub fn cells_of(&self, cell: Cell) -> Vec<Position> {
        self.iter()
            .filter(|&(_, c)| c == cell)
            .map(|(p, _)| p)
            .collect()
    }

    /// All passable positions, row-major.
    pub fn passable_cells(&self) -> Vec<Position> {
        self.iter()
            .filter(|&(_, c)| c.is_passable())
            .map(|(p, _)| p)
            .collect()
    }

    /// Number of cells equal to `cell`.
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// Number of passable cells.
    pub fn passable_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_passable()).count()
    }

    /// First passable position in row-major order.
    pub fn first_passable(&self) -> Option<Position> {
        self.iter().find(|&(_, c)| c.is_passable()).map(|(p, _)| p)
    }

    /// Terrain codes in row-major order (see [`Cell::code`]).
    pub fn encode(&self) -> Vec<u8> {
        self.cells.iter().map(|c| c.code()).collect()
    }

    fn index(&self, position: Position) -> Result<usize, WorldError> {
        if !self.contains(position) {
            return Err(WorldError::OutOfBounds {
                position,
                size: self.size,
            });
        }
        position
            .row
            .checked_mul(self.size)
            .and_then(|base| base.checked_add(position.col))
            .ok_or(WorldError::ArithmeticOverflow)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    fn cross_world() -> GridWorld {
        // . # .
        // . . .
        // # . .
        let e = Cell::Empty;
        let w = Cell::Wall;
        GridWorld::from_rows(vec![vec![e, w, e], vec![e, e, e], vec![w, e, e]]).unwrap()
    }

    #[test]
    fn new_grid_is_empty() {
        let grid = GridWorld::new(4).unwrap();
        assert_eq!(grid.size(), 4);
        assert_eq!(grid.count(Cell::Empty), 16);
        assert_eq!(grid.passable_count(), 16);
    }

    #[test]
    fn get_and_set_are_bounds_checked() {
        let mut grid = cross_world();
        assert_eq!(grid.get(p(0, 1)), Ok(Cell::Wall));
        assert!(grid.set(p(2, 2), Cell::Reward).is_ok());
        assert_eq!(grid.get(p(2, 2)), Ok(Cell::Reward));

        assert_eq!(
            grid.get(p(3, 0)),
            Err(WorldError::OutOfBounds {
                position: p(3, 0),
                size: 3
            })
        );
        assert!(grid.set(p(0, 3), Cell::Wall).is_err());
    }

    #[test]
    fn passability() {
        let grid = cross_world();
        assert!(grid.is_passable(p(0, 0)));
        assert!(!grid.is_passable(p(0, 1)));
        assert!(!grid.is_passable(p(9, 9)));
    }

    #[test]
    fn neighbors_skip_walls_and_edges() {
        let grid = cross_world();
        assert_eq!(grid.neighbors4(p(1, 1)), vec![p(2, 1), p(1, 0), p(1, 2)]);
        assert_eq!(grid.neighbors4(p(0, 0)), vec![p(1, 0)]);
        assert_eq!(grid.neighbors4(p(2, 2)), vec![p(1, 2), p(2, 1)]);
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let rows = vec![vec![Cell::Empty, Cell::Empty], vec![Cell::Empty]];
        assert!(matches!(
            GridWorld::from_rows(rows),
            Err(WorldError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn zero_size_grid_is_valid() {
        let grid = GridWorld::new(0).unwrap();
        assert_eq!(grid.passable_count(), 0);
        assert_eq!(grid.first_passable(), None);
        assert_eq!(grid.rows().count(), 0);
        assert!(grid.get(p(0, 0)).is_err());
    }

    #[test]
    fn whole_grid_queries() {
        let grid = cross_world();
        assert_eq!(grid.cells_of(Cell::Wall), vec![p(0, 1), p(2, 0)]);
        assert_eq!(grid.passable_cells().len(), 7);
        assert_eq!(grid.first_passable(), Some(p(0, 0)));
        assert_eq!(grid.encode(), vec![0, 1, 0, 0, 0, 0, 1, 0, 0]);
        assert_eq!(grid.rows().count(), 3);
    }
}
