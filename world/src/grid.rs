//! Maze grid storage and the backtracking carver.

use maze_escape_core::{CellCoord, CellState, Direction, GridDimensions};
use rand::{seq::SliceRandom, Rng};

/// Immutable-after-generation cell matrix backing a single maze.
///
/// Cells are stored row-major in a flat arena indexed by
/// `row * columns + column`. Exactly one [`CellState::Start`] and one
/// [`CellState::Goal`] exist after carving, and every non-wall cell is
/// reachable from the start without cycles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    dimensions: GridDimensions,
    cells: Vec<CellState>,
}

impl Grid {
    fn filled_with_walls(dimensions: GridDimensions) -> Self {
        Self {
            dimensions,
            cells: vec![CellState::Wall; dimensions.cell_count()],
        }
    }

    /// Dimensions of the maze in whole cells.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Number of cell columns in the maze.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.dimensions.columns()
    }

    /// Number of cell rows in the maze.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.dimensions.rows()
    }

    /// State of the provided cell, or `None` when it lies outside the maze.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> Option<CellState> {
        self.index(cell).and_then(|index| self.cells.get(index)).copied()
    }

    /// Cell where every session begins.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        CellCoord::new(1, 1)
    }

    /// Cell that ends the session when the player enters it.
    #[must_use]
    pub const fn goal(&self) -> CellCoord {
        CellCoord::new(self.columns() - 2, self.rows() - 2)
    }

    /// Iterates every cell with its coordinate in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, CellState)> + '_ {
        let columns = self.columns();
        self.cells.iter().enumerate().map(move |(index, state)| {
            let column = (index as u32) % columns;
            let row = (index as u32) / columns;
            (CellCoord::new(column, row), *state)
        })
    }

    fn set(&mut self, cell: CellCoord, state: CellState) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = state;
            }
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns() && cell.row() < self.rows() {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns()).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Carves a maze of the requested dimensions using the injected randomness.
///
/// The carver is a randomized depth-first backtracker over an explicit frame
/// stack, so a 41 x 41 maze never risks native stack exhaustion. Each frame
/// shuffles its candidate directions exactly once through `rng`, which makes
/// a fixed seed reproduce a byte-identical grid.
#[must_use]
pub fn generate(dimensions: GridDimensions, rng: &mut impl Rng) -> Grid {
    debug_assert!(
        dimensions.columns() % 2 == 1
            && dimensions.rows() % 2 == 1
            && dimensions.columns() >= GridDimensions::MIN_SIDE
            && dimensions.rows() >= GridDimensions::MIN_SIDE,
        "maze dimensions must be odd and at least {}",
        GridDimensions::MIN_SIDE,
    );

    let mut grid = Grid::filled_with_walls(dimensions);
    let start = grid.start();
    grid.set(start, CellState::Open);

    let mut stack = vec![CarveFrame::shuffled(start, rng)];
    while let Some(frame) = stack.last_mut() {
        let origin = frame.cell;
        let Some(direction) = frame.next_direction() else {
            let _ = stack.pop();
            continue;
        };

        let Some((link, neighbor)) = interior_two_step(origin, direction, dimensions) else {
            continue;
        };

        if grid.cell(neighbor) == Some(CellState::Wall) {
            grid.set(link, CellState::Open);
            grid.set(neighbor, CellState::Open);
            stack.push(CarveFrame::shuffled(neighbor, rng));
        }
    }

    grid.set(start, CellState::Start);
    grid.set(grid.goal(), CellState::Goal);
    grid
}

/// Single step of the backtracker: a carved cell plus the directions that
/// remain to be explored from it.
#[derive(Clone, Copy, Debug)]
struct CarveFrame {
    cell: CellCoord,
    directions: [Direction; 4],
    next: usize,
}

impl CarveFrame {
    fn shuffled(cell: CellCoord, rng: &mut impl Rng) -> Self {
        let mut directions = [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ];
        directions.shuffle(rng);
        Self {
            cell,
            directions,
            next: 0,
        }
    }

    fn next_direction(&mut self) -> Option<Direction> {
        let direction = self.directions.get(self.next).copied();
        if direction.is_some() {
            self.next += 1;
        }
        direction
    }
}

fn interior_two_step(
    origin: CellCoord,
    direction: Direction,
    dimensions: GridDimensions,
) -> Option<(CellCoord, CellCoord)> {
    let link = origin.step(direction)?;
    let neighbor = link.step(direction)?;

    let interior = neighbor.column() > 0
        && neighbor.row() > 0
        && neighbor.column() < dimensions.columns() - 1
        && neighbor.row() < dimensions.rows() - 1;
    if interior {
        Some((link, neighbor))
    } else {
        None
    }
}
