//! Hex board geometry on a padded rhombus
//!
//! The engine works on a `(grid_size + 2)`-wide square array whose outer ring
//! holds sentinel stones: Red owns the left and right columns, Blue owns the
//! top and bottom rows. The four corners stay empty; they anchor the distance
//! fields.

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hex adjacency as (d_row, d_col) offsets: every step in {-1, 0, 1}²
/// with `d_row + d_col != 0`
pub const DIRECTIONS: [(isize, isize); 6] = [
    (-1, -1),
    (-1, 0),
    (0, -1),
    (0, 1),
    (1, 0),
    (1, 1),
];

/// Base-3 digits packed into one key limb (3^40 < 2^64)
const DIGITS_PER_LIMB: usize = 40;

// ============================================================================
// STONES AND COORDINATES
// ============================================================================

/// Contents of a board cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Stone {
    #[default]
    Empty = 0,
    /// Connects left to right, maximizes the score
    Red = 1,
    /// Connects top to bottom, minimizes the score
    Blue = 2,
}

impl Stone {
    pub fn opponent(self) -> Self {
        match self {
            Stone::Red => Stone::Blue,
            Stone::Blue => Stone::Red,
            Stone::Empty => Stone::Empty,
        }
    }

    pub fn is_empty(self) -> bool {
        self == Stone::Empty
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Stone::Empty),
            1 => Some(Stone::Red),
            2 => Some(Stone::Blue),
            _ => None,
        }
    }
}

/// Caller-space coordinates, `0..grid_size` on both axes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Engine-space coordinates on the padded board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Canonical base-3 encoding of the interior, split into u64 limbs.
///
/// The first limb is the grid size; the rest hold 40 digits each in
/// row-major order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PositionKey(Box<[u64]>);

impl PositionKey {
    pub fn limbs(&self) -> &[u64] {
        &self.0
    }
}

// ============================================================================
// BOARD
// ============================================================================

/// Padded Hex board
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    grid_size: usize,
    cells: Vec<Stone>,
}

impl Board {
    /// Empty board with sentinel borders
    pub fn new(grid_size: usize) -> Self {
        let side = grid_size + 2;
        let mut cells = vec![Stone::Empty; side * side];
        for i in 1..side - 1 {
            cells[i * side] = Stone::Red;
            cells[i * side + side - 1] = Stone::Red;
            cells[i] = Stone::Blue;
            cells[(side - 1) * side + i] = Stone::Blue;
        }
        Self { grid_size, cells }
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Side length of the padded array
    pub fn side(&self) -> usize {
        self.grid_size + 2
    }

    pub fn index(&self, cell: Cell) -> usize {
        cell.row * self.side() + cell.col
    }

    pub fn cell_at(&self, index: usize) -> Cell {
        Cell::new(index / self.side(), index % self.side())
    }

    pub fn get(&self, cell: Cell) -> Stone {
        self.cells[self.index(cell)]
    }

    pub fn at(&self, index: usize) -> Stone {
        self.cells[index]
    }

    pub fn set(&mut self, cell: Cell, stone: Stone) {
        let index = self.index(cell);
        self.cells[index] = stone;
    }

    pub fn is_interior(&self, cell: Cell) -> bool {
        (1..=self.grid_size).contains(&cell.row) && (1..=self.grid_size).contains(&cell.col)
    }

    /// Interior cells in row-major order
    pub fn interior_cells(&self) -> impl Iterator<Item = Cell> {
        let n = self.grid_size;
        (1..=n).flat_map(move |row| (1..=n).map(move |col| Cell::new(row, col)))
    }

    /// Empty interior cells in row-major order
    pub fn empty_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.interior_cells().filter(|&c| self.get(c).is_empty())
    }

    /// True when no interior stone has been placed
    pub fn is_empty(&self) -> bool {
        self.interior_cells().all(|c| self.get(c).is_empty())
    }

    pub fn is_full(&self) -> bool {
        self.empty_cells().next().is_none()
    }

    pub fn stone_count(&self) -> usize {
        self.interior_cells().filter(|&c| !self.get(c).is_empty()).count()
    }

    /// On-board hex neighbours (border cells included)
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> {
        let side = self.side() as isize;
        let (row, col) = (cell.row as isize, cell.col as isize);
        DIRECTIONS.iter().filter_map(move |&(dr, dc)| {
            let (r, c) = (row + dr, col + dc);
            if r < 0 || c < 0 || r >= side || c >= side {
                None
            } else {
                Some(Cell::new(r as usize, c as usize))
            }
        })
    }

    /// Middle cell of the padded array
    pub fn center(&self) -> Cell {
        let mid = self.side() / 2;
        Cell::new(mid, mid)
    }

    // ------------------------------------------------------------------------
    // Coordinate transform
    // ------------------------------------------------------------------------

    /// Caller `(x, y)` to engine `(grid_size - y, x + 1)`
    pub fn to_cell(&self, point: Point) -> Option<Cell> {
        if point.x >= self.grid_size || point.y >= self.grid_size {
            return None;
        }
        Some(Cell::new(self.grid_size - point.y, point.x + 1))
    }

    /// Inverse of [`Board::to_cell`]; border cells have no caller coordinate
    pub fn to_point(&self, cell: Cell) -> Option<Point> {
        if !self.is_interior(cell) {
            return None;
        }
        Some(Point::new(cell.col - 1, self.grid_size - cell.row))
    }

    // ------------------------------------------------------------------------
    // Encoding
    // ------------------------------------------------------------------------

    /// Canonical cache key for the interior
    pub fn position_key(&self) -> PositionKey {
        let cells = self.grid_size * self.grid_size;
        let mut limbs = Vec::with_capacity(1 + cells.div_ceil(DIGITS_PER_LIMB));
        limbs.push(self.grid_size as u64);

        let mut limb = 0u64;
        let mut digits = 0;
        for cell in self.interior_cells() {
            limb = limb * 3 + self.get(cell).code() as u64;
            digits += 1;
            if digits == DIGITS_PER_LIMB {
                limbs.push(limb);
                limb = 0;
                digits = 0;
            }
        }
        if digits > 0 {
            limbs.push(limb);
        }
        PositionKey(limbs.into_boxed_slice())
    }

    /// Row-major stone codes of the whole padded array
    pub fn to_codes(&self) -> Vec<u8> {
        self.cells.iter().map(|s| s.code()).collect()
    }

    /// Rebuild a board from [`Board::to_codes`] output, checking shape,
    /// cell values and the sentinel border.
    pub fn from_codes(grid_size: usize, codes: &[u8]) -> Result<Self> {
        let side = grid_size + 2;
        if codes.len() != side * side {
            return Err(EngineError::CorruptState(format!(
                "expected {} cells for grid size {}, found {}",
                side * side,
                grid_size,
                codes.len()
            )));
        }

        let cells = codes
            .iter()
            .map(|&code| {
                Stone::from_code(code)
                    .ok_or_else(|| EngineError::CorruptState(format!("invalid cell code {}", code)))
            })
            .collect::<Result<Vec<_>>>()?;

        let board = Self { grid_size, cells };
        if board.cells_on_border() != Board::new(grid_size).cells_on_border() {
            return Err(EngineError::CorruptState("sentinel border is damaged".into()));
        }
        Ok(board)
    }

    fn cells_on_border(&self) -> Vec<Stone> {
        let side = self.side();
        (0..side * side)
            .filter(|&i| !self.is_interior(self.cell_at(i)))
            .map(|i| self.cells[i])
            .collect()
    }

    // ------------------------------------------------------------------------
    // Game result
    // ------------------------------------------------------------------------

    /// Colour whose chain joins its two border edges, if any
    pub fn winner(&self) -> Option<Stone> {
        [Stone::Red, Stone::Blue]
            .into_iter()
            .find(|&stone| self.edges_joined(stone))
    }

    /// Flood fill from the colour's first border to its second.
    fn edges_joined(&self, stone: Stone) -> bool {
        let last = self.side() - 1;
        let start = match stone {
            Stone::Red => Cell::new(1, 0),
            Stone::Blue => Cell::new(0, 1),
            Stone::Empty => return false,
        };
        let reached_goal = |cell: Cell| match stone {
            Stone::Red => cell.col == last,
            _ => cell.row == last,
        };

        let mut visited = vec![false; self.cells.len()];
        let mut stack = vec![start];
        visited[self.index(start)] = true;

        while let Some(cell) = stack.pop() {
            if reached_goal(cell) {
                return true;
            }
            for next in self.neighbors(cell) {
                let index = self.index(next);
                if !visited[index] && self.cells[index] == stone {
                    visited[index] = true;
                    stack.push(next);
                }
            }
        }
        false
    }
}

/// Interior rendered as a slanted rhombus. Each row sits half a cell left of
/// the one above, so `(r + 1, c)` and `(r + 1, c + 1)` appear under `(r, c)`.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 1..=self.grid_size {
            write!(f, "{:indent$}", "", indent = self.grid_size - row)?;
            for col in 1..=self.grid_size {
                let ch = match self.get(Cell::new(row, col)) {
                    Stone::Empty => '.',
                    Stone::Red => 'R',
                    Stone::Blue => 'B',
                };
                write!(f, "{} ", ch)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
