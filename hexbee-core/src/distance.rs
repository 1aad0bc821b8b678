//! Two-distance propagation
//!
//! Each colour gets two fields, one per target edge. A cell's two-distance is
//! one more than the *second* smallest value among its virtual neighbours:
//! a single cheap neighbour can be blocked, two cannot.
//!
//! Fields are seeded at the two empty corners flanking the target edge and
//! filled by repeated in-place passes until a pass assigns nothing. A cell is
//! assigned at most once, so the scan order is part of the result.

use crate::board::{Board, Cell, Stone};
use crate::connectivity::Connectivity;

/// Value of a cell no relaxation has reached
pub const UNREACHED: i32 = 100_000;

/// Second-smallest neighbour values at or above this do not propagate
const REACH_LIMIT: i32 = 100;

// ============================================================================
// FIELD SELECTION
// ============================================================================

/// One (colour, target edge) pair
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    /// Red toward the left edge
    RedFirst,
    /// Red toward the right edge
    RedSecond,
    /// Blue toward the top edge
    BlueFirst,
    /// Blue toward the bottom edge
    BlueSecond,
}

impl Field {
    pub const ALL: [Field; 4] = [
        Field::RedFirst,
        Field::RedSecond,
        Field::BlueFirst,
        Field::BlueSecond,
    ];

    pub fn colour(self) -> Stone {
        match self {
            Field::RedFirst | Field::RedSecond => Stone::Red,
            Field::BlueFirst | Field::BlueSecond => Stone::Blue,
        }
    }

    /// The two corners flanking the target edge
    fn seeds(self, side: usize) -> [Cell; 2] {
        let last = side - 1;
        match self {
            Field::RedFirst => [Cell::new(0, 0), Cell::new(last, 0)],
            Field::RedSecond => [Cell::new(0, last), Cell::new(last, last)],
            Field::BlueFirst => [Cell::new(0, 0), Cell::new(0, last)],
            Field::BlueSecond => [Cell::new(last, 0), Cell::new(last, last)],
        }
    }

    /// Flat indices of the interior in visiting order for one relaxation pass
    fn scan_order(self, side: usize) -> Vec<usize> {
        let n = side - 2;
        // Outer loop position i -> line, ascending or descending
        let line = |i: usize, descending: bool| if descending { n - i } else { i + 1 };
        let mut order = Vec::with_capacity(n * n);

        for i in 0..n {
            for j in 1..=n {
                let index = match self {
                    Field::RedFirst => j * side + line(i, false),
                    Field::RedSecond => j * side + line(i, true),
                    Field::BlueFirst => (i + 1) * side + line(j - 1, false),
                    Field::BlueSecond => (i + 1) * side + line(j - 1, true),
                };
                order.push(index);
            }
        }
        order
    }
}

// ============================================================================
// DISTANCE FIELD
// ============================================================================

/// Two-distance values over the padded board
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistanceField {
    side: usize,
    values: Vec<i32>,
}

impl DistanceField {
    /// Propagate one field to its fixed point
    pub fn propagate(board: &Board, graph: &Connectivity, field: Field) -> Self {
        let side = board.side();
        let mut values = vec![UNREACHED; side * side];
        for seed in field.seeds(side) {
            values[board.index(seed)] = 0;
        }

        let colour = field.colour();
        let order = field.scan_order(side);

        let mut changed = true;
        while changed {
            changed = false;
            for &index in &order {
                if values[index] != UNREACHED || !board.at(index).is_empty() {
                    continue;
                }
                let (_, second) = two_smallest(
                    graph.neighbors(index, colour).iter().map(|&n| values[n]),
                );
                if second < REACH_LIMIT {
                    values[index] = second + 1;
                    changed = true;
                }
            }
        }

        Self { side, values }
    }

    pub fn get(&self, cell: Cell) -> i32 {
        self.values[cell.row * self.side + cell.col]
    }

    pub fn at(&self, index: usize) -> i32 {
        self.values[index]
    }
}

/// Smallest and second-smallest values, `UNREACHED` when missing
fn two_smallest(values: impl Iterator<Item = i32>) -> (i32, i32) {
    let mut min = UNREACHED;
    let mut second = UNREACHED;
    for value in values {
        if value < second {
            second = value;
            if value < min {
                second = min;
                min = value;
            }
        }
    }
    (min, second)
}

// ============================================================================
// ALL FOUR FIELDS
// ============================================================================

/// The four fields for one board
#[derive(Clone, Debug)]
pub struct DistanceFields {
    pub red_first: DistanceField,
    pub red_second: DistanceField,
    pub blue_first: DistanceField,
    pub blue_second: DistanceField,
}

impl DistanceFields {
    /// Build connectivity and run all four propagations
    pub fn compute(board: &Board) -> Self {
        let graph = Connectivity::build(board);
        Self::with_graph(board, &graph)
    }

    pub fn with_graph(board: &Board, graph: &Connectivity) -> Self {
        Self {
            red_first: DistanceField::propagate(board, graph, Field::RedFirst),
            red_second: DistanceField::propagate(board, graph, Field::RedSecond),
            blue_first: DistanceField::propagate(board, graph, Field::BlueFirst),
            blue_second: DistanceField::propagate(board, graph, Field::BlueSecond),
        }
    }

    /// Sum of a colour's two fields at `index`
    pub fn colour_sum(&self, colour: Stone, index: usize) -> i32 {
        match colour {
            Stone::Red => self.red_first.at(index) + self.red_second.at(index),
            Stone::Blue => self.blue_first.at(index) + self.blue_second.at(index),
            Stone::Empty => 2 * UNREACHED,
        }
    }

    /// Sum of all four fields at `index`
    pub fn total(&self, index: usize) -> i32 {
        self.colour_sum(Stone::Red, index) + self.colour_sum(Stone::Blue, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_smallest() {
        assert_eq!(two_smallest([5, 3, 9, 3].into_iter()), (3, 3));
        assert_eq!(two_smallest([7].into_iter()), (7, UNREACHED));
        assert_eq!(two_smallest(std::iter::empty()), (UNREACHED, UNREACHED));
        assert_eq!(two_smallest([4, 1, 2].into_iter()), (1, 2));
    }

    #[test]
    fn test_scan_order_covers_interior() {
        for field in Field::ALL {
            let order = field.scan_order(6);
            assert_eq!(order.len(), 16);
        }
        let board = Board::new(3);
        let at = |row, col| board.index(Cell::new(row, col));
        assert_eq!(Field::RedSecond.scan_order(5)[0], at(1, 3));
        assert_eq!(Field::RedSecond.scan_order(5)[1], at(2, 3));
        assert_eq!(Field::BlueSecond.scan_order(5)[0], at(1, 3));
        assert_eq!(Field::BlueSecond.scan_order(5)[1], at(1, 2));
        assert_eq!(Field::BlueFirst.scan_order(5)[1], at(1, 2));
        assert_eq!(Field::RedFirst.scan_order(5)[1], at(2, 1));
    }

    #[test]
    fn test_edge_cells_are_one_from_their_edge() {
        let board = Board::new(5);
        let fields = DistanceFields::compute(&board);
        for row in 1..=5 {
            assert_eq!(fields.red_first.get(Cell::new(row, 1)), 1);
            assert_eq!(fields.red_second.get(Cell::new(row, 5)), 1);
        }
        for col in 1..=5 {
            assert_eq!(fields.blue_first.get(Cell::new(1, col)), 1);
            assert_eq!(fields.blue_second.get(Cell::new(5, col)), 1);
        }
    }

    #[test]
    fn test_empty_board_fully_reached() {
        let board = Board::new(7);
        let fields = DistanceFields::compute(&board);
        for cell in board.interior_cells() {
            let index = board.index(cell);
            assert!(fields.total(index) < 4 * REACH_LIMIT, "{:?} unreached", cell);
        }
    }

    #[test]
    fn test_full_board_all_unreached() {
        let mut board = Board::new(3);
        let cells: Vec<Cell> = board.interior_cells().collect();
        for (i, cell) in cells.into_iter().enumerate() {
            board.set(cell, if i % 2 == 0 { Stone::Red } else { Stone::Blue });
        }
        let fields = DistanceFields::compute(&board);
        for cell in board.interior_cells() {
            assert_eq!(fields.red_first.get(cell), UNREACHED);
            assert_eq!(fields.blue_second.get(cell), UNREACHED);
        }
    }

    #[test]
    fn test_wall_blocks_crossing() {
        let mut board = Board::new(3);
        for col in 1..=3 {
            board.set(Cell::new(2, col), Stone::Red);
        }
        let fields = DistanceFields::compute(&board);
        // Blue from the top cannot get below the wall
        for col in 1..=3 {
            assert_eq!(fields.blue_first.get(Cell::new(1, col)), 1);
            assert_eq!(fields.blue_first.get(Cell::new(3, col)), UNREACHED);
            assert_eq!(fields.blue_second.get(Cell::new(1, col)), UNREACHED);
        }
    }

    #[test]
    fn test_chain_shortens_distance() {
        let mut open = Board::new(5);
        let plain = DistanceFields::compute(&open);
        let far = Cell::new(3, 4);
        let before = plain.red_first.get(far);

        for col in 1..=3 {
            open.set(Cell::new(3, col), Stone::Red);
        }
        let chained = DistanceFields::compute(&open);
        assert_eq!(chained.red_first.get(far), 1);
        assert!(before > 1);
    }
}
