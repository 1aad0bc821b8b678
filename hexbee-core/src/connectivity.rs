//! Connectivity graph with chain adjacency
//!
//! For every empty cell and each colour, the set of empty cells it touches
//! either directly or through a connected group of that colour's stones.
//! An empty cell next to a Red group is Red-adjacent to every empty cell
//! bordering the whole group. Opposing stones block.
//!
//! The graph is rebuilt from scratch for each evaluation.

use crate::board::{Board, Cell, Stone};
use rustc_hash::FxHashSet;

/// Per-cell virtual neighbour lists, indexed by flat board index
#[derive(Clone, Debug)]
pub struct Connectivity {
    red: Vec<Vec<usize>>,
    blue: Vec<Vec<usize>>,
}

impl Connectivity {
    /// Build both colours' neighbour lists for every empty cell
    pub fn build(board: &Board) -> Self {
        let len = board.side() * board.side();
        let mut red = vec![Vec::new(); len];
        let mut blue = vec![Vec::new(); len];

        for index in 0..len {
            if !board.at(index).is_empty() {
                continue;
            }
            let cell = board.cell_at(index);
            red[index] = virtual_neighbors(board, cell, Stone::Red);
            blue[index] = virtual_neighbors(board, cell, Stone::Blue);
        }

        Self { red, blue }
    }

    /// Virtual neighbours of `index` for `colour`, sorted by index.
    /// Occupied cells have none.
    pub fn neighbors(&self, index: usize, colour: Stone) -> &[usize] {
        match colour {
            Stone::Red => &self.red[index],
            Stone::Blue => &self.blue[index],
            Stone::Empty => &[],
        }
    }
}

/// Empty cells reachable from `start` through at most one chain of
/// `colour` stones. `absorbed` keeps each stone from being walked twice.
fn virtual_neighbors(board: &Board, start: Cell, colour: Stone) -> Vec<usize> {
    let mut found = FxHashSet::default();
    let mut absorbed = FxHashSet::default();
    let mut stack = vec![start];

    while let Some(cell) = stack.pop() {
        for next in board.neighbors(cell) {
            let stone = board.get(next);
            let index = board.index(next);
            if stone.is_empty() {
                found.insert(index);
            } else if stone == colour && absorbed.insert(index) {
                stack.push(next);
            }
        }
    }

    found.remove(&board.index(start));
    let mut neighbors: Vec<usize> = found.into_iter().collect();
    neighbors.sort_unstable();
    neighbors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(board: &Board, indices: &[usize]) -> Vec<Cell> {
        indices.iter().map(|&i| board.cell_at(i)).collect()
    }

    #[test]
    fn test_open_cell_has_six_direct_neighbors() {
        let board = Board::new(5);
        let graph = Connectivity::build(&board);
        let index = board.index(Cell::new(3, 3));
        assert_eq!(graph.neighbors(index, Stone::Red).len(), 6);
        assert_eq!(graph.neighbors(index, Stone::Blue).len(), 6);
    }

    #[test]
    fn test_chain_extends_adjacency() {
        let mut board = Board::new(5);
        board.set(Cell::new(3, 2), Stone::Red);
        board.set(Cell::new(3, 3), Stone::Red);
        let graph = Connectivity::build(&board);

        let index = board.index(Cell::new(3, 1));
        let red = cells(&board, graph.neighbors(index, Stone::Red));
        // (3,4) borders the far end of the chain
        assert!(red.contains(&Cell::new(3, 4)));
        assert!(red.contains(&Cell::new(4, 4)));
        assert!(!red.contains(&Cell::new(2, 4)));
        assert!(!red.contains(&Cell::new(3, 1)));

        // Blue sees the Red chain as a wall
        let blue = cells(&board, graph.neighbors(index, Stone::Blue));
        assert!(!blue.contains(&Cell::new(3, 4)));
    }

    #[test]
    fn test_border_group_reaches_corners() {
        let board = Board::new(3);
        let graph = Connectivity::build(&board);
        let index = board.index(Cell::new(2, 1));

        let red = cells(&board, graph.neighbors(index, Stone::Red));
        assert!(red.contains(&Cell::new(0, 0)));
        assert!(red.contains(&Cell::new(4, 0)));
        assert!(red.contains(&Cell::new(1, 1)));
        assert!(red.contains(&Cell::new(3, 1)));

        let blue = cells(&board, graph.neighbors(index, Stone::Blue));
        assert!(!blue.contains(&Cell::new(0, 0)));
    }

    #[test]
    fn test_occupied_cells_have_no_neighbors() {
        let mut board = Board::new(3);
        board.set(Cell::new(2, 2), Stone::Blue);
        let graph = Connectivity::build(&board);
        let index = board.index(Cell::new(2, 2));
        assert!(graph.neighbors(index, Stone::Red).is_empty());
        assert!(graph.neighbors(index, Stone::Blue).is_empty());
    }

    #[test]
    fn test_ring_of_stones_terminates() {
        let mut board = Board::new(5);
        // Closed Red ring around (3,3)
        for &(r, c) in &[(2, 2), (2, 3), (3, 2), (3, 4), (4, 3), (4, 4)] {
            board.set(Cell::new(r, c), Stone::Red);
        }
        let graph = Connectivity::build(&board);
        let inner = board.index(Cell::new(3, 3));
        let red = cells(&board, graph.neighbors(inner, Stone::Red));
        assert!(!red.contains(&Cell::new(3, 3)));
        assert!(red.contains(&Cell::new(1, 3)));
        assert!(graph.neighbors(inner, Stone::Blue).is_empty());
    }
}
