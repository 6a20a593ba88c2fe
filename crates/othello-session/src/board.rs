//! The local mirror of the authority's board.

use othello_protocol::{BOARD_SIZE, Board, Cell, Snapshot, empty_board};

/// The board and piece counts as last reported by the authority.
///
/// The mirror is only ever overwritten as a whole by [`BoardMirror::replace`].
/// Counts are stored exactly as received and never recomputed from the
/// grid: the authority is the source of truth for both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardMirror {
    grid: Board,
    black: u32,
    white: u32,
}

impl Default for BoardMirror {
    /// An all-empty board with zero counts, shown until the first snapshot.
    fn default() -> Self {
        Self {
            grid: empty_board(),
            black: 0,
            white: 0,
        }
    }
}

impl BoardMirror {
    /// Overwrites the grid and both counts. No diffing, no merging.
    pub fn replace(&mut self, grid: Board, black: u32, white: u32) {
        self.grid = grid;
        self.black = black;
        self.white = white;
    }

    /// Overwrites the mirror from a decoded snapshot.
    pub fn replace_from(&mut self, snapshot: &Snapshot) {
        self.replace(snapshot.board, snapshot.black, snapshot.white);
    }

    /// The full grid, indexed `grid[x][y]`.
    pub fn grid(&self) -> &Board {
        &self.grid
    }

    /// The cell at `(x, y)`, or `None` if outside the board.
    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        if x < BOARD_SIZE && y < BOARD_SIZE {
            Some(self.grid[x][y])
        } else {
            None
        }
    }

    /// Black's piece count as reported by the authority.
    pub fn black(&self) -> u32 {
        self.black
    }

    /// White's piece count as reported by the authority.
    pub fn white(&self) -> u32 {
        self.white
    }
}
