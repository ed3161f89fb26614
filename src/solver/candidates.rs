use bitvec::prelude::*;

use crate::board::Board;

/// Tracks which values are still possible for each cell during search.
///
/// Stores dim bits per cell. A set bit means the value is considered
/// possible; it may be more restrictive than the board itself after
/// eliminations, never more permissive. Cloned per search branch, so
/// backtracking restores earlier states for free.
#[derive(Clone)]
pub(crate) struct Candidates {
    block_rows: usize,
    block_cols: usize,
    dim: usize,
    values: BitVec,
}

impl Candidates {
    /// All values possible, then each filled cell's value eliminated from
    /// its row, column and block.
    pub(crate) fn from_board(board: &Board) -> Self {
        let dim = board.dim();
        let mut candidates = Candidates {
            block_rows: board.block_rows(),
            block_cols: board.block_cols(),
            dim,
            values: bitvec![1; dim * dim * dim],
        };
        for row in 0..dim {
            for col in 0..dim {
                let value = board.value(row, col);
                if value != 0 {
                    candidates.remove_conflicting(row, col, value);
                }
            }
        }
        candidates
    }

    fn index(&self, row: usize, col: usize, value: u8) -> usize {
        debug_assert!(value != 0 && usize::from(value) <= self.dim);
        (row * self.dim + col) * self.dim + usize::from(value) - 1
    }

    /// The still-possible values for a cell, in increasing order.
    pub(crate) fn candidates_for(&self, row: usize, col: usize) -> impl Iterator<Item = u8> + '_ {
        (1..=self.dim as u8).filter(move |&v| self.values[self.index(row, col, v)])
    }

    fn remove(&mut self, row: usize, col: usize, value: u8) {
        let index = self.index(row, col, value);
        self.values.set(index, false);
    }

    /// Eliminates `value` from every cell of the given cell's row, column
    /// and block (the cell itself included).
    pub(crate) fn remove_conflicting(&mut self, row: usize, col: usize, value: u8) {
        for c in 0..self.dim {
            self.remove(row, c, value);
        }
        for r in 0..self.dim {
            self.remove(r, col, value);
        }

        let block_row_start = row - row % self.block_rows;
        let block_col_start = col - col % self.block_cols;
        for r in block_row_start..block_row_start + self.block_rows {
            for c in block_col_start..block_col_start + self.block_cols {
                self.remove(r, c, value);
            }
        }
    }
}
