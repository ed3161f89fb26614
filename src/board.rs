use itertools::Itertools;

/// A [Board] is an N×N sudoku board divided into rectangular blocks of
/// `block_rows` x `block_cols` cells, where N = `block_rows * block_cols`.
/// Each cell holds a value in 0..=N where 0 means the cell is empty.
///
/// The board keeps a live conflict relation: whenever two neighboring cells
/// hold the same non-empty value, each records the other in its conflict set.
/// The relation is maintained incrementally by [Board::set_value], the single
/// mutation entry point, so the running `errors_count` and per-cell erroneous
/// state are always O(1) reads.
#[derive(Clone, Debug)]
pub struct Board {
    block_rows: usize,
    block_cols: usize,
    dim: usize,
    cells: Vec<Cell>,
    // One entry per cell: indices of all cells sharing its row, column or
    // block, self excluded, deduplicated across the three relations.
    // The topology is static, so this is computed once at construction.
    neighbors: Vec<Vec<usize>>,
    empty_count: usize,
    errors_count: usize,
    solved: bool,
}

#[derive(Clone, Debug)]
struct Cell {
    value: u8,
    fixed: bool,
    // Indices of neighbors currently holding the same non-empty value.
    // Non-empty iff the cell is erroneous.
    conflicts: Vec<usize>,
}

fn neighbor_indices(block_rows: usize, block_cols: usize, row: usize, col: usize) -> Vec<usize> {
    let dim = block_rows * block_cols;
    let block_row_start = row - row % block_rows;
    let block_col_start = col - col % block_cols;
    let row_cells = (0..dim).map(|c| (row, c));
    let col_cells = (0..dim).map(|r| (r, col));
    let block_cells = (block_row_start..block_row_start + block_rows)
        .cartesian_product(block_col_start..block_col_start + block_cols);
    row_cells
        .chain(col_cells)
        .chain(block_cells)
        .filter(|&cell| cell != (row, col))
        .unique()
        .map(|(r, c)| r * dim + c)
        .collect()
}

impl Board {
    /// Creates an empty board with the given block dimensions.
    pub fn new(block_rows: usize, block_cols: usize) -> Self {
        assert!(block_rows > 0 && block_cols > 0);
        let dim = block_rows * block_cols;
        assert!(
            dim <= usize::from(u8::MAX),
            "board dimension must fit in a cell value"
        );

        let cells = vec![
            Cell {
                value: 0,
                fixed: false,
                conflicts: Vec::new(),
            };
            dim * dim
        ];
        let neighbors = (0..dim)
            .cartesian_product(0..dim)
            .map(|(row, col)| neighbor_indices(block_rows, block_cols, row, col))
            .collect();

        Board {
            block_rows,
            block_cols,
            dim,
            cells,
            neighbors,
            empty_count: dim * dim,
            errors_count: 0,
            solved: false,
        }
    }

    /// Builds a board by replaying [Board::set_value] over a row-major grid
    /// of values. Entry point for external loaders; combine with
    /// [Board::fix_all_non_empty] to treat the loaded values as givens.
    pub fn from_values(block_rows: usize, block_cols: usize, values: &[u8]) -> Self {
        let mut board = Board::new(block_rows, block_cols);
        assert_eq!(values.len(), board.dim * board.dim);
        for (i, &value) in values.iter().enumerate() {
            if value != 0 {
                board.set_value(i / board.dim, i % board.dim, value);
            }
        }
        board
    }

    fn index(&self, row: usize, col: usize) -> usize {
        assert!(row < self.dim && col < self.dim);
        row * self.dim + col
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn block_rows(&self) -> usize {
        self.block_rows
    }

    pub fn block_cols(&self) -> usize {
        self.block_cols
    }

    pub fn value(&self, row: usize, col: usize) -> u8 {
        self.cells[self.index(row, col)].value
    }

    pub fn is_cell_empty(&self, row: usize, col: usize) -> bool {
        self.value(row, col) == 0
    }

    pub fn is_cell_fixed(&self, row: usize, col: usize) -> bool {
        self.cells[self.index(row, col)].fixed
    }

    pub fn is_cell_erroneous(&self, row: usize, col: usize) -> bool {
        !self.cells[self.index(row, col)].conflicts.is_empty()
    }

    pub fn is_erroneous(&self) -> bool {
        self.errors_count != 0
    }

    pub fn empty_count(&self) -> usize {
        self.empty_count
    }

    pub fn errors_count(&self) -> usize {
        self.errors_count
    }

    pub fn solved(&self) -> bool {
        self.solved
    }

    pub fn set_solved(&mut self, solved: bool) {
        self.solved = solved;
    }

    /// The positions sharing this cell's row, column or block.
    pub fn neighbors(&self, row: usize, col: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        let dim = self.dim;
        self.neighbors[self.index(row, col)]
            .iter()
            .map(move |&i| (i / dim, i % dim))
    }

    /// The positions currently conflicting with this cell.
    pub fn conflicting(&self, row: usize, col: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        let dim = self.dim;
        self.cells[self.index(row, col)]
            .conflicts
            .iter()
            .map(move |&i| (i / dim, i % dim))
    }

    /// Sets the value of a cell (0 clears it) and updates the conflict
    /// relation incrementally: neighbors holding the new value gain a mutual
    /// conflict with this cell, neighbors holding the vacated value lose
    /// theirs. Conflicts are never registered on a fixed cell.
    pub fn set_value(&mut self, row: usize, col: usize, value: u8) {
        assert!(usize::from(value) <= self.dim, "value out of range");
        let index = self.index(row, col);
        let prev = self.cells[index].value;

        // no action needed, the value didn't change
        if prev == value {
            return;
        }

        for i in 0..self.neighbors[index].len() {
            let neighbor = self.neighbors[index][i];
            let neighbor_value = self.cells[neighbor].value;
            if neighbor_value == 0 {
                // conflicts are not relevant for empty cells
            } else if neighbor_value == value {
                self.add_conflict(index, neighbor);
                self.add_conflict(neighbor, index);
            } else if neighbor_value == prev {
                self.remove_conflict(index, neighbor);
                self.remove_conflict(neighbor, index);
            }
        }

        if value == 0 {
            self.empty_count += 1;
        } else if prev == 0 {
            self.empty_count -= 1;
        }
        self.cells[index].value = value;
    }

    fn add_conflict(&mut self, cell: usize, other: usize) {
        // fixed cells are never erroneous
        if self.cells[cell].fixed {
            return;
        }

        if self.cells[cell].conflicts.is_empty() {
            self.errors_count += 1;
        }
        self.cells[cell].conflicts.push(other);
    }

    fn remove_conflict(&mut self, cell: usize, other: usize) {
        let conflicts = &mut self.cells[cell].conflicts;
        let had_conflicts = !conflicts.is_empty();

        if let Some(position) = conflicts.iter().position(|&c| c == other) {
            conflicts.swap_remove(position);
        }

        if had_conflicts && self.cells[cell].conflicts.is_empty() {
            self.errors_count -= 1;
        }
    }

    /// Marks a cell as fixed. Fails without mutating if any cell currently
    /// conflicting with it is itself fixed: a board must never end up with
    /// two mutually conflicting fixed cells.
    pub fn fix_cell(&mut self, row: usize, col: usize) -> bool {
        let index = self.index(row, col);
        if self.cells[index]
            .conflicts
            .iter()
            .any(|&c| self.cells[c].fixed)
        {
            return false;
        }

        self.cells[index].fixed = true;
        true
    }

    /// Fixes every non-empty cell, e.g. to treat a loaded puzzle's values as
    /// givens. Stops at the first cell whose fix would pair two conflicting
    /// fixed cells and returns false, leaving earlier fixes in place.
    pub fn fix_all_non_empty(&mut self) -> bool {
        for row in 0..self.dim {
            for col in 0..self.dim {
                if !self.is_cell_empty(row, col) && !self.fix_cell(row, col) {
                    return false;
                }
            }
        }
        true
    }

    /// Whether placing `value` into this cell would produce no conflict.
    pub fn is_value_legal(&self, row: usize, col: usize, value: u8) -> bool {
        debug_assert!(value != 0);
        let index = self.index(row, col);
        self.neighbors[index]
            .iter()
            .all(|&n| self.cells[n].value != value)
    }

    /// The values that can be placed into this cell without conflicting with
    /// any neighbor, in increasing order.
    pub fn legal_values(&self, row: usize, col: usize) -> impl Iterator<Item = u8> + '_ {
        (1..=self.dim as u8).filter(move |&v| self.is_value_legal(row, col, v))
    }
}
