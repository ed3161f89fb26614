use itertools::Itertools;
use log::trace;

use crate::board::Board;
use crate::history::{Change, History};

mod candidates;
use candidates::Candidates;

// The conflict sets can't be trusted for this check: registration is
// suppressed on fixed cells, so a board can hold a hidden contradiction with
// errors_count == 0. Scan the values directly.
fn has_contradiction(board: &Board) -> bool {
    let dim = board.dim();
    for row in 0..dim {
        for col in 0..dim {
            let value = board.value(row, col);
            if value != 0
                && board
                    .neighbors(row, col)
                    .any(|(r, c)| board.value(r, c) == value)
            {
                return true;
            }
        }
    }
    false
}

fn first_empty_cell(board: &Board) -> Option<(usize, usize)> {
    let dim = board.dim();
    (0..dim)
        .cartesian_product(0..dim)
        .find(|&(row, col)| board.is_cell_empty(row, col))
}

/// Runs the exhaustive search on a private copy of the board and returns the
/// first full solution found, if any. The caller's board is never mutated.
pub(crate) fn find_solution(board: &Board) -> Option<Board> {
    if has_contradiction(board) {
        return None;
    }

    let mut work = board.clone();
    let candidates = Candidates::from_board(&work);
    if search_first(&mut work, &candidates) {
        Some(work)
    } else {
        None
    }
}

// Depth-first over empty cells in position order, candidate values in
// increasing order.
//
// Invariant: when `search_first` returns false, `work` is unchanged; any
// trial assignment has been undone. On success the solution is left in
// place.
fn search_first(work: &mut Board, candidates: &Candidates) -> bool {
    let Some((row, col)) = first_empty_cell(work) else {
        // No empty cells left, the board is fully solved
        return true;
    };

    for value in candidates.candidates_for(row, col) {
        work.set_value(row, col, value);
        debug_assert!(!work.is_erroneous());
        let mut next = candidates.clone();
        next.remove_conflicting(row, col, value);
        if search_first(work, &next) {
            return true;
        }

        // Undo the trial assignment before trying the next value
        work.set_value(row, col, 0);
    }

    false
}

/// Whether a full legal assignment of all empty cells exists.
pub fn is_solvable(board: &Board) -> bool {
    find_solution(board).is_some()
}

/// The value at (row, col) in some full solution of the board, or `None` if
/// the board is unsolvable. The hint operation.
pub fn cell_solution(board: &Board, row: usize, col: usize) -> Option<u8> {
    find_solution(board).map(|solution| solution.value(row, col))
}

/// Counts every full legal assignment reachable from the current partial
/// board. Unlike [is_solvable] this visits every branch; the exponential
/// worst case is the accepted cost of exact counting.
pub fn count_solutions(board: &Board) -> u64 {
    trace!(
        "counting solutions over {} empty cells",
        board.empty_count()
    );
    if has_contradiction(board) {
        return 0;
    }

    let mut work = board.clone();
    let candidates = Candidates::from_board(&work);
    search_count(&mut work, &candidates)
}

fn search_count(work: &mut Board, candidates: &Candidates) -> u64 {
    let Some((row, col)) = first_empty_cell(work) else {
        return 1;
    };

    let mut count = 0;
    for value in candidates.candidates_for(row, col) {
        work.set_value(row, col, value);
        let mut next = candidates.clone();
        next.remove_conflicting(row, col, value);
        count += search_count(work, &next);
        work.set_value(row, col, 0);
    }
    count
}

/// If exactly one legal value remains for the cell, returns it; `None` for
/// non-empty cells or cells with zero or several legal values. The cheap
/// deduction behind autofill; the full search is never invoked here.
pub fn obvious_value(board: &Board, row: usize, col: usize) -> Option<u8> {
    if !board.is_cell_empty(row, col) {
        return None;
    }

    let mut seen = vec![false; board.dim() + 1];
    for (r, c) in board.neighbors(row, col) {
        seen[usize::from(board.value(r, c))] = true;
    }

    let mut only = None;
    for value in 1..=board.dim() as u8 {
        if !seen[usize::from(value)] {
            if only.is_some() {
                // more than one legal value, nothing to deduce
                return None;
            }
            only = Some(value);
        }
    }
    only
}

/// Fills every cell whose value is forced by its current neighbors.
///
/// Deductions run against a frozen copy of the board, so cells filled
/// earlier in the scan don't enable further deductions within the same call.
/// All writes go through the caller's pending Move; the applied changes are
/// returned for display.
pub fn autofill(board: &mut Board, history: &mut History) -> Vec<Change> {
    let frozen = board.clone();
    let dim = frozen.dim();
    let mut applied = Vec::new();
    for row in 0..dim {
        for col in 0..dim {
            if let Some(value) = obvious_value(&frozen, row, col) {
                applied.push(history.make_change(board, row, col, value));
            }
        }
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solvable_9x9() -> Board {
        Board::from_values(
            3,
            3,
            &[
                0, 0, 4, 6, 8, 0, 0, 1, 9, //
                0, 0, 3, 0, 0, 9, 2, 0, 5, //
                0, 6, 0, 0, 0, 0, 0, 0, 4, //
                6, 0, 0, 0, 0, 0, 7, 0, 2, //
                0, 0, 0, 0, 0, 7, 0, 0, 0, //
                0, 0, 0, 9, 0, 0, 0, 0, 1, //
                8, 0, 0, 0, 5, 0, 0, 0, 7, //
                0, 4, 1, 3, 0, 8, 0, 0, 0, //
                0, 2, 0, 0, 9, 1, 0, 0, 0, //
            ],
        )
    }

    fn unsolvable_9x9() -> Board {
        // Same puzzle with an extra 2 in the middle row that kills it
        Board::from_values(
            3,
            3,
            &[
                0, 0, 4, 6, 8, 0, 0, 1, 9, //
                0, 0, 3, 0, 0, 9, 2, 0, 5, //
                0, 6, 0, 0, 0, 0, 0, 0, 4, //
                6, 0, 0, 0, 0, 0, 7, 0, 2, //
                0, 0, 0, 0, 2, 7, 0, 0, 0, //
                0, 0, 0, 9, 0, 0, 0, 0, 1, //
                8, 0, 0, 0, 5, 0, 0, 0, 7, //
                0, 4, 1, 3, 0, 8, 0, 0, 0, //
                0, 2, 0, 0, 9, 1, 0, 0, 0, //
            ],
        )
    }

    #[test]
    fn solvable_difficult() {
        let board = solvable_9x9();
        assert!(is_solvable(&board));
    }

    #[test]
    fn not_solvable_difficult() {
        let board = unsolvable_9x9();
        assert!(!is_solvable(&board));
        assert_eq!(None, cell_solution(&board, 0, 0));
    }

    #[test]
    fn is_solvable_does_not_mutate_the_board() {
        let board = solvable_9x9();
        let empty_before = board.empty_count();
        assert!(is_solvable(&board));
        assert_eq!(empty_before, board.empty_count());
        assert_eq!(0, board.value(0, 0));
    }

    #[test]
    fn cell_solution_matches_the_unique_completion() {
        // This puzzle has exactly one solution, so hints are deterministic
        let board = solvable_9x9();
        assert_eq!(1, count_solutions(&board));
        assert_eq!(Some(2), cell_solution(&board, 0, 0));
        assert_eq!(Some(7), cell_solution(&board, 0, 1));
        assert_eq!(Some(8), cell_solution(&board, 8, 8));
        assert_eq!(Some(1), cell_solution(&board, 4, 4));
    }

    #[test]
    fn count_solutions_of_empty_4x4_board() {
        // The number of 4x4 sudoku grids with 2x2 blocks
        let board = Board::new(2, 2);
        assert_eq!(288, count_solutions(&board));
    }

    #[test]
    fn count_solutions_counts_exhaustively() {
        let mut board = Board::new(2, 2);
        board.set_value(0, 0, 1);
        board.set_value(0, 1, 2);
        board.set_value(0, 2, 3);
        board.set_value(0, 3, 4);
        // Fixing the first row of a 4x4 grid leaves 12 completions
        assert_eq!(12, count_solutions(&board));
    }

    #[test]
    fn count_solutions_is_zero_for_contradictions() {
        let mut board = Board::new(2, 2);
        board.set_value(0, 0, 1);
        board.set_value(0, 1, 1);
        assert_eq!(0, count_solutions(&board));
    }

    #[test]
    fn two_fixed_cells_with_equal_values_are_unsolvable() {
        // Fixing empty cells first and setting their values afterwards
        // suppresses conflict registration on both, so the contradiction is
        // invisible to errors_count. The solver must still see it.
        let mut board = Board::new(2, 2);
        assert!(board.fix_cell(0, 0));
        assert!(board.fix_cell(0, 3));
        board.set_value(0, 0, 2);
        board.set_value(0, 3, 2);
        assert_eq!(0, board.errors_count());

        assert!(!is_solvable(&board));
        assert_eq!(None, cell_solution(&board, 1, 0));
        assert_eq!(0, count_solutions(&board));
    }

    #[test]
    fn obvious_value_requires_a_unique_candidate() {
        let mut board = Board::new(2, 2);
        board.set_value(0, 1, 2);
        board.set_value(1, 0, 3);
        board.set_value(1, 1, 4);
        // (0, 0) sees 2, 3 and 4, leaving only 1
        assert_eq!(Some(1), obvious_value(&board, 0, 0));
        // (0, 2) only sees the 2 in its row, so three values remain
        assert_eq!(None, obvious_value(&board, 0, 2));
        // filled cells are never deduced
        assert_eq!(None, obvious_value(&board, 0, 1));
    }

    #[test]
    fn autofill_applies_forced_cells_through_the_history() {
        let mut board = Board::from_values(
            2,
            2,
            &[
                0, 2, 3, 4, //
                3, 4, 0, 2, //
                2, 1, 4, 3, //
                4, 3, 2, 0, //
            ],
        );
        let mut history = History::new();
        history.new_move();

        let applied = autofill(&mut board, &mut history);
        assert_eq!(3, applied.len());
        assert_eq!(1, board.value(0, 0));
        assert_eq!(1, board.value(1, 2));
        assert_eq!(1, board.value(3, 3));
        assert_eq!(0, board.empty_count());

        // the whole autofill is one undoable move
        history.undo(&mut board);
        assert_eq!(3, board.empty_count());
    }

    #[test]
    fn autofill_deduces_against_the_pre_autofill_state() {
        // (0, 3) is forced to 4. Filling it would force (1, 3) to 1, but
        // deductions are frozen at call time, so (1, 3) stays empty.
        let mut board = Board::from_values(
            2,
            2,
            &[
                1, 2, 3, 0, //
                0, 0, 0, 0, //
                0, 0, 0, 2, //
                0, 0, 0, 3, //
            ],
        );
        let mut history = History::new();
        history.new_move();

        let applied = autofill(&mut board, &mut history);
        assert_eq!(1, applied.len());
        assert_eq!((0, 3), (applied[0].row, applied[0].col));
        assert_eq!(4, board.value(0, 3));
        assert!(board.is_cell_empty(1, 3));
    }
}
