use itertools::Itertools;
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::board::Board;
use crate::history::History;
use crate::solver::find_solution;

/// Number of whole-board attempts before generation gives up.
pub const DEFAULT_GENERATE_ATTEMPTS: usize = 200;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GenerateError {
    #[error("the maximum number of puzzle generation attempts was reached")]
    AttemptsExhausted,

    #[error("the board does not have {0} empty cells to fill")]
    TooFewEmptyCells(usize),
}

/// Generates a puzzle on the given board: fills `num_to_fill` randomly
/// chosen empty cells with random legal values, solves the rest, then clears
/// all but `num_to_leave` randomly chosen cells of the solution.
///
/// Attempts run against working copies; the surviving grid is applied to the
/// live board through the caller's pending Move, so the whole generation is
/// a single undoable action and a failure leaves the board untouched.
pub fn generate_puzzle(
    board: &mut Board,
    history: &mut History,
    num_to_fill: usize,
    num_to_leave: usize,
) -> Result<(), GenerateError> {
    generate_puzzle_with_attempts(board, history, num_to_fill, num_to_leave, DEFAULT_GENERATE_ATTEMPTS)
}

/// Like [generate_puzzle] with a caller-chosen number of attempts.
pub fn generate_puzzle_with_attempts(
    board: &mut Board,
    history: &mut History,
    num_to_fill: usize,
    num_to_leave: usize,
    attempts: usize,
) -> Result<(), GenerateError> {
    generate_with_rng(
        board,
        history,
        num_to_fill,
        num_to_leave,
        attempts,
        &mut rand::thread_rng(),
    )
}

fn generate_with_rng<R: Rng>(
    board: &mut Board,
    history: &mut History,
    num_to_fill: usize,
    num_to_leave: usize,
    attempts: usize,
    rng: &mut R,
) -> Result<(), GenerateError> {
    let dim = board.dim();
    let empty_cells: Vec<(usize, usize)> = (0..dim)
        .cartesian_product(0..dim)
        .filter(|&(row, col)| board.is_cell_empty(row, col))
        .collect();
    if num_to_fill > empty_cells.len() {
        return Err(GenerateError::TooFewEmptyCells(num_to_fill));
    }

    for attempt in 0..attempts {
        let Some(solution) = try_attempt(board, &empty_cells, num_to_fill, rng) else {
            debug!("generation attempt {attempt} hit a dead end, retrying");
            continue;
        };

        // keep `num_to_leave` random cells of the solution, clear the rest
        let mut cells: Vec<(usize, usize)> = (0..dim).cartesian_product(0..dim).collect();
        cells.shuffle(rng);
        let mut target = vec![0u8; dim * dim];
        for &(row, col) in cells.iter().take(num_to_leave) {
            target[row * dim + col] = solution.value(row, col);
        }

        // apply the diff against the live board as one batch of changes
        for (row, col) in (0..dim).cartesian_product(0..dim) {
            let value = target[row * dim + col];
            if board.value(row, col) != value {
                history.make_change(board, row, col, value);
            }
        }
        return Ok(());
    }

    Err(GenerateError::AttemptsExhausted)
}

// One fill-and-solve attempt against a working copy. None if a chosen cell
// ran out of legal values or the randomly filled board has no solution;
// either way the whole attempt is abandoned.
fn try_attempt<R: Rng>(
    board: &Board,
    empty_cells: &[(usize, usize)],
    num_to_fill: usize,
    rng: &mut R,
) -> Option<Board> {
    let mut work = board.clone();
    for &(row, col) in empty_cells.choose_multiple(rng, num_to_fill) {
        let legal: Vec<u8> = work.legal_values(row, col).collect();
        let &value = legal.choose(rng)?;
        work.set_value(row, col, value);
    }
    find_solution(&work)
}
