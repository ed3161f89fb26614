use itertools::Itertools;
use log::debug;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use thiserror::Error;

use crate::board::Board;
use crate::history::History;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GuessError {
    #[error("no cell had a candidate value scoring above the threshold")]
    NothingAboveThreshold,
}

/// Score distribution over the possible values of a cell, derived from a
/// linear relaxation of the exact covering constraints: every candidate is
/// weighted by the fraction of its houses' remaining placements consistent
/// with putting it here, and the weights are normalized to sum to 1 across
/// the cell's legal values.
///
/// Index `v - 1` holds the score of value `v`. Illegal values score 0, as
/// does everything for a non-empty cell. A cell with exactly one legal value
/// scores exactly 1.0 for it.
pub fn cell_scores(board: &Board, row: usize, col: usize) -> Vec<f64> {
    let dim = board.dim();
    let mut scores = vec![0.0; dim];
    if !board.is_cell_empty(row, col) {
        return scores;
    }

    for value in board.legal_values(row, col) {
        scores[usize::from(value) - 1] = relaxation_weight(board, row, col, value);
    }

    let total: f64 = scores.iter().sum();
    if total > 0.0 {
        for score in &mut scores {
            *score /= total;
        }
    }
    scores
}

// Mean over the cell's three houses of 1 / (number of empty cells in the
// house that could legally take the value). The placement is legal at
// (row, col) itself, so every house admits at least one position.
fn relaxation_weight(board: &Board, row: usize, col: usize, value: u8) -> f64 {
    let dim = board.dim();
    let block_row_start = row - row % board.block_rows();
    let block_col_start = col - col % board.block_cols();

    let row_weight = house_weight(board, value, (0..dim).map(|c| (row, c)));
    let col_weight = house_weight(board, value, (0..dim).map(|r| (r, col)));
    let block_weight = house_weight(
        board,
        value,
        (block_row_start..block_row_start + board.block_rows())
            .cartesian_product(block_col_start..block_col_start + board.block_cols()),
    );
    (row_weight + col_weight + block_weight) / 3.0
}

fn house_weight(
    board: &Board,
    value: u8,
    cells: impl Iterator<Item = (usize, usize)>,
) -> f64 {
    let placements = cells
        .filter(|&(r, c)| board.is_cell_empty(r, c) && board.is_value_legal(r, c, value))
        .count();
    debug_assert!(placements > 0);
    1.0 / placements as f64
}

/// Guesses values for the board's empty cells: for each cell, samples among
/// the candidates whose score strictly exceeds `threshold`, weighted by
/// score, and commits the pick through the caller's pending Move.
///
/// Scores are recomputed against the current board as the scan proceeds, so
/// earlier guesses constrain later ones and every committed value is legal
/// at commit time. Fails without having mutated anything if no cell had a
/// candidate above the threshold; the caller then discards the pending Move.
pub fn guess(board: &mut Board, history: &mut History, threshold: f64) -> Result<(), GuessError> {
    guess_with_rng(board, history, threshold, &mut rand::thread_rng())
}

fn guess_with_rng<R: Rng>(
    board: &mut Board,
    history: &mut History,
    threshold: f64,
    rng: &mut R,
) -> Result<(), GuessError> {
    let dim = board.dim();
    let mut committed = 0usize;

    for (row, col) in (0..dim).cartesian_product(0..dim) {
        if !board.is_cell_empty(row, col) {
            continue;
        }

        let scores = cell_scores(board, row, col);
        let candidates: Vec<(u8, f64)> = scores
            .iter()
            .enumerate()
            .filter(|&(_, &score)| score > threshold && score > 0.0)
            .map(|(i, &score)| (i as u8 + 1, score))
            .collect();
        if candidates.is_empty() {
            continue;
        }

        let Ok(weights) = WeightedIndex::new(candidates.iter().map(|&(_, score)| score)) else {
            continue;
        };
        let (value, _) = candidates[weights.sample(rng)];
        history.make_change(board, row, col, value);
        committed += 1;
    }

    if committed == 0 {
        return Err(GuessError::NothingAboveThreshold);
    }
    debug!("guess committed {committed} cells");
    Ok(())
}
