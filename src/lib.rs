mod board;
mod generator;
mod guesser;
mod history;
mod solver;

pub use board::Board;
pub use generator::{
    generate_puzzle, generate_puzzle_with_attempts, GenerateError, DEFAULT_GENERATE_ATTEMPTS,
};
pub use guesser::{cell_scores, guess, GuessError};
pub use history::{Change, History, Move};
pub use solver::{autofill, cell_solution, count_solutions, is_solvable, obvious_value};
