use sudoku_engine::{generate_puzzle, Board, History};

fn main() {
    let mut board = Board::new(3, 3);
    let mut history = History::new();
    history.new_move();
    generate_puzzle(&mut board, &mut history, 25, 30).expect("puzzle generation failed");
    let givens = board.dim() * board.dim() - board.empty_count();
    println!("Generated a {}x{} puzzle with {} givens", board.dim(), board.dim(), givens);
}
