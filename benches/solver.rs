use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sudoku_engine::{count_solutions, is_solvable, Board};

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

fn not_solvable_9x9() -> Board {
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

fn solve_empty(c: &mut Criterion) {
    let board = Board::new(3, 3);
    c.bench_function("is_solvable empty", |b| {
        b.iter(|| is_solvable(black_box(&board)))
    });
}

fn solve_solvable(c: &mut Criterion) {
    let board = solvable_9x9();
    c.bench_function("is_solvable solvable", |b| {
        b.iter(|| is_solvable(black_box(&board)))
    });
}

fn solve_not_solvable(c: &mut Criterion) {
    let board = not_solvable_9x9();
    c.bench_function("is_solvable not-solvable", |b| {
        b.iter(|| is_solvable(black_box(&board)))
    });
}

fn count_4x4(c: &mut Criterion) {
    let board = Board::new(2, 2);
    c.bench_function("count_solutions empty 4x4", |b| {
        b.iter(|| count_solutions(black_box(&board)))
    });
}

criterion_group!(benches, solve_empty, solve_solvable, solve_not_solvable, count_4x4);
criterion_main!(benches);
