//! Solve a small Binairo: a 0/1 grid where every row and column is half
//! zeroes and half ones, no three equal cells run together, and no two
//! rows (or columns) repeat.

use cellmate::constraints::{
    Given, ParityEvenness, ParityNoTriplets, ParityUniqueRowsColumns,
};
use cellmate::Puzzle;

const SIZE: usize = 6;

fn main() {
    println!("Solving a {}x{} binairo.", SIZE, SIZE);
    println!();

    let mut puzzle = Puzzle::new(SIZE * SIZE, 0, 1).unwrap();
    puzzle
        .add_constraint(ParityEvenness::new(SIZE, SIZE))
        .unwrap();
    puzzle
        .add_constraint(ParityNoTriplets::new(SIZE, SIZE))
        .unwrap();
    puzzle
        .add_constraint(ParityUniqueRowsColumns::new(SIZE, SIZE))
        .unwrap();

    // A few clues; (row, col, value).
    let clues = [
        (0, 1, 1),
        (0, 4, 1),
        (1, 0, 0),
        (2, 2, 0),
        (2, 5, 1),
        (3, 1, 1),
        (4, 4, 0),
        (5, 0, 1),
        (5, 3, 1),
    ];
    for (row, col, value) in clues {
        puzzle
            .add_constraint(Given::new(row * SIZE + col, value))
            .unwrap();
    }

    match puzzle.solve().next() {
        Some(solution) => {
            for row in 0..SIZE {
                let line: Vec<String> = (0..SIZE)
                    .map(|col| solution[row * SIZE + col].to_string())
                    .collect();
                println!("{}", line.join(" "));
            }
        }
        None => println!("no solution"),
    }
}
