//! Solve a hard(ish) standard 9x9 Sudoku from its givens string.

use cellmate::constraints::Uniqueness;
use cellmate::Puzzle;

fn print_grid(solution: &[i32]) {
    println!("+---+---+---+");
    for row in 0..9 {
        print!("|");
        for col in 0..9 {
            print!("{}", solution[9 * row + col]);
            if col % 3 == 2 {
                print!("|");
            }
        }
        println!();
        if row % 3 == 2 {
            println!("+---+---+---+");
        }
    }
}

fn main() {
    println!("Solving a sudoku.");
    println!();

    let mut puzzle = Puzzle::new(81, 1, 9).unwrap();

    // Each row, column and box holds each digit once.
    for row in 0..9 {
        puzzle
            .add_constraint(Uniqueness::new(9 * row..9 * row + 9))
            .unwrap();
    }
    for col in 0..9 {
        puzzle
            .add_constraint(Uniqueness::new((0..9).map(|row| 9 * row + col)))
            .unwrap();
    }
    for box_y in 0..3 {
        for box_x in 0..3 {
            let mut cells = Vec::new();
            for y in 0..3 {
                for x in 0..3 {
                    cells.push((3 * box_y + y) * 9 + 3 * box_x + x);
                }
            }
            puzzle.add_constraint(Uniqueness::new(cells)).unwrap();
        }
    }

    puzzle
        .add_givens(
            "3...5...8.9..7.5.....8.41...2.7.....5...28..47.....6...6....8....2...9.1.1.9.5...",
        )
        .unwrap();

    for solution in puzzle.solve() {
        print_grid(&solution);
    }
}
