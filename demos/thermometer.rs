//! Solve a Thermometer Sudoku: the usual row/column/box rules plus chains
//! of cells that strictly increase from bulb to tip.

use cellmate::constraints::{LessThan, Uniqueness};
use cellmate::{parse, Puzzle};

const THERMOMETERS: &[&str] = &[
    "A2,A3,A4",
    "D1,E1,F1",
    "B4,C4,D4,E4",
    "H5,H6,H7,H8",
    "E7,F7,G7",
    "C8,D8,E8",
];

fn main() {
    println!("Solving a thermometer sudoku.");
    println!();

    let mut puzzle = Puzzle::new(81, 1, 9).unwrap();
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

    for thermometer in THERMOMETERS {
        let cells = parse::coordinates(thermometer, 9).unwrap();
        puzzle.add_constraint(LessThan::new(cells)).unwrap();
    }

    puzzle
        .add_givens(
            "3.......8.9..7.5.......41...........5...28..47.....6...6....8....2.........9.5...",
        )
        .unwrap();

    for solution in puzzle.solve() {
        for row in 0..9 {
            let line: Vec<String> = (0..9)
                .map(|col| solution[9 * row + col].to_string())
                .collect();
            println!("{}", line.join(" "));
        }
        println!();
    }
}
