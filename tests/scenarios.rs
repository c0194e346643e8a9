//! End-to-end scenarios: whole puzzles solved through the public API.

use cellmate::constraints::{
    CellPred, Given, LessThan, ParityEvenness, ParityNoTriplets, ParityUniqueRowsColumns, Sum,
    Uniqueness,
};
use cellmate::{parse, Puzzle, SolverInstructions};

/// Rows, columns and boxes of a standard 9x9 Sudoku.
fn sudoku_base() -> Puzzle {
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
    puzzle
}

const SUDOKU_GIVENS: &str =
    "3...5...8.9..7.5.....8.41...2.7.....5...28..47.....6...6....8....2...9.1.1.9.5...";

const SUDOKU_SOLUTION: [i32; 81] = [
    3, 4, 6, 1, 5, 9, 2, 7, 8, //
    1, 9, 8, 2, 7, 6, 5, 4, 3, //
    2, 7, 5, 8, 3, 4, 1, 9, 6, //
    6, 2, 4, 7, 9, 1, 3, 8, 5, //
    5, 3, 9, 6, 2, 8, 7, 1, 4, //
    7, 8, 1, 5, 4, 3, 6, 2, 9, //
    9, 6, 3, 4, 1, 2, 8, 5, 7, //
    4, 5, 2, 3, 8, 7, 9, 6, 1, //
    8, 1, 7, 9, 6, 5, 4, 3, 2, //
];

#[test]
fn standard_sudoku_has_its_known_unique_solution() {
    let mut puzzle = sudoku_base();
    puzzle.add_givens(SUDOKU_GIVENS).unwrap();

    let solutions: Vec<Vec<i32>> = puzzle.solve().collect();
    assert_eq!(solutions.len(), 1);
    assert_eq!(solutions[0], SUDOKU_SOLUTION);
}

#[test]
fn thermometer_sudoku_is_unique() {
    // Thermometers and a reduced givens set that still pin down the same
    // grid as the plain sudoku above.
    let mut puzzle = sudoku_base();
    for thermometer in [
        "A2,A3,A4",
        "D1,E1,F1",
        "B4,C4,D4,E4",
        "H5,H6,H7,H8",
        "E7,F7,G7",
        "C8,D8,E8",
    ] {
        let cells = parse::coordinates(thermometer, 9).unwrap();
        puzzle.add_constraint(LessThan::new(cells)).unwrap();
    }
    puzzle
        .add_givens(
            "3.......8.9..7.5.......41...........5...28..47.....6...6....8....2.........9.5...",
        )
        .unwrap();

    let solutions: Vec<Vec<i32>> = puzzle.solve().collect();
    assert_eq!(solutions.len(), 1);
    assert_eq!(solutions[0], SUDOKU_SOLUTION);
}

#[test]
fn sum_cages_alone_can_pin_a_grid() {
    // 2x2 grid, values 1..=4, no uniqueness, no givens; the four sums
    // leave exactly one assignment.
    let mut puzzle = Puzzle::new(4, 1, 4).unwrap();
    puzzle.add_constraint(Sum::new(3, [0, 1])).unwrap();
    puzzle.add_constraint(Sum::new(7, [2, 3])).unwrap();
    puzzle.add_constraint(Sum::new(4, [0, 2])).unwrap();
    puzzle.add_constraint(Sum::new(6, [1, 3])).unwrap();

    let solutions: Vec<Vec<i32>> = puzzle.solve().collect();
    assert_eq!(solutions, [[1, 2, 3, 4]]);
}

#[test]
fn shared_parity_cells_have_two_solutions() {
    // Two cells that must share a parity, values 1..=2: all-odd and
    // all-even.
    let mut puzzle = Puzzle::new(2, 1, 2).unwrap();
    puzzle
        .add_constraint(CellPred::new([0, 1], |[a, b]| a % 2 == b % 2))
        .unwrap();

    let solutions: Vec<Vec<i32>> = puzzle.solve().collect();
    assert_eq!(solutions, [[1, 1], [2, 2]]);
}

#[test]
fn binairo_completion_is_forced() {
    // 4x4 binairo with the first three rows given; evenness forces the
    // last row cell by cell.
    let rows = [[0, 1, 0, 1], [1, 0, 1, 0], [0, 1, 1, 0]];
    let mut puzzle = Puzzle::new(16, 0, 1).unwrap();
    puzzle.add_constraint(ParityEvenness::new(4, 4)).unwrap();
    puzzle.add_constraint(ParityNoTriplets::new(4, 4)).unwrap();
    puzzle
        .add_constraint(ParityUniqueRowsColumns::new(4, 4))
        .unwrap();
    for (y, row) in rows.iter().enumerate() {
        for (x, &value) in row.iter().enumerate() {
            puzzle.add_constraint(Given::new(4 * y + x, value)).unwrap();
        }
    }

    let solutions: Vec<Vec<i32>> = puzzle.solve().collect();
    assert_eq!(solutions.len(), 1);
    assert_eq!(&solutions[0][12..], [1, 0, 0, 1]);
}

#[test]
fn degenerate_range_has_one_solution() {
    let puzzle = Puzzle::new(5, 7, 7).unwrap();
    let solutions: Vec<Vec<i32>> = puzzle.solve().collect();
    assert_eq!(solutions, [[7, 7, 7, 7, 7]]);
}

#[test]
fn unconstrained_puzzle_enumerates_the_whole_space() {
    let puzzle = Puzzle::new(3, 1, 3).unwrap();
    let solutions: Vec<Vec<i32>> = puzzle.solve().collect();
    assert_eq!(solutions.len(), 27);
    assert_eq!(solutions[0], [1, 1, 1]);
    assert_eq!(solutions[26], [3, 3, 3]);
}

#[test]
fn zero_cells_yield_the_empty_solution_once() {
    let puzzle = Puzzle::new(0, 1, 9).unwrap();
    let solutions: Vec<Vec<i32>> = puzzle.solve().collect();
    assert_eq!(solutions, [Vec::<i32>::new()]);
}

#[test]
fn impossible_puzzles_yield_nothing() {
    let mut puzzle = Puzzle::new(2, 1, 1).unwrap();
    puzzle.add_constraint(Uniqueness::new([0, 1])).unwrap();
    assert_eq!(puzzle.solve().count(), 0);
}

#[test]
fn constraint_order_does_not_change_the_solution_set() {
    let order_a = {
        let mut puzzle = Puzzle::new(4, 1, 2).unwrap();
        puzzle.add_constraint(Uniqueness::new([0, 1])).unwrap();
        puzzle.add_constraint(Uniqueness::new([2, 3])).unwrap();
        puzzle.add_constraint(Uniqueness::new([0, 2])).unwrap();
        puzzle.add_constraint(Uniqueness::new([1, 3])).unwrap();
        puzzle
    };
    let order_b = {
        let mut puzzle = Puzzle::new(4, 1, 2).unwrap();
        puzzle.add_constraint(Uniqueness::new([1, 3])).unwrap();
        puzzle.add_constraint(Uniqueness::new([0, 2])).unwrap();
        puzzle.add_constraint(Uniqueness::new([2, 3])).unwrap();
        puzzle.add_constraint(Uniqueness::new([0, 1])).unwrap();
        puzzle
    };

    let mut solutions_a: Vec<Vec<i32>> = order_a.solve().collect();
    let mut solutions_b: Vec<Vec<i32>> = order_b.solve().collect();
    solutions_a.sort();
    solutions_b.sort();
    assert_eq!(solutions_a, solutions_b);
    assert_eq!(solutions_a.len(), 2);
}

#[test]
fn solving_is_repeatable_on_the_same_puzzle() {
    let mut puzzle = Puzzle::new(4, 1, 2).unwrap();
    puzzle.add_constraint(Uniqueness::new([0, 1])).unwrap();
    puzzle.add_constraint(Uniqueness::new([2, 3])).unwrap();

    let first: Vec<Vec<i32>> = puzzle.solve().collect();
    let second: Vec<Vec<i32>> = puzzle.solve().collect();
    assert_eq!(first, second);
}

#[test]
fn seeded_runs_are_reproducible_and_complete() {
    let puzzle = Puzzle::new(4, 1, 2).unwrap();

    let run = |seed| {
        let instructions = SolverInstructions {
            randomizer: Some(seed),
            ..SolverInstructions::default()
        };
        puzzle.solve_with(instructions).collect::<Vec<Vec<i32>>>()
    };
    assert_eq!(run(42), run(42));

    let mut seeded = run(7);
    let mut canonical: Vec<Vec<i32>> = puzzle.solve().collect();
    seeded.sort();
    canonical.sort();
    assert_eq!(seeded, canonical);
    assert_eq!(canonical.len(), 16);
}

#[test]
fn value_priority_is_tried_first() {
    let puzzle = Puzzle::new(1, 1, 3).unwrap();
    let instructions = SolverInstructions {
        value_priority: Some(2),
        ..SolverInstructions::default()
    };
    let solutions: Vec<Vec<i32>> = puzzle.solve_with(instructions).collect();
    assert_eq!(solutions, [[2], [1], [3]]);
}

#[test]
fn cell_priority_breaks_branching_ties() {
    let puzzle = Puzzle::new(2, 1, 2).unwrap();
    let instructions = SolverInstructions {
        cell_priority: vec![1],
        ..SolverInstructions::default()
    };
    // Branching on cell 1 first makes its value the slow axis.
    let solutions: Vec<Vec<i32>> = puzzle.solve_with(instructions).collect();
    assert_eq!(solutions, [[1, 1], [2, 1], [1, 2], [2, 2]]);
}

#[test]
fn lazy_enumeration_stops_where_the_caller_stops() {
    let puzzle = Puzzle::new(8, 1, 4).unwrap();
    // 4^8 solutions exist; only two are ever materialised.
    let two: Vec<Vec<i32>> = puzzle.solve().take(2).collect();
    assert_eq!(two.len(), 2);
    assert_ne!(two[0], two[1]);
}
