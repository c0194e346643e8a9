use super::grid::cell_at;
use super::{Constraint, ConstraintResult};
use crate::state::PuzzleState;

// The Binairo family: rules about the parity pattern of rows and columns.
// Values are reduced to even/odd, so 0/1 boards and full digit boards both
// work.

fn parity(value: i32) -> i32 {
    value.rem_euclid(2)
}

fn fixed_parity(state: &PuzzleState, cell: usize) -> Option<i32> {
    state.value(cell).map(parity)
}

fn eliminate_parity(state: &mut PuzzleState, cell: usize, p: i32) {
    state.mark_impossible_where(cell, |v| parity(v) == p);
}

fn rows_and_columns(width: usize, height: usize) -> Vec<Vec<usize>> {
    let mut lines = Vec::with_capacity(width + height);
    for y in 0..height {
        lines.push((0..width).map(|x| cell_at(x, y, width)).collect());
    }
    for x in 0..width {
        lines.push((0..height).map(|y| cell_at(x, y, width)).collect());
    }
    lines
}

/// No three consecutive cells of a row or column share a parity.
///
/// Two same-parity cells of any consecutive triple decide the third.
#[derive(Debug, Clone)]
pub struct ParityNoTriplets {
    width: usize,
    height: usize,
}

impl ParityNoTriplets {
    pub fn new(width: usize, height: usize) -> ParityNoTriplets {
        ParityNoTriplets { width, height }
    }
}

impl Constraint for ParityNoTriplets {
    fn name(&self) -> &'static str {
        "ParityNoTriplets"
    }

    fn process(&self, state: &mut PuzzleState) -> ConstraintResult {
        for line in rows_and_columns(self.width, self.height) {
            for triple in line.windows(3) {
                let parities = [
                    fixed_parity(state, triple[0]),
                    fixed_parity(state, triple[1]),
                    fixed_parity(state, triple[2]),
                ];
                for (a, b, rest) in [(0, 1, 2), (0, 2, 1), (1, 2, 0)] {
                    if let (Some(pa), Some(pb)) = (parities[a], parities[b]) {
                        if pa == pb {
                            eliminate_parity(state, triple[rest], pa);
                        }
                    }
                }
            }
        }
        ConstraintResult::Stands
    }
}

/// Every row and column holds as many even values as odd ones.
///
/// Requires an even width and height to be satisfiable; once one parity
/// fills its half of a line, the rest of the line flips to the other.
#[derive(Debug, Clone)]
pub struct ParityEvenness {
    width: usize,
    height: usize,
}

impl ParityEvenness {
    pub fn new(width: usize, height: usize) -> ParityEvenness {
        ParityEvenness { width, height }
    }
}

impl Constraint for ParityEvenness {
    fn name(&self) -> &'static str {
        "ParityEvenness"
    }

    fn process(&self, state: &mut PuzzleState) -> ConstraintResult {
        for line in rows_and_columns(self.width, self.height) {
            let half = line.len() / 2;
            for p in [0, 1] {
                let count = line
                    .iter()
                    .filter(|&&cell| fixed_parity(state, cell) == Some(p))
                    .count();
                if count > half {
                    return ConstraintResult::Violation;
                }
                if count == half {
                    for &cell in &line {
                        if state.value(cell).is_none() {
                            eliminate_parity(state, cell, p);
                        }
                    }
                }
            }
        }
        ConstraintResult::Stands
    }
}

/// No two rows share their parity pattern, and no two columns either.
///
/// A completed line rules its pattern out for every parallel line; a line
/// one cell short of matching gets that cell flipped.
#[derive(Debug, Clone)]
pub struct ParityUniqueRowsColumns {
    width: usize,
    height: usize,
}

impl ParityUniqueRowsColumns {
    pub fn new(width: usize, height: usize) -> ParityUniqueRowsColumns {
        ParityUniqueRowsColumns { width, height }
    }

    fn compare_lines(
        state: &mut PuzzleState,
        first: &[usize],
        second: &[usize],
    ) -> Result<(), ()> {
        let mut open = Vec::new();
        for (&a, &b) in first.iter().zip(second) {
            match (fixed_parity(state, a), fixed_parity(state, b)) {
                (Some(pa), Some(pb)) if pa != pb => return Ok(()),
                (Some(_), Some(_)) => {}
                _ => open.push((a, b)),
            }
        }
        match open.as_slice() {
            [] => Err(()),
            [(a, b)] => {
                // Whichever of the pair is already decided forces the other
                // to differ.
                let (a, b) = (*a, *b);
                if let Some(p) = fixed_parity(state, a) {
                    eliminate_parity(state, b, p);
                } else if let Some(p) = fixed_parity(state, b) {
                    eliminate_parity(state, a, p);
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

impl Constraint for ParityUniqueRowsColumns {
    fn name(&self) -> &'static str {
        "ParityUniqueRowsColumns"
    }

    fn process(&self, state: &mut PuzzleState) -> ConstraintResult {
        let lines = rows_and_columns(self.width, self.height);
        let (rows, cols) = lines.split_at(self.height);
        for family in [rows, cols] {
            for i in 0..family.len() {
                for j in i + 1..family.len() {
                    if Self::compare_lines(state, &family[i], &family[j]).is_err() {
                        return ConstraintResult::Violation;
                    }
                }
            }
        }
        ConstraintResult::Stands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(state: &mut PuzzleState, cell: usize, value: i32) {
        state.must_be(cell, value);
        assert_eq!(state.promote_next_singleton(), Some((cell, value)));
        state.set_last_placed(Some((cell, value)));
    }

    #[test]
    fn test_no_triplets_decides_the_third_cell() {
        // Row 0 of a 4x4: cells 0 and 1 both odd, so 2 must be even; and
        // with 1, 2 decided a gap at 3 follows later.
        let rule = ParityNoTriplets::new(4, 4);
        let mut state = PuzzleState::new(16, 0, 1);
        place(&mut state, 0, 1);
        place(&mut state, 1, 1);
        let _ = rule.process(&mut state);
        assert_eq!(state.possible(2).collect::<Vec<_>>(), [0]);
    }

    #[test]
    fn test_no_triplets_fills_a_gap() {
        // Cells 0 and 2 even: the middle of the triple must be odd.
        let rule = ParityNoTriplets::new(4, 4);
        let mut state = PuzzleState::new(16, 0, 1);
        place(&mut state, 0, 0);
        place(&mut state, 2, 0);
        let _ = rule.process(&mut state);
        assert_eq!(state.possible(1).collect::<Vec<_>>(), [1]);
    }

    #[test]
    fn test_evenness_flips_the_rest_of_the_line() {
        // 4-wide row with two odd values placed: the other two go even.
        let rule = ParityEvenness::new(4, 4);
        let mut state = PuzzleState::new(16, 0, 1);
        place(&mut state, 0, 1);
        place(&mut state, 2, 1);
        let _ = rule.process(&mut state);
        assert_eq!(state.possible(1).collect::<Vec<_>>(), [0]);
        assert_eq!(state.possible(3).collect::<Vec<_>>(), [0]);
    }

    #[test]
    fn test_evenness_overflow_is_violation() {
        let rule = ParityEvenness::new(4, 4);
        let mut state = PuzzleState::new(16, 0, 1);
        for cell in [0, 1, 2] {
            place(&mut state, cell, 1);
        }
        assert!(matches!(
            rule.process(&mut state),
            ConstraintResult::Violation
        ));
    }

    #[test]
    fn test_unique_rows_flips_the_last_open_cell() {
        // 2x2 board. Row 0 fixed to [0, 1]; row 1 starts with 0, so its
        // second cell must not be 1's parity... it must differ somewhere,
        // and only one cell is open.
        let rule = ParityUniqueRowsColumns::new(2, 2);
        let mut state = PuzzleState::new(4, 0, 1);
        place(&mut state, 0, 0);
        place(&mut state, 1, 1);
        place(&mut state, 2, 0);
        let _ = rule.process(&mut state);
        assert_eq!(state.possible(3).collect::<Vec<_>>(), [0]);
    }

    #[test]
    fn test_identical_complete_rows_violate() {
        let rule = ParityUniqueRowsColumns::new(2, 3);
        let mut state = PuzzleState::new(6, 0, 1);
        // Rows 0 and 1 both [1, 0]; columns all differ.
        place(&mut state, 0, 1);
        place(&mut state, 1, 0);
        place(&mut state, 2, 1);
        place(&mut state, 3, 0);
        assert!(matches!(
            rule.process(&mut state),
            ConstraintResult::Violation
        ));
    }
}
