use super::{Constraint, ConstraintResult};
use crate::domain::ValueSet;
use crate::state::PuzzleState;
use std::fmt;

/// For every watched cell, the values that take part in at least one
/// predicate-satisfying assignment drawn from the current domains. `None` if
/// no assignment satisfies the predicate at all.
fn supporting_values(
    domains: &[ValueSet],
    pred: &(dyn Fn(&[i32]) -> bool + Send + Sync),
    min_value: i32,
) -> Option<Vec<ValueSet>> {
    fn walk(
        domains: &[ValueSet],
        pred: &(dyn Fn(&[i32]) -> bool + Send + Sync),
        chosen: &mut Vec<i32>,
        support: &mut [ValueSet],
        found: &mut bool,
    ) {
        let depth = chosen.len();
        if depth == domains.len() {
            if pred(chosen) {
                *found = true;
                for (k, &v) in chosen.iter().enumerate() {
                    support[k].insert(v);
                }
            }
            return;
        }
        for v in domains[depth].iter() {
            chosen.push(v);
            walk(domains, pred, chosen, support, found);
            chosen.pop();
        }
    }

    let mut support = vec![ValueSet::empty(min_value); domains.len()];
    let mut chosen = Vec::with_capacity(domains.len());
    let mut found = false;
    walk(domains, pred, &mut chosen, &mut support, &mut found);
    if found {
        Some(support)
    } else {
        None
    }
}

fn narrow_to_support(
    state: &mut PuzzleState,
    cells: &[usize],
    pred: &(dyn Fn(&[i32]) -> bool + Send + Sync),
) -> ConstraintResult {
    let domains: Vec<ValueSet> = cells.iter().map(|&c| state.possible_set(c)).collect();
    if domains.iter().any(|d| d.is_empty()) {
        return ConstraintResult::Stands;
    }
    let Some(support) = supporting_values(&domains, pred, state.min_value()) else {
        return ConstraintResult::Violation;
    };
    for (k, &cell) in cells.iter().enumerate() {
        let keep = support[k];
        state.mark_impossible_where(cell, |v| !keep.contains(v));
    }
    if cells.iter().all(|&c| state.value(c).is_some()) {
        return ConstraintResult::satisfied();
    }
    ConstraintResult::Stands
}

/// An arbitrary predicate over a handful of cells.
///
/// The catch-all for one-off rules: parity of a single cell, "these two
/// differ by at least 3", a three-cell product, whatever. Propagation
/// enumerates the domain cross-product, so keep the cell count small —
/// one to three cells is the intended range.
pub struct CellPred {
    cells: Vec<usize>,
    pred: Box<dyn Fn(&[i32]) -> bool + Send + Sync>,
}

impl CellPred {
    pub fn new<const N: usize>(
        cells: [usize; N],
        pred: impl Fn(&[i32; N]) -> bool + Send + Sync + 'static,
    ) -> CellPred {
        // The boxed form takes a slice; bridge to the caller's fixed-size
        // signature through a stack buffer. Lengths always agree because
        // `process` hands the predicate one value per watched cell.
        CellPred {
            cells: cells.to_vec(),
            pred: Box::new(move |values: &[i32]| {
                let mut buffer = [0; N];
                buffer.copy_from_slice(values);
                pred(&buffer)
            }),
        }
    }
}

impl fmt::Debug for CellPred {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("CellPred")
            .field("cells", &self.cells)
            .finish_non_exhaustive()
    }
}

impl Constraint for CellPred {
    fn name(&self) -> &'static str {
        "CellPred"
    }

    fn cells(&self) -> Option<&[usize]> {
        Some(&self.cells)
    }

    fn process(&self, state: &mut PuzzleState) -> ConstraintResult {
        narrow_to_support(state, &self.cells, self.pred.as_ref())
    }
}

/// A predicate over an ordered line of cells of any length.
///
/// Like [`CellPred`], but sized for whole rows and columns: full
/// assignments are always checked, while candidate narrowing only happens
/// while the domain cross-product stays below a fixed cap. Long lines are
/// verified, short tails are propagated.
pub struct LineRule {
    cells: Vec<usize>,
    rule: Box<dyn Fn(&[i32]) -> bool + Send + Sync>,
}

/// Above this many candidate combinations, `LineRule` stops enumerating and
/// waits for the line to fill in further.
const ENUMERATION_CAP: usize = 4096;

impl LineRule {
    pub fn new(
        cells: impl IntoIterator<Item = usize>,
        rule: impl Fn(&[i32]) -> bool + Send + Sync + 'static,
    ) -> LineRule {
        LineRule {
            cells: cells.into_iter().collect(),
            rule: Box::new(rule),
        }
    }
}

impl fmt::Debug for LineRule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("LineRule")
            .field("cells", &self.cells)
            .finish_non_exhaustive()
    }
}

impl Constraint for LineRule {
    fn name(&self) -> &'static str {
        "LineRule"
    }

    fn cells(&self) -> Option<&[usize]> {
        Some(&self.cells)
    }

    fn process(&self, state: &mut PuzzleState) -> ConstraintResult {
        let mut combinations: usize = 1;
        for &cell in &self.cells {
            combinations = combinations.saturating_mul(state.possible_set(cell).len());
        }
        if combinations == 0 {
            return ConstraintResult::Stands;
        }
        if combinations > ENUMERATION_CAP {
            return ConstraintResult::Stands;
        }
        narrow_to_support(state, &self.cells, self.rule.as_ref())
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
    fn test_one_cell_pred() {
        let odd = CellPred::new([0], |[v]| v % 2 == 1);
        let mut state = PuzzleState::new(1, 1, 9);
        let _ = odd.process(&mut state);
        assert_eq!(state.possible(0).collect::<Vec<_>>(), [1, 3, 5, 7, 9]);
    }

    #[test]
    fn test_two_cell_pred_keeps_supported_values() {
        // a + b == 4 over 1..=9.
        let pair = CellPred::new([0, 1], |[a, b]| a + b == 4);
        let mut state = PuzzleState::new(2, 1, 9);
        let _ = pair.process(&mut state);
        assert_eq!(state.possible(0).collect::<Vec<_>>(), [1, 2, 3]);
        assert_eq!(state.possible(1).collect::<Vec<_>>(), [1, 2, 3]);
    }

    #[test]
    fn test_three_cell_pred_violation() {
        let triple = CellPred::new([0, 1, 2], |[a, b, c]| a * b * c > 1000);
        let mut state = PuzzleState::new(3, 1, 9);
        assert!(matches!(
            triple.process(&mut state),
            ConstraintResult::Violation
        ));
    }

    #[test]
    fn test_pred_dissolves_once_all_fixed() {
        let pair = CellPred::new([0, 1], |[a, b]| a < b);
        let mut state = PuzzleState::new(2, 1, 9);
        place(&mut state, 0, 2);
        place(&mut state, 1, 5);
        assert!(matches!(
            pair.process(&mut state),
            ConstraintResult::Replace(list) if list.is_empty()
        ));
    }

    #[test]
    fn test_line_rule_propagates_short_lines() {
        // A three-cell line that must be non-decreasing.
        let rule = LineRule::new(0..3, |line: &[i32]| line.windows(2).all(|w| w[0] <= w[1]));
        let mut state = PuzzleState::new(3, 1, 3);
        place(&mut state, 0, 3);
        let _ = rule.process(&mut state);
        assert_eq!(state.possible(1).collect::<Vec<_>>(), [3]);
        assert_eq!(state.possible(2).collect::<Vec<_>>(), [3]);
    }

    #[test]
    fn test_line_rule_defers_when_too_wide() {
        // 9 cells of 9 candidates is far past the cap; domains are left as
        // they are.
        let rule = LineRule::new(0..9, |_: &[i32]| false);
        let mut state = PuzzleState::new(9, 1, 9);
        assert!(matches!(rule.process(&mut state), ConstraintResult::Stands));
        assert_eq!(state.possible(0).count(), 9);
    }

    #[test]
    fn test_line_rule_checks_full_assignments() {
        let rule = LineRule::new(0..2, |line: &[i32]| line[0] != line[1]);
        let mut state = PuzzleState::new(2, 1, 2);
        place(&mut state, 0, 1);
        place(&mut state, 1, 1);
        assert!(matches!(
            rule.process(&mut state),
            ConstraintResult::Violation
        ));
    }
}
