use super::{Constraint, ConstraintResult};
use crate::state::PuzzleState;

/// Splits a cell set into its committed part and its open part, returning
/// the committed sum alongside the open cells.
fn split_fixed(state: &PuzzleState, cells: &[usize]) -> (i32, Vec<usize>) {
    let mut fixed_sum = 0;
    let mut open = Vec::new();
    for &cell in cells {
        match state.value(cell) {
            Some(v) => fixed_sum += v,
            None => open.push(cell),
        }
    }
    (fixed_sum, open)
}

/// Per-cell domain bounds for the open cells, plus their totals. `None` if
/// some domain already emptied (the engine is about to fail the branch, so
/// there is nothing useful to compute).
fn open_bounds(state: &PuzzleState, open: &[usize]) -> Option<(Vec<i32>, Vec<i32>, i32, i32)> {
    let mut mins = Vec::with_capacity(open.len());
    let mut maxs = Vec::with_capacity(open.len());
    for &cell in open {
        let set = state.possible_set(cell);
        mins.push(set.smallest()?);
        maxs.push(set.largest()?);
    }
    let total_min = mins.iter().sum();
    let total_max = maxs.iter().sum();
    Some((mins, maxs, total_min, total_max))
}

/// The interval of sums a whole cell set can still reach.
fn reachable_sum(state: &PuzzleState, cells: &[usize]) -> Option<(i32, i32)> {
    let (fixed_sum, open) = split_fixed(state, cells);
    let (_, _, total_min, total_max) = open_bounds(state, &open)?;
    Some((fixed_sum + total_min, fixed_sum + total_max))
}

/// The watched cells sum to exactly `target` — the Killer-cage rule.
///
/// Each open cell keeps only the values that fit between the best and worst
/// case of the remaining cells. With one open cell left this pins its value;
/// with none left the constraint dissolves or fails.
#[derive(Debug, Clone)]
pub struct Sum {
    target: i32,
    cells: Vec<usize>,
}

impl Sum {
    pub fn new(target: i32, cells: impl IntoIterator<Item = usize>) -> Sum {
        Sum {
            target,
            cells: cells.into_iter().collect(),
        }
    }
}

impl Constraint for Sum {
    fn name(&self) -> &'static str {
        "Sum"
    }

    fn cells(&self) -> Option<&[usize]> {
        Some(&self.cells)
    }

    fn process(&self, state: &mut PuzzleState) -> ConstraintResult {
        let (fixed_sum, open) = split_fixed(state, &self.cells);
        if open.is_empty() {
            return if fixed_sum == self.target {
                ConstraintResult::satisfied()
            } else {
                ConstraintResult::Violation
            };
        }
        let Some((mins, maxs, total_min, total_max)) = open_bounds(state, &open) else {
            return ConstraintResult::Stands;
        };
        let need = self.target - fixed_sum;
        for (k, &cell) in open.iter().enumerate() {
            let rest_min = total_min - mins[k];
            let rest_max = total_max - maxs[k];
            state.mark_impossible_where(cell, |v| v + rest_min > need || v + rest_max < need);
        }
        ConstraintResult::Stands
    }
}

/// The watched cells sum to at least `limit`.
///
/// Dissolves as soon as even the worst case clears the bar.
#[derive(Debug, Clone)]
pub struct MinSum {
    limit: i32,
    cells: Vec<usize>,
}

impl MinSum {
    pub fn new(limit: i32, cells: impl IntoIterator<Item = usize>) -> MinSum {
        MinSum {
            limit,
            cells: cells.into_iter().collect(),
        }
    }
}

impl Constraint for MinSum {
    fn name(&self) -> &'static str {
        "MinSum"
    }

    fn cells(&self) -> Option<&[usize]> {
        Some(&self.cells)
    }

    fn process(&self, state: &mut PuzzleState) -> ConstraintResult {
        let (fixed_sum, open) = split_fixed(state, &self.cells);
        if open.is_empty() {
            return if fixed_sum >= self.limit {
                ConstraintResult::satisfied()
            } else {
                ConstraintResult::Violation
            };
        }
        let Some((_, maxs, total_min, total_max)) = open_bounds(state, &open) else {
            return ConstraintResult::Stands;
        };
        if fixed_sum + total_min >= self.limit {
            return ConstraintResult::satisfied();
        }
        for (k, &cell) in open.iter().enumerate() {
            let rest_max = total_max - maxs[k];
            state.mark_impossible_where(cell, |v| fixed_sum + v + rest_max < self.limit);
        }
        ConstraintResult::Stands
    }
}

/// The watched cells sum to at most `limit`.
#[derive(Debug, Clone)]
pub struct MaxSum {
    limit: i32,
    cells: Vec<usize>,
}

impl MaxSum {
    pub fn new(limit: i32, cells: impl IntoIterator<Item = usize>) -> MaxSum {
        MaxSum {
            limit,
            cells: cells.into_iter().collect(),
        }
    }
}

impl Constraint for MaxSum {
    fn name(&self) -> &'static str {
        "MaxSum"
    }

    fn cells(&self) -> Option<&[usize]> {
        Some(&self.cells)
    }

    fn process(&self, state: &mut PuzzleState) -> ConstraintResult {
        let (fixed_sum, open) = split_fixed(state, &self.cells);
        if open.is_empty() {
            return if fixed_sum <= self.limit {
                ConstraintResult::satisfied()
            } else {
                ConstraintResult::Violation
            };
        }
        let Some((mins, _, total_min, total_max)) = open_bounds(state, &open) else {
            return ConstraintResult::Stands;
        };
        if fixed_sum + total_max <= self.limit {
            return ConstraintResult::satisfied();
        }
        for (k, &cell) in open.iter().enumerate() {
            let rest_min = total_min - mins[k];
            state.mark_impossible_where(cell, |v| fixed_sum + v + rest_min > self.limit);
        }
        ConstraintResult::Stands
    }
}

/// Some one of the candidate groups sums to `target`.
///
/// A disjunction: groups that can no longer reach the target are pruned
/// through the replacement mechanism, and once a single group survives the
/// constraint collapses into a plain [`Sum`] on it.
#[derive(Debug, Clone)]
pub struct SumAlternative {
    target: i32,
    groups: Vec<Vec<usize>>,
}

impl SumAlternative {
    pub fn new(target: i32, groups: impl IntoIterator<Item = Vec<usize>>) -> SumAlternative {
        SumAlternative {
            target,
            groups: groups.into_iter().collect(),
        }
    }
}

impl Constraint for SumAlternative {
    fn name(&self) -> &'static str {
        "SumAlternative"
    }

    fn process(&self, state: &mut PuzzleState) -> ConstraintResult {
        let mut feasible = Vec::new();
        for group in &self.groups {
            if let Some((lo, hi)) = reachable_sum(state, group) {
                if lo <= self.target && self.target <= hi {
                    feasible.push(group.clone());
                }
            }
        }
        match feasible.len() {
            0 => ConstraintResult::Violation,
            1 => ConstraintResult::replace_with(Sum::new(self.target, feasible.swap_remove(0))),
            n if n < self.groups.len() => {
                ConstraintResult::replace_with(SumAlternative::new(self.target, feasible))
            }
            _ => ConstraintResult::Stands,
        }
    }
}

/// Every region sums to the same (unspecified) value.
///
/// The reachable-sum intervals of all regions are intersected; an empty
/// intersection fails the branch, and a pinned intersection dissolves into
/// one exact [`Sum`] per region.
#[derive(Debug, Clone)]
pub struct EqualSums {
    regions: Vec<Vec<usize>>,
}

impl EqualSums {
    pub fn new(regions: impl IntoIterator<Item = Vec<usize>>) -> EqualSums {
        EqualSums {
            regions: regions.into_iter().collect(),
        }
    }
}

impl Constraint for EqualSums {
    fn name(&self) -> &'static str {
        "EqualSums"
    }

    fn process(&self, state: &mut PuzzleState) -> ConstraintResult {
        let mut lo = i32::MIN;
        let mut hi = i32::MAX;
        for region in &self.regions {
            let Some((region_lo, region_hi)) = reachable_sum(state, region) else {
                return ConstraintResult::Stands;
            };
            lo = lo.max(region_lo);
            hi = hi.min(region_hi);
        }
        if lo > hi {
            return ConstraintResult::Violation;
        }
        if lo == hi {
            let sums = self
                .regions
                .iter()
                .map(|region| {
                    std::sync::Arc::new(Sum::new(lo, region.clone())) as super::ConstraintRef
                })
                .collect();
            return ConstraintResult::Replace(sums);
        }
        // Narrow each region against the shared interval.
        for region in &self.regions {
            let (fixed_sum, open) = split_fixed(state, region);
            let Some((mins, maxs, total_min, total_max)) = open_bounds(state, &open) else {
                continue;
            };
            for (k, &cell) in open.iter().enumerate() {
                let rest_min = total_min - mins[k];
                let rest_max = total_max - maxs[k];
                state.mark_impossible_where(cell, |v| {
                    fixed_sum + v + rest_min > hi || fixed_sum + v + rest_max < lo
                });
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
    fn test_sum_prunes_extremes() {
        // Two cells in 1..=9 summing to 4: neither can exceed 3.
        let sum = Sum::new(4, [0, 1]);
        let mut state = PuzzleState::new(2, 1, 9);
        let _ = sum.process(&mut state);
        assert_eq!(state.possible(0).collect::<Vec<_>>(), [1, 2, 3]);
        assert_eq!(state.possible(1).collect::<Vec<_>>(), [1, 2, 3]);
    }

    #[test]
    fn test_sum_pins_last_open_cell() {
        let sum = Sum::new(10, [0, 1]);
        let mut state = PuzzleState::new(2, 1, 9);
        place(&mut state, 0, 4);
        let _ = sum.process(&mut state);
        assert_eq!(state.possible(1).collect::<Vec<_>>(), [6]);
    }

    #[test]
    fn test_sum_settles_once_complete() {
        let sum = Sum::new(10, [0, 1]);
        let mut state = PuzzleState::new(2, 1, 9);
        place(&mut state, 0, 4);
        place(&mut state, 1, 6);
        assert!(matches!(
            sum.process(&mut state),
            ConstraintResult::Replace(list) if list.is_empty()
        ));

        let mut state = PuzzleState::new(2, 1, 9);
        place(&mut state, 0, 4);
        place(&mut state, 1, 7);
        assert!(matches!(
            sum.process(&mut state),
            ConstraintResult::Violation
        ));
    }

    #[test]
    fn test_min_and_max_sum() {
        let mut state = PuzzleState::new(2, 1, 9);
        place(&mut state, 0, 2);

        // 2 + x >= 10 forces x >= 8.
        let _ = MinSum::new(10, [0, 1]).process(&mut state);
        assert_eq!(state.possible(1).collect::<Vec<_>>(), [8, 9]);

        // 2 + x <= 10 forces x <= 8.
        let _ = MaxSum::new(10, [0, 1]).process(&mut state);
        assert_eq!(state.possible(1).collect::<Vec<_>>(), [8]);
    }

    #[test]
    fn test_min_sum_dissolves_when_guaranteed() {
        let min = MinSum::new(2, [0, 1]);
        let mut state = PuzzleState::new(2, 1, 9);
        assert!(matches!(
            min.process(&mut state),
            ConstraintResult::Replace(list) if list.is_empty()
        ));
    }

    #[test]
    fn test_sum_alternative_narrows_to_one_group() {
        // Group [0, 1] can reach 17 only as 8 + 9; group [2] cannot (max 9).
        let alt = SumAlternative::new(17, vec![vec![0, 1], vec![2]]);
        let mut state = PuzzleState::new(3, 1, 9);
        match alt.process(&mut state) {
            ConstraintResult::Replace(list) => {
                assert_eq!(list.len(), 1);
                assert_eq!(list[0].name(), "Sum");
            }
            other => panic!("expected reduction to Sum, got {:?}", other),
        }
    }

    #[test]
    fn test_sum_alternative_violation() {
        let alt = SumAlternative::new(100, vec![vec![0], vec![1, 2]]);
        let mut state = PuzzleState::new(3, 1, 9);
        assert!(matches!(
            alt.process(&mut state),
            ConstraintResult::Violation
        ));
    }

    #[test]
    fn test_equal_sums_intersects_and_dissolves() {
        // Region A is fixed at 7; region B must then also make 7.
        let eq = EqualSums::new(vec![vec![0], vec![1, 2]]);
        let mut state = PuzzleState::new(3, 1, 9);
        place(&mut state, 0, 7);
        match eq.process(&mut state) {
            ConstraintResult::Replace(list) => {
                assert_eq!(list.len(), 2);
                assert!(list.iter().all(|c| c.name() == "Sum"));
            }
            other => panic!("expected per-region sums, got {:?}", other),
        }
    }

    #[test]
    fn test_equal_sums_violation_on_disjoint_intervals() {
        let eq = EqualSums::new(vec![vec![0], vec![1, 2]]);
        let mut state = PuzzleState::new(3, 1, 9);
        place(&mut state, 0, 1);
        place(&mut state, 1, 5);
        place(&mut state, 2, 5);
        assert!(matches!(eq.process(&mut state), ConstraintResult::Violation));
    }
}
