use crate::domain::ValueSet;

/// The board as the solver and the constraints see it mid-search: one domain
/// per cell, plus the values the engine has committed to so far.
///
/// Constraints receive a `&mut PuzzleState` and narrow it through
/// [`mark_impossible`](PuzzleState::mark_impossible) and friends. Everything
/// they write is immediately visible to the constraints that run after them
/// in the same propagation round. The engine snapshots the whole state per
/// branch, so nothing here ever needs undoing.
#[derive(Debug, Clone)]
pub struct PuzzleState {
    domains: Vec<ValueSet>,
    fixed: Vec<Option<i32>>,
    min_value: i32,
    max_value: i32,
    last_placed: Option<(usize, i32)>,
    emptied: Option<usize>,
    changed: bool,
}

impl PuzzleState {
    pub(crate) fn new(num_cells: usize, min_value: i32, max_value: i32) -> PuzzleState {
        PuzzleState {
            domains: vec![ValueSet::full(min_value, max_value); num_cells],
            fixed: vec![None; num_cells],
            min_value,
            max_value,
            last_placed: None,
            emptied: None,
            changed: false,
        }
    }

    pub fn num_cells(&self) -> usize {
        self.domains.len()
    }

    pub fn min_value(&self) -> i32 {
        self.min_value
    }

    pub fn max_value(&self) -> i32 {
        self.max_value
    }

    /// The committed value of `cell`, or `None` while it is still open.
    pub fn value(&self, cell: usize) -> Option<i32> {
        self.fixed[cell]
    }

    /// The remaining candidates of `cell`, ascending.
    pub fn possible(&self, cell: usize) -> impl Iterator<Item = i32> {
        self.domains[cell].iter()
    }

    /// The remaining candidates of `cell` as a set.
    pub fn possible_set(&self, cell: usize) -> ValueSet {
        self.domains[cell]
    }

    pub fn is_possible(&self, cell: usize, value: i32) -> bool {
        self.domains[cell].contains(value)
    }

    /// The placement the engine made most recently, or `None` when
    /// constraints are asked to propagate from scratch.
    pub fn last_placed(&self) -> Option<(usize, i32)> {
        self.last_placed
    }

    pub fn last_placed_cell(&self) -> Option<usize> {
        self.last_placed.map(|(cell, _)| cell)
    }

    pub fn last_placed_value(&self) -> Option<i32> {
        self.last_placed.map(|(_, value)| value)
    }

    /// Removes one candidate. Idempotent. Emptying a domain is not an error
    /// here; the engine notices and abandons the branch.
    pub fn mark_impossible(&mut self, cell: usize, value: i32) {
        if self.domains[cell].remove(value) {
            self.changed = true;
            if self.domains[cell].is_empty() {
                self.emptied = Some(cell);
            }
        }
    }

    /// Removes every candidate for which `impossible` returns true.
    pub fn mark_impossible_where(&mut self, cell: usize, mut impossible: impl FnMut(i32) -> bool) {
        if self.domains[cell].retain(|v| !impossible(v)) {
            self.changed = true;
            if self.domains[cell].is_empty() {
                self.emptied = Some(cell);
            }
        }
    }

    /// Intersects the domain of `cell` with `{value}`. If `value` was not a
    /// candidate the domain empties, which the engine treats as a violation.
    pub fn must_be(&mut self, cell: usize, value: i32) {
        self.mark_impossible_where(cell, |v| v != value);
    }

    pub(crate) fn set_last_placed(&mut self, placed: Option<(usize, i32)>) {
        self.last_placed = placed;
    }

    /// Reads and clears the "a domain changed" flag.
    pub(crate) fn take_changed(&mut self) -> bool {
        std::mem::replace(&mut self.changed, false)
    }

    /// The first cell whose domain was emptied, if any.
    pub(crate) fn emptied(&self) -> Option<usize> {
        self.emptied
    }

    /// Commits `cell` to `value`. Caller guarantees the domain is already the
    /// matching singleton.
    pub(crate) fn place(&mut self, cell: usize, value: i32) {
        debug_assert_eq!(self.domains[cell].sole(), Some(value));
        self.fixed[cell] = Some(value);
    }

    /// Finds the lowest-index open cell whose domain has shrunk to one value,
    /// commits it, and reports the placement.
    pub(crate) fn promote_next_singleton(&mut self) -> Option<(usize, i32)> {
        for cell in 0..self.domains.len() {
            if self.fixed[cell].is_none() {
                if let Some(value) = self.domains[cell].sole() {
                    self.fixed[cell] = Some(value);
                    return Some((cell, value));
                }
            }
        }
        None
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.fixed.iter().all(|v| v.is_some())
    }

    /// The committed values as a solution array. Caller guarantees
    /// completeness.
    pub(crate) fn solution(&self) -> Vec<i32> {
        self.fixed.iter().map(|v| v.unwrap()).collect()
    }

    /// Open cells, for the branching heuristic.
    pub(crate) fn open_cells(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.fixed.len()).filter(|&cell| self.fixed[cell].is_none())
    }
}

#[test]
fn test_state_basics() {
    let mut state = PuzzleState::new(4, 1, 4);
    assert_eq!(state.num_cells(), 4);
    assert_eq!(state.value(0), None);
    assert!(state.is_possible(0, 1) && state.is_possible(0, 4));

    state.mark_impossible(0, 2);
    assert!(!state.is_possible(0, 2));
    assert!(state.take_changed());
    assert!(!state.take_changed());

    state.must_be(1, 3);
    assert_eq!(state.possible(1).collect::<Vec<_>>(), [3]);
    assert_eq!(state.value(1), None, "must_be does not commit by itself");

    assert_eq!(state.promote_next_singleton(), Some((1, 3)));
    assert_eq!(state.value(1), Some(3));
    assert_eq!(state.promote_next_singleton(), None);
}

#[test]
fn test_state_emptied_domain() {
    let mut state = PuzzleState::new(2, 1, 2);
    state.must_be(0, 1);
    assert_eq!(state.emptied(), None);
    state.mark_impossible(0, 1);
    assert_eq!(state.emptied(), Some(0));
}

#[test]
fn test_state_snapshot_restore_is_identity() {
    let mut state = PuzzleState::new(3, 1, 3);
    state.mark_impossible(2, 1);
    let snapshot = state.clone();
    state.must_be(0, 2);
    state.mark_impossible(1, 3);
    let _ = state.promote_next_singleton();
    state = snapshot;
    assert_eq!(state.value(0), None);
    assert!(state.is_possible(1, 3));
    assert!(!state.is_possible(2, 1));
}
