use bitvec::BitArr;

/// How many distinct values a cell domain can carry. Plenty for the puzzles
/// this crate targets (digits, letters, path segments).
pub const MAX_WIDTH: usize = 32;

type Bits = BitArr!(for MAX_WIDTH, in u32);

/// The set of values one cell might still hold.
///
/// Stored as a bitmask offset by the puzzle's minimum value: bit `k` set
/// means `min + k` is still a candidate. Cheap to copy, so snapshots of the
/// whole board are just a `Vec` clone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueSet {
    bits: Bits,
    min: i32,
}

impl ValueSet {
    /// The full domain `min..=max`.
    pub fn full(min: i32, max: i32) -> ValueSet {
        debug_assert!(min <= max && (max - min) < MAX_WIDTH as i32);
        let mut bits = Bits::ZERO;
        bits[..(max - min + 1) as usize].fill(true);
        ValueSet { bits, min }
    }

    /// The empty domain over the same offset.
    pub fn empty(min: i32) -> ValueSet {
        ValueSet {
            bits: Bits::ZERO,
            min,
        }
    }

    /// A one-element domain.
    pub fn singleton(min: i32, value: i32) -> ValueSet {
        let mut set = ValueSet::empty(min);
        set.insert(value);
        set
    }

    fn offset(&self, value: i32) -> Option<usize> {
        if value < self.min || value >= self.min + MAX_WIDTH as i32 {
            None
        } else {
            Some((value - self.min) as usize)
        }
    }

    pub fn contains(&self, value: i32) -> bool {
        match self.offset(value) {
            Some(k) => self.bits[k],
            None => false,
        }
    }

    pub fn insert(&mut self, value: i32) {
        if let Some(k) = self.offset(value) {
            self.bits.set(k, true);
        }
    }

    /// Removes `value`. Returns whether it was present.
    pub fn remove(&mut self, value: i32) -> bool {
        match self.offset(value) {
            Some(k) if self.bits[k] => {
                self.bits.set(k, false);
                true
            }
            _ => false,
        }
    }

    /// Keeps only values for which `keep` returns true. Returns whether
    /// anything was removed.
    pub fn retain(&mut self, mut keep: impl FnMut(i32) -> bool) -> bool {
        let snapshot = self.bits;
        let mut removed = false;
        for k in snapshot.iter_ones() {
            if !keep(self.min + k as i32) {
                self.bits.set(k, false);
                removed = true;
            }
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// The smallest remaining candidate.
    pub fn smallest(&self) -> Option<i32> {
        self.bits.first_one().map(|k| self.min + k as i32)
    }

    /// The largest remaining candidate.
    pub fn largest(&self) -> Option<i32> {
        self.bits.last_one().map(|k| self.min + k as i32)
    }

    /// The value of a one-element domain, if this is one.
    pub fn sole(&self) -> Option<i32> {
        if self.len() == 1 {
            self.smallest()
        } else {
            None
        }
    }

    /// Remaining candidates in ascending order.
    pub fn iter(self) -> impl Iterator<Item = i32> {
        self.bits
            .into_iter()
            .enumerate()
            .filter(|(_, b)| *b)
            .map(move |(k, _)| self.min + k as i32)
    }
}

#[test]
fn test_value_set() {
    let mut set = ValueSet::full(1, 9);
    assert_eq!(set.len(), 9);
    assert!(set.contains(1) && set.contains(9));
    assert!(!set.contains(0) && !set.contains(10));

    assert!(set.remove(5));
    assert!(!set.remove(5));
    assert_eq!(set.len(), 8);
    assert_eq!(set.iter().collect::<Vec<_>>(), [1, 2, 3, 4, 6, 7, 8, 9]);

    assert!(set.retain(|v| v % 2 == 0));
    assert_eq!(set.iter().collect::<Vec<_>>(), [2, 4, 6, 8]);
    assert_eq!(set.smallest(), Some(2));
    assert_eq!(set.largest(), Some(8));
    assert_eq!(set.sole(), None);

    assert!(set.retain(|v| v == 6));
    assert_eq!(set.sole(), Some(6));

    assert!(set.remove(6));
    assert!(set.is_empty());
    assert_eq!(set.smallest(), None);
}

#[test]
fn test_value_set_negative_min() {
    let set = ValueSet::full(-2, 3);
    assert_eq!(set.len(), 6);
    assert_eq!(set.iter().collect::<Vec<_>>(), [-2, -1, 0, 1, 2, 3]);
    assert!(set.contains(-2));
    assert!(!set.contains(-3));

    let single = ValueSet::singleton(-2, 0);
    assert_eq!(single.sole(), Some(0));
}
