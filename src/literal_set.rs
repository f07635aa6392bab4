use crate::*;

use bit_set::BitSet;
use std::fmt;
use std::iter::FromIterator;

/// A set of signed literals backed by two bit-sets of variable indices.
///
/// Used where a set of literals is probed many times, for example when selecting
/// candidate interactions or filtering solutions. Unlike a [LiteralList], a literal set
/// can contain both polarities of a variable (it then carries a conflict).
#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub struct LiteralSet {
    positive: BitSet,
    negative: BitSet,
}

impl LiteralSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a literal to the set.
    ///
    /// Returns true if the literal was not already part of the set.
    pub fn insert(&mut self, literal: i32) -> bool {
        debug_assert_ne!(literal, 0);
        let var = literal.unsigned_abs() as usize;
        match literal > 0 {
            true => self.positive.insert(var),
            false => self.negative.insert(var),
        }
    }

    pub fn remove(&mut self, literal: i32) -> bool {
        let var = literal.unsigned_abs() as usize;
        match literal > 0 {
            true => self.positive.remove(var),
            false => self.negative.remove(var),
        }
    }

    pub fn contains(&self, literal: i32) -> bool {
        let var = literal.unsigned_abs() as usize;
        match literal > 0 {
            true => self.positive.contains(var),
            false => self.negative.contains(var),
        }
    }

    /// Test if all literals of a list are in this set
    pub fn contains_all(&self, literals: &LiteralList) -> bool {
        literals.iter().all(|l| self.contains(*l))
    }

    /// Test if a list has at least one literal in this set
    pub fn contains_any(&self, literals: &LiteralList) -> bool {
        literals.iter().any(|l| self.contains(*l))
    }

    pub fn is_superset(&self, other: &LiteralSet) -> bool {
        self.positive.is_superset(&other.positive) && self.negative.is_superset(&other.negative)
    }

    pub fn union_with(&mut self, other: &LiteralSet) {
        self.positive.union_with(&other.positive);
        self.negative.union_with(&other.negative);
    }

    /// Test if a variable appears with both polarities
    pub fn has_conflicts(&self) -> bool {
        !self.positive.is_disjoint(&self.negative)
    }

    pub fn len(&self) -> usize {
        self.positive.len() + self.negative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positive.is_empty() && self.negative.is_empty()
    }

    /// Iterate over the literals, negative ones first, by increasing variable index
    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.negative
            .iter()
            .map(|v| -(v as i32))
            .chain(self.positive.iter().map(|v| v as i32))
    }

    /// Convert into a list sorted by index
    pub fn to_literal_list(&self) -> LiteralList {
        let mut literals: Vec<i32> = self.iter().collect();
        literals.sort_by_key(|l| (l.unsigned_abs(), *l));
        LiteralList::with_sorted(literals, Order::Index)
    }
}

impl From<&LiteralList> for LiteralSet {
    fn from(literals: &LiteralList) -> Self {
        literals.iter().copied().collect()
    }
}

impl FromIterator<i32> for LiteralSet {
    fn from_iter<T: IntoIterator<Item = i32>>(iter: T) -> Self {
        let mut set = Self::default();
        set.extend(iter);
        set
    }
}

impl Extend<i32> for LiteralSet {
    fn extend<T: IntoIterator<Item = i32>>(&mut self, iter: T) {
        iter.into_iter().for_each(|l| {
            self.insert(l);
        });
    }
}

impl fmt::Display for LiteralSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{")?;
        let mut first = true;
        for l in self.iter() {
            match first {
                true => first = false,
                false => write!(f, ", ")?,
            }
            write!(f, "{}", l)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use crate::*;

    #[test]
    fn literal_set() -> Result<(), FokitError> {
        let mut set: LiteralSet = [3, -1, 2].into_iter().collect();
        assert_eq!(set.len(), 3);
        assert!(set.contains(-1));
        assert!(!set.contains(1));
        assert!(!set.has_conflicts());

        let list = LiteralList::new(vec![2, -1], Order::Natural)?;
        assert!(set.contains_all(&list));
        assert!(!set.contains_all(&list.negate()));
        assert!(set.contains_any(&LiteralList::new(vec![-2, 3], Order::Natural)?));

        assert!(set.insert(1));
        assert!(!set.insert(1));
        assert!(set.has_conflicts());
        assert_eq!(set.to_literal_list().literals(), &[-1, 1, 2, 3]);
        assert_eq!(format!("{}", set), "{-1, 1, 2, 3}");

        let sub = LiteralSet::from(&list);
        assert!(set.is_superset(&sub));
        assert!(!sub.is_superset(&set));
        Ok(())
    }
}
