//! Immutable vectors of signed literals.

use crate::*;

use itertools::Itertools;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Index;
use std::slice::Iter;

/// Ordering guarantee carried by a [LiteralList].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Order {
    /// No guarantee
    Unordered,
    /// Sorted by signed value: `-3, -1, 2, 4`
    Natural,
    /// Sorted by variable index: `-1, 2, -3, 4`
    Index,
}

/// A fixed list of literals in DIMACS convention.
///
/// A literal `l` references the variable `|l|` of a [VariableMap], its sign encodes the polarity.
/// The zero literal is forbidden. Depending on the context, a literal list is a clause
/// (disjunction), a conjunction of literals, a (partial) configuration or a t-wise interaction.
///
/// The list is normalised at construction according to its [Order] and can not be changed afterwards.
/// Equality takes the order tag into account, while the hash only depends on the literals:
/// two lists with the same literals in different order modes are different but collide.
///
/// ```
/// use fokit::{LiteralList, Order};
/// # use fokit::FokitError;
/// # fn main() -> Result<(), FokitError> {
///
/// let config = LiteralList::new(vec![3, -1, 2, -4], Order::Natural)?;
/// let interaction = LiteralList::new(vec![2, -1], Order::Natural)?;
/// assert_eq!(config.literals(), &[-4, -1, 2, 3]);
/// assert!(config.contains_all(&interaction));
/// assert!(!config.contains_all(&interaction.negate()));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LiteralList {
    literals: Vec<i32>,
    order: Order,
}

impl LiteralList {
    /// Create a list, sorting the literals if required by the order mode.
    ///
    /// Returns an error if a literal is zero.
    pub fn new(mut literals: Vec<i32>, order: Order) -> Result<Self, FokitError> {
        if literals.contains(&0) {
            return Err(FokitError::InvalidLiteral(0));
        }
        sort_literals(&mut literals, order);
        Ok(Self { literals, order })
    }

    /// The empty list (an empty clause or an empty configuration)
    pub fn empty() -> Self {
        Self {
            literals: vec![],
            order: Order::Natural,
        }
    }

    /// Build a list from literals known to be valid and already sorted
    pub(crate) fn with_sorted(literals: Vec<i32>, order: Order) -> Self {
        debug_assert!(!literals.contains(&0));
        Self { literals, order }
    }

    /// Check that all literals reference a variable of the map
    pub fn validate(&self, variables: &VariableMap) -> Result<(), FokitError> {
        match self
            .literals
            .iter()
            .find(|l| !variables.contains(l.unsigned_abs() as usize))
        {
            Some(l) => Err(FokitError::InvalidLiteral(*l)),
            None => Ok(()),
        }
    }

    pub fn literals(&self) -> &[i32] {
        &self.literals
    }

    pub fn order(&self) -> Order {
        self.order
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, i32> {
        self.literals.iter()
    }

    pub fn contains(&self, literal: i32) -> bool {
        match self.order {
            Order::Natural => self.literals.binary_search(&literal).is_ok(),
            _ => self.literals.contains(&literal),
        }
    }

    /// Test if all literals of the other list are part of this list (set inclusion).
    ///
    /// Runs in linear time when both lists share a sorted order mode.
    pub fn contains_all(&self, other: &LiteralList) -> bool {
        match (self.order, other.order) {
            (Order::Natural, Order::Natural) => {
                let mut mine = self.literals.iter().peekable();
                other.literals.iter().all(|l| {
                    while mine.next_if(|m| *m < l).is_some() {}
                    mine.peek().map_or(false, |m| *m == l)
                })
            }
            (Order::Index, Order::Index) => {
                let mut start = 0;
                other.literals.iter().all(|l| {
                    let var = l.unsigned_abs();
                    while start < self.literals.len() && self.literals[start].unsigned_abs() < var {
                        start += 1;
                    }
                    self.literals[start..]
                        .iter()
                        .take_while(|m| m.unsigned_abs() == var)
                        .any(|m| m == l)
                })
            }
            _ => other.literals.iter().all(|l| self.literals.contains(l)),
        }
    }

    /// Test if the two lists have at least one literal in common
    pub fn has_duplicates(&self, other: &LiteralList) -> bool {
        match (self.order, other.order) {
            (Order::Natural, Order::Natural) => {
                let (mut i, mut j) = (0, 0);
                while i < self.literals.len() && j < other.literals.len() {
                    match self.literals[i].cmp(&other.literals[j]) {
                        Ordering::Less => i += 1,
                        Ordering::Greater => j += 1,
                        Ordering::Equal => return true,
                    }
                }
                false
            }
            _ => other.literals.iter().any(|l| self.contains(*l)),
        }
    }

    /// Test if the list contains a literal and its complement
    pub fn has_conflicts(&self) -> bool {
        self.literals.iter().any(|l| self.contains(-*l))
    }

    /// Flip every literal, keeping the order mode.
    pub fn negate(&self) -> LiteralList {
        let mut literals: Vec<i32> = self.literals.iter().map(|l| -l).collect();
        if self.order == Order::Natural {
            literals.reverse();
        }
        Self::with_sorted(literals, self.order)
    }

    /// Union of several lists, without duplicates, in order of first appearance.
    pub fn merge<'a, T: IntoIterator<Item = &'a LiteralList>>(lists: T) -> LiteralList {
        let literals = lists
            .into_iter()
            .flat_map(|l| l.literals.iter().copied())
            .unique()
            .collect();
        Self::with_sorted(literals, Order::Unordered)
    }

    /// Sub-list formed by the literals at the given positions
    pub fn select(&self, positions: &[usize]) -> LiteralList {
        let mut literals: Vec<i32> = positions.iter().map(|p| self.literals[*p]).collect();
        sort_literals(&mut literals, self.order);
        Self::with_sorted(literals, self.order)
    }

    /// Copy of this list in another order mode
    pub fn reorder(&self, order: Order) -> LiteralList {
        let mut literals = self.literals.clone();
        sort_literals(&mut literals, order);
        Self::with_sorted(literals, order)
    }

    pub fn positive(&self) -> impl Iterator<Item = i32> + '_ {
        self.literals.iter().copied().filter(|l| *l > 0)
    }

    pub fn negative(&self) -> impl Iterator<Item = i32> + '_ {
        self.literals.iter().copied().filter(|l| *l < 0)
    }
}

fn sort_literals(literals: &mut [i32], order: Order) {
    match order {
        Order::Unordered => (),
        Order::Natural => literals.sort_unstable(),
        Order::Index => literals.sort_by_key(|l| (l.unsigned_abs(), *l)),
    }
}

impl Hash for LiteralList {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.literals.hash(state);
    }
}

impl Index<usize> for LiteralList {
    type Output = i32;

    fn index(&self, index: usize) -> &Self::Output {
        &self.literals[index]
    }
}

impl<'a> IntoIterator for &'a LiteralList {
    type Item = &'a i32;
    type IntoIter = Iter<'a, i32>;

    fn into_iter(self) -> Self::IntoIter {
        self.literals.iter()
    }
}

impl fmt::Display for LiteralList {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}]", self.literals.iter().join(", "))
    }
}
