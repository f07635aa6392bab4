//! Enumerate the subsets of size t of a set of positions.
//!
//! All iterators visit each subset of `[0, n)` of size `t` exactly once, as increasing positions.
//! They differ in their visit order: each one maps a counter to the rank of a subset in
//! the lexicographic order, decoded with binomial coefficients.
//!
//! ```
//! use fokit::combinations::{CombinationIterator, LexicographicIterator};
//! use fokit::{LiteralList, Order};
//! # use fokit::FokitError;
//! # fn main() -> Result<(), FokitError> {
//! let mut it = LexicographicIterator::new(2, 4);
//! assert_eq!(it.size(), 6);
//! assert_eq!(it.next(), Some(vec![0, 1]));
//!
//! // project positions on a configuration
//! let config = LiteralList::new(vec![1, -2, 3, -4], Order::Unordered)?;
//! assert_eq!(it.next_interaction(&config).unwrap().literals(), &[1, 3]);
//! # Ok(())
//! # }
//! ```

use crate::tools::{binomial, ceil_root, unrank_lexicographic};
use crate::LiteralList;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seed of the random partition order when none is given
pub const DEFAULT_SEED: u64 = 0;

/// Iterator over the subsets of size t of `[0, n)`
pub trait CombinationIterator: Iterator<Item = Vec<usize>> {
    /// The size of the subsets
    fn t(&self) -> usize;

    /// The size of the enumerated set
    fn n(&self) -> usize;

    /// The total number of subsets: `C(n, t)`
    fn size(&self) -> u64 {
        binomial(self.n(), self.t())
    }

    /// Select the literals of a list at the positions of the next subset
    fn next_interaction(&mut self, literals: &LiteralList) -> Option<LiteralList> {
        self.next().map(|positions| literals.select(&positions))
    }
}

/// Map a counter to a lexicographic rank
pub trait IndexOrder {
    /// Called once for each counter value in `[0, count)`, in increasing order
    fn next_index(&mut self, counter: u64, count: u64) -> u64;
}

/// Enumerate combinations following an [IndexOrder]
#[derive(Clone, Debug)]
pub struct Combinations<O> {
    t: usize,
    n: usize,
    count: u64,
    counter: u64,
    order: O,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LexicographicOrder;

#[derive(Clone, Copy, Debug, Default)]
pub struct InverseLexicographicOrder;

/// Alternate between the start and the end of the lexicographic order
#[derive(Clone, Copy, Debug, Default)]
pub struct InterleavedOrder;

/// Interleaved order, starting from the middle
#[derive(Clone, Copy, Debug, Default)]
pub struct InverseInterleavedOrder;

/// Walk the ranks as the cells of a cube in mixed-radix order.
///
/// The ranks are split into `d * t` digits in base `radix`, where `radix^(d*t)` is the smallest
/// power covering all ranks. Cells are enumerated by increasing last digit first: the first
/// visited ranks are spread over the whole range. Cells beyond the last rank are skipped.
/// Each digit can be permuted to obtain a random partition order.
#[derive(Clone, Debug)]
pub struct PartitionOrder {
    dims: Vec<Vec<u64>>,
    pos: Vec<usize>,
    radix: u64,
}

pub type LexicographicIterator = Combinations<LexicographicOrder>;
pub type InverseLexicographicIterator = Combinations<InverseLexicographicOrder>;
pub type DefaultIterator = Combinations<InterleavedOrder>;
pub type InverseDefaultIterator = Combinations<InverseInterleavedOrder>;
pub type PartitionIterator = Combinations<PartitionOrder>;

/// Available iteration orders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum IteratorId {
    InverseDefault,
    Default,
    #[default]
    Lexicographic,
    InverseLexicographic,
    RandomPartition,
    Partition,
}

impl<O: IndexOrder> Combinations<O> {
    pub fn with_order(t: usize, n: usize, order: O) -> Self {
        Self {
            t,
            n,
            count: binomial(n, t),
            counter: 0,
            order,
        }
    }

    /// Number of subsets already produced
    pub fn position(&self) -> u64 {
        self.counter
    }
}

impl<O: IndexOrder + Default> Combinations<O> {
    pub fn new(t: usize, n: usize) -> Self {
        Self::with_order(t, n, O::default())
    }
}

impl PartitionIterator {
    /// Partition order with two digits per element of the subsets
    pub fn partition(t: usize, n: usize) -> Self {
        Self::with_dimensions(t, n, 2)
    }

    pub fn with_dimensions(t: usize, n: usize, d: usize) -> Self {
        let count = binomial(n, t);
        Self::with_order(t, n, PartitionOrder::new(count, d * t))
    }

    /// Partition order with randomly permuted digits
    pub fn random(t: usize, n: usize, seed: u64) -> Self {
        let count = binomial(n, t);
        let mut order = PartitionOrder::new(count, 2 * t);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for dim in order.dims.iter_mut() {
            dim.shuffle(&mut rng);
        }
        Self::with_order(t, n, order)
    }
}

impl<O: IndexOrder> Iterator for Combinations<O> {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.counter >= self.count {
            return None;
        }
        let index = self.order.next_index(self.counter, self.count);
        self.counter += 1;
        Some(unrank_lexicographic(index, self.n, self.t))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.count - self.counter) as usize;
        (remaining, Some(remaining))
    }
}

impl<O: IndexOrder> CombinationIterator for Combinations<O> {
    fn t(&self) -> usize {
        self.t
    }

    fn n(&self) -> usize {
        self.n
    }

    fn size(&self) -> u64 {
        self.count
    }
}

impl IndexOrder for LexicographicOrder {
    fn next_index(&mut self, counter: u64, _count: u64) -> u64 {
        counter
    }
}

impl IndexOrder for InverseLexicographicOrder {
    fn next_index(&mut self, counter: u64, count: u64) -> u64 {
        count - 1 - counter
    }
}

fn interleaved(counter: u64, count: u64) -> u64 {
    match counter % 2 {
        0 => counter / 2,
        _ => count - 1 - counter / 2,
    }
}

impl IndexOrder for InterleavedOrder {
    fn next_index(&mut self, counter: u64, count: u64) -> u64 {
        interleaved(counter, count)
    }
}

impl IndexOrder for InverseInterleavedOrder {
    fn next_index(&mut self, counter: u64, count: u64) -> u64 {
        interleaved(count - 1 - counter, count)
    }
}

impl PartitionOrder {
    fn new(count: u64, dimensions: usize) -> Self {
        let radix = ceil_root(count, dimensions as u32);
        Self {
            dims: vec![(0..radix).collect(); dimensions],
            pos: vec![0; dimensions],
            radix,
        }
    }
}

impl IndexOrder for PartitionOrder {
    fn next_index(&mut self, _counter: u64, count: u64) -> u64 {
        loop {
            let mut result: u64 = 0;
            let mut weight: u64 = 1;
            for (dim, p) in self.dims.iter().zip(&self.pos) {
                result = result.saturating_add(weight.saturating_mul(dim[*p]));
                weight = weight.saturating_mul(self.radix);
            }
            for p in self.pos.iter_mut().rev() {
                if (*p as u64) + 1 < self.radix {
                    *p += 1;
                    break;
                }
                *p = 0;
            }
            if result < count {
                return result;
            }
        }
    }
}

impl IteratorId {
    /// Create an iterator over the subsets of size t of `[0, n)`.
    ///
    /// Note that `Default` gives an [InverseDefaultIterator] and `InverseDefault` gives a [DefaultIterator].
    pub fn create(&self, t: usize, n: usize) -> Box<dyn CombinationIterator> {
        match self {
            IteratorId::Default => Box::new(InverseDefaultIterator::new(t, n)),
            IteratorId::InverseDefault => Box::new(DefaultIterator::new(t, n)),
            IteratorId::Lexicographic => Box::new(LexicographicIterator::new(t, n)),
            IteratorId::InverseLexicographic => Box::new(InverseLexicographicIterator::new(t, n)),
            IteratorId::Partition => Box::new(PartitionIterator::partition(t, n)),
            IteratorId::RandomPartition => Box::new(PartitionIterator::random(t, n, DEFAULT_SEED)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::combinations::*;
    use std::collections::HashSet;

    const ALL: [IteratorId; 6] = [
        IteratorId::InverseDefault,
        IteratorId::Default,
        IteratorId::Lexicographic,
        IteratorId::InverseLexicographic,
        IteratorId::RandomPartition,
        IteratorId::Partition,
    ];

    #[test]
    fn lexicographic() {
        let all: Vec<Vec<usize>> = LexicographicIterator::new(2, 4).collect();
        assert_eq!(all, vec![vec![0, 1], vec![0, 2], vec![0, 3], vec![1, 2], vec![1, 3], vec![2, 3]]);

        let mut inverse: Vec<Vec<usize>> = InverseLexicographicIterator::new(2, 4).collect();
        inverse.reverse();
        assert_eq!(inverse, all);

        let interleaved: Vec<Vec<usize>> = DefaultIterator::new(2, 4).collect();
        assert_eq!(interleaved[0], vec![0, 1]);
        assert_eq!(interleaved[1], vec![2, 3]);
        assert_eq!(interleaved[2], vec![0, 2]);
    }

    #[test]
    fn bijection() {
        for (t, n) in [(1, 5), (2, 4), (2, 7), (3, 6), (3, 10), (4, 9), (0, 3), (4, 3)] {
            for id in ALL {
                let mut it = id.create(t, n);
                let expected = binomial(n, t);
                assert_eq!(it.size(), expected);
                let mut seen = HashSet::new();
                for positions in &mut it {
                    assert_eq!(positions.len(), t);
                    assert!(positions.windows(2).all(|w| w[0] < w[1]));
                    assert!(positions.iter().all(|p| *p < n));
                    assert!(seen.insert(positions), "{:?} repeats a subset", id);
                }
                assert_eq!(seen.len() as u64, expected, "{:?} for C({}, {})", id, n, t);
                assert_eq!(it.next(), None);
            }
        }
    }

    #[test]
    fn partitions() {
        // the partition order starts with widely separated subsets
        let first: Vec<Vec<usize>> = PartitionIterator::partition(2, 10).take(2).collect();
        assert_eq!(first[0], vec![0, 1]);
        assert_ne!(first[1][0], 0);

        let a: Vec<Vec<usize>> = PartitionIterator::random(2, 8, 7).collect();
        let b: Vec<Vec<usize>> = PartitionIterator::random(2, 8, 7).collect();
        assert_eq!(a, b);
    }
}
