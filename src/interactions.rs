//! Identify the t-wise interactions responsible for failing configurations.
//!
//! A finder starts from a sample of configurations, which are classified by a verifier
//! (a closure returning `true` for the configurations which pass). The candidates are the
//! interactions of size t shared by all failing configurations and by none of the passing ones.
//! New configurations are then requested from a [SolutionUpdater] and verified: a passing
//! configuration discards the candidates it covers, a failing one keeps only the candidates
//! it covers.
//!
//! The order of the candidates follows the [combination iterator](crate::combinations) used to
//! enumerate them, and is preserved by each refinement.

use crate::combinations::IteratorId;
use crate::*;

use log::debug;

/// Produce complete configurations, typically by calling a SAT solver on a feature model.
pub trait SolutionUpdater {
    /// Find a valid configuration containing all literals of `include` (if any) and,
    /// for each list of `exclude`, missing at least one of its literals.
    ///
    /// Returns None if no such configuration exists.
    fn complete(&mut self, include: Option<&LiteralList>, exclude: &[LiteralList]) -> Option<LiteralList>;
}

/// Configurations and candidate counts collected by a finder
#[derive(Clone, Debug, Default)]
pub struct InteractionStatistics {
    pub correct_configurations: Vec<LiteralList>,
    pub failing_configurations: Vec<LiteralList>,
    /// Number of candidates at the start of each refinement step
    pub interaction_counts: Vec<usize>,
}

/// Search the interactions causing failures
pub trait InteractionFinder {
    /// Find the candidate interactions of size t, among `number_of_features` variables.
    ///
    /// The monitor is checked before each new configuration.
    fn find(
        &mut self,
        t: usize,
        number_of_features: usize,
        monitor: &dyn Monitor,
    ) -> Result<Vec<LiteralList>, FokitError>;

    fn statistics(&self) -> &InteractionStatistics;
}

/// State shared by the interaction finders
pub struct FinderState<U, V> {
    updater: U,
    verifier: V,
    iterator: IteratorId,
    statistics: InteractionStatistics,
}

/// Refine the candidates with unconstrained configurations
pub struct RandomInteractionFinder<U, V> {
    state: FinderState<U, V>,
}

/// Refine the candidates with configurations separating two halves of the candidates
pub struct SplitInteractionFinder<U, V> {
    state: FinderState<U, V>,
}

impl<U, V> FinderState<U, V>
where
    U: SolutionUpdater,
    V: FnMut(&LiteralList) -> bool,
{
    fn new(sample: Vec<LiteralList>, updater: U, mut verifier: V) -> Self {
        let mut statistics = InteractionStatistics::default();
        for configuration in sample {
            match verifier(&configuration) {
                true => statistics.correct_configurations.push(configuration),
                false => statistics.failing_configurations.push(configuration),
            }
        }
        Self {
            updater,
            verifier,
            iterator: IteratorId::default(),
            statistics,
        }
    }

    /// Collect the interactions of size t found in all failing configurations and in no passing one.
    ///
    /// If the failing configurations share less than t literals, the list of shared literals
    /// is the only candidate.
    pub fn compute_potential_interactions(&self, t: usize) -> Vec<LiteralList> {
        let mut failing = self.statistics.failing_configurations.iter();
        let common = match failing.next() {
            None => return vec![],
            Some(first) => {
                let mut literals: Vec<i32> = first.literals().to_vec();
                for other in failing {
                    literals.retain(|l| other.contains(*l));
                }
                LiteralList::with_sorted(literals, first.order())
            }
        };

        let candidates = match common.len() < t {
            true => vec![common],
            false => {
                let mut it = self.iterator.create(t, common.len());
                std::iter::from_fn(|| it.next_interaction(&common)).collect()
            }
        };
        let correct = &self.statistics.correct_configurations;
        candidates
            .into_iter()
            .filter(|i| !correct.iter().any(|c| c.contains_all(i)))
            .collect()
    }

    /// Verify a new configuration and keep the consistent candidates
    fn refine(&mut self, candidates: Vec<LiteralList>, configuration: LiteralList) -> Vec<LiteralList> {
        let passes = (self.verifier)(&configuration);
        let refined: Vec<LiteralList> = candidates
            .into_iter()
            .filter(|i| configuration.contains_all(i) != passes)
            .collect();
        debug!(
            "{} configuration {}: {} candidates left",
            if passes { "Correct" } else { "Failing" },
            configuration,
            refined.len()
        );
        match passes {
            true => self.statistics.correct_configurations.push(configuration),
            false => self.statistics.failing_configurations.push(configuration),
        }
        refined
    }
}

fn random_budget(number_of_features: usize) -> usize {
    let log = (3.0 * (number_of_features as f64).log2()).floor().max(0.0);
    2 * (log as usize) + 100
}

fn split_budget(number_of_features: usize) -> usize {
    let log = (2.0 * (number_of_features as f64).ln()).ceil().max(0.0);
    2 * (log as usize) + number_of_features
}

impl<U, V> RandomInteractionFinder<U, V>
where
    U: SolutionUpdater,
    V: FnMut(&LiteralList) -> bool,
{
    pub fn new(sample: Vec<LiteralList>, updater: U, verifier: V) -> Self {
        Self {
            state: FinderState::new(sample, updater, verifier),
        }
    }

    /// Select the order in which the candidates are enumerated
    pub fn with_iterator(mut self, iterator: IteratorId) -> Self {
        self.state.iterator = iterator;
        self
    }

    pub fn compute_potential_interactions(&self, t: usize) -> Vec<LiteralList> {
        self.state.compute_potential_interactions(t)
    }
}

impl<U, V> InteractionFinder for RandomInteractionFinder<U, V>
where
    U: SolutionUpdater,
    V: FnMut(&LiteralList) -> bool,
{
    fn find(
        &mut self,
        t: usize,
        number_of_features: usize,
        monitor: &dyn Monitor,
    ) -> Result<Vec<LiteralList>, FokitError> {
        let mut candidates = self.state.compute_potential_interactions(t);
        let budget = random_budget(number_of_features);
        debug!("{} potential interactions, budget of {} configurations", candidates.len(), budget);

        for _ in 0..budget {
            if candidates.len() <= 1 {
                break;
            }
            monitor.check_cancel()?;
            self.state.statistics.interaction_counts.push(candidates.len());
            let configuration = match self.state.updater.complete(None, &[]) {
                Some(c) => c,
                None => return Ok(candidates),
            };
            candidates = self.state.refine(candidates, configuration);
        }
        Ok(candidates)
    }

    fn statistics(&self) -> &InteractionStatistics {
        &self.state.statistics
    }
}

impl<U, V> SplitInteractionFinder<U, V>
where
    U: SolutionUpdater,
    V: FnMut(&LiteralList) -> bool,
{
    pub fn new(sample: Vec<LiteralList>, updater: U, verifier: V) -> Self {
        Self {
            state: FinderState::new(sample, updater, verifier),
        }
    }

    pub fn with_iterator(mut self, iterator: IteratorId) -> Self {
        self.state.iterator = iterator;
        self
    }

    pub fn compute_potential_interactions(&self, t: usize) -> Vec<LiteralList> {
        self.state.compute_potential_interactions(t)
    }

    /// Try the separations of the candidates until one of them can be completed
    fn find_configuration(&mut self, candidates: &[LiteralList]) -> Option<LiteralList> {
        for k in std::iter::once(None).chain((0..candidates.len()).map(Some)) {
            let (left, right) = match k {
                None => split(candidates),
                Some(k) => split_with(candidates, &LiteralSet::from(&candidates[k])),
            };
            let include = LiteralList::merge(left);
            let exclude: Vec<LiteralList> = match right.is_empty() {
                true => vec![],
                false => vec![LiteralList::merge(right)],
            };
            if let Some(configuration) = self.state.updater.complete(Some(&include), &exclude) {
                return Some(configuration);
            }
        }
        None
    }
}

/// Separate the candidates using most of their literals, or the literals of the first one
fn split(candidates: &[LiteralList]) -> (Vec<&LiteralList>, Vec<&LiteralList>) {
    let literals = LiteralList::merge(candidates);
    let selected = (literals.len() as f64 * 0.7) as usize;
    let selection: LiteralSet = literals.iter().take(selected).copied().collect();
    let (left, right) = split_with(candidates, &selection);
    if !left.is_empty() && !right.is_empty() {
        return (left, right);
    }
    split_with(candidates, &LiteralSet::from(&candidates[0]))
}

/// Separate the candidates included in a selection of literals from the others
fn split_with<'a>(candidates: &'a [LiteralList], selection: &LiteralSet) -> (Vec<&'a LiteralList>, Vec<&'a LiteralList>) {
    candidates.iter().partition(|c| selection.contains_all(c))
}

impl<U, V> InteractionFinder for SplitInteractionFinder<U, V>
where
    U: SolutionUpdater,
    V: FnMut(&LiteralList) -> bool,
{
    fn find(
        &mut self,
        t: usize,
        number_of_features: usize,
        monitor: &dyn Monitor,
    ) -> Result<Vec<LiteralList>, FokitError> {
        let mut candidates = self.state.compute_potential_interactions(t);
        let budget = split_budget(number_of_features);
        debug!("{} potential interactions, budget of {} configurations", candidates.len(), budget);

        for _ in 0..budget {
            if candidates.len() <= 1 {
                break;
            }
            monitor.check_cancel()?;
            self.state.statistics.interaction_counts.push(candidates.len());
            let configuration = match self.find_configuration(&candidates) {
                Some(c) => c,
                None => return Ok(candidates),
            };
            candidates = self.state.refine(candidates, configuration);
        }
        Ok(candidates)
    }

    fn statistics(&self) -> &InteractionStatistics {
        &self.state.statistics
    }
}

#[cfg(test)]
mod tests {
    use crate::interactions::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use test_log::test;

    fn natural(lits: &[i32]) -> LiteralList {
        LiteralList::new(lits.to_vec(), Order::Natural).unwrap()
    }

    /// Enumerate all configurations of a few variables, starting from a random one
    struct BruteForce {
        n: usize,
        rng: ChaCha8Rng,
    }

    impl SolutionUpdater for BruteForce {
        fn complete(&mut self, include: Option<&LiteralList>, exclude: &[LiteralList]) -> Option<LiteralList> {
            let total = 1u64 << self.n;
            let start = self.rng.gen_range(0..total);
            (0..total).map(|i| (start + i) % total).find_map(|bits| {
                let literals = (1..=self.n)
                    .map(|v| match bits & (1 << (v - 1)) != 0 {
                        true => v as i32,
                        false => -(v as i32),
                    })
                    .collect();
                let config = LiteralList::new(literals, Order::Natural).ok()?;
                let included = include.map_or(true, |i| config.contains_all(i));
                let excluded = exclude.iter().any(|e| config.contains_all(e));
                (included && !excluded).then_some(config)
            })
        }
    }

    fn updater(n: usize) -> BruteForce {
        BruteForce {
            n,
            rng: ChaCha8Rng::seed_from_u64(42),
        }
    }

    /// Fails when 2 and -4 are both selected
    fn verifier(config: &LiteralList) -> bool {
        !(config.contains(2) && config.contains(-4))
    }

    fn sample() -> Vec<LiteralList> {
        vec![natural(&[1, 2, 3, -4, 5]), natural(&[-1, 2, 3, 4, 5]), natural(&[1, -2, -3, -4, -5])]
    }

    #[test]
    fn potential_interactions() {
        let finder = RandomInteractionFinder::new(sample(), updater(5), verifier);
        let candidates = finder.compute_potential_interactions(2);
        // pairs of [-4, 1, 2, 3, 5] without the pairs covered by passing configurations
        assert_eq!(candidates.len(), 10 - 3 - 1);
        assert!(candidates.contains(&natural(&[-4, 2])));
        assert!(!candidates.contains(&natural(&[2, 3])));
        assert!(!candidates.contains(&natural(&[-4, 1])));

        let single = finder.compute_potential_interactions(6);
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].len(), 5);
    }

    #[test]
    fn random_finder() -> Result<(), FokitError> {
        let mut finder = RandomInteractionFinder::new(sample(), updater(5), verifier);
        let found = finder.find(2, 5, &NullMonitor)?;
        assert_eq!(found, vec![natural(&[-4, 2])]);

        let stats = finder.statistics();
        for c in &stats.correct_configurations {
            assert!(!c.contains_all(&found[0]));
        }
        for c in &stats.failing_configurations {
            assert!(c.contains_all(&found[0]));
        }
        assert!(!stats.interaction_counts.is_empty());
        Ok(())
    }

    #[test]
    fn split_finder() -> Result<(), FokitError> {
        let mut finder = SplitInteractionFinder::new(sample(), updater(5), verifier)
            .with_iterator(IteratorId::InverseLexicographic);
        let found = finder.find(2, 5, &NullMonitor)?;
        assert_eq!(found, vec![natural(&[-4, 2])]);
        Ok(())
    }

    #[test]
    fn cancelled_search() {
        let flag = CancelFlag::new();
        flag.cancel();
        let mut finder = SplitInteractionFinder::new(sample(), updater(5), verifier);
        assert!(matches!(finder.find(2, 5, &flag), Err(FokitError::Cancelled)));
    }

    #[test]
    fn budgets() {
        assert_eq!(random_budget(1), 100);
        assert_eq!(random_budget(8), 118);
        assert_eq!(split_budget(1), 1);
        assert_eq!(split_budget(10), 2 * 5 + 10);
    }
}
