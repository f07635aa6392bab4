//! Normal form expansion using the distributive law

use crate::normal_forms::NormalForm;
use crate::*;

use log::{debug, trace};

/// Outcome of a distribution.
#[derive(Clone, Debug, PartialEq)]
pub enum Distribution {
    /// The equivalent formula in normal form: an outer node over clauses and literals
    Done(Expr),
    /// The clauses would exceed the literal budget, the partial result was discarded
    BudgetExceeded,
}

/// Expand a negation normal form into an equivalent CNF (or DNF) using the distributive law.
///
/// The tree is rewritten bottom-up: each clause node (disjunction for CNF, conjunction for DNF)
/// with a non-literal child is replaced by the product of its children. The new clauses
/// skip tautologies and are filtered for subsumption.
///
/// The output can be exponentially larger than the input. A budget limits the number of
/// literals emitted by a single product: when it is exceeded, the distribution is abandoned.
///
/// ```
/// use fokit::{Distribution, DistributiveLawTransformer, Expr, NormalForm, NullMonitor};
/// # use fokit::FokitError;
/// # fn main() -> Result<(), FokitError> {
/// let [a, b, c] = [1, 2, 3].map(|i| Expr::literal(i, true));
/// let expr = a.clone() | (b.clone() & c.clone());
///
/// let transformer = DistributiveLawTransformer::new(NormalForm::Cnf);
/// let result = transformer.execute(expr.clone(), &NullMonitor)?;
/// assert_eq!(result, Distribution::Done(Expr::And(vec![a.clone() | b, a | c])));
///
/// let transformer = transformer.with_maximum_number_of_literals(3);
/// assert_eq!(transformer.execute(expr, &NullMonitor)?, Distribution::BudgetExceeded);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct DistributiveLawTransformer {
    nf: NormalForm,
    maximum_number_of_literals: usize,
}

/// Reason to stop a distribution
enum Abort {
    Budget,
    Failed(FokitError),
}

impl From<FokitError> for Abort {
    fn from(e: FokitError) -> Self {
        Abort::Failed(e)
    }
}

/// A rewritten subtree, as seen by its parent
enum Rewritten {
    /// Literals are kept as they are
    Literal(Expr),
    /// A compound node, with the depth of its deepest compound descendant
    Node(Expr, usize),
    /// A clause node replaced by new clauses, which must be spliced into the parent
    Clauses(Vec<Expr>),
}

/// The state of a single distribution
struct Run<'a> {
    nf: NormalForm,
    maximum_number_of_literals: usize,
    number_of_literals: usize,
    monitor: &'a dyn Monitor,
}

impl DistributiveLawTransformer {
    /// Create a transformer targeting a normal form, without literal budget
    pub fn new(nf: NormalForm) -> Self {
        Self {
            nf,
            maximum_number_of_literals: usize::MAX,
        }
    }

    pub fn with_maximum_number_of_literals(mut self, maximum: usize) -> Self {
        self.maximum_number_of_literals = maximum;
        self
    }

    pub fn maximum_number_of_literals(&self) -> usize {
        self.maximum_number_of_literals
    }

    pub fn normal_form(&self) -> NormalForm {
        self.nf
    }

    /// Distribute an expression in negation normal form.
    ///
    /// The expression must only contain conjunctions, disjunctions and literals
    /// (see [simplify_for_nf](crate::normal_forms::simplify_for_nf)),
    /// other nodes are rejected with [FokitError::UnsupportedNode].
    pub fn execute(&self, expr: Expr, monitor: &dyn Monitor) -> Result<Distribution, FokitError> {
        let mut run = Run {
            nf: self.nf,
            maximum_number_of_literals: self.maximum_number_of_literals,
            number_of_literals: 0,
            monitor,
        };
        match run.rewrite(self.nf.outer(vec![expr])) {
            Ok(Rewritten::Node(e, _)) if e.children().is_empty() => Ok(Distribution::Done(self.nf.constant_clauses())),
            Ok(Rewritten::Node(e, _)) => Ok(Distribution::Done(e)),
            Ok(_) => Err(FokitError::UnsupportedNode("distribution root".into())),
            Err(Abort::Budget) => {
                debug!(
                    "Distribution exceeds the budget of {} literals",
                    self.maximum_number_of_literals
                );
                Ok(Distribution::BudgetExceeded)
            }
            Err(Abort::Failed(e)) => Err(e),
        }
    }
}

impl Run<'_> {
    fn rewrite(&mut self, node: Expr) -> Result<Rewritten, Abort> {
        if node.is_terminal() {
            return Ok(Rewritten::Literal(node));
        }
        self.monitor.check_cancel()?;

        let is_inner = self.nf.is_inner(&node);
        if !is_inner && !self.nf.is_outer(&node) {
            return Err(FokitError::UnsupportedNode(node.name().into()).into());
        }

        let mut nested = vec![];
        self.flatten(node.into_children(), is_inner, &mut nested);

        let mut children = vec![];
        let mut max_depth = 0;
        for child in nested {
            match self.rewrite(child)? {
                Rewritten::Literal(e) => children.push(e),
                Rewritten::Node(e, depth) => {
                    max_depth = max_depth.max(depth + 1);
                    // nested nodes of the same type are merged
                    match self.nf.is_inner(&e) == is_inner {
                        true => children.extend(e.into_children()),
                        false => children.push(e),
                    }
                }
                // only clause nodes are distributed and they never are children of a clause node
                Rewritten::Clauses(clauses) => {
                    max_depth = max_depth.max(1);
                    children.extend(clauses);
                }
            }
        }

        if is_inner && max_depth > 0 {
            return Ok(Rewritten::Clauses(self.convert(children)?));
        }
        let rebuilt = match is_inner {
            true => self.nf.inner(children),
            false => self.nf.outer(children),
        };
        Ok(Rewritten::Node(rebuilt, max_depth))
    }

    /// Collect children, replacing nested nodes of the same connective by their own children
    fn flatten(&self, children: Vec<Expr>, is_inner: bool, flat: &mut Vec<Expr>) {
        for child in children {
            let same = match is_inner {
                true => self.nf.is_inner(&child),
                false => self.nf.is_outer(&child),
            };
            match same {
                true => self.flatten(child.into_children(), is_inner, flat),
                false => flat.push(child),
            }
        }
    }

    /// Compute the product of the children of a clause node
    fn convert(&mut self, mut children: Vec<Expr>) -> Result<Vec<Expr>, Abort> {
        self.number_of_literals = 0;
        children.sort_by_key(|c| c.children().len());

        let mut clauses = vec![];
        let mut literals = Vec::with_capacity(children.len() * 2);
        self.convert_nf(&children, &mut clauses, &mut literals, 0)?;

        // Remove subsumed clauses, starting from the smallest ones
        clauses.sort_by_key(|c| c.len());
        let mut kept: Vec<Option<Vec<Expr>>> = clauses.into_iter().map(Some).collect();
        let mut result = vec![];
        for i in 0..kept.len() {
            if let Some(clause) = kept[i].take() {
                for other in kept[i + 1..].iter_mut() {
                    if other.as_ref().map_or(false, |o| clause.iter().all(|l| o.contains(l))) {
                        *other = None;
                    }
                }
                result.push(self.nf.inner(clause));
            }
        }
        trace!("Distribution produced {} clauses", result.len());
        Ok(result)
    }

    fn convert_nf(
        &mut self,
        children: &[Expr],
        clauses: &mut Vec<Vec<Expr>>,
        literals: &mut Vec<Expr>,
        index: usize,
    ) -> Result<(), Abort> {
        if index == children.len() {
            self.number_of_literals += literals.len();
            if self.number_of_literals > self.maximum_number_of_literals {
                return Err(Abort::Budget);
            }
            clauses.push(literals.clone());
            return Ok(());
        }

        let child = &children[index];
        if child.is_terminal() {
            if literals.contains(child) {
                return self.convert_nf(children, clauses, literals, index + 1);
            }
            if !literals.contains(&!child) {
                literals.push(child.clone());
                self.convert_nf(children, clauses, literals, index + 1)?;
                literals.pop();
            }
            return Ok(());
        }

        if is_redundant(literals, child) {
            return self.convert_nf(children, clauses, literals, index + 1);
        }
        for grand_child in child.children() {
            if grand_child.is_terminal() {
                if !literals.contains(&!grand_child) {
                    literals.push(grand_child.clone());
                    self.convert_nf(children, clauses, literals, index + 1)?;
                    literals.pop();
                }
            } else {
                let great_grand_children = grand_child.children();
                if great_grand_children.iter().all(|l| !literals.contains(&!*l)) {
                    let before = literals.len();
                    for l in great_grand_children {
                        if !literals.contains(l) {
                            literals.push(l.clone());
                        }
                    }
                    self.convert_nf(children, clauses, literals, index + 1)?;
                    literals.truncate(before);
                }
            }
        }
        Ok(())
    }
}

/// A child is redundant if one of its options is already covered by the current literals
fn is_redundant(literals: &[Expr], child: &Expr) -> bool {
    child.children().iter().any(|e| match e.is_terminal() {
        true => literals.contains(e),
        false => e.children().iter().all(|l| literals.contains(l)),
    })
}

#[cfg(test)]
mod tests {
    use crate::normal_forms::*;
    use crate::*;
    use test_log::test;

    fn lit(i: isize) -> Expr {
        Expr::literal(i.unsigned_abs(), i > 0)
    }

    fn distribute(e: Expr, nf: NormalForm) -> Expr {
        let transformer = DistributiveLawTransformer::new(nf);
        match transformer.execute(e, &NullMonitor).unwrap() {
            Distribution::Done(e) => e,
            Distribution::BudgetExceeded => panic!("Unexpected budget overflow"),
        }
    }

    fn assert_equivalent(a: &Expr, b: &Expr, count: usize) {
        for bits in 0..(1u64 << count) {
            let assignment = IndexAssignment::from_bits(count, bits);
            assert_eq!(a.eval(&assignment), b.eval(&assignment), "{} != {}", a, b);
        }
    }

    #[test]
    fn cnf_distribution() {
        // (1 & 2) | (3 & 4)
        let e = (lit(1) & lit(2)) | (lit(3) & lit(4));
        let cnf = distribute(e.clone(), NormalForm::Cnf);
        assert!(is_clausal_nf(&cnf, NormalForm::Cnf));
        assert_eq!(cnf.children().len(), 4);
        assert_equivalent(&e, &cnf, 4);

        // already in CNF
        let e = lit(1) & (lit(2) | lit(-3));
        assert_eq!(distribute(e.clone(), NormalForm::Cnf), e);
    }

    #[test]
    fn dnf_distribution() {
        let e = (lit(1) | lit(2)) & (lit(3) | lit(-1));
        let dnf = distribute(e.clone(), NormalForm::Dnf);
        assert!(is_nf(&dnf, NormalForm::Dnf));
        assert_equivalent(&e, &dnf, 3);
        // 1 & -1 is dropped
        assert_eq!(dnf.children().len(), 3);
    }

    #[test]
    fn tautologies_and_subsumption() {
        // (1 & 2) | -1 gives (1 | -1) & (2 | -1): the first clause is a tautology
        let e = (lit(1) & lit(2)) | lit(-1);
        let cnf = distribute(e.clone(), NormalForm::Cnf);
        assert_eq!(cnf, Expr::And(vec![lit(-1) | lit(2)]));

        // (1 & (1 | 2)) | 3: the clause (1 | 2 | 3) is subsumed by (1 | 3)
        let e = (lit(1) & (lit(1) | lit(2))) | lit(3);
        let cnf = distribute(e.clone(), NormalForm::Cnf);
        assert_eq!(cnf, Expr::And(vec![lit(3) | lit(1)]));
        assert_equivalent(&e, &cnf, 3);
    }

    #[test]
    fn nested_products() {
        let e = ((lit(1) & (lit(2) | (lit(3) & lit(4)))) | lit(5)) & (lit(-1) | (lit(2) & lit(-5)));
        let cnf = distribute(e.clone(), NormalForm::Cnf);
        assert!(is_cnf(&cnf));
        assert_equivalent(&e, &cnf, 5);

        let dnf = distribute(e.clone(), NormalForm::Dnf);
        assert!(is_dnf(&dnf));
        assert_equivalent(&e, &dnf, 5);
    }

    #[test]
    fn unflattened_input() {
        // (1 & 2 | 3) | 4 built without the flattening operators
        let e = Expr::Or(vec![Expr::Or(vec![lit(1) & lit(2), lit(3)]), lit(4)]);
        let cnf = distribute(e.clone(), NormalForm::Cnf);
        assert!(is_clausal_nf(&cnf, NormalForm::Cnf));
        assert_eq!(cnf.children().len(), 2);
        assert_equivalent(&e, &cnf, 4);

        let e = Expr::And(vec![Expr::And(vec![lit(1) | lit(2), lit(3)]), Expr::And(vec![lit(-4)])]);
        let dnf = distribute(e.clone(), NormalForm::Dnf);
        assert!(is_clausal_nf(&dnf, NormalForm::Dnf));
        assert_equivalent(&e, &dnf, 4);

        let e = Expr::Or(vec![Expr::Or(vec![lit(1) & lit(-2)]), Expr::Or(vec![lit(2) & lit(3), lit(-1)])]);
        let cnf = distribute(e.clone(), NormalForm::Cnf);
        assert_equivalent(&e, &cnf, 3);
    }

    #[test]
    fn all_clauses_dropped() {
        // every clause of (1 & 2) | -1 | -2 is a tautology
        let e = (lit(1) & lit(2)) | lit(-1) | lit(-2);
        let cnf = distribute(e.clone(), NormalForm::Cnf);
        assert_eq!(cnf, Expr::And(vec![Expr::Or(vec![Expr::True])]));
        assert_equivalent(&e, &cnf, 2);
        let mut copy = cnf.clone();
        assert!(copy.set_children(cnf.into_children()).is_ok());

        // every term of (1 | 2) & -1 & -2 is a contradiction
        let e = (lit(1) | lit(2)) & lit(-1) & lit(-2);
        let dnf = distribute(e.clone(), NormalForm::Dnf);
        assert_eq!(dnf, Expr::Or(vec![Expr::And(vec![Expr::False])]));
        assert_equivalent(&e, &dnf, 2);
    }

    #[test]
    fn budget() {
        let e = (lit(1) & lit(2)) | (lit(3) & lit(4));
        // 4 clauses of 2 literals
        let transformer = DistributiveLawTransformer::new(NormalForm::Cnf).with_maximum_number_of_literals(8);
        assert!(matches!(transformer.execute(e.clone(), &NullMonitor), Ok(Distribution::Done(_))));
        let transformer = transformer.with_maximum_number_of_literals(7);
        assert!(matches!(transformer.execute(e, &NullMonitor), Ok(Distribution::BudgetExceeded)));
    }

    #[test]
    fn rejected_nodes() {
        let flag = CancelFlag::new();
        flag.cancel();
        let transformer = DistributiveLawTransformer::new(NormalForm::Cnf);
        let e = (lit(1) & lit(2)) | lit(3);
        assert!(matches!(transformer.execute(e, &flag), Err(FokitError::Cancelled)));

        let e = Expr::implies(lit(1), lit(2));
        assert!(matches!(
            transformer.execute(e, &NullMonitor),
            Err(FokitError::UnsupportedNode(_))
        ));
    }
}
