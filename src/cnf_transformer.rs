//! Hybrid CNF transformation and DNF transformation of formulas

use crate::normal_forms::{is_cnf, nf_tester, simplify_for_nf, to_clausal_nf, NormalForm};
use crate::*;

use log::debug;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};

/// Transform formulas into an equisatisfiable clausal CNF.
///
/// Each top-level conjunct of the simplified formula is converted separately:
/// * conjuncts already in CNF are used as they are
/// * other conjuncts are expanded with the [distributive law](DistributiveLawTransformer),
///   within a budget of literals
/// * when the budget is exceeded, the conjunct is encoded with [Tseytin](TseytinTransformer)
///
/// The auxiliary variables of the Tseytin encodings are then added to a copy of the variable
/// map with generated names (`__temp__0`, `__temp__1`...). Identical Tseytin definitions coming
/// from different conjuncts share the same auxiliary variable.
/// Clauses of the result are sorted by size, then by literals.
///
/// The result is equivalent to the input when no auxiliary variable was needed. Otherwise, it is
/// equisatisfiable: its models are the extensions of the models of the input.
///
/// ```
/// use fokit::{CnfTransformer, Expr, Formula, NullMonitor, VariableMap};
/// # use fokit::FokitError;
/// # fn main() -> Result<(), FokitError> {
/// let mut variables = VariableMap::new();
/// let a = variables.add_boolean_variable(Some("a"))?;
/// let b = variables.add_boolean_variable(Some("b"))?;
/// let formula = Formula::new(Expr::implies(a.into(), b.into()), variables);
///
/// let cnf = CnfTransformer::default().execute(&formula, &NullMonitor)?;
/// assert_eq!(cnf.to_string(), "(-a | b)");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct CnfTransformer {
    maximum_number_of_literals: usize,
    parallel: bool,
}

/// Transform formulas into an equivalent clausal DNF using the distributive law.
///
/// Unlike CNF, there is no fallback: exceeding the literal budget is an error.
#[derive(Clone, Debug)]
pub struct DnfTransformer {
    maximum_number_of_literals: usize,
}

/// Conversion of a single conjunct
enum Part {
    Clauses(Vec<Expr>),
    Tseytin(TseytinEncoding),
}

/// A Tseytin atom after resolution of the auxiliary variables which already have a global index
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum MergeAtom {
    /// The variable defined by the substitute
    Own(bool),
    Global(usize, bool),
    Original(Expr),
}

impl Default for CnfTransformer {
    fn default() -> Self {
        Self {
            maximum_number_of_literals: usize::MAX,
            parallel: false,
        }
    }
}

impl CnfTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the budget of a distribution, 0 disables the distributive law
    pub fn with_maximum_number_of_literals(mut self, maximum: usize) -> Self {
        self.maximum_number_of_literals = maximum;
        self
    }

    /// Convert the top-level conjuncts in parallel
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn maximum_number_of_literals(&self) -> usize {
        self.maximum_number_of_literals
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    pub fn execute(&self, formula: &Formula, monitor: &dyn Monitor) -> Result<Formula, FokitError> {
        let tester = nf_tester(formula.expr(), NormalForm::Cnf);
        if tester.is_nf() {
            debug!("Formula already in CNF");
            let expr = to_clausal_nf(formula.expr().clone(), NormalForm::Cnf)?;
            return Ok(Formula::new(expr, formula.variables().clone()));
        }

        let mut variables = formula.variables().clone();
        let conjuncts = match simplify_for_nf(formula.expr().clone())? {
            Expr::And(children) => children,
            e => vec![e],
        };

        let parts = match self.parallel {
            true => conjuncts
                .par_iter()
                .map(|c| self.transform(c, monitor))
                .collect::<Result<Vec<_>, _>>()?,
            false => conjuncts
                .iter()
                .map(|c| self.transform(c, monitor))
                .collect::<Result<Vec<_>, _>>()?,
        };

        let mut clauses = vec![];
        let mut encodings = vec![];
        for part in parts {
            match part {
                Part::Clauses(c) => clauses.extend(c),
                Part::Tseytin(e) => encodings.push(e),
            }
        }
        debug!(
            "{} clauses from the distributive law, {} Tseytin encodings",
            clauses.len(),
            encodings.len()
        );
        if !encodings.is_empty() {
            clauses.extend(merge_encodings(&encodings, &mut variables)?);
        }

        clauses.retain(|c| !is_tautology(c));
        let mut expr = to_clausal_nf(Expr::And(clauses), NormalForm::Cnf)?;
        if let Expr::And(clauses) = &mut expr {
            clauses.sort_by_cached_key(clause_key);
        }
        Ok(Formula::new(expr, variables))
    }

    fn transform(&self, child: &Expr, monitor: &dyn Monitor) -> Result<Part, FokitError> {
        monitor.check_cancel()?;
        if is_cnf(child) {
            return Ok(Part::Clauses(match child {
                Expr::And(c) => c.clone(),
                e => vec![e.clone()],
            }));
        }
        if self.maximum_number_of_literals > 0 {
            let distributive = DistributiveLawTransformer::new(NormalForm::Cnf)
                .with_maximum_number_of_literals(self.maximum_number_of_literals);
            match distributive.execute(child.clone(), monitor)? {
                Distribution::Done(e) => return Ok(Part::Clauses(e.into_children())),
                Distribution::BudgetExceeded => debug!("Fall back to Tseytin for a conjunct of size {}", child.size()),
            }
        }
        Ok(Part::Tseytin(TseytinTransformer.execute(child, monitor)?))
    }
}

/// Move the auxiliary variables of all encodings into the variable map and collect their clauses.
///
/// Substitutes are processed in order: a substitute only refers to auxiliary variables defined by
/// previous substitutes of the same encoding, which are already resolved to their global index.
/// A substitute identical to a previous one is dropped and its variable is bound to the existing one.
fn merge_encodings(encodings: &[TseytinEncoding], variables: &mut VariableMap) -> Result<Vec<Expr>, FokitError> {
    let mut defined: HashMap<Vec<Vec<MergeAtom>>, usize> = HashMap::new();
    let mut asserted: HashSet<Vec<Vec<MergeAtom>>> = HashSet::new();
    let mut clauses = vec![];
    let mut count = 0;
    let mut shared = 0;

    for encoding in encodings {
        let mut local: HashMap<usize, usize> = HashMap::new();
        for substitute in encoding.substitutes() {
            let own = substitute.variable();
            let resolved = substitute
                .clauses()
                .iter()
                .map(|clause| {
                    clause
                        .iter()
                        .map(|atom| resolve(atom, own, &local))
                        .collect::<Result<Vec<_>, _>>()
                })
                .collect::<Result<Vec<_>, _>>()?;

            let var = match own {
                None => {
                    if asserted.insert(resolved.clone()) {
                        clauses.extend(resolved.iter().map(|c| to_clause(c, 0)));
                    }
                    continue;
                }
                Some(v) => v,
            };
            if let Some(global) = defined.get(&resolved) {
                local.insert(var, *global);
                shared += 1;
                continue;
            }

            let global = loop {
                let name = format!("__temp__{}", count);
                count += 1;
                if !variables.contains_name(&name) {
                    break variables.add_boolean_variable(Some(&name))?.index();
                }
            };
            local.insert(var, global);
            clauses.extend(resolved.iter().map(|c| to_clause(c, global)));
            defined.insert(resolved, global);
        }
    }
    debug!(
        "Merged Tseytin encodings: {} auxiliary variables, {} shared definitions",
        defined.len(),
        shared
    );
    Ok(clauses)
}

fn resolve(atom: &TseytinAtom, own: Option<usize>, local: &HashMap<usize, usize>) -> Result<MergeAtom, FokitError> {
    Ok(match atom {
        TseytinAtom::Original(e) => MergeAtom::Original(e.clone()),
        TseytinAtom::Auxiliary(v, p) if Some(*v) == own => MergeAtom::Own(*p),
        TseytinAtom::Auxiliary(v, p) => match local.get(v) {
            Some(g) => MergeAtom::Global(*g, *p),
            None => return Err(FokitError::NoSuchVariable(*v)),
        },
    })
}

fn to_clause(atoms: &[MergeAtom], own: usize) -> Expr {
    Expr::Or(
        atoms
            .iter()
            .map(|a| match a {
                MergeAtom::Own(p) => Expr::literal(own, *p),
                MergeAtom::Global(g, p) => Expr::literal(*g, *p),
                MergeAtom::Original(e) => e.clone(),
            })
            .collect(),
    )
}

/// Clauses which are always satisfied, such as the clause of a distribution without clauses
fn is_tautology(clause: &Expr) -> bool {
    match clause {
        Expr::True => true,
        Expr::Or(c) => c.contains(&Expr::True),
        _ => false,
    }
}

/// Sort clauses by size, then by their literals in DIMACS notation
fn clause_key(clause: &Expr) -> (usize, Vec<i64>) {
    let children = clause.children();
    let key = children
        .iter()
        .map(|e| match e {
            Expr::Literal(l) => l.to_dimacs() as i64,
            _ => i64::MAX,
        })
        .collect();
    (children.len(), key)
}

impl Default for DnfTransformer {
    fn default() -> Self {
        Self {
            maximum_number_of_literals: usize::MAX,
        }
    }
}

impl DnfTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_maximum_number_of_literals(mut self, maximum: usize) -> Self {
        self.maximum_number_of_literals = maximum;
        self
    }

    /// Fails with [FokitError::LiteralBudgetExceeded] if the distribution exceeds the budget.
    pub fn execute(&self, formula: &Formula, monitor: &dyn Monitor) -> Result<Formula, FokitError> {
        let tester = nf_tester(formula.expr(), NormalForm::Dnf);
        let expr = if tester.is_clausal_nf() {
            formula.expr().clone()
        } else if tester.is_nf() {
            to_clausal_nf(formula.expr().clone(), NormalForm::Dnf)?
        } else {
            let simplified = simplify_for_nf(formula.expr().clone())?;
            let distributive = DistributiveLawTransformer::new(NormalForm::Dnf)
                .with_maximum_number_of_literals(self.maximum_number_of_literals);
            match distributive.execute(simplified, monitor)? {
                Distribution::Done(e) => to_clausal_nf(e, NormalForm::Dnf)?,
                Distribution::BudgetExceeded => {
                    return Err(FokitError::LiteralBudgetExceeded(self.maximum_number_of_literals))
                }
            }
        };
        Ok(Formula::new(expr, formula.variables().clone()))
    }
}

#[cfg(test)]
mod tests {
    use crate::normal_forms::*;
    use crate::*;
    use test_log::test;

    fn lit(i: isize) -> Expr {
        Expr::literal(i.unsigned_abs(), i > 0)
    }

    fn formula(e: Expr, count: usize) -> Formula {
        let names: Vec<String> = (1..=count).map(|i| format!("x{}", i)).collect();
        let variables = VariableMap::from_names(names.iter().map(|s| s.as_str())).unwrap();
        Formula::new(e, variables)
    }

    /// Each assignment of the original variables is a model iff it extends to a model of the result
    fn assert_equisatisfiable(f: &Formula, result: &Formula) {
        let count = f.variables().len();
        let aux = result.variables().len() - count;
        for bits in 0..(1u64 << count) {
            let expected = f.eval(&IndexAssignment::from_bits(count, bits));
            let found = (0..(1u64 << aux)).any(|ext| {
                result.eval(&IndexAssignment::from_bits(count + aux, bits | (ext << count))) == Some(true)
            });
            assert_eq!(expected, Some(found), "{} -> {}", f, result);
        }
    }

    #[test]
    fn shortcut_and_distribution() -> Result<(), FokitError> {
        let f = formula(lit(1) & (lit(2) | lit(-3)), 3);
        let cnf = CnfTransformer::default().execute(&f, &NullMonitor)?;
        assert_eq!(cnf.expr(), &Expr::And(vec![Expr::Or(vec![lit(1)]), lit(2) | lit(-3)]));

        let f = formula((lit(1) & lit(2)) | Expr::implies(lit(3), lit(-1)), 3);
        let cnf = CnfTransformer::default().execute(&f, &NullMonitor)?;
        assert!(is_clausal_nf(cnf.expr(), NormalForm::Cnf));
        assert_eq!(cnf.variables(), f.variables());
        assert_equisatisfiable(&f, &cnf);
        Ok(())
    }

    #[test]
    fn tseytin_fallback() -> Result<(), FokitError> {
        let e = (lit(1) & lit(2)) | (lit(3) & lit(4)) | (lit(5) & lit(-1));
        let f = formula(e.clone() & lit(6), 6);
        let transformer = CnfTransformer::default().with_maximum_number_of_literals(4);
        let cnf = transformer.execute(&f, &NullMonitor)?;
        assert!(is_clausal_nf(cnf.expr(), NormalForm::Cnf));
        // three conjunctions and the disjunction
        assert_eq!(cnf.variables().len(), 10);
        assert_eq!(cnf.variables().name(7), Some("__temp__0"));
        assert_equisatisfiable(&f, &cnf);

        // sorted by size
        let sizes: Vec<usize> = cnf.expr().children().iter().map(|c| c.children().len()).collect();
        assert!(sizes.windows(2).all(|w| w[0] <= w[1]));
        Ok(())
    }

    #[test]
    fn shared_definitions() -> Result<(), FokitError> {
        let g = (lit(1) & lit(2)) | (lit(3) & lit(-4));
        let f = formula((g.clone() | lit(5)) & (g | lit(-5)), 5);
        let transformer = CnfTransformer::default().with_maximum_number_of_literals(0);
        let cnf = transformer.execute(&f, &NullMonitor)?;
        // the conjunctions of g are shared, the disjunctions differ
        assert_eq!(cnf.variables().len(), 5 + 2 + 2);
        assert_equisatisfiable(&f, &cnf);

        let mut variables = f.variables().clone();
        variables.add_boolean_variable(Some("__temp__0"))?;
        let f = Formula::new(f.expr().clone(), variables);
        let cnf = transformer.with_parallel(true).execute(&f, &NullMonitor)?;
        assert_eq!(cnf.variables().name(7), Some("__temp__1"));
        Ok(())
    }

    #[test]
    fn constant_results() -> Result<(), FokitError> {
        let tautology = formula((lit(1) & lit(2)) | lit(-1) | lit(-2), 2);
        let cnf = CnfTransformer::default().execute(&tautology, &NullMonitor)?;
        assert_eq!(cnf.expr(), &Expr::And(vec![Expr::Or(vec![Expr::True])]));
        assert!(is_clausal_nf(cnf.expr(), NormalForm::Cnf));
        assert!(Cnf::from_formula(&cnf)?.is_empty());

        // the tautology disappears next to other clauses
        let f = formula(tautology.expr() & (lit(1) | (lit(2) & lit(-1))), 2);
        let cnf = CnfTransformer::default().execute(&f, &NullMonitor)?;
        assert!(!cnf.expr().children().contains(&&Expr::Or(vec![Expr::True])));
        assert_equisatisfiable(&f, &cnf);

        let empty = formula(Expr::And(vec![]), 2);
        let cnf = CnfTransformer::default().execute(&empty, &NullMonitor)?;
        assert_eq!(cnf.expr(), &Expr::And(vec![Expr::Or(vec![Expr::True])]));

        let contradiction = formula((lit(1) | lit(2)) & lit(-1) & Expr::implies(lit(3), lit(-2)) & lit(3), 3);
        let dnf = DnfTransformer::default().execute(&contradiction, &NullMonitor)?;
        assert_eq!(dnf.expr(), &Expr::Or(vec![Expr::And(vec![Expr::False])]));
        let mut copy = dnf.expr().clone();
        assert!(copy.set_children(dnf.expr().children().into_iter().cloned().collect()).is_ok());
        Ok(())
    }

    #[test]
    fn cancellation() {
        let flag = CancelFlag::new();
        flag.cancel();
        let f = formula((lit(1) & lit(2)) | lit(3), 3);
        assert!(matches!(
            CnfTransformer::default().execute(&f, &flag),
            Err(FokitError::Cancelled)
        ));
    }

    #[test]
    fn dnf() -> Result<(), FokitError> {
        let f = formula(Expr::implies(lit(1), lit(2)), 2);
        let dnf = DnfTransformer::default().execute(&f, &NullMonitor)?;
        assert_eq!(dnf.expr(), &Expr::Or(vec![Expr::And(vec![lit(-1)]), Expr::And(vec![lit(2)])]));

        let f = formula((lit(1) | lit(2)) & (lit(3) | lit(4)) & Expr::biimplies(lit(1), lit(3)), 4);
        let dnf = DnfTransformer::default().execute(&f, &NullMonitor)?;
        assert!(is_clausal_nf(dnf.expr(), NormalForm::Dnf));
        assert_equisatisfiable(&f, &dnf);

        let limited = DnfTransformer::default().with_maximum_number_of_literals(2);
        assert!(matches!(
            limited.execute(&f, &NullMonitor),
            Err(FokitError::LiteralBudgetExceeded(2))
        ));
        Ok(())
    }
}
