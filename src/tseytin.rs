//! Equisatisfiable CNF encoding using auxiliary variables

use crate::*;

use log::trace;
use std::collections::HashMap;

/// An element of a Tseytin clause.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TseytinAtom {
    /// A leaf of the encoded formula: literal, predicate or constant
    Original(Expr),
    /// An auxiliary variable of the encoding, with its polarity
    Auxiliary(usize, bool),
}

/// The clauses defining one auxiliary variable.
///
/// A substitute without variable holds the clauses asserting the root of the encoded formula.
/// Substitutes are equal if their clauses are equal, regardless of the variable they define.
#[derive(Clone, Debug)]
pub struct Substitute {
    clauses: Vec<Vec<TseytinAtom>>,
    variable: Option<usize>,
}

/// Result of a Tseytin transformation.
///
/// Auxiliary variables are stored in a private [VariableMap]: their indices are unrelated to
/// the indices of the encoded formula.
#[derive(Clone, Debug)]
pub struct TseytinEncoding {
    substitutes: Vec<Substitute>,
    auxiliaries: VariableMap,
}

/// Encode an expression into clauses with one auxiliary variable per compound subtree.
///
/// The result is equisatisfiable with the input: every model of the input extends to a model
/// of the clauses, and every model of the clauses projects to a model of the input.
/// Structurally equal subtrees share their auxiliary variable.
/// Negations are absorbed by the polarity of the atom they apply to.
///
/// Supported nodes are conjunctions, disjunctions, negations, implications and equivalences,
/// other connectives must be removed first with [simplify_for_nf](crate::normal_forms::simplify_for_nf).
#[derive(Clone, Copy, Debug, Default)]
pub struct TseytinTransformer;

impl TseytinAtom {
    fn negated(&self) -> TseytinAtom {
        match self {
            TseytinAtom::Original(e) => TseytinAtom::Original(!e),
            TseytinAtom::Auxiliary(v, p) => TseytinAtom::Auxiliary(*v, !p),
        }
    }
}

impl Substitute {
    pub fn clauses(&self) -> &[Vec<TseytinAtom>] {
        &self.clauses
    }

    /// The auxiliary variable defined by these clauses, if any
    pub fn variable(&self) -> Option<usize> {
        self.variable
    }
}

impl PartialEq for Substitute {
    fn eq(&self, other: &Self) -> bool {
        self.clauses == other.clauses
    }
}

impl Eq for Substitute {}

impl TseytinEncoding {
    /// Substitutes in dependency order: a substitute only refers to auxiliary variables defined before it
    pub fn substitutes(&self) -> &[Substitute] {
        &self.substitutes
    }

    pub fn auxiliaries(&self) -> &VariableMap {
        &self.auxiliaries
    }

    pub fn clause_count(&self) -> usize {
        self.substitutes.iter().map(|s| s.clauses.len()).sum()
    }

    /// Build the clausal CNF of the encoding, where the auxiliary variable `i` becomes
    /// the variable `offset + i`.
    pub fn to_cnf(&self, offset: usize) -> Expr {
        let clauses = self
            .substitutes
            .iter()
            .flat_map(|s| s.clauses.iter())
            .map(|clause| {
                Expr::Or(
                    clause
                        .iter()
                        .map(|a| match a {
                            TseytinAtom::Original(e) => e.clone(),
                            TseytinAtom::Auxiliary(v, p) => Expr::literal(offset + v, *p),
                        })
                        .collect(),
                )
            })
            .collect();
        Expr::And(clauses)
    }
}

/// State of a single encoding
struct Encoder<'a> {
    substitutes: Vec<Substitute>,
    auxiliaries: VariableMap,
    known: HashMap<&'a Expr, usize>,
    monitor: &'a dyn Monitor,
}

impl TseytinTransformer {
    pub fn execute(&self, expr: &Expr, monitor: &dyn Monitor) -> Result<TseytinEncoding, FokitError> {
        let mut encoder = Encoder {
            substitutes: vec![],
            auxiliaries: VariableMap::new(),
            known: HashMap::new(),
            monitor,
        };
        let root = encoder.atom(expr)?;
        encoder.substitutes.push(Substitute {
            clauses: vec![vec![root]],
            variable: None,
        });
        trace!(
            "Tseytin encoding with {} auxiliary variables",
            encoder.auxiliaries.len()
        );
        Ok(TseytinEncoding {
            substitutes: encoder.substitutes,
            auxiliaries: encoder.auxiliaries,
        })
    }
}

impl<'a> Encoder<'a> {
    /// Get the atom standing for a subtree, defining new auxiliary variables as needed
    fn atom(&mut self, expr: &'a Expr) -> Result<TseytinAtom, FokitError> {
        if expr.is_terminal() {
            return Ok(TseytinAtom::Original(expr.clone()));
        }
        if let Expr::Not(child) = expr {
            return Ok(self.atom(child)?.negated());
        }
        if let Some(v) = self.known.get(expr) {
            return Ok(TseytinAtom::Auxiliary(*v, true));
        }
        self.monitor.check_cancel()?;

        let children = expr
            .children()
            .into_iter()
            .map(|c| self.atom(c))
            .collect::<Result<Vec<_>, _>>()?;

        let z = self.auxiliaries.add_boolean_variable(None)?.index();
        let pos = TseytinAtom::Auxiliary(z, true);
        let neg = TseytinAtom::Auxiliary(z, false);
        let clauses = match expr {
            Expr::And(_) => {
                let mut clauses: Vec<Vec<TseytinAtom>> =
                    children.iter().map(|c| vec![neg.clone(), c.clone()]).collect();
                let mut last = vec![pos];
                last.extend(children.iter().map(|c| c.negated()));
                clauses.push(last);
                clauses
            }
            Expr::Or(_) => {
                let mut clauses: Vec<Vec<TseytinAtom>> =
                    children.iter().map(|c| vec![pos.clone(), c.negated()]).collect();
                let mut last = vec![neg];
                last.extend(children.iter().cloned());
                clauses.push(last);
                clauses
            }
            Expr::Implies(_, _) => {
                let (a, b) = (&children[0], &children[1]);
                vec![
                    vec![neg, a.negated(), b.clone()],
                    vec![pos.clone(), a.clone()],
                    vec![pos, b.negated()],
                ]
            }
            Expr::Biimplies(_, _) => {
                let (a, b) = (&children[0], &children[1]);
                vec![
                    vec![neg.clone(), a.negated(), b.clone()],
                    vec![neg, a.clone(), b.negated()],
                    vec![pos.clone(), a.clone(), b.clone()],
                    vec![pos, a.negated(), b.negated()],
                ]
            }
            e => return Err(FokitError::UnsupportedNode(e.name().into())),
        };

        self.known.insert(expr, z);
        self.substitutes.push(Substitute {
            clauses,
            variable: Some(z),
        });
        Ok(TseytinAtom::Auxiliary(z, true))
    }
}

#[cfg(test)]
mod tests {
    use crate::*;

    fn lit(i: isize) -> Expr {
        Expr::literal(i.unsigned_abs(), i > 0)
    }

    /// Check that the encoding is equisatisfiable with the input for each assignment of its variables
    fn assert_equisatisfiable(e: &Expr, count: usize) {
        let encoding = TseytinTransformer.execute(e, &NullMonitor).unwrap();
        let aux = encoding.auxiliaries().len();
        let cnf = encoding.to_cnf(count);
        assert!(normal_forms::is_clausal_nf(&cnf, normal_forms::NormalForm::Cnf));
        for bits in 0..(1u64 << count) {
            let expected = e.eval(&IndexAssignment::from_bits(count, bits));
            let extended = (0..(1u64 << aux))
                .any(|ext| cnf.eval(&IndexAssignment::from_bits(count + aux, bits | (ext << count))) == Some(true));
            assert_eq!(expected, Some(extended), "{} with {:b}", e, bits);
        }
    }

    #[test]
    fn encode_connectives() {
        assert_equisatisfiable(&((lit(1) & lit(2)) | (lit(3) & lit(-1))), 3);
        assert_equisatisfiable(&Expr::implies(lit(1), lit(2) | lit(3)), 3);
        assert_equisatisfiable(&Expr::biimplies(lit(1) & lit(2), lit(-3)), 3);
        assert_equisatisfiable(&!(lit(1) | !(lit(2) & lit(3))), 3);
        assert_equisatisfiable(&lit(-2), 2);
    }

    #[test]
    fn shared_subtrees() -> Result<(), FokitError> {
        let g = lit(1) & lit(2);
        let e = (g.clone() | lit(3)) & (g.clone() | lit(-3));
        let encoding = TseytinTransformer.execute(&e, &NullMonitor)?;
        // g, both disjunctions and the root
        assert_eq!(encoding.auxiliaries().len(), 4);
        assert_eq!(encoding.substitutes().len(), 5);
        assert_eq!(encoding.substitutes()[4].variable(), None);
        assert_eq!(encoding.substitutes()[4].clauses(), &[vec![TseytinAtom::Auxiliary(4, true)]]);

        // the size of the encoding is linear in the size of the formula
        assert_eq!(encoding.clause_count(), 3 + 3 + 3 + 3 + 1);
        Ok(())
    }

    #[test]
    fn literal_root() -> Result<(), FokitError> {
        let encoding = TseytinTransformer.execute(&lit(-2), &NullMonitor)?;
        assert!(encoding.auxiliaries().is_empty());
        assert_eq!(encoding.substitutes().len(), 1);
        assert_eq!(encoding.to_cnf(0), Expr::And(vec![Expr::Or(vec![lit(-2)])]));

        let card = Expr::cardinal(Cardinality::AtMost(1), vec![lit(1), lit(2)]);
        assert!(matches!(
            TseytinTransformer.execute(&card, &NullMonitor),
            Err(FokitError::UnsupportedNode(_))
        ));
        Ok(())
    }
}
