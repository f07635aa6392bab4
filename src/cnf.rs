//! Clausal representation of CNF formulas

use crate::normal_forms::{is_clausal_nf, to_clausal_nf, NormalForm};
use crate::*;

use itertools::Itertools;
use std::fmt;

/// A conjunction of clauses over a variable map.
///
/// Clauses are [literal lists](LiteralList) in natural order, without duplicated literals.
#[derive(Clone, Debug, PartialEq)]
pub struct Cnf {
    variables: VariableMap,
    clauses: Vec<LiteralList>,
}

impl Cnf {
    /// Create a CNF, checking that all literals reference a variable of the map
    pub fn new(variables: VariableMap, clauses: Vec<LiteralList>) -> Result<Self, FokitError> {
        for clause in &clauses {
            clause.validate(&variables)?;
        }
        Ok(Self { variables, clauses })
    }

    /// Extract the clauses of a formula in conjunctive normal form.
    ///
    /// Clauses containing the `true` constant are dropped and `false` constants are removed
    /// from their clause. Fails with [FokitError::NfShapeViolation] if the formula is not in CNF
    /// and with [FokitError::UnsupportedNode] if it contains predicates.
    pub fn from_formula(formula: &Formula) -> Result<Self, FokitError> {
        let expr = match is_clausal_nf(formula.expr(), NormalForm::Cnf) {
            true => formula.expr().clone(),
            false => to_clausal_nf(formula.expr().clone(), NormalForm::Cnf)?,
        };

        let mut clauses = vec![];
        'clauses: for clause in expr.children() {
            let mut literals = vec![];
            for e in clause.children() {
                match e {
                    Expr::True => continue 'clauses,
                    Expr::False => (),
                    Expr::Literal(l) => literals.push(l.to_dimacs()),
                    e => return Err(FokitError::UnsupportedNode(e.name().into())),
                }
            }
            let literals = literals.into_iter().unique().collect();
            clauses.push(LiteralList::new(literals, Order::Natural)?);
        }
        Self::new(formula.variables().clone(), clauses)
    }

    pub fn variables(&self) -> &VariableMap {
        &self.variables
    }

    pub fn clauses(&self) -> &[LiteralList] {
        &self.clauses
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Test if a complete configuration satisfies every clause
    pub fn is_satisfied_by(&self, configuration: &LiteralList) -> bool {
        self.clauses.iter().all(|c| c.has_duplicates(configuration))
    }

    /// Build the equivalent clausal expression
    pub fn to_formula(&self) -> Formula {
        if self.clauses.is_empty() {
            return Formula::new(NormalForm::Cnf.constant_clauses(), self.variables.clone());
        }
        let clauses = self
            .clauses
            .iter()
            .map(|c| {
                Expr::Or(
                    c.iter()
                        .map(|l| Expr::literal(l.unsigned_abs() as usize, *l > 0))
                        .collect(),
                )
            })
            .collect();
        Formula::new(Expr::And(clauses), self.variables.clone())
    }
}

impl fmt::Display for Cnf {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.clauses.iter().join(" & "))
    }
}

#[cfg(test)]
mod tests {
    use crate::*;

    fn lit(i: isize) -> Expr {
        Expr::literal(i.unsigned_abs(), i > 0)
    }

    #[test]
    fn extract_clauses() -> Result<(), FokitError> {
        let variables = VariableMap::from_names(["a", "b", "c"])?;
        let e = lit(1) & (lit(3) | lit(-2) | lit(3)) & (lit(2) | Expr::True) & (lit(1) | Expr::False);
        let cnf = Cnf::from_formula(&Formula::new(e, variables.clone()))?;
        assert_eq!(cnf.len(), 3);
        assert_eq!(cnf.to_string(), "[1] & [-2, 3] & [1]");

        let config = LiteralList::new(vec![1, 2, 3], Order::Natural)?;
        assert!(cnf.is_satisfied_by(&config));
        let config = LiteralList::new(vec![1, 2, -3], Order::Natural)?;
        assert!(!cnf.is_satisfied_by(&config));

        let back = cnf.to_formula();
        assert!(normal_forms::is_clausal_nf(back.expr(), normal_forms::NormalForm::Cnf));

        let not_cnf = Formula::new(Expr::implies(lit(1), lit(2)), variables.clone());
        assert!(matches!(Cnf::from_formula(&not_cnf), Err(FokitError::NfShapeViolation(_))));

        // an empty conjunction has no clause
        let empty = Cnf::from_formula(&Formula::new(Expr::And(vec![]), variables.clone()))?;
        assert!(empty.is_empty());
        assert_eq!(empty.to_formula().expr(), &Expr::And(vec![Expr::Or(vec![Expr::True])]));

        let outside = vec![LiteralList::new(vec![4], Order::Natural)?];
        assert!(matches!(Cnf::new(variables, outside), Err(FokitError::InvalidLiteral(4))));
        Ok(())
    }
}
