//! Arithmetic terms and the atomic predicates comparing them

use crate::*;

use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

/// An arithmetic term over integer or real variables.
#[derive(Clone, Debug)]
pub enum Term {
    /// Reference to a (non-boolean) variable by index
    Variable(usize),
    IntConstant(i64),
    RealConstant(f64),
    Add(Vec<Term>),
    Multiply(Vec<Term>),
}

/// Comparison operator of a [Predicate]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Comparison {
    Equals,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
}

/// An atomic constraint comparing two terms.
///
/// A predicate is a leaf of the expression tree. Like a literal, it has a polarity:
/// negating a predicate flips its polarity instead of creating a negation node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Predicate {
    pub comparison: Comparison,
    pub left: Term,
    pub right: Term,
    pub positive: bool,
}

impl Term {
    pub fn variable(var: Variable) -> Self {
        Term::Variable(var.index())
    }

    /// Compute the value of the term, if all variables are assigned.
    ///
    /// Integer overflows give an unknown value.
    pub fn eval(&self, assignment: &dyn Assignment) -> Option<Value> {
        match self {
            Term::Variable(idx) => assignment.get(*idx),
            Term::IntConstant(v) => Some(Value::Int(*v)),
            Term::RealConstant(v) => Some(Value::Real(*v)),
            Term::Add(terms) => fold_values(terms, assignment, 0, i64::checked_add, |a, b| a + b),
            Term::Multiply(terms) => fold_values(terms, assignment, 1, i64::checked_mul, |a, b| a * b),
        }
    }

    pub fn collect_variables(&self, variables: &mut BTreeSet<usize>) {
        match self {
            Term::Variable(idx) => {
                variables.insert(*idx);
            }
            Term::IntConstant(_) | Term::RealConstant(_) => (),
            Term::Add(terms) | Term::Multiply(terms) => {
                terms.iter().for_each(|t| t.collect_variables(variables))
            }
        }
    }

    pub(crate) fn adapt_variable_map(
        &mut self,
        old: &VariableMap,
        new: &VariableMap,
    ) -> Result<(), FokitError> {
        match self {
            Term::Variable(idx) => *idx = rebind(*idx, old, new)?,
            Term::IntConstant(_) | Term::RealConstant(_) => (),
            Term::Add(terms) | Term::Multiply(terms) => {
                for t in terms {
                    t.adapt_variable_map(old, new)?;
                }
            }
        }
        Ok(())
    }
}

/// Find the index of a variable in a new map, using its name in the old one
pub(crate) fn rebind(index: usize, old: &VariableMap, new: &VariableMap) -> Result<usize, FokitError> {
    let name = old.name(index).ok_or(FokitError::NoSuchVariable(index))?;
    new.index(name)
        .ok_or_else(|| FokitError::NoSuchVariableName(name.into()))
}

fn fold_values(
    terms: &[Term],
    assignment: &dyn Assignment,
    neutral: i64,
    fi: fn(i64, i64) -> Option<i64>,
    fr: fn(f64, f64) -> f64,
) -> Option<Value> {
    let mut result = Value::Int(neutral);
    for t in terms {
        result = match (result, t.eval(assignment)?) {
            (Value::Int(a), Value::Int(b)) => Value::Int(fi(a, b)?),
            (a, b) => Value::Real(fr(a.as_real()?, b.as_real()?)),
        };
    }
    Some(result)
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Term::Variable(a), Term::Variable(b)) => a == b,
            (Term::IntConstant(a), Term::IntConstant(b)) => a == b,
            (Term::RealConstant(a), Term::RealConstant(b)) => a.to_bits() == b.to_bits(),
            (Term::Add(a), Term::Add(b)) => a == b,
            (Term::Multiply(a), Term::Multiply(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Term {}

impl Hash for Term {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Term::Variable(idx) => idx.hash(state),
            Term::IntConstant(v) => v.hash(state),
            Term::RealConstant(v) => v.to_bits().hash(state),
            Term::Add(terms) | Term::Multiply(terms) => terms.hash(state),
        }
    }
}

impl Comparison {
    pub fn symbol(&self) -> &'static str {
        match self {
            Comparison::Equals => "=",
            Comparison::LessThan => "<",
            Comparison::LessEqual => "<=",
            Comparison::GreaterThan => ">",
            Comparison::GreaterEqual => ">=",
        }
    }

    fn holds<T: PartialOrd>(&self, a: T, b: T) -> bool {
        match self {
            Comparison::Equals => a == b,
            Comparison::LessThan => a < b,
            Comparison::LessEqual => a <= b,
            Comparison::GreaterThan => a > b,
            Comparison::GreaterEqual => a >= b,
        }
    }
}

impl Predicate {
    pub fn new(comparison: Comparison, left: Term, right: Term) -> Self {
        Self {
            comparison,
            left,
            right,
            positive: true,
        }
    }

    /// Evaluate the comparison, taking the polarity into account
    pub fn eval(&self, assignment: &dyn Assignment) -> Option<bool> {
        let left = self.left.eval(assignment)?;
        let right = self.right.eval(assignment)?;
        let b = match (left, right) {
            (Value::Int(a), Value::Int(b)) => self.comparison.holds(a, b),
            (a, b) => self.comparison.holds(a.as_real()?, b.as_real()?),
        };
        Some(b == self.positive)
    }

    pub fn collect_variables(&self, variables: &mut BTreeSet<usize>) {
        self.left.collect_variables(variables);
        self.right.collect_variables(variables);
    }

    pub(crate) fn adapt_variable_map(
        &mut self,
        old: &VariableMap,
        new: &VariableMap,
    ) -> Result<(), FokitError> {
        self.left.adapt_variable_map(old, new)?;
        self.right.adapt_variable_map(old, new)
    }
}
