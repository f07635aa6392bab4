//! Formulas defined as expression trees

use core::ops::BitAnd;
use core::ops::BitOr;
use core::ops::Not;
use std::collections::BTreeSet;
use std::fmt;

use crate::efmt::{ExprFormatter, InfixFormatter};
use crate::term::rebind;
use crate::*;

/// A reference to a boolean variable with a polarity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    index: usize,
    positive: bool,
}

/// Bounds on the number of true children of a cardinality node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cardinality {
    /// At least k children are true
    AtLeast(usize),
    /// At most k children are true
    AtMost(usize),
    /// The number of true children is in the (inclusive) interval
    Between(usize, usize),
    /// Exactly k children are true
    Choose(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Quantifier {
    ForAll,
    Exists,
}

/// A formula as a tree of connectives over literals and predicates.
///
/// Leaves are the boolean constants, [literals](Literal) and [predicates](Predicate) over arithmetic terms.
/// Variables are referenced by their index in a [VariableMap] which is not part of the tree:
/// it is provided alongside as context (see [Formula]).
///
/// Expressions overload the ```&```, ```|```, and ```!``` operators to facilitate their definition
/// as readable rust statements. Conjunctions and disjunctions are flattened and negating a
/// literal flips its polarity, other simplifications are delayed to the [normal form](crate::normal_forms) utilities.
///
/// Cloning an expression gives a deep copy sharing nothing with the original.
///
/// ```
/// use fokit::{Expr, IndexAssignment, VariableMap};
/// # use fokit::FokitError;
/// # fn main() -> Result<(), FokitError> {
///
/// let mut variables = VariableMap::new();
/// let a = variables.add_boolean_variable(Some("a"))?;
/// let b = variables.add_boolean_variable(Some("b"))?;
/// let c = variables.add_boolean_variable(Some("c"))?;
///
/// // Build an expression using these variables
/// let expr = a & (b | !c);
/// assert_eq!(format!("{}", variables.named(&expr)), "a & (b | -c)");
///
/// // Evaluate it: variable i takes the value of bit i-1
/// let assignment = IndexAssignment::from_bits(3, 0b101);
/// assert_eq!(expr.eval(&assignment), Some(false));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Expr {
    True,
    False,
    Literal(Literal),
    Predicate(Predicate),
    Not(Box<Expr>),
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Implies(Box<Expr>, Box<Expr>),
    Biimplies(Box<Expr>, Box<Expr>),
    Cardinal(Cardinality, Vec<Expr>),
    Quantified(Quantifier, usize, Box<Expr>),
}

impl Literal {
    pub fn new(index: usize, positive: bool) -> Self {
        Self { index, positive }
    }

    /// Read a literal in DIMACS convention
    pub fn from_dimacs(literal: i32) -> Result<Self, FokitError> {
        match literal {
            0 => Err(FokitError::InvalidLiteral(0)),
            _ => Ok(Self::new(literal.unsigned_abs() as usize, literal > 0)),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_positive(&self) -> bool {
        self.positive
    }

    /// DIMACS representation: the index, negated for negative literals
    pub fn to_dimacs(&self) -> i32 {
        match self.positive {
            true => self.index as i32,
            false => -(self.index as i32),
        }
    }
}

impl Not for Literal {
    type Output = Literal;
    fn not(self) -> Self::Output {
        Literal::new(self.index, !self.positive)
    }
}

impl Cardinality {
    /// Inclusive bounds on the number of true children among `n`
    pub fn bounds(&self, n: usize) -> (usize, usize) {
        match *self {
            Cardinality::AtLeast(k) => (k, n),
            Cardinality::AtMost(k) => (0, k.min(n)),
            Cardinality::Between(lo, hi) => (lo, hi.min(n)),
            Cardinality::Choose(k) => (k, k),
        }
    }

    /// Change the upper bound
    pub fn set_max(&mut self, max: usize) {
        *self = match *self {
            Cardinality::AtMost(_) => Cardinality::AtMost(max),
            Cardinality::AtLeast(lo) | Cardinality::Between(lo, _) | Cardinality::Choose(lo) => {
                Cardinality::Between(lo, max)
            }
        }
    }

    pub fn operator(&self) -> Operator {
        match self {
            Cardinality::AtLeast(_) => Operator::AtLeast,
            Cardinality::AtMost(_) => Operator::AtMost,
            Cardinality::Between(_, _) => Operator::Between,
            Cardinality::Choose(_) => Operator::Choose,
        }
    }

    fn params(&self) -> Vec<usize> {
        match *self {
            Cardinality::AtLeast(k) | Cardinality::AtMost(k) | Cardinality::Choose(k) => vec![k],
            Cardinality::Between(lo, hi) => vec![lo, hi],
        }
    }
}

impl Expr {
    pub fn literal(index: usize, positive: bool) -> Self {
        Expr::Literal(Literal::new(index, positive))
    }

    pub fn constant(b: bool) -> Self {
        match b {
            true => Expr::True,
            false => Expr::False,
        }
    }

    /// Negation node, without any simplification
    pub fn negation(child: Expr) -> Self {
        Expr::Not(Box::new(child))
    }

    pub fn implies(left: Expr, right: Expr) -> Self {
        Expr::Implies(Box::new(left), Box::new(right))
    }

    pub fn biimplies(left: Expr, right: Expr) -> Self {
        Expr::Biimplies(Box::new(left), Box::new(right))
    }

    pub fn cardinal(cardinality: Cardinality, children: Vec<Expr>) -> Self {
        Expr::Cardinal(cardinality, children)
    }

    pub fn quantified(quantifier: Quantifier, variable: usize, body: Expr) -> Self {
        Expr::Quantified(quantifier, variable, Box::new(body))
    }

    pub fn predicate(predicate: Predicate) -> Self {
        Expr::Predicate(predicate)
    }

    /// Name of the node type, used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            Expr::True => "true",
            Expr::False => "false",
            Expr::Literal(_) => "literal",
            Expr::Predicate(_) => "predicate",
            Expr::Not(_) => "not",
            Expr::And(_) => "and",
            Expr::Or(_) => "or",
            Expr::Implies(_, _) => "implies",
            Expr::Biimplies(_, _) => "biimplies",
            Expr::Cardinal(Cardinality::AtLeast(_), _) => "atleast",
            Expr::Cardinal(Cardinality::AtMost(_), _) => "atmost",
            Expr::Cardinal(Cardinality::Between(_, _), _) => "between",
            Expr::Cardinal(Cardinality::Choose(_), _) => "choose",
            Expr::Quantified(Quantifier::ForAll, _, _) => "forall",
            Expr::Quantified(Quantifier::Exists, _, _) => "exists",
        }
    }

    /// The connective of this node, terminal nodes have none
    pub fn operator(&self) -> Option<Operator> {
        match self {
            Expr::True | Expr::False | Expr::Literal(_) | Expr::Predicate(_) => None,
            Expr::Not(_) => Some(Operator::Not),
            Expr::And(_) => Some(Operator::And),
            Expr::Or(_) => Some(Operator::Or),
            Expr::Implies(_, _) => Some(Operator::Implies),
            Expr::Biimplies(_, _) => Some(Operator::Equals),
            Expr::Cardinal(c, _) => Some(c.operator()),
            Expr::Quantified(Quantifier::ForAll, _, _) => Some(Operator::ForAll),
            Expr::Quantified(Quantifier::Exists, _, _) => Some(Operator::Exists),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.operator().is_none()
    }

    /// Literals and predicates: the atoms of a clause
    pub fn is_literal(&self) -> bool {
        matches!(self, Expr::Literal(_) | Expr::Predicate(_))
    }

    /// Borrow the ordered list of children (empty for terminal nodes)
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Expr::True | Expr::False | Expr::Literal(_) | Expr::Predicate(_) => vec![],
            Expr::Not(c) | Expr::Quantified(_, _, c) => vec![&**c],
            Expr::And(c) | Expr::Or(c) | Expr::Cardinal(_, c) => c.iter().collect(),
            Expr::Implies(a, b) | Expr::Biimplies(a, b) => vec![&**a, &**b],
        }
    }

    pub(crate) fn children_mut(&mut self) -> Vec<&mut Expr> {
        match self {
            Expr::True | Expr::False | Expr::Literal(_) | Expr::Predicate(_) => vec![],
            Expr::Not(c) | Expr::Quantified(_, _, c) => vec![c.as_mut()],
            Expr::And(c) | Expr::Or(c) | Expr::Cardinal(_, c) => c.iter_mut().collect(),
            Expr::Implies(a, b) | Expr::Biimplies(a, b) => vec![a.as_mut(), b.as_mut()],
        }
    }

    /// Take the children of this node
    pub fn into_children(self) -> Vec<Expr> {
        match self {
            Expr::True | Expr::False | Expr::Literal(_) | Expr::Predicate(_) => vec![],
            Expr::Not(c) | Expr::Quantified(_, _, c) => vec![*c],
            Expr::And(c) | Expr::Or(c) | Expr::Cardinal(_, c) => c,
            Expr::Implies(a, b) | Expr::Biimplies(a, b) => vec![*a, *b],
        }
    }

    /// Replace the list of children.
    ///
    /// Fails with [FokitError::ArityViolation] if the new list does not fit the connective,
    /// the node is then unchanged.
    pub fn set_children(&mut self, children: Vec<Expr>) -> Result<(), FokitError> {
        let found = children.len();
        let node = self.name();
        let violation = || FokitError::ArityViolation { node, found };
        match self {
            Expr::True | Expr::False | Expr::Literal(_) | Expr::Predicate(_) => {
                if found > 0 {
                    return Err(violation());
                }
            }
            Expr::Not(c) | Expr::Quantified(_, _, c) => {
                let [child]: [Expr; 1] = children.try_into().map_err(|_| violation())?;
                **c = child;
            }
            Expr::Implies(a, b) | Expr::Biimplies(a, b) => {
                let [l, r]: [Expr; 2] = children.try_into().map_err(|_| violation())?;
                **a = l;
                **b = r;
            }
            Expr::And(c) | Expr::Or(c) => {
                if found < 1 {
                    return Err(violation());
                }
                *c = children;
            }
            Expr::Cardinal(_, c) => *c = children,
        }
        Ok(())
    }

    /// Count the nodes of the tree
    pub fn size(&self) -> usize {
        1 + self.children().iter().map(|c| c.size()).sum::<usize>()
    }

    /// Collect the indices of all variables used in the tree, including bound variables
    pub fn variables(&self) -> BTreeSet<usize> {
        let mut variables = BTreeSet::new();
        self.collect_variables(&mut variables);
        variables
    }

    fn collect_variables(&self, variables: &mut BTreeSet<usize>) {
        match self {
            Expr::Literal(l) => {
                variables.insert(l.index);
            }
            Expr::Predicate(p) => p.collect_variables(variables),
            Expr::Quantified(_, v, body) => {
                variables.insert(*v);
                body.collect_variables(variables);
            }
            _ => self
                .children()
                .iter()
                .for_each(|c| c.collect_variables(variables)),
        }
    }

    /// Structural equality, ignoring the order of children of symmetric connectives
    /// (conjunction, disjunction and equivalence).
    pub fn equals_unordered(&self, other: &Expr) -> bool {
        match (self, other) {
            (Expr::And(a), Expr::And(b)) | (Expr::Or(a), Expr::Or(b)) => unordered_match(a, b),
            (Expr::Biimplies(a1, b1), Expr::Biimplies(a2, b2)) => {
                (a1.equals_unordered(a2) && b1.equals_unordered(b2))
                    || (a1.equals_unordered(b2) && b1.equals_unordered(a2))
            }
            (Expr::Not(a), Expr::Not(b)) => a.equals_unordered(b),
            (Expr::Implies(a1, b1), Expr::Implies(a2, b2)) => {
                a1.equals_unordered(a2) && b1.equals_unordered(b2)
            }
            (Expr::Cardinal(c1, a), Expr::Cardinal(c2, b)) => {
                c1 == c2 && a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.equals_unordered(y))
            }
            (Expr::Quantified(q1, v1, a), Expr::Quantified(q2, v2, b)) => {
                q1 == q2 && v1 == v2 && a.equals_unordered(b)
            }
            _ => self == other,
        }
    }

    /// Re-resolve all variable references of this tree from one map to another, using their names.
    ///
    /// Fails with [FokitError::NoSuchVariableName] if a name is missing in the new map.
    /// The tree may be partially rebound when this function fails.
    pub fn adapt_variable_map(&mut self, old: &VariableMap, new: &VariableMap) -> Result<(), FokitError> {
        match self {
            Expr::Literal(l) => l.index = rebind(l.index, old, new)?,
            Expr::Predicate(p) => p.adapt_variable_map(old, new)?,
            Expr::Quantified(_, v, body) => {
                *v = rebind(*v, old, new)?;
                body.adapt_variable_map(old, new)?;
            }
            _ => {
                for child in self.children_mut() {
                    child.adapt_variable_map(old, new)?;
                }
            }
        }
        Ok(())
    }

    /// Evaluate the expression.
    ///
    /// Returns None if the result depends on an unassigned variable.
    /// Quantifiers are evaluated by enumerating both values of their (boolean) bound variable.
    pub fn eval(&self, assignment: &dyn Assignment) -> Option<bool> {
        match self {
            Expr::True => Some(true),
            Expr::False => Some(false),
            Expr::Literal(l) => assignment.get_bool(l.index).map(|b| b == l.positive),
            Expr::Predicate(p) => p.eval(assignment),
            Expr::Not(c) => c.eval(assignment).map(|b| !b),
            Expr::And(c) => eval_all(c.iter(), assignment, false),
            Expr::Or(c) => eval_all(c.iter(), assignment, true),
            Expr::Implies(a, b) => match (a.eval(assignment), b.eval(assignment)) {
                (Some(false), _) | (_, Some(true)) => Some(true),
                (Some(true), Some(false)) => Some(false),
                _ => None,
            },
            Expr::Biimplies(a, b) => Some(a.eval(assignment)? == b.eval(assignment)?),
            Expr::Cardinal(card, c) => {
                let (lo, hi) = card.bounds(c.len());
                let mut count = 0;
                let mut unknown = 0;
                for v in c.iter().map(|e| e.eval(assignment)) {
                    match v {
                        Some(true) => count += 1,
                        Some(false) => (),
                        None => unknown += 1,
                    }
                }
                if count > hi || count + unknown < lo {
                    Some(false)
                } else if count >= lo && count + unknown <= hi {
                    Some(true)
                } else {
                    None
                }
            }
            Expr::Quantified(q, v, body) => {
                let mut results = [false, true].iter().map(|b| {
                    let scope = Scoped {
                        base: assignment,
                        index: *v,
                        value: Some(Value::Bool(*b)),
                    };
                    body.eval(&scope)
                });
                combine(&mut results, *q == Quantifier::Exists)
            }
        }
    }

    /// Display this expression using a custom formatter
    pub fn fmt_with(&self, f: &mut dyn ExprFormatter) -> fmt::Result {
        self._fmt_expr(f, None)
    }

    fn _fmt_expr(&self, f: &mut dyn ExprFormatter, parent: Option<Operator>) -> fmt::Result {
        let op = match self {
            Expr::True => return f.write_bool(true),
            Expr::False => return f.write_bool(false),
            Expr::Literal(l) => return f.write_literal(l.index, l.positive),
            Expr::Predicate(p) => return f.write_predicate(p),
            _ => self.operator().unwrap_or(Operator::Unknown),
        };
        let params = match self {
            Expr::Cardinal(c, _) => c.params(),
            Expr::Quantified(_, v, _) => vec![*v],
            _ => vec![],
        };
        f.start_operation(op, &params, parent)?;
        for (i, c) in self.children().iter().enumerate() {
            if i > 0 {
                f.sep_operation(op)?;
            }
            c._fmt_expr(f, Some(op))?;
        }
        f.end_operation(op, parent)
    }

    fn join(self, op: Operator, rhs: Expr) -> Expr {
        let mut children = vec![];
        for e in [self, rhs] {
            match (op, e) {
                (Operator::And, Expr::And(c)) | (Operator::Or, Expr::Or(c)) => children.extend(c),
                (_, e) => children.push(e),
            }
        }
        match op {
            Operator::And => Expr::And(children),
            _ => Expr::Or(children),
        }
    }
}

/// Evaluate a sequence of children: stop on the absorbing value
fn eval_all<'a, I>(children: I, assignment: &dyn Assignment, absorbing: bool) -> Option<bool>
where
    I: Iterator<Item = &'a Expr>,
{
    let mut results = children.map(|c| c.eval(assignment));
    combine(&mut results, absorbing)
}

fn combine(results: &mut dyn Iterator<Item = Option<bool>>, absorbing: bool) -> Option<bool> {
    let mut undefined = false;
    for r in results {
        match r {
            Some(b) if b == absorbing => return Some(absorbing),
            Some(_) => (),
            None => undefined = true,
        }
    }
    match undefined {
        true => None,
        false => Some(!absorbing),
    }
}

/// Greedy matching of two lists of children, ignoring their order
fn unordered_match(a: &[Expr], b: &[Expr]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut used = vec![false; b.len()];
    a.iter().all(|x| {
        match (0..b.len()).find(|i| !used[*i] && x.equals_unordered(&b[*i])) {
            Some(i) => {
                used[i] = true;
                true
            }
            None => false,
        }
    })
}

/// Read-only view of an assignment with a locally bound variable
struct Scoped<'a> {
    base: &'a dyn Assignment,
    index: usize,
    value: Option<Value>,
}

impl Assignment for Scoped<'_> {
    fn get(&self, index: usize) -> Option<Value> {
        match index == self.index {
            true => self.value,
            false => self.base.get(index),
        }
    }

    fn set(&mut self, index: usize, value: Value) {
        if index == self.index {
            self.value = Some(value);
        }
    }

    fn unset(&mut self, index: usize) {
        if index == self.index {
            self.value = None;
        }
    }

    fn unset_all(&mut self) {
        self.value = None;
    }
}

impl From<bool> for Expr {
    fn from(b: bool) -> Self {
        Expr::constant(b)
    }
}

impl From<Literal> for Expr {
    fn from(l: Literal) -> Self {
        Expr::Literal(l)
    }
}

impl From<Variable> for Expr {
    fn from(var: Variable) -> Self {
        Expr::literal(var.index(), true)
    }
}

impl From<&Expr> for Expr {
    fn from(e: &Expr) -> Self {
        e.clone()
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut ef = InfixFormatter::new(f);
        self.fmt_with(&mut ef)
    }
}

impl Not for Expr {
    type Output = Self;
    fn not(self) -> Self::Output {
        match self {
            Expr::True => Expr::False,
            Expr::False => Expr::True,
            Expr::Literal(l) => Expr::Literal(!l),
            Expr::Predicate(mut p) => {
                p.positive = !p.positive;
                Expr::Predicate(p)
            }
            Expr::Not(c) => *c,
            e => Expr::negation(e),
        }
    }
}

impl Not for &Expr {
    type Output = Expr;
    fn not(self) -> Self::Output {
        !self.clone()
    }
}

impl Not for Variable {
    type Output = Expr;
    fn not(self) -> Self::Output {
        Expr::literal(self.index(), false)
    }
}

impl<T: Into<Expr>> BitAnd<T> for Expr {
    type Output = Expr;
    fn bitand(self, rhs: T) -> Self::Output {
        self.join(Operator::And, rhs.into())
    }
}

impl<T: Into<Expr>> BitAnd<T> for &Expr {
    type Output = Expr;
    fn bitand(self, rhs: T) -> Self::Output {
        self.clone().join(Operator::And, rhs.into())
    }
}

impl<T: Into<Expr>> BitAnd<T> for Variable {
    type Output = Expr;
    fn bitand(self, rhs: T) -> Self::Output {
        Expr::from(self).join(Operator::And, rhs.into())
    }
}

impl<T: Into<Expr>> BitOr<T> for Expr {
    type Output = Self;
    fn bitor(self, rhs: T) -> Self::Output {
        self.join(Operator::Or, rhs.into())
    }
}

impl<T: Into<Expr>> BitOr<T> for &Expr {
    type Output = Expr;
    fn bitor(self, rhs: T) -> Self::Output {
        self.clone().join(Operator::Or, rhs.into())
    }
}

impl<T: Into<Expr>> BitOr<T> for Variable {
    type Output = Expr;
    fn bitor(self, rhs: T) -> Self::Output {
        Expr::from(self).join(Operator::Or, rhs.into())
    }
}

#[cfg(test)]
mod tests {
    use crate::*;

    fn lit(i: usize) -> Expr {
        Expr::literal(i, true)
    }

    #[test]
    fn construct_and_display() -> Result<(), FokitError> {
        let mut variables = VariableMap::new();
        let test = variables.add_boolean_variable(Some("test"))?;
        let other = variables.add_boolean_variable(Some("other"))?;
        let myvar = variables.add_boolean_variable(Some("myvar"))?;

        let e: Expr = (test | other) & true & (!myvar & test);
        assert_eq!(format!("{}", variables.named(&e)), "(test | other) & 1 & -myvar & test");
        assert_eq!(e.children().len(), 4);

        // double negations and negated literals do not create nodes
        let n = !!(test & other);
        assert!(matches!(n, Expr::And(_)));
        assert_eq!(!lit(1), Expr::literal(1, false));
        assert_eq!(!Expr::True, Expr::False);
        Ok(())
    }

    #[test]
    fn children_arity() {
        let mut e = !(lit(1) & lit(2));
        assert!(matches!(e, Expr::Not(_)));
        assert!(matches!(
            e.set_children(vec![lit(1), lit(2)]),
            Err(FokitError::ArityViolation { node: "not", found: 2 })
        ));
        assert!(e.set_children(vec![lit(3)]).is_ok());
        assert_eq!(e, Expr::negation(lit(3)));

        let mut i = Expr::implies(lit(1), lit(2));
        assert!(i.set_children(vec![lit(1)]).is_err());
        assert!(i.set_children(vec![lit(2), lit(1)]).is_ok());
        assert_eq!(i, Expr::implies(lit(2), lit(1)));

        let mut a = lit(1) & lit(2);
        assert!(a.set_children(vec![]).is_err());
        assert!(a.set_children(vec![lit(4)]).is_ok());

        let mut l = lit(1);
        assert!(l.set_children(vec![lit(2)]).is_err());
        assert!(l.set_children(vec![]).is_ok());
    }

    #[test]
    fn deep_clone() {
        let original = (lit(1) | lit(2)) & lit(3);
        let mut copy = original.clone();
        if let Expr::And(children) = &mut copy {
            children[0].set_children(vec![lit(4), lit(5)]).unwrap();
        }
        assert_eq!(original, (lit(1) | lit(2)) & lit(3));
        assert_ne!(original, copy);
    }

    #[test]
    fn unordered_equality() {
        let a = (lit(1) | lit(2)) & Expr::biimplies(lit(3), lit(4));
        let b = Expr::biimplies(lit(4), lit(3)) & (lit(2) | lit(1));
        assert_ne!(a, b);
        assert!(a.equals_unordered(&b));

        let c = Expr::implies(lit(1), lit(2));
        let d = Expr::implies(lit(2), lit(1));
        assert!(!c.equals_unordered(&d));

        // multiplicity matters
        let e = lit(1) & lit(1) & lit(2);
        let f = lit(1) & lit(2) & lit(2);
        assert!(!e.equals_unordered(&f));
    }

    #[test]
    fn adapt_variable_map() -> Result<(), FokitError> {
        let old = VariableMap::from_names(["a", "b", "c"])?;
        let new = VariableMap::from_names(["c", "x", "a", "b"])?;
        let mut e = lit(1) & !lit(3) & Expr::quantified(Quantifier::Exists, 2, lit(2));
        e.adapt_variable_map(&old, &new)?;
        assert_eq!(e, lit(3) & !lit(1) & Expr::quantified(Quantifier::Exists, 4, lit(4)));
        assert_eq!(format!("{}", new.named(&e)), "a & -c & exists[b](b)");

        let partial = VariableMap::from_names(["a"])?;
        assert!(matches!(
            e.adapt_variable_map(&new, &partial),
            Err(FokitError::NoSuchVariableName(_))
        ));
        Ok(())
    }

    #[test]
    fn evaluate() {
        let e = Expr::implies(lit(1), lit(2) | !lit(3));
        let all = IndexAssignment::from_bits(3, 0b101);
        assert_eq!(e.eval(&all), Some(false));

        let partial = IndexAssignment::from_literals(&LiteralList::new(vec![-1], Order::Natural).unwrap());
        assert_eq!(e.eval(&partial), Some(true));
        assert_eq!((lit(1) | lit(2)).eval(&partial), None);

        let card = Expr::cardinal(Cardinality::Between(1, 2), vec![lit(1), lit(2), lit(3)]);
        assert_eq!(card.eval(&IndexAssignment::from_bits(3, 0b000)), Some(false));
        assert_eq!(card.eval(&IndexAssignment::from_bits(3, 0b010)), Some(true));
        assert_eq!(card.eval(&IndexAssignment::from_bits(3, 0b111)), Some(false));

        let exists = Expr::quantified(Quantifier::Exists, 2, lit(1) & lit(2));
        let forall = Expr::quantified(Quantifier::ForAll, 2, lit(1) | lit(2));
        let a = IndexAssignment::from_bits(1, 0b0);
        assert_eq!(exists.eval(&a), Some(false));
        assert_eq!(forall.eval(&a), Some(false));
        let a = IndexAssignment::from_bits(1, 0b1);
        assert_eq!(exists.eval(&a), Some(true));
        assert_eq!(forall.eval(&a), Some(true));
    }

    #[test]
    fn cardinality_bounds() {
        let mut c = Cardinality::AtMost(2);
        assert_eq!(c.bounds(4), (0, 2));
        c.set_max(3);
        assert_eq!(c, Cardinality::AtMost(3));

        let mut c = Cardinality::AtLeast(1);
        assert_eq!(c.bounds(4), (1, 4));
        c.set_max(2);
        assert_eq!(c, Cardinality::Between(1, 2));
        assert_eq!(Cardinality::Choose(2).bounds(4), (2, 2));
    }
}
