//! Test, simplify and reshape expressions in conjunctive or disjunctive normal form.
//!
//! A formula is in CNF if it is a conjunction of clauses, where a clause is a disjunction of
//! literals. Unit clauses and unit conjunctions may be written without their connective.
//! The clausal CNF requires the full two-level shape: exactly one conjunction of disjunctions
//! of literals. The DNF is defined dually.
//!
//! Boolean constants count as literals: they only remain after simplification
//! when the whole formula is constant.

use crate::visitor::{traverse, TreeVisitor, VisitorResult};
use crate::*;

use itertools::Itertools;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NormalForm {
    /// Conjunctive normal form
    Cnf,
    /// Disjunctive normal form
    Dnf,
}

impl NormalForm {
    /// Test if a node is of the outer connective
    pub fn is_outer(&self, expr: &Expr) -> bool {
        matches!(
            (self, expr),
            (NormalForm::Cnf, Expr::And(_)) | (NormalForm::Dnf, Expr::Or(_))
        )
    }

    /// Test if a node is of the inner (clause) connective
    pub fn is_inner(&self, expr: &Expr) -> bool {
        matches!(
            (self, expr),
            (NormalForm::Cnf, Expr::Or(_)) | (NormalForm::Dnf, Expr::And(_))
        )
    }

    pub fn outer(&self, children: Vec<Expr>) -> Expr {
        match self {
            NormalForm::Cnf => Expr::And(children),
            NormalForm::Dnf => Expr::Or(children),
        }
    }

    pub fn inner(&self, children: Vec<Expr>) -> Expr {
        match self {
            NormalForm::Cnf => Expr::Or(children),
            NormalForm::Dnf => Expr::And(children),
        }
    }

    /// The clausal form of an empty outer node: `And(Or(true))` for CNF, `Or(And(false))` for DNF
    pub fn constant_clauses(&self) -> Expr {
        let constant = Expr::constant(*self == NormalForm::Cnf);
        self.outer(vec![self.inner(vec![constant])])
    }
}

impl fmt::Display for NormalForm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NormalForm::Cnf => write!(f, "CNF"),
            NormalForm::Dnf => write!(f, "DNF"),
        }
    }
}

/// Visitor checking the shape of an expression
#[derive(Clone, Debug)]
pub struct NfTester {
    nf: NormalForm,
    is_nf: bool,
    is_clausal_nf: bool,
}

impl NfTester {
    pub fn new(nf: NormalForm) -> Self {
        Self {
            nf,
            is_nf: true,
            is_clausal_nf: true,
        }
    }

    pub fn is_nf(&self) -> bool {
        self.is_nf
    }

    pub fn is_clausal_nf(&self) -> bool {
        self.is_clausal_nf
    }
}

impl TreeVisitor for NfTester {
    type Output = bool;

    fn reset(&mut self) {
        self.is_nf = true;
        self.is_clausal_nf = true;
    }

    fn first_visit(&mut self, path: &[&Expr]) -> VisitorResult {
        let depth = path.len();
        let node = path[depth - 1];
        if node.is_terminal() {
            // unit clauses are not wrapped
            if depth < 3 {
                self.is_clausal_nf = false;
            }
            return VisitorResult::SkipChildren;
        }
        if depth == 1 && self.nf.is_outer(node) {
            if node.children().is_empty() {
                self.is_clausal_nf = false;
            }
            return VisitorResult::Continue;
        }
        if self.nf.is_inner(node) {
            if depth == 1 {
                self.is_clausal_nf = false;
                return VisitorResult::Continue;
            }
            if depth == 2 && self.nf.is_outer(path[0]) {
                return VisitorResult::Continue;
            }
        }
        self.is_nf = false;
        self.is_clausal_nf = false;
        VisitorResult::Terminate
    }

    fn result(&self) -> bool {
        self.is_nf
    }
}

/// Run a normal form tester on an expression
pub fn nf_tester(expr: &Expr, nf: NormalForm) -> NfTester {
    let mut tester = NfTester::new(nf);
    traverse(expr, &mut tester);
    tester
}

pub fn is_nf(expr: &Expr, nf: NormalForm) -> bool {
    nf_tester(expr, nf).is_nf()
}

pub fn is_clausal_nf(expr: &Expr, nf: NormalForm) -> bool {
    nf_tester(expr, nf).is_clausal_nf()
}

pub fn is_cnf(expr: &Expr) -> bool {
    is_nf(expr, NormalForm::Cnf)
}

pub fn is_dnf(expr: &Expr) -> bool {
    is_nf(expr, NormalForm::Dnf)
}

/// Rewrite an expression which is already in normal form into the clausal normal form.
///
/// Literals are wrapped into singleton clauses and a single clause is wrapped into a singleton
/// outer node. An empty outer node becomes a single constant clause.
/// Fails with [FokitError::NfShapeViolation] if the expression is not in normal form.
pub fn to_clausal_nf(expr: Expr, nf: NormalForm) -> Result<Expr, FokitError> {
    let tester = nf_tester(&expr, nf);
    if !tester.is_nf() {
        return Err(FokitError::NfShapeViolation(nf.to_string()));
    }
    if nf.is_outer(&expr) && expr.children().is_empty() {
        return Ok(nf.constant_clauses());
    }
    if tester.is_clausal_nf() {
        return Ok(expr);
    }

    Ok(match expr {
        e if e.is_terminal() => nf.outer(vec![nf.inner(vec![e])]),
        e if nf.is_inner(&e) => nf.outer(vec![e]),
        e => nf.outer(
            e.into_children()
                .into_iter()
                .map(|c| match c.is_terminal() {
                    true => nf.inner(vec![c]),
                    false => c,
                })
                .collect(),
        ),
    })
}

/// Prepare an expression for normal form transformations.
///
/// The result is an equivalent negation normal form using only conjunctions, disjunctions and literals:
/// * implications and equivalences are replaced by their definitions
/// * cardinality constraints are expanded through combinations of their children
/// * quantifiers over boolean variables are expanded by substitution
/// * negations are pushed to the literals, removing double negations
/// * constants are propagated and nested identical connectives are flattened
///
/// Fails with [FokitError::UnsupportedNode] if a quantifier binds a variable used in a predicate.
pub fn simplify_for_nf(expr: Expr) -> Result<Expr, FokitError> {
    Ok(nnf(eliminate(expr)?, true))
}

/// Replace all connectives by conjunctions, disjunctions and negations
fn eliminate(expr: Expr) -> Result<Expr, FokitError> {
    Ok(match expr {
        Expr::Not(c) => Expr::negation(eliminate(*c)?),
        Expr::And(c) => Expr::And(eliminate_all(c)?),
        Expr::Or(c) => Expr::Or(eliminate_all(c)?),
        Expr::Implies(a, b) => Expr::Or(vec![Expr::negation(eliminate(*a)?), eliminate(*b)?]),
        Expr::Biimplies(a, b) => {
            let a = eliminate(*a)?;
            let b = eliminate(*b)?;
            Expr::And(vec![
                Expr::Or(vec![Expr::negation(a.clone()), b.clone()]),
                Expr::Or(vec![a, Expr::negation(b)]),
            ])
        }
        Expr::Cardinal(card, c) => expand_cardinal(card, eliminate_all(c)?),
        Expr::Quantified(q, var, body) => {
            let body = eliminate(*body)?;
            if uses_in_predicate(&body, var) {
                return Err(FokitError::UnsupportedNode(format!(
                    "quantifier over the term variable {}",
                    var
                )));
            }
            let mut when_true = body.clone();
            let mut when_false = body;
            substitute(&mut when_true, var, true);
            substitute(&mut when_false, var, false);
            match q {
                Quantifier::ForAll => Expr::And(vec![when_true, when_false]),
                Quantifier::Exists => Expr::Or(vec![when_true, when_false]),
            }
        }
        e => e,
    })
}

fn eliminate_all(children: Vec<Expr>) -> Result<Vec<Expr>, FokitError> {
    children.into_iter().map(eliminate).collect()
}

/// Express a cardinality constraint with clauses over its children
fn expand_cardinal(card: Cardinality, children: Vec<Expr>) -> Expr {
    let n = children.len();
    let (lo, hi) = card.bounds(n);
    if lo > n || lo > hi {
        return Expr::False;
    }

    let mut parts = vec![];
    // at least lo: every group of n-lo+1 children contains a true one
    if lo > 0 {
        for group in children.iter().combinations(n - lo + 1) {
            parts.push(Expr::Or(group.into_iter().cloned().collect()));
        }
    }
    // at most hi: every group of hi+1 children contains a false one
    if hi < n {
        for group in children.iter().combinations(hi + 1) {
            parts.push(Expr::Or(group.into_iter().map(|c| !c).collect()));
        }
    }
    match parts.is_empty() {
        true => Expr::True,
        false => Expr::And(parts),
    }
}

fn uses_in_predicate(expr: &Expr, var: usize) -> bool {
    match expr {
        Expr::Predicate(p) => {
            let mut variables = Default::default();
            p.collect_variables(&mut variables);
            variables.contains(&var)
        }
        _ => expr.children().iter().any(|c| uses_in_predicate(c, var)),
    }
}

fn substitute(expr: &mut Expr, var: usize, value: bool) {
    if let Expr::Literal(l) = expr {
        if l.index() == var {
            let b = l.is_positive() == value;
            *expr = Expr::constant(b);
        }
        return;
    }
    for c in expr.children_mut() {
        substitute(c, var, value);
    }
}

/// Push negations to the leaves, propagate constants and flatten nested connectives
fn nnf(expr: Expr, positive: bool) -> Expr {
    match expr {
        Expr::True | Expr::False | Expr::Literal(_) | Expr::Predicate(_) => match positive {
            true => expr,
            false => !expr,
        },
        Expr::Not(c) => nnf(*c, !positive),
        Expr::And(c) => junction(positive, c.into_iter().map(|e| nnf(e, positive)).collect()),
        Expr::Or(c) => junction(!positive, c.into_iter().map(|e| nnf(e, positive)).collect()),
        e => match positive {
            true => e,
            false => Expr::negation(e),
        },
    }
}

/// Build a flat conjunction (or disjunction) without constants
fn junction(conjunction: bool, children: Vec<Expr>) -> Expr {
    let absorbing = Expr::constant(!conjunction);
    let mut flat = Vec::with_capacity(children.len());
    for c in children {
        match c {
            Expr::True | Expr::False if c == absorbing => return absorbing,
            Expr::True | Expr::False => (),
            Expr::And(cc) if conjunction => flat.extend(cc),
            Expr::Or(cc) if !conjunction => flat.extend(cc),
            c => flat.push(c),
        }
    }
    match (flat.len(), conjunction) {
        (0, _) => Expr::constant(conjunction),
        (1, _) => flat.remove(0),
        (_, true) => Expr::And(flat),
        (_, false) => Expr::Or(flat),
    }
}
