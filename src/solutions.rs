use crate::*;

use itertools::Itertools;
use std::fmt;
use std::iter::FromIterator;
use std::slice::Iter;

/// An ordered list of (partial) configurations over a shared variable map.
///
/// Solutions are usually collected during an enumeration and only read afterwards.
///
/// ```
/// use fokit::{Cnf, LiteralList, Order, SolutionList, VariableMap};
/// # use fokit::FokitError;
/// # fn main() -> Result<(), FokitError> {
/// let variables = VariableMap::from_names(["a", "b"])?;
/// let cnf = Cnf::new(variables.clone(), vec![LiteralList::new(vec![-1, 2], Order::Natural)?])?;
///
/// let mut solutions = SolutionList::new(variables);
/// solutions.add_solution(LiteralList::new(vec![1, 2], Order::Natural)?);
/// solutions.add_solution(LiteralList::new(vec![1, -2], Order::Natural)?);
/// assert_eq!(solutions.solutions_string(), "(a, b), (-b, a)");
/// assert_eq!(solutions.invalid_solutions(&cnf).count(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SolutionList {
    variables: VariableMap,
    solutions: Vec<LiteralList>,
}

impl SolutionList {
    pub fn new(variables: VariableMap) -> Self {
        Self {
            variables,
            solutions: vec![],
        }
    }

    pub fn with_solutions(variables: VariableMap, solutions: Vec<LiteralList>) -> Self {
        Self { variables, solutions }
    }

    pub fn variables(&self) -> &VariableMap {
        &self.variables
    }

    pub fn set_variables(&mut self, variables: VariableMap) {
        self.variables = variables;
    }

    pub fn add_solution(&mut self, solution: LiteralList) {
        self.solutions.push(solution);
    }

    pub fn add_solutions<T: IntoIterator<Item = LiteralList>>(&mut self, solutions: T) {
        self.solutions.extend(solutions);
    }

    pub fn solutions(&self) -> &[LiteralList] {
        &self.solutions
    }

    pub fn get(&self, index: usize) -> Option<&LiteralList> {
        self.solutions.get(index)
    }

    pub fn iter(&self) -> Iter<'_, LiteralList> {
        self.solutions.iter()
    }

    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    /// Collect the literal found at the same position in every solution.
    ///
    /// Returns None if a solution is too short.
    pub fn variable_assignment(&self, position: usize) -> Option<LiteralList> {
        let literals = self
            .solutions
            .iter()
            .map(|s| s.literals().get(position).copied())
            .collect::<Option<Vec<_>>>()?;
        Some(LiteralList::with_sorted(literals, Order::Unordered))
    }

    /// Solutions violating at least one clause: they contain the negation of the whole clause
    pub fn invalid_solutions<'a>(&'a self, cnf: &'a Cnf) -> impl Iterator<Item = &'a LiteralList> + 'a {
        self.solutions
            .iter()
            .filter(move |s| cnf.clauses().iter().any(|c| s.contains_all(&c.negate())))
    }

    /// Solutions sharing a literal with every clause
    pub fn valid_solutions<'a>(&'a self, cnf: &'a Cnf) -> impl Iterator<Item = &'a LiteralList> + 'a {
        self.solutions
            .iter()
            .filter(move |s| cnf.clauses().iter().all(|c| s.has_duplicates(c)))
    }

    /// Display the solutions using the names of their variables.
    ///
    /// Literals of unknown variables are displayed as `?`.
    pub fn solutions_string(&self) -> String {
        self.solutions
            .iter()
            .map(|s| format!("({})", s.iter().map(|l| self.literal_name(*l)).join(", ")))
            .join(", ")
    }

    fn literal_name(&self, literal: i32) -> String {
        match self.variables.name(literal.unsigned_abs() as usize) {
            None => "?".into(),
            Some(name) if literal > 0 => name.into(),
            Some(name) => format!("-{}", name),
        }
    }
}

impl<'a> IntoIterator for &'a SolutionList {
    type Item = &'a LiteralList;
    type IntoIter = Iter<'a, LiteralList>;

    fn into_iter(self) -> Self::IntoIter {
        self.solutions.iter()
    }
}

impl Extend<LiteralList> for SolutionList {
    fn extend<T: IntoIterator<Item = LiteralList>>(&mut self, iter: T) {
        self.solutions.extend(iter);
    }
}

impl FromIterator<LiteralList> for SolutionList {
    fn from_iter<I: IntoIterator<Item = LiteralList>>(iter: I) -> Self {
        Self::with_solutions(VariableMap::default(), iter.into_iter().collect())
    }
}

impl fmt::Display for SolutionList {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.solutions_string())
    }
}
