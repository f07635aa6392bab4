use crate::*;

use std::fmt;

/// An expression together with the variable map giving meaning to its indices.
///
/// ```
/// use fokit::{Formula, VariableMap};
/// # use fokit::FokitError;
/// # fn main() -> Result<(), FokitError> {
/// let mut variables = VariableMap::new();
/// let a = variables.add_boolean_variable(Some("a"))?;
/// let b = variables.add_boolean_variable(Some("b"))?;
///
/// let formula = Formula::new(a | !b, variables);
/// assert_eq!(formula.to_string(), "a | -b");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Formula {
    expr: Expr,
    variables: VariableMap,
}

impl Formula {
    pub fn new(expr: Expr, variables: VariableMap) -> Self {
        Self { expr, variables }
    }

    /// Bind an expression to a variable map, checking that all its variables are defined
    pub fn checked(expr: Expr, variables: VariableMap) -> Result<Self, FokitError> {
        if let Some(v) = expr.variables().into_iter().find(|v| !variables.contains(*v)) {
            return Err(FokitError::NoSuchVariable(v));
        }
        Ok(Self { expr, variables })
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn variables(&self) -> &VariableMap {
        &self.variables
    }

    pub fn into_parts(self) -> (Expr, VariableMap) {
        (self.expr, self.variables)
    }

    /// Move this formula to another variable map, matching variables by name
    pub fn rebind(&self, variables: &VariableMap) -> Result<Formula, FokitError> {
        let mut expr = self.expr.clone();
        expr.adapt_variable_map(&self.variables, variables)?;
        Ok(Formula::new(expr, variables.clone()))
    }

    pub fn eval(&self, assignment: &dyn Assignment) -> Option<bool> {
        self.expr.eval(assignment)
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.variables.named(&self.expr))
    }
}
