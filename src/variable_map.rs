//! Bidirectional mapping between variable names and their 1-based indices.

use crate::efmt::InfixFormatter;
use crate::*;

use std::collections::HashMap;
use std::fmt;

/// Type of the values a variable can take.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    Bool,
    Int,
    Real,
}

/// Handle on a variable of a [VariableMap]: its index and value type.
///
/// The handle does not borrow the map. It remains meaningful only together with
/// the map that issued it, or with a clone of this map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Variable {
    index: usize,
    value_type: ValueType,
}

impl Variable {
    /// Return the 1-based index of this variable
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Positive literal on this variable
    pub fn pos(&self) -> i32 {
        self.index as i32
    }

    /// Negative literal on this variable
    pub fn neg(&self) -> i32 {
        -(self.index as i32)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct VariableEntry {
    name: String,
    value_type: ValueType,
}

/// The namespace shared by a group of interoperating formulas.
///
/// Adding a new name allocates the next free index, starting at 1 (0 is reserved and never valid).
/// Names are unique and can be changed without affecting the index, which is the
/// identity used by literals, clauses and expression trees.
///
/// Cloning a map gives an independent copy: renaming a variable in the clone does not
/// affect the original.
///
/// ```
/// use fokit::VariableMap;
/// # use fokit::FokitError;
/// # fn main() -> Result<(), FokitError> {
///
/// let mut variables = VariableMap::default();
/// let a = variables.add_boolean_variable(Some("A"))?;
/// let b = variables.add_boolean_variable(Some("B"))?;
/// assert_eq!(a.index(), 1);
/// assert_eq!(variables.index("B"), Some(b.index()));
///
/// let mut copy = variables.clone();
/// copy.rename(a.index(), "renamed")?;
/// assert_eq!(variables.name(1), Some("A"));
/// assert_eq!(copy.name(1), Some("renamed"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct VariableMap {
    /// Variable `i` is stored at position `i - 1`
    entries: Vec<VariableEntry>,

    /// Find a variable by name
    name2index: HashMap<String, usize>,
}

/// An expression associated to a variable map to provide prettier display output
struct NamedExpr<'a> {
    namer: &'a VariableMap,
    expr: &'a Expr,
}

impl VariableMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a map of boolean variables with the given names, in order
    pub fn from_names<'a, T: IntoIterator<Item = &'a str>>(names: T) -> Result<Self, FokitError> {
        let mut map = Self::default();
        for name in names {
            map.add_boolean_variable(Some(name))?;
        }
        Ok(map)
    }

    /// Get the number of variables, which is also the largest valid index
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return whether there are no variables in this map
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Allocate a new boolean variable.
    ///
    /// Without a name, a generic one is derived from the new index.
    /// Returns an error if the name is empty or already used, the map is then unchanged.
    pub fn add_boolean_variable(&mut self, name: Option<&str>) -> Result<Variable, FokitError> {
        self.add_variable(name, ValueType::Bool)
    }

    /// Allocate a new integer variable, usable in [terms](Term)
    pub fn add_integer_variable(&mut self, name: &str) -> Result<Variable, FokitError> {
        self.add_variable(Some(name), ValueType::Int)
    }

    /// Allocate a new real variable, usable in [terms](Term)
    pub fn add_real_variable(&mut self, name: &str) -> Result<Variable, FokitError> {
        self.add_variable(Some(name), ValueType::Real)
    }

    fn add_variable(&mut self, name: Option<&str>, value_type: ValueType) -> Result<Variable, FokitError> {
        let index = self.entries.len() + 1;
        let name = match name {
            Some(name) => {
                check_name(name)?;
                if self.name2index.contains_key(name) {
                    return Err(FokitError::NameCollision(name.into()));
                }
                name.to_string()
            }
            None => self.generic_name(index),
        };

        self.name2index.insert(name.clone(), index);
        self.entries.push(VariableEntry { name, value_type });
        Ok(Variable { index, value_type })
    }

    fn generic_name(&self, index: usize) -> String {
        let mut name = format!("_{}_", index);
        let mut suffix = 0;
        while self.name2index.contains_key(&name) {
            suffix += 1;
            name = format!("_{}_{}", index, suffix);
        }
        name
    }

    /// Check if an index is valid in this map
    pub fn contains(&self, index: usize) -> bool {
        index > 0 && index <= self.entries.len()
    }

    /// Check if a name is part of the map
    pub fn contains_name(&self, name: &str) -> bool {
        self.name2index.contains_key(name)
    }

    /// Retrieve the name of a variable
    pub fn name(&self, index: usize) -> Option<&str> {
        self.entry(index).map(|e| e.name.as_str())
    }

    /// Retrieve the index of a named variable
    pub fn index(&self, name: &str) -> Option<usize> {
        self.name2index.get(name).copied()
    }

    /// Search a variable with the given name
    pub fn variable(&self, name: &str) -> Option<Variable> {
        self.index(name).and_then(|idx| self.variable_at(idx))
    }

    /// Search a variable with the given name
    pub fn get_or_err(&self, name: &str) -> Result<Variable, FokitError> {
        self.variable(name)
            .ok_or_else(|| FokitError::NoSuchVariableName(name.into()))
    }

    /// Retrieve the handle of the variable at a given index
    pub fn variable_at(&self, index: usize) -> Option<Variable> {
        self.entry(index).map(|e| Variable {
            index,
            value_type: e.value_type,
        })
    }

    pub fn value_type(&self, index: usize) -> Option<ValueType> {
        self.entry(index).map(|e| e.value_type)
    }

    fn entry(&self, index: usize) -> Option<&VariableEntry> {
        match index {
            0 => None,
            _ => self.entries.get(index - 1),
        }
    }

    /// Change the name of a variable, its index is preserved.
    ///
    /// Returns an error if the index does not exist or if the new name is either
    /// invalid or already associated to another variable. Renaming to the same name is accepted
    /// (in this case, the map is not changed)
    pub fn rename(&mut self, index: usize, name: &str) -> Result<(), FokitError> {
        if !self.contains(index) {
            return Err(FokitError::NoSuchVariable(index));
        }
        check_name(name)?;

        // Detect conflicts or unchanged names
        if let Some(existing) = self.index(name) {
            if existing == index {
                return Ok(());
            }
            return Err(FokitError::NameCollision(name.into()));
        }

        let entry = &mut self.entries[index - 1];
        self.name2index.remove(&entry.name);
        self.name2index.insert(name.into(), index);
        entry.name = name.into();
        Ok(())
    }

    /// Iterate on all variables of this map, by increasing index
    pub fn iter(&self) -> impl Iterator<Item = Variable> + '_ {
        self.entries.iter().enumerate().map(|(i, e)| Variable {
            index: i + 1,
            value_type: e.value_type,
        })
    }

    /// Iterate on all names, by increasing index
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Apply variable names from this map to an expression.
    ///
    /// This operation is only useful to display expressions.
    /// Variables which are not part of the map receive a generic index-based name.
    pub fn named<'a>(&'a self, expr: &'a Expr) -> impl fmt::Display + 'a {
        NamedExpr { namer: self, expr }
    }

    /// Insert the name of a variable during a display operation.
    pub fn format_variable(&self, f: &mut fmt::Formatter, index: usize) -> fmt::Result {
        match self.name(index) {
            None => write!(f, "_{}_", index),
            Some(name) => write!(f, "{}", name),
        }
    }
}

fn check_name(name: &str) -> Result<(), FokitError> {
    match name.trim().is_empty() {
        true => Err(FokitError::InvalidName(name.into())),
        false => Ok(()),
    }
}

impl<'a> IntoIterator for &'a VariableMap {
    type Item = Variable;
    type IntoIter = Box<dyn Iterator<Item = Variable> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl fmt::Display for NamedExpr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ef = InfixFormatter::with(f, Some(self.namer), &SHORT_SYMBOLS);
        self.expr.fmt_with(&mut ef)
    }
}
