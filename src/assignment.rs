use crate::*;

/// The value taken by a variable
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Real(f64),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Numeric value, integers are widened
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Bool(_) => None,
            Value::Int(v) => Some(*v as f64),
            Value::Real(v) => Some(*v),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// A (partial) mapping from variable indices to values.
///
/// Expressions are evaluated against an assignment, unassigned variables make the
/// evaluation undefined unless the result does not depend on them.
pub trait Assignment {
    fn get(&self, index: usize) -> Option<Value>;

    fn set(&mut self, index: usize, value: Value);

    fn unset(&mut self, index: usize);

    fn unset_all(&mut self);

    fn get_bool(&self, index: usize) -> Option<bool> {
        self.get(index).and_then(|v| v.as_bool())
    }
}

/// Assignment stored in a vector indexed by variable
#[derive(Clone, Default, Debug, PartialEq)]
pub struct IndexAssignment {
    values: Vec<Option<Value>>,
}

impl IndexAssignment {
    /// Assign boolean variables according to a list of literals
    pub fn from_literals(literals: &LiteralList) -> Self {
        let mut assignment = Self::default();
        for l in literals {
            assignment.set(l.unsigned_abs() as usize, Value::Bool(*l > 0));
        }
        assignment
    }

    /// Assign the first variables according to the bits of an integer: variable `i` takes bit `i-1`
    pub fn from_bits(count: usize, bits: u64) -> Self {
        let mut assignment = Self::default();
        for i in 0..count {
            assignment.set(i + 1, Value::Bool(bits & (1 << i) != 0));
        }
        assignment
    }
}

impl Assignment for IndexAssignment {
    fn get(&self, index: usize) -> Option<Value> {
        self.values.get(index).copied().flatten()
    }

    fn set(&mut self, index: usize, value: Value) {
        if index >= self.values.len() {
            self.values.resize(index + 1, None);
        }
        self.values[index] = Some(value);
    }

    fn unset(&mut self, index: usize) {
        if let Some(v) = self.values.get_mut(index) {
            *v = None;
        }
    }

    fn unset_all(&mut self) {
        self.values.clear();
    }
}
