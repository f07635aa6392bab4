//! Stacks of hypotheses layered on top of a fixed problem

use crate::*;

/// A LIFO stack of assumptions, as handled by incremental solvers.
pub trait Assumptions<T> {
    fn push(&mut self, assumption: T);

    fn peek(&self) -> Option<&T>;

    fn pop(&mut self) -> Option<T>;

    fn clear(&mut self);

    fn size(&self) -> usize;

    fn push_all<I: IntoIterator<Item = T>>(&mut self, assumptions: I)
    where
        Self: Sized,
    {
        for assumption in assumptions {
            self.push(assumption);
        }
    }

    /// Replace the top of the stack, returning the previous one
    fn replace_last(&mut self, assumption: T) -> Option<T> {
        let last = self.pop();
        self.push(assumption);
        last
    }

    /// Remove up to `count` assumptions
    fn pop_n(&mut self, count: usize) {
        for _ in 0..count {
            if self.pop().is_none() {
                break;
            }
        }
    }

    /// Pop assumptions until the stack has (at most) the given size
    fn truncate(&mut self, size: usize) {
        self.pop_n(self.size().saturating_sub(size));
    }
}

/// Assumptions stored in a vector
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssumptionStack<T> {
    stack: Vec<T>,
}

impl<T> AssumptionStack<T> {
    pub fn new() -> Self {
        Self { stack: vec![] }
    }

    /// Assumptions from bottom to top
    pub fn as_slice(&self) -> &[T] {
        &self.stack
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.stack.iter()
    }
}

impl AssumptionStack<i32> {
    /// Current assumptions as a list of literals
    pub fn literals(&self) -> Result<LiteralList, FokitError> {
        LiteralList::new(self.stack.clone(), Order::Unordered)
    }
}

impl<T> Assumptions<T> for AssumptionStack<T> {
    fn push(&mut self, assumption: T) {
        self.stack.push(assumption);
    }

    fn peek(&self) -> Option<&T> {
        self.stack.last()
    }

    fn pop(&mut self) -> Option<T> {
        self.stack.pop()
    }

    fn clear(&mut self) {
        self.stack.clear();
    }

    fn size(&self) -> usize {
        self.stack.len()
    }

    fn truncate(&mut self, size: usize) {
        self.stack.truncate(size);
    }
}

#[cfg(test)]
mod tests {
    use crate::*;

    #[test]
    fn stack() -> Result<(), FokitError> {
        let mut stack: AssumptionStack<i32> = AssumptionStack::new();
        stack.push_all([1, -2, 3, 4]);
        assert_eq!(stack.size(), 4);
        assert_eq!(stack.peek(), Some(&4));

        assert_eq!(stack.replace_last(-4), Some(4));
        assert_eq!(stack.as_slice(), &[1, -2, 3, -4]);

        stack.pop_n(1);
        assert_eq!(stack.literals()?.literals(), &[1, -2, 3]);

        stack.truncate(5);
        assert_eq!(stack.size(), 3);
        stack.truncate(1);
        assert_eq!(stack.pop(), Some(1));
        assert_eq!(stack.pop(), None);

        stack.push(0);
        assert!(stack.literals().is_err());
        stack.clear();
        assert_eq!(stack.size(), 0);
        Ok(())
    }
}
