//! Depth-first traversal of expression trees

use crate::Expr;

/// Instruction returned by the hooks of a [TreeVisitor]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VisitorResult {
    Continue,
    /// Do not visit the children of the current node (its last visit still happens)
    SkipChildren,
    /// Stop the traversal immediately
    Terminate,
}

/// Callbacks invoked during a depth-first traversal.
///
/// Each hook receives the path from the root to the current node (included, as last element).
pub trait TreeVisitor {
    type Output;

    /// Prepare the visitor for a new traversal
    fn reset(&mut self) {}

    /// Called when entering a node, before its children
    fn first_visit(&mut self, _path: &[&Expr]) -> VisitorResult {
        VisitorResult::Continue
    }

    /// Called when leaving a node, after its children
    fn last_visit(&mut self, _path: &[&Expr]) -> VisitorResult {
        VisitorResult::Continue
    }

    fn result(&self) -> Self::Output;
}

/// Walk the tree with an explicit stack and return the result of the visitor.
pub fn traverse<V: TreeVisitor + ?Sized>(root: &Expr, visitor: &mut V) -> V::Output {
    visitor.reset();
    let mut path: Vec<&Expr> = vec![root];
    let mut pending: Vec<std::vec::IntoIter<&Expr>> = vec![];
    match visitor.first_visit(&path) {
        VisitorResult::Terminate => return visitor.result(),
        VisitorResult::SkipChildren => pending.push(vec![].into_iter()),
        VisitorResult::Continue => pending.push(root.children().into_iter()),
    }

    while let Some(siblings) = pending.last_mut() {
        match siblings.next() {
            Some(child) => {
                path.push(child);
                match visitor.first_visit(&path) {
                    VisitorResult::Terminate => return visitor.result(),
                    VisitorResult::SkipChildren => pending.push(vec![].into_iter()),
                    VisitorResult::Continue => pending.push(child.children().into_iter()),
                }
            }
            None => {
                pending.pop();
                if visitor.last_visit(&path) == VisitorResult::Terminate {
                    return visitor.result();
                }
                path.pop();
            }
        }
    }
    visitor.result()
}

/// Compute the depth of a tree (a single leaf has depth 1)
#[derive(Default)]
pub struct DepthVisitor {
    depth: usize,
}

impl TreeVisitor for DepthVisitor {
    type Output = usize;

    fn reset(&mut self) {
        self.depth = 0;
    }

    fn first_visit(&mut self, path: &[&Expr]) -> VisitorResult {
        self.depth = self.depth.max(path.len());
        VisitorResult::Continue
    }

    fn result(&self) -> usize {
        self.depth
    }
}
