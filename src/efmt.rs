//! Formatting API for expressions

use crate::*;
use delegate::delegate;

use std::fmt;

/// An expression associated with a display configuration
pub struct Formatted<'a> {
    expr: &'a Expr,
    symbols: &'a Symbols,
    namer: Option<&'a VariableMap>,
    prefix: bool,
}

/// Define hooks to display separate parts of expressions.
///
/// This trait provide entry points used by [crate::Expr::fmt_with] to control the presentation of the expression.
/// The expression visits the inner tree and calls the hooks defined in this trait for each node and leaf.
///
/// A default formatter is implemented on top of [fmt::Formatter], additional formatters are used through
/// wrappers overriding the Display trait.
pub trait ExprFormatter {
    /// Pass-through function calling an internal [fmt::Formatter].
    ///
    /// This function enables the use of the ```write!``` macro in other functions.
    fn write_fmt(&mut self, args: fmt::Arguments) -> fmt::Result;

    /// Write a fixed Boolean node
    fn write_bool(&mut self, b: bool) -> fmt::Result;

    /// Write the name of a variable
    fn write_variable(&mut self, index: usize) -> fmt::Result;

    /// Write a single variable, which can be negated
    fn write_literal(&mut self, index: usize, positive: bool) -> fmt::Result;

    /// Start writing an operation.
    ///
    /// The parameters are the bounds of cardinality operators, or the bound variable of quantifiers.
    fn start_operation(&mut self, op: Operator, params: &[usize], parent: Option<Operator>) -> fmt::Result;

    /// Stop writing an operation
    fn end_operation(&mut self, op: Operator, parent: Option<Operator>) -> fmt::Result;

    /// Separate operands in the ongoing operation
    fn sep_operation(&mut self, op: Operator) -> fmt::Result;

    /// Write an arithmetic term
    fn write_term(&mut self, term: &Term) -> fmt::Result {
        format_term(self, term, false)
    }

    /// Write an atomic predicate, which can be negated
    fn write_predicate(&mut self, predicate: &Predicate) -> fmt::Result {
        if !predicate.positive {
            self.start_operation(Operator::Not, &[], None)?;
            write!(self, "(")?;
        }
        self.write_term(&predicate.left)?;
        write!(self, " {} ", predicate.comparison.symbol())?;
        self.write_term(&predicate.right)?;
        if !predicate.positive {
            write!(self, ")")?;
            self.end_operation(Operator::Not, None)?;
        }
        Ok(())
    }
}

fn format_term<F: ExprFormatter + ?Sized>(f: &mut F, term: &Term, nested: bool) -> fmt::Result {
    let (terms, sep) = match term {
        Term::Variable(idx) => return f.write_variable(*idx),
        Term::IntConstant(v) => return write!(f, "{}", v),
        Term::RealConstant(v) => return write!(f, "{:?}", v),
        Term::Add(terms) => (terms, " + "),
        Term::Multiply(terms) => (terms, " * "),
    };
    let parens = nested && matches!(term, Term::Add(_));
    if parens {
        write!(f, "(")?;
    }
    for (i, t) in terms.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", sep)?;
        }
        format_term(f, t, true)?;
    }
    if parens {
        write!(f, ")")?;
    }
    Ok(())
}

/// Test if an operation must be enclosed in parentheses in the context of its parent
fn needs_parentheses(op: Operator, parent: Option<Operator>) -> bool {
    if !op.is_infix() {
        return false;
    }
    match parent {
        None => false,
        Some(Operator::Not) => true,
        Some(p) if p.is_infix() => {
            op.priority() < p.priority()
                || (op == p && !matches!(op, Operator::And | Operator::Or))
                || (op != p && op.priority() == p.priority())
        }
        Some(_) => false,
    }
}

impl<'a> Formatted<'a> {
    pub fn infix(expr: &'a Expr, symbols: &'a Symbols, namer: Option<&'a VariableMap>) -> Self {
        Self {
            expr,
            symbols,
            namer,
            prefix: false,
        }
    }

    pub fn prefix(expr: &'a Expr, symbols: &'a Symbols, namer: Option<&'a VariableMap>) -> Self {
        Self {
            expr,
            symbols,
            namer,
            prefix: true,
        }
    }
}

pub struct InfixFormatter<'a, 'b>(
    &'a mut fmt::Formatter<'b>,
    Option<&'a VariableMap>,
    &'a Symbols,
);
pub struct PrefixFormatter<'a, 'b>(InfixFormatter<'a, 'b>);

impl<'a, 'b> InfixFormatter<'a, 'b> {
    pub fn new(f: &'a mut fmt::Formatter<'b>) -> Self {
        Self(f, None, &SHORT_SYMBOLS)
    }
    pub fn named(f: &'a mut fmt::Formatter<'b>, namer: &'a VariableMap) -> Self {
        Self(f, Some(namer), &SHORT_SYMBOLS)
    }
    pub fn with(
        f: &'a mut fmt::Formatter<'b>,
        namer: Option<&'a VariableMap>,
        symbols: &'a Symbols,
    ) -> Self {
        Self(f, namer, symbols)
    }

    fn write_not(&mut self) -> fmt::Result {
        let symbols = self.2;
        match symbols.is_textual() {
            true => write!(self, "{} ", symbols.symbol(Operator::Not)),
            false => write!(self, "{}", symbols.symbol(Operator::Not)),
        }
    }

    fn write_params(&mut self, op: Operator, params: &[usize]) -> fmt::Result {
        if params.is_empty() {
            return Ok(());
        }
        write!(self, "[")?;
        for (i, p) in params.iter().enumerate() {
            if i > 0 {
                write!(self, ",")?;
            }
            match op {
                Operator::Exists | Operator::ForAll => self.write_variable(*p)?,
                _ => write!(self, "{}", p)?,
            }
        }
        write!(self, "]")
    }
}

impl<'a, 'b> PrefixFormatter<'a, 'b> {
    pub fn new(f: &'a mut fmt::Formatter<'b>) -> Self {
        Self(InfixFormatter::new(f))
    }
    pub fn with(
        f: &'a mut fmt::Formatter<'b>,
        namer: Option<&'a VariableMap>,
        symbols: &'a Symbols,
    ) -> Self {
        Self(InfixFormatter::with(f, namer, symbols))
    }
}

impl ExprFormatter for InfixFormatter<'_, '_> {
    fn write_fmt(&mut self, args: fmt::Arguments) -> fmt::Result {
        fmt::Formatter::write_fmt(self.0, args)
    }

    fn write_bool(&mut self, b: bool) -> fmt::Result {
        match b {
            false => write!(self, "0"),
            true => write!(self, "1"),
        }
    }

    fn write_variable(&mut self, index: usize) -> fmt::Result {
        match self.1 {
            None => write!(self, "_{}_", index),
            Some(namer) => namer.format_variable(self.0, index),
        }
    }

    fn write_literal(&mut self, index: usize, positive: bool) -> fmt::Result {
        if !positive {
            self.write_not()?;
        }
        self.write_variable(index)
    }

    fn start_operation(&mut self, op: Operator, params: &[usize], parent: Option<Operator>) -> fmt::Result {
        match op {
            Operator::Not => self.write_not(),
            _ if op.is_infix() => match needs_parentheses(op, parent) {
                true => write!(self, "("),
                false => Ok(()),
            },
            _ => {
                write!(self, "{}", self.2.symbol(op))?;
                self.write_params(op, params)?;
                write!(self, "(")
            }
        }
    }

    fn end_operation(&mut self, op: Operator, parent: Option<Operator>) -> fmt::Result {
        match op {
            Operator::Not => Ok(()),
            _ if op.is_infix() => match needs_parentheses(op, parent) {
                true => write!(self, ")"),
                false => Ok(()),
            },
            _ => write!(self, ")"),
        }
    }

    fn sep_operation(&mut self, op: Operator) -> fmt::Result {
        match op.is_infix() {
            true => write!(self, " {} ", self.2.symbol(op)),
            false => write!(self, ", "),
        }
    }
}

impl ExprFormatter for PrefixFormatter<'_, '_> {
    delegate! {
        to self.0 {
            fn write_fmt(&mut self, args: fmt::Arguments) -> fmt::Result;
            fn write_bool(&mut self, b: bool) -> fmt::Result;
            fn write_variable(&mut self, index: usize) -> fmt::Result;
            fn write_literal(&mut self, index: usize, positive: bool) -> fmt::Result;
        }
    }

    fn start_operation(&mut self, op: Operator, params: &[usize], _parent: Option<Operator>) -> fmt::Result {
        write!(self, "({}", self.0 .2.symbol(op))?;
        self.0.write_params(op, params)?;
        write!(self, " ")
    }

    fn end_operation(&mut self, _op: Operator, _parent: Option<Operator>) -> fmt::Result {
        write!(self, ")")
    }

    fn sep_operation(&mut self, _op: Operator) -> fmt::Result {
        write!(self, " ")
    }
}

impl fmt::Display for Formatted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.prefix {
            true => {
                let mut ef = PrefixFormatter::with(f, self.namer, self.symbols);
                self.expr.fmt_with(&mut ef)
            }
            false => {
                let mut ef = InfixFormatter::with(f, self.namer, self.symbols);
                self.expr.fmt_with(&mut ef)
            }
        }
    }
}
