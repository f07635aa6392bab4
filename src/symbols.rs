//! Operator vocabulary used to display (and recognise) expression connectives

use crate::Expr;

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// The connectives of an expression tree, with their default name and priority.
///
/// A higher priority binds tighter: ```a & b | c``` reads as ```(a & b) | c```.
/// Negation is always written as a prefix and never needs parentheses.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Not,
    And,
    Or,
    Implies,
    Equals,
    Choose,
    AtLeast,
    Between,
    AtMost,
    Exists,
    ForAll,
    Unknown,
}

static ALL_OPERATORS: [Operator; 12] = [
    Operator::Not,
    Operator::And,
    Operator::Or,
    Operator::Implies,
    Operator::Equals,
    Operator::Choose,
    Operator::AtLeast,
    Operator::Between,
    Operator::AtMost,
    Operator::Exists,
    Operator::ForAll,
    Operator::Unknown,
];

impl Operator {
    pub fn default_name(&self) -> &'static str {
        match self {
            Operator::Not => "not",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Implies => "implies",
            Operator::Equals => "equals",
            Operator::Choose => "choose",
            Operator::AtLeast => "atleast",
            Operator::Between => "between",
            Operator::AtMost => "atmost",
            Operator::Exists => "exists",
            Operator::ForAll => "forall",
            Operator::Unknown => "?",
        }
    }

    pub fn priority(&self) -> i32 {
        match self {
            Operator::Not => 0,
            Operator::And => 6,
            Operator::Or => 5,
            Operator::Implies => 4,
            Operator::Equals => 3,
            Operator::Choose | Operator::AtLeast | Operator::Between | Operator::AtMost => 2,
            Operator::Exists | Operator::ForAll => 1,
            Operator::Unknown => -1,
        }
    }

    /// Operators written between their operands
    pub fn is_infix(&self) -> bool {
        matches!(
            self,
            Operator::And | Operator::Or | Operator::Implies | Operator::Equals
        )
    }

    pub fn iter() -> impl Iterator<Item = Operator> {
        ALL_OPERATORS.iter().copied()
    }
}

/// A bidirectional association between operators and their symbols.
///
/// The default name of each operator is always recognised, even when
/// the table defines another symbol for it.
#[derive(Clone, Debug)]
pub struct Symbols {
    symbol2operator: HashMap<String, Operator>,
    operator2symbol: HashMap<Operator, String>,
    textual: bool,
}

/// Word-based symbols: ```not a and (b or c)```
pub static TEXTUAL_SYMBOLS: Lazy<Symbols> = Lazy::new(|| {
    Symbols::new(
        &[
            (Operator::Not, "not"),
            (Operator::And, "and"),
            (Operator::Or, "or"),
            (Operator::Implies, "implies"),
            (Operator::Equals, "iff"),
        ],
        true,
    )
});

/// Compact symbols: ```-a & (b | c)```
pub static SHORT_SYMBOLS: Lazy<Symbols> = Lazy::new(|| {
    Symbols::new(
        &[
            (Operator::Not, "-"),
            (Operator::And, "&"),
            (Operator::Or, "|"),
            (Operator::Implies, "=>"),
            (Operator::Equals, "<=>"),
        ],
        false,
    )
});

impl Symbols {
    pub fn new(symbols: &[(Operator, &str)], textual: bool) -> Self {
        let mut result = Self {
            symbol2operator: HashMap::new(),
            operator2symbol: HashMap::new(),
            textual,
        };
        for op in Operator::iter() {
            result.set_symbol(op, op.default_name());
        }
        for (op, symbol) in symbols {
            result.set_symbol(*op, symbol);
        }
        result
    }

    fn set_symbol(&mut self, op: Operator, symbol: &str) {
        self.symbol2operator.insert(symbol.to_string(), op);
        self.operator2symbol.insert(op, symbol.to_string());
    }

    /// Find the operator denoted by a symbol, or [Operator::Unknown]
    pub fn parse_symbol(&self, symbol: &str) -> Operator {
        self.symbol2operator
            .get(symbol)
            .copied()
            .unwrap_or(Operator::Unknown)
    }

    pub fn symbol(&self, op: Operator) -> &str {
        match self.operator2symbol.get(&op) {
            Some(s) => s.as_str(),
            None => op.default_name(),
        }
    }

    /// Textual symbols need to be separated from their operands by spaces
    pub fn is_textual(&self) -> bool {
        self.textual
    }

    /// Identify the connective of a node, terminal nodes have none
    pub fn operator(expr: &Expr) -> Option<Operator> {
        expr.operator()
    }
}

#[cfg(test)]
mod tests {
    use crate::*;

    #[test]
    fn symbol_tables() {
        assert_eq!(TEXTUAL_SYMBOLS.symbol(Operator::Equals), "iff");
        assert_eq!(TEXTUAL_SYMBOLS.symbol(Operator::AtMost), "atmost");
        assert_eq!(SHORT_SYMBOLS.symbol(Operator::And), "&");

        assert_eq!(TEXTUAL_SYMBOLS.parse_symbol("iff"), Operator::Equals);
        assert_eq!(TEXTUAL_SYMBOLS.parse_symbol("equals"), Operator::Equals);
        assert_eq!(SHORT_SYMBOLS.parse_symbol("=>"), Operator::Implies);
        assert_eq!(SHORT_SYMBOLS.parse_symbol("~~"), Operator::Unknown);
        assert!(TEXTUAL_SYMBOLS.is_textual());
        assert!(!SHORT_SYMBOLS.is_textual());

        assert!(Operator::And.priority() > Operator::Or.priority());
        assert!(Operator::Or.priority() > Operator::Implies.priority());
        assert_eq!(Operator::Unknown.priority(), -1);
    }

    #[test]
    fn node_operators() {
        let a = Expr::literal(1, true);
        let b = Expr::literal(2, false);
        assert_eq!(Symbols::operator(&a), None);
        assert_eq!(Symbols::operator(&(a.clone() & b.clone())), Some(Operator::And));
        assert_eq!(Symbols::operator(&Expr::biimplies(a.clone(), b.clone())), Some(Operator::Equals));
        assert_eq!(
            Symbols::operator(&Expr::cardinal(Cardinality::Choose(1), vec![a, b])),
            Some(Operator::Choose)
        );
    }
}
