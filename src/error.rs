use thiserror::Error;

/// Errors raised while building, transforming or analysing formulas.
#[derive(Error, Debug)]
pub enum FokitError {
    /// The name is invalid
    #[error("The name '{0}' is invalid")]
    InvalidName(String),

    /// The name is already bound to another variable
    #[error("The name '{0}' conflicts with an other variable")]
    NameCollision(String),

    /// The name is not part of the variable map
    #[error("There is no variable named '{0}'")]
    NoSuchVariableName(String),

    /// The index is not part of the variable map
    #[error("There is no variable with index {0}")]
    NoSuchVariable(usize),

    /// A zero literal or a literal referencing a variable outside of the map
    #[error("Invalid literal {0}")]
    InvalidLiteral(i32),

    /// A clausal conversion was requested on a formula which is not in normal form
    #[error("Not in {0}")]
    NfShapeViolation(String),

    /// A node received a list of children incompatible with its connective
    #[error("'{node}' can not have {found} children")]
    ArityViolation { node: &'static str, found: usize },

    /// The node can not be handled by this operation
    #[error("Unsupported node: {0}")]
    UnsupportedNode(String),

    /// A distribution would emit more literals than allowed
    #[error("The distribution exceeds the budget of {0} literals")]
    LiteralBudgetExceeded(usize),

    /// The monitor requested a stop
    #[error("The operation was cancelled")]
    Cancelled,

    /// Malformed input
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
