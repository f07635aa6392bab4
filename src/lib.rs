//! Build propositional formulas and reshape them into normal forms for feature-model analysis.
//!
//! [Boolean variables](Variable) are allocated in a [VariableMap] which associates each index to a unique name.
//! Expressions reference variables by index only: the map is carried alongside the expression, for example
//! in a [Formula]. Besides boolean connectives, expressions support cardinality constraints, quantifiers
//! over boolean variables and comparisons between arithmetic [terms](Term).
//!
//! ```
//! use fokit::{Expr, Formula, IndexAssignment, VariableMap};
//! # use fokit::FokitError;
//! # fn main() -> Result<(), FokitError> {
//!
//! // Create some variables
//! let mut variables = VariableMap::new();
//! let a = variables.add_boolean_variable(Some("a"))?;
//! let b = variables.add_boolean_variable(Some("b"))?;
//! let c = variables.add_boolean_variable(Some("c"))?;
//!
//! // Combine them into an expression
//! let expr = Expr::implies(a.into(), b | !c);
//! let formula = Formula::new(expr, variables);
//!
//! // Evaluate the formula: variable i takes the value of bit i-1
//! let state = IndexAssignment::from_bits(3, 0b101);
//! assert_eq!(formula.eval(&state), Some(false));
//! # Ok(())
//! # }
//! ```
//!
//! # Normal forms
//!
//! The [normal_forms] module tests whether an expression is in conjunctive (CNF) or disjunctive (DNF)
//! normal form and rewrites expressions into the flat clausal shape used by the transformers.
//!
//! The [CnfTransformer] builds an equisatisfiable CNF. Each top-level conjunct is expanded
//! with the [distributive law](DistributiveLawTransformer) while the number of literals remains below
//! a budget. Larger conjuncts are encoded with [Tseytin](TseytinTransformer) auxiliary variables.
//! Both parts are merged into a single formula over an extended variable map.
//!
//! ```
//! use fokit::{Cnf, CnfTransformer, Expr, Formula, NullMonitor, VariableMap};
//! # use fokit::FokitError;
//! # fn main() -> Result<(), FokitError> {
//! let mut variables = VariableMap::new();
//! let a = variables.add_boolean_variable(Some("a"))?;
//! let b = variables.add_boolean_variable(Some("b"))?;
//! let c = variables.add_boolean_variable(Some("c"))?;
//! let formula = Formula::new(Expr::implies(a.into(), b & c), variables);
//!
//! // Small formulas are distributed: no new variable
//! let cnf = CnfTransformer::default().execute(&formula, &NullMonitor)?;
//! assert_eq!(cnf.variables().len(), 3);
//! assert!(fokit::normal_forms::is_cnf(cnf.expr()));
//!
//! // Without budget, Tseytin introduces auxiliary variables
//! let tseytin = CnfTransformer::default()
//!     .with_maximum_number_of_literals(0)
//!     .execute(&formula, &NullMonitor)?;
//! assert!(tseytin.variables().len() > 3);
//!
//! // Extract the clauses
//! let clauses = Cnf::from_formula(&cnf)?;
//! assert_eq!(clauses.len(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! # Clauses and solutions
//!
//! A [LiteralList] is an immutable list of signed literals in DIMACS convention. It represents
//! clauses as well as (partial) configurations. A [Cnf] is a list of clauses over a variable map,
//! which can be exchanged with external solvers through the [DIMACS format](DimacsFormat).
//! Configurations are collected in a [SolutionList].
//!
//! ```
//! use fokit::{DimacsFormat, Format, LiteralList, Order, SolutionList};
//! # use fokit::FokitError;
//! # fn main() -> Result<(), FokitError> {
//! let mut input = "c 1 A\nc 2 B\np cnf 2 2\n1 -2 0\n2 0\n".as_bytes();
//! let cnf = DimacsFormat.parse(&mut input)?;
//! assert_eq!(cnf.len(), 2);
//!
//! let mut solutions = SolutionList::new(cnf.variables().clone());
//! solutions.add_solution(LiteralList::new(vec![1, 2], Order::Index)?);
//! solutions.add_solution(LiteralList::new(vec![-1, 2], Order::Index)?);
//! assert_eq!(solutions.valid_solutions(&cnf).count(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! # Interactions
//!
//! The [combinations] module enumerates the subsets of size t of a set of positions in several orders.
//! They are used by the [interaction finders](interactions) to identify the combinations of literals
//! responsible for failing configurations.

mod assignment;
mod assumptions;
mod clause;
mod cnf;
mod cnf_transformer;
pub mod combinations;
mod distributive;
pub mod efmt;
mod error;
mod expr;
mod formula;
pub mod interactions;
mod io;
mod literal_set;
mod metrics;
mod monitor;
pub mod normal_forms;
mod solutions;
mod symbols;
mod term;
pub mod tools;
mod tseytin;
mod variable_map;
pub mod visitor;

// Export public structures and API
pub use assignment::{Assignment, IndexAssignment, Value};
pub use assumptions::{AssumptionStack, Assumptions};
pub use clause::{LiteralList, Order};
pub use cnf::Cnf;
pub use cnf_transformer::{CnfTransformer, DnfTransformer};
pub use combinations::{CombinationIterator, IteratorId};
pub use distributive::{Distribution, DistributiveLawTransformer};
pub use error::FokitError;
pub use expr::{Cardinality, Expr, Literal, Quantifier};
pub use formula::Formula;
pub use interactions::{InteractionFinder, RandomInteractionFinder, SolutionUpdater, SplitInteractionFinder};
pub use io::{DimacsFormat, Format};
pub use literal_set::LiteralSet;
pub use metrics::{DistanceFunction, HammingDistance, JaccardDeselectedDistance};
pub use monitor::{CancelFlag, Monitor, NullMonitor};
pub use normal_forms::NormalForm;
pub use solutions::SolutionList;
pub use symbols::{Operator, Symbols, SHORT_SYMBOLS, TEXTUAL_SYMBOLS};
pub use term::{Comparison, Predicate, Term};
pub use tseytin::{Substitute, TseytinAtom, TseytinEncoding, TseytinTransformer};
pub use variable_map::{ValueType, Variable, VariableMap};
