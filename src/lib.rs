//! Parse, evaluate, simplify and solve simple LaTeX-flavoured arithmetic.
//!
//! ```rust
//! use latex_solver::{Context, LinearSolver};
//!
//! let equation = latex_solver::parse_equation("2 \\times x - 3 = 7").unwrap();
//! let x = LinearSolver::solve(&equation, &Context::new()).unwrap();
//!
//! assert_eq!(x, 5.0);
//! ```

#[cfg(test)]
#[macro_use]
extern crate pretty_assertions;

pub mod coefficients;
mod context;
mod equations;
mod expr;
pub mod lex;
pub mod ops;
pub mod parse;
pub mod pretty;
pub mod solve;

pub use coefficients::Coefficients;
pub use context::Context;
pub use equations::Equation;
pub use expr::{BinaryOperation, Expression, Symbols};
pub use lex::{LexError, Lexer, Token, TokenKind};
pub use ops::{evaluate, simplify, EvaluationError};
pub use parse::{parse, parse_equation, ParseError, Parser, ParserOptions};
pub use solve::{
    LinearSolver, NonLinearReason, QuadraticSolver, Roots, Solution, SolveError,
};
