use smol_str::SmolStr;
use std::{
    fmt::{self, Display, Formatter},
    ops::{Add, Div, Mul, Neg, Sub},
};

/// An expression.
///
/// Every node exclusively owns its children, so cloning an [`Expression`] is
/// always a deep copy.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Number(f64),
    /// A named variable.
    Symbol(SmolStr),
    /// An expression involving two operands.
    Binary {
        left: Box<Expression>,
        right: Box<Expression>,
        op: BinaryOperation,
    },
    /// Invoke a function (e.g. `\sqrt{x}`).
    FunctionCall {
        function: SmolStr,
        argument: Box<Expression>,
    },
}

impl Expression {
    pub fn symbol<S: Into<SmolStr>>(name: S) -> Self {
        Expression::Symbol(name.into())
    }

    pub fn binary(
        left: Expression,
        right: Expression,
        op: BinaryOperation,
    ) -> Self {
        Expression::Binary {
            left: Box::new(left),
            right: Box::new(right),
            op,
        }
    }

    pub fn function<S: Into<SmolStr>>(name: S, argument: Expression) -> Self {
        Expression::FunctionCall {
            function: name.into(),
            argument: Box::new(argument),
        }
    }

    /// Iterate over the name of every [`Expression::Symbol`] in this tree,
    /// left to right. A name is yielded once per occurrence.
    pub fn symbols(&self) -> Symbols<'_> {
        Symbols {
            to_visit: vec![self],
        }
    }

    /// Does this expression mention a particular variable?
    pub fn depends_on(&self, name: &str) -> bool {
        self.symbols().any(|symbol| symbol.as_str() == name)
    }

    /// Is this expression free of variables?
    pub fn is_constant(&self) -> bool { self.symbols().next().is_none() }

    /// Render the expression using the same LaTeX-flavoured syntax accepted by
    /// the parser.
    ///
    /// Unlike the [`Display`] impl, which writes functions as `sqrt(x)`, this
    /// writes them as `\sqrt{x}` so the output can always be parsed again.
    pub fn to_latex(&self) -> String { Latex(self).to_string() }
}

/// An iterator over the symbols in an [`Expression`], created by
/// [`Expression::symbols()`].
#[derive(Debug, Clone)]
pub struct Symbols<'a> {
    to_visit: Vec<&'a Expression>,
}

impl<'a> Iterator for Symbols<'a> {
    type Item = &'a SmolStr;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(expr) = self.to_visit.pop() {
            match expr {
                Expression::Symbol(name) => return Some(name),
                Expression::Number(_) => {},
                Expression::Binary { left, right, .. } => {
                    // push the right side first so we visit left-to-right
                    self.to_visit.push(right);
                    self.to_visit.push(left);
                },
                Expression::FunctionCall { argument, .. } => {
                    self.to_visit.push(argument);
                },
            }
        }

        None
    }
}

/// An operation that can be applied to two arguments.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BinaryOperation {
    Plus,
    Minus,
    Times,
    Divide,
    Power,
}

impl BinaryOperation {
    /// Apply the operation to two numbers, using plain IEEE-754 semantics.
    pub fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            BinaryOperation::Plus => left + right,
            BinaryOperation::Minus => left - right,
            BinaryOperation::Times => left * right,
            BinaryOperation::Divide => left / right,
            BinaryOperation::Power => left.powf(right),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperation::Plus => "+",
            BinaryOperation::Minus => "-",
            BinaryOperation::Times => "*",
            BinaryOperation::Divide => "/",
            BinaryOperation::Power => "^",
        }
    }
}

impl Display for BinaryOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// define some operator overloads to make constructing an expression easier.

impl Add for Expression {
    type Output = Expression;

    fn add(self, rhs: Expression) -> Expression {
        Expression::binary(self, rhs, BinaryOperation::Plus)
    }
}

impl Sub for Expression {
    type Output = Expression;

    fn sub(self, rhs: Expression) -> Expression {
        Expression::binary(self, rhs, BinaryOperation::Minus)
    }
}

impl Mul for Expression {
    type Output = Expression;

    fn mul(self, rhs: Expression) -> Expression {
        Expression::binary(self, rhs, BinaryOperation::Times)
    }
}

impl Div for Expression {
    type Output = Expression;

    fn div(self, rhs: Expression) -> Expression {
        Expression::binary(self, rhs, BinaryOperation::Divide)
    }
}

/// Negation is sugar for `0 - x`, the same tree the parser builds for a
/// unary minus.
impl Neg for Expression {
    type Output = Expression;

    fn neg(self) -> Self::Output { Expression::Number(0.0) - self }
}

impl From<f64> for Expression {
    fn from(value: f64) -> Self { Expression::Number(value) }
}

/// The canonical form: every binary operation is fully parenthesized as
/// `(left op right)` and functions are written as `name(argument)`.
impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Number(value) => write!(f, "{}", value),
            Expression::Symbol(name) => write!(f, "{}", name),
            Expression::Binary { left, right, op } => {
                write!(f, "({} {} {})", left, op, right)
            },
            Expression::FunctionCall { function, argument } => {
                write!(f, "{}({})", function, argument)
            },
        }
    }
}

struct Latex<'a>(&'a Expression);

impl<'a> Display for Latex<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0 {
            Expression::Binary { left, right, op } => {
                write!(f, "({} {} {})", Latex(left), op, Latex(right))
            },
            Expression::FunctionCall { function, argument } => {
                write!(f, "\\{}{{{}}}", function, Latex(argument))
            },
            // negative literals only come out of the simplifier, so spell
            // them the way a unary minus would be parsed
            Expression::Number(value) if value.is_sign_negative() => {
                write!(f, "(0 - {})", -value)
            },
            other => write!(f, "{}", other),
        }
    }
}
