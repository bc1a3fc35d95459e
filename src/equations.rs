use crate::{parse, Context, Expression, ParseError};
use smol_str::SmolStr;
use std::{
    collections::BTreeSet,
    fmt::{self, Display, Formatter},
    str::FromStr,
};

/// Two expressions which are meant to be equal.
#[derive(Debug, Clone, PartialEq)]
pub struct Equation {
    left: Expression,
    right: Expression,
}

impl Equation {
    pub fn new(left: Expression, right: Expression) -> Self {
        Equation { left, right }
    }

    pub fn left(&self) -> &Expression { &self.left }

    pub fn right(&self) -> &Expression { &self.right }

    pub fn into_parts(self) -> (Expression, Expression) {
        (self.left, self.right)
    }

    /// Every variable mentioned on either side which isn't bound in the
    /// [`Context`], sorted by name.
    pub fn unknowns(&self, ctx: &Context) -> BTreeSet<SmolStr> {
        self.left
            .symbols()
            .chain(self.right.symbols())
            .filter(|name| !ctx.has(name))
            .cloned()
            .collect()
    }
}

impl Display for Equation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.left, self.right)
    }
}

impl FromStr for Equation {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> { parse::parse_equation(s) }
}

impl FromStr for Expression {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> { parse::parse(s) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknowns_skip_bound_variables() {
        let equation: Equation = "a*x + b = y + x".parse().unwrap();
        let ctx = Context::new().with("a", 2.0).with("b", 1.0);

        let got: Vec<_> =
            equation.unknowns(&ctx).iter().map(|s| s.to_string()).collect();

        assert_eq!(got, vec!["x", "y"]);
    }

    #[test]
    fn display_joins_both_sides() {
        let equation = Equation::new(
            Expression::symbol("x") + Expression::Number(5.0),
            Expression::Number(10.0),
        );

        assert_eq!(equation.to_string(), "(x + 5) = 10");
    }
}
