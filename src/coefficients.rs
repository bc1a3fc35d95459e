//! Extracting the polynomial coefficients of a single variable from an
//! arbitrary [`Expression`].
//!
//! Rather than implementing a general computer algebra system, we walk the
//! tree and treat every subexpression as a polynomial of degree at most 2 in
//! the variable we're solving for. Subexpressions which don't mention the
//! variable are evaluated directly.

use crate::{
    ops::{self, EvaluationError, EPSILON},
    solve::{NonLinearReason, SolveError},
    BinaryOperation, Context, Equation, Expression,
};
use std::ops::{Add, Sub};

/// The coefficients of `quadratic*v^2 + linear*v + constant` for some
/// variable, `v`.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Coefficients {
    pub quadratic: f64,
    pub linear: f64,
    pub constant: f64,
}

impl Coefficients {
    pub fn constant(value: f64) -> Self {
        Coefficients {
            constant: value,
            ..Default::default()
        }
    }

    /// The coefficients of `v` itself.
    pub fn variable() -> Self {
        Coefficients {
            linear: 1.0,
            ..Default::default()
        }
    }

    /// Collect the coefficients of `variable` in an expression.
    pub fn collect(
        expr: &Expression,
        variable: &str,
        ctx: &Context,
    ) -> Result<Self, SolveError> {
        match expr {
            Expression::Number(value) => Ok(Coefficients::constant(*value)),
            _ if !expr.depends_on(variable) => {
                Ok(Coefficients::constant(evaluate_constant(expr, ctx)?))
            },
            // it must be our variable, everything else was caught above
            Expression::Symbol(_) => Ok(Coefficients::variable()),
            Expression::Binary { left, right, op } => {
                collect_binary_op(left, right, *op, variable, ctx)
            },
            Expression::FunctionCall { function, .. } => {
                Err(SolveError::NonLinear(
                    NonLinearReason::VariableInsideFunction {
                        function: function.clone(),
                    },
                ))
            },
        }
    }

    /// Collect the coefficients for `left - right = 0`.
    pub fn for_equation(
        equation: &Equation,
        variable: &str,
        ctx: &Context,
    ) -> Result<Self, SolveError> {
        let left = Coefficients::collect(equation.left(), variable, ctx)?;
        let right = Coefficients::collect(equation.right(), variable, ctx)?;

        Ok(left - right)
    }

    fn multiply(self, other: Coefficients) -> Result<Self, SolveError> {
        let cubic =
            self.quadratic * other.linear + self.linear * other.quadratic;
        let quartic = self.quadratic * other.quadratic;

        if cubic != 0.0 || quartic != 0.0 {
            return Err(SolveError::NonLinear(NonLinearReason::DegreeTooHigh));
        }

        Ok(Coefficients {
            quadratic: self.quadratic * other.constant
                + self.linear * other.linear
                + self.constant * other.quadratic,
            linear: self.linear * other.constant + self.constant * other.linear,
            constant: self.constant * other.constant,
        })
    }

    fn divide(self, divisor: f64) -> Self {
        Coefficients {
            quadratic: self.quadratic / divisor,
            linear: self.linear / divisor,
            constant: self.constant / divisor,
        }
    }
}

impl Add for Coefficients {
    type Output = Coefficients;

    fn add(self, rhs: Coefficients) -> Coefficients {
        Coefficients {
            quadratic: self.quadratic + rhs.quadratic,
            linear: self.linear + rhs.linear,
            constant: self.constant + rhs.constant,
        }
    }
}

impl Sub for Coefficients {
    type Output = Coefficients;

    fn sub(self, rhs: Coefficients) -> Coefficients {
        Coefficients {
            quadratic: self.quadratic - rhs.quadratic,
            linear: self.linear - rhs.linear,
            constant: self.constant - rhs.constant,
        }
    }
}

fn collect_binary_op(
    left: &Expression,
    right: &Expression,
    op: BinaryOperation,
    variable: &str,
    ctx: &Context,
) -> Result<Coefficients, SolveError> {
    match op {
        BinaryOperation::Plus => {
            let left = Coefficients::collect(left, variable, ctx)?;
            let right = Coefficients::collect(right, variable, ctx)?;
            Ok(left + right)
        },
        BinaryOperation::Minus => {
            let left = Coefficients::collect(left, variable, ctx)?;
            let right = Coefficients::collect(right, variable, ctx)?;
            Ok(left - right)
        },
        BinaryOperation::Times => {
            let left = Coefficients::collect(left, variable, ctx)?;
            let right = Coefficients::collect(right, variable, ctx)?;
            left.multiply(right)
        },
        BinaryOperation::Divide => {
            if right.depends_on(variable) {
                return Err(SolveError::NonLinear(
                    NonLinearReason::VariableInDenominator,
                ));
            }

            let numerator = Coefficients::collect(left, variable, ctx)?;
            let divisor = evaluate_constant(right, ctx)?;

            if divisor.abs() < EPSILON {
                return Err(SolveError::DivisionByZeroInCoefficient);
            }

            Ok(numerator.divide(divisor))
        },
        BinaryOperation::Power => {
            if right.depends_on(variable) {
                return Err(SolveError::NonLinear(
                    NonLinearReason::VariableInExponent,
                ));
            }

            let base = Coefficients::collect(left, variable, ctx)?;
            let exponent = evaluate_constant(right, ctx)?;

            if exponent == 1.0 {
                Ok(base)
            } else if exponent == 2.0 {
                base.multiply(base)
            } else {
                Err(SolveError::NonLinear(
                    NonLinearReason::UnsupportedExponent { exponent },
                ))
            }
        },
    }
}

/// Evaluate a subexpression which doesn't mention the unknown. Dividing by
/// zero is reported the same way wherever it happens while collecting.
fn evaluate_constant(
    expr: &Expression,
    ctx: &Context,
) -> Result<f64, SolveError> {
    ops::evaluate(expr, ctx).map_err(|e| match e {
        EvaluationError::DivisionByZero => {
            SolveError::DivisionByZeroInCoefficient
        },
        other => SolveError::Eval(other),
    })
}

/// The coefficient of `variable^2`.
pub fn collect_quadratic(
    expr: &Expression,
    variable: &str,
    ctx: &Context,
) -> Result<f64, SolveError> {
    Coefficients::collect(expr, variable, ctx).map(|c| c.quadratic)
}

/// The coefficient of `variable`.
pub fn collect_linear(
    expr: &Expression,
    variable: &str,
    ctx: &Context,
) -> Result<f64, SolveError> {
    Coefficients::collect(expr, variable, ctx).map(|c| c.linear)
}

/// The value of the expression when `variable` is `0`.
pub fn collect_constant(
    expr: &Expression,
    variable: &str,
    ctx: &Context,
) -> Result<f64, SolveError> {
    Coefficients::collect(expr, variable, ctx).map(|c| c.constant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn coefficients(quadratic: f64, linear: f64, constant: f64) -> Coefficients {
        Coefficients {
            quadratic,
            linear,
            constant,
        }
    }

    #[test]
    fn collect_coefficients_of_x() {
        let inputs = vec![
            ("x", coefficients(0.0, 1.0, 0.0)),
            ("5", coefficients(0.0, 0.0, 5.0)),
            ("x + 5", coefficients(0.0, 1.0, 5.0)),
            ("2*x - 3", coefficients(0.0, 2.0, -3.0)),
            ("x*3/2", coefficients(0.0, 1.5, 0.0)),
            ("-x", coefficients(0.0, -1.0, 0.0)),
            ("x^1", coefficients(0.0, 1.0, 0.0)),
            ("x^2", coefficients(1.0, 0.0, 0.0)),
            ("x*x", coefficients(1.0, 0.0, 0.0)),
            ("3*x^2 - 5*x + 6", coefficients(3.0, -5.0, 6.0)),
            ("x^2/2", coefficients(0.5, 0.0, 0.0)),
            ("(x + 1)*(x + 2)", coefficients(1.0, 3.0, 2.0)),
            ("(2*x)^2", coefficients(4.0, 0.0, 0.0)),
            ("x - x", coefficients(0.0, 0.0, 0.0)),
            ("\\sqrt{16} * x + 2^3", coefficients(0.0, 4.0, 8.0)),
            ("a*x + b", coefficients(0.0, 2.0, 7.0)),
        ];
        let ctx = Context::new().with("a", 2.0).with("b", 7.0);

        for (src, should_be) in inputs {
            let expr = parse(src).unwrap();

            let got = Coefficients::collect(&expr, "x", &ctx).unwrap();

            assert_eq!(got, should_be, "{}", src);
        }
    }

    #[test]
    fn projections_pick_out_a_single_coefficient() {
        let expr = parse("2*x^2 + 3*x + 4").unwrap();
        let ctx = Context::new();

        assert_eq!(collect_quadratic(&expr, "x", &ctx).unwrap(), 2.0);
        assert_eq!(collect_linear(&expr, "x", &ctx).unwrap(), 3.0);
        assert_eq!(collect_constant(&expr, "x", &ctx).unwrap(), 4.0);
    }

    #[test]
    fn equations_are_rearranged_to_equal_zero() {
        let equation = parse::parse_equation("x^2 + 1 = 3*x - x^2").unwrap();

        let got =
            Coefficients::for_equation(&equation, "x", &Context::new()).unwrap();

        assert_eq!(got, coefficients(2.0, -3.0, 1.0));
    }

    #[test]
    fn unsupported_structures() {
        let inputs = vec![
            ("x*x*x", NonLinearReason::DegreeTooHigh),
            ("x^2 * x", NonLinearReason::DegreeTooHigh),
            ("(x^2)^2", NonLinearReason::DegreeTooHigh),
            ("1/x", NonLinearReason::VariableInDenominator),
            ("2^x", NonLinearReason::VariableInExponent),
            ("x^3", NonLinearReason::UnsupportedExponent { exponent: 3.0 }),
            ("x^0.5", NonLinearReason::UnsupportedExponent { exponent: 0.5 }),
            (
                "\\sqrt{x}",
                NonLinearReason::VariableInsideFunction {
                    function: "sqrt".into(),
                },
            ),
        ];

        for (src, should_be) in inputs {
            let expr = parse(src).unwrap();

            let got =
                Coefficients::collect(&expr, "x", &Context::new()).unwrap_err();

            assert_eq!(got, SolveError::NonLinear(should_be), "{}", src);
        }
    }

    #[test]
    fn dividing_by_a_zero_constant() {
        let expr = parse("x / (3 - 3)").unwrap();

        let got = Coefficients::collect(&expr, "x", &Context::new());

        assert_eq!(got, Err(SolveError::DivisionByZeroInCoefficient));
    }

    #[test]
    fn constant_subexpressions_are_evaluated() {
        let inputs = vec![
            ("x + 1/0", SolveError::DivisionByZeroInCoefficient),
            ("x * (2 / (1 - 1))", SolveError::DivisionByZeroInCoefficient),
            ("x^(1/0)", SolveError::DivisionByZeroInCoefficient),
            (
                "x + \\sqrt{0 - 4}",
                SolveError::Eval(EvaluationError::NegativeSqrt { value: -4.0 }),
            ),
        ];

        for (src, should_be) in inputs {
            let expr = parse(src).unwrap();

            let got = Coefficients::collect(&expr, "x", &Context::new());

            assert_eq!(got, Err(should_be), "{}", src);
        }
    }
}
