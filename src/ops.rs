//! [`Expression`] operations.

use crate::{BinaryOperation, Context, Expression};
use euclid::approxeq::ApproxEq;
use smol_str::SmolStr;

/// Anything with a magnitude smaller than this is treated as zero when
/// dividing, and is what "equal to 0 or 1" means when simplifying.
pub const EPSILON: f64 = 1e-10;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvaluationError {
    #[error("undefined variable \"{name}\"")]
    UndefinedVariable { name: SmolStr },
    #[error("division by zero")]
    DivisionByZero,
    #[error("cannot take the square root of a negative number ({value})")]
    NegativeSqrt { value: f64 },
    #[error("unknown function \"{name}\"")]
    UnknownFunction { name: SmolStr },
}

/// Calculate the value of an [`Expression`], looking variables up in the
/// [`Context`].
///
/// Operands are evaluated left to right. Raising a negative number to a
/// fractional power follows [`f64::powf()`] and yields `NaN` rather than an
/// error.
pub fn evaluate(
    expr: &Expression,
    ctx: &Context,
) -> Result<f64, EvaluationError> {
    match expr {
        Expression::Number(value) => Ok(*value),
        Expression::Symbol(name) => ctx
            .get(name)
            .ok_or_else(|| EvaluationError::UndefinedVariable {
                name: name.clone(),
            }),
        Expression::Binary { left, right, op } => {
            let left = evaluate(left, ctx)?;
            let right = evaluate(right, ctx)?;

            if *op == BinaryOperation::Divide && right.abs() < EPSILON {
                return Err(EvaluationError::DivisionByZero);
            }

            Ok(op.apply(left, right))
        },
        Expression::FunctionCall { function, argument } => {
            let argument = evaluate(argument, ctx)?;
            evaluate_function(function, argument)
        },
    }
}

/// Invoke a builtin function. Only `sqrt` can actually be evaluated.
pub fn evaluate_function(
    name: &str,
    argument: f64,
) -> Result<f64, EvaluationError> {
    match name {
        "sqrt" if argument < 0.0 => {
            Err(EvaluationError::NegativeSqrt { value: argument })
        },
        "sqrt" => Ok(argument.sqrt()),
        _ => Err(EvaluationError::UnknownFunction { name: name.into() }),
    }
}

/// Simplify an expression by evaluating all constant operations and applying
/// arithmetic's identity laws.
///
/// This never fails. Anything which can't be folded safely (e.g. `5/0` or
/// `\sqrt{-4}`) is left as-is, and so is any constant operation whose result
/// would be `NaN` or infinite (e.g. `(0 - 8)^0.5` or `10^400`).
pub fn simplify(expr: &Expression) -> Expression {
    match expr {
        Expression::Binary { left, right, op } => {
            simplify_binary_op(left, right, *op)
        },
        Expression::FunctionCall { function, argument } => {
            match simplify(argument) {
                Expression::Number(value)
                    if function.as_str() == "sqrt" && value >= 0.0 =>
                {
                    Expression::Number(value.sqrt())
                },
                argument => Expression::function(function.clone(), argument),
            }
        },
        _ => expr.clone(),
    }
}

fn simplify_binary_op(
    left: &Expression,
    right: &Expression,
    op: BinaryOperation,
) -> Expression {
    let left = simplify(left);
    let right = simplify(right);

    match (left, right, op) {
        // Evaluate in-place
        (Expression::Number(l), Expression::Number(r), op) => {
            let dividing_by_zero =
                op == BinaryOperation::Divide && is_approx(r, 0.0);
            let value = op.apply(l, r);

            if dividing_by_zero || !value.is_finite() {
                Expression::binary(
                    Expression::Number(l),
                    Expression::Number(r),
                    op,
                )
            } else {
                Expression::Number(value)
            }
        },

        // x + 0 = x
        (left, Expression::Number(r), BinaryOperation::Plus)
            if is_approx(r, 0.0) =>
        {
            left
        },
        (Expression::Number(l), right, BinaryOperation::Plus)
            if is_approx(l, 0.0) =>
        {
            right
        },

        // x - 0 = x
        (left, Expression::Number(r), BinaryOperation::Minus)
            if is_approx(r, 0.0) =>
        {
            left
        },

        // x * 0 = 0
        (_, Expression::Number(r), BinaryOperation::Times)
            if is_approx(r, 0.0) =>
        {
            Expression::Number(0.0)
        },
        (Expression::Number(l), _, BinaryOperation::Times)
            if is_approx(l, 0.0) =>
        {
            Expression::Number(0.0)
        },

        // x * 1 = x
        (left, Expression::Number(r), BinaryOperation::Times)
            if is_approx(r, 1.0) =>
        {
            left
        },
        (Expression::Number(l), right, BinaryOperation::Times)
            if is_approx(l, 1.0) =>
        {
            right
        },

        // 0 / x = 0
        (Expression::Number(l), _, BinaryOperation::Divide)
            if is_approx(l, 0.0) =>
        {
            Expression::Number(0.0)
        },

        // x / 1 = x
        (left, Expression::Number(r), BinaryOperation::Divide)
            if is_approx(r, 1.0) =>
        {
            left
        },

        // Oh well, we tried
        (left, right, op) => Expression::binary(left, right, op),
    }
}

fn is_approx(value: f64, target: f64) -> bool {
    value.approx_eq_eps(&target, &EPSILON)
}
