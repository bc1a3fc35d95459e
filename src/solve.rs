//! Solving linear and quadratic equations in a single unknown.

use crate::{
    coefficients::Coefficients,
    ops::EvaluationError,
    Context, Equation,
};
use arrayvec::ArrayVec;
use smol_str::SmolStr;
use std::fmt::{self, Display, Formatter};

/// The real roots of a quadratic, largest first when the leading coefficient
/// is positive.
pub type Roots = ArrayVec<[f64; 2]>;

/// Solves equations of the form `a*x + b = 0`.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct LinearSolver;

impl LinearSolver {
    /// Find the value of the equation's only unknown.
    pub fn solve(equation: &Equation, ctx: &Context) -> Result<f64, SolveError> {
        let (_, sides) = prepare(equation, ctx)?;
        linear_root(sides)
    }
}

/// Solves equations of the form `a*x^2 + b*x + c = 0` using the quadratic
/// formula.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct QuadraticSolver;

impl QuadraticSolver {
    /// Find the real roots of the equation's only unknown.
    ///
    /// When there are two roots they are always returned in the order
    /// `(-b + √d)/2a`, `(-b - √d)/2a`.
    pub fn solve(
        equation: &Equation,
        ctx: &Context,
    ) -> Result<Roots, SolveError> {
        let (_, sides) = prepare(equation, ctx)?;
        quadratic_roots(sides.combined())
    }
}

/// Solve an equation, automatically choosing the [`QuadraticSolver`] when the
/// unknown is squared and the [`LinearSolver`] otherwise.
pub fn solve(equation: &Equation, ctx: &Context) -> Result<Solution, SolveError> {
    let (variable, sides) = prepare(equation, ctx)?;

    if sides.combined().quadratic == 0.0 {
        let value = linear_root(sides)?;
        Ok(Solution::Single { variable, value })
    } else {
        let roots = quadratic_roots(sides.combined())?;
        Ok(Solution::Roots { variable, roots })
    }
}

/// The answer from [`solve()`].
#[derive(Debug, Clone, PartialEq)]
pub enum Solution {
    Single { variable: SmolStr, value: f64 },
    Roots { variable: SmolStr, roots: Roots },
}

impl Solution {
    pub fn variable(&self) -> &str {
        match self {
            Solution::Single { variable, .. }
            | Solution::Roots { variable, .. } => variable,
        }
    }

    pub fn values(&self) -> &[f64] {
        match self {
            Solution::Single { value, .. } => std::slice::from_ref(value),
            Solution::Roots { roots, .. } => &roots[..],
        }
    }
}

impl Display for Solution {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, value) in self.values().iter().enumerate() {
            if i > 0 {
                write!(f, " or ")?;
            }
            write!(f, "{} = {}", self.variable(), value)?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SolveError {
    #[error("the equation has no unknown variables")]
    NoUnknownVariable,
    #[error("multiple unknown variables found: {}", .names.join(", "))]
    MultipleUnknownVariables { names: Vec<SmolStr> },
    #[error("unable to solve symbolically, {0}")]
    NonLinear(NonLinearReason),
    #[error("division by zero while collecting coefficients")]
    DivisionByZeroInCoefficient,
    #[error("the equation is always true (infinitely many solutions)")]
    AlwaysTrue,
    #[error("the equation has no solution")]
    NoSolution,
    #[error("not a quadratic equation (use the linear solver)")]
    NotQuadratic,
    #[error("no real solutions (the discriminant is {discriminant})")]
    NoRealSolution { discriminant: f64 },
    #[error("evaluation failed: {0}")]
    Eval(#[from] EvaluationError),
}

/// Why an equation couldn't be treated as a polynomial of degree 2 or less.
#[derive(Debug, Clone, PartialEq)]
pub enum NonLinearReason {
    /// A product whose degree would be higher than 2 (e.g. `x^2 * x`).
    DegreeTooHigh,
    VariableInDenominator,
    VariableInExponent,
    /// The unknown was raised to something other than `1` or `2`.
    UnsupportedExponent { exponent: f64 },
    VariableInsideFunction { function: SmolStr },
    /// The [`LinearSolver`] was given an equation containing `x^2`.
    QuadraticTerm,
}

impl Display for NonLinearReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            NonLinearReason::DegreeTooHigh => {
                write!(f, "the unknown appears with a degree higher than 2")
            },
            NonLinearReason::VariableInDenominator => {
                write!(f, "cannot divide by an expression containing the unknown")
            },
            NonLinearReason::VariableInExponent => {
                write!(f, "the unknown appears in an exponent")
            },
            NonLinearReason::UnsupportedExponent { exponent } => write!(
                f,
                "the unknown is raised to {} (only 1 and 2 are supported)",
                exponent
            ),
            NonLinearReason::VariableInsideFunction { function } => {
                write!(f, "the unknown appears inside {}()", function)
            },
            NonLinearReason::QuadraticTerm => write!(
                f,
                "the equation is quadratic (use the quadratic solver)"
            ),
        }
    }
}

/// The largest relative difference between the constant terms on either
/// side of an equation for them to still count as equal.
///
/// This only matters once the unknown has cancelled out, where it decides
/// between [`SolveError::AlwaysTrue`] and [`SolveError::NoSolution`].
const CONSTANT_TOLERANCE: f64 = 1e-12;

/// The coefficients collected from each side of an equation.
#[derive(Debug, Copy, Clone, PartialEq)]
struct Sides {
    left: Coefficients,
    right: Coefficients,
}

impl Sides {
    /// The coefficients of `left - right = 0`.
    fn combined(self) -> Coefficients { self.left - self.right }

    fn constants_match(self) -> bool {
        approx::relative_eq!(
            self.left.constant,
            self.right.constant,
            epsilon = 0.0,
            max_relative = CONSTANT_TOLERANCE
        )
    }
}

/// Find the equation's unknown and collect its coefficients.
fn prepare(
    equation: &Equation,
    ctx: &Context,
) -> Result<(SmolStr, Sides), SolveError> {
    let variable = find_unknown(equation, ctx)?;
    log::debug!("Solving \"{}\" for {}", equation, variable);

    let sides = Sides {
        left: Coefficients::collect(equation.left(), &variable, ctx)?,
        right: Coefficients::collect(equation.right(), &variable, ctx)?,
    };
    log::debug!("Collected {:?}", sides.combined());

    Ok((variable, sides))
}

fn find_unknown(
    equation: &Equation,
    ctx: &Context,
) -> Result<SmolStr, SolveError> {
    let mut unknowns: Vec<SmolStr> =
        equation.unknowns(ctx).into_iter().collect();

    match unknowns.len() {
        0 => Err(SolveError::NoUnknownVariable),
        1 => Ok(unknowns.remove(0)),
        _ => Err(SolveError::MultipleUnknownVariables { names: unknowns }),
    }
}

fn linear_root(sides: Sides) -> Result<f64, SolveError> {
    let Coefficients {
        quadratic,
        linear: a,
        constant: b,
    } = sides.combined();

    if quadratic != 0.0 {
        return Err(SolveError::NonLinear(NonLinearReason::QuadraticTerm));
    }

    if a == 0.0 {
        return Err(if sides.constants_match() {
            SolveError::AlwaysTrue
        } else {
            SolveError::NoSolution
        });
    }

    Ok(positive_zero(-b / a))
}

fn quadratic_roots(coefficients: Coefficients) -> Result<Roots, SolveError> {
    let Coefficients {
        quadratic: a,
        linear: b,
        constant: c,
    } = coefficients;

    if a == 0.0 {
        return Err(SolveError::NotQuadratic);
    }

    let discriminant = b * b - 4.0 * a * c;
    let mut roots = Roots::new();

    if discriminant == 0.0 {
        roots.push(positive_zero(-b / (2.0 * a)));
    } else if discriminant < 0.0 {
        return Err(SolveError::NoRealSolution { discriminant });
    } else {
        let sqrt_discriminant = discriminant.sqrt();
        roots.push(positive_zero((-b + sqrt_discriminant) / (2.0 * a)));
        roots.push(positive_zero((-b - sqrt_discriminant) / (2.0 * a)));
    }

    Ok(roots)
}

/// Avoid handing back `-0`.
fn positive_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_equation;
    use approx::assert_relative_eq;

    fn solve_linear(src: &str) -> Result<f64, SolveError> {
        LinearSolver::solve(&parse_equation(src).unwrap(), &Context::new())
    }

    fn solve_quadratic(src: &str) -> Result<Roots, SolveError> {
        QuadraticSolver::solve(&parse_equation(src).unwrap(), &Context::new())
    }

    #[test]
    fn simple_linear_equations() {
        let inputs = vec![
            ("x + 5 = 10", 5.0),
            ("2*x - 3 = 7", 5.0),
            ("x = 5", 5.0),
            ("5 = x", 5.0),
            ("3*x + 2 = x + 10", 4.0),
            ("x / 4 = 2", 8.0),
            ("-x = 3", -3.0),
            ("2 \\times (x + 1) = 10", 4.0),
            ("\\sqrt{16} * x = 2", 0.5),
            ("x^1 + 1 = 0", -1.0),
            ("2*x = 0", 0.0),
        ];

        for (src, should_be) in inputs {
            let got = solve_linear(src).unwrap();

            assert_relative_eq!(got, should_be);
        }
    }

    #[test]
    fn known_variables_come_from_the_context() {
        let equation = parse_equation("a*x + b = 0").unwrap();
        let ctx = Context::new().with("a", 2.0).with("b", -8.0);

        let got = LinearSolver::solve(&equation, &ctx).unwrap();

        assert_relative_eq!(got, 4.0);
    }

    #[test]
    fn the_unknown_needs_to_be_unambiguous() {
        assert_eq!(solve_linear("1 + 2 = 3"), Err(SolveError::NoUnknownVariable));
        assert_eq!(
            solve_linear("y + x = 3 + y"),
            Err(SolveError::MultipleUnknownVariables {
                names: vec!["x".into(), "y".into()]
            })
        );
    }

    #[test]
    fn degenerate_linear_equations() {
        assert_eq!(solve_linear("x = x"), Err(SolveError::AlwaysTrue));
        assert_eq!(solve_linear("x + 1 = x"), Err(SolveError::NoSolution));
        // rounding error in the constants is judged relative to their size
        assert_eq!(
            solve_linear("x + 0.1 + 0.2 = x + 0.3"),
            Err(SolveError::AlwaysTrue)
        );
        assert_eq!(
            solve_linear("x + 0.0000000000001 = x"),
            Err(SolveError::NoSolution)
        );
        assert_eq!(
            solve_linear("0*x = 0.00000000000000000001"),
            Err(SolveError::NoSolution)
        );
    }

    #[test]
    fn tiny_coefficients_are_not_zero() {
        let got = solve_linear("x / 100000000000 = 1").unwrap();
        assert_relative_eq!(got, 1e11, max_relative = 1e-12);

        let roots = solve_quadratic("x^2 / 100000000000 - 1 = 0").unwrap();
        assert_eq!(roots.len(), 2);
        assert_relative_eq!(roots[0], 1e11_f64.sqrt(), max_relative = 1e-9);
        assert_relative_eq!(roots[1], -1e11_f64.sqrt(), max_relative = 1e-9);
    }

    #[test]
    fn a_small_positive_discriminant_still_gives_two_roots() {
        // (x - 1.0316e-5)(x - 9.684e-6), roughly
        let roots =
            solve_quadratic("x^2 - 0.00002*x + 0.0000000000999 = 0").unwrap();

        assert_eq!(roots.len(), 2);
        let half_gap = 1e-13_f64.sqrt();
        assert!(roots[0] > roots[1]);
        assert_relative_eq!(roots[0], 1e-5 + half_gap, max_relative = 1e-6);
        assert_relative_eq!(roots[1], 1e-5 - half_gap, max_relative = 1e-6);
    }

    #[test]
    fn linear_solver_rejects_quadratics() {
        assert_eq!(
            solve_linear("x^2 + x = 2"),
            Err(SolveError::NonLinear(NonLinearReason::QuadraticTerm))
        );
        assert_eq!(
            solve_linear("\\sqrt{x} = 2"),
            Err(SolveError::NonLinear(
                NonLinearReason::VariableInsideFunction {
                    function: "sqrt".into()
                }
            ))
        );
    }

    #[test]
    fn two_roots_come_back_largest_first() {
        let got = solve_quadratic("x^2 - 5*x + 6 = 0").unwrap();

        assert_eq!(&got[..], &[3.0, 2.0]);
    }

    #[test]
    fn roots_follow_the_quadratic_formula_order() {
        // a < 0 so the "+" root is the smaller one
        let got = solve_quadratic("0 - x^2 + 5*x - 6 = 0").unwrap();

        assert_eq!(&got[..], &[2.0, 3.0]);
    }

    #[test]
    fn repeated_root() {
        let got = solve_quadratic("x^2 - 2*x + 1 = 0").unwrap();

        assert_eq!(&got[..], &[1.0]);
    }

    #[test]
    fn quadratics_written_in_other_ways() {
        let inputs = vec![
            ("x*x = 4", vec![2.0, -2.0]),
            ("(x + 1)*(x - 3) = 0", vec![3.0, -1.0]),
            ("2*x^2 = 8", vec![2.0, -2.0]),
            ("x^2 = 3*x", vec![3.0, 0.0]),
            ("x^2/2 + x = 0", vec![0.0, -2.0]),
        ];

        for (src, should_be) in inputs {
            let got = solve_quadratic(src).unwrap();

            assert_eq!(got.len(), should_be.len(), "{}", src);
            for (root, expected) in got.iter().zip(&should_be) {
                assert_relative_eq!(*root, *expected);
            }
        }
    }

    #[test]
    fn negative_discriminant() {
        let got = solve_quadratic("x^2 + 1 = 0");

        assert_eq!(got, Err(SolveError::NoRealSolution { discriminant: -4.0 }));
    }

    #[test]
    fn quadratic_solver_needs_a_squared_term() {
        assert_eq!(solve_quadratic("2*x + 1 = 0"), Err(SolveError::NotQuadratic));
        assert_eq!(
            solve_quadratic("x^2 = x^2 + 1"),
            Err(SolveError::NotQuadratic)
        );
    }

    #[test]
    fn automatically_pick_a_solver() {
        let ctx = Context::new().with("c", 6.0);

        let linear = solve(&parse_equation("2*y = c").unwrap(), &ctx).unwrap();
        let quadratic =
            solve(&parse_equation("t^2 - 5*t + c = 0").unwrap(), &ctx).unwrap();

        assert_eq!(
            linear,
            Solution::Single {
                variable: "y".into(),
                value: 3.0
            }
        );
        assert_eq!(quadratic.variable(), "t");
        assert_eq!(quadratic.values(), &[3.0, 2.0]);
        assert_eq!(linear.to_string(), "y = 3");
        assert_eq!(quadratic.to_string(), "t = 3 or t = 2");
    }

    #[test]
    fn error_messages() {
        let inputs = vec![
            (
                SolveError::MultipleUnknownVariables {
                    names: vec!["x".into(), "y".into()],
                },
                "multiple unknown variables found: x, y",
            ),
            (
                SolveError::NonLinear(NonLinearReason::UnsupportedExponent {
                    exponent: 3.0,
                }),
                "unable to solve symbolically, the unknown is raised to 3 \
                 (only 1 and 2 are supported)",
            ),
            (
                SolveError::Eval(EvaluationError::DivisionByZero),
                "evaluation failed: division by zero",
            ),
        ];

        for (error, should_be) in inputs {
            assert_eq!(error.to_string(), should_be);
        }
    }
}
