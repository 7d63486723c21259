// Differentiation engine - applies calculus rules with respect to `x`
//
// Derivative trees are built through the folding helpers in `functions` so
// that zero and unit factors never reach the tree. The simplifier handles what
// is left.

use crate::Expr;
use crate::ast::Constant;
use crate::functions::registry::Registry;
use crate::functions::{add_opt, div_opt, mul_opt, neg, powi, sub_opt};

impl Expr {
    /// Differentiate this expression with respect to `x`
    ///
    /// # Example
    /// ```
    /// use num_anafis::compile_expression;
    ///
    /// let f = compile_expression("x^3 + sin(x)").unwrap();
    /// let d = f.expr().derive();
    /// assert_eq!(d.to_string(), "3 * x^2 + cos(x)");
    /// ```
    pub fn derive(&self) -> Expr {
        match self {
            // Base cases
            Expr::Number(_) | Expr::Constant(_) => Expr::number(0.0),
            Expr::Variable => Expr::number(1.0),

            Expr::Neg(u) => neg(u.derive()),

            // Sum rule: (u + v)' = u' + v'
            Expr::Add(u, v) => add_opt(u.derive(), v.derive()),

            // Subtraction rule: (u - v)' = u' - v'
            Expr::Sub(u, v) => sub_opt(u.derive(), v.derive()),

            // Product rule: (u * v)' = u' * v + u * v'
            Expr::Mul(u, v) => add_opt(
                mul_opt(u.derive(), (**v).clone()),
                mul_opt((**u).clone(), v.derive()),
            ),

            // Quotient rule: (u / v)' = (u' * v - u * v') / v^2
            Expr::Div(u, v) => {
                let u_prime = u.derive();
                if !v.contains_var() {
                    return div_opt(u_prime, (**v).clone());
                }
                let numerator = sub_opt(
                    mul_opt(u_prime, (**v).clone()),
                    mul_opt((**u).clone(), v.derive()),
                );
                div_opt(numerator, powi((**v).clone(), 2.0))
            }

            // u mod v = u - v * floor(u / v), floor' = 0 almost everywhere
            Expr::Rem(u, v) => {
                let v_prime = v.derive();
                let quotient = Expr::func("floor", Expr::div_expr((**u).clone(), (**v).clone()));
                sub_opt(u.derive(), mul_opt(quotient, v_prime))
            }

            Expr::Pow(u, v) => power_rule(u, v, &u.derive(), &v.derive()),

            // Chain rule through the registry
            Expr::FunctionCall { name, args } => match Registry::get(name) {
                Some(def) if def.validate_arity(args.len()) => {
                    let primes: Vec<Expr> = args.iter().map(Expr::derive).collect();
                    (def.derivative)(args, &primes)
                }
                // Trees are validated against the registry at parse time
                _ => Expr::number(0.0),
            },
        }
    }
}

/// Derivative of `u^v` given `u'` and `v'`
///
/// - constant exponent: `v * u^(v-1) * u'`
/// - constant base: `u^v * ln(u) * v'`
/// - general case (logarithmic differentiation):
///   `u^v * (v' * ln(u) + v * u' / u)`
pub(crate) fn power_rule(u: &Expr, v: &Expr, u_prime: &Expr, v_prime: &Expr) -> Expr {
    if !v.contains_var() {
        let reduced = match v.as_number() {
            Some(n) => Expr::number(n - 1.0),
            None => sub_opt(v.clone(), Expr::number(1.0)),
        };
        let power = if reduced.is_zero_num() {
            Expr::number(1.0)
        } else {
            match reduced.as_number() {
                Some(n) => powi(u.clone(), n),
                None => Expr::pow(u.clone(), reduced),
            }
        };
        return mul_opt(mul_opt(v.clone(), power), u_prime.clone());
    }

    let u_pow_v = Expr::pow(u.clone(), v.clone());

    if !u.contains_var() {
        let ln_u = match u {
            Expr::Constant(Constant::E) => Expr::number(1.0),
            _ => Expr::func("ln", u.clone()),
        };
        return mul_opt(mul_opt(u_pow_v, ln_u), v_prime.clone());
    }

    let inner = add_opt(
        mul_opt(v_prime.clone(), Expr::func("ln", u.clone())),
        div_opt(mul_opt(v.clone(), u_prime.clone()), u.clone()),
    );
    mul_opt(u_pow_v, inner)
}

#[cfg(test)]
mod tests {
    use crate::compile_expression;
    use crate::compiler::eval_expr;

    /// Compare the symbolic derivative against a centred difference
    fn check_derivative(text: &str, points: &[f64]) {
        let f = compile_expression(text).unwrap();
        let d = f.expr().derive();
        let h = 1e-6;
        for &x in points {
            let symbolic = eval_expr(&d, x).unwrap();
            let numeric = (f.call(x + h).unwrap() - f.call(x - h).unwrap()) / (2.0 * h);
            assert!(
                (symbolic - numeric).abs() < 1e-5 * (1.0 + numeric.abs()),
                "d/dx {} at {}: symbolic {} vs numeric {}",
                text,
                x,
                symbolic,
                numeric
            );
        }
    }

    #[test]
    fn test_polynomials() {
        check_derivative("3*x^4 - 2*x^2 + x - 7", &[-1.5, 0.3, 2.0]);
        check_derivative("(x + 1) / (x - 2)", &[0.0, 1.0, 5.0]);
    }

    #[test]
    fn test_trigonometric() {
        check_derivative("sin(x) * cos(2*x)", &[0.1, 1.0, 2.5]);
        check_derivative("tan(x) + sec(x) - csc(x) + cot(x)", &[0.4, 1.1]);
        check_derivative("asin(x/2) + acos(x/3) + atan(x)", &[-0.5, 0.7]);
        check_derivative("atan2(x, 2) + atan2(1, x)", &[0.5, 1.5]);
    }

    #[test]
    fn test_hyperbolic_and_logs() {
        check_derivative("sinh(x) + cosh(x) + tanh(x)", &[-1.0, 0.5]);
        check_derivative("asinh(x) + acosh(x + 2) + atanh(x / 2)", &[0.3, 1.2]);
        check_derivative("ln(x) + log(x, 3) + log10(x) + log2(x) + log1p(x)", &[0.5, 2.0]);
        check_derivative("log(2, x)", &[1.5, 3.0]);
        check_derivative("exp(x) + expm1(2*x)", &[0.0, 0.8]);
    }

    #[test]
    fn test_roots_and_powers() {
        check_derivative("sqrt(x) + cbrt(x)", &[0.5, 4.0]);
        check_derivative("x^x", &[0.5, 1.5]);
        check_derivative("2^x + e^x + pow(x, 3)", &[-1.0, 1.0]);
        check_derivative("hypot(x, 3) + abs(x) + fabs(x)", &[-2.0, 1.0]);
        check_derivative("degrees(x) + radians(x)", &[0.3]);
    }

    #[test]
    fn test_remainder_and_steps() {
        check_derivative("x % 3", &[1.3, 4.2]);
        check_derivative("floor(x) + ceil(x) + trunc(x) + x", &[0.5, 1.5]);
    }

    #[test]
    fn test_constant_derivative_is_zero() {
        let f = compile_expression("pi * e + 2").unwrap();
        assert!(f.expr().derive().is_zero_num());
    }
}
