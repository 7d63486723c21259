use super::rational::rational_form;
use crate::compiler::eval_expr;
use crate::simplification::Simplifier;
use crate::traits::is_zero;
use crate::Expr;

/// Maximum number of L'Hôpital differentiation rounds
pub const MAX_LHOPITAL_ROUNDS: usize = 8;

/// Limit of `expr` as `x → x0`
///
/// When the denominator of the rational form does not vanish at `x0` the
/// value is found by direct substitution. Otherwise numerator and denominator
/// are differentiated symbolically (simplifying after each round) until the
/// quotient is no longer `0/0`.
///
/// Returns `None` when the limit is infinite (`c/0`), when numerator or
/// denominator cannot be evaluated at `x0`, or when the rounds run out.
///
/// # Example
/// ```
/// use num_anafis::{compile_expression, resolve_limit};
///
/// let f = compile_expression("(1 - cos(x)) / x^2").unwrap();
/// let limit = resolve_limit(f.expr(), 0.0).unwrap();
/// assert!((limit - 0.5).abs() < 1e-12);
/// ```
pub fn resolve_limit(expr: &Expr, x0: f64) -> Option<f64> {
    if !x0.is_finite() {
        return None;
    }

    let simplifier = Simplifier::new();
    let (numerator, denominator) = rational_form(expr);
    let mut num = simplifier.simplify(numerator);
    let mut den = simplifier.simplify(denominator);

    // Direct substitution when x0 is not a zero of the denominator
    if let Ok(d) = eval_expr(&den, x0)
        && !is_zero(d)
    {
        if let Ok(v) = eval_expr(expr, x0) {
            return Some(v);
        }
        let n = eval_expr(&num, x0).ok()?;
        let v = n / d;
        return v.is_finite().then_some(v);
    }

    for round in 0..=MAX_LHOPITAL_ROUNDS {
        let n = eval_expr(&num, x0).ok()?;
        let d = eval_expr(&den, x0).ok()?;

        if !is_zero(d) {
            let v = n / d;
            log::trace!("limit at {} resolved after {} L'Hôpital round(s)", x0, round);
            return v.is_finite().then_some(v);
        }
        if !is_zero(n) {
            // c/0: the limit is infinite or does not exist
            return None;
        }
        if round == MAX_LHOPITAL_ROUNDS {
            break;
        }

        num = simplifier.simplify(num.derive());
        den = simplifier.simplify(den.derive());
        log::trace!("L'Hôpital round {}: ({}) / ({})", round + 1, num, den);
    }

    log::debug!("limit at {} undetermined after {} rounds", x0, MAX_LHOPITAL_ROUNDS);
    None
}
