use super::{IterationDetail, IterationRecord, RootOptions, RootOutcome, closing_record};
use crate::NumericError;
use crate::numeric::{DERIVATIVE_STEP, central_difference, relative_error};
use crate::traits::PointEvaluator;

/// Below this `|f'(x)|` a Newton step is not attempted
pub const DERIVATIVE_TOLERANCE: f64 = 1e-14;

/// Newton-Raphson iteration `x_{n+1} = x_n - f(x_n) / f'(x_n)`
///
/// The derivative comes from `df` when given, otherwise from a centred
/// difference with step `1e-6`. On convergence a closing record at the root
/// (zero errors) is appended to the trace. An iterate where `f` or its
/// derivative is undefined ends the run without a root.
///
/// # Errors
/// `InvalidParameter` for a bad tolerance or starting point, and
/// `DerivativeNearZero` (carrying the trace so far) when `|f'(x_n)| < 1e-14`.
///
/// # Example
/// ```
/// use num_anafis::{RootOptions, compile_expression, run_newton};
///
/// let f = compile_expression("x^2 - 2").unwrap();
/// let outcome = run_newton(&f, None, 1.0, &RootOptions::default()).unwrap();
/// assert!((outcome.root.unwrap() - 2f64.sqrt()).abs() < 1e-12);
/// ```
pub fn run_newton<F: PointEvaluator + ?Sized>(
    f: &F,
    df: Option<&dyn PointEvaluator>,
    x0: f64,
    options: &RootOptions,
) -> Result<RootOutcome, NumericError> {
    options.validate(x0)?;

    let derivative = |x: f64| match df {
        Some(df) => df.evaluate(x),
        None => central_difference(f, x, DERIVATIVE_STEP),
    };

    let mut trace = Vec::new();
    let mut x = x0;

    for n in 0..options.max_iter {
        let (Some(fx), Some(dfx)) = (f.evaluate(x), derivative(x)) else {
            log::debug!("newton: f or f' undefined at x = {} (step {})", x, n);
            return Ok(RootOutcome { root: None, trace });
        };
        if dfx.abs() < DERIVATIVE_TOLERANCE {
            log::debug!("newton: derivative {:e} at x = {} after {} step(s)", dfx, x, n);
            return Err(NumericError::DerivativeNearZero {
                x,
                derivative: dfx,
                trace,
            });
        }

        let x_next = x - fx / dfx;
        let err_abs = (x_next - x).abs();
        trace.push(IterationRecord {
            n,
            x,
            detail: IterationDetail::Newton { fx, dfx, x_next },
            err_abs,
            err_rel: relative_error(err_abs, x_next),
        });
        log::trace!("newton[{}]: x = {}, f = {}, f' = {}, next = {}", n, x, fx, dfx, x_next);

        if !x_next.is_finite() {
            log::debug!("newton: iterate diverged at step {}", n);
            return Ok(RootOutcome { root: None, trace });
        }

        if err_abs < options.tol {
            let Some(fr) = f.evaluate(x_next) else {
                log::debug!("newton: f undefined at the converged point {}", x_next);
                return Ok(RootOutcome { root: None, trace });
            };
            let (dfr, step) = match derivative(x_next) {
                Some(d) if d != 0.0 => (d, x_next - fr / d),
                _ => (0.0, x_next),
            };
            trace.push(closing_record(
                n + 1,
                x_next,
                IterationDetail::Newton {
                    fx: fr,
                    dfx: dfr,
                    x_next: step,
                },
            ));
            log::debug!("newton: converged to {} in {} step(s)", x_next, n + 1);
            return Ok(RootOutcome {
                root: Some(x_next),
                trace,
            });
        }
        x = x_next;
    }

    log::debug!("newton: no convergence within {} step(s)", options.max_iter);
    Ok(RootOutcome { root: None, trace })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile_expression;

    #[test]
    fn test_sqrt_two() {
        let f = compile_expression("x^2 - 2").unwrap();
        let options = RootOptions::default();
        let outcome = run_newton(&f, None, 1.0, &options).unwrap();
        let root = outcome.root.unwrap();
        assert!((root - 2f64.sqrt()).abs() < 1e-12);
        assert!(outcome.trace.len() < 10);

        let last = outcome.trace.last().unwrap();
        assert_eq!(last.x, root);
        assert_eq!((last.err_abs, last.err_rel), (0.0, 0.0));
        // The record before the closing one met the tolerance
        let before = &outcome.trace[outcome.trace.len() - 2];
        assert!(before.err_abs < options.tol);
    }

    #[test]
    fn test_explicit_derivative() {
        let f = compile_expression("x^3 - x - 2").unwrap();
        let df = compile_expression("3*x^2 - 1").unwrap();
        let outcome = run_newton(&f, Some(&df), 1.5, &RootOptions::default()).unwrap();
        let root = outcome.root.unwrap();
        assert!((root.powi(3) - root - 2.0).abs() < 1e-10);
        assert_eq!(outcome.trace[0].n, 0);
        assert_eq!(outcome.trace[0].x, 1.5);
        match outcome.trace[0].detail {
            IterationDetail::Newton { fx, dfx, .. } => {
                assert!((fx + 0.125).abs() < 1e-12);
                assert!((dfx - 5.75).abs() < 1e-12);
            }
            other => panic!("unexpected detail {:?}", other),
        }
    }

    #[test]
    fn test_zero_derivative_is_fatal() {
        let f = compile_expression("x^2 - 1").unwrap();
        let df = compile_expression("2*x").unwrap();
        let err = run_newton(&f, Some(&df), 0.0, &RootOptions::default()).unwrap_err();
        match err {
            NumericError::DerivativeNearZero { x, trace, .. } => {
                assert_eq!(x, 0.0);
                assert!(trace.is_empty());
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_no_real_root() {
        let f = compile_expression("x^2 + 1").unwrap();
        let options = RootOptions::default().max_iter(30);
        match run_newton(&f, None, 0.5, &options) {
            Ok(outcome) => {
                assert_eq!(outcome.root, None);
                assert!(outcome.trace.len() <= 30);
            }
            Err(err) => assert!(matches!(err, NumericError::DerivativeNearZero { .. })),
        }
    }

    #[test]
    fn test_step_out_of_domain_stops_without_root() {
        // The first step from 3 lands at 3 - 3 ln 3 < 0, outside the domain of log
        let f = compile_expression("log(x)").unwrap();
        let df = compile_expression("1/x").unwrap();
        let outcome = run_newton(&f, Some(&df), 3.0, &RootOptions::default()).unwrap();
        assert_eq!(outcome.root, None);
        assert_eq!(outcome.trace.len(), 1);
        assert!(outcome.trace[0].next_iterate() < 0.0);

        let numeric = run_newton(&f, None, 3.0, &RootOptions::default()).unwrap();
        assert_eq!(numeric.root, None);
    }

    #[test]
    fn test_undefined_start_stops_at_once() {
        let f = compile_expression("sqrt(x) - 1").unwrap();
        let outcome = run_newton(&f, None, -4.0, &RootOptions::default()).unwrap();
        assert_eq!(outcome.root, None);
        assert!(outcome.trace.is_empty());
    }

    #[test]
    fn test_invalid_parameters() {
        let f = compile_expression("x").unwrap();
        let bad_tol = RootOptions::default().tol(0.0);
        assert!(run_newton(&f, None, 1.0, &bad_tol).is_err());
        assert!(run_newton(&f, None, f64::INFINITY, &RootOptions::default()).is_err());
    }
}
