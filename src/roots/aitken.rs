use super::{IterationDetail, IterationRecord, RootOptions, RootOutcome};
use crate::NumericError;
use crate::numeric::relative_error;
use crate::traits::PointEvaluator;

/// Aitken's Δ² acceleration of the fixed-point map `g`
///
/// Each step computes `x1 = g(x)`, `x2 = g(x1)` and
/// `x_acc = x2 - (x2 - x1)² / (x2 - 2·x1 + x)`, falling back to `x2` when the
/// denominator is exactly zero. `x_acc` is the next iterate. Unlike the other
/// methods no closing record is appended. The run ends without a root when
/// `g` is undefined at `x` or `x1`, or at an accelerated iterate that would
/// otherwise be accepted.
///
/// # Errors
/// Only `InvalidParameter`, for a bad tolerance or starting point.
pub fn run_aitken<G: PointEvaluator + ?Sized>(
    g: &G,
    x0: f64,
    options: &RootOptions,
) -> Result<RootOutcome, NumericError> {
    options.validate(x0)?;

    let mut trace = Vec::new();
    let mut x = x0;

    for n in 0..options.max_iter {
        let Some((x1, x2)) = g.evaluate(x).and_then(|x1| Some((x1, g.evaluate(x1)?))) else {
            log::debug!("aitken: g undefined near x = {} (step {})", x, n);
            return Ok(RootOutcome { root: None, trace });
        };
        let denominator = x2 - 2.0 * x1 + x;
        let x_acc = if denominator != 0.0 {
            x2 - (x2 - x1).powi(2) / denominator
        } else {
            x2
        };

        let err_abs = (x_acc - x).abs();
        trace.push(IterationRecord {
            n,
            x,
            detail: IterationDetail::Aitken { x1, x2, x_acc },
            err_abs,
            err_rel: relative_error(err_abs, x_acc),
        });
        log::trace!("aitken[{}]: x = {}, x1 = {}, x2 = {}, acc = {}", n, x, x1, x2, x_acc);

        if err_abs < options.tol {
            if g.evaluate(x_acc).is_none() {
                log::debug!("aitken: g undefined at the converged point {}", x_acc);
                return Ok(RootOutcome { root: None, trace });
            }
            log::debug!("aitken: converged to {} in {} step(s)", x_acc, n + 1);
            return Ok(RootOutcome {
                root: Some(x_acc),
                trace,
            });
        }
        if !x_acc.is_finite() {
            log::debug!("aitken: iterate diverged at step {}", n);
            return Ok(RootOutcome { root: None, trace });
        }
        x = x_acc;
    }

    log::debug!("aitken: no convergence within {} step(s)", options.max_iter);
    Ok(RootOutcome { root: None, trace })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile_expression;
    use crate::roots::run_fixed_point;

    #[test]
    fn test_accelerates_fixed_point() {
        let g = compile_expression("cos(x)").unwrap();
        let options = RootOptions::default().max_iter(200);
        let plain = run_fixed_point(&g, 1.0, &options).unwrap();
        let fast = run_aitken(&g, 1.0, &options).unwrap();

        let root = fast.root.unwrap();
        assert!((root - plain.root.unwrap()).abs() < 1e-7);
        assert!(fast.trace.len() < plain.trace.len());
        // No closing record: the last entry is the converging step
        assert_eq!(fast.trace.last().unwrap().next_iterate(), root);
    }

    #[test]
    fn test_step_columns() {
        let g = compile_expression("x/2 + 1").unwrap();
        let outcome = run_aitken(&g, 0.0, &RootOptions::default()).unwrap();
        // Linear maps are solved exactly in one accelerated step
        assert_eq!(
            outcome.trace[0].detail,
            IterationDetail::Aitken {
                x1: 1.0,
                x2: 1.5,
                x_acc: 2.0
            }
        );
        assert_eq!(outcome.root, Some(2.0));
        assert_eq!(outcome.trace.len(), 2);
    }

    #[test]
    fn test_undefined_map_has_no_root() {
        let g = compile_expression("sqrt(x - 5)").unwrap();
        let outcome = run_aitken(&g, 3.0, &RootOptions::default()).unwrap();
        assert_eq!(outcome.root, None);
        assert!(outcome.trace.is_empty());
    }

    #[test]
    fn test_babylonian_map_needs_fewer_steps() {
        let g = compile_expression("(x + 2/x)/2").unwrap();
        let options = RootOptions::default();
        let plain = run_fixed_point(&g, 1.0, &options).unwrap();
        let fast = run_aitken(&g, 1.0, &options).unwrap();
        assert!((fast.root.unwrap() - 2f64.sqrt()).abs() < 1e-12);
        assert!(fast.trace.len() < plain.trace.len());
    }

    #[test]
    fn test_zero_denominator_keeps_x2() {
        // g(x) = x + 1: second difference is zero
        let g = compile_expression("x + 1").unwrap();
        let options = RootOptions::default().max_iter(3);
        let outcome = run_aitken(&g, 0.0, &options).unwrap();
        assert!(!outcome.converged());
        assert_eq!(outcome.iterates(), vec![0.0, 2.0, 4.0]);
    }
}
