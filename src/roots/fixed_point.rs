use super::{IterationDetail, IterationRecord, RootOptions, RootOutcome, closing_record};
use crate::NumericError;
use crate::numeric::relative_error;
use crate::traits::PointEvaluator;

/// Fixed-point iteration `x_{n+1} = g(x_n)`
///
/// Converges once `|x_{n+1} - x_n| < tol`; a closing record at the fixed point
/// is then appended with `x_next = g(root)` and zero errors. The run ends
/// without a root as soon as `g` is undefined at an iterate, including the
/// candidate fixed point itself.
///
/// # Errors
/// Only `InvalidParameter`, for a bad tolerance or starting point.
pub fn run_fixed_point<G: PointEvaluator + ?Sized>(
    g: &G,
    x0: f64,
    options: &RootOptions,
) -> Result<RootOutcome, NumericError> {
    options.validate(x0)?;

    let mut trace = Vec::new();
    let mut x = x0;

    for n in 0..options.max_iter {
        let Some(x_next) = g.evaluate(x) else {
            log::debug!("fixed point: g undefined at x = {} (step {})", x, n);
            return Ok(RootOutcome { root: None, trace });
        };
        let err_abs = (x_next - x).abs();
        trace.push(IterationRecord {
            n,
            x,
            detail: IterationDetail::FixedPoint { x_next },
            err_abs,
            err_rel: relative_error(err_abs, x_next),
        });
        log::trace!("fixed point[{}]: x = {}, g(x) = {}", n, x, x_next);

        if err_abs < options.tol {
            let Some(g_root) = g.evaluate(x_next) else {
                log::debug!("fixed point: g undefined at the converged point {}", x_next);
                return Ok(RootOutcome { root: None, trace });
            };
            trace.push(closing_record(
                n + 1,
                x_next,
                IterationDetail::FixedPoint { x_next: g_root },
            ));
            log::debug!("fixed point: converged to {} in {} step(s)", x_next, n + 1);
            return Ok(RootOutcome {
                root: Some(x_next),
                trace,
            });
        }
        x = x_next;
    }

    log::debug!("fixed point: no convergence within {} step(s)", options.max_iter);
    Ok(RootOutcome { root: None, trace })
}
