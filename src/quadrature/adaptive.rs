use super::{CountingEvaluator, QuadratureMethod, QuadratureNode, QuadratureResult, check_interval};
use crate::NumericError;
use crate::traits::PointEvaluator;

/// Default tolerance of the adaptive rule
pub const DEFAULT_ADAPTIVE_TOLERANCE: f64 = 1e-6;

/// Default limit on bisection depth
pub const DEFAULT_MAX_REFINEMENT_DEPTH: usize = 50;

/// Default limit on integrand evaluations
pub const DEFAULT_MAX_EVALS: usize = 200_000;

/// Settings for [`run_adaptive`]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdaptiveOptions {
    pub tol: f64,
    pub max_depth: usize,
    pub max_evals: usize,
}

impl Default for AdaptiveOptions {
    fn default() -> Self {
        Self {
            tol: DEFAULT_ADAPTIVE_TOLERANCE,
            max_depth: DEFAULT_MAX_REFINEMENT_DEPTH,
            max_evals: DEFAULT_MAX_EVALS,
        }
    }
}

impl AdaptiveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn max_evals(mut self, evals: usize) -> Self {
        self.max_evals = evals;
        self
    }
}

/// Simpson estimate over one panel
#[inline]
fn panel(a: f64, b: f64, fa: f64, fm: f64, fb: f64) -> f64 {
    (b - a) * (fa + 4.0 * fm + fb) / 6.0
}

struct Refinement<'a, F: ?Sized> {
    eval: CountingEvaluator<'a, F>,
    max_depth: usize,
    max_evals: usize,
    panels: usize,
    exhausted: bool,
}

impl<F: PointEvaluator + ?Sized> Refinement<'_, F> {
    /// Returns the refined value of `[a, b]` and its error estimate
    ///
    /// `reserved` counts evaluations still owed to pending sibling branches.
    fn refine(
        &mut self,
        (a, b): (f64, f64),
        (fa, fm, fb): (f64, f64, f64),
        whole: f64,
        tol: f64,
        depth: usize,
        reserved: usize,
    ) -> (f64, f64) {
        let c = 0.5 * (a + b);
        let fd = self.eval.at(0.5 * (a + c));
        let fe = self.eval.at(0.5 * (c + b));

        let left = panel(a, c, fa, fd, fm);
        let right = panel(c, b, fm, fe, fb);
        let delta = left + right - whole;

        if delta.abs() <= 15.0 * tol {
            self.panels += 2;
            let err = delta / 15.0;
            return (left + right + err, err);
        }

        // Both children need two evaluations each
        if depth >= self.max_depth || self.eval.evals + reserved + 4 > self.max_evals {
            if !self.exhausted {
                log::warn!(
                    "adaptive simpson: budget exhausted at depth {} after {} evaluation(s)",
                    depth,
                    self.eval.evals
                );
            }
            self.exhausted = true;
            self.panels += 2;
            let err = delta / 15.0;
            return (left + right + err, err);
        }

        let (left_value, left_err) =
            self.refine((a, c), (fa, fd, fm), left, tol / 2.0, depth + 1, reserved + 2);
        let (right_value, right_err) =
            self.refine((c, b), (fm, fe, fb), right, tol / 2.0, depth + 1, reserved);
        (
            left_value + right_value,
            left_err.abs().max(right_err.abs()),
        )
    }
}

/// Adaptive recursive Simpson
///
/// The whole interval is estimated with one Simpson panel and bisected until
/// each branch satisfies `|S_left + S_right - S| ≤ 15·tol`, halving `tol` at
/// every level. A branch that hits `max_depth` or would exceed `max_evals`
/// keeps its refined estimate and the result is flagged with
/// `tolerance_met = false`.
///
/// The node table holds the base panel `(a, (a+b)/2, b)` with coefficients
/// `1, 4, 1` and scale `(b - a)/6`.
///
/// # Errors
/// `DegenerateInterval` for `a == b`; `InvalidParameter` for non-finite
/// bounds, a non-positive tolerance, or fewer than 5 allowed evaluations.
///
/// # Example
/// ```
/// use num_anafis::{AdaptiveOptions, compile_expression, run_adaptive};
///
/// let f = compile_expression("sin(x)").unwrap();
/// let result = run_adaptive(&f, 0.0, std::f64::consts::PI, &AdaptiveOptions::default()).unwrap();
/// assert!((result.value - 2.0).abs() < 1e-6);
/// assert!(result.tolerance_met);
/// ```
pub fn run_adaptive<F: PointEvaluator + ?Sized>(
    f: &F,
    a: f64,
    b: f64,
    options: &AdaptiveOptions,
) -> Result<QuadratureResult, NumericError> {
    check_interval(a, b)?;
    if !(options.tol.is_finite() && options.tol > 0.0) {
        return Err(NumericError::invalid_parameter(
            "tol",
            format!("tolerance must be finite and positive, got {}", options.tol),
        ));
    }
    if options.max_evals < 5 {
        return Err(NumericError::invalid_parameter(
            "max_evals",
            format!("at least 5 evaluations are needed, got {}", options.max_evals),
        ));
    }

    let mut eval = CountingEvaluator::new(f);
    let m = 0.5 * (a + b);
    let (fa, fm, fb) = (eval.at(a), eval.at(m), eval.at(b));
    let whole = panel(a, b, fa, fm, fb);

    let mut refinement = Refinement {
        eval,
        max_depth: options.max_depth,
        max_evals: options.max_evals,
        panels: 0,
        exhausted: false,
    };
    let (value, err) = refinement.refine((a, b), (fa, fm, fb), whole, options.tol, 0, 0);
    let error_estimate = err.abs();

    let factor = (b - a) / 6.0;
    let nodes = [(a, fa, 1.0), (m, fm, 4.0), (b, fb, 1.0)]
        .into_iter()
        .enumerate()
        .map(|(index, (x, fx, coefficient))| QuadratureNode {
            index,
            x,
            fx,
            coefficient,
            contribution: fx * coefficient * factor,
        })
        .collect();

    let Refinement {
        eval,
        panels,
        exhausted,
        ..
    } = refinement;
    log::debug!(
        "adaptive simpson: value = {}, error ≈ {:e}, {} evaluation(s), {} panel(s)",
        value,
        error_estimate,
        eval.evals,
        panels
    );

    Ok(QuadratureResult {
        method: QuadratureMethod::Adaptive,
        value,
        h: None,
        n: panels,
        evals: eval.evals,
        error_estimate: Some(error_estimate),
        nodes,
        tolerance_met: !exhausted,
        undefined_points: eval.undefined,
    })
}
