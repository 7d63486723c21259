//! Dense sampling of a function for plotting

use crate::numeric::linspace;
use crate::traits::PointEvaluator;

/// Default number of points per curve
pub const DEFAULT_CURVE_POINTS: usize = 401;

/// One sample of a curve; `y` is `None` where the function is undefined
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CurvePoint {
    pub x: f64,
    pub y: Option<f64>,
}

fn abscissae(a: f64, b: f64, count: usize) -> Vec<f64> {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    linspace(lo, hi, count)
}

/// Sample `f` at `count` evenly spaced points over `[min(a,b), max(a,b)]`
///
/// `count` below 2 is raised to 2. Undefined points are kept with `y: None`
/// rather than replaced by a stand-in value.
///
/// # Example
/// ```
/// use num_anafis::{compile_expression, sample_curve};
///
/// let f = compile_expression("sqrt(x)").unwrap();
/// let curve = sample_curve(&f, 1.0, -1.0, 3);
/// assert_eq!(curve[0].x, -1.0);
/// assert_eq!(curve[0].y, None);
/// assert_eq!(curve[2].y, Some(1.0));
/// ```
pub fn sample_curve<F: PointEvaluator + ?Sized>(
    f: &F,
    a: f64,
    b: f64,
    count: usize,
) -> Vec<CurvePoint> {
    abscissae(a, b, count)
        .into_iter()
        .map(|x| CurvePoint { x, y: f.evaluate(x) })
        .collect()
}

/// [`sample_curve`] with the evaluations spread over the rayon pool
///
/// Output is identical to the sequential version.
#[cfg(feature = "parallel")]
pub fn sample_curve_parallel<F: PointEvaluator + Sync + ?Sized>(
    f: &F,
    a: f64,
    b: f64,
    count: usize,
) -> Vec<CurvePoint> {
    use rayon::prelude::*;

    abscissae(a, b, count)
        .into_par_iter()
        .map(|x| CurvePoint { x, y: f.evaluate(x) })
        .collect()
}
