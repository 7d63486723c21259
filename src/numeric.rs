//! Small numeric helpers shared by the algorithms

use crate::traits::PointEvaluator;

/// Step used for centred-difference derivatives
pub const DERIVATIVE_STEP: f64 = 1e-6;

/// `count` evenly spaced points from `a` to `b`, the last one exactly `b`
///
/// `count` below 2 is treated as 2.
pub fn linspace(a: f64, b: f64, count: usize) -> Vec<f64> {
    let count = count.max(2);
    let step = (b - a) / (count - 1) as f64;
    (0..count)
        .map(|i| if i == count - 1 { b } else { a + i as f64 * step })
        .collect()
}

/// `|delta| / |x_next|`, or `+∞` when `x_next` is zero
#[inline]
pub fn relative_error(delta: f64, x_next: f64) -> f64 {
    if x_next == 0.0 {
        f64::INFINITY
    } else {
        delta.abs() / x_next.abs()
    }
}

/// `(f(x+h) - f(x-h)) / 2h`, or `None` when `f` is undefined on either side
pub fn central_difference<F: PointEvaluator + ?Sized>(f: &F, x: f64, h: f64) -> Option<f64> {
    let right = f.evaluate(x + h)?;
    let left = f.evaluate(x - h)?;
    let d = (right - left) / (2.0 * h);
    d.is_finite().then_some(d)
}

/// Median of the values; mean of the two middle ones for an even count
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    Some(if values.len() % 2 == 0 {
        0.5 * values[mid - 1] + 0.5 * values[mid]
    } else {
        values[mid]
    })
}
