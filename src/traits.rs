/// Default tolerance for floating-point comparisons
pub(crate) const FLOAT_TOLERANCE: f64 = 1e-10;

/// A real function of one variable that may be undefined at some points.
///
/// This is the seam between the evaluation layer and the algorithms: root
/// finders, quadrature rules and the curve sampler only ever see this trait.
pub trait PointEvaluator {
    /// Value at `x`, or `None` where the function is undefined.
    ///
    /// Implementations must never return NaN or an infinity.
    fn evaluate(&self, x: f64) -> Option<f64>;

    /// Value at `x`, mapping undefined points to `0.0`.
    ///
    /// This is the robustness-first variant consumed by the algorithms.
    #[inline]
    fn value(&self, x: f64) -> f64 {
        self.evaluate(x).unwrap_or(0.0)
    }
}

impl<T: PointEvaluator + ?Sized> PointEvaluator for &T {
    #[inline]
    fn evaluate(&self, x: f64) -> Option<f64> {
        (**self).evaluate(x)
    }
}

// ===== Float tolerance helpers =====

/// Check if a float is approximately zero (within tolerance)
#[inline]
pub(crate) fn is_zero(n: f64) -> bool {
    n.abs() < FLOAT_TOLERANCE
}

/// Check if a float is approximately one (within tolerance)
#[inline]
pub(crate) fn is_one(n: f64) -> bool {
    (n - 1.0).abs() < FLOAT_TOLERANCE
}
