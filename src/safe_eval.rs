//! Point evaluation that never fails
//!
//! A [`SafeEvaluator`] pairs a compiled function with the critical points
//! found on an interval. Resolution order for a point `x`:
//!
//! 1. the stored limit when `x` is a resolved critical point,
//! 2. the compiled function itself,
//! 3. a numeric limit estimate from symmetric averages around `x`,
//! 4. undefined.
//!
//! ```
//! use num_anafis::{EvalSource, PointEvaluator, build_safe_evaluator, compile_expression};
//!
//! let f = compile_expression("sin(x)/x").unwrap();
//! let safe = build_safe_evaluator(f, -1.0, 1.0);
//! assert_eq!(safe.evaluate(0.0), Some(1.0));
//! assert_eq!(safe.evaluate_detailed(0.0).source, EvalSource::Singularity);
//! ```

use crate::compiler::CompiledFunction;
use crate::numeric::median;
use crate::singularity::{SingularPointSet, analyze_singularities};
use crate::traits::PointEvaluator;
use std::fmt;

/// Offsets for the symmetric limit estimate, largest first
pub const LIMIT_OFFSETS: [f64; 7] = [1e-4, 1e-5, 1e-6, 5e-7, 1e-7, 5e-8, 1e-8];

/// Where an evaluated value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EvalSource {
    /// The compiled function, evaluated as is
    Direct,
    /// A limit stored for a critical point
    Singularity,
    /// Median of symmetric averages around the point
    LimitEstimate,
    /// Nothing worked; the value is `0.0`
    Fallback,
}

impl fmt::Display for EvalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EvalSource::Direct => "direct",
            EvalSource::Singularity => "singularity",
            EvalSource::LimitEstimate => "limit estimate",
            EvalSource::Fallback => "fallback",
        };
        f.write_str(name)
    }
}

/// A value together with how it was obtained
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Evaluation {
    pub value: f64,
    pub source: EvalSource,
}

impl Evaluation {
    /// False when the value is the `0.0` stand-in for an undefined point
    #[inline]
    pub fn is_defined(&self) -> bool {
        self.source != EvalSource::Fallback
    }
}

/// Robust evaluator over a compiled function and its critical points
#[derive(Debug, Clone)]
pub struct SafeEvaluator {
    function: CompiledFunction,
    points: SingularPointSet,
}

impl SafeEvaluator {
    pub fn new(function: CompiledFunction, points: SingularPointSet) -> Self {
        Self { function, points }
    }

    /// Evaluator with no known critical points
    pub fn without_singularities(function: CompiledFunction) -> Self {
        Self::new(function, SingularPointSet::empty())
    }

    pub fn function(&self) -> &CompiledFunction {
        &self.function
    }

    pub fn singular_points(&self) -> &SingularPointSet {
        &self.points
    }

    /// Resolve `x`, reporting the source of the value
    ///
    /// Undefined points come back as `0.0` tagged [`EvalSource::Fallback`].
    pub fn evaluate_detailed(&self, x: f64) -> Evaluation {
        match self.resolve(x) {
            Some((value, source)) => Evaluation { value, source },
            None => Evaluation {
                value: 0.0,
                source: EvalSource::Fallback,
            },
        }
    }

    fn resolve(&self, x: f64) -> Option<(f64, EvalSource)> {
        if let Some(limit) = self.points.limit_at(x) {
            return Some((limit, EvalSource::Singularity));
        }
        if let Ok(y) = self.function.call(x) {
            return Some((y, EvalSource::Direct));
        }
        self.limit_estimate(x)
            .map(|y| (y, EvalSource::LimitEstimate))
    }

    /// Median of `(f(x+h) + f(x-h)) / 2` over the offsets where both sides
    /// are defined
    fn limit_estimate(&self, x: f64) -> Option<f64> {
        if !x.is_finite() {
            return None;
        }
        let mut averages: Vec<f64> = LIMIT_OFFSETS
            .iter()
            .filter_map(|&h| {
                let right = self.function.call(x + h).ok()?;
                let left = self.function.call(x - h).ok()?;
                let avg = 0.5 * (right + left);
                avg.is_finite().then_some(avg)
            })
            .collect();

        let estimate = median(&mut averages);
        log::trace!(
            "limit estimate for '{}' at {}: {:?} from {} offset(s)",
            self.function,
            x,
            estimate,
            averages.len()
        );
        estimate
    }
}

impl PointEvaluator for SafeEvaluator {
    fn evaluate(&self, x: f64) -> Option<f64> {
        self.resolve(x).map(|(y, _)| y)
    }

    fn value(&self, x: f64) -> f64 {
        match self.resolve(x) {
            Some((y, _)) => y,
            None => {
                log::debug!("'{}' undefined at {}; using 0.0", self.function, x);
                0.0
            }
        }
    }
}

/// Analyse `[a, b]` for critical points and wrap `function` with the result
pub fn build_safe_evaluator(function: CompiledFunction, a: f64, b: f64) -> SafeEvaluator {
    let points = analyze_singularities(&function, a, b);
    SafeEvaluator::new(function, points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile_expression;

    fn safe(text: &str, a: f64, b: f64) -> SafeEvaluator {
        build_safe_evaluator(compile_expression(text).unwrap(), a, b)
    }

    #[test]
    fn test_stored_limit_wins() {
        let f = safe("(x^2 - 1)/(x - 1)", 0.0, 2.0);
        let e = f.evaluate_detailed(1.0);
        assert_eq!(e.source, EvalSource::Singularity);
        assert!((e.value - 2.0).abs() < 1e-12);
        assert_eq!(f.evaluate_detailed(0.5).source, EvalSource::Direct);
    }

    #[test]
    fn test_limit_estimate_without_analysis() {
        let f = SafeEvaluator::without_singularities(compile_expression("sin(x)/x").unwrap());
        let e = f.evaluate_detailed(0.0);
        assert_eq!(e.source, EvalSource::LimitEstimate);
        assert!((e.value - 1.0).abs() < 1e-8);
    }

    #[test]
    fn test_pole_estimate_is_finite() {
        // Symmetric averages cancel across an odd pole
        let f = safe("1/x", -1.0, 1.0);
        let y = f.evaluate(0.0).unwrap();
        assert!(y.is_finite());
        assert!(y.abs() < 1e-3);
    }

    #[test]
    fn test_undefined_falls_back() {
        let f = safe("sqrt(x)", -2.0, -1.0);
        assert_eq!(f.evaluate(-1.5), None);
        assert_eq!(f.value(-1.5), 0.0);
        let e = f.evaluate_detailed(-1.5);
        assert_eq!(e.source, EvalSource::Fallback);
        assert!(!e.is_defined());
    }

    #[test]
    fn test_non_finite_input() {
        let f = safe("x + 1", 0.0, 1.0);
        assert_eq!(f.evaluate(f64::NAN), None);
        assert_eq!(f.evaluate(f64::INFINITY), None);
    }
}
