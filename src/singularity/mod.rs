//! Singularity analysis: where an expression's denominator vanishes and what
//! the expression tends to there
//!
//! ```
//! use num_anafis::{SingularityStatus, analyze_singularities, compile_expression};
//!
//! let f = compile_expression("sin(x)/x").unwrap();
//! let points = analyze_singularities(&f, -1.0, 1.0);
//! assert_eq!(points.status(), SingularityStatus::Removable);
//! assert_eq!(points.limit_at(0.0), Some(1.0));
//! ```

mod limit;
mod poly;
mod rational;
mod solve;

pub use limit::{MAX_LHOPITAL_ROUNDS, resolve_limit};

use crate::compiler::CompiledFunction;
use crate::simplification::Simplifier;
use crate::Expr;
use rustc_hash::FxHashMap;
use std::fmt;

/// A point where the denominator vanishes, with the limit there if finite
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SingularPoint {
    pub x: f64,
    pub limit: Option<f64>,
}

/// Outcome of a singularity analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SingularityStatus {
    /// No critical points in the interval
    None,
    /// At least one critical point has a finite limit
    Removable,
    /// Critical points exist but none has a finite limit
    NonRemovable,
}

impl SingularityStatus {
    pub fn message(&self) -> &'static str {
        match self {
            SingularityStatus::None => "No singularities found.",
            SingularityStatus::Removable => "L'Hôpital's rule applied at critical points.",
            SingularityStatus::NonRemovable => "Non-removable singularities present.",
        }
    }
}

impl fmt::Display for SingularityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Normalised lookup key: `-0.0` and `0.0` are the same point
#[inline]
fn key(x: f64) -> u64 {
    if x == 0.0 { 0u64 } else { x.to_bits() }
}

/// Critical points of an expression over one interval, ordered by `x`
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "Vec<SingularPoint>", into = "Vec<SingularPoint>")
)]
pub struct SingularPointSet {
    points: Vec<SingularPoint>,
    limits: FxHashMap<u64, f64>,
}

impl SingularPointSet {
    pub fn new(mut points: Vec<SingularPoint>) -> Self {
        points.retain(|p| p.x.is_finite());
        points.sort_by(|a, b| a.x.total_cmp(&b.x));
        let limits = points
            .iter()
            .filter_map(|p| p.limit.filter(|l| l.is_finite()).map(|l| (key(p.x), l)))
            .collect();
        Self { points, limits }
    }

    /// A set with no critical points
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from `(x, limit)` pairs of resolved points
    pub fn from_limits(pairs: impl IntoIterator<Item = (f64, f64)>) -> Self {
        Self::new(
            pairs
                .into_iter()
                .map(|(x, limit)| SingularPoint {
                    x,
                    limit: Some(limit),
                })
                .collect(),
        )
    }

    pub fn points(&self) -> &[SingularPoint] {
        &self.points
    }

    pub fn critical_points(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.x).collect()
    }

    /// Resolved `(x, limit)` pairs
    pub fn resolved(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points
            .iter()
            .filter_map(|p| p.limit.map(|l| (p.x, l)))
    }

    /// Stored limit when `x` is exactly a resolved critical point
    #[inline]
    pub fn limit_at(&self, x: f64) -> Option<f64> {
        if self.limits.is_empty() {
            return None;
        }
        self.limits.get(&key(x)).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn status(&self) -> SingularityStatus {
        if self.points.is_empty() {
            SingularityStatus::None
        } else if self.limits.is_empty() {
            SingularityStatus::NonRemovable
        } else {
            SingularityStatus::Removable
        }
    }

    pub fn message(&self) -> &'static str {
        self.status().message()
    }
}

impl From<Vec<SingularPoint>> for SingularPointSet {
    fn from(points: Vec<SingularPoint>) -> Self {
        SingularPointSet::new(points)
    }
}

impl From<SingularPointSet> for Vec<SingularPoint> {
    fn from(set: SingularPointSet) -> Self {
        set.points
    }
}

/// Points of `[min(a,b), max(a,b)]` where the denominator of `expr` vanishes
pub fn find_singularities(expr: &Expr, a: f64, b: f64) -> Vec<f64> {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let (_, denominator) = rational::rational_form(expr);
    let denominator = Simplifier::new().simplify(denominator);
    solve::solve_zeros(&denominator, lo, hi)
}

/// Find critical points of `f` in the interval and resolve the limit at each
///
/// Never fails: points without a finite limit are kept with `limit: None`
/// and left to the numeric fallback of the safe evaluator.
pub fn analyze_singularities(f: &CompiledFunction, a: f64, b: f64) -> SingularPointSet {
    let points: Vec<SingularPoint> = find_singularities(f.expr(), a, b)
        .into_iter()
        .map(|x| {
            let limit = resolve_limit(f.expr(), x);
            log::debug!("critical point of '{}' at x = {}: limit {:?}", f, x, limit);
            SingularPoint { x, limit }
        })
        .collect();

    let set = SingularPointSet::new(points);
    log::debug!("{} ({} critical point(s))", set.message(), set.len());
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile_expression;

    #[test]
    fn test_sinc() {
        let f = compile_expression("sin(x)/x").unwrap();
        let set = analyze_singularities(&f, -1.0, 1.0);
        assert_eq!(set.critical_points(), vec![0.0]);
        assert_eq!(set.limit_at(0.0), Some(1.0));
        assert_eq!(set.limit_at(-0.0), Some(1.0));
        assert_eq!(set.limit_at(0.5), None);
    }

    #[test]
    fn test_reversed_interval() {
        let f = compile_expression("(x^2 - 1)/(x - 1)").unwrap();
        let set = analyze_singularities(&f, 2.0, 0.0);
        assert_eq!(set.points(), &[SingularPoint { x: 1.0, limit: Some(2.0) }]);
    }

    #[test]
    fn test_non_removable() {
        let f = compile_expression("1/x").unwrap();
        let set = analyze_singularities(&f, -1.0, 1.0);
        assert_eq!(set.status(), SingularityStatus::NonRemovable);
        assert_eq!(set.points(), &[SingularPoint { x: 0.0, limit: None }]);
        assert_eq!(set.limit_at(0.0), None);
        assert_eq!(set.message(), "Non-removable singularities present.");
    }

    #[test]
    fn test_outside_interval() {
        let f = compile_expression("1/(x - 5)").unwrap();
        let set = analyze_singularities(&f, 0.0, 1.0);
        assert!(set.is_empty());
        assert_eq!(set.status(), SingularityStatus::None);
    }

    #[test]
    fn test_mixed_points_sorted() {
        // Removable at 0, pole at 1
        let f = compile_expression("sin(x)/(x*(x - 1))").unwrap();
        let set = analyze_singularities(&f, -2.0, 2.0);
        assert_eq!(set.critical_points(), vec![0.0, 1.0]);
        assert_eq!(set.status(), SingularityStatus::Removable);
        let resolved: Vec<_> = set.resolved().collect();
        assert_eq!(resolved.len(), 1);
        assert!((resolved[0].1 + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_tangent_poles() {
        let f = compile_expression("tan(x)").unwrap();
        let set = analyze_singularities(&f, 0.0, 3.0);
        assert_eq!(set.critical_points(), vec![std::f64::consts::FRAC_PI_2]);
        assert_eq!(set.status(), SingularityStatus::NonRemovable);
    }

    #[test]
    fn test_from_limits() {
        let set = SingularPointSet::from_limits([(2.0, 4.0), (-1.0, 0.5)]);
        assert_eq!(set.critical_points(), vec![-1.0, 2.0]);
        assert_eq!(set.limit_at(2.0), Some(4.0));
    }
}
