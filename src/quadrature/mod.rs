//! Numerical integration over `[a, b]`
//!
//! Five fixed composite rules plus adaptive recursive Simpson. Every rule
//! returns the full node table (abscissa, value, coefficient, weighted
//! contribution) so results can be displayed step by step.
//!
//! ```
//! use num_anafis::{compile_expression, run_simpson_13};
//!
//! let f = compile_expression("x^2").unwrap();
//! let result = run_simpson_13(&f, 0.0, 3.0, 5).unwrap();
//! assert_eq!(result.n, 6);
//! assert!((result.value - 9.0).abs() < 1e-12);
//! ```

mod adaptive;
mod composite;

pub use adaptive::{
    AdaptiveOptions, DEFAULT_ADAPTIVE_TOLERANCE, DEFAULT_MAX_EVALS, DEFAULT_MAX_REFINEMENT_DEPTH,
    run_adaptive,
};
pub use composite::{run_boole, run_rectangle, run_simpson_13, run_simpson_38, run_trapezoidal};

use crate::NumericError;
use crate::traits::PointEvaluator;
use std::fmt;
use std::str::FromStr;

/// Largest subdivision count the composite rules accept
pub const MAX_SUBDIVISIONS: usize = 1_000_000;

/// Supported integration rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum QuadratureMethod {
    /// Composite midpoint rule
    Rectangle,
    Trapezoidal,
    #[cfg_attr(feature = "serde", serde(rename = "simpson_13"))]
    Simpson13,
    #[cfg_attr(feature = "serde", serde(rename = "simpson_38"))]
    Simpson38,
    Boole,
    /// Recursive Simpson with local error control
    Adaptive,
}

impl QuadratureMethod {
    pub const ALL: [QuadratureMethod; 6] = [
        QuadratureMethod::Rectangle,
        QuadratureMethod::Trapezoidal,
        QuadratureMethod::Simpson13,
        QuadratureMethod::Simpson38,
        QuadratureMethod::Boole,
        QuadratureMethod::Adaptive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuadratureMethod::Rectangle => "rectangle",
            QuadratureMethod::Trapezoidal => "trapezoidal",
            QuadratureMethod::Simpson13 => "simpson_13",
            QuadratureMethod::Simpson38 => "simpson_38",
            QuadratureMethod::Boole => "boole",
            QuadratureMethod::Adaptive => "adaptive",
        }
    }

    /// Subdivision count actually used for a requested `n`
    ///
    /// Raised to the rule's minimum, then rounded up to the multiple the rule
    /// needs. The adaptive rule chooses its own panels and returns `n` as is.
    pub fn adjust_subdivisions(&self, n: usize) -> usize {
        let round_up = |n: usize, min: usize, multiple: usize| {
            let n = n.max(min);
            n.checked_next_multiple_of(multiple)
                .unwrap_or(n - n % multiple)
        };
        match self {
            QuadratureMethod::Rectangle | QuadratureMethod::Trapezoidal => n.max(1),
            QuadratureMethod::Simpson13 => round_up(n, 2, 2),
            QuadratureMethod::Simpson38 => round_up(n, 3, 3),
            QuadratureMethod::Boole => round_up(n, 4, 4),
            QuadratureMethod::Adaptive => n,
        }
    }
}

impl fmt::Display for QuadratureMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuadratureMethod {
    type Err = NumericError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rectangle" | "rectangulo" | "midpoint" => Ok(QuadratureMethod::Rectangle),
            "trapezoidal" | "trapezoid" => Ok(QuadratureMethod::Trapezoidal),
            "simpson_13" | "simpson13" => Ok(QuadratureMethod::Simpson13),
            "simpson_38" | "simpson38" => Ok(QuadratureMethod::Simpson38),
            "boole" => Ok(QuadratureMethod::Boole),
            "adaptive" | "adaptativo" => Ok(QuadratureMethod::Adaptive),
            _ => Err(NumericError::UnknownMethod {
                name: s.to_string(),
            }),
        }
    }
}

/// One row of a quadrature node table
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuadratureNode {
    pub index: usize,
    pub x: f64,
    pub fx: f64,
    pub coefficient: f64,
    /// `fx · coefficient · scale`
    pub contribution: f64,
}

/// Outcome of an integration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuadratureResult {
    pub method: QuadratureMethod,
    pub value: f64,
    /// Step size; `None` for the adaptive rule
    pub h: Option<f64>,
    /// Subdivisions used (after adjustment), or accepted panels when adaptive
    pub n: usize,
    pub evals: usize,
    pub error_estimate: Option<f64>,
    pub nodes: Vec<QuadratureNode>,
    /// False when the adaptive rule ran out of depth or evaluations
    pub tolerance_met: bool,
    /// Evaluations that were undefined and counted as `0.0`
    pub undefined_points: usize,
}

/// Reject bounds no rule can integrate over
pub(crate) fn check_interval(a: f64, b: f64) -> Result<(), NumericError> {
    if !a.is_finite() || !b.is_finite() {
        return Err(NumericError::invalid_parameter(
            "interval",
            format!("bounds must be finite, got [{}, {}]", a, b),
        ));
    }
    if a == b {
        return Err(NumericError::DegenerateInterval { a, b });
    }
    Ok(())
}

/// Reject subdivision counts above [`MAX_SUBDIVISIONS`] once adjusted
pub(crate) fn check_subdivisions(method: QuadratureMethod, n: usize) -> Result<usize, NumericError> {
    let adjusted = method.adjust_subdivisions(n);
    if adjusted > MAX_SUBDIVISIONS {
        return Err(NumericError::invalid_parameter(
            "n",
            format!("at most {} subdivisions are supported, got {}", MAX_SUBDIVISIONS, n),
        ));
    }
    Ok(adjusted)
}

/// Evaluates through a [`PointEvaluator`] and counts undefined points
pub(crate) struct CountingEvaluator<'a, F: ?Sized> {
    f: &'a F,
    pub(crate) evals: usize,
    pub(crate) undefined: usize,
}

impl<'a, F: PointEvaluator + ?Sized> CountingEvaluator<'a, F> {
    pub(crate) fn new(f: &'a F) -> Self {
        Self {
            f,
            evals: 0,
            undefined: 0,
        }
    }

    pub(crate) fn at(&mut self, x: f64) -> f64 {
        self.evals += 1;
        match self.f.evaluate(x) {
            Some(y) => y,
            None => {
                self.undefined += 1;
                log::debug!("integrand undefined at {}; counted as 0.0", x);
                0.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjust_subdivisions() {
        assert_eq!(QuadratureMethod::Rectangle.adjust_subdivisions(0), 1);
        assert_eq!(QuadratureMethod::Trapezoidal.adjust_subdivisions(7), 7);
        assert_eq!(QuadratureMethod::Simpson13.adjust_subdivisions(1), 2);
        assert_eq!(QuadratureMethod::Simpson13.adjust_subdivisions(5), 6);
        assert_eq!(QuadratureMethod::Simpson38.adjust_subdivisions(2), 3);
        assert_eq!(QuadratureMethod::Simpson38.adjust_subdivisions(7), 9);
        assert_eq!(QuadratureMethod::Boole.adjust_subdivisions(10), 12);
        assert_eq!(QuadratureMethod::Boole.adjust_subdivisions(8), 8);
        assert_eq!(
            QuadratureMethod::Boole.adjust_subdivisions(usize::MAX),
            usize::MAX - usize::MAX % 4
        );
    }

    #[test]
    fn test_check_subdivisions() {
        assert_eq!(check_subdivisions(QuadratureMethod::Simpson38, 7), Ok(9));
        assert_eq!(
            check_subdivisions(QuadratureMethod::Trapezoidal, MAX_SUBDIVISIONS),
            Ok(MAX_SUBDIVISIONS)
        );
        for method in QuadratureMethod::ALL {
            if method == QuadratureMethod::Adaptive {
                continue;
            }
            assert!(matches!(
                check_subdivisions(method, usize::MAX),
                Err(NumericError::InvalidParameter { name: "n", .. })
            ));
        }
    }

    #[test]
    fn test_parse_methods() {
        assert_eq!("rectangulo".parse::<QuadratureMethod>(), Ok(QuadratureMethod::Rectangle));
        assert_eq!("Simpson_13".parse::<QuadratureMethod>(), Ok(QuadratureMethod::Simpson13));
        assert_eq!("adaptativo".parse::<QuadratureMethod>(), Ok(QuadratureMethod::Adaptive));
        for method in QuadratureMethod::ALL {
            assert_eq!(method.as_str().parse::<QuadratureMethod>(), Ok(method));
        }
        assert!(matches!(
            "gauss".parse::<QuadratureMethod>(),
            Err(NumericError::UnknownMethod { .. })
        ));
    }

    #[test]
    fn test_check_interval() {
        assert!(check_interval(0.0, 1.0).is_ok());
        assert!(check_interval(1.0, 0.0).is_ok());
        assert_eq!(
            check_interval(2.0, 2.0),
            Err(NumericError::DegenerateInterval { a: 2.0, b: 2.0 })
        );
        assert!(matches!(
            check_interval(0.0, f64::INFINITY),
            Err(NumericError::InvalidParameter { .. })
        ));
    }
}
