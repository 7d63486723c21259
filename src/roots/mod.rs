//! Iterative root finding: Newton-Raphson, fixed-point iteration and
//! Aitken's Δ² acceleration
//!
//! Every method records one [`IterationRecord`] per step. Failing to converge
//! within the iteration budget is not an error: the outcome simply carries
//! `root: None` alongside the full trace.

mod aitken;
mod fixed_point;
mod newton;

pub use aitken::run_aitken;
pub use fixed_point::run_fixed_point;
pub use newton::{DERIVATIVE_TOLERANCE, run_newton};

use crate::NumericError;

/// Default absolute tolerance on the step size
pub const DEFAULT_TOLERANCE: f64 = 1e-8;

/// Default iteration budget
pub const DEFAULT_MAX_ITERATIONS: usize = 50;

/// Stopping criteria shared by the root finders
///
/// # Example
/// ```
/// use num_anafis::RootOptions;
///
/// let options = RootOptions::new().tol(1e-10).max_iter(100);
/// assert_eq!(options.max_iter, 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RootOptions {
    /// Converged once `|x_{n+1} - x_n|` drops below this
    pub tol: f64,
    pub max_iter: usize,
}

impl Default for RootOptions {
    fn default() -> Self {
        Self {
            tol: DEFAULT_TOLERANCE,
            max_iter: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl RootOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Reject a non-positive tolerance or a non-finite starting point
    pub(crate) fn validate(&self, x0: f64) -> Result<(), NumericError> {
        if !(self.tol.is_finite() && self.tol > 0.0) {
            return Err(NumericError::invalid_parameter(
                "tol",
                format!("tolerance must be finite and positive, got {}", self.tol),
            ));
        }
        if !x0.is_finite() {
            return Err(NumericError::invalid_parameter(
                "x0",
                format!("initial guess must be finite, got {}", x0),
            ));
        }
        Ok(())
    }
}

/// Method-specific columns of an iteration record
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "method", rename_all = "snake_case"))]
pub enum IterationDetail {
    Newton { fx: f64, dfx: f64, x_next: f64 },
    FixedPoint { x_next: f64 },
    /// `x1 = g(x)`, `x2 = g(x1)` and the accelerated iterate
    Aitken { x1: f64, x2: f64, x_acc: f64 },
}

/// One step of a root finder
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IterationRecord {
    pub n: usize,
    pub x: f64,
    pub detail: IterationDetail,
    pub err_abs: f64,
    /// `err_abs / |next iterate|`, `+∞` when the next iterate is zero
    pub err_rel: f64,
}

impl IterationRecord {
    /// The iterate this step produced
    pub fn next_iterate(&self) -> f64 {
        match self.detail {
            IterationDetail::Newton { x_next, .. } | IterationDetail::FixedPoint { x_next } => {
                x_next
            }
            IterationDetail::Aitken { x_acc, .. } => x_acc,
        }
    }
}

/// Result of a root finder: the root if it converged, and the trace
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RootOutcome {
    pub root: Option<f64>,
    pub trace: Vec<IterationRecord>,
}

impl RootOutcome {
    #[inline]
    pub fn converged(&self) -> bool {
        self.root.is_some()
    }

    /// Iterates `x_n` in order
    pub fn iterates(&self) -> Vec<f64> {
        self.trace.iter().map(|r| r.x).collect()
    }
}

/// Closing record appended at the converged point
pub(crate) fn closing_record(n: usize, x: f64, detail: IterationDetail) -> IterationRecord {
    IterationRecord {
        n,
        x,
        detail,
        err_abs: 0.0,
        err_rel: 0.0,
    }
}
