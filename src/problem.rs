//! Request-level drivers: compile the expressions, run a method and collect
//! everything needed to present the result
//!
//! ```
//! use num_anafis::{IntegrationProblem, QuadratureMethod};
//!
//! let report = IntegrationProblem::new(QuadratureMethod::Simpson13, "sin(x)/x", -1.0, 1.0)
//!     .n(20)
//!     .solve()
//!     .unwrap();
//! assert!((report.result.value - 1.892166).abs() < 1e-5);
//! assert_eq!(report.singular_points.critical_points(), vec![0.0]);
//! ```

use crate::compiler::{CompiledFunction, Compiler};
use crate::quadrature::{
    AdaptiveOptions, QuadratureMethod, QuadratureResult, check_interval, run_adaptive, run_boole,
    run_rectangle, run_simpson_13, run_simpson_38, run_trapezoidal,
};
use crate::roots::{
    IterationRecord, RootOptions, RootOutcome, run_aitken, run_fixed_point, run_newton,
};
use crate::safe_eval::{SafeEvaluator, build_safe_evaluator};
use crate::sampling::{CurvePoint, DEFAULT_CURVE_POINTS, sample_curve};
use crate::singularity::SingularPointSet;
use crate::traits::PointEvaluator;
use crate::NumericError;
use std::fmt;
use std::str::FromStr;

/// Plot range used when there are no iterates to frame
pub const DEFAULT_PLOT_RANGE: (f64, f64) = (-5.0, 5.0);

/// Default subdivision count for the composite rules
pub const DEFAULT_SUBDIVISIONS: usize = 10;

/// Supported root-finding methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RootMethod {
    Newton,
    FixedPoint,
    Aitken,
}

impl RootMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RootMethod::Newton => "newton",
            RootMethod::FixedPoint => "fixed_point",
            RootMethod::Aitken => "aitken",
        }
    }
}

impl fmt::Display for RootMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RootMethod {
    type Err = NumericError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newton" | "newton_raphson" => Ok(RootMethod::Newton),
            "fixed_point" | "punto_fijo" => Ok(RootMethod::FixedPoint),
            "aitken" => Ok(RootMethod::Aitken),
            _ => Err(NumericError::UnknownMethod {
                name: s.to_string(),
            }),
        }
    }
}

/// A root-finding request
///
/// Newton needs `fx` (and optionally `dfx`); fixed point and Aitken need `gx`
/// and use `fx`, when present, only for the plotted iteration points.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RootProblem {
    pub method: RootMethod,
    pub fx: Option<String>,
    pub gx: Option<String>,
    pub dfx: Option<String>,
    pub x0: f64,
    pub tol: f64,
    pub max_iter: usize,
}

/// Everything produced by [`RootProblem::solve`]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RootReport {
    pub method: RootMethod,
    pub root: Option<f64>,
    pub converged: bool,
    pub trace: Vec<IterationRecord>,
    /// `(x_n, f(x_n))`, or `(x_n, g(x_n))` when no `f` was given
    pub iteration_points: Vec<(f64, Option<f64>)>,
    /// `(x_n, g(x_n))` for the methods driven by `g`
    pub g_history: Option<Vec<(f64, Option<f64>)>>,
    pub curve_f: Option<Vec<CurvePoint>>,
    pub curve_g: Option<Vec<CurvePoint>>,
    pub plot_range: (f64, f64),
}

impl RootProblem {
    pub fn new(method: RootMethod, x0: f64) -> Self {
        let defaults = RootOptions::default();
        Self {
            method,
            fx: None,
            gx: None,
            dfx: None,
            x0,
            tol: defaults.tol,
            max_iter: defaults.max_iter,
        }
    }

    pub fn fx(mut self, text: impl Into<String>) -> Self {
        self.fx = Some(text.into());
        self
    }

    pub fn gx(mut self, text: impl Into<String>) -> Self {
        self.gx = Some(text.into());
        self
    }

    pub fn dfx(mut self, text: impl Into<String>) -> Self {
        self.dfx = Some(text.into());
        self
    }

    pub fn tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Run the method and assemble the report
    ///
    /// # Errors
    /// `MissingExpression` when the method's driving expression is absent,
    /// any compile error of the given expressions, the root finder's own
    /// errors.
    pub fn solve(&self) -> Result<RootReport, NumericError> {
        let compiler = Compiler::new();
        let compile = |text: &Option<String>| -> Result<Option<SafeEvaluator>, NumericError> {
            text.as_deref()
                .filter(|t| !t.trim().is_empty())
                .map(|t| compiler.compile(t).map(SafeEvaluator::without_singularities))
                .transpose()
        };
        let missing = |role: &'static str| NumericError::MissingExpression {
            role,
            method: self.method.to_string(),
        };

        let options = RootOptions::new().tol(self.tol).max_iter(self.max_iter);
        let f = compile(&self.fx)?;
        let g = compile(&self.gx)?;

        log::debug!("solving {} from x0 = {}", self.method, self.x0);
        let outcome = match self.method {
            RootMethod::Newton => {
                let f = f.as_ref().ok_or_else(|| missing("f(x)"))?;
                let df = compile(&self.dfx)?;
                run_newton(f, df.as_ref().map(|d| d as &dyn PointEvaluator), self.x0, &options)?
            }
            RootMethod::FixedPoint => {
                let g = g.as_ref().ok_or_else(|| missing("g(x)"))?;
                run_fixed_point(g, self.x0, &options)?
            }
            RootMethod::Aitken => {
                let g = g.as_ref().ok_or_else(|| missing("g(x)"))?;
                run_aitken(g, self.x0, &options)?
            }
        };

        Ok(self.report(outcome, f.as_ref(), g.as_ref()))
    }

    fn report(
        &self,
        outcome: RootOutcome,
        f: Option<&SafeEvaluator>,
        g: Option<&SafeEvaluator>,
    ) -> RootReport {
        let xs = outcome.iterates();
        let framed: Vec<f64> = match self.method {
            RootMethod::Newton => xs.clone(),
            RootMethod::FixedPoint | RootMethod::Aitken => xs
                .iter()
                .copied()
                .chain(outcome.trace.iter().map(IterationRecord::next_iterate))
                .collect(),
        };
        let plot_range = plot_range(&framed);
        let curve = |h: &SafeEvaluator| {
            sample_curve(h, plot_range.0, plot_range.1, DEFAULT_CURVE_POINTS)
        };
        let points = |h: &SafeEvaluator| xs.iter().map(|&x| (x, h.evaluate(x))).collect::<Vec<_>>();

        let g_history = match self.method {
            RootMethod::Newton => None,
            RootMethod::FixedPoint | RootMethod::Aitken => g.map(points),
        };
        let iteration_points = f.or(g).map(points).unwrap_or_default();

        RootReport {
            method: self.method,
            root: outcome.root,
            converged: outcome.converged(),
            iteration_points,
            g_history,
            curve_f: f.map(curve),
            curve_g: g.map(curve),
            plot_range,
            trace: outcome.trace,
        }
    }
}

/// `[min - 1, max + 1]` over the finite values, or the default range
pub fn plot_range(values: &[f64]) -> (f64, f64) {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let (lo, hi) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if lo > hi {
        DEFAULT_PLOT_RANGE
    } else {
        (lo - 1.0, hi + 1.0)
    }
}

/// An integration request
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntegrationProblem {
    pub method: QuadratureMethod,
    pub fx: String,
    pub a: f64,
    pub b: f64,
    /// Subdivisions for the composite rules
    pub n: usize,
    /// Tolerance for the adaptive rule
    pub tol: f64,
}

/// Everything produced by [`IntegrationProblem::solve`]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntegrationReport {
    pub result: QuadratureResult,
    pub curve: Vec<CurvePoint>,
    pub singular_points: SingularPointSet,
}

impl IntegrationProblem {
    pub fn new(method: QuadratureMethod, fx: impl Into<String>, a: f64, b: f64) -> Self {
        Self {
            method,
            fx: fx.into(),
            a,
            b,
            n: DEFAULT_SUBDIVISIONS,
            tol: AdaptiveOptions::default().tol,
        }
    }

    pub fn n(mut self, n: usize) -> Self {
        self.n = n;
        self
    }

    pub fn tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Integrate `fx` over `[a, b]`
    ///
    /// The interval is checked before the expression is even compiled.
    pub fn solve(&self) -> Result<IntegrationReport, NumericError> {
        check_interval(self.a, self.b)?;
        let compiled: CompiledFunction = Compiler::new().compile(&self.fx)?;
        let f = build_safe_evaluator(compiled, self.a, self.b);

        let result = match self.method {
            QuadratureMethod::Rectangle => run_rectangle(&f, self.a, self.b, self.n),
            QuadratureMethod::Trapezoidal => run_trapezoidal(&f, self.a, self.b, self.n),
            QuadratureMethod::Simpson13 => run_simpson_13(&f, self.a, self.b, self.n),
            QuadratureMethod::Simpson38 => run_simpson_38(&f, self.a, self.b, self.n),
            QuadratureMethod::Boole => run_boole(&f, self.a, self.b, self.n),
            QuadratureMethod::Adaptive => {
                run_adaptive(&f, self.a, self.b, &AdaptiveOptions::new().tol(self.tol))
            }
        }?;

        let curve = sample_curve(&f, self.a, self.b, DEFAULT_CURVE_POINTS);
        Ok(IntegrationReport {
            result,
            curve,
            singular_points: f.singular_points().clone(),
        })
    }
}
