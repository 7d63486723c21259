//! Numerical Analysis Library
//!
//! Root finding and numerical integration over user-supplied expressions in
//! one variable `x`, with sandboxed parsing and removable-singularity handling.
//!
//! # Features
//! - Expression compiler with a closed allow-list of functions and constants;
//!   no code is ever executed, only a validated tree is walked
//! - Symbolic differentiation and rule-based simplification of expressions
//! - Singularity analysis: denominator zeros and their limits via L'Hôpital
//! - Safe point evaluation that substitutes limits at removable singularities
//! - Newton-Raphson, fixed-point iteration and Aitken Δ² acceleration with
//!   full iteration traces
//! - Rectangle, trapezoidal, Simpson 1/3, Simpson 3/8, Boole and adaptive
//!   Simpson quadrature with per-node tables
//!
//! # Usage Examples
//!
//! ## Root finding
//! ```
//! use num_anafis::{RootOptions, compile_expression, run_newton};
//!
//! let f = compile_expression("x^2 - 2").unwrap();
//! let outcome = run_newton(&f, None, 1.0, &RootOptions::default()).unwrap();
//! assert!((outcome.root.unwrap() - 2f64.sqrt()).abs() < 1e-12);
//! ```
//!
//! ## Integration across a removable singularity
//! ```
//! use num_anafis::{build_safe_evaluator, compile_expression, run_trapezoidal};
//!
//! let f = compile_expression("sin(x)/x").unwrap();
//! let safe = build_safe_evaluator(f, -1.0, 1.0);
//! let result = run_trapezoidal(&safe, -1.0, 1.0, 100).unwrap();
//! assert_eq!(result.undefined_points, 0);
//! assert!((result.value - 1.892166).abs() < 1e-4);
//! ```

mod ast;
mod compiler;
mod differentiation;
mod display;
mod error;
pub mod functions;
pub mod numeric;
mod parser;
mod problem;
mod quadrature;
mod roots;
mod safe_eval;
mod sampling;
mod simplification;
mod singularity;
pub mod traits;

#[cfg(test)]
mod tests;

// Re-export key types for easier usage
pub use ast::{Constant, Expr, VARIABLE};
pub use compiler::{CompiledFunction, Compiler, compile_expression};
pub use error::{EvalFault, NumericError, Span};
pub use problem::{
    DEFAULT_PLOT_RANGE, DEFAULT_SUBDIVISIONS, IntegrationProblem, IntegrationReport, RootMethod,
    RootProblem, RootReport, plot_range,
};
pub use quadrature::{
    AdaptiveOptions, QuadratureMethod, QuadratureNode, QuadratureResult, run_adaptive, run_boole,
    run_rectangle, run_simpson_13, run_simpson_38, run_trapezoidal,
};
pub use roots::{
    IterationDetail, IterationRecord, RootOptions, RootOutcome, run_aitken, run_fixed_point,
    run_newton,
};
pub use safe_eval::{EvalSource, Evaluation, LIMIT_OFFSETS, SafeEvaluator, build_safe_evaluator};
#[cfg(feature = "parallel")]
pub use sampling::sample_curve_parallel;
pub use sampling::{CurvePoint, DEFAULT_CURVE_POINTS, sample_curve};
pub use simplification::{Simplifier, simplify, simplify_domain_safe};
pub use singularity::{
    MAX_LHOPITAL_ROUNDS, SingularPoint, SingularPointSet, SingularityStatus,
    analyze_singularities, find_singularities, resolve_limit,
};
pub use traits::PointEvaluator;

/// Default maximum AST depth
pub const DEFAULT_MAX_DEPTH: usize = 100;
/// Default maximum AST node count
pub const DEFAULT_MAX_NODES: usize = 10_000;

/// Default settings of the individual algorithms
pub mod defaults {
    pub use crate::quadrature::{
        DEFAULT_ADAPTIVE_TOLERANCE, DEFAULT_MAX_EVALS, DEFAULT_MAX_REFINEMENT_DEPTH,
        MAX_SUBDIVISIONS,
    };
    pub use crate::roots::{DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE, DERIVATIVE_TOLERANCE};
}
