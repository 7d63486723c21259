//! Expression compiler: text in, callable real function out
//!
//! Compilation is parse + validate + limits check. The result is an immutable
//! tree that is walked on every call; no code is generated or executed.
//!
//! # Example
//! ```
//! use num_anafis::Compiler;
//!
//! let f = Compiler::new().max_depth(50).compile("x^2 - 2").unwrap();
//! assert_eq!(f.call(3.0), Ok(7.0));
//! ```

use crate::error::EvalFault;
use crate::functions::registry::Registry;
use crate::simplification::Simplifier;
use crate::traits::PointEvaluator;
use crate::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_NODES, Expr, NumericError, parser};
use std::fmt;
use std::sync::Arc;

/// Builder for compiling expressions with custom safety limits
#[derive(Debug, Clone, Copy)]
pub struct Compiler {
    max_depth: usize,
    max_nodes: usize,
}

impl Default for Compiler {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_nodes: DEFAULT_MAX_NODES,
        }
    }
}

impl Compiler {
    /// Create a compiler with the default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum AST depth
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set maximum AST node count
    pub fn max_nodes(mut self, nodes: usize) -> Self {
        self.max_nodes = nodes;
        self
    }

    /// Compile `text` into a callable function of `x`
    ///
    /// # Errors
    /// Any parse or validation failure, or a tree exceeding the configured
    /// depth or node limits.
    pub fn compile(&self, text: &str) -> Result<CompiledFunction, NumericError> {
        let expr = parser::parse(text, self.max_depth)?;

        if expr.max_depth() > self.max_depth {
            return Err(NumericError::MaxDepthExceeded);
        }
        if expr.node_count() > self.max_nodes {
            return Err(NumericError::MaxNodesExceeded);
        }

        log::trace!("compiled '{}' into {} nodes", text.trim(), expr.node_count());
        Ok(CompiledFunction {
            expr: Arc::new(expr),
            source: Arc::from(text.trim()),
        })
    }
}

/// Compile an expression with the default limits
///
/// # Example
/// ```
/// use num_anafis::compile_expression;
///
/// let f = compile_expression("sin(x) / x").unwrap();
/// assert!(f.call(0.0).is_err());
/// assert!((f.call(0.5).unwrap() - 0.958851077).abs() < 1e-9);
/// ```
///
/// # Errors
/// Returns an invalid-expression `NumericError` (see
/// [`NumericError::is_invalid_expression`]).
pub fn compile_expression(text: &str) -> Result<CompiledFunction, NumericError> {
    Compiler::new().compile(text)
}

/// A validated expression in `x`, callable as a partial function ℝ → ℝ
///
/// Cheap to clone and safe to share between threads.
#[derive(Debug, Clone)]
pub struct CompiledFunction {
    expr: Arc<Expr>,
    source: Arc<str>,
}

impl CompiledFunction {
    /// Wrap an already validated tree
    pub(crate) fn from_expr(expr: Expr) -> Self {
        let source = Arc::from(expr.to_string());
        Self {
            expr: Arc::new(expr),
            source,
        }
    }

    /// The expression tree
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Source text the function was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluate at `x`
    ///
    /// # Errors
    /// An [`EvalFault`] when `x` is outside the expression's domain or the
    /// result is not finite.
    pub fn call(&self, x: f64) -> Result<f64, EvalFault> {
        eval_expr(&self.expr, x)
    }

    /// Symbolic first derivative, simplified
    pub fn derivative(&self) -> CompiledFunction {
        let derived = Simplifier::new().simplify(self.expr.derive());
        CompiledFunction::from_expr(derived)
    }
}

impl fmt::Display for CompiledFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl PointEvaluator for CompiledFunction {
    fn evaluate(&self, x: f64) -> Option<f64> {
        self.call(x).ok()
    }
}

#[inline]
fn finite(v: f64) -> Result<f64, EvalFault> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(EvalFault::NonFinite)
    }
}

/// Real power: `0^negative` divides by zero and a negative base needs an
/// integer exponent
pub(crate) fn real_pow(base: f64, exponent: f64) -> Result<f64, EvalFault> {
    if base == 0.0 && exponent < 0.0 {
        return Err(EvalFault::DivisionByZero);
    }
    if base < 0.0 && exponent.fract() != 0.0 {
        return Err(EvalFault::Domain { function: "pow" });
    }
    finite(base.powf(exponent))
}

/// Floored remainder: the result takes the sign of the divisor
pub(crate) fn floored_rem(a: f64, b: f64) -> Result<f64, EvalFault> {
    if b == 0.0 {
        return Err(EvalFault::DivisionByZero);
    }
    let r = a % b;
    finite(if r != 0.0 && (r < 0.0) != (b < 0.0) { r + b } else { r })
}

/// Tree-walk evaluation of `expr` at `x`
pub(crate) fn eval_expr(expr: &Expr, x: f64) -> Result<f64, EvalFault> {
    match expr {
        Expr::Number(n) => finite(*n),
        Expr::Variable => finite(x),
        Expr::Constant(c) => Ok(c.value()),
        Expr::Neg(inner) => Ok(-eval_expr(inner, x)?),
        Expr::Add(l, r) => finite(eval_expr(l, x)? + eval_expr(r, x)?),
        Expr::Sub(l, r) => finite(eval_expr(l, x)? - eval_expr(r, x)?),
        Expr::Mul(l, r) => finite(eval_expr(l, x)? * eval_expr(r, x)?),
        Expr::Div(l, r) => {
            let num = eval_expr(l, x)?;
            let den = eval_expr(r, x)?;
            if den == 0.0 {
                return Err(EvalFault::DivisionByZero);
            }
            finite(num / den)
        }
        Expr::Rem(l, r) => floored_rem(eval_expr(l, x)?, eval_expr(r, x)?),
        Expr::Pow(b, e) => real_pow(eval_expr(b, x)?, eval_expr(e, x)?),
        Expr::FunctionCall { name, args } => {
            let def = Registry::get(name).ok_or(EvalFault::Domain { function: *name })?;
            let values = args
                .iter()
                .map(|a| eval_expr(a, x))
                .collect::<Result<Vec<f64>, EvalFault>>()?;
            let v = (def.eval)(&values).ok_or(EvalFault::Domain { function: def.name })?;
            finite(v)
        }
    }
}
