//! Simplification framework - reduces expressions
//!
//! Keeps symbolic derivatives small between L'Hôpital rounds. Rules cover
//! constant folding, coefficient merging and neutral elements.
pub(crate) mod engine;
mod rules;

pub use engine::Simplifier;

use crate::Expr;

/// Simplify an expression with the default settings
pub fn simplify(expr: Expr) -> Expr {
    Simplifier::new().simplify(expr)
}

/// Simplify without applying rules that change the expression's domain
pub fn simplify_domain_safe(expr: Expr) -> Expr {
    Simplifier::new().domain_safe(true).simplify(expr)
}
