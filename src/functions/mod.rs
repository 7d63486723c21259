//! Centralized mathematical function registry
//!
//! This module is the allow-list for expressions: a function exists for the
//! parser only if it has a definition here, and every definition carries both
//! its numeric evaluation and its derivative formula.

use crate::Expr;

pub(crate) mod definitions;
pub(crate) mod registry;

pub use registry::{function_names, is_allowed_function};

// ===== Helper functions for building derivative expressions =====

/// Multiply, optimizing for common cases (0 and 1)
pub(crate) fn mul_opt(a: Expr, b: Expr) -> Expr {
    if a.is_zero_num() || b.is_zero_num() {
        return Expr::number(0.0);
    }
    if a.is_one_num() {
        return b;
    }
    if b.is_one_num() {
        return a;
    }
    match (&a, &b) {
        (Expr::Number(x), Expr::Number(y)) => Expr::number(x * y),
        _ => Expr::mul_expr(a, b),
    }
}

/// Divide, optimizing for 0/v and u/1
pub(crate) fn div_opt(a: Expr, b: Expr) -> Expr {
    if a.is_zero_num() {
        return Expr::number(0.0);
    }
    if b.is_one_num() {
        return a;
    }
    Expr::div_expr(a, b)
}

/// Add, dropping zero operands
pub(crate) fn add_opt(a: Expr, b: Expr) -> Expr {
    if a.is_zero_num() {
        return b;
    }
    if b.is_zero_num() {
        return a;
    }
    Expr::add_expr(a, b)
}

/// Subtract, dropping a zero right operand and negating for a zero left one
pub(crate) fn sub_opt(a: Expr, b: Expr) -> Expr {
    if b.is_zero_num() {
        return a;
    }
    if a.is_zero_num() {
        return neg(b);
    }
    Expr::sub_expr(a, b)
}

/// Negate an expression
pub(crate) fn neg(e: Expr) -> Expr {
    match e {
        Expr::Number(n) => Expr::number(-n),
        Expr::Neg(inner) => (*inner).clone(),
        other => Expr::neg(other),
    }
}

/// `u^n` for a numeric exponent
pub(crate) fn powi(u: Expr, n: f64) -> Expr {
    if n == 1.0 {
        return u;
    }
    Expr::pow(u, Expr::number(n))
}
