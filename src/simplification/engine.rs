//! Core simplification engine with rule-based architecture
//!
//! Implements bottom-up tree traversal, rule application, cycle detection and
//! configurable limits (iterations, depth).

use super::rules::{ExprKind, RuleContext, RuleRegistry};
use crate::Expr;
use std::sync::{Arc, OnceLock};

/// Global rule registry singleton - built once, reused across all simplifications
fn global_registry() -> &'static RuleRegistry {
    static REGISTRY: OnceLock<RuleRegistry> = OnceLock::new();
    REGISTRY.get_or_init(RuleRegistry::new)
}

/// Rule-based simplifier
///
/// # Example
/// ```
/// use num_anafis::{Simplifier, compile_expression};
///
/// let f = compile_expression("0 * sin(x) + 1 * (x^1 - 0)").unwrap();
/// let simplified = Simplifier::new().simplify(f.expr().clone());
/// assert_eq!(simplified.to_string(), "x");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Simplifier {
    max_iterations: usize,
    max_depth: usize,
    domain_safe: bool,
}

impl Default for Simplifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Simplifier {
    pub fn new() -> Self {
        Self {
            max_iterations: 100,
            max_depth: 200,
            domain_safe: false,
        }
    }

    /// Maximum number of full passes over the tree
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Nodes deeper than this are left untouched
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Skip rules that change where the expression is defined
    pub fn domain_safe(mut self, domain_safe: bool) -> Self {
        self.domain_safe = domain_safe;
        self
    }

    /// Main simplification entry point
    pub fn simplify(&self, expr: Expr) -> Expr {
        let mut current = Arc::new(expr);
        let mut seen: Vec<Arc<Expr>> = Vec::new();
        let mut iterations = 0;

        loop {
            if iterations >= self.max_iterations {
                log::warn!(
                    "simplification exceeded maximum iterations ({})",
                    self.max_iterations
                );
                break;
            }

            let original = Arc::clone(&current);
            current = self.apply_rules_bottom_up(current, 0);

            if *current == *original {
                break; // No changes
            }
            log::trace!("simplify pass {}: {} -> {}", iterations, original, current);

            if seen.iter().any(|s| **s == *current) {
                log::trace!("simplification cycle detected, stopping");
                break;
            }
            seen.push(Arc::clone(&current));

            iterations += 1;
        }

        Arc::try_unwrap(current).unwrap_or_else(|rc| (*rc).clone())
    }

    /// Apply rules bottom-up through the expression tree
    fn apply_rules_bottom_up(&self, expr: Arc<Expr>, depth: usize) -> Arc<Expr> {
        if depth > self.max_depth {
            return expr;
        }

        let rebuilt = match &*expr {
            Expr::Neg(u) => {
                let u_s = self.apply_rules_bottom_up(Arc::clone(u), depth + 1);
                (!Arc::ptr_eq(&u_s, u)).then(|| Arc::new(Expr::Neg(u_s)))
            }
            Expr::Add(u, v)
            | Expr::Sub(u, v)
            | Expr::Mul(u, v)
            | Expr::Div(u, v)
            | Expr::Rem(u, v)
            | Expr::Pow(u, v) => {
                let u_s = self.apply_rules_bottom_up(Arc::clone(u), depth + 1);
                let v_s = self.apply_rules_bottom_up(Arc::clone(v), depth + 1);
                if Arc::ptr_eq(&u_s, u) && Arc::ptr_eq(&v_s, v) {
                    None
                } else {
                    Some(Arc::new(rebuild_binary(&expr, u_s, v_s)))
                }
            }
            Expr::FunctionCall { name, args } => {
                let simplified: Vec<Expr> = args
                    .iter()
                    .map(|a| {
                        let s = self.apply_rules_bottom_up(Arc::new(a.clone()), depth + 1);
                        Arc::try_unwrap(s).unwrap_or_else(|rc| (*rc).clone())
                    })
                    .collect();
                (simplified != *args).then(|| Arc::new(Expr::func_multi(*name, simplified)))
            }
            Expr::Number(_) | Expr::Variable | Expr::Constant(_) => None,
        };

        self.apply_rules_to_node(rebuilt.unwrap_or(expr))
    }

    /// Apply all applicable rules to a single node in priority order
    fn apply_rules_to_node(&self, mut current: Arc<Expr>) -> Arc<Expr> {
        let context = RuleContext {
            domain_safe: self.domain_safe,
        };

        for rule in global_registry().get_rules_for_kind(ExprKind::of(&current)) {
            if context.domain_safe && rule.alters_domain() {
                continue;
            }
            if let Some(new_expr) = rule.apply(&current, &context) {
                log::trace!("{}: {} => {}", rule.name(), current, new_expr);
                current = Arc::new(new_expr);
                // The node may have changed kind; later rules see it on the next pass
                break;
            }
        }

        current
    }
}

/// Rebuild a binary node of the same operator with new children
fn rebuild_binary(template: &Expr, u: Arc<Expr>, v: Arc<Expr>) -> Expr {
    match template {
        Expr::Add(_, _) => Expr::Add(u, v),
        Expr::Sub(_, _) => Expr::Sub(u, v),
        Expr::Mul(_, _) => Expr::Mul(u, v),
        Expr::Div(_, _) => Expr::Div(u, v),
        Expr::Rem(_, _) => Expr::Rem(u, v),
        _ => Expr::Pow(u, v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_elements() {
        // (x + 0) * 1
        let e = Expr::mul_expr(
            Expr::add_expr(Expr::var(), Expr::number(0.0)),
            Expr::number(1.0),
        );
        assert_eq!(Simplifier::new().simplify(e), Expr::var());
    }

    #[test]
    fn test_folds_nested_constants() {
        // 2 * (3 * x) + (4 - 4)
        let e = Expr::add_expr(
            Expr::mul_expr(
                Expr::number(2.0),
                Expr::mul_expr(Expr::number(3.0), Expr::var()),
            ),
            Expr::sub_expr(Expr::number(4.0), Expr::number(4.0)),
        );
        assert_eq!(
            Simplifier::new().simplify(e),
            Expr::mul_expr(Expr::number(6.0), Expr::var())
        );
    }

    #[test]
    fn test_domain_safe_keeps_x_over_x() {
        let e = Expr::div_expr(Expr::var(), Expr::var());
        assert_eq!(Simplifier::new().simplify(e.clone()), Expr::number(1.0));
        assert_eq!(Simplifier::new().domain_safe(true).simplify(e.clone()), e);
    }

    #[test]
    fn test_iteration_cap() {
        let e = Expr::add_expr(
            Expr::add_expr(Expr::number(1.0), Expr::number(2.0)),
            Expr::number(3.0),
        );
        // Zero passes leaves the input untouched
        assert_eq!(Simplifier::new().max_iterations(0).simplify(e.clone()), e);
        assert_eq!(Simplifier::new().simplify(e), Expr::number(6.0));
    }
}
