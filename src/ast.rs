//! Abstract Syntax Tree for single-variable expressions

use std::sync::Arc;

/// Name of the only free variable an expression may reference
pub const VARIABLE: &str = "x";

/// Named constants available to expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constant {
    Pi,
    E,
    Tau,
}

impl Constant {
    /// Look up a constant by its source name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pi" => Some(Constant::Pi),
            "e" => Some(Constant::E),
            "tau" => Some(Constant::Tau),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Constant::Pi => "pi",
            Constant::E => "e",
            Constant::Tau => "tau",
        }
    }

    pub fn value(&self) -> f64 {
        match self {
            Constant::Pi => std::f64::consts::PI,
            Constant::E => std::f64::consts::E,
            Constant::Tau => std::f64::consts::TAU,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Constant number (e.g., 3.14, 1e10)
    Number(f64),

    /// The free variable `x`
    Variable,

    /// Named constant (pi, e, tau)
    Constant(Constant),

    /// Unary negation
    Neg(Arc<Expr>),

    /// Addition
    Add(Arc<Expr>, Arc<Expr>),

    /// Subtraction
    Sub(Arc<Expr>, Arc<Expr>),

    /// Multiplication
    Mul(Arc<Expr>, Arc<Expr>),

    /// Division
    Div(Arc<Expr>, Arc<Expr>),

    /// Floored remainder (`%`)
    Rem(Arc<Expr>, Arc<Expr>),

    /// Exponentiation (`^` or `**`)
    Pow(Arc<Expr>, Arc<Expr>),

    /// Call of an allow-listed function; `name` is the registry's canonical name
    FunctionCall {
        name: &'static str,
        args: Vec<Expr>,
    },
}

impl Expr {
    // Accessor methods

    /// Check if expression is a constant number and return its value
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Expr::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Check if this expression is the number zero (with tolerance)
    #[inline]
    pub fn is_zero_num(&self) -> bool {
        self.as_number().is_some_and(crate::traits::is_zero)
    }

    /// Check if this expression is the number one (with tolerance)
    #[inline]
    pub fn is_one_num(&self) -> bool {
        self.as_number().is_some_and(crate::traits::is_one)
    }

    // Convenience constructors

    pub fn number(n: f64) -> Self {
        Expr::Number(n)
    }

    pub fn var() -> Self {
        Expr::Variable
    }

    pub fn neg(inner: Expr) -> Self {
        Expr::Neg(Arc::new(inner))
    }

    pub fn add_expr(left: Expr, right: Expr) -> Self {
        Expr::Add(Arc::new(left), Arc::new(right))
    }

    pub fn sub_expr(left: Expr, right: Expr) -> Self {
        Expr::Sub(Arc::new(left), Arc::new(right))
    }

    pub fn mul_expr(left: Expr, right: Expr) -> Self {
        Expr::Mul(Arc::new(left), Arc::new(right))
    }

    pub fn div_expr(left: Expr, right: Expr) -> Self {
        Expr::Div(Arc::new(left), Arc::new(right))
    }

    pub fn rem_expr(left: Expr, right: Expr) -> Self {
        Expr::Rem(Arc::new(left), Arc::new(right))
    }

    pub fn pow(base: Expr, exponent: Expr) -> Self {
        Expr::Pow(Arc::new(base), Arc::new(exponent))
    }

    /// Create a single-argument function call
    pub fn func(name: &'static str, arg: Expr) -> Self {
        Expr::FunctionCall {
            name,
            args: vec![arg],
        }
    }

    /// Create a multi-argument function call
    pub fn func_multi(name: &'static str, args: Vec<Expr>) -> Self {
        Expr::FunctionCall { name, args }
    }

    // Analysis methods

    /// Count the total number of nodes in the AST
    pub fn node_count(&self) -> usize {
        match self {
            Expr::Number(_) | Expr::Variable | Expr::Constant(_) => 1,
            Expr::Neg(inner) => 1 + inner.node_count(),
            Expr::FunctionCall { args, .. } => {
                1 + args.iter().map(|a| a.node_count()).sum::<usize>()
            }
            Expr::Add(l, r)
            | Expr::Sub(l, r)
            | Expr::Mul(l, r)
            | Expr::Div(l, r)
            | Expr::Rem(l, r)
            | Expr::Pow(l, r) => 1 + l.node_count() + r.node_count(),
        }
    }

    /// Get the maximum nesting depth of the AST
    pub fn max_depth(&self) -> usize {
        match self {
            Expr::Number(_) | Expr::Variable | Expr::Constant(_) => 1,
            Expr::Neg(inner) => 1 + inner.max_depth(),
            Expr::FunctionCall { args, .. } => {
                1 + args.iter().map(|a| a.max_depth()).max().unwrap_or(0)
            }
            Expr::Add(l, r)
            | Expr::Sub(l, r)
            | Expr::Mul(l, r)
            | Expr::Div(l, r)
            | Expr::Rem(l, r)
            | Expr::Pow(l, r) => 1 + l.max_depth().max(r.max_depth()),
        }
    }

    /// Check if the expression depends on `x`
    pub fn contains_var(&self) -> bool {
        match self {
            Expr::Number(_) | Expr::Constant(_) => false,
            Expr::Variable => true,
            Expr::Neg(inner) => inner.contains_var(),
            Expr::FunctionCall { args, .. } => args.iter().any(|a| a.contains_var()),
            Expr::Add(l, r)
            | Expr::Sub(l, r)
            | Expr::Mul(l, r)
            | Expr::Div(l, r)
            | Expr::Rem(l, r)
            | Expr::Pow(l, r) => l.contains_var() || r.contains_var(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_count_and_depth() {
        // sin(x) / (x + 1)
        let expr = Expr::div_expr(
            Expr::func("sin", Expr::var()),
            Expr::add_expr(Expr::var(), Expr::number(1.0)),
        );
        assert_eq!(expr.node_count(), 6);
        assert_eq!(expr.max_depth(), 3);
        assert!(expr.contains_var());
    }

    #[test]
    fn test_constants() {
        assert_eq!(Constant::from_name("pi"), Some(Constant::Pi));
        assert_eq!(Constant::from_name("x"), None);
        assert_eq!(Constant::Tau.value(), 2.0 * std::f64::consts::PI);
        assert!(!Expr::Constant(Constant::E).contains_var());
    }
}
