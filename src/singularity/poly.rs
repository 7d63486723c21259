//! Dense univariate polynomials in `x`
//!
//! Only used to recognise polynomial denominators so their roots can be found
//! in closed form.

use crate::Expr;
use crate::compiler::eval_expr;

/// Highest integer power expanded when converting `u^n`
const MAX_EXPANDED_POWER: u32 = 32;

/// Coefficients in increasing degree: `coeffs[k]` multiplies `x^k`
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Polynomial {
    coeffs: Vec<f64>,
}

impl Polynomial {
    pub(crate) fn constant(c: f64) -> Self {
        Polynomial { coeffs: vec![c] }
    }

    pub(crate) fn var() -> Self {
        Polynomial {
            coeffs: vec![0.0, 1.0],
        }
    }

    pub(crate) fn from_coeffs(coeffs: Vec<f64>) -> Self {
        let mut p = Polynomial { coeffs };
        p.trim();
        p
    }

    /// Convert an expression that is a polynomial in `x`
    ///
    /// Sub-expressions without `x` are folded to their numeric value; anything
    /// else (functions of `x`, negative or fractional powers, division by `x`)
    /// returns `None`.
    pub(crate) fn try_from_expr(expr: &Expr) -> Option<Self> {
        if !expr.contains_var() {
            return eval_expr(expr, 0.0).ok().map(Polynomial::constant);
        }

        let poly = match expr {
            Expr::Variable => Polynomial::var(),
            Expr::Neg(u) => Polynomial::try_from_expr(u)?.scale(-1.0),
            Expr::Add(u, v) => Polynomial::try_from_expr(u)?.add(&Polynomial::try_from_expr(v)?),
            Expr::Sub(u, v) => Polynomial::try_from_expr(u)?.add(&Polynomial::try_from_expr(v)?.scale(-1.0)),
            Expr::Mul(u, v) => Polynomial::try_from_expr(u)?.mul(&Polynomial::try_from_expr(v)?),
            Expr::Div(u, v) if !v.contains_var() => {
                let c = eval_expr(v, 0.0).ok()?;
                if c == 0.0 {
                    return None;
                }
                Polynomial::try_from_expr(u)?.scale(1.0 / c)
            }
            Expr::Pow(u, v) if !v.contains_var() => {
                let n = eval_expr(v, 0.0).ok()?;
                if n < 0.0 || n.fract() != 0.0 || n > MAX_EXPANDED_POWER as f64 {
                    return None;
                }
                let base = Polynomial::try_from_expr(u)?;
                (0..n as u32).fold(Polynomial::constant(1.0), |acc, _| acc.mul(&base))
            }
            Expr::FunctionCall { name: "pow", args } if !args[1].contains_var() => {
                return Polynomial::try_from_expr(&Expr::pow(args[0].clone(), args[1].clone()));
            }
            _ => return None,
        };
        Some(poly)
    }

    /// Drop trailing zero coefficients
    fn trim(&mut self) {
        while self.coeffs.len() > 1 && self.coeffs.last() == Some(&0.0) {
            self.coeffs.pop();
        }
        if self.coeffs.is_empty() {
            self.coeffs.push(0.0);
        }
    }

    #[cfg(test)]
    fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    #[cfg(test)]
    fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    /// Horner evaluation
    pub(crate) fn eval(&self, x: f64) -> f64 {
        self.coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
    }

    pub(crate) fn scale(&self, k: f64) -> Polynomial {
        Polynomial::from_coeffs(self.coeffs.iter().map(|c| c * k).collect())
    }

    pub(crate) fn add(&self, other: &Polynomial) -> Polynomial {
        let len = self.coeffs.len().max(other.coeffs.len());
        let coeffs = (0..len)
            .map(|i| self.coeffs.get(i).unwrap_or(&0.0) + other.coeffs.get(i).unwrap_or(&0.0))
            .collect();
        Polynomial::from_coeffs(coeffs)
    }

    pub(crate) fn mul(&self, other: &Polynomial) -> Polynomial {
        let mut coeffs = vec![0.0; self.coeffs.len() + other.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            for (j, b) in other.coeffs.iter().enumerate() {
                coeffs[i + j] += a * b;
            }
        }
        Polynomial::from_coeffs(coeffs)
    }

    /// Real roots for degree 1 and 2, `None` for higher degrees
    ///
    /// The quadratic uses the cancellation-free form
    /// `q = -(b + sign(b)·sqrt(disc)) / 2`, roots `q/a` and `c/q`.
    /// A double root is returned once.
    pub(crate) fn closed_form_roots(&self) -> Option<Vec<f64>> {
        match *self.coeffs.as_slice() {
            [_] => Some(Vec::new()),
            [c0, c1] => Some(vec![-c0 / c1]),
            [c, b, a] => {
                let disc = b * b - 4.0 * a * c;
                let scale = (b * b).max((4.0 * a * c).abs());
                if disc.abs() <= 1e-12 * scale {
                    return Some(vec![-b / (2.0 * a)]);
                }
                if disc < 0.0 {
                    return Some(Vec::new());
                }
                let q = -0.5 * (b + b.signum() * disc.sqrt());
                let mut roots = vec![q / a, c / q];
                roots.sort_by(f64::total_cmp);
                Some(roots)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile_expression;

    fn poly(text: &str) -> Option<Polynomial> {
        Polynomial::try_from_expr(compile_expression(text).unwrap().expr())
    }

    #[test]
    fn test_conversion() {
        let p = poly("(x - 1)*(x + 2)").unwrap();
        assert_eq!(p.coeffs(), &[-2.0, 1.0, 1.0]);
        assert_eq!(p.degree(), 2);

        let p = poly("x^3/2 - pi").unwrap();
        assert_eq!(p.degree(), 3);
        assert!((p.eval(2.0) - (4.0 - std::f64::consts::PI)).abs() < 1e-12);

        assert!(poly("sin(x)").is_none());
        assert!(poly("1/x").is_none());
        assert!(poly("x^0.5").is_none());
        assert!(poly("x^(-1)").is_none());
    }

    #[test]
    fn test_cancelled_leading_term() {
        // x^2 - x^2 + x is linear
        let p = poly("x^2 - x^2 + x").unwrap();
        assert_eq!(p.degree(), 1);
    }

    #[test]
    fn test_closed_form_roots() {
        assert_eq!(poly("2*x - 3").unwrap().closed_form_roots(), Some(vec![1.5]));
        assert_eq!(
            poly("x^2 - 1").unwrap().closed_form_roots(),
            Some(vec![-1.0, 1.0])
        );
        assert_eq!(
            poly("(x - 2)^2").unwrap().closed_form_roots(),
            Some(vec![2.0])
        );
        assert_eq!(poly("x^2 + 1").unwrap().closed_form_roots(), Some(vec![]));
        assert_eq!(poly("x^3 - x").unwrap().closed_form_roots(), None);
    }

    #[test]
    fn test_stable_quadratic_small_root() {
        // Roots 1e-8 and 1e8; the naive formula loses the small one
        let p = Polynomial::from_coeffs(vec![1.0, -(1e8 + 1e-8), 1.0]);
        let roots = p.closed_form_roots().unwrap();
        assert!((roots[0] - 1e-8).abs() < 1e-20);
        assert!((roots[1] - 1e8).abs() < 1e-4);
    }
}
