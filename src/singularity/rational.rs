use crate::Expr;
use crate::functions::{add_opt, mul_opt, neg, powi, sub_opt};

/// Split an expression into `(numerator, denominator)`
///
/// Built bottom-up: sums are cross-multiplied over a common denominator,
/// quotients swap, numeric powers distribute (negative ones invert), and
/// `tan`, `cot`, `sec`, `csc` expose their `sin`/`cos` quotient. Every other
/// sub-expression is opaque with denominator `1`.
pub(crate) fn rational_form(expr: &Expr) -> (Expr, Expr) {
    let one = || Expr::number(1.0);

    match expr {
        Expr::Number(_) | Expr::Variable | Expr::Constant(_) => (expr.clone(), one()),

        Expr::Neg(u) => {
            let (n, d) = rational_form(u);
            (neg(n), d)
        }

        Expr::Add(u, v) | Expr::Sub(u, v) => {
            let (n1, d1) = rational_form(u);
            let (n2, d2) = rational_form(v);
            let combine = |a: Expr, b: Expr| {
                if matches!(expr, Expr::Add(_, _)) {
                    add_opt(a, b)
                } else {
                    sub_opt(a, b)
                }
            };
            if d1 == d2 {
                (combine(n1, n2), d1)
            } else {
                (
                    combine(mul_opt(n1, d2.clone()), mul_opt(n2, d1.clone())),
                    mul_opt(d1, d2),
                )
            }
        }

        Expr::Mul(u, v) => {
            let (n1, d1) = rational_form(u);
            let (n2, d2) = rational_form(v);
            (mul_opt(n1, n2), mul_opt(d1, d2))
        }

        Expr::Div(u, v) => {
            let (n1, d1) = rational_form(u);
            let (n2, d2) = rational_form(v);
            (mul_opt(n1, d2), mul_opt(d1, n2))
        }

        Expr::Pow(u, v) => match v.as_number() {
            Some(k) if k == 0.0 => (one(), one()),
            Some(k) => {
                let (n, d) = rational_form(u);
                if k > 0.0 {
                    (powi_opt(n, k), powi_opt(d, k))
                } else {
                    (powi_opt(d, -k), powi_opt(n, -k))
                }
            }
            None => (expr.clone(), one()),
        },

        Expr::FunctionCall { name, args } if args.len() == 1 => {
            let u = args[0].clone();
            let sin = || Expr::func("sin", u.clone());
            let cos = || Expr::func("cos", u.clone());
            match *name {
                "tan" => (sin(), cos()),
                "cot" => (cos(), sin()),
                "sec" => (one(), cos()),
                "csc" => (one(), sin()),
                _ => (expr.clone(), one()),
            }
        }

        _ => (expr.clone(), one()),
    }
}

/// `u^k` folding `1^k`
fn powi_opt(u: Expr, k: f64) -> Expr {
    if u.is_one_num() { u } else { powi(u, k) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile_expression;

    fn split(text: &str) -> (String, String) {
        let f = compile_expression(text).unwrap();
        let (n, d) = rational_form(f.expr());
        (n.to_string(), d.to_string())
    }

    #[test]
    fn test_plain_quotient() {
        assert_eq!(split("sin(x)/x"), ("sin(x)".to_string(), "x".to_string()));
        assert_eq!(
            split("(x^2 - 1)/(x - 1)"),
            ("x^2 - 1".to_string(), "x - 1".to_string())
        );
    }

    #[test]
    fn test_sum_over_common_denominator() {
        assert_eq!(
            split("1/x + 1/(x - 1)"),
            ("x - 1 + x".to_string(), "x * (x - 1)".to_string())
        );
    }

    #[test]
    fn test_negative_powers_invert() {
        assert_eq!(split("x^(-2)"), ("1".to_string(), "x^2".to_string()));
        assert_eq!(split("(1/x)^3"), ("1".to_string(), "x^3".to_string()));
    }

    #[test]
    fn test_trig_quotients() {
        assert_eq!(split("tan(x)"), ("sin(x)".to_string(), "cos(x)".to_string()));
        assert_eq!(split("csc(2*x)"), ("1".to_string(), "sin(2 * x)".to_string()));
    }

    #[test]
    fn test_opaque_functions() {
        assert_eq!(split("exp(1/x)"), ("exp(1 / x)".to_string(), "1".to_string()));
    }
}
