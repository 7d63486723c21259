//! Mathematical function definitions for the function registry
//!
//! Contains evaluation and symbolic differentiation rules for every function an
//! expression may call. Evaluation follows real-valued semantics: arguments
//! outside the real domain (`sqrt(-1)`, `log(0)`, `asin(2)`) evaluate to `None`
//! instead of NaN so the evaluator can report a domain fault.

use super::registry::FunctionDefinition;
use super::{add_opt, div_opt, mul_opt, neg, powi, sub_opt};
use crate::Expr;
use crate::ast::Constant;
use crate::differentiation::power_rule;

fn call(name: &'static str, u: &Expr) -> Expr {
    Expr::func(name, u.clone())
}

/// `sqrt(1 - u^2)`
fn sqrt_one_minus_sq(u: &Expr) -> Expr {
    Expr::func("sqrt", Expr::sub_expr(Expr::number(1.0), powi(u.clone(), 2.0)))
}

fn real(v: f64) -> Option<f64> {
    (!v.is_nan()).then_some(v)
}

/// Return all function definitions for populating the registry
pub(crate) fn all_definitions() -> Vec<FunctionDefinition> {
    vec![
        // Trigonometric
        FunctionDefinition {
            name: "sin",
            arity: 1..=1,
            eval: |args| real(args[0].sin()),
            derivative: |args, primes| {
                // d/dx sin(u) = cos(u) * u'
                mul_opt(call("cos", &args[0]), primes[0].clone())
            },
        },
        FunctionDefinition {
            name: "cos",
            arity: 1..=1,
            eval: |args| real(args[0].cos()),
            derivative: |args, primes| {
                // d/dx cos(u) = -sin(u) * u'
                mul_opt(neg(call("sin", &args[0])), primes[0].clone())
            },
        },
        FunctionDefinition {
            name: "tan",
            arity: 1..=1,
            eval: |args| real(args[0].tan()),
            derivative: |args, primes| {
                // d/dx tan(u) = sec^2(u) * u'
                mul_opt(powi(call("sec", &args[0]), 2.0), primes[0].clone())
            },
        },
        FunctionDefinition {
            name: "sec",
            arity: 1..=1,
            eval: |args| real(1.0 / args[0].cos()),
            derivative: |args, primes| {
                // d/dx sec(u) = sec(u)tan(u) * u'
                mul_opt(
                    Expr::mul_expr(call("sec", &args[0]), call("tan", &args[0])),
                    primes[0].clone(),
                )
            },
        },
        FunctionDefinition {
            name: "csc",
            arity: 1..=1,
            eval: |args| real(1.0 / args[0].sin()),
            derivative: |args, primes| {
                // d/dx csc(u) = -csc(u)cot(u) * u'
                mul_opt(
                    neg(Expr::mul_expr(call("csc", &args[0]), call("cot", &args[0]))),
                    primes[0].clone(),
                )
            },
        },
        FunctionDefinition {
            name: "cot",
            arity: 1..=1,
            eval: |args| real(1.0 / args[0].tan()),
            derivative: |args, primes| {
                // d/dx cot(u) = -csc^2(u) * u'
                mul_opt(neg(powi(call("csc", &args[0]), 2.0)), primes[0].clone())
            },
        },
        // Inverse trigonometric
        FunctionDefinition {
            name: "asin",
            arity: 1..=1,
            eval: |args| (args[0].abs() <= 1.0).then(|| args[0].asin()),
            derivative: |args, primes| div_opt(primes[0].clone(), sqrt_one_minus_sq(&args[0])),
        },
        FunctionDefinition {
            name: "acos",
            arity: 1..=1,
            eval: |args| (args[0].abs() <= 1.0).then(|| args[0].acos()),
            derivative: |args, primes| {
                div_opt(neg(primes[0].clone()), sqrt_one_minus_sq(&args[0]))
            },
        },
        FunctionDefinition {
            name: "atan",
            arity: 1..=1,
            eval: |args| real(args[0].atan()),
            derivative: |args, primes| {
                // d/dx atan(u) = u' / (1 + u^2)
                div_opt(
                    primes[0].clone(),
                    Expr::add_expr(Expr::number(1.0), powi(args[0].clone(), 2.0)),
                )
            },
        },
        FunctionDefinition {
            name: "atan2",
            arity: 2..=2,
            eval: |args| real(args[0].atan2(args[1])),
            derivative: |args, primes| {
                // d/dx atan2(y, x) = (x*y' - y*x') / (x^2 + y^2)
                let (y, x) = (&args[0], &args[1]);
                div_opt(
                    sub_opt(
                        mul_opt(x.clone(), primes[0].clone()),
                        mul_opt(y.clone(), primes[1].clone()),
                    ),
                    Expr::add_expr(powi(x.clone(), 2.0), powi(y.clone(), 2.0)),
                )
            },
        },
        // Hyperbolic
        FunctionDefinition {
            name: "sinh",
            arity: 1..=1,
            eval: |args| real(args[0].sinh()),
            derivative: |args, primes| mul_opt(call("cosh", &args[0]), primes[0].clone()),
        },
        FunctionDefinition {
            name: "cosh",
            arity: 1..=1,
            eval: |args| real(args[0].cosh()),
            derivative: |args, primes| mul_opt(call("sinh", &args[0]), primes[0].clone()),
        },
        FunctionDefinition {
            name: "tanh",
            arity: 1..=1,
            eval: |args| real(args[0].tanh()),
            derivative: |args, primes| {
                // d/dx tanh(u) = (1 - tanh^2(u)) * u'
                mul_opt(
                    Expr::sub_expr(Expr::number(1.0), powi(call("tanh", &args[0]), 2.0)),
                    primes[0].clone(),
                )
            },
        },
        FunctionDefinition {
            name: "asinh",
            arity: 1..=1,
            eval: |args| real(args[0].asinh()),
            derivative: |args, primes| {
                div_opt(
                    primes[0].clone(),
                    Expr::func(
                        "sqrt",
                        Expr::add_expr(powi(args[0].clone(), 2.0), Expr::number(1.0)),
                    ),
                )
            },
        },
        FunctionDefinition {
            name: "acosh",
            arity: 1..=1,
            eval: |args| (args[0] >= 1.0).then(|| args[0].acosh()),
            derivative: |args, primes| {
                div_opt(
                    primes[0].clone(),
                    Expr::func(
                        "sqrt",
                        Expr::sub_expr(powi(args[0].clone(), 2.0), Expr::number(1.0)),
                    ),
                )
            },
        },
        FunctionDefinition {
            name: "atanh",
            arity: 1..=1,
            eval: |args| (args[0].abs() < 1.0).then(|| args[0].atanh()),
            derivative: |args, primes| {
                div_opt(
                    primes[0].clone(),
                    Expr::sub_expr(Expr::number(1.0), powi(args[0].clone(), 2.0)),
                )
            },
        },
        // Exponential and logarithmic
        FunctionDefinition {
            name: "exp",
            arity: 1..=1,
            eval: |args| real(args[0].exp()),
            derivative: |args, primes| mul_opt(call("exp", &args[0]), primes[0].clone()),
        },
        FunctionDefinition {
            name: "expm1",
            arity: 1..=1,
            eval: |args| real(args[0].exp_m1()),
            derivative: |args, primes| mul_opt(call("exp", &args[0]), primes[0].clone()),
        },
        FunctionDefinition {
            name: "log",
            arity: 1..=2,
            eval: |args| {
                let u = args[0];
                if u <= 0.0 {
                    return None;
                }
                match args.get(1) {
                    None => Some(u.ln()),
                    Some(&base) if base > 0.0 && base != 1.0 => Some(u.ln() / base.ln()),
                    Some(_) => None,
                }
            },
            derivative: |args, primes| {
                if args.len() == 1 {
                    return div_opt(primes[0].clone(), args[0].clone());
                }
                // log(u, b) = ln(u) / ln(b)
                // d/dx = (u'/u * ln(b) - ln(u) * b'/b) / ln(b)^2
                let (u, b) = (&args[0], &args[1]);
                let ln_b = call("ln", b);
                div_opt(
                    sub_opt(
                        mul_opt(div_opt(primes[0].clone(), u.clone()), ln_b.clone()),
                        mul_opt(call("ln", u), div_opt(primes[1].clone(), b.clone())),
                    ),
                    powi(ln_b, 2.0),
                )
            },
        },
        FunctionDefinition {
            name: "ln",
            arity: 1..=1,
            eval: |args| (args[0] > 0.0).then(|| args[0].ln()),
            derivative: |args, primes| div_opt(primes[0].clone(), args[0].clone()),
        },
        FunctionDefinition {
            name: "log10",
            arity: 1..=1,
            eval: |args| (args[0] > 0.0).then(|| args[0].log10()),
            derivative: |args, primes| {
                div_opt(
                    primes[0].clone(),
                    mul_opt(args[0].clone(), Expr::number(std::f64::consts::LN_10)),
                )
            },
        },
        FunctionDefinition {
            name: "log2",
            arity: 1..=1,
            eval: |args| (args[0] > 0.0).then(|| args[0].log2()),
            derivative: |args, primes| {
                div_opt(
                    primes[0].clone(),
                    mul_opt(args[0].clone(), Expr::number(std::f64::consts::LN_2)),
                )
            },
        },
        FunctionDefinition {
            name: "log1p",
            arity: 1..=1,
            eval: |args| (args[0] > -1.0).then(|| args[0].ln_1p()),
            derivative: |args, primes| {
                div_opt(
                    primes[0].clone(),
                    add_opt(Expr::number(1.0), args[0].clone()),
                )
            },
        },
        // Roots and powers
        FunctionDefinition {
            name: "sqrt",
            arity: 1..=1,
            eval: |args| (args[0] >= 0.0).then(|| args[0].sqrt()),
            derivative: |args, primes| {
                // d/dx sqrt(u) = u' / (2 * sqrt(u))
                div_opt(
                    primes[0].clone(),
                    Expr::mul_expr(Expr::number(2.0), call("sqrt", &args[0])),
                )
            },
        },
        FunctionDefinition {
            name: "cbrt",
            arity: 1..=1,
            eval: |args| real(args[0].cbrt()),
            derivative: |args, primes| {
                // d/dx cbrt(u) = u' / (3 * cbrt(u)^2)
                div_opt(
                    primes[0].clone(),
                    Expr::mul_expr(Expr::number(3.0), powi(call("cbrt", &args[0]), 2.0)),
                )
            },
        },
        FunctionDefinition {
            name: "pow",
            arity: 2..=2,
            eval: |args| crate::compiler::real_pow(args[0], args[1]).ok(),
            derivative: |args, primes| power_rule(&args[0], &args[1], &primes[0], &primes[1]),
        },
        FunctionDefinition {
            name: "hypot",
            arity: 2..=2,
            eval: |args| real(args[0].hypot(args[1])),
            derivative: |args, primes| {
                // d/dx hypot(u, v) = (u*u' + v*v') / hypot(u, v)
                div_opt(
                    add_opt(
                        mul_opt(args[0].clone(), primes[0].clone()),
                        mul_opt(args[1].clone(), primes[1].clone()),
                    ),
                    Expr::func_multi("hypot", args.to_vec()),
                )
            },
        },
        FunctionDefinition {
            name: "abs",
            arity: 1..=1,
            eval: |args| Some(args[0].abs()),
            derivative: abs_derivative,
        },
        FunctionDefinition {
            name: "fabs",
            arity: 1..=1,
            eval: |args| Some(args[0].abs()),
            derivative: abs_derivative,
        },
        // Piecewise constant: derivative is zero almost everywhere
        FunctionDefinition {
            name: "floor",
            arity: 1..=1,
            eval: |args| Some(args[0].floor()),
            derivative: |_, _| Expr::number(0.0),
        },
        FunctionDefinition {
            name: "ceil",
            arity: 1..=1,
            eval: |args| Some(args[0].ceil()),
            derivative: |_, _| Expr::number(0.0),
        },
        FunctionDefinition {
            name: "trunc",
            arity: 1..=1,
            eval: |args| Some(args[0].trunc()),
            derivative: |_, _| Expr::number(0.0),
        },
        // Angle conversion
        FunctionDefinition {
            name: "degrees",
            arity: 1..=1,
            eval: |args| Some(args[0].to_degrees()),
            derivative: |_, primes| {
                mul_opt(
                    Expr::div_expr(Expr::number(180.0), Expr::Constant(Constant::Pi)),
                    primes[0].clone(),
                )
            },
        },
        FunctionDefinition {
            name: "radians",
            arity: 1..=1,
            eval: |args| Some(args[0].to_radians()),
            derivative: |_, primes| {
                mul_opt(
                    Expr::div_expr(Expr::Constant(Constant::Pi), Expr::number(180.0)),
                    primes[0].clone(),
                )
            },
        },
    ]
}

/// d/dx |u| = u / |u| * u'
fn abs_derivative(args: &[Expr], primes: &[Expr]) -> Expr {
    mul_opt(
        Expr::div_expr(args[0].clone(), call("abs", &args[0])),
        primes[0].clone(),
    )
}
