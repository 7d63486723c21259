// Display formatting for AST
use crate::Expr;
use std::fmt;

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => {
                if n.is_nan() {
                    write!(f, "NaN")
                } else if n.is_infinite() {
                    if *n > 0.0 {
                        write!(f, "Infinity")
                    } else {
                        write!(f, "-Infinity")
                    }
                } else if n.fract() == 0.0 && n.abs() < 1e10 {
                    // Display as integer if no fractional part
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }

            Expr::Variable => write!(f, "{}", crate::ast::VARIABLE),

            Expr::Constant(c) => write!(f, "{}", c.name()),

            Expr::Neg(inner) => write!(f, "-{}", format_mul_operand(inner)),

            Expr::FunctionCall { name, args } => {
                let args_str: Vec<String> = args.iter().map(|arg| format!("{}", arg)).collect();
                write!(f, "{}({})", name, args_str.join(", "))
            }

            Expr::Add(u, v) => write!(f, "{} + {}", u, v),

            Expr::Sub(u, v) => {
                // Parenthesize RHS when it's an addition or subtraction to preserve
                // the intended grouping: `a - (b + c)` instead of `a - b + c`.
                let right_str = match &**v {
                    Expr::Add(_, _) | Expr::Sub(_, _) => format!("({})", v),
                    _ => format!("{}", v),
                };
                write!(f, "{} - {}", u, right_str)
            }

            Expr::Mul(u, v) => {
                write!(f, "{} * {}", format_mul_operand(u), format_mul_operand(v))
            }

            Expr::Div(u, v) | Expr::Rem(u, v) => {
                let op = if matches!(self, Expr::Div(_, _)) {
                    "/"
                } else {
                    "%"
                };
                // Add parentheses around denominator if it's not a simple identifier, number, power, or function
                let formatted_denom = match **v {
                    Expr::Variable
                    | Expr::Number(_)
                    | Expr::Constant(_)
                    | Expr::Pow(_, _)
                    | Expr::FunctionCall { .. } => format!("{}", v),
                    _ => format!("({})", v),
                };
                write!(f, "{} {} {}", format_mul_operand(u), op, formatted_denom)
            }

            Expr::Pow(u, v) => {
                // Mul and Div bases must be parenthesized: (C * R)^2, not C * R^2
                let formatted_base = match **u {
                    Expr::Add(_, _)
                    | Expr::Sub(_, _)
                    | Expr::Mul(_, _)
                    | Expr::Div(_, _)
                    | Expr::Rem(_, _)
                    | Expr::Neg(_)
                    | Expr::Pow(_, _) => format!("({})", u),
                    Expr::Number(n) if n < 0.0 => format!("({})", u),
                    _ => format!("{}", u),
                };

                let formatted_exp = match **v {
                    Expr::Number(n) if n >= 0.0 => format!("{}", v),
                    Expr::Variable | Expr::Constant(_) => format!("{}", v),
                    _ => format!("({})", v),
                };
                write!(f, "{}^{}", formatted_base, formatted_exp)
            }
        }
    }
}

/// Format operand for multiplication to minimize parentheses
fn format_mul_operand(expr: &Expr) -> String {
    match expr {
        Expr::Add(_, _) | Expr::Sub(_, _) => format!("({})", expr),
        _ => format!("{}", expr),
    }
}
