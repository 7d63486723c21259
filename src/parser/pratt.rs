use crate::ast::{Constant, VARIABLE};
use crate::functions::registry::Registry;
use crate::parser::tokens::{Operator, SpannedToken, Token};
use crate::{Expr, NumericError, Span};

/// Binding power of unary `+`/`-`: above `* / %`, below `^`
const UNARY_PRECEDENCE: u8 = 25;

/// Parse tokens into an AST using Pratt parsing algorithm
///
/// `max_nesting` bounds the recursion depth of the parser itself so that
/// pathological inputs like `((((...))))` fail cleanly.
pub(crate) fn parse_expression(
    tokens: &[SpannedToken],
    max_nesting: usize,
) -> Result<Expr, NumericError> {
    if tokens.is_empty() {
        return Err(NumericError::UnexpectedEndOfInput);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        nesting: 0,
        max_nesting,
    };

    let expr = parser.parse_expr(0)?;

    // Anything left over means the expression ended early, e.g. `x 2` or `x)`
    if let Some(extra) = parser.current() {
        return Err(NumericError::UnexpectedToken {
            expected: "operator or end of input".to_string(),
            got: extra.token.to_user_string(),
            span: Some(extra.span),
        });
    }

    Ok(expr)
}

struct Parser<'a> {
    tokens: &'a [SpannedToken],
    pos: usize,
    nesting: usize,
    max_nesting: usize,
}

impl<'a> Parser<'a> {
    fn current(&self) -> Option<&'a SpannedToken> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn unexpected(&self, expected: &str) -> NumericError {
        match self.current() {
            Some(t) => NumericError::UnexpectedToken {
                expected: expected.to_string(),
                got: t.token.to_user_string(),
                span: Some(t.span),
            },
            None => NumericError::UnexpectedEndOfInput,
        }
    }

    fn expect_right_paren(&mut self) -> Result<(), NumericError> {
        match self.current() {
            Some(SpannedToken {
                token: Token::RightParen,
                ..
            }) => {
                self.advance();
                Ok(())
            }
            _ => Err(self.unexpected(")")),
        }
    }

    fn parse_expr(&mut self, min_precedence: u8) -> Result<Expr, NumericError> {
        self.nesting += 1;
        if self.nesting > self.max_nesting {
            return Err(NumericError::MaxDepthExceeded);
        }

        // Parse left side (prefix)
        let mut left = self.parse_prefix()?;

        // Parse operators and right side (infix)
        while let Some(SpannedToken {
            token: Token::Operator(op),
            ..
        }) = self.current()
        {
            let precedence = op.precedence();
            if precedence < min_precedence {
                break;
            }
            self.advance();

            // Right associative for power, left for others
            let next_precedence = if *op == Operator::Pow {
                precedence
            } else {
                precedence + 1
            };
            let right = self.parse_expr(next_precedence)?;

            left = match op {
                Operator::Add => Expr::add_expr(left, right),
                Operator::Sub => Expr::sub_expr(left, right),
                Operator::Mul => Expr::mul_expr(left, right),
                Operator::Div => Expr::div_expr(left, right),
                Operator::Rem => Expr::rem_expr(left, right),
                Operator::Pow => Expr::pow(left, right),
            };
        }

        self.nesting -= 1;
        Ok(left)
    }

    fn parse_arguments(&mut self) -> Result<Vec<Expr>, NumericError> {
        let mut args = Vec::new();

        if let Some(SpannedToken {
            token: Token::RightParen,
            ..
        }) = self.current()
        {
            return Ok(args); // Empty argument list
        }

        loop {
            args.push(self.parse_expr(0)?);

            match self.current().map(|t| &t.token) {
                Some(Token::Comma) => self.advance(),
                Some(Token::RightParen) => break,
                _ => return Err(self.unexpected(", or )")),
            }
        }

        Ok(args)
    }

    fn parse_prefix(&mut self) -> Result<Expr, NumericError> {
        let spanned = self.current().ok_or(NumericError::UnexpectedEndOfInput)?;

        match &spanned.token {
            Token::Number(n) => {
                self.advance();
                Ok(Expr::number(*n))
            }

            Token::Identifier(name) => {
                self.advance();
                let is_call = matches!(
                    self.current(),
                    Some(SpannedToken {
                        token: Token::LeftParen,
                        ..
                    })
                );
                if is_call {
                    self.advance(); // consume (
                    self.parse_call(name, spanned.span)
                } else {
                    resolve_name(name, spanned.span)
                }
            }

            // Unary minus: -x^2 parses as -(x^2)
            Token::Operator(Operator::Sub) => {
                self.advance();
                let expr = self.parse_expr(UNARY_PRECEDENCE)?;
                Ok(match expr {
                    Expr::Number(n) => Expr::number(-n),
                    other => Expr::neg(other),
                })
            }

            Token::Operator(Operator::Add) => {
                self.advance();
                self.parse_expr(UNARY_PRECEDENCE)
            }

            Token::LeftParen => {
                self.advance(); // consume (
                let expr = self.parse_expr(0)?;
                self.expect_right_paren()?;
                Ok(expr)
            }

            _ => Err(self.unexpected("expression")),
        }
    }

    /// Parse `name(args...)` after the opening parenthesis
    fn parse_call(&mut self, name: &str, span: Span) -> Result<Expr, NumericError> {
        let Some(def) = Registry::get(name) else {
            return Err(NumericError::UnknownFunction {
                name: name.to_string(),
                span: Some(span),
            });
        };

        let args = self.parse_arguments()?;
        self.expect_right_paren()?;

        if !def.validate_arity(args.len()) {
            return Err(NumericError::ArityMismatch {
                name: def.name.to_string(),
                expected: def.arity_description(),
                got: args.len(),
            });
        }

        Ok(Expr::func_multi(def.name, args))
    }
}

/// Resolve a bare identifier: the variable or a named constant
fn resolve_name(name: &str, span: Span) -> Result<Expr, NumericError> {
    if name == VARIABLE {
        return Ok(Expr::var());
    }
    if let Some(c) = Constant::from_name(name) {
        return Ok(Expr::Constant(c));
    }
    if Registry::get(name).is_some() {
        return Err(NumericError::invalid_syntax_at(
            format!("function '{}' must be called with arguments", name),
            span,
        ));
    }
    Err(NumericError::UnknownIdentifier {
        name: name.to_string(),
        span: Some(span),
    })
}
