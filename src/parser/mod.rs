//! Parser module - converts strings to AST
mod lexer;
mod pratt;
mod tokens;

use crate::{Expr, NumericError};

/// Parse a formula string into an expression AST
///
/// The grammar is plain infix arithmetic over the single variable `x`, the
/// constants `pi`, `e` and `tau`, and calls to allow-listed functions. Every
/// identifier is checked against the function registry while parsing, so a
/// successful parse is already a validated expression.
///
/// # Errors
/// Returns `NumericError` if:
/// - The input is empty
/// - The input contains a character or identifier outside the allow-list
/// - A function is called with the wrong number of arguments
/// - Parentheses are unbalanced or the expression is otherwise malformed
/// - Nesting exceeds `max_nesting`
pub(crate) fn parse(input: &str, max_nesting: usize) -> Result<Expr, NumericError> {
    // Pipeline: validate -> lex -> parse

    if input.trim().is_empty() {
        return Err(NumericError::EmptyExpression);
    }

    let tokens = lexer::lex(input)?;

    pratt::parse_expression(&tokens, max_nesting)
}
