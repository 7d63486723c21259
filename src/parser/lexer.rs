use super::tokens::{Operator, SpannedToken, Token};
use crate::{NumericError, Span};

/// Split the input into tokens
///
/// Recognises decimal and scientific number literals, ASCII identifiers,
/// the operators `+ - * / % ^ **`, parentheses and commas. Any other
/// character is rejected with its position.
pub(crate) fn lex(input: &str) -> Result<Vec<SpannedToken>, NumericError> {
    let bytes = input.as_bytes();
    // Rough heuristic: one token per two bytes
    let mut tokens = Vec::with_capacity(input.len() / 2 + 1);
    let mut pos = 0;

    while pos < bytes.len() {
        let c = bytes[pos];

        if c.is_ascii_whitespace() {
            pos += 1;
            continue;
        }

        let start = pos;
        let token = match c {
            b'0'..=b'9' | b'.' => {
                pos = scan_number(bytes, pos);
                let text = &input[start..pos];
                let value = text
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| NumericError::InvalidNumber {
                        value: text.to_string(),
                        span: Some(Span::new(start, pos)),
                    })?;
                Token::Number(value)
            }
            c if c.is_ascii_alphabetic() || c == b'_' => {
                while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_')
                {
                    pos += 1;
                }
                Token::Identifier(input[start..pos].to_string())
            }
            b'*' if bytes.get(pos + 1) == Some(&b'*') => {
                pos += 2;
                Token::Operator(Operator::Pow)
            }
            _ => {
                let token = match c {
                    b'+' => Token::Operator(Operator::Add),
                    b'-' => Token::Operator(Operator::Sub),
                    b'*' => Token::Operator(Operator::Mul),
                    b'/' => Token::Operator(Operator::Div),
                    b'%' => Token::Operator(Operator::Rem),
                    b'^' => Token::Operator(Operator::Pow),
                    b'(' => Token::LeftParen,
                    b')' => Token::RightParen,
                    b',' => Token::Comma,
                    _ => {
                        let ch = input[start..].chars().next().unwrap_or('?');
                        return Err(NumericError::invalid_token_at(
                            ch.to_string(),
                            Span::new(start, start + ch.len_utf8()),
                        ));
                    }
                };
                pos += 1;
                token
            }
        };

        tokens.push(SpannedToken {
            token,
            span: Span::new(start, pos),
        });
    }

    Ok(tokens)
}

/// Advance over `digits [. digits] [e|E [+|-] digits]`
fn scan_number(bytes: &[u8], mut pos: usize) -> usize {
    let digits = |bytes: &[u8], mut p: usize| {
        while p < bytes.len() && bytes[p].is_ascii_digit() {
            p += 1;
        }
        p
    };

    pos = digits(bytes, pos);
    // Extra dots stay inside the literal so `1.2.3` is reported as one bad number
    while bytes.get(pos) == Some(&b'.') {
        pos = digits(bytes, pos + 1);
    }

    // Only consume an exponent marker when digits follow, so `2e` stays `2` `e`
    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        let mut p = pos + 1;
        if matches!(bytes.get(p), Some(b'+' | b'-')) {
            p += 1;
        }
        if bytes.get(p).is_some_and(u8::is_ascii_digit) {
            pos = digits(bytes, p);
        }
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<Token> {
        lex(input)
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    #[test]
    fn test_lex_numbers() {
        assert_eq!(kinds("3.5"), vec![Token::Number(3.5)]);
        assert_eq!(kinds(".5"), vec![Token::Number(0.5)]);
        assert_eq!(kinds("1e-3"), vec![Token::Number(1e-3)]);
        assert_eq!(kinds("2E+2"), vec![Token::Number(200.0)]);
    }

    #[test]
    fn test_exponent_marker_without_digits() {
        assert_eq!(
            kinds("2e"),
            vec![Token::Number(2.0), Token::Identifier("e".to_string())]
        );
    }

    #[test]
    fn test_lex_power_operators() {
        assert_eq!(kinds("x**2"), kinds("x^2"));
        assert_eq!(
            kinds("x^2"),
            vec![
                Token::Identifier("x".to_string()),
                Token::Operator(Operator::Pow),
                Token::Number(2.0)
            ]
        );
    }

    #[test]
    fn test_spans() {
        let tokens = lex("sin( x )").unwrap();
        assert_eq!(tokens[0].span, Span::new(0, 3));
        assert_eq!(tokens[2].span, Span::new(5, 6));
    }

    #[test]
    fn test_invalid_character() {
        let err = lex("x $ 2").unwrap_err();
        assert_eq!(
            err,
            NumericError::InvalidToken {
                token: "$".to_string(),
                span: Some(Span::at(2)),
            }
        );
        assert!(lex("x[0]").is_err());
        assert!(lex("x; 1").is_err());
    }

    #[test]
    fn test_invalid_number() {
        assert!(matches!(
            lex("1.2.3"),
            Err(NumericError::InvalidNumber { .. })
        ));
        assert!(matches!(lex("."), Err(NumericError::InvalidNumber { .. })));
    }
}
