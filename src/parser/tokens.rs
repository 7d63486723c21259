use crate::Span;

/// Binary and unary operators recognised by the lexer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    /// `^` and `**`
    Pow,
}

impl Operator {
    /// Binding power for infix use
    pub(crate) fn precedence(&self) -> u8 {
        match self {
            Operator::Add | Operator::Sub => 10,
            Operator::Mul | Operator::Div | Operator::Rem => 20,
            Operator::Pow => 30,
        }
    }

    pub(crate) fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Rem => "%",
            Operator::Pow => "^",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Number(f64),
    Identifier(String),
    Operator(Operator),
    LeftParen,
    RightParen,
    Comma,
}

impl Token {
    /// Source-like rendering used in error messages
    pub(crate) fn to_user_string(&self) -> String {
        match self {
            Token::Number(n) => format!("{}", n),
            Token::Identifier(s) => s.clone(),
            Token::Operator(op) => op.symbol().to_string(),
            Token::LeftParen => "(".to_string(),
            Token::RightParen => ")".to_string(),
            Token::Comma => ",".to_string(),
        }
    }
}

/// A token together with its byte range in the input
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SpannedToken {
    pub token: Token,
    pub span: Span,
}
