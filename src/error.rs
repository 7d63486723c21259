use std::fmt;

use crate::roots::IterationRecord;

/// Source location span for error reporting
/// Represents a range of characters in the input string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start position (0-indexed byte offset)
    pub start: usize,
    /// End position (exclusive, 0-indexed byte offset)
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Create a span for a single position
    pub fn at(pos: usize) -> Self {
        Span {
            start: pos,
            end: pos + 1,
        }
    }

    /// Check if this span has valid location info
    pub fn is_valid(&self) -> bool {
        self.end > self.start
    }

    /// Format the span for display (1-indexed for users)
    pub fn display(&self) -> String {
        if !self.is_valid() {
            String::new()
        } else if self.end - self.start == 1 {
            format!(" at position {}", self.start + 1)
        } else {
            format!(" at positions {}-{}", self.start + 1, self.end)
        }
    }
}

/// Errors reported by the engine
///
/// Expression errors abort before any evaluation happens; request errors are
/// raised before an algorithm starts; `DerivativeNearZero` is the only fault an
/// algorithm raises mid-run and it carries the trace collected up to that point.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericError {
    // Expression errors
    EmptyExpression,
    InvalidSyntax {
        msg: String,
        span: Option<Span>,
    },
    InvalidNumber {
        value: String,
        span: Option<Span>,
    },
    InvalidToken {
        token: String,
        span: Option<Span>,
    },
    UnexpectedToken {
        expected: String,
        got: String,
        span: Option<Span>,
    },
    UnexpectedEndOfInput,
    UnknownIdentifier {
        name: String,
        span: Option<Span>,
    },
    UnknownFunction {
        name: String,
        span: Option<Span>,
    },
    ArityMismatch {
        name: String,
        expected: String,
        got: usize,
    },
    MaxDepthExceeded,
    MaxNodesExceeded,

    // Request errors
    DegenerateInterval {
        a: f64,
        b: f64,
    },
    InvalidParameter {
        name: &'static str,
        msg: String,
    },
    MissingExpression {
        role: &'static str,
        method: String,
    },
    UnknownMethod {
        name: String,
    },

    // Algorithm errors
    DerivativeNearZero {
        x: f64,
        derivative: f64,
        trace: Vec<IterationRecord>,
    },
}

impl NumericError {
    /// Create InvalidSyntax without span
    pub fn invalid_syntax(msg: impl Into<String>) -> Self {
        NumericError::InvalidSyntax {
            msg: msg.into(),
            span: None,
        }
    }

    /// Create InvalidSyntax with span
    pub fn invalid_syntax_at(msg: impl Into<String>, span: Span) -> Self {
        NumericError::InvalidSyntax {
            msg: msg.into(),
            span: Some(span),
        }
    }

    /// Create InvalidToken with span
    pub fn invalid_token_at(token: impl Into<String>, span: Span) -> Self {
        NumericError::InvalidToken {
            token: token.into(),
            span: Some(span),
        }
    }

    pub fn invalid_parameter(name: &'static str, msg: impl Into<String>) -> Self {
        NumericError::InvalidParameter {
            name,
            msg: msg.into(),
        }
    }

    /// True for every failure to turn text into a function
    pub fn is_invalid_expression(&self) -> bool {
        matches!(
            self,
            NumericError::EmptyExpression
                | NumericError::InvalidSyntax { .. }
                | NumericError::InvalidNumber { .. }
                | NumericError::InvalidToken { .. }
                | NumericError::UnexpectedToken { .. }
                | NumericError::UnexpectedEndOfInput
                | NumericError::UnknownIdentifier { .. }
                | NumericError::UnknownFunction { .. }
                | NumericError::ArityMismatch { .. }
                | NumericError::MaxDepthExceeded
                | NumericError::MaxNodesExceeded
        )
    }

    /// True when the caller supplied bad input (maps to a client error);
    /// false for faults raised while an algorithm was running
    pub fn is_input_error(&self) -> bool {
        !matches!(self, NumericError::DerivativeNearZero { .. })
    }

    /// Iteration trace attached to the error, if any
    pub fn trace(&self) -> Option<&[IterationRecord]> {
        match self {
            NumericError::DerivativeNearZero { trace, .. } => Some(trace),
            _ => None,
        }
    }
}

fn span_suffix(span: &Option<Span>) -> String {
    span.map_or(String::new(), |s| s.display())
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::EmptyExpression => write!(f, "Expression cannot be empty"),
            NumericError::InvalidSyntax { msg, span } => {
                write!(f, "Invalid syntax: {}{}", msg, span_suffix(span))
            }
            NumericError::InvalidNumber { value, span } => {
                write!(f, "Invalid number format: '{}'{}", value, span_suffix(span))
            }
            NumericError::InvalidToken { token, span } => {
                write!(f, "Invalid token: '{}'{}", token, span_suffix(span))
            }
            NumericError::UnexpectedToken {
                expected,
                got,
                span,
            } => {
                write!(
                    f,
                    "Expected '{}', but got '{}'{}",
                    expected,
                    got,
                    span_suffix(span)
                )
            }
            NumericError::UnexpectedEndOfInput => write!(f, "Unexpected end of input"),
            NumericError::UnknownIdentifier { name, span } => {
                write!(
                    f,
                    "Name not allowed in expression: '{}'{} (only 'x' and the constants pi, e, tau are available)",
                    name,
                    span_suffix(span)
                )
            }
            NumericError::UnknownFunction { name, span } => {
                write!(f, "Function not allowed: '{}'{}", name, span_suffix(span))
            }
            NumericError::ArityMismatch {
                name,
                expected,
                got,
            } => {
                write!(
                    f,
                    "Function '{}' expects {} argument(s), got {}",
                    name, expected, got
                )
            }
            NumericError::MaxDepthExceeded => {
                write!(f, "Expression nesting depth exceeds maximum limit")
            }
            NumericError::MaxNodesExceeded => {
                write!(f, "Expression size exceeds maximum node count limit")
            }
            NumericError::DegenerateInterval { a, b } => {
                write!(f, "Interval bounds must differ (a = {}, b = {})", a, b)
            }
            NumericError::InvalidParameter { name, msg } => {
                write!(f, "Invalid parameter '{}': {}", name, msg)
            }
            NumericError::MissingExpression { role, method } => {
                write!(f, "{} is required for method '{}'", role, method)
            }
            NumericError::UnknownMethod { name } => write!(f, "Unknown method: '{}'", name),
            NumericError::DerivativeNearZero { x, derivative, .. } => {
                write!(
                    f,
                    "Derivative too close to zero at x = {} (f'(x) = {:e}); Newton's method cannot continue",
                    x, derivative
                )
            }
        }
    }
}

impl std::error::Error for NumericError {}

/// Fault raised while evaluating a compiled expression at a single point
///
/// The safe evaluator absorbs these; algorithms never see them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalFault {
    DivisionByZero,
    Domain { function: &'static str },
    NonFinite,
}

impl fmt::Display for EvalFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalFault::DivisionByZero => write!(f, "division by zero"),
            EvalFault::Domain { function } => write!(f, "math domain error in {}", function),
            EvalFault::NonFinite => write!(f, "non-finite result"),
        }
    }
}

impl std::error::Error for EvalFault {}
