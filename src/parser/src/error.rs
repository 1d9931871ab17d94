use std::fmt::{Display, Formatter};

/// A parse failure, always carrying the 1-based line/column where it was
/// detected, plus a concise message describing what went wrong.
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub col: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, line: usize, col: usize) -> Self {
        ParseError {
            message: message.into(),
            line,
            col,
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ParseError: {} (line {}, column {})",
            self.message, self.line, self.col
        )
    }
}

impl std::error::Error for ParseError {}
