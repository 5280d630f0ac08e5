use std::fmt;

/// A rejected query token.
///
/// Never escapes the crate's public `find` API: a token that fails to parse
/// becomes [`QueryToken::Invalid`](crate::QueryToken::Invalid) and matches nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub offset: usize,
    pub message: String,
}

impl ParseError {
    pub(crate) fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "query error at byte {}: {}", self.offset, self.message)
    }
}

impl std::error::Error for ParseError {}
