//! Query tokens.
//!
//! ```text
//! name-token := NAME ( "[" INT? ":" INT? "]" )?
//! prop-token := "(" ("@"|"@@") IDENT OP LITERAL ")" ( "[" INT? ":" INT? "]" )?
//! OP         := "==" | "!=" | "<=" | ">=" | "<" | ">"
//! ```

use std::cmp::Ordering;
use std::fmt;

use glint_core::NodeHandle;

use crate::error::ParseError;
use crate::source::QuerySource;

/// Comparison operator of a property predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    #[must_use]
    pub fn holds(self, ordering: Ordering) -> bool {
        match self {
            Self::Eq => ordering == Ordering::Equal,
            Self::Ne => ordering != Ordering::Equal,
            Self::Lt => ordering == Ordering::Less,
            Self::Le => ordering != Ordering::Greater,
            Self::Gt => ordering == Ordering::Greater,
            Self::Ge => ordering != Ordering::Less,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

/// Collection slice suffix `[start:end]`.
///
/// Accepted by the grammar and preserved on the token. It marks the token
/// as a collection token but does not truncate matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Slice {
    pub start: Option<i64>,
    pub end: Option<i64>,
}

/// One parsed query step descriptor. Tokens are stateless.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryToken {
    /// Matches nodes whose name equals `name`.
    Name { name: String, slice: Option<Slice> },
    /// Matches nodes whose `property` compares to `literal` under `op`.
    Property {
        property: String,
        op: CompareOp,
        literal: String,
        slice: Option<Slice>,
        /// Set by the `@@` prefix. Parsed and kept, evaluated like `@`.
        search_all: bool,
    },
    /// A token that failed to parse. Matches nothing.
    Invalid,
}

impl QueryToken {
    /// Parses a single token, reporting offsets relative to `base`.
    pub fn parse(text: &str, base: usize) -> Result<Self, ParseError> {
        let mut cursor = Cursor { text, pos: 0, base };
        let token = if cursor.peek() == Some('(') {
            cursor.parse_property()?
        } else {
            cursor.parse_name()?
        };
        if let Some(c) = cursor.peek() {
            return Err(cursor.error(format!("unexpected '{c}' after token")));
        }
        Ok(token)
    }

    /// Parses a token, degrading to [`QueryToken::Invalid`] on failure.
    #[must_use]
    pub fn parse_lenient(text: &str, base: usize) -> Self {
        Self::parse(text, base).unwrap_or_else(|err| {
            log::debug!("Rejected query token {text:?}: {err}");
            Self::Invalid
        })
    }

    #[must_use]
    pub fn slice(&self) -> Option<Slice> {
        match self {
            Self::Name { slice, .. } | Self::Property { slice, .. } => *slice,
            Self::Invalid => None,
        }
    }

    #[must_use]
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid)
    }

    /// Tests `node` against this token.
    pub fn matches<S: QuerySource + ?Sized>(&self, source: &S, node: NodeHandle) -> bool {
        match self {
            Self::Name { name, .. } => source.node_name(node) == Some(name.as_str()),
            Self::Property {
                property,
                op,
                literal,
                ..
            } => {
                let Some(value) = source.node_property(node, property) else {
                    return false;
                };
                let Some(expected) = value.coerce_literal(literal) else {
                    return false;
                };
                value
                    .compare(&expected)
                    .is_some_and(|ordering| op.holds(ordering))
            }
            Self::Invalid => false,
        }
    }
}

impl fmt::Display for QueryToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slice = match self {
            Self::Name { name, slice } => {
                f.write_str(name)?;
                slice
            }
            Self::Property {
                property,
                op,
                literal,
                slice,
                search_all,
            } => {
                let at = if *search_all { "@@" } else { "@" };
                write!(f, "({at}{property}{}{literal})", op.as_str())?;
                slice
            }
            Self::Invalid => return f.write_str("<invalid>"),
        };
        if let Some(s) = slice {
            f.write_str("[")?;
            if let Some(start) = s.start {
                write!(f, "{start}")?;
            }
            f.write_str(":")?;
            if let Some(end) = s.end {
                write!(f, "{end}")?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}

struct Cursor<'a> {
    text: &'a str,
    pos: usize,
    base: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn consume(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        if self.consume(expected) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{expected}'")))
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(self.base + self.pos, message)
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
        let text = self.text;
        &text[start..self.pos]
    }

    fn parse_name(&mut self) -> Result<QueryToken, ParseError> {
        let name = self.take_while(is_name_char).to_owned();
        if name.is_empty() {
            return Err(self.error("expected a node name"));
        }
        let slice = self.parse_slice()?;
        Ok(QueryToken::Name { name, slice })
    }

    fn parse_property(&mut self) -> Result<QueryToken, ParseError> {
        self.expect('(')?;
        self.skip_whitespace();
        self.expect('@')?;
        let search_all = self.consume('@');

        let property = self.take_while(|c| c.is_ascii_alphanumeric() || c == '_').to_owned();
        if property.is_empty() || property.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(self.error("expected a property name"));
        }

        self.skip_whitespace();
        let op = self.parse_op()?;
        self.skip_whitespace();
        let literal = self.parse_literal()?;
        self.skip_whitespace();
        self.expect(')')?;

        let slice = self.parse_slice()?;
        Ok(QueryToken::Property {
            property,
            op,
            literal,
            slice,
            search_all,
        })
    }

    fn parse_op(&mut self) -> Result<CompareOp, ParseError> {
        let rest = &self.text[self.pos..];
        let (op, len) = if rest.starts_with("==") {
            (CompareOp::Eq, 2)
        } else if rest.starts_with("!=") {
            (CompareOp::Ne, 2)
        } else if rest.starts_with("<=") {
            (CompareOp::Le, 2)
        } else if rest.starts_with(">=") {
            (CompareOp::Ge, 2)
        } else if rest.starts_with('<') {
            (CompareOp::Lt, 1)
        } else if rest.starts_with('>') {
            (CompareOp::Gt, 1)
        } else {
            return Err(self.error("expected a comparison operator"));
        };
        self.pos += len;
        Ok(op)
    }

    fn parse_literal(&mut self) -> Result<String, ParseError> {
        if let Some(q @ ('"' | '\'')) = self.peek() {
            self.bump();
            let value = self.take_while(|c| c != q).to_owned();
            self.expect(q)?;
            return Ok(value);
        }
        let value = self.take_while(|c| c != ')').trim_end().to_owned();
        if value.is_empty() {
            return Err(self.error("expected a literal value"));
        }
        Ok(value)
    }

    fn parse_slice(&mut self) -> Result<Option<Slice>, ParseError> {
        if !self.consume('[') {
            return Ok(None);
        }
        let start = self.parse_index()?;
        self.expect(':')?;
        let end = self.parse_index()?;
        self.expect(']')?;
        Ok(Some(Slice { start, end }))
    }

    fn parse_index(&mut self) -> Result<Option<i64>, ParseError> {
        self.skip_whitespace();
        let offset = self.pos;
        let negative = self.consume('-');
        let digits = self.take_while(|c| c.is_ascii_digit());
        if digits.is_empty() {
            if negative {
                return Err(ParseError::new(self.base + offset, "expected digits after '-'"));
            }
            return Ok(None);
        }
        let text = &self.text[offset..self.pos];
        let value = text
            .parse::<i64>()
            .map_err(|_| ParseError::new(self.base + offset, "slice index out of range"))?;
        self.skip_whitespace();
        Ok(Some(value))
    }
}

fn is_name_char(c: char) -> bool {
    !matches!(c, '(' | ')' | '[' | ']' | '@' | '"' | '\'' | '.')
}
