//! Error types for the source transform.

use crate::transform::token::Delimiter;
use std::fmt;

/// What went wrong while lexing or walking a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    UnterminatedString,
    UnterminatedTemplate,
    UnterminatedComment,
    UnterminatedRegex,
    UnexpectedChar(char),
    /// A closing delimiter with nothing open.
    UnexpectedClose(Delimiter),
    MismatchedClose { open: Delimiter, close: Delimiter },
    Unclosed(Delimiter),
    /// A statement keyword not followed by the syntax it requires.
    Expected(&'static str),
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxErrorKind::UnterminatedString => write!(f, "unterminated string literal"),
            SyntaxErrorKind::UnterminatedTemplate => write!(f, "unterminated template literal"),
            SyntaxErrorKind::UnterminatedComment => write!(f, "unterminated comment"),
            SyntaxErrorKind::UnterminatedRegex => write!(f, "unterminated regular expression"),
            SyntaxErrorKind::UnexpectedChar(c) => write!(f, "unexpected character {c:?}"),
            SyntaxErrorKind::UnexpectedClose(d) => write!(f, "unexpected closing {d}"),
            SyntaxErrorKind::MismatchedClose { open, close } => {
                write!(f, "expected closing {open}, found closing {close}")
            }
            SyntaxErrorKind::Unclosed(d) => write!(f, "unclosed {d}"),
            SyntaxErrorKind::Expected(what) => write!(f, "expected {what}"),
        }
    }
}

/// A lexing or structural parse failure at a byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub offset: usize,
}

impl SyntaxError {
    pub fn new(kind: SyntaxErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.kind, self.offset)
    }
}

impl std::error::Error for SyntaxError {}

/// Failure of a whole-file transform. No partial output accompanies it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// `transform` was called before the project root was resolved.
    NotConfigured,
    /// The file does not parse; `line` and `column` are 1-based.
    Syntax {
        id: String,
        line: usize,
        column: usize,
        source: SyntaxError,
    },
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformError::NotConfigured => {
                write!(f, "transform invoked before the project root was resolved")
            }
            TransformError::Syntax {
                id,
                line,
                column,
                source,
            } => write!(f, "{id}:{line}:{column}: {}", source.kind),
        }
    }
}

impl std::error::Error for TransformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransformError::Syntax { source, .. } => Some(source),
            TransformError::NotConfigured => None,
        }
    }
}

/// A source map that cannot be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceMapError {
    Json(String),
    MissingField(&'static str),
    UnsupportedVersion(u64),
    InvalidBase64(char),
    /// A VLQ value ended mid-continuation.
    TruncatedVlq,
    /// A segment with a field count other than 1, 4 or 5.
    InvalidSegment(usize),
}

impl fmt::Display for SourceMapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceMapError::Json(e) => write!(f, "invalid source map JSON: {e}"),
            SourceMapError::MissingField(field) => write!(f, "source map is missing \"{field}\""),
            SourceMapError::UnsupportedVersion(v) => write!(f, "unsupported source map version {v}"),
            SourceMapError::InvalidBase64(c) => write!(f, "invalid base64 digit {c:?} in mappings"),
            SourceMapError::TruncatedVlq => write!(f, "truncated VLQ value in mappings"),
            SourceMapError::InvalidSegment(n) => write!(f, "mapping segment with {n} fields"),
        }
    }
}

impl std::error::Error for SourceMapError {}
