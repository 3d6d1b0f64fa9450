//! Error types for OTML parsing.

use std::io;
use std::sync::Arc;

use thiserror::Error;

/// Result type for OTML parsing operations.
pub type Result<T> = std::result::Result<T, SyntaxError>;

/// Default number of spaces per indentation level.
pub const DEFAULT_INDENT_WIDTH: usize = 2;

/// Parse context carrying the document origin and indentation settings.
#[derive(Clone, Debug)]
pub struct ParseContext {
    origin: Arc<str>,
    indent_width: usize,
}

impl Default for ParseContext {
    fn default() -> Self {
        Self::new("")
    }
}

impl ParseContext {
    /// Create a new parse context. The origin is purely diagnostic: it is
    /// echoed in error messages and stored on every node.
    pub fn new(origin: &str) -> Self {
        Self {
            origin: Arc::from(origin),
            indent_width: DEFAULT_INDENT_WIDTH,
        }
    }

    /// Set the number of spaces making up one indentation level.
    /// A width of zero is treated as one.
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width.max(1);
        self
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub(crate) fn shared_origin(&self) -> Arc<str> {
        Arc::clone(&self.origin)
    }

    pub fn indent_width(&self) -> usize {
        self.indent_width
    }

    /// Build a syntax error attributed to a 1-based line.
    pub(crate) fn error(&self, kind: ErrorKind, line: usize) -> SyntaxError {
        SyntaxError {
            kind,
            line,
            origin: self.origin.to_string(),
        }
    }
}

/// The class of syntax violation. Messages are short and stable so callers
/// can match on them.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A tab character in a node line's indentation.
    #[error("tab in indentation")]
    TabIndentation,

    /// Indentation that is not a whole number of levels.
    #[error("uneven indentation")]
    UnevenIndentation,

    /// Indentation deeper than one level below the last node.
    #[error("unexpected indentation")]
    UnexpectedIndentation,

    /// Indentation shallower than the document's first node.
    #[error("dedent below root")]
    DedentBelowRoot,

    #[error("unterminated quoted value")]
    UnterminatedQuote,

    #[error("unbalanced bracket")]
    UnbalancedBracket,

    /// A tag/value separator with nothing before it.
    #[error("missing tag")]
    MissingTag,

    /// A dash that is not followed by whitespace.
    #[error("malformed list entry")]
    MalformedListEntry,
}

/// A syntax error with the line it was detected on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at line {line}{}", origin_suffix(.origin))]
pub struct SyntaxError {
    pub kind: ErrorKind,
    /// 1-based source line.
    pub line: usize,
    /// Origin label of the document, possibly empty.
    pub origin: String,
}

pub(crate) fn origin_suffix(origin: &str) -> String {
    if origin.is_empty() {
        String::new()
    } else {
        format!(" of <{}>", origin)
    }
}

/// Error returned when parsing from a stream.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// The stream could not be read, or was not valid UTF-8.
    #[error("failed to read document{}: {source}", origin_suffix(.origin))]
    Io {
        origin: String,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// The syntax error, if this is one.
    pub fn as_syntax(&self) -> Option<&SyntaxError> {
        match self {
            Error::Syntax(e) => Some(e),
            Error::Io { .. } => None,
        }
    }
}
