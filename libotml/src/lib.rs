//! OTML (OTClient Markup Language) parser.
//!
//! OTML is an indentation-structured markup for UI layouts and configuration:
//! every non-blank line introduces a node with an optional tag and value, and
//! indentation decides which node it belongs to.
//!
//! ```text
//! Window
//!   id: main
//!   size: 200, 100
//!   items:
//!     - apple
//!     - banana
//! ```
//!
//! # Parsing Pipeline
//!
//! The parser works one line at a time:
//!
//! 1. **Scanner**: Classifies each physical line as blank, a node line with a
//!    depth, or a continuation of an open text block, validating indentation.
//!
//! 2. **Tree Builder**: Keeps the chain of open ancestors on a stack and
//!    attaches each node line to the right parent.
//!
//! 3. **Value Interpreter**: Splits a node line into tag and value, and reads
//!    the value as a scalar, a sequence, a map, or the start of a text block.
//!
//! Values stay text; typed reads happen later through [`FromScalar`].

mod coerce;
mod content;
mod emit;
mod error;
mod node;
mod parser;
mod scanner;
mod tokenizer;
mod value;

use std::io::BufRead;

pub use coerce::{CoerceError, CoerceErrorKind, FromScalar};
pub use emit::emit;
pub use error::{Error, ErrorKind, ParseContext, Result, SyntaxError, DEFAULT_INDENT_WIDTH};
pub use node::Node;
pub use value::Value;

/// Parse an OTML document from a string.
///
/// # Example
///
/// ```
/// use libotml::parse;
///
/// let root = parse("width: 42").unwrap();
/// assert_eq!(root.get_value_as::<i32>("width"), Ok(42));
/// ```
pub fn parse(input: &str) -> Result<Node> {
    parse_with_context(input, &ParseContext::default())
}

/// Parse an OTML document from a string with an origin label for error
/// messages.
pub fn parse_with_origin(input: &str, origin: &str) -> Result<Node> {
    parse_with_context(input, &ParseContext::new(origin))
}

/// Parse an OTML document from a string with explicit settings.
pub fn parse_with_context(input: &str, ctx: &ParseContext) -> Result<Node> {
    parser::parse_str(input, ctx)
}

/// Parse an OTML document from a reader, consuming it to the end.
///
/// Pass `&mut reader` to keep using the stream afterwards.
pub fn parse_reader<R: BufRead>(reader: R, ctx: &ParseContext) -> std::result::Result<Node, Error> {
    parser::parse_stream(reader, ctx)
}
