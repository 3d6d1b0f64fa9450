//! OTML value representation and the text-value interpreter.
//!
//! Values are kept as text. Whether `42` is a number or `yes` a boolean is
//! decided later, when a consumer asks for a typed value (see `coerce`).

use std::fmt;

use crate::error::{ErrorKind, ParseContext, Result};
use crate::tokenizer::{closing_quote, find_separator, matching_close, tokenize};

/// The payload of a node.
#[derive(Clone, PartialEq, Eq)]
pub enum Value {
    /// Verbatim text, with escapes resolved if it was quoted.
    Scalar(String),
    /// Ordered sub-values of a `[a, b]` literal or a comma-separated value.
    Sequence(Vec<String>),
    /// Ordered entries of a `{key: value}` literal.
    Map(Vec<(String, String)>),
}

impl Value {
    /// Returns the text if this is a `Scalar`.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the items if this is a `Sequence`.
    pub fn as_sequence(&self) -> Option<&[String]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the entries if this is a `Map`.
    pub fn as_map(&self) -> Option<&[(String, String)]> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Look up the first entry of a `Map` with the given key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.as_map()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` for the null spellings `~` and `null`.
    pub fn is_null(&self) -> bool {
        matches!(self.as_scalar(), Some("~" | "null"))
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(s) => write!(f, "{:?}", s),
            Value::Sequence(items) => f.debug_list().entries(items).finish(),
            Value::Map(entries) => f
                .debug_map()
                .entries(entries.iter().map(|(k, v)| (k, v)))
                .finish(),
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(s.to_string())
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::Sequence(items)
    }
}

impl From<Vec<(String, String)>> for Value {
    fn from(entries: Vec<(String, String)>) -> Self {
        Value::Map(entries)
    }
}

/// How a value string on a node line is to be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ValueText {
    /// The value is complete on this line.
    Inline(Value),
    /// The value is a text block on the following, more indented lines.
    Block(Chomp),
}

/// Treatment of trailing newlines in a text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Chomp {
    /// `|`: drop trailing blank lines, end with a single newline.
    Clip,
    /// `|-`: drop trailing blank lines and the final newline.
    Strip,
    /// `|+`: keep every trailing newline.
    Keep,
}

impl Chomp {
    fn from_marker(s: &str) -> Option<Self> {
        match s {
            "|" => Some(Chomp::Clip),
            "|-" => Some(Chomp::Strip),
            "|+" => Some(Chomp::Keep),
            _ => None,
        }
    }

    /// Join the collected block lines into the final scalar text.
    /// Blank lines arrive as empty strings.
    pub(crate) fn finish(self, mut lines: Vec<String>) -> String {
        if self == Chomp::Keep {
            return lines.iter().map(|l| format!("{}\n", l)).collect();
        }
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        let mut text = lines.join("\n");
        if self == Chomp::Clip && !text.is_empty() {
            text.push('\n');
        }
        text
    }
}

/// Interpret the (non-empty, comment-free, trimmed) value text of a node line.
pub(crate) fn interpret(raw: &str, ctx: &ParseContext, line: usize) -> Result<ValueText> {
    if let Some(chomp) = Chomp::from_marker(raw) {
        return Ok(ValueText::Block(chomp));
    }

    let last = raw.len() - 1;

    // Quoted scalar; a quote closing early means several tokens follow
    if raw.starts_with('"') {
        match closing_quote(raw) {
            None => return Err(ctx.error(ErrorKind::UnterminatedQuote, line)),
            Some(end) if end == last => {
                let text = unescape_quoted(&raw[1..end]);
                return Ok(ValueText::Inline(Value::Scalar(text)));
            }
            Some(_) => {}
        }
    }

    if raw.starts_with('[') && matching_close(raw, ctx, line)? == last {
        let items = tokenize(&raw[1..last], ctx, line)?;
        let items = items.iter().map(|t| item_text(t)).collect();
        return Ok(ValueText::Inline(Value::Sequence(items)));
    }

    if raw.starts_with('{') && matching_close(raw, ctx, line)? == last {
        let entries = tokenize(&raw[1..last], ctx, line)?
            .iter()
            .map(|t| map_entry(t, ctx, line))
            .collect::<Result<Vec<_>>>()?;
        return Ok(ValueText::Inline(Value::Map(entries)));
    }

    let tokens = tokenize(raw, ctx, line)?;
    let value = match tokens.as_slice() {
        [single] => Value::Scalar(item_text(single)),
        _ => Value::Sequence(tokens.iter().map(|t| item_text(t)).collect()),
    };
    Ok(ValueText::Inline(value))
}

/// Split a `{...}` token into key and value. A token without a separator
/// is a key with an empty value.
fn map_entry(token: &str, ctx: &ParseContext, line: usize) -> Result<(String, String)> {
    let (key, value) = match find_separator(token) {
        Some(i) => (token[..i].trim(), token[i + 1..].trim()),
        None => (token, ""),
    };
    if key.is_empty() {
        return Err(ctx.error(ErrorKind::MissingTag, line));
    }
    Ok((item_text(key), item_text(value)))
}

/// A sub-value: fully quoted tokens are unquoted, anything else stays raw.
fn item_text(token: &str) -> String {
    if token.starts_with('"') && closing_quote(token) == Some(token.len() - 1) {
        unescape_quoted(&token[1..token.len() - 1])
    } else {
        token.to_string()
    }
}

/// Resolve the escapes of a quoted span's interior.
pub(crate) fn unescape_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
