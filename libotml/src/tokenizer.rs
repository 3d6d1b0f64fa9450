//! Value tokenizer and the quote-aware scanning helpers shared by the node
//! content parser and the value interpreter.
//!
//! All helpers walk the text with the same rules:
//! - `"` opens and closes a quoted span; inside it every character is literal
//! - `\` makes the following character literal, inside or outside quotes
//! - `[ ]` and `{ }` nest, and only matter to the tokenizer

use std::str::CharIndices;

use crate::error::{ErrorKind, ParseContext, Result};

/// How a character takes part in the structure of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    /// Outside quotes and not escaped: may be a separator, bracket, or comment.
    Plain,
    /// An unescaped `"`, opening or closing a quoted span.
    Quote,
    /// Quoted or escaped text, or the escaping backslash itself.
    Literal,
}

struct Walker<'a> {
    chars: CharIndices<'a>,
    in_quote: bool,
    escaped: bool,
}

impl<'a> Walker<'a> {
    fn new(s: &'a str) -> Self {
        Self {
            chars: s.char_indices(),
            in_quote: false,
            escaped: false,
        }
    }
}

impl Iterator for Walker<'_> {
    type Item = (usize, char, Role);

    fn next(&mut self) -> Option<Self::Item> {
        let (i, c) = self.chars.next()?;
        let role = if self.escaped {
            self.escaped = false;
            Role::Literal
        } else if c == '\\' {
            self.escaped = true;
            Role::Literal
        } else if c == '"' {
            self.in_quote = !self.in_quote;
            Role::Quote
        } else if self.in_quote {
            Role::Literal
        } else {
            Role::Plain
        };
        Some((i, c, role))
    }
}

/// Remove a trailing `//` comment. The marker counts only outside quotes and
/// at the start of the text or after whitespace, so `http://host` survives.
pub fn strip_comment(s: &str) -> &str {
    let mut prev: Option<char> = None;
    for (i, c, role) in Walker::new(s) {
        if role == Role::Plain
            && c == '/'
            && s[i + 1..].starts_with('/')
            && prev.map_or(true, char::is_whitespace)
        {
            return s[..i].trim_end();
        }
        prev = Some(c);
    }
    s
}

/// Find the tag/value separator: the first plain `:` followed by whitespace
/// or the end of the text.
pub fn find_separator(s: &str) -> Option<usize> {
    Walker::new(s).find_map(|(i, c, role)| {
        if role != Role::Plain || c != ':' {
            return None;
        }
        let next = s[i + 1..].chars().next();
        next.map_or(true, char::is_whitespace).then_some(i)
    })
}

/// Byte index of the quote closing the span opened at the start of `s`.
/// Returns `None` when the span never closes.
pub fn closing_quote(s: &str) -> Option<usize> {
    debug_assert!(s.starts_with('"'));
    Walker::new(s)
        .filter(|&(_, _, role)| role == Role::Quote)
        .nth(1)
        .map(|(i, _, _)| i)
}

/// Returns `true` when a quoted span opened in `s` is still open at its end.
pub fn has_open_quote(s: &str) -> bool {
    let mut walker = Walker::new(s);
    for _ in walker.by_ref() {}
    walker.in_quote
}

/// Byte index of the bracket closing the one that opens `s`.
pub fn matching_close(s: &str, ctx: &ParseContext, line: usize) -> Result<usize> {
    let mut stack: Vec<char> = Vec::new();
    let mut walker = Walker::new(s);
    for (i, c, role) in walker.by_ref() {
        if role != Role::Plain {
            continue;
        }
        match c {
            '[' | '{' => stack.push(c),
            ']' | '}' => {
                close_bracket(&mut stack, c, ctx, line)?;
                if stack.is_empty() {
                    return Ok(i);
                }
            }
            _ => {}
        }
    }
    if walker.in_quote {
        return Err(ctx.error(ErrorKind::UnterminatedQuote, line));
    }
    Err(ctx.error(ErrorKind::UnbalancedBracket, line))
}

fn close_bracket(stack: &mut Vec<char>, c: char, ctx: &ParseContext, line: usize) -> Result<()> {
    let expected = if c == ']' { '[' } else { '{' };
    match stack.pop() {
        Some(open) if open == expected => Ok(()),
        _ => Err(ctx.error(ErrorKind::UnbalancedBracket, line)),
    }
}

/// Split a value on top-level commas into trimmed, non-empty tokens.
///
/// Quoted spans and bracketed spans are kept whole, so `a, [b, c], "d, e"`
/// yields three tokens.
pub fn tokenize(s: &str, ctx: &ParseContext, line: usize) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut stack: Vec<char> = Vec::new();
    let mut start = 0;
    let mut walker = Walker::new(s);

    for (i, c, role) in walker.by_ref() {
        if role != Role::Plain {
            continue;
        }
        match c {
            '[' | '{' => stack.push(c),
            ']' | '}' => close_bracket(&mut stack, c, ctx, line)?,
            ',' if stack.is_empty() => {
                push_token(&mut tokens, &s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    if walker.in_quote {
        return Err(ctx.error(ErrorKind::UnterminatedQuote, line));
    }
    if !stack.is_empty() {
        return Err(ctx.error(ErrorKind::UnbalancedBracket, line));
    }
    push_token(&mut tokens, &s[start..]);
    Ok(tokens)
}

fn push_token(tokens: &mut Vec<String>, raw: &str) {
    let token = raw.trim();
    if !token.is_empty() {
        tokens.push(token.to_string());
    }
}
