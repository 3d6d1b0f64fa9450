//! Node content parser: splits the text of a node line into tag and value.
//!
//! - `- value` / `-` is an anonymous list entry
//! - `tag: value` / `tag:` is a tagged node
//! - anything else is a bare tag

use crate::error::{ErrorKind, ParseContext, Result};
use crate::tokenizer::{closing_quote, find_separator, has_open_quote, strip_comment};
use crate::value::{interpret, unescape_quoted, ValueText};

/// Tag and value of a node line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NodeContent {
    pub tag: Option<String>,
    pub value: Option<ValueText>,
}

/// Parse the text of a node line, after indentation.
pub(crate) fn parse_content(text: &str, ctx: &ParseContext, line: usize) -> Result<NodeContent> {
    let text = strip_comment(text).trim_end();

    if let Some(rest) = text.strip_prefix('-') {
        if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
            return Err(ctx.error(ErrorKind::MalformedListEntry, line));
        }
        return Ok(NodeContent {
            tag: None,
            value: parse_value(rest.trim(), ctx, line)?,
        });
    }

    match find_separator(text) {
        Some(i) => Ok(NodeContent {
            tag: Some(parse_tag(text[..i].trim(), ctx, line)?),
            value: parse_value(text[i + 1..].trim(), ctx, line)?,
        }),
        None => Ok(NodeContent {
            tag: Some(parse_tag(text, ctx, line)?),
            value: None,
        }),
    }
}

/// A fully quoted tag is unquoted like a quoted value. Otherwise backslash
/// escapes are resolved and any quote must be closed.
fn parse_tag(raw: &str, ctx: &ParseContext, line: usize) -> Result<String> {
    let tag = if raw.starts_with('"') && closing_quote(raw) == Some(raw.len() - 1) {
        unescape_quoted(&raw[1..raw.len() - 1])
    } else if has_open_quote(raw) {
        return Err(ctx.error(ErrorKind::UnterminatedQuote, line));
    } else {
        unescape_tag(raw)
    };
    if tag.is_empty() {
        return Err(ctx.error(ErrorKind::MissingTag, line));
    }
    Ok(tag)
}

fn parse_value(raw: &str, ctx: &ParseContext, line: usize) -> Result<Option<ValueText>> {
    if raw.is_empty() {
        return Ok(None);
    }
    interpret(raw, ctx, line).map(Some)
}

/// Tags drop the backslash of every escape: `a\: b` is the tag `a: b`.
fn unescape_tag(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push(chars.next().unwrap_or('\\')),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn content(text: &str) -> NodeContent {
        parse_content(text, &ParseContext::default(), 1).unwrap()
    }

    fn scalar(s: &str) -> Option<ValueText> {
        Some(ValueText::Inline(Value::from(s)))
    }

    #[test]
    fn test_tag_and_value() {
        let c = content("width: 100");
        assert_eq!(c.tag.as_deref(), Some("width"));
        assert_eq!(c.value, scalar("100"));
    }

    #[test]
    fn test_tag_only() {
        assert_eq!(
            content("Window"),
            NodeContent {
                tag: Some("Window".to_string()),
                value: None
            }
        );
        assert_eq!(content("anchors.fill:").value, None);
        assert_eq!(content("anchors.fill:").tag.as_deref(), Some("anchors.fill"));
        assert_eq!(content("@onClick:   ").tag.as_deref(), Some("@onClick"));
    }

    #[test]
    fn test_colon_without_space_is_part_of_tag() {
        assert_eq!(content("a:b").tag.as_deref(), Some("a:b"));
        assert_eq!(content(r"a\: b: c").tag.as_deref(), Some("a: b"));
    }

    #[test]
    fn test_quoted_tags() {
        let c = content(r#""a: b": 1"#);
        assert_eq!(c.tag.as_deref(), Some("a: b"));
        assert_eq!(c.value, scalar("1"));
        assert_eq!(content(r#""say \"hi\"""#).tag.as_deref(), Some(r#"say "hi""#));
        assert_eq!(content(r#"a "b" c: 1"#).tag.as_deref(), Some(r#"a "b" c"#));

        let ctx = ParseContext::default();
        let err = parse_content(r#"a "b: c"#, &ctx, 3).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnterminatedQuote);
        assert_eq!(err.line, 3);

        let err = parse_content(r#""": 1"#, &ctx, 4).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingTag);
    }

    #[test]
    fn test_quoted_value_keeps_colon() {
        let c = content(r#"x: "a: b""#);
        assert_eq!(c.tag.as_deref(), Some("x"));
        assert_eq!(c.value, scalar("a: b"));
    }

    #[test]
    fn test_list_entries() {
        assert_eq!(content("- apple"), NodeContent { tag: None, value: scalar("apple") });
        assert_eq!(content("-"), NodeContent { tag: None, value: None });
        assert_eq!(content("- key: value").value, scalar("key: value"));
        assert_eq!(content("-\tx").value, scalar("x"));
    }

    #[test]
    fn test_comments() {
        assert_eq!(content("size: 10 // pixels").value, scalar("10"));
        assert_eq!(content("- // nothing").value, None);
        assert_eq!(content("url: http://host").value, scalar("http://host"));
    }

    #[test]
    fn test_grammar_errors() {
        let ctx = ParseContext::default();
        let err = parse_content(": value", &ctx, 5).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingTag);
        assert_eq!(err.line, 5);

        let err = parse_content("-apple", &ctx, 6).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedListEntry);
        assert_eq!(err.line, 6);
    }
}
