//! Emit OTML text from a document tree.
//!
//! Output uses two spaces per level. Scalars are written bare when they read
//! back verbatim, as a text block when they span lines, and quoted otherwise.

use crate::node::Node;
use crate::value::Value;

const INDENT: &str = "  ";

/// Serialize the children of `root` as an OTML document.
///
/// The root's own tag and value are not written. Tags must be non-empty and
/// free of line breaks and trailing whitespace to read back unchanged; every
/// other character is escaped as needed.
pub fn emit(root: &Node) -> String {
    let mut out = String::new();
    let mut pending: Vec<(&Node, usize)> = root.children().iter().rev().map(|c| (c, 0)).collect();

    while let Some((node, depth)) = pending.pop() {
        emit_line(&mut out, node, depth);
        pending.extend(node.children().iter().rev().map(|c| (c, depth + 1)));
    }
    out
}

fn emit_line(out: &mut String, node: &Node, depth: usize) {
    let pad = INDENT.repeat(depth);
    out.push_str(&pad);

    let head = match node.tag() {
        Some(tag) => encode_tag(tag),
        None => "-".to_string(),
    };
    out.push_str(&head);

    match node.value() {
        None => out.push('\n'),
        Some(Value::Scalar(text)) if node.children().is_empty() && can_block(text) => {
            let (marker, body) = block_parts(text);
            out.push_str(separator(node));
            out.push_str(marker);
            out.push('\n');
            let inner = INDENT.repeat(depth + 1);
            for line in body.split('\n') {
                if !line.is_empty() {
                    out.push_str(&inner);
                    out.push_str(line);
                }
                out.push('\n');
            }
        }
        Some(value) => {
            out.push_str(separator(node));
            out.push_str(&encode_value(value));
            out.push('\n');
        }
    }
}

fn separator(node: &Node) -> &'static str {
    if node.is_anonymous() {
        " "
    } else {
        ": "
    }
}

fn encode_value(value: &Value) -> String {
    match value {
        Value::Scalar(text) => encode_scalar(text),
        Value::Sequence(items) => {
            let items: Vec<String> = items.iter().map(|i| encode_item(i, false)).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Map(entries) => {
            let entries: Vec<String> = entries
                .iter()
                .map(|(k, v)| format!("{}: {}", encode_item(k, true), encode_item(v, false)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}

fn encode_scalar(text: &str) -> String {
    if matches!(text, "|" | "|-" | "|+") || !is_plain(text) {
        quote(text)
    } else {
        text.to_string()
    }
}

/// Sequence items and map entries. Keys additionally may not hold a colon.
fn encode_item(text: &str, key: bool) -> String {
    if !is_plain(text) || (key && text.contains(':')) {
        quote(text)
    } else {
        text.to_string()
    }
}

/// Text that reads back as a single bare token.
fn is_plain(text: &str) -> bool {
    !text.is_empty()
        && text.trim() == text
        && !text.contains("//")
        && !text
            .chars()
            .any(|c| matches!(c, ',' | '"' | '\\' | '[' | ']' | '{' | '}' | '\n' | '\r'))
}

fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Multi-line text can be a block unless a line is whitespace only, which
/// would read back as an empty line.
fn can_block(text: &str) -> bool {
    text.contains('\n')
        && !text.contains('\r')
        && text
            .split('\n')
            .all(|line| line.is_empty() || !line.trim().is_empty())
}

/// Pick the chomping marker and the lines to write for block text.
fn block_parts(text: &str) -> (&'static str, &str) {
    match text.strip_suffix('\n') {
        Some(body) if body.is_empty() || body.ends_with('\n') => ("|+", body),
        Some(body) => ("|", body),
        None => ("|-", text),
    }
}

fn encode_tag(tag: &str) -> String {
    let mut out = String::with_capacity(tag.len());
    for (i, c) in tag.chars().enumerate() {
        let escape = match c {
            '\\' | ':' | '"' | '/' => true,
            '-' => i == 0,
            c if c.is_whitespace() => i == 0,
            _ => false,
        };
        if escape {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn doc(children: Vec<Node>) -> Node {
        children
            .into_iter()
            .fold(Node::anonymous(), |root, child| root.with_child(child))
    }

    fn reparse(root: &Node) -> Node {
        let text = emit(root);
        parse(&text).unwrap_or_else(|e| panic!("{} in:\n{}", e, text))
    }

    #[test]
    fn test_emit_layout() {
        let root = doc(vec![
            Node::tagged("Window")
                .with_child(Node::tagged("id").with_value("main"))
                .with_child(Node::tagged("size").with_value(vec!["100".to_string(), "200".to_string()])),
            Node::tagged("items")
                .with_child(Node::anonymous().with_value("apple"))
                .with_child(Node::anonymous().with_child(Node::tagged("x").with_value("1"))),
        ]);
        assert_eq!(
            emit(&root),
            "Window\n  id: main\n  size: [100, 200]\nitems\n  - apple\n  -\n    x: 1\n"
        );
    }

    #[test]
    fn test_emit_quotes_when_needed() {
        assert_eq!(encode_scalar("plain text"), "plain text");
        assert_eq!(encode_scalar("a: b"), "a: b");
        assert_eq!(encode_scalar(""), "\"\"");
        assert_eq!(encode_scalar(" padded"), "\" padded\"");
        assert_eq!(encode_scalar("a, b"), "\"a, b\"");
        assert_eq!(encode_scalar("http://x"), "\"http://x\"");
        assert_eq!(encode_scalar("|"), "\"|\"");
        assert_eq!(encode_scalar(r#"say "hi""#), r#""say \"hi\"""#);
        assert_eq!(encode_item("k:v", true), "\"k:v\"");
        assert_eq!(encode_item("k:v", false), "k:v");
    }

    #[test]
    fn test_emit_escapes_tags() {
        assert_eq!(encode_tag("a: b"), r"a\: b");
        assert_eq!(encode_tag("-x"), r"\-x");
        assert_eq!(encode_tag("a-b"), "a-b");
        assert_eq!(encode_tag("//c"), r"\/\/c");
    }

    #[test]
    fn test_block_markers() {
        assert_eq!(block_parts("a\nb"), ("|-", "a\nb"));
        assert_eq!(block_parts("a\nb\n"), ("|", "a\nb"));
        assert_eq!(block_parts("a\n\n"), ("|+", "a\n"));
        assert_eq!(block_parts("\n"), ("|+", ""));
        assert!(!can_block("a\n  \nb"));
        assert!(!can_block("single"));
    }

    #[test]
    fn test_round_trip_values() {
        let texts = [
            "plain",
            "",
            "a, b",
            "[not, a, list]",
            "{not: map}",
            "tab\there",
            "back\\slash",
            "one\ntwo",
            "one\ntwo\n",
            "one\n\n",
            "\nleading",
            "  indented\n    lines\n",
            "ws\n \nline",
            "// comment",
            "|-",
        ];
        for text in texts {
            let root = doc(vec![Node::tagged("t").with_value(text), Node::tagged("next")]);
            let back = reparse(&root);
            assert_eq!(
                back.get("t").and_then(|n| n.value()),
                Some(&Value::from(text)),
                "text {:?}",
                text
            );
            assert_eq!(back.children().len(), 2);
        }
    }

    #[test]
    fn test_round_trip_collections() {
        let seq = Value::from(vec![
            "a".to_string(),
            "".to_string(),
            "b, c".to_string(),
            "[d]".to_string(),
        ]);
        let map = Value::from(vec![
            ("k".to_string(), "v".to_string()),
            ("with: colon".to_string(), "".to_string()),
            ("x".to_string(), "y: z".to_string()),
        ]);
        let root = doc(vec![
            Node::tagged("seq").with_value(seq.clone()),
            Node::anonymous().with_value(map.clone()),
            Node::tagged("empty").with_value(Value::Sequence(Vec::new())),
        ]);
        let back = reparse(&root);
        assert_eq!(back.children()[0].value(), Some(&seq));
        assert_eq!(back.children()[1].value(), Some(&map));
        assert_eq!(back.children()[2].value(), Some(&Value::Sequence(Vec::new())));
    }

    #[test]
    fn test_multiline_value_with_children_is_quoted() {
        let root = doc(vec![Node::tagged("t")
            .with_value("a\nb")
            .with_child(Node::tagged("c"))]);
        assert_eq!(emit(&root), "t: \"a\\nb\"\n  c\n");
        let back = reparse(&root);
        assert_eq!(back.children()[0].children().len(), 1);
    }

    #[test]
    fn test_round_trip_tags() {
        let tags = ["a: b", "-dash", "//slash", "quo\"te", "back\\", " lead", "ünï"];
        let root = doc(tags.iter().map(|t| Node::tagged(*t).with_value("v")).collect());
        let back = reparse(&root);
        let read: Vec<_> = back.children().iter().map(|c| c.tag()).collect();
        let expected: Vec<_> = tags.iter().map(|t| Some(*t)).collect();
        assert_eq!(read, expected);
    }
}
