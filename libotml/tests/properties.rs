//! Property-based tests for the OTML parser and emitter.

use libotml::{emit, parse, Node, Value};
use proptest::prelude::*;

/// Tags that survive emission: non-empty, no line breaks, no trailing
/// whitespace.
fn tag_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Za-z_@][A-Za-z0-9_.@-]{0,8}",
        "[A-Za-z-][A-Za-z0-9 :/\"-]{0,6}[A-Za-z0-9]",
    ]
}

/// Printable text, including the characters the syntax gives meaning to.
fn text_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z0-9]{1,8}",
        "[ -~]{0,12}",
        "[ -~\t\n]{0,16}",
        Just("|".to_string()),
        Just("//".to_string()),
    ]
}

fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        text_strategy().prop_map(Value::Scalar),
        prop::collection::vec(text_strategy(), 0..4).prop_map(Value::Sequence),
        prop::collection::vec((text_strategy(), text_strategy()), 0..4).prop_map(Value::Map),
    ]
}

fn leaf_strategy() -> impl Strategy<Value = Node> {
    (
        prop::option::of(tag_strategy()),
        prop::option::of(value_strategy()),
    )
        .prop_map(|(tag, value)| {
            let node = match tag {
                Some(tag) => Node::tagged(tag),
                None => Node::anonymous(),
            };
            match value {
                Some(value) => node.with_value(value),
                None => node,
            }
        })
}

fn node_strategy() -> impl Strategy<Value = Node> {
    leaf_strategy().prop_recursive(4, 32, 5, |inner| {
        (leaf_strategy(), prop::collection::vec(inner, 0..5)).prop_map(|(node, children)| {
            children
                .into_iter()
                .fold(node, |node, child| node.with_child(child))
        })
    })
}

fn document_strategy() -> impl Strategy<Value = Node> {
    prop::collection::vec(node_strategy(), 0..6).prop_map(|children| {
        children
            .into_iter()
            .fold(Node::anonymous(), |root, child| root.with_child(child))
    })
}

/// Compare tags, values and children, ignoring source locations.
fn same_shape(a: &Node, b: &Node) -> bool {
    a.tag() == b.tag()
        && a.value() == b.value()
        && a.children().len() == b.children().len()
        && a
            .children()
            .iter()
            .zip(b.children())
            .all(|(x, y)| same_shape(x, y))
}

/// A generated document: its text, the number of node lines in it, and the
/// tags of the lines at depth 0, in order.
#[derive(Debug)]
struct Outline {
    text: String,
    nodes: usize,
    top_level: Vec<String>,
}

/// Lines are `(depth step, kind)`. The depth of a node line is capped at one
/// more than the previous node line, so every outline is well formed.
fn outline_strategy() -> impl Strategy<Value = Outline> {
    prop::collection::vec((0usize..4, 0u8..5, 0usize..6), 0..40).prop_map(|lines| {
        let mut text = String::new();
        let mut nodes = 0;
        let mut top_level = Vec::new();
        let mut deepest = 0;

        for (step, kind, pad) in lines {
            match kind {
                3 => text.push_str(&" ".repeat(pad)),
                4 => {
                    text.push_str(&" ".repeat(pad));
                    text.push_str("// comment");
                }
                _ => {
                    let depth = step.min(deepest);
                    let tag = format!("n{}", nodes);
                    text.push_str(&"  ".repeat(depth));
                    match kind {
                        0 => text.push_str(&tag),
                        1 => text.push_str(&format!("{}: value {}", tag, nodes)),
                        _ => text.push_str(&format!("- {}", tag)),
                    }
                    if depth == 0 && kind != 2 {
                        top_level.push(tag);
                    } else if depth == 0 {
                        top_level.push("-".to_string());
                    }
                    nodes += 1;
                    deepest = depth + 1;
                }
            }
            text.push('\n');
        }

        Outline {
            text,
            nodes,
            top_level,
        }
    })
}

proptest! {
    #[test]
    fn emitted_documents_parse_back(root in document_strategy()) {
        let text = emit(&root);
        let back = parse(&text);
        prop_assert!(back.is_ok(), "{:?} in:\n{}", back, text);
        let back = back.unwrap();
        prop_assert!(same_shape(&root, &back), "emitted:\n{}", text);
    }

    #[test]
    fn emit_is_stable(root in document_strategy()) {
        let text = emit(&root);
        let back = parse(&text).unwrap();
        prop_assert_eq!(emit(&back), text);
    }

    #[test]
    fn node_count_matches_node_lines(outline in outline_strategy()) {
        let root = parse(&outline.text).unwrap();
        prop_assert_eq!(root.descendant_count(), outline.nodes);
    }

    #[test]
    fn top_level_nodes_in_order(outline in outline_strategy()) {
        let root = parse(&outline.text).unwrap();
        let tags: Vec<String> = root
            .children()
            .iter()
            .map(|c| c.tag().unwrap_or("-").to_string())
            .collect();
        prop_assert_eq!(tags, outline.top_level);
    }

    #[test]
    fn parsing_is_deterministic(outline in outline_strategy()) {
        prop_assert_eq!(parse(&outline.text), parse(&outline.text));
    }
}
