//! Mapping from an OTML tree to plain data for the other formats.
//!
//! OTML nodes carry a tag, a value, and children; the target formats only
//! know scalars, lists, and maps. The mapping:
//!   - leaf node           -> its value (scalar, list of scalars, or map)
//!   - leaf without value  -> null
//!   - all children `-`    -> list of the children
//!   - otherwise           -> map keyed by tag; `-` children are keyed by
//!                            their position, and a repeated tag replaces the
//!                            earlier entry
//!   - value and children  -> error
//!
//! Scalars stay strings unless `typed` is set, in which case `~`/`null`,
//! integers, floats, and booleans are recognized.

pub mod cbor;
pub mod json;
pub mod toml;
pub mod yaml;

use libotml::{FromScalar, Node, Value};
use num_bigint::BigInt;

/// Format-neutral data produced from a tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Data {
    Null,
    Bool(bool),
    Integer(BigInt),
    Float(f64),
    String(String),
    List(Vec<Data>),
    Map(Vec<(String, Data)>),
}

/// Convert a whole document. An empty document is an empty map.
pub fn document(root: &Node, typed: bool) -> Result<Data, String> {
    if root.children().is_empty() {
        return Ok(Data::Map(Vec::new()));
    }
    node_to_data(root, typed)
}

/// A node with children whose data is still being collected.
struct Frame<'a> {
    node: &'a Node,
    next: usize,
    shape: Shape,
}

enum Shape {
    List(Vec<Data>),
    Map(Vec<(String, Data)>),
}

impl Frame<'_> {
    /// Add the data of the child most recently visited.
    fn push(&mut self, data: Data) {
        match &mut self.shape {
            Shape::List(items) => items.push(data),
            Shape::Map(entries) => {
                let index = self.next - 1;
                let key = match self.node.children()[index].tag() {
                    Some(tag) => tag.to_string(),
                    None => index.to_string(),
                };
                match entries.iter_mut().find(|(k, _)| *k == key) {
                    Some(entry) => entry.1 = data,
                    None => entries.push((key, data)),
                }
            }
        }
    }

    fn finish(self) -> Data {
        match self.shape {
            Shape::List(items) => Data::List(items),
            Shape::Map(entries) => Data::Map(entries),
        }
    }
}

/// Convert a node without recursing, so nesting depth is bounded only by
/// the heap.
fn node_to_data(root: &Node, typed: bool) -> Result<Data, String> {
    let mut stack: Vec<Frame<'_>> = Vec::new();
    let mut result = visit(root, typed, &mut stack)?;

    while let Some(mut frame) = stack.pop() {
        let node = frame.node;
        let data = match node.children().get(frame.next) {
            Some(child) => {
                frame.next += 1;
                stack.push(frame);
                match visit(child, typed, &mut stack)? {
                    Some(data) => data,
                    None => continue,
                }
            }
            None => frame.finish(),
        };
        match stack.last_mut() {
            Some(parent) => parent.push(data),
            None => result = Some(data),
        }
    }
    Ok(result.unwrap_or(Data::Null))
}

/// Data of a leaf, or `None` after opening a frame for a node with children.
fn visit<'a>(
    node: &'a Node,
    typed: bool,
    stack: &mut Vec<Frame<'a>>,
) -> Result<Option<Data>, String> {
    let children = node.children();

    if children.is_empty() {
        return Ok(Some(match node.value() {
            None => Data::Null,
            Some(value) => value_to_data(value, typed),
        }));
    }

    if node.value().is_some() {
        return Err(format!(
            "{} at line {} has both a value and children",
            describe(node),
            node.line()
        ));
    }

    let shape = if children.iter().all(Node::is_anonymous) {
        Shape::List(Vec::with_capacity(children.len()))
    } else {
        Shape::Map(Vec::with_capacity(children.len()))
    };
    stack.push(Frame {
        node,
        next: 0,
        shape,
    });
    Ok(None)
}

fn value_to_data(value: &Value, typed: bool) -> Data {
    match value {
        Value::Scalar(text) => scalar(text, typed),
        Value::Sequence(items) => Data::List(items.iter().map(|i| scalar(i, typed)).collect()),
        Value::Map(entries) => Data::Map(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), scalar(v, typed)))
                .collect(),
        ),
    }
}

fn scalar(text: &str, typed: bool) -> Data {
    if !typed {
        return Data::String(text.to_string());
    }
    if matches!(text, "~" | "null") {
        return Data::Null;
    }
    if let Some(n) = BigInt::from_scalar(text) {
        return Data::Integer(n);
    }
    if text.chars().any(|c| c.is_ascii_digit()) {
        if let Some(f) = f64::from_scalar(text).filter(|f| f.is_finite()) {
            return Data::Float(f);
        }
    }
    match bool::from_scalar(text) {
        Some(b) => Data::Bool(b),
        None => Data::String(text.to_string()),
    }
}

fn describe(node: &Node) -> String {
    match node.tag() {
        Some(tag) => format!("`{}`", tag),
        None => "list entry".to_string(),
    }
}
