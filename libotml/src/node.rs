//! The OTML document tree.

use std::sync::Arc;

use crate::coerce::{CoerceError, CoerceErrorKind, FromScalar};
use crate::value::Value;

/// A node of an OTML document: an optional tag, an optional value, and
/// ordered children.
///
/// Children are kept in insertion order and duplicate tags are allowed, so
/// lookups by tag are linear scans returning the first match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    tag: Option<String>,
    value: Option<Value>,
    children: Vec<Node>,
    line: usize,
    origin: Arc<str>,
}

impl Node {
    /// Create a node defined at a 1-based `line` of the document `origin`.
    pub fn new(tag: Option<String>, value: Option<Value>, line: usize, origin: Arc<str>) -> Self {
        Self {
            tag,
            value,
            children: Vec::new(),
            line,
            origin,
        }
    }

    /// The root of a document. It has no tag and no source line.
    pub(crate) fn root(origin: Arc<str>) -> Self {
        Self::new(None, None, 0, origin)
    }

    /// A detached node with a tag and no source location.
    pub fn tagged(tag: impl Into<String>) -> Self {
        Self::new(Some(tag.into()), None, 0, Arc::from(""))
    }

    /// A detached list entry with no source location.
    pub fn anonymous() -> Self {
        Self::new(None, None, 0, Arc::from(""))
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn set_tag(&mut self, tag: Option<String>) {
        self.tag = tag;
    }

    /// Returns `true` for list entries (and the root).
    pub fn is_anonymous(&self) -> bool {
        self.tag.is_none()
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn set_value(&mut self, value: Value) {
        self.value = Some(value);
    }

    pub fn take_value(&mut self) -> Option<Value> {
        self.value.take()
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    /// Append a child after the existing ones.
    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// 1-based line where the node was defined; 0 for the root and for
    /// nodes built in code.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Label of the document the node came from.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// First child with the given tag.
    pub fn get(&self, tag: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.tag() == Some(tag))
    }

    pub fn get_mut(&mut self, tag: &str) -> Option<&mut Node> {
        self.children.iter_mut().find(|c| c.tag() == Some(tag))
    }

    /// All children with the given tag, in order.
    pub fn get_all<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.children.iter().filter(move |c| c.tag() == Some(tag))
    }

    pub fn has(&self, tag: &str) -> bool {
        self.get(tag).is_some()
    }

    /// Number of nodes below this one, at any depth.
    pub fn descendant_count(&self) -> usize {
        let mut pending: Vec<&Node> = vec![self];
        let mut count = 0;
        while let Some(node) = pending.pop() {
            count += node.children.len();
            pending.extend(&node.children);
        }
        count
    }

    /// Read the scalar value as `T`.
    pub fn value_as<T: FromScalar>(&self) -> Result<T, CoerceError> {
        match &self.value {
            Some(Value::Scalar(text)) => self.coerce(text),
            Some(_) => Err(self.coerce_error(CoerceErrorKind::WrongShape("scalar"))),
            None => Err(self.coerce_error(CoerceErrorKind::MissingValue)),
        }
    }

    /// Read a sequence value as a list of `T`. A scalar reads as a list of
    /// one item.
    pub fn values_as<T: FromScalar>(&self) -> Result<Vec<T>, CoerceError> {
        match &self.value {
            Some(Value::Sequence(items)) => items.iter().map(|item| self.coerce(item)).collect(),
            Some(Value::Scalar(text)) => Ok(vec![self.coerce(text)?]),
            Some(Value::Map(_)) => Err(self.coerce_error(CoerceErrorKind::WrongShape("sequence"))),
            None => Err(self.coerce_error(CoerceErrorKind::MissingValue)),
        }
    }

    /// Read the scalar value of the first child tagged `tag` as `T`.
    pub fn get_value_as<T: FromScalar>(&self, tag: &str) -> Result<T, CoerceError> {
        match self.get(tag) {
            Some(child) => child.value_as(),
            None => Err(self.coerce_error(CoerceErrorKind::MissingChild(tag.to_string()))),
        }
    }

    fn coerce<T: FromScalar>(&self, text: &str) -> Result<T, CoerceError> {
        T::from_scalar(text).ok_or_else(|| {
            self.coerce_error(CoerceErrorKind::Invalid {
                text: text.to_string(),
                target: T::NAME,
            })
        })
    }

    fn coerce_error(&self, kind: CoerceErrorKind) -> CoerceError {
        CoerceError {
            kind,
            tag: self.tag.clone(),
            line: self.line,
            origin: self.origin.to_string(),
        }
    }

    /// Overlay `other` onto this node.
    ///
    /// A value on `other` replaces this node's value. Each tagged child of
    /// `other` merges into the first child here with the same tag; list
    /// entries and unmatched tags are appended.
    pub fn merge(&mut self, mut other: Node) {
        if let Some(value) = other.value.take() {
            self.value = Some(value);
        }
        for child in std::mem::take(&mut other.children) {
            let existing = child
                .tag()
                .and_then(|tag| self.children.iter().position(|c| c.tag() == Some(tag)));
            match existing {
                Some(i) => self.children[i].merge(child),
                None => self.children.push(child),
            }
        }
    }
}

impl Drop for Node {
    // Flatten the subtree so that deeply nested documents do not recurse
    // once per level on drop.
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}
