//! The hierarchical key/value data model shared by every format.
//!
//! This module provides [`Node`] and [`Tree`], the in-memory representation
//! that every codec decodes into and encodes from. The model is deliberately
//! minimal:
//!
//! - **Ordered**: sibling order is significant and preserved across a
//!   decode → encode round trip
//! - **Multi-valued**: several siblings may share the same key (repeated
//!   XML tags, repeated INFO entries, JSON array elements)
//! - **String-typed**: every scalar payload is a string; codecs that have
//!   richer scalar types (JSON numbers, booleans) decode them to their
//!   literal text
//!
//! A node may carry a value, children, both, or neither. Whether a given
//! shape can be *encoded* depends on the destination format; the model
//! itself places no restriction.
//!
//! ## Examples
//!
//! ```rust
//! use ptconv::{Node, Tree};
//!
//! let mut tree = Tree::new();
//! tree.push(
//!     Node::new("server")
//!         .with_child(Node::new("host").with_value("localhost"))
//!         .with_child(Node::new("port").with_value("8080")),
//! );
//!
//! let server = tree.get("server").unwrap();
//! assert_eq!(server.get("port").and_then(|n| n.value()), Some("8080"));
//! ```

use std::fmt;

/// A single node in the hierarchical data model.
///
/// Children are owned exclusively by their parent, so the structure is a
/// tree by construction: no sharing, no cycles, no back-references.
///
/// # Examples
///
/// ```rust
/// use ptconv::Node;
///
/// let node = Node::new("greeting").with_value("hello");
/// assert_eq!(node.key(), "greeting");
/// assert_eq!(node.value(), Some("hello"));
/// assert!(node.is_leaf());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Node {
    key: String,
    value: Option<String>,
    children: Vec<Node>,
}

impl Node {
    /// Creates a node with the given key, no value, and no children.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Node {
            key: key.into(),
            value: None,
            children: Vec::new(),
        }
    }

    /// Sets the scalar value, builder-style.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ptconv::Node;
    ///
    /// let node = Node::new("port").with_value("8080");
    /// assert_eq!(node.value(), Some("8080"));
    /// ```
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Appends a child, builder-style.
    #[must_use]
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Returns the node's key.
    ///
    /// Keys are not required to be unique among siblings and may be empty
    /// for nodes that represent unnamed positions (JSON array elements).
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the scalar value, if any.
    #[inline]
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Sets or clears the scalar value.
    pub fn set_value(&mut self, value: Option<String>) {
        self.value = value;
    }

    /// Returns the ordered child nodes.
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Returns a mutable reference to the child vector.
    pub fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    /// Appends a child node.
    pub fn push(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Returns `true` if the node has no children.
    #[inline]
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns the first child with the given key, if any.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ptconv::Node;
    ///
    /// let node = Node::new("list")
    ///     .with_child(Node::new("item").with_value("a"))
    ///     .with_child(Node::new("item").with_value("b"));
    /// assert_eq!(node.get("item").and_then(|n| n.value()), Some("a"));
    /// ```
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.key == key)
    }

    /// Returns an iterator over all children sharing the given key, in
    /// sibling order.
    pub fn children_with_key<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Node> {
        self.children.iter().filter(move |c| c.key == key)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.value, self.children.is_empty()) {
            (Some(v), true) => write!(f, "{} {:?}", self.key, v),
            (Some(v), false) => write!(f, "{} {:?} ({} children)", self.key, v, self.children.len()),
            (None, true) => write!(f, "{}", self.key),
            (None, false) => write!(f, "{} ({} children)", self.key, self.children.len()),
        }
    }
}

/// An ordered sequence of top-level [`Node`]s.
///
/// A `Tree` is what a decode operation produces and what an encode
/// operation consumes. It owns all descendant nodes outright; each
/// conversion constructs a fresh tree and discards it afterwards, so no
/// state is shared between conversions.
///
/// Structural equality (`PartialEq`) includes sibling order and duplicate
/// keys, which makes it the equality used by the round-trip contract:
/// encoding a tree and decoding the result in the same format must
/// reproduce an equal tree.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Tree {
    children: Vec<Node>,
}

impl Tree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Tree {
            children: Vec::new(),
        }
    }

    /// Returns the top-level nodes.
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Returns a mutable reference to the top-level node vector.
    pub fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    /// Appends a top-level node.
    pub fn push(&mut self, node: Node) {
        self.children.push(node);
    }

    /// Returns the number of top-level nodes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns `true` if the tree has no top-level nodes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns the first top-level node with the given key, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.children.iter().find(|c| c.key() == key)
    }

    /// Returns an iterator over the top-level nodes.
    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.children.iter()
    }
}

impl From<Vec<Node>> for Tree {
    fn from(children: Vec<Node>) -> Self {
        Tree { children }
    }
}

impl IntoIterator for Tree {
    type Item = Node;
    type IntoIter = std::vec::IntoIter<Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.into_iter()
    }
}

impl<'a> IntoIterator for &'a Tree {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.iter()
    }
}

impl FromIterator<Node> for Tree {
    fn from_iter<T: IntoIterator<Item = Node>>(iter: T) -> Self {
        Tree {
            children: iter.into_iter().collect(),
        }
    }
}

impl Extend<Node> for Tree {
    fn extend<T: IntoIterator<Item = Node>>(&mut self, iter: T) {
        self.children.extend(iter);
    }
}
