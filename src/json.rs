//! The JSON codec, backed by `serde_json` with order-preserving objects.
//!
//! The tree model is richer than JSON in one direction (duplicate sibling
//! keys) and poorer in another (all scalars are strings), so the mapping is
//! asymmetric by design:
//!
//! - object entries become named child nodes, in document order
//! - an array under key `k` becomes repeated siblings all keyed `k`; the
//!   elements of a top-level array, and of an array directly nested inside
//!   another array, take the synthetic empty key `""`
//! - scalars decode to their literal text (`42` → `"42"`, `true` →
//!   `"true"`); `null` decodes to a node with no value, and both encode
//!   back the same way (strings and `null` only)
//!
//! Encoding reverses this: each maximal run of consecutive same-keyed
//! siblings of length > 1 becomes `key: [...]`. Shapes JSON objects cannot
//! express without losing order or data are rejected with a structural
//! error rather than silently merged: a key recurring in non-adjacent
//! runs, unnamed siblings mixed with named ones, and nodes carrying both a
//! value and children.

use crate::{Error, Format, Node, Result, Tree};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value as JsonValue};

pub(crate) fn decode(input: &str) -> Result<Tree> {
    let value: JsonValue = serde_json::from_str(input)
        .map_err(|e| Error::parse(Format::Json, e.line(), e.column(), e.to_string()))?;
    tree_from_value(value)
}

fn tree_from_value(value: JsonValue) -> Result<Tree> {
    let mut children = Vec::new();
    match value {
        JsonValue::Object(map) => {
            for (key, entry) in map {
                expand(&key, entry, &mut children);
            }
        }
        JsonValue::Array(items) => expand("", JsonValue::Array(items), &mut children),
        _ => {
            return Err(Error::parse(
                Format::Json,
                1,
                1,
                "expected object or array at top level",
            ))
        }
    }
    Ok(Tree::from(children))
}

/// Expands one JSON value under `key` into sibling nodes. Arrays fan out
/// into one node per element; a directly nested array becomes a node whose
/// children carry the empty key.
fn expand(key: &str, value: JsonValue, out: &mut Vec<Node>) {
    match value {
        JsonValue::Array(items) => {
            for item in items {
                if matches!(item, JsonValue::Array(_)) {
                    let mut node = Node::new(key);
                    expand("", item, node.children_mut());
                    out.push(node);
                } else {
                    expand_scalar_or_object(key, item, out);
                }
            }
        }
        other => expand_scalar_or_object(key, other, out),
    }
}

fn expand_scalar_or_object(key: &str, value: JsonValue, out: &mut Vec<Node>) {
    let mut node = Node::new(key);
    match value {
        JsonValue::Null => {}
        JsonValue::Bool(b) => node.set_value(Some(b.to_string())),
        JsonValue::Number(n) => node.set_value(Some(n.to_string())),
        JsonValue::String(s) => node.set_value(Some(s)),
        JsonValue::Object(map) => {
            for (k, v) in map {
                expand(&k, v, node.children_mut());
            }
        }
        JsonValue::Array(_) => unreachable!("arrays are fanned out by expand"),
    }
    out.push(node);
}

pub(crate) fn encode(tree: &Tree) -> Result<String> {
    let value = children_to_value(tree.children())?;
    serde_json::to_string_pretty(&value).map_err(|e| Error::io(e.to_string()))
}

/// Converts an ordered sibling sequence into a JSON value: an array when
/// every sibling is unnamed, otherwise an object of per-run entries.
fn children_to_value(children: &[Node]) -> Result<JsonValue> {
    if !children.is_empty() && children.iter().all(|c| c.key().is_empty()) {
        let items = children
            .iter()
            .map(node_to_value)
            .collect::<Result<Vec<_>>>()?;
        return Ok(JsonValue::Array(items));
    }

    let mut map = Map::new();
    let mut i = 0;
    while i < children.len() {
        let key = children[i].key();
        if key.is_empty() {
            return Err(Error::structural(
                Format::Json,
                "unnamed siblings mixed with named keys cannot form a JSON object",
            ));
        }
        let mut j = i + 1;
        while j < children.len() && children[j].key() == key {
            j += 1;
        }
        let value = if j - i == 1 {
            let value = node_to_value(&children[i])?;
            if value.is_array() {
                // A lone node with unnamed children must stay a nested
                // array, or decoding would fan it out into siblings.
                JsonValue::Array(vec![value])
            } else {
                value
            }
        } else {
            JsonValue::Array(
                children[i..j]
                    .iter()
                    .map(node_to_value)
                    .collect::<Result<Vec<_>>>()?,
            )
        };
        if map.insert(key.to_string(), value).is_some() {
            return Err(Error::structural(
                Format::Json,
                format!("key `{key}` recurs in non-adjacent runs; merging would lose sibling order"),
            ));
        }
        i = j;
    }
    Ok(JsonValue::Object(map))
}

fn node_to_value(node: &Node) -> Result<JsonValue> {
    if node.is_leaf() {
        Ok(match node.value() {
            Some(v) => JsonValue::String(v.to_string()),
            None => JsonValue::Null,
        })
    } else if node.value().is_some() {
        Err(Error::structural(
            Format::Json,
            format!("node `{}` has both a value and children", node.key()),
        ))
    } else {
        children_to_value(node.children())
    }
}

impl Serialize for Tree {
    /// Serializes the tree through the JSON-shaped mapping, allowing trees
    /// to be embedded in any serde-produced document.
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let value = children_to_value(self.children()).map_err(serde::ser::Error::custom)?;
        value.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Tree {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = JsonValue::deserialize(deserializer)?;
        tree_from_value(value).map_err(serde::de::Error::custom)
    }
}
