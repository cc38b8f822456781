/// Builds a [`Tree`](crate::Tree) from a literal description.
///
/// Each entry is `key => rhs` where `rhs` is one of:
///
/// - a string literal: a leaf node with that value
/// - `()`: a node with neither value nor children
/// - `{ ... }`: a node with child entries
/// - `(value, { ... })`: a node with both a value and children
///
/// # Examples
///
/// ```rust
/// use ptconv::tree;
///
/// let config = tree! {
///     "host" => "localhost",
///     "server" => {
///         "port" => "8080",
///         "port" => "8081",
///     },
/// };
///
/// assert_eq!(config.get("host").and_then(|n| n.value()), Some("localhost"));
/// assert_eq!(config.get("server").unwrap().children().len(), 2);
/// ```
#[macro_export]
macro_rules! tree {
    () => {
        $crate::Tree::new()
    };
    ( $( $key:literal => $rhs:tt ),+ $(,)? ) => {{
        let mut tree = $crate::Tree::new();
        $( tree.push($crate::tree_node!($key => $rhs)); )+
        tree
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! tree_node {
    ($key:literal => ()) => {
        $crate::Node::new($key)
    };
    ($key:literal => { $($inner:tt)* }) => {{
        let mut node = $crate::Node::new($key);
        node.children_mut().extend($crate::tree! { $($inner)* });
        node
    }};
    ($key:literal => ( $value:literal, { $($inner:tt)* } $(,)? )) => {{
        let mut node = $crate::Node::new($key).with_value($value);
        node.children_mut().extend($crate::tree! { $($inner)* });
        node
    }};
    ($key:literal => $value:expr) => {
        $crate::Node::new($key).with_value($value)
    };
}

#[cfg(test)]
mod tests {
    use crate::{Node, Tree};

    #[test]
    fn test_tree_macro_empty() {
        assert_eq!(tree!(), Tree::new());
    }

    #[test]
    fn test_tree_macro_leaves() {
        let tree = tree! { "a" => "1", "b" => () };
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.get("a").and_then(|n| n.value()), Some("1"));
        assert_eq!(tree.get("b").and_then(|n| n.value()), None);
    }

    #[test]
    fn test_tree_macro_nested() {
        let tree = tree! {
            "outer" => ("v", {
                "inner" => "1",
                "inner" => "2",
            }),
        };

        let expected = {
            let mut outer = Node::new("outer").with_value("v");
            outer.push(Node::new("inner").with_value("1"));
            outer.push(Node::new("inner").with_value("2"));
            let mut t = Tree::new();
            t.push(outer);
            t
        };
        assert_eq!(tree, expected);
    }
}
