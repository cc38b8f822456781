//! The INI codec: two-level sections of flat key/value pairs.
//!
//! ```text
//! ; global keys attach to the root
//! title=example
//!
//! [server]
//! host=localhost
//! port=8080
//! ```
//!
//! INI is the most constrained of the supported grammars: top-level nodes
//! are sections (or root-level leaves), their children are flat pairs, and
//! nothing nests further. Decoding a tree that is deeper than two levels,
//! or otherwise outside this shape, fails fast with a structural mismatch
//! instead of silently truncating.
//!
//! Duplicate section names and duplicate keys within one scope are parse
//! errors; [`IndexMap`] provides the ordered duplicate detection.

use crate::{Error, Format, Node, Result, Tree};
use indexmap::IndexMap;

pub(crate) fn decode(input: &str) -> Result<Tree> {
    // Root-level pairs must precede the first section header; afterwards
    // every pair attaches to the current section.
    let mut root: IndexMap<String, Option<String>> = IndexMap::new();
    let mut sections: IndexMap<String, IndexMap<String, Option<String>>> = IndexMap::new();
    let mut current: Option<String> = None;

    for (idx, raw) in input.lines().enumerate() {
        let lineno = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if let Some(rest) = line.strip_prefix('[') {
            let Some(name) = rest.strip_suffix(']') else {
                return Err(Error::parse(
                    Format::Ini,
                    lineno,
                    line.len(),
                    "unterminated section header, expected `]`",
                ));
            };
            let name = name.trim();
            if name.is_empty() {
                return Err(Error::parse(Format::Ini, lineno, 1, "empty section name"));
            }
            if sections.contains_key(name) {
                return Err(Error::parse(
                    Format::Ini,
                    lineno,
                    1,
                    format!("duplicate section `{name}`"),
                ));
            }
            sections.insert(name.to_string(), IndexMap::new());
            current = Some(name.to_string());
            continue;
        }

        let Some(eq) = line.find('=') else {
            return Err(Error::parse(
                Format::Ini,
                lineno,
                1,
                format!("expected `key=value`, found `{line}`"),
            ));
        };
        let key = line[..eq].trim();
        let value = line[eq + 1..].trim();
        if key.is_empty() {
            return Err(Error::parse(Format::Ini, lineno, 1, "empty key"));
        }

        let scope = match &current {
            Some(name) => sections.get_mut(name).expect("current section exists"),
            None => &mut root,
        };
        if scope
            .insert(key.to_string(), Some(value.to_string()))
            .is_some()
        {
            return Err(Error::parse(
                Format::Ini,
                lineno,
                1,
                format!("duplicate key `{key}`"),
            ));
        }
    }

    let mut tree = Tree::new();
    for (key, value) in root {
        let mut node = Node::new(key);
        node.set_value(value);
        tree.push(node);
    }
    for (name, pairs) in sections {
        let mut section = Node::new(name);
        for (key, value) in pairs {
            let mut node = Node::new(key);
            node.set_value(value);
            section.push(node);
        }
        tree.push(section);
    }
    Ok(tree)
}

pub(crate) fn encode(tree: &Tree) -> Result<String> {
    let mut out = String::new();
    let mut seen_section = false;

    for node in tree {
        check_name(node.key(), "key")?;
        if node.is_leaf() {
            if seen_section {
                return Err(Error::structural(
                    Format::Ini,
                    format!(
                        "root-level key `{}` after a section would attach to that section",
                        node.key()
                    ),
                ));
            }
            write_pair(&mut out, node)?;
        } else {
            if node.value().is_some() {
                return Err(Error::structural(
                    Format::Ini,
                    format!("section `{}` cannot carry a value of its own", node.key()),
                ));
            }
            if seen_section {
                out.push('\n');
            }
            out.push('[');
            out.push_str(node.key());
            out.push_str("]\n");
            seen_section = true;
            for child in node.children() {
                check_name(child.key(), "key")?;
                if !child.is_leaf() {
                    return Err(Error::structural(
                        Format::Ini,
                        format!(
                            "key `{}` in section `{}` has children; INI allows only two levels",
                            child.key(),
                            node.key()
                        ),
                    ));
                }
                write_pair(&mut out, child)?;
            }
        }
    }
    Ok(out)
}

fn write_pair(out: &mut String, node: &Node) -> Result<()> {
    let value = node.value().unwrap_or("");
    if value.contains('\n') || value.contains('\r') {
        return Err(Error::structural(
            Format::Ini,
            format!("value of `{}` contains a line break", node.key()),
        ));
    }
    out.push_str(node.key());
    out.push('=');
    out.push_str(value);
    out.push('\n');
    Ok(())
}

fn check_name(name: &str, what: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::structural(Format::Ini, format!("empty {what} name")));
    }
    if name.contains(['[', ']', '=', '\n', '\r', ';', '#']) {
        return Err(Error::structural(
            Format::Ini,
            format!("{what} `{name}` contains characters the INI grammar reserves"),
        ));
    }
    Ok(())
}
