//! The format codec registry.
//!
//! [`Format`] is a fixed, closed set of variants, one per supported text
//! format. Each variant binds a decode and an encode function operating on
//! the shared [`Tree`] model, so a conversion is simply
//! `to.encode(&from.decode(input)?)`.
//!
//! Resolution from a user-supplied name happens once, before any I/O, so a
//! bad format name never partially consumes input:
//!
//! ```rust
//! use ptconv::{Error, Format};
//!
//! assert_eq!(Format::resolve("json").unwrap(), Format::Json);
//! assert!(matches!(
//!     Format::resolve("yaml"),
//!     Err(Error::UnknownFormat { .. })
//! ));
//! ```

use crate::{ini, info, json, xml};
use crate::{Error, Result, Tree};
use std::fmt;
use std::str::FromStr;

/// A supported serialization format, bound to its codec.
///
/// The set is closed by design: adding a format means adding a variant and
/// a codec module, not registering a plugin at runtime.
///
/// # Examples
///
/// ```rust
/// use ptconv::Format;
///
/// let tree = Format::Info.decode(r#"key "value""#).unwrap();
/// let json = Format::Json.encode(&tree).unwrap();
/// assert!(json.contains("\"key\""));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    /// Well-formed XML; attributes use the `<xmlattr>` pseudo-node
    /// convention.
    Xml,
    /// Standard JSON; repeated sibling keys map to arrays.
    Json,
    /// Two-level INI: `[section]` headers over flat `key=value` pairs.
    Ini,
    /// The native nested `key "value" { children }` grammar; the lossless
    /// baseline every tree can round-trip through.
    Info,
}

impl Format {
    /// All registered formats, in documentation order.
    pub const ALL: [Format; 4] = [Format::Xml, Format::Json, Format::Ini, Format::Info];

    /// Returns the registry name of this format.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Format::Xml => "xml",
            Format::Json => "json",
            Format::Ini => "ini",
            Format::Info => "info",
        }
    }

    /// Looks up a format by its registry name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownFormat`] if `name` is not registered. No
    /// input is consumed by a failed lookup.
    pub fn resolve(name: &str) -> Result<Format> {
        match name {
            "xml" => Ok(Format::Xml),
            "json" => Ok(Format::Json),
            "ini" => Ok(Format::Ini),
            "info" => Ok(Format::Info),
            other => Err(Error::unknown_format(other)),
        }
    }

    /// Parses `input` under this format's grammar into a fresh [`Tree`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] on malformed input, with line and column
    /// information where the grammar parser can supply it.
    pub fn decode(&self, input: &str) -> Result<Tree> {
        match self {
            Format::Xml => xml::decode(input),
            Format::Json => json::decode(input),
            Format::Ini => ini::decode(input),
            Format::Info => info::decode(input),
        }
    }

    /// Serializes `tree` under this format's grammar.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Structural`] when the tree contains a shape this
    /// format cannot represent; such trees are rejected rather than
    /// silently flattened or truncated.
    pub fn encode(&self, tree: &Tree) -> Result<String> {
        match self {
            Format::Xml => xml::encode(tree),
            Format::Json => json::encode(tree),
            Format::Ini => ini::encode(tree),
            Format::Info => info::encode(tree),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Format> {
        Format::resolve(s)
    }
}
