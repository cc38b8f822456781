//! # ptconv
//!
//! Convert hierarchical key/value configuration data between XML, JSON,
//! INI, and INFO text formats.
//!
//! ## How it works
//!
//! Every format decodes into the same in-memory model: an ordered,
//! multi-valued, recursively nested key/value [`Tree`] of [`Node`]s. A
//! conversion is two steps with nothing in between:
//!
//! 1. decode the input under the source format's grammar into a `Tree`
//! 2. encode that `Tree` under the destination format's grammar
//!
//! The formats differ in expressive power, and the codecs make the
//! differences explicit instead of papering over them:
//!
//! - **INFO** (`key "value" { children }` blocks) is the lossless
//!   baseline; every tree is representable
//! - **XML** needs a single root element and named elements; attributes
//!   ride along in an `<xmlattr>` pseudo-node
//! - **JSON** cannot express duplicate object keys, so repeated sibling
//!   keys become arrays (and back again)
//! - **INI** is two levels deep, full stop
//!
//! A tree the destination grammar cannot represent is rejected with a
//! [`Error::Structural`] mismatch; nothing is silently truncated, and a
//! failed conversion writes no output at all.
//!
//! ## Quick start
//!
//! ```rust
//! use ptconv::{convert_str, Format};
//!
//! let info = r#"server { host "localhost" port "8080" }"#;
//! let json = convert_str(Format::Info, Format::Json, info).unwrap();
//! assert!(json.contains("\"host\": \"localhost\""));
//! ```
//!
//! ## Working with trees directly
//!
//! ```rust
//! use ptconv::{tree, Format};
//!
//! let config = tree! {
//!     "item" => "a",
//!     "item" => "b",
//! };
//!
//! // Repeated sibling keys become a JSON array.
//! let json = Format::Json.encode(&config).unwrap();
//! let back = Format::Json.decode(&json).unwrap();
//! assert_eq!(back, config);
//! ```

pub mod error;
pub mod format;
pub mod ini;
pub mod info;
pub mod json;
pub mod macros;
pub mod tree;
pub mod xml;

pub use error::{Error, Result};
pub use format::Format;
pub use tree::{Node, Tree};
pub use xml::ATTR_KEY;

use std::io;

/// Decodes a string under the named format's grammar into a fresh [`Tree`].
///
/// # Examples
///
/// ```rust
/// use ptconv::{decode_str, Format};
///
/// let tree = decode_str(Format::Ini, "[s]\nkey=value\n").unwrap();
/// assert_eq!(tree.get("s").unwrap().children().len(), 1);
/// ```
///
/// # Errors
///
/// Returns [`Error::Parse`] on malformed input.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode_str(format: Format, input: &str) -> Result<Tree> {
    format.decode(input)
}

/// Decodes the full contents of a reader under the named format's grammar.
///
/// The reader is consumed to end-of-stream before parsing begins; each
/// conversion processes one bounded input to completion or failure.
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails and [`Error::Parse`] on
/// malformed input.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode_reader<R: io::Read>(format: Format, mut reader: R) -> Result<Tree> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    format.decode(&input)
}

/// Encodes a tree under the named format's grammar.
///
/// # Errors
///
/// Returns [`Error::Structural`] when the tree contains a shape the
/// format cannot represent.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode_string(format: Format, tree: &Tree) -> Result<String> {
    format.encode(tree)
}

/// Encodes a tree under the named format's grammar and writes it out.
///
/// The encoded text is built in full before anything is written, so a
/// structural mismatch leaves the writer untouched.
///
/// # Errors
///
/// Returns [`Error::Structural`] for unrepresentable trees and
/// [`Error::Io`] if writing fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode_writer<W: io::Write>(format: Format, tree: &Tree, mut writer: W) -> Result<()> {
    let output = format.encode(tree)?;
    writer.write_all(output.as_bytes())?;
    Ok(())
}

/// Converts a string from one format to another.
///
/// # Examples
///
/// ```rust
/// use ptconv::{convert_str, Format};
///
/// let ini = convert_str(
///     Format::Json,
///     Format::Ini,
///     r#"{"server": {"port": "8080"}}"#,
/// )
/// .unwrap();
/// assert_eq!(ini, "[server]\nport=8080\n");
/// ```
///
/// # Errors
///
/// Returns [`Error::Parse`] if decoding fails; encoding is never attempted
/// in that case. Returns [`Error::Structural`] if the decoded tree cannot
/// be represented in the destination format.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn convert_str(from: Format, to: Format, input: &str) -> Result<String> {
    let tree = from.decode(input)?;
    to.encode(&tree)
}

/// Converts the full contents of a reader into a writer.
///
/// Orchestration order: decode fully, then encode fully, then write. If
/// decoding or encoding fails, the writer is never touched, so a failed
/// conversion produces no partial output.
///
/// # Errors
///
/// Returns [`Error::Io`] for read/write failures, [`Error::Parse`] for
/// malformed input, and [`Error::Structural`] for unrepresentable trees.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn convert<R: io::Read, W: io::Write>(
    from: Format,
    to: Format,
    reader: R,
    mut writer: W,
) -> Result<()> {
    let tree = decode_reader(from, reader)?;
    let output = to.encode(&tree)?;
    writer.write_all(output.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_str_info_to_json() {
        let json = convert_str(Format::Info, Format::Json, "key \"value\"\n").unwrap();
        let reparsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(reparsed, serde_json::json!({"key": "value"}));
    }

    #[test]
    fn test_convert_same_format_is_identity_on_trees() {
        let input = "a \"1\"\nb\n{\n    c \"2\"\n}\n";
        let once = decode_str(Format::Info, input).unwrap();
        let twice =
            decode_str(Format::Info, &encode_string(Format::Info, &once).unwrap()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_convert_writer_untouched_on_decode_failure() {
        let mut out = Vec::new();
        let err = convert(
            Format::Xml,
            Format::Info,
            "<a><b></a>".as_bytes(),
            &mut out,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
        assert!(out.is_empty());
    }

    #[test]
    fn test_convert_writer_untouched_on_encode_failure() {
        let deep = "a { b { c \"v\" } }";
        let mut out = Vec::new();
        let err = convert(Format::Info, Format::Ini, deep.as_bytes(), &mut out).unwrap_err();
        assert!(matches!(err, Error::Structural { .. }));
        assert!(out.is_empty());
    }

    #[test]
    fn test_decode_reader() {
        let cursor = std::io::Cursor::new(b"[s]\nk=v\n");
        let tree = decode_reader(Format::Ini, cursor).unwrap();
        assert_eq!(
            tree.get("s").unwrap().get("k").and_then(|n| n.value()),
            Some("v")
        );
    }

    #[test]
    fn test_encode_writer() {
        let tree = crate::tree! { "k" => "v" };
        let mut out = Vec::new();
        encode_writer(Format::Info, &tree, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "k \"v\"\n");
    }
}
