//! Error types for format conversion.
//!
//! Every failure mode of a conversion maps to one variant of [`Error`]:
//!
//! - **Unknown format**: the requested format name is not registered;
//!   reported before any I/O is performed
//! - **Parse errors**: malformed input under the source grammar, with
//!   line/column information where the parser can supply it
//! - **Structural mismatches**: the decoded tree has a shape the
//!   destination grammar cannot represent (e.g. nesting deeper than INI's
//!   two levels)
//! - **I/O errors**: reading the input or writing the output failed
//!
//! All errors are terminal for the conversion in progress: a conversion
//! either fully succeeds or writes nothing.
//!
//! ## Examples
//!
//! ```rust
//! use ptconv::{Error, Format};
//!
//! let err = Format::resolve("yaml").unwrap_err();
//! assert!(matches!(err, Error::UnknownFormat { .. }));
//! ```

use crate::Format;
use thiserror::Error;

/// Represents all possible errors produced by decoding, encoding, or
/// conversion.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The requested format name is not in the registry.
    #[error("unknown format `{name}` (expected one of: xml, json, ini, info)")]
    UnknownFormat { name: String },

    /// Malformed input under the source grammar.
    #[error("{format} parse error at line {line}, column {col}: {msg}")]
    Parse {
        format: Format,
        line: usize,
        col: usize,
        msg: String,
    },

    /// The tree contains a shape the destination grammar cannot represent.
    #[error("tree is not representable as {format}: {reason}")]
    Structural { format: Format, reason: String },

    /// IO error during reading or writing.
    #[error("IO error: {0}")]
    Io(String),
}

impl Error {
    /// Creates a parse error with line and column information.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ptconv::{Error, Format};
    ///
    /// let err = Error::parse(Format::Xml, 3, 7, "mismatched closing tag");
    /// assert!(err.to_string().contains("line 3"));
    /// ```
    pub fn parse(format: Format, line: usize, col: usize, msg: impl Into<String>) -> Self {
        Error::Parse {
            format,
            line,
            col,
            msg: msg.into(),
        }
    }

    /// Creates a structural mismatch error for a tree shape the destination
    /// format cannot represent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ptconv::{Error, Format};
    ///
    /// let err = Error::structural(Format::Ini, "nesting deeper than two levels");
    /// assert!(err.to_string().contains("ini"));
    /// ```
    pub fn structural(format: Format, reason: impl Into<String>) -> Self {
        Error::Structural {
            format,
            reason: reason.into(),
        }
    }

    /// Creates an unknown-format error for an unregistered format name.
    pub fn unknown_format(name: impl Into<String>) -> Self {
        Error::UnknownFormat { name: name.into() }
    }

    /// Creates an I/O error for read/write failures.
    pub fn io(msg: impl Into<String>) -> Self {
        Error::Io(msg.into())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
