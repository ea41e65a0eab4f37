//! Error type shared by the encoder and decoder.

use std::io;

use lvjson_tree::NodeKind;

/// Errors that can occur while converting between XML and the Tree Model.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// The source XML is malformed.
    #[error("malformed XML at byte {position} (line {line}): {message}")]
    Parse {
        position: u64,
        line: usize,
        message: String,
    },

    /// The root element is not the one the document kind requires.
    #[error("expected root element <{expected}>, found <{found}>")]
    SchemaMismatch { expected: String, found: String },

    /// The tree does not have the shape the decoder needs.
    #[error("invalid tree structure: {0}")]
    Structure(String),

    /// A value at `path` cannot be rendered as XML content.
    #[error("cannot render {kind} at '{path}' as XML")]
    UnsupportedNode { path: String, kind: NodeKind },

    /// A key at `path` would become an element or attribute name that is
    /// not a valid XML name.
    #[error("'{name}' at '{path}' is not a valid XML name")]
    InvalidName { path: String, name: String },

    /// An I/O error while writing XML.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
