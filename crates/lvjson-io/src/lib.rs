//! `lvjson-io` is the single supported public entrypoint for converting LabVIEW
//! build-configuration documents (`.lvproj`, `.vipb`) between XML and JSON,
//! and for patching the JSON form before it is turned back into XML.
//!
//! This crate intentionally contains **no** source-control or process logic.
//! Committing converted files or opening pull requests belongs in higher layers.
//! `lvjson-io` focuses on:
//! - document kinds and their root elements
//! - conversion runs (encode, decode, decode with patches)
//! - atomic file output

// -----------------------------------------------------------------------------
// Public API contract
// -----------------------------------------------------------------------------
//
// Consumers SHOULD import from `lvjson_io::prelude::*`.
// Anything not re-exported via the prelude is considered internal and may change
// without notice.

mod convert;
mod error;
mod kind;

/// File output helpers (parent directory creation, atomic replace).
pub mod output;

/// Schema version constants for the on-disk formats.
pub mod version;

pub use convert::{
    ConvertOutcome, ConvertRequest, Mode, json_to_xml_string, run, xml_to_json_string,
};
pub use error::ConvertError;
pub use kind::DocumentKind;

// Re-export the Tree Model.
#[doc(hidden)]
pub mod tree {
    pub use lvjson_tree::{
        ATTRIBUTE_PREFIX, Map, NodeKind, TEXT_KEY, Tree, TreeError, parse_json_str,
        to_pretty_json,
    };
}

// Re-export the XML codec.
#[doc(hidden)]
pub mod xml {
    pub use lvjson_xml::{EncodeOptions, Whitespace, XmlError, decode, encode};
}

// Re-export the alias catalog and patch engine.
#[doc(hidden)]
pub mod patch {
    pub use lvjson_catalog::{AliasCatalog, CatalogError, DEFAULT_CATALOG_FILE};
    pub use lvjson_patch::{
        KeyMode, PatchEngine, PatchEntry, PatchError, PatchPath, PatchReport, PatchSet, Segment,
    };
}

/// Convenience prelude for consumers.
///
/// This is the **only supported** import surface for external users.
pub mod prelude {
    pub use crate::patch::{AliasCatalog, KeyMode, PatchEngine, PatchSet};
    pub use crate::tree::{Tree, parse_json_str, to_pretty_json};
    pub use crate::xml::{EncodeOptions, Whitespace};
    pub use crate::{
        ConvertError, ConvertOutcome, ConvertRequest, DocumentKind, Mode, json_to_xml_string,
        run, xml_to_json_string,
    };
}
