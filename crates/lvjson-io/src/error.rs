use std::io;
use std::path::PathBuf;

use lvjson_catalog::CatalogError;
use lvjson_patch::PatchError;
use lvjson_tree::TreeError;
use lvjson_xml::XmlError;

/// Any failure of a conversion run. Every error is fatal to the run.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("{action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Xml(#[from] XmlError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("{}: {source}", .origin.display())]
    Patch {
        origin: PathBuf,
        #[source]
        source: PatchError,
    },

    #[error("failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConvertError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        ConvertError::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// `true` for filesystem failures, as opposed to errors in the documents.
    pub fn is_io(&self) -> bool {
        matches!(self, ConvertError::Io { .. } | ConvertError::Catalog(CatalogError::Io { .. }))
    }
}
