use lvjson_tree::NodeKind;

/// Errors raised while reading or applying a Patch Set.
///
/// Every error is fatal to the patch run; the engine never leaves a tree
/// partially patched.
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    #[error("invalid patch YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("malformed patch specification: {0}")]
    Malformed(String),

    #[error("unsupported patch schema_version {}; supported version is {}", describe_version(.0), crate::schema::PATCH_SCHEMA_VERSION)]
    UnsupportedSchemaVersion(Option<String>),

    #[error("invalid patch path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("unknown alias '{0}'")]
    UnknownAlias(String),

    #[error("key mode {0:?} needs an alias catalog")]
    MissingCatalog(crate::apply::KeyMode),

    #[error("patch path '{path}' runs into a {kind} at '{at}'")]
    PathConflict {
        path: String,
        at: String,
        kind: NodeKind,
    },
}

fn describe_version(v: &Option<String>) -> String {
    v.clone().unwrap_or_else(|| "(missing)".to_string())
}
