//! Alias catalog: short, human-facing names for dotted paths into the Tree Model.
//!
//! ```yaml
//! schema_version: 1
//! aliases:
//!   version: Package.Library_General_Settings.Library_Version
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::Value;

/// The only catalog schema version this crate understands.
pub const SUPPORTED_SCHEMA_VERSION: i64 = 1;

/// Conventional catalog file name, resolved by the caller.
pub const DEFAULT_CATALOG_FILE: &str = "alias-catalog.yml";

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read alias catalog {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid alias catalog YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(
        "unsupported alias catalog schema_version {}; supported version is {}",
        describe_version(.0),
        SUPPORTED_SCHEMA_VERSION
    )]
    UnsupportedSchemaVersion(Option<String>),

    #[error("malformed alias catalog: {0}")]
    Malformed(String),

    #[error("unknown alias '{0}'")]
    UnknownAlias(String),
}

fn describe_version(v: &Option<String>) -> String {
    v.clone().unwrap_or_else(|| "(missing)".to_string())
}

/// Render a `schema_version` value as it was written, for error messages.
///
/// Only an integer can match a supported version; `1.0`, `"1"` and the like
/// are reported verbatim rather than as missing.
pub fn found_schema_version(value: Option<&Value>) -> Option<String> {
    value.map(|v| match v {
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("{s:?}"),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Sequence(_) => "a sequence".to_string(),
        Value::Mapping(_) => "a mapping".to_string(),
        Value::Tagged(t) => format!("a value tagged {}", t.tag),
    })
}

/// A loaded alias catalog. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasCatalog {
    schema_version: i64,
    aliases: BTreeMap<String, String>,
}

impl AliasCatalog {
    /// Read and parse a catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let s = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_yaml_str(&s)?;
        tracing::debug!(path = %path.display(), aliases = catalog.len(), "loaded alias catalog");
        Ok(catalog)
    }

    /// Parse a catalog from YAML text.
    ///
    /// The schema version is checked before `aliases` is looked at.
    pub fn from_yaml_str(s: &str) -> Result<Self, CatalogError> {
        let doc: Value = serde_yaml::from_str(s)?;
        let map = doc.as_mapping().ok_or_else(|| {
            CatalogError::Malformed("top level must be a mapping".to_string())
        })?;

        let version = map.get("schema_version");
        if version.and_then(Value::as_i64) != Some(SUPPORTED_SCHEMA_VERSION) {
            return Err(CatalogError::UnsupportedSchemaVersion(found_schema_version(
                version,
            )));
        }

        let aliases = match map.get("aliases") {
            Some(Value::Mapping(m)) => serde_yaml::from_value::<BTreeMap<String, String>>(
                Value::Mapping(m.clone()),
            )
            .map_err(|e| {
                CatalogError::Malformed(format!(
                    "aliases must map alias names to dotted paths: {e}"
                ))
            })?,
            Some(_) => {
                return Err(CatalogError::Malformed(
                    "aliases must be a mapping".to_string(),
                ));
            }
            None => return Err(CatalogError::Malformed("missing aliases".to_string())),
        };

        Ok(Self {
            schema_version: SUPPORTED_SCHEMA_VERSION,
            aliases,
        })
    }

    pub fn schema_version(&self) -> i64 {
        self.schema_version
    }

    /// Resolve an alias to its dotted path.
    pub fn resolve(&self, alias: &str) -> Result<&str, CatalogError> {
        self.get(alias)
            .ok_or_else(|| CatalogError::UnknownAlias(alias.to_string()))
    }

    pub fn get(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Aliases in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
