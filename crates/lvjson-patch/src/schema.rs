use lvjson_tree::Tree;
use lvjson_catalog::found_schema_version;
use serde_yaml::{Mapping, Value};

use crate::error::PatchError;

/// Schema version accepted in the `{schema_version, patch}` envelope.
pub const PATCH_SCHEMA_VERSION: i64 = 1;

/// One `(key, value)` edit. `key` is a dotted path or an alias.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchEntry {
    pub key: String,
    pub value: Tree,
}

/// Ordered list of edits, applied strictly in the order given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatchSet {
    entries: Vec<PatchEntry>,
}

impl PatchSet {
    pub fn new(entries: Vec<PatchEntry>) -> Self {
        Self { entries }
    }

    /// Parse a patch specification.
    ///
    /// Accepted shapes:
    /// - a flat mapping of key → value
    /// - an envelope `{schema_version: 1, patch: {key: value, ...}}`
    ///
    /// Empty input (or a document that is just `null`) is an empty set.
    pub fn from_yaml_str(s: &str) -> Result<Self, PatchError> {
        if s.trim().is_empty() {
            return Ok(Self::default());
        }

        let doc: Value = serde_yaml::from_str(s)?;
        let map = match doc {
            Value::Null => return Ok(Self::default()),
            Value::Mapping(map) => map,
            _ => {
                return Err(PatchError::Malformed(
                    "patch specification must be a mapping".to_string(),
                ));
            }
        };

        let body = if map.contains_key("schema_version") {
            unwrap_envelope(map)?
        } else {
            map
        };

        let mut entries = Vec::with_capacity(body.len());
        for (k, v) in body {
            let key = match k {
                Value::String(s) => s,
                other => {
                    return Err(PatchError::Malformed(format!(
                        "patch keys must be strings, found {other:?}"
                    )));
                }
            };
            let value = serde_json::to_value(&v).map_err(|e| {
                PatchError::Malformed(format!("value for '{key}' is not JSON-compatible: {e}"))
            })?;
            entries.push(PatchEntry { key, value });
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[PatchEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, key: impl Into<String>, value: Tree) {
        self.entries.push(PatchEntry {
            key: key.into(),
            value,
        });
    }
}

fn unwrap_envelope(mut map: Mapping) -> Result<Mapping, PatchError> {
    let version = map.get("schema_version");
    if version.and_then(Value::as_i64) != Some(PATCH_SCHEMA_VERSION) {
        return Err(PatchError::UnsupportedSchemaVersion(found_schema_version(version)));
    }

    match map.remove("patch") {
        Some(Value::Mapping(body)) => Ok(body),
        Some(Value::Null) => Ok(Mapping::new()),
        Some(_) => Err(PatchError::Malformed(
            "envelope 'patch' must be a mapping".to_string(),
        )),
        None => Err(PatchError::Malformed(
            "envelope is missing 'patch'".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flat_mapping_keeps_order_and_types() {
        let set = PatchSet::from_yaml_str(
            "z.last: 1\na.first: \"1.0.0.1\"\nflag: true\nnothing: null\nobj:\n  k: v\n",
        )
        .unwrap();
        let keys: Vec<&str> = set.entries().iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, ["z.last", "a.first", "flag", "nothing", "obj"]);
        assert_eq!(set.entries()[0].value, json!(1));
        assert_eq!(set.entries()[1].value, json!("1.0.0.1"));
        assert_eq!(set.entries()[2].value, json!(true));
        assert_eq!(set.entries()[3].value, json!(null));
        assert_eq!(set.entries()[4].value, json!({"k": "v"}));
    }

    #[test]
    fn envelope_is_unwrapped() {
        let set = PatchSet::from_yaml_str("schema_version: 1\npatch:\n  a.b: x\n").unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.entries()[0].key, "a.b");

        let empty = PatchSet::from_yaml_str("schema_version: 1\npatch:\n").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn envelope_version_is_checked() {
        let err = PatchSet::from_yaml_str("schema_version: 3\npatch: {}\n").unwrap_err();
        assert!(matches!(err, PatchError::UnsupportedSchemaVersion(Some(ref v)) if v == "3"));

        let err = PatchSet::from_yaml_str("schema_version: \"1\"\npatch: {}\n").unwrap_err();
        assert!(err.to_string().contains("schema_version \"1\""), "{err}");

        let err = PatchSet::from_yaml_str("schema_version: 1\n").unwrap_err();
        assert!(matches!(err, PatchError::Malformed(_)));
    }

    #[test]
    fn empty_documents_are_empty_sets() {
        assert!(PatchSet::from_yaml_str("").unwrap().is_empty());
        assert!(PatchSet::from_yaml_str("  \n\n").unwrap().is_empty());
        assert!(PatchSet::from_yaml_str("~\n").unwrap().is_empty());
    }

    #[test]
    fn rejects_non_mapping_documents_and_keys() {
        assert!(matches!(
            PatchSet::from_yaml_str("- a\n- b\n"),
            Err(PatchError::Malformed(_))
        ));
        assert!(matches!(
            PatchSet::from_yaml_str("1: a\n"),
            Err(PatchError::Malformed(_))
        ));
        assert!(matches!(
            PatchSet::from_yaml_str("a: [\n"),
            Err(PatchError::Yaml(_))
        ));
    }
}
