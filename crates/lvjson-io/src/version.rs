//! Schema version constants for the on-disk formats this workspace reads.

/// Alias catalog `schema_version` accepted by the patch pipeline.
pub const CATALOG_SCHEMA_V: i64 = lvjson_catalog::SUPPORTED_SCHEMA_VERSION;

/// Patch envelope `schema_version` (`{schema_version, patch}`).
pub const PATCH_SCHEMA_V: i64 = lvjson_patch::PATCH_SCHEMA_VERSION;

/// JSON Schema bundle version for the Tree Model schema under `spec/schemas/`.
///
/// Bump this if the key conventions change.
pub const TREE_SCHEMA_V: u8 = 1;
