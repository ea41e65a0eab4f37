use core::fmt;

/// The Tree Model.
///
/// `serde_json` is built with `preserve_order`, so objects keep the order in
/// which keys were inserted (document order for encoded XML).
pub type Tree = serde_json::Value;

/// Ordered object map used for Tree Model objects.
pub type Map = serde_json::Map<String, Tree>;

/// Key prefix marking an XML attribute (`@name`).
pub const ATTRIBUTE_PREFIX: &str = "@";

/// Key holding the concatenated text content of an element.
pub const TEXT_KEY: &str = "__text";

#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// JSON text could not be parsed.
    #[error("invalid JSON at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    /// The tree does not have the shape a consumer needs.
    #[error("invalid tree structure: {0}")]
    Structure(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Object,
    Array,
    String,
    Number,
    Boolean,
    Null,
}

impl NodeKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            NodeKind::Object => "object",
            NodeKind::Array => "array",
            NodeKind::String => "string",
            NodeKind::Number => "number",
            NodeKind::Boolean => "boolean",
            NodeKind::Null => "null",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str((*self).as_str())
    }
}

pub fn kind_of(node: &Tree) -> NodeKind {
    match node {
        Tree::Object(_) => NodeKind::Object,
        Tree::Array(_) => NodeKind::Array,
        Tree::String(_) => NodeKind::String,
        Tree::Number(_) => NodeKind::Number,
        Tree::Bool(_) => NodeKind::Boolean,
        Tree::Null => NodeKind::Null,
    }
}

/// Return the root element name and its encoding.
///
/// A tree produced by the encoder is an object with exactly one key, the
/// root element's tag name.
pub fn root_element(tree: &Tree) -> Result<(&str, &Tree), TreeError> {
    let obj = tree.as_object().ok_or_else(|| {
        TreeError::Structure(format!(
            "top level must be an object, found {}",
            kind_of(tree)
        ))
    })?;

    let mut entries = obj.iter();
    match (entries.next(), entries.next()) {
        (Some((name, node)), None) => Ok((name.as_str(), node)),
        (None, _) => Err(TreeError::Structure(
            "top level object has no root element key".to_string(),
        )),
        (Some(_), Some(_)) => Err(TreeError::Structure(format!(
            "top level object must have exactly one root element key, found {}",
            obj.len()
        ))),
    }
}

/// String form of a scalar leaf.
///
/// Numbers use serde_json's formatting, which does not depend on locale.
/// `Null` renders as the empty string. Containers return `None`.
pub fn scalar_text(node: &Tree) -> Option<String> {
    match node {
        Tree::String(s) => Some(s.clone()),
        Tree::Number(n) => Some(n.to_string()),
        Tree::Bool(b) => Some(if *b { "true" } else { "false" }.to_string()),
        Tree::Null => Some(String::new()),
        Tree::Object(_) | Tree::Array(_) => None,
    }
}

/// Attribute name for an `@name` key, if the key marks an attribute.
pub fn attribute_name(key: &str) -> Option<&str> {
    key.strip_prefix(ATTRIBUTE_PREFIX)
}
