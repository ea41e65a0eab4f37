#![doc = r#"
⚠️ INTERNAL CRATE – NOT A STABLE API

Tree Model shared by the XML and JSON views of a build-configuration
document.

Do NOT depend on this crate directly.
Use `lvjson-io` instead.
"#]

pub mod json;
pub mod model;

pub use json::{parse_json_str, to_pretty_json};
pub use model::{
    ATTRIBUTE_PREFIX, Map, NodeKind, TEXT_KEY, Tree, TreeError, attribute_name, kind_of,
    root_element, scalar_text,
};
