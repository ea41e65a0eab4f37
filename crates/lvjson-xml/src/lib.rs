//! XML ↔ Tree Model conversion for build-configuration documents.
//!
//! # Encoding conventions
//!
//! - every element becomes an object
//! - attribute `name="v"` becomes key `@name` with a string value
//! - text content becomes key `__text`
//! - child elements are keyed by tag name; repeated siblings collapse into an array
//!
//! # Output layout
//!
//! - no XML declaration
//! - two-space indentation, CRLF line endings
//! - UTF-8 without BOM
//! - empty elements render as `<name/>`

pub mod decode;
pub mod encode;
pub mod error;

pub use decode::decode;
pub use encode::{EncodeOptions, Whitespace, encode};
pub use error::XmlError;
