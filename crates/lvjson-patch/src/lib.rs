pub mod apply;
pub mod error;
pub mod path;
pub mod schema;

pub use apply::{KeyMode, MAX_ARRAY_GROWTH, PatchEngine, PatchReport};
pub use error::PatchError;
pub use path::{PatchPath, Segment};
pub use schema::{PATCH_SCHEMA_VERSION, PatchEntry, PatchSet};
