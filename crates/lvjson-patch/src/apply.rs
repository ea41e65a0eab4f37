use lvjson_catalog::{AliasCatalog, CatalogError};
use lvjson_tree::{Map, NodeKind, Tree, kind_of};

use crate::error::PatchError;
use crate::path::{PatchPath, Segment};
use crate::schema::PatchSet;

/// How patch keys are turned into dotted paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyMode {
    /// Every key is a literal dotted path.
    #[default]
    Literal,
    /// Every key is an alias; an alias missing from the catalog is an error.
    Alias,
    /// Keys found in the catalog are resolved, anything else is a literal path.
    AliasOrLiteral,
}

/// How far past the end of an existing array a `name[N]` segment may reach.
///
/// Indices beyond `len + MAX_ARRAY_GROWTH` are rejected as `InvalidPath`
/// instead of padding the array with that many empty objects.
pub const MAX_ARRAY_GROWTH: usize = 4096;

/// Outcome of a successful patch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchReport {
    /// Number of edits applied.
    pub applied: usize,
}

/// Applies Patch Sets to a Tree Model.
///
/// Semantics:
/// - edits are applied in input order; the last write to a path wins
/// - missing intermediate objects are created
/// - an array stored where a plain key descends is replaced by an empty object
/// - `name[N]` pads the array at `name` with empty objects up to index N
/// - descending into a string, number, boolean or null is a `PathConflict`
/// - the final segment replaces whatever was there (no deep merge)
///
/// Every key is resolved before anything is written, and edits are made on
/// a working copy, so a failed run leaves the caller's tree untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatchEngine<'a> {
    mode: KeyMode,
    catalog: Option<&'a AliasCatalog>,
}

impl<'a> PatchEngine<'a> {
    /// Engine for literal dotted paths.
    pub fn literal() -> Self {
        Self::default()
    }

    pub fn new(mode: KeyMode, catalog: Option<&'a AliasCatalog>) -> Result<Self, PatchError> {
        if mode != KeyMode::Literal && catalog.is_none() {
            return Err(PatchError::MissingCatalog(mode));
        }
        Ok(Self { mode, catalog })
    }

    pub fn mode(&self) -> KeyMode {
        self.mode
    }

    /// Resolve a patch key to a parsed path according to the key mode.
    pub fn resolve(&self, key: &str) -> Result<PatchPath, PatchError> {
        let raw = match (self.mode, self.catalog) {
            (KeyMode::Literal, _) => key,
            (KeyMode::Alias, Some(catalog)) => catalog.resolve(key).map_err(|e| match e {
                CatalogError::UnknownAlias(alias) => PatchError::UnknownAlias(alias),
                other => PatchError::Malformed(other.to_string()),
            })?,
            (KeyMode::AliasOrLiteral, Some(catalog)) => catalog.get(key).unwrap_or(key),
            (mode, None) => return Err(PatchError::MissingCatalog(mode)),
        };
        PatchPath::parse(raw)
    }

    /// Apply every entry of `set` to `tree`.
    pub fn apply(&self, tree: &mut Tree, set: &PatchSet) -> Result<PatchReport, PatchError> {
        if set.is_empty() {
            return Ok(PatchReport::default());
        }

        let resolved = set
            .entries()
            .iter()
            .map(|e| self.resolve(&e.key).map(|path| (path, e)))
            .collect::<Result<Vec<_>, PatchError>>()?;

        let mut working = tree.clone();
        for (path, entry) in &resolved {
            set_path(&mut working, path, entry.value.clone())?;
            tracing::debug!(key = %entry.key, path = %path, "applied patch entry");
        }
        *tree = working;

        Ok(PatchReport {
            applied: resolved.len(),
        })
    }
}

/// Assign `value` at `path`, creating intermediate containers.
pub fn set_path(root: &mut Tree, path: &PatchPath, value: Tree) -> Result<(), PatchError> {
    let Some((last, parents)) = path.segments().split_last() else {
        return Err(PatchError::InvalidPath {
            path: path.to_string(),
            reason: "path is empty".to_string(),
        });
    };

    let mut node = root;
    for (depth, segment) in parents.iter().enumerate() {
        node = descend(node, segment, path, depth)?;
    }

    let depth = parents.len();
    let obj = as_object(node, path, depth)?;
    match last {
        Segment::Key(name) => {
            obj.insert(name.clone(), value);
        }
        Segment::Index { name, index } => {
            let items = array_slot(obj, name, path, depth)?;
            pad(items, *index, path)?;
            items[*index] = value;
        }
    }
    Ok(())
}

fn descend<'t>(
    node: &'t mut Tree,
    segment: &Segment,
    path: &PatchPath,
    depth: usize,
) -> Result<&'t mut Tree, PatchError> {
    let obj = as_object(node, path, depth)?;
    let slot = match segment {
        Segment::Key(name) => obj
            .entry(name.clone())
            .or_insert_with(|| Tree::Object(Map::new())),
        Segment::Index { name, index } => {
            let items = array_slot(obj, name, path, depth)?;
            pad(items, *index, path)?;
            &mut items[*index]
        }
    };
    enter_object(slot, path, depth)
}

/// The object a segment is looked up in.
fn as_object<'t>(
    node: &'t mut Tree,
    path: &PatchPath,
    depth: usize,
) -> Result<&'t mut Map, PatchError> {
    match node {
        Tree::Object(obj) => Ok(obj),
        other => Err(conflict(path, depth.checked_sub(1), kind_of(other))),
    }
}

/// Make `slot` an object to descend into.
fn enter_object<'t>(
    slot: &'t mut Tree,
    path: &PatchPath,
    depth: usize,
) -> Result<&'t mut Tree, PatchError> {
    match kind_of(slot) {
        NodeKind::Object => {}
        NodeKind::Array => *slot = Tree::Object(Map::new()),
        kind => return Err(conflict(path, Some(depth), kind)),
    }
    Ok(slot)
}

/// The array stored under `name`, creating it or promoting a single
/// collapsed sibling object into a one-element array.
fn array_slot<'t>(
    obj: &'t mut Map,
    name: &str,
    path: &PatchPath,
    depth: usize,
) -> Result<&'t mut Vec<Tree>, PatchError> {
    let slot = obj
        .entry(name.to_string())
        .or_insert_with(|| Tree::Array(Vec::new()));

    if slot.is_object() {
        let single = slot.take();
        *slot = Tree::Array(vec![single]);
    }

    match slot {
        Tree::Array(items) => Ok(items),
        other => Err(conflict(path, Some(depth), kind_of(other))),
    }
}

fn pad(items: &mut Vec<Tree>, index: usize, path: &PatchPath) -> Result<(), PatchError> {
    if index.saturating_sub(items.len()) > MAX_ARRAY_GROWTH {
        return Err(PatchError::InvalidPath {
            path: path.to_string(),
            reason: format!(
                "index {index} is more than {MAX_ARRAY_GROWTH} past the end of an array of {} elements",
                items.len()
            ),
        });
    }
    while items.len() <= index {
        items.push(Tree::Object(Map::new()));
    }
    Ok(())
}

fn conflict(path: &PatchPath, depth: Option<usize>, kind: NodeKind) -> PatchError {
    PatchError::PathConflict {
        path: path.to_string(),
        at: depth.map(|d| path.prefix(d)).unwrap_or_default(),
        kind,
    }
}
