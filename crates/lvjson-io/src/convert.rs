//! Conversion runs: read a source document, convert it, write the result.

use std::path::{Path, PathBuf};

use lvjson_catalog::{AliasCatalog, DEFAULT_CATALOG_FILE};
use lvjson_patch::{KeyMode, PatchEngine, PatchSet};
use lvjson_tree::{Tree, parse_json_str, to_pretty_json};
use lvjson_xml::{EncodeOptions, Whitespace};

use crate::error::ConvertError;
use crate::kind::DocumentKind;
use crate::output::{read_text, write_atomic};

/// Direction of a conversion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// XML → JSON.
    Encode,
    /// JSON → XML.
    Decode,
    /// JSON → patch → XML.
    DecodeWithPatch,
}

/// One conversion, start to finish.
#[derive(Debug, Clone)]
pub struct ConvertRequest {
    pub mode: Mode,
    pub kind: DocumentKind,
    pub input: PathBuf,
    pub output: PathBuf,
    /// Primary Patch Set. Skipped when the file does not exist.
    pub patch: Option<PathBuf>,
    /// Patch Set applied after the primary one. Missing or empty files are no-ops.
    pub always_patch: Option<PathBuf>,
    pub key_mode: KeyMode,
    /// Alias catalog; defaults to [`DEFAULT_CATALOG_FILE`] in the working directory.
    pub catalog: Option<PathBuf>,
    /// Overwrite the input JSON with the patched tree.
    pub write_back_json: bool,
    pub whitespace: Whitespace,
}

impl ConvertRequest {
    /// A request with no patches, literal keys, and whitespace-only text dropped.
    pub fn new(
        mode: Mode,
        kind: DocumentKind,
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            mode,
            kind,
            input: input.into(),
            output: output.into(),
            patch: None,
            always_patch: None,
            key_mode: KeyMode::Literal,
            catalog: None,
            write_back_json: false,
            whitespace: Whitespace::Omit,
        }
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOutcome {
    pub output: PathBuf,
    pub bytes_written: usize,
    pub patches_applied: usize,
}

/// Execute a conversion request.
///
/// Nothing is written unless every step succeeds.
pub fn run(req: &ConvertRequest) -> Result<ConvertOutcome, ConvertError> {
    let source = read_text(&req.input)?;

    let mut write_back = None;
    let (text, patches_applied) = match req.mode {
        Mode::Encode => (xml_to_json_string(&source, req.kind, req.whitespace)?, 0),
        Mode::Decode => (json_to_xml_string(&source, req.kind)?, 0),
        Mode::DecodeWithPatch => {
            let mut tree = parse_json_str(&source)?;
            let applied = apply_patches(req, &mut tree)?;
            let xml = lvjson_xml::decode(&tree, Some(req.kind.root_name()))?;
            if req.write_back_json {
                write_back = Some(to_pretty_json(&tree)?);
            }
            (xml, applied)
        }
    };

    // The source JSON is only touched once the output is in place.
    write_atomic(&req.output, text.as_bytes())?;
    if let Some(json) = write_back {
        write_atomic(&req.input, json.as_bytes())?;
        tracing::debug!(path = %req.input.display(), "wrote patched JSON back");
    }

    tracing::info!(
        mode = ?req.mode,
        kind = %req.kind,
        input = %req.input.display(),
        output = %req.output.display(),
        patches_applied,
        "conversion complete"
    );

    Ok(ConvertOutcome {
        output: req.output.clone(),
        bytes_written: text.len(),
        patches_applied,
    })
}

/// Encode an XML document of the given kind as indented JSON text.
pub fn xml_to_json_string(
    xml: &str,
    kind: DocumentKind,
    whitespace: Whitespace,
) -> Result<String, ConvertError> {
    let tree = lvjson_xml::encode(xml, Some(kind.root_name()), EncodeOptions { whitespace })?;
    Ok(to_pretty_json(&tree)?)
}

/// Decode JSON text in the Tree Model conventions into an XML document.
pub fn json_to_xml_string(json: &str, kind: DocumentKind) -> Result<String, ConvertError> {
    let tree = parse_json_str(json)?;
    Ok(lvjson_xml::decode(&tree, Some(kind.root_name()))?)
}

/// Apply the primary and always-applied Patch Sets, in that order.
fn apply_patches(req: &ConvertRequest, tree: &mut Tree) -> Result<usize, ConvertError> {
    let sets: Vec<(PathBuf, PatchSet)> = [req.patch.as_deref(), req.always_patch.as_deref()]
        .into_iter()
        .flatten()
        .filter_map(|path| load_patch_set(path).transpose())
        .collect::<Result<_, _>>()?;

    if sets.iter().all(|(_, set)| set.is_empty()) {
        tracing::debug!("no patch entries to apply");
        return Ok(0);
    }

    let catalog_path = req
        .catalog
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_FILE));
    let catalog = match req.key_mode {
        KeyMode::Literal => None,
        KeyMode::Alias | KeyMode::AliasOrLiteral => Some(AliasCatalog::load(&catalog_path)?),
    };
    let engine =
        PatchEngine::new(req.key_mode, catalog.as_ref()).map_err(|source| ConvertError::Patch {
            origin: catalog_path.clone(),
            source,
        })?;

    let mut applied = 0;
    for (origin, set) in &sets {
        let report = engine
            .apply(tree, set)
            .map_err(|source| ConvertError::Patch {
                origin: origin.clone(),
                source,
            })?;
        tracing::debug!(patch = %origin.display(), applied = report.applied, "applied patch set");
        applied += report.applied;
    }
    Ok(applied)
}

fn load_patch_set(path: &Path) -> Result<Option<(PathBuf, PatchSet)>, ConvertError> {
    if !path.exists() {
        tracing::warn!(patch = %path.display(), "patch file not found; skipping");
        return Ok(None);
    }
    let text = read_text(path)?;
    let set = PatchSet::from_yaml_str(&text).map_err(|source| ConvertError::Patch {
        origin: path.to_path_buf(),
        source,
    })?;
    Ok(Some((path.to_path_buf(), set)))
}
