//! Dotted path grammar.
//!
//! `a.b.c` addresses nested object keys; `name[N]` addresses the N-th
//! element of the array stored at `name`. Leading and trailing dots are
//! ignored.

use core::fmt;

use crate::error::PatchError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Object key.
    Key(String),
    /// Element `index` of the array stored under `name`.
    Index { name: String, index: usize },
}

impl Segment {
    pub fn name(&self) -> &str {
        match self {
            Segment::Key(name) | Segment::Index { name, .. } => name,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(name) => f.write_str(name),
            Segment::Index { name, index } => write!(f, "{name}[{index}]"),
        }
    }
}

/// A parsed, non-empty dotted path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchPath {
    segments: Vec<Segment>,
}

impl PatchPath {
    pub fn parse(raw: &str) -> Result<Self, PatchError> {
        let invalid = |reason: &str| PatchError::InvalidPath {
            path: raw.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = raw.trim_matches('.');
        if trimmed.is_empty() {
            return Err(invalid("path is empty"));
        }

        let mut segments = Vec::new();
        for part in trimmed.split('.') {
            if part.is_empty() {
                return Err(invalid("empty segment"));
            }
            segments.push(parse_segment(part).map_err(invalid)?);
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The path up to and including segment `i`.
    pub fn prefix(&self, i: usize) -> String {
        let end = (i + 1).min(self.segments.len());
        join(&self.segments[..end])
    }
}

impl fmt::Display for PatchPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join(&self.segments))
    }
}

fn join(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

fn parse_segment(part: &str) -> Result<Segment, &'static str> {
    let Some(open) = part.find('[') else {
        if part.contains(']') {
            return Err("unbalanced ']'");
        }
        return Ok(Segment::Key(part.to_string()));
    };

    let name = &part[..open];
    if name.is_empty() {
        return Err("array index without a name");
    }
    let digits = part[open + 1..]
        .strip_suffix(']')
        .ok_or("array index must end with ']'")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err("array index must be a non-negative integer");
    }
    let index = digits.parse::<usize>().map_err(|_| "array index is too large")?;

    Ok(Segment::Index {
        name: name.to_string(),
        index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_keys_and_indices() {
        let path = PatchPath::parse(".Package.Item[2].@Name.").unwrap();
        assert_eq!(
            path.segments(),
            &[
                Segment::Key("Package".into()),
                Segment::Index { name: "Item".into(), index: 2 },
                Segment::Key("@Name".into()),
            ]
        );
        assert_eq!(path.to_string(), "Package.Item[2].@Name");
        assert_eq!(path.prefix(1), "Package.Item[2]");
        assert_eq!(path.segments()[1].name(), "Item");
    }

    #[test]
    fn rejects_malformed_paths() {
        for raw in ["", "...", "a..b", "a[", "a[x]", "[1]", "a[1]b", "a]", "a[-1]", "a[1][2]"] {
            assert!(
                matches!(PatchPath::parse(raw), Err(PatchError::InvalidPath { .. })),
                "{raw:?} should be rejected"
            );
        }
    }
}
