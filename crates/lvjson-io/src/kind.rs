use core::fmt;
use core::str::FromStr;
use std::path::Path;

/// The kinds of build-configuration document the tools convert.
///
/// The kind fixes the root element every document of that kind must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// LabVIEW project (`.lvproj`), root `<Project>`.
    Project,
    /// VI Package Builder spec (`.vipb`), root `<Package>`.
    Package,
}

impl DocumentKind {
    pub const fn root_name(self) -> &'static str {
        match self {
            DocumentKind::Project => "Project",
            DocumentKind::Package => "Package",
        }
    }

    /// File extension of the XML form, without the dot.
    pub const fn extension(self) -> &'static str {
        match self {
            DocumentKind::Project => "lvproj",
            DocumentKind::Package => "vipb",
        }
    }

    /// Infer the kind from an XML file name. Case-insensitive.
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("lvproj") {
            Some(DocumentKind::Project)
        } else if ext.eq_ignore_ascii_case("vipb") {
            Some(DocumentKind::Package)
        } else {
            None
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DocumentKind::Project => "project",
            DocumentKind::Package => "package",
        })
    }
}

impl FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "project" | "lvproj" => Ok(DocumentKind::Project),
            "package" | "vipb" => Ok(DocumentKind::Package),
            other => Err(format!(
                "unknown document kind '{other}' (expected 'project' or 'package')"
            )),
        }
    }
}
