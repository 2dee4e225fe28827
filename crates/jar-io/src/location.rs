use std::{
    fmt,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

/// Where the engine expects to find the bytecode of one class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolicLocation {
    /// A standalone `.class` file.
    File(PathBuf),
    /// A named entry inside a zip-compatible artifact.
    Entry { archive: PathBuf, entry: String },
}

impl SymbolicLocation {
    /// Builds a location from the engine's (external path, internal path) pair.
    pub fn from_parts(external: impl Into<PathBuf>, internal: Option<&str>) -> Self {
        match internal {
            Some(entry) => SymbolicLocation::Entry {
                archive: external.into(),
                entry: entry.to_string(),
            },
            None => SymbolicLocation::File(external.into()),
        }
    }

    /// The file on disk this location reads from.
    pub fn artifact(&self) -> &Path {
        match self {
            SymbolicLocation::File(path) => path,
            SymbolicLocation::Entry { archive, .. } => archive,
        }
    }
}

impl fmt::Display for SymbolicLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolicLocation::File(path) => write!(f, "{}", path.display()),
            SymbolicLocation::Entry { archive, entry } => {
                write!(f, "{}!/{}", archive.display(), entry)
            }
        }
    }
}
