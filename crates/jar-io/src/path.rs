//! Output-root containment.
//!
//! Every destination the engine names is a (relative directory, file name)
//! pair joined against one configured root. Joining is lexical: `.` is
//! dropped, `..` pops a component, and any attempt to climb above the root or
//! to introduce an absolute component is rejected with `PathEscape`. Both `/`
//! and `\` separate components.
//!
//! Archive entry names never touch the filesystem, but the same traversal
//! rules apply to them so that a produced archive cannot carry a zip-slip
//! entry into a downstream extractor.

use std::path::{Component, Path, PathBuf};

use crate::error::{JarIoError, Result};

/// The directory all output directives are resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRoot {
    root: PathBuf,
}

impl OutputRoot {
    /// Relative roots are anchored at the current directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let absolute = std::path::absolute(root).map_err(|e| JarIoError::io(root, e))?;
        Ok(Self {
            root: normalize_absolute(&absolute),
        })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Resolves a relative directory string under the root.
    pub fn dir(&self, dir: &str) -> Result<PathBuf> {
        let mut out = self.root.clone();
        let mut depth = 0usize;
        push_relative(&mut out, &mut depth, dir)?;
        Ok(out)
    }

    /// Resolves a (directory, name) pair under the root. The name must not be
    /// empty after normalization.
    pub fn file(&self, dir: &str, name: &str) -> Result<PathBuf> {
        let mut out = self.root.clone();
        let mut depth = 0usize;
        push_relative(&mut out, &mut depth, dir)?;
        push_relative(&mut out, &mut depth, name)?;
        if depth == 0 {
            return Err(JarIoError::PathEscape(format!(
                "`{dir}` + `{name}` names the output root itself"
            )));
        }
        Ok(out)
    }
}

fn split_components(rel: &str) -> impl Iterator<Item = &str> {
    rel.split(['/', '\\']).filter(|c| !c.is_empty())
}

fn push_relative(out: &mut PathBuf, depth: &mut usize, rel: &str) -> Result<()> {
    if rel.starts_with(['/', '\\']) {
        return Err(JarIoError::PathEscape(rel.to_string()));
    }
    for comp in split_components(rel) {
        match comp {
            "." => {}
            ".." => {
                if *depth == 0 {
                    return Err(JarIoError::PathEscape(rel.to_string()));
                }
                out.pop();
                *depth -= 1;
            }
            c => {
                // Host-native parsing catches drive prefixes where they re-root a join.
                if Path::new(c)
                    .components()
                    .any(|pc| !matches!(pc, Component::Normal(_)))
                {
                    return Err(JarIoError::PathEscape(rel.to_string()));
                }
                out.push(c);
                *depth += 1;
            }
        }
    }
    Ok(())
}

fn normalize_absolute(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// `C:`-style drive prefix.
fn has_drive_prefix(name: &str) -> bool {
    matches!(name.as_bytes(), [letter, b':', ..] if letter.is_ascii_alphabetic())
}

/// Rejects archive entry names that are absolute, start with a drive prefix,
/// or contain a `..` segment. Colons elsewhere are ordinary name characters.
pub fn check_entry_name(name: &str) -> Result<()> {
    if name.is_empty() || name.starts_with(['/', '\\']) || has_drive_prefix(name) {
        return Err(JarIoError::PathEscape(format!("entry `{name}`")));
    }
    if split_components(name).any(|comp| comp == "..") {
        return Err(JarIoError::PathEscape(format!("entry `{name}`")));
    }
    Ok(())
}
