use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::manifest::Manifest;

/// One output instruction issued by the engine.
///
/// `dir` fields are relative to the output root; `archive` names the archive
/// file inside `dir`. Source paths (`source`) point at artifacts outside the
/// root and are only read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum OutputDirective {
    CreateFolder {
        path: String,
    },
    CopyLooseFile {
        source: PathBuf,
        dir: String,
        name: String,
    },
    SaveClassSource {
        dir: String,
        name: String,
        content: String,
    },
    CreateArchive {
        dir: String,
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        manifest: Option<Manifest>,
    },
    SaveDirEntry {
        dir: String,
        archive: String,
        entry: String,
    },
    CopyArchiveEntry {
        source: PathBuf,
        dir: String,
        archive: String,
        entry: String,
    },
    SaveArchiveEntry {
        dir: String,
        archive: String,
        entry: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
    },
    CloseArchive {
        dir: String,
        archive: String,
    },
}

impl OutputDirective {
    pub fn name(&self) -> &'static str {
        match self {
            OutputDirective::CreateFolder { .. } => "create_folder",
            OutputDirective::CopyLooseFile { .. } => "copy_loose_file",
            OutputDirective::SaveClassSource { .. } => "save_class_source",
            OutputDirective::CreateArchive { .. } => "create_archive",
            OutputDirective::SaveDirEntry { .. } => "save_dir_entry",
            OutputDirective::CopyArchiveEntry { .. } => "copy_archive_entry",
            OutputDirective::SaveArchiveEntry { .. } => "save_archive_entry",
            OutputDirective::CloseArchive { .. } => "close_archive",
        }
    }
}
