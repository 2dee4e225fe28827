//! Output side of a pass: folders, loose files and any number of
//! simultaneously open archives.
//!
//! # Invariants
//! - Every key in the registry maps to a live writer; a key is absent when the
//!   archive was never opened or is already closed.
//! - Entry names are unique per open archive. Each entry-producing call marks
//!   the name before writing, and the first write wins.
//! - Destinations resolve inside the output root or are rejected.
//!
//! # Staging
//! Archive bytes go to a hidden `.<name>.partial` sibling and are renamed onto
//! the target only by `close_archive`. A pass that dies midway leaves no
//! well-formed-looking archive at the target path.
//!
//! # Threading
//! All methods take `&mut self`: callers must issue directives from a single
//! thread. Wrap in [`SharedSink`](crate::engine::SharedSink) otherwise.

use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use tracing::{debug, info, warn};
use zip::{result::ZipError, ZipArchive, ZipWriter};

use crate::{
    directive::OutputDirective,
    engine::OutputSink,
    error::{JarIoError, Result},
    manifest::{Manifest, MANIFEST_ENTRY},
    options::OutputOptions,
    path::{check_entry_name, OutputRoot},
};

const IO_BUF: usize = 1 << 20;

/// Counters for one pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SinkStats {
    pub folders: u64,
    pub loose_files: u64,
    pub class_sources: u64,
    pub archives_opened: u64,
    pub archives_closed: u64,
    pub entries_written: u64,
    pub duplicates_suppressed: u64,
    pub missing_sources: u64,
}

struct ArchiveHandle {
    target: PathBuf,
    staging: PathBuf,
    writer: ZipWriter<BufWriter<File>>,
    entries: FxHashSet<String>,
}

impl ArchiveHandle {
    /// Check-and-mark. Returns false when `entry` was already written.
    #[inline]
    fn mark(&mut self, entry: &str) -> bool {
        if self.entries.contains(entry) {
            return false;
        }
        self.entries.insert(entry.to_string())
    }

    fn finish(self) -> Result<PathBuf> {
        let ArchiveHandle {
            target,
            staging,
            writer,
            ..
        } = self;
        let buffered = writer.finish().map_err(|e| JarIoError::zip(&staging, e))?;
        let mut file = buffered
            .into_inner()
            .map_err(|e| JarIoError::io(&staging, e.into_error()))?;
        file.flush().map_err(|e| JarIoError::io(&staging, e))?;
        drop(file);
        fs::rename(&staging, &target).map_err(|e| JarIoError::io(&target, e))?;
        Ok(target)
    }

    fn discard(self) {
        let ArchiveHandle {
            target,
            staging,
            writer,
            ..
        } = self;
        drop(writer);
        for path in [&staging, &target] {
            if let Err(e) = fs::remove_file(path) {
                if e.kind() != io::ErrorKind::NotFound {
                    warn!(path = %path.display(), "failed to remove abandoned archive: {e}");
                }
            }
        }
    }
}

/// Sink for every output directive of a pass.
pub struct ArchiveMultiplexer {
    root: OutputRoot,
    options: OutputOptions,
    open: FxHashMap<PathBuf, ArchiveHandle>,
    stats: SinkStats,
}

impl ArchiveMultiplexer {
    pub fn new(root: OutputRoot, options: OutputOptions) -> Self {
        Self {
            root,
            options,
            open: FxHashMap::default(),
            stats: SinkStats::default(),
        }
    }

    pub fn stats(&self) -> SinkStats {
        self.stats
    }

    /// Number of archives currently registered.
    pub fn open_archives(&self) -> usize {
        self.open.len()
    }

    pub fn is_open(&self, dir: &str, archive: &str) -> bool {
        self.root
            .file(dir, archive)
            .map(|key| self.open.contains_key(&key))
            .unwrap_or(false)
    }

    pub fn ensure_folder(&mut self, path: &str) -> Result<()> {
        let dir = self.root.dir(path)?;
        create_dirs(&dir)?;
        self.stats.folders += 1;
        Ok(())
    }

    pub fn copy_loose_file(&mut self, source: &Path, dir: &str, name: &str) -> Result<()> {
        let dest = self.root.file(dir, name)?;
        if let Some(parent) = dest.parent() {
            create_dirs(parent)?;
        }
        let mut input = File::open(source).map_err(|e| JarIoError::io(source, e))?;
        let mut output = File::create(&dest).map_err(|e| JarIoError::io(&dest, e))?;
        io::copy(&mut input, &mut output).map_err(|e| JarIoError::io(&dest, e))?;
        self.stats.loose_files += 1;
        Ok(())
    }

    pub fn write_class_source(&mut self, dir: &str, name: &str, text: &str) -> Result<()> {
        let dest = self.root.file(dir, name)?;
        if let Some(parent) = dest.parent() {
            create_dirs(parent)?;
        }
        fs::write(&dest, text).map_err(|e| JarIoError::io(&dest, e))?;
        self.stats.class_sources += 1;
        Ok(())
    }

    pub fn open_archive(
        &mut self,
        dir: &str,
        archive: &str,
        manifest: Option<&Manifest>,
    ) -> Result<()> {
        let target = self.root.file(dir, archive)?;
        if self.open.contains_key(&target) {
            return Err(JarIoError::ProtocolViolation(format!(
                "archive {} opened twice",
                target.display()
            )));
        }

        if let Ok(meta) = fs::symlink_metadata(&target) {
            if !meta.is_file() {
                return Err(JarIoError::create(&target, "not a regular file"));
            }
        }
        if let Some(parent) = target.parent() {
            create_dirs(parent)?;
        }
        File::create(&target).map_err(|e| JarIoError::create(&target, e.to_string()))?;

        let staging = staging_path(&target);
        let file =
            File::create(&staging).map_err(|e| JarIoError::create(&staging, e.to_string()))?;

        let mut handle = ArchiveHandle {
            target: target.clone(),
            staging,
            writer: ZipWriter::new(BufWriter::with_capacity(IO_BUF, file)),
            entries: FxHashSet::default(),
        };

        if let Some(manifest) = manifest {
            handle.mark(MANIFEST_ENTRY);
            let opts = self.options.file_options();
            let written = handle
                .writer
                .start_file(MANIFEST_ENTRY, opts)
                .map_err(|e| JarIoError::zip(&handle.staging, e))
                .and_then(|()| {
                    handle
                        .writer
                        .write_all(&manifest.to_bytes())
                        .map_err(|e| JarIoError::io(&handle.staging, e))
                });
            if let Err(e) = written {
                handle.discard();
                return Err(e);
            }
        }

        info!(archive = %target.display(), manifest = manifest.is_some(), "archive opened");
        self.open.insert(target, handle);
        self.stats.archives_opened += 1;
        Ok(())
    }

    pub fn write_dir_entry(&mut self, dir: &str, archive: &str, entry: &str) -> Result<()> {
        check_entry_name(entry)?;
        let key = self.root.file(dir, archive)?;
        let handle = registered(&mut self.open, &key, "directory entry")?;

        let entry = dir_entry_name(entry);
        if !handle.mark(&entry) {
            debug!(archive = %key.display(), entry = %entry, "duplicate entry suppressed");
            self.stats.duplicates_suppressed += 1;
            return Ok(());
        }
        handle
            .writer
            .add_directory(entry, self.options.file_options())
            .map_err(|e| JarIoError::zip(&handle.staging, e))?;
        self.stats.entries_written += 1;
        Ok(())
    }

    /// Streams `entry` from the `source` archive into the destination. A
    /// source without that entry is a no-op and does not reserve the name.
    pub fn copy_archive_entry(
        &mut self,
        source: &Path,
        dir: &str,
        archive: &str,
        entry: &str,
    ) -> Result<()> {
        check_entry_name(entry)?;
        let key = self.root.file(dir, archive)?;
        let handle = registered(&mut self.open, &key, "entry copy")?;

        let file = File::open(source).map_err(|e| JarIoError::io(source, e))?;
        let mut zip = ZipArchive::new(file).map_err(|e| JarIoError::zip(source, e))?;
        let mut zf = match zip.by_name(entry) {
            Ok(zf) => zf,
            Err(ZipError::FileNotFound) => {
                debug!(source = %source.display(), entry, "copy source missing, skipped");
                self.stats.missing_sources += 1;
                return Ok(());
            }
            Err(e) => return Err(JarIoError::zip(source, e)),
        };

        let is_dir = zf.is_dir();
        let name = if is_dir {
            dir_entry_name(entry)
        } else {
            entry.to_string()
        };
        if !handle.mark(&name) {
            debug!(archive = %key.display(), entry = %name, "duplicate entry suppressed");
            self.stats.duplicates_suppressed += 1;
            return Ok(());
        }

        let opts = self.options.file_options();
        if is_dir {
            handle
                .writer
                .add_directory(name, opts)
                .map_err(|e| JarIoError::zip(&handle.staging, e))?;
        } else {
            handle
                .writer
                .start_file(name, opts)
                .map_err(|e| JarIoError::zip(&handle.staging, e))?;
            io::copy(&mut zf, &mut handle.writer)
                .map_err(|e| JarIoError::io(&handle.staging, e))?;
        }
        self.stats.entries_written += 1;
        Ok(())
    }

    /// Writes `content` (or an empty entry). Repeats of a name already in the
    /// archive are dropped: first write wins.
    pub fn write_archive_entry(
        &mut self,
        dir: &str,
        archive: &str,
        entry: &str,
        content: Option<&str>,
    ) -> Result<()> {
        check_entry_name(entry)?;
        let key = self.root.file(dir, archive)?;
        let handle = registered(&mut self.open, &key, "entry write")?;

        if !handle.mark(entry) {
            debug!(archive = %key.display(), entry, "duplicate entry suppressed");
            self.stats.duplicates_suppressed += 1;
            return Ok(());
        }
        handle
            .writer
            .start_file(entry, self.options.file_options())
            .map_err(|e| JarIoError::zip(&handle.staging, e))?;
        if let Some(text) = content {
            handle
                .writer
                .write_all(text.as_bytes())
                .map_err(|e| JarIoError::io(&handle.staging, e))?;
        }
        self.stats.entries_written += 1;
        Ok(())
    }

    pub fn close_archive(&mut self, dir: &str, archive: &str) -> Result<()> {
        let key = self.root.file(dir, archive)?;
        let Some(handle) = self.open.remove(&key) else {
            return Err(JarIoError::ProtocolViolation(format!(
                "close of archive {} which is not open",
                key.display()
            )));
        };
        let entries = handle.entries.len();
        let target = handle.finish()?;
        info!(archive = %target.display(), entries, "archive closed");
        self.stats.archives_closed += 1;
        Ok(())
    }

    /// Ends the pass. Archives still registered mean the engine broke the
    /// protocol: they are discarded, never finalized.
    pub fn finish(mut self) -> Result<SinkStats> {
        if self.open.is_empty() {
            return Ok(self.stats);
        }
        let mut left: Vec<String> = self
            .open
            .keys()
            .map(|k| k.display().to_string())
            .collect();
        left.sort();
        self.discard_open();
        Err(JarIoError::ProtocolViolation(format!(
            "archives left open at end of pass: {}",
            left.join(", ")
        )))
    }

    fn discard_open(&mut self) {
        for (_, handle) in self.open.drain() {
            handle.discard();
        }
    }
}

impl Drop for ArchiveMultiplexer {
    fn drop(&mut self) {
        self.discard_open();
    }
}

impl OutputSink for ArchiveMultiplexer {
    fn apply(&mut self, directive: OutputDirective) -> Result<()> {
        let op = directive.name();
        let applied = match directive {
            OutputDirective::CreateFolder { path } => self.ensure_folder(&path),
            OutputDirective::CopyLooseFile { source, dir, name } => {
                self.copy_loose_file(&source, &dir, &name)
            }
            OutputDirective::SaveClassSource { dir, name, content } => {
                self.write_class_source(&dir, &name, &content)
            }
            OutputDirective::CreateArchive {
                dir,
                name,
                manifest,
            } => self.open_archive(&dir, &name, manifest.as_ref()),
            OutputDirective::SaveDirEntry {
                dir,
                archive,
                entry,
            } => self.write_dir_entry(&dir, &archive, &entry),
            OutputDirective::CopyArchiveEntry {
                source,
                dir,
                archive,
                entry,
            } => self.copy_archive_entry(&source, &dir, &archive, &entry),
            OutputDirective::SaveArchiveEntry {
                dir,
                archive,
                entry,
                content,
            } => self.write_archive_entry(&dir, &archive, &entry, content.as_deref()),
            OutputDirective::CloseArchive { dir, archive } => self.close_archive(&dir, &archive),
        };
        if let Err(e) = &applied {
            debug!(op, kind = ?e.kind(), "directive rejected: {e}");
        }
        applied
    }
}

fn registered<'a>(
    open: &'a mut FxHashMap<PathBuf, ArchiveHandle>,
    key: &Path,
    op: &str,
) -> Result<&'a mut ArchiveHandle> {
    open.get_mut(key).ok_or_else(|| {
        JarIoError::ProtocolViolation(format!("{op} into archive {} which is not open", key.display()))
    })
}

fn create_dirs(dir: &Path) -> Result<()> {
    if let Ok(meta) = fs::metadata(dir) {
        if meta.is_dir() {
            return Ok(());
        }
        return Err(JarIoError::create(dir, "exists and is not a directory"));
    }
    fs::create_dir_all(dir).map_err(|e| JarIoError::create(dir, e.to_string()))
}

fn staging_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{name}.partial"))
}

fn dir_entry_name(entry: &str) -> String {
    if entry.ends_with('/') {
        entry.to_string()
    } else {
        format!("{entry}/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ErrorKind,
        test_support::{read_zip, write_zip},
    };
    use tempfile::TempDir;

    fn sink(dir: &TempDir) -> ArchiveMultiplexer {
        ArchiveMultiplexer::new(
            OutputRoot::new(dir.path().join("out")).unwrap(),
            OutputOptions::default(),
        )
    }

    #[test]
    fn first_write_wins() {
        let tmp = TempDir::new().unwrap();
        let mut mux = sink(&tmp);
        mux.open_archive("", "p.jar", None).unwrap();
        mux.write_archive_entry("", "p.jar", "A.class", Some("b1"))
            .unwrap();
        mux.write_archive_entry("", "p.jar", "A.class", Some("b2"))
            .unwrap();
        mux.close_archive("", "p.jar").unwrap();

        let entries = read_zip(&tmp.path().join("out/p.jar"));
        assert_eq!(entries, vec![("A.class".to_string(), b"b1".to_vec())]);
        assert_eq!(mux.stats().duplicates_suppressed, 1);
        assert_eq!(mux.stats().entries_written, 1);
        mux.finish().unwrap();
    }

    #[test]
    fn dedup_is_per_archive() {
        let tmp = TempDir::new().unwrap();
        let mut mux = sink(&tmp);
        mux.open_archive("a", "x.jar", None).unwrap();
        mux.open_archive("b", "x.jar", None).unwrap();
        mux.write_archive_entry("a", "x.jar", "S.java", Some("one"))
            .unwrap();
        mux.write_archive_entry("b", "x.jar", "S.java", Some("two"))
            .unwrap();
        mux.close_archive("a", "x.jar").unwrap();
        mux.close_archive("b", "x.jar").unwrap();

        assert_eq!(
            read_zip(&tmp.path().join("out/a/x.jar")),
            vec![("S.java".to_string(), b"one".to_vec())]
        );
        assert_eq!(
            read_zip(&tmp.path().join("out/b/x.jar")),
            vec![("S.java".to_string(), b"two".to_vec())]
        );
    }

    #[test]
    fn reopened_archive_starts_fresh() {
        let tmp = TempDir::new().unwrap();
        let mut mux = sink(&tmp);
        mux.open_archive("", "p.jar", None).unwrap();
        mux.write_archive_entry("", "p.jar", "A.java", Some("old"))
            .unwrap();
        mux.close_archive("", "p.jar").unwrap();

        mux.open_archive("", "p.jar", None).unwrap();
        mux.write_archive_entry("", "p.jar", "A.java", Some("new"))
            .unwrap();
        mux.close_archive("", "p.jar").unwrap();

        assert_eq!(
            read_zip(&tmp.path().join("out/p.jar")),
            vec![("A.java".to_string(), b"new".to_vec())]
        );
    }

    #[test]
    fn missing_copy_source_is_silent_and_reserves_nothing() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("lib.jar");
        write_zip(&src, &[("x/Present.class", "P")]);

        let mut mux = sink(&tmp);
        mux.open_archive("", "p.jar", None).unwrap();
        mux.copy_archive_entry(&src, "", "p.jar", "x/Absent.class")
            .unwrap();
        mux.write_archive_entry("", "p.jar", "x/Absent.class", Some("late"))
            .unwrap();
        mux.copy_archive_entry(&src, "", "p.jar", "x/Present.class")
            .unwrap();
        mux.copy_archive_entry(&src, "", "p.jar", "x/Present.class")
            .unwrap();
        mux.close_archive("", "p.jar").unwrap();

        let mut entries = read_zip(&tmp.path().join("out/p.jar"));
        entries.sort();
        assert_eq!(
            entries,
            vec![
                ("x/Absent.class".to_string(), b"late".to_vec()),
                ("x/Present.class".to_string(), b"P".to_vec()),
            ]
        );
        let stats = mux.stats();
        assert_eq!(stats.missing_sources, 1);
        assert_eq!(stats.duplicates_suppressed, 1);
    }

    #[test]
    fn writes_to_unknown_archives_are_protocol_violations() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("lib.jar");
        write_zip(&src, &[("A.class", "A")]);

        let mut mux = sink(&tmp);
        let kind = |r: Result<()>| r.unwrap_err().kind();
        assert_eq!(
            kind(mux.write_archive_entry("", "never.jar", "A", None)),
            ErrorKind::ProtocolViolation
        );
        assert_eq!(
            kind(mux.write_dir_entry("", "never.jar", "a/")),
            ErrorKind::ProtocolViolation
        );
        assert_eq!(
            kind(mux.copy_archive_entry(&src, "", "never.jar", "A.class")),
            ErrorKind::ProtocolViolation
        );
        assert_eq!(
            kind(mux.close_archive("", "never.jar")),
            ErrorKind::ProtocolViolation
        );

        mux.open_archive("", "p.jar", None).unwrap();
        mux.close_archive("", "p.jar").unwrap();
        assert_eq!(
            kind(mux.write_archive_entry("", "p.jar", "A", None)),
            ErrorKind::ProtocolViolation
        );
        assert_eq!(
            kind(mux.close_archive("", "p.jar")),
            ErrorKind::ProtocolViolation
        );
    }

    #[test]
    fn double_open_is_protocol_violation() {
        let tmp = TempDir::new().unwrap();
        let mut mux = sink(&tmp);
        mux.open_archive("", "p.jar", None).unwrap();
        let err = mux.open_archive("./", "p.jar", None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProtocolViolation);
        mux.close_archive("", "p.jar").unwrap();
    }

    #[test]
    fn spellings_share_one_registry_slot() {
        let tmp = TempDir::new().unwrap();
        let mut mux = sink(&tmp);
        mux.open_archive("a/b", "x.jar", None).unwrap();
        mux.write_archive_entry("a/./b", "x.jar", "E", Some("1"))
            .unwrap();
        mux.write_archive_entry("a/c/../b/", "x.jar", "E", Some("2"))
            .unwrap();
        assert!(mux.is_open("a\\b", "x.jar"));
        mux.close_archive("a/b/", "x.jar").unwrap();
        assert_eq!(
            read_zip(&tmp.path().join("out/a/b/x.jar")),
            vec![("E".to_string(), b"1".to_vec())]
        );
    }

    #[test]
    fn unclosed_archive_fails_the_pass() {
        let tmp = TempDir::new().unwrap();
        let mut mux = sink(&tmp);
        mux.open_archive("", "p.jar", None).unwrap();
        mux.write_archive_entry("", "p.jar", "A.java", Some("x"))
            .unwrap();
        let err = mux.finish().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProtocolViolation);
        assert!(err.to_string().contains("p.jar"));

        assert!(!tmp.path().join("out/p.jar").exists());
        assert!(!tmp.path().join("out/.p.jar.partial").exists());
    }

    #[test]
    fn target_appears_only_on_close() {
        let tmp = TempDir::new().unwrap();
        let mut mux = sink(&tmp);
        mux.open_archive("", "p.jar", None).unwrap();
        mux.write_archive_entry("", "p.jar", "A.java", Some("x"))
            .unwrap();
        let target = tmp.path().join("out/p.jar");
        assert_eq!(fs::metadata(&target).unwrap().len(), 0);
        assert!(tmp.path().join("out/.p.jar.partial").exists());

        mux.close_archive("", "p.jar").unwrap();
        assert!(fs::metadata(&target).unwrap().len() > 0);
        assert!(!tmp.path().join("out/.p.jar.partial").exists());
    }

    #[test]
    fn manifest_is_first_and_deduplicated() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("lib.jar");
        write_zip(&src, &[(MANIFEST_ENTRY, "Manifest-Version: 9.9\r\n\r\n")]);

        let mut manifest = Manifest::new();
        manifest.insert("Main-Class", "a.Main");

        let mut mux = sink(&tmp);
        mux.open_archive("", "p.jar", Some(&manifest)).unwrap();
        mux.copy_archive_entry(&src, "", "p.jar", MANIFEST_ENTRY)
            .unwrap();
        mux.close_archive("", "p.jar").unwrap();

        let entries = read_zip(&tmp.path().join("out/p.jar"));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, MANIFEST_ENTRY);
        assert_eq!(entries[0].1, manifest.to_bytes());
    }

    #[test]
    fn directory_markers() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("lib.jar");
        write_zip(&src, &[("res/", ""), ("res/r.txt", "r")]);

        let mut mux = sink(&tmp);
        mux.open_archive("", "p.jar", None).unwrap();
        mux.write_dir_entry("", "p.jar", "a").unwrap();
        mux.write_dir_entry("", "p.jar", "a/").unwrap();
        mux.copy_archive_entry(&src, "", "p.jar", "res/").unwrap();
        mux.write_dir_entry("", "p.jar", "res").unwrap();
        mux.close_archive("", "p.jar").unwrap();

        let mut names: Vec<String> = read_zip(&tmp.path().join("out/p.jar"))
            .into_iter()
            .map(|(n, _)| n)
            .collect();
        names.sort();
        assert_eq!(names, vec!["a/".to_string(), "res/".to_string()]);
        assert_eq!(mux.stats().duplicates_suppressed, 2);
    }

    #[test]
    fn traversal_never_leaves_root() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("lib.jar");
        write_zip(&src, &[("../evil.class", "E")]);

        let mut mux = sink(&tmp);
        let kind = |r: Result<()>| r.unwrap_err().kind();
        assert_eq!(kind(mux.ensure_folder("../x")), ErrorKind::PathEscape);
        assert_eq!(
            kind(mux.write_class_source("..", "A.java", "x")),
            ErrorKind::PathEscape
        );
        assert_eq!(
            kind(mux.copy_loose_file(&src, "a/../..", "lib.jar")),
            ErrorKind::PathEscape
        );
        assert_eq!(
            kind(mux.open_archive("", "../p.jar", None)),
            ErrorKind::PathEscape
        );

        mux.open_archive("", "p.jar", None).unwrap();
        assert_eq!(
            kind(mux.copy_archive_entry(&src, "", "p.jar", "../evil.class")),
            ErrorKind::PathEscape
        );
        assert_eq!(
            kind(mux.write_archive_entry("", "p.jar", "a/../../b", None)),
            ErrorKind::PathEscape
        );
        mux.close_archive("", "p.jar").unwrap();

        assert!(!tmp.path().join("x").exists());
        assert!(!tmp.path().join("A.java").exists());
        assert!(!tmp.path().join("p.jar").exists());
        assert!(read_zip(&tmp.path().join("out/p.jar")).is_empty());
    }

    #[test]
    fn folders_and_loose_files() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("res.bin");
        fs::write(&src, [0u8, 1, 2, 255]).unwrap();

        let mut mux = sink(&tmp);
        mux.ensure_folder("a/b").unwrap();
        mux.ensure_folder("a/b").unwrap();
        mux.copy_loose_file(&src, "a/b", "copy.bin").unwrap();
        mux.write_class_source("a", "A.java", "class A {}").unwrap();

        let out = tmp.path().join("out");
        assert!(out.join("a/b").is_dir());
        assert_eq!(fs::read(out.join("a/b/copy.bin")).unwrap(), [0u8, 1, 2, 255]);
        assert_eq!(
            fs::read_to_string(out.join("a/A.java")).unwrap(),
            "class A {}"
        );

        fs::write(out.join("file"), b"x").unwrap();
        assert_eq!(
            mux.ensure_folder("file").unwrap_err().kind(),
            ErrorKind::CreateFailure
        );
        assert_eq!(
            mux.copy_loose_file(&tmp.path().join("missing"), "", "m")
                .unwrap_err()
                .kind(),
            ErrorKind::IoFailure
        );
    }

    #[test]
    fn archive_target_must_be_regular_file() {
        let tmp = TempDir::new().unwrap();
        let mut mux = sink(&tmp);
        mux.ensure_folder("p.jar").unwrap();
        let err = mux.open_archive("", "p.jar", None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CreateFailure);
        assert_eq!(mux.open_archives(), 0);
    }

    #[test]
    fn directives_dispatch() {
        let tmp = TempDir::new().unwrap();
        let mut mux = sink(&tmp);
        let script = [
            OutputDirective::CreateFolder { path: "d".into() },
            OutputDirective::CreateArchive {
                dir: "d".into(),
                name: "x.zip".into(),
                manifest: None,
            },
            OutputDirective::SaveDirEntry {
                dir: "d".into(),
                archive: "x.zip".into(),
                entry: "pkg/".into(),
            },
            OutputDirective::SaveArchiveEntry {
                dir: "d".into(),
                archive: "x.zip".into(),
                entry: "pkg/A.java".into(),
                content: Some("class A {}".into()),
            },
            OutputDirective::SaveArchiveEntry {
                dir: "d".into(),
                archive: "x.zip".into(),
                entry: "empty".into(),
                content: None,
            },
            OutputDirective::CloseArchive {
                dir: "d".into(),
                archive: "x.zip".into(),
            },
        ];
        for d in script {
            mux.apply(d).unwrap();
        }
        let entries = read_zip(&tmp.path().join("out/d/x.zip"));
        assert_eq!(
            entries,
            vec![
                ("pkg/".to_string(), Vec::new()),
                ("pkg/A.java".to_string(), b"class A {}".to_vec()),
                ("empty".to_string(), Vec::new()),
            ]
        );
        assert_eq!(mux.finish().unwrap().archives_closed, 1);
    }
}
