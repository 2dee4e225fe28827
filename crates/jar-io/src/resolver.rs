use std::{fs::File, io::Read, path::Path};

use tracing::debug;
use zip::{result::ZipError, ZipArchive};

use crate::{
    engine::BytecodeProvider,
    error::{JarIoError, Result},
    location::SymbolicLocation,
};

/// Upper bound on the buffer reserved from an entry's declared size. The
/// header value is untrusted; larger entries grow the buffer as they stream.
const MAX_PRESIZE: u64 = 1 << 20;

/// Resolves symbolic class locations to raw bytes.
///
/// Holds no state: every call reopens the backing file, so repeated calls for
/// the same location are safe and return the same bytes for the duration of a
/// pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct BytecodeResolver;

impl BytecodeResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(&self, location: &SymbolicLocation) -> Result<Vec<u8>> {
        match location {
            SymbolicLocation::File(path) => read_file(path),
            SymbolicLocation::Entry { archive, entry } => read_entry(archive, entry),
        }
    }
}

impl BytecodeProvider for BytecodeResolver {
    fn bytecode(&self, location: &SymbolicLocation) -> Result<Vec<u8>> {
        self.resolve(location)
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| JarIoError::io(path, e))
}

fn read_entry(archive: &Path, entry: &str) -> Result<Vec<u8>> {
    let file = File::open(archive).map_err(|e| JarIoError::io(archive, e))?;
    let mut zip = ZipArchive::new(file).map_err(|e| JarIoError::zip(archive, e))?;

    let mut zf = match zip.by_name(entry) {
        Ok(zf) => zf,
        Err(ZipError::FileNotFound) => {
            debug!(archive = %archive.display(), entry, "bytecode entry missing");
            return Err(JarIoError::EntryNotFound {
                archive: archive.to_path_buf(),
                entry: entry.to_string(),
            });
        }
        Err(e) => return Err(JarIoError::zip(archive, e)),
    };

    let mut buf = Vec::with_capacity(zf.size().min(MAX_PRESIZE) as usize);
    zf.read_to_end(&mut buf)
        .map_err(|e| JarIoError::io(archive, e))?;
    Ok(buf)
}
