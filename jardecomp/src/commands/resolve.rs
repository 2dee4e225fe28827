use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use jar_io::{BytecodeResolver, SymbolicLocation};

const CLASS_MAGIC: [u8; 4] = [0xca, 0xfe, 0xba, 0xbe];

pub fn resolve(path: &Path, entry: Option<&str>, out: Option<&Path>) -> Result<()> {
    let location = SymbolicLocation::from_parts(path, entry);
    let bytes = BytecodeResolver::new()
        .resolve(&location)
        .with_context(|| format!("resolve {location}"))?;

    match out {
        Some(p) => {
            std::fs::write(p, &bytes).with_context(|| format!("write {}", p.display()))?;
            info!("wrote {} bytes to {}", bytes.len(), p.display());
        }
        None => {
            let is_class = bytes.starts_with(&CLASS_MAGIC);
            println!("{location}\t{} bytes\tclass_magic={is_class}", bytes.len());
        }
    }
    Ok(())
}
