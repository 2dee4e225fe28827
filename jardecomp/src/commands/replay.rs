use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use jar_io::{
    DecompilePass, EntryCompression, MemoryCeiling, OutputOptions, PassConfig, ReplayEngine,
};

use crate::Compression;

pub fn replay_pass(
    script: &Path,
    input: PathBuf,
    classpath: Vec<PathBuf>,
    work_dir: PathBuf,
    output: PathBuf,
    memory: Option<(u64, bool)>,
    compression: Compression,
) -> Result<()> {
    info!("replay script={}", script.display());

    let mut engine = ReplayEngine::from_path(script)
        .with_context(|| format!("load script {}", script.display()))?;

    let config = PassConfig {
        primary: input,
        classpath,
        work_dir,
        output,
        memory: memory.map(|(min_bytes, enforce)| MemoryCeiling { min_bytes, enforce }),
        output_options: OutputOptions {
            compression: match compression {
                Compression::Stored => EntryCompression::Stored,
                Compression::Deflated => EntryCompression::Deflated,
            },
        },
    };

    let report = DecompilePass::new(config)
        .run(&mut engine)
        .context("decompile pass")?;

    info!(
        output = %report.output.display(),
        spaces = engine.spaces().len(),
        resolved = engine.resolved().len(),
        names = engine.names().len(),
        "done"
    );
    Ok(())
}
