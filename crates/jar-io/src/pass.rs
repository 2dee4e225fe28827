//! One decompilation pass: wire the callback surfaces into an engine, run it,
//! verify the registry drained, and copy the primary archive out.

use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use tracing::info;

use crate::{
    engine::{DecompilationEngine, EngineContext},
    error::{JarIoError, Result},
    multiplexer::{ArchiveMultiplexer, SinkStats},
    naming::{FallbackNaming, ParameterNamingStrategy, ProposedName},
    options::{EngineOptions, OutputOptions},
    path::OutputRoot,
    preflight::MemoryCeiling,
    resolver::BytecodeResolver,
};

#[derive(Debug, Clone)]
pub struct PassConfig {
    /// Artifact whose top-level classes are decompiled.
    pub primary: PathBuf,
    /// Artifacts consulted for symbol resolution only.
    pub classpath: Vec<PathBuf>,
    /// Output root for the engine. Wiped at the start of every pass.
    pub work_dir: PathBuf,
    /// Where the primary output archive is copied once the pass succeeds.
    pub output: PathBuf,
    pub memory: Option<MemoryCeiling>,
    pub output_options: OutputOptions,
}

#[derive(Debug, Clone)]
pub struct PassReport {
    pub stats: SinkStats,
    pub primary_archive: PathBuf,
    pub output: PathBuf,
    pub elapsed: Duration,
}

pub struct DecompilePass<F = ProposedName> {
    config: PassConfig,
    naming: ParameterNamingStrategy<F>,
}

impl DecompilePass<ProposedName> {
    pub fn new(config: PassConfig) -> Self {
        Self::with_naming(config, ParameterNamingStrategy::new())
    }
}

impl<F: FallbackNaming> DecompilePass<F> {
    pub fn with_naming(config: PassConfig, naming: ParameterNamingStrategy<F>) -> Self {
        Self { config, naming }
    }

    pub fn run<E: DecompilationEngine>(&self, engine: &mut E) -> Result<PassReport> {
        let cfg = &self.config;
        let start = Instant::now();

        if let Some(ceiling) = cfg.memory {
            ceiling.check()?;
        }

        let primary_name = cfg
            .primary
            .file_name()
            .ok_or_else(|| JarIoError::MissingFile(cfg.primary.clone()))?;
        if !cfg.primary.is_file() {
            return Err(JarIoError::MissingFile(cfg.primary.clone()));
        }

        let mut keep = vec![cfg.primary.as_path(), cfg.output.as_path()];
        keep.extend(cfg.classpath.iter().map(PathBuf::as_path));
        prepare_work_dir(&cfg.work_dir, &keep)?;
        let root = OutputRoot::new(&cfg.work_dir)?;
        let primary_archive = root.path().join(primary_name);

        info!("Decompile pass");
        info!("  primary:   {}", cfg.primary.display());
        info!("  classpath: {} artifacts", cfg.classpath.len());
        info!("  work:      {}", root.path().display());
        info!("  out:       {}", cfg.output.display());

        let resolver = BytecodeResolver::new();
        let mut sink = ArchiveMultiplexer::new(root, cfg.output_options);
        let options = EngineOptions::fixed();

        engine.add_space(&cfg.primary, true)?;
        for artifact in &cfg.classpath {
            engine.add_space(artifact, false)?;
        }

        engine.decompile(
            &options,
            EngineContext {
                bytecode: &resolver,
                output: &mut sink,
                naming: &self.naming,
            },
        )?;

        let stats = sink.finish()?;

        if !primary_archive.is_file() {
            return Err(JarIoError::MissingFile(primary_archive));
        }
        if let Some(parent) = cfg.output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| JarIoError::create(parent, e.to_string()))?;
        }
        fs::copy(&primary_archive, &cfg.output).map_err(|e| JarIoError::io(&cfg.output, e))?;

        let elapsed = start.elapsed();
        info!(
            "Pass complete: archives={} entries={} duplicates={} missing_sources={} loose={} | elapsed={}",
            stats.archives_closed,
            stats.entries_written,
            stats.duplicates_suppressed,
            stats.missing_sources,
            stats.loose_files + stats.class_sources,
            format_duration(elapsed.as_secs_f64())
        );

        Ok(PassReport {
            stats,
            primary_archive,
            output: cfg.output.clone(),
            elapsed,
        })
    }
}

/// Recreates `dir` empty. Refuses when any existing path in `keep` lives
/// inside it.
fn prepare_work_dir(dir: &Path, keep: &[&Path]) -> Result<()> {
    if dir.exists() {
        let dir_abs = fs::canonicalize(dir).map_err(|e| JarIoError::io(dir, e))?;
        for &path in keep {
            if !path.exists() {
                continue;
            }
            let abs = fs::canonicalize(path).map_err(|e| JarIoError::io(path, e))?;
            if abs.starts_with(&dir_abs) {
                return Err(JarIoError::create(
                    dir,
                    format!("working directory contains {}", path.display()),
                ));
            }
        }
        fs::remove_dir_all(dir).map_err(|e| JarIoError::io(dir, e))?;
    }
    fs::create_dir_all(dir).map_err(|e| JarIoError::create(dir, e.to_string()))
}

pub fn format_duration(seconds: f64) -> String {
    let total_secs = seconds as u64;

    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{:.2}s", seconds)
    }
}
