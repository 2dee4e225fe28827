use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::Level;

mod commands;

use commands::{entries::list_entries, name::print_name, replay::replay_pass, resolve::resolve};

#[derive(Parser)]
#[command(name = "jardecomp")]
#[command(about = "Host for an external bytecode decompiler: resolves classes, writes archives")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log at debug level (duplicate entries, missing copy sources)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum Compression {
    Stored,
    Deflated,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one pass with a recorded engine script (JSON lines)
    Replay {
        /// Recorded engine events
        #[arg(long)]
        script: PathBuf,

        /// Primary artifact; every top-level class in it is decompiled
        #[arg(long)]
        input: PathBuf,

        /// Auxiliary classpath artifacts (repeatable)
        #[arg(long = "classpath", value_name = "JAR")]
        classpath: Vec<PathBuf>,

        /// Working directory (wiped before the pass)
        #[arg(long, default_value = "build/decomp")]
        work_dir: PathBuf,

        /// Final location of the decompiled primary archive
        #[arg(short, long)]
        output: PathBuf,

        /// Warn when less memory than this (MiB) is available
        #[arg(long)]
        min_memory_mib: Option<u64>,

        /// Refuse to start instead of warning when memory is short
        #[arg(long, default_value_t = false, requires = "min_memory_mib")]
        enforce_memory: bool,

        #[arg(long, value_enum, default_value_t = Compression::Deflated)]
        compression: Compression,
    },

    /// Print or save the bytes of one class location
    Resolve {
        /// Standalone class file, or the archive holding the entry
        path: PathBuf,

        /// Entry name inside the archive
        #[arg(long)]
        entry: Option<String>,

        /// Write bytes here instead of printing a summary
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print the synthetic name for a method parameter
    Name {
        method: String,
        index: usize,
        #[arg(long = "abstract", default_value_t = false)]
        is_abstract: bool,
        /// Name the engine would otherwise use
        #[arg(long)]
        proposed: Option<String>,
    },

    /// List the entries of an archive
    Entries {
        archive: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    match cli.command {
        Commands::Replay {
            script,
            input,
            classpath,
            work_dir,
            output,
            min_memory_mib,
            enforce_memory,
            compression,
        } => replay_pass(
            &script,
            input,
            classpath,
            work_dir,
            output,
            min_memory_mib.map(|mib| (mib << 20, enforce_memory)),
            compression,
        ),
        Commands::Resolve { path, entry, out } => resolve(&path, entry.as_deref(), out.as_deref()),
        Commands::Name {
            method,
            index,
            is_abstract,
            proposed,
        } => {
            print_name(&method, index, is_abstract, proposed.as_deref());
            Ok(())
        }
        Commands::Entries { archive } => list_entries(&archive),
    }
}
