//! Host-side callbacks for an external bytecode decompilation engine.
//!
//! The engine asks for class bytes ([`BytecodeResolver`]), streams output
//! directives ([`ArchiveMultiplexer`]) and asks for names of parameters it
//! cannot infer ([`ParameterNamingStrategy`]). [`DecompilePass`] wires the
//! three into one engine run.

pub mod directive;
pub mod engine;
pub mod error;
pub mod location;
pub mod manifest;
pub mod multiplexer;
pub mod naming;
pub mod options;
pub mod pass;
pub mod path;
pub mod preflight;
pub mod replay;
pub mod resolver;

#[cfg(test)]
mod test_support;

pub use directive::OutputDirective;
pub use engine::{
    BytecodeProvider, DecompilationEngine, EngineContext, OutputSink, ParameterNamer, SharedSink,
};
pub use error::{ErrorKind, JarIoError, Result};
pub use location::SymbolicLocation;
pub use manifest::Manifest;
pub use multiplexer::{ArchiveMultiplexer, SinkStats};
pub use naming::{FallbackNaming, MethodParameterKey, ParameterNamingStrategy, ProposedName};
pub use options::{EngineOptions, EntryCompression, OutputOptions};
pub use pass::{DecompilePass, PassConfig, PassReport};
pub use path::OutputRoot;
pub use preflight::MemoryCeiling;
pub use replay::{ReplayEngine, ReplayEvent};
pub use resolver::BytecodeResolver;
