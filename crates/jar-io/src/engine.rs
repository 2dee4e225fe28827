//! The narrow surfaces the engine calls back into.
//!
//! Callbacks arrive serially on one thread. The engine must not treat any
//! directive as pending: each call returns only after its effect, dedup
//! bookkeeping included, is applied.

use std::{path::Path, sync::Arc};

use parking_lot::Mutex;

use crate::{
    directive::OutputDirective, error::Result, location::SymbolicLocation,
    naming::MethodParameterKey, options::EngineOptions,
};

/// Supplies raw class bytes by symbolic location.
pub trait BytecodeProvider {
    fn bytecode(&self, location: &SymbolicLocation) -> Result<Vec<u8>>;
}

/// Receives every output directive of a pass.
pub trait OutputSink {
    fn apply(&mut self, directive: OutputDirective) -> Result<()>;
}

/// Names method parameters the engine cannot infer a name for.
pub trait ParameterNamer {
    fn parameter_name(&self, key: &MethodParameterKey<'_>) -> String;
}

/// Callback surfaces handed to the engine for one pass.
pub struct EngineContext<'a> {
    pub bytecode: &'a dyn BytecodeProvider,
    pub output: &'a mut dyn OutputSink,
    pub naming: &'a dyn ParameterNamer,
}

/// An external decompilation engine.
pub trait DecompilationEngine {
    /// Registers an artifact. `own` artifacts are decompiled; the rest are
    /// only consulted for symbol resolution.
    fn add_space(&mut self, artifact: &Path, own: bool) -> Result<()>;

    /// Runs the pass, calling back into `ctx` until it returns.
    fn decompile(&mut self, options: &EngineOptions, ctx: EngineContext<'_>) -> Result<()>;
}

/// Serializes directives from engines that call back on several threads.
pub struct SharedSink<S> {
    inner: Arc<Mutex<S>>,
}

impl<S> Clone for SharedSink<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: OutputSink> SharedSink<S> {
    pub fn new(sink: S) -> Self {
        Self {
            inner: Arc::new(Mutex::new(sink)),
        }
    }

    /// Applies one directive while holding the lock, so a dedup check and
    /// its write never interleave with another thread's directive.
    pub fn apply_shared(&self, directive: OutputDirective) -> Result<()> {
        self.inner.lock().apply(directive)
    }

    /// Returns the sink once every other clone is gone.
    pub fn into_inner(self) -> Option<S> {
        Arc::into_inner(self.inner).map(Mutex::into_inner)
    }
}

impl<S: OutputSink> OutputSink for SharedSink<S> {
    fn apply(&mut self, directive: OutputDirective) -> Result<()> {
        self.apply_shared(directive)
    }
}
