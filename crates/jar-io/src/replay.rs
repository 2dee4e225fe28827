//! A stand-in engine that replays a recorded JSON-lines script.
//!
//! Each non-blank line not starting with `#` is one [`ReplayEvent`]:
//!
//! ```text
//! {"bytecode":{"location":{"entry":{"archive":"in.jar","entry":"a/A.class"}}}}
//! {"name":{"method":"func_1_a","index":0,"is_abstract":true}}
//! {"output":{"op":"create_archive","dir":"","name":"in.jar"}}
//! ```

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    directive::OutputDirective,
    engine::{DecompilationEngine, EngineContext},
    error::{ErrorKind, JarIoError, Result},
    location::SymbolicLocation,
    naming::MethodParameterKey,
    options::EngineOptions,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayEvent {
    /// Ask the host for class bytes. `optional` requests tolerate `NotFound`.
    Bytecode {
        location: SymbolicLocation,
        #[serde(default)]
        optional: bool,
    },
    /// Ask the host to name a parameter.
    Name {
        method: String,
        index: usize,
        #[serde(default)]
        is_abstract: bool,
        #[serde(default)]
        proposed: Option<String>,
    },
    Output(OutputDirective),
}

#[derive(Debug, Default)]
pub struct ReplayEngine {
    events: Vec<ReplayEvent>,
    spaces: Vec<(PathBuf, bool)>,
    resolved: Vec<(SymbolicLocation, usize)>,
    names: Vec<String>,
}

impl ReplayEngine {
    pub fn new(events: Vec<ReplayEvent>) -> Self {
        Self {
            events,
            ..Self::default()
        }
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut events = Vec::new();
        for (n, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| JarIoError::Engine(format!("read script: {e}")))?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let event = serde_json::from_str(line)
                .map_err(|e| JarIoError::Engine(format!("script line {}: {e}", n + 1)))?;
            events.push(event);
        }
        Ok(Self::new(events))
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| JarIoError::io(path, e))?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn events(&self) -> &[ReplayEvent] {
        &self.events
    }

    /// Artifacts registered through `add_space`, with their `own` flag.
    pub fn spaces(&self) -> &[(PathBuf, bool)] {
        &self.spaces
    }

    /// Locations resolved during the last run, with their byte counts.
    pub fn resolved(&self) -> &[(SymbolicLocation, usize)] {
        &self.resolved
    }

    /// Names handed out during the last run, in request order.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl DecompilationEngine for ReplayEngine {
    fn add_space(&mut self, artifact: &Path, own: bool) -> Result<()> {
        debug!(artifact = %artifact.display(), own, "space added");
        self.spaces.push((artifact.to_path_buf(), own));
        Ok(())
    }

    fn decompile(&mut self, options: &EngineOptions, ctx: EngineContext<'_>) -> Result<()> {
        debug!(?options, "replay starting");
        self.resolved.clear();
        self.names.clear();

        for event in &self.events {
            match event {
                ReplayEvent::Bytecode { location, optional } => {
                    match ctx.bytecode.bytecode(location) {
                        Ok(bytes) => self.resolved.push((location.clone(), bytes.len())),
                        Err(e) if *optional && e.kind() == ErrorKind::NotFound => {
                            debug!(%location, "optional class unavailable");
                        }
                        Err(e) => return Err(e),
                    }
                }
                ReplayEvent::Name {
                    method,
                    index,
                    is_abstract,
                    proposed,
                } => {
                    let key = MethodParameterKey {
                        method,
                        index: *index,
                        is_abstract: *is_abstract,
                        proposed: proposed.as_deref(),
                    };
                    self.names.push(ctx.naming.parameter_name(&key));
                }
                ReplayEvent::Output(directive) => ctx.output.apply(directive.clone())?,
            }
        }

        info!(
            events = self.events.len(),
            resolved = self.resolved.len(),
            names = self.names.len(),
            "replay finished"
        );
        Ok(())
    }
}
