use tracing::warn;

use crate::error::{JarIoError, Result};

/// Optional check run before a pass: large inputs need plenty of memory and
/// the engine gives no useful failure when it runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryCeiling {
    pub min_bytes: u64,
    /// Fail the pass instead of warning.
    pub enforce: bool,
}

impl MemoryCeiling {
    pub fn check(&self) -> Result<()> {
        self.check_with(available_memory())
    }

    pub fn check_with(&self, available: Option<u64>) -> Result<()> {
        let Some(available) = available else {
            warn!("cannot determine available memory, skipping ceiling check");
            return Ok(());
        };
        if available >= self.min_bytes {
            return Ok(());
        }
        if self.enforce {
            return Err(JarIoError::Preflight {
                available,
                required: self.min_bytes,
            });
        }
        warn!(
            available_mib = available >> 20,
            required_mib = self.min_bytes >> 20,
            "there might not be enough memory to decompile"
        );
        Ok(())
    }
}

/// `MemAvailable` from `/proc/meminfo`, in bytes.
pub fn available_memory() -> Option<u64> {
    let text = std::fs::read_to_string("/proc/meminfo").ok()?;
    parse_meminfo(&text)
}

fn parse_meminfo(text: &str) -> Option<u64> {
    let line = text.lines().find(|l| l.starts_with("MemAvailable:"))?;
    let kib: u64 = line.split_whitespace().nth(1)?.parse().ok()?;
    kib.checked_mul(1024)
}
