use serde::{Deserialize, Serialize};

/// Entry name the manifest is stored under.
pub const MANIFEST_ENTRY: &str = "META-INF/MANIFEST.MF";

const VERSION_KEY: &str = "Manifest-Version";
const MAX_LINE: usize = 72;

/// Main attributes of a manifest-bearing archive.
///
/// Attribute names compare case-insensitively; insertion order is kept so
/// the rendered header is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    attributes: Vec<(String, String)>,
}

impl Manifest {
    pub fn new() -> Self {
        let mut m = Self::default();
        m.insert(VERSION_KEY, "1.0");
        m
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self
            .attributes
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&key))
        {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Renders the manifest file body: version first, CRLF line ends, lines
    /// wrapped at 72 bytes with a single-space continuation.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        if let Some(version) = self.get(VERSION_KEY) {
            write_attribute(&mut out, VERSION_KEY, version);
        }
        for (k, v) in &self.attributes {
            if k.eq_ignore_ascii_case(VERSION_KEY) {
                continue;
            }
            write_attribute(&mut out, k, v);
        }
        out.extend_from_slice(b"\r\n");
        out
    }
}

fn write_attribute(out: &mut Vec<u8>, key: &str, value: &str) {
    let line = format!("{key}: {value}");
    let mut rest = line.as_str();
    let mut limit = MAX_LINE;
    loop {
        if rest.len() <= limit {
            out.extend_from_slice(rest.as_bytes());
            out.extend_from_slice(b"\r\n");
            return;
        }
        let mut cut = limit;
        while !rest.is_char_boundary(cut) {
            cut -= 1;
        }
        out.extend_from_slice(rest[..cut].as_bytes());
        out.extend_from_slice(b"\r\n ");
        rest = &rest[cut..];
        // continuation lines carry the leading space
        limit = MAX_LINE - 1;
    }
}
