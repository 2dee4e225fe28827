use serde::{Deserialize, Serialize};

/// Engine configuration for a pass.
///
/// Passes always run with [`EngineOptions::fixed`]; the struct exists so the
/// set is typed and inspectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EngineOptions {
    pub decompile_inner_classes: bool,
    pub decompile_generic_signatures: bool,
    pub ascii_string_literals: bool,
    pub include_entire_classpath: bool,
    pub remove_synthetic_members: bool,
    pub remove_bridge_methods: bool,
    pub literals_as_is: bool,
    pub unit_test_mode: bool,
    /// `None` means no per-method cap.
    pub max_method_processing: Option<u32>,
}

impl EngineOptions {
    pub const fn fixed() -> Self {
        Self {
            decompile_inner_classes: true,
            decompile_generic_signatures: true,
            ascii_string_literals: true,
            include_entire_classpath: true,
            remove_synthetic_members: true,
            remove_bridge_methods: true,
            literals_as_is: false,
            unit_test_mode: false,
            max_method_processing: None,
        }
    }

    /// Engine-native (key, value) pairs.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let flag = |b: bool| (if b { "1" } else { "0" }).to_string();
        vec![
            ("din", flag(self.decompile_inner_classes)),
            ("dgs", flag(self.decompile_generic_signatures)),
            ("asc", flag(self.ascii_string_literals)),
            ("iec", flag(self.include_entire_classpath)),
            ("rsy", flag(self.remove_synthetic_members)),
            ("rbr", flag(self.remove_bridge_methods)),
            ("lit", flag(self.literals_as_is)),
            ("__unit_test_mode__", flag(self.unit_test_mode)),
            (
                "mpm",
                self.max_method_processing.unwrap_or(0).to_string(),
            ),
        ]
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::fixed()
    }
}

/// How entries are stored in produced archives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryCompression {
    Stored,
    #[default]
    Deflated,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputOptions {
    pub compression: EntryCompression,
}

impl OutputOptions {
    pub(crate) fn file_options(&self) -> zip::write::SimpleFileOptions {
        let method = match self.compression {
            EntryCompression::Stored => zip::CompressionMethod::Stored,
            EntryCompression::Deflated => zip::CompressionMethod::Deflated,
        };
        zip::write::SimpleFileOptions::default().compression_method(method)
    }
}
