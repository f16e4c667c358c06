use std::path::{Path, PathBuf};

/// Console dump scanned by the binary
pub const INPUT_PATH: &str = "dump_powrmenu.txt";

/// Directory receiving the extracted artifacts
pub const OUTPUT_DIR: &str = "out";

/// Artifact file name prefix
pub const FILE_PREFIX: &str = "pwr_";

/// Artifact file name suffix
pub const FILE_SUFFIX: &str = ".xbm";

/// Substring identifying the header line of a bitmap definition
pub const START_MARKER: &str = "#define xbm_width";

/// Closing marker; must end a newline-terminated line
pub const END_MARKER: &str = "};";

/// Manifest file written next to the artifacts
pub const MANIFEST_FILENAME: &str = "manifest.json";

/// How the scanner reacts to markers that do not pair up cleanly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanPolicy {
    /// Restart on a second header, skip orphan closers, drop an unterminated tail
    #[default]
    Lenient,
    /// Treat every unpaired marker as an error
    Strict,
}

impl ScanPolicy {
    pub fn is_strict(self) -> bool {
        matches!(self, ScanPolicy::Strict)
    }
}

/// Start/end substrings used by the line classifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    pub start: String,
    pub end: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            start: START_MARKER.to_string(),
            end: END_MARKER.to_string(),
        }
    }
}

/// Settings for one extraction run
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub prefix: String,
    pub suffix: String,
    pub markers: Markers,
    pub policy: ScanPolicy,
    pub write_manifest: bool,
}

impl ExtractConfig {
    /// Fixed paths and markers, lenient policy, manifest enabled
    pub fn new() -> Self {
        Self {
            input: PathBuf::from(INPUT_PATH),
            output_dir: PathBuf::from(OUTPUT_DIR),
            prefix: FILE_PREFIX.to_string(),
            suffix: FILE_SUFFIX.to_string(),
            markers: Markers::default(),
            policy: ScanPolicy::default(),
            write_manifest: true,
        }
    }

    /// Set the scan policy
    pub fn policy(mut self, policy: ScanPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Enable or disable the JSON manifest
    pub fn write_manifest(mut self, enabled: bool) -> Self {
        self.write_manifest = enabled;
        self
    }

    /// Point the run at another input file (used by tests)
    pub fn input(mut self, path: impl AsRef<Path>) -> Self {
        self.input = path.as_ref().to_path_buf();
        self
    }

    /// Point the run at another output directory (used by tests)
    pub fn output_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.output_dir = path.as_ref().to_path_buf();
        self
    }

    /// Location of the manifest for this run
    pub fn manifest_path(&self) -> PathBuf {
        self.output_dir.join(MANIFEST_FILENAME)
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self::new()
    }
}
