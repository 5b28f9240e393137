use serde::Deserialize;
use std::path::PathBuf;

/// Top-level tool configuration, loaded from `hdac.toml` and `HDAC__*` variables.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HdacConfig {
    pub probe: ProbeConfig,
    pub output: OutputConfig,
    pub log: LogConfig,
}

/// Where the probe looks for candidates.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Kernel build tree; contributes `<dir>/include` and `<dir>` to the search path.
    pub kernel_dir: Option<PathBuf>,
    /// Extra system include directories, searched after the kernel tree.
    pub include_dirs: Vec<PathBuf>,
    /// Root for `local:` candidates, normally the driver source directory.
    pub local_root: PathBuf,
}

impl ProbeConfig {
    /// The ordered system include search path.
    #[must_use]
    pub fn search_path(&self) -> Vec<PathBuf> {
        let mut dirs = Vec::with_capacity(self.include_dirs.len() + 2);
        if let Some(kernel) = &self.kernel_dir {
            dirs.push(kernel.join("include"));
            dirs.push(kernel.clone());
        }
        dirs.extend(self.include_dirs.iter().cloned());
        dirs
    }
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Destination of the generated header; stdout when unset.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub directory: Option<PathBuf>,
    pub json: bool,
}

// --- Default ---

impl Default for ProbeConfig {
    fn default() -> Self {
        Self { kernel_dir: None, include_dirs: Vec::new(), local_root: PathBuf::from(".") }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: "warn".to_owned(), directory: None, json: false }
    }
}
