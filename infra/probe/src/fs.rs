use crate::error::{ProbeError, ProbeErrorExt};
use crate::scan;
use hdac_composer::SymbolIndex;
use hdac_domain::config::ProbeConfig;
use hdac_domain::{CandidateKind, CandidateRef, ComposedSource};
use hdac_resolver::Probe;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// The real build environment: include search path plus the driver's source root.
#[derive(Debug, Clone)]
pub struct FsEnvironment {
    search_path: Vec<PathBuf>,
    local_root: PathBuf,
}

impl FsEnvironment {
    /// An environment with no system include directories.
    pub fn new(local_root: impl Into<PathBuf>) -> Self {
        Self { search_path: Vec::new(), local_root: local_root.into() }
    }

    /// Appends system include directories, searched in the given order.
    #[must_use]
    pub fn with_search_path<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.search_path.extend(dirs.into_iter().map(Into::into));
        self
    }

    /// Builds the environment described by the `[probe]` settings.
    ///
    /// Missing include directories are only warned about, since a layout that lacks
    /// one is exactly what the candidate lists are for. The local root must exist.
    ///
    /// # Errors
    /// Returns [`ProbeError::Io`] if the local root cannot be resolved, or
    /// [`ProbeError::InvalidRoot`] if it is not a directory.
    pub fn from_config(config: &ProbeConfig) -> Result<Self, ProbeError> {
        let local_root = config
            .local_root
            .canonicalize()
            .context(format!("local root {}", config.local_root.display()))?;
        if !local_root.is_dir() {
            return Err(ProbeError::InvalidRoot { path: local_root, context: None });
        }

        let search_path = config.search_path();
        for dir in search_path.iter().filter(|d| !d.is_dir()) {
            warn!(dir = %dir.display(), "Include directory does not exist");
        }
        debug!(
            local_root = %local_root.display(),
            search_path = ?search_path,
            "Filesystem probe environment ready"
        );

        Ok(Self { search_path, local_root })
    }

    #[must_use]
    pub fn search_path(&self) -> &[PathBuf] {
        &self.search_path
    }

    #[must_use]
    pub fn local_root(&self) -> &Path {
        &self.local_root
    }
}

impl Probe for FsEnvironment {
    fn locate(&self, candidate: &CandidateRef) -> Option<PathBuf> {
        let relative = Path::new(candidate.locator());
        match candidate.kind() {
            CandidateKind::SystemAbsolute => {
                self.search_path.iter().find_map(|dir| existing_file(&dir.join(relative)))
            },
            CandidateKind::LocalRelative => existing_file(&self.local_root.join(relative)),
        }
    }
}

impl SymbolIndex for FsEnvironment {
    fn symbols(&self, source: &ComposedSource) -> Vec<String> {
        let Some(path) = source.location.clone().or_else(|| self.locate(&source.candidate)) else {
            return Vec::new();
        };

        match fs::read(&path) {
            Ok(bytes) => {
                let found = scan::symbols(&String::from_utf8_lossy(&bytes));
                trace!(path = %path.display(), symbols = found.len(), "Header scanned");
                found.into_iter().collect()
            },
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Header unreadable, assuming no symbols");
                Vec::new()
            },
        }
    }
}

/// Canonical path of `path` if it names a regular file; any I/O failure means "absent".
fn existing_file(path: &Path) -> Option<PathBuf> {
    match path.canonicalize() {
        Ok(canonical) if canonical.is_file() => Some(canonical),
        Ok(_) => None,
        Err(err) => {
            if err.kind() != ErrorKind::NotFound {
                debug!(path = %path.display(), error = %err, "Probe I/O failure treated as absent");
            }
            None
        },
    }
}
