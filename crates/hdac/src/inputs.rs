//! Loading what a run needs and storing what it produces.

use crate::error::{PipelineError, PipelineErrorExt};
use crate::pipeline::Composition;
use hdac_domain::config::{HdacConfig, ProbeConfig};
use hdac_kernel::config::load_config;
use hdac_kernel::output::write_atomic;
use hdac_manifest::Manifest;
use hdac_probe::FsEnvironment;
use std::path::Path;
use tracing::info;

/// Loads tool settings; `None` reads the optional `hdac.toml` in the working directory.
///
/// # Errors
/// [`PipelineError::Config`] if a named file is missing or any source is malformed.
pub fn load_settings(path: Option<&Path>) -> Result<HdacConfig, PipelineError> {
    let context = path.map_or_else(
        || "Failed to load settings".to_owned(),
        |p| format!("Failed to load settings from {}", p.display()),
    );
    load_config::<HdacConfig>(path).context(context)
}

/// Loads a manifest file, or the bundled CS8409 manifest when `path` is `None`.
///
/// # Errors
/// [`PipelineError::Manifest`] if the file cannot be read or does not validate.
pub fn load_manifest(path: Option<&Path>) -> Result<Manifest, PipelineError> {
    let manifest = match path {
        Some(path) => Manifest::load(path)?,
        None => Manifest::cs8409().context("bundled manifest")?,
    };
    Ok(manifest)
}

/// Builds the filesystem environment described by the `[probe]` settings.
///
/// # Errors
/// [`PipelineError::Probe`] if the local root is missing or not a directory.
pub fn fs_environment(config: &ProbeConfig) -> Result<FsEnvironment, PipelineError> {
    Ok(FsEnvironment::from_config(config)?)
}

impl Composition {
    /// Atomically replaces `path` with the rendered header.
    ///
    /// # Errors
    /// [`PipelineError::Output`] if the file cannot be written; a previous file at
    /// `path` is left untouched.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), PipelineError> {
        let path = path.as_ref();
        write_atomic(path, self.header.as_bytes())
            .context(format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "Compatibility header written");
        Ok(())
    }
}
