//! Writing generated artifacts.
//!
//! A composition either lands completely or not at all: the header is written
//! to a temporary file next to the destination, synced, and renamed over it.

use std::borrow::Cow;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

#[hdac_derive::hdac_error]
pub enum OutputError {
    #[error("Output I/O failure{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Atomic replace failed{}: {source}", format_context(.context))]
    Persist { source: tempfile::PersistError, context: Option<Cow<'static, str>> },
}

/// Atomically replaces `path` with `data`, creating parent directories.
///
/// # Errors
/// Returns [`OutputError::Io`] if the directory or temp file cannot be written,
/// and [`OutputError::Persist`] if the final rename fails. In both cases any
/// previous file at `path` is left untouched.
pub fn write_atomic(path: impl AsRef<Path>, data: &[u8]) -> Result<(), OutputError> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    fs::create_dir_all(parent)
        .context(format!("Failed to create output directory: {}", parent.display()))?;

    let mut tmp = NamedTempFile::new_in(parent)
        .context(format!("Temp creation failed in {}", parent.display()))?;
    tmp.write_all(data).context("Write failed")?;
    tmp.as_file().sync_all().context("Sync failed")?;
    tmp.persist(path).context(format!("Failed to replace {}", path.display()))?;

    debug!(path = %path.display(), bytes = data.len(), "Artifact written atomically");
    Ok(())
}
