use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::debug;

const DEFAULT_CONFIG: &str = "hdac";
const ENV_PREFIX: &str = "HDAC";

/// Custom error type for config loading.
#[hdac_derive::hdac_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads tool settings from an optional file layered under environment overrides.
///
/// 1. **Base File**: `path`, which must exist when given. Otherwise `hdac` in the
///    working directory (the format is picked from the extension, so `hdac.toml` is
///    found); that implicit file may be absent, since every setting has a default.
/// 2. **Environment Overrides**: variables prefixed with `HDAC__`, nested with double
///    underscores (e.g., `HDAC__PROBE__LOCAL_ROOT` maps to `probe.local_root`).
///    `HDAC__PROBE__INCLUDE_DIRS` is split on `:` like a search path.
///
/// # Errors
/// Returns [`ConfigError::Config`] if a named file is missing, a file is malformed, or the merged
/// values do not match the structure of `T`.
///
/// # Example
/// ```rust,no_run
/// use hdac_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct Settings {
///     verbose: bool,
/// }
///
/// let cfg: Settings = load_config(None::<&str>).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    // Only the implicit default may be absent; a named file must exist.
    let (effective_path, required) = path.map_or_else(
        || (PathBuf::from(DEFAULT_CONFIG), false),
        |p| (p.as_ref().to_path_buf(), true),
    );

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .list_separator(":")
                .with_list_parse_key("probe.include_dirs")
                .try_parsing(true)
                .convert_case(config::Case::Snake),
        );

    debug!(path = %effective_path.display(), required, "Loading configuration");

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
