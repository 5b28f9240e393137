use crate::error::{ManifestError, ManifestErrorExt};
use crate::policy::{CandidatePolicy, LayoutPolicy};
use fxhash::FxHashSet;
use hdac_domain::{CandidateRef, FallbackSymbol, Guard, LogicalDependency, SymbolKind};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

const BUNDLED_CS8409: &str = include_str!("../manifests/cs8409.toml");

// --- Wire format ---

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawManifest {
    output: RawOutput,
    layout: RawLayout,
    host: RawHost,
    base: Vec<RawBase>,
    #[serde(rename = "dependency")]
    dependencies: Vec<RawDependency>,
    #[serde(rename = "fallback")]
    fallbacks: Vec<RawFallback>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawOutput {
    guard: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawLayout {
    candidates: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawHost {
    symbols: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBase {
    source: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDependency {
    name: String,
    #[serde(default)]
    mandatory: bool,
    candidates: Option<Vec<String>>,
    #[serde(default)]
    provides: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFallback {
    name: String,
    kind: SymbolKind,
    value: Option<String>,
    params: Option<Vec<String>>,
    body: Option<String>,
    #[serde(default)]
    requires: Vec<String>,
    #[serde(default)]
    guard: Guard,
}

// --- Validated model ---

/// A validated manifest: everything the pipeline needs for one run.
#[derive(Debug, Clone)]
pub struct Manifest {
    guard: Option<String>,
    base: Vec<CandidateRef>,
    dependencies: Vec<LogicalDependency>,
    fallbacks: Vec<FallbackSymbol>,
    host_symbols: Vec<String>,
}

impl Manifest {
    /// Reads and validates a manifest file.
    ///
    /// # Errors
    /// Returns [`ManifestError::Io`] if the file cannot be read, or any validation
    /// error described on [`Manifest::from_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .context(format!("Failed to read manifest: {}", path.display()))?;
        text.parse::<Self>().context(path.display().to_string())
    }

    /// The manifest shipped with the tool for the CS8409 driver.
    ///
    /// # Errors
    /// Never fails in practice; the bundled file is covered by tests.
    pub fn cs8409() -> Result<Self, ManifestError> {
        BUNDLED_CS8409.parse()
    }

    /// Include guard for the rendered header, if the manifest names one.
    #[must_use]
    pub fn guard(&self) -> Option<&str> {
        self.guard.as_deref()
    }

    /// Always-included sources, in declared order.
    #[must_use]
    pub fn base(&self) -> &[CandidateRef] {
        &self.base
    }

    #[must_use]
    pub fn dependencies(&self) -> &[LogicalDependency] {
        &self.dependencies
    }

    #[must_use]
    pub fn fallbacks(&self) -> &[FallbackSymbol] {
        &self.fallbacks
    }

    /// Symbols presumed to be supplied by the host build environment.
    #[must_use]
    pub fn host_symbols(&self) -> &[String] {
        &self.host_symbols
    }
}

impl FromStr for Manifest {
    type Err = ManifestError;

    /// Parses and validates a manifest.
    ///
    /// Validation covers names, candidate lists (non-empty, no repeats), and the
    /// shape of every fallback. Nothing here touches the filesystem.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: RawManifest = toml::from_str(s)?;

        if let Some(guard) = &raw.output.guard {
            check_identifier(guard, "output guard")?;
        }
        for symbol in &raw.host.symbols {
            check_identifier(symbol, "host symbol")?;
        }

        let base = raw
            .base
            .iter()
            .map(|b| b.source.parse::<CandidateRef>().context("base source"))
            .collect::<Result<Vec<_>, _>>()?;

        let policy = build_policy(raw.layout.candidates, &raw.dependencies)?;
        let dependencies = build_dependencies(raw.dependencies, &policy)?;
        let fallbacks = build_fallbacks(raw.fallbacks)?;

        debug!(
            base = base.len(),
            dependencies = dependencies.len(),
            fallbacks = fallbacks.len(),
            "Manifest validated"
        );

        Ok(Self { guard: raw.output.guard, base, dependencies, fallbacks, host_symbols: raw.host.symbols })
    }
}

fn build_policy(
    templates: Vec<String>,
    dependencies: &[RawDependency],
) -> Result<LayoutPolicy, ManifestError> {
    let mut policy = LayoutPolicy::new(templates)?;
    for dep in dependencies {
        let Some(explicit) = &dep.candidates else { continue };
        let candidates = explicit
            .iter()
            .map(|c| c.parse::<CandidateRef>())
            .collect::<Result<Vec<_>, _>>()
            .context(format!("dependency `{}`", dep.name))?;
        policy = policy.with_override(dep.name.clone(), candidates);
    }
    Ok(policy)
}

fn build_dependencies(
    raw: Vec<RawDependency>,
    policy: &impl CandidatePolicy,
) -> Result<Vec<LogicalDependency>, ManifestError> {
    let mut seen = FxHashSet::default();
    let mut dependencies = Vec::with_capacity(raw.len());

    for dep in raw {
        check_identifier(&dep.name, "dependency name")?;
        if !seen.insert(dep.name.clone()) {
            return Err(ManifestError::DuplicateDependency { name: dep.name, context: None });
        }
        for symbol in &dep.provides {
            check_identifier(symbol, "provided symbol")?;
        }

        let candidates = policy.candidates_for(&dep.name)?;
        if candidates.is_empty() {
            return Err(ManifestError::EmptyCandidates {
                name: dep.name,
                context: Some("no explicit candidates and no layout templates".into()),
            });
        }

        let mut unique = FxHashSet::default();
        if let Some(repeat) = candidates.iter().find(|c| !unique.insert(*c)) {
            return Err(ManifestError::DuplicateCandidate {
                name: dep.name,
                candidate: repeat.to_string(),
                context: None,
            });
        }

        dependencies.push(
            LogicalDependency::new(dep.name, candidates, dep.mandatory).with_provides(dep.provides),
        );
    }

    Ok(dependencies)
}

fn build_fallbacks(raw: Vec<RawFallback>) -> Result<Vec<FallbackSymbol>, ManifestError> {
    let declared: FxHashSet<String> = raw.iter().map(|f| f.name.clone()).collect();
    let mut seen = FxHashSet::default();
    let mut fallbacks = Vec::with_capacity(raw.len());

    for fb in raw {
        check_identifier(&fb.name, "fallback name")?;
        if !seen.insert(fb.name.clone()) {
            return Err(ManifestError::DuplicateFallback { name: fb.name, context: None });
        }

        let symbol = match fb.kind {
            SymbolKind::Constant => constant(fb)?,
            SymbolKind::Function => {
                for req in &fb.requires {
                    // A function may lean on an earlier fallback, never a later one.
                    if declared.contains(req) && !seen.contains(req) {
                        return Err(conflict(
                            &fb.name,
                            format!("requires `{req}`, which is declared later"),
                        ));
                    }
                }
                function(fb)?
            },
        };
        fallbacks.push(symbol);
    }

    Ok(fallbacks)
}

fn constant(fb: RawFallback) -> Result<FallbackSymbol, ManifestError> {
    if fb.params.is_some() || fb.body.is_some() || !fb.requires.is_empty() {
        return Err(conflict(&fb.name, "a constant takes no `params`, `body` or `requires`"));
    }
    let value = fb.value.filter(|v| !v.trim().is_empty());
    let Some(value) = value else {
        return Err(conflict(&fb.name, "a constant needs a non-empty `value`"));
    };
    check_single_line(&fb.name, value.trim(), "value")?;

    let mut symbol = FallbackSymbol::constant(fb.name, value.trim());
    symbol.guard = fb.guard;
    Ok(symbol)
}

fn function(fb: RawFallback) -> Result<FallbackSymbol, ManifestError> {
    if fb.value.is_some() {
        return Err(conflict(&fb.name, "a function takes a `body`, not a `value`"));
    }
    let body = fb.body.filter(|b| !b.trim().is_empty());
    let Some(body) = body else {
        return Err(conflict(&fb.name, "a function needs a non-empty `body`"));
    };
    check_single_line(&fb.name, body.trim(), "body")?;

    let params = fb.params.unwrap_or_default();
    let mut unique = FxHashSet::default();
    for param in &params {
        check_identifier(param, "parameter")?;
        if !unique.insert(param.as_str()) {
            return Err(conflict(&fb.name, format!("parameter `{param}` repeated")));
        }
    }
    for req in &fb.requires {
        check_identifier(req, "required primitive")?;
        if *req == fb.name {
            return Err(conflict(&fb.name, "a fallback cannot require itself"));
        }
    }

    let mut symbol = FallbackSymbol::function(fb.name, params, body.trim(), fb.requires);
    symbol.guard = fb.guard;
    Ok(symbol)
}

fn conflict(name: &str, message: impl Into<std::borrow::Cow<'static, str>>) -> ManifestError {
    ManifestError::ConflictingFallback { name: name.to_owned(), message: message.into(), context: None }
}

/// Each fallback renders as one `#define` line; a line break or a trailing
/// backslash would spill into the directives that follow it.
fn check_single_line(name: &str, text: &str, what: &str) -> Result<(), ManifestError> {
    if text.chars().any(|c| c.is_control() && c != '\t') {
        return Err(conflict(name, format!("`{what}` must fit on one line")));
    }
    if text.ends_with('\\') {
        return Err(conflict(name, format!("`{what}` cannot end with a line continuation")));
    }
    Ok(())
}

/// C identifier rules: `[A-Za-z_][A-Za-z0-9_]*`.
fn check_identifier(name: &str, what: &'static str) -> Result<(), ManifestError> {
    let mut chars = name.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(())
    } else {
        Err(ManifestError::InvalidName { name: name.to_owned(), context: Some(what.into()) })
    }
}
