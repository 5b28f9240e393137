use crate::candidate::CandidateRef;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A named external API surface the driver needs, independent of where it lives.
///
/// Built once from the manifest; candidates are in strict priority order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogicalDependency {
    pub name: String,
    pub candidates: Vec<CandidateRef>,
    pub mandatory: bool,
    /// Symbols the manifest declares this dependency to define, whatever candidate wins.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub provides: Vec<String>,
}

impl LogicalDependency {
    pub fn new(name: impl Into<String>, candidates: Vec<CandidateRef>, mandatory: bool) -> Self {
        Self { name: name.into(), candidates, mandatory, provides: Vec::new() }
    }

    #[must_use]
    pub fn with_provides(mut self, provides: Vec<String>) -> Self {
        self.provides = provides;
        self
    }
}

/// Outcome of resolving one [`LogicalDependency`].
///
/// `chosen` is the first candidate, in declared order, that the probe found.
/// `None` only ever appears for optional dependencies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionResult {
    dependency: LogicalDependency,
    chosen: Option<CandidateRef>,
    location: Option<PathBuf>,
}

impl ResolutionResult {
    #[must_use]
    pub const fn found(
        dependency: LogicalDependency,
        chosen: CandidateRef,
        location: Option<PathBuf>,
    ) -> Self {
        Self { dependency, chosen: Some(chosen), location }
    }

    #[must_use]
    pub const fn missing(dependency: LogicalDependency) -> Self {
        Self { dependency, chosen: None, location: None }
    }

    #[must_use]
    pub const fn dependency(&self) -> &LogicalDependency {
        &self.dependency
    }

    #[must_use]
    pub const fn chosen(&self) -> Option<&CandidateRef> {
        self.chosen.as_ref()
    }

    /// Physical path reported by the probe for the chosen candidate, when known.
    #[must_use]
    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.chosen.is_some()
    }
}
