//! The merged artifact handed to the driver build.
//!
//! A [`CompositeNamespace`] is an ordered list of sources followed by the
//! fallback definitions that were applied on top of them, plus the set of
//! symbol names currently visible. It is built fresh for every run.

use crate::candidate::CandidateRef;
use crate::fallback::FallbackSymbol;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Physical identity of a source, used for deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceId {
    /// Canonical path on disk, as reported by the probe.
    Physical(PathBuf),
    /// Normalized candidate, used when the probe does not expose a path.
    Logical(CandidateRef),
}

/// Why a source is part of the namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceOrigin {
    Base,
    Dependency(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComposedSource {
    pub candidate: CandidateRef,
    pub identity: SourceId,
    pub origin: SourceOrigin,
    pub location: Option<PathBuf>,
}

/// One line of the composed output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive<'a> {
    Include(&'a CandidateRef),
    Define(&'a FallbackSymbol),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompositeNamespace {
    sources: Vec<ComposedSource>,
    fallbacks: Vec<FallbackSymbol>,
    visible: BTreeSet<String>,
}

impl CompositeNamespace {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a source unless one with the same identity is already placed.
    ///
    /// Returns `true` when the source was added.
    pub fn push_source(&mut self, source: ComposedSource) -> bool {
        if self.contains(&source.identity) {
            return false;
        }
        self.sources.push(source);
        true
    }

    #[must_use]
    pub fn contains(&self, identity: &SourceId) -> bool {
        self.sources.iter().any(|s| &s.identity == identity)
    }

    /// Marks names as visible to everything composed after this point.
    pub fn declare_visible<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.visible.extend(names.into_iter().map(Into::into));
    }

    #[must_use]
    pub fn is_visible(&self, name: &str) -> bool {
        self.visible.contains(name)
    }

    /// Appends a fallback definition at the tail and makes its name visible.
    pub fn push_fallback(&mut self, symbol: FallbackSymbol) {
        self.visible.insert(symbol.name.clone());
        self.fallbacks.push(symbol);
    }

    #[must_use]
    pub fn sources(&self) -> &[ComposedSource] {
        &self.sources
    }

    #[must_use]
    pub fn fallbacks(&self) -> &[FallbackSymbol] {
        &self.fallbacks
    }

    pub fn visible(&self) -> impl Iterator<Item = &str> {
        self.visible.iter().map(String::as_str)
    }

    /// Include directives in composition order, then fallback definitions.
    pub fn directives(&self) -> impl Iterator<Item = Directive<'_>> {
        self.sources
            .iter()
            .map(|s| Directive::Include(&s.candidate))
            .chain(self.fallbacks.iter().map(Directive::Define))
    }
}
