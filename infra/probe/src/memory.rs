use hdac_composer::SymbolIndex;
use hdac_domain::{CandidateRef, ComposedSource};
use hdac_resolver::Probe;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// An in-memory environment: a fixed set of headers and the symbols each defines.
///
/// Reports no physical paths, so composed sources are identified by candidate.
#[derive(Debug, Clone, Default)]
pub struct StaticEnvironment {
    headers: BTreeMap<CandidateRef, BTreeSet<String>>,
}

impl StaticEnvironment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header that exists and defines `symbols`.
    #[must_use]
    pub fn with_header<I, S>(mut self, candidate: CandidateRef, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(candidate, symbols);
        self
    }

    pub fn insert<I, S>(&mut self, candidate: CandidateRef, symbols: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers.entry(candidate).or_default().extend(symbols.into_iter().map(Into::into));
    }
}

impl Probe for StaticEnvironment {
    fn locate(&self, _: &CandidateRef) -> Option<PathBuf> {
        None
    }

    fn probe(&self, candidate: &CandidateRef) -> bool {
        self.headers.contains_key(candidate)
    }
}

impl SymbolIndex for StaticEnvironment {
    fn symbols(&self, source: &ComposedSource) -> Vec<String> {
        self.headers
            .get(&source.candidate)
            .map(|symbols| symbols.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdac_domain::{SourceId, SourceOrigin};

    #[test]
    fn exists_without_a_path() {
        let codec: CandidateRef = "sys:sound/hda_codec.h".parse().unwrap();
        let env = StaticEnvironment::new().with_header(codec.clone(), ["snd_hda_codec_write"]);

        assert!(env.probe(&codec));
        assert_eq!(env.locate(&codec), None);
        assert!(!env.probe(&"local:hda_codec.h".parse().unwrap()));

        let source = ComposedSource {
            identity: SourceId::Logical(codec.clone()),
            candidate: codec,
            origin: SourceOrigin::Base,
            location: None,
        };
        assert_eq!(env.symbols(&source), ["snd_hda_codec_write"]);
    }
}
