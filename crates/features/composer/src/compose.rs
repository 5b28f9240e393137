use crate::index::SymbolIndex;
use hdac_domain::{
    CandidateRef, ComposedSource, CompositeNamespace, ResolutionResult, SourceId, SourceOrigin,
};
use hdac_resolver::Probe;
use std::path::PathBuf;
use tracing::{debug, info};

/// Builds the ordered, duplicate-free namespace for one run.
///
/// Base sources come first, unconditionally and in declared order; then each resolved
/// dependency in manifest order. A source whose identity is already placed is skipped.
/// Identity is the physical path when the probe knows one, else the normalized
/// candidate, so base sources are located (never gated) through `probe` for that
/// purpose alone.
///
/// Every placed source contributes the names `index` finds in it, and a resolved
/// dependency also contributes its declared `provides`, even when its source was
/// deduplicated away.
pub fn compose<P, I>(
    base: &[CandidateRef],
    results: &[ResolutionResult],
    probe: &P,
    index: &I,
) -> CompositeNamespace
where
    P: Probe + ?Sized,
    I: SymbolIndex + ?Sized,
{
    let mut ns = CompositeNamespace::new();

    for candidate in base {
        let location = probe.locate(candidate);
        place(&mut ns, index, candidate.clone(), location, SourceOrigin::Base);
    }

    for result in results {
        let dependency = result.dependency();
        let Some(chosen) = result.chosen() else {
            debug!(dependency = %dependency.name, "Unresolved optional dependency contributes nothing");
            continue;
        };

        let location = result.location().map(PathBuf::from);
        let origin = SourceOrigin::Dependency(dependency.name.clone());
        place(&mut ns, index, chosen.clone(), location, origin);
        ns.declare_visible(dependency.provides.iter().cloned());
    }

    info!(sources = ns.sources().len(), "Namespace composed");
    ns
}

fn place<I: SymbolIndex + ?Sized>(
    ns: &mut CompositeNamespace,
    index: &I,
    candidate: CandidateRef,
    location: Option<PathBuf>,
    origin: SourceOrigin,
) {
    let identity = location
        .clone()
        .map_or_else(|| SourceId::Logical(candidate.clone()), SourceId::Physical);
    let source = ComposedSource { candidate, identity, origin, location };
    let symbols = index.symbols(&source);

    if ns.push_source(source) {
        ns.declare_visible(symbols);
    } else {
        debug!(?symbols, "Source already placed, skipping duplicate");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdac_domain::{CandidateKind, LogicalDependency};
    use std::path::Path;

    /// Every `sound/` header lives in one physical directory, which the driver tree
    /// also reaches as `local:include/sound/...`; everything else is unknown.
    struct Tree;

    impl Probe for Tree {
        fn locate(&self, candidate: &CandidateRef) -> Option<PathBuf> {
            let locator = match candidate.kind() {
                CandidateKind::SystemAbsolute => candidate.locator(),
                CandidateKind::LocalRelative => candidate.locator().strip_prefix("include/")?,
            };
            locator.starts_with("sound/").then(|| Path::new("/usr/src/linux/include").join(locator))
        }
    }

    impl SymbolIndex for Tree {
        fn symbols(&self, source: &ComposedSource) -> Vec<String> {
            vec![source.candidate.locator().replace(['/', '.'], "_").to_uppercase()]
        }
    }

    fn c(s: &str) -> CandidateRef {
        s.parse().unwrap()
    }

    fn found(name: &str, chosen: &str) -> ResolutionResult {
        let candidate = c(chosen);
        let location = Tree.locate(&candidate);
        ResolutionResult::found(
            LogicalDependency::new(name, vec![candidate.clone()], false),
            candidate,
            location,
        )
    }

    #[test]
    fn base_first_then_dependencies_in_order() {
        let base = [c("sys:linux/module.h"), c("sys:sound/core.h")];
        let results = [
            found("hda_local", "sys:sound/pci/hda/hda_local.h"),
            ResolutionResult::missing(LogicalDependency::new("hda_jack", vec![], false)),
            found("hda_codec", "local:hda_codec.h"),
        ];

        let ns = compose(&base, &results, &Tree, &Tree);
        let order: Vec<String> = ns.sources().iter().map(|s| s.candidate.to_string()).collect();
        assert_eq!(
            order,
            [
                "sys:linux/module.h",
                "sys:sound/core.h",
                "sys:sound/pci/hda/hda_local.h",
                "local:hda_codec.h",
            ]
        );
        assert_eq!(ns.sources()[2].origin, SourceOrigin::Dependency("hda_local".to_owned()));
    }

    #[test]
    fn same_physical_source_is_placed_once() {
        let base = [c("sys:sound/core.h")];
        let results = [found("core", "local:include/sound/core.h")];
        assert_ne!(base[0], *results[0].chosen().unwrap());

        let ns = compose(&base, &results, &Tree, &Tree);
        assert_eq!(ns.sources().len(), 1);
        assert_eq!(ns.sources()[0].origin, SourceOrigin::Base);
        assert!(matches!(ns.sources()[0].identity, SourceId::Physical(_)));
    }

    #[test]
    fn provides_are_visible_even_when_deduplicated() {
        let base = [c("sys:sound/hda_codec.h")];
        let dep = LogicalDependency::new("hda_codec", vec![c("sys:sound/hda_codec.h")], true)
            .with_provides(vec!["snd_hda_codec_write".to_owned()]);
        let results = [ResolutionResult::found(
            dep,
            c("sys:sound/hda_codec.h"),
            Tree.locate(&c("sys:sound/hda_codec.h")),
        )];

        let ns = compose(&base, &results, &Tree, &Tree);
        assert_eq!(ns.sources().len(), 1);
        assert!(ns.is_visible("snd_hda_codec_write"));
        assert!(ns.is_visible("SOUND_HDA_CODEC_H"));
    }
}
