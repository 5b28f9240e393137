use hdac_composer::*;
use hdac_domain::{CandidateRef, ComposedSource, FallbackSymbol, LogicalDependency, ResolutionResult};
use hdac_resolver::Probe;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Maps locators to the symbols their header defines; reports no paths.
#[derive(Default)]
struct Headers(BTreeMap<String, Vec<String>>);

impl Headers {
    fn with(mut self, locator: &str, symbols: &[&str]) -> Self {
        self.0.insert(locator.to_owned(), symbols.iter().map(|s| (*s).to_owned()).collect());
        self
    }
}

impl Probe for Headers {
    fn locate(&self, _: &CandidateRef) -> Option<PathBuf> {
        None
    }
}

impl SymbolIndex for Headers {
    fn symbols(&self, source: &ComposedSource) -> Vec<String> {
        self.0.get(&source.candidate.to_string()).cloned().unwrap_or_default()
    }
}

fn run(headers: &Headers) -> String {
    let hda_local: CandidateRef = "sys:sound/pci/hda/hda_local.h".parse().unwrap();
    let results = [ResolutionResult::found(
        LogicalDependency::new("hda_local", vec![hda_local.clone()], true),
        hda_local,
        None,
    )];
    let base: [CandidateRef; 1] = ["sys:sound/core.h".parse().unwrap()];

    let ns = compose(&base, &results, headers, headers);
    let ns = FallbackLayer::new()
        .apply(ns, &[FallbackSymbol::constant("HDA_FIXUP_ACT_INIT", "2")])
        .unwrap();
    render(&ns, Some("COMPAT_H"))
}

#[test]
fn fallback_omitted_when_a_source_defines_it() {
    let headers = Headers::default().with("sys:sound/pci/hda/hda_local.h", &["HDA_FIXUP_ACT_INIT"]);
    let header = run(&headers);
    assert!(!header.contains("#define HDA_FIXUP_ACT_INIT"));
    assert!(header.contains("#include <sound/pci/hda/hda_local.h> /* hda_local */"));
}

#[test]
fn fallback_emitted_exactly_once_when_missing() {
    let header = run(&Headers::default());
    assert_eq!(header.matches("#define HDA_FIXUP_ACT_INIT 2\n").count(), 1);
}

#[test]
fn base_source_symbols_count_as_visible() {
    let headers = Headers::default().with("sys:sound/core.h", &["HDA_FIXUP_ACT_INIT"]);
    assert!(!run(&headers).contains("#define HDA_FIXUP_ACT_INIT"));
}

#[test]
fn composition_is_deterministic() {
    let headers = Headers::default().with("sys:sound/core.h", &["snd_card_new"]);
    assert_eq!(run(&headers), run(&headers));
}
