use hdac_domain::{CandidateKind, FallbackDefinition, SymbolKind};
use hdac_manifest::*;
use std::fs;

const MINIMAL: &str = r#"
[layout]
candidates = ["sys:sound/pci/hda/{name}.h", "local:{name}.h"]

[[base]]
source = "sys:sound/core.h"

[[dependency]]
name = "hda_local"
mandatory = true

[[dependency]]
name = "hda_jack"
provides = ["snd_hda_jack_detect"]

[[fallback]]
name = "HDA_FIXUP_ACT_INIT"
kind = "constant"
value = "2"
"#;

fn parse(text: &str) -> Result<Manifest, ManifestError> {
    text.parse()
}

#[test]
fn minimal_manifest_expands_layout() {
    let manifest = parse(MINIMAL).unwrap();

    assert_eq!(manifest.guard(), None);
    assert_eq!(manifest.base()[0].to_string(), "sys:sound/core.h");

    let jack = &manifest.dependencies()[1];
    assert!(!jack.mandatory);
    assert_eq!(jack.provides, ["snd_hda_jack_detect"]);
    assert_eq!(jack.candidates[0].kind(), CandidateKind::SystemAbsolute);
    assert_eq!(jack.candidates[1].to_string(), "local:hda_jack.h");

    let fallback = &manifest.fallbacks()[0];
    assert_eq!(fallback.kind(), SymbolKind::Constant);
    assert_eq!(fallback.definition, FallbackDefinition::Constant { value: "2".into() });
}

#[test]
fn load_reads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("compat.toml");
    fs::write(&path, MINIMAL).unwrap();

    let manifest = Manifest::load(&path).unwrap();
    assert_eq!(manifest.dependencies().len(), 2);
}

#[test]
fn load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Manifest::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ManifestError::Io { context: Some(_), .. }));
}

#[test]
fn malformed_toml_is_parse_error() {
    let err = parse("[[dependency]\nname = ").unwrap_err();
    assert!(matches!(err, ManifestError::Parse { .. }));
}

#[test]
fn unknown_keys_are_rejected() {
    let err = parse("[output]\nguard = \"X_H\"\nbanner = true\n").unwrap_err();
    assert!(matches!(err, ManifestError::Parse { .. }));
}

#[test]
fn dependency_without_any_candidate_is_rejected() {
    let err = parse("[[dependency]]\nname = \"hda_local\"\n").unwrap_err();
    assert!(matches!(err, ManifestError::EmptyCandidates { ref name, .. } if name == "hda_local"));

    let err = parse("[[dependency]]\nname = \"hda_local\"\ncandidates = []\n").unwrap_err();
    assert!(matches!(err, ManifestError::EmptyCandidates { .. }));
}

#[test]
fn duplicate_dependency_is_rejected() {
    let text = r#"
[layout]
candidates = ["local:{name}.h"]
[[dependency]]
name = "hda_bind"
[[dependency]]
name = "hda_bind"
"#;
    assert!(matches!(parse(text).unwrap_err(), ManifestError::DuplicateDependency { .. }));
}

#[test]
fn candidates_equal_after_normalization_are_duplicates() {
    let text = r#"
[[dependency]]
name = "hda_codec"
candidates = ["sys:sound/hda_codec.h", "sys:sound/./hda_codec.h"]
"#;
    let err = parse(text).unwrap_err();
    assert!(
        matches!(err, ManifestError::DuplicateCandidate { ref candidate, .. } if candidate == "sys:sound/hda_codec.h")
    );
}

#[test]
fn bad_locator_is_rejected() {
    let text = "[[dependency]]\nname = \"hda_codec\"\ncandidates = [\"hda_codec.h\"]\n";
    assert!(matches!(parse(text).unwrap_err(), ManifestError::InvalidLocator { .. }));

    let text = "[[base]]\nsource = \"local:../core.h\"\n";
    assert!(matches!(parse(text).unwrap_err(), ManifestError::InvalidLocator { .. }));
}

#[test]
fn invalid_names_are_rejected() {
    let text = "[[dependency]]\nname = \"hda-local\"\ncandidates = [\"local:x.h\"]\n";
    assert!(matches!(parse(text).unwrap_err(), ManifestError::InvalidName { .. }));

    let text = "[host]\nsymbols = [\"1BAD\"]\n";
    assert!(matches!(parse(text).unwrap_err(), ManifestError::InvalidName { .. }));
}

#[test]
fn constant_shape_is_enforced() {
    let text = "[[fallback]]\nname = \"X\"\nkind = \"constant\"\n";
    assert!(matches!(parse(text).unwrap_err(), ManifestError::ConflictingFallback { .. }));

    let text = "[[fallback]]\nname = \"X\"\nkind = \"constant\"\nvalue = \"1\"\nbody = \"2\"\n";
    assert!(matches!(parse(text).unwrap_err(), ManifestError::ConflictingFallback { .. }));
}

#[test]
fn function_shape_is_enforced() {
    let text = "[[fallback]]\nname = \"f\"\nkind = \"function\"\nparams = [\"a\", \"a\"]\nbody = \"g(a)\"\n";
    assert!(matches!(parse(text).unwrap_err(), ManifestError::ConflictingFallback { .. }));

    let text = "[[fallback]]\nname = \"f\"\nkind = \"function\"\nbody = \"f()\"\nrequires = [\"f\"]\n";
    assert!(matches!(parse(text).unwrap_err(), ManifestError::ConflictingFallback { .. }));
}

#[test]
fn function_may_not_require_a_later_fallback() {
    let text = r#"
[[fallback]]
name = "wrap"
kind = "function"
body = "LATER"
requires = ["LATER"]

[[fallback]]
name = "LATER"
kind = "constant"
value = "1"
"#;
    let err = parse(text).unwrap_err();
    assert!(matches!(err, ManifestError::ConflictingFallback { ref name, .. } if name == "wrap"));
}

#[test]
fn function_may_require_an_earlier_fallback() {
    let text = r#"
[[fallback]]
name = "EARLIER"
kind = "constant"
value = "1"

[[fallback]]
name = "wrap"
kind = "function"
body = "EARLIER"
requires = ["EARLIER"]
"#;
    let manifest = parse(text).unwrap();
    assert_eq!(manifest.fallbacks()[1].requires(), ["EARLIER"]);
}

#[test]
fn duplicate_fallback_is_rejected() {
    let text = "[[fallback]]\nname = \"X\"\nkind = \"constant\"\nvalue = \"1\"\n\
                [[fallback]]\nname = \"X\"\nkind = \"constant\"\nvalue = \"2\"\n";
    assert!(matches!(parse(text).unwrap_err(), ManifestError::DuplicateFallback { .. }));
}

#[test]
fn bundled_manifest_carries_write_cache_wrapper() {
    let manifest = Manifest::cs8409().unwrap();
    let wrapper = manifest.fallbacks().last().unwrap();

    assert_eq!(wrapper.name, "snd_hda_codec_write_cache");
    assert_eq!(wrapper.requires(), ["snd_hda_codec_write"]);
    let FallbackDefinition::Function { params, .. } = &wrapper.definition else {
        panic!("expected a function fallback");
    };
    assert_eq!(params.len(), 5);
}

#[test]
fn multi_line_definitions_are_rejected() {
    let text = "[[fallback]]\nname = \"HDA_FIXUP_ACT_INIT\"\nkind = \"constant\"\n\
                value = \"2\\n#endif\\n#include <evil.h>\"\n";
    let err = parse(text).unwrap_err();
    assert!(
        matches!(err, ManifestError::ConflictingFallback { ref name, .. } if name == "HDA_FIXUP_ACT_INIT")
    );

    let text = "[[fallback]]\nname = \"f\"\nkind = \"function\"\nbody = \"g()\\r\\n#undef X\"\n";
    assert!(matches!(parse(text).unwrap_err(), ManifestError::ConflictingFallback { .. }));

    let text = "[[fallback]]\nname = \"X\"\nkind = \"constant\"\nvalue = \"2 \\\\\"\n";
    assert!(matches!(parse(text).unwrap_err(), ManifestError::ConflictingFallback { .. }));
}

#[test]
fn locators_that_break_an_include_are_rejected() {
    let text = "[[dependency]]\nname = \"hda_local\"\n\
                candidates = [\"sys:sound/hda_local.h>\\n#include <evil.h\"]\n";
    assert!(matches!(parse(text).unwrap_err(), ManifestError::InvalidLocator { .. }));

    let text = "[[base]]\nsource = \"local:core\\\".h\"\n";
    assert!(matches!(parse(text).unwrap_err(), ManifestError::InvalidLocator { .. }));

    let text = "[layout]\ncandidates = [\"sys:sound/{name}>.h\"]\n";
    assert!(matches!(parse(text).unwrap_err(), ManifestError::InvalidLocator { .. }));
}
