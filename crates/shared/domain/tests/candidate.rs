use hdac_domain::{CandidateKind, CandidateRef, FallbackSymbol, SymbolKind};
use serde_json::json;

#[test]
fn candidates_serialize_in_scheme_form() {
    let c: CandidateRef = "sys:/sound/pci/hda/hda_local.h".parse().unwrap();
    assert_eq!(serde_json::to_value(&c).unwrap(), json!("sys:sound/pci/hda/hda_local.h"));

    let back: CandidateRef = serde_json::from_value(json!("local:hda_local.h")).unwrap();
    assert_eq!(back.kind(), CandidateKind::LocalRelative);
}

#[test]
fn invalid_candidate_fails_deserialization() {
    let res: Result<CandidateRef, _> = serde_json::from_value(json!("ftp:hda_local.h"));
    assert!(res.is_err());
}

#[test]
fn fallback_kinds_and_requirements() {
    let constant = FallbackSymbol::constant("HDA_FIXUP_ACT_INIT", "2");
    assert_eq!(constant.kind(), SymbolKind::Constant);
    assert!(constant.requires().is_empty());

    let function = FallbackSymbol::function(
        "snd_hda_codec_write_cache",
        vec!["codec".to_owned(), "nid".to_owned()],
        "snd_hda_codec_write(codec, nid, 0, 0, 0)",
        vec!["snd_hda_codec_write".to_owned()],
    );
    assert_eq!(function.kind(), SymbolKind::Function);
    assert_eq!(function.requires(), ["snd_hda_codec_write".to_owned()]);
}

#[test]
fn fallback_serializes_with_kind_tag() {
    let constant = FallbackSymbol::constant("HDA_FIXUP_ACT_INIT", "2");
    assert_eq!(
        serde_json::to_value(&constant).unwrap(),
        json!({ "name": "HDA_FIXUP_ACT_INIT", "kind": "constant", "value": "2", "guard": "if-undefined" })
    );
}
