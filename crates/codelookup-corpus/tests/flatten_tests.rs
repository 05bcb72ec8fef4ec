use std::path::PathBuf;

use codelookup_core::Vocabulary;
use codelookup_corpus::flatten_tabular;

const MUSCULOSKELETAL: &str = "Diseases of the musculoskeletal system and connective tissue (M00-M99)";
const NERVOUS: &str = "Diseases of the nervous system (G00-G99)";

fn fixture() -> serde_json::Value {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/tabular_sample.json");
    let raw = std::fs::read_to_string(&path).expect("fixture");
    serde_json::from_str(&raw).expect("fixture json")
}

#[test]
fn flattens_in_document_order() {
    let entries = flatten_tabular(&fixture());
    let codes: Vec<_> = entries.iter().map(|e| e.code.as_str()).collect();
    assert_eq!(codes, ["M54", "M54.5", "M54.50", "M54.6", "M25.5", "G35", "G89"]);
    assert!(entries.iter().all(|e| e.source == Vocabulary::Diagnosis));
}

#[test]
fn skips_nodes_without_code_or_description() {
    let entries = flatten_tabular(&fixture());
    assert!(entries.iter().all(|e| e.code != "M25.6"));
    assert!(entries.iter().all(|e| !e.description.starts_with("Stiffness")));
    assert!(entries.iter().all(|e| !e.description.starts_with("Numeric")));
}

#[test]
fn chapter_label_is_inherited_at_every_depth() {
    let entries = flatten_tabular(&fixture());
    for entry in &entries {
        let expected = if entry.code.starts_with('G') { NERVOUS } else { MUSCULOSKELETAL };
        assert_eq!(entry.chapter.as_deref(), Some(expected), "{}", entry.code);
    }
}

#[test]
fn note_shapes_normalize_to_text() {
    let entries = flatten_tabular(&fixture());
    let find = |code: &str| entries.iter().find(|e| e.code == code).expect(code);

    let low_back = find("M54.5");
    assert_eq!(low_back.notes.get("includes"), Some("Loin pain, Lumbago NOS"));
    assert_eq!(
        low_back.notes.get("excludes1"),
        Some("low back strain (S39.012), lumbago due to intervertebral disc displacement (M51.2-)")
    );

    let joint = find("M25.5");
    assert_eq!(joint.notes.get("codeAlso"), Some("any associated swelling"));
    assert_eq!(joint.notes.get("useAdditionalCode"), Some("external cause code to identify the cause"));

    assert_eq!(find("M54").notes.get("excludes1"), Some("psychogenic dorsalgia (F45.41)"));
    assert!(find("M54.50").notes.is_empty());
}

#[test]
fn notes_follow_kind_order_and_drop_blank_bodies() {
    let entries = flatten_tabular(&fixture());
    let pain = entries.iter().find(|e| e.code == "G89").expect("G89");
    let notes: Vec<_> = pain.notes.iter().collect();
    assert_eq!(
        notes,
        [
            ("excludes2", "generalized pain NOS (R52)"),
            ("codeAlso", "related psychological factors associated with pain (F45.42)"),
        ]
    );
    assert_eq!(
        pain.search_text(),
        format!(
            "Pain, not elsewhere classified {} generalized pain NOS (R52) related psychological factors associated with pain (F45.42)",
            NERVOUS
        )
    );
}
