//! Reference tables shipped inside the binary.

use std::sync::OnceLock;

use codelookup_core::CodeEntry;

const FUNCTIONING_JSON: &str = include_str!("../data/functioning.json");
const DIAGNOSIS_FALLBACK_JSON: &str = include_str!("../data/diagnosis_fallback.json");

static FUNCTIONING: OnceLock<Vec<CodeEntry>> = OnceLock::new();
static DIAGNOSIS_FALLBACK: OnceLock<Vec<CodeEntry>> = OnceLock::new();

fn parse_table(name: &str, json: &str) -> Vec<CodeEntry> {
    match serde_json::from_str::<Vec<CodeEntry>>(json) {
        Ok(entries) => entries.into_iter().filter(CodeEntry::is_valid).collect(),
        Err(e) => {
            tracing::error!("Embedded {} table is malformed: {}", name, e);
            Vec::new()
        }
    }
}

/// The curated functioning-classification table. Always available.
pub fn functioning_entries() -> &'static [CodeEntry] {
    FUNCTIONING.get_or_init(|| parse_table("functioning", FUNCTIONING_JSON))
}

/// Curated diagnosis entries used when the tabular document yields nothing.
/// Each carries a short list of illustrative exercises.
pub fn fallback_diagnosis_entries() -> &'static [CodeEntry] {
    DIAGNOSIS_FALLBACK.get_or_init(|| parse_table("diagnosis fallback", DIAGNOSIS_FALLBACK_JSON))
}
