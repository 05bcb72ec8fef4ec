//! Depth-first flattening of the hierarchical diagnosis document.
//!
//! Layout: `ICD10CM.tabular.chapter[] -> section/sectionRef[] -> ... -> diag[]`,
//! where `diag` nodes may carry nested `diag` sub-codes. Any position may hold
//! one object or an array of objects.

use serde_json::Value;

use codelookup_core::{CodeEntry, Vocabulary};

use crate::notes::extract_notes;

/// Treat a node position uniformly whether it holds one object or an array.
fn nodes(value: Option<&Value>) -> &[Value] {
    match value {
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => &[],
        Some(single) => std::slice::from_ref(single),
    }
}

fn text_field<'a>(node: &'a Value, key: &str) -> Option<&'a str> {
    node.get(key).and_then(Value::as_str).map(str::trim).filter(|s| !s.is_empty())
}

/// Flatten a parsed tabular document into corpus entries, in document order.
///
/// Nodes without a usable code or description are skipped; their children
/// are still visited.
pub fn flatten_tabular(document: &Value) -> Vec<CodeEntry> {
    let mut entries = Vec::new();
    for chapter in nodes(document.pointer("/ICD10CM/tabular/chapter")) {
        let chapter_name = text_field(chapter, "desc");
        for section in nodes(chapter.get("section")).iter().chain(nodes(chapter.get("sectionRef"))) {
            walk_section(section, chapter_name, &mut entries);
        }
    }
    entries
}

fn walk_section(section: &Value, chapter: Option<&str>, out: &mut Vec<CodeEntry>) {
    for diag in nodes(section.get("diag")) {
        walk_diag(diag, chapter, out);
    }
    for child in nodes(section.get("sectionRef")).iter().chain(nodes(section.get("section"))) {
        walk_section(child, chapter, out);
    }
}

fn walk_diag(diag: &Value, chapter: Option<&str>, out: &mut Vec<CodeEntry>) {
    if let (Some(code), Some(description)) = (text_field(diag, "name"), text_field(diag, "desc")) {
        let mut entry = CodeEntry::new(code, description, Vocabulary::Diagnosis);
        entry.chapter = chapter.map(str::to_string);
        entry.notes = extract_notes(diag);
        out.push(entry);
    }
    for child in nodes(diag.get("diag")) {
        walk_diag(child, chapter, out);
    }
}
