//! Normalization of note bodies found on diagnosis nodes.
//!
//! The tabular document is a mechanical conversion from XML, so one note
//! field shows up as a bare string, as `{ "note": ... }`, as
//! `{ "#text": ... }`, or as an array mixing any of those. Everything is
//! reduced to [`NoteBody`] here so nothing downstream inspects JSON shapes.

use serde_json::Value;

use codelookup_core::Notes;

/// Note kinds extracted from a diagnosis node, in extraction order.
pub const NOTE_KINDS: [&str; 5] = ["includes", "excludes1", "excludes2", "codeAlso", "useAdditionalCode"];

const LIST_SEPARATOR: &str = ", ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteBody {
    Text(String),
    List(Vec<String>),
}

impl NoteBody {
    /// Read a note field. `None` when the field holds no usable text.
    pub fn from_value(value: &Value) -> Option<Self> {
        let mut texts = Vec::new();
        collect_texts(value, &mut texts);
        match texts.len() {
            0 => None,
            1 => texts.pop().map(Self::Text),
            _ => Some(Self::List(texts)),
        }
    }

    pub fn into_list(self) -> Vec<String> {
        match self {
            Self::Text(text) => vec![text],
            Self::List(texts) => texts,
        }
    }

    pub fn joined(self) -> String {
        self.into_list().join(LIST_SEPARATOR)
    }
}

fn collect_texts(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(text) => {
            let text = text.trim();
            if !text.is_empty() {
                out.push(text.to_string());
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_texts(item, out);
            }
        }
        Value::Object(map) => {
            if let Some(inner) = map.get("note") {
                collect_texts(inner, out);
            } else if let Some(inner) = map.get("#text") {
                collect_texts(inner, out);
            }
        }
        _ => {}
    }
}

/// Extract every known note kind from a diagnosis node.
pub fn extract_notes(node: &Value) -> Notes {
    let mut notes = Notes::new();
    for kind in NOTE_KINDS {
        if let Some(body) = node.get(kind).and_then(NoteBody::from_value) {
            notes.insert(kind, body.joined());
        }
    }
    notes
}
