//! Domain types shared by the corpus loader, the ranking engine and callers.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// Coding vocabulary an entry originates from.
///
/// Codes are only unique within one vocabulary; the tag is never used to
/// join entries across vocabularies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Vocabulary {
    /// Functioning, disability and health classification.
    #[serde(rename = "ICF")]
    Functioning,
    /// Diagnosis classification loaded from the tabular document.
    #[serde(rename = "ICD-10-CM")]
    Diagnosis,
}

impl Vocabulary {
    pub fn tag(self) -> &'static str {
        match self {
            Self::Functioning => "ICF",
            Self::Diagnosis => "ICD-10-CM",
        }
    }
}

impl fmt::Display for Vocabulary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Note kind → text, in the order the notes were recorded.
///
/// Blank texts are rejected on insert so they never reach the search text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notes(Vec<(String, String)>);

impl Notes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a note. Returns false when `text` is blank.
    pub fn insert(&mut self, kind: impl Into<String>, text: impl Into<String>) -> bool {
        let text = text.into();
        if text.trim().is_empty() {
            return false;
        }
        let kind = kind.into();
        match self.0.iter_mut().find(|(k, _)| *k == kind) {
            Some(slot) => slot.1 = text,
            None => self.0.push((kind, text)),
        }
        true
    }

    pub fn get(&self, kind: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| k == kind).map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Notes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (kind, text) in &self.0 {
            map.serialize_entry(kind, text)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Notes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct NotesVisitor;

        impl<'de> Visitor<'de> for NotesVisitor {
            type Value = Notes;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of note kind to text")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Notes, A::Error> {
                let mut notes = Notes::new();
                while let Some((kind, text)) = access.next_entry::<String, String>()? {
                    notes.insert(kind, text);
                }
                Ok(notes)
            }
        }

        deserializer.deserialize_map(NotesVisitor)
    }
}

/// A single addressable clinical concept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeEntry {
    pub code: String,
    pub description: String,
    pub source: Vocabulary,
    /// Broad category label; functioning entries only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    /// Chapter label inherited from the hierarchy; diagnosis entries only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter: Option<String>,
    #[serde(default, skip_serializing_if = "Notes::is_empty")]
    pub notes: Notes,
    /// Illustrative exercises carried by curated fallback entries. Never ranked.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exercises: Vec<String>,
}

impl CodeEntry {
    pub fn new(code: impl Into<String>, description: impl Into<String>, source: Vocabulary) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            source,
            component: None,
            chapter: None,
            notes: Notes::new(),
            exercises: Vec::new(),
        }
    }

    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    pub fn with_chapter(mut self, chapter: impl Into<String>) -> Self {
        self.chapter = Some(chapter.into());
        self
    }

    pub fn with_note(mut self, kind: impl Into<String>, text: impl Into<String>) -> Self {
        self.notes.insert(kind, text);
        self
    }

    /// Category label regardless of vocabulary (component or chapter).
    pub fn category(&self) -> Option<&str> {
        self.component.as_deref().or(self.chapter.as_deref())
    }

    /// Text matched against queries: description, category and note values,
    /// separated by single spaces. Blank parts are skipped.
    pub fn search_text(&self) -> String {
        let mut text = self.description.clone();
        for part in self.category().into_iter().chain(self.notes.values()) {
            if part.trim().is_empty() {
                continue;
            }
            text.push(' ');
            text.push_str(part);
        }
        text
    }

    /// Both fields are required for an entry to enter the corpus.
    pub fn is_valid(&self) -> bool {
        !self.code.trim().is_empty() && !self.description.trim().is_empty()
    }
}

/// Display classification of a relevance score. Has no effect on ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn from_score(score: f64) -> Self {
        if score > 0.7 {
            Self::High
        } else if score > 0.4 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        })
    }
}

/// One ranked search result.
///
/// `score` is in `[0, 1]`; `match_snippet` is the description, verbatim,
/// for highlighting by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredMatch {
    #[serde(flatten)]
    pub entry: CodeEntry,
    pub score: f64,
    pub match_snippet: String,
}

impl ScoredMatch {
    pub fn new(entry: CodeEntry, score: f64) -> Self {
        let match_snippet = entry.description.clone();
        Self { entry, score, match_snippet }
    }

    pub fn confidence(&self) -> Confidence {
        Confidence::from_score(self.score)
    }
}

/// Where the diagnosis half of a corpus came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosisOrigin {
    /// Flattened from the configured hierarchical document.
    Document,
    /// The document yielded nothing; the embedded curated list stands in.
    Fallback,
    /// The document yielded nothing and no fallback was allowed.
    Unavailable,
}

/// Lowercased search text and code of one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchKey {
    pub text: String,
    pub code: String,
}

impl SearchKey {
    pub fn of(entry: &CodeEntry) -> Self {
        Self {
            text: entry.search_text().to_lowercase(),
            code: entry.code.to_lowercase(),
        }
    }
}

/// The full, immutable set of searchable entries.
///
/// Search keys are folded once here, when the corpus is built, and reused by
/// every query. The diagnosis half is shared, so a loader can keep its own
/// handle on the list without a second copy.
#[derive(Debug, Clone)]
pub struct Corpus {
    functioning: Vec<CodeEntry>,
    diagnosis: Arc<[CodeEntry]>,
    keys: Vec<SearchKey>,
    origin: DiagnosisOrigin,
}

impl Corpus {
    pub fn new(functioning: Vec<CodeEntry>, diagnosis: impl Into<Arc<[CodeEntry]>>, origin: DiagnosisOrigin) -> Self {
        let diagnosis = diagnosis.into();
        let keys = functioning.iter().chain(diagnosis.iter()).map(SearchKey::of).collect();
        Self { functioning, diagnosis, keys, origin }
    }

    /// Corpus built from arbitrary entries, split by their vocabulary tag.
    pub fn from_entries(entries: impl IntoIterator<Item = CodeEntry>) -> Self {
        let (functioning, diagnosis): (Vec<_>, Vec<_>) =
            entries.into_iter().partition(|e| e.source == Vocabulary::Functioning);
        Self::new(functioning, diagnosis, DiagnosisOrigin::Document)
    }

    pub fn functioning(&self) -> &[CodeEntry] {
        &self.functioning
    }

    pub fn diagnosis(&self) -> &[CodeEntry] {
        &self.diagnosis
    }

    pub fn shared_diagnosis(&self) -> &Arc<[CodeEntry]> {
        &self.diagnosis
    }

    pub fn diagnosis_origin(&self) -> DiagnosisOrigin {
        self.origin
    }

    /// Functioning entries first, then diagnosis entries.
    pub fn iter(&self) -> impl Iterator<Item = &CodeEntry> {
        self.functioning.iter().chain(self.diagnosis.iter())
    }

    /// Same order as [`Corpus::iter`], each entry with its search key.
    pub fn iter_keyed(&self) -> impl Iterator<Item = (&CodeEntry, &SearchKey)> {
        self.iter().zip(&self.keys)
    }

    pub fn len(&self) -> usize {
        self.functioning.len() + self.diagnosis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
