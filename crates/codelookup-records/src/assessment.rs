use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use codelookup_core::{CodeEntry, ScoredMatch, Vocabulary};

/// A code picked from search results, identified by code and description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedCode {
    pub code: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Vocabulary>,
}

impl SelectedCode {
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self { code: code.into(), description: description.into(), source: None }
    }

    fn same_as(&self, other: &SelectedCode) -> bool {
        self.code == other.code && self.description == other.description
    }
}

impl From<&CodeEntry> for SelectedCode {
    fn from(entry: &CodeEntry) -> Self {
        Self { code: entry.code.clone(), description: entry.description.clone(), source: Some(entry.source) }
    }
}

impl From<&ScoredMatch> for SelectedCode {
    fn from(m: &ScoredMatch) -> Self {
        Self::from(&m.entry)
    }
}

/// Ordered selection without duplicates.
///
/// Codes repeat across vocabularies, so two selections are the same only when
/// both code and description match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectedCodes(Vec<SelectedCode>);

impl SelectedCodes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `code` if absent, remove it if present. Returns whether it is now selected.
    pub fn toggle(&mut self, code: SelectedCode) -> bool {
        match self.0.iter().position(|c| c.same_as(&code)) {
            Some(index) => {
                self.0.remove(index);
                false
            }
            None => {
                self.0.push(code);
                true
            }
        }
    }

    pub fn remove_at(&mut self, index: usize) -> Option<SelectedCode> {
        (index < self.0.len()).then(|| self.0.remove(index))
    }

    pub fn contains(&self, code: &str, description: &str) -> bool {
        self.0.iter().any(|c| c.code == code && c.description == description)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectedCode> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Clinical intake recorded against a patient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Assessment {
    pub chief_complaint: String,
    pub presenting_complaint: String,
    pub general_history: String,
    pub medical_history: String,
    pub blood_pressure: String,
    pub heart_rate: String,
    pub temperature: String,
    /// Older records store the selection under `diagnoses`.
    #[serde(alias = "diagnoses")]
    pub selected_codes: SelectedCodes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessed_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}
