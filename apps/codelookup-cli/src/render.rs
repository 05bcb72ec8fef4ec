use serde::Serialize;

use codelookup_core::{Confidence, Corpus, ScoredMatch};

#[derive(Serialize)]
struct JsonMatch<'a> {
    #[serde(flatten)]
    inner: &'a ScoredMatch,
    confidence: Confidence,
}

pub fn matches_json(matches: &[ScoredMatch]) -> serde_json::Result<String> {
    let rows: Vec<JsonMatch<'_>> = matches.iter().map(|m| JsonMatch { inner: m, confidence: m.confidence() }).collect();
    serde_json::to_string_pretty(&rows)
}

/// Numbered listing, one result per block.
pub fn matches_table(query: &str, matches: &[ScoredMatch]) -> String {
    if matches.is_empty() {
        return format!("No results found for: \"{}\"\n", query);
    }
    let mut lines = vec![format!("Found {} results for: \"{}\"", matches.len(), query)];
    for (i, m) in matches.iter().enumerate() {
        let entry = &m.entry;
        lines.push(format!(
            "{:>3}. [{}] {:<10} {}  ({:.3}, {})",
            i + 1,
            entry.source,
            entry.code,
            m.match_snippet,
            m.score,
            m.confidence()
        ));
        if let Some(category) = entry.category() {
            lines.push(format!("     {}", category));
        }
        if !entry.exercises.is_empty() {
            lines.push(format!("     exercises: {}", entry.exercises.join(", ")));
        }
    }
    lines.push(String::new());
    lines.join("\n")
}

pub fn corpus_stats(corpus: &Corpus) -> String {
    format!(
        "Functioning (ICF): {}\nDiagnosis (ICD-10-CM): {} [{:?}]\nTotal: {}\n",
        corpus.functioning().len(),
        corpus.diagnosis().len(),
        corpus.diagnosis_origin(),
        corpus.len()
    )
}
