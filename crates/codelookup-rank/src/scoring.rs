//! Multi-signal relevance heuristic.
//!
//! Text, query and code are case-folded before comparison. Positions and
//! lengths count characters of the folded strings, not bytes.

use crate::weights::{ScoringWeights, DEFAULT_WEIGHTS};

/// A query folded and tokenized once, then scored against many entries.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryTerms {
    folded: String,
    len: usize,
    words: Vec<String>,
}

impl QueryTerms {
    pub fn new(query: &str) -> Self {
        Self::tokenize(query, &DEFAULT_WEIGHTS)
    }

    pub fn tokenize(query: &str, weights: &ScoringWeights) -> Self {
        let folded = query.to_lowercase();
        let words = folded
            .split_whitespace()
            .filter(|w| w.chars().count() > weights.max_ignored_word_len)
            .map(str::to_string)
            .collect();
        let len = folded.chars().count();
        Self { folded, len, words }
    }

    pub fn as_str(&self) -> &str {
        &self.folded
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn is_empty(&self) -> bool {
        self.folded.is_empty()
    }
}

/// Character index of the first `needle` starting at character `from` or later.
fn find_from(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let start = if from == 0 { 0 } else { haystack.char_indices().nth(from)?.0 };
    let byte = start + haystack[start..].find(needle)?;
    Some(haystack[..byte].chars().count())
}

fn words_in_order(text: &str, words: &[String]) -> bool {
    let mut next = 0;
    for word in words {
        match find_from(text, word, next) {
            Some(pos) => next = pos + 1,
            None => return false,
        }
    }
    true
}

/// Score `text` (an entry's search text) and `code` against a raw query.
pub fn score(text: &str, query: &str, code: &str) -> f64 {
    score_terms(&DEFAULT_WEIGHTS, text, &QueryTerms::new(query), code)
}

/// Relevance in `[0, 1]`. An empty query scores zero.
pub fn score_terms(weights: &ScoringWeights, text: &str, query: &QueryTerms, code: &str) -> f64 {
    score_folded(weights, &text.to_lowercase(), query, &code.to_lowercase())
}

/// [`score_terms`] over text and code that are already lowercased, such as
/// the cached [`SearchKey`] of a corpus entry.
///
/// [`SearchKey`]: codelookup_core::SearchKey
pub fn score_folded(weights: &ScoringWeights, text: &str, query: &QueryTerms, code: &str) -> f64 {
    if query.is_empty() {
        return 0.0;
    }
    let q = query.as_str();
    if code == q {
        return weights.exact_code;
    }
    if code.starts_with(q) {
        return weights.code_prefix;
    }
    if text == q {
        return weights.exact_text;
    }

    let text_len = text.chars().count();
    let earliness = |pos: usize| (1.0 - pos as f64 / text_len as f64).max(0.0);
    let mut score = 0.0;

    if let Some(pos) = find_from(text, q, 0) {
        score += weights.phrase + earliness(pos) * weights.phrase_position;
    }
    if text.starts_with(q) {
        score += weights.text_prefix;
    }

    let first_seen: Vec<Option<usize>> = query.words.iter().map(|w| find_from(text, w, 0)).collect();
    let matched = first_seen.iter().flatten().count();
    score += first_seen
        .iter()
        .flatten()
        .map(|&pos| weights.word + earliness(pos) * weights.word_position)
        .sum::<f64>();

    if !query.words.is_empty() {
        let fraction = matched as f64 / query.words.len() as f64;
        score += fraction * weights.matched_fraction;
        if matched == query.words.len() {
            score += weights.all_words;
        }
        if words_in_order(text, &query.words) {
            score += weights.in_order;
        }
    }

    if matched > 1 {
        // Only adjacent query words that were both found are compared.
        let closest = first_seen
            .windows(2)
            .filter_map(|pair| match pair {
                [Some(a), Some(b)] => Some(a.abs_diff(*b)),
                _ => None,
            })
            .min();
        match closest {
            Some(d) if d < weights.near_distance => score += weights.near_bonus,
            Some(d) if d < weights.far_distance => score += weights.far_bonus,
            _ => {}
        }
    }

    let longer = query.len.max(text_len);
    if longer > 0 {
        let ratio = query.len.min(text_len) as f64 / longer as f64;
        if ratio > weights.length_ratio_floor {
            score += ratio * weights.length_ratio;
        }
    }

    score.min(1.0)
}
