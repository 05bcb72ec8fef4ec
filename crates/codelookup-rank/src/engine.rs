use codelookup_core::config::{SearchSettings, DEFAULT_THRESHOLD, MAX_RESULT_LIMIT};
use codelookup_core::traits::{CodeSearch, CorpusProvider};
use codelookup_core::{Corpus, ScoredMatch};

use crate::scoring::{score_folded, QueryTerms};
use crate::weights::ScoringWeights;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    /// Matches must score strictly above this.
    pub threshold: f64,
    /// Result cap; never above [`MAX_RESULT_LIMIT`].
    pub limit: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { threshold: DEFAULT_THRESHOLD, limit: MAX_RESULT_LIMIT }
    }
}

impl From<&SearchSettings> for SearchOptions {
    fn from(settings: &SearchSettings) -> Self {
        Self { threshold: settings.threshold, limit: settings.limit.min(MAX_RESULT_LIMIT) }
    }
}

impl SearchOptions {
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.min(MAX_RESULT_LIMIT);
        self
    }
}

/// Score every entry of `corpus`, keep those above the threshold and return
/// the best `limit`.
///
/// Results are sorted by score, highest first. The sort is stable, so equal
/// scores keep corpus order (functioning entries before diagnosis entries).
pub fn rank(corpus: &Corpus, query: &str, weights: &ScoringWeights, options: &SearchOptions) -> Vec<ScoredMatch> {
    let terms = QueryTerms::tokenize(query, weights);
    let mut matches: Vec<ScoredMatch> = corpus
        .iter_keyed()
        .filter_map(|(entry, key)| {
            let score = score_folded(weights, &key.text, &terms, &key.code);
            (score > options.threshold).then(|| ScoredMatch::new(entry.clone(), score))
        })
        .collect();
    matches.sort_by(|a, b| b.score.total_cmp(&a.score));
    matches.truncate(options.limit.min(MAX_RESULT_LIMIT));
    matches
}

/// Ranked free-text lookup over a lazily loaded corpus.
pub struct CodeSearchEngine<P> {
    provider: P,
    options: SearchOptions,
    weights: ScoringWeights,
}

impl<P: CorpusProvider> CodeSearchEngine<P> {
    pub fn new(provider: P) -> Self {
        Self::with_options(provider, SearchOptions::default())
    }

    pub fn with_options(provider: P, options: SearchOptions) -> Self {
        Self { provider, options, weights: ScoringWeights::default() }
    }

    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub async fn search(&self, query: &str) -> Vec<ScoredMatch> {
        self.search_with_limit(query, self.options.limit).await
    }

    /// Like [`search`](Self::search) with a per-call cap, still bounded by
    /// [`MAX_RESULT_LIMIT`]. Blank queries return nothing and never load the corpus.
    pub async fn search_with_limit(&self, query: &str, limit: usize) -> Vec<ScoredMatch> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        let corpus = self.provider.corpus().await;
        let options = self.options.clone().with_limit(limit);
        let matches = rank(corpus, query, &self.weights, &options);
        tracing::debug!("Query '{}' -> {} matches", query, matches.len());
        matches
    }
}

impl<P: CorpusProvider> CodeSearch for CodeSearchEngine<P> {
    async fn search(&self, query: &str) -> Vec<ScoredMatch> {
        Self::search(self, query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::score_terms;
    use codelookup_core::{CodeEntry, Vocabulary};

    fn corpus() -> Corpus {
        Corpus::from_entries([
            CodeEntry::new("M54.5", "Low back pain", Vocabulary::Diagnosis),
            CodeEntry::new("b280", "Sensation of pain", Vocabulary::Functioning),
            CodeEntry::new("R52", "Pain, unspecified", Vocabulary::Diagnosis),
            CodeEntry::new("d450", "Walking", Vocabulary::Functioning),
        ])
    }

    #[test]
    fn rank_filters_sorts_and_truncates() {
        let corpus = corpus();
        let options = SearchOptions::default();
        let all = rank(&corpus, "pain", &ScoringWeights::default(), &options);
        let codes: Vec<_> = all.iter().map(|m| m.entry.code.as_str()).collect();
        assert_eq!(codes.len(), 3);
        assert!(all.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(!codes.contains(&"d450"));

        let top = rank(&corpus, "pain", &ScoringWeights::default(), &options.with_limit(1));
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].entry.code, all[0].entry.code);
    }

    #[test]
    fn ties_keep_functioning_entries_first() {
        let corpus = Corpus::from_entries([
            CodeEntry::new("X1", "Gait pattern", Vocabulary::Diagnosis),
            CodeEntry::new("b770", "Gait pattern", Vocabulary::Functioning),
        ]);
        let matches = rank(&corpus, "gait", &ScoringWeights::default(), &SearchOptions::default());
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].score, matches[1].score);
        assert_eq!(matches[0].entry.code, "b770");
    }

    #[test]
    fn limit_never_exceeds_cap() {
        let options = SearchOptions { threshold: 0.12, limit: 500 };
        assert_eq!(options.with_limit(500).limit, MAX_RESULT_LIMIT);
        let settings = SearchSettings { threshold: 0.2, limit: 10 };
        assert_eq!(SearchOptions::from(&settings), SearchOptions { threshold: 0.2, limit: 10 });
    }

    #[test]
    fn note_citing_a_code_can_outrank_the_exact_code() {
        let corpus = Corpus::from_entries([
            CodeEntry::new("M54.5", "Low back pain", Vocabulary::Diagnosis),
            CodeEntry::new("M53.3", "Sacrococcygeal disorders", Vocabulary::Diagnosis)
                .with_note("excludes", "Low back pain (M54.5)"),
        ]);
        let matches = rank(&corpus, "m54.5", &ScoringWeights::default(), &SearchOptions::default());
        let ranked: Vec<_> = matches.iter().map(|m| (m.entry.code.as_str(), m.score)).collect();
        assert_eq!(ranked, [("M53.3", 1.0), ("M54.5", 0.98)]);
    }

    #[test]
    fn exact_code_leads_when_nothing_scores_higher() {
        let matches = rank(&corpus(), "m54.5", &ScoringWeights::default(), &SearchOptions::default());
        assert_eq!(matches[0].entry.code, "M54.5");
        assert_eq!(matches[0].score, 0.98);
        assert!(matches.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn score_equal_to_threshold_is_dropped() {
        let corpus = corpus();
        let weights = ScoringWeights::default();
        let entry = corpus.iter().find(|e| e.code == "b280").expect("b280");
        let at = score_terms(&weights, &entry.search_text(), &QueryTerms::new("pain"), &entry.code);
        assert!(at > 0.0);

        let options = SearchOptions { threshold: at, ..SearchOptions::default() };
        let matches = rank(&corpus, "pain", &weights, &options);
        assert!(matches.iter().all(|m| m.entry.code != "b280" && m.score > at));

        let below = SearchOptions { threshold: at - 1e-9, ..SearchOptions::default() };
        assert!(rank(&corpus, "pain", &weights, &below).iter().any(|m| m.entry.code == "b280"));
    }

    #[tokio::test]
    async fn blank_query_returns_nothing() {
        let engine = CodeSearchEngine::new(corpus());
        assert!(engine.search("").await.is_empty());
        assert!(engine.search(" \t ").await.is_empty());
    }

    #[tokio::test]
    async fn query_is_trimmed() {
        let engine = CodeSearchEngine::new(corpus());
        let matches = engine.search("  M54.5  ").await;
        assert_eq!(matches[0].entry.code, "M54.5");
        assert_eq!(matches[0].score, 0.98);
    }
}
