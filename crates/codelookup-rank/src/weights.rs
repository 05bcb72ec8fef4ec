/// Every constant the relevance heuristic uses.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringWeights {
    pub exact_code: f64,
    pub code_prefix: f64,
    pub exact_text: f64,
    /// Query appears verbatim in the text.
    pub phrase: f64,
    /// Scaled by how early the phrase occurs.
    pub phrase_position: f64,
    pub text_prefix: f64,
    pub word: f64,
    pub word_position: f64,
    pub matched_fraction: f64,
    pub all_words: f64,
    pub in_order: f64,
    pub near_distance: usize,
    pub near_bonus: f64,
    pub far_distance: usize,
    pub far_bonus: f64,
    pub length_ratio_floor: f64,
    pub length_ratio: f64,
    /// Query tokens this short or shorter are ignored.
    pub max_ignored_word_len: usize,
}

pub const DEFAULT_WEIGHTS: ScoringWeights = ScoringWeights {
    exact_code: 0.98,
    code_prefix: 0.95,
    exact_text: 0.92,
    phrase: 0.50,
    phrase_position: 0.15,
    text_prefix: 0.25,
    word: 0.10,
    word_position: 0.02,
    matched_fraction: 0.25,
    all_words: 0.15,
    in_order: 0.12,
    near_distance: 20,
    near_bonus: 0.08,
    far_distance: 50,
    far_bonus: 0.04,
    length_ratio_floor: 0.5,
    length_ratio: 0.05,
    max_ignored_word_len: 1,
};

impl Default for ScoringWeights {
    fn default() -> Self {
        DEFAULT_WEIGHTS
    }
}
