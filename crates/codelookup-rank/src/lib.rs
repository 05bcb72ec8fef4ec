//! codelookup-rank
//!
//! Heuristic relevance ranking of code entries against free-text queries.

pub mod engine;
pub mod scoring;
pub mod weights;

pub use engine::{rank, CodeSearchEngine, SearchOptions};
pub use scoring::{score, score_folded, score_terms, QueryTerms};
pub use weights::{ScoringWeights, DEFAULT_WEIGHTS};
