#![warn(dead_code)]
#![warn(unused_variables)]
#![warn(unused_imports)]

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use types::{CodeEntry, Confidence, Corpus, DiagnosisOrigin, Notes, ScoredMatch, SearchKey, Vocabulary};
