//! codelookup-corpus
//!
//! Builds the in-memory code corpus: the embedded functioning table plus the
//! diagnosis document, flattened into uniform [`CodeEntry`] records and held
//! for the process lifetime by [`CorpusService`].
//!
//! [`CodeEntry`]: codelookup_core::CodeEntry

pub mod embedded;
pub mod flatten;
pub mod notes;
pub mod service;
pub mod source;

pub use embedded::{fallback_diagnosis_entries, functioning_entries};
pub use flatten::flatten_tabular;
pub use service::{CorpusOptions, CorpusService};
pub use source::DiagnosisSource;
