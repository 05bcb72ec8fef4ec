use std::future::Future;
use std::sync::Arc;

use crate::types::{Corpus, ScoredMatch};

/// Anything that can hand out the loaded corpus.
///
/// Implementations load at most once; every call after the first returns the
/// same corpus without touching the underlying source again.
pub trait CorpusProvider: Send + Sync {
    fn corpus(&self) -> impl Future<Output = &Corpus> + Send;
}

/// A corpus that is already in memory provides itself.
impl CorpusProvider for Corpus {
    async fn corpus(&self) -> &Corpus {
        self
    }
}

impl<P: CorpusProvider> CorpusProvider for Arc<P> {
    async fn corpus(&self) -> &Corpus {
        self.as_ref().corpus().await
    }
}

pub trait CodeSearch: Send + Sync {
    /// Ranked matches for a free-text query. Never fails; no match is `[]`.
    fn search(&self, query: &str) -> impl Future<Output = Vec<ScoredMatch>> + Send;
}
