use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde_json::Value;
use tokio::sync::OnceCell;

use codelookup_core::config::CorpusSettings;
use codelookup_core::error::{Error, Result};
use codelookup_core::traits::CorpusProvider;
use codelookup_core::{CodeEntry, Corpus, DiagnosisOrigin};

use crate::embedded::{fallback_diagnosis_entries, functioning_entries};
use crate::flatten::flatten_tabular;
use crate::source::{build_http_client, DiagnosisSource};

#[derive(Debug, Clone)]
pub struct CorpusOptions {
    /// Substitute the embedded diagnosis list when the document yields nothing.
    pub use_fallback: bool,
    pub request_timeout: Duration,
}

impl Default for CorpusOptions {
    fn default() -> Self {
        CorpusOptions::from(&CorpusSettings::default())
    }
}

impl From<&CorpusSettings> for CorpusOptions {
    fn from(settings: &CorpusSettings) -> Self {
        Self {
            use_fallback: settings.use_fallback,
            request_timeout: Duration::from_secs(settings.request_timeout_secs),
        }
    }
}

/// Process-wide owner of the code corpus.
///
/// Both halves are loaded lazily on first use, at most once, behind a
/// single-initialization guard; concurrent first callers await the same load.
/// A diagnosis document that cannot be fetched or parsed is logged and
/// treated as empty.
pub struct CorpusService {
    source: DiagnosisSource,
    options: CorpusOptions,
    client: reqwest::Client,
    diagnosis: OnceCell<Arc<[CodeEntry]>>,
    corpus: OnceCell<Corpus>,
    fetch_attempts: AtomicUsize,
}

impl CorpusService {
    pub fn new(source: DiagnosisSource, options: CorpusOptions) -> Self {
        let client = build_http_client(options.request_timeout);
        Self {
            source,
            options,
            client,
            diagnosis: OnceCell::new(),
            corpus: OnceCell::new(),
            fetch_attempts: AtomicUsize::new(0),
        }
    }

    pub fn from_settings(settings: &CorpusSettings, base_dir: &Path) -> Self {
        Self::new(DiagnosisSource::parse(&settings.diagnosis_source, base_dir), settings.into())
    }

    pub fn source(&self) -> &DiagnosisSource {
        &self.source
    }

    /// The curated functioning table; static, never fails.
    pub fn functioning_entries(&self) -> &'static [CodeEntry] {
        functioning_entries()
    }

    /// Entries flattened from the diagnosis document, loaded once. Empty when
    /// the document is disabled, unreachable or malformed.
    pub async fn diagnosis_entries(&self) -> &[CodeEntry] {
        self.loaded_diagnosis().await
    }

    async fn loaded_diagnosis(&self) -> &Arc<[CodeEntry]> {
        self.diagnosis.get_or_init(|| self.load_diagnosis()).await
    }

    pub fn is_loaded(&self) -> bool {
        self.corpus.initialized()
    }

    /// How many times the diagnosis document has been requested from its source.
    pub fn fetch_attempts(&self) -> usize {
        self.fetch_attempts.load(Ordering::SeqCst)
    }

    async fn load_diagnosis(&self) -> Arc<[CodeEntry]> {
        if self.source == DiagnosisSource::Disabled {
            tracing::info!("No diagnosis document configured");
            return Arc::from([]);
        }
        self.fetch_attempts.fetch_add(1, Ordering::SeqCst);
        match self.fetch_and_flatten().await {
            Ok(entries) => {
                tracing::info!("Loaded {} diagnosis codes from {}", entries.len(), self.source);
                entries.into()
            }
            Err(e) => {
                tracing::error!("Error loading diagnosis document from {}: {}", self.source, e);
                Arc::from([])
            }
        }
    }

    async fn fetch_and_flatten(&self) -> Result<Vec<CodeEntry>> {
        let bytes = self.source.fetch(&self.client).await?;
        // Full documents run to tens of megabytes; keep parsing off the async workers.
        tokio::task::spawn_blocking(move || -> Result<Vec<CodeEntry>> {
            let document: Value = serde_json::from_slice(&bytes)?;
            Ok(flatten_tabular(&document))
        })
        .await
        .map_err(|e| Error::Operation(format!("diagnosis flattening task failed: {}", e)))?
    }

    async fn assemble(&self) -> Corpus {
        let functioning = self.functioning_entries().to_vec();
        let loaded = self.loaded_diagnosis().await;
        let (diagnosis, origin) = if !loaded.is_empty() {
            (Arc::clone(loaded), DiagnosisOrigin::Document)
        } else if self.options.use_fallback {
            let fallback = fallback_diagnosis_entries();
            if self.source == DiagnosisSource::Disabled {
                tracing::info!("Using fallback diagnosis list ({} entries)", fallback.len());
            } else {
                tracing::warn!("Using fallback diagnosis list ({} entries)", fallback.len());
            }
            (Arc::from(fallback), DiagnosisOrigin::Fallback)
        } else {
            tracing::warn!("Diagnosis vocabulary unavailable; searching functioning entries only");
            (Arc::from([]), DiagnosisOrigin::Unavailable)
        };
        tracing::info!(
            "Corpus ready: {} functioning + {} diagnosis entries ({:?})",
            functioning.len(),
            diagnosis.len(),
            origin
        );
        Corpus::new(functioning, diagnosis, origin)
    }
}

impl CorpusProvider for CorpusService {
    async fn corpus(&self) -> &Corpus {
        self.corpus.get_or_init(|| self.assemble()).await
    }
}
