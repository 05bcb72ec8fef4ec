use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use codelookup_core::config::CorpusSettings;
use codelookup_core::traits::CorpusProvider;
use codelookup_core::DiagnosisOrigin;
use codelookup_corpus::{CorpusOptions, CorpusService, DiagnosisSource};

const SAMPLE: &[u8] = include_bytes!("fixtures/tabular_sample.json");

fn options(use_fallback: bool) -> CorpusOptions {
    CorpusOptions { use_fallback, request_timeout: Duration::from_secs(5) }
}

#[tokio::test]
async fn loads_document_once() {
    let service = CorpusService::new(DiagnosisSource::memory(SAMPLE), options(true));
    assert!(!service.is_loaded());

    let first = service.corpus().await;
    assert_eq!(first.diagnosis_origin(), DiagnosisOrigin::Document);
    assert_eq!(first.diagnosis().len(), 7);
    assert_eq!(first.functioning().len(), 275);
    assert!(service.is_loaded());

    let second = service.corpus().await;
    assert!(std::ptr::eq(first, second));
    assert_eq!(service.fetch_attempts(), 1);
}

#[tokio::test]
async fn concurrent_first_callers_share_one_load() {
    let service = Arc::new(CorpusService::new(DiagnosisSource::memory(SAMPLE), options(true)));
    let tasks = (0..16).map(|_| {
        let service = service.clone();
        tokio::spawn(async move { service.corpus().await.len() })
    });
    let sizes: Vec<usize> = futures::future::join_all(tasks)
        .await
        .into_iter()
        .map(|r| r.expect("task"))
        .collect();
    assert!(sizes.iter().all(|&n| n == 275 + 7));
    assert_eq!(service.fetch_attempts(), 1);
}

#[tokio::test]
async fn malformed_document_degrades_to_fallback() {
    let service = CorpusService::new(DiagnosisSource::memory(&b"{ not json"[..]), options(true));
    assert!(service.diagnosis_entries().await.is_empty());
    let corpus = service.corpus().await;
    assert_eq!(corpus.diagnosis_origin(), DiagnosisOrigin::Fallback);
    assert_eq!(corpus.diagnosis().len(), 84);
    assert_eq!(service.fetch_attempts(), 1);
}

#[tokio::test]
async fn document_without_codes_degrades_to_fallback() {
    let service = CorpusService::new(DiagnosisSource::memory(&br#"{"ICD10CM":{}}"#[..]), options(true));
    assert_eq!(service.corpus().await.diagnosis_origin(), DiagnosisOrigin::Fallback);
}

#[tokio::test]
async fn missing_document_without_fallback_leaves_functioning_only() {
    let source = DiagnosisSource::File("/nonexistent/codelookup/tabular.json".into());
    let service = CorpusService::new(source, options(false));
    let corpus = service.corpus().await;
    assert_eq!(corpus.diagnosis_origin(), DiagnosisOrigin::Unavailable);
    assert!(corpus.diagnosis().is_empty());
    assert_eq!(corpus.len(), 275);
}

#[tokio::test]
async fn disabled_source_is_never_fetched() {
    let service = CorpusService::new(DiagnosisSource::Disabled, options(true));
    assert_eq!(service.corpus().await.diagnosis_origin(), DiagnosisOrigin::Fallback);
    assert_eq!(service.fetch_attempts(), 0);
}

#[tokio::test]
async fn default_settings_search_the_fallback_without_fetching() {
    let service = CorpusService::from_settings(&CorpusSettings::default(), std::path::Path::new("."));
    assert_eq!(service.source(), &DiagnosisSource::Disabled);
    assert_eq!(service.corpus().await.diagnosis_origin(), DiagnosisOrigin::Fallback);
    assert_eq!(service.fetch_attempts(), 0);
}

#[tokio::test]
async fn corpus_shares_the_loaded_diagnosis_list() {
    let service = CorpusService::new(DiagnosisSource::memory(SAMPLE), options(true));
    let corpus = service.corpus().await;
    let loaded = service.diagnosis_entries().await;
    assert!(std::ptr::eq(loaded, corpus.diagnosis()));
}

#[tokio::test]
async fn reads_document_from_file() -> anyhow::Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(SAMPLE)?;
    let service = CorpusService::new(DiagnosisSource::File(file.path().to_path_buf()), options(false));
    let diagnosis = service.diagnosis_entries().await;
    assert_eq!(diagnosis.first().map(|e| e.code.as_str()), Some("M54"));
    assert_eq!(service.corpus().await.diagnosis_origin(), DiagnosisOrigin::Document);
    Ok(())
}
