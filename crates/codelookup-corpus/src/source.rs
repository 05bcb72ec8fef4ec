use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use codelookup_core::config::resolve_with_base;
use codelookup_core::error::{Error, Result};

/// Where the hierarchical diagnosis document is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosisSource {
    File(PathBuf),
    Http(String),
    /// Document bytes already in memory.
    Memory(Arc<[u8]>),
    Disabled,
}

impl DiagnosisSource {
    /// Interpret a configured source string. URLs become [`DiagnosisSource::Http`],
    /// an empty string disables the document, anything else is a path resolved
    /// against `base`.
    pub fn parse(value: &str, base: &Path) -> Self {
        let value = value.trim();
        if value.is_empty() {
            Self::Disabled
        } else if value.starts_with("http://") || value.starts_with("https://") {
            Self::Http(value.to_string())
        } else {
            Self::File(resolve_with_base(base, value))
        }
    }

    pub fn memory(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Memory(Arc::from(bytes.into()))
    }

    pub(crate) async fn fetch(&self, client: &reqwest::Client) -> Result<Vec<u8>> {
        match self {
            Self::File(path) => Ok(tokio::fs::read(path).await?),
            Self::Http(url) => fetch_http(client, url).await,
            Self::Memory(bytes) => Ok(bytes.to_vec()),
            Self::Disabled => Err(Error::NotFound("no diagnosis source configured".into())),
        }
    }
}

impl fmt::Display for DiagnosisSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Http(url) => f.write_str(url),
            Self::Memory(bytes) => write!(f, "<{} bytes in memory>", bytes.len()),
            Self::Disabled => f.write_str("<disabled>"),
        }
    }
}

async fn fetch_http(client: &reqwest::Client, url: &str) -> Result<Vec<u8>> {
    let fetch_error = |reason: String| Error::Fetch { source_name: url.to_string(), reason };
    let response = client.get(url).send().await.map_err(|e| fetch_error(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(fetch_error(format!("HTTP {}", status)));
    }
    let body = response.bytes().await.map_err(|e| fetch_error(e.to_string()))?;
    Ok(body.to_vec())
}

pub(crate) fn build_http_client(timeout: Duration) -> reqwest::Client {
    let user_agent = format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("Falling back to default HTTP client: {}", e);
            reqwest::Client::new()
        })
}
