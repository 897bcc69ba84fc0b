//! Download of remote diagram sources.

use std::{
    io,
    path::{Path, PathBuf},
    time::Instant,
};

use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build http client: {0}")]
    Client(reqwest::Error),
    #[error("failed to fetch {url}: {source}")]
    Http { url: Url, source: reqwest::Error },
    #[error("fetching {url} returned status {status}")]
    Status { url: Url, status: StatusCode },
    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

#[derive(Debug, Clone)]
pub struct SourceFetcher {
    client: Client,
}

impl SourceFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(Self::user_agent())
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }

    pub fn user_agent() -> &'static str {
        concat!("plantsvg/", env!("CARGO_PKG_VERSION"))
    }

    /// Download `url` into `dest`.
    pub async fn fetch_to(&self, url: &Url, dest: &Path) -> Result<(), FetchError> {
        let started_at = Instant::now();
        let http_error = |source| FetchError::Http {
            url: url.clone(),
            source,
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(http_error)?;
        let status = response.status();
        if !status.is_success() {
            warn!(
                target = "infra::fetch",
                op = "fetch::source",
                result = "error",
                elapsed_ms = started_at.elapsed().as_millis() as u64,
                url = %url,
                status = status.as_u16(),
                "Remote diagram source returned an error status"
            );
            return Err(FetchError::Status {
                url: url.clone(),
                status,
            });
        }

        let body = response.bytes().await.map_err(http_error)?;
        tokio::fs::write(dest, &body)
            .await
            .map_err(|source| FetchError::Write {
                path: dest.to_path_buf(),
                source,
            })?;

        info!(
            target = "infra::fetch",
            op = "fetch::source",
            result = "ok",
            elapsed_ms = started_at.elapsed().as_millis() as u64,
            url = %url,
            path = %dest.display(),
            bytes = body.len(),
            "Remote diagram source downloaded"
        );

        Ok(())
    }
}
