//! Bulk download of incubator hero images into the app's asset directory.
//!
//! Requests go out one at a time with a fixed pause after each attempt. A
//! failed item is logged and skipped; nothing is retried or resumed.

use reqwest::{Client, StatusCode};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_URL_TEMPLATE: &str =
    "https://seedfundapi.startupindia.gov.in:3535/Portfolio/{}/Hero_Image.jpeg";
pub const DEFAULT_RANGE: RangeInclusive<u32> = 1..=40;
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const REQUEST_DELAY: Duration = Duration::from_millis(500);

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("Failed to create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// `inc_007.jpeg` for index 7.
pub fn file_name(index: u32) -> String {
    format!("inc_{:03}.jpeg", index)
}

/// The result of one index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Saved(PathBuf),
    BadStatus(StatusCode),
    Failed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchSummary {
    pub saved: Vec<u32>,
    pub bad_status: Vec<u32>,
    pub failed: Vec<u32>,
}

impl FetchSummary {
    fn record(&mut self, index: u32, outcome: &FetchOutcome) {
        match outcome {
            FetchOutcome::Saved(_) => self.saved.push(index),
            FetchOutcome::BadStatus(_) => self.bad_status.push(index),
            FetchOutcome::Failed(_) => self.failed.push(index),
        }
    }

    pub fn attempted(&self) -> usize {
        self.saved.len() + self.bad_status.len() + self.failed.len()
    }
}

pub struct ImageFetcher {
    client: Client,
    url_template: String,
    output_dir: PathBuf,
    range: RangeInclusive<u32>,
    delay: Duration,
}

impl ImageFetcher {
    /// A fetcher for the default URL template, indices 1 to 40 inclusive.
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self, ImageError> {
        Self::with_template(DEFAULT_URL_TEMPLATE, output_dir)
    }

    /// `url_template` must contain one `{}`, replaced with the index.
    pub fn with_template(
        url_template: impl Into<String>,
        output_dir: impl Into<PathBuf>,
    ) -> Result<Self, ImageError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            url_template: url_template.into(),
            output_dir: output_dir.into(),
            range: DEFAULT_RANGE,
            delay: REQUEST_DELAY,
        })
    }

    pub fn range(mut self, range: RangeInclusive<u32>) -> Self {
        self.range = range;
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn url_for(&self, index: u32) -> String {
        self.url_template.replacen("{}", &index.to_string(), 1)
    }

    /// Downloads every index in the range, in order.
    pub async fn run(&self) -> Result<FetchSummary, ImageError> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|source| ImageError::OutputDir {
                path: self.output_dir.clone(),
                source,
            })?;

        let mut summary = FetchSummary::default();
        for index in self.range.clone() {
            let outcome = self.fetch_one(index).await;
            summary.record(index, &outcome);
            tokio::time::sleep(self.delay).await;
        }

        tracing::info!(
            saved = summary.saved.len(),
            bad_status = summary.bad_status.len(),
            failed = summary.failed.len(),
            "download finished"
        );
        Ok(summary)
    }

    /// Fetches one index. Errors are logged and folded into the outcome.
    pub async fn fetch_one(&self, index: u32) -> FetchOutcome {
        let url = self.url_for(index);
        let path = self.output_dir.join(file_name(index));
        tracing::info!("Downloading {} to {}...", url, path.display());

        let outcome = match self.download(&url, &path).await {
            Ok(outcome) => outcome,
            Err(e) => FetchOutcome::Failed(e.to_string()),
        };

        match &outcome {
            FetchOutcome::Saved(_) => tracing::info!("Success"),
            FetchOutcome::BadStatus(status) => {
                tracing::warn!("Failed with status {}", status.as_u16())
            }
            FetchOutcome::Failed(e) => tracing::warn!("Error: {}", e),
        }
        outcome
    }

    async fn download(&self, url: &str, path: &Path) -> Result<FetchOutcome, anyhow::Error> {
        let response = self.client.get(url).send().await?;
        if response.status() != StatusCode::OK {
            return Ok(FetchOutcome::BadStatus(response.status()));
        }

        let bytes = response.bytes().await?;
        tokio::fs::write(path, &bytes).await?;
        Ok(FetchOutcome::Saved(path.to_path_buf()))
    }
}
