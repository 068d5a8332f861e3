use crate::record::Record;
use crate::stats::{DatasetStats, MalformedRuntime};
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info};
use url::Url;

pub const DEFAULT_SOURCE: &str = "data.json";

/// Where the dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Remote(Url),
}

impl DataSource {
    /// `http(s)://` is fetched over the network, `file://` and everything else is a local path.
    pub fn parse(input: &str) -> Self {
        match Url::parse(input) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => DataSource::Remote(url),
            Ok(url) if url.scheme() == "file" => match url.to_file_path() {
                Ok(path) => DataSource::File(path),
                Err(()) => DataSource::File(PathBuf::from(input)),
            },
            _ => DataSource::File(PathBuf::from(input)),
        }
    }
}

impl Default for DataSource {
    fn default() -> Self {
        DataSource::File(PathBuf::from(DEFAULT_SOURCE))
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Remote(url) => write!(f, "{}", url),
        }
    }
}

/// Everything that can go wrong while loading. Nothing partial survives any of these.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} answered with status {status}")]
    Status {
        url: Url,
        status: reqwest::StatusCode,
    },

    #[error("dataset is not a JSON array of records: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Runtime(#[from] MalformedRuntime),
}

/// The immutable full dataset plus the statistics computed at load time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub records: Vec<Record>,
    pub stats: DatasetStats,
}

impl Dataset {
    pub fn from_records(records: Vec<Record>) -> Result<Self, LoadError> {
        let stats = DatasetStats::compute(&records)?;
        Ok(Self { records, stats })
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, LoadError> {
        let records: Vec<Record> = serde_json::from_slice(bytes)?;
        Self::from_records(records)
    }
}

pub async fn load(source: &DataSource) -> Result<Dataset, LoadError> {
    info!(%source, "loading dataset");

    let bytes = match source {
        DataSource::File(path) => tokio::fs::read(path)
            .await
            .map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            })?,
        DataSource::Remote(url) => fetch(url).await?,
    };
    debug!(bytes = bytes.len(), "dataset fetched");

    let dataset = Dataset::from_json(&bytes)?;
    info!(
        videos = dataset.stats.total_videos,
        runtime = %dataset.stats.total_runtime(),
        "dataset loaded"
    );
    Ok(dataset)
}

async fn fetch(url: &Url) -> Result<Vec<u8>, LoadError> {
    let response = reqwest::get(url.clone()).await?;
    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status {
            url: url.clone(),
            status,
        });
    }

    Ok(response.bytes().await?.to_vec())
}
