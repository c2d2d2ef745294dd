use crate::config::cli::LocalStorage;
use crate::domain::model::{DataMap, DomainRecord};
use crate::domain::ports::{DatasetSource, Storage};
use crate::utils::error::{DashError, Result};
use crate::utils::validation::is_remote_source;
use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::Client;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Upper bound for the one-shot dataset request; a stalled server becomes a load error.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

pub const DATA_LOAD_ADVISORY: &str = "Couldn't load /data/seo-data.json (place it under public/data).";

/// Dataset served over HTTP, always fetched past any cache.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    url: String,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_timeout(url, DEFAULT_FETCH_TIMEOUT)
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl DatasetSource for HttpSource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        tracing::debug!("Making dataset request to: {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .timeout(self.timeout)
            .send()
            .await?;

        tracing::debug!("Dataset response status: {}", response.status());
        if !response.status().is_success() {
            return Err(DashError::HttpStatusError {
                url: self.url.clone(),
                status: response.status().as_u16(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Dataset read through [`LocalStorage`].
#[derive(Debug, Clone)]
pub struct FileSource {
    storage: LocalStorage,
    file_name: String,
}

impl FileSource {
    pub fn new(path: &str) -> Self {
        let path = Path::new(path);
        let base = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| ".".to_string(), |p| p.to_string_lossy().into_owned());
        let file_name = path
            .file_name()
            .map_or_else(String::new, |f| f.to_string_lossy().into_owned());
        Self {
            storage: LocalStorage::new(base),
            file_name,
        }
    }
}

#[async_trait]
impl DatasetSource for FileSource {
    async fn fetch(&self) -> Result<Vec<u8>> {
        tracing::debug!("Reading dataset file: {}", self.describe());
        self.storage.read_file(&self.file_name).await
    }

    fn describe(&self) -> String {
        self.storage.resolve(&self.file_name).display().to_string()
    }
}

/// http(s) 開頭走網路，其他一律視為本機檔案
pub fn source_for(location: &str) -> Box<dyn DatasetSource> {
    if is_remote_source(location) {
        Box::new(HttpSource::new(location.trim()))
    } else {
        Box::new(FileSource::new(location))
    }
}

/// Parses `{ "<domain>": DomainRecord, ... }`.
///
/// Only a non-object document fails. `null` entries and entries that do not
/// decode as a record are dropped one by one, leaving their siblings intact.
pub fn parse_dataset(bytes: &[u8]) -> Result<DataMap> {
    let raw: HashMap<String, serde_json::Value> = serde_json::from_slice(bytes)?;
    let mut map = DataMap::with_capacity(raw.len());
    for (key, value) in raw {
        if value.is_null() {
            continue;
        }
        match serde_json::from_value::<DomainRecord>(value) {
            Ok(record) => {
                map.insert(key, record);
            }
            Err(e) => tracing::warn!("Skipping malformed record for '{}': {}", key, e),
        }
    }
    Ok(map)
}

/// `key`, then `www.<key>`; a miss means "use defaults", not an error.
pub fn lookup<'a>(map: &'a DataMap, key: &str) -> Option<&'a DomainRecord> {
    map.get(key)
        .or_else(|| map.get(&format!("www.{}", key)))
}

pub struct DataStore {
    source: Box<dyn DatasetSource>,
}

impl DataStore {
    pub fn new(source: Box<dyn DatasetSource>) -> Self {
        Self { source }
    }

    pub fn from_location(location: &str) -> Self {
        Self::new(source_for(location))
    }

    pub fn describe(&self) -> String {
        self.source.describe()
    }

    /// One-shot fetch + parse. No retry.
    pub async fn load(&self) -> Result<DataMap> {
        tracing::info!("📥 Loading dataset from {}", self.source.describe());
        let bytes = self.source.fetch().await?;
        let map = parse_dataset(&bytes)?;
        tracing::debug!("Parsed {} domain records", map.len());
        Ok(map)
    }
}

impl std::fmt::Debug for DataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataStore")
            .field("source", &self.source.describe())
            .finish()
    }
}
