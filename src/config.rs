use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use camino::Utf8PathBuf;
use directories::UserDirs;
use serde::{Deserialize, Serialize};

use crate::actions::SearchConfig;
use crate::domain::SearchParams;
use crate::error::CatalogError;

pub const DEFAULT_CONFIG_FILE: &str = "gn-catalog.json";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub endpoints: BTreeMap<String, String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub metadata_formats: Option<Vec<String>>,
    #[serde(default)]
    pub page_size: Option<u32>,
    #[serde(default)]
    pub pagination: Option<bool>,
    #[serde(default)]
    pub default_query: Option<SearchParams>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub download_dir: Option<String>,
}

/// Explicit configuration handed to the HTTP client, the download sink and
/// the initial state.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub endpoints: BTreeMap<String, String>,
    pub api_key: Option<String>,
    pub metadata_formats: Vec<String>,
    pub search: SearchConfig,
    pub timeout_secs: u64,
    pub download_dir: Utf8PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ConfigLoader::resolve_config(Config::default())
    }
}

impl ClientConfig {
    pub fn endpoint(&self, name: &str) -> Option<&str> {
        self.endpoints.get(name).map(String::as_str)
    }

    pub fn resolve_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let base = self.api_base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }

    pub fn endpoint_url(&self, name: &str) -> Result<String, CatalogError> {
        let path = self
            .endpoint(name)
            .ok_or_else(|| CatalogError::InvalidUrl(format!("unknown endpoint {name}")))?;
        Ok(self.resolve_url(path))
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn resolve(path: Option<&str>) -> Result<ClientConfig, CatalogError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        if path.is_none() && !config_path.exists() {
            tracing::debug!("no {DEFAULT_CONFIG_FILE} found, using defaults");
            return Ok(ClientConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|_| CatalogError::ConfigRead(config_path.clone()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| CatalogError::ConfigParse(err.to_string()))?;

        Ok(Self::resolve_config(config))
    }

    pub fn resolve_config(config: Config) -> ClientConfig {
        let mut endpoints = default_endpoints();
        endpoints.extend(config.endpoints);

        let download_dir = config
            .download_dir
            .map(Utf8PathBuf::from)
            .or_else(default_download_dir)
            .unwrap_or_else(|| Utf8PathBuf::from("."));

        ClientConfig {
            api_base_url: config
                .api_base_url
                .unwrap_or_else(|| "http://localhost:8000".to_string()),
            endpoints,
            api_key: config.api_key.filter(|key| !key.trim().is_empty()),
            metadata_formats: config
                .metadata_formats
                .unwrap_or_else(default_metadata_formats),
            search: SearchConfig {
                pagination: config.pagination.unwrap_or(false),
                page_size: config.page_size.unwrap_or(20),
                default_query: config.default_query.unwrap_or_default(),
            },
            timeout_secs: config.timeout_secs.unwrap_or(60),
            download_dir,
        }
    }
}

pub fn default_endpoints() -> BTreeMap<String, String> {
    [
        ("resources", "/api/v2/resources"),
        ("datasets", "/api/v2/datasets"),
        ("documents", "/api/v2/documents"),
        ("maps", "/api/v2/maps"),
        ("facets", "/api/v2/facets"),
    ]
    .into_iter()
    .map(|(name, path)| (name.to_string(), path.to_string()))
    .collect()
}

pub fn default_metadata_formats() -> Vec<String> {
    vec!["ISO".to_string(), "Dublin Core".to_string()]
}

fn default_download_dir() -> Option<Utf8PathBuf> {
    UserDirs::new()
        .and_then(|dirs| dirs.download_dir().map(|dir| dir.to_path_buf()))
        .and_then(|dir| Utf8PathBuf::from_path_buf(dir).ok())
}
