use anyhow::Context as _;
use asset_client::{AssetBackend, HttpClient, MultipartUpload};
use package_loader::LoaderConfig;
use serde::{Deserialize, Serialize};
use std::{path::Path, sync::Arc};

/// Contents of the `--config` file
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Service for statement images and attachments
    pub assets: BackendConfig,
    /// Service for test data, always used through multipart uploads
    pub blobs: BackendConfig,
    #[serde(default)]
    pub workspace: LoaderConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BackendConfig {
    /// Base URL
    pub endpoint: String,
    #[serde(default)]
    pub mode: UploadMode,
}

/// Capability a backend is used through
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum UploadMode {
    /// Whole files in one request
    Direct,
    /// Numbered parts
    Chunked,
}

impl Default for UploadMode {
    fn default() -> Self {
        UploadMode::Direct
    }
}

impl Config {
    pub async fn load(path: &Path) -> anyhow::Result<Config> {
        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_yaml::from_slice(&data).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn asset_backend(&self) -> AssetBackend {
        let client = Arc::new(HttpClient::new(&self.assets.endpoint));
        match self.assets.mode {
            UploadMode::Direct => AssetBackend::Direct(client),
            UploadMode::Chunked => AssetBackend::Chunked(client),
        }
    }

    pub fn blob_backend(&self) -> Arc<dyn MultipartUpload> {
        Arc::new(HttpClient::new(&self.blobs.endpoint))
    }
}
