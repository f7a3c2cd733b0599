//! Allows you to upload problem files to the asset and blob services.
//!
//! Backends differ in what they support: some accept whole files, others
//! only multipart uploads. Both capabilities are separate traits and
//! [`AssetBackend`] picks one of them per backend.

mod api;
mod http;
mod memory;
mod pipeline;

use anyhow::Context;
use async_trait::async_trait;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::sync::Mutex;

pub use api::{CompletedPart, CompletedUpload, PartAck, StartUpload, UploadSession};
pub use http::HttpClient;
pub use memory::{Call, MemoryStore, Operation};
pub use pipeline::{ObjectUploader, CHUNK_SIZE};

/// Service which accepts whole files in one request.
#[async_trait]
pub trait DirectUpload: Send + Sync {
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
    /// Uploads a file, returns link to it.
    async fn upload_file(&self, name: &str, data: Vec<u8>) -> anyhow::Result<String>;
    /// Uploads an image, returns link to it.
    async fn upload_image(&self, name: &str, data: Vec<u8>) -> anyhow::Result<String>;
}

/// Service which accepts files in numbered parts.
#[async_trait]
pub trait MultipartUpload: Send + Sync {
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
    async fn start_multipart_upload(&self, req: StartUpload) -> anyhow::Result<UploadSession>;
    /// Part numbers start from 1.
    async fn upload_part(
        &self,
        upload_id: &str,
        part_number: u32,
        data: Vec<u8>,
    ) -> anyhow::Result<PartAck>;
    /// `parts` must be ordered by number.
    async fn complete_multipart_upload(
        &self,
        upload_id: &str,
        parts: Vec<CompletedPart>,
    ) -> anyhow::Result<CompletedUpload>;
}

/// Asset service together with the capability it is used through.
#[derive(Clone)]
pub enum AssetBackend {
    Direct(Arc<dyn DirectUpload>),
    Chunked(Arc<dyn MultipartUpload>),
}

impl AssetBackend {
    /// Creates uploader for a single import.
    pub fn uploader(&self) -> AssetUploader {
        let inner = match self {
            AssetBackend::Direct(service) => Inner::Direct(service.clone()),
            AssetBackend::Chunked(service) => Inner::Chunked(ObjectUploader::new(service.clone())),
        };
        AssetUploader {
            inner,
            uploaded: Mutex::new(HashMap::new()),
        }
    }
}

enum Inner {
    Direct(Arc<dyn DirectUpload>),
    Chunked(ObjectUploader),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum AssetKind {
    File,
    Image,
}

/// Uploads statement images and attachments. Each local file is uploaded
/// at most once per uploader.
pub struct AssetUploader {
    inner: Inner,
    uploaded: Mutex<HashMap<(AssetKind, PathBuf), String>>,
}

impl AssetUploader {
    pub async fn upload_file(&self, path: &Path) -> anyhow::Result<String> {
        self.upload(path, AssetKind::File).await
    }

    pub async fn upload_image(&self, path: &Path) -> anyhow::Result<String> {
        self.upload(path, AssetKind::Image).await
    }

    #[tracing::instrument(skip(self))]
    async fn upload(&self, path: &Path, kind: AssetKind) -> anyhow::Result<String> {
        let key = (kind, canonical(path).await);
        if let Some(link) = self.uploaded.lock().await.get(&key) {
            tracing::debug!("already uploaded");
            return Ok(link.clone());
        }
        let link = match &self.inner {
            Inner::Direct(service) => {
                let data = tokio::fs::read(path)
                    .await
                    .with_context(|| format!("unable to read {}", path.display()))?;
                let name = file_name(path);
                let res = match kind {
                    AssetKind::File => service.upload_file(&name, data).await,
                    AssetKind::Image => service.upload_image(&name, data).await,
                };
                res.with_context(|| format!("{} failed to accept {}", service.name(), name))?
            }
            Inner::Chunked(objects) => objects.upload(path, &content_type(path)).await?,
        };
        self.uploaded.lock().await.insert(key, link.clone());
        Ok(link)
    }
}

pub(crate) async fn canonical(path: &Path) -> PathBuf {
    tokio::fs::canonicalize(path)
        .await
        .unwrap_or_else(|_| path.to_path_buf())
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn content_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn direct_backend_uploads_once() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("pic.png");
        tokio::fs::write(&image, b"png").await.unwrap();
        let store = Arc::new(MemoryStore::new());
        let uploader = AssetBackend::Direct(store.clone()).uploader();

        let first = uploader.upload_image(&image).await.unwrap();
        let second = uploader.upload_image(&image).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first, "memory://images/1/pic.png");
        assert_eq!(store.count(Operation::UploadImage), 1);
        assert_eq!(store.object(&first).unwrap(), b"png");

        uploader.upload_file(&image).await.unwrap();
        assert_eq!(store.count(Operation::UploadFile), 1);
    }

    #[tokio::test]
    async fn same_names_get_distinct_links() {
        let dir = tempfile::tempdir().unwrap();
        for (lang, content) in &[("english", "en"), ("russian", "ru")] {
            std::fs::create_dir(dir.path().join(lang)).unwrap();
            tokio::fs::write(dir.path().join(lang).join("pic.png"), content)
                .await
                .unwrap();
        }
        let store = Arc::new(MemoryStore::new());
        let uploader = AssetBackend::Direct(store.clone()).uploader();

        let english = uploader
            .upload_image(&dir.path().join("english/pic.png"))
            .await
            .unwrap();
        let russian = uploader
            .upload_image(&dir.path().join("russian/pic.png"))
            .await
            .unwrap();
        assert_ne!(english, russian);
        assert_eq!(store.object(&english).unwrap(), b"en");
        assert_eq!(store.object(&russian).unwrap(), b"ru");
    }

    #[tokio::test]
    async fn chunked_backend_uses_pipeline() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("pic.png");
        tokio::fs::write(&image, b"png").await.unwrap();
        let store = Arc::new(MemoryStore::new());
        let uploader = AssetBackend::Chunked(store.clone()).uploader();

        let link = uploader.upload_image(&image).await.unwrap();
        assert_eq!(store.object(&link).unwrap(), b"png");
        assert_eq!(store.count(Operation::UploadImage), 0);
        assert!(store.calls().contains(&Call::StartMultipartUpload {
            name: "pic.png".to_string(),
            content_type: "image/png".to_string(),
        }));
    }

    #[tokio::test]
    async fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let uploader = AssetBackend::Direct(Arc::new(MemoryStore::new())).uploader();
        assert!(uploader
            .upload_file(&dir.path().join("nope.pdf"))
            .await
            .is_err());
    }
}
