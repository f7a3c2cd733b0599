//! Multipart upload of local files.
use crate::{canonical, file_name, CompletedPart, MultipartUpload, StartUpload};
use anyhow::Context;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{
    io::{AsyncRead, AsyncReadExt},
    sync::Mutex,
};

/// Size of every part except the last one
pub const CHUNK_SIZE: usize = 5_242_880;

/// Streams local files to a multipart service, one part at a time.
///
/// Keeps track of uploaded files, so that each file is sent at most once
/// during uploader lifetime. Create a new uploader for every import.
#[derive(Clone)]
pub struct ObjectUploader {
    service: Arc<dyn MultipartUpload>,
    uploaded: Arc<Mutex<HashMap<PathBuf, String>>>,
}

impl ObjectUploader {
    pub fn new(service: Arc<dyn MultipartUpload>) -> ObjectUploader {
        ObjectUploader {
            service,
            uploaded: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Uploads file and returns reference to the stored object.
    ///
    /// Any failure aborts the upload, there are no retries: the caller
    /// has to start over. Empty files still complete the session, with no
    /// parts.
    #[tracing::instrument(skip(self))]
    pub async fn upload(&self, path: &Path, content_type: &str) -> anyhow::Result<String> {
        let key = canonical(path).await;
        if let Some(reference) = self.uploaded.lock().await.get(&key) {
            tracing::debug!("already uploaded");
            return Ok(reference.clone());
        }
        let mut file = tokio::fs::File::open(path)
            .await
            .with_context(|| format!("unable to open {}", path.display()))?;

        let session = self
            .service
            .start_multipart_upload(StartUpload {
                name: file_name(path),
                content_type: content_type.to_string(),
            })
            .await
            .context("unable to start multipart upload")?;

        let mut parts = Vec::new();
        let mut chunk = vec![0; CHUNK_SIZE];
        for part_number in 1.. {
            let size = read_chunk(&mut file, &mut chunk)
                .await
                .with_context(|| format!("unable to read {}", path.display()))?;
            if size == 0 {
                break;
            }
            let ack = self
                .service
                .upload_part(&session.upload_id, part_number, chunk[..size].to_vec())
                .await
                .with_context(|| format!("unable to upload part {}", part_number))?;
            parts.push(CompletedPart {
                number: part_number,
                token: ack.token,
            });
        }
        tracing::debug!(parts = parts.len(), "all parts uploaded");

        let completed = self
            .service
            .complete_multipart_upload(&session.upload_id, parts)
            .await
            .context("unable to complete multipart upload")?;
        let reference = completed
            .url
            .or(completed.object_id)
            .or(session.object_id)
            .context("service did not return object reference")?;

        self.uploaded.lock().await.insert(key, reference.clone());
        Ok(reference)
    }
}

/// Fills `buf` unless EOF is reached first. Returns number of bytes read,
/// 0 means EOF.
async fn read_chunk(
    reader: &mut (impl AsyncRead + Unpin),
    buf: &mut [u8],
) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}
