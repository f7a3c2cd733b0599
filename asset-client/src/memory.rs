//! In-process implementation of both services. Keeps everything in memory
//! and records every call, which is handy for dry runs and tests.
use crate::{
    CompletedPart, CompletedUpload, DirectUpload, MultipartUpload, PartAck, StartUpload,
    UploadSession,
};
use anyhow::{bail, Context};
use async_trait::async_trait;
use std::{
    collections::{BTreeMap, HashMap},
    sync::{Mutex, MutexGuard},
};

/// Recorded service call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    UploadFile {
        name: String,
        size: usize,
    },
    UploadImage {
        name: String,
        size: usize,
    },
    StartMultipartUpload {
        name: String,
        content_type: String,
    },
    UploadPart {
        upload_id: String,
        part_number: u32,
        size: usize,
    },
    CompleteMultipartUpload {
        upload_id: String,
        parts: Vec<u32>,
    },
}

impl Call {
    pub fn operation(&self) -> Operation {
        match self {
            Call::UploadFile { .. } => Operation::UploadFile,
            Call::UploadImage { .. } => Operation::UploadImage,
            Call::StartMultipartUpload { .. } => Operation::StartMultipartUpload,
            Call::UploadPart { .. } => Operation::UploadPart,
            Call::CompleteMultipartUpload { .. } => Operation::CompleteMultipartUpload,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    UploadFile,
    UploadImage,
    StartMultipartUpload,
    UploadPart,
    CompleteMultipartUpload,
}

struct PendingUpload {
    name: String,
    parts: BTreeMap<u32, (String, Vec<u8>)>,
}

#[derive(Default)]
struct State {
    calls: Vec<Call>,
    failing: Vec<Operation>,
    uploads: HashMap<String, PendingUpload>,
    upload_count: u32,
    objects: HashMap<String, Vec<u8>>,
}

/// Stores uploaded objects in memory
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    /// Makes every following call of `op` fail.
    pub fn fail(&self, op: Operation) {
        self.state().failing.push(op);
    }

    /// All calls made so far, in order
    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub fn count(&self, op: Operation) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|call| call.operation() == op)
            .count()
    }

    /// Returns content of a stored object
    pub fn object(&self, link: &str) -> Option<Vec<u8>> {
        self.state().objects.get(link).cloned()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, call: Call) -> anyhow::Result<MutexGuard<'_, State>> {
        let mut state = self.state();
        let op = call.operation();
        state.calls.push(call);
        if state.failing.contains(&op) {
            bail!("{:?} failed on purpose", op);
        }
        Ok(state)
    }

    fn store(&self, prefix: &str, name: &str, data: Vec<u8>) -> anyhow::Result<String> {
        let call = match prefix {
            "images" => Call::UploadImage {
                name: name.to_string(),
                size: data.len(),
            },
            _ => Call::UploadFile {
                name: name.to_string(),
                size: data.len(),
            },
        };
        let mut state = self.record(call)?;
        let link = format!("memory://{}/{}/{}", prefix, state.calls.len(), name);
        state.objects.insert(link.clone(), data);
        Ok(link)
    }
}

#[async_trait]
impl DirectUpload for MemoryStore {
    async fn upload_file(&self, name: &str, data: Vec<u8>) -> anyhow::Result<String> {
        self.store("files", name, data)
    }

    async fn upload_image(&self, name: &str, data: Vec<u8>) -> anyhow::Result<String> {
        self.store("images", name, data)
    }
}

#[async_trait]
impl MultipartUpload for MemoryStore {
    async fn start_multipart_upload(&self, req: StartUpload) -> anyhow::Result<UploadSession> {
        let mut state = self.record(Call::StartMultipartUpload {
            name: req.name.clone(),
            content_type: req.content_type,
        })?;
        state.upload_count += 1;
        let upload_id = format!("upload-{}", state.upload_count);
        state.uploads.insert(
            upload_id.clone(),
            PendingUpload {
                name: req.name,
                parts: BTreeMap::new(),
            },
        );
        Ok(UploadSession {
            upload_id,
            object_id: None,
        })
    }

    async fn upload_part(
        &self,
        upload_id: &str,
        part_number: u32,
        data: Vec<u8>,
    ) -> anyhow::Result<PartAck> {
        let mut state = self.record(Call::UploadPart {
            upload_id: upload_id.to_string(),
            part_number,
            size: data.len(),
        })?;
        let upload = state
            .uploads
            .get_mut(upload_id)
            .with_context(|| format!("unknown upload {}", upload_id))?;
        let token = format!("etag-{}-{}", upload_id, part_number);
        upload.parts.insert(part_number, (token.clone(), data));
        Ok(PartAck { token })
    }

    async fn complete_multipart_upload(
        &self,
        upload_id: &str,
        parts: Vec<CompletedPart>,
    ) -> anyhow::Result<CompletedUpload> {
        let mut state = self.record(Call::CompleteMultipartUpload {
            upload_id: upload_id.to_string(),
            parts: parts.iter().map(|part| part.number).collect(),
        })?;
        let mut upload = state
            .uploads
            .remove(upload_id)
            .with_context(|| format!("unknown upload {}", upload_id))?;
        let mut data = Vec::new();
        for (expected, part) in (1..).zip(&parts) {
            if part.number != expected {
                bail!("part {} is out of order", part.number);
            }
            let (token, chunk) = upload
                .parts
                .remove(&part.number)
                .with_context(|| format!("part {} was never uploaded", part.number))?;
            if token != part.token {
                bail!("part {} token mismatch", part.number);
            }
            data.extend(chunk);
        }
        if !upload.parts.is_empty() {
            bail!("{} uploaded parts are not listed", upload.parts.len());
        }
        let link = format!("memory://objects/{}/{}", upload_id, upload.name);
        state.objects.insert(link.clone(), data);
        Ok(CompletedUpload {
            url: Some(link),
            object_id: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_gaps_in_parts() {
        let store = MemoryStore::new();
        let session = store
            .start_multipart_upload(StartUpload {
                name: "x".to_string(),
                content_type: "text/plain".to_string(),
            })
            .await
            .unwrap();
        let ack = store
            .upload_part(&session.upload_id, 2, b"abc".to_vec())
            .await
            .unwrap();
        let parts = vec![CompletedPart {
            number: 2,
            token: ack.token,
        }];
        assert!(store
            .complete_multipart_upload(&session.upload_id, parts)
            .await
            .is_err());
    }
}
