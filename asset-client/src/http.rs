use crate::{
    api::{CompleteUpload, UploadedAsset},
    CompletedPart, CompletedUpload, DirectUpload, MultipartUpload, PartAck, StartUpload,
    UploadSession,
};
use anyhow::Context;
use async_trait::async_trait;

/// Asset or blob service, reachable over HTTP.
#[derive(Clone)]
pub struct HttpClient {
    endpoint: String,
    transport: reqwest::Client,
}

impl HttpClient {
    /// Creates a client for the service listening on `endpoint`,
    /// e.g. `http://assets.local:8080`.
    pub fn new(endpoint: &str) -> HttpClient {
        HttpClient {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            transport: reqwest::Client::new(),
        }
    }

    async fn post_raw(&self, route: &str, name: &str, data: Vec<u8>) -> anyhow::Result<String> {
        let url = format!("{}/{}", self.endpoint, route);
        let resp: UploadedAsset = self
            .transport
            .post(url)
            .query(&[("name", name)])
            .body(data)
            .send()
            .await
            .context("failed to send request")?
            .error_for_status()
            .context("response is not successful")?
            .json()
            .await
            .context("failed to receive response")?;
        Ok(resp.url)
    }
}

#[async_trait]
impl DirectUpload for HttpClient {
    async fn upload_file(&self, name: &str, data: Vec<u8>) -> anyhow::Result<String> {
        self.post_raw("files", name, data).await
    }

    async fn upload_image(&self, name: &str, data: Vec<u8>) -> anyhow::Result<String> {
        self.post_raw("images", name, data).await
    }
}

#[async_trait]
impl MultipartUpload for HttpClient {
    async fn start_multipart_upload(&self, req: StartUpload) -> anyhow::Result<UploadSession> {
        let url = format!("{}/uploads", self.endpoint);
        let session = self
            .transport
            .post(url)
            .json(&req)
            .send()
            .await
            .context("failed to send request")?
            .error_for_status()
            .context("response is not successful")?
            .json()
            .await
            .context("failed to receive response")?;
        Ok(session)
    }

    async fn upload_part(
        &self,
        upload_id: &str,
        part_number: u32,
        data: Vec<u8>,
    ) -> anyhow::Result<PartAck> {
        let url = format!(
            "{}/uploads/{}/parts/{}",
            self.endpoint, upload_id, part_number
        );
        let ack = self
            .transport
            .put(url)
            .body(data)
            .send()
            .await
            .context("failed to send request")?
            .error_for_status()
            .context("response is not successful")?
            .json()
            .await
            .context("failed to receive response")?;
        Ok(ack)
    }

    async fn complete_multipart_upload(
        &self,
        upload_id: &str,
        parts: Vec<CompletedPart>,
    ) -> anyhow::Result<CompletedUpload> {
        let url = format!("{}/uploads/{}/complete", self.endpoint, upload_id);
        let completed = self
            .transport
            .post(url)
            .json(&CompleteUpload { parts })
            .send()
            .await
            .context("failed to send request")?
            .error_for_status()
            .context("response is not successful")?
            .json()
            .await
            .context("failed to receive response")?;
        Ok(completed)
    }
}
