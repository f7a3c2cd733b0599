//! Messages exchanged with the services.
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StartUpload {
    /// File name, informational
    pub name: String,
    #[serde(rename = "type")]
    pub content_type: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UploadSession {
    pub upload_id: String,
    /// Some backends assign object identifier upfront
    #[serde(default)]
    pub object_id: Option<String>,
}

/// Acknowledgment of a single part
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PartAck {
    pub token: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CompletedPart {
    pub number: u32,
    pub token: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub(crate) struct CompleteUpload {
    pub(crate) parts: Vec<CompletedPart>,
}

/// Result of a multipart upload. Which field is set depends on backend.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletedUpload {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub object_id: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub(crate) struct UploadedAsset {
    pub(crate) url: String,
}
