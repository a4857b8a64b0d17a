//! Object-store seam for hosted product images.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// One image attachment as received from the multipart request.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Result of a successful upload: the public URL plus the handle needed to
/// destroy the asset later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub url: String,
    pub asset_id: String,
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("media transport failure: {0}")]
    Transport(String),
    #[error("media service rejected the request ({status}): {detail}")]
    Rejected { status: u16, detail: String },
    #[error("media service returned a malformed response: {0}")]
    Malformed(String),
}

impl MediaError {
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Upload one image. The adapter decides folder placement and naming.
    async fn upload(&self, payload: ImagePayload) -> Result<StoredImage, MediaError>;

    /// Destroy a previously stored asset by its handle.
    async fn destroy(&self, asset_id: &str) -> Result<(), MediaError>;
}
