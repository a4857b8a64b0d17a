//! HTTP client for the hosted media service.

use async_trait::async_trait;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use time::OffsetDateTime;
use url::Url;

use crate::application::media::{ImagePayload, MediaError, MediaStore, StoredImage};
use crate::config::MediaSettings;
use crate::infra::error::InfraError;

/// Client for the media host's signed upload and destroy endpoints.
///
/// Every request carries `timestamp`, `api_key`, and a SHA-256 signature over
/// the alphabetically ordered request parameters followed by the shared
/// secret.
pub struct HttpMediaStore {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
    api_secret: String,
    folder: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

impl HttpMediaStore {
    pub fn new(settings: &MediaSettings) -> Result<Self, InfraError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|err| InfraError::configuration(format!("media client: {err}")))?;

        Ok(Self {
            client,
            base_url: settings.base_url.clone(),
            api_key: settings.api_key.clone(),
            api_secret: settings.api_secret.clone(),
            folder: settings.folder.clone(),
        })
    }

    fn endpoint(&self, segment: &str) -> Result<Url, MediaError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| MediaError::Malformed("media base url cannot be a base".to_string()))?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }

    fn sign(&self, params: &[(&str, &str)]) -> String {
        let mut ordered: Vec<(&str, &str)> = params.to_vec();
        ordered.sort_by_key(|(name, _)| *name);
        let joined = ordered
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha256::new();
        hasher.update(joined.as_bytes());
        hasher.update(self.api_secret.as_bytes());
        hex::encode(hasher.finalize())
    }

    async fn reject(response: reqwest::Response) -> MediaError {
        let status = response.status().as_u16();
        let detail = response.text().await.unwrap_or_default();
        MediaError::Rejected { status, detail }
    }
}

#[async_trait]
impl MediaStore for HttpMediaStore {
    async fn upload(&self, payload: ImagePayload) -> Result<StoredImage, MediaError> {
        let timestamp = OffsetDateTime::now_utc().unix_timestamp().to_string();
        let signature = self.sign(&[("folder", &self.folder), ("timestamp", &timestamp)]);

        let file_name = payload
            .file_name
            .clone()
            .unwrap_or_else(|| "upload.bin".to_string());
        let content_type = payload.content_type.clone().unwrap_or_else(|| {
            mime_guess::from_path(&file_name)
                .first_or_octet_stream()
                .to_string()
        });

        let part = reqwest::multipart::Part::bytes(payload.data.to_vec())
            .file_name(file_name)
            .mime_str(&content_type)
            .map_err(MediaError::transport)?;
        let form = reqwest::multipart::Form::new()
            .text("folder", self.folder.clone())
            .text("timestamp", timestamp)
            .text("api_key", self.api_key.clone())
            .text("signature", signature)
            .part("file", part);

        let endpoint = self.endpoint("upload")?;
        let response = self
            .client
            .post(endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(MediaError::transport)?;

        if !response.status().is_success() {
            return Err(Self::reject(response).await);
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|err| MediaError::Malformed(err.to_string()))?;
        Ok(StoredImage {
            url: uploaded.secure_url,
            asset_id: uploaded.public_id,
        })
    }

    async fn destroy(&self, asset_id: &str) -> Result<(), MediaError> {
        let timestamp = OffsetDateTime::now_utc().unix_timestamp().to_string();
        let signature = self.sign(&[("public_id", asset_id), ("timestamp", &timestamp)]);

        let form = reqwest::multipart::Form::new()
            .text("public_id", asset_id.to_string())
            .text("timestamp", timestamp)
            .text("api_key", self.api_key.clone())
            .text("signature", signature);

        let endpoint = self.endpoint("destroy")?;
        let response = self
            .client
            .post(endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(MediaError::transport)?;

        if !response.status().is_success() {
            return Err(Self::reject(response).await);
        }
        Ok(())
    }
}
