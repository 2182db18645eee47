use async_trait::async_trait;
use blogspace_api_types::StoredObject;
use bytes::Bytes;
use reqwest::{Method, StatusCode, header::CONTENT_TYPE};
use tracing::debug;

use crate::application::repos::{BackendError, ImageStore};

use super::{RestBackend, send};

impl RestBackend {
    pub fn public_url(&self, object_key: &str) -> Result<String, BackendError> {
        let path = format!("storage/v1/object/public/{}/{object_key}", self.bucket);
        self.endpoint(&path, &[]).map(String::from)
    }
}

#[async_trait]
impl ImageStore for RestBackend {
    async fn upload(
        &self,
        object_key: &str,
        payload: Bytes,
        content_type: &str,
    ) -> Result<String, BackendError> {
        let path = format!("storage/v1/object/{}/{object_key}", self.bucket);
        let url = self.endpoint(&path, &[])?;
        let request = self
            .request(Method::POST, url)
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(payload);

        let response = send(request).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::PAYLOAD_TOO_LARGE => BackendError::PayloadTooLarge,
                StatusCode::UNSUPPORTED_MEDIA_TYPE => {
                    BackendError::UnsupportedMediaType(content_type.to_string())
                }
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BackendError::Unauthorized,
                _ => BackendError::Upload(format!("status {status} body {body}")),
            });
        }

        let stored: StoredObject = response
            .json()
            .await
            .map_err(|err| BackendError::Upload(format!("failed to parse body: {err}")))?;
        debug!(
            target = "infra::rest::storage",
            key = %stored.key,
            "object stored"
        );

        self.public_url(object_key)
    }
}
