//! Image upload validation and object naming.

use std::num::NonZeroU64;
use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::{error, info};
use uuid::Uuid;

use crate::application::repos::{BackendError, ImageStore};

const SOURCE: &str = "application::uploads::ImageUploadService";

pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;
const FALLBACK_EXTENSION: &str = "bin";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("uploaded file is empty")]
    EmptyPayload,
    #[error("only images can be uploaded, got `{content_type}`")]
    UnsupportedMediaType { content_type: String },
    #[error("file is too large (limit is {limit_mib} MiB)")]
    PayloadTooLarge { size_bytes: u64, limit_mib: u64 },
    #[error("image upload failed: {0}")]
    Store(BackendError),
}

impl From<BackendError> for UploadError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::UnsupportedMediaType(content_type) => {
                UploadError::UnsupportedMediaType { content_type }
            }
            other => UploadError::Store(other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub content_type: String,
    pub payload: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedImage {
    pub object_key: String,
    pub url: String,
}

#[derive(Clone)]
pub struct ImageUploadService {
    store: Arc<dyn ImageStore>,
    max_bytes: NonZeroU64,
}

impl ImageUploadService {
    pub fn new(store: Arc<dyn ImageStore>, max_bytes: NonZeroU64) -> Self {
        Self { store, max_bytes }
    }

    pub async fn upload(&self, upload: ImageUpload) -> Result<UploadedImage, UploadError> {
        self.validate(&upload)?;

        let object_key = object_key(
            &upload.filename,
            &upload.content_type,
            OffsetDateTime::now_utc(),
            Uuid::new_v4(),
        );

        let url = self
            .store
            .upload(&object_key, upload.payload, &upload.content_type)
            .await
            .map_err(|err| {
                error!(
                    target = SOURCE,
                    object_key = %object_key,
                    error = %err,
                    "image upload failed"
                );
                UploadError::from(err)
            })?;

        info!(target = SOURCE, object_key = %object_key, "image uploaded");
        Ok(UploadedImage { object_key, url })
    }

    /// Checks run before any bytes leave the process.
    pub fn validate(&self, upload: &ImageUpload) -> Result<(), UploadError> {
        if !upload
            .content_type
            .trim()
            .to_ascii_lowercase()
            .starts_with("image/")
        {
            return Err(UploadError::UnsupportedMediaType {
                content_type: upload.content_type.clone(),
            });
        }

        if upload.payload.is_empty() {
            return Err(UploadError::EmptyPayload);
        }

        let size_bytes = upload.payload.len() as u64;
        let limit = self.max_bytes.get();
        if size_bytes > limit {
            return Err(UploadError::PayloadTooLarge {
                size_bytes,
                limit_mib: limit.div_ceil(1_048_576),
            });
        }
        Ok(())
    }
}

/// `{timestamp}-{uuid}.{ext}` with `:` and `.` in the timestamp replaced by `-`.
///
/// Only the extension of the client's filename survives; non-ASCII characters
/// are dropped first. Without a usable extension one is derived from the MIME type.
pub fn object_key(filename: &str, content_type: &str, now: OffsetDateTime, id: Uuid) -> String {
    let timestamp = now
        .format(&Rfc3339)
        .unwrap_or_else(|_| now.unix_timestamp().to_string())
        .replace([':', '.'], "-");
    let extension = file_extension(filename).unwrap_or_else(|| mime_extension(content_type));
    format!("{timestamp}-{id}.{extension}")
}

fn file_extension(filename: &str) -> Option<String> {
    let ascii: String = filename.chars().filter(char::is_ascii).collect();
    let (_, extension) = ascii.rsplit_once('.')?;
    let extension: String = extension
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_ascii_lowercase();
    (!extension.is_empty()).then_some(extension)
}

fn mime_extension(content_type: &str) -> String {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    match essence {
        "image/jpeg" => "jpg".to_string(),
        _ => mime_guess::get_mime_extensions_str(essence)
            .and_then(|extensions| extensions.first())
            .map_or_else(|| FALLBACK_EXTENSION.to_string(), |ext| (*ext).to_string()),
    }
}
