//! Collaborator traits describing the hosted backend.

use async_trait::async_trait;
use blogspace_api_types::{BackendRow, PostWrite};
use bytes::Bytes;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend request failed: {0}")]
    Fetch(String),
    #[error("record not found")]
    NotFound,
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("caller is not allowed to modify this record")]
    Unauthorized,
    #[error("backend request timed out")]
    Timeout,
    #[error("unsupported media type `{0}`")]
    UnsupportedMediaType(String),
    #[error("payload exceeds the storage limit")]
    PayloadTooLarge,
    #[error("upload failed: {0}")]
    Upload(String),
}

impl BackendError {
    pub fn fetch(err: impl std::fmt::Display) -> Self {
        Self::Fetch(err.to_string())
    }
}

/// The `blog_posts` table. Writes are scoped to the caller's own rows by the
/// backend's authorization layer.
#[async_trait]
pub trait PostsBackend: Send + Sync {
    /// Published rows, newest `created_at` first.
    async fn list_published_posts(&self) -> Result<Vec<BackendRow>, BackendError>;

    async fn get_post_by_id(&self, id: &str) -> Result<Option<BackendRow>, BackendError>;

    /// The row `id` only if `user_id` owns it.
    async fn get_post_for_user(
        &self,
        id: &str,
        user_id: Uuid,
    ) -> Result<Option<BackendRow>, BackendError>;

    /// Every row owned by `user_id`, drafts included, newest first.
    async fn list_posts_for_user(&self, user_id: Uuid) -> Result<Vec<BackendRow>, BackendError>;

    async fn create_post(&self, fields: PostWrite) -> Result<BackendRow, BackendError>;

    async fn update_post(&self, id: &str, fields: PostWrite) -> Result<BackendRow, BackendError>;

    async fn delete_post(&self, id: &str, user_id: Uuid) -> Result<(), BackendError>;
}

/// Public object storage for post images.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store `payload` under `object_key` and return its public URL.
    async fn upload(
        &self,
        object_key: &str,
        payload: Bytes,
        content_type: &str,
    ) -> Result<String, BackendError>;
}
