//! Authoring operations for signed-in users.

use std::sync::Arc;

use blogspace_api_types::{BackendRow, PostWrite};
use thiserror::Error;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::application::repos::{BackendError, PostsBackend};
use crate::domain::normalize::DESCRIPTION_CHARS;

const SOURCE: &str = "application::editor::PostEditorService";

/// The authenticated caller. Sign-in itself happens outside this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub user_id: Uuid,
}

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("sign in to manage posts")]
    Unauthorized,
    #[error("{0} must not be empty")]
    ConstraintViolation(&'static str),
    #[error("post not found")]
    NotFound,
    #[error("post rejected by backend: {0}")]
    Rejected(String),
    #[error(transparent)]
    Backend(BackendError),
}

impl From<BackendError> for EditorError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Unauthorized => EditorError::Unauthorized,
            BackendError::NotFound => EditorError::NotFound,
            BackendError::Validation(message) => EditorError::Rejected(message),
            other => EditorError::Backend(other),
        }
    }
}

/// Editor form contents.
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
    pub published: bool,
    pub featured: bool,
}

#[derive(Clone)]
pub struct PostEditorService {
    backend: Arc<dyn PostsBackend>,
}

impl PostEditorService {
    pub fn new(backend: Arc<dyn PostsBackend>) -> Self {
        Self { backend }
    }

    pub async fn create(
        &self,
        session: Option<&Session>,
        draft: PostDraft,
    ) -> Result<BackendRow, EditorError> {
        let session = require_session(session)?;
        let fields = prepare_write(session, draft)?;
        let row = self.backend.create_post(fields).await?;
        info!(
            target = SOURCE,
            id = %row.id,
            published = row.published,
            "post created"
        );
        Ok(row)
    }

    pub async fn update(
        &self,
        session: Option<&Session>,
        id: &str,
        draft: PostDraft,
    ) -> Result<BackendRow, EditorError> {
        let session = require_session(session)?;
        ensure_non_empty(id, "id")?;
        let fields = prepare_write(session, draft)?;
        let row = self.backend.update_post(id, fields).await?;
        info!(
            target = SOURCE,
            id = %row.id,
            published = row.published,
            "post updated"
        );
        Ok(row)
    }

    pub async fn delete(&self, session: Option<&Session>, id: &str) -> Result<(), EditorError> {
        let session = require_session(session)?;
        ensure_non_empty(id, "id")?;
        self.backend.delete_post(id, session.user_id).await?;
        info!(target = SOURCE, id, "post deleted");
        Ok(())
    }

    /// The caller's own post, for pre-filling the editor.
    pub async fn load_for_edit(
        &self,
        session: Option<&Session>,
        id: &str,
    ) -> Result<BackendRow, EditorError> {
        let session = require_session(session)?;
        ensure_non_empty(id, "id")?;
        self.backend
            .get_post_for_user(id, session.user_id)
            .await?
            .ok_or(EditorError::NotFound)
    }

    /// The caller's posts, drafts included, newest first.
    pub async fn list_mine(&self, session: Option<&Session>) -> Result<Vec<BackendRow>, EditorError> {
        let session = require_session(session)?;
        Ok(self.backend.list_posts_for_user(session.user_id).await?)
    }
}

fn require_session(session: Option<&Session>) -> Result<&Session, EditorError> {
    session.ok_or(EditorError::Unauthorized)
}

fn ensure_non_empty(value: &str, field: &'static str) -> Result<(), EditorError> {
    if value.trim().is_empty() {
        return Err(EditorError::ConstraintViolation(field));
    }
    Ok(())
}

fn prepare_write(session: &Session, draft: PostDraft) -> Result<PostWrite, EditorError> {
    ensure_non_empty(&draft.title, "title")?;
    ensure_non_empty(&draft.content, "content")?;

    let description = draft
        .description
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default_description(&draft.title));

    Ok(PostWrite {
        title: draft.title,
        content: draft.content,
        description,
        cover_image: draft.cover_image.unwrap_or_default().trim().to_string(),
        tags: normalize_tags(draft.tags),
        published: draft.published,
        featured: draft.featured,
        user_id: session.user_id,
        updated_at: OffsetDateTime::now_utc(),
    })
}

fn default_description(title: &str) -> String {
    let mut description: String = title.chars().take(DESCRIPTION_CHARS).collect();
    description.push_str("...");
    description
}

/// Trimmed, non-blank, first occurrence kept.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !seen.iter().any(|existing| existing == tag) {
            seen.push(tag.to_string());
        }
    }
    seen
}
