//! Wire records exchanged with the hosted blog backend.
//!
//! The `blog_posts` table is read and written through a PostgREST-style API;
//! these types mirror its column names exactly.

use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// A `blog_posts` row as delivered by the backend.
///
/// `id`, `title` and `content` tolerate `null` or absent values and come back
/// as empty strings; callers check [`BackendRow::is_usable`] before trusting them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendRow {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub featured: Option<bool>,
    #[serde(default)]
    pub reading_time: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

impl BackendRow {
    /// A row can enter the feed only when its identity, title and body are present.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        !self.id.trim().is_empty() && !self.title.trim().is_empty() && !self.content.trim().is_empty()
    }
}

/// Insert/update payload for the `blog_posts` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostWrite {
    pub title: String,
    pub content: String,
    pub description: String,
    pub cover_image: String,
    pub tags: Vec<String>,
    pub published: bool,
    pub featured: bool,
    pub user_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Response body of a storage object upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    #[serde(alias = "Key")]
    pub key: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}
