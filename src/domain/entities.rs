//! The unified post shape every downstream stage works with.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Author {
    pub name: String,
    pub avatar: Option<String>,
}

/// A post after normalization, regardless of whether it was bundled or fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub cover_image: String,
    pub tags: Vec<String>,
    pub date: String,
    pub reading_time: String,
    pub author: Author,
    pub published: bool,
    pub featured: bool,
}

impl Post {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|candidate| candidate == tag)
    }

    /// Cover to show when the stored image failed to load.
    pub fn cover_or<'a>(&'a self, placeholder: &'a str, load_failed: bool) -> &'a str {
        if load_failed || self.cover_image.trim().is_empty() {
            placeholder
        } else {
            &self.cover_image
        }
    }
}
