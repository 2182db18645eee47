//! Conversion of bundled and backend records into the shared [`Post`] shape.

use blogspace_api_types::BackendRow;
use chrono_tz::Tz;
use time::{format_description::BorrowedFormatItem, macros::format_description};

use crate::domain::entities::{Author, Post};
use crate::domain::posts::BundledPost;
use crate::util::timezone;

/// Calendar form used for backend timestamps, e.g. `2024/3/5`.
pub const DISPLAY_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]/[month padding:none]/[day padding:none]");

pub const DEFAULT_PLACEHOLDER_COVER: &str = "https://images.unsplash.com/photo-1499750310107-5fef28a66643?ixlib=rb-4.0.3&auto=format&fit=crop&w=2070&q=80";
pub const DEFAULT_READING_TIME: &str = "5 分钟";
pub const DEFAULT_AUTHOR_NAME: &str = "博主";
pub const DESCRIPTION_CHARS: usize = 100;

/// What a backend row with no tags receives.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EmptyTags {
    #[default]
    Empty,
    Category(String),
}

#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    pub placeholder_cover: String,
    pub default_reading_time: String,
    pub placeholder_author: String,
    pub empty_tags: EmptyTags,
    pub timezone: Tz,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            placeholder_cover: DEFAULT_PLACEHOLDER_COVER.to_string(),
            default_reading_time: DEFAULT_READING_TIME.to_string(),
            placeholder_author: DEFAULT_AUTHOR_NAME.to_string(),
            empty_tags: EmptyTags::Empty,
            timezone: chrono_tz::Asia::Shanghai,
        }
    }
}

pub enum RawPost<'a> {
    Bundled(&'a BundledPost),
    Backend(BackendRow),
}

pub fn normalize(raw: RawPost<'_>, options: &NormalizeOptions) -> Post {
    match raw {
        RawPost::Bundled(post) => normalize_bundled(post),
        RawPost::Backend(row) => normalize_backend(row, options),
    }
}

/// Bundled records pass through; they are published by construction.
pub fn normalize_bundled(post: &BundledPost) -> Post {
    Post {
        id: post.id.to_string(),
        title: post.title.to_string(),
        description: post.description.to_string(),
        content: post.content.to_string(),
        cover_image: post.cover_image.to_string(),
        tags: post.tags.iter().map(|tag| (*tag).to_string()).collect(),
        date: post.date.to_string(),
        reading_time: post.reading_time.to_string(),
        author: Author {
            name: post.author.name.to_string(),
            avatar: post.author.avatar.map(str::to_string),
        },
        published: true,
        featured: post.featured,
    }
}

/// Assumes a usable row; see [`BackendRow::is_usable`].
pub fn normalize_backend(row: BackendRow, options: &NormalizeOptions) -> Post {
    let date = format_display_date(row.created_at, options.timezone);
    let description = non_blank(row.description).unwrap_or_else(|| derive_description(&row.content));
    let cover_image =
        non_blank(row.cover_image).unwrap_or_else(|| options.placeholder_cover.clone());
    let reading_time =
        non_blank(row.reading_time).unwrap_or_else(|| options.default_reading_time.clone());
    let tags = match (row.tags, &options.empty_tags) {
        (Some(tags), _) if !tags.is_empty() => tags,
        (_, EmptyTags::Empty) => Vec::new(),
        (_, EmptyTags::Category(name)) => vec![name.clone()],
    };

    Post {
        id: row.id,
        title: row.title,
        description,
        content: row.content,
        cover_image,
        tags,
        date,
        reading_time,
        author: Author {
            name: options.placeholder_author.clone(),
            avatar: None,
        },
        published: row.published,
        featured: row.featured.unwrap_or(false),
    }
}

pub fn format_display_date(created_at: time::OffsetDateTime, tz: Tz) -> String {
    let date = timezone::localized_date(created_at, tz);
    date.format(DISPLAY_DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// Summary taken from the body text: headings are skipped, whitespace is
/// collapsed and the result is cut at [`DESCRIPTION_CHARS`] characters.
pub fn derive_description(content: &str) -> String {
    let text = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect::<Vec<_>>()
        .join(" ");

    if text.chars().count() <= DESCRIPTION_CHARS {
        return text;
    }
    let mut truncated: String = text.chars().take(DESCRIPTION_CHARS).collect();
    truncated.push_str("...");
    truncated
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|inner| !inner.trim().is_empty())
}
