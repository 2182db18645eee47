//! Feed selection over the merged post sequence.
//!
//! Everything here is a pure function of its inputs: the bundled catalog, the
//! backend rows of the current fetch cycle and the active selector. Re-running
//! the pipeline on the same inputs yields the same snapshot.

use std::collections::HashSet;
use std::str::FromStr;

use blogspace_api_types::BackendRow;
use serde::{Deserialize, Serialize};

use crate::domain::entities::Post;
use crate::domain::error::DomainError;
use crate::domain::merge::merge_posts;
use crate::domain::normalize::{NormalizeOptions, normalize_backend, normalize_bundled};
use crate::domain::posts::BundledPost;
use crate::domain::tags::{ALL_LABEL, TagIndex};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FeedFilter {
    #[default]
    All,
    Tag(String),
}

impl FeedFilter {
    /// `None`, blank, `all` and the "all" label select every post.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => FeedFilter::All,
            Some(value) if value.eq_ignore_ascii_case("all") || value == ALL_LABEL => {
                FeedFilter::All
            }
            Some(value) => FeedFilter::Tag(value.to_string()),
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            FeedFilter::Tag(value) => Some(value.as_str()),
            FeedFilter::All => None,
        }
    }

    fn admits(&self, post: &Post) -> bool {
        post.published
            && match self {
                FeedFilter::All => true,
                FeedFilter::Tag(tag) => post.has_tag(tag),
            }
    }
}

/// How the hero post is chosen from the visible sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeaturedRule {
    /// First visible post flagged `featured`; no hero when none is flagged.
    #[default]
    Flagged,
    /// First visible post, flagged or not.
    Leading,
}

impl FromStr for FeaturedRule {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "flagged" => Ok(FeaturedRule::Flagged),
            "leading" => Ok(FeaturedRule::Leading),
            other => Err(DomainError::validation(format!(
                "unknown featured rule `{other}` (expected `flagged` or `leading`)"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Feed {
    pub featured: Option<Post>,
    pub posts: Vec<Post>,
}

/// Published posts admitted by `filter`, in merge order, with the featured
/// post lifted out of the regular list.
pub fn filter_feed(merged: &[Post], filter: &FeedFilter, rule: FeaturedRule) -> Feed {
    let visible: Vec<&Post> = merged.iter().filter(|post| filter.admits(post)).collect();

    let featured_index = match rule {
        FeaturedRule::Flagged => visible.iter().position(|post| post.featured),
        FeaturedRule::Leading => (!visible.is_empty()).then_some(0),
    };

    let mut feed = Feed::default();
    for (index, post) in visible.into_iter().enumerate() {
        if Some(index) == featured_index {
            feed.featured = Some(post.clone());
        } else {
            feed.posts.push(post.clone());
        }
    }
    feed
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// No backend is configured.
    Offline,
    /// The listing request failed.
    Unavailable,
    /// The listing request did not finish in time.
    TimedOut,
}

/// Where the live half of a snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataSource {
    Live,
    Fallback { reason: FallbackReason },
}

impl DataSource {
    pub fn is_degraded(&self) -> bool {
        matches!(self, DataSource::Fallback { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedSnapshot {
    pub source: DataSource,
    pub filter: Option<String>,
    pub tags: TagIndex,
    pub featured: Option<Post>,
    pub posts: Vec<Post>,
    #[serde(skip)]
    pub merged: Vec<Post>,
    /// Backend rows skipped for missing `id`, `title` or `content`.
    #[serde(skip)]
    pub dropped_rows: usize,
    #[serde(skip)]
    live_ids: HashSet<String>,
}

impl FeedSnapshot {
    /// Whether the merged entry for `id` carries backend content.
    pub fn is_live(&self, id: &str) -> bool {
        self.live_ids.contains(id)
    }
}

pub fn build_snapshot(
    bundled: &[BundledPost],
    rows: Vec<BackendRow>,
    filter: &FeedFilter,
    options: &NormalizeOptions,
    rule: FeaturedRule,
    source: DataSource,
) -> FeedSnapshot {
    let total_rows = rows.len();
    let live: Vec<Post> = rows
        .into_iter()
        .filter(BackendRow::is_usable)
        .map(|row| normalize_backend(row, options))
        .collect();
    let dropped_rows = total_rows - live.len();
    let live_ids = live.iter().map(|post| post.id.clone()).collect();

    let merged = merge_posts(bundled.iter().map(normalize_bundled), live);
    let tags = TagIndex::from_posts(&merged);
    let Feed { featured, posts } = filter_feed(&merged, filter, rule);

    FeedSnapshot {
        source,
        filter: filter.tag().map(str::to_string),
        tags,
        featured,
        posts,
        merged,
        dropped_rows,
        live_ids,
    }
}

/// Published posts on either side of `id` in merge order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Adjacent {
    pub previous: Option<Post>,
    pub next: Option<Post>,
}

pub fn neighbors(merged: &[Post], id: &str) -> Adjacent {
    let published: Vec<&Post> = merged.iter().filter(|post| post.published).collect();
    let Some(index) = published.iter().position(|post| post.id == id) else {
        return Adjacent::default();
    };

    Adjacent {
        previous: index
            .checked_sub(1)
            .and_then(|prev| published.get(prev))
            .map(|post| (*post).clone()),
        next: published.get(index + 1).map(|post| (*post).clone()),
    }
}
