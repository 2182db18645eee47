use std::sync::Arc;
use std::time::Duration;

use blogspace_api_types::BackendRow;
use metrics::counter;
use serde::Serialize;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::application::repos::{BackendError, PostsBackend};
use crate::domain::entities::Post;
use crate::domain::feed::{
    Adjacent, DataSource, FallbackReason, FeaturedRule, FeedFilter, FeedSnapshot, build_snapshot,
    neighbors,
};
use crate::domain::normalize::{NormalizeOptions, normalize_backend, normalize_bundled};
use crate::domain::posts::{self, BundledPost};

const SOURCE: &str = "application::feed::FeedService";

pub const METRIC_FEED_FALLBACK: &str = "blogspace_feed_fallback_total";
pub const METRIC_ROWS_DROPPED: &str = "blogspace_feed_rows_dropped_total";
pub const METRIC_LOOKUP_FALLBACK: &str = "blogspace_lookup_fallback_total";

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PostOrigin {
    Backend,
    Bundled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found { post: Post, origin: PostOrigin },
    NotFound,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    pub post: Post,
    pub origin: PostOrigin,
    #[serde(flatten)]
    pub adjacent: Adjacent,
}

#[derive(Clone)]
pub struct FeedService {
    backend: Option<Arc<dyn PostsBackend>>,
    bundled: &'static [BundledPost],
    options: NormalizeOptions,
    rule: FeaturedRule,
    fetch_timeout: Duration,
}

impl FeedService {
    pub fn new(
        backend: Option<Arc<dyn PostsBackend>>,
        options: NormalizeOptions,
        rule: FeaturedRule,
    ) -> Self {
        Self {
            backend,
            bundled: posts::all(),
            options,
            rule,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    pub fn with_bundled(mut self, bundled: &'static [BundledPost]) -> Self {
        self.bundled = bundled;
        self
    }

    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    /// Fetch the live listing once and build the feed for `filter`.
    ///
    /// Never fails: when the backend is absent, erroring, or slow, the
    /// snapshot is built from the bundled catalog alone and marked as a fallback.
    pub async fn load(&self, filter: FeedFilter) -> FeedSnapshot {
        let (rows, source) = self.fetch_rows().await;
        let snapshot = build_snapshot(
            self.bundled,
            rows,
            &filter,
            &self.options,
            self.rule,
            source,
        );

        if snapshot.dropped_rows > 0 {
            debug!(
                target = SOURCE,
                dropped = snapshot.dropped_rows,
                "skipped backend rows without id, title or content"
            );
            counter!(METRIC_ROWS_DROPPED).increment(snapshot.dropped_rows as u64);
        }
        snapshot
    }

    async fn fetch_rows(&self) -> (Vec<BackendRow>, DataSource) {
        let Some(backend) = self.backend.as_ref() else {
            return (
                Vec::new(),
                DataSource::Fallback {
                    reason: FallbackReason::Offline,
                },
            );
        };

        let reason = match timeout(self.fetch_timeout, backend.list_published_posts()).await {
            Ok(Ok(rows)) => return (rows, DataSource::Live),
            Ok(Err(err)) => {
                warn!(
                    target = SOURCE,
                    error = %err,
                    "backend listing failed; serving bundled posts"
                );
                FallbackReason::Unavailable
            }
            Err(_) => {
                warn!(
                    target = SOURCE,
                    timeout_ms = self.fetch_timeout.as_millis() as u64,
                    "backend listing timed out; serving bundled posts"
                );
                FallbackReason::TimedOut
            }
        };

        counter!(METRIC_FEED_FALLBACK).increment(1);
        (Vec::new(), DataSource::Fallback { reason })
    }

    /// Resolve one post: the backend first, then the bundled catalog.
    pub async fn lookup(&self, id: &str) -> LookupOutcome {
        if let Some(row) = self.fetch_row(id).await {
            return LookupOutcome::Found {
                post: normalize_backend(row, &self.options),
                origin: PostOrigin::Backend,
            };
        }

        match posts::find_by_id(self.bundled, id) {
            Some(post) => LookupOutcome::Found {
                post: normalize_bundled(post),
                origin: PostOrigin::Bundled,
            },
            None => LookupOutcome::NotFound,
        }
    }

    async fn fetch_row(&self, id: &str) -> Option<BackendRow> {
        let backend = self.backend.as_ref()?;
        let result = match timeout(self.fetch_timeout, backend.get_post_by_id(id)).await {
            Ok(result) => result,
            Err(_) => Err(BackendError::Timeout),
        };

        match result {
            Ok(Some(row)) if row.is_usable() => Some(row),
            Ok(Some(_)) => {
                debug!(target = SOURCE, id, "backend row is incomplete; trying bundled posts");
                None
            }
            Ok(None) => None,
            Err(err) => {
                warn!(
                    target = SOURCE,
                    id,
                    error = %err,
                    "backend lookup failed; trying bundled posts"
                );
                counter!(METRIC_LOOKUP_FALLBACK).increment(1);
                None
            }
        }
    }

    /// A post together with its published neighbours in merge order.
    ///
    /// Served from one listing fetch; only ids absent from the listing, such
    /// as drafts, cost a second by-id request.
    pub async fn detail(&self, id: &str) -> Option<PostDetail> {
        let snapshot = self.load(FeedFilter::All).await;
        let adjacent = neighbors(&snapshot.merged, id);

        if let Some(post) = snapshot.merged.iter().find(|post| post.id == id) {
            let origin = if snapshot.is_live(id) {
                PostOrigin::Backend
            } else {
                PostOrigin::Bundled
            };
            return Some(PostDetail {
                post: post.clone(),
                origin,
                adjacent,
            });
        }

        let LookupOutcome::Found { post, origin } = self.lookup(id).await else {
            return None;
        };
        Some(PostDetail {
            post,
            origin,
            adjacent,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use blogspace_api_types::PostWrite;
    use time::macros::datetime;
    use uuid::Uuid;

    use super::*;
    use crate::domain::posts::BundledAuthor;

    #[derive(Default)]
    struct StubBackend {
        rows: Vec<BackendRow>,
        fail: bool,
        delay: Option<Duration>,
        listings: AtomicUsize,
        lookups: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl PostsBackend for StubBackend {
        async fn list_published_posts(&self) -> Result<Vec<BackendRow>, BackendError> {
            self.listings.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(BackendError::fetch("connection refused"));
            }
            Ok(self.rows.clone())
        }

        async fn get_post_by_id(&self, id: &str) -> Result<Option<BackendRow>, BackendError> {
            self.lookups.lock().unwrap().push(id.to_string());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(BackendError::fetch("connection refused"));
            }
            Ok(self.rows.iter().find(|row| row.id == id).cloned())
        }

        async fn get_post_for_user(
            &self,
            _id: &str,
            _user_id: Uuid,
        ) -> Result<Option<BackendRow>, BackendError> {
            unreachable!("not used in these tests")
        }

        async fn list_posts_for_user(
            &self,
            _user_id: Uuid,
        ) -> Result<Vec<BackendRow>, BackendError> {
            unreachable!("not used in these tests")
        }

        async fn create_post(&self, _fields: PostWrite) -> Result<BackendRow, BackendError> {
            unreachable!("not used in these tests")
        }

        async fn update_post(
            &self,
            _id: &str,
            _fields: PostWrite,
        ) -> Result<BackendRow, BackendError> {
            unreachable!("not used in these tests")
        }

        async fn delete_post(&self, _id: &str, _user_id: Uuid) -> Result<(), BackendError> {
            unreachable!("not used in these tests")
        }
    }

    fn row(id: &str, title: &str) -> BackendRow {
        BackendRow {
            id: id.to_string(),
            title: title.to_string(),
            content: format!("{title} body"),
            description: None,
            cover_image: None,
            tags: Some(vec!["职场".to_string()]),
            published: true,
            featured: None,
            reading_time: None,
            created_at: datetime!(2024-03-04 20:00 UTC),
            updated_at: datetime!(2024-03-04 20:00 UTC),
            user_id: None,
        }
    }

    fn service(backend: StubBackend) -> FeedService {
        FeedService::new(
            Some(Arc::new(backend)),
            NormalizeOptions::default(),
            FeaturedRule::Flagged,
        )
    }

    fn ids(posts: &[Post]) -> Vec<&str> {
        posts.iter().map(|post| post.id.as_str()).collect()
    }

    #[tokio::test]
    async fn live_rows_merge_into_feed() {
        let snapshot = service(StubBackend {
            rows: vec![row("6", "fresh"), row("3", "rewritten")],
            ..StubBackend::default()
        })
        .load(FeedFilter::All)
        .await;

        assert_eq!(snapshot.source, DataSource::Live);
        assert_eq!(ids(&snapshot.merged), ["1", "2", "3", "4", "5", "6"]);
        assert_eq!(snapshot.merged[2].title, "rewritten");
        assert_eq!(ids(&snapshot.posts), ["2", "3", "4", "5", "6"]);
    }

    #[tokio::test]
    async fn failing_backend_falls_back_to_bundled() {
        let snapshot = service(StubBackend {
            rows: vec![row("6", "fresh")],
            fail: true,
            ..StubBackend::default()
        })
        .load(FeedFilter::All)
        .await;

        assert_eq!(
            snapshot.source,
            DataSource::Fallback {
                reason: FallbackReason::Unavailable
            }
        );
        assert_eq!(ids(&snapshot.merged), ["1", "2", "3", "4", "5"]);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_backend_times_out() {
        let snapshot = service(StubBackend {
            rows: vec![row("6", "fresh")],
            delay: Some(Duration::from_secs(60)),
            ..StubBackend::default()
        })
        .with_fetch_timeout(Duration::from_secs(2))
        .load(FeedFilter::All)
        .await;

        assert_eq!(
            snapshot.source,
            DataSource::Fallback {
                reason: FallbackReason::TimedOut
            }
        );
        assert_eq!(snapshot.merged.len(), 5);
    }

    #[tokio::test]
    async fn without_backend_feed_is_offline() {
        let snapshot = FeedService::new(None, NormalizeOptions::default(), FeaturedRule::Flagged)
            .load(FeedFilter::parse(Some("设计")))
            .await;

        assert!(snapshot.source.is_degraded());
        assert_eq!(snapshot.filter.as_deref(), Some("设计"));
        assert_eq!(snapshot.featured.map(|post| post.id), Some("1".to_string()));
        assert!(snapshot.posts.is_empty());
    }

    #[tokio::test]
    async fn lookup_prefers_backend_row() {
        let outcome = service(StubBackend {
            rows: vec![row("3", "rewritten")],
            ..StubBackend::default()
        })
        .lookup("3")
        .await;

        match outcome {
            LookupOutcome::Found { post, origin } => {
                assert_eq!(origin, PostOrigin::Backend);
                assert_eq!(post.title, "rewritten");
            }
            LookupOutcome::NotFound => panic!("post 3 should resolve"),
        }
    }

    #[tokio::test]
    async fn lookup_falls_back_to_bundled_on_miss_and_error() {
        for fail in [false, true] {
            let outcome = service(StubBackend {
                fail,
                ..StubBackend::default()
            })
            .lookup("2")
            .await;

            match outcome {
                LookupOutcome::Found { post, origin } => {
                    assert_eq!(origin, PostOrigin::Bundled);
                    assert_eq!(post.id, "2");
                }
                LookupOutcome::NotFound => panic!("bundled post 2 should resolve"),
            }
        }
    }

    #[tokio::test]
    async fn lookup_reports_not_found() {
        let backend = Arc::new(StubBackend::default());
        let service = FeedService::new(
            Some(backend.clone()),
            NormalizeOptions::default(),
            FeaturedRule::Flagged,
        );

        assert_eq!(service.lookup("404").await, LookupOutcome::NotFound);
        assert_eq!(backend.lookups.lock().unwrap().as_slice(), ["404"]);
    }

    #[tokio::test]
    async fn detail_links_neighbours() {
        let detail = service(StubBackend {
            rows: vec![row("6", "fresh")],
            ..StubBackend::default()
        })
        .detail("5")
        .await
        .expect("post 5 exists");

        assert_eq!(detail.adjacent.previous.map(|post| post.id), Some("4".to_string()));
        assert_eq!(detail.adjacent.next.map(|post| post.id), Some("6".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_lookup_falls_back_to_bundled() {
        let outcome = service(StubBackend {
            rows: vec![row("2", "live two")],
            delay: Some(Duration::from_secs(60)),
            ..StubBackend::default()
        })
        .with_fetch_timeout(Duration::from_secs(2))
        .lookup("2")
        .await;

        match outcome {
            LookupOutcome::Found { post, origin } => {
                assert_eq!(origin, PostOrigin::Bundled);
                assert_eq!(post.title, posts::all()[1].title);
            }
            LookupOutcome::NotFound => panic!("bundled post 2 should resolve"),
        }
    }

    #[tokio::test]
    async fn incomplete_backend_row_does_not_shadow_bundled_post() {
        let outcome = service(StubBackend {
            rows: vec![row("3", "  ")],
            ..StubBackend::default()
        })
        .lookup("3")
        .await;

        match outcome {
            LookupOutcome::Found { post, origin } => {
                assert_eq!(origin, PostOrigin::Bundled);
                assert_eq!(post.title, posts::all()[2].title);
            }
            LookupOutcome::NotFound => panic!("bundled post 3 should resolve"),
        }
    }

    static CUSTOM_CATALOG: [BundledPost; 2] = [
        BundledPost {
            id: "a",
            title: "first",
            description: "first post",
            content: "first body",
            date: "2024-01-01",
            author: BundledAuthor {
                name: "author",
                avatar: None,
            },
            cover_image: "https://cdn.example/a.png",
            reading_time: "1 分钟",
            tags: &["notes"],
            featured: false,
        },
        BundledPost {
            id: "b",
            title: "second",
            description: "second post",
            content: "second body",
            date: "2024-01-02",
            author: BundledAuthor {
                name: "author",
                avatar: None,
            },
            cover_image: "https://cdn.example/b.png",
            reading_time: "2 分钟",
            tags: &["notes", "rust"],
            featured: true,
        },
    ];

    #[tokio::test]
    async fn custom_catalog_replaces_bundled_posts() {
        let service = FeedService::new(None, NormalizeOptions::default(), FeaturedRule::Flagged)
            .with_bundled(&CUSTOM_CATALOG);

        let snapshot = service.load(FeedFilter::All).await;
        assert_eq!(ids(&snapshot.merged), ["a", "b"]);
        assert_eq!(snapshot.featured.map(|post| post.id), Some("b".to_string()));
        assert_eq!(snapshot.tags.count("notes"), 2);

        assert!(matches!(
            service.lookup("a").await,
            LookupOutcome::Found {
                origin: PostOrigin::Bundled,
                ..
            }
        ));
        assert_eq!(service.lookup("1").await, LookupOutcome::NotFound);
    }

    #[tokio::test]
    async fn detail_is_served_from_one_listing() {
        let backend = Arc::new(StubBackend {
            rows: vec![row("6", "fresh")],
            ..StubBackend::default()
        });
        let service = FeedService::new(
            Some(backend.clone()),
            NormalizeOptions::default(),
            FeaturedRule::Flagged,
        );

        let bundled = service.detail("5").await.expect("post 5 exists");
        assert_eq!(bundled.origin, PostOrigin::Bundled);
        let live = service.detail("6").await.expect("post 6 exists");
        assert_eq!(live.origin, PostOrigin::Backend);
        assert_eq!(live.adjacent.previous.map(|post| post.id), Some("5".to_string()));

        assert_eq!(backend.listings.load(Ordering::SeqCst), 2);
        assert!(backend.lookups.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn detail_looks_up_ids_missing_from_listing() {
        let backend = Arc::new(StubBackend::default());
        let service = FeedService::new(
            Some(backend.clone()),
            NormalizeOptions::default(),
            FeaturedRule::Flagged,
        );

        assert!(service.detail("404").await.is_none());
        assert_eq!(backend.listings.load(Ordering::SeqCst), 1);
        assert_eq!(backend.lookups.lock().unwrap().as_slice(), ["404"]);
    }
}
