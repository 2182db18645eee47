use std::sync::Arc;

use async_trait::async_trait;
use blogspace::application::feed::{FeedService, LookupOutcome, PostOrigin};
use blogspace::application::repos::{BackendError, PostsBackend};
use blogspace::domain::feed::{DataSource, FeaturedRule, FeedFilter, build_snapshot};
use blogspace::domain::normalize::NormalizeOptions;
use blogspace::domain::posts;
use blogspace_api_types::{BackendRow, PostWrite};
use time::macros::datetime;
use uuid::Uuid;

struct FixedBackend {
    rows: Vec<BackendRow>,
}

#[async_trait]
impl PostsBackend for FixedBackend {
    async fn list_published_posts(&self) -> Result<Vec<BackendRow>, BackendError> {
        Ok(self.rows.clone())
    }

    async fn get_post_by_id(&self, id: &str) -> Result<Option<BackendRow>, BackendError> {
        Ok(self.rows.iter().find(|row| row.id == id).cloned())
    }

    async fn get_post_for_user(
        &self,
        _id: &str,
        _user_id: Uuid,
    ) -> Result<Option<BackendRow>, BackendError> {
        Ok(None)
    }

    async fn list_posts_for_user(&self, _user_id: Uuid) -> Result<Vec<BackendRow>, BackendError> {
        Ok(Vec::new())
    }

    async fn create_post(&self, _fields: PostWrite) -> Result<BackendRow, BackendError> {
        Err(BackendError::Unauthorized)
    }

    async fn update_post(&self, _id: &str, _fields: PostWrite) -> Result<BackendRow, BackendError> {
        Err(BackendError::Unauthorized)
    }

    async fn delete_post(&self, _id: &str, _user_id: Uuid) -> Result<(), BackendError> {
        Err(BackendError::Unauthorized)
    }
}

fn row(id: &str, title: &str, tags: &[&str], published: bool) -> BackendRow {
    BackendRow {
        id: id.to_string(),
        title: title.to_string(),
        content: format!("{title} 的正文"),
        description: None,
        cover_image: None,
        tags: Some(tags.iter().map(|tag| tag.to_string()).collect()),
        published,
        featured: Some(false),
        reading_time: None,
        created_at: datetime!(2024-03-10 02:00 UTC),
        updated_at: datetime!(2024-03-10 02:00 UTC),
        user_id: Some(Uuid::nil()),
    }
}

fn service(rows: Vec<BackendRow>) -> FeedService {
    FeedService::new(
        Some(Arc::new(FixedBackend { rows })),
        NormalizeOptions::default(),
        FeaturedRule::Flagged,
    )
}

fn ids<'a>(posts: impl IntoIterator<Item = &'a blogspace::domain::entities::Post>) -> Vec<&'a str> {
    posts.into_iter().map(|post| post.id.as_str()).collect()
}

#[tokio::test]
async fn live_rows_merge_over_bundled_catalog() {
    let feed = service(vec![
        row("3", "后端改写的第三篇", &["技术"], true),
        row("6", "全新的第六篇", &["随笔"], true),
    ]);

    let snapshot = feed.load(FeedFilter::All).await;

    assert_eq!(snapshot.source, DataSource::Live);
    assert_eq!(ids(&snapshot.merged), ["1", "2", "3", "4", "5", "6"]);
    assert_eq!(snapshot.merged[2].title, "后端改写的第三篇");
    assert_eq!(snapshot.merged[2].content, "后端改写的第三篇 的正文");

    assert_eq!(snapshot.featured.as_ref().map(|post| post.id.as_str()), Some("1"));
    assert_eq!(ids(&snapshot.posts), ["2", "3", "4", "5", "6"]);
    assert!(snapshot.tags.contains("随笔"));
}

#[tokio::test]
async fn tag_filter_admits_exactly_published_matches() {
    let feed = service(vec![
        row("6", "草稿", &["技术"], false),
        row("7", "技术新篇", &["技术"], true),
    ]);

    for tag in ["技术", "随笔", "不存在的标签"] {
        let snapshot = feed.load(FeedFilter::parse(Some(tag))).await;
        let visible: Vec<_> = snapshot
            .featured
            .iter()
            .chain(snapshot.posts.iter())
            .collect();

        let expected: Vec<&str> = snapshot
            .merged
            .iter()
            .filter(|post| post.published && post.has_tag(tag))
            .map(|post| post.id.as_str())
            .collect();
        let mut actual = ids(visible.iter().copied());
        actual.sort_unstable();
        let mut expected_sorted = expected.clone();
        expected_sorted.sort_unstable();

        assert_eq!(actual, expected_sorted, "tag {tag}");
        assert!(!actual.contains(&"6"), "draft leaked for tag {tag}");
    }
}

#[tokio::test]
async fn lookup_falls_back_to_bundled_posts() {
    let feed = service(vec![row("6", "全新的第六篇", &["随笔"], true)]);

    let LookupOutcome::Found { post, origin } = feed.lookup("2").await else {
        panic!("bundled post 2 resolves");
    };
    assert_eq!(origin, PostOrigin::Bundled);
    assert_eq!(post.id, "2");

    let LookupOutcome::Found { origin, .. } = feed.lookup("6").await else {
        panic!("backend post 6 resolves");
    };
    assert_eq!(origin, PostOrigin::Backend);

    assert_eq!(feed.lookup("404").await, LookupOutcome::NotFound);
}

#[test]
fn refetching_the_same_rows_is_idempotent() {
    let rows = vec![row("3", "后端改写的第三篇", &["技术"], true)];
    let once = build_snapshot(
        posts::all(),
        rows.clone(),
        &FeedFilter::All,
        &NormalizeOptions::default(),
        FeaturedRule::Flagged,
        DataSource::Live,
    );
    let twice = build_snapshot(
        posts::all(),
        rows.iter().chain(rows.iter()).cloned().collect(),
        &FeedFilter::All,
        &NormalizeOptions::default(),
        FeaturedRule::Flagged,
        DataSource::Live,
    );

    assert_eq!(once.merged, twice.merged);
}
