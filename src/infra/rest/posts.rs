use async_trait::async_trait;
use blogspace_api_types::{BackendRow, PostWrite};
use reqwest::Method;
use serde_json::Value;
use uuid::Uuid;

use crate::application::repos::{BackendError, PostsBackend};

use super::{RestBackend, read_json, send};

const POSTS_PATH: &str = "rest/v1/blog_posts";
const NEWEST_FIRST: &str = "created_at.desc";

fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{value}")
}

#[async_trait]
impl PostsBackend for RestBackend {
    async fn list_published_posts(&self) -> Result<Vec<BackendRow>, BackendError> {
        let url = self.endpoint(
            POSTS_PATH,
            &[
                ("select", "*".to_string()),
                ("published", eq(true)),
                ("order", NEWEST_FIRST.to_string()),
            ],
        )?;
        read_json(send(self.request(Method::GET, url)).await?).await
    }

    async fn get_post_by_id(&self, id: &str) -> Result<Option<BackendRow>, BackendError> {
        let url = self.endpoint(
            POSTS_PATH,
            &[
                ("select", "*".to_string()),
                ("id", eq(id)),
                ("limit", "1".to_string()),
            ],
        )?;
        let rows: Vec<BackendRow> = read_json(send(self.request(Method::GET, url)).await?).await?;
        Ok(rows.into_iter().next())
    }

    async fn get_post_for_user(
        &self,
        id: &str,
        user_id: Uuid,
    ) -> Result<Option<BackendRow>, BackendError> {
        let url = self.endpoint(
            POSTS_PATH,
            &[
                ("select", "*".to_string()),
                ("id", eq(id)),
                ("user_id", eq(user_id)),
                ("limit", "1".to_string()),
            ],
        )?;
        let rows: Vec<BackendRow> = read_json(send(self.request(Method::GET, url)).await?).await?;
        Ok(rows.into_iter().next())
    }

    async fn list_posts_for_user(&self, user_id: Uuid) -> Result<Vec<BackendRow>, BackendError> {
        let url = self.endpoint(
            POSTS_PATH,
            &[
                ("select", "*".to_string()),
                ("user_id", eq(user_id)),
                ("order", NEWEST_FIRST.to_string()),
            ],
        )?;
        read_json(send(self.request(Method::GET, url)).await?).await
    }

    async fn create_post(&self, fields: PostWrite) -> Result<BackendRow, BackendError> {
        let url = self.endpoint(POSTS_PATH, &[("select", "*".to_string())])?;
        let request = self
            .request(Method::POST, url)
            .header("Prefer", "return=representation")
            .json(&[fields]);
        let rows: Vec<BackendRow> = read_json(send(request).await?).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| BackendError::fetch("insert returned no rows"))
    }

    /// Zero affected rows means the row is not the caller's to change.
    async fn update_post(&self, id: &str, fields: PostWrite) -> Result<BackendRow, BackendError> {
        let url = self.endpoint(
            POSTS_PATH,
            &[
                ("id", eq(id)),
                ("user_id", eq(fields.user_id)),
                ("select", "*".to_string()),
            ],
        )?;
        let request = self
            .request(Method::PATCH, url)
            .header("Prefer", "return=representation")
            .json(&fields);
        let rows: Vec<BackendRow> = read_json(send(request).await?).await?;
        rows.into_iter().next().ok_or(BackendError::Unauthorized)
    }

    async fn delete_post(&self, id: &str, user_id: Uuid) -> Result<(), BackendError> {
        let url = self.endpoint(POSTS_PATH, &[("id", eq(id)), ("user_id", eq(user_id))])?;
        let request = self
            .request(Method::DELETE, url)
            .header("Prefer", "return=representation");
        let rows: Vec<Value> = read_json(send(request).await?).await?;
        if rows.is_empty() {
            return Err(BackendError::Unauthorized);
        }
        Ok(())
    }
}
