//! Hosted-backend adapters speaking the PostgREST and object-storage HTTP APIs.

mod posts;
mod storage;


use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::application::repos::BackendError;
use crate::config::BackendSettings;
use crate::infra::error::InfraError;

pub const DEFAULT_BUCKET: &str = "blog-images";

#[derive(Clone, Debug)]
pub struct RestBackend {
    client: Client,
    base: Url,
    anon_key: String,
    access_token: Option<String>,
    bucket: String,
    request_timeout: Duration,
}

impl RestBackend {
    pub fn new(base: Url, anon_key: impl Into<String>) -> Result<Self, InfraError> {
        let client = Client::builder()
            .user_agent(Self::user_agent())
            .build()
            .map_err(|err| InfraError::http_client(err.to_string()))?;

        Ok(Self {
            client,
            base: with_trailing_slash(base),
            anon_key: anon_key.into(),
            access_token: None,
            bucket: DEFAULT_BUCKET.to_string(),
            request_timeout: crate::application::feed::DEFAULT_FETCH_TIMEOUT,
        })
    }

    /// `None` when no backend URL is configured.
    pub fn from_settings(settings: &BackendSettings) -> Result<Option<Self>, InfraError> {
        let Some(url) = settings.url.clone() else {
            return Ok(None);
        };
        let backend = Self::new(url, settings.anon_key.clone())?
            .with_bucket(settings.bucket.clone())
            .with_request_timeout(settings.request_timeout);
        Ok(Some(match settings.access_token.clone() {
            Some(token) => backend.with_access_token(token),
            None => backend,
        }))
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn user_agent() -> &'static str {
        concat!("blogspace/", env!("CARGO_PKG_VERSION"))
    }

    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url, BackendError> {
        let mut url = self.base.join(path).map_err(BackendError::fetch)?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Every request carries the project key; the bearer is the user's
    /// access token when signed in and the project key otherwise.
    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let bearer = self.access_token.as_deref().unwrap_or(&self.anon_key);
        self.client
            .request(method, url)
            .timeout(self.request_timeout)
            .header("apikey", self.anon_key.as_str())
            .bearer_auth(bearer)
    }
}

fn with_trailing_slash(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

async fn send(request: RequestBuilder) -> Result<Response, BackendError> {
    request.send().await.map_err(transport_error)
}

fn transport_error(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        BackendError::Timeout
    } else {
        BackendError::fetch(err)
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    let status = response.status();
    let bytes = response.bytes().await.map_err(transport_error)?;
    if !status.is_success() {
        return Err(status_error(status, &String::from_utf8_lossy(&bytes)));
    }
    serde_json::from_slice(&bytes)
        .map_err(|err| BackendError::Fetch(format!("failed to parse body: {err}")))
}

fn status_error(status: StatusCode, body: &str) -> BackendError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BackendError::Unauthorized,
        StatusCode::NOT_FOUND => BackendError::NotFound,
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            BackendError::Validation(error_message(body))
        }
        StatusCode::PAYLOAD_TOO_LARGE => BackendError::PayloadTooLarge,
        StatusCode::UNSUPPORTED_MEDIA_TYPE => BackendError::UnsupportedMediaType(error_message(body)),
        _ => BackendError::Fetch(format!("status {status} body {body}")),
    }
}

/// The `message` field of a JSON error body, or the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
