//! Configuration layer: typed settings with layered precedence (file → env → CLI).

mod cli;


use std::{num::NonZeroU64, str::FromStr, time::Duration};

use chrono_tz::Tz;
use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

pub use cli::{CliArgs, Command, Overrides};

use crate::application::uploads::DEFAULT_MAX_IMAGE_BYTES;
use crate::domain::feed::FeaturedRule;
use crate::domain::normalize::{
    DEFAULT_AUTHOR_NAME, DEFAULT_PLACEHOLDER_COVER, DEFAULT_READING_TIME, EmptyTags,
    NormalizeOptions,
};
use crate::infra::rest::DEFAULT_BUCKET;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "blogspace";
const ENV_PREFIX: &str = "BLOGSPACE";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_TIMEZONE: Tz = chrono_tz::Asia::Shanghai;

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub backend: BackendSettings,
    pub feed: FeedSettings,
    pub uploads: UploadSettings,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

/// Hosted backend connection. Without a `url` the feed runs on bundled posts only.
#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub url: Option<Url>,
    pub anon_key: String,
    pub access_token: Option<String>,
    pub request_timeout: Duration,
    pub bucket: String,
}

#[derive(Debug, Clone)]
pub struct FeedSettings {
    pub featured_rule: FeaturedRule,
    pub timezone: Tz,
    pub placeholder_cover: String,
    pub default_reading_time: String,
    pub placeholder_author: String,
    pub default_category: Option<String>,
}

impl FeedSettings {
    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            placeholder_cover: self.placeholder_cover.clone(),
            default_reading_time: self.default_reading_time.clone(),
            placeholder_author: self.placeholder_author.clone(),
            empty_tags: self
                .default_category
                .clone()
                .map_or(EmptyTags::Empty, EmptyTags::Category),
            timezone: self.timezone,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub max_bytes: NonZeroU64,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    pub(crate) fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_overrides(&cli.overrides);
    Settings::from_raw(raw)
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    logging: RawLoggingSettings,
    backend: RawBackendSettings,
    feed: RawFeedSettings,
    uploads: RawUploadSettings,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
        if let Some(url) = overrides.backend_url.as_ref() {
            self.backend.url = Some(url.clone());
        }
        if let Some(seconds) = overrides.backend_timeout_seconds {
            self.backend.request_timeout_seconds = Some(seconds);
        }
        if let Some(rule) = overrides.featured_rule.as_ref() {
            self.feed.featured_rule = Some(rule.clone());
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            logging,
            backend,
            feed,
            uploads,
        } = raw;

        Ok(Self {
            logging: build_logging_settings(logging)?,
            backend: build_backend_settings(backend)?,
            feed: build_feed_settings(feed)?,
            uploads: build_upload_settings(uploads)?,
        })
    }
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_backend_settings(backend: RawBackendSettings) -> Result<BackendSettings, LoadError> {
    let url = non_blank(backend.url)
        .map(|value| {
            Url::parse(&value)
                .map_err(|err| LoadError::invalid("backend.url", format!("failed to parse: {err}")))
        })
        .transpose()?;

    if let Some(url) = url.as_ref()
        && !matches!(url.scheme(), "http" | "https")
    {
        return Err(LoadError::invalid(
            "backend.url",
            format!("unsupported scheme `{}`", url.scheme()),
        ));
    }

    let anon_key = non_blank(backend.anon_key).unwrap_or_default();
    if url.is_some() && anon_key.is_empty() {
        return Err(LoadError::invalid(
            "backend.anon_key",
            "required when backend.url is set",
        ));
    }

    let timeout_secs = backend
        .request_timeout_seconds
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
    if timeout_secs == 0 {
        return Err(LoadError::invalid(
            "backend.request_timeout_seconds",
            "must be greater than zero",
        ));
    }

    Ok(BackendSettings {
        url,
        anon_key,
        access_token: non_blank(backend.access_token),
        request_timeout: Duration::from_secs(timeout_secs),
        bucket: non_blank(backend.bucket).unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
    })
}

fn build_feed_settings(feed: RawFeedSettings) -> Result<FeedSettings, LoadError> {
    let featured_rule = match non_blank(feed.featured_rule) {
        Some(rule) => FeaturedRule::from_str(&rule)
            .map_err(|err| LoadError::invalid("feed.featured_rule", err.to_string()))?,
        None => FeaturedRule::default(),
    };

    let timezone = match non_blank(feed.timezone) {
        Some(name) => Tz::from_str(&name)
            .map_err(|err| LoadError::invalid("feed.timezone", err.to_string()))?,
        None => DEFAULT_TIMEZONE,
    };

    Ok(FeedSettings {
        featured_rule,
        timezone,
        placeholder_cover: non_blank(feed.placeholder_cover)
            .unwrap_or_else(|| DEFAULT_PLACEHOLDER_COVER.to_string()),
        default_reading_time: non_blank(feed.default_reading_time)
            .unwrap_or_else(|| DEFAULT_READING_TIME.to_string()),
        placeholder_author: non_blank(feed.placeholder_author)
            .unwrap_or_else(|| DEFAULT_AUTHOR_NAME.to_string()),
        default_category: non_blank(feed.default_category),
    })
}

fn build_upload_settings(uploads: RawUploadSettings) -> Result<UploadSettings, LoadError> {
    let max_bytes = uploads.max_bytes.unwrap_or(DEFAULT_MAX_IMAGE_BYTES);
    let max_bytes = NonZeroU64::new(max_bytes)
        .ok_or_else(|| LoadError::invalid("uploads.max_bytes", "must be greater than zero"))?;
    Ok(UploadSettings { max_bytes })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawBackendSettings {
    url: Option<String>,
    anon_key: Option<String>,
    access_token: Option<String>,
    request_timeout_seconds: Option<u64>,
    bucket: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawFeedSettings {
    featured_rule: Option<String>,
    timezone: Option<String>,
    placeholder_cover: Option<String>,
    default_reading_time: Option<String>,
    placeholder_author: Option<String>,
    default_category: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawUploadSettings {
    max_bytes: Option<u64>,
}
