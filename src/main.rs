use std::{path::Path, process, sync::Arc};

use blogspace::{
    application::{
        editor::{PostEditorService, Session},
        error::AppError,
        feed::FeedService,
        repos::PostsBackend,
        uploads::{ImageUpload, ImageUploadService},
    },
    config,
    domain::{error::DomainError, feed::FeedFilter, tags::Category},
    infra::{error::InfraError, rest::RestBackend, telemetry},
};
use bytes::Bytes;
use serde::Serialize;
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;
use uuid::Uuid;

const SOURCE: &str = "blogspace::cli";

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    let report = error.report();
    let notice = error.presentation_message();

    if dispatcher::has_been_set() {
        error!(error = %report.summary(), notice, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %report.summary(), notice, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()?;
    let command = cli_args.command.unwrap_or_default();

    telemetry::init(&settings.logging)?;

    let backend = RestBackend::from_settings(&settings.backend)?.map(Arc::new);
    if backend.is_none() {
        info!(target = SOURCE, "no backend configured; using bundled posts");
    }

    let feed = FeedService::new(
        backend.clone().map(|backend| backend as Arc<dyn PostsBackend>),
        settings.feed.normalize_options(),
        settings.feed.featured_rule,
    )
    .with_fetch_timeout(settings.backend.request_timeout);

    match command {
        config::Command::Feed { tag } => {
            let snapshot = feed.load(FeedFilter::parse(tag.as_deref())).await;
            print_json(&snapshot)
        }
        config::Command::Tags => run_tags(&feed).await,
        config::Command::Show { id } => {
            let detail = feed
                .detail(&id)
                .await
                .ok_or_else(|| DomainError::not_found("post"))?;
            print_json(&detail)
        }
        config::Command::Mine { user } => run_mine(require_backend(backend)?, user).await,
        config::Command::Upload { file, content_type } => {
            let uploads = ImageUploadService::new(require_backend(backend)?, settings.uploads.max_bytes);
            run_upload(&uploads, &file, content_type).await
        }
    }
}

#[derive(Serialize)]
struct CategoryLine {
    label: String,
    count: usize,
}

async fn run_tags(feed: &FeedService) -> Result<(), AppError> {
    let snapshot = feed.load(FeedFilter::All).await;
    let published = snapshot.posts.len() + usize::from(snapshot.featured.is_some());

    let lines: Vec<CategoryLine> = snapshot
        .tags
        .categories()
        .into_iter()
        .map(|category| CategoryLine {
            label: category.label().to_string(),
            count: match category {
                Category::All => published,
                Category::Tag(name) => snapshot.tags.count(name),
            },
        })
        .collect();
    print_json(&lines)
}

async fn run_mine(backend: Arc<RestBackend>, user: Uuid) -> Result<(), AppError> {
    let editor = PostEditorService::new(backend);
    let rows = editor.list_mine(Some(&Session { user_id: user })).await?;
    info!(target = SOURCE, user = %user, count = rows.len(), "listed posts");
    print_json(&rows)
}

async fn run_upload(
    uploads: &ImageUploadService,
    file: &Path,
    content_type: Option<String>,
) -> Result<(), AppError> {
    let payload = tokio::fs::read(file).await.map_err(InfraError::from)?;
    let content_type = content_type.unwrap_or_else(|| {
        mime_guess::from_path(file)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    });
    let filename = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let uploaded = uploads
        .upload(ImageUpload {
            filename,
            content_type,
            payload: Bytes::from(payload),
        })
        .await?;
    print_json(&uploaded)
}

fn require_backend(backend: Option<Arc<RestBackend>>) -> Result<Arc<RestBackend>, AppError> {
    backend.ok_or_else(|| {
        AppError::Infra(InfraError::configuration(
            "backend.url must be set for this command",
        ))
    })
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| AppError::unexpected(format!("failed to encode output: {err}")))?;
    println!("{rendered}");
    Ok(())
}
