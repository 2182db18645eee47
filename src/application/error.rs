use std::error::Error as StdError;

use thiserror::Error;

use crate::{
    application::{editor::EditorError, uploads::UploadError},
    config::LoadError,
    domain::error::DomainError,
    infra::error::InfraError,
};

/// An error flattened into its source chain, for a generic failure notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub source: &'static str,
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(source: &'static str, error: &dyn StdError) -> Self {
        let mut messages = vec![error.to_string()];
        let mut current = error.source();
        while let Some(inner) = current {
            messages.push(inner.to_string());
            current = inner.source();
        }
        Self { source, messages }
    }

    pub fn summary(&self) -> String {
        self.messages.join(": ")
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("failed to load configuration")]
    Config(#[from] LoadError),
    #[error(transparent)]
    Editor(#[from] EditorError),
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }

    /// Short text suitable for an end-user notification.
    pub fn presentation_message(&self) -> &'static str {
        match self {
            AppError::Domain(DomainError::NotFound { .. }) => "文章不存在",
            AppError::Editor(EditorError::Unauthorized) => "请先登录",
            AppError::Editor(EditorError::ConstraintViolation(_))
            | AppError::Domain(DomainError::Validation { .. }) => "标题和内容不能为空",
            AppError::Upload(UploadError::UnsupportedMediaType { .. }) => "只能上传图片文件",
            AppError::Upload(UploadError::PayloadTooLarge { .. }) => "图片大小不能超过限制",
            AppError::Upload(_) => "文件上传失败",
            AppError::Config(_) | AppError::Infra(_) => "服务配置错误",
            AppError::Editor(_) | AppError::Unexpected(_) => "操作失败，请稍后重试",
        }
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport::from_error("application::error::AppError", self)
    }
}
