use std::io;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{
    analyzer::AnalyzeError, config::ConfigError, service::SearchError, storage::StorageError,
};

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// 请求参数错误，在访问存储之前返回
    #[error("{error}")]
    BadRequest {
        error: &'static str,
        message: Option<String>,
    },

    #[error("{0}")]
    NotFound(&'static str),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("{context}: {source}")]
    Storage {
        context: &'static str,
        #[source]
        source: StorageError,
    },

    #[error(transparent)]
    Analyze(#[from] AnalyzeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<StorageError> for Error {
    fn from(source: StorageError) -> Self {
        Error::Storage {
            context: "storage error",
            source,
        }
    }
}

/// 错误响应体，`message` 为空时不输出
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            Error::BadRequest { error, message } => (StatusCode::BAD_REQUEST, error, message),
            Error::NotFound(error) => (StatusCode::NOT_FOUND, error, None),
            Error::Search(e) => {
                tracing::error!(error = %e, "search query failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to process search query",
                    Some(e.step().to_string()),
                )
            }
            Error::Storage { context, source } => {
                tracing::error!(error = %source, context, "storage error");
                (StatusCode::INTERNAL_SERVER_ERROR, context, None)
            }
            Error::Analyze(e) => {
                tracing::error!(%e, "analyzer error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", None)
            }
            Error::Config(e) => {
                tracing::error!(%e, "config error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", None)
            }
            Error::Io(e) => {
                tracing::error!(%e, "io error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", None)
            }
        };

        (
            status,
            Json(ErrorBody {
                error: error.to_string(),
                message,
            }),
        )
            .into_response()
    }
}
