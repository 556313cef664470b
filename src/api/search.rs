use axum::{
    Json, Router,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    routing::post,
};
use serde::Deserialize;

use crate::{
    error::{Error, Result},
    service::SearchResponse,
    state::AppState,
};

/// 配置搜索路由。
///
/// - `POST /search-query`：提交提问
pub fn setup_route() -> Router<AppState> {
    Router::new().route("/search-query", post(search_query))
}

/// 搜索请求体
#[derive(Debug, Deserialize)]
struct SearchRequest {
    /// 缺省时视为空字符串，由校验返回 400
    #[serde(default)]
    query: String,
}

/// 提交一次提问。
///
/// 请求体按 JSON 解析，不检查 `Content-Type`。
/// 请求体无法解析或提问为空白时返回 400，此时不会写入任何记录。
/// 提问文本原样交给 [`crate::service::SearchService`]。
async fn search_query(
    State(app): State<AppState>,
    body: core::result::Result<Bytes, BytesRejection>,
) -> Result<Json<SearchResponse>> {
    let body = body.map_err(|rejection| Error::BadRequest {
        error: "Invalid JSON",
        message: Some(rejection.body_text()),
    })?;
    let request: SearchRequest =
        serde_json::from_slice(&body).map_err(|e| Error::BadRequest {
            error: "Invalid JSON",
            message: Some(e.to_string()),
        })?;

    if request.query.trim().is_empty() {
        return Err(Error::BadRequest {
            error: "Query is required",
            message: None,
        });
    }

    let response = app.search().process_search_query(&request.query).await?;
    Ok(Json(response))
}
