use axum::{
    Json, Router,
    extract::{Path, State, rejection::PathRejection},
    routing::get,
};

use crate::{
    error::{Error, Result},
    state::AppState,
    storage::Article,
};

/// 配置文章相关路由。
///
/// 路由包括：
/// - `GET /articles`：全部文章
/// - `GET /articles/{id}`：获取单篇文章
pub fn setup_route() -> Router<AppState> {
    Router::new()
        .route("/articles", get(articles_list))
        .route("/articles/{id}", get(article))
}

/// 获取全部文章，按 ID 升序。
async fn articles_list(State(app): State<AppState>) -> Result<Json<Vec<Article>>> {
    app.search()
        .articles()
        .await
        .map(Json)
        .map_err(|source| Error::Storage {
            context: "Failed to get articles",
            source,
        })
}

/// 根据 ID 获取单篇文章。
///
/// ID 不是整数（包括无法解码的路径）时返回 [`Error::BadRequest`]，
/// 文章不存在返回 [`Error::NotFound`]。
async fn article(
    path: core::result::Result<Path<String>, PathRejection>,
    State(app): State<AppState>,
) -> Result<Json<Article>> {
    let invalid = || Error::BadRequest {
        error: "Invalid article ID",
        message: None,
    };
    let Path(id) = path.map_err(|_| invalid())?;
    let id: i64 = id.parse().map_err(|_| invalid())?;

    match app.search().article(id).await {
        Ok(article) => Ok(Json(article)),
        Err(e) if e.is_not_found() => Err(Error::NotFound("Article not found")),
        Err(source) => Err(Error::Storage {
            context: "Failed to get article",
            source,
        }),
    }
}
