mod articles;
mod search;

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, Method, StatusCode, header},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::instrument;

use crate::{
    config::Config,
    error::{Error, Result},
    state::AppState,
};

/// 设置应用的路由。
///
/// 健康检查、搜索接口和文章接口都挂在 `/api` 下，并绑定应用状态。
pub fn setup_route(app: AppState) -> Router {
    Router::new()
        .nest(
            "/api",
            Router::new()
                .route("/health", get(health))
                .merge(search::setup_route())
                .merge(articles::setup_route()),
        )
        .with_state(app)
}

/// 健康检查响应
#[derive(Debug, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub service: String,
}

/// 健康检查，总是返回 `healthy`
async fn health(State(app): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "healthy".to_string(),
        service: app.service_name().to_string(),
    })
}

/// 启动 HTTP 服务，并使用给定的路由处理请求。
///
/// 收到 Ctrl-C 后停止接收新连接，等待已有请求处理完毕再返回。
#[instrument(name = "http server", skip_all)]
pub async fn run_server_with_router(router: Router, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(%addr, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(Error::Io)
}

/// 启动 HTTP 服务，自动设置路由和中间件。
///
/// 1. 生成路由
/// 2. 添加日志、跨域和超时中间件
/// 3. 启动服务器
pub async fn run_server(app: AppState, config: &Config) -> Result<()> {
    let router = setup_route(app);
    let router = add_middlewares(router, config);
    run_server_with_router(router, config.listen_addr()).await
}

/// 为路由添加中间件，包括请求超时、跨域和失败日志记录。
///
/// 请求超时返回 504，响应体为空。
///
/// 日志记录会在请求失败时输出错误信息。
pub fn add_middlewares(router: Router, config: &Config) -> Router {
    fn log_failure(
        err: tower_http::classify::ServerErrorsFailureClass,
        _latency: std::time::Duration,
        _span: &tracing::Span,
    ) {
        tracing::error!(error = %err, "request failed");
    }

    router
        .layer(TimeoutLayer::with_status_code(
            StatusCode::GATEWAY_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(cors_layer(&config.cors_origins))
        .layer(
            TraceLayer::new_for_http()
                .on_failure(log_failure)
                // 关闭请求日志
                .on_request(()),
        )
}

/// 跨域配置，`origins` 为空时允许任意来源
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins.iter().filter_map(|origin| {
            HeaderValue::from_str(origin)
                .inspect_err(|_| tracing::warn!(origin = %origin, "ignoring invalid CORS origin"))
                .ok()
        }))
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::ACCEPT, header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(300))
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(e) => {
            tracing::error!(%e, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
