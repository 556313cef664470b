use std::time::Duration;

use axum::{
    Router,
    body::{Body, to_bytes},
    extract::Request,
    http::{Response, StatusCode, header},
    routing::get,
};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::util::ServiceExt;

use helpdesk::{
    analyzer::{AnalyzerKind, KeywordAnalyzer},
    api,
    config::Config,
    state::AppState,
    storage::{DBPool, Storage, new_db_pool},
};

struct TestApp {
    router: Router,
    pool: DBPool,
    _dir: TempDir,
}

impl TestApp {
    async fn new() -> Self {
        let dir = tempfile::tempdir().expect("创建临时目录失败");
        let pool = new_db_pool(dir.path().join("helpdesk.db"))
            .await
            .expect("打开数据库失败");
        pool.initialize().await.expect("初始化数据库失败");

        let app = AppState::new(
            pool.clone(),
            AnalyzerKind::Keyword(KeywordAnalyzer::default()),
            "helpdesk-test",
        );

        let router = api::setup_route(app);

        Self {
            router,
            pool,
            _dir: dir,
        }
    }

    pub async fn request(&self, req: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(req)
            .await
            .expect("oneshot fail")
    }
}

impl TestApp {
    async fn json(&self, req: Request<Body>) -> (StatusCode, Value) {
        let resp = self.request(req).await;
        let status = resp.status();
        let data = to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("读取数据失败");
        let json = serde_json::from_slice(&data).expect("反序列化失败");
        (status, json)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let req = Request::get(uri).body(Body::empty()).expect("请求失败");
        self.json(req).await
    }

    async fn search_raw(&self, body: impl Into<Body>) -> (StatusCode, Value) {
        let req = Request::post("/api/search-query")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .expect("请求失败");
        self.json(req).await
    }

    async fn search(&self, query: &str) -> (StatusCode, Value) {
        self.search_raw(json!({ "query": query }).to_string()).await
    }

    async fn query_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM queries")
            .fetch_one(&self.pool)
            .await
            .expect("查询失败")
    }
}

fn article_ids(json: &Value) -> Vec<i64> {
    json.as_array()
        .expect("应为数组")
        .iter()
        .map(|a| a["id"].as_i64().expect("id 应为整数"))
        .collect()
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;

    let (status, json) = app.get("/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "status": "healthy", "service": "helpdesk-test" }));
}

#[tokio::test]
async fn test_search_password() {
    let app = TestApp::new().await;

    let (status, json) = app.search("How do I reset my password?").await;

    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json["query"], "How do I reset my password?");
    assert!(json["ai_summary_answer"].as_str().unwrap().contains("password"));

    let ids = article_ids(&json["ai_relevant_articles"]);
    assert!(ids.contains(&1), "应包含密码重置文章");
    assert_eq!(
        json["ai_relevant_articles"][0]["title"],
        "Password Reset Instructions"
    );

    let query_id = json["query_id"].as_i64().expect("query_id 应为整数");
    let timestamp = json["timestamp"].as_str().expect("timestamp 应为字符串");
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok(), "{timestamp}");

    // 分析结果已持久化，且与返回的文章一致
    let result = app.pool.search_result_by_query(query_id).await.unwrap();
    assert_eq!(result.ai_relevant_articles, ids);
    assert_eq!(result.ai_summary_answer, json["ai_summary_answer"]);
}

#[tokio::test]
async fn test_search_unrelated() {
    let app = TestApp::new().await;

    let (status, json) = app.search("random unrelated question").await;

    assert_eq!(status, StatusCode::OK);
    assert!(!json["ai_summary_answer"].as_str().unwrap().is_empty());
    assert_eq!(json["ai_relevant_articles"], json!([]));
}

#[tokio::test]
async fn test_search_accepts_unicode() {
    let app = TestApp::new().await;
    let query = "Mon imprimante 🖨️ ne marche pas - printer?! \"quoted\" <b>";

    let (status, json) = app.search(query).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["query"], query);
    assert!(article_ids(&json["ai_relevant_articles"]).contains(&6));
}

#[tokio::test]
async fn test_search_blank_query_is_rejected() {
    let app = TestApp::new().await;

    for query in ["", "   ", "\t\n "] {
        let (status, json) = app.search(query).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{query:?}");
        assert_eq!(json["error"], "Query is required");
        assert!(json.get("message").is_none(), "message 为空时不应输出");
    }

    let (status, json) = app.search_raw("{}").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Query is required");

    assert_eq!(app.query_count().await, 0, "校验失败时不应写入提问");
}

#[tokio::test]
async fn test_search_invalid_json() {
    let app = TestApp::new().await;

    for body in ["not json", "{\"query\": 42}", "{\"query\": null}"] {
        let (status, json) = app.search_raw(body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(json["error"], "Invalid JSON");
        assert!(json["message"].is_string());
    }

    assert_eq!(app.query_count().await, 0);
}

#[tokio::test]
async fn test_search_ignores_content_type() {
    let app = TestApp::new().await;
    let body = json!({ "query": "vpn" }).to_string();

    let req = Request::post("/api/search-query")
        .body(Body::from(body.clone()))
        .expect("请求失败");
    let (status, json) = app.json(req).await;
    assert_eq!(status, StatusCode::OK, "{json}");
    assert!(article_ids(&json["ai_relevant_articles"]).contains(&2));

    let req = Request::post("/api/search-query")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(body))
        .expect("请求失败");
    let (status, _) = app.json(req).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(app.query_count().await, 2);
}

#[tokio::test]
async fn test_articles_list() {
    let app = TestApp::new().await;

    let (status, json) = app.get("/api/articles").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(article_ids(&json), (1..=10).collect::<Vec<_>>());
    assert!(json[0]["content"].as_str().unwrap().contains("Forgot Password"));
}

#[tokio::test]
async fn test_article() {
    let app = TestApp::new().await;

    let (status, json) = app.get("/api/articles/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["id"], 2);
    assert_eq!(json["title"], "VPN Connection Setup");

    let (status, json) = app.get("/api/articles/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({ "error": "Invalid article ID" }));

    let (status, _) = app.get("/api/articles/1.5").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = app.get("/api/articles/%FF").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({ "error": "Invalid article ID" }));

    let (status, json) = app.get("/api/articles/9999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json, json!({ "error": "Article not found" }));
}

#[tokio::test]
async fn test_storage_failure() {
    let app = TestApp::new().await;
    app.pool.close().await;

    let (status, json) = app.search("vpn").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Failed to process search query");
    assert_eq!(json["message"], "failed to create query");

    let (status, json) = app.get("/api/articles").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Failed to get articles");

    let (status, _) = app.get("/api/articles/1").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "存储故障不应返回 404");
}

#[tokio::test]
async fn test_concurrent_searches() {
    let app = TestApp::new().await;

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let router = app.router.clone();
            tokio::spawn(async move {
                let req = Request::post("/api/search-query")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json!({ "query": format!("printer {i}") }).to_string()))
                    .unwrap();
                router.oneshot(req).await.unwrap().status()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::OK);
    }
    assert_eq!(app.query_count().await, 16);
}

#[tokio::test]
async fn test_cors_preflight() {
    let app = TestApp::new().await;
    let router = api::add_middlewares(app.router.clone(), &Config::default());

    let req = Request::options("/api/health")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();
    let resp = router.oneshot(req).await.unwrap();

    let headers = resp.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert!(
        headers[header::ACCESS_CONTROL_ALLOW_METHODS]
            .to_str()
            .unwrap()
            .contains("GET")
    );
}

#[tokio::test]
async fn test_cors_restricted_origins() {
    let app = TestApp::new().await;
    let config = Config {
        cors_origins: vec!["http://localhost:5173".to_string()],
        ..Config::default()
    };
    let router = api::add_middlewares(app.router.clone(), &config);

    let req = Request::get("/api/health")
        .header(header::ORIGIN, "http://localhost:5173")
        .body(Body::empty())
        .unwrap();
    let resp = router.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:5173"
    );

    let req = Request::get("/api/health")
        .header(header::ORIGIN, "http://evil.example")
        .body(Body::empty())
        .unwrap();
    let resp = router.oneshot(req).await.unwrap();
    assert!(
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
}

#[tokio::test]
async fn test_request_timeout() {
    let config = Config {
        request_timeout_secs: 1,
        ..Config::default()
    };
    let router = Router::new().route(
        "/slow",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "done"
        }),
    );
    let router = api::add_middlewares(router, &config);

    let req = Request::get("/slow").body(Body::empty()).unwrap();
    let resp = router.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::GATEWAY_TIMEOUT);
}
