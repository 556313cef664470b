use std::sync::Arc;

use crate::{analyzer::AnalyzerKind, service::SearchService, storage::DBPool};

/// 运行时使用的搜索服务
pub type Search = SearchService<DBPool, AnalyzerKind>;

/// 应用程序上下文
///
/// [`AppState`] 封装了搜索服务和服务名，在各请求之间共享。
#[derive(Clone)]
pub struct AppState {
    search: Arc<Search>,
    service_name: Arc<str>,
}

impl AppState {
    /// 创建一个新的 [`AppState`] 实例
    pub fn new(pool: DBPool, analyzer: AnalyzerKind, service_name: impl AsRef<str>) -> Self {
        Self {
            search: Arc::new(SearchService::new(pool, analyzer)),
            service_name: Arc::from(service_name.as_ref()),
        }
    }

    /// 获取搜索服务
    pub fn search(&self) -> &Search {
        &self.search
    }

    /// 获取服务名
    pub fn service_name(&self) -> &str {
        &self.service_name
    }
}
