use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    analyzer::{AnalyzeError, Analyzer},
    storage::{Article, Storage, StorageError},
};

/// 搜索流程中的错误，每个变体对应失败的步骤
///
/// 已经写入的提问或结果不会回滚。
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("failed to create query: {0}")]
    CreateQuery(#[source] StorageError),

    #[error("failed to get articles: {0}")]
    FetchArticles(#[source] StorageError),

    #[error("failed to analyze query: {0}")]
    Analyze(#[source] AnalyzeError),

    #[error("failed to save search result: {0}")]
    SaveResult(#[source] StorageError),

    #[error("failed to get relevant articles: {0}")]
    FetchRelevant(#[source] StorageError),
}

impl SearchError {
    /// 失败步骤的描述，不含内部细节
    pub fn step(&self) -> &'static str {
        match self {
            SearchError::CreateQuery(_) => "failed to create query",
            SearchError::FetchArticles(_) => "failed to get articles",
            SearchError::Analyze(_) => "failed to analyze query",
            SearchError::SaveResult(_) => "failed to save search result",
            SearchError::FetchRelevant(_) => "failed to get relevant articles",
        }
    }
}

/// 搜索结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// 原始提问
    pub query: String,
    pub ai_summary_answer: String,
    /// 相关文章全文，按相关度排列
    pub ai_relevant_articles: Vec<Article>,
    pub query_id: i64,
    /// 提问的创建时间
    pub timestamp: DateTime<Utc>,
}

/// 组合存储和分析的搜索服务
pub struct SearchService<S, A> {
    storage: S,
    analyzer: A,
}

impl<S: Storage, A: Analyzer> SearchService<S, A> {
    pub fn new(storage: S, analyzer: A) -> Self {
        Self { storage, analyzer }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// 处理一次提问
    ///
    /// 1. 保存提问
    /// 2. 读取全部文章
    /// 3. 分析提问
    /// 4. 保存分析结果
    /// 5. 读取相关文章全文并组装结果
    ///
    /// 任一步失败都会中止并返回对应的 [`SearchError`]。
    #[instrument(name = "search", skip_all)]
    pub async fn process_search_query(&self, text: &str) -> Result<SearchResponse, SearchError> {
        let query = self
            .storage
            .create_query(text)
            .await
            .map_err(SearchError::CreateQuery)?;
        tracing::debug!(query_id = query.id, "query saved");

        let articles = self
            .storage
            .articles()
            .await
            .map_err(SearchError::FetchArticles)?;

        let analysis = self
            .analyzer
            .analyze(text, &articles)
            .await
            .map_err(SearchError::Analyze)?;
        tracing::debug!(
            query_id = query.id,
            relevant = ?analysis.relevant_articles,
            "query analyzed"
        );

        self.storage
            .create_search_result(query.id, &analysis.summary, &analysis.relevant_articles)
            .await
            .map_err(SearchError::SaveResult)?;

        let mut relevant = self
            .storage
            .articles_by_ids(&analysis.relevant_articles)
            .await
            .map_err(SearchError::FetchRelevant)?;
        relevant.sort_by_key(|article| {
            analysis
                .relevant_articles
                .iter()
                .position(|id| *id == article.id)
        });

        Ok(SearchResponse {
            query: text.to_owned(),
            ai_summary_answer: analysis.summary,
            ai_relevant_articles: relevant,
            query_id: query.id,
            timestamp: query.created_at,
        })
    }

    /// 查询单篇文章
    pub async fn article(&self, id: i64) -> Result<Article, StorageError> {
        self.storage.article(id).await
    }

    /// 查询全部文章
    pub async fn articles(&self) -> Result<Vec<Article>, StorageError> {
        self.storage.articles().await
    }
}
