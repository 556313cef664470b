use chrono::Utc;
use sqlx::types::Json;

use super::{Article, DBPool, Query, SearchResult, catalog::CATALOG, migrate};

/// 存储层错误
///
/// 未找到记录（[`StorageError::NotFound`]）是正常结果，与数据库故障区分开。
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// 已存储的数据无法解码，例如相关文章列表不是合法的 JSON 数组
    #[error("corrupt stored data: {0}")]
    Corrupt(#[source] sqlx::Error),

    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => StorageError::Corrupt(err),
            err => StorageError::Database(err),
        }
    }
}

impl StorageError {
    /// 是否为未找到记录
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }
}

/// 知识库、提问记录和分析结果的存储接口
///
/// 所有方法都可以被多个请求并发调用。
pub trait Storage: Send + Sync {
    /// 查询全部文章，按 ID 升序；没有文章时返回空列表
    fn articles(&self) -> impl Future<Output = Result<Vec<Article>, StorageError>> + Send;

    /// 查询单篇文章
    fn article(&self, id: i64) -> impl Future<Output = Result<Article, StorageError>> + Send;

    /// 按 ID 列表批量查询文章
    ///
    /// 只返回存在的文章，顺序不保证；不存在的 ID 直接忽略。
    /// 空列表不访问数据库。
    fn articles_by_ids(
        &self,
        ids: &[i64],
    ) -> impl Future<Output = Result<Vec<Article>, StorageError>> + Send;

    /// 保存一次提问，返回带有 ID 和创建时间的完整记录
    fn create_query(&self, text: &str)
    -> impl Future<Output = Result<Query, StorageError>> + Send;

    /// 查询提问记录
    fn query(&self, id: i64) -> impl Future<Output = Result<Query, StorageError>> + Send;

    /// 保存分析结果
    ///
    /// `relevant_articles` 按原顺序序列化为 JSON 数组，读取时原样还原。
    fn create_search_result(
        &self,
        query_id: i64,
        summary: &str,
        relevant_articles: &[i64],
    ) -> impl Future<Output = Result<SearchResult, StorageError>> + Send;

    /// 按结果 ID 查询分析结果
    fn search_result(&self, id: i64)
    -> impl Future<Output = Result<SearchResult, StorageError>> + Send;

    /// 按提问 ID 查询分析结果
    ///
    /// 同一提问存在多条结果时返回最新的一条（ID 最大）。
    fn search_result_by_query(
        &self,
        query_id: i64,
    ) -> impl Future<Output = Result<SearchResult, StorageError>> + Send;

    /// 建表，并在文章表为空时写入初始知识库
    ///
    /// 可重复调用，不会重复写入文章。
    fn initialize(&self) -> impl Future<Output = Result<(), StorageError>> + Send;
}

impl Storage for DBPool {
    async fn articles(&self) -> Result<Vec<Article>, StorageError> {
        let rows = sqlx::query_as::<_, Article>(
            "SELECT id, title, content FROM articles ORDER BY id",
        )
        .fetch_all(self)
        .await?;
        Ok(rows)
    }

    async fn article(&self, id: i64) -> Result<Article, StorageError> {
        sqlx::query_as::<_, Article>("SELECT id, title, content FROM articles WHERE id = ?")
            .bind(id)
            .fetch_optional(self)
            .await?
            .ok_or(StorageError::NotFound {
                entity: "article",
                id,
            })
    }

    async fn articles_by_ids(&self, ids: &[i64]) -> Result<Vec<Article>, StorageError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder =
            sqlx::QueryBuilder::new("SELECT id, title, content FROM articles WHERE id IN (");
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let rows = builder.build_query_as::<Article>().fetch_all(self).await?;
        Ok(rows)
    }

    async fn create_query(&self, text: &str) -> Result<Query, StorageError> {
        let query = sqlx::query_as::<_, Query>(
            r#"
            INSERT INTO queries (query, created_at)
            VALUES (?, ?)
            RETURNING id, query, created_at
            "#,
        )
        .bind(text)
        .bind(Utc::now())
        .fetch_one(self)
        .await?;
        Ok(query)
    }

    async fn query(&self, id: i64) -> Result<Query, StorageError> {
        sqlx::query_as::<_, Query>("SELECT id, query, created_at FROM queries WHERE id = ?")
            .bind(id)
            .fetch_optional(self)
            .await?
            .ok_or(StorageError::NotFound { entity: "query", id })
    }

    async fn create_search_result(
        &self,
        query_id: i64,
        summary: &str,
        relevant_articles: &[i64],
    ) -> Result<SearchResult, StorageError> {
        let result = sqlx::query_as::<_, SearchResult>(
            r#"
            INSERT INTO search_results (query_id, ai_summary_answer, ai_relevant_articles, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, query_id, ai_summary_answer, ai_relevant_articles, created_at
            "#,
        )
        .bind(query_id)
        .bind(summary)
        .bind(Json(relevant_articles))
        .bind(Utc::now())
        .fetch_one(self)
        .await?;
        Ok(result)
    }

    async fn search_result(&self, id: i64) -> Result<SearchResult, StorageError> {
        sqlx::query_as::<_, SearchResult>(
            r#"
            SELECT id, query_id, ai_summary_answer, ai_relevant_articles, created_at
            FROM search_results
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self)
        .await?
        .ok_or(StorageError::NotFound {
            entity: "search result",
            id,
        })
    }

    async fn search_result_by_query(&self, query_id: i64) -> Result<SearchResult, StorageError> {
        sqlx::query_as::<_, SearchResult>(
            r#"
            SELECT id, query_id, ai_summary_answer, ai_relevant_articles, created_at
            FROM search_results
            WHERE query_id = ?
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(query_id)
        .fetch_optional(self)
        .await?
        .ok_or(StorageError::NotFound {
            entity: "search result for query",
            id: query_id,
        })
    }

    async fn initialize(&self) -> Result<(), StorageError> {
        migrate(self).await?;

        let mut tx = self.begin().await?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM articles")
            .fetch_one(&mut *tx)
            .await?;
        if count > 0 {
            tracing::debug!(count, "article catalog already seeded");
            return Ok(());
        }

        for (title, content) in CATALOG {
            sqlx::query("INSERT INTO articles (title, content) VALUES (?, ?)")
                .bind(title)
                .bind(content)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        tracing::info!(count = CATALOG.len(), "seeded article catalog");
        Ok(())
    }
}
