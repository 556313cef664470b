use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 知识库文章
///
/// 由初始化时的种子数据写入，运行期间只读。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Article {
    /// 文章 ID，由数据库分配
    pub id: i64,
    /// 标题
    pub title: String,
    /// 正文
    pub content: String,
}

/// 用户提交的一次提问
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Query {
    pub id: i64,
    /// 原始提问文本，存储层不做校验
    pub query: String,
    pub created_at: DateTime<Utc>,
}

/// 一次提问的分析结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SearchResult {
    pub id: i64,
    /// 所属的 [`Query`]
    pub query_id: i64,
    /// 生成的回答
    pub ai_summary_answer: String,
    /// 相关文章 ID，按相关度排列，以 JSON 数组存储
    #[sqlx(json)]
    pub ai_relevant_articles: Vec<i64>,
    pub created_at: DateTime<Utc>,
}
