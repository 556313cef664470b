//! 相关性分析
//!
//! 给定提问文本和当前全部文章，生成回答并挑选相关文章。
//! 返回的文章 ID 一定属于传入的文章集合。

mod gemini;
mod keyword;
mod reply;

use reqwest::header::InvalidHeaderValue;

use crate::{config::Config, storage::Article};

pub use self::{
    gemini::GeminiAnalyzer,
    keyword::KeywordAnalyzer,
    reply::{FALLBACK_SUMMARY, build_prompt, parse_reply},
};

/// 一次分析的结果
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Analysis {
    /// 生成的回答
    pub summary: String,
    /// 相关文章 ID，按相关度排列
    pub relevant_articles: Vec<i64>,
}

/// 分析错误
///
/// 只有外部模型会失败；失败时不会重试，也不会返回部分结果。
#[derive(Debug, thiserror::Error)]
pub enum AnalyzeError {
    #[error("API key is required")]
    MissingCredential,

    #[error("invalid API key: {0}")]
    InvalidCredential(#[from] InvalidHeaderValue),

    #[error("failed to generate content: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("no response generated")]
    EmptyResponse,
}

/// 相关性分析接口
pub trait Analyzer: Send + Sync {
    fn analyze(
        &self,
        query: &str,
        articles: &[Article],
    ) -> impl Future<Output = Result<Analysis, AnalyzeError>> + Send;
}

/// 启动时选定的分析策略
#[derive(Debug, Clone)]
pub enum AnalyzerKind {
    Keyword(KeywordAnalyzer),
    Gemini(GeminiAnalyzer),
}

impl AnalyzerKind {
    /// 按配置选择策略
    ///
    /// 开启 `use_mock_ai` 或没有配置 API key 时使用关键词匹配。
    pub fn from_config(config: &Config) -> Result<Self, AnalyzeError> {
        match config.gemini_api_key.as_deref() {
            Some(key) if !config.use_heuristic() => Ok(AnalyzerKind::Gemini(GeminiAnalyzer::new(
                key,
                &config.gemini_base_url,
                &config.gemini_model,
            )?)),
            _ => {
                if !config.use_mock_ai {
                    tracing::warn!("GEMINI_API_KEY not set, falling back to keyword analyzer");
                }
                Ok(AnalyzerKind::Keyword(KeywordAnalyzer::default()))
            }
        }
    }

    /// 策略名称，用于日志
    pub fn name(&self) -> &'static str {
        match self {
            AnalyzerKind::Keyword(_) => "keyword",
            AnalyzerKind::Gemini(_) => "gemini",
        }
    }
}

impl Analyzer for AnalyzerKind {
    async fn analyze(&self, query: &str, articles: &[Article]) -> Result<Analysis, AnalyzeError> {
        match self {
            AnalyzerKind::Keyword(analyzer) => analyzer.analyze(query, articles).await,
            AnalyzerKind::Gemini(analyzer) => analyzer.analyze(query, articles).await,
        }
    }
}
