use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

use super::{Analysis, AnalyzeError, Analyzer, build_prompt, parse_reply};
use crate::storage::Article;

/// GeminiAnalyzer 调用 Gemini `generateContent` 接口生成回答。
///
/// 每次分析只发送一次请求，失败时直接返回错误，不做重试。
#[derive(Debug, Clone)]
pub struct GeminiAnalyzer {
    client: reqwest::Client,
    endpoint: String,
}

impl GeminiAnalyzer {
    /// 使用 API key、服务地址和模型名创建分析器
    ///
    /// ```ignore
    /// let analyzer = GeminiAnalyzer::new(
    ///     "your_key",
    ///     "https://generativelanguage.googleapis.com",
    ///     "gemini-2.0-flash",
    /// )?;
    /// ```
    pub fn new(api_key: &str, base_url: &str, model: &str) -> Result<Self, AnalyzeError> {
        if api_key.trim().is_empty() {
            return Err(AnalyzeError::MissingCredential);
        }

        let mut api_key = HeaderValue::from_str(api_key)?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert("x-goog-api-key", api_key);

        let client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/v1beta/models/{}:generateContent",
                base_url.trim_end_matches('/'),
                model
            ),
        })
    }

    /// 请求地址
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// 发送提示词，返回第一个候选回复的文本
    async fn generate(&self, prompt: &str) -> Result<String, AnalyzeError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&GenerateRequest {
                contents: [RequestContent {
                    parts: [RequestPart { text: prompt }],
                }],
            })
            .send()
            .await?
            .error_for_status()?;

        let body: GenerateResponse = resp.json().await?;

        body.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .ok_or(AnalyzeError::EmptyResponse)
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl Analyzer for GeminiAnalyzer {
    async fn analyze(&self, query: &str, articles: &[Article]) -> Result<Analysis, AnalyzeError> {
        let prompt = build_prompt(query, articles);
        let reply = self.generate(&prompt).await?;
        tracing::debug!(reply_len = reply.len(), "gemini replied");
        Ok(parse_reply(&reply, articles))
    }
}
