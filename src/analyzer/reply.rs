use super::Analysis;
use crate::storage::Article;

const SUMMARY_PREFIX: &str = "SUMMARY:";
const RELEVANT_PREFIX: &str = "RELEVANT_ARTICLES:";

/// 模型没有给出回答时使用的默认回答
pub const FALLBACK_SUMMARY: &str = "I found some information that might help you. Please review the relevant articles below, or contact IT support for further assistance.";

/// 构造提示词
///
/// 原样嵌入全部文章和用户提问，并要求模型按两行固定格式回复：
///
/// ```text
/// SUMMARY: ...
/// RELEVANT_ARTICLES: 1,3
/// ```
pub fn build_prompt(query: &str, articles: &[Article]) -> String {
    let mut context = String::from("Available Knowledge Base Articles:\n\n");
    for article in articles {
        context.push_str(&format!(
            "Article ID: {}\nTitle: {}\nContent: {}\n\n",
            article.id, article.title, article.content
        ));
    }

    format!(
        r#"You are an IT support assistant helping users find answers to their technical questions.

{context}

User Query: "{query}"

Please analyze the user's query and provide:

1. SUMMARY: A concise, helpful answer based on the relevant articles above. If no articles are relevant, provide general guidance and suggest contacting IT support.

2. RELEVANT_ARTICLES: List the Article IDs (numbers only, comma-separated) of articles that are most relevant to answering this query. If no articles are relevant, return "none".

Format your response exactly as follows:
SUMMARY: [Your concise answer here]
RELEVANT_ARTICLES: [comma-separated Article IDs or "none"]

Example:
SUMMARY: To reset your password, go to the login page, click 'Forgot Password', enter your email, and follow the instructions sent to your email.
RELEVANT_ARTICLES: 1,3

Now analyze the user's query:"#
    )
}

/// 解析模型回复
///
/// - 两行可以任意顺序出现，其它行忽略
/// - `none` 或空值表示没有相关文章
/// - 无法解析的 ID、不在 `articles` 中的 ID 直接跳过，重复 ID 只保留第一次
/// - 没有回答或回答为空时使用 [`FALLBACK_SUMMARY`]
pub fn parse_reply(reply: &str, articles: &[Article]) -> Analysis {
    let mut summary = String::new();
    let mut relevant_articles = Vec::new();

    for line in reply.lines().map(str::trim) {
        if let Some(rest) = line.strip_prefix(SUMMARY_PREFIX) {
            summary = rest.trim().to_owned();
        } else if let Some(rest) = line.strip_prefix(RELEVANT_PREFIX) {
            let ids = rest.trim();
            if ids.is_empty() || ids == "none" {
                continue;
            }
            for id in ids.split(',').filter_map(|s| s.trim().parse::<i64>().ok()) {
                if articles.iter().any(|a| a.id == id) && !relevant_articles.contains(&id) {
                    relevant_articles.push(id);
                }
            }
        }
    }

    if summary.is_empty() {
        summary = FALLBACK_SUMMARY.to_owned();
    }

    Analysis {
        summary,
        relevant_articles,
    }
}
