use super::{Analysis, AnalyzeError, Analyzer};
use crate::storage::Article;

/// 参与匹配的话题关键词
const KEYWORDS: [&str; 8] = [
    "password",
    "vpn",
    "email",
    "printer",
    "software",
    "backup",
    "antivirus",
    "remote",
];

/// 固定回答，按优先级排列：先命中的话题决定回答
const ANSWERS: [(&str, &str); 4] = [
    (
        "password",
        "To reset your password, go to the login page, click 'Forgot Password', enter your email address, and follow the instructions sent to your email. The reset link expires in 24 hours.",
    ),
    (
        "vpn",
        "To set up VPN connection, download the VPN client from the IT portal, install it with admin credentials, and connect to the 'Corporate-Main' server using your domain username and password.",
    ),
    (
        "email",
        "For email configuration, use IMAP: mail.company.com port 993 SSL and SMTP: mail.company.com port 587 STARTTLS. Ensure your username format is firstname.lastname@company.com.",
    ),
    (
        "printer",
        "For printer issues, ensure the printer is connected to the corporate network, install latest drivers, and add printer using IP address 192.168.1.100.",
    ),
];

const FOUND_ANSWER: &str = "I found relevant information in our knowledge base that should help with your query. Please review the articles below for detailed instructions.";

const NOT_FOUND_ANSWER: &str = "I couldn't find specific information for your query in our knowledge base. Please contact IT support for further assistance, or try rephrasing your question.";

/// 关键词匹配分析
///
/// 提问和文章（标题 + 正文）同时包含某个关键词时，文章视为相关。
/// 纯函数，相同输入总是得到相同输出，不会失败。
#[derive(Debug, Clone)]
pub struct KeywordAnalyzer {
    keywords: Vec<String>,
    answers: Vec<(String, String)>,
}

impl Default for KeywordAnalyzer {
    /// 内置关键词和回答，优先级 password > vpn > email > printer
    fn default() -> Self {
        Self::new(KEYWORDS, ANSWERS)
    }
}

impl KeywordAnalyzer {
    /// 使用自定义关键词和回答创建分析器
    ///
    /// `answers` 的顺序即优先级，话题统一转为小写。
    pub fn new<K, T, A>(keywords: K, answers: A) -> Self
    where
        K: IntoIterator,
        K::Item: AsRef<str>,
        A: IntoIterator<Item = (T, T)>,
        T: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
            answers: answers
                .into_iter()
                .map(|(topic, answer)| (topic.as_ref().to_lowercase(), answer.as_ref().to_owned()))
                .collect(),
        }
    }

    /// 对提问做关键词匹配
    pub fn evaluate(&self, query: &str, articles: &[Article]) -> Analysis {
        let query = query.to_lowercase();

        let topics: Vec<&str> = self
            .keywords
            .iter()
            .map(String::as_str)
            .filter(|keyword| query.contains(keyword))
            .collect();

        let relevant_articles: Vec<i64> = if topics.is_empty() {
            Vec::new()
        } else {
            articles
                .iter()
                .filter(|article| {
                    let text = format!("{} {}", article.title, article.content).to_lowercase();
                    topics.iter().any(|topic| text.contains(topic))
                })
                .map(|article| article.id)
                .collect()
        };

        let summary = self
            .answers
            .iter()
            .find(|(topic, _)| query.contains(topic.as_str()))
            .map(|(_, answer)| answer.as_str())
            .unwrap_or(if relevant_articles.is_empty() {
                NOT_FOUND_ANSWER
            } else {
                FOUND_ANSWER
            })
            .to_owned();

        Analysis {
            summary,
            relevant_articles,
        }
    }
}

impl Analyzer for KeywordAnalyzer {
    async fn analyze(&self, query: &str, articles: &[Article]) -> Result<Analysis, AnalyzeError> {
        Ok(self.evaluate(query, articles))
    }
}
