use std::{
    env, io,
    net::{Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
};

use serde::Deserialize;

/// 配置文件路径所在的环境变量
pub const CONFIG_FILE_ENV: &str = "HELPDESK_CONFIG";

/// 配置错误
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for `{key}`: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// 服务配置
///
/// 加载顺序：内置默认值 → `HELPDESK_CONFIG` 指向的 TOML 文件 → 环境变量。
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 监听端口，`PORT`
    pub port: u16,
    /// SQLite 数据库文件，`DB_PATH`；`:memory:` 表示内存库
    pub db_path: PathBuf,
    /// 使用关键词匹配代替外部模型，`USE_MOCK_AI`
    pub use_mock_ai: bool,
    /// Gemini API key，`GEMINI_API_KEY`
    pub gemini_api_key: Option<String>,
    /// Gemini 模型，`GEMINI_MODEL`
    pub gemini_model: String,
    /// Gemini 服务地址，`GEMINI_BASE_URL`
    pub gemini_base_url: String,
    /// 健康检查返回的服务名
    pub service_name: String,
    /// 单个请求的超时时间（秒）
    pub request_timeout_secs: u64,
    /// 允许跨域的来源，为空时允许任意来源
    pub cors_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            db_path: PathBuf::from("./data.db"),
            use_mock_ai: true,
            gemini_api_key: None,
            gemini_model: "gemini-2.0-flash".to_string(),
            gemini_base_url: "https://generativelanguage.googleapis.com".to_string(),
            service_name: "event-to-insight-backend".to_string(),
            request_timeout_secs: 60,
            cors_origins: Vec::new(),
        }
    }
}

impl Config {
    /// 从进程环境加载配置
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| env::var(key).ok())
    }

    /// 使用给定的查找函数加载配置
    ///
    /// 空字符串视为未设置。
    pub fn load_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let config = match lookup(CONFIG_FILE_ENV).filter(|v| !v.is_empty()) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.with_overrides(lookup)
    }

    /// 读取 TOML 配置文件，缺省字段使用默认值
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// 解析 TOML 配置
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// 用环境变量覆盖配置
    ///
    /// `USE_MOCK_AI` 只有等于 `"true"` 时为真，其它非空值一律为假。
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(port) = get("PORT") {
            self.port = port.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                value: port,
            })?;
        }
        if let Some(path) = get("DB_PATH") {
            self.db_path = PathBuf::from(path);
        }
        if let Some(flag) = get("USE_MOCK_AI") {
            self.use_mock_ai = flag == "true";
        }
        if let Some(key) = get("GEMINI_API_KEY") {
            self.gemini_api_key = Some(key);
        }
        if let Some(model) = get("GEMINI_MODEL") {
            self.gemini_model = model;
        }
        if let Some(url) = get("GEMINI_BASE_URL") {
            self.gemini_base_url = url;
        }

        Ok(self)
    }

    /// 是否使用关键词匹配
    pub fn use_heuristic(&self) -> bool {
        self.use_mock_ai || self.gemini_api_key.as_deref().is_none_or(str::is_empty)
    }

    /// 监听地址
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}
