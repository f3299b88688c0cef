//! 配置模块
//!
//! 支持从 JSON 文件加载系统配置，部分字段可由环境变量覆盖

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,
    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
    /// 工作线程数（0 表示使用 CPU 核心数）
    #[serde(default)]
    pub workers: usize,
}

/// API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API Key（为空则不启用认证）
    #[serde(default)]
    pub api_key: String,
    /// 请求超时时间（秒）
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// 连接超时时间（秒）
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// brapi 行情接口地址
    #[serde(default = "default_brapi_base_url")]
    pub brapi_base_url: String,
    /// brapi 访问令牌（可选）
    #[serde(default)]
    pub brapi_token: Option<String>,
    /// 央行 SGS 接口地址
    #[serde(default = "default_bcb_base_url")]
    pub bcb_base_url: String,
}

/// 缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// 行情缓存时间（秒）
    #[serde(default = "default_quote_ttl")]
    pub quote_ttl_secs: u64,
    /// 基准利率缓存时间（秒）
    #[serde(default = "default_rate_ttl")]
    pub rate_ttl_secs: u64,
}

/// 存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// 分析记录 CSV 路径
    #[serde(default = "default_history_csv")]
    pub history_csv: String,
    /// 报告临时目录
    #[serde(default = "default_temp_dir")]
    pub temp_dir: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// 日志级别: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,
    /// API 配置
    #[serde(default)]
    pub api: ApiConfig,
    /// 缓存配置
    #[serde(default)]
    pub cache: CacheConfig,
    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,
    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

// 默认值函数
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_timeout() -> u64 { 30 }
fn default_connect_timeout() -> u64 { 10 }
fn default_brapi_base_url() -> String { "https://brapi.dev".to_string() }
fn default_bcb_base_url() -> String { "https://api.bcb.gov.br".to_string() }
fn default_quote_ttl() -> u64 { 600 }
fn default_rate_ttl() -> u64 { 3600 }
fn default_history_csv() -> String { "data/historico_consultas.csv".to_string() }
fn default_temp_dir() -> String { "temp".to_string() }
fn default_log_level() -> String { "info".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: 0,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            brapi_base_url: default_brapi_base_url(),
            brapi_token: None,
            bcb_base_url: default_bcb_base_url(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            quote_ttl_secs: default_quote_ttl(),
            rate_ttl_secs: default_rate_ttl(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            history_csv: default_history_csv(),
            temp_dir: default_temp_dir(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl ApiConfig {
    /// 构建带超时设置的 HTTP 客户端
    pub fn http_client(&self) -> anyhow::Result<reqwest::Client> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .build()?;
        Ok(client)
    }
}

impl AppConfig {
    /// 从 JSON 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// 加载配置并应用环境变量覆盖，返回配置与来源文件
    ///
    /// 此时日志系统尚未初始化，来源由调用方记录。
    /// 配置文件存在但无法解析时返回错误，不回退到默认值。
    pub fn load() -> anyhow::Result<(Self, Option<PathBuf>)> {
        Self::load_from(&["config.json", "config/config.json"])
    }

    fn load_from<P: AsRef<Path>>(paths: &[P]) -> anyhow::Result<(Self, Option<PathBuf>)> {
        let found: Option<&Path> = paths.iter().map(|p| p.as_ref()).find(|path| path.exists());

        let (mut config, source) = match found {
            Some(path) => {
                let config = Self::from_file(path)
                    .with_context(|| format!("加载配置文件 {} 失败", path.display()))?;
                (config, Some(path.to_path_buf()))
            }
            None => (Self::default(), None),
        };

        config.apply_env_overrides();
        Ok((config, source))
    }

    /// 环境变量覆盖: API_KEY, API_TOKEN_BRAPI
    fn apply_env_overrides(&mut self) {
        if let Ok(key) = env::var("API_KEY") {
            self.api.api_key = key;
        }
        if let Ok(token) = env::var("API_TOKEN_BRAPI") {
            if !token.is_empty() {
                self.api.brapi_token = Some(token);
            }
        }
    }

    /// 获取服务器绑定地址
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn quote_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.quote_ttl_secs)
    }

    pub fn rate_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.rate_ttl_secs)
    }
}
