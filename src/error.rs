//! 领域错误类型
//!
//! 估值、行情与导出流程共用的错误分类

use thiserror::Error;

/// 分析流程的统一返回类型
pub type AnalyzerResult<T> = std::result::Result<T, AnalyzerError>;

/// 分析错误
///
/// - InvalidInput: 缺少必需的数值字段或请求参数不合法
/// - TickerNotFound: 上游没有匹配的证券
/// - UpstreamUnavailable: 网络/HTTP 失败或上游数据格式错误
/// - DivisionUndefined: 当前价格为零，无法计算安全边际
/// - Storage: 分析记录或报告文件读写失败
#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("输入无效: {0}")]
    InvalidInput(String),

    #[error("未找到股票代码 '{0}'")]
    TickerNotFound(String),

    #[error("上游服务不可用: {0}")]
    UpstreamUnavailable(String),

    #[error("当前价格为零，无法计算安全边际")]
    DivisionUndefined,

    #[error("存储失败: {0}")]
    Storage(String),
}

impl From<reqwest::Error> for AnalyzerError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AnalyzerError::UpstreamUnavailable(format!("请求超时: {}", e))
        } else {
            AnalyzerError::UpstreamUnavailable(e.to_string())
        }
    }
}

impl From<std::io::Error> for AnalyzerError {
    fn from(e: std::io::Error) -> Self {
        AnalyzerError::Storage(e.to_string())
    }
}

impl From<csv::Error> for AnalyzerError {
    fn from(e: csv::Error) -> Self {
        AnalyzerError::Storage(e.to_string())
    }
}
