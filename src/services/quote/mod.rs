//! 行情数据服务模块
//!
//! 定义行情数据源接口，当前实现对接 brapi

pub mod brapi;

use async_trait::async_trait;

use crate::error::AnalyzerResult;
use crate::models::Quote;

pub use brapi::BrapiQuoteProvider;

/// 行情数据源
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// 获取股票行情、基本面与近 12 个月历史
    ///
    /// 没有匹配证券时返回 TickerNotFound，请求失败或状态码异常时返回 UpstreamUnavailable
    async fn fetch_quote(&self, ticker: &str) -> AnalyzerResult<Quote>;
}
