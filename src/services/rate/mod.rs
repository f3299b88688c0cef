//! 基准利率服务模块

pub mod bcb;

use async_trait::async_trait;

use crate::error::AnalyzerResult;

pub use bcb::BcbRateProvider;

/// 基准利率数据源
#[async_trait]
pub trait ReferenceRateProvider: Send + Sync {
    /// 获取当前基准利率（百分比，保留 2 位小数）
    async fn fetch_reference_rate(&self) -> AnalyzerResult<f64>;
}
