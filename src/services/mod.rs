//! 业务逻辑服务模块
//!
//! 封装数据获取、估值计算和导出逻辑

pub mod analysis_service; // 估值分析流程
pub mod cache;            // 限时缓存
pub mod export;           // CSV 记录与报告
pub mod quote;            // 行情数据源
pub mod rate;             // 基准利率数据源
pub mod validator;        // 股票代码校验
pub mod valuation;        // 格雷厄姆估值引擎

pub use analysis_service::AnalysisService;

#[cfg(test)]
pub mod testing;
