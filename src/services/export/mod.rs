//! 导出服务模块
//!
//! - csv_log: 分析记录追加与读取
//! - report: 文本报告生成

pub mod csv_log;
pub mod report;

pub use csv_log::AnalysisLog;
pub use report::ReportExporter;
