//! 估值分析数据模型

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::quote::{CompanyProfile, KeyStatistics, PricePoint};

/// 默认预期增长率（%）
pub const DEFAULT_GROWTH_RATE: f64 = 6.0;
/// 请求层允许的增长率范围（%）
pub const GROWTH_RATE_BOUNDS: (f64, f64) = (-50.0, 50.0);

/// 估值引擎输入
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValuationInput {
    pub earnings_per_share: f64,
    pub growth_rate: f64,
    pub reference_rate: f64,
}

/// 分析查询参数
#[derive(Debug, Deserialize)]
pub struct AnalysisQuery {
    /// 预期增长率（%），缺省为 6.0
    pub growth: Option<f64>,
}

/// 一次分析请求
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub ticker: String,
    pub growth_rate: f64,
}

impl AnalysisRequest {
    pub fn new(ticker: &str, growth_rate: Option<f64>) -> Self {
        Self {
            ticker: ticker.trim().to_uppercase(),
            growth_rate: growth_rate.unwrap_or(DEFAULT_GROWTH_RATE),
        }
    }
}

/// 分析结果
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AnalysisReport {
    /// 分析日期
    pub date: NaiveDate,
    pub ticker: String,
    pub name: String,
    pub earnings_per_share: f64,
    pub growth_rate: f64,
    pub reference_rate: f64,
    /// 内在价值（格雷厄姆公式）
    pub intrinsic_value: f64,
    pub current_price: f64,
    /// 安全边际（%）
    pub margin_percent: f64,
    pub price_to_book: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub profile: Option<CompanyProfile>,
    pub key_statistics: Option<KeyStatistics>,
    pub history: Vec<PricePoint>,
    /// 需要提示给用户的警告
    pub warnings: Vec<String>,
}

/// 分析记录（CSV 中的一行）
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AnalysisRecord {
    pub date: NaiveDate,
    pub ticker: String,
    pub name: String,
    pub earnings_per_share: f64,
    pub growth_rate: f64,
    pub reference_rate: f64,
    pub intrinsic_value: f64,
    pub current_price: f64,
    pub margin_percent: f64,
    pub price_to_book: Option<f64>,
    pub dividend_yield: Option<f64>,
}

impl From<&AnalysisReport> for AnalysisRecord {
    fn from(report: &AnalysisReport) -> Self {
        Self {
            date: report.date,
            ticker: report.ticker.clone(),
            name: report.name.clone(),
            earnings_per_share: report.earnings_per_share,
            growth_rate: report.growth_rate,
            reference_rate: report.reference_rate,
            intrinsic_value: report.intrinsic_value,
            current_price: report.current_price,
            margin_percent: report.margin_percent,
            price_to_book: report.price_to_book,
            dividend_yield: report.dividend_yield,
        }
    }
}

/// 基准利率响应
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct ReferenceRate {
    pub rate: f64,
}
