//! 行情数据模型
//!
//! 定义股票行情、公司概况与关键指标的数据结构

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 股票行情
///
/// 每次请求从行情数据源生成，只在数据源的限时缓存中保留
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Quote {
    /// 股票代码
    pub ticker: String,
    /// 公司名称
    pub name: String,
    /// 当前价格
    pub price: f64,
    /// 每股收益（LPA）
    pub earnings_per_share: Option<f64>,
    /// 市净率（P/VPA）
    pub price_to_book: Option<f64>,
    /// 股息率
    pub dividend_yield: Option<f64>,
    /// 公司概况
    pub profile: Option<CompanyProfile>,
    /// 关键统计指标
    pub key_statistics: Option<KeyStatistics>,
    /// 近 12 个月收盘价，按日期升序
    pub history: Vec<PricePoint>,
}

/// 单个历史收盘价
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PricePoint {
    /// 日期
    pub date: NaiveDate,
    /// 收盘价
    pub close: f64,
}

/// 公司概况
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    /// 行业板块
    pub sector: Option<String>,
    /// 细分行业
    pub industry: Option<String>,
    /// 业务描述
    pub long_business_summary: Option<String>,
}

/// 关键统计指标（近 12 个月）
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KeyStatistics {
    pub market_cap: Option<f64>,
    pub enterprise_value: Option<f64>,
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Option<f64>,
    pub price_to_book: Option<f64>,
    pub enterprise_to_revenue: Option<f64>,
    pub enterprise_to_ebitda: Option<f64>,
    pub trailing_eps: Option<f64>,
    pub roe: Option<f64>,
    pub roa: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub net_debt: Option<f64>,
    pub total_revenue: Option<f64>,
}

impl KeyStatistics {
    /// 带显示标签的指标列表，顺序固定
    pub fn labeled(&self) -> Vec<(&'static str, Option<f64>)> {
        vec![
            ("市值", self.market_cap),
            ("企业价值", self.enterprise_value),
            ("市盈率 (P/L)", self.trailing_pe),
            ("市净率 (P/VPA)", self.price_to_book),
            ("EV/营收", self.enterprise_to_revenue),
            ("EV/EBITDA", self.enterprise_to_ebitda),
            ("每股收益 (LPA)", self.trailing_eps),
            ("ROE", self.roe),
            ("ROA", self.roa),
            ("负债权益比", self.debt_to_equity),
            ("净负债", self.net_debt),
            ("总营收", self.total_revenue),
        ]
    }
}

/// 将大数值格式化为可读形式（T/B/M），缺失时返回 N/A
pub fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => {
            let abs = v.abs();
            if abs >= 1e12 {
                format!("{:.2} T", v / 1e12)
            } else if abs >= 1e9 {
                format!("{:.2} B", v / 1e9)
            } else if abs >= 1e6 {
                format!("{:.2} M", v / 1e6)
            } else {
                format!("{:.2}", v)
            }
        }
        _ => "N/A".to_string(),
    }
}
