//! 格雷厄姆估值引擎
//!
//! 内在价值 = EPS × (8.5 + 2g) × 4.4 / 基准利率
//!
//! 纯函数，无状态、无 I/O。不对增长率或 EPS 符号做截断，
//! 负值或极端值按算术结果返回，由调用方负责提示。

use crate::error::{AnalyzerError, AnalyzerResult};
use crate::models::ValuationInput;

/// 零增长公司的市盈率
const NO_GROWTH_MULTIPLE: f64 = 8.5;
/// 公式提出时的 AAA 债券收益率
const BOND_YIELD_FACTOR: f64 = 4.4;

/// 按二进制精确值保留 2 位小数
///
/// 不能先乘 100 再取整：6.544999… × 100 会变成精确的 654.5 而被进位。
/// 格式化按精确值取舍，结果与常见的 round(x, 2) 一致。
pub fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse::<f64>().unwrap_or(value)
}

/// 增长率归一化：绝对值严格小于 1 时视为小数，乘以 100
///
/// 注意：1.0 不会被转换。意图为 0.5% 的输入会被当作 50%，
/// 这是一个潜在缺陷，但多个历史版本都保持此行为，这里原样保留。
pub fn normalize_growth_rate(growth_rate: f64) -> f64 {
    if growth_rate.abs() < 1.0 {
        growth_rate * 100.0
    } else {
        growth_rate
    }
}

impl ValuationInput {
    /// 构造估值输入，EPS 缺失时返回 InvalidInput
    pub fn new(
        earnings_per_share: Option<f64>,
        growth_rate: f64,
        reference_rate: f64,
    ) -> AnalyzerResult<Self> {
        let earnings_per_share = earnings_per_share
            .ok_or_else(|| AnalyzerError::InvalidInput("EPS 不能为空".to_string()))?;

        Ok(Self {
            earnings_per_share,
            growth_rate,
            reference_rate,
        })
    }

    /// 计算内在价值，基准利率为 0 时返回 0.0
    pub fn intrinsic_value(&self) -> f64 {
        if self.reference_rate == 0.0 {
            return 0.0;
        }

        let growth = normalize_growth_rate(self.growth_rate);
        let value = (self.earnings_per_share * (NO_GROWTH_MULTIPLE + 2.0 * growth) * BOND_YIELD_FACTOR)
            / self.reference_rate;

        round2(value)
    }
}

/// 计算内在价值
pub fn compute_intrinsic_value(
    earnings_per_share: Option<f64>,
    growth_rate_estimate: f64,
    reference_rate: f64,
) -> AnalyzerResult<f64> {
    Ok(ValuationInput::new(earnings_per_share, growth_rate_estimate, reference_rate)?.intrinsic_value())
}

/// 安全边际（%）= (内在价值 - 当前价格) / 当前价格 × 100
pub fn margin_of_safety(intrinsic_value: f64, current_price: f64) -> AnalyzerResult<f64> {
    if current_price == 0.0 {
        return Err(AnalyzerError::DivisionUndefined);
    }
    Ok(round2((intrinsic_value - current_price) / current_price * 100.0))
}
