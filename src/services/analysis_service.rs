//! 估值分析服务
//!
//! 串联代码校验、行情与利率获取、估值计算、安全边际和分析记录

use std::sync::Arc;

use crate::error::{AnalyzerError, AnalyzerResult};
use crate::models::{
    get_market_time, AnalysisRecord, AnalysisReport, AnalysisRequest, Quote, GROWTH_RATE_BOUNDS,
};
use crate::services::export::AnalysisLog;
use crate::services::quote::QuoteProvider;
use crate::services::rate::ReferenceRateProvider;
use crate::services::validator::is_valid_ticker;
use crate::services::valuation::{compute_intrinsic_value, margin_of_safety};

pub struct AnalysisService {
    quotes: Arc<dyn QuoteProvider>,
    rates: Arc<dyn ReferenceRateProvider>,
    log: AnalysisLog,
}

impl AnalysisService {
    pub fn new(
        quotes: Arc<dyn QuoteProvider>,
        rates: Arc<dyn ReferenceRateProvider>,
        log: AnalysisLog,
    ) -> Self {
        Self { quotes, rates, log }
    }

    /// 校验并获取行情
    pub async fn quote(&self, ticker: &str) -> AnalyzerResult<Quote> {
        let ticker = validated_ticker(ticker)?;
        self.quotes.fetch_quote(&ticker).await
    }

    pub async fn reference_rate(&self) -> AnalyzerResult<f64> {
        self.rates.fetch_reference_rate().await
    }

    /// 已保存的分析记录
    pub fn saved_records(&self) -> AnalyzerResult<Vec<AnalysisRecord>> {
        self.log.read_all()
    }

    /// 执行一次完整分析并追加分析记录
    pub async fn analyze(&self, request: &AnalysisRequest) -> AnalyzerResult<AnalysisReport> {
        let ticker = validated_ticker(&request.ticker)?;
        let growth_rate = validated_growth(request.growth_rate)?;

        let quote = self.quotes.fetch_quote(&ticker).await?;
        let reference_rate = self.rates.fetch_reference_rate().await?;

        let earnings_per_share = quote
            .earnings_per_share
            .ok_or_else(|| AnalyzerError::InvalidInput(format!("{} 的 EPS 不可用", ticker)))?;

        let intrinsic_value = compute_intrinsic_value(Some(earnings_per_share), growth_rate, reference_rate)?;
        let margin_percent = margin_of_safety(intrinsic_value, quote.price)?;

        log::info!(
            "分析完成 {}: EPS={} g={} 利率={} 内在价值={} 价格={} 安全边际={}%",
            ticker, earnings_per_share, growth_rate, reference_rate, intrinsic_value, quote.price, margin_percent
        );

        let mut report = AnalysisReport {
            date: get_market_time().date_naive(),
            warnings: collect_warnings(earnings_per_share, growth_rate, reference_rate, intrinsic_value),
            ticker: quote.ticker,
            name: quote.name,
            earnings_per_share,
            growth_rate,
            reference_rate,
            intrinsic_value,
            current_price: quote.price,
            margin_percent,
            price_to_book: quote.price_to_book,
            dividend_yield: quote.dividend_yield,
            profile: quote.profile,
            key_statistics: quote.key_statistics,
            history: quote.history,
        };

        if let Err(e) = self.log.append(&AnalysisRecord::from(&report)) {
            log::error!("保存分析记录失败: {}", e);
            report.warnings.push(format!("保存分析记录失败: {}", e));
        }

        Ok(report)
    }
}

fn validated_ticker(ticker: &str) -> AnalyzerResult<String> {
    let ticker = ticker.trim().to_uppercase();
    if !is_valid_ticker(&ticker) {
        return Err(AnalyzerError::InvalidInput(format!(
            "无效的股票代码 '{}'，只能包含字母和数字且至少 4 位",
            ticker
        )));
    }
    Ok(ticker)
}

fn validated_growth(growth_rate: f64) -> AnalyzerResult<f64> {
    let (min, max) = GROWTH_RATE_BOUNDS;
    if !growth_rate.is_finite() || growth_rate < min || growth_rate > max {
        return Err(AnalyzerError::InvalidInput(format!(
            "增长率 {} 超出范围 [{}, {}]",
            growth_rate, min, max
        )));
    }
    Ok(growth_rate)
}

/// 引擎不截断异常输入，这里生成面向用户的提示
fn collect_warnings(eps: f64, growth_rate: f64, reference_rate: f64, intrinsic_value: f64) -> Vec<String> {
    let mut warnings = Vec::new();

    if reference_rate == 0.0 {
        warnings.push("基准利率为零，无法计算内在价值".to_string());
    }
    if eps < 0.0 {
        warnings.push("EPS 为负，格雷厄姆公式对亏损公司没有意义".to_string());
    }
    if intrinsic_value < 0.0 {
        warnings.push("估算的内在价值为负".to_string());
    }
    if growth_rate != 0.0 && growth_rate.abs() < 1.0 {
        warnings.push(format!(
            "增长率 {} 的绝对值小于 1，已按小数解读为 {}%",
            growth_rate,
            growth_rate * 100.0
        ));
    }

    warnings
}
