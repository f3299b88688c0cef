//! 测试用的数据源替身

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{AnalyzerError, AnalyzerResult};
use crate::models::{PricePoint, Quote};
use crate::services::quote::QuoteProvider;
use crate::services::rate::ReferenceRateProvider;

/// 固定返回一条行情，None 时返回 TickerNotFound
pub struct StubQuotes {
    pub quote: Option<Quote>,
    pub calls: AtomicUsize,
}

impl StubQuotes {
    pub fn new(quote: Option<Quote>) -> Self {
        Self {
            quote,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuoteProvider for StubQuotes {
    async fn fetch_quote(&self, ticker: &str) -> AnalyzerResult<Quote> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.quote
            .clone()
            .ok_or_else(|| AnalyzerError::TickerNotFound(ticker.to_string()))
    }
}

/// 固定利率
pub struct StubRate(pub f64);

#[async_trait]
impl ReferenceRateProvider for StubRate {
    async fn fetch_reference_rate(&self) -> AnalyzerResult<f64> {
        Ok(self.0)
    }
}

pub fn sample_quote(eps: Option<f64>, price: f64) -> Quote {
    Quote {
        ticker: "PETR4".to_string(),
        name: "Petrobras".to_string(),
        price,
        earnings_per_share: eps,
        price_to_book: Some(1.2),
        dividend_yield: Some(9.8),
        profile: None,
        key_statistics: None,
        history: vec![PricePoint {
            date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            close: 17.0,
        }],
    }
}
