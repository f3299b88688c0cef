//! brapi 行情接口实现
//!
//! 对接 https://brapi.dev/api/quote/<ticker>
//! 一次请求同时获取实时价格、基本面（fundamental=true）、公司概况与关键指标

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use super::QuoteProvider;
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::models::{CompanyProfile, KeyStatistics, PricePoint, Quote};
use crate::services::cache::TtlCache;

/// 附加模块
const BRAPI_MODULES: &str = "summaryProfile,defaultKeyStatistics";

/// brapi 行情数据源，成功结果按代码缓存
pub struct BrapiQuoteProvider {
    client: Client,
    base_url: String,
    token: Option<String>,
    cache: TtlCache<String, Quote>,
}

impl BrapiQuoteProvider {
    pub fn new(client: Client, base_url: &str, token: Option<String>, ttl: Duration) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            cache: TtlCache::new(ttl),
        }
    }

    /// 构造请求地址，附带 12 个月的月线历史
    fn quote_url(&self, ticker: &str) -> AnalyzerResult<Url> {
        let mut params = vec![
            ("range", "1y"),
            ("interval", "1mo"),
            ("fundamental", "true"),
            ("modules", BRAPI_MODULES),
        ];
        if let Some(token) = self.token.as_deref() {
            params.push(("token", token));
        }

        let raw = format!("{}/api/quote/{}", self.base_url, ticker);
        Url::parse_with_params(&raw, &params)
            .map_err(|e| AnalyzerError::UpstreamUnavailable(format!("无效的行情地址 {}: {}", raw, e)))
    }
}

#[async_trait]
impl QuoteProvider for BrapiQuoteProvider {
    async fn fetch_quote(&self, ticker: &str) -> AnalyzerResult<Quote> {
        if let Some(quote) = self.cache.get(&ticker.to_string()) {
            log::debug!("行情缓存命中: {}", ticker);
            return Ok(quote);
        }

        let url = self.quote_url(ticker)?;
        log::info!("请求 brapi 行情: {}", ticker);

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let preview: String = body.chars().take(200).collect();
            return Err(AnalyzerError::UpstreamUnavailable(format!(
                "获取 {} 行情失败: {} - {}",
                ticker, status, preview
            )));
        }

        let json_data: Value = response
            .json()
            .await
            .map_err(|e| AnalyzerError::UpstreamUnavailable(format!("解析行情 JSON 失败: {}", e)))?;

        let quote = parse_brapi_quote(&json_data, ticker)?;
        self.cache.insert(ticker.to_string(), quote.clone());

        Ok(quote)
    }
}

/// 解析 brapi 响应
///
/// 格式: {"results":[{"symbol":"PETR4","longName":"...","regularMarketPrice":38.5,"eps":5.1,...}]}
pub fn parse_brapi_quote(data: &Value, ticker: &str) -> AnalyzerResult<Quote> {
    let item = data["results"]
        .as_array()
        .and_then(|results| results.first())
        .ok_or_else(|| AnalyzerError::TickerNotFound(ticker.to_string()))?;

    let price = item["regularMarketPrice"]
        .as_f64()
        .filter(|price| *price > 0.0)
        .ok_or_else(|| AnalyzerError::UpstreamUnavailable(format!("{} 缺少有效的当前价格", ticker)))?;

    let name = item["longName"]
        .as_str()
        .or_else(|| item["shortName"].as_str())
        .filter(|name| !name.is_empty())
        .unwrap_or(ticker)
        .to_string();

    let key_statistics: Option<KeyStatistics> = parse_module(&item["defaultKeyStatistics"]);
    let profile: Option<CompanyProfile> = parse_module(&item["summaryProfile"]);

    // trailingEps 比 fundamental 中的 eps 更完整，非零时优先使用
    let earnings_per_share = key_statistics
        .as_ref()
        .and_then(|stats| stats.trailing_eps)
        .filter(|eps| *eps != 0.0)
        .or_else(|| item["eps"].as_f64());

    Ok(Quote {
        ticker: item["symbol"].as_str().unwrap_or(ticker).to_string(),
        name,
        price,
        earnings_per_share,
        price_to_book: item["priceToBook"].as_f64(),
        dividend_yield: item["dividendYield"].as_f64(),
        profile,
        key_statistics,
        history: parse_history(&item["historicalDataPrice"]),
    })
}

fn parse_module<T: serde::de::DeserializeOwned>(value: &Value) -> Option<T> {
    if !value.is_object() {
        return None;
    }
    match serde_json::from_value(value.clone()) {
        Ok(module) => Some(module),
        Err(e) => {
            log::warn!("忽略无法解析的模块数据: {}", e);
            None
        }
    }
}

/// 解析历史收盘价，跳过缺少日期或收盘价的条目，按日期升序排列
fn parse_history(value: &Value) -> Vec<PricePoint> {
    let mut history: Vec<PricePoint> = value
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|item| {
                    let date = parse_date(&item["date"])?;
                    let close = item["close"].as_f64()?;
                    Some(PricePoint { date, close })
                })
                .collect()
        })
        .unwrap_or_default();

    history.sort_by_key(|point| point.date);
    history
}

/// 日期可能是 Unix 时间戳（秒）或 ISO 日期字符串
fn parse_date(value: &Value) -> Option<NaiveDate> {
    if let Some(secs) = value.as_i64() {
        return DateTime::from_timestamp(secs, 0).map(|dt| dt.date_naive());
    }
    let text = value.as_str()?;
    NaiveDate::parse_from_str(text.get(..10)?, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_payload() -> Value {
        json!({
            "results": [{
                "symbol": "PETR4",
                "shortName": "PETROBRAS PN",
                "longName": "Petróleo Brasileiro S.A. - Petrobras",
                "regularMarketPrice": 38.52,
                "eps": 5.1,
                "priceToBook": 1.21,
                "dividendYield": 14.3,
                "historicalDataPrice": [
                    { "date": 1706745600, "close": 40.1 },
                    { "date": 1704067200, "close": 37.9 },
                    { "date": 1709251200, "close": null }
                ],
                "summaryProfile": {
                    "sector": "Energy",
                    "industry": "Oil & Gas Integrated",
                    "longBusinessSummary": "Petrobras explores and produces oil."
                },
                "defaultKeyStatistics": {
                    "trailingEps": 6.02,
                    "marketCap": 5.0e11
                }
            }]
        })
    }

    #[test]
    fn test_parse_full_payload() {
        let quote = parse_brapi_quote(&sample_payload(), "PETR4").unwrap();

        assert_eq!(quote.ticker, "PETR4");
        assert_eq!(quote.name, "Petróleo Brasileiro S.A. - Petrobras");
        assert_eq!(quote.price, 38.52);
        assert_eq!(quote.earnings_per_share, Some(6.02));
        assert_eq!(quote.price_to_book, Some(1.21));
        assert_eq!(quote.dividend_yield, Some(14.3));
        assert_eq!(quote.profile.unwrap().sector.as_deref(), Some("Energy"));
        assert_eq!(quote.key_statistics.unwrap().market_cap, Some(5.0e11));
    }

    #[test]
    fn test_history_sorted_and_filtered() {
        let quote = parse_brapi_quote(&sample_payload(), "PETR4").unwrap();

        assert_eq!(quote.history.len(), 2);
        assert_eq!(quote.history[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(quote.history[0].close, 37.9);
        assert_eq!(quote.history[1].date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
    }

    #[test]
    fn test_eps_fallback_when_trailing_missing() {
        let mut payload = sample_payload();
        payload["results"][0]["defaultKeyStatistics"]["trailingEps"] = json!(0);
        let quote = parse_brapi_quote(&payload, "PETR4").unwrap();
        assert_eq!(quote.earnings_per_share, Some(5.1));

        payload["results"][0]["defaultKeyStatistics"] = Value::Null;
        payload["results"][0]["eps"] = Value::Null;
        let quote = parse_brapi_quote(&payload, "PETR4").unwrap();
        assert_eq!(quote.earnings_per_share, None);
        assert!(quote.key_statistics.is_none());
    }

    #[test]
    fn test_name_fallbacks() {
        let mut payload = sample_payload();
        payload["results"][0]["longName"] = Value::Null;
        assert_eq!(parse_brapi_quote(&payload, "PETR4").unwrap().name, "PETROBRAS PN");

        payload["results"][0]["shortName"] = Value::Null;
        assert_eq!(parse_brapi_quote(&payload, "PETR4").unwrap().name, "PETR4");
    }

    #[test]
    fn test_empty_results_is_not_found() {
        for payload in [json!({ "results": [] }), json!({})] {
            let err = parse_brapi_quote(&payload, "XXXX3").unwrap_err();
            assert!(matches!(err, AnalyzerError::TickerNotFound(ref t) if t == "XXXX3"));
        }
    }

    #[test]
    fn test_missing_price_is_upstream_error() {
        let mut payload = sample_payload();
        payload["results"][0]["regularMarketPrice"] = Value::Null;
        let err = parse_brapi_quote(&payload, "PETR4").unwrap_err();
        assert!(matches!(err, AnalyzerError::UpstreamUnavailable(_)));
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(
            parse_date(&json!("2024-03-01T00:00:00.000Z")),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        assert_eq!(parse_date(&json!(1704067200)), NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(parse_date(&json!("bad")), None);
    }

    #[test]
    fn test_quote_url() {
        let provider = BrapiQuoteProvider::new(
            Client::new(),
            "https://brapi.dev/",
            Some("secret".to_string()),
            Duration::from_secs(600),
        );
        let url = provider.quote_url("PETR4").unwrap();

        assert_eq!(url.path(), "/api/quote/PETR4");
        let query = url.query().unwrap();
        assert!(query.contains("range=1y"));
        assert!(query.contains("interval=1mo"));
        assert!(query.contains("fundamental=true"));
        assert!(query.contains("token=secret"));
    }

    #[tokio::test]
    async fn test_unreachable_upstream() {
        let provider = BrapiQuoteProvider::new(
            Client::new(),
            "http://127.0.0.1:1",
            None,
            Duration::from_secs(600),
        );
        let err = provider.fetch_quote("PETR4").await.unwrap_err();
        assert!(matches!(err, AnalyzerError::UpstreamUnavailable(_)));
    }

    fn mock_provider(server: &wiremock::MockServer) -> BrapiQuoteProvider {
        BrapiQuoteProvider::new(Client::new(), &server.uri(), None, Duration::from_secs(600))
    }

    #[tokio::test]
    async fn test_second_fetch_hits_cache() {
        use wiremock::matchers::{method, path, query_param};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/quote/PETR4"))
            .and(query_param("fundamental", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_payload()))
            .expect(1)
            .mount(&server)
            .await;

        let provider = mock_provider(&server);
        let first = provider.fetch_quote("PETR4").await.unwrap();
        let second = provider.fetch_quote("PETR4").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(second.earnings_per_share, Some(6.02));
    }

    #[tokio::test]
    async fn test_error_status_is_not_cached() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/quote/PETR4"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .expect(2)
            .mount(&server)
            .await;

        let provider = mock_provider(&server);
        for _ in 0..2 {
            let err = provider.fetch_quote("PETR4").await.unwrap_err();
            assert!(matches!(err, AnalyzerError::UpstreamUnavailable(ref msg) if msg.contains("503")));
        }
    }

    #[tokio::test]
    async fn test_empty_results_over_http() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/quote/XXXX3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
            .expect(2)
            .mount(&server)
            .await;

        let provider = mock_provider(&server);
        for _ in 0..2 {
            let err = provider.fetch_quote("XXXX3").await.unwrap_err();
            assert!(matches!(err, AnalyzerError::TickerNotFound(_)));
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_upstream_error() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/quote/PETR4"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .expect(1)
            .mount(&server)
            .await;

        let err = mock_provider(&server).fetch_quote("PETR4").await.unwrap_err();
        assert!(matches!(err, AnalyzerError::UpstreamUnavailable(_)));
    }
}
