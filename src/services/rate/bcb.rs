//! 巴西央行 SELIC 利率接口实现
//!
//! 对接 SGS 时间序列 11: https://api.bcb.gov.br/dados/serie/bcdata.sgs.11/dados/ultimos/1?formato=json

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use super::ReferenceRateProvider;
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::services::cache::TtlCache;
use crate::services::valuation::round2;

/// SELIC 序列最新一条数据
const SELIC_SERIES_PATH: &str = "/dados/serie/bcdata.sgs.11/dados/ultimos/1";

/// 央行利率数据源，只有一个值，全局缓存
pub struct BcbRateProvider {
    client: Client,
    base_url: String,
    cache: TtlCache<(), f64>,
}

impl BcbRateProvider {
    pub fn new(client: Client, base_url: &str, ttl: Duration) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            cache: TtlCache::new(ttl),
        }
    }
}

#[async_trait]
impl ReferenceRateProvider for BcbRateProvider {
    async fn fetch_reference_rate(&self) -> AnalyzerResult<f64> {
        if let Some(rate) = self.cache.get(&()) {
            return Ok(rate);
        }

        let url = format!("{}{}", self.base_url, SELIC_SERIES_PATH);
        log::info!("请求 SELIC 利率: {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("formato", "json")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AnalyzerError::UpstreamUnavailable(format!(
                "获取 SELIC 利率失败: {}",
                response.status()
            )));
        }

        let json_data: Value = response
            .json()
            .await
            .map_err(|e| AnalyzerError::UpstreamUnavailable(format!("解析利率 JSON 失败: {}", e)))?;

        let rate = parse_selic_response(&json_data)?;
        self.cache.insert((), rate);

        Ok(rate)
    }
}

/// 解析 SGS 响应
///
/// 格式: [{"data":"15/10/2026","valor":"0,055131"}]
pub fn parse_selic_response(data: &Value) -> AnalyzerResult<f64> {
    let valor = data
        .as_array()
        .and_then(|arr| arr.first())
        .and_then(|item| item["valor"].as_str())
        .ok_or_else(|| AnalyzerError::UpstreamUnavailable("SELIC 响应缺少 valor 字段".to_string()))?;

    parse_locale_decimal(valor)
        .map(round2)
        .ok_or_else(|| AnalyzerError::UpstreamUnavailable(format!("无法解析 SELIC 数值: {}", valor)))
}

/// 解析逗号作小数点的数字，如 "10,50"
fn parse_locale_decimal(text: &str) -> Option<f64> {
    text.trim().replace(',', ".").parse::<f64>().ok().filter(|v| v.is_finite())
}
