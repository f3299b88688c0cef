//! 健康检查接口（不需要认证）

use actix_web::{web, HttpResponse, Result};
use serde::Serialize;

use crate::models::ApiResponse;

/// 服务状态
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub service: &'static str,
    pub version: &'static str,
}

pub async fn health_check() -> Result<HttpResponse> {
    let status = HealthStatus {
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    };
    let response = ApiResponse::success_with_message(status, "服务运行正常".to_string());
    Ok(HttpResponse::Ok().json(response))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}
