pub mod analysis;
pub mod health;
pub mod quote;

use actix_web::{http::StatusCode, web, HttpResponse};

use crate::error::AnalyzerError;
use crate::models::ApiResponse;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(health::config)
            .configure(quote::config)
            .configure(analysis::config)
    );
}

/// 错误类型到 HTTP 状态码的映射
pub fn status_for(error: &AnalyzerError) -> StatusCode {
    match error {
        AnalyzerError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        AnalyzerError::TickerNotFound(_) => StatusCode::NOT_FOUND,
        AnalyzerError::DivisionUndefined => StatusCode::UNPROCESSABLE_ENTITY,
        AnalyzerError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
        AnalyzerError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// 构造统一格式的错误响应
pub fn error_response<T: serde::Serialize>(error: &AnalyzerError) -> HttpResponse {
    let status = status_for(error);
    if status.is_server_error() {
        log::error!("请求失败: {}", error);
    } else {
        log::warn!("请求失败: {}", error);
    }
    HttpResponse::build(status).json(ApiResponse::<T>::error(error.to_string()))
}
