use actix_web::{web, HttpResponse, Result};

use super::error_response;
use crate::models::{ApiResponse, PricePoint, Quote, ReferenceRate};
use crate::services::AnalysisService;

pub async fn get_quote(
    service: web::Data<AnalysisService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let ticker = path.into_inner();

    match service.quote(&ticker).await {
        Ok(quote) => Ok(HttpResponse::Ok().json(ApiResponse::success(quote))),
        Err(e) => Ok(error_response::<Quote>(&e)),
    }
}

/// 收盘价序列（图表数据），按日期升序
pub async fn get_price_history(
    service: web::Data<AnalysisService>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let ticker = path.into_inner();

    match service.quote(&ticker).await {
        Ok(quote) if quote.history.is_empty() => Ok(HttpResponse::Ok().json(
            ApiResponse::success_with_message(quote.history, "没有可用的历史数据".to_string()),
        )),
        Ok(quote) => Ok(HttpResponse::Ok().json(ApiResponse::success(quote.history))),
        Err(e) => Ok(error_response::<Vec<PricePoint>>(&e)),
    }
}

pub async fn get_reference_rate(service: web::Data<AnalysisService>) -> Result<HttpResponse> {
    match service.reference_rate().await {
        Ok(rate) => Ok(HttpResponse::Ok().json(ApiResponse::success(ReferenceRate { rate }))),
        Err(e) => Ok(error_response::<ReferenceRate>(&e)),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/quotes")
            .route("/{ticker}", web::get().to(get_quote))
            .route("/{ticker}/history", web::get().to(get_price_history))
    )
    .route("/reference-rate", web::get().to(get_reference_rate));
}
