use actix_web::{http::header, web, HttpResponse, Result};

use super::error_response;
use crate::models::{AnalysisQuery, AnalysisRecord, AnalysisReport, AnalysisRequest, ApiResponse};
use crate::services::export::ReportExporter;
use crate::services::AnalysisService;

pub async fn analyze(
    service: web::Data<AnalysisService>,
    path: web::Path<String>,
    query: web::Query<AnalysisQuery>,
) -> Result<HttpResponse> {
    let request = AnalysisRequest::new(&path.into_inner(), query.growth);

    match service.analyze(&request).await {
        Ok(report) => Ok(HttpResponse::Ok().json(ApiResponse::success(report))),
        Err(e) => Ok(error_response::<AnalysisReport>(&e)),
    }
}

/// 分析并下载文本报告
pub async fn download_report(
    service: web::Data<AnalysisService>,
    exporter: web::Data<ReportExporter>,
    path: web::Path<String>,
    query: web::Query<AnalysisQuery>,
) -> Result<HttpResponse> {
    let request = AnalysisRequest::new(&path.into_inner(), query.growth);

    let report = match service.analyze(&request).await {
        Ok(report) => report,
        Err(e) => return Ok(error_response::<()>(&e)),
    };

    match exporter.export(&report) {
        Ok(file) => Ok(HttpResponse::Ok()
            .content_type("text/plain; charset=utf-8")
            .insert_header((
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.file_name),
            ))
            .body(file.content)),
        Err(e) => Ok(error_response::<()>(&e)),
    }
}

pub async fn saved_history(service: web::Data<AnalysisService>) -> Result<HttpResponse> {
    match service.saved_records() {
        Ok(records) if records.is_empty() => Ok(HttpResponse::Ok().json(
            ApiResponse::success_with_message(records, "没有找到分析记录".to_string()),
        )),
        Ok(records) => Ok(HttpResponse::Ok().json(ApiResponse::success(records))),
        Err(e) => Ok(error_response::<Vec<AnalysisRecord>>(&e)),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/analysis")
            .route("/history", web::get().to(saved_history))
            .route("/{ticker}", web::get().to(analyze))
            .route("/{ticker}/report", web::get().to(download_report))
    );
}
