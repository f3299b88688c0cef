//! Graham Analyzer 后端服务
//!
//! 获取 B3 股票行情与基本面，结合 SELIC 利率按格雷厄姆公式估算内在价值
//! 数据来源：brapi.dev、巴西央行 SGS

mod config;     // 配置加载
mod error;      // 领域错误类型
mod handlers;   // HTTP 请求处理器
mod middleware; // 中间件
mod models;     // 数据模型定义
mod services;   // 业务逻辑服务

use actix_web::{web, App, HttpServer, middleware::Logger};
use env_logger::Env;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::middleware::ApiKeyMiddleware;
use crate::services::export::{AnalysisLog, ReportExporter};
use crate::services::quote::BrapiQuoteProvider;
use crate::services::rate::BcbRateProvider;
use crate::services::AnalysisService;

/// 应用程序入口
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // 配置文件损坏时直接退出，避免以默认配置（无认证）启动
    let (config, source) = AppConfig::load()?;

    // 初始化日志系统，RUST_LOG 优先于配置文件
    env_logger::init_from_env(Env::default().default_filter_or(config.log.level.as_str()));

    match source {
        Some(path) => log::info!("从 {} 加载配置成功", path.display()),
        None => log::info!("未找到配置文件，使用默认配置"),
    }

    if config.api.api_key.is_empty() {
        log::warn!("未设置 API_KEY，接口认证已关闭");
    }
    if config.api.brapi_token.is_none() {
        log::warn!("未设置 API_TOKEN_BRAPI，brapi 请求可能受限");
    }

    let client = config.api.http_client()?;
    let quotes = BrapiQuoteProvider::new(
        client.clone(),
        &config.api.brapi_base_url,
        config.api.brapi_token.clone(),
        config.quote_ttl(),
    );
    let rates = BcbRateProvider::new(client, &config.api.bcb_base_url, config.rate_ttl());

    let analysis_log = AnalysisLog::new(&config.storage.history_csv);
    log::info!("分析记录文件: {}", analysis_log.path().display());

    let service = web::Data::new(AnalysisService::new(
        Arc::new(quotes),
        Arc::new(rates),
        analysis_log,
    ));
    let exporter = web::Data::new(ReportExporter::new(&config.storage.temp_dir));

    let bind_addr = config.bind_addr();
    let api_key = config.api.api_key.clone();
    log::info!("启动 Graham Analyzer 服务，监听 {}", bind_addr);

    // 创建并启动 HTTP 服务器
    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .app_data(exporter.clone())
            .wrap(ApiKeyMiddleware::new(&api_key))  // API Key 认证
            .wrap(Logger::default())  // 添加请求日志中间件
            .configure(handlers::config)  // 配置路由
    });

    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(&bind_addr)?.run().await?;
    Ok(())
}
