//! API Key 认证中间件
//!
//! 通过 Header 中的 Authorization: Bearer <token> 进行认证，
//! 未配置 API Key 时放行所有请求

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpResponse,
    body::EitherBody,
};
use futures::future::{ok, LocalBoxFuture, Ready};
use std::rc::Rc;

use crate::models::ApiResponse;

/// 免认证的健康检查路由
const HEALTH_PATH: &str = "/api/v1/health";

/// API Key 中间件
pub struct ApiKeyMiddleware {
    api_key: Rc<Option<String>>,
}

impl ApiKeyMiddleware {
    pub fn new(api_key: &str) -> Self {
        let api_key = Some(api_key.trim().to_string()).filter(|key| !key.is_empty());
        Self {
            api_key: Rc::new(api_key),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ApiKeyMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = ApiKeyMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(ApiKeyMiddlewareService {
            service: Rc::new(service),
            api_key: self.api_key.clone(),
        })
    }
}

pub struct ApiKeyMiddlewareService<S> {
    service: Rc<S>,
    api_key: Rc<Option<String>>,
}

impl<S, B> Service<ServiceRequest> for ApiKeyMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let api_key = self.api_key.clone();

        Box::pin(async move {
            // 未配置 Key 或健康检查接口直接放行
            let expected = match api_key.as_deref() {
                Some(key) if req.path() != HEALTH_PATH => key,
                _ => {
                    let res = service.call(req).await?;
                    return Ok(res.map_into_left_body());
                }
            };

            let provided_key = req
                .headers()
                .get("Authorization")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "));

            match provided_key {
                Some(key) if key == expected => {
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                _ => {
                    log::warn!("拒绝未授权请求: {}", req.path());
                    let response = HttpResponse::Unauthorized()
                        .json(ApiResponse::<()>::error("无效的 Bearer Token".to_string()));
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}
