use std::future::{Ready, ready};

use actix_web::{
    Error, HttpMessage,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{HeaderName, HeaderValue},
};
use futures_util::future::LocalBoxFuture;
use uuid::Uuid;

pub const CORRELATION_HEADER: &str = "x-correlation-id";

#[derive(Debug, Clone)]
struct CorrelationId(String);

/// Tags every request with a correlation id and echoes it in the response
pub struct RequestIdMiddleware;

impl<S, B> Transform<S, ServiceRequest> for RequestIdMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestIdMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestIdMiddlewareService { service }))
    }
}

pub struct RequestIdMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestIdMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Reuse the caller's X-Correlation-ID when present
        let correlation_id = req
            .headers()
            .get(CORRELATION_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        req.extensions_mut().insert(CorrelationId(correlation_id.clone()));

        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;

            if let Ok(value) = HeaderValue::from_str(&correlation_id) {
                res.headers_mut()
                    .insert(HeaderName::from_static(CORRELATION_HEADER), value);
            }

            Ok(res)
        })
    }
}

// Extension trait to easily get correlation ID from request
pub trait RequestIdExt {
    fn correlation_id(&self) -> Option<String>;
}

impl RequestIdExt for actix_web::HttpRequest {
    fn correlation_id(&self) -> Option<String> {
        self.extensions().get::<CorrelationId>().map(|id| id.0.clone())
    }
}

impl RequestIdExt for ServiceRequest {
    fn correlation_id(&self) -> Option<String> {
        self.extensions().get::<CorrelationId>().map(|id| id.0.clone())
    }
}
