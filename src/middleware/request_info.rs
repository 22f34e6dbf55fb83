use std::{future::Future, pin::Pin, rc::Rc};

use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest,
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::{Ready, ready};

use crate::database::models::ClientInfo;

/// Client details recorded in audit entries and login attempts
#[derive(Clone, Debug)]
pub struct RequestInfo {
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub method: String,
    pub path: String,
}

impl RequestInfo {
    fn from_http_request(req: &HttpRequest) -> Self {
        RequestInfo {
            user_agent: req
                .headers()
                .get("user-agent")
                .and_then(|h| h.to_str().ok())
                .map(str::to_string),
            ip_address: req.connection_info().realip_remote_addr().map(str::to_string),
            method: req.method().to_string(),
            path: req.path().to_string(),
        }
    }

    pub fn client(&self) -> ClientInfo {
        ClientInfo {
            ip_address: self.ip_address.clone(),
            user_agent: self.user_agent.clone(),
        }
    }
}

impl From<RequestInfo> for ClientInfo {
    fn from(info: RequestInfo) -> Self {
        ClientInfo {
            ip_address: info.ip_address,
            user_agent: info.user_agent,
        }
    }
}

impl FromRequest for RequestInfo {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // Set by the middleware when it is mounted
        let info = req
            .extensions()
            .get::<RequestInfo>()
            .cloned()
            .unwrap_or_else(|| RequestInfo::from_http_request(req));
        ready(Ok(info))
    }
}

pub struct RequestInfoMiddleware;

impl<S, B> Transform<S, ServiceRequest> for RequestInfoMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RequestInfoMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestInfoMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct RequestInfoMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequestInfoMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let info = RequestInfo::from_http_request(req.request());
            req.extensions_mut().insert(info);

            service.call(req).await
        })
    }
}
