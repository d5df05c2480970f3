//! Request logging middleware.
//!
//! Every request gets a short id that appears on both its start and
//! completion lines, so concurrent uploads can be told apart in the log.

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};
use std::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Request logger middleware factory.
pub struct RequestLogger;

impl<S, B> Transform<S, ServiceRequest> for RequestLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLoggerMiddleware { service }))
    }
}

pub struct RequestLoggerMiddleware<S> {
    service: S,
}

/// First eight hex digits of a fresh v4 UUID.
fn short_request_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

impl<S, B> Service<ServiceRequest> for RequestLoggerMiddleware<S>
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
        let start = Instant::now();
        let request_id = short_request_id();
        let method = req.method().to_string();
        let path = req.path().to_string();
        let remote_addr = req
            .connection_info()
            .realip_remote_addr()
            .unwrap_or("unknown")
            .to_string();
        let content_length = req
            .headers()
            .get("content-length")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0);

        info!(
            target: "api",
            request_id = %request_id,
            method = %method,
            path = %path,
            remote_addr = %remote_addr,
            content_length = content_length,
            "→ Request started"
        );

        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await?;
            let elapsed_ms = start.elapsed().as_millis();
            let status = res.status().as_u16();

            if res.status().is_server_error() {
                error!(
                    target: "api",
                    request_id = %request_id,
                    method = %method,
                    path = %path,
                    status = status,
                    duration_ms = elapsed_ms,
                    "← Server error"
                );
            } else if res.status().is_client_error() {
                warn!(
                    target: "api",
                    request_id = %request_id,
                    method = %method,
                    path = %path,
                    status = status,
                    duration_ms = elapsed_ms,
                    "← Client error"
                );
            } else {
                info!(
                    target: "api",
                    request_id = %request_id,
                    method = %method,
                    path = %path,
                    status = status,
                    duration_ms = elapsed_ms,
                    "← Request completed"
                );
            }

            Ok(res)
        })
    }
}
