//! Request logging middleware.
//!
//! Emits one line per completed request under the `api` target. Paths listed
//! as quiet (health probes) are logged at debug level only. Authorization
//! headers are never logged.

use std::future::{Ready, ready};
use std::rc::Rc;
use std::time::Instant;

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::StatusCode;
use futures_util::future::LocalBoxFuture;
use tracing::{debug, error, info, warn};

/// Paths polled by orchestrators; logged at debug level.
const DEFAULT_QUIET_PATHS: &[&str] = &["/api/health"];

/// Request logger middleware factory.
#[derive(Clone)]
pub struct RequestLogger {
    quiet_paths: Rc<[&'static str]>,
}

impl RequestLogger {
    pub fn new() -> Self {
        Self::with_quiet_paths(DEFAULT_QUIET_PATHS)
    }

    pub fn with_quiet_paths(paths: &[&'static str]) -> Self {
        Self {
            quiet_paths: paths.into(),
        }
    }
}

impl Default for RequestLogger {
    fn default() -> Self {
        Self::new()
    }
}

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
        ready(Ok(RequestLoggerMiddleware {
            service,
            quiet_paths: self.quiet_paths.clone(),
        }))
    }
}

/// Request logger middleware service.
pub struct RequestLoggerMiddleware<S> {
    service: S,
    quiet_paths: Rc<[&'static str]>,
}

/// What is known about a request before it is handled.
struct RequestLine {
    method: String,
    path: String,
    query: String,
    remote_addr: String,
    quiet: bool,
}

impl RequestLine {
    fn log(&self, status: StatusCode, duration_ms: u128) {
        let status_code = status.as_u16();

        if self.quiet && status.is_success() {
            debug!(
                target: "api",
                method = %self.method,
                path = %self.path,
                status = status_code,
                duration_ms,
                "Request completed"
            );
        } else if status.is_success() || status.is_redirection() {
            info!(
                target: "api",
                method = %self.method,
                path = %self.path,
                query = %self.query,
                remote_addr = %self.remote_addr,
                status = status_code,
                duration_ms,
                "Request completed"
            );
        } else if status.is_client_error() {
            warn!(
                target: "api",
                method = %self.method,
                path = %self.path,
                query = %self.query,
                remote_addr = %self.remote_addr,
                status = status_code,
                duration_ms,
                "Client error"
            );
        } else {
            error!(
                target: "api",
                method = %self.method,
                path = %self.path,
                query = %self.query,
                remote_addr = %self.remote_addr,
                status = status_code,
                duration_ms,
                "Server error"
            );
        }
    }
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
        let path = req.path().to_string();
        let line = RequestLine {
            method: req.method().to_string(),
            quiet: self.quiet_paths.iter().any(|p| *p == path),
            path,
            query: req.query_string().to_string(),
            remote_addr: req
                .connection_info()
                .realip_remote_addr()
                .unwrap_or("unknown")
                .to_string(),
        };

        let fut = self.service.call(req);

        Box::pin(async move {
            match fut.await {
                Ok(res) => {
                    line.log(res.status(), start.elapsed().as_millis());
                    Ok(res)
                }
                Err(e) => {
                    let status = e.as_response_error().status_code();
                    line.log(status, start.elapsed().as_millis());
                    Err(e)
                }
            }
        })
    }
}
