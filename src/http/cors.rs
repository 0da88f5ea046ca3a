//! CORS header decorator
//!
//! Wraps any hyper service and appends `Access-Control-Allow-Origin` to every
//! response it produces, after all headers the inner service already set.

use std::future::Future;
use std::pin::Pin;

use hyper::header::{HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN};
use hyper::service::Service;
use hyper::{Request, Response};

/// Service decorator adding a fixed allow-origin header
///
/// Only responses produced by the wrapped service are covered. Requests hyper
/// cannot parse are answered with hyper's own 400 before any service runs, so
/// that response carries no allow-origin header.
#[derive(Debug, Clone)]
pub struct CorsService<S> {
    inner: S,
    allow_origin: HeaderValue,
}

impl<S> CorsService<S> {
    pub const fn new(inner: S, allow_origin: HeaderValue) -> Self {
        Self {
            inner,
            allow_origin,
        }
    }
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for CorsService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
    ResBody: Send + 'static,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: Request<ReqBody>) -> Self::Future {
        let response = self.inner.call(req);
        let allow_origin = self.allow_origin.clone();

        Box::pin(async move {
            let mut response = response.await?;
            response
                .headers_mut()
                .append(ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin);
            Ok(response)
        })
    }
}
