//! Rate limiting middleware for API endpoints
//!
//! Every request is charged to its client key in a shared
//! `RateLimiterRegistry` before it reaches a handler. Rejected requests get
//! `429` with `Retry-After` set to the wait for the client's next token.
//! Rejections are logged at most once per client per `rejection_log_interval`.
//!
//! The client key is the peer address unless forwarded headers are trusted.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    Error, HttpRequest, HttpResponse,
};
use futures_util::future::LocalBoxFuture;
use std::{
    collections::HashMap,
    future::{ready, Ready},
    rc::Rc,
    sync::{Arc, Mutex, PoisonError},
    task::{Context, Poll},
    time::{Duration, Instant},
};

use sg_core::services::rate_limit::RateLimiterRegistry;
use sg_shared::config::RateLimitConfig;
use sg_shared::errors::{error_codes, ErrorResponse};

use crate::handlers::error::retry_after_secs;

/// Remembers when each client's rejection was last logged
#[derive(Debug)]
pub struct RejectionLog {
    interval: Duration,
    last_logged: Mutex<HashMap<String, Instant>>,
}

impl RejectionLog {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_logged: Mutex::new(HashMap::new()),
        }
    }

    /// Whether a rejection for `client` should be logged at `now`; records
    /// the log time when it should
    pub fn should_log(&self, client: &str, now: Instant) -> bool {
        let mut last_logged = self
            .last_logged
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // entries past the interval carry no information
        let interval = self.interval;
        last_logged.retain(|_, at| now.saturating_duration_since(*at) < interval);

        if last_logged.contains_key(client) {
            return false;
        }
        last_logged.insert(client.to_string(), now);
        true
    }
}

/// Rate limiter middleware factory
#[derive(Clone)]
pub struct RateLimiter {
    registry: Arc<RateLimiterRegistry>,
    enabled: bool,
    trust_forwarded_headers: bool,
    rejections: Arc<RejectionLog>,
}

impl RateLimiter {
    /// Create a rate limiter over `registry`
    pub fn new(registry: Arc<RateLimiterRegistry>, config: &RateLimitConfig) -> Self {
        Self {
            registry,
            enabled: config.enabled,
            trust_forwarded_headers: config.trust_forwarded_headers,
            rejections: Arc::new(RejectionLog::new(config.rejection_log_interval())),
        }
    }

    pub fn registry(&self) -> &Arc<RateLimiterRegistry> {
        &self.registry
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimiter
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimiterMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimiterMiddleware {
            service: Rc::new(service),
            limiter: self.clone(),
        }))
    }
}

/// Rate limiter middleware service
pub struct RateLimiterMiddleware<S> {
    service: Rc<S>,
    limiter: RateLimiter,
}

impl<S, B> Service<ServiceRequest> for RateLimiterMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        if self.limiter.enabled {
            let client = client_ip(req.request(), self.limiter.trust_forwarded_headers);
            if !self.limiter.registry.allow(&client) {
                if self.limiter.rejections.should_log(&client, Instant::now()) {
                    tracing::warn!(
                        client = %client,
                        path = %req.path(),
                        "Rate limit exceeded"
                    );
                }
                let response = too_many_requests(self.limiter.registry.retry_after(&client));
                return Box::pin(async move { Ok(req.into_response(response).map_into_right_body()) });
            }
        }

        Box::pin(async move {
            let response = service.call(req).await?;
            Ok(response.map_into_left_body())
        })
    }
}

fn too_many_requests(wait: Duration) -> HttpResponse {
    HttpResponse::TooManyRequests()
        .insert_header((header::RETRY_AFTER, retry_after_secs(wait)))
        .json(ErrorResponse::new(
            error_codes::RATE_LIMIT_EXCEEDED,
            "too many requests, retry later",
        ))
}

/// Client key for rate limiting.
///
/// With `trust_forwarded_headers` the first `X-Forwarded-For` entry wins, then
/// `X-Real-IP`. Otherwise, and when neither header is usable, the peer
/// address is used, since clients can set those headers to anything.
pub fn client_ip(req: &HttpRequest, trust_forwarded_headers: bool) -> String {
    if trust_forwarded_headers {
        if let Some(ip) = forwarded_ip(req) {
            return ip;
        }
    }

    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn forwarded_ip(req: &HttpRequest) -> Option<String> {
    if let Some(forwarded_for) = req.headers().get("X-Forwarded-For") {
        if let Ok(forwarded_str) = forwarded_for.to_str() {
            if let Some(ip) = forwarded_str.split(',').next() {
                let ip = ip.trim();
                if !ip.is_empty() {
                    return Some(ip.to_string());
                }
            }
        }
    }

    let real_ip = req.headers().get("X-Real-IP")?.to_str().ok()?.trim();
    (!real_ip.is_empty()).then(|| real_ip.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_client_ip_uses_forwarded_headers_when_trusted() {
        let req = TestRequest::default()
            .peer_addr("10.0.0.1:443".parse().unwrap())
            .insert_header(("X-Forwarded-For", "203.0.113.7, 10.0.0.1"))
            .insert_header(("X-Real-IP", "198.51.100.2"))
            .to_http_request();
        assert_eq!(client_ip(&req, true), "203.0.113.7");

        let req = TestRequest::default()
            .peer_addr("10.0.0.1:443".parse().unwrap())
            .insert_header(("X-Real-IP", "198.51.100.2"))
            .to_http_request();
        assert_eq!(client_ip(&req, true), "198.51.100.2");

        let req = TestRequest::default()
            .peer_addr("10.0.0.1:443".parse().unwrap())
            .to_http_request();
        assert_eq!(client_ip(&req, true), "10.0.0.1");
    }

    #[test]
    fn test_client_ip_ignores_forwarded_headers_by_default() {
        let req = TestRequest::default()
            .peer_addr("192.0.2.10:5555".parse().unwrap())
            .insert_header(("X-Forwarded-For", "203.0.113.7"))
            .insert_header(("X-Real-IP", "198.51.100.2"))
            .to_http_request();
        assert_eq!(client_ip(&req, false), "192.0.2.10");

        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "203.0.113.7"))
            .to_http_request();
        assert_eq!(client_ip(&req, false), "unknown");
    }

    #[test]
    fn test_rejection_log_once_per_interval() {
        let log = RejectionLog::new(Duration::from_secs(20));
        let start = Instant::now();

        assert!(log.should_log("a", start));
        assert!(!log.should_log("a", start + Duration::from_secs(5)));
        assert!(log.should_log("b", start + Duration::from_secs(5)));
        assert!(!log.should_log("a", start + Duration::from_secs(19)));
        assert!(log.should_log("a", start + Duration::from_secs(20)));
    }
}
