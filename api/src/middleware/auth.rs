//! Bearer token authentication middleware for protecting API endpoints.
//!
//! Extracts the access token from the `Authorization` header, resolves it
//! through `SessionService::authenticate_request` (signature, expiry,
//! blacklist, payload decryption) and injects an [`AuthContext`] into the
//! request extensions.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    http::header::AUTHORIZATION,
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    task::{Context, Poll},
};

use sg_core::domain::entities::identity::Identity;
use sg_core::errors::DomainError;

use crate::app::AppState;
use crate::handlers::error::domain_error_response;

/// Authentication context injected into requests
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Identity decrypted from the access token
    pub identity: Identity,
    /// The raw access token, needed to revoke it on logout
    pub access_token: String,
}

/// Bearer authentication middleware factory
#[derive(Debug, Clone, Copy, Default)]
pub struct JwtAuth;

impl JwtAuth {
    pub fn new() -> Self {
        Self
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// Bearer authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let Some(token) = extract_bearer_token(&req) else {
                let response = domain_error_response(&DomainError::Unauthorized);
                return Ok(req.into_response(response).map_into_right_body());
            };

            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                tracing::error!("Application state missing, cannot authenticate request");
                let response = domain_error_response(&DomainError::internal("application state missing"));
                return Ok(req.into_response(response).map_into_right_body());
            };

            let identity = match state.session.authenticate_request(&token).await {
                Ok(identity) => identity,
                Err(e) => {
                    let response = domain_error_response(&e);
                    return Ok(req.into_response(response).map_into_right_body());
                }
            };

            req.extensions_mut().insert(AuthContext {
                identity,
                access_token: token,
            });

            let response = service.call(req).await?;
            Ok(response.map_into_left_body())
        })
    }
}

/// Extracts Bearer token from Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| token.to_string())
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ErrorUnauthorized("unauthorized"));

        ready(result)
    }
}
