//! Application state and route table
//!
//! The binary and the HTTP tests build their `App` the same way: register an
//! [`AppState`], wrap the rate limiter, then call [`configure`].

use actix_web::{web, HttpRequest, HttpResponse};
use std::sync::Arc;

use sg_core::services::auth::SessionService;
use sg_shared::errors::{error_codes, ErrorResponse};
use sg_shared::types::HealthResponse;

use crate::middleware::auth::JwtAuth;
use crate::middleware::rate_limit::client_ip;
use crate::routes::{auth, me};

/// Application state shared by all workers
pub struct AppState {
    pub session: Arc<SessionService>,
    /// Key login attempts by forwarded headers rather than the peer address
    pub trust_forwarded_headers: bool,
}

impl AppState {
    pub fn new(session: Arc<SessionService>) -> Self {
        Self {
            session,
            trust_forwarded_headers: false,
        }
    }

    pub fn with_trusted_forwarding(mut self, trust: bool) -> Self {
        self.trust_forwarded_headers = trust;
        self
    }

    /// Client key for rate limiting `req`
    pub fn client_key(&self, req: &HttpRequest) -> String {
        client_ip(req, self.trust_forwarded_headers)
    }
}

/// Register every route
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/v1")
                .service(
                    web::scope("/auth")
                        .route("/login", web::post().to(auth::login::login))
                        .route("/refresh", web::post().to(auth::refresh::refresh))
                        .route(
                            "/logout",
                            web::post().to(auth::logout::logout).wrap(JwtAuth::new()),
                        )
                        .route(
                            "/password/forgot",
                            web::post().to(auth::password::forgot_password),
                        )
                        .route(
                            "/password/reset",
                            web::post().to(auth::password::reset_password),
                        ),
                )
                .route("/me", web::get().to(me::me).wrap(JwtAuth::new())),
        )
        .default_service(web::route().to(not_found));
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse::healthy(env!("CARGO_PKG_VERSION")))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
