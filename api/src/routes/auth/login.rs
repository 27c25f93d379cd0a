use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::app::AppState;
use crate::dto::auth::{AuthResponse, LoginRequest};
use crate::handlers::error::ApiResult;

/// Handler for POST /api/v1/auth/login
///
/// # Request Body
///
/// ```json
/// {
///     "email": "alice@example.com",
///     "password": "string"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "access_token": "eyJ...",
///     "refresh_token": "opaque_refresh_token",
///     "expires_in": 900,
///     "token_type": "Bearer"
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Malformed email or empty password
/// - 401 Unauthorized: Unknown email or wrong password
/// - 429 Too Many Requests: Login attempts exhausted for this client
pub async fn login(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    request.validate()?;

    let tokens = state
        .session
        .login(&state.client_key(&req), &request.email, &request.password)
        .await?;

    Ok(HttpResponse::Ok().json(AuthResponse::from(tokens)))
}
