use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::app::AppState;
use crate::dto::auth::{AuthResponse, RefreshTokenRequest};
use crate::handlers::error::ApiResult;

/// Handler for POST /api/v1/auth/refresh
///
/// Exchanges a refresh token for a new token pair. The presented refresh
/// token stops working.
///
/// # Request Body
///
/// ```json
/// {
///     "refresh_token": "string"
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: Unknown, expired or already used refresh token
pub async fn refresh(
    state: web::Data<AppState>,
    request: web::Json<RefreshTokenRequest>,
) -> ApiResult<HttpResponse> {
    request.validate()?;

    let tokens = state.session.refresh(&request.refresh_token).await?;

    Ok(HttpResponse::Ok().json(AuthResponse::from(tokens)))
}
