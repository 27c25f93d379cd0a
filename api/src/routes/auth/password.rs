use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::app::AppState;
use sg_shared::ApiResponse;

use crate::dto::auth::{ForgotPasswordRequest, ResetPasswordRequest};
use crate::handlers::error::ApiResult;

/// Handler for POST /api/v1/auth/password/forgot
///
/// Always answers the same way for known and unknown addresses.
///
/// ## Errors
/// - 400 Bad Request: Malformed email
/// - 429 Too Many Requests: Another request for this address within the cooldown
pub async fn forgot_password(
    state: web::Data<AppState>,
    request: web::Json<ForgotPasswordRequest>,
) -> ApiResult<HttpResponse> {
    request.validate()?;

    state.session.request_password_reset(&request.email).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(
        "If the address is registered, a reset link has been sent",
    )))
}

/// Handler for POST /api/v1/auth/password/reset
///
/// ## Errors
/// - 400 Bad Request: New password too short
/// - 401 Unauthorized: Unknown, expired or already used reset token
pub async fn reset_password(
    state: web::Data<AppState>,
    request: web::Json<ResetPasswordRequest>,
) -> ApiResult<HttpResponse> {
    request.validate()?;

    state
        .session
        .reset_password(&request.token, &request.new_password)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Password has been reset")))
}
