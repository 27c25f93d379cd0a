use actix_web::{web, HttpResponse};

use crate::app::AppState;
use sg_shared::ApiResponse;

use crate::dto::auth::LogoutRequest;
use crate::handlers::error::ApiResult;
use crate::middleware::auth::AuthContext;

/// Handler for POST /api/v1/auth/logout
///
/// Revokes the presented access token for the rest of its lifetime and,
/// when the body names one, the refresh token.
///
/// # Headers
///
/// ```text
/// Authorization: Bearer {access_token}
/// ```
///
/// # Request Body (optional)
///
/// ```json
/// {
///     "refresh_token": "string"
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: Invalid access token, or a refresh token issued to someone else
pub async fn logout(
    state: web::Data<AppState>,
    auth: AuthContext,
    request: Option<web::Json<LogoutRequest>>,
) -> ApiResult<HttpResponse> {
    let refresh_token = request.and_then(|body| body.into_inner().refresh_token);

    state
        .session
        .logout(&auth.access_token, refresh_token.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok("Logged out successfully")))
}
