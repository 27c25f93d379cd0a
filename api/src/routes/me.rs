use actix_web::HttpResponse;

use sg_shared::types::ApiResponse;

use crate::middleware::auth::AuthContext;

/// Handler for GET /api/v1/me
///
/// Returns the identity carried by the caller's access token.
pub async fn me(auth: AuthContext) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::success(auth.identity))
}
