use actix_web::{get, http::header::AUTHORIZATION, post, web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    app_state::AppState,
    auth::{middleware::AuthenticatedUser, validator::Verdict},
    errors::AppError,
};

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub token: String,
    pub refresh_token: String,
    pub subject: String,
    pub role: String,
}

/// Rotate a refresh token into a new access+refresh pair. The old refresh
/// token is revoked first, so it cannot be replayed. Rejections use the same
/// TOKEN_EXPIRED / INVALID_TOKEN codes the gate uses.
#[post("/api/token/refresh")]
pub async fn refresh_token(
    state: web::Data<AppState>,
    request: web::Json<TokenRequest>,
) -> Result<HttpResponse, AppError> {
    let outcome = state.token_service.refresh(&request.token).await?;

    Ok(HttpResponse::Ok().json(RefreshResponse {
        token: outcome.token,
        refresh_token: outcome.refresh_token,
        subject: outcome.subject,
        role: outcome.role.to_string(),
    }))
}

/// Revoke the presented access token. Best-effort: a missing or malformed
/// header still reports success, there is nothing to revoke.
#[post("/api/auth/logout")]
pub async fn logout(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    if let Some(token) = token {
        state.token_service.logout(token).await;
    }

    Ok(HttpResponse::Ok().json(json!({
        "status": "ok",
        "message": "Successfully logged out"
    })))
}

/// Introspect an access token without consuming it. Always 200; the verdict
/// is in the body so collaborator services can branch on it.
#[post("/api/token/validate")]
pub async fn validate_token(
    state: web::Data<AppState>,
    request: web::Json<TokenRequest>,
) -> Result<HttpResponse, AppError> {
    Ok(verdict_response(
        state.validator.validate_access(&request.token).await,
        "access",
    ))
}

#[post("/api/token/validate-refresh")]
pub async fn validate_refresh_token(
    state: web::Data<AppState>,
    request: web::Json<TokenRequest>,
) -> Result<HttpResponse, AppError> {
    Ok(verdict_response(
        state.validator.validate_refresh(&request.token).await,
        "refresh",
    ))
}

/// Decode a token's claims without rendering a verdict. Signature-checked;
/// expired tokens still report their claims, unparseable input is a 400.
#[post("/api/token/info")]
pub async fn token_info(
    state: web::Data<AppState>,
    request: web::Json<TokenRequest>,
) -> Result<HttpResponse, AppError> {
    match state.codec.parse(&request.token) {
        Ok(claims) => {
            let expired = state.codec.is_expired(&claims);
            Ok(HttpResponse::Ok().json(json!({
                "subject": claims.sub,
                "role": claims.role,
                "tokenType": claims.kind,
                "expired": expired,
            })))
        }
        Err(e) => Ok(HttpResponse::BadRequest().json(json!({
            "error": "Invalid token format",
            "message": e.to_string(),
        }))),
    }
}

fn verdict_response(verdict: Verdict, token_type: &str) -> HttpResponse {
    match verdict {
        Verdict::Valid { subject, role } => HttpResponse::Ok().json(json!({
            "valid": true,
            "subject": subject,
            "role": role,
            "tokenType": token_type,
        })),
        Verdict::Expired { reason } => HttpResponse::Ok().json(json!({
            "valid": false,
            "expired": true,
            "error": reason,
        })),
        Verdict::Invalid { reason } => HttpResponse::Ok().json(json!({
            "valid": false,
            "expired": false,
            "error": reason,
        })),
    }
}

/// Identity of the authenticated request, as attached by the gate.
#[get("/api/auth/me")]
pub async fn me(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(json!({
        "subject": user.subject,
        "role": user.role,
    })))
}
