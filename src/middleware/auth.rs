use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "tp_session";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub role: Option<String>,
}

/// Identity resolved from the session token. The role claim is advisory;
/// admin checks always go back to the stored role (see `authz`).
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Option<String>,
}

/// Optional identity carried on routes that serve anonymous callers too.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<AuthUser>);

fn session_token(req: &Request) -> Option<String> {
    // Cookie-backed session first, Authorization header as fallback.
    if let Some(cookies) = req.headers().get(header::COOKIE).and_then(|v| v.to_str().ok()) {
        for pair in cookies.split(';') {
            let mut parts = pair.trim().splitn(2, '=');
            if parts.next() == Some(SESSION_COOKIE) {
                if let Some(value) = parts.next() {
                    if !value.is_empty() {
                        return Some(value.to_string());
                    }
                }
            }
        }
    }
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.to_string())
}

fn decode_session(token: &str) -> Option<AuthUser> {
    let config = crate::config::get_config();
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .ok()?;
    let id = Uuid::parse_str(&data.claims.sub).ok()?;
    Some(AuthUser {
        id,
        role: data.claims.role,
    })
}

/// Rejects with 401 unless the request carries a valid session.
pub async fn require_session(mut req: Request, next: Next) -> Response {
    let Some(token) = session_token(&req) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error":"missing_session"})),
        )
            .into_response();
    };
    match decode_session(&token) {
        Some(user) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error":"invalid_session"})),
        )
            .into_response(),
    }
}

/// Resolves the caller identity when present but never rejects; handlers
/// on public reads decide what anonymous callers may see.
pub async fn resolve_session(mut req: Request, next: Next) -> Response {
    let user = session_token(&req).and_then(|t| decode_session(&t));
    req.extensions_mut().insert(MaybeUser(user));
    next.run(req).await
}
