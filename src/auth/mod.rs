pub mod ui;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use log::info;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_cookies::cookie::SameSite;
use tower_cookies::{Cookie, Cookies};
use uuid::Uuid;

use crate::shared::error::ServiceError;
use crate::shared::schema::users;
use crate::shared::state::AppState;

pub const SESSION_COOKIE: &str = "session";
const SESSION_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone, Queryable)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: String,
    exp: usize,
}

pub fn hash_password(password: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    hash_password(password) == hash
}

pub fn issue_session(user_id: Uuid, secret: &str) -> Result<String, ServiceError> {
    let exp = (Utc::now() + Duration::hours(SESSION_TTL_HOURS)).timestamp() as usize;
    let claims = SessionClaims {
        sub: user_id.to_string(),
        exp,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ServiceError::Internal(format!("session token: {e}")))
}

pub fn decode_session(token: &str, secret: &str) -> Option<Uuid> {
    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .ok()?;
    Uuid::parse_str(&data.claims.sub).ok()
}

/// Resolves the authenticated user for the current request, if any. Callers
/// that need an identity turn `None` into `AuthenticationRequired`.
pub fn current_user(cookies: &Cookies, secret: &str) -> Option<Uuid> {
    let cookie = cookies.get(SESSION_COOKIE)?;
    decode_session(cookie.value(), secret)
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ServiceError> {
    let mut conn = state
        .conn
        .get()
        .map_err(|e| ServiceError::Persistence(e.to_string()))?;

    let user: Option<User> = users::table
        .filter(users::email.eq(&req.email))
        .first(&mut conn)
        .optional()
        .map_err(|e| ServiceError::Persistence(e.to_string()))?;

    let user = user
        .filter(|u| verify_password(&req.password, &u.password_hash))
        .ok_or(ServiceError::AuthenticationRequired)?;

    let token = issue_session(user.id, &state.config.auth.jwt_secret)?;
    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    cookies.add(cookie);

    info!("user {} logged in", user.id);
    Ok(Json(LoginResponse { user_id: user.id }))
}

pub fn configure_auth_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/auth/login", post(login))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_round_trip() {
        let hash = hash_password("hunter2");
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
    }

    #[test]
    fn test_session_round_trip() {
        let user_id = Uuid::new_v4();
        let token = issue_session(user_id, "test-secret").unwrap();
        assert_eq!(decode_session(&token, "test-secret"), Some(user_id));
    }

    #[test]
    fn test_session_rejects_wrong_secret() {
        let token = issue_session(Uuid::new_v4(), "test-secret").unwrap();
        assert_eq!(decode_session(&token, "other-secret"), None);
    }

    #[test]
    fn test_session_rejects_garbage_token() {
        assert_eq!(decode_session("not-a-jwt", "test-secret"), None);
    }
}
