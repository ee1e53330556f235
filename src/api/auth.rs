use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::request::Parts,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use super::error::ApiError;
use crate::store::{Collection, User};
use crate::AppState;

/// Cookie carrying the opaque session token.
pub const SESSION_COOKIE: &str = "shop_session";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Login endpoint
///
/// POST /api/auth/login
///
/// Unknown username and wrong password produce the same response so the
/// endpoint cannot be used to enumerate accounts.
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    let users: Vec<User> = state.store.load(Collection::Users).await;
    let user = users
        .into_iter()
        .find(|u| u.username == request.username)
        .ok_or_else(|| ApiError::unauthorized("Invalid username or password"))?;

    if !verify_password(&request.password, &user.password_hash) {
        return Err(ApiError::unauthorized("Invalid username or password"));
    }

    let token = state.sessions.create(&user.id, &user.username);
    info!(username = %user.username, "User logged in");

    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            success: true,
            username: user.username,
        }),
    ))
}

/// Logout endpoint
///
/// POST /api/auth/logout
///
/// Idempotent: an unknown or already-invalidated token still succeeds.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<LogoutResponse>) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.remove(cookie.value());
    }
    let jar = jar.remove(Cookie::from(SESSION_COOKIE));
    (jar, Json(LogoutResponse { success: true }))
}

/// Session probe for UI state
///
/// GET /api/auth/check
///
/// Unlike the admin guard, an absent session is a normal result here.
pub async fn check(State(state): State<Arc<AppState>>, jar: CookieJar) -> Json<CheckResponse> {
    let session = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| state.sessions.get(cookie.value()));

    match session {
        Some(session) => Json(CheckResponse {
            authenticated: true,
            username: Some(session.username),
        }),
        None => Json(CheckResponse {
            authenticated: false,
            username: None,
        }),
    }
}

/// Extractor gating every admin endpoint. Missing, unknown, and expired
/// tokens all reject uniformly with 401.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub user_id: String,
    pub username: String,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let session = jar
            .get(SESSION_COOKIE)
            .and_then(|cookie| state.sessions.get(cookie.value()))
            .ok_or_else(|| ApiError::unauthorized("Not authorized"))?;

        Ok(AdminUser {
            user_id: session.user_id,
            username: session.username,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("hunter2hunter2").unwrap();
        assert!(verify_password("hunter2hunter2", &hash));
        assert!(!verify_password("hunter3hunter3", &hash));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b);
    }
}
