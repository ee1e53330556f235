//! In-process session state.
//!
//! Sessions are held in a process-scoped map keyed by the SHA-256 hash of
//! the caller's bearer token, so the map never contains a usable token.
//! Every session carries a fixed 24-hour absolute expiry; restarting the
//! process invalidates everything.

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use rand::Rng;
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// Absolute session lifetime from issuance.
const SESSION_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: String,
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// Generate a random bearer token
fn generate_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();
    hex::encode(bytes)
}

/// Hash a token for use as the map key
fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Establish a session for a user and return the opaque token the
    /// caller presents on subsequent requests.
    pub fn create(&self, user_id: &str, username: &str) -> String {
        let token = generate_token();
        let session = Session {
            user_id: user_id.to_string(),
            username: username.to_string(),
            expires_at: Utc::now() + Duration::hours(SESSION_TTL_HOURS),
        };
        self.sessions.write().insert(hash_token(&token), session);
        token
    }

    /// Look up the session for a token. Expired entries are dropped on
    /// touch and report as absent.
    pub fn get(&self, token: &str) -> Option<Session> {
        let key = hash_token(token);
        let session = self.sessions.read().get(&key).cloned()?;
        if session.is_expired() {
            self.sessions.write().remove(&key);
            return None;
        }
        Some(session)
    }

    /// Invalidate a session. Idempotent: unknown tokens are not an error.
    pub fn remove(&self, token: &str) {
        self.sessions.write().remove(&hash_token(token));
    }

    #[cfg(test)]
    fn insert_with_expiry(&self, token: &str, user_id: &str, expires_at: DateTime<Utc>) {
        let session = Session {
            user_id: user_id.to_string(),
            username: user_id.to_string(),
            expires_at,
        };
        self.sessions.write().insert(hash_token(token), session);
    }
}
