//! Admin session guard.
//!
//! One static admin identity, no user table. A successful login mints a
//! cookie holding an expiry timestamp and its HMAC-SHA256 under the
//! session secret; guarded routes verify the MAC and the expiry, and send
//! anonymous requests back to the login page instead of erroring.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::COOKIE, request::Parts},
    response::Redirect,
};
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tokio::task::spawn_blocking;

use crate::{config::Config, error::AppError, state::AppState};

type HmacSha256 = Hmac<Sha256>;

pub const SESSION_COOKIE: &str = "session";
const SESSION_TTL_SECS: i64 = 8 * 60 * 60;

/// Checks submitted credentials against the configured admin identity.
/// The hash comparison runs on a blocking worker. The error is the same
/// generic `AuthFailure` whichever field was wrong.
pub async fn check_credentials(
    config: &Config,
    username: &str,
    password: &str,
) -> Result<(), AppError> {
    if username != config.admin_user {
        return Err(AppError::AuthFailure);
    }

    let password = password.to_string();
    let hash = config.admin_pass_hash.clone();
    let ok = spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::Internal(e.into()))?
        .map_err(|e| AppError::Internal(e.into()))?;

    if ok {
        Ok(())
    } else {
        Err(AppError::AuthFailure)
    }
}

pub fn mint_session(secret: &str) -> String {
    let expires_at = Utc::now().timestamp() + SESSION_TTL_SECS;
    format!("{expires_at}.{}", sign(secret, &expires_at.to_string()))
}

/// The MAC must match and the expiry must be in the future. The signature
/// check goes through the MAC's constant-time comparison.
pub fn verify_session(secret: &str, token: &str) -> bool {
    let Some((expires_at, signature)) = token.split_once('.') else {
        return false;
    };
    let Ok(parsed) = expires_at.parse::<i64>() else {
        return false;
    };
    if parsed <= Utc::now().timestamp() {
        return false;
    }
    let Ok(signature) = hex::decode(signature) else {
        return false;
    };

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(expires_at.as_bytes());
    mac.verify_slice(&signature).is_ok()
}

pub fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax")
}

pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

fn sign(secret: &str, payload: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Extractor guarding the admin routes.
pub struct AdminSession;

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AdminSession {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(session_token);

        match token {
            Some(token) if verify_session(&state.config.session_secret, token) => Ok(AdminSession),
            _ => Err(Redirect::to("/admin/login")),
        }
    }
}

fn session_token(cookies: &str) -> Option<&str> {
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then_some(value)
    })
}
