//! Admin access guard: resolves request credentials to an admin user id.
//!
//! Flow Overview:
//! 1) Pick the strongest credential present: bearer header, signed cookie,
//!    or legacy plain-session cookie, in that order.
//! 2) Verify it (cryptographically for the first two tiers; the legacy tier
//!    trusts client-supplied JSON and is logged at WARN when it authorizes).
//! 3) Resolve the carried id to a user record and require role `admin`.
//!
//! The guard never mutates state; failures are reported as [`AuthError`],
//! which renders directly as the HTTP rejection.

use axum::{
    http::{
        header::{AUTHORIZATION, COOKIE},
        HeaderMap, StatusCode,
    },
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::{token::TokenCodec, SESSION_COOKIE, TOKEN_COOKIE};
use crate::store::{Role, UserStore};

/// A credential extracted from the request, tagged by trust tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// `Authorization: Bearer <token>` header.
    BearerToken(String),
    /// Signed token carried in the `lovedate_token` cookie.
    SignedCookie(String),
    /// Legacy `lovedate_session` cookie: plain JSON, no signature.
    LegacySession(String),
}

/// Rejection reasons, each mapped to exactly one HTTP status and message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// Bearer token failed verification.
    InvalidToken,
    /// Signed cookie failed verification.
    InvalidTokenCookie,
    /// Legacy cookie is not valid JSON.
    InvalidSessionCookie,
    /// No usable credential at all.
    AuthenticationRequired,
    /// Credential is valid but the user is not an admin (or unknown).
    AdminRequired,
}

impl AuthError {
    #[must_use]
    pub const fn status(self) -> StatusCode {
        match self {
            Self::InvalidToken | Self::InvalidTokenCookie | Self::AuthenticationRequired => {
                StatusCode::UNAUTHORIZED
            }
            Self::InvalidSessionCookie => StatusCode::BAD_REQUEST,
            Self::AdminRequired => StatusCode::FORBIDDEN,
        }
    }

    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InvalidToken => "Invalid token",
            Self::InvalidTokenCookie => "Invalid token cookie",
            Self::InvalidSessionCookie => "Invalid session cookie",
            Self::AuthenticationRequired => "Authentication required",
            Self::AdminRequired => "Admin access required",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "message": self.message() }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacySession {
    #[serde(default)]
    user_id: Option<String>,
}

/// Extract the strongest credential present on the request, if any.
#[must_use]
pub fn resolve_credential(headers: &HeaderMap) -> Option<Credential> {
    if let Some(token) = extract_bearer_token(headers) {
        return Some(Credential::BearerToken(token));
    }
    if let Some(token) = cookie_value(headers, TOKEN_COOKIE) {
        return Some(Credential::SignedCookie(token));
    }
    cookie_value(headers, SESSION_COOKIE).map(Credential::LegacySession)
}

/// Resolve the request to an authenticated admin user id, or reject.
///
/// # Errors
///
/// Returns the [`AuthError`] describing the rejection; the caller writes it
/// as the HTTP response and stops.
pub fn require_admin(
    headers: &HeaderMap,
    codec: &TokenCodec,
    users: &UserStore,
) -> Result<String, AuthError> {
    match resolve_credential(headers) {
        Some(Credential::BearerToken(token)) => {
            let claims = codec.verify(&token).ok_or(AuthError::InvalidToken)?;
            resolve_admin(users, &claims.user_id)
        }
        Some(Credential::SignedCookie(token)) => {
            let claims = codec.verify(&token).ok_or(AuthError::InvalidTokenCookie)?;
            resolve_admin(users, &claims.user_id)
        }
        Some(Credential::LegacySession(raw)) => {
            // An empty cookie value carries no user id; only non-empty
            // values that fail to parse are malformed.
            let raw = if raw.is_empty() { "{}" } else { raw.as_str() };
            let session: LegacySession =
                serde_json::from_str(raw).map_err(|_| AuthError::InvalidSessionCookie)?;
            let user_id = session
                .user_id
                .filter(|id| !id.is_empty())
                .ok_or(AuthError::AuthenticationRequired)?;
            let actor = resolve_admin(users, &user_id)?;
            // This tier does no cryptographic check; keep every use visible.
            warn!(actor_id = %actor, "admin authorized via unverified legacy session cookie");
            Ok(actor)
        }
        None => Err(AuthError::AuthenticationRequired),
    }
}

/// The token payload may carry an id or an email; try both, then require
/// role `admin`.
fn resolve_admin(users: &UserStore, user_id: &str) -> Result<String, AuthError> {
    let user = users
        .find_by_id(user_id)
        .or_else(|| users.find_by_email(user_id))
        .ok_or(AuthError::AdminRequired)?;
    if user.role == Role::Admin {
        Ok(user.id.clone())
    } else {
        Err(AuthError::AdminRequired)
    }
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let header = headers.get(COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == name {
            return Some(val.to_string());
        }
    }
    None
}
