//! Credential handling for admin routes: the signed-token codec and the
//! access guard that resolves an incoming request to an admin user id.

pub mod guard;
pub mod token;

pub use guard::{require_admin, resolve_credential, AuthError, Credential};
pub use token::{Claims, TokenCodec, DEFAULT_TOKEN_TTL};

use axum::http::header::InvalidHeaderValue;
use axum::http::HeaderValue;

/// Fallback signing key for local preview when neither `ADMIN_JWT_SECRET`
/// nor `JWT_SECRET` is set. Matches the rest of the platform so locally
/// minted tokens are accepted across apps.
pub const DEFAULT_DEV_SECRET: &str = "dev_jwt_secret_change_me";

/// Signed-token cookie checked by the guard's second tier.
pub const TOKEN_COOKIE: &str = "lovedate_token";

/// Legacy plain-JSON session cookie checked by the guard's last tier.
pub const SESSION_COOKIE: &str = "lovedate_session";

/// Build an `HttpOnly` cookie carrying the signed admin token.
pub(crate) fn token_cookie(
    token: &str,
    max_age_seconds: i64,
) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&format!(
        "{TOKEN_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_seconds}"
    ))
}
