//! Compact HMAC-SHA256 signed tokens (`header.body.signature`, base64url).
//!
//! `verify` is deliberately uniform: every malformed input, signature
//! mismatch, or passed expiry yields `None`. Callers treat `None` as
//! "unauthenticated" and never see the distinction.

use anyhow::{Context, Result};
use base64ct::{Base64UrlUnpadded, Encoding};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use time::{Duration, OffsetDateTime};

type HmacSha256 = Hmac<Sha256>;

const TOKEN_HEADER: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

/// Default lifetime of minted tokens.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::days(30);

/// Payload carried by a signed token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: String,
    pub is_admin: bool,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and verifies admin tokens under the server secret.
#[derive(Debug)]
pub struct TokenCodec {
    secret: SecretString,
}

impl TokenCodec {
    #[must_use]
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    fn mac(&self) -> Result<HmacSha256> {
        HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .context("failed to key token HMAC")
    }

    /// Mint a token for `user_id`, stamping `iat` = now and `exp` = now + ttl.
    ///
    /// # Errors
    ///
    /// Returns an error if claim serialization or HMAC keying fails.
    pub fn sign(&self, user_id: &str, is_admin: bool, ttl: Duration) -> Result<String> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = Claims {
            user_id: user_id.to_string(),
            is_admin,
            iat: now,
            exp: now + ttl.whole_seconds(),
        };

        let header = Base64UrlUnpadded::encode_string(TOKEN_HEADER.as_bytes());
        let body = Base64UrlUnpadded::encode_string(
            &serde_json::to_vec(&claims).context("failed to encode token claims")?,
        );

        let mut mac = self.mac()?;
        mac.update(header.as_bytes());
        mac.update(b".");
        mac.update(body.as_bytes());
        let signature = Base64UrlUnpadded::encode_string(&mac.finalize().into_bytes());

        Ok(format!("{header}.{body}.{signature}"))
    }

    /// Verify a token and return its claims, or `None` for any invalid input:
    /// wrong part count, bad base64, bad JSON, signature mismatch, or a
    /// passed expiry.
    #[must_use]
    pub fn verify(&self, token: &str) -> Option<Claims> {
        let mut parts = token.split('.');
        let (header, body, signature) = match (parts.next(), parts.next(), parts.next(), parts.next())
        {
            (Some(h), Some(b), Some(s), None) => (h, b, s),
            _ => return None,
        };

        let signature = Base64UrlUnpadded::decode_vec(signature).ok()?;
        let mut mac = self.mac().ok()?;
        mac.update(header.as_bytes());
        mac.update(b".");
        mac.update(body.as_bytes());
        // constant-time comparison
        mac.verify_slice(&signature).ok()?;

        let body = Base64UrlUnpadded::decode_vec(body).ok()?;
        let claims: Claims = serde_json::from_slice(&body).ok()?;
        if claims.exp <= OffsetDateTime::now_utc().unix_timestamp() {
            return None;
        }
        Some(claims)
    }
}
