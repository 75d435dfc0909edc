//! # LoveDate Admin Trust API
//!
//! `lovedate-admin` is the admin-only backend slice of the LoveDate platform:
//! a small HTTP JSON API that lets platform operators inspect and moderate
//! user records and review the moderation audit trail.
//!
//! ## Access model
//!
//! Every admin route is gated by a credential-resolution guard that accepts,
//! in strict order: an `Authorization: Bearer` token, a signed
//! `lovedate_token` cookie, or a legacy plain-JSON `lovedate_session` cookie.
//! Tokens are compact HMAC-SHA256 signed credentials carrying the user id,
//! admin flag, issue time, and expiry. The legacy cookie tier performs no
//! cryptographic check; it exists for dev/preview compatibility and every
//! successful use is logged at WARN.
//!
//! ## Storage
//!
//! User records live in an in-memory store seeded at startup, optionally
//! persisted to a JSON file. Moderation actions append to a bounded,
//! most-recent-first audit log. Neither pretends to be a real database;
//! this service backs preview and demo environments.

pub mod api;
pub mod cli;
pub mod store;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
