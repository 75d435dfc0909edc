//! In-memory stores backing the admin API.
//!
//! These are deliberate stand-ins for a real database, used in preview and
//! demo environments. Both stores are plain synchronous values; the
//! application wraps them in `tokio::sync::RwLock` and hands them to the
//! handlers by reference, so there is no hidden module-level state.

pub mod audit;
pub mod users;

pub use audit::{AuditEntry, AuditLog, NewAuditEntry};
pub use users::{NewUser, PersistenceError, Role, UserPatch, UserRecord, UserStore};

use time::{format_description::well_known::Rfc3339, OffsetDateTime};

/// Current time as an RFC 3339 string, the timestamp format used on the wire.
#[must_use]
pub fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .replace_nanosecond(0)
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .format(&Rfc3339)
        .unwrap_or_default()
}
