//! User record store: seed data, lookups, in-place updates, and optional
//! JSON-file persistence.

use serde::{Deserialize, Serialize};
use std::{
    fmt,
    fs,
    path::{Path, PathBuf},
};
use ulid::Ulid;
use utoipa::ToSchema;

use super::now_rfc3339;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

/// A platform user as the admin dashboard sees it.
///
/// `id` is immutable after creation; `city` and `createdAt` are descriptive
/// fields set at creation and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub display_name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub banned: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Partial input for [`UserStore::create`]; unset fields are defaulted.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub id: Option<String>,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub role: Option<Role>,
    pub is_verified: Option<bool>,
    pub banned: Option<bool>,
    pub city: Option<String>,
}

/// Fields [`UserStore::update`] is allowed to merge into an existing record.
#[derive(Debug, Default, Clone)]
pub struct UserPatch {
    pub display_name: Option<String>,
    pub is_verified: Option<bool>,
    pub banned: Option<bool>,
}

impl UserPatch {
    #[must_use]
    pub fn verified() -> Self {
        Self {
            is_verified: Some(true),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn banned(ban: bool) -> Self {
        Self {
            banned: Some(ban),
            ..Self::default()
        }
    }
}

#[derive(Debug)]
pub enum PersistenceError {
    Io(std::io::Error),
    Malformed(serde_json::Error),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "data file I/O error: {err}"),
            Self::Malformed(err) => write!(f, "data file is not valid user JSON: {err}"),
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Malformed(err) => Some(err),
        }
    }
}

/// The mock user database. Records are kept in insertion order; new records
/// go to the front so the dashboard shows the most recent signups first.
#[derive(Debug)]
pub struct UserStore {
    users: Vec<UserRecord>,
    data_file: Option<PathBuf>,
}

impl UserStore {
    /// Build a store over the fixed seed list, without persistence.
    #[must_use]
    pub fn from_seed() -> Self {
        Self {
            users: seed_users(),
            data_file: None,
        }
    }

    /// Build a store over explicit records, without persistence. Test hook
    /// and seed-reset primitive.
    #[must_use]
    pub fn from_records(users: Vec<UserRecord>) -> Self {
        Self {
            users,
            data_file: None,
        }
    }

    /// Open a file-backed store. A missing file seeds the store and writes
    /// the initial file; an unreadable or malformed file is an error, never
    /// a silent fallback to seed data.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] when the file exists but cannot be
    /// read or parsed, or when the initial seed write fails.
    pub fn open(path: &Path) -> Result<Self, PersistenceError> {
        if path.exists() {
            let raw = fs::read_to_string(path).map_err(PersistenceError::Io)?;
            let users: Vec<UserRecord> =
                serde_json::from_str(&raw).map_err(PersistenceError::Malformed)?;
            Ok(Self {
                users,
                data_file: Some(path.to_path_buf()),
            })
        } else {
            let store = Self {
                users: seed_users(),
                data_file: Some(path.to_path_buf()),
            };
            store.save()?;
            Ok(store)
        }
    }

    /// Write the current records to the data file, if one is configured.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistenceError`] when serialization or the write fails.
    pub fn save(&self) -> Result<(), PersistenceError> {
        let Some(path) = &self.data_file else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir).map_err(PersistenceError::Io)?;
            }
        }
        let raw = serde_json::to_string_pretty(&self.users).map_err(PersistenceError::Malformed)?;
        fs::write(path, raw).map_err(PersistenceError::Io)
    }

    /// All records, insertion order.
    #[must_use]
    pub fn list(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&UserRecord> {
        self.users.iter().find(|u| u.id == id)
    }

    #[must_use]
    pub fn find_by_email(&self, email: &str) -> Option<&UserRecord> {
        self.users.iter().find(|u| u.email == email)
    }

    /// Insert a new record at the front, defaulting unset fields.
    pub fn create(&mut self, new_user: NewUser) -> &UserRecord {
        let id = new_user
            .id
            .unwrap_or_else(|| format!("user_{}", Ulid::new().to_string().to_lowercase()));
        let email = new_user.email.unwrap_or_else(|| format!("user+{id}@local"));
        let display_name = new_user.display_name.unwrap_or_else(|| {
            email
                .split('@')
                .next()
                .filter(|local| !local.is_empty())
                .map_or_else(|| id.clone(), ToString::to_string)
        });
        let record = UserRecord {
            id,
            email,
            display_name,
            role: new_user.role.unwrap_or_default(),
            is_verified: new_user.is_verified.unwrap_or(false),
            banned: new_user.banned.unwrap_or(false),
            city: new_user.city,
            created_at: Some(now_rfc3339()),
        };
        self.users.insert(0, record);
        &self.users[0]
    }

    /// Merge `patch` into the record with the given id, in place.
    /// Returns `None` (store unchanged) when the id is unknown.
    pub fn update(&mut self, id: &str, patch: UserPatch) -> Option<&UserRecord> {
        let user = self.users.iter_mut().find(|u| u.id == id)?;
        if let Some(display_name) = patch.display_name {
            user.display_name = display_name;
        }
        if let Some(is_verified) = patch.is_verified {
            user.is_verified = is_verified;
        }
        if let Some(banned) = patch.banned {
            user.banned = banned;
        }
        Some(user)
    }

    /// Replace all records with the fixed seed list. Returns the new count.
    pub fn reset_to_seed(&mut self) -> usize {
        self.users = seed_users();
        self.users.len()
    }
}

/// The fixed seed list used when no data file is configured.
#[must_use]
pub fn seed_users() -> Vec<UserRecord> {
    let created_at = Some(now_rfc3339());
    let seed = |id: &str, email: &str, name: &str, role, verified, banned, city: &str| UserRecord {
        id: id.to_string(),
        email: email.to_string(),
        display_name: name.to_string(),
        role,
        is_verified: verified,
        banned,
        city: Some(city.to_string()),
        created_at: created_at.clone(),
    };
    vec![
        seed(
            "user_1",
            "admin@lovedate.dev",
            "Admin",
            Role::Admin,
            true,
            false,
            "Manhattan",
        ),
        seed(
            "user_2",
            "alice@example.com",
            "Alice Walker",
            Role::User,
            true,
            false,
            "Brooklyn",
        ),
        seed(
            "user_3",
            "bob@example.com",
            "Ben Hayes",
            Role::User,
            false,
            false,
            "Long Island City",
        ),
        seed(
            "user_4",
            "chloe@example.com",
            "Chloe Park",
            Role::User,
            true,
            false,
            "SoHo",
        ),
        seed(
            "user_5",
            "dani@example.com",
            "Dani Rivera",
            Role::User,
            false,
            true,
            "Williamsburg",
        ),
        seed(
            "user_6",
            "emily@example.com",
            "Emily Stone",
            Role::User,
            true,
            false,
            "SoHo",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_contains_one_admin() {
        let store = UserStore::from_seed();
        let admins = store
            .list()
            .iter()
            .filter(|u| u.role == Role::Admin)
            .count();
        assert_eq!(admins, 1);
        assert!(store.find_by_email("admin@lovedate.dev").is_some());
    }

    #[test]
    fn test_create_defaults_display_name_from_email() {
        let mut store = UserStore::from_records(Vec::new());
        let created = store
            .create(NewUser {
                email: Some("frank@example.com".to_string()),
                ..NewUser::default()
            })
            .clone();
        assert_eq!(created.display_name, "frank");
        assert_eq!(created.role, Role::User);
        assert!(!created.is_verified);
        assert!(!created.banned);
        assert!(created.created_at.is_some());
        assert!(created.id.starts_with("user_"));
    }

    #[test]
    fn test_create_inserts_at_front() {
        let mut store = UserStore::from_seed();
        let before = store.len();
        let id = store
            .create(NewUser {
                id: Some("user_new".to_string()),
                ..NewUser::default()
            })
            .id
            .clone();
        assert_eq!(store.len(), before + 1);
        assert_eq!(store.list()[0].id, id);
    }

    #[test]
    fn test_update_unknown_id_leaves_store_unchanged() {
        let mut store = UserStore::from_seed();
        let snapshot: Vec<String> = store.list().iter().map(|u| u.id.clone()).collect();
        let banned_before: Vec<bool> = store.list().iter().map(|u| u.banned).collect();

        assert!(store.update("user_missing", UserPatch::banned(true)).is_none());

        let snapshot_after: Vec<String> = store.list().iter().map(|u| u.id.clone()).collect();
        let banned_after: Vec<bool> = store.list().iter().map(|u| u.banned).collect();
        assert_eq!(snapshot, snapshot_after);
        assert_eq!(banned_before, banned_after);
    }

    #[test]
    fn test_update_merges_in_place() {
        let mut store = UserStore::from_seed();
        let updated = store
            .update("user_3", UserPatch::verified())
            .expect("seed user")
            .clone();
        assert!(updated.is_verified);
        // visible to subsequent reads through the same store
        assert!(store.find_by_id("user_3").expect("seed user").is_verified);
    }

    #[test]
    fn test_open_missing_file_seeds_and_writes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("admin-users.json");
        let store = UserStore::open(&path).expect("open seeds");
        assert!(!store.is_empty());
        assert!(path.exists());

        // Second open reads the file back rather than reseeding.
        let reread = UserStore::open(&path).expect("reopen");
        assert_eq!(reread.len(), store.len());
    }

    #[test]
    fn test_open_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("admin-users.json");
        std::fs::write(&path, "{ not json ").expect("write");
        match UserStore::open(&path) {
            Err(PersistenceError::Malformed(_)) => {}
            other => panic!("expected malformed error, got {other:?}"),
        }
    }

    #[test]
    fn test_mutations_round_trip_through_save() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("admin-users.json");
        let mut store = UserStore::open(&path).expect("open");
        store.update("user_5", UserPatch::banned(false)).expect("seed user");
        store.save().expect("save");

        let reread = UserStore::open(&path).expect("reopen");
        assert!(!reread.find_by_id("user_5").expect("seed user").banned);
    }
}
