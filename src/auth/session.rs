// Allow dead code: accessors mirror the full store API
#![allow(dead_code)]

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::warn;

use crate::auth::storage::StorageProvider;
use crate::models::User;

/// Storage key holding the serialized user record
const USER_KEY: &str = "user";

/// Storage key holding the raw bearer token
const TOKEN_KEY: &str = "token";

/// The authenticated identity and its credential.
/// The two fields are only ever stored and cleared together.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub token: String,
}

struct State {
    session: Option<Session>,
    /// False until `initialize` has run, so callers can tell "still
    /// determining session state" apart from "known to be logged out"
    ready: bool,
}

/// Single source of truth for who is logged in.
///
/// One instance is shared between the application and the API client; the
/// client reads the token and may clear the session on credential rejection,
/// but only callers holding an authentication response ever activate it.
pub struct SessionStore {
    storage: Arc<dyn StorageProvider>,
    state: RwLock<State>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn StorageProvider>) -> Self {
        Self {
            storage,
            state: RwLock::new(State {
                session: None,
                ready: false,
            }),
        }
    }

    /// Rehydrate the session from durable storage. Runs once at startup.
    ///
    /// The session becomes active only if both keys are present and the user
    /// record parses; a corrupt record purges both keys and degrades to
    /// logged out. Never fails, and always leaves the store ready.
    pub fn initialize(&self) {
        let stored_user = self.read_key(USER_KEY);
        let stored_token = self.read_key(TOKEN_KEY);

        let session = match (stored_user, stored_token) {
            (Some(raw), Some(token)) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(Session { user, token }),
                Err(e) => {
                    warn!(error = %e, "Stored user record is corrupt, clearing session");
                    self.remove_key(USER_KEY);
                    self.remove_key(TOKEN_KEY);
                    None
                }
            },
            _ => None,
        };

        let mut state = self.write_state();
        state.session = session;
        state.ready = true;
    }

    /// Activate a session for `user`, overwriting any prior one.
    ///
    /// No validation happens here; trust comes from the caller having
    /// received this pair in a successful authentication response.
    pub fn login(&self, user: User, token: String) {
        match serde_json::to_string(&user) {
            Ok(raw) => self.write_key(USER_KEY, &raw),
            Err(e) => warn!(error = %e, "Failed to serialize user for storage"),
        }
        self.write_key(TOKEN_KEY, &token);

        let mut state = self.write_state();
        state.session = Some(Session { user, token });
    }

    /// Clear the session in memory and in durable storage. Idempotent.
    pub fn logout(&self) {
        self.remove_key(USER_KEY);
        self.remove_key(TOKEN_KEY);

        let mut state = self.write_state();
        state.session = None;
    }

    /// True iff a user is currently held
    pub fn is_authenticated(&self) -> bool {
        self.read_state().session.is_some()
    }

    /// True once `initialize` has completed
    pub fn is_ready(&self) -> bool {
        self.read_state().ready
    }

    pub fn current_user(&self) -> Option<User> {
        self.read_state().session.as_ref().map(|s| s.user.clone())
    }

    /// The bearer credential. The API client captures this at send time; a
    /// request already in flight keeps the value it captured even if the
    /// session is cleared before the response arrives.
    pub fn token(&self) -> Option<String> {
        self.read_state().session.as_ref().map(|s| s.token.clone())
    }

    // Storage access is best-effort: a failing provider degrades to an
    // in-memory-only session instead of surfacing errors to callers.

    fn read_key(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Failed to read session storage");
                None
            }
        }
    }

    fn write_key(&self, key: &str, value: &str) {
        if let Err(e) = self.storage.set(key, value) {
            warn!(key, error = %e, "Failed to write session storage");
        }
    }

    fn remove_key(&self, key: &str) {
        if let Err(e) = self.storage.remove(key) {
            warn!(key, error = %e, "Failed to clear session storage");
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::storage::MemoryStorage;
    use anyhow::Result;
    use chrono::Utc;

    fn test_user() -> User {
        User {
            id: 1,
            name: "A".to_string(),
            email: "a@x.com".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_login_then_initialize_rehydrates_session() {
        let storage = Arc::new(MemoryStorage::new());

        let store = SessionStore::new(storage.clone());
        store.initialize();
        let user = test_user();
        store.login(user.clone(), "tok1".to_string());
        drop(store);

        // Fresh store over the same storage simulates a restart
        let reloaded = SessionStore::new(storage);
        reloaded.initialize();
        assert!(reloaded.is_authenticated());
        assert_eq!(reloaded.current_user(), Some(user));
        assert_eq!(reloaded.token().as_deref(), Some("tok1"));
    }

    #[test]
    fn test_logout_then_initialize_is_inactive() {
        let storage = Arc::new(MemoryStorage::new());

        let store = SessionStore::new(storage.clone());
        store.initialize();
        store.login(test_user(), "tok1".to_string());
        store.logout();
        assert!(!store.is_authenticated());

        let reloaded = SessionStore::new(storage);
        reloaded.initialize();
        assert!(!reloaded.is_authenticated());
        assert!(reloaded.token().is_none());
    }

    #[test]
    fn test_logout_is_idempotent() {
        let store = SessionStore::new(Arc::new(MemoryStorage::new()));
        store.initialize();
        store.logout();
        store.logout();
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_initialize_with_only_token_is_inactive() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, "tok1").unwrap();

        let store = SessionStore::new(storage);
        store.initialize();
        assert!(!store.is_authenticated());
        assert!(store.token().is_none());
    }

    #[test]
    fn test_initialize_with_only_user_is_inactive() {
        let storage = Arc::new(MemoryStorage::new());
        let raw = serde_json::to_string(&test_user()).unwrap();
        storage.set(USER_KEY, &raw).unwrap();

        let store = SessionStore::new(storage);
        store.initialize();
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_initialize_with_corrupt_user_purges_both_keys() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(USER_KEY, "not json").unwrap();
        storage.set(TOKEN_KEY, "tok1").unwrap();

        let store = SessionStore::new(storage.clone());
        store.initialize();

        assert!(!store.is_authenticated());
        assert!(store.is_ready());
        assert!(storage.get(USER_KEY).unwrap().is_none());
        assert!(storage.get(TOKEN_KEY).unwrap().is_none());
    }

    #[test]
    fn test_ready_flag_tracks_initialize() {
        let store = SessionStore::new(Arc::new(MemoryStorage::new()));
        assert!(!store.is_ready());
        store.initialize();
        assert!(store.is_ready());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_login_overwrites_previous_session() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::new(storage.clone());
        store.initialize();

        store.login(test_user(), "tok1".to_string());
        let other = User {
            id: 2,
            name: "B".to_string(),
            email: "b@x.com".to_string(),
            created_at: Utc::now(),
        };
        store.login(other.clone(), "tok2".to_string());

        assert_eq!(store.current_user(), Some(other));
        assert_eq!(store.token().as_deref(), Some("tok2"));
        let stored: User =
            serde_json::from_str(&storage.get(USER_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(stored.id, 2);
    }

    /// Provider that fails every operation, standing in for unavailable
    /// durable storage.
    struct FailingStorage;

    impl StorageProvider for FailingStorage {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            anyhow::bail!("storage unavailable")
        }
        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            anyhow::bail!("storage unavailable")
        }
        fn remove(&self, _key: &str) -> Result<()> {
            anyhow::bail!("storage unavailable")
        }
    }

    #[test]
    fn test_unavailable_storage_still_updates_memory() {
        let store = SessionStore::new(Arc::new(FailingStorage));
        store.initialize();
        assert!(store.is_ready());

        store.login(test_user(), "tok1".to_string());
        assert!(store.is_authenticated());
        assert_eq!(store.token().as_deref(), Some("tok1"));

        store.logout();
        assert!(!store.is_authenticated());
    }
}
