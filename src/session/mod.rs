use crate::storage::KeyValueStore;
use std::sync::Arc;

pub(crate) const TOKEN_KEY: &str = "authToken";
pub(crate) const USERNAME_KEY: &str = "username";

pub(crate) type SharedStore = Arc<dyn KeyValueStore + Send + Sync>;

/// Persisted credential of the current user.
///
/// Token and username are two independent entries. Presence of the token alone
/// decides whether the user is authenticated; the token is never inspected.
#[derive(Clone)]
pub(crate) struct SessionStore {
    store: SharedStore,
}

impl SessionStore {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.get(TOKEN_KEY).is_some()
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY)
    }

    pub fn username(&self) -> Option<String> {
        self.store.get(USERNAME_KEY)
    }

    pub fn set_session(&self, token: &str, username: &str) {
        self.store.set(TOKEN_KEY, token);
        self.store.set(USERNAME_KEY, username);
        tracing::info!(username, "session stored");
    }

    pub fn clear_session(&self) {
        self.store.remove(TOKEN_KEY);
        self.store.remove(USERNAME_KEY);
        tracing::info!("session cleared");
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn session() -> (Arc<MemoryStorage>, SessionStore) {
        let kv = Arc::new(MemoryStorage::default());
        let s = SessionStore::new(kv.clone());
        (kv, s)
    }

    #[test]
    fn test_empty_store_is_not_authenticated() {
        let (_, s) = session();
        assert!(!s.is_authenticated());
        assert!(s.username().is_none());
        assert!(s.token().is_none());
    }

    #[test]
    fn test_set_session_writes_both_entries() {
        let (kv, s) = session();
        s.set_session("abc123", "alice");

        assert!(s.is_authenticated());
        assert_eq!(s.username().as_deref(), Some("alice"));
        assert_eq!(kv.get(TOKEN_KEY).as_deref(), Some("abc123"));
        assert_eq!(kv.get(USERNAME_KEY).as_deref(), Some("alice"));
    }

    #[test]
    fn test_clear_session_is_idempotent() {
        let (kv, s) = session();
        s.set_session("abc123", "alice");
        s.clear_session();
        s.clear_session();

        assert!(!s.is_authenticated());
        assert!(s.username().is_none());
        assert_eq!(kv.len(), 0);
    }

    #[test]
    fn test_token_alone_counts_as_authenticated() {
        let (kv, s) = session();
        kv.set(TOKEN_KEY, "abc123");

        assert!(s.is_authenticated());
        assert!(s.username().is_none());
    }

    #[test]
    fn test_clones_share_the_same_store() {
        let (_, s) = session();
        let other = s.clone();
        s.set_session("t", "bob");
        assert_eq!(other.username().as_deref(), Some("bob"));
    }
}
