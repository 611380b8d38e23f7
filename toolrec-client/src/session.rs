//! Session store
//!
//! Holds the access token and user record for the signed-in user. State is
//! written through to a [`KeyValueStore`] on every mutation so a restarted
//! process picks up the last committed session.

use crate::config::SessionKeys;
use crate::error::StoreError;
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Durable string key-value storage
///
/// Calls are synchronous and made while the session lock is held, so
/// implementations must return quickly (local disk or memory, not network).
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store, for tests and throwaway sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store backed by a single JSON object file
///
/// Every mutation rewrites the file (via a temp file and rename).
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match std::fs::read(&self.path) {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn update(
        &self,
        mutate: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.read_all()?;
        mutate(&mut entries);
        self.write_all(&entries)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}

/// Signed-in user session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    /// Opaque user record as returned by the server
    pub user: Value,
}

impl Session {
    pub fn new(token: impl Into<String>, user: Value) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }

    /// Decode the user record into a concrete type.
    pub fn user_as<T: DeserializeOwned>(&self) -> Option<T> {
        serde_json::from_value(self.user.clone()).ok()
    }
}

/// Session owner
///
/// The only component that mutates the session. Cloning yields another
/// handle to the same state.
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
    keys: SessionKeys,
    current: Arc<RwLock<Option<Session>>>,
}

impl SessionStore {
    /// Load the persisted session, if any.
    ///
    /// A corrupt user record is discarded rather than failing startup.
    pub fn load(store: Arc<dyn KeyValueStore>, keys: SessionKeys) -> Result<Self, StoreError> {
        let token = store.get(&keys.token)?.filter(|t| !t.is_empty());
        let session = match token {
            Some(token) => {
                let user = match store.get(&keys.user)? {
                    Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                        warn!(key = %keys.user, "Discarding unreadable user record: {}", e);
                        Value::Null
                    }),
                    None => Value::Null,
                };
                Some(Session { token, user })
            }
            None => None,
        };

        if session.is_some() {
            info!("Restored persisted session");
        }

        Ok(Self {
            store,
            keys,
            current: Arc::new(RwLock::new(session)),
        })
    }

    /// Empty store over a fresh [`MemoryStore`]
    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            keys: SessionKeys::default(),
            current: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn get(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    pub async fn token(&self) -> Option<String> {
        self.current.read().await.as_ref().map(|s| s.token.clone())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// Replace the session. Durable state is written before memory.
    ///
    /// The user record is written first and the token last, since the token
    /// decides whether [`SessionStore::load`] restores anything. If the token
    /// write fails the previous user record is put back.
    pub async fn set(&self, session: Session) -> Result<(), StoreError> {
        let mut current = self.current.write().await;
        let user = serde_json::to_string(&session.user)?;
        let previous_user = self.store.get(&self.keys.user)?;

        self.store.set(&self.keys.user, &user)?;
        if let Err(e) = self.store.set(&self.keys.token, &session.token) {
            let restored = match previous_user {
                Some(previous) => self.store.set(&self.keys.user, &previous),
                None => self.store.remove(&self.keys.user),
            };
            if let Err(restore) = restored {
                warn!(key = %self.keys.user, "Failed to restore user record: {}", restore);
            }
            return Err(e);
        }

        *current = Some(session);
        info!("Session stored");
        Ok(())
    }

    /// Update only the token, keeping any user record.
    pub async fn set_token(&self, token: impl Into<String>) -> Result<(), StoreError> {
        let token = token.into();
        let mut current = self.current.write().await;
        self.store.set(&self.keys.token, &token)?;
        match current.as_mut() {
            Some(session) => session.token = token,
            None => *current = Some(Session::new(token, Value::Null)),
        }
        Ok(())
    }

    /// Update only the user record. No-op without a session.
    pub async fn set_user(&self, user: Value) -> Result<(), StoreError> {
        let mut current = self.current.write().await;
        if let Some(session) = current.as_mut() {
            self.store.set(&self.keys.user, &serde_json::to_string(&user)?)?;
            session.user = user;
        }
        Ok(())
    }

    /// Drop the session.
    ///
    /// Memory is cleared before the durable keys, so a failing store never
    /// leaves the process looking authenticated. Both keys are always
    /// attempted; a token that cannot be removed is blanked instead, which
    /// [`SessionStore::load`] treats as signed out. Returns the first error.
    pub async fn clear(&self) -> Result<(), StoreError> {
        let mut current = self.current.write().await;
        let had_session = current.take().is_some();

        let token = self.store.remove(&self.keys.token).map_err(|e| {
            warn!(key = %self.keys.token, "Failed to remove token, blanking it: {}", e);
            if let Err(blank) = self.store.set(&self.keys.token, "") {
                warn!(key = %self.keys.token, "Failed to blank token: {}", blank);
            }
            e
        });
        let user = self.store.remove(&self.keys.user);

        if had_session {
            info!("Session cleared");
        }
        token.and(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keys() -> SessionKeys {
        SessionKeys::default()
    }

    /// Memory store that fails chosen operations on chosen keys
    #[derive(Default)]
    struct FailingStore {
        inner: MemoryStore,
        fail_set: Option<&'static str>,
        fail_remove: Option<&'static str>,
    }

    impl FailingStore {
        fn refused(op: &str, key: &str) -> StoreError {
            StoreError::Io(std::io::Error::other(format!("{} {} refused", op, key)))
        }
    }

    impl KeyValueStore for FailingStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            if self.fail_set == Some(key) {
                return Err(Self::refused("set", key));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StoreError> {
            if self.fail_remove == Some(key) {
                return Err(Self::refused("remove", key));
            }
            self.inner.remove(key)
        }
    }

    #[tokio::test]
    async fn test_set_writes_through() {
        let kv = Arc::new(MemoryStore::new());
        let sessions = SessionStore::load(kv.clone(), keys()).unwrap();
        assert!(sessions.get().await.is_none());

        sessions
            .set(Session::new("abc", json!({"id": 1, "username": "ada"})))
            .await
            .unwrap();

        assert_eq!(sessions.token().await.as_deref(), Some("abc"));
        assert_eq!(kv.get("token").unwrap().as_deref(), Some("abc"));
        let user: Value = serde_json::from_str(&kv.get("user").unwrap().unwrap()).unwrap();
        assert_eq!(user["username"], "ada");
    }

    #[tokio::test]
    async fn test_load_restores_session() {
        let kv = Arc::new(MemoryStore::new());
        kv.set("token", "persisted").unwrap();
        kv.set("user", r#"{"id":9}"#).unwrap();

        let sessions = SessionStore::load(kv, keys()).unwrap();
        let session = sessions.get().await.unwrap();
        assert_eq!(session.token, "persisted");
        assert_eq!(session.user, json!({"id": 9}));
    }

    #[tokio::test]
    async fn test_load_tolerates_corrupt_user() {
        let kv = Arc::new(MemoryStore::new());
        kv.set("token", "t").unwrap();
        kv.set("user", "{not json").unwrap();

        let sessions = SessionStore::load(kv, keys()).unwrap();
        let session = sessions.get().await.unwrap();
        assert_eq!(session.user, Value::Null);
    }

    #[tokio::test]
    async fn test_clear_removes_durable_keys() {
        let kv = Arc::new(MemoryStore::new());
        let sessions = SessionStore::load(kv.clone(), keys()).unwrap();
        sessions.set(Session::new("abc", json!({}))).await.unwrap();

        sessions.clear().await.unwrap();
        assert!(!sessions.is_authenticated().await);
        assert!(kv.is_empty());

        // Clearing twice is harmless
        sessions.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_admin_keys_are_isolated() {
        let kv = Arc::new(MemoryStore::new());
        let web = SessionStore::load(kv.clone(), SessionKeys::default()).unwrap();
        let admin = SessionStore::load(kv.clone(), SessionKeys::admin()).unwrap();

        admin.set(Session::new("root", json!({"role": "admin"}))).await.unwrap();
        web.set(Session::new("user", json!({"role": "user"}))).await.unwrap();
        web.clear().await.unwrap();

        assert_eq!(kv.get("admin_token").unwrap().as_deref(), Some("root"));
        assert_eq!(kv.get("token").unwrap(), None);
    }

    #[tokio::test]
    async fn test_partial_updates() {
        let sessions = SessionStore::in_memory();
        sessions.set_user(json!({"id": 1})).await.unwrap();
        assert!(sessions.get().await.is_none());

        sessions.set_token("t1").await.unwrap();
        sessions.set_user(json!({"id": 1})).await.unwrap();
        sessions.set_token("t2").await.unwrap();

        let session = sessions.get().await.unwrap();
        assert_eq!(session.token, "t2");
        assert_eq!(session.user, json!({"id": 1}));
    }

    #[tokio::test]
    async fn test_clear_survives_failed_token_remove() {
        let kv = Arc::new(FailingStore {
            fail_remove: Some("token"),
            ..Default::default()
        });
        let sessions = SessionStore::load(kv.clone(), keys()).unwrap();
        sessions.set(Session::new("abc", json!({"id": 1}))).await.unwrap();

        assert!(sessions.clear().await.is_err());
        assert!(sessions.get().await.is_none());
        assert_eq!(kv.get("user").unwrap(), None);

        let restarted = SessionStore::load(kv, keys()).unwrap();
        assert!(restarted.get().await.is_none());
    }

    #[tokio::test]
    async fn test_clear_attempts_user_after_token_failure() {
        let kv = Arc::new(FailingStore {
            fail_set: Some("token"),
            fail_remove: Some("token"),
            ..Default::default()
        });
        kv.inner.set("token", "abc").unwrap();
        kv.inner.set("user", r#"{"id":1}"#).unwrap();
        let sessions = SessionStore::load(kv.clone(), keys()).unwrap();

        let err = sessions.clear().await.unwrap_err();
        assert!(err.to_string().contains("remove token"));
        assert_eq!(kv.get("user").unwrap(), None);
        assert!(sessions.get().await.is_none());
    }

    #[tokio::test]
    async fn test_failed_user_write_keeps_previous_session() {
        let kv = Arc::new(FailingStore {
            fail_set: Some("user"),
            ..Default::default()
        });
        kv.inner.set("token", "A").unwrap();
        kv.inner.set("user", r#"{"name":"alice"}"#).unwrap();
        let sessions = SessionStore::load(kv.clone(), keys()).unwrap();

        assert!(sessions.set(Session::new("B", json!({"name": "bob"}))).await.is_err());
        assert_eq!(sessions.token().await.as_deref(), Some("A"));

        let restarted = SessionStore::load(kv, keys()).unwrap().get().await.unwrap();
        assert_eq!(restarted, Session::new("A", json!({"name": "alice"})));
    }

    #[tokio::test]
    async fn test_failed_token_write_restores_previous_user() {
        let kv = Arc::new(FailingStore {
            fail_set: Some("token"),
            ..Default::default()
        });
        kv.inner.set("token", "A").unwrap();
        kv.inner.set("user", r#"{"name":"alice"}"#).unwrap();
        let sessions = SessionStore::load(kv.clone(), keys()).unwrap();

        assert!(sessions.set(Session::new("B", json!({"name": "bob"}))).await.is_err());

        let restarted = SessionStore::load(kv, keys()).unwrap().get().await.unwrap();
        assert_eq!(restarted, Session::new("A", json!({"name": "alice"})));
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("session.json");

        let store = FileStore::new(&path);
        assert_eq!(store.get("token").unwrap(), None);
        store.set("token", "abc").unwrap();
        store.set("user", r#"{"id":1}"#).unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("token").unwrap().as_deref(), Some("abc"));

        reopened.remove("token").unwrap();
        assert_eq!(store.get("token").unwrap(), None);
        assert_eq!(store.get("user").unwrap().as_deref(), Some(r#"{"id":1}"#));
    }

    #[test]
    fn test_file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(store.get("token"), Err(StoreError::Json(_))));
    }
}
