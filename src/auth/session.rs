//! Session context owning the stored credential pair.
//!
//! All token reads and writes go through [`Session`]; nothing else in the
//! crate (or in an application embedding it) touches the underlying store
//! directly. The session is shared behind an `Arc` so the gateway, the API
//! client, and the UI layer all observe the same credentials.

use std::path::PathBuf;
use std::sync::{Mutex, RwLock};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Session file name in the app data directory
const SESSION_FILE: &str = "session.json";

/// The persisted session record.
///
/// Serialized field names are the storage keys: `access_token`,
/// `refresh_token`, `user_id`.
/// The refresh token is optional at the type level because the backing
/// store keeps the keys independently; login and refresh always write both.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionData {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Persistent key-value store for the session record.
///
/// Production: JSON file in the app data directory.
/// Testing and embedding: in-memory store.
pub trait TokenStore: Send + Sync {
    /// Load the stored session, if any.
    fn load(&self) -> Result<Option<SessionData>>;

    /// Persist the whole session record in one write. A partially written
    /// pair (access present, refresh absent) must never be observable.
    fn save(&self, data: &SessionData) -> Result<()>;

    /// Remove the stored session.
    fn clear(&self) -> Result<()>;
}

/// File-backed token store (`session.json`).
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            path: data_dir.join(SESSION_FILE),
        }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<SessionData>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)
            .context("Failed to read session file")?;
        let data: SessionData = serde_json::from_str(&contents)
            .context("Failed to parse session file")?;
        Ok(Some(data))
    }

    fn save(&self, data: &SessionData) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(data)?;
        std::fs::write(&self.path, contents).context("Failed to write session file")?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path).context("Failed to remove session file")?;
        }
        Ok(())
    }
}

/// In-memory token store for tests and transient embeddings.
#[derive(Default)]
pub struct MemoryTokenStore {
    inner: Mutex<Option<SessionData>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<SessionData>> {
        Ok(self.inner.lock().unwrap().clone())
    }

    fn save(&self, data: &SessionData) -> Result<()> {
        *self.inner.lock().unwrap() = Some(data.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.inner.lock().unwrap() = None;
        Ok(())
    }
}

/// Shared session context.
///
/// Holds the current credential pair in memory and writes through to the
/// backing store on every mutation. The lock is never held across a network
/// await; store writes are short synchronous operations.
pub struct Session {
    store: Box<dyn TokenStore>,
    data: RwLock<Option<SessionData>>,
}

impl Session {
    /// Create a session backed by the given store, loading any persisted
    /// credentials.
    pub fn new(store: Box<dyn TokenStore>) -> Result<Self> {
        let data = store.load()?;
        if data.is_some() {
            debug!("Restored persisted session");
        }
        Ok(Self {
            store,
            data: RwLock::new(data),
        })
    }

    /// Current access token, if logged in.
    pub fn access_token(&self) -> Option<String> {
        self.data
            .read()
            .unwrap()
            .as_ref()
            .map(|d| d.access_token.clone())
    }

    /// Current refresh token, if logged in.
    pub fn refresh_token(&self) -> Option<String> {
        self.data
            .read()
            .unwrap()
            .as_ref()
            .and_then(|d| d.refresh_token.clone())
    }

    /// Identifier of the logged-in user, when known.
    pub fn user_id(&self) -> Option<String> {
        self.data
            .read()
            .unwrap()
            .as_ref()
            .and_then(|d| d.user_id.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.data.read().unwrap().is_some()
    }

    /// Install a fresh session (login).
    pub fn install(&self, data: SessionData) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        self.store.save(&data)?;
        *guard = Some(data);
        Ok(())
    }

    /// Record the user identifier after login resolves it.
    pub fn set_user_id(&self, user_id: String) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        if let Some(ref mut data) = *guard {
            data.user_id = Some(user_id);
            self.store.save(data)?;
        }
        Ok(())
    }

    /// Replace both tokens in one step, preserving the user identifier.
    /// The store only ever sees the complete new pair.
    pub fn replace_tokens(&self, access_token: String, refresh_token: String) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        let user_id = guard.as_ref().and_then(|d| d.user_id.clone());
        let data = SessionData {
            access_token,
            refresh_token: Some(refresh_token),
            user_id,
        };
        self.store.save(&data)?;
        *guard = Some(data);
        Ok(())
    }

    /// End the session and purge stored credentials.
    pub fn clear(&self) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        self.store.clear()?;
        *guard = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with(data: Option<SessionData>) -> Session {
        let store = MemoryTokenStore::new();
        if let Some(ref d) = data {
            store.save(d).unwrap();
        }
        Session::new(Box::new(store)).unwrap()
    }

    fn pair(access: &str, refresh: &str) -> SessionData {
        SessionData {
            access_token: access.to_string(),
            refresh_token: Some(refresh.to_string()),
            user_id: Some("42".to_string()),
        }
    }

    #[test]
    fn loads_persisted_session() {
        let session = session_with(Some(pair("a1", "r1")));
        assert!(session.is_authenticated());
        assert_eq!(session.access_token().as_deref(), Some("a1"));
        assert_eq!(session.refresh_token().as_deref(), Some("r1"));
        assert_eq!(session.user_id().as_deref(), Some("42"));
    }

    #[test]
    fn replace_tokens_preserves_user_id() {
        let session = session_with(Some(pair("a1", "r1")));
        session
            .replace_tokens("a2".to_string(), "r2".to_string())
            .unwrap();
        assert_eq!(session.access_token().as_deref(), Some("a2"));
        assert_eq!(session.refresh_token().as_deref(), Some("r2"));
        assert_eq!(session.user_id().as_deref(), Some("42"));
    }

    #[test]
    fn clear_ends_session() {
        let session = session_with(Some(pair("a1", "r1")));
        session.clear().unwrap();
        assert!(!session.is_authenticated());
        assert!(session.access_token().is_none());
        assert!(session.refresh_token().is_none());
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().to_path_buf());

        assert!(store.load().unwrap().is_none());

        let data = pair("a1", "r1");
        store.save(&data).unwrap();
        assert_eq!(store.load().unwrap(), Some(data));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn file_store_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileTokenStore::new(dir.path().to_path_buf());
            let session = Session::new(Box::new(store)).unwrap();
            session.install(pair("a1", "r1")).unwrap();
        }
        let store = FileTokenStore::new(dir.path().to_path_buf());
        let session = Session::new(Box::new(store)).unwrap();
        assert_eq!(session.access_token().as_deref(), Some("a1"));
    }
}
