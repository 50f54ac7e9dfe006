//! Session holder and token persistence

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use crate::error::Error;

/// Key the bearer token is persisted under
pub const TOKEN_KEY: &str = "authToken";

/// External key-value store that keeps the bearer token across restarts
pub trait TokenStore: Send + Sync {
    /// Read the persisted token
    fn load(&self) -> Result<Option<String>, Error>;

    /// Persist the token
    fn save(&self, token: &str) -> Result<(), Error>;

    /// Remove the persisted token
    fn clear(&self) -> Result<(), Error>;
}

/// Process-local store, nothing survives a restart
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds a token
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, Error> {
        Ok(self.token.lock().map_err(|_| Error::general("token store poisoned"))?.clone())
    }

    fn save(&self, token: &str) -> Result<(), Error> {
        *self.token.lock().map_err(|_| Error::general("token store poisoned"))? = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), Error> {
        *self.token.lock().map_err(|_| Error::general("token store poisoned"))? = None;
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedSession {
    #[serde(rename = "authToken", default, skip_serializing_if = "Option::is_none")]
    auth_token: Option<String>,
}

/// JSON file holding the single `authToken` key
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, Error> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(None);
        }
        let persisted: PersistedSession = serde_json::from_str(&raw)?;
        Ok(persisted.auth_token.filter(|t| !t.is_empty()))
    }

    fn save(&self, token: &str) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let persisted = PersistedSession {
            auth_token: Some(token.to_string()),
        };
        fs::write(&self.path, serde_json::to_vec_pretty(&persisted)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), Error> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// The single active session of this client.
///
/// Cloning shares the same token. Readers only ever see `token()` and
/// `is_authenticated()`; writes go through [`crate::auth::Auth`].
#[derive(Clone)]
pub struct Session {
    token: Arc<RwLock<Option<String>>>,
    store: Arc<dyn TokenStore>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl Session {
    /// Restore the session from a store
    pub fn restore(store: Arc<dyn TokenStore>) -> Result<Self, Error> {
        let token = store.load()?;
        Ok(Self {
            token: Arc::new(RwLock::new(token)),
            store,
        })
    }

    /// An empty session backed by memory only
    pub fn in_memory() -> Self {
        Self {
            token: Arc::new(RwLock::new(None)),
            store: Arc::new(MemoryTokenStore::new()),
        }
    }

    /// The current bearer token
    pub fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|t| t.clone())
    }

    /// Present token means authenticated
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub(crate) fn set_token(&self, token: &str) -> Result<(), Error> {
        self.store.save(token)?;
        let mut current = self.token.write().map_err(|_| Error::general("session lock poisoned"))?;
        *current = Some(token.to_string());
        Ok(())
    }

    pub(crate) fn clear(&self) -> Result<(), Error> {
        {
            let mut current = self.token.write().map_err(|_| Error::general("session lock poisoned"))?;
            *current = None;
        }
        self.store.clear()
    }
}
