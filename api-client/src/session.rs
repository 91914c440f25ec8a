//! Application context holding the login session
//!
//! The access token and user profile are kept in an explicitly injected
//! [`AppContext`]. The context loads its state from a [`SessionStore`] once
//! when created and writes it back after every update.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use serde::{Deserialize, Serialize};
use shared::{CommonError, Result};
use tracing::{debug, warn};

/// Profile of the signed-in user, as returned by OTP verification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub user_type: String,
}

/// Persisted login state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthState {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<UserProfile>,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.access_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Persistence boundary for [`AuthState`]
pub trait SessionStore: Send + Sync {
    /// Load the saved state; a missing or unreadable session yields the default state
    fn load(&self) -> AuthState;

    fn save(&self, state: &AuthState) -> Result<()>;

    fn clear(&self) -> Result<()>;
}

/// JSON file under the user's config directory
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> AuthState {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(_) => return AuthState::default(),
        };

        match serde_json::from_str(&content) {
            Ok(state) => state,
            Err(e) => {
                warn!("Ignoring unreadable session file {:?}: {}", self.path, e);
                AuthState::default()
            }
        }
    }

    fn save(&self, state: &AuthState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, json)?;
        debug!("Session saved to {:?}", self.path);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store, nothing survives the process
#[derive(Default)]
pub struct MemorySessionStore {
    state: Mutex<AuthState>,
}

impl MemorySessionStore {
    pub fn with_state(state: AuthState) -> Self {
        Self {
            state: Mutex::new(state),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> AuthState {
        self.state.lock().map(|s| s.clone()).unwrap_or_default()
    }

    fn save(&self, state: &AuthState) -> Result<()> {
        let mut guard = self
            .state
            .lock()
            .map_err(|_| CommonError::Io("session store lock poisoned".to_string()))?;
        *guard = state.clone();
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.save(&AuthState::default())
    }
}

/// Shared handle to the current session
#[derive(Clone)]
pub struct AppContext {
    state: Arc<RwLock<AuthState>>,
    store: Arc<dyn SessionStore>,
}

impl AppContext {
    /// Create a context from whatever the store has saved
    pub fn load(store: Arc<dyn SessionStore>) -> Self {
        let state = store.load();
        Self {
            state: Arc::new(RwLock::new(state)),
            store,
        }
    }

    /// Context with no persistence and no login
    pub fn ephemeral() -> Self {
        Self::load(Arc::new(MemorySessionStore::default()))
    }

    pub fn auth(&self) -> AuthState {
        self.state.read().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn access_token(&self) -> Option<String> {
        self.state
            .read()
            .ok()
            .and_then(|s| s.access_token.clone())
            .filter(|t| !t.is_empty())
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.state.read().ok().and_then(|s| s.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    /// Apply `f` to the state and persist the result
    pub fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut AuthState),
    {
        let snapshot = {
            let mut guard = self
                .state
                .write()
                .map_err(|_| CommonError::Io("session lock poisoned".to_string()))?;
            f(&mut guard);
            guard.clone()
        };
        self.store.save(&snapshot)
    }

    pub fn set_login(
        &self,
        access_token: String,
        refresh_token: Option<String>,
        user: UserProfile,
    ) -> Result<()> {
        self.update(|state| {
            state.access_token = Some(access_token);
            if refresh_token.is_some() {
                state.refresh_token = refresh_token;
            }
            state.user = Some(user);
        })
    }

    /// Forget the session, in memory and on disk
    pub fn clear(&self) -> Result<()> {
        {
            let mut guard = self
                .state
                .write()
                .map_err(|_| CommonError::Io("session lock poisoned".to_string()))?;
            *guard = AuthState::default();
        }
        self.store.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn profile() -> UserProfile {
        UserProfile {
            full_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            user_type: "ADMIN".to_string(),
        }
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileSessionStore::new(dir.path().join("nested").join("session.json")));

        let context = AppContext::load(store.clone());
        assert!(!context.is_authenticated());

        context
            .set_login("token-1".to_string(), Some("refresh-1".to_string()), profile())
            .unwrap();

        let reloaded = AppContext::load(store);
        assert_eq!(reloaded.access_token().as_deref(), Some("token-1"));
        assert_eq!(reloaded.user(), Some(profile()));
        assert_eq!(reloaded.auth().refresh_token.as_deref(), Some("refresh-1"));
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = Arc::new(FileSessionStore::new(&path));
        let context = AppContext::load(store.clone());

        context.set_login("token".to_string(), None, profile()).unwrap();
        assert!(path.exists());

        context.clear().unwrap();
        assert!(!path.exists());
        assert!(!context.is_authenticated());
        assert_eq!(store.load(), AuthState::default());

        // Clearing twice is fine
        context.clear().unwrap();
    }

    #[test]
    fn test_corrupt_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();

        let context = AppContext::load(Arc::new(FileSessionStore::new(&path)));
        assert_eq!(context.auth(), AuthState::default());
    }

    #[test]
    fn test_update_keeps_refresh_token_when_absent() {
        let store = Arc::new(MemorySessionStore::with_state(AuthState {
            access_token: Some("old".to_string()),
            refresh_token: Some("keep-me".to_string()),
            user: None,
        }));
        let context = AppContext::load(store.clone());

        context.set_login("new".to_string(), None, profile()).unwrap();

        let saved = store.load();
        assert_eq!(saved.access_token.as_deref(), Some("new"));
        assert_eq!(saved.refresh_token.as_deref(), Some("keep-me"));
    }

    #[test]
    fn test_empty_token_is_not_authenticated() {
        let context = AppContext::load(Arc::new(MemorySessionStore::with_state(AuthState {
            access_token: Some(String::new()),
            ..Default::default()
        })));
        assert!(!context.is_authenticated());
        assert!(!context.auth().is_authenticated());
    }
}
