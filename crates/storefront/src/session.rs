//! The authenticated session and where it is kept between runs.
//!
//! A [`SessionContext`] is created at login, read at the start of every
//! protected operation and destroyed at logout. It persists as a JSON object
//! with exactly two keys, `token` and `user`.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use swiftthrift_core::User;
use thiserror::Error;

use crate::error::ClientError;

/// Errors reading or writing a session store.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored session is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("session store lock poisoned")]
    Poisoned,
}

/// The logged-in user and their backend token.
pub struct SessionContext {
    token: SecretString,
    user: User,
}

impl Clone for SessionContext {
    fn clone(&self) -> Self {
        Self {
            token: SecretString::from(self.token.expose_secret().to_owned()),
            user: self.user.clone(),
        }
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

impl SessionContext {
    #[must_use]
    pub const fn new(token: SecretString, user: User) -> Self {
        Self { token, user }
    }

    #[must_use]
    pub const fn token(&self) -> &SecretString {
        &self.token
    }

    #[must_use]
    pub const fn user(&self) -> &User {
        &self.user
    }
}

/// On-disk shape: `{ "token": "...", "user": { "userId": 1, ... } }`.
#[derive(Serialize, Deserialize)]
struct StoredSession {
    token: String,
    user: User,
}

impl From<&SessionContext> for StoredSession {
    fn from(session: &SessionContext) -> Self {
        Self {
            token: session.token.expose_secret().to_string(),
            user: session.user.clone(),
        }
    }
}

impl From<StoredSession> for SessionContext {
    fn from(stored: StoredSession) -> Self {
        Self {
            token: SecretString::from(stored.token),
            user: stored.user,
        }
    }
}

/// Persistence for the current session.
pub trait SessionStore: Send + Sync {
    /// The stored session, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the store exists but cannot be read.
    fn load(&self) -> Result<Option<SessionContext>, SessionError>;

    /// Replace the stored session.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn save(&self, session: &SessionContext) -> Result<(), SessionError>;

    /// Remove the stored session. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn clear(&self) -> Result<(), SessionError>;
}

/// Load the session or fail as unauthenticated.
///
/// A missing token counts as no session.
///
/// # Errors
///
/// Returns `ClientError::Unauthenticated` when nobody is logged in.
pub fn require_session(store: &dyn SessionStore) -> Result<SessionContext, ClientError> {
    match store.load()? {
        Some(session) if !session.token.expose_secret().is_empty() => Ok(session),
        _ => Err(ClientError::Unauthenticated),
    }
}

// =============================================================================
// File store
// =============================================================================

/// Session kept in a JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<SessionContext>, SessionError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        let stored: StoredSession = serde_json::from_str(&raw)?;
        Ok(Some(stored.into()))
    }

    fn save(&self, session: &SessionContext) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&StoredSession::from(session))?;
        std::fs::write(&self.path, json)?;
        restrict_permissions(&self.path)?;
        tracing::debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

// =============================================================================
// Memory store
// =============================================================================

/// Session kept in memory; used by the return listener and in tests.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<StoredSession>>,
}

impl std::fmt::Debug for StoredSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredSession")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that starts out logged in.
    #[must_use]
    pub fn with_session(session: &SessionContext) -> Self {
        Self {
            session: Mutex::new(Some(StoredSession::from(session))),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<SessionContext>, SessionError> {
        let guard = self.session.lock().map_err(|_| SessionError::Poisoned)?;
        Ok(guard.as_ref().map(|stored| SessionContext {
            token: SecretString::from(stored.token.clone()),
            user: stored.user.clone(),
        }))
    }

    fn save(&self, session: &SessionContext) -> Result<(), SessionError> {
        let mut guard = self.session.lock().map_err(|_| SessionError::Poisoned)?;
        *guard = Some(StoredSession::from(session));
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        let mut guard = self.session.lock().map_err(|_| SessionError::Poisoned)?;
        *guard = None;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use swiftthrift_core::{UserId, UserRole};

    fn session() -> SessionContext {
        SessionContext::new(
            SecretString::from("tok-abc".to_string()),
            User {
                user_id: UserId::new(5),
                email: "ana@mail.ph".to_string(),
                username: "ana".to_string(),
                role: UserRole::Customer,
            },
        )
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("swiftthrift-test-{}-{name}", std::process::id()))
            .join("session.json")
    }

    #[test]
    fn test_debug_redacts_token() {
        let rendered = format!("{:?}", session());
        assert!(!rendered.contains("tok-abc"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn test_file_store_round_trip_and_clear() {
        let path = temp_path("roundtrip");
        let store = FileSessionStore::new(&path);
        assert!(store.load().unwrap().is_none());

        store.save(&session()).unwrap();
        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["token"], "tok-abc");
        assert_eq!(raw["user"]["userId"], 5);

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.token().expose_secret(), "tok-abc");
        assert_eq!(loaded.user().user_id, UserId::new(5));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        store.clear().unwrap();

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_file_store_corrupt() {
        let path = temp_path("corrupt");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();
        let store = FileSessionStore::new(&path);
        assert!(matches!(store.load(), Err(SessionError::Corrupt(_))));
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_require_session() {
        let store = MemorySessionStore::new();
        assert!(matches!(
            require_session(&store),
            Err(ClientError::Unauthenticated)
        ));

        store.save(&session()).unwrap();
        assert_eq!(
            require_session(&store).unwrap().user().username,
            "ana"
        );

        let empty_token = SessionContext::new(SecretString::from(String::new()), session().user);
        store.save(&empty_token).unwrap();
        assert!(matches!(
            require_session(&store),
            Err(ClientError::Unauthenticated)
        ));
    }
}
