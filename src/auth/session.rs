//! Session state machine for the vault client.
//!
//! A session is an opaque bearer token plus its expiry, handed out by the
//! server's `/auth` or `/init` endpoints. The session starts `Unknown`,
//! becomes `Authenticated` or `Anonymous` after `restore()`, and moves
//! between those two via `login()`/`logout()`.
//!
//! Expiry is evaluated lazily: at restore time and nowhere else. There is no
//! background timer, so a client that stays up past expiry keeps presenting
//! the stale token until the server rejects it.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Session file name in the state directory
const SESSION_FILE: &str = "session.json";

/// Temp file used for atomic session writes
const SESSION_TMP_FILE: &str = "session.json.tmp";

/// Persisted session record: token and expiry always travel together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub token: String,
    pub expiry: DateTime<Utc>,
}

impl SessionData {
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expiry
    }
}

/// Where the session is in its lifecycle.
///
/// Every process starts at `Unknown` until `restore()` has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unknown,
    Anonymous,
    Authenticated,
}

/// Session handle shared between the API client and callers.
///
/// Callers are expected to be single-threaded (one event loop); the lock just
/// makes the sharing explicit instead of relying on ambient globals.
pub type SharedSession = Arc<RwLock<Session>>;

pub struct Session {
    state_dir: PathBuf,
    state: SessionState,
    data: Option<SessionData>,
}

impl Session {
    /// Create a session rooted at the given state directory. No disk access
    /// happens until `restore()`.
    pub fn new(state_dir: PathBuf) -> Self {
        Self {
            state_dir,
            state: SessionState::Unknown,
            data: None,
        }
    }

    /// Wrap the session for sharing with the API client.
    pub fn into_shared(self) -> SharedSession {
        Arc::new(RwLock::new(self))
    }

    /// Load the persisted session from disk.
    ///
    /// Resolves the `Unknown` state: a readable, unexpired record yields
    /// `Authenticated`; anything else yields `Anonymous`. An expired record
    /// is purged eagerly, so a second restore is a no-op.
    pub fn restore(&mut self) -> Result<bool> {
        let path = self.session_path();
        if path.exists() {
            let contents =
                std::fs::read_to_string(&path).context("Failed to read session file")?;
            match serde_json::from_str::<SessionData>(&contents) {
                Ok(data) if !data.is_expired() => {
                    debug!(expiry = %data.expiry, "Restored session from disk");
                    self.data = Some(data);
                    self.state = SessionState::Authenticated;
                    return Ok(true);
                }
                Ok(_) => {
                    debug!("Persisted session has expired, purging");
                    std::fs::remove_file(&path).context("Failed to remove expired session")?;
                }
                Err(e) => {
                    warn!(error = %e, "Persisted session is unreadable, purging");
                    std::fs::remove_file(&path).context("Failed to remove bad session file")?;
                }
            }
        }
        self.state = SessionState::Anonymous;
        Ok(false)
    }

    /// Accept a token/expiry pair from a successful `/auth` or `/init` call.
    ///
    /// The token is opaque and accepted unconditionally; any previous session
    /// is overwritten wholesale. The record is persisted before the in-memory
    /// state flips, via a temp file and rename so a crash never leaves a
    /// half-written record.
    pub fn login(&mut self, token: String, expiry: DateTime<Utc>) -> Result<()> {
        let data = SessionData { token, expiry };
        self.persist(&data)?;
        self.data = Some(data);
        self.state = SessionState::Authenticated;
        Ok(())
    }

    /// Drop the session, in memory and on disk. Idempotent: calling this when
    /// already anonymous is a no-op.
    pub fn logout(&mut self) -> Result<()> {
        self.data = None;
        self.state = SessionState::Anonymous;
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(path).context("Failed to remove session file")?;
        }
        Ok(())
    }

    /// Get the bearer token, if any. The API client re-reads this on every
    /// request rather than caching a copy.
    pub fn token(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.token.as_str())
    }

    /// Get the session expiry, if any.
    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        self.data.as_ref().map(|d| d.expiry)
    }

    /// True iff the state machine is in `Authenticated`.
    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    fn persist(&self, data: &SessionData) -> Result<()> {
        std::fs::create_dir_all(&self.state_dir).context("Failed to create state directory")?;
        let tmp = self.state_dir.join(SESSION_TMP_FILE);
        let contents = serde_json::to_string_pretty(data)?;
        std::fs::write(&tmp, contents).context("Failed to write session file")?;
        std::fs::rename(&tmp, self.session_path()).context("Failed to commit session file")?;
        Ok(())
    }

    fn session_path(&self) -> PathBuf {
        self.state_dir.join(SESSION_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn temp_state_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "lockbox-session-test-{}-{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn fresh_session_starts_unknown() {
        let session = Session::new(temp_state_dir("unknown"));
        assert_eq!(session.state(), SessionState::Unknown);
        assert!(!session.is_authenticated());
        assert!(session.token().is_none());
    }

    #[test]
    fn login_then_restore_round_trips() {
        let dir = temp_state_dir("round-trip");
        let expiry = Utc::now() + Duration::minutes(30);

        let mut session = Session::new(dir.clone());
        session.login("tok-abc".to_string(), expiry).unwrap();
        assert!(session.is_authenticated());
        assert_eq!(session.token(), Some("tok-abc"));
        assert_eq!(session.expiry(), Some(expiry));

        // Simulate a reload: a fresh session over the same state dir
        let mut reloaded = Session::new(dir);
        assert!(reloaded.restore().unwrap());
        assert!(reloaded.is_authenticated());
        assert_eq!(reloaded.token(), Some("tok-abc"));
    }

    #[test]
    fn restore_with_no_record_is_anonymous() {
        let mut session = Session::new(temp_state_dir("no-record"));
        assert!(!session.restore().unwrap());
        assert_eq!(session.state(), SessionState::Anonymous);
    }

    #[test]
    fn restore_purges_expired_record() {
        let dir = temp_state_dir("expired");
        let mut session = Session::new(dir.clone());
        session
            .login("stale".to_string(), Utc::now() - Duration::minutes(5))
            .unwrap();

        let mut reloaded = Session::new(dir.clone());
        assert!(!reloaded.restore().unwrap());
        assert!(!reloaded.is_authenticated());
        assert!(!dir.join(SESSION_FILE).exists());

        // Second restore is a no-op
        assert!(!reloaded.restore().unwrap());
        assert_eq!(reloaded.state(), SessionState::Anonymous);
    }

    #[test]
    fn restore_purges_unreadable_record() {
        let dir = temp_state_dir("corrupt");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(SESSION_FILE), "not json").unwrap();

        let mut session = Session::new(dir.clone());
        assert!(!session.restore().unwrap());
        assert!(!dir.join(SESSION_FILE).exists());
    }

    #[test]
    fn logout_clears_state_and_disk_from_any_state() {
        let dir = temp_state_dir("logout");
        let mut session = Session::new(dir.clone());
        session
            .login("tok".to_string(), Utc::now() + Duration::minutes(30))
            .unwrap();

        session.logout().unwrap();
        assert!(!session.is_authenticated());
        assert!(session.token().is_none());
        assert!(!dir.join(SESSION_FILE).exists());

        // Idempotent
        session.logout().unwrap();
        assert_eq!(session.state(), SessionState::Anonymous);
    }

    #[test]
    fn login_overwrites_previous_session_wholesale() {
        let dir = temp_state_dir("overwrite");
        let mut session = Session::new(dir.clone());
        session
            .login("first".to_string(), Utc::now() + Duration::minutes(10))
            .unwrap();
        let second_expiry = Utc::now() + Duration::minutes(60);
        session.login("second".to_string(), second_expiry).unwrap();

        assert_eq!(session.token(), Some("second"));
        assert_eq!(session.expiry(), Some(second_expiry));

        let mut reloaded = Session::new(dir);
        assert!(reloaded.restore().unwrap());
        assert_eq!(reloaded.token(), Some("second"));
    }
}
