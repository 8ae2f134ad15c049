//! Local persistence for journey sessions and uploaded files.
//!
//! Sessions live in one `SQLite` database under the storage root; uploads
//! are plain files in a sibling directory:
//!
//! ```text
//! <root>/
//!   sessions.sqlite   # one row per session, journey state as JSON
//!   uploads/          # accepted proof-of-death files, named by UUID
//! ```

mod files;
mod memory;
mod session;

use std::{fs, io, path::PathBuf};

use jiff::Timestamp;
use rusqlite::Connection;
use uuid::Uuid;

use crate::model::JourneyState;

pub use files::{DirectoryFileStore, FileStore};
pub use memory::MemorySessionStore;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("session already exists: {0}")]
    SessionAlreadyExists(Uuid),

    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("corrupt data: {0}")]
    Corrupt(String),
}

pub type Result<T> = core::result::Result<T, StorageError>;

/// A persisted journey.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: Uuid,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub state: JourneyState,
}

impl Session {
    /// A new session for `state`, stamped `now`.
    pub fn new(state: JourneyState, now: Timestamp) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            state,
        }
    }
}

/// Where journey sessions are kept between requests.
pub trait SessionStore {
    fn create_session(&self, session: &Session) -> Result<()>;

    fn update_session(&self, session: &Session) -> Result<()>;

    fn load_session(&self, id: Uuid) -> Result<Session>;

    /// All sessions, oldest first.
    fn list_sessions(&self) -> Result<Vec<Session>>;

    fn remove_session(&self, id: Uuid) -> Result<()>;

    /// Remove sessions last updated before `cutoff`. Returns how many went.
    fn purge_idle(&self, cutoff: Timestamp) -> Result<usize>;
}

/// SQLite-backed session storage.
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    /// Creates a new storage instance rooted at the given directory.
    ///
    /// The directory and schema are created if they don't exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        let storage = Self { root };
        storage.open_db()?;
        Ok(storage)
    }

    /// Returns the default storage root: `~/.service-record/`.
    pub fn default_root() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".service-record"))
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    /// Directory for accepted uploads.
    pub fn uploads_dir(&self) -> PathBuf {
        self.root.join("uploads")
    }

    fn db_path(&self) -> PathBuf {
        self.root.join("sessions.sqlite")
    }

    /// Opens the session database, creating the schema on first use.
    fn open_db(&self) -> Result<Connection> {
        let conn = Connection::open(self.db_path())?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS session (
                 id          TEXT PRIMARY KEY,
                 created_at  TEXT NOT NULL,
                 updated_at  TEXT NOT NULL,
                 status      TEXT NOT NULL,
                 state       TEXT NOT NULL
             );
             CREATE INDEX IF NOT EXISTS session_updated_at ON session (updated_at);",
        )?;
        Ok(conn)
    }
}
