//! In-process session store, for tests and embedding.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use jiff::Timestamp;
use uuid::Uuid;

use super::{Result, Session, SessionStore, StorageError};

/// Sessions held in memory; gone when the process exits.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: Mutex<BTreeMap<Uuid, Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<Uuid, Session>>> {
        self.sessions
            .lock()
            .map_err(|_| StorageError::Corrupt("session lock poisoned".into()))
    }
}

impl SessionStore for MemorySessionStore {
    fn create_session(&self, session: &Session) -> Result<()> {
        let mut sessions = self.lock()?;
        if sessions.contains_key(&session.id) {
            return Err(StorageError::SessionAlreadyExists(session.id));
        }
        sessions.insert(session.id, session.clone());
        Ok(())
    }

    fn update_session(&self, session: &Session) -> Result<()> {
        let mut sessions = self.lock()?;
        let slot = sessions
            .get_mut(&session.id)
            .ok_or(StorageError::SessionNotFound(session.id))?;
        *slot = session.clone();
        Ok(())
    }

    fn load_session(&self, id: Uuid) -> Result<Session> {
        self.lock()?
            .get(&id)
            .cloned()
            .ok_or(StorageError::SessionNotFound(id))
    }

    fn list_sessions(&self) -> Result<Vec<Session>> {
        let mut sessions: Vec<Session> = self.lock()?.values().cloned().collect();
        sessions.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(sessions)
    }

    fn remove_session(&self, id: Uuid) -> Result<()> {
        self.lock()?
            .remove(&id)
            .map(|_| ())
            .ok_or(StorageError::SessionNotFound(id))
    }

    fn purge_idle(&self, cutoff: Timestamp) -> Result<usize> {
        let mut sessions = self.lock()?;
        let before = sessions.len();
        sessions.retain(|_, s| s.updated_at >= cutoff);
        Ok(before - sessions.len())
    }
}
