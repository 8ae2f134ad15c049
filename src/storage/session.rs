//! Session storage: create, load, update, list, and purge sessions.

use jiff::Timestamp;
use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};
use uuid::Uuid;

use crate::model::{JourneyState, JourneyStatus};

use super::{Result, Session, SessionStore, Storage, StorageError};

impl SessionStore for Storage {
    fn create_session(&self, session: &Session) -> Result<()> {
        let conn = self.open_db()?;
        let exists: Option<String> = conn
            .query_row(
                "SELECT id FROM session WHERE id = ?1",
                [session.id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_some() {
            return Err(StorageError::SessionAlreadyExists(session.id));
        }
        conn.execute(
            "INSERT INTO session (id, created_at, updated_at, status, state)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                session.id.to_string(),
                session.created_at.to_string(),
                session.updated_at.to_string(),
                status_label(&session.state),
                serde_json::to_string(&session.state)?,
            ],
        )?;
        debug!(session = %session.id, "session created");
        Ok(())
    }

    fn update_session(&self, session: &Session) -> Result<()> {
        let conn = self.open_db()?;
        let rows = conn.execute(
            "UPDATE session
             SET created_at = ?1, updated_at = ?2, status = ?3, state = ?4
             WHERE id = ?5",
            rusqlite::params![
                session.created_at.to_string(),
                session.updated_at.to_string(),
                status_label(&session.state),
                serde_json::to_string(&session.state)?,
                session.id.to_string(),
            ],
        )?;
        if rows == 0 {
            return Err(StorageError::SessionNotFound(session.id));
        }
        Ok(())
    }

    fn load_session(&self, id: Uuid) -> Result<Session> {
        let conn = self.open_db()?;
        let row = conn
            .query_row(
                "SELECT id, created_at, updated_at, state FROM session WHERE id = ?1",
                [id.to_string()],
                read_row,
            )
            .optional()?
            .ok_or(StorageError::SessionNotFound(id))?;
        parse_row(row)
    }

    /// Malformed rows are skipped.
    fn list_sessions(&self) -> Result<Vec<Session>> {
        let conn = self.open_db()?;
        let mut sessions = Vec::new();
        for row in query_all(&conn)? {
            if let Ok(s) = parse_row(row) {
                sessions.push(s);
            }
        }
        sessions.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(sessions)
    }

    fn remove_session(&self, id: Uuid) -> Result<()> {
        let conn = self.open_db()?;
        let rows = conn.execute("DELETE FROM session WHERE id = ?1", [id.to_string()])?;
        if rows == 0 {
            return Err(StorageError::SessionNotFound(id));
        }
        Ok(())
    }

    fn purge_idle(&self, cutoff: Timestamp) -> Result<usize> {
        // Timestamps are compared parsed; their text form does not sort.
        let idle: Vec<Uuid> = self
            .list_sessions()?
            .into_iter()
            .filter(|s| s.updated_at < cutoff)
            .map(|s| s.id)
            .collect();
        let conn = self.open_db()?;
        for id in &idle {
            conn.execute("DELETE FROM session WHERE id = ?1", [id.to_string()])?;
        }
        if !idle.is_empty() {
            info!(purged = idle.len(), %cutoff, "purged idle sessions");
        }
        Ok(idle.len())
    }
}

type RawRow = (String, String, String, String);

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn query_all(conn: &Connection) -> Result<Vec<RawRow>> {
    let mut stmt = conn.prepare("SELECT id, created_at, updated_at, state FROM session")?;
    let rows = stmt
        .query_map([], read_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

fn parse_row((id, created_at, updated_at, state): RawRow) -> Result<Session> {
    let id = id
        .parse::<Uuid>()
        .map_err(|e| StorageError::Corrupt(format!("invalid session id: {e}")))?;
    let created_at = created_at
        .parse::<Timestamp>()
        .map_err(|e| StorageError::Corrupt(format!("invalid created_at: {e}")))?;
    let updated_at = updated_at
        .parse::<Timestamp>()
        .map_err(|e| StorageError::Corrupt(format!("invalid updated_at: {e}")))?;
    let state: JourneyState = serde_json::from_str(&state)?;
    Ok(Session {
        id,
        created_at,
        updated_at,
        state,
    })
}

/// Status column value, kept alongside the JSON for ad-hoc queries.
fn status_label(state: &JourneyState) -> &'static str {
    match state.status {
        JourneyStatus::Active => "active",
        JourneyStatus::Ended { .. } => "ended",
    }
}
