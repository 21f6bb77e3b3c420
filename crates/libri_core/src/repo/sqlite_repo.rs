//! SQLite info backend.
//!
//! # Responsibility
//! - Persist storage representations as JSON payload rows in `infos`.
//! - Keep SQL details inside the repository boundary.
//!
//! # Invariants
//! - Rows are keyed by `(kind, raw_id)`, so a user and its account may share
//!   one raw id without colliding.
//! - Presence checks and writes for one call run under the same lock.

use crate::db::{open_db, open_db_in_memory};
use crate::error::{InfoError, InfoResult};
use crate::model::info::{DomainInfo, Info, StorageInfo};
use crate::model::typed_id::TypedId;
use crate::repo::{now_ms, InfoRepository};
use log::{debug, error};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;

/// Connection handle shared by every repository of one context.
pub type SharedConnection = Arc<Mutex<Connection>>;

/// SQLite-backed repository for one domain Info type.
pub struct SqliteInfoRepository<I: DomainInfo> {
    conn: SharedConnection,
    _info: PhantomData<fn() -> I>,
}

impl<I: DomainInfo> SqliteInfoRepository<I> {
    pub fn new(conn: SharedConnection) -> Self {
        Self {
            conn,
            _info: PhantomData,
        }
    }

    /// Opens a database file and wraps it in a repository.
    pub fn open(path: impl AsRef<Path>) -> InfoResult<Self> {
        Ok(Self::new(Arc::new(Mutex::new(open_db(path)?))))
    }

    pub fn open_in_memory() -> InfoResult<Self> {
        Ok(Self::new(Arc::new(Mutex::new(open_db_in_memory()?))))
    }

    pub fn connection(&self) -> SharedConnection {
        Arc::clone(&self.conn)
    }

    fn encode(info: &I, previous: Option<&I::Storage>) -> InfoResult<(String, String, String)> {
        let mut row = info.to_storage();
        row.stamp_write(previous, now_ms());
        let payload = serde_json::to_string(&row)?;
        Ok((
            row.id().raw_id().to_string(),
            row.id().type_tag().to_string(),
            payload,
        ))
    }

    fn stored_row(conn: &Connection, id: &TypedId) -> InfoResult<Option<I::Storage>> {
        let payload = conn
            .query_row(
                "SELECT payload FROM infos WHERE kind = ?1 AND raw_id = ?2;",
                params![I::KIND, id.raw_id().to_string()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        let Some(payload) = payload else {
            return Ok(None);
        };
        serde_json::from_str(&payload).map(Some).map_err(|err| {
            error!(
                "event=repo_read module=repo status=error backend=sqlite kind={} id={id} error={err}",
                I::KIND
            );
            InfoError::from(err)
        })
    }

    fn stored_id(conn: &Connection, id: &TypedId) -> InfoResult<Option<TypedId>> {
        let tag = conn
            .query_row(
                "SELECT type_tag FROM infos WHERE kind = ?1 AND raw_id = ?2;",
                params![I::KIND, id.raw_id().to_string()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(tag.map(|tag| id.retag(tag)))
    }

    fn log_write(op: &str, id: &TypedId) {
        debug!(
            "event=repo_write module=repo status=ok backend=sqlite op={op} kind={} id={id}",
            I::KIND
        );
    }
}

impl<I: DomainInfo> InfoRepository<I> for SqliteInfoRepository<I> {
    fn fetch_info(&self, id: &TypedId) -> InfoResult<I> {
        let conn = self.conn.lock();
        Self::stored_row(&conn, id)?
            .map(|row| row.to_domain())
            .ok_or_else(|| InfoError::NotFound(id.clone()))
    }

    fn add_info(&self, info: &I) -> InfoResult<I> {
        let conn = self.conn.lock();
        if let Some(existing) = Self::stored_id(&conn, info.id())? {
            return Err(InfoError::AlreadyExists(existing));
        }

        let (raw_id, type_tag, payload) = Self::encode(info, None)?;
        conn.execute(
            "INSERT INTO infos (kind, raw_id, type_tag, payload) VALUES (?1, ?2, ?3, ?4);",
            params![I::KIND, raw_id, type_tag, payload],
        )?;
        Self::log_write("add", info.id());
        Ok(info.clone())
    }

    fn update_info(&self, info: &I) -> InfoResult<I> {
        let conn = self.conn.lock();
        let previous = Self::stored_row(&conn, info.id())?
            .ok_or_else(|| InfoError::NotFound(info.id().clone()))?;
        let (raw_id, type_tag, payload) = Self::encode(info, Some(&previous))?;
        let changed = conn.execute(
            "UPDATE infos
             SET
                type_tag = ?1,
                payload = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE kind = ?3 AND raw_id = ?4;",
            params![type_tag, payload, I::KIND, raw_id],
        )?;

        if changed == 0 {
            return Err(InfoError::NotFound(info.id().clone()));
        }
        Self::log_write("update", info.id());
        Ok(info.clone())
    }

    fn upsert_info(&self, info: &I) -> InfoResult<I> {
        let conn = self.conn.lock();
        let previous = Self::stored_row(&conn, info.id())?;
        let (raw_id, type_tag, payload) = Self::encode(info, previous.as_ref())?;
        conn.execute(
            "INSERT INTO infos (kind, raw_id, type_tag, payload) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (kind, raw_id) DO UPDATE SET
                type_tag = excluded.type_tag,
                payload = excluded.payload,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![I::KIND, raw_id, type_tag, payload],
        )?;
        Self::log_write("upsert", info.id());
        Ok(info.clone())
    }

    fn delete_info(&self, id: &TypedId) -> InfoResult<()> {
        let changed = self.conn.lock().execute(
            "DELETE FROM infos WHERE kind = ?1 AND raw_id = ?2;",
            params![I::KIND, id.raw_id().to_string()],
        )?;
        if changed == 0 {
            return Err(InfoError::NotFound(id.clone()));
        }
        Self::log_write("delete", id);
        Ok(())
    }

    fn list_infos(&self) -> InfoResult<Vec<I>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT payload FROM infos WHERE kind = ?1;")?;
        let mut rows = stmt.query(params![I::KIND])?;
        let mut infos = Vec::new();
        while let Some(row) = rows.next()? {
            let payload: String = row.get(0)?;
            let stored: I::Storage = serde_json::from_str(&payload)?;
            infos.push(stored.to_domain());
        }
        infos.sort_by_key(|info: &I| info.id().raw_id());
        Ok(infos)
    }
}
