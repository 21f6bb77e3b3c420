//! In-memory simulated database backend.
//!
//! Holds storage representations in an `IdStore` behind a mutex and converts
//! to and from the domain shape on every call.

use crate::error::{InfoError, InfoResult};
use crate::model::id_store::IdStore;
use crate::model::info::{adopt_id, DomainInfo, Info, StorageInfo};
use crate::model::typed_id::TypedId;
use crate::repo::{now_ms, InfoRepository};
use log::debug;
use parking_lot::Mutex;

/// Simulated database keyed by raw id.
pub struct MemoryInfoRepository<I: DomainInfo> {
    rows: Mutex<IdStore<I::Storage>>,
}

impl<I: DomainInfo> Default for MemoryInfoRepository<I> {
    fn default() -> Self {
        Self {
            rows: Mutex::new(IdStore::new()),
        }
    }
}

impl<I: DomainInfo> MemoryInfoRepository<I> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the backend from a previously exported JSON snapshot.
    ///
    /// # Errors
    /// - `Deserialization` / `MalformedIdentifier` from `IdStore::from_json`.
    /// - `LayerViolation` when a row key carries a transfer tag.
    pub fn from_json(text: &str) -> InfoResult<Self> {
        let rows = IdStore::<I::Storage>::from_json(text)?;
        for id in rows.keys() {
            adopt_id::<I::Storage>(&id)?;
        }
        Ok(Self {
            rows: Mutex::new(rows),
        })
    }

    /// Exports every row as an `IdStore` JSON object.
    pub fn to_json(&self) -> InfoResult<String> {
        self.rows.lock().to_json()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.lock().is_empty()
    }
}

impl<I: DomainInfo> InfoRepository<I> for MemoryInfoRepository<I> {
    fn fetch_info(&self, id: &TypedId) -> InfoResult<I> {
        self.rows
            .lock()
            .get(id)
            .map(StorageInfo::to_domain)
            .ok_or_else(|| InfoError::NotFound(id.clone()))
    }

    fn add_info(&self, info: &I) -> InfoResult<I> {
        let mut rows = self.rows.lock();
        if let Some(existing) = rows.stored_id(info.id()) {
            return Err(InfoError::AlreadyExists(existing));
        }
        let mut row = info.to_storage();
        row.stamp_write(None, now_ms());
        rows.put(row.id().clone(), row);
        debug!(
            "event=repo_write module=repo status=ok backend=memory op=add kind={} id={}",
            I::KIND,
            info.id()
        );
        Ok(info.clone())
    }

    fn update_info(&self, info: &I) -> InfoResult<I> {
        let mut rows = self.rows.lock();
        let Some(previous) = rows.get(info.id()) else {
            return Err(InfoError::NotFound(info.id().clone()));
        };
        let mut row = info.to_storage();
        row.stamp_write(Some(previous), now_ms());
        rows.put(row.id().clone(), row);
        debug!(
            "event=repo_write module=repo status=ok backend=memory op=update kind={} id={}",
            I::KIND,
            info.id()
        );
        Ok(info.clone())
    }

    fn upsert_info(&self, info: &I) -> InfoResult<I> {
        let mut rows = self.rows.lock();
        let mut row = info.to_storage();
        row.stamp_write(rows.get(info.id()), now_ms());
        rows.put(row.id().clone(), row);
        debug!(
            "event=repo_write module=repo status=ok backend=memory op=upsert kind={} id={}",
            I::KIND,
            info.id()
        );
        Ok(info.clone())
    }

    fn delete_info(&self, id: &TypedId) -> InfoResult<()> {
        self.rows
            .lock()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| InfoError::NotFound(id.clone()))
    }

    fn list_infos(&self) -> InfoResult<Vec<I>> {
        let rows = self.rows.lock();
        let mut infos: Vec<I> = rows.values().into_iter().map(StorageInfo::to_domain).collect();
        infos.sort_by_key(|info| info.id().raw_id());
        Ok(infos)
    }
}
