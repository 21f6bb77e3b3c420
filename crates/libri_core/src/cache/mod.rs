//! Cache-sync engine shared by every role.
//!
//! # Responsibility
//! - Hold one role's cached Info and the outcome of its last repository call.
//! - Fetch lazily, write optimistically, refresh on demand.
//! - Import/export serialized Info with identity validation.
//!
//! # Invariants
//! - The holder (state + cached value + last result) is swapped as one unit,
//!   so readers never see a torn combination.
//! - No lock is held while a repository call runs; concurrent writers race and
//!   the last one to store wins. There is no version token.
//! - Construction never touches a repository.
//! - A failed fetch leaves `CacheMiss`; the next fetch retries from scratch.
//! - A failed repository write does not roll the cache back.
//! - Only Info whose raw id matches the cache id is ever stored.

use crate::error::{InfoError, InfoResult};
use crate::model::info::DomainInfo;
use crate::model::typed_id::TypedId;
use log::{debug, warn};
use parking_lot::RwLock;
use std::sync::Arc;

/// Text returned by `to_serialized` when nothing is cached.
pub const EMPTY_SERIALIZED: &str = "{}";

/// Lifecycle of a cached Info.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Uninitialized,
    CacheMiss,
    CacheHit,
}

#[derive(Debug)]
struct CacheSlot<I> {
    state: CacheState,
    cached_info: Option<I>,
    last_result: Option<InfoResult<I>>,
}

impl<I> CacheSlot<I> {
    fn empty() -> Self {
        Self {
            state: CacheState::Uninitialized,
            cached_info: None,
            last_result: None,
        }
    }
}

/// Cached-Info holder for one role.
#[derive(Debug)]
pub struct InfoCache<I: DomainInfo> {
    id: TypedId,
    slot: RwLock<Arc<CacheSlot<I>>>,
}

impl<I: DomainInfo> InfoCache<I> {
    /// Starts `Uninitialized`.
    pub fn new(id: TypedId) -> Self {
        Self {
            id,
            slot: RwLock::new(Arc::new(CacheSlot::empty())),
        }
    }

    /// Starts `CacheHit` with `info`.
    pub fn with_info(id: TypedId, info: I) -> Self {
        Self {
            id,
            slot: RwLock::new(Arc::new(CacheSlot {
                state: CacheState::CacheHit,
                cached_info: Some(info),
                last_result: None,
            })),
        }
    }

    pub fn id(&self) -> &TypedId {
        &self.id
    }

    pub fn state(&self) -> CacheState {
        self.load().state
    }

    pub fn is_fetched(&self) -> bool {
        self.state() == CacheState::CacheHit
    }

    /// Cached value without any repository access.
    pub fn cached_info(&self) -> Option<I> {
        self.load().cached_info.clone()
    }

    /// Returns the cache on hit; otherwise runs `fetch` and records it.
    ///
    /// Failures are swallowed into `None`; `failure_reason` recovers them.
    pub fn fetch_with(&self, fetch: impl FnOnce() -> InfoResult<I>) -> Option<I> {
        let snapshot = self.load();
        if snapshot.state == CacheState::CacheHit {
            debug!("event=info_fetch module=cache status=hit id={}", self.id);
            return snapshot.cached_info.clone();
        }

        self.run_fetch(fetch).ok()
    }

    /// Clears the cache, then always runs `fetch`.
    pub fn refresh_with(&self, fetch: impl FnOnce() -> InfoResult<I>) -> InfoResult<I> {
        self.store(CacheSlot::empty());
        self.run_fetch(fetch)
    }

    /// Replaces the cache with `info`, then runs `write`.
    ///
    /// The cache keeps `info` whatever `write` returns; callers needing the
    /// repository's view after a failure must refresh.
    ///
    /// # Errors
    /// - `IdentityMismatch` when `info` belongs to another raw id; neither the
    ///   cache nor the repository is touched.
    pub fn update_with(&self, info: I, write: impl FnOnce(&I) -> InfoResult<I>) -> InfoResult<I> {
        self.ensure_owned(&info)?;
        self.store(CacheSlot {
            state: CacheState::CacheHit,
            cached_info: Some(info.clone()),
            last_result: None,
        });

        let result = write(&info);
        match &result {
            Ok(_) => debug!("event=info_update module=cache status=ok id={}", self.id),
            Err(err) => warn!(
                "event=info_update module=cache status=error id={} rollback=none error={}",
                self.id, err
            ),
        }

        let mut guard = self.slot.write();
        let current = Arc::clone(&guard);
        *guard = Arc::new(CacheSlot {
            state: current.state,
            cached_info: current.cached_info.clone(),
            last_result: Some(result.clone()),
        });
        result
    }

    /// Error of the most recent repository call, if it failed.
    pub fn failure_reason(&self) -> Option<InfoError> {
        match &self.load().last_result {
            Some(Err(err)) => Some(err.clone()),
            _ => None,
        }
    }

    /// Serializes the cached value only; never fetches.
    pub fn to_serialized(&self) -> String {
        let Some(info) = self.cached_info() else {
            warn!(
                "event=info_serialize module=cache status=empty id={} reason=not_fetched",
                self.id
            );
            return EMPTY_SERIALIZED.to_string();
        };

        serde_json::to_string(&info).unwrap_or_else(|err| {
            warn!(
                "event=info_serialize module=cache status=error id={} error={}",
                self.id, err
            );
            EMPTY_SERIALIZED.to_string()
        })
    }

    /// Decodes serialized Info meant for this cache.
    ///
    /// # Errors
    /// - `Deserialization` when `text` is not a valid Info document.
    /// - `IdentityMismatch` when the embedded raw id differs from this cache's.
    pub fn decode_serialized(&self, text: &str) -> InfoResult<I> {
        let info: I = serde_json::from_str(text)?;
        self.ensure_owned(&info)?;
        Ok(info.to_domain())
    }

    fn ensure_owned(&self, info: &I) -> InfoResult<()> {
        if info.id().loose_eq(&self.id) {
            return Ok(());
        }
        warn!(
            "event=info_identity module=cache status=rejected id={} foreign_id={}",
            self.id,
            info.id()
        );
        Err(InfoError::IdentityMismatch {
            expected: self.id.clone(),
            actual: info.id().clone(),
        })
    }

    fn run_fetch(&self, fetch: impl FnOnce() -> InfoResult<I>) -> InfoResult<I> {
        let result = fetch();
        let slot = match &result {
            Ok(info) => {
                debug!("event=info_fetch module=cache status=miss_filled id={}", self.id);
                CacheSlot {
                    state: CacheState::CacheHit,
                    cached_info: Some(info.clone()),
                    last_result: Some(result.clone()),
                }
            }
            Err(err) => {
                debug!(
                    "event=info_fetch module=cache status=error id={} error={}",
                    self.id, err
                );
                CacheSlot {
                    state: CacheState::CacheMiss,
                    cached_info: None,
                    last_result: Some(result.clone()),
                }
            }
        };
        self.store(slot);
        result
    }

    fn load(&self) -> Arc<CacheSlot<I>> {
        Arc::clone(&self.slot.read())
    }

    fn store(&self, slot: CacheSlot<I>) {
        *self.slot.write() = Arc::new(slot);
    }
}

#[cfg(test)]
mod tests {
    use super::{CacheState, InfoCache};
    use crate::error::InfoError;
    use crate::model::book::BookInfo;
    use crate::model::typed_id::TypedId;
    use std::cell::Cell;

    fn book_id() -> TypedId {
        TypedId::deterministic_fake(1, "Role.Book")
    }

    #[test]
    fn construction_states() {
        let empty = InfoCache::<BookInfo>::new(book_id());
        assert_eq!(empty.state(), CacheState::Uninitialized);
        assert!(empty.cached_info().is_none());

        let info = BookInfo::new(&book_id(), "Dune", "Herbert", "desert");
        let full = InfoCache::with_info(book_id(), info.clone());
        assert_eq!(full.state(), CacheState::CacheHit);
        assert_eq!(full.cached_info(), Some(info));
    }

    #[test]
    fn failed_fetch_is_retried_on_next_call() {
        let cache = InfoCache::<BookInfo>::new(book_id());
        let calls = Cell::new(0);

        let first = cache.fetch_with(|| {
            calls.set(calls.get() + 1);
            Err(InfoError::NotFound(book_id()))
        });
        assert!(first.is_none());
        assert_eq!(cache.state(), CacheState::CacheMiss);
        assert_eq!(
            cache.failure_reason(),
            Some(InfoError::NotFound(book_id()))
        );

        let info = BookInfo::new(&book_id(), "Dune", "Herbert", "desert");
        let second = cache.fetch_with(|| {
            calls.set(calls.get() + 1);
            Ok(info.clone())
        });
        assert_eq!(second, Some(info));
        assert_eq!(calls.get(), 2);
        assert!(cache.failure_reason().is_none());
    }

    #[test]
    fn update_keeps_optimistic_value_when_write_fails() {
        let cache = InfoCache::<BookInfo>::new(book_id());
        let info = BookInfo::new(&book_id(), "Dune", "Herbert", "desert");

        let result = cache.update_with(info.clone(), |_| Err(InfoError::NotFound(book_id())));
        assert!(result.is_err());
        assert_eq!(cache.state(), CacheState::CacheHit);
        assert_eq!(cache.cached_info(), Some(info));
        assert!(cache.failure_reason().is_some());
    }

    #[test]
    fn update_with_foreign_raw_id_never_writes() {
        let info = BookInfo::new(&book_id(), "Dune", "Herbert", "desert");
        let cache = InfoCache::with_info(book_id(), info.clone());
        let foreign = BookInfo::new(&TypedId::deterministic_fake(2, "Role.Book"), "X", "Y", "Z");
        let writes = Cell::new(0);

        let err = cache
            .update_with(foreign, |info| {
                writes.set(writes.get() + 1);
                Ok(info.clone())
            })
            .unwrap_err();
        assert!(matches!(err, InfoError::IdentityMismatch { .. }));
        assert_eq!(writes.get(), 0);
        assert_eq!(cache.cached_info(), Some(info));
    }

    #[test]
    fn to_serialized_is_empty_object_without_cache() {
        let cache = InfoCache::<BookInfo>::new(book_id());
        assert_eq!(cache.to_serialized(), "{}");
        assert_eq!(cache.state(), CacheState::Uninitialized);
    }
}
