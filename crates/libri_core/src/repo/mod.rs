//! Repository port and backend adapters.
//!
//! # Responsibility
//! - Define the narrow CRUD port every role reaches storage through.
//! - Provide an in-memory simulated backend and a SQLite backend.
//!
//! # Invariants
//! - Lookups resolve by raw id; the tag on the incoming id is ignored.
//! - `add_info` fails with `AlreadyExists`, `update_info`/`delete_info` fail
//!   with `NotFound`; `upsert_info` never fails on presence.
//! - Backends persist the storage representation, never the domain one.
//! - Every write runs `StorageInfo::stamp_write` against the replaced row.

pub mod memory_repo;
pub mod sqlite_repo;

use crate::error::InfoResult;
use crate::model::info::DomainInfo;
use crate::model::typed_id::TypedId;
use std::time::{SystemTime, UNIX_EPOCH};

/// CRUD port for one domain Info type.
///
/// Calls are blocking; no transactions, batching or retries.
pub trait InfoRepository<I: DomainInfo>: Send + Sync {
    fn fetch_info(&self, id: &TypedId) -> InfoResult<I>;
    fn add_info(&self, info: &I) -> InfoResult<I>;
    fn update_info(&self, info: &I) -> InfoResult<I>;
    fn upsert_info(&self, info: &I) -> InfoResult<I>;
    fn delete_info(&self, id: &TypedId) -> InfoResult<()>;
    /// Every stored Info, ordered by raw id.
    fn list_infos(&self) -> InfoResult<Vec<I>>;
}

/// Epoch milliseconds handed to `StorageInfo::stamp_write`.
pub(crate) fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}
