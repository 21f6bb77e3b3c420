//! Domain roles and the engine port they share.
//!
//! # Responsibility
//! - Expose the cache-sync operations every role gets for free.
//! - Leave the repository round-trip (`fetch_info_result`) to each role.
//!
//! # Invariants
//! - A role owns exactly one Info lifecycle through its `InfoCache`.
//! - Role ids carry the role tag (`Role.Book`); cached Info carries the
//!   domain-layer tag. Both share one raw id.

pub mod account;
pub mod book;
pub mod user;

use crate::cache::InfoCache;
use crate::error::{InfoError, InfoResult};
use crate::model::info::DomainInfo;
use crate::model::typed_id::TypedId;
use crate::repo::InfoRepository;

/// Engine port implemented by every domain object.
pub trait Role: Send + Sync {
    type Info: DomainInfo;

    fn info_cache(&self) -> &InfoCache<Self::Info>;

    fn repository(&self) -> &dyn InfoRepository<Self::Info>;

    /// Round-trips to the backing repository for this role's Info.
    fn fetch_info_result(&self) -> InfoResult<Self::Info>;

    /// Repository write issued by `update_info`.
    fn update_info_result(&self, info: &Self::Info) -> InfoResult<Self::Info> {
        self.repository().update_info(info)
    }

    fn id(&self) -> &TypedId {
        self.info_cache().id()
    }

    /// Cached Info, fetching once on first access.
    ///
    /// Returns `None` on failure; see `fetch_info_failure_reason`.
    fn fetch_info(&self) -> Option<Self::Info> {
        self.info_cache().fetch_with(|| self.fetch_info_result())
    }

    /// `fetch_info` that surfaces the failure instead of swallowing it.
    fn require_info(&self) -> InfoResult<Self::Info> {
        self.fetch_info().ok_or_else(|| {
            self.fetch_info_failure_reason()
                .unwrap_or_else(|| InfoError::NotFound(self.id().clone()))
        })
    }

    fn is_info_fetched(&self) -> bool {
        self.info_cache().is_fetched()
    }

    /// Caches `info` immediately, then writes it through the repository.
    ///
    /// # Errors
    /// - `IdentityMismatch` when `info` belongs to another raw id.
    /// - Whatever the repository write returns; the cache is not rolled back.
    fn update_info(&self, info: Self::Info) -> InfoResult<Self::Info> {
        self.info_cache()
            .update_with(info, |info| self.update_info_result(info))
    }

    /// Drops the cache and fetches again.
    fn refresh_info(&self) -> InfoResult<Self::Info> {
        self.info_cache().refresh_with(|| self.fetch_info_result())
    }

    fn fetch_info_failure_reason(&self) -> Option<InfoError> {
        self.info_cache().failure_reason()
    }

    /// JSON of the cached Info, or `"{}"` when nothing is cached.
    fn to_serialized(&self) -> String {
        self.info_cache().to_serialized()
    }

    /// Imports serialized Info after checking it belongs to this role.
    ///
    /// # Errors
    /// - `Deserialization`, `IdentityMismatch`, or whatever the repository
    ///   write returns.
    fn update_info_from_serialized(&self, text: &str) -> InfoResult<Self::Info> {
        let info = self.info_cache().decode_serialized(text)?;
        self.update_info(info)
    }
}
