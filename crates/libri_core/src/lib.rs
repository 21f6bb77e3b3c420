//! Core of the Libri lending demo.
//! Typed identifiers, Info records, the cache-sync engine and its repositories.

pub mod cache;
pub mod context;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod repo;
pub mod role;

pub use cache::{CacheState, InfoCache};
pub use context::{Backend, Context, ContextConfig};
pub use error::{InfoError, InfoResult, Layer};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::account::{AccountInfo, AccountInfoDto, AccountInfoEntity, AccountStatus};
pub use model::book::{BookInfo, BookInfoDto, BookInfoEntity};
pub use model::id_store::IdStore;
pub use model::info::{DomainInfo, Info, StorageInfo, TransferInfo};
pub use model::typed_id::{Tagged, TypedId};
pub use model::user::{UserInfo, UserInfoDto, UserInfoEntity};
pub use repo::memory_repo::MemoryInfoRepository;
pub use repo::sqlite_repo::SqliteInfoRepository;
pub use repo::InfoRepository;
pub use role::account::Account;
pub use role::book::Book;
pub use role::user::User;
pub use role::Role;

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
