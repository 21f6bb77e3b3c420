//! Explicit dependency bundle handed to every role.
//!
//! # Responsibility
//! - Build the per-Info repositories once at startup.
//! - Hand out shared repository handles to roles.
//!
//! # Invariants
//! - There is no process-wide instance; callers own and pass the context.
//! - SQLite-backed contexts share one connection across repositories.

use crate::db::{open_db, open_db_in_memory};
use crate::error::InfoResult;
use crate::model::account::AccountInfo;
use crate::model::book::BookInfo;
use crate::model::user::UserInfo;
use crate::repo::memory_repo::MemoryInfoRepository;
use crate::repo::sqlite_repo::SqliteInfoRepository;
use crate::repo::InfoRepository;
use log::info;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;

/// Storage backend selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Backend {
    /// Simulated database held in process memory.
    #[default]
    InMemory,
    /// SQLite file at the given path, created and migrated on open.
    Sqlite(PathBuf),
    /// Private in-memory SQLite database.
    SqliteInMemory,
}

impl Backend {
    fn label(&self) -> &'static str {
        match self {
            Self::InMemory => "memory",
            Self::Sqlite(_) => "sqlite_file",
            Self::SqliteInMemory => "sqlite_memory",
        }
    }
}

/// Startup configuration for a `Context`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextConfig {
    pub backend: Backend,
}

/// Repositories shared by every role.
#[derive(Clone)]
pub struct Context {
    books: Arc<dyn InfoRepository<BookInfo>>,
    users: Arc<dyn InfoRepository<UserInfo>>,
    accounts: Arc<dyn InfoRepository<AccountInfo>>,
}

impl Context {
    pub fn new(
        books: Arc<dyn InfoRepository<BookInfo>>,
        users: Arc<dyn InfoRepository<UserInfo>>,
        accounts: Arc<dyn InfoRepository<AccountInfo>>,
    ) -> Self {
        Self {
            books,
            users,
            accounts,
        }
    }

    /// Context over fresh simulated in-memory repositories.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryInfoRepository::<BookInfo>::new()),
            Arc::new(MemoryInfoRepository::<UserInfo>::new()),
            Arc::new(MemoryInfoRepository::<AccountInfo>::new()),
        )
    }

    /// Builds a context for the configured backend.
    ///
    /// # Errors
    /// - `Storage` when a SQLite database cannot be opened or migrated.
    pub fn open(config: &ContextConfig) -> InfoResult<Self> {
        let context = match &config.backend {
            Backend::InMemory => Self::in_memory(),
            Backend::Sqlite(path) => Self::sqlite(open_db(path)?),
            Backend::SqliteInMemory => Self::sqlite(open_db_in_memory()?),
        };
        info!(
            "event=context_open module=context status=ok backend={}",
            config.backend.label()
        );
        Ok(context)
    }

    fn sqlite(conn: rusqlite::Connection) -> Self {
        let shared = Arc::new(Mutex::new(conn));
        Self::new(
            Arc::new(SqliteInfoRepository::<BookInfo>::new(Arc::clone(&shared))),
            Arc::new(SqliteInfoRepository::<UserInfo>::new(Arc::clone(&shared))),
            Arc::new(SqliteInfoRepository::<AccountInfo>::new(shared)),
        )
    }

    pub fn books(&self) -> &Arc<dyn InfoRepository<BookInfo>> {
        &self.books
    }

    pub fn users(&self) -> &Arc<dyn InfoRepository<UserInfo>> {
        &self.users
    }

    pub fn accounts(&self) -> &Arc<dyn InfoRepository<AccountInfo>> {
        &self.accounts
    }
}
