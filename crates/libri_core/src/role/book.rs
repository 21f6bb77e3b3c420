//! Book role.

use crate::cache::InfoCache;
use crate::context::Context;
use crate::error::InfoResult;
use crate::model::book::BookInfo;
use crate::model::info::Info;
use crate::model::typed_id::{Tagged, TypedId};
use crate::repo::InfoRepository;
use crate::role::Role;
use std::sync::Arc;

/// Domain object owning one `BookInfo` lifecycle.
pub struct Book {
    cache: InfoCache<BookInfo>,
    repo: Arc<dyn InfoRepository<BookInfo>>,
}

impl Tagged for Book {
    const TYPE_TAG: &'static str = "Role.Book";
}

impl Book {
    /// Id-only construction; the first read fetches from the repository.
    pub fn new(id: &TypedId, context: &Context) -> Self {
        Self {
            cache: InfoCache::new(id.retag_to::<Self>()),
            repo: Arc::clone(context.books()),
        }
    }

    /// Construction from a full Info; starts with a warm cache.
    pub fn with_info(info: BookInfo, context: &Context) -> Self {
        Self {
            cache: InfoCache::with_info(info.id().retag_to::<Self>(), info),
            repo: Arc::clone(context.books()),
        }
    }

    /// Adds `info` to the repository and returns a role over it.
    pub fn create(info: BookInfo, context: &Context) -> InfoResult<Self> {
        let stored = context.books().add_info(&info)?;
        Ok(Self::with_info(stored, context))
    }

    /// Copy-on-write title change written through the repository.
    pub fn rename(&self, title: &str) -> InfoResult<BookInfo> {
        let current = self.require_info()?;
        self.update_info(current.with_title(title))
    }
}

impl Role for Book {
    type Info = BookInfo;

    fn info_cache(&self) -> &InfoCache<BookInfo> {
        &self.cache
    }

    fn repository(&self) -> &dyn InfoRepository<BookInfo> {
        self.repo.as_ref()
    }

    fn fetch_info_result(&self) -> InfoResult<BookInfo> {
        self.repo.fetch_info(self.id())
    }
}
