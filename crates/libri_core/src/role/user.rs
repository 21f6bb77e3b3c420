//! User role.

use crate::cache::InfoCache;
use crate::context::Context;
use crate::error::InfoResult;
use crate::model::info::Info;
use crate::model::typed_id::{Tagged, TypedId};
use crate::model::user::UserInfo;
use crate::repo::InfoRepository;
use crate::role::account::Account;
use crate::role::Role;
use std::sync::Arc;

/// Domain object owning one `UserInfo` lifecycle.
pub struct User {
    cache: InfoCache<UserInfo>,
    repo: Arc<dyn InfoRepository<UserInfo>>,
}

impl Tagged for User {
    const TYPE_TAG: &'static str = "Role.User";
}

impl User {
    pub fn new(id: &TypedId, context: &Context) -> Self {
        Self {
            cache: InfoCache::new(id.retag_to::<Self>()),
            repo: Arc::clone(context.users()),
        }
    }

    pub fn with_info(info: UserInfo, context: &Context) -> Self {
        Self {
            cache: InfoCache::with_info(info.id().retag_to::<Self>(), info),
            repo: Arc::clone(context.users()),
        }
    }

    pub fn create(info: UserInfo, context: &Context) -> InfoResult<Self> {
        let stored = context.users().add_info(&info)?;
        Ok(Self::with_info(stored, context))
    }

    /// The account sharing this user's raw id.
    ///
    /// The returned role is loosely equal to this user's id and strictly
    /// different from it.
    pub fn account(&self, context: &Context) -> Account {
        Account::new(self.id(), context)
    }

    /// Records `book_id` on the user (copy-on-write, written through).
    pub fn record_accepted_book(&self, book_id: &TypedId) -> InfoResult<UserInfo> {
        let current = self.require_info()?;
        self.update_info(current.with_accepted_book(book_id.clone()))
    }
}

impl Role for User {
    type Info = UserInfo;

    fn info_cache(&self) -> &InfoCache<UserInfo> {
        &self.cache
    }

    fn repository(&self) -> &dyn InfoRepository<UserInfo> {
        self.repo.as_ref()
    }

    fn fetch_info_result(&self) -> InfoResult<UserInfo> {
        self.repo.fetch_info(self.id())
    }
}
