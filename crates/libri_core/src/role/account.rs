//! Account role.

use crate::cache::InfoCache;
use crate::context::Context;
use crate::error::InfoResult;
use crate::model::account::{AccountInfo, AccountStatus};
use crate::model::info::Info;
use crate::model::typed_id::{Tagged, TypedId};
use crate::repo::InfoRepository;
use crate::role::Role;
use log::debug;
use std::sync::Arc;

/// Domain object owning one `AccountInfo` lifecycle.
pub struct Account {
    cache: InfoCache<AccountInfo>,
    repo: Arc<dyn InfoRepository<AccountInfo>>,
}

impl Tagged for Account {
    const TYPE_TAG: &'static str = "Role.Account";
}

impl Account {
    pub fn new(id: &TypedId, context: &Context) -> Self {
        Self {
            cache: InfoCache::new(id.retag_to::<Self>()),
            repo: Arc::clone(context.accounts()),
        }
    }

    pub fn with_info(info: AccountInfo, context: &Context) -> Self {
        Self {
            cache: InfoCache::with_info(info.id().retag_to::<Self>(), info),
            repo: Arc::clone(context.accounts()),
        }
    }

    pub fn create(info: AccountInfo, context: &Context) -> InfoResult<Self> {
        let stored = context.accounts().add_info(&info)?;
        Ok(Self::with_info(stored, context))
    }

    pub fn set_status(&self, status: AccountStatus) -> InfoResult<AccountInfo> {
        let current = self.require_info()?;
        debug!(
            "event=account_status module=role status=ok id={} from={:?} to={:?}",
            self.id(),
            current.status(),
            status
        );
        self.update_info(current.with_status(status))
    }
}

impl Role for Account {
    type Info = AccountInfo;

    fn info_cache(&self) -> &InfoCache<AccountInfo> {
        &self.cache
    }

    fn repository(&self) -> &dyn InfoRepository<AccountInfo> {
        self.repo.as_ref()
    }

    fn fetch_info_result(&self) -> InfoResult<AccountInfo> {
        self.repo.fetch_info(self.id())
    }
}
