//! Account info records.
//!
//! An account shares its raw id with the owning user; only the tag tells the
//! two apart.

use crate::error::{InfoResult, Layer};
use crate::model::info::{
    adopt_id, deserialize_adopted_id, domain_id, DomainInfo, Info, StorageInfo, TransferInfo,
};
use crate::model::typed_id::{Tagged, TypedId};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_ACCEPTED_BOOKS: u32 = 5;
pub const DEFAULT_MAX_FINE_CENTS: i64 = 10_000;

/// Account standing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Active,
    Inactive,
    Suspended,
    Closed,
}

/// Authoritative account payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    id: TypedId,
    name: String,
    status: AccountStatus,
    current_fine_cents: i64,
    max_fine_cents: i64,
    max_accepted_books: u32,
}

impl AccountInfo {
    /// Creates an active account with default limits and no fine.
    pub fn new(id: &TypedId, name: impl Into<String>) -> Self {
        Self {
            id: domain_id::<Self>(id),
            name: name.into(),
            status: AccountStatus::Active,
            current_fine_cents: 0,
            max_fine_cents: DEFAULT_MAX_FINE_CENTS,
            max_accepted_books: DEFAULT_MAX_ACCEPTED_BOOKS,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> AccountStatus {
        self.status
    }

    pub fn current_fine_cents(&self) -> i64 {
        self.current_fine_cents
    }

    pub fn max_fine_cents(&self) -> i64 {
        self.max_fine_cents
    }

    pub fn max_accepted_books(&self) -> u32 {
        self.max_accepted_books
    }

    pub fn with_status(self, status: AccountStatus) -> Self {
        Self { status, ..self }
    }

    pub fn with_fine_cents(self, current_fine_cents: i64) -> Self {
        Self {
            current_fine_cents,
            ..self
        }
    }

    pub fn with_limits(self, max_fine_cents: i64, max_accepted_books: u32) -> Self {
        Self {
            max_fine_cents,
            max_accepted_books,
            ..self
        }
    }
}

impl Tagged for AccountInfo {
    const TYPE_TAG: &'static str = "Model.DomainInfo.AccountInfo";
}

impl Info for AccountInfo {
    const LAYER: Layer = Layer::Domain;

    fn id(&self) -> &TypedId {
        &self.id
    }
}

impl DomainInfo for AccountInfo {
    type Transfer = AccountInfoDto;
    type Storage = AccountInfoEntity;

    const KIND: &'static str = "account";

    fn to_domain(&self) -> Self {
        Self {
            id: domain_id::<Self>(&self.id),
            ..self.clone()
        }
    }
}

/// Wire shape of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfoDto {
    #[serde(deserialize_with = "deserialize_adopted_id::<AccountInfoDto, _>")]
    id: TypedId,
    pub name: String,
    pub status: AccountStatus,
    pub current_fine_cents: i64,
    pub max_fine_cents: i64,
    pub max_accepted_books: u32,
}

impl AccountInfoDto {
    /// # Errors
    /// - `LayerViolation` when `id` is tagged as a storage identifier.
    pub fn try_new(id: &TypedId, name: impl Into<String>) -> InfoResult<Self> {
        Ok(Self {
            id: adopt_id::<Self>(id)?,
            name: name.into(),
            status: AccountStatus::Active,
            current_fine_cents: 0,
            max_fine_cents: DEFAULT_MAX_FINE_CENTS,
            max_accepted_books: DEFAULT_MAX_ACCEPTED_BOOKS,
        })
    }
}

impl Tagged for AccountInfoDto {
    const TYPE_TAG: &'static str = "Model.DTOInfo.AccountInfoDto";
}

impl Info for AccountInfoDto {
    const LAYER: Layer = Layer::Transfer;

    fn id(&self) -> &TypedId {
        &self.id
    }
}

impl TransferInfo for AccountInfoDto {
    type Domain = AccountInfo;

    fn from_domain(domain: &AccountInfo) -> Self {
        Self {
            id: domain.id.retag_to::<Self>(),
            name: domain.name.clone(),
            status: domain.status,
            current_fine_cents: domain.current_fine_cents,
            max_fine_cents: domain.max_fine_cents,
            max_accepted_books: domain.max_accepted_books,
        }
    }

    fn to_domain(&self) -> AccountInfo {
        AccountInfo {
            id: domain_id::<AccountInfo>(&self.id),
            name: self.name.clone(),
            status: self.status,
            current_fine_cents: self.current_fine_cents,
            max_fine_cents: self.max_fine_cents,
            max_accepted_books: self.max_accepted_books,
        }
    }
}

/// Persisted shape of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfoEntity {
    #[serde(deserialize_with = "deserialize_adopted_id::<AccountInfoEntity, _>")]
    id: TypedId,
    pub name: String,
    pub status: AccountStatus,
    pub current_fine_cents: i64,
    pub max_fine_cents: i64,
    pub max_accepted_books: u32,
    /// Revision counter kept by the repository: 0 until first written,
    /// 1 after insert, +1 on every replace.
    pub row_version: i64,
}

impl AccountInfoEntity {
    /// # Errors
    /// - `LayerViolation` when `id` is tagged as a transfer identifier.
    pub fn try_new(id: &TypedId, name: impl Into<String>) -> InfoResult<Self> {
        Ok(Self {
            id: adopt_id::<Self>(id)?,
            name: name.into(),
            status: AccountStatus::Active,
            current_fine_cents: 0,
            max_fine_cents: DEFAULT_MAX_FINE_CENTS,
            max_accepted_books: DEFAULT_MAX_ACCEPTED_BOOKS,
            row_version: 0,
        })
    }
}

impl Tagged for AccountInfoEntity {
    const TYPE_TAG: &'static str = "Model.EntityInfo.AccountInfoEntity";
}

impl Info for AccountInfoEntity {
    const LAYER: Layer = Layer::Storage;

    fn id(&self) -> &TypedId {
        &self.id
    }
}

impl StorageInfo for AccountInfoEntity {
    type Domain = AccountInfo;

    fn from_domain(domain: &AccountInfo) -> Self {
        Self {
            id: domain.id.retag_to::<Self>(),
            name: domain.name.clone(),
            status: domain.status,
            current_fine_cents: domain.current_fine_cents,
            max_fine_cents: domain.max_fine_cents,
            max_accepted_books: domain.max_accepted_books,
            row_version: 0,
        }
    }

    fn to_domain(&self) -> AccountInfo {
        AccountInfo {
            id: domain_id::<AccountInfo>(&self.id),
            name: self.name.clone(),
            status: self.status,
            current_fine_cents: self.current_fine_cents,
            max_fine_cents: self.max_fine_cents,
            max_accepted_books: self.max_accepted_books,
        }
    }

    fn stamp_write(&mut self, previous: Option<&Self>, _now_ms: i64) {
        self.row_version = previous.map_or(1, |row| row.row_version + 1);
    }
}
