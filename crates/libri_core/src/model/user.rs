//! User info records across domain, transfer and storage layers.
//!
//! # Invariants
//! - `accepted_books` holds each book raw id at most once.
//! - Conversions copy the accepted-book list; no layer shares it.

use crate::error::{InfoResult, Layer};
use crate::model::info::{
    adopt_id, deserialize_adopted_id, domain_id, DomainInfo, Info, StorageInfo, TransferInfo,
};
use crate::model::typed_id::{Tagged, TypedId};
use serde::{Deserialize, Serialize};

/// Authoritative user payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    id: TypedId,
    name: String,
    email: String,
    accepted_books: Vec<TypedId>,
}

impl UserInfo {
    pub fn new(id: &TypedId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: domain_id::<Self>(id),
            name: name.into(),
            email: email.into(),
            accepted_books: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn accepted_books(&self) -> &[TypedId] {
        &self.accepted_books
    }

    pub fn has_accepted_book(&self, book_id: &TypedId) -> bool {
        self.accepted_books.iter().any(|id| id.loose_eq(book_id))
    }

    pub fn with_name(self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self
        }
    }

    pub fn with_email(self, email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..self
        }
    }

    /// Adds `book_id` unless a loosely-equal id is already present.
    pub fn with_accepted_book(mut self, book_id: TypedId) -> Self {
        if !self.has_accepted_book(&book_id) {
            self.accepted_books.push(book_id);
        }
        self
    }

    pub fn without_accepted_book(mut self, book_id: &TypedId) -> Self {
        self.accepted_books.retain(|id| !id.loose_eq(book_id));
        self
    }
}

impl Tagged for UserInfo {
    const TYPE_TAG: &'static str = "Model.DomainInfo.UserInfo";
}

impl Info for UserInfo {
    const LAYER: Layer = Layer::Domain;

    fn id(&self) -> &TypedId {
        &self.id
    }
}

impl DomainInfo for UserInfo {
    type Transfer = UserInfoDto;
    type Storage = UserInfoEntity;

    const KIND: &'static str = "user";

    fn to_domain(&self) -> Self {
        Self {
            id: domain_id::<Self>(&self.id),
            ..self.clone()
        }
    }
}

/// Wire shape of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfoDto {
    #[serde(deserialize_with = "deserialize_adopted_id::<UserInfoDto, _>")]
    id: TypedId,
    pub name: String,
    pub email: String,
    pub accepted_books: Vec<TypedId>,
    /// Epoch milliseconds of the last API activity; transfer-only.
    pub last_seen_ms: Option<i64>,
}

impl UserInfoDto {
    /// # Errors
    /// - `LayerViolation` when `id` is tagged as a storage identifier.
    pub fn try_new(
        id: &TypedId,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> InfoResult<Self> {
        Ok(Self {
            id: adopt_id::<Self>(id)?,
            name: name.into(),
            email: email.into(),
            accepted_books: Vec::new(),
            last_seen_ms: None,
        })
    }
}

impl Tagged for UserInfoDto {
    const TYPE_TAG: &'static str = "Model.DTOInfo.UserInfoDto";
}

impl Info for UserInfoDto {
    const LAYER: Layer = Layer::Transfer;

    fn id(&self) -> &TypedId {
        &self.id
    }
}

impl TransferInfo for UserInfoDto {
    type Domain = UserInfo;

    fn from_domain(domain: &UserInfo) -> Self {
        Self {
            id: domain.id.retag_to::<Self>(),
            name: domain.name.clone(),
            email: domain.email.clone(),
            accepted_books: domain.accepted_books.clone(),
            last_seen_ms: None,
        }
    }

    fn to_domain(&self) -> UserInfo {
        UserInfo {
            id: domain_id::<UserInfo>(&self.id),
            name: self.name.clone(),
            email: self.email.clone(),
            accepted_books: self.accepted_books.clone(),
        }
    }
}

/// Persisted shape of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfoEntity {
    #[serde(deserialize_with = "deserialize_adopted_id::<UserInfoEntity, _>")]
    id: TypedId,
    pub name: String,
    pub email: String,
    pub accepted_books: Vec<TypedId>,
    /// Epoch milliseconds of the first insert, stamped by the repository and
    /// kept across replaces; 0 until persisted. Storage-only.
    pub created_at_ms: i64,
}

impl UserInfoEntity {
    /// # Errors
    /// - `LayerViolation` when `id` is tagged as a transfer identifier.
    pub fn try_new(
        id: &TypedId,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> InfoResult<Self> {
        Ok(Self {
            id: adopt_id::<Self>(id)?,
            name: name.into(),
            email: email.into(),
            accepted_books: Vec::new(),
            created_at_ms: 0,
        })
    }
}

impl Tagged for UserInfoEntity {
    const TYPE_TAG: &'static str = "Model.EntityInfo.UserInfoEntity";
}

impl Info for UserInfoEntity {
    const LAYER: Layer = Layer::Storage;

    fn id(&self) -> &TypedId {
        &self.id
    }
}

impl StorageInfo for UserInfoEntity {
    type Domain = UserInfo;

    fn from_domain(domain: &UserInfo) -> Self {
        Self {
            id: domain.id.retag_to::<Self>(),
            name: domain.name.clone(),
            email: domain.email.clone(),
            accepted_books: domain.accepted_books.clone(),
            created_at_ms: 0,
        }
    }

    fn to_domain(&self) -> UserInfo {
        UserInfo {
            id: domain_id::<UserInfo>(&self.id),
            name: self.name.clone(),
            email: self.email.clone(),
            accepted_books: self.accepted_books.clone(),
        }
    }

    fn stamp_write(&mut self, previous: Option<&Self>, now_ms: i64) {
        self.created_at_ms = previous.map_or(now_ms, |row| row.created_at_ms);
    }
}
