//! Book info records across domain, transfer and storage layers.
//!
//! # Invariants
//! - All three shapes share the same raw id.
//! - `etag` exists only on the transfer shape and `row_version` only on the
//!   storage shape; neither leaks into the domain record.

use crate::error::{InfoResult, Layer};
use crate::model::info::{
    adopt_id, deserialize_adopted_id, domain_id, DomainInfo, Info, StorageInfo, TransferInfo,
};
use crate::model::typed_id::{Tagged, TypedId};
use serde::{Deserialize, Serialize};

/// Authoritative book payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookInfo {
    id: TypedId,
    title: String,
    author: String,
    description: String,
}

impl BookInfo {
    pub fn new(
        id: &TypedId,
        title: impl Into<String>,
        author: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: domain_id::<Self>(id),
            title: title.into(),
            author: author.into(),
            description: description.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn with_title(self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..self
        }
    }

    pub fn with_author(self, author: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            ..self
        }
    }

    pub fn with_description(self, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..self
        }
    }
}

impl Tagged for BookInfo {
    const TYPE_TAG: &'static str = "Model.DomainInfo.BookInfo";
}

impl Info for BookInfo {
    const LAYER: Layer = Layer::Domain;

    fn id(&self) -> &TypedId {
        &self.id
    }
}

impl DomainInfo for BookInfo {
    type Transfer = BookInfoDto;
    type Storage = BookInfoEntity;

    const KIND: &'static str = "book";

    fn to_domain(&self) -> Self {
        Self {
            id: domain_id::<Self>(&self.id),
            ..self.clone()
        }
    }
}

/// Wire shape of a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookInfoDto {
    #[serde(deserialize_with = "deserialize_adopted_id::<BookInfoDto, _>")]
    id: TypedId,
    pub title: String,
    pub author: String,
    pub description: String,
    /// Cache validator handed out by the remote API.
    pub etag: Option<String>,
}

impl BookInfoDto {
    /// # Errors
    /// - `LayerViolation` when `id` is tagged as a storage identifier.
    pub fn try_new(
        id: &TypedId,
        title: impl Into<String>,
        author: impl Into<String>,
        description: impl Into<String>,
    ) -> InfoResult<Self> {
        Ok(Self {
            id: adopt_id::<Self>(id)?,
            title: title.into(),
            author: author.into(),
            description: description.into(),
            etag: None,
        })
    }
}

impl Tagged for BookInfoDto {
    const TYPE_TAG: &'static str = "Model.DTOInfo.BookInfoDto";
}

impl Info for BookInfoDto {
    const LAYER: Layer = Layer::Transfer;

    fn id(&self) -> &TypedId {
        &self.id
    }
}

impl TransferInfo for BookInfoDto {
    type Domain = BookInfo;

    fn from_domain(domain: &BookInfo) -> Self {
        Self {
            id: domain.id.retag_to::<Self>(),
            title: domain.title.clone(),
            author: domain.author.clone(),
            description: domain.description.clone(),
            etag: None,
        }
    }

    fn to_domain(&self) -> BookInfo {
        BookInfo::new(&self.id, &self.title, &self.author, &self.description)
    }
}

/// Persisted shape of a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookInfoEntity {
    #[serde(deserialize_with = "deserialize_adopted_id::<BookInfoEntity, _>")]
    id: TypedId,
    pub title: String,
    pub author: String,
    pub description: String,
    /// Revision counter kept by the repository: 0 until first written,
    /// 1 after insert, +1 on every replace.
    pub row_version: i64,
}

impl BookInfoEntity {
    /// # Errors
    /// - `LayerViolation` when `id` is tagged as a transfer identifier.
    pub fn try_new(
        id: &TypedId,
        title: impl Into<String>,
        author: impl Into<String>,
        description: impl Into<String>,
    ) -> InfoResult<Self> {
        Ok(Self {
            id: adopt_id::<Self>(id)?,
            title: title.into(),
            author: author.into(),
            description: description.into(),
            row_version: 0,
        })
    }
}

impl Tagged for BookInfoEntity {
    const TYPE_TAG: &'static str = "Model.EntityInfo.BookInfoEntity";
}

impl Info for BookInfoEntity {
    const LAYER: Layer = Layer::Storage;

    fn id(&self) -> &TypedId {
        &self.id
    }
}

impl StorageInfo for BookInfoEntity {
    type Domain = BookInfo;

    fn from_domain(domain: &BookInfo) -> Self {
        Self {
            id: domain.id.retag_to::<Self>(),
            title: domain.title.clone(),
            author: domain.author.clone(),
            description: domain.description.clone(),
            row_version: 0,
        }
    }

    fn to_domain(&self) -> BookInfo {
        BookInfo::new(&self.id, &self.title, &self.author, &self.description)
    }

    fn stamp_write(&mut self, previous: Option<&Self>, _now_ms: i64) {
        self.row_version = previous.map_or(1, |row| row.row_version + 1);
    }
}
