//! Info record contracts and cross-layer conversion rules.
//!
//! # Responsibility
//! - Define the shape every cached payload satisfies.
//! - Tie each domain Info to its transfer and storage representations.
//!
//! # Invariants
//! - Conversions are owned deep copies; nothing mutable is shared.
//! - `raw_id` survives every conversion; only the layer tag changes.
//! - Transfer and storage representations never convert into each other,
//!   whether built in code or decoded from JSON.
//!
//! # See also
//! - `crate::error::ensure_layer_crossing`

use crate::error::{ensure_layer_crossing, InfoResult, Layer};
use crate::model::typed_id::{Tagged, TypedId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Debug;

/// Common contract for every representation of an Info record.
pub trait Info:
    Tagged + Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Representation layer this type belongs to.
    const LAYER: Layer;

    fn id(&self) -> &TypedId;
}

/// Authoritative business payload owned by a role.
pub trait DomainInfo: Info {
    type Transfer: TransferInfo<Domain = Self>;
    type Storage: StorageInfo<Domain = Self>;

    /// Short kind label used by storage backends (`book`, `user`, ...).
    const KIND: &'static str;

    fn to_transfer(&self) -> Self::Transfer {
        Self::Transfer::from_domain(self)
    }

    fn to_storage(&self) -> Self::Storage {
        Self::Storage::from_domain(self)
    }

    /// Deep copy retagged for the domain layer.
    fn to_domain(&self) -> Self;
}

/// Shape used to move an Info across a network boundary.
pub trait TransferInfo: Info {
    type Domain: DomainInfo;

    fn from_domain(domain: &Self::Domain) -> Self;
    fn to_domain(&self) -> Self::Domain;
}

/// Shape used to persist an Info to a backing store.
pub trait StorageInfo: Info {
    type Domain: DomainInfo;

    fn from_domain(domain: &Self::Domain) -> Self;
    fn to_domain(&self) -> Self::Domain;

    /// Fills repository-maintained bookkeeping right before a write.
    ///
    /// `previous` is the stored row being replaced, `None` on insert.
    fn stamp_write(&mut self, previous: Option<&Self>, now_ms: i64);
}

/// Retags `id` for representation `I`, rejecting sibling-layer identifiers.
///
/// Representation constructors call this so a transfer-tagged id can never
/// seed a storage value (and the other way around).
pub fn adopt_id<I: Info>(id: &TypedId) -> InfoResult<TypedId> {
    if let Some(from) = Layer::of_tag(id.type_tag()) {
        ensure_layer_crossing(from, I::LAYER)?;
    }
    Ok(id.retag_to::<I>())
}

/// `deserialize_with` hook for representation `id` fields.
///
/// Decoded ids go through `adopt_id`, so JSON carrying a sibling-layer tag is
/// rejected just like the `try_new` constructors reject it.
pub(crate) fn deserialize_adopted_id<'de, I, D>(deserializer: D) -> Result<TypedId, D::Error>
where
    I: Info,
    D: Deserializer<'de>,
{
    let id = TypedId::deserialize(deserializer)?;
    adopt_id::<I>(&id).map_err(serde::de::Error::custom)
}

/// Retag that cannot fail: domain accepts every layer.
pub(crate) fn domain_id<I: DomainInfo>(id: &TypedId) -> TypedId {
    id.retag_to::<I>()
}
