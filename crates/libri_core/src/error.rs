//! Core error taxonomy shared by identifiers, repositories and the cache engine.
//!
//! # Responsibility
//! - Provide one semantic error type for every fallible core operation.
//! - Keep repository failures transparent when they pass through the engine.
//!
//! # Invariants
//! - Errors are plain values; no core path panics on bad upstream input.
//! - `InfoError` is `Clone` so the engine can keep the last failure around.

use crate::db::DbError;
use crate::model::typed_id::TypedId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type InfoResult<T> = Result<T, InfoError>;

/// Representation layer an Info value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Domain,
    Transfer,
    Storage,
}

impl Layer {
    /// Middle segment used in type tags for this layer.
    pub fn label(self) -> &'static str {
        match self {
            Self::Domain => "DomainInfo",
            Self::Transfer => "DTOInfo",
            Self::Storage => "EntityInfo",
        }
    }

    /// Recovers the layer from a type tag, if the tag carries a layer label.
    pub fn of_tag(tag: &str) -> Option<Self> {
        tag.split('.').find_map(|segment| match segment {
            "DomainInfo" => Some(Self::Domain),
            "DTOInfo" => Some(Self::Transfer),
            "EntityInfo" => Some(Self::Storage),
            _ => None,
        })
    }
}

impl Display for Layer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Semantic failure for identifier, repository and cache operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InfoError {
    NotFound(TypedId),
    AlreadyExists(TypedId),
    MalformedIdentifier(String),
    IdentityMismatch { expected: TypedId, actual: TypedId },
    Deserialization(String),
    LayerViolation { from: Layer, to: Layer },
    Storage(String),
}

impl Display for InfoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "info not found: {id}"),
            Self::AlreadyExists(id) => write!(f, "info already exists: {id}"),
            Self::MalformedIdentifier(text) => write!(f, "malformed identifier `{text}`"),
            Self::IdentityMismatch { expected, actual } => write!(
                f,
                "identity mismatch: expected raw id of {expected}, got {actual}"
            ),
            Self::Deserialization(message) => write!(f, "failed to deserialize info: {message}"),
            Self::LayerViolation { from, to } => {
                write!(f, "cannot construct {to} representation from {from}")
            }
            Self::Storage(message) => write!(f, "storage failure: {message}"),
        }
    }
}

impl Error for InfoError {}

impl From<DbError> for InfoError {
    fn from(value: DbError) -> Self {
        Self::Storage(value.to_string())
    }
}

impl From<rusqlite::Error> for InfoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Storage(value.to_string())
    }
}

impl From<serde_json::Error> for InfoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Deserialization(value.to_string())
    }
}

/// Rejects conversions between the two sibling representations.
///
/// Domain ⇄ transfer and domain ⇄ storage are allowed; transfer ⇄ storage is
/// never allowed, in either direction.
pub fn ensure_layer_crossing(from: Layer, to: Layer) -> InfoResult<()> {
    match (from, to) {
        (Layer::Transfer, Layer::Storage) | (Layer::Storage, Layer::Transfer) => {
            Err(InfoError::LayerViolation { from, to })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::{ensure_layer_crossing, InfoError, Layer};

    #[test]
    fn layer_recovered_from_tag_segments() {
        assert_eq!(
            Layer::of_tag("Model.DTOInfo.BookInfoDto"),
            Some(Layer::Transfer)
        );
        assert_eq!(Layer::of_tag("Role.Book"), None);
        assert_eq!(Layer::of_tag("model.dtoinfo.x"), None);
    }

    #[test]
    fn sibling_layers_are_rejected_both_ways() {
        assert!(ensure_layer_crossing(Layer::Domain, Layer::Storage).is_ok());
        assert!(ensure_layer_crossing(Layer::Transfer, Layer::Domain).is_ok());
        assert_eq!(
            ensure_layer_crossing(Layer::Transfer, Layer::Storage).unwrap_err(),
            InfoError::LayerViolation {
                from: Layer::Transfer,
                to: Layer::Storage
            }
        );
        assert!(ensure_layer_crossing(Layer::Storage, Layer::Transfer).is_err());
    }
}
