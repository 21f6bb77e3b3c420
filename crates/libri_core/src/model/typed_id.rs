//! Type-tagged identifier (`UUID2`).
//!
//! # Responsibility
//! - Pair a raw UUID with a human-readable type tag.
//! - Provide strict (raw id + tag) and loose (raw id only) comparison.
//! - Provide the canonical `UUID2:<type_tag>@<raw_id>` text form.
//!
//! # Invariants
//! - `PartialEq`, `Eq` and `Hash` only look at `raw_id`, so identifiers that
//!   differ only by tag collide in hashed collections.
//! - Tags are compared case-sensitively, no wildcards.
//! - `TypedId::parse(&id.to_string())` is strictly equal to `id`.

use crate::error::{InfoError, InfoResult};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use uuid::Uuid;

/// Tag used when no type information is supplied.
pub const UNTYPED_TAG: &str = "UUID";

const TEXT_PREFIX: &str = "UUID2:";
const TAG_SEGMENTS: usize = 3;

/// Compile-time type tag association.
///
/// Implementors return the literal tag their identifiers carry, written as the
/// last three segments of the type's ancestry (`Model.DomainInfo.BookInfo`).
pub trait Tagged {
    const TYPE_TAG: &'static str;
}

/// Identifier made of a raw UUID and a type tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypedId {
    raw_id: Uuid,
    type_tag: String,
}

impl TypedId {
    /// Creates an identifier, deriving the tag from an optional type path.
    ///
    /// `None` yields the `"UUID"` sentinel tag.
    pub fn new(raw_id: Uuid, type_path: Option<&str>) -> Self {
        let type_tag = type_path.map_or_else(|| UNTYPED_TAG.to_string(), derive_type_tag);
        Self { raw_id, type_tag }
    }

    /// Creates an identifier with an explicit tag, used by import paths.
    pub fn with_tag(raw_id: Uuid, type_tag: impl Into<String>) -> Self {
        Self {
            raw_id,
            type_tag: type_tag.into(),
        }
    }

    /// Creates an identifier tagged with `T`'s constant tag.
    pub fn of<T: Tagged>(raw_id: Uuid) -> Self {
        Self::with_tag(raw_id, T::TYPE_TAG)
    }

    /// Creates a random (v4) identifier tagged for `T`.
    pub fn random<T: Tagged>() -> Self {
        Self::of::<T>(Uuid::new_v4())
    }

    /// Creates a reproducible identifier for fixtures.
    ///
    /// `n` is written as zero-padded decimal into the last UUID group, so
    /// `deterministic_fake(12, ..)` reads `00000000-0000-0000-0000-000000000012`.
    pub fn deterministic_fake(n: u32, type_tag: &str) -> Self {
        Self::with_tag(Uuid::from_u128(decimal_as_nibbles(n)), type_tag)
    }

    pub fn raw_id(&self) -> Uuid {
        self.raw_id
    }

    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    /// Same raw id, new tag.
    pub fn retag(&self, type_tag: impl Into<String>) -> Self {
        Self::with_tag(self.raw_id, type_tag)
    }

    /// Same raw id, tagged for `T`.
    pub fn retag_to<T: Tagged>(&self) -> Self {
        self.retag(T::TYPE_TAG)
    }

    /// Raw id and tag both match.
    pub fn strict_eq(&self, other: &Self) -> bool {
        self.raw_id == other.raw_id && self.type_tag == other.type_tag
    }

    /// Raw id matches, tag ignored.
    pub fn loose_eq(&self, other: &Self) -> bool {
        self.raw_id == other.raw_id
    }

    /// Parses the `UUID2:<type_tag>@<raw_id>` text form.
    ///
    /// # Errors
    /// - `MalformedIdentifier` when the prefix or `@` separator is missing, or
    ///   the raw id is not a UUID.
    pub fn parse(text: &str) -> InfoResult<Self> {
        let malformed = || InfoError::MalformedIdentifier(text.to_string());
        let body = text.strip_prefix(TEXT_PREFIX).ok_or_else(malformed)?;
        let (type_tag, raw) = body.rsplit_once('@').ok_or_else(malformed)?;
        let raw_id = Uuid::parse_str(raw).map_err(|_| malformed())?;
        Ok(Self::with_tag(raw_id, type_tag))
    }
}

impl PartialEq for TypedId {
    fn eq(&self, other: &Self) -> bool {
        self.loose_eq(other)
    }
}

impl Eq for TypedId {}

impl Hash for TypedId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw_id.hash(state);
    }
}

impl Display for TypedId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{TEXT_PREFIX}{}@{}", self.type_tag, self.raw_id)
    }
}

impl FromStr for TypedId {
    type Err = InfoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Derives a type tag from a type path.
///
/// Host-specific nesting separators (`::`, `$`, `/`) are normalized to `.`,
/// then the last three segments are kept.
pub fn derive_type_tag(type_path: &str) -> String {
    let normalized = type_path.replace("::", ".").replace(['$', '/'], ".");
    let segments: Vec<&str> = normalized
        .split('.')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect();
    if segments.is_empty() {
        return UNTYPED_TAG.to_string();
    }

    let start = segments.len().saturating_sub(TAG_SEGMENTS);
    segments[start..].join(".")
}

fn decimal_as_nibbles(mut n: u32) -> u128 {
    let mut value = 0u128;
    let mut shift = 0;
    while n > 0 {
        value |= u128::from(n % 10) << shift;
        n /= 10;
        shift += 4;
    }
    value
}
