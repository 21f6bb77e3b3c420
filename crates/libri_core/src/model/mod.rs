//! Identity and Info record model.
//!
//! # Responsibility
//! - Define the type-tagged identifier and the store indexed by it.
//! - Define Info records and their transfer/storage representations.
//!
//! # Invariants
//! - Every Info carries a `TypedId`; its raw id never changes across layers.
//! - Info records are copy-on-write: builders consume and return `Self`.

pub mod account;
pub mod book;
pub mod id_store;
pub mod info;
pub mod typed_id;
pub mod user;
