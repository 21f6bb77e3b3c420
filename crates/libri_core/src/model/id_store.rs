//! Identifier-keyed store.
//!
//! # Responsibility
//! - Map `TypedId` keys to payloads while indexing by raw id only.
//! - Rebuild full identifiers (tag included) on iteration.
//! - Provide the JSON form used by simulated backends and fixtures.
//!
//! # Invariants
//! - Two identifiers with the same raw id and different tags address the
//!   same slot. The tag kept for a slot is the one from the latest `put`.
//! - No eviction or capacity bound.
//! - Not internally synchronized; owners wrap it in a lock when shared.

use crate::error::{InfoError, InfoResult};
use crate::model::typed_id::TypedId;
use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Number, Value};
use std::collections::HashMap;
use uuid::Uuid;

/// Map keyed by `TypedId`, resolved by raw id.
#[derive(Debug, Clone, PartialEq)]
pub struct IdStore<T> {
    slots: HashMap<Uuid, (String, T)>,
}

impl<T> Default for IdStore<T> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }
}

impl<T> IdStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, id: &TypedId) -> Option<&T> {
        self.slots.get(&id.raw_id()).map(|(_, value)| value)
    }

    pub fn get_mut(&mut self, id: &TypedId) -> Option<&mut T> {
        self.slots.get_mut(&id.raw_id()).map(|(_, value)| value)
    }

    /// Inserts or replaces the slot for `id`'s raw id.
    ///
    /// Returns the previous payload, if any. The slot adopts `id`'s tag.
    pub fn put(&mut self, id: TypedId, value: T) -> Option<T> {
        let raw_id = id.raw_id();
        let tag = id.type_tag().to_string();
        self.slots
            .insert(raw_id, (tag, value))
            .map(|(_, previous)| previous)
    }

    pub fn remove(&mut self, id: &TypedId) -> Option<T> {
        self.slots.remove(&id.raw_id()).map(|(_, value)| value)
    }

    pub fn contains(&self, id: &TypedId) -> bool {
        self.slots.contains_key(&id.raw_id())
    }

    /// Identifier stored for the slot that `id` resolves to.
    pub fn stored_id(&self, id: &TypedId) -> Option<TypedId> {
        self.slots
            .get(&id.raw_id())
            .map(|(tag, _)| TypedId::with_tag(id.raw_id(), tag.as_str()))
    }

    pub fn keys(&self) -> Vec<TypedId> {
        self.slots
            .iter()
            .map(|(raw_id, (tag, _))| TypedId::with_tag(*raw_id, tag.as_str()))
            .collect()
    }

    pub fn values(&self) -> Vec<&T> {
        self.slots.values().map(|(_, value)| value).collect()
    }

    pub fn entries(&self) -> Vec<(TypedId, &T)> {
        self.slots
            .iter()
            .map(|(raw_id, (tag, value))| (TypedId::with_tag(*raw_id, tag.as_str()), value))
            .collect()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

impl<T: Clone> IdStore<T> {
    /// Copies every entry of `other`, keeping the tags `other` stored.
    pub fn put_all(&mut self, other: &IdStore<T>) {
        for (raw_id, (tag, value)) in &other.slots {
            self.slots.insert(*raw_id, (tag.clone(), value.clone()));
        }
    }
}

impl<T: Serialize> IdStore<T> {
    /// Serializes as a JSON object keyed by `UUID2:` identifier text.
    pub fn to_json(&self) -> InfoResult<String> {
        serde_json::to_string(self).map_err(|err| InfoError::Deserialization(err.to_string()))
    }
}

impl<T: DeserializeOwned> IdStore<T> {
    /// Parses the JSON object form produced by `to_json`.
    ///
    /// Integral numbers are normalized to `i64` before payload decoding so
    /// every payload sees one numeric width regardless of how the producer
    /// wrote them (`3.0` and `3` decode identically).
    ///
    /// # Errors
    /// - `Deserialization` when the text is not a JSON object or a payload
    ///   does not decode.
    /// - `MalformedIdentifier` when a key is not identifier text.
    pub fn from_json(text: &str) -> InfoResult<Self> {
        let root: Value = serde_json::from_str(text)?;
        let Value::Object(map) = root else {
            return Err(InfoError::Deserialization(
                "identifier store must be a JSON object".to_string(),
            ));
        };

        let mut store = Self::new();
        for (key, mut value) in map {
            let id = TypedId::parse(&key)?;
            normalize_numbers(&mut value);
            let payload = serde_json::from_value::<T>(value)?;
            store.put(id, payload);
        }
        Ok(store)
    }
}

impl<T: Serialize> Serialize for IdStore<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.slots.len()))?;
        for (raw_id, (tag, value)) in &self.slots {
            map.serialize_entry(&TypedId::with_tag(*raw_id, tag.as_str()).to_string(), value)?;
        }
        map.end()
    }
}

/// Rewrites integral floats as `i64` in place, recursively.
pub fn normalize_numbers(value: &mut Value) {
    match value {
        Value::Number(number) => {
            if let Some(normalized) = integral_number(number) {
                *number = normalized;
            }
        }
        Value::Array(items) => items.iter_mut().for_each(normalize_numbers),
        Value::Object(map) => map.values_mut().for_each(normalize_numbers),
        Value::Null | Value::Bool(_) | Value::String(_) => {}
    }
}

fn integral_number(number: &Number) -> Option<Number> {
    if number.is_i64() || number.is_u64() {
        return None;
    }
    let float = number.as_f64()?;
    if float.fract() != 0.0 || float < i64::MIN as f64 || float >= i64::MAX as f64 {
        return None;
    }
    Some(Number::from(float as i64))
}

#[cfg(test)]
mod tests {
    use super::{normalize_numbers, IdStore};
    use crate::model::typed_id::TypedId;
    use serde_json::json;

    #[test]
    fn normalize_numbers_turns_integral_floats_into_integers() {
        let mut value = json!({ "a": 3.0, "b": [1.5, 2.0], "c": { "d": -7.0 }, "e": 4 });
        normalize_numbers(&mut value);
        assert!(value["a"].is_i64());
        assert!(value["b"][0].is_f64());
        assert!(value["b"][1].is_i64());
        assert_eq!(value["c"]["d"], json!(-7));
        assert!(value["e"].is_u64() || value["e"].is_i64());
    }

    #[test]
    fn stored_id_reports_tag_from_latest_put() {
        let mut store = IdStore::new();
        let first = TypedId::deterministic_fake(1, "Role.Book");
        store.put(first.clone(), 10);
        store.put(first.retag("Model.EntityInfo.BookInfoEntity"), 11);

        let stored = store.stored_id(&first).unwrap();
        assert_eq!(stored.type_tag(), "Model.EntityInfo.BookInfoEntity");
        assert_eq!(store.get(&first), Some(&11));
        assert_eq!(store.len(), 1);
    }
}
