use libri_core::{
    BookInfo, BookInfoEntity, IdStore, InfoError, InfoRepository, MemoryInfoRepository, TypedId,
};
use serde::{Deserialize, Serialize};

#[test]
fn differently_tagged_ids_alias_one_slot() {
    let mut store = IdStore::new();
    let book = TypedId::deterministic_fake(1, "Book");
    let dto = book.retag("DTOBook");

    assert!(store.put(book.clone(), "first").is_none());
    assert!(store.contains(&dto));
    assert_eq!(store.get(&dto), Some(&"first"));

    assert_eq!(store.put(dto.clone(), "second"), Some("first"));
    assert_eq!(store.len(), 1);
    assert_eq!(store.remove(&book), Some("second"));
    assert!(store.is_empty());
}

#[test]
fn add_again_with_other_tag_fails_already_exists() {
    let repo = MemoryInfoRepository::<BookInfo>::new();
    let a = TypedId::deterministic_fake(1, "Book");
    repo.add_info(&BookInfo::new(&a, "Dune", "Herbert", "desert"))
        .unwrap();

    assert_eq!(repo.fetch_info(&a).unwrap().title(), "Dune");

    let again = BookInfo::new(&a.retag("DTOBook"), "Dune II", "Herbert", "sequel");
    let err = repo.add_info(&again).unwrap_err();
    match err {
        InfoError::AlreadyExists(existing) => {
            assert!(existing.loose_eq(&a));
            assert_eq!(existing.type_tag(), "Model.EntityInfo.BookInfoEntity");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn keys_and_entries_reattach_stored_tags() {
    let mut store = IdStore::new();
    let first = TypedId::deterministic_fake(1, "Role.User");
    let second = TypedId::deterministic_fake(2, "Role.Account");
    store.put(first.clone(), 10_i64);
    store.put(second.clone(), 20_i64);

    let mut keys = store.keys();
    keys.sort_by_key(TypedId::raw_id);
    assert!(keys[0].strict_eq(&first));
    assert!(keys[1].strict_eq(&second));

    let mut entries = store.entries();
    entries.sort_by_key(|(id, _)| id.raw_id());
    assert_eq!(*entries[1].1, 20);
    assert_eq!(entries[1].0.type_tag(), "Role.Account");

    let mut values: Vec<i64> = store.values().into_iter().copied().collect();
    values.sort_unstable();
    assert_eq!(values, vec![10, 20]);
}

#[test]
fn put_all_preserves_source_tags() {
    let mut source = IdStore::new();
    source.put(TypedId::deterministic_fake(1, "Role.Book"), "a");
    source.put(TypedId::deterministic_fake(2, "Role.User"), "b");

    let mut target = IdStore::new();
    target.put(TypedId::deterministic_fake(1, "Old.Tag"), "stale");
    target.put_all(&source);

    assert_eq!(target.len(), 2);
    let probe = TypedId::deterministic_fake(1, "anything");
    assert_eq!(target.get(&probe), Some(&"a"));
    assert_eq!(target.stored_id(&probe).unwrap().type_tag(), "Role.Book");
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Counter {
    label: String,
    count: i64,
    ratio: f64,
}

#[test]
fn json_round_trip_keeps_tags_and_payloads() {
    let mut store = IdStore::new();
    let id = TypedId::deterministic_fake(9, "Role.Book");
    store.put(
        id.clone(),
        Counter {
            label: "loans".to_string(),
            count: 3,
            ratio: 0.5,
        },
    );

    let json = store.to_json().unwrap();
    assert!(json.contains("UUID2:Role.Book@00000000-0000-0000-0000-000000000009"));

    let decoded = IdStore::<Counter>::from_json(&json).unwrap();
    assert_eq!(decoded, store);
    assert!(decoded.keys()[0].strict_eq(&id));
}

#[test]
fn from_json_coerces_integral_floats_to_one_width() {
    let json = r#"{
        "UUID2:Role.Book@00000000-0000-0000-0000-000000000001": { "label": "a", "count": 3.0, "ratio": 2.0 }
    }"#;

    let store = IdStore::<Counter>::from_json(json).unwrap();
    let counter = store
        .get(&TypedId::deterministic_fake(1, "Role.Book"))
        .unwrap();
    assert_eq!(counter.count, 3);
    assert_eq!(counter.ratio, 2.0);
}

#[test]
fn from_json_rejects_bad_keys_and_shapes() {
    let bad_key = r#"{ "Role.Book@00000000-0000-0000-0000-000000000001": 1 }"#;
    assert!(matches!(
        IdStore::<i64>::from_json(bad_key).unwrap_err(),
        InfoError::MalformedIdentifier(_)
    ));

    assert!(matches!(
        IdStore::<i64>::from_json("[1, 2]").unwrap_err(),
        InfoError::Deserialization(_)
    ));
    assert!(matches!(
        IdStore::<i64>::from_json("{ not json").unwrap_err(),
        InfoError::Deserialization(_)
    ));
}

#[test]
fn memory_backend_snapshot_round_trips_through_json() {
    let repo = MemoryInfoRepository::<BookInfo>::new();
    let id = TypedId::deterministic_fake(5, "Role.Book");
    repo.add_info(&BookInfo::new(&id, "Emma", "Austen", "matchmaking"))
        .unwrap();

    let snapshot = repo.to_json().unwrap();
    let rows = IdStore::<BookInfoEntity>::from_json(&snapshot).unwrap();
    assert_eq!(rows.get(&id).unwrap().title, "Emma");

    let restored = MemoryInfoRepository::<BookInfo>::from_json(&snapshot).unwrap();
    assert_eq!(restored.fetch_info(&id).unwrap().author(), "Austen");
}
