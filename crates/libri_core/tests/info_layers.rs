use libri_core::{
    AccountInfo, AccountInfoDto, AccountInfoEntity, AccountStatus, BookInfo, BookInfoDto,
    BookInfoEntity, DomainInfo, Info, InfoError, Layer, MemoryInfoRepository, StorageInfo, Tagged,
    TransferInfo, TypedId, UserInfo, UserInfoDto, UserInfoEntity,
};

fn sample_user() -> UserInfo {
    UserInfo::new(
        &TypedId::deterministic_fake(10, "Role.User"),
        "Ada",
        "ada@example.com",
    )
    .with_accepted_book(TypedId::deterministic_fake(1, "Role.Book"))
}

#[test]
fn conversions_preserve_raw_id_and_swap_layer_tag() {
    let book = BookInfo::new(
        &TypedId::deterministic_fake(1, "Role.Book"),
        "Dune",
        "Herbert",
        "desert",
    );
    let dto = book.to_transfer();
    let entity = book.to_storage();

    assert_eq!(book.id().type_tag(), BookInfo::TYPE_TAG);
    assert_eq!(dto.id().type_tag(), BookInfoDto::TYPE_TAG);
    assert_eq!(entity.id().type_tag(), BookInfoEntity::TYPE_TAG);
    assert!(dto.id().loose_eq(book.id()));
    assert!(entity.id().loose_eq(book.id()));

    let back_from_dto = dto.to_domain();
    let back_from_entity = entity.to_domain();
    assert!(back_from_dto.id().strict_eq(book.id()));
    assert!(back_from_entity.id().strict_eq(book.id()));
    assert_eq!(back_from_dto, book);
    assert_eq!(back_from_entity, book);
}

#[test]
fn mutating_transfer_copy_leaves_source_untouched() {
    let user = sample_user();
    let entity_before = user.to_storage();

    let mut dto = user.to_transfer();
    dto.name = "Mallory".to_string();
    dto.accepted_books.clear();
    dto.accepted_books
        .push(TypedId::deterministic_fake(99, "Role.Book"));

    assert_eq!(user.name(), "Ada");
    assert_eq!(user.accepted_books().len(), 1);
    assert!(user.accepted_books()[0].loose_eq(&TypedId::deterministic_fake(1, "Role.Book")));
    assert_eq!(user.to_storage(), entity_before);
}

#[test]
fn representation_specific_fields_do_not_leak() {
    let book = BookInfo::new(
        &TypedId::deterministic_fake(2, "Role.Book"),
        "Emma",
        "Austen",
        "matchmaking",
    );
    let mut dto = book.to_transfer();
    dto.etag = Some("W/\"42\"".to_string());
    let mut entity = book.to_storage();
    entity.row_version = 7;

    let via_dto = dto.to_domain().to_storage();
    assert_eq!(via_dto.row_version, 0);
    let via_entity = entity.to_domain().to_transfer();
    assert_eq!(via_entity.etag, None);

    let domain_json = serde_json::to_value(dto.to_domain()).unwrap();
    assert!(domain_json.get("etag").is_none());
    assert!(domain_json.get("row_version").is_none());
}

#[test]
fn storage_construction_rejects_transfer_identifiers() {
    let dto_id = TypedId::deterministic_fake(3, BookInfoDto::TYPE_TAG);
    let err = BookInfoEntity::try_new(&dto_id, "t", "a", "d").unwrap_err();
    assert_eq!(
        err,
        InfoError::LayerViolation {
            from: Layer::Transfer,
            to: Layer::Storage
        }
    );

    let user_dto = sample_user().to_transfer();
    assert!(UserInfoEntity::try_new(user_dto.id(), "n", "e").is_err());
    let account_dto_id = TypedId::deterministic_fake(4, AccountInfoDto::TYPE_TAG);
    assert!(AccountInfoEntity::try_new(&account_dto_id, "n").is_err());
}

#[test]
fn transfer_construction_rejects_storage_identifiers() {
    let entity_id = TypedId::deterministic_fake(3, BookInfoEntity::TYPE_TAG);
    let err = BookInfoDto::try_new(&entity_id, "t", "a", "d").unwrap_err();
    assert_eq!(
        err,
        InfoError::LayerViolation {
            from: Layer::Storage,
            to: Layer::Transfer
        }
    );

    let user_entity = sample_user().to_storage();
    assert!(UserInfoDto::try_new(user_entity.id(), "n", "e").is_err());
}

#[test]
fn decoding_transfer_json_rejects_storage_tagged_id() {
    let mut json = serde_json::to_value(sample_user().to_transfer()).unwrap();
    json["id"]["type_tag"] = serde_json::json!(UserInfoEntity::TYPE_TAG);
    let err = serde_json::from_value::<UserInfoDto>(json).unwrap_err();
    assert!(err.to_string().contains("cannot construct"));

    let book = BookInfo::new(&TypedId::deterministic_fake(6, "Role.Book"), "t", "a", "d");
    let mut json = serde_json::to_value(book.to_transfer()).unwrap();
    json["id"]["type_tag"] = serde_json::json!(BookInfoEntity::TYPE_TAG);
    assert!(serde_json::from_value::<BookInfoDto>(json).is_err());
}

#[test]
fn decoding_storage_json_rejects_transfer_tagged_id() {
    let account = AccountInfo::new(&TypedId::deterministic_fake(7, "Role.Account"), "acc");
    let mut json = serde_json::to_value(account.to_storage()).unwrap();
    json["id"]["type_tag"] = serde_json::json!(AccountInfoDto::TYPE_TAG);
    assert!(serde_json::from_value::<AccountInfoEntity>(json).is_err());

    let book = BookInfo::new(&TypedId::deterministic_fake(8, "Role.Book"), "t", "a", "d");
    let mut json = serde_json::to_value(book.to_storage()).unwrap();
    json["id"]["type_tag"] = serde_json::json!(BookInfoDto::TYPE_TAG);
    assert!(serde_json::from_value::<BookInfoEntity>(json).is_err());
}

#[test]
fn decoding_retags_domain_ids_into_the_target_layer() {
    let book = BookInfo::new(&TypedId::deterministic_fake(9, "Role.Book"), "t", "a", "d");
    let domain_json = serde_json::to_value(&book).unwrap();

    let entity: BookInfoEntity = serde_json::from_value(serde_json::json!({
        "id": domain_json["id"].clone(),
        "title": "t",
        "author": "a",
        "description": "d",
        "row_version": 4,
    }))
    .unwrap();
    assert_eq!(entity.id().type_tag(), BookInfoEntity::TYPE_TAG);
    assert!(entity.id().loose_eq(book.id()));
}

fn snapshot_of(key: String, row: serde_json::Value) -> String {
    let mut rows = serde_json::Map::new();
    rows.insert(key, row);
    serde_json::Value::Object(rows).to_string()
}

#[test]
fn memory_snapshot_with_transfer_tagged_rows_is_rejected() {
    let book = BookInfo::new(&TypedId::deterministic_fake(10, "Role.Book"), "t", "a", "d");
    let mut row = serde_json::to_value(book.to_storage()).unwrap();

    let dto_key = book.id().retag(BookInfoDto::TYPE_TAG).to_string();
    let snapshot = snapshot_of(dto_key, row.clone());
    let err = MemoryInfoRepository::<BookInfo>::from_json(&snapshot).err().unwrap();
    assert!(matches!(err, InfoError::LayerViolation { .. }));

    row["id"]["type_tag"] = serde_json::json!(BookInfoDto::TYPE_TAG);
    let entity_key = book.id().retag(BookInfoEntity::TYPE_TAG).to_string();
    let snapshot = snapshot_of(entity_key, row);
    let err = MemoryInfoRepository::<BookInfo>::from_json(&snapshot).err().unwrap();
    assert!(matches!(err, InfoError::Deserialization(_)));
}

#[test]
fn representation_construction_accepts_domain_and_untyped_ids() {
    let domain_id = TypedId::deterministic_fake(5, BookInfo::TYPE_TAG);
    let entity = BookInfoEntity::try_new(&domain_id, "t", "a", "d").unwrap();
    assert_eq!(entity.id().type_tag(), BookInfoEntity::TYPE_TAG);

    let role_id = TypedId::deterministic_fake(5, "Role.Book");
    let dto = BookInfoDto::try_new(&role_id, "t", "a", "d").unwrap();
    assert!(dto.id().loose_eq(&role_id));
    assert_eq!(dto.id().type_tag(), BookInfoDto::TYPE_TAG);
}

#[test]
fn account_shares_raw_id_with_user_but_not_tag() {
    let user = sample_user();
    let account = AccountInfo::new(user.id(), "Ada's account").with_status(AccountStatus::Suspended);

    assert!(account.id().loose_eq(user.id()));
    assert!(!account.id().strict_eq(user.id()));

    let round_trip = AccountInfoDto::from_domain(&account).to_domain();
    assert_eq!(round_trip.status(), AccountStatus::Suspended);
    assert_eq!(
        AccountInfoEntity::from_domain(&account).to_domain(),
        account
    );
}

#[test]
fn builders_return_new_values() {
    let book = BookInfo::new(
        &TypedId::deterministic_fake(6, "Role.Book"),
        "Old",
        "Author",
        "desc",
    );
    let renamed = book.clone().with_title("New");
    assert_eq!(book.title(), "Old");
    assert_eq!(renamed.title(), "New");
    assert!(renamed.id().strict_eq(book.id()));

    let user = sample_user();
    let duplicate = user
        .clone()
        .with_accepted_book(TypedId::deterministic_fake(1, "Other.Tag"));
    assert_eq!(duplicate.accepted_books().len(), 1);
    let removed = duplicate.without_accepted_book(&TypedId::deterministic_fake(1, "x"));
    assert!(removed.accepted_books().is_empty());
    assert_eq!(user.accepted_books().len(), 1);
}

#[test]
fn domain_json_embeds_identifier_object() {
    let book = BookInfo::new(
        &TypedId::deterministic_fake(8, "Role.Book"),
        "Dune",
        "Herbert",
        "desert",
    );
    let json = serde_json::to_value(&book).unwrap();
    assert_eq!(json["id"]["raw_id"], "00000000-0000-0000-0000-000000000008");
    assert_eq!(json["id"]["type_tag"], "Model.DomainInfo.BookInfo");
    assert_eq!(json["title"], "Dune");
}
