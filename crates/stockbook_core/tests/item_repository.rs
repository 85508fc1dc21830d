use chrono::{TimeZone, Utc};
use stockbook_core::db::open_db_in_memory;
use stockbook_core::{ErrorKind, Item, ItemRepository, MemoryStorage, SqliteStorage};

fn item(name: &str) -> Item {
    Item::new(name, Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap())
}

#[test]
fn append_returns_sequential_indices() {
    let store = MemoryStorage::new();
    let repo = ItemRepository::new(&store);

    assert_eq!(repo.append(item("A")).unwrap(), 0);
    assert_eq!(repo.append(item("B")).unwrap(), 1);
    assert_eq!(repo.len().unwrap(), 2);
}

#[test]
fn append_rejects_blank_name() {
    let store = MemoryStorage::new();
    let repo = ItemRepository::new(&store);

    let err = repo.append(item("  ")).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(repo.is_empty().unwrap());
}

#[test]
fn append_trims_name() {
    let store = MemoryStorage::new();
    let repo = ItemRepository::new(&store);

    let index = repo.append(item("  A ")).unwrap();

    assert_eq!(repo.get(index).unwrap().name, "A");
}

#[test]
fn append_rejects_reused_id() {
    let store = MemoryStorage::new();
    let repo = ItemRepository::new(&store);
    let first = item("A");
    let mut copy = first.clone();
    copy.name = "B".to_string();

    repo.append(first.clone()).unwrap();
    let err = repo.append(copy).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Duplicate);
    assert_eq!(repo.len().unwrap(), 1);
    assert_eq!(repo.position(first.id).unwrap(), Some(0));
}

#[test]
fn get_out_of_range_is_index_error() {
    let store = MemoryStorage::new();
    let repo = ItemRepository::new(&store);
    repo.append(item("A")).unwrap();

    let err = repo.get(1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Index);
}

#[test]
fn update_name_changes_only_that_field() {
    let store = MemoryStorage::new();
    let repo = ItemRepository::new(&store);
    let mut original = item("Pixel 7");
    original.brand = "Google".to_string();
    original.imeis = vec!["111".to_string()];
    original.mrp_price = "599".to_string();
    repo.append(original.clone()).unwrap();

    repo.update_field(0, "name", "Pixel 8").unwrap();

    let loaded = repo.get(0).unwrap();
    assert_eq!(loaded.name, "Pixel 8");
    let expected = Item {
        name: "Pixel 8".to_string(),
        ..original
    };
    assert_eq!(loaded, expected);
}

#[test]
fn update_field_error_order_and_kinds() {
    let store = MemoryStorage::new();
    let repo = ItemRepository::new(&store);
    repo.append(item("A")).unwrap();

    let err = repo.update_field(5, "nickname", "x").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Index);

    let err = repo.update_field(0, "nickname", "x").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownField);

    let err = repo.update_field(0, "dealerPrice", "cheap").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(repo.get(0).unwrap().dealer_price, "");
}

#[test]
fn update_image_enforces_type_and_size() {
    let store = MemoryStorage::new();
    let repo = ItemRepository::new(&store);
    repo.append(item("A")).unwrap();

    let html = repo
        .update_field(0, "image", "data:text/html;base64,PHNjcmlwdD4=")
        .unwrap_err();
    assert_eq!(html.kind(), ErrorKind::UnsupportedType);

    let oversized = format!("data:image/png;base64,{}", "A".repeat(7 * 1024 * 1024));
    let err = repo.update_field(0, "image", &oversized).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TooLarge);
    assert_eq!(repo.get(0).unwrap().image, None);

    let updated = repo
        .update_field(0, "image", "data:image/png;base64,iVBORw==")
        .unwrap();
    assert_eq!(updated.image.as_deref(), Some("data:image/png;base64,iVBORw=="));
}

#[test]
fn update_attribute_is_not_checked_against_catalog() {
    let store = MemoryStorage::new();
    let repo = ItemRepository::new(&store);
    repo.append(item("A")).unwrap();

    repo.update_field(0, "color", "Ultraviolet").unwrap();
    assert_eq!(repo.get(0).unwrap().color, "Ultraviolet");
}

#[test]
fn imei_add_remove_is_scoped_to_one_item() {
    let store = MemoryStorage::new();
    let repo = ItemRepository::new(&store);
    repo.append(item("A")).unwrap();
    repo.append(item("B")).unwrap();

    assert_eq!(repo.add_imei(0, "111").unwrap(), vec!["111"]);
    assert!(repo.remove_imei(0, 0).unwrap().is_empty());

    assert!(repo.get(0).unwrap().imeis.is_empty());
    assert!(repo.get(1).unwrap().imeis.is_empty());
}

#[test]
fn item_imeis_follow_staging_rules() {
    let store = MemoryStorage::new();
    let repo = ItemRepository::new(&store);
    repo.append(item("A")).unwrap();
    repo.add_imei(0, "111").unwrap();

    assert_eq!(
        repo.add_imei(0, " 111 ").unwrap_err().kind(),
        ErrorKind::Duplicate
    );
    assert_eq!(repo.add_imei(0, "").unwrap_err().kind(), ErrorKind::Validation);
    assert_eq!(repo.remove_imei(0, 3).unwrap_err().kind(), ErrorKind::Index);
    assert_eq!(repo.add_imei(2, "222").unwrap_err().kind(), ErrorKind::Index);
    assert_eq!(repo.imeis(0).unwrap(), vec!["111"]);
}

#[test]
fn same_imei_may_appear_on_different_items() {
    let store = MemoryStorage::new();
    let repo = ItemRepository::new(&store);
    repo.append(item("A")).unwrap();
    repo.append(item("B")).unwrap();

    repo.add_imei(0, "777").unwrap();
    repo.add_imei(1, "777").unwrap();

    assert_eq!(repo.imeis(1).unwrap(), vec!["777"]);
}

#[test]
fn all_rereads_current_state_on_each_call() {
    let store = MemoryStorage::new();
    let repo = ItemRepository::new(&store);
    repo.append(item("A")).unwrap();

    let first: Vec<_> = repo.all().unwrap().collect();
    repo.append(item("B")).unwrap();
    let second: Vec<_> = repo.all().unwrap().collect();

    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 2);
    assert_eq!(second[1].0, 1);
    assert_eq!(second[1].1.name, "B");
}

#[test]
fn position_maps_stable_id_to_row() {
    let conn = open_db_in_memory().unwrap();
    let storage = SqliteStorage::new(&conn);
    let repo = ItemRepository::new(&storage);
    let a = item("A");
    let b = item("B");
    let b_id = b.id;
    repo.append(a).unwrap();
    repo.append(b).unwrap();

    assert_eq!(repo.position(b_id).unwrap(), Some(1));
    assert_eq!(repo.position(uuid_nil()).unwrap(), None);
}

#[test]
fn corrupt_saved_items_are_reported() {
    let store = MemoryStorage::new();
    stockbook_core::KeyValueStore::set_item(&store, "savedItems", "{\"oops\":1}").unwrap();
    let repo = ItemRepository::new(&store);

    assert_eq!(repo.all().unwrap_err().kind(), ErrorKind::InvalidData);
}

fn uuid_nil() -> stockbook_core::ItemId {
    stockbook_core::ItemId::nil()
}
