use risi::storage::schema::SCHEMA_VERSION;
use risi::{Error, FieldMap, Packaging, RiceAddress, RiceStore, Selection};

fn conad() -> FieldMap {
    FieldMap::new()
        .with("name", "Conad Integrale")
        .with("breed", "Parboiled Integrale")
        .with("packaging", Packaging::VacuumCarton)
        .with("price", 240)
}

#[test]
fn data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("risi.db");

    let store = RiceStore::open(&path).unwrap();
    let id = store.insert(&RiceAddress::Collection, &conad()).unwrap();
    assert_eq!(id, 1);
    store.close().unwrap();

    let store = RiceStore::open(&path).unwrap();
    let items = store
        .query(&RiceAddress::Collection, None, &Selection::all(), None)
        .unwrap()
        .to_items()
        .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, 1);
    assert_eq!(items[0].to_fields(), conad());
    assert_eq!(store.stats().unwrap().schema_version, SCHEMA_VERSION);
}

#[test]
fn ids_are_not_reused_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("risi.db");

    let store = RiceStore::open(&path).unwrap();
    store.insert(&RiceAddress::Collection, &conad()).unwrap();
    let last = store.insert(&RiceAddress::Collection, &conad()).unwrap();
    assert_eq!(store.delete(&RiceAddress::Collection, &Selection::all()).unwrap(), 2);
    drop(store);

    let store = RiceStore::open(&path).unwrap();
    let next = store.insert(&RiceAddress::Collection, &conad()).unwrap();
    assert!(next > last);
}

#[test]
fn existing_table_without_version_is_adopted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");

    {
        let conn = rusqlite::Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE rices (
                _id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                breed TEXT,
                packaging INTEGER NOT NULL,
                price INTEGER NOT NULL DEFAULT 0);
             INSERT INTO rices (name, breed, packaging, price) VALUES ('Roma', NULL, 3, 180);",
        )
        .unwrap();
    }

    let store = RiceStore::open(&path).unwrap();
    let item = store
        .query(&RiceAddress::item(1), None, &Selection::all(), None)
        .unwrap()
        .first_item()
        .unwrap()
        .unwrap();
    assert_eq!(item.name, "Roma");
    assert_eq!(item.packaging, Packaging::Bag);
    assert_eq!(store.stats().unwrap().schema_version, 1);
}

#[test]
fn newer_schema_version_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    {
        let conn = rusqlite::Connection::open(&path).unwrap();
        conn.pragma_update(None, "user_version", 2).unwrap();
    }

    match RiceStore::open(&path) {
        Err(Error::UnsupportedSchemaVersion(2)) => {}
        Err(err) => panic!("expected unsupported schema version, got {err}"),
        Ok(_) => panic!("expected unsupported schema version, store opened"),
    }
}

#[test]
fn address_strings_drive_the_store() {
    let store = RiceStore::open_in_memory().unwrap();
    let collection = RiceAddress::parse("content://com.dandandin.android.risi/rices").unwrap();
    let id = store.insert(&collection, &conad()).unwrap();

    let item = RiceAddress::parse(&format!("rices/{}", id)).unwrap();
    assert_eq!(store.update(&item, &FieldMap::new().with("breed", None::<String>), &Selection::all()).unwrap(), 1);

    let cursor = store.query(&item, Some(&["breed"]), &Selection::all(), None).unwrap();
    assert!(cursor.get(0, "breed").unwrap().is_null());

    assert!(matches!(RiceAddress::parse("rices/one"), Err(Error::InvalidAddress(_))));
}
