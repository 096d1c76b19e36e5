use cellar_core::storage::{
    CellarStore, NewStorage, NewWine, PositionFilter, SqliteStore, WineFilter, Zone,
};
use cellar_core::CellarError;

/// Open an in-memory store with one storage unit: zones A (2 slots) and B (1 slot).
fn store_with_cellar() -> (SqliteStore, String) {
    let mut store = SqliteStore::open_in_memory().expect("open in memory");
    let storage_id = store
        .create_storage(
            &NewStorage::new("Basement rack")
                .with_id("cellar-1")
                .zone(Zone::numbered("A", 2))
                .zone(Zone::numbered("B", 1)),
        )
        .expect("create storage");
    (store, storage_id)
}

fn position_id(store: &SqliteStore, identifier: &str) -> String {
    store
        .list_positions(&PositionFilter::new())
        .expect("list positions")
        .into_iter()
        .find(|p| p.identifier == identifier)
        .expect("position should exist")
        .id
}

#[test]
fn test_create_open_close_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("cellar.db");

    SqliteStore::create(&path).expect("create should succeed");
    assert!(path.exists());

    let store = SqliteStore::open(&path).expect("open should succeed");
    assert!(!store.has_storage().expect("has_storage"));
    store.close().expect("close should succeed");
}

#[test]
fn test_create_existing_file_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("cellar.db");

    SqliteStore::create(&path).expect("create should succeed");
    let result = SqliteStore::create(&path);
    assert!(matches!(result, Err(CellarError::Storage(_))));
}

#[test]
fn test_open_missing_file_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("missing.db");

    let result = SqliteStore::open(&path);
    assert!(matches!(result, Err(CellarError::Connection(_))));
}

#[test]
fn test_create_storage_enumerates_positions() {
    let (store, storage_id) = store_with_cellar();

    assert!(store.has_storage().expect("has_storage"));

    let unit = store
        .get_storage(&storage_id)
        .expect("get_storage")
        .expect("storage should exist");
    assert_eq!(unit.description, "Basement rack");
    assert_eq!(unit.total_positions, 3);
    assert_eq!(unit.zones.len(), 2);

    let positions = store
        .list_positions(&PositionFilter::new())
        .expect("list positions");
    assert_eq!(positions.len(), 3);
    assert!(positions.iter().all(|p| !p.is_occupied));
    assert!(positions.iter().all(|p| p.storage_id == storage_id));

    let available = store
        .list_positions(&PositionFilter::new().available())
        .expect("list available");
    assert_eq!(available.len(), 3);

    let zone_a = store
        .list_positions(&PositionFilter::new().zone("A"))
        .expect("list zone A");
    assert_eq!(zone_a.len(), 2);
}

#[test]
fn test_create_storage_rejects_invalid_zones() {
    let mut store = SqliteStore::open_in_memory().expect("open in memory");

    let no_zones = NewStorage::new("Empty rack");
    assert!(matches!(
        store.create_storage(&no_zones),
        Err(CellarError::Validation(_))
    ));

    let duplicate = NewStorage::new("Dup rack")
        .zone(Zone::numbered("A", 1))
        .zone(Zone::numbered("A", 1));
    assert!(matches!(
        store.create_storage(&duplicate),
        Err(CellarError::Validation(_))
    ));

    // Nothing was written by the failed attempts.
    assert!(!store.has_storage().expect("has_storage"));
}

#[test]
fn test_create_storage_duplicate_id_conflicts() {
    let (mut store, _) = store_with_cellar();
    let result = store.create_storage(
        &NewStorage::new("Second rack")
            .with_id("cellar-1")
            .zone(Zone::numbered("C", 1)),
    );
    assert!(matches!(result, Err(CellarError::Conflict(_))));
}

#[test]
fn test_add_wine_occupies_position() {
    let (mut store, _) = store_with_cellar();
    let a1 = position_id(&store, "A-1");

    let wine_id = store
        .add_wine(&NewWine::new("Malbec 2020", "Argentinian red").at_position(&a1))
        .expect("add wine");

    let position = store
        .get_position(&a1)
        .expect("get_position")
        .expect("position should exist");
    assert!(position.is_occupied);
    assert_eq!(position.wine_id.as_deref(), Some(wine_id.as_str()));

    let wine = store
        .get_wine(&wine_id)
        .expect("get_wine")
        .expect("wine should exist");
    assert_eq!(wine.position_id.as_deref(), Some(a1.as_str()));
    assert!(!wine.consumed);
    assert!(wine.consumed_date.is_none());

    store.check_integrity().expect("integrity after add");
}

#[test]
fn test_add_wine_to_occupied_position_conflicts() {
    let (mut store, _) = store_with_cellar();
    let a1 = position_id(&store, "A-1");

    let first = store
        .add_wine(&NewWine::new("Malbec 2020", "Argentinian red").at_position(&a1))
        .expect("add first wine");

    let result = store.add_wine(&NewWine::new("Syrah 2019", "Peppery").at_position(&a1));
    assert!(matches!(result, Err(CellarError::Conflict(_))));

    // Both rows are unchanged: the position still holds the first wine and
    // no second wine row was created.
    let position = store
        .get_position(&a1)
        .expect("get_position")
        .expect("position should exist");
    assert_eq!(position.wine_id.as_deref(), Some(first.as_str()));
    let wines = store.list_wines(&WineFilter::new()).expect("list wines");
    assert_eq!(wines.len(), 1);
}

#[test]
fn test_add_wine_to_unknown_position_not_found() {
    let (mut store, _) = store_with_cellar();
    let result = store.add_wine(&NewWine::new("Malbec 2020", "red").at_position("pos_missing"));
    assert!(matches!(result, Err(CellarError::NotFound(_))));
    assert!(store.list_wines(&WineFilter::new()).expect("list").is_empty());
}

#[test]
fn test_add_wine_without_position() {
    let (mut store, _) = store_with_cellar();
    let wine_id = store
        .add_wine(&NewWine::new("Port", "Unplaced bottle"))
        .expect("add wine");

    let wine = store
        .get_wine(&wine_id)
        .expect("get_wine")
        .expect("wine should exist");
    assert!(wine.position_id.is_none());
    store.check_integrity().expect("integrity");
}

#[test]
fn test_mark_consumed_vacates_position() {
    let (mut store, _) = store_with_cellar();
    let a1 = position_id(&store, "A-1");
    let wine_id = store
        .add_wine(&NewWine::new("Malbec 2020", "red").at_position(&a1))
        .expect("add wine");

    store.mark_consumed(&wine_id).expect("mark consumed");

    let wine = store
        .get_wine(&wine_id)
        .expect("get_wine")
        .expect("wine should exist");
    assert!(wine.consumed);
    assert!(wine.consumed_date.is_some());
    assert!(wine.position_id.is_none());

    let position = store
        .get_position(&a1)
        .expect("get_position")
        .expect("position should exist");
    assert!(!position.is_occupied);
    assert!(position.wine_id.is_none());

    // Second call fails: double consumption is guarded.
    let result = store.mark_consumed(&wine_id);
    assert!(matches!(result, Err(CellarError::InvalidState(_))));

    store.check_integrity().expect("integrity after consume");
}

#[test]
fn test_mark_consumed_unknown_wine_not_found() {
    let (mut store, _) = store_with_cellar();
    let result = store.mark_consumed("wine_missing");
    assert!(matches!(result, Err(CellarError::NotFound(_))));
}

#[test]
fn test_move_wine_to_free_position() {
    let (mut store, _) = store_with_cellar();
    let a1 = position_id(&store, "A-1");
    let b1 = position_id(&store, "B-1");
    let wine_id = store
        .add_wine(&NewWine::new("Malbec 2020", "red").at_position(&a1))
        .expect("add wine");

    store.move_wine(&wine_id, &b1).expect("move wine");

    let old = store.get_position(&a1).expect("get").expect("exists");
    assert!(!old.is_occupied);
    assert!(old.wine_id.is_none());

    let new = store.get_position(&b1).expect("get").expect("exists");
    assert!(new.is_occupied);
    assert_eq!(new.wine_id.as_deref(), Some(wine_id.as_str()));

    let wine = store.get_wine(&wine_id).expect("get").expect("exists");
    assert_eq!(wine.position_id.as_deref(), Some(b1.as_str()));

    store.check_integrity().expect("integrity after move");
}

#[test]
fn test_move_wine_to_occupied_position_conflicts() {
    let (mut store, _) = store_with_cellar();
    let a1 = position_id(&store, "A-1");
    let a2 = position_id(&store, "A-2");
    let malbec = store
        .add_wine(&NewWine::new("Malbec 2020", "red").at_position(&a1))
        .expect("add malbec");
    let syrah = store
        .add_wine(&NewWine::new("Syrah 2019", "peppery").at_position(&a2))
        .expect("add syrah");

    let result = store.move_wine(&malbec, &a2);
    assert!(matches!(result, Err(CellarError::Conflict(_))));

    // Both positions are unchanged.
    let p1 = store.get_position(&a1).expect("get").expect("exists");
    assert_eq!(p1.wine_id.as_deref(), Some(malbec.as_str()));
    let p2 = store.get_position(&a2).expect("get").expect("exists");
    assert_eq!(p2.wine_id.as_deref(), Some(syrah.as_str()));

    store.check_integrity().expect("integrity after conflict");
}

#[test]
fn test_move_wine_to_own_position_is_noop() {
    let (mut store, _) = store_with_cellar();
    let a1 = position_id(&store, "A-1");
    let wine_id = store
        .add_wine(&NewWine::new("Malbec 2020", "red").at_position(&a1))
        .expect("add wine");

    store.move_wine(&wine_id, &a1).expect("noop move");

    let position = store.get_position(&a1).expect("get").expect("exists");
    assert!(position.is_occupied);
    assert_eq!(position.wine_id.as_deref(), Some(wine_id.as_str()));
}

#[test]
fn test_move_consumed_wine_invalid_state() {
    let (mut store, _) = store_with_cellar();
    let a1 = position_id(&store, "A-1");
    let b1 = position_id(&store, "B-1");
    let wine_id = store
        .add_wine(&NewWine::new("Malbec 2020", "red").at_position(&a1))
        .expect("add wine");
    store.mark_consumed(&wine_id).expect("consume");

    let result = store.move_wine(&wine_id, &b1);
    assert!(matches!(result, Err(CellarError::InvalidState(_))));
}

#[test]
fn test_delete_wine_frees_position() {
    let (mut store, _) = store_with_cellar();
    let a1 = position_id(&store, "A-1");
    let wine_id = store
        .add_wine(&NewWine::new("Malbec 2020", "red").at_position(&a1))
        .expect("add wine");

    store.delete_wine(&wine_id).expect("delete wine");

    assert!(store.get_wine(&wine_id).expect("get").is_none());
    let position = store.get_position(&a1).expect("get").expect("exists");
    assert!(!position.is_occupied);
    assert!(position.wine_id.is_none());

    // Subsequent delete by the same id is a not-found error.
    let result = store.delete_wine(&wine_id);
    assert!(matches!(result, Err(CellarError::NotFound(_))));

    store.check_integrity().expect("integrity after delete");
}

#[test]
fn test_list_wines_excludes_consumed_by_default() {
    let (mut store, _) = store_with_cellar();
    let a1 = position_id(&store, "A-1");
    let a2 = position_id(&store, "A-2");
    let malbec = store
        .add_wine(&NewWine::new("Malbec 2020", "red").at_position(&a1))
        .expect("add malbec");
    store
        .add_wine(&NewWine::new("Syrah 2019", "peppery").at_position(&a2))
        .expect("add syrah");
    store.mark_consumed(&malbec).expect("consume malbec");

    let active = store.list_wines(&WineFilter::new()).expect("list active");
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].name, "Syrah 2019");

    let all = store
        .list_wines(&WineFilter::new().include_consumed())
        .expect("list all");
    assert_eq!(all.len(), 2);

    let limited = store
        .list_wines(&WineFilter::new().include_consumed().limit(1))
        .expect("list limited");
    assert_eq!(limited.len(), 1);
}

// The scenario from the requirements: occupy, conflict, consume, reuse.
#[test]
fn test_position_reuse_scenario() {
    let (mut store, _) = store_with_cellar();
    let a1 = position_id(&store, "A-1");

    let malbec = store
        .add_wine(&NewWine::new("Malbec 2020", "Argentinian red").at_position(&a1))
        .expect("add malbec");
    assert!(store.get_position(&a1).unwrap().unwrap().is_occupied);

    let result = store.add_wine(&NewWine::new("Syrah 2019", "Peppery").at_position(&a1));
    assert!(matches!(result, Err(CellarError::Conflict(_))));

    store.mark_consumed(&malbec).expect("consume malbec");
    assert!(!store.get_position(&a1).unwrap().unwrap().is_occupied);
    assert!(store.get_wine(&malbec).unwrap().unwrap().consumed);

    let syrah = store
        .add_wine(&NewWine::new("Syrah 2019", "Peppery").at_position(&a1))
        .expect("add syrah after vacate");
    let position = store.get_position(&a1).unwrap().unwrap();
    assert!(position.is_occupied);
    assert_eq!(position.wine_id.as_deref(), Some(syrah.as_str()));

    store.check_integrity().expect("integrity at end of scenario");
}

#[test]
fn test_check_integrity_detects_stale_occupancy() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("cellar.db");

    SqliteStore::create(&path).expect("create");
    {
        let mut store = SqliteStore::open(&path).expect("open");
        store
            .create_storage(&NewStorage::new("Rack").zone(Zone::numbered("A", 1)))
            .expect("create storage");
        store.close().expect("close");
    }

    // Corrupt the occupancy flag behind the store's back.
    let conn = rusqlite::Connection::open(&path).expect("raw open");
    conn.execute("UPDATE positions SET is_occupied = 1", [])
        .expect("corrupt");
    drop(conn);

    let store = SqliteStore::open(&path).expect("reopen");
    let result = store.check_integrity();
    assert!(matches!(result, Err(CellarError::Storage(_))));
}
