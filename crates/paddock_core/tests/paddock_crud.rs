use paddock_core::db::open_db_in_memory;
use paddock_core::{
    FarmValidationError, PaddockRepository, PaddockService, RepoError, SqlitePaddockRepository,
};
use rusqlite::Connection;

fn setup() -> Connection {
    open_db_in_memory().unwrap()
}

fn paddock_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM paddocks;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn add_paddock_stores_derived_total() {
    let conn = setup();
    let service = PaddockService::new(SqlitePaddockRepository::try_new(&conn).unwrap());

    let id = service.add_paddock("North", 20.0, 100.0).unwrap();

    let paddock = service.get_paddock(id).unwrap().unwrap();
    assert_eq!(paddock.name, "North");
    assert_eq!(paddock.area, 20.0);
    assert_eq!(paddock.dm_per_ha, 100.0);
    assert_eq!(paddock.total_dm, 2000.0);
}

#[test]
fn add_paddock_rejects_negative_input_without_writing() {
    let conn = setup();
    let service = PaddockService::new(SqlitePaddockRepository::try_new(&conn).unwrap());

    let err = service.add_paddock("South", -2.0, 100.0).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(FarmValidationError::NegativeArea(_))
    ));

    let err = service.add_paddock("South", 2.0, -100.0).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(FarmValidationError::NegativeDensity(_))
    ));

    let err = service.add_paddock("  ", 2.0, 100.0).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(FarmValidationError::BlankName)
    ));

    assert_eq!(paddock_count(&conn), 0);
}

#[test]
fn edit_paddock_recomputes_total_and_keeps_mob() {
    let conn = setup();
    let service = PaddockService::new(SqlitePaddockRepository::try_new(&conn).unwrap());
    let id = service.add_paddock("Hill", 3.5, 1800.0).unwrap();
    conn.execute(
        "INSERT INTO mobs (id, name, paddock_id) VALUES (1, 'Rams', ?1);",
        [id],
    )
    .unwrap();

    service.edit_paddock(id, 4.0, 1000.0).unwrap();

    let paddock = service.get_paddock(id).unwrap().unwrap();
    assert_eq!(paddock.name, "Hill");
    assert_eq!(paddock.area, 4.0);
    assert_eq!(paddock.dm_per_ha, 1000.0);
    assert_eq!(paddock.total_dm, 4000.0);

    let mob_paddock: Option<i64> = conn
        .query_row("SELECT paddock_id FROM mobs WHERE id = 1;", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(mob_paddock, Some(id));
}

#[test]
fn edit_unknown_paddock_returns_not_found() {
    let conn = setup();
    let repo = SqlitePaddockRepository::try_new(&conn).unwrap();
    let service = PaddockService::new(repo);

    let err = service.edit_paddock(42, 1.0, 1.0).unwrap_err();
    assert!(matches!(err, RepoError::PaddockNotFound(42)));
}

#[test]
fn edit_rejects_negative_values_and_leaves_row_untouched() {
    let conn = setup();
    let service = PaddockService::new(SqlitePaddockRepository::try_new(&conn).unwrap());
    let id = service.add_paddock("River", 6.0, 2000.0).unwrap();

    let err = service.edit_paddock(id, 6.0, -1.0).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    let paddock = service.get_paddock(id).unwrap().unwrap();
    assert_eq!(paddock.dm_per_ha, 2000.0);
    assert_eq!(paddock.total_dm, 12000.0);
}

#[test]
fn list_paddocks_reports_mob_and_derived_stock_count() {
    let conn = setup();
    let repo = SqlitePaddockRepository::try_new(&conn).unwrap();
    let zig = repo
        .create_paddock(&paddock_core::NewPaddock::new("Zig Zag", 3.0, 2100.0))
        .unwrap();
    let barn = repo
        .create_paddock(&paddock_core::NewPaddock::new("Barn", 2.5, 1500.0))
        .unwrap();
    conn.execute_batch(&format!(
        "INSERT INTO mobs (id, name, paddock_id) VALUES (1, 'Heifers', {zig});
         INSERT INTO stock (mob_id) VALUES (1), (1), (1);"
    ))
    .unwrap();

    let items = repo.list_paddocks().unwrap();
    assert_eq!(items.len(), 2);

    assert_eq!(items[0].id, barn);
    assert_eq!(items[0].mob_name, None);
    assert_eq!(items[0].stock_count, 0);

    assert_eq!(items[1].id, zig);
    assert_eq!(items[1].mob_name.as_deref(), Some("Heifers"));
    assert_eq!(items[1].stock_count, 3);
    assert_eq!(items[1].total_dm, 6300.0);
}

#[test]
fn paddock_overview_serializes_with_column_names() {
    let conn = setup();
    let service = PaddockService::new(SqlitePaddockRepository::try_new(&conn).unwrap());
    service.add_paddock("Woolshed", 1.5, 1900.0).unwrap();

    let items = service.list_paddocks().unwrap();
    let json = serde_json::to_value(&items[0]).unwrap();
    assert_eq!(json["name"], "Woolshed");
    assert_eq!(json["dm_per_ha"], 1900.0);
    assert_eq!(json["total_dm"], 2850.0);
    assert_eq!(json["stock_count"], 0);
    assert!(json["mob_name"].is_null());
}
