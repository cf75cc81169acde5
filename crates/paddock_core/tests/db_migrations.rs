use paddock_core::db::migrations::latest_version;
use paddock_core::db::{open_db, open_db_in_memory, DbError};
use paddock_core::{RepoError, SqlitePaddockRepository};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "paddocks");
    assert_table_exists(&conn, "mobs");
    assert_table_exists(&conn, "stock");
    assert_table_exists(&conn, "curr_date");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("farm.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "paddocks");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn schema_allows_only_one_mob_per_paddock() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO paddocks (id, name, area, dm_per_ha, total_dm) VALUES (1, 'Barn', 1, 1, 1);
         INSERT INTO mobs (id, name, paddock_id) VALUES (1, 'Rams', 1);
         INSERT INTO mobs (id, name, paddock_id) VALUES (2, 'Ewes', NULL);
         INSERT INTO mobs (id, name, paddock_id) VALUES (3, 'Bulls', NULL);",
    )
    .unwrap();

    let err = conn
        .execute("UPDATE mobs SET paddock_id = 1 WHERE id = 2;", [])
        .unwrap_err();
    assert!(err.to_string().contains("UNIQUE"));
}

#[test]
fn upgrade_from_version_one_keeps_lowest_mob_in_shared_paddock() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");

    let conn = open_db(&path).unwrap();
    conn.execute_batch(
        "DROP INDEX idx_mobs_paddock_unique;
         CREATE INDEX idx_mobs_paddock_id ON mobs(paddock_id);
         INSERT INTO paddocks (id, name, area, dm_per_ha, total_dm) VALUES (1, 'Barn', 1, 1, 1);
         INSERT INTO paddocks (id, name, area, dm_per_ha, total_dm) VALUES (2, 'Hill', 1, 1, 1);
         INSERT INTO mobs (id, name, paddock_id) VALUES (7, 'Rams', 1);
         INSERT INTO mobs (id, name, paddock_id) VALUES (3, 'Ewes', 1);
         INSERT INTO mobs (id, name, paddock_id) VALUES (5, 'Bulls', 2);
         PRAGMA user_version = 1;",
    )
    .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());

    let assignments: Vec<(i64, Option<i64>)> = conn
        .prepare("SELECT id, paddock_id FROM mobs ORDER BY id;")
        .unwrap()
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(assignments, vec![(3, Some(1)), (5, Some(2)), (7, None)]);

    let err = conn
        .execute("UPDATE mobs SET paddock_id = 1 WHERE id = 7;", [])
        .unwrap_err();
    assert!(err.to_string().contains("UNIQUE"));
}

#[test]
fn schema_rejects_negative_density() {
    let conn = open_db_in_memory().unwrap();
    let err = conn
        .execute(
            "INSERT INTO paddocks (name, area, dm_per_ha, total_dm) VALUES ('Bad', 1, -5, -5);",
            [],
        )
        .unwrap_err();
    assert!(err.to_string().contains("CHECK"));
}

#[test]
fn repository_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqlitePaddockRepository::try_new(&conn).err().unwrap();
    assert!(matches!(
        err,
        RepoError::UninitializedConnection {
            actual_version: 0,
            ..
        }
    ));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
