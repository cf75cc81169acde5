//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for the farm store.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Write paths validate pasture measurements before SQL mutations.
//! - Repository APIs return semantic errors (`PaddockNotFound`,
//!   `PaddockOccupied`) in addition to DB transport errors.
//! - Repositories only wrap connections at the latest schema version.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::mob::MobId;
use crate::model::paddock::{FarmValidationError, PaddockId};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod mob_repo;
pub mod paddock_repo;
pub mod sim_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by paddock, mob and simulation persistence.
#[derive(Debug)]
pub enum RepoError {
    Validation(FarmValidationError),
    Db(DbError),
    PaddockNotFound(PaddockId),
    MobNotFound(MobId),
    /// Destination paddock already hosts another mob.
    PaddockOccupied {
        paddock_id: PaddockId,
        occupant: MobId,
    },
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::PaddockNotFound(id) => write!(f, "paddock not found: {id}"),
            Self::MobNotFound(id) => write!(f, "mob not found: {id}"),
            Self::PaddockOccupied {
                paddock_id,
                occupant,
            } => write!(f, "paddock {paddock_id} is already occupied by mob {occupant}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "farm repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "farm repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "farm repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted farm data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<FarmValidationError> for RepoError {
    fn from(value: FarmValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Tables and columns every farm repository reads or writes.
const REQUIRED_SCHEMA: &[(&str, &[&str])] = &[
    ("paddocks", &["id", "name", "area", "dm_per_ha", "total_dm"]),
    ("mobs", &["id", "name", "paddock_id"]),
    ("stock", &["id", "mob_id", "dob", "weight"]),
    ("curr_date", &["id", "curr_date"]),
];

pub(crate) fn ensure_farm_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &(table, columns) in REQUIRED_SCHEMA {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Converts a SQLite `COUNT(*)` into a head count.
pub(crate) fn count_to_u32(value: i64, column: &str) -> RepoResult<u32> {
    u32::try_from(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid count `{value}` in {column}")))
}
