//! Mob repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Move mobs between paddocks.
//! - Provide read models for mob, stock and move-choice listings.
//!
//! # Invariants
//! - A move into a paddock hosting another mob changes no rows.
//! - Occupancy check and write run in one IMMEDIATE transaction.
//! - Mob listing is ordered by `name ASC, id ASC`; stock by `id ASC`.

use super::{count_to_u32, ensure_farm_connection_ready, RepoError, RepoResult};
use crate::config::DATE_FORMAT;
use crate::model::mob::{MobId, MobOverview, MoveOptions, NamedRef, Stock};
use crate::model::paddock::PaddockId;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

/// Repository interface for mob operations.
pub trait MobRepository {
    /// Assigns `mob_id` to `paddock_id`, rejecting occupied destinations.
    fn move_mob(&self, mob_id: MobId, paddock_id: PaddockId) -> RepoResult<()>;
    fn get_mob(&self, mob_id: MobId) -> RepoResult<Option<MobOverview>>;
    fn list_mobs(&self) -> RepoResult<Vec<MobOverview>>;
    fn list_stock(&self, mob_id: MobId) -> RepoResult<Vec<Stock>>;
    fn move_options(&self) -> RepoResult<MoveOptions>;
}

/// SQLite-backed mob repository.
pub struct SqliteMobRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMobRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_farm_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

const MOB_SELECT_SQL: &str = "SELECT
    m.id AS id,
    m.name AS name,
    m.paddock_id AS paddock_id,
    p.name AS paddock_name,
    (SELECT COUNT(*) FROM stock s WHERE s.mob_id = m.id) AS stock_count
FROM mobs m
LEFT JOIN paddocks p ON p.id = m.paddock_id";

impl MobRepository for SqliteMobRepository<'_> {
    fn move_mob(&self, mob_id: MobId, paddock_id: PaddockId) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let mob_exists: i64 = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM mobs WHERE id = ?1);",
            [mob_id],
            |row| row.get(0),
        )?;
        if mob_exists == 0 {
            return Err(RepoError::MobNotFound(mob_id));
        }

        let paddock_exists: i64 = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM paddocks WHERE id = ?1);",
            [paddock_id],
            |row| row.get(0),
        )?;
        if paddock_exists == 0 {
            return Err(RepoError::PaddockNotFound(paddock_id));
        }

        let occupant: Option<MobId> = tx
            .query_row(
                "SELECT id FROM mobs WHERE paddock_id = ?1 AND id <> ?2 LIMIT 1;",
                params![paddock_id, mob_id],
                |row| row.get(0),
            )
            .optional()?;
        if let Some(occupant) = occupant {
            return Err(RepoError::PaddockOccupied {
                paddock_id,
                occupant,
            });
        }

        tx.execute(
            "UPDATE mobs SET paddock_id = ?2 WHERE id = ?1;",
            params![mob_id, paddock_id],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn get_mob(&self, mob_id: MobId) -> RepoResult<Option<MobOverview>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MOB_SELECT_SQL} WHERE m.id = ?1;"))?;
        let mut rows = stmt.query([mob_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_mob_row(row)?));
        }
        Ok(None)
    }

    fn list_mobs(&self) -> RepoResult<Vec<MobOverview>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MOB_SELECT_SQL} ORDER BY m.name ASC, m.id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut mobs = Vec::new();
        while let Some(row) = rows.next()? {
            mobs.push(parse_mob_row(row)?);
        }
        Ok(mobs)
    }

    fn list_stock(&self, mob_id: MobId) -> RepoResult<Vec<Stock>> {
        if self.get_mob(mob_id)?.is_none() {
            return Err(RepoError::MobNotFound(mob_id));
        }

        let mut stmt = self.conn.prepare(
            "SELECT id, mob_id, dob, weight
             FROM stock
             WHERE mob_id = ?1
             ORDER BY id ASC;",
        )?;
        let mut rows = stmt.query([mob_id])?;
        let mut stock = Vec::new();
        while let Some(row) = rows.next()? {
            stock.push(parse_stock_row(row)?);
        }
        Ok(stock)
    }

    fn move_options(&self) -> RepoResult<MoveOptions> {
        let mobs = list_named(
            self.conn,
            "SELECT id, name FROM mobs
             WHERE paddock_id IS NOT NULL
             ORDER BY name ASC, id ASC;",
        )?;
        let vacant_paddocks = list_named(
            self.conn,
            "SELECT id, name FROM paddocks
             WHERE id NOT IN (SELECT paddock_id FROM mobs WHERE paddock_id IS NOT NULL)
             ORDER BY name ASC, id ASC;",
        )?;
        Ok(MoveOptions {
            mobs,
            vacant_paddocks,
        })
    }
}

fn list_named(conn: &Connection, sql: &str) -> RepoResult<Vec<NamedRef>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query([])?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(NamedRef {
            id: row.get(0)?,
            name: row.get(1)?,
        });
    }
    Ok(items)
}

fn parse_mob_row(row: &Row<'_>) -> RepoResult<MobOverview> {
    Ok(MobOverview {
        id: row.get("id")?,
        name: row.get("name")?,
        paddock_id: row.get("paddock_id")?,
        paddock_name: row.get("paddock_name")?,
        stock_count: count_to_u32(row.get("stock_count")?, "mobs.stock_count")?,
    })
}

fn parse_stock_row(row: &Row<'_>) -> RepoResult<Stock> {
    let dob = match row.get::<_, Option<String>>("dob")? {
        Some(value) => Some(NaiveDate::parse_from_str(&value, DATE_FORMAT).map_err(|_| {
            RepoError::InvalidData(format!("invalid date `{value}` in stock.dob"))
        })?),
        None => None,
    };

    Ok(Stock {
        id: row.get("id")?,
        mob_id: row.get("mob_id")?,
        dob,
        weight: row.get("weight")?,
    })
}
