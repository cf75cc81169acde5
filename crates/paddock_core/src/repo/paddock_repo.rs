//! Paddock repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/edit/read APIs over `paddocks` storage.
//! - Derive grazing head counts from current mob assignment.
//!
//! # Invariants
//! - Every write stores `total_dm = area * dm_per_ha`.
//! - Write paths call `validate()` before SQL mutations.
//! - Listing is ordered by `name ASC, id ASC`.

use super::{count_to_u32, ensure_farm_connection_ready, RepoError, RepoResult};
use crate::model::paddock::{NewPaddock, Paddock, PaddockId, PaddockOverview, PastureMeasure};
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Repository interface for paddock operations.
pub trait PaddockRepository {
    fn create_paddock(&self, paddock: &NewPaddock) -> RepoResult<PaddockId>;
    /// Replaces area and density; recomputes the total.
    fn update_measure(&self, id: PaddockId, measure: PastureMeasure) -> RepoResult<()>;
    fn get_paddock(&self, id: PaddockId) -> RepoResult<Option<Paddock>>;
    fn list_paddocks(&self) -> RepoResult<Vec<PaddockOverview>>;
}

/// SQLite-backed paddock repository.
pub struct SqlitePaddockRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePaddockRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_farm_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl PaddockRepository for SqlitePaddockRepository<'_> {
    fn create_paddock(&self, paddock: &NewPaddock) -> RepoResult<PaddockId> {
        paddock.validate()?;

        self.conn.execute(
            "INSERT INTO paddocks (name, area, dm_per_ha, total_dm)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                paddock.name.as_str(),
                paddock.measure.area,
                paddock.measure.dm_per_ha,
                paddock.measure.total_dm(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_measure(&self, id: PaddockId, measure: PastureMeasure) -> RepoResult<()> {
        measure.validate()?;

        let changed = self.conn.execute(
            "UPDATE paddocks
             SET area = ?2,
                 dm_per_ha = ?3,
                 total_dm = ?4
             WHERE id = ?1;",
            params![id, measure.area, measure.dm_per_ha, measure.total_dm()],
        )?;

        if changed == 0 {
            return Err(RepoError::PaddockNotFound(id));
        }

        Ok(())
    }

    fn get_paddock(&self, id: PaddockId) -> RepoResult<Option<Paddock>> {
        let paddock = self
            .conn
            .query_row(
                "SELECT id, name, area, dm_per_ha, total_dm
                 FROM paddocks
                 WHERE id = ?1;",
                [id],
                parse_paddock_row,
            )
            .optional()?;
        Ok(paddock)
    }

    fn list_paddocks(&self) -> RepoResult<Vec<PaddockOverview>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                p.id AS id,
                p.name AS name,
                p.area AS area,
                p.dm_per_ha AS dm_per_ha,
                p.total_dm AS total_dm,
                m.name AS mob_name,
                (SELECT COUNT(*) FROM stock s WHERE s.mob_id = m.id) AS stock_count
             FROM paddocks p
             LEFT JOIN mobs m ON m.paddock_id = p.id
             ORDER BY p.name ASC, p.id ASC;",
        )?;

        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_overview_row(row)?);
        }
        Ok(items)
    }
}

fn parse_paddock_row(row: &Row<'_>) -> rusqlite::Result<Paddock> {
    Ok(Paddock {
        id: row.get("id")?,
        name: row.get("name")?,
        area: row.get("area")?,
        dm_per_ha: row.get("dm_per_ha")?,
        total_dm: row.get("total_dm")?,
    })
}

fn parse_overview_row(row: &Row<'_>) -> RepoResult<PaddockOverview> {
    let stock_count = count_to_u32(row.get("stock_count")?, "paddocks.stock_count")?;
    Ok(PaddockOverview {
        id: row.get("id")?,
        name: row.get("name")?,
        area: row.get("area")?,
        dm_per_ha: row.get("dm_per_ha")?,
        total_dm: row.get("total_dm")?,
        mob_name: row.get("mob_name")?,
        stock_count,
    })
}
