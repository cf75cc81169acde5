//! Simulated calendar and day-advance persistence.
//!
//! # Responsibility
//! - Own the single-row `curr_date` table.
//! - Apply one simulated day to every paddock atomically.
//! - Replay bulk reset scripts.
//!
//! # Invariants
//! - Day advance reads, computes and writes inside one IMMEDIATE transaction;
//!   paddock values and the date move together or not at all.
//! - Grazing counts are re-derived from current mob assignment every day.
//! - After a reset every paddock satisfies `total_dm = area * dm_per_ha`
//!   and a date row exists.
//! - Reset scripts run inside the repository's own transaction. Their
//!   `BEGIN`/`COMMIT`/`END` statements are skipped and `ROLLBACK` is refused.

use super::{count_to_u32, ensure_farm_connection_ready, RepoError, RepoResult};
use crate::config::DATE_FORMAT;
use crate::model::pasture::{DayReport, GrazingSnapshot, PastureModel};
use chrono::NaiveDate;
use rusqlite::{params, Batch, Connection, OptionalExtension, Transaction, TransactionBehavior};

/// Repository interface for simulated time.
pub trait SimulationRepository {
    fn current_date(&self) -> RepoResult<Option<NaiveDate>>;
    /// Writes `date` only when no date is stored; returns the stored date.
    fn initialize_date(&self, date: NaiveDate) -> RepoResult<NaiveDate>;
    /// Reads per-paddock grazing state as of now.
    fn grazing_snapshots(&self) -> RepoResult<Vec<GrazingSnapshot>>;
    fn advance_day(&self, model: &PastureModel) -> RepoResult<DayReport>;
    /// Runs `script` and returns the date it leaves behind.
    fn reset(&self, script: &str) -> RepoResult<NaiveDate>;
}

/// SQLite-backed simulation repository.
pub struct SqliteSimulationRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSimulationRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_farm_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl SimulationRepository for SqliteSimulationRepository<'_> {
    fn current_date(&self) -> RepoResult<Option<NaiveDate>> {
        read_date(self.conn)
    }

    fn initialize_date(&self, date: NaiveDate) -> RepoResult<NaiveDate> {
        self.conn.execute(
            "INSERT OR IGNORE INTO curr_date (id, curr_date) VALUES (1, ?1);",
            [format_date(date)],
        )?;
        read_date(self.conn)?
            .ok_or_else(|| RepoError::InvalidData("curr_date row missing after insert".into()))
    }

    fn grazing_snapshots(&self) -> RepoResult<Vec<GrazingSnapshot>> {
        read_snapshots(self.conn)
    }

    fn advance_day(&self, model: &PastureModel) -> RepoResult<DayReport> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let previous_date = read_date(&tx)?
            .ok_or_else(|| RepoError::InvalidData("curr_date is not initialized".into()))?;
        let date = previous_date.succ_opt().ok_or_else(|| {
            RepoError::InvalidData(format!("cannot advance past {previous_date}"))
        })?;

        let snapshots = read_snapshots(&tx)?;
        let updates = model.step_all(&snapshots);
        for update in &updates {
            tx.execute(
                "UPDATE paddocks
                 SET dm_per_ha = ?2,
                     total_dm = ?3
                 WHERE id = ?1;",
                params![update.paddock_id, update.dm_per_ha, update.total_dm],
            )?;
        }

        tx.execute(
            "UPDATE curr_date SET curr_date = ?1 WHERE id = 1;",
            [format_date(date)],
        )?;
        tx.commit()?;

        Ok(DayReport {
            previous_date,
            date,
            updates,
        })
    }

    fn reset(&self, script: &str) -> RepoResult<NaiveDate> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        run_reset_script(&tx, script)?;
        tx.execute("UPDATE paddocks SET total_dm = area * dm_per_ha;", [])?;

        let date_rows: i64 = tx.query_row("SELECT COUNT(*) FROM curr_date;", [], |row| row.get(0))?;
        if date_rows != 1 {
            return Err(RepoError::InvalidData(format!(
                "reset script must leave exactly one curr_date row, found {date_rows}"
            )));
        }
        let date = read_date(&tx)?
            .ok_or_else(|| RepoError::InvalidData("reset script did not set curr_date".into()))?;

        tx.commit()?;
        Ok(date)
    }
}

fn run_reset_script(conn: &Connection, script: &str) -> RepoResult<()> {
    let mut batch = Batch::new(conn, script);
    while let Some(mut stmt) = batch.next()? {
        let keyword = stmt
            .expanded_sql()
            .map(|sql| leading_keyword(&sql))
            .unwrap_or_default();
        match keyword.as_str() {
            "BEGIN" | "COMMIT" | "END" => continue,
            "ROLLBACK" => {
                return Err(RepoError::InvalidData(
                    "reset script must not contain ROLLBACK".into(),
                ))
            }
            _ => {}
        }

        let mut rows = stmt.raw_query();
        while rows.next()?.is_some() {}
    }
    Ok(())
}

/// First SQL keyword of `sql`, upper-cased, skipping comments.
fn leading_keyword(sql: &str) -> String {
    let mut rest = sql.trim_start();
    loop {
        if let Some(line_comment) = rest.strip_prefix("--") {
            rest = line_comment
                .split_once('\n')
                .map_or("", |(_, tail)| tail)
                .trim_start();
        } else if let Some(block_comment) = rest.strip_prefix("/*") {
            rest = block_comment
                .split_once("*/")
                .map_or("", |(_, tail)| tail)
                .trim_start();
        } else {
            break;
        }
    }
    rest.chars()
        .take_while(|ch| ch.is_ascii_alphabetic())
        .collect::<String>()
        .to_ascii_uppercase()
}

fn read_date(conn: &Connection) -> RepoResult<Option<NaiveDate>> {
    let raw: Option<String> = conn
        .query_row("SELECT curr_date FROM curr_date WHERE id = 1;", [], |row| {
            row.get(0)
        })
        .optional()?;

    match raw {
        Some(value) => NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
            .map(Some)
            .map_err(|_| {
                RepoError::InvalidData(format!("invalid date `{value}` in curr_date.curr_date"))
            }),
        None => Ok(None),
    }
}

fn read_snapshots(conn: &Connection) -> RepoResult<Vec<GrazingSnapshot>> {
    let mut stmt = conn.prepare(
        "SELECT
            p.id AS id,
            p.area AS area,
            p.dm_per_ha AS dm_per_ha,
            (SELECT COUNT(*)
               FROM stock s
               JOIN mobs m ON m.id = s.mob_id
              WHERE m.paddock_id = p.id) AS stock_count
         FROM paddocks p
         ORDER BY p.id ASC;",
    )?;

    let mut rows = stmt.query([])?;
    let mut snapshots = Vec::new();
    while let Some(row) = rows.next()? {
        snapshots.push(GrazingSnapshot {
            paddock_id: row.get("id")?,
            area: row.get("area")?,
            dm_per_ha: row.get("dm_per_ha")?,
            stock_count: count_to_u32(row.get("stock_count")?, "paddocks.stock_count")?,
        });
    }
    Ok(snapshots)
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::leading_keyword;

    #[test]
    fn leading_keyword_skips_comments_and_case() {
        assert_eq!(leading_keyword("  begin transaction;"), "BEGIN");
        assert_eq!(leading_keyword("-- note\n  Commit;"), "COMMIT");
        assert_eq!(leading_keyword("/* a */ /* b */END"), "END");
        assert_eq!(leading_keyword("INSERT INTO x VALUES (1);"), "INSERT");
        assert_eq!(leading_keyword("-- only a comment"), "");
    }
}
