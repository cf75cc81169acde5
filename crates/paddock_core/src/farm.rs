//! Explicit store handle for the farm simulation.
//!
//! # Responsibility
//! - Own the one SQLite connection for the lifetime of a process or test.
//! - Expose every inbound farm operation behind a single value.
//!
//! # Invariants
//! - A `Farm` only exists over a fully migrated connection.
//! - A `Farm` only exists with rates that pass `SimulationConfig::validate`.
//! - The connection is closed by `close()` or on drop, never lazily reopened.

use crate::config::{ConfigError, SimulationConfig};
use crate::db::{open_db, open_db_in_memory, DbError, DbResult, BASELINE_SQL};
use crate::model::mob::{MobId, MobOverview, MoveOptions, Stock};
use crate::model::paddock::{Paddock, PaddockId, PaddockOverview};
use crate::model::pasture::DayReport;
use crate::repo::mob_repo::SqliteMobRepository;
use crate::repo::paddock_repo::SqlitePaddockRepository;
use crate::repo::sim_repo::SqliteSimulationRepository;
use crate::repo::RepoResult;
use crate::service::mob_service::{MobService, MobServiceError};
use crate::service::paddock_service::PaddockService;
use crate::service::simulation_service::SimulationService;
use chrono::NaiveDate;
use log::info;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Errors raised while opening a [`Farm`].
#[derive(Debug)]
pub enum FarmOpenError {
    /// Simulation parameters break the rate invariants.
    Config(ConfigError),
    Db(DbError),
}

impl Display for FarmOpenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid simulation config: {err}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for FarmOpenError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Db(err) => Some(err),
        }
    }
}

impl From<ConfigError> for FarmOpenError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<DbError> for FarmOpenError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

/// Open farm store plus simulation parameters.
pub struct Farm {
    conn: Connection,
    config: SimulationConfig,
}

impl Farm {
    /// Opens (creating when missing) the farm database at `path`.
    ///
    /// The config is checked before the file is touched.
    pub fn open(path: impl AsRef<Path>, config: SimulationConfig) -> Result<Self, FarmOpenError> {
        config.validate()?;
        Ok(Self {
            conn: open_db(path)?,
            config,
        })
    }

    /// Opens an empty private in-memory farm.
    pub fn open_in_memory(config: SimulationConfig) -> Result<Self, FarmOpenError> {
        config.validate()?;
        Ok(Self {
            conn: open_db_in_memory()?,
            config,
        })
    }

    /// Closes the underlying connection, reporting close failures.
    pub fn close(self) -> DbResult<()> {
        self.conn
            .close()
            .map_err(|(_, err)| DbError::Sqlite(err))?;
        info!("event=db_close module=db status=ok");
        Ok(())
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Raw connection for diagnostics and tests.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn paddocks(&self) -> RepoResult<PaddockService<SqlitePaddockRepository<'_>>> {
        Ok(PaddockService::new(SqlitePaddockRepository::try_new(
            &self.conn,
        )?))
    }

    pub fn mobs(&self) -> RepoResult<MobService<SqliteMobRepository<'_>>> {
        Ok(MobService::new(SqliteMobRepository::try_new(&self.conn)?))
    }

    pub fn simulation(&self) -> RepoResult<SimulationService<SqliteSimulationRepository<'_>>> {
        Ok(SimulationService::new(
            SqliteSimulationRepository::try_new(&self.conn)?,
            &self.config,
        ))
    }

    pub fn current_date(&self) -> RepoResult<NaiveDate> {
        self.simulation()?.current_date()
    }

    pub fn advance_day(&self) -> RepoResult<DayReport> {
        self.simulation()?.advance_day()
    }

    /// Replays `script` as a full data reload.
    pub fn reset_simulation(&self, script: &str) -> RepoResult<NaiveDate> {
        self.simulation()?.reset(script)
    }

    /// Reloads the built-in baseline farm.
    pub fn reset_to_baseline(&self) -> RepoResult<NaiveDate> {
        self.reset_simulation(BASELINE_SQL)
    }

    pub fn add_paddock(
        &self,
        name: impl Into<String>,
        area: f64,
        dm_per_ha: f64,
    ) -> RepoResult<PaddockId> {
        self.paddocks()?.add_paddock(name, area, dm_per_ha)
    }

    pub fn edit_paddock(&self, id: PaddockId, area: f64, dm_per_ha: f64) -> RepoResult<()> {
        self.paddocks()?.edit_paddock(id, area, dm_per_ha)
    }

    pub fn get_paddock(&self, id: PaddockId) -> RepoResult<Option<Paddock>> {
        self.paddocks()?.get_paddock(id)
    }

    pub fn list_paddocks(&self) -> RepoResult<Vec<PaddockOverview>> {
        self.paddocks()?.list_paddocks()
    }

    pub fn move_mob(&self, mob_id: MobId, paddock_id: PaddockId) -> Result<(), MobServiceError> {
        self.mobs()?.move_mob(mob_id, paddock_id)
    }

    pub fn list_mobs(&self) -> Result<Vec<MobOverview>, MobServiceError> {
        self.mobs()?.list_mobs()
    }

    pub fn list_stock(&self, mob_id: MobId) -> Result<Vec<Stock>, MobServiceError> {
        self.mobs()?.list_stock(mob_id)
    }

    pub fn move_options(&self) -> Result<MoveOptions, MobServiceError> {
        self.mobs()?.move_options()
    }
}
