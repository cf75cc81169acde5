//! Core domain logic for the paddock grazing simulator.
//! This crate is the single source of truth for farm invariants.

pub mod config;
pub mod db;
pub mod farm;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, SimulationConfig};
pub use farm::{Farm, FarmOpenError};
pub use logging::{default_log_level, init_logging};
pub use model::mob::{MobId, MobOverview, MoveOptions, NamedRef, Stock, StockId};
pub use model::paddock::{
    FarmValidationError, NewPaddock, Paddock, PaddockId, PaddockOverview, PastureMeasure,
};
pub use model::pasture::{DayReport, GrazingSnapshot, PastureModel, PastureUpdate};
pub use repo::mob_repo::{MobRepository, SqliteMobRepository};
pub use repo::paddock_repo::{PaddockRepository, SqlitePaddockRepository};
pub use repo::sim_repo::{SimulationRepository, SqliteSimulationRepository};
pub use repo::{RepoError, RepoResult};
pub use service::mob_service::{MobService, MobServiceError};
pub use service::paddock_service::PaddockService;
pub use service::simulation_service::SimulationService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
