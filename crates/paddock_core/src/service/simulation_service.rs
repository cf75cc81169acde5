//! Simulated time use-case service.
//!
//! # Responsibility
//! - Resolve the current simulated date, initializing it once.
//! - Advance the simulation one day using the configured pasture model.
//! - Reset the store from a bulk script.
//!
//! # Invariants
//! - The date only moves forward, one day per advance, except on reset.
//! - The date is read from the store on every call; nothing is cached.

use crate::config::SimulationConfig;
use crate::model::pasture::{DayReport, PastureModel};
use crate::repo::sim_repo::SimulationRepository;
use crate::repo::RepoResult;
use chrono::NaiveDate;
use log::{error, info};
use std::time::Instant;

/// Simulation service facade.
pub struct SimulationService<R: SimulationRepository> {
    repo: R,
    model: PastureModel,
    start_date: NaiveDate,
}

impl<R: SimulationRepository> SimulationService<R> {
    pub fn new(repo: R, config: &SimulationConfig) -> Self {
        Self {
            repo,
            model: PastureModel::from_config(config),
            start_date: config.start_date,
        }
    }

    pub fn model(&self) -> &PastureModel {
        &self.model
    }

    /// Returns the simulated date, storing the configured start date first
    /// if the store has none.
    pub fn current_date(&self) -> RepoResult<NaiveDate> {
        if let Some(date) = self.repo.current_date()? {
            return Ok(date);
        }
        let date = self.repo.initialize_date(self.start_date)?;
        info!("event=date_init module=simulation status=ok date={date}");
        Ok(date)
    }

    /// Applies one day of growth and grazing to every paddock.
    pub fn advance_day(&self) -> RepoResult<DayReport> {
        let started_at = Instant::now();
        self.current_date()?;

        match self.repo.advance_day(&self.model) {
            Ok(report) => {
                info!(
                    "event=advance_day module=simulation status=ok date={} paddocks={} duration_ms={}",
                    report.date,
                    report.updates.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(report)
            }
            Err(err) => {
                error!(
                    "event=advance_day module=simulation status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Replaces all farm data with the rows produced by `script`.
    ///
    /// Returns the simulated date the script establishes.
    pub fn reset(&self, script: &str) -> RepoResult<NaiveDate> {
        let started_at = Instant::now();
        match self.repo.reset(script) {
            Ok(date) => {
                info!(
                    "event=reset_simulation module=simulation status=ok date={} duration_ms={}",
                    date,
                    started_at.elapsed().as_millis()
                );
                Ok(date)
            }
            Err(err) => {
                error!(
                    "event=reset_simulation module=simulation status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }
}
