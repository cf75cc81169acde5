//! Daily pasture growth and grazing model.
//!
//! # Responsibility
//! - Turn one paddock's state and its grazing head count into the next
//!   day's density and total dry matter.
//!
//! # Invariants
//! - `dm_per_ha` after a step is never negative.
//! - `total_dm == area * dm_per_ha` for every produced update.
//! - Paddocks are stepped independently; order does not matter.
//!
//! Growth is `area * growth_rate` and is added directly to the per-hectare
//! density, matching the farm's established arithmetic.

use super::paddock::{total_dm, PaddockId};
use crate::config::SimulationConfig;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Paddock state read at the start of a day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrazingSnapshot {
    pub paddock_id: PaddockId,
    pub area: f64,
    pub dm_per_ha: f64,
    /// Stock whose mob currently occupies the paddock.
    pub stock_count: u32,
}

/// New pasture values for one paddock after a day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PastureUpdate {
    pub paddock_id: PaddockId,
    pub stock_count: u32,
    pub growth: f64,
    pub consumption: f64,
    pub dm_per_ha: f64,
    pub total_dm: f64,
}

/// Outcome of a completed day advance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayReport {
    pub previous_date: NaiveDate,
    pub date: NaiveDate,
    pub updates: Vec<PastureUpdate>,
}

/// Growth/consumption rates applied by the day advance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PastureModel {
    growth_rate: f64,
    consumption_rate: f64,
}

impl PastureModel {
    pub fn new(growth_rate: f64, consumption_rate: f64) -> Self {
        Self {
            growth_rate,
            consumption_rate,
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.growth_rate, config.consumption_rate)
    }

    pub fn growth_rate(&self) -> f64 {
        self.growth_rate
    }

    pub fn consumption_rate(&self) -> f64 {
        self.consumption_rate
    }

    pub fn growth(&self, area: f64) -> f64 {
        area * self.growth_rate
    }

    pub fn consumption(&self, stock_count: u32) -> f64 {
        f64::from(stock_count) * self.consumption_rate
    }

    /// Computes one day of growth and grazing for a paddock.
    pub fn step(&self, snapshot: &GrazingSnapshot) -> PastureUpdate {
        let growth = self.growth(snapshot.area);
        let consumption = self.consumption(snapshot.stock_count);
        let dm_per_ha = (snapshot.dm_per_ha + growth - consumption).max(0.0);

        PastureUpdate {
            paddock_id: snapshot.paddock_id,
            stock_count: snapshot.stock_count,
            growth,
            consumption,
            dm_per_ha,
            total_dm: total_dm(snapshot.area, dm_per_ha),
        }
    }

    pub fn step_all(&self, snapshots: &[GrazingSnapshot]) -> Vec<PastureUpdate> {
        snapshots.iter().map(|snapshot| self.step(snapshot)).collect()
    }
}

impl Default for PastureModel {
    fn default() -> Self {
        Self::from_config(&SimulationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::{GrazingSnapshot, PastureModel};

    fn snapshot(area: f64, dm_per_ha: f64, stock_count: u32) -> GrazingSnapshot {
        GrazingSnapshot {
            paddock_id: 1,
            area,
            dm_per_ha,
            stock_count,
        }
    }

    #[test]
    fn ungrazed_paddock_grows_by_area_times_rate() {
        let update = PastureModel::default().step(&snapshot(10.0, 100.0, 0));
        assert_eq!(update.growth, 650.0);
        assert_eq!(update.consumption, 0.0);
        assert_eq!(update.dm_per_ha, 750.0);
        assert_eq!(update.total_dm, 7500.0);
    }

    #[test]
    fn grazing_subtracts_per_head_consumption() {
        let update = PastureModel::default().step(&snapshot(5.0, 2200.0, 4));
        assert_eq!(update.consumption, 56.0);
        assert_eq!(update.dm_per_ha, 2469.0);
        assert_eq!(update.total_dm, 12345.0);
    }

    #[test]
    fn overgrazed_paddock_clamps_to_zero() {
        let update = PastureModel::default().step(&snapshot(0.1, 5.0, 10));
        assert_eq!(update.dm_per_ha, 0.0);
        assert_eq!(update.total_dm, 0.0);
    }

    #[test]
    fn custom_rates_are_applied() {
        let model = PastureModel::new(10.0, 1.0);
        let update = model.step(&snapshot(2.0, 50.0, 3));
        assert_eq!(update.dm_per_ha, 67.0);
        assert_eq!(update.total_dm, 134.0);
    }

    #[test]
    fn step_all_keeps_paddocks_independent() {
        let model = PastureModel::default();
        let mut a = snapshot(1.0, 0.0, 100);
        a.paddock_id = 7;
        let b = snapshot(2.0, 10.0, 0);
        let updates = model.step_all(&[a, b]);

        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].paddock_id, 7);
        assert_eq!(updates[0].dm_per_ha, 0.0);
        assert_eq!(updates[1].dm_per_ha, 140.0);
        for update in updates {
            assert!(update.dm_per_ha >= 0.0);
        }
    }
}
