//! Mob and stock domain model.
//!
//! # Invariants
//! - A mob references at most one paddock; `None` means unassigned.
//! - At most one mob occupies a paddock.
//! - Every stock animal belongs to exactly one mob.

use super::paddock::PaddockId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type MobId = i64;
pub type StockId = i64;

/// Mob listing row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MobOverview {
    pub id: MobId,
    pub name: String,
    pub paddock_id: Option<PaddockId>,
    pub paddock_name: Option<String>,
    pub stock_count: u32,
}

impl MobOverview {
    pub fn is_grazing(&self) -> bool {
        self.paddock_id.is_some()
    }
}

/// One animal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    pub id: StockId,
    pub mob_id: MobId,
    pub dob: Option<NaiveDate>,
    /// Live weight in kg.
    pub weight: Option<f64>,
}

impl Stock {
    /// Age in whole days at `on`, when the birth date is known.
    pub fn age_days(&self, on: NaiveDate) -> Option<i64> {
        self.dob.map(|dob| (on - dob).num_days())
    }
}

/// Id/name pair used by move selection lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    pub id: i64,
    pub name: String,
}

/// Valid choices for a mob move.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MoveOptions {
    /// Mobs currently assigned to a paddock.
    pub mobs: Vec<NamedRef>,
    /// Paddocks with no mob.
    pub vacant_paddocks: Vec<NamedRef>,
}
