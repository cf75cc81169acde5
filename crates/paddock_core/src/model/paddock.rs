//! Paddock domain model.
//!
//! # Responsibility
//! - Define the canonical paddock record and its listing projection.
//! - Validate operator-supplied pasture measurements.
//!
//! # Invariants
//! - `total_dm == area * dm_per_ha` for every persisted paddock.
//! - `area` and `dm_per_ha` are finite and never negative.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned paddock identifier.
pub type PaddockId = i64;

/// Validation failures for paddock input.
#[derive(Debug, Clone, PartialEq)]
pub enum FarmValidationError {
    /// Name is empty after trim.
    BlankName,
    /// Area is below zero.
    NegativeArea(f64),
    /// Pasture density is below zero.
    NegativeDensity(f64),
    /// A numeric field is NaN or infinite.
    NonFinite(&'static str),
}

impl Display for FarmValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "paddock name must not be blank"),
            Self::NegativeArea(value) => write!(f, "area must not be negative, got {value}"),
            Self::NegativeDensity(value) => {
                write!(f, "dm_per_ha must not be negative, got {value}")
            }
            Self::NonFinite(field) => write!(f, "{field} must be a finite number"),
        }
    }
}

impl Error for FarmValidationError {}

/// Paddock row as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddock {
    pub id: PaddockId,
    pub name: String,
    /// Hectares.
    pub area: f64,
    /// kg dry matter per hectare.
    pub dm_per_ha: f64,
    /// kg dry matter over the whole paddock.
    pub total_dm: f64,
}

impl Paddock {
    /// Returns whether the stored total agrees with `area * dm_per_ha`.
    pub fn total_is_consistent(&self) -> bool {
        (self.total_dm - total_dm(self.area, self.dm_per_ha)).abs() <= 1e-6
    }
}

/// Pasture measurements supplied when adding or editing a paddock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PastureMeasure {
    pub area: f64,
    pub dm_per_ha: f64,
}

impl PastureMeasure {
    pub fn new(area: f64, dm_per_ha: f64) -> Self {
        Self { area, dm_per_ha }
    }

    /// Rejects NaN, infinite or negative values.
    pub fn validate(&self) -> Result<(), FarmValidationError> {
        if !self.area.is_finite() {
            return Err(FarmValidationError::NonFinite("area"));
        }
        if !self.dm_per_ha.is_finite() {
            return Err(FarmValidationError::NonFinite("dm_per_ha"));
        }
        if self.area < 0.0 {
            return Err(FarmValidationError::NegativeArea(self.area));
        }
        if self.dm_per_ha < 0.0 {
            return Err(FarmValidationError::NegativeDensity(self.dm_per_ha));
        }
        Ok(())
    }

    pub fn total_dm(&self) -> f64 {
        total_dm(self.area, self.dm_per_ha)
    }
}

/// Input for creating a paddock.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPaddock {
    pub name: String,
    pub measure: PastureMeasure,
}

impl NewPaddock {
    /// Builds a draft with a trimmed name.
    pub fn new(name: impl Into<String>, area: f64, dm_per_ha: f64) -> Self {
        Self {
            name: name.into().trim().to_string(),
            measure: PastureMeasure::new(area, dm_per_ha),
        }
    }

    pub fn validate(&self) -> Result<(), FarmValidationError> {
        if self.name.trim().is_empty() {
            return Err(FarmValidationError::BlankName);
        }
        self.measure.validate()
    }
}

/// Paddock listing row with the grazing mob and its head count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaddockOverview {
    pub id: PaddockId,
    pub name: String,
    pub area: f64,
    pub dm_per_ha: f64,
    pub total_dm: f64,
    pub mob_name: Option<String>,
    /// Derived from current mob assignment at query time.
    pub stock_count: u32,
}

/// Computes total dry matter for a paddock.
pub fn total_dm(area: f64, dm_per_ha: f64) -> f64 {
    area * dm_per_ha
}
