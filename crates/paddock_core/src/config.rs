//! Simulation tuning parameters.
//!
//! # Responsibility
//! - Hold the pasture growth and stock consumption rates used by the day
//!   advance, plus the date a fresh store starts at.
//! - Resolve overrides from `PADDOCK_*` environment variables.
//!
//! # Invariants
//! - Rates are finite and non-negative.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Default pasture growth in kg DM per hectare per day.
pub const DEFAULT_GROWTH_RATE: f64 = 65.0;
/// Default pasture eaten in kg DM per animal per day.
pub const DEFAULT_CONSUMPTION_RATE: f64 = 14.0;

pub const GROWTH_RATE_ENV: &str = "PADDOCK_GROWTH_RATE";
pub const CONSUMPTION_RATE_ENV: &str = "PADDOCK_CONSUMPTION_RATE";
pub const START_DATE_ENV: &str = "PADDOCK_START_DATE";

/// Storage and display format for simulated dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors raised while building a [`SimulationConfig`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Value could not be parsed as a number.
    InvalidNumber { key: &'static str, value: String },
    /// Rate is negative, NaN or infinite.
    InvalidRate { key: &'static str, value: f64 },
    /// Value is not a `YYYY-MM-DD` date.
    InvalidDate { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidNumber { key, value } => {
                write!(f, "`{key}` must be a number, got `{value}`")
            }
            Self::InvalidRate { key, value } => {
                write!(f, "`{key}` must be finite and non-negative, got {value}")
            }
            Self::InvalidDate { key, value } => {
                write!(f, "`{key}` must be a YYYY-MM-DD date, got `{value}`")
            }
        }
    }
}

impl Error for ConfigError {}

/// Parameters of the daily pasture update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// kg DM per hectare per day.
    pub growth_rate: f64,
    /// kg DM per animal per day.
    pub consumption_rate: f64,
    /// Date written to an empty store on first read.
    pub start_date: NaiveDate,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            growth_rate: DEFAULT_GROWTH_RATE,
            consumption_rate: DEFAULT_CONSUMPTION_RATE,
            start_date: default_start_date(),
        }
    }
}

impl SimulationConfig {
    /// Builds a config from process environment variables.
    ///
    /// Unset or blank variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = non_blank(lookup(GROWTH_RATE_ENV)) {
            config.growth_rate = parse_rate(GROWTH_RATE_ENV, &raw)?;
        }
        if let Some(raw) = non_blank(lookup(CONSUMPTION_RATE_ENV)) {
            config.consumption_rate = parse_rate(CONSUMPTION_RATE_ENV, &raw)?;
        }
        if let Some(raw) = non_blank(lookup(START_DATE_ENV)) {
            config.start_date = NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(|_| {
                ConfigError::InvalidDate {
                    key: START_DATE_ENV,
                    value: raw.clone(),
                }
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Overrides both rates, keeping the start date.
    pub fn with_rates(mut self, growth_rate: f64, consumption_rate: f64) -> Self {
        self.growth_rate = growth_rate;
        self.consumption_rate = consumption_rate;
        self
    }

    /// Checks rate invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_rate(GROWTH_RATE_ENV, self.growth_rate)?;
        check_rate(CONSUMPTION_RATE_ENV, self.consumption_rate)?;
        Ok(())
    }
}

fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 11, 15).unwrap_or_default()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}

fn parse_rate(key: &'static str, raw: &str) -> Result<f64, ConfigError> {
    let value = raw
        .parse::<f64>()
        .map_err(|_| ConfigError::InvalidNumber {
            key,
            value: raw.to_string(),
        })?;
    check_rate(key, value)?;
    Ok(value)
}

fn check_rate(key: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::InvalidRate { key, value });
    }
    Ok(())
}
