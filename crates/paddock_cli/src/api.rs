//! Request-level farm actions for the command line.
//!
//! # Responsibility
//! - Run exactly one core operation per call and wrap the outcome in a
//!   user-facing envelope.
//! - Keep core error types out of the printing layer.
//!
//! # Invariants
//! - Functions never panic; failures become `ok = false` envelopes.
//! - Messages are short, stable, operator-facing sentences.

use paddock_core::{DayReport, Farm, MobId, MobServiceError, PaddockId};
use serde::Serialize;
use std::path::Path;

/// Outcome of one mutating action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionResponse {
    pub ok: bool,
    /// Id of the created or edited record, when there is one.
    pub id: Option<i64>,
    pub message: String,
    /// Recoverable rejection, as opposed to a store failure.
    pub conflict: bool,
}

impl ActionResponse {
    fn success(message: impl Into<String>, id: Option<i64>) -> Self {
        Self {
            ok: true,
            id,
            message: message.into(),
            conflict: false,
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
            conflict: false,
        }
    }

    fn conflict(message: impl Into<String>) -> Self {
        Self {
            conflict: true,
            ..Self::failure(message)
        }
    }
}

/// Advances the simulation and returns the day report with its message.
pub fn next_day(farm: &Farm) -> Result<(DayReport, ActionResponse), ActionResponse> {
    match farm.advance_day() {
        Ok(report) => Ok((
            report,
            ActionResponse::success("Date advanced by one day. Pasture values updated.", None),
        )),
        Err(err) => Err(ActionResponse::failure(format!("next_day failed: {err}"))),
    }
}

pub fn move_mob(farm: &Farm, mob_id: MobId, paddock_id: PaddockId) -> ActionResponse {
    match farm.move_mob(mob_id, paddock_id) {
        Ok(()) => ActionResponse::success(
            "Mob successfully moved to the new paddock.",
            Some(mob_id),
        ),
        Err(MobServiceError::PaddockOccupied { occupant, .. }) => ActionResponse::conflict(
            format!("The selected paddock is already occupied by mob {occupant}."),
        ),
        Err(err) => ActionResponse::failure(format!("move_mob failed: {err}")),
    }
}

pub fn add_paddock(farm: &Farm, name: &str, area: f64, dm_per_ha: f64) -> ActionResponse {
    match farm.add_paddock(name, area, dm_per_ha) {
        Ok(id) => ActionResponse::success("Paddock added successfully.", Some(id)),
        Err(err) => ActionResponse::failure(format!("add_paddock failed: {err}")),
    }
}

pub fn edit_paddock(farm: &Farm, id: PaddockId, area: f64, dm_per_ha: f64) -> ActionResponse {
    match farm.edit_paddock(id, area, dm_per_ha) {
        Ok(()) => ActionResponse::success("Paddock updated successfully.", Some(id)),
        Err(err) => ActionResponse::failure(format!("edit_paddock failed: {err}")),
    }
}

/// Reloads the baseline farm, or the script at `script_path` when given.
pub fn reset(farm: &Farm, script_path: Option<&Path>) -> ActionResponse {
    let result = match script_path {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(script) => farm.reset_simulation(&script),
            Err(err) => {
                return ActionResponse::failure(format!(
                    "reset failed: cannot read `{}`: {err}",
                    path.display()
                ))
            }
        },
        None => farm.reset_to_baseline(),
    };

    match result {
        Ok(date) => ActionResponse::success(
            format!("Simulation reset. Current date is {date}."),
            None,
        ),
        Err(err) => ActionResponse::failure(format!("reset failed: {err}")),
    }
}
