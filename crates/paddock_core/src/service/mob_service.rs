//! Mob use-case service.
//!
//! # Responsibility
//! - Move mobs between paddocks with occupancy conflict reporting.
//! - Expose mob, stock and move-choice listings.
//!
//! # Invariants
//! - A rejected move leaves every row unchanged.
//! - Re-moving a mob into the paddock it already occupies is a no-op success.

use crate::model::mob::{MobId, MobOverview, MoveOptions, Stock};
use crate::model::paddock::PaddockId;
use crate::repo::mob_repo::MobRepository;
use crate::repo::RepoError;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from mob service operations.
#[derive(Debug)]
pub enum MobServiceError {
    /// Destination already hosts another mob.
    PaddockOccupied {
        paddock_id: PaddockId,
        occupant: MobId,
    },
    MobNotFound(MobId),
    PaddockNotFound(PaddockId),
    /// Repository-level failure.
    Repo(RepoError),
}

impl MobServiceError {
    /// Whether this is the recoverable occupancy conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::PaddockOccupied { .. })
    }
}

impl Display for MobServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PaddockOccupied {
                paddock_id,
                occupant,
            } => write!(f, "paddock {paddock_id} is already occupied by mob {occupant}"),
            Self::MobNotFound(id) => write!(f, "mob not found: {id}"),
            Self::PaddockNotFound(id) => write!(f, "paddock not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for MobServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for MobServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::PaddockOccupied {
                paddock_id,
                occupant,
            } => Self::PaddockOccupied {
                paddock_id,
                occupant,
            },
            RepoError::MobNotFound(id) => Self::MobNotFound(id),
            RepoError::PaddockNotFound(id) => Self::PaddockNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Mob service facade.
pub struct MobService<R: MobRepository> {
    repo: R,
}

impl<R: MobRepository> MobService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Moves a mob onto a paddock.
    pub fn move_mob(&self, mob_id: MobId, paddock_id: PaddockId) -> Result<(), MobServiceError> {
        match self.repo.move_mob(mob_id, paddock_id) {
            Ok(()) => {
                info!(
                    "event=move_mob module=mob status=ok mob_id={mob_id} paddock_id={paddock_id}"
                );
                Ok(())
            }
            Err(err) => {
                let err = MobServiceError::from(err);
                let code = if err.is_conflict() {
                    "paddock_occupied"
                } else {
                    "move_failed"
                };
                warn!(
                    "event=move_mob module=mob status=error mob_id={mob_id} paddock_id={paddock_id} error_code={code} error={err}"
                );
                Err(err)
            }
        }
    }

    pub fn get_mob(&self, mob_id: MobId) -> Result<Option<MobOverview>, MobServiceError> {
        self.repo.get_mob(mob_id).map_err(Into::into)
    }

    pub fn list_mobs(&self) -> Result<Vec<MobOverview>, MobServiceError> {
        self.repo.list_mobs().map_err(Into::into)
    }

    pub fn list_stock(&self, mob_id: MobId) -> Result<Vec<Stock>, MobServiceError> {
        self.repo.list_stock(mob_id).map_err(Into::into)
    }

    /// Grazing mobs and vacant paddocks a move can choose from.
    pub fn move_options(&self) -> Result<MoveOptions, MobServiceError> {
        self.repo.move_options().map_err(Into::into)
    }
}
