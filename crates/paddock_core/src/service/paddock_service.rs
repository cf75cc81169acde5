//! Paddock use-case service.
//!
//! # Responsibility
//! - Provide add/edit/read entry points for paddocks.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Negative or non-finite measurements never reach storage.
//! - Editing never touches mob assignment or stock.

use crate::model::paddock::{NewPaddock, Paddock, PaddockId, PaddockOverview, PastureMeasure};
use crate::repo::paddock_repo::PaddockRepository;
use crate::repo::RepoResult;
use log::{info, warn};

/// Use-case service wrapper for paddock operations.
pub struct PaddockService<R: PaddockRepository> {
    repo: R,
}

impl<R: PaddockRepository> PaddockService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Adds a paddock and returns its id.
    ///
    /// # Contract
    /// - Name is trimmed and must not be blank.
    /// - Stores `total_dm = area * dm_per_ha`.
    pub fn add_paddock(
        &self,
        name: impl Into<String>,
        area: f64,
        dm_per_ha: f64,
    ) -> RepoResult<PaddockId> {
        let draft = NewPaddock::new(name, area, dm_per_ha);
        match self.repo.create_paddock(&draft) {
            Ok(id) => {
                info!(
                    "event=add_paddock module=paddock status=ok paddock_id={} area={} dm_per_ha={}",
                    id, area, dm_per_ha
                );
                Ok(id)
            }
            Err(err) => {
                warn!("event=add_paddock module=paddock status=error error={err}");
                Err(err)
            }
        }
    }

    /// Overwrites area and density and recomputes the total.
    ///
    /// Returns `RepoError::PaddockNotFound` for unknown ids.
    pub fn edit_paddock(&self, id: PaddockId, area: f64, dm_per_ha: f64) -> RepoResult<()> {
        let result = self
            .repo
            .update_measure(id, PastureMeasure::new(area, dm_per_ha));
        match &result {
            Ok(()) => info!(
                "event=edit_paddock module=paddock status=ok paddock_id={id} area={area} dm_per_ha={dm_per_ha}"
            ),
            Err(err) => {
                warn!("event=edit_paddock module=paddock status=error paddock_id={id} error={err}")
            }
        }
        result
    }

    pub fn get_paddock(&self, id: PaddockId) -> RepoResult<Option<Paddock>> {
        self.repo.get_paddock(id)
    }

    /// Lists paddocks with occupying mob and derived stock count.
    pub fn list_paddocks(&self) -> RepoResult<Vec<PaddockOverview>> {
        self.repo.list_paddocks()
    }
}
