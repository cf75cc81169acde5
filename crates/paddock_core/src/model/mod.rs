//! Farm domain model.
//!
//! # Responsibility
//! - Define paddock, mob and stock records used by core business logic.
//! - Hold the pasture growth/grazing arithmetic behind the day advance.
//!
//! # Invariants
//! - Records are identified by store-assigned integer ids.
//! - Nothing is deleted outside a full simulation reset.

pub mod mob;
pub mod paddock;
pub mod pasture;
