//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep the request layer decoupled from storage details.

pub mod mob_service;
pub mod paddock_service;
pub mod simulation_service;
