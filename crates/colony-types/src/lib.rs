//! Shared type definitions for the colony economy simulation.
//!
//! This crate is the single source of truth for the vocabulary used across
//! the workspace: what resources exist, which building kinds can be placed,
//! which technologies gate them, and the small value types (positions,
//! costs, identifiers) passed between the ledger, the world, and the tick
//! engine.
//!
//! # Modules
//!
//! - [`ids`] -- Sequential identifier newtypes for workers and buildings
//! - [`enums`] -- Resources, building kinds, technologies, production states
//! - [`structs`] -- Grid positions and resource costs

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{BlockReason, BuildingKind, Collection, ProductionState, ResourceKind, TechId};
pub use ids::{BuildingId, WorkerId};
pub use structs::{GridPos, ResourceCost};
