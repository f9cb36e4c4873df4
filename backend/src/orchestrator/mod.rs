//! Orchestrator - main simulation loop
//!
//! Drives the scheduler, applies the propagation policy and records the
//! transcript. See `engine.rs` for the full implementation.

pub mod engine;

// Re-export main types for convenience
pub use engine::{run_simulation, Engine, SimulationConfig, SimulationError, StepOutcome};
