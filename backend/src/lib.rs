//! Alert Propagation Core - Rust Engine
//!
//! Discrete-event simulation of alert and cancellation messages flooding
//! through a network of devices joined by directed, delayed links.
//!
//! # Architecture
//!
//! - **core**: Simulation time and the horizon-aware clock
//! - **models**: Domain types (Event, Topology, CancellationLedger, Transcript)
//! - **scheduler**: Time-ordered queue with deterministic tie-breaking
//! - **orchestrator**: Main simulation loop and propagation policy
//! - **scenario**: Scenario text format → configuration
//!
//! # Critical Invariants
//!
//! 1. Events are processed in `(time, enqueue order)` order
//! 2. Only cancellation knowledge from a strictly earlier time suppresses forwarding
//! 3. Nothing at or after the horizon is processed; `@{horizon}: END` is always last

// Module declarations
pub mod core;
pub mod models;
pub mod orchestrator;
pub mod scenario;
pub mod scheduler;

// Re-exports for convenience
pub use core::time::{ClockError, SimClock, SimTime};
pub use models::{
    event::{Event, EventKind},
    ledger::CancellationLedger,
    topology::{Edge, Topology},
    transcript::{Transcript, TranscriptEntry},
    DeviceId,
};
pub use orchestrator::{run_simulation, Engine, SimulationConfig, SimulationError, StepOutcome};
pub use scenario::{load_scenario, parse_scenario, ScenarioError};
pub use scheduler::{EventKey, Scheduler};
