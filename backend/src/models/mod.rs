//! Domain models for the alert propagation simulator

pub mod event;
pub mod ledger;
pub mod topology;
pub mod transcript;

/// Identifier of a device in the propagation topology
pub type DeviceId = i64;

// Re-exports
pub use event::{Event, EventKind};
pub use ledger::CancellationLedger;
pub use topology::{Edge, Topology};
pub use transcript::{Transcript, TranscriptEntry};
