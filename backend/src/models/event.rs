//! Simulation events.
//!
//! An [`Event`] is one occurrence at a point in simulated time: a device
//! raising an alert or a cancellation itself, or receiving one from a
//! neighbour. Events are immutable; propagating a message always manufactures
//! a fresh receive event for each downstream device.
//!
//! # Example
//!
//! ```rust
//! use alert_propagation_core::models::{Event, EventKind};
//!
//! let raised = Event::originate_alert(1, "fire", 0);
//! assert_eq!(raised.kind(), EventKind::OriginateAlert);
//! assert_eq!(raised.source(), None);
//!
//! let heard = raised.forwarded(2, 3);
//! assert_eq!(heard.kind(), EventKind::ReceiveAlert);
//! assert_eq!(heard.time(), 3);
//! assert_eq!(heard.source(), Some(1));
//! ```

use super::DeviceId;
use crate::core::time::SimTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What happened to a message at a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Device raises an alert on its own
    OriginateAlert,
    /// Device raises a cancellation on its own
    OriginateCancel,
    /// Device hears an alert from a neighbour
    ReceiveAlert,
    /// Device hears a cancellation from a neighbour
    ReceiveCancel,
}

impl EventKind {
    /// Whether the device raised the message itself
    pub fn is_originate(self) -> bool {
        matches!(self, EventKind::OriginateAlert | EventKind::OriginateCancel)
    }

    /// Whether the message is a cancellation (as opposed to an alert)
    pub fn is_cancellation(self) -> bool {
        matches!(self, EventKind::OriginateCancel | EventKind::ReceiveCancel)
    }

    /// Kind of the event a neighbour sees when this message is forwarded
    pub fn forwarded(self) -> EventKind {
        if self.is_cancellation() {
            EventKind::ReceiveCancel
        } else {
            EventKind::ReceiveAlert
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::OriginateAlert => "OriginateAlert",
            EventKind::OriginateCancel => "OriginateCancel",
            EventKind::ReceiveAlert => "ReceiveAlert",
            EventKind::ReceiveCancel => "ReceiveCancel",
        };
        f.write_str(name)
    }
}

/// An immutable, timestamped occurrence at a device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    time: SimTime,
    kind: EventKind,
    /// Device raising or receiving the message
    device: DeviceId,
    /// Opaque identifier of the message instance
    description: String,
    /// Forwarding device; `None` for originate events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<DeviceId>,
}

impl Event {
    /// Build an event from its raw parts
    ///
    /// No consistency checks happen here; the engine rejects receive events
    /// without a source when it dispatches them.
    pub fn new(
        time: SimTime,
        kind: EventKind,
        device: DeviceId,
        description: impl Into<String>,
        source: Option<DeviceId>,
    ) -> Self {
        Self {
            time,
            kind,
            device,
            description: description.into(),
            source,
        }
    }

    /// Device raises an alert at `time`
    pub fn originate_alert(
        device: DeviceId,
        description: impl Into<String>,
        time: SimTime,
    ) -> Self {
        Self::new(time, EventKind::OriginateAlert, device, description, None)
    }

    /// Device raises a cancellation at `time`
    pub fn originate_cancel(
        device: DeviceId,
        description: impl Into<String>,
        time: SimTime,
    ) -> Self {
        Self::new(time, EventKind::OriginateCancel, device, description, None)
    }

    /// The event `to` sees at `arrival` when this event's device forwards it
    pub fn forwarded(&self, to: DeviceId, arrival: SimTime) -> Self {
        Self {
            time: arrival,
            kind: self.kind.forwarded(),
            device: to,
            description: self.description.clone(),
            source: Some(self.device),
        }
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn device(&self) -> DeviceId {
        self.device
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn source(&self) -> Option<DeviceId> {
        self.source
    }
}
