//! Propagation Engine
//!
//! Main simulation loop: pops events from the scheduler in `(time, sequence)`
//! order and applies the propagation policy to each one.
//!
//! # Architecture
//!
//! ```text
//! For each popped event at time t:
//! 1. Stop if t >= horizon (event and everything after it is discarded)
//! 2. Dispatch by kind:
//!    - OriginateAlert:  forward unless cancellation known before t
//!    - OriginateCancel: record cancellation, forward unless known before t
//!    - ReceiveAlert:    log receipt, forward unless cancellation known before t
//!    - ReceiveCancel:   log receipt, forward unless known before this arrival,
//!                       then record
//! 3. Forwarding appends one SENT line per outgoing edge and enqueues the
//!    matching receive event at t + delay
//! After the loop: append "@{horizon}: END"
//! ```
//!
//! # Example
//!
//! ```rust
//! use alert_propagation_core::models::{Event, Topology};
//! use alert_propagation_core::orchestrator::{Engine, SimulationConfig};
//!
//! let mut topology = Topology::new();
//! topology.add_edge(1, 2, 3);
//!
//! let config = SimulationConfig {
//!     horizon: 100,
//!     topology,
//!     initial_events: vec![Event::originate_alert(1, "fire", 0)],
//! };
//!
//! let transcript = Engine::new(config).unwrap().run().unwrap();
//! assert_eq!(
//!     transcript.lines(),
//!     vec![
//!         "@0: #1 SENT ALERT TO #2: fire",
//!         "@3: #2 RECEIVED ALERT FROM #1: fire",
//!         "@100: END",
//!     ]
//! );
//! ```

use crate::core::time::{ClockError, SimClock, SimTime};
use crate::models::{
    CancellationLedger, DeviceId, Event, EventKind, Topology, Transcript, TranscriptEntry,
};
use crate::scheduler::Scheduler;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, info, trace};

// ============================================================================
// Configuration Types
// ============================================================================

/// Complete simulation configuration
///
/// # Fields
///
/// * `horizon` - Exclusive end time of the run
/// * `topology` - Who forwards to whom, and with what delay
/// * `initial_events` - Alerts and cancellations raised by devices themselves
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Events at or after this time are discarded
    pub horizon: SimTime,

    /// Propagation edges
    pub topology: Topology,

    /// Originate events, enqueued in this order
    pub initial_events: Vec<Event>,
}

impl SimulationConfig {
    /// SHA-256 (hex) of the configuration's JSON form
    ///
    /// Identical configurations always hash identically, so the hash can be
    /// stored next to a transcript to identify the input that produced it.
    pub fn config_hash(&self) -> Result<String, SimulationError> {
        let json = serde_json::to_string(self).map_err(|e| {
            SimulationError::SerializationError(format!("Config serialization failed: {}", e))
        })?;

        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        Ok(format!("{:x}", hasher.finalize()))
    }
}

/// Simulation error types
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimulationError {
    /// Configuration validation error
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// The engine reached a state that validated input can never produce
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// The run dispatched more events than the configured limit allows
    #[error("Event limit of {0} exceeded before reaching the horizon")]
    EventLimitExceeded(usize),
}

impl From<ClockError> for SimulationError {
    fn from(err: ClockError) -> Self {
        SimulationError::InvariantViolation(err.to_string())
    }
}

/// Result of a single engine step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// One event was handled
    Dispatched { time: SimTime, kind: EventKind },

    /// The next event was at or after the horizon; the run is over
    HorizonReached,

    /// Nothing was left to process; the run is over
    Exhausted,
}

impl StepOutcome {
    /// Whether the run has ended
    pub fn is_terminal(&self) -> bool {
        !matches!(self, StepOutcome::Dispatched { .. })
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Discrete-event engine for one simulation run
///
/// Owns the scheduler, the cancellation ledger and the transcript for the
/// lifetime of the run. Processing is single-threaded: each event is handled
/// to completion before the next one is popped.
///
/// # Determinism
///
/// No randomness and no iteration over unordered containers influence the
/// output. Same config = identical transcript.
pub struct Engine {
    /// Current time and horizon
    clock: SimClock,

    /// Propagation edges
    topology: Topology,

    /// Pending events
    scheduler: Scheduler,

    /// Per-device cancellation knowledge
    ledger: CancellationLedger,

    /// Output lines
    transcript: Transcript,

    /// Number of events dispatched so far
    events_processed: usize,

    /// Abort once this many events have been dispatched
    event_limit: Option<usize>,

    /// Set once the run has ended, successfully or not
    state: RunState,
}

#[derive(Debug, Clone)]
enum RunState {
    Running,
    Finished(StepOutcome),
    Aborted(SimulationError),
}

impl Engine {
    /// Create a new engine from configuration
    ///
    /// Validates the configuration, then enqueues the initial events in the
    /// order given.
    ///
    /// # Returns
    ///
    /// * `Ok(Engine)` - Ready to run
    /// * `Err(SimulationError::InvalidConfig)` - Configuration validation failed
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        Self::validate_config(&config)?;

        let SimulationConfig {
            horizon,
            topology,
            initial_events,
        } = config;

        let mut scheduler = Scheduler::new();
        for event in initial_events {
            scheduler.push(event);
        }

        info!(
            horizon,
            devices = topology.devices().count(),
            edges = topology.edge_count(),
            initial_events = scheduler.len(),
            "Engine initialized"
        );

        Ok(Self {
            clock: SimClock::new(horizon),
            topology,
            scheduler,
            ledger: CancellationLedger::new(),
            transcript: Transcript::new(),
            events_processed: 0,
            event_limit: None,
            state: RunState::Running,
        })
    }

    /// Validate configuration
    fn validate_config(config: &SimulationConfig) -> Result<(), SimulationError> {
        if config.horizon < 0 {
            return Err(SimulationError::InvalidConfig(format!(
                "horizon must be >= 0, got {}",
                config.horizon
            )));
        }

        for (from, edge) in config.topology.edges() {
            if edge.delay < 0 {
                return Err(SimulationError::InvalidConfig(format!(
                    "delay on edge #{} -> #{} must be >= 0, got {}",
                    from, edge.to, edge.delay
                )));
            }
        }

        if let Some(event) = config.initial_events.iter().find(|e| !e.kind().is_originate()) {
            return Err(SimulationError::InvalidConfig(format!(
                "initial event for device #{} must be an originate event, got {}",
                event.device(),
                event.kind()
            )));
        }

        Ok(())
    }

    /// Abort the run with [`SimulationError::EventLimitExceeded`] instead of
    /// dispatching more than `limit` events
    ///
    /// A cycle whose delays are all zero never advances time and never
    /// reaches the horizon. Alerts are forwarded on every arrival, and a
    /// cancellation learned at the same instant does not count as known
    /// before it, so this holds for both message classes.
    pub fn with_event_limit(mut self, limit: usize) -> Self {
        self.event_limit = Some(limit);
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Time of the event most recently dispatched
    pub fn current_time(&self) -> Option<SimTime> {
        self.clock.current_time()
    }

    /// Exclusive end of the run
    pub fn horizon(&self) -> SimTime {
        self.clock.horizon()
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn ledger(&self) -> &CancellationLedger {
        &self.ledger
    }

    /// Transcript recorded so far
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Number of events still waiting in the scheduler
    pub fn pending_events(&self) -> usize {
        self.scheduler.len()
    }

    pub fn events_processed(&self) -> usize {
        self.events_processed
    }

    /// Whether the run has ended (END appended, or aborted)
    pub fn is_finished(&self) -> bool {
        !matches!(self.state, RunState::Running)
    }

    // ========================================================================
    // Main loop
    // ========================================================================

    /// Process exactly one scheduler pop
    ///
    /// Once a terminal outcome has been returned the END line is in the
    /// transcript, and further calls return the same outcome without side
    /// effects. After an error the engine stays aborted and keeps returning
    /// that error.
    pub fn step(&mut self) -> Result<StepOutcome, SimulationError> {
        match &self.state {
            RunState::Running => {}
            RunState::Finished(outcome) => return Ok(*outcome),
            RunState::Aborted(err) => return Err(err.clone()),
        }

        let Some((key, event)) = self.scheduler.pop_min() else {
            return Ok(self.finish(StepOutcome::Exhausted));
        };

        if self.clock.is_beyond_horizon(key.time) {
            debug!(
                time = key.time,
                discarded = self.scheduler.len() + 1,
                "Horizon reached"
            );
            return Ok(self.finish(StepOutcome::HorizonReached));
        }

        let dispatched = match self.event_limit {
            Some(limit) if self.events_processed >= limit => {
                Err(SimulationError::EventLimitExceeded(limit))
            }
            _ => self.advance_and_dispatch(&event),
        };
        if let Err(err) = dispatched {
            self.state = RunState::Aborted(err.clone());
            return Err(err);
        }
        self.events_processed += 1;

        Ok(StepOutcome::Dispatched {
            time: event.time(),
            kind: event.kind(),
        })
    }

    /// Run to completion and hand back the transcript
    pub fn run(mut self) -> Result<Transcript, SimulationError> {
        let outcome = loop {
            let outcome = self.step()?;
            if outcome.is_terminal() {
                break outcome;
            }
        };

        info!(
            ?outcome,
            events_processed = self.events_processed,
            lines = self.transcript.len(),
            "Simulation finished"
        );

        Ok(self.transcript)
    }

    fn finish(&mut self, outcome: StepOutcome) -> StepOutcome {
        self.transcript.push(TranscriptEntry::End {
            time: self.clock.horizon(),
        });
        self.state = RunState::Finished(outcome);
        outcome
    }

    fn advance_and_dispatch(&mut self, event: &Event) -> Result<(), SimulationError> {
        self.clock.advance_to(event.time())?;

        let time = event.time();
        let device = event.device();
        let description = event.description();

        debug!(time, device, kind = %event.kind(), description, "Dispatching event");

        let forward = match event.kind() {
            EventKind::OriginateAlert => !self.ledger.known_before(device, description, time),

            EventKind::OriginateCancel => {
                self.ledger.record(device, description, time);
                !self.ledger.known_before(device, description, time)
            }

            EventKind::ReceiveAlert => {
                let source = Self::require_source(event)?;
                self.transcript.push(TranscriptEntry::ReceivedAlert {
                    time,
                    device,
                    source,
                    description: description.to_string(),
                });
                !self.ledger.known_before(device, description, time)
            }

            EventKind::ReceiveCancel => {
                let source = Self::require_source(event)?;
                self.transcript.push(TranscriptEntry::ReceivedCancellation {
                    time,
                    device,
                    source,
                    description: description.to_string(),
                });
                // Flood-once: decided by what the device knew before this arrival
                let already = self.ledger.known_before(device, description, time);
                self.ledger.record(device, description, time);
                !already
            }
        };

        if forward {
            self.forward(event);
        } else {
            debug!(time, device, description, "Forwarding suppressed by earlier cancellation");
        }

        Ok(())
    }

    /// Send `event` along every outgoing edge of its device
    fn forward(&mut self, event: &Event) {
        let time = event.time();
        let device = event.device();
        let cancellation = event.kind().is_cancellation();

        for edge in self.topology.outgoing(device) {
            let description = event.description().to_string();
            let entry = if cancellation {
                TranscriptEntry::SentCancellation {
                    time,
                    device,
                    to: edge.to,
                    description,
                }
            } else {
                TranscriptEntry::SentAlert {
                    time,
                    device,
                    to: edge.to,
                    description,
                }
            };
            self.transcript.push(entry);

            let arrival = time.saturating_add(edge.delay);
            let key = self.scheduler.push(event.forwarded(edge.to, arrival));
            trace!(from = device, to = edge.to, arrival, sequence = key.sequence, "Enqueued");
        }
    }

    fn require_source(event: &Event) -> Result<DeviceId, SimulationError> {
        event.source().ok_or_else(|| {
            SimulationError::InvariantViolation(format!(
                "{} at device #{} (time {}) has no source",
                event.kind(),
                event.device(),
                event.time()
            ))
        })
    }
}

/// Build an engine for `config` and run it to completion
pub fn run_simulation(config: SimulationConfig) -> Result<Transcript, SimulationError> {
    Engine::new(config)?.run()
}
