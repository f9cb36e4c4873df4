//! Cancellation ledger
//!
//! Records, per device, the earliest time that device learned a given
//! message had been cancelled. The engine consults it to decide whether a
//! device still forwards alerts and cancellations for that message.
//!
//! # Critical Invariants
//!
//! - **Monotonic**: a stored time only ever decreases; learning of a
//!   cancellation later never overwrites an earlier learn time
//! - **Strict suppression**: knowledge recorded at exactly `t` does not count
//!   as known before `t`

use super::DeviceId;
use crate::core::time::SimTime;
use std::collections::HashMap;

/// device → description → earliest known cancellation time
#[derive(Debug, Clone, Default)]
pub struct CancellationLedger {
    entries: HashMap<DeviceId, HashMap<String, SimTime>>,
}

impl CancellationLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `device` knows `description` is cancelled as of `time`
    ///
    /// Keeps the minimum of the stored time and `time`.
    ///
    /// # Example
    /// ```
    /// use alert_propagation_core::models::CancellationLedger;
    ///
    /// let mut ledger = CancellationLedger::new();
    /// ledger.record(1, "fire", 10);
    /// ledger.record(1, "fire", 20);
    /// assert_eq!(ledger.learned_at(1, "fire"), Some(10));
    ///
    /// ledger.record(1, "fire", 4);
    /// assert_eq!(ledger.learned_at(1, "fire"), Some(4));
    /// ```
    pub fn record(&mut self, device: DeviceId, description: &str, time: SimTime) {
        let known = self.entries.entry(device).or_default();
        match known.get_mut(description) {
            Some(stored) => *stored = (*stored).min(time),
            None => {
                known.insert(description.to_string(), time);
            }
        }
    }

    /// Whether `device` knew of the cancellation strictly before `time`
    ///
    /// # Example
    /// ```
    /// use alert_propagation_core::models::CancellationLedger;
    ///
    /// let mut ledger = CancellationLedger::new();
    /// ledger.record(1, "fire", 5);
    /// assert!(!ledger.known_before(1, "fire", 5));
    /// assert!(ledger.known_before(1, "fire", 6));
    /// assert!(!ledger.known_before(2, "fire", 6));
    /// ```
    pub fn known_before(&self, device: DeviceId, description: &str, time: SimTime) -> bool {
        self.learned_at(device, description)
            .is_some_and(|learned| learned < time)
    }

    /// Earliest time `device` is known to have learned of the cancellation
    pub fn learned_at(&self, device: DeviceId, description: &str) -> Option<SimTime> {
        self.entries
            .get(&device)
            .and_then(|known| known.get(description))
            .copied()
    }

    /// Devices that know `description` is cancelled, ascending
    pub fn devices_aware_of(&self, description: &str) -> Vec<DeviceId> {
        let mut devices: Vec<DeviceId> = self
            .entries
            .iter()
            .filter(|(_, known)| known.contains_key(description))
            .map(|(device, _)| *device)
            .collect();
        devices.sort_unstable();
        devices
    }

    /// Number of (device, description) pairs recorded
    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
