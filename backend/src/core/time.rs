//! Time management for the simulation
//!
//! Simulated time is a signed integer. Events may be scheduled at zero or at
//! negative times; the only bound is the exclusive horizon at which the run
//! ends. This module tracks the time of the event currently being processed
//! and guarantees it never moves backwards.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A point in simulated time.
pub type SimTime = i64;

/// Errors raised by the simulation clock
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClockError {
    #[error("Clock regression: cannot move from {from} back to {to}")]
    Regression { from: SimTime, to: SimTime },
}

/// Tracks the current simulated time against the run's horizon
///
/// # Example
/// ```
/// use alert_propagation_core::SimClock;
///
/// let mut clock = SimClock::new(100);
/// assert_eq!(clock.current_time(), None);
///
/// clock.advance_to(3).unwrap();
/// assert_eq!(clock.current_time(), Some(3));
/// assert!(!clock.is_beyond_horizon(99));
/// assert!(clock.is_beyond_horizon(100));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimClock {
    /// Time of the most recently processed event, if any
    current: Option<SimTime>,
    /// Exclusive end of the simulation
    horizon: SimTime,
}

impl SimClock {
    /// Create a clock that has not observed any event yet
    ///
    /// # Arguments
    /// * `horizon` - Exclusive upper bound of the simulation
    pub fn new(horizon: SimTime) -> Self {
        Self {
            current: None,
            horizon,
        }
    }

    /// Move the clock to `time`
    ///
    /// Staying at the same time is allowed (simultaneous events). Moving
    /// backwards is an error.
    ///
    /// # Example
    /// ```
    /// use alert_propagation_core::SimClock;
    ///
    /// let mut clock = SimClock::new(10);
    /// clock.advance_to(5).unwrap();
    /// clock.advance_to(5).unwrap();
    /// assert!(clock.advance_to(4).is_err());
    /// ```
    pub fn advance_to(&mut self, time: SimTime) -> Result<(), ClockError> {
        if let Some(current) = self.current {
            if time < current {
                return Err(ClockError::Regression {
                    from: current,
                    to: time,
                });
            }
        }
        self.current = Some(time);
        Ok(())
    }

    /// Time of the event most recently processed
    pub fn current_time(&self) -> Option<SimTime> {
        self.current
    }

    /// Exclusive end of the simulation
    pub fn horizon(&self) -> SimTime {
        self.horizon
    }

    /// Whether an event at `time` falls at or after the horizon
    pub fn is_beyond_horizon(&self, time: SimTime) -> bool {
        time >= self.horizon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_times_are_ordinary() {
        let mut clock = SimClock::new(0);
        clock.advance_to(-10).unwrap();
        clock.advance_to(-1).unwrap();
        assert_eq!(clock.current_time(), Some(-1));
        assert!(!clock.is_beyond_horizon(-1));
        assert!(clock.is_beyond_horizon(0));
    }

    #[test]
    fn test_regression_reports_both_times() {
        let mut clock = SimClock::new(50);
        clock.advance_to(7).unwrap();

        let err = clock.advance_to(6).unwrap_err();
        assert_eq!(err, ClockError::Regression { from: 7, to: 6 });
        // Failed advance leaves the clock untouched
        assert_eq!(clock.current_time(), Some(7));
    }
}
