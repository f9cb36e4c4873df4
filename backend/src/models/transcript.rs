//! Output transcript of a simulation run.
//!
//! Every observable side effect of the engine is recorded as a
//! [`TranscriptEntry`], in the order it happened. Rendering an entry with
//! `Display` yields the line printed for it:
//!
//! ```text
//! @0: #1 SENT ALERT TO #2: fire
//! @3: #2 RECEIVED ALERT FROM #1: fire
//! @100: END
//! ```
//!
//! # Example
//!
//! ```rust
//! use alert_propagation_core::models::{Transcript, TranscriptEntry};
//!
//! let mut transcript = Transcript::new();
//! transcript.push(TranscriptEntry::SentAlert {
//!     time: 0,
//!     device: 1,
//!     to: 2,
//!     description: "fire".to_string(),
//! });
//! transcript.push(TranscriptEntry::End { time: 100 });
//!
//! assert_eq!(transcript.lines(), vec!["@0: #1 SENT ALERT TO #2: fire", "@100: END"]);
//! assert!(transcript.is_finished());
//! ```

use super::DeviceId;
use crate::core::time::SimTime;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// One line of the transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TranscriptEntry {
    /// `device` forwarded an alert along its edge to `to`
    SentAlert {
        time: SimTime,
        device: DeviceId,
        to: DeviceId,
        description: String,
    },

    /// `device` heard an alert from `source`
    ReceivedAlert {
        time: SimTime,
        device: DeviceId,
        source: DeviceId,
        description: String,
    },

    /// `device` forwarded a cancellation along its edge to `to`
    SentCancellation {
        time: SimTime,
        device: DeviceId,
        to: DeviceId,
        description: String,
    },

    /// `device` heard a cancellation from `source`
    ReceivedCancellation {
        time: SimTime,
        device: DeviceId,
        source: DeviceId,
        description: String,
    },

    /// Simulation reached its horizon (always the last entry)
    End { time: SimTime },
}

impl TranscriptEntry {
    /// Time the entry was recorded at
    pub fn time(&self) -> SimTime {
        match self {
            TranscriptEntry::SentAlert { time, .. } => *time,
            TranscriptEntry::ReceivedAlert { time, .. } => *time,
            TranscriptEntry::SentCancellation { time, .. } => *time,
            TranscriptEntry::ReceivedCancellation { time, .. } => *time,
            TranscriptEntry::End { time } => *time,
        }
    }

    /// Device the entry is about; `None` for the end marker
    pub fn device(&self) -> Option<DeviceId> {
        match self {
            TranscriptEntry::SentAlert { device, .. } => Some(*device),
            TranscriptEntry::ReceivedAlert { device, .. } => Some(*device),
            TranscriptEntry::SentCancellation { device, .. } => Some(*device),
            TranscriptEntry::ReceivedCancellation { device, .. } => Some(*device),
            TranscriptEntry::End { .. } => None,
        }
    }

    /// Message description; `None` for the end marker
    pub fn description(&self) -> Option<&str> {
        match self {
            TranscriptEntry::SentAlert { description, .. } => Some(description),
            TranscriptEntry::ReceivedAlert { description, .. } => Some(description),
            TranscriptEntry::SentCancellation { description, .. } => Some(description),
            TranscriptEntry::ReceivedCancellation { description, .. } => Some(description),
            TranscriptEntry::End { .. } => None,
        }
    }

    /// Whether this entry is a forward along an edge
    pub fn is_send(&self) -> bool {
        matches!(
            self,
            TranscriptEntry::SentAlert { .. } | TranscriptEntry::SentCancellation { .. }
        )
    }
}

impl fmt::Display for TranscriptEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranscriptEntry::SentAlert {
                time,
                device,
                to,
                description,
            } => write!(f, "@{time}: #{device} SENT ALERT TO #{to}: {description}"),
            TranscriptEntry::ReceivedAlert {
                time,
                device,
                source,
                description,
            } => write!(
                f,
                "@{time}: #{device} RECEIVED ALERT FROM #{source}: {description}"
            ),
            TranscriptEntry::SentCancellation {
                time,
                device,
                to,
                description,
            } => write!(
                f,
                "@{time}: #{device} SENT CANCELLATION TO #{to}: {description}"
            ),
            TranscriptEntry::ReceivedCancellation {
                time,
                device,
                source,
                description,
            } => write!(
                f,
                "@{time}: #{device} RECEIVED CANCELLATION FROM #{source}: {description}"
            ),
            TranscriptEntry::End { time } => write!(f, "@{time}: END"),
        }
    }
}

/// Append-only sequence of transcript entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    /// Create an empty transcript
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append an entry
    pub fn push(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, in order
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    /// Rendered lines, in order
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }

    /// Entries recorded at time `time`
    pub fn entries_at(&self, time: SimTime) -> Vec<&TranscriptEntry> {
        self.entries.iter().filter(|e| e.time() == time).collect()
    }

    /// Entries about device `device`
    pub fn entries_for_device(&self, device: DeviceId) -> Vec<&TranscriptEntry> {
        self.entries
            .iter()
            .filter(|e| e.device() == Some(device))
            .collect()
    }

    /// Whether the end marker has been appended
    pub fn is_finished(&self) -> bool {
        matches!(self.entries.last(), Some(TranscriptEntry::End { .. }))
    }

    /// SHA-256 (hex) of the rendered lines joined by newlines
    ///
    /// Two runs produced the same transcript iff their digests match.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                hasher.update(b"\n");
            }
            hasher.update(entry.to_string().as_bytes());
        }
        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sent(time: SimTime, device: DeviceId, to: DeviceId) -> TranscriptEntry {
        TranscriptEntry::SentCancellation {
            time,
            device,
            to,
            description: "x".to_string(),
        }
    }

    #[test]
    fn test_line_shapes() {
        let received_alert = TranscriptEntry::ReceivedAlert {
            time: 3,
            device: 2,
            source: 1,
            description: "fire".to_string(),
        };
        let received_cancel = TranscriptEntry::ReceivedCancellation {
            time: -4,
            device: 2,
            source: 1,
            description: "fire".to_string(),
        };

        assert_eq!(received_alert.to_string(), "@3: #2 RECEIVED ALERT FROM #1: fire");
        assert_eq!(
            received_cancel.to_string(),
            "@-4: #2 RECEIVED CANCELLATION FROM #1: fire"
        );
        assert_eq!(sent(1, 1, 2).to_string(), "@1: #1 SENT CANCELLATION TO #2: x");
        assert_eq!(TranscriptEntry::End { time: 100 }.to_string(), "@100: END");
    }

    #[test]
    fn test_queries() {
        let mut transcript = Transcript::new();
        transcript.push(sent(1, 1, 2));
        transcript.push(sent(1, 1, 3));
        transcript.push(sent(4, 2, 3));
        transcript.push(TranscriptEntry::End { time: 10 });

        assert_eq!(transcript.entries_at(1).len(), 2);
        assert_eq!(transcript.entries_for_device(1).len(), 2);
        assert_eq!(transcript.entries_for_device(3).len(), 0);
        assert!(transcript.is_finished());
    }

    #[test]
    fn test_digest_tracks_content() {
        let mut a = Transcript::new();
        a.push(sent(1, 1, 2));
        let mut b = a.clone();

        assert_eq!(a.digest(), b.digest());
        assert_eq!(a.digest().len(), 64);

        b.push(TranscriptEntry::End { time: 5 });
        assert_ne!(a.digest(), b.digest());
    }

    #[test]
    fn test_json_is_tagged_by_type() {
        let json = serde_json::to_value(TranscriptEntry::End { time: 7 }).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "end", "time": 7 }));
    }
}
