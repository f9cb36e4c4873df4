//! Scenario text → `SimulationConfig`

use super::ScenarioError;
use crate::core::time::SimTime;
use crate::models::{DeviceId, Event, Topology};
use crate::orchestrator::SimulationConfig;
use std::io::ErrorKind;
use std::path::Path;
use std::str::SplitWhitespace;
use tracing::debug;

/// Read and parse the scenario at `path`
///
/// A missing file is reported as [`ScenarioError::NotFound`] so callers can
/// tell it apart from a malformed one.
pub fn load_scenario(path: impl AsRef<Path>) -> Result<SimulationConfig, ScenarioError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            ScenarioError::NotFound(path.to_path_buf())
        } else {
            ScenarioError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    debug!(path = %path.display(), bytes = text.len(), "Loaded scenario");
    parse_scenario(&text)
}

/// Parse scenario text
///
/// # Example
/// ```
/// use alert_propagation_core::scenario::parse_scenario;
///
/// let config = parse_scenario("LENGTH 100\nPROPAGATE 1 2 3\nALERT 1 fire 0\n").unwrap();
/// assert_eq!(config.horizon, 100);
/// assert_eq!(config.topology.outgoing(1)[0].delay, 3);
/// assert_eq!(config.initial_events.len(), 1);
/// ```
pub fn parse_scenario(text: &str) -> Result<SimulationConfig, ScenarioError> {
    let mut horizon: Option<SimTime> = None;
    let mut topology = Topology::new();
    let mut initial_events = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let Some(tag) = tokens.next() else {
            continue;
        };
        let number = index + 1;

        match tag {
            "LENGTH" => {
                let mut d = Directive::new(number, "LENGTH", tokens);
                horizon = Some(d.integer("length")?);
            }
            "DEVICE" => {
                let mut d = Directive::new(number, "DEVICE", tokens);
                topology.add_device(d.integer("device")?);
            }
            "PROPAGATE" => {
                let mut d = Directive::new(number, "PROPAGATE", tokens);
                let from: DeviceId = d.integer("source device")?;
                let to: DeviceId = d.integer("destination device")?;
                let delay: SimTime = d.integer("delay")?;
                if delay < 0 {
                    return Err(ScenarioError::NegativeDelay {
                        line: number,
                        delay,
                    });
                }
                topology.add_edge(from, to, delay);
            }
            "ALERT" => {
                let mut d = Directive::new(number, "ALERT", tokens);
                let (device, description, time) = d.message()?;
                initial_events.push(Event::originate_alert(device, description, time));
            }
            "CANCEL" => {
                let mut d = Directive::new(number, "CANCEL", tokens);
                let (device, description, time) = d.message()?;
                initial_events.push(Event::originate_cancel(device, description, time));
            }
            other => {
                return Err(ScenarioError::UnknownDirective {
                    line: number,
                    directive: other.to_string(),
                })
            }
        }
    }

    let horizon = horizon.ok_or(ScenarioError::MissingHorizon)?;
    if horizon < 0 {
        return Err(ScenarioError::NegativeHorizon(horizon));
    }

    Ok(SimulationConfig {
        horizon,
        topology,
        initial_events,
    })
}

/// Remaining tokens of one directive line
struct Directive<'a> {
    line: usize,
    name: &'static str,
    tokens: SplitWhitespace<'a>,
}

impl<'a> Directive<'a> {
    fn new(line: usize, name: &'static str, tokens: SplitWhitespace<'a>) -> Self {
        Self { line, name, tokens }
    }

    fn token(&mut self, field: &'static str) -> Result<&'a str, ScenarioError> {
        self.tokens.next().ok_or(ScenarioError::MissingField {
            line: self.line,
            directive: self.name,
            field,
        })
    }

    fn integer(&mut self, field: &'static str) -> Result<i64, ScenarioError> {
        let value = self.token(field)?;
        value.parse().map_err(|_| ScenarioError::InvalidInteger {
            line: self.line,
            field,
            value: value.to_string(),
        })
    }

    /// `<device> <description> <time>`, shared by ALERT and CANCEL
    fn message(&mut self) -> Result<(DeviceId, &'a str, SimTime), ScenarioError> {
        let device = self.integer("device")?;
        let description = self.token("description")?;
        let time = self.integer("time")?;
        Ok((device, description, time))
    }
}
