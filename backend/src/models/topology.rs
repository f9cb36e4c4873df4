//! Propagation topology
//!
//! A directed multigraph: each device owns an ordered list of outgoing edges,
//! and each edge carries the delay a message needs to cross it. Edge order is
//! the order the edges were declared in, which is also the order messages are
//! sent along them.

use super::DeviceId;
use crate::core::time::SimTime;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A directed, delayed link to a downstream device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub to: DeviceId,
    pub delay: SimTime,
}

/// Device → outgoing edges
///
/// # Example
/// ```
/// use alert_propagation_core::models::Topology;
///
/// let mut topology = Topology::new();
/// topology.add_edge(1, 2, 3);
/// topology.add_edge(1, 3, 0);
///
/// let targets: Vec<i64> = topology.outgoing(1).iter().map(|e| e.to).collect();
/// assert_eq!(targets, vec![2, 3]);
/// assert!(topology.outgoing(2).is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    devices: BTreeSet<DeviceId>,
    edges: BTreeMap<DeviceId, Vec<Edge>>,
}

impl Topology {
    /// Create an empty topology
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a device with no outgoing edges of its own
    pub fn add_device(&mut self, device: DeviceId) {
        self.devices.insert(device);
    }

    /// Append an edge; both endpoints become declared devices
    ///
    /// Parallel edges are kept: declaring `1 → 2` twice sends two messages.
    pub fn add_edge(&mut self, from: DeviceId, to: DeviceId, delay: SimTime) {
        self.devices.insert(from);
        self.devices.insert(to);
        self.edges.entry(from).or_default().push(Edge { to, delay });
    }

    /// Outgoing edges of `device`, in declaration order
    pub fn outgoing(&self, device: DeviceId) -> &[Edge] {
        self.edges.get(&device).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All declared devices, ascending
    pub fn devices(&self) -> impl Iterator<Item = DeviceId> + '_ {
        self.devices.iter().copied()
    }

    /// Whether `device` has been declared
    pub fn contains(&self, device: DeviceId) -> bool {
        self.devices.contains(&device)
    }

    /// Total number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    /// Every edge as `(from, edge)`
    pub fn edges(&self) -> impl Iterator<Item = (DeviceId, &Edge)> + '_ {
        self.edges
            .iter()
            .flat_map(|(from, edges)| edges.iter().map(move |edge| (*from, edge)))
    }
}
