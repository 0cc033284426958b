//! Fault state and the status projection handed to reporting layers.

use serde::Serialize;

use crate::fixed_point::Fixed;

/// Per-sensor read health.
///
/// `Ok -> Faulted` on the first failed read, `Faulted -> Ok` on the first
/// success after that. Repeated outcomes leave the state (and the log) alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FaultState {
    #[default]
    Ok,
    Faulted,
}

/// Read-only view of a sensor for status documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    #[serde(rename = "phReading")]
    pub reading: Fixed,
    pub name: String,
    #[serde(rename = "deviceType")]
    pub model: String,
}
