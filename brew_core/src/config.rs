//! Runtime configuration types.
//!
//! These are the structs the core works with; the TOML schema lives in
//! `brew_config` and is mapped over in `conversions`.

use std::time::Duration;

use crate::fixed_point::Fixed;
use crate::sensor::DEFAULT_NAME;

/// Which input a configured sensor reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    None,
    Analog(u32),
    Bus { address: String, offset: String },
}

/// Identity and calibration of one configured sensor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorSettings {
    pub name: String,
    pub model: String,
    pub calibration_offset: Fixed,
    pub binding: Binding,
}

impl Default for SensorSettings {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            model: String::new(),
            calibration_offset: Fixed::ZERO,
            binding: Binding::None,
        }
    }
}

/// Polling cadence.
#[derive(Debug, Clone)]
pub struct PollCfg {
    pub interval: Duration,
}

impl Default for PollCfg {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
        }
    }
}
