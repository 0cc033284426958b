#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas for the brewery controller.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - Every `[[sensors]]` entry binds exactly one input: an analog pin, or a
//!   one-wire bus address + offset pair.
use std::collections::HashSet;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Owfs {
    /// OWFS FUSE mount point
    pub mount: String,
}

impl Default for Owfs {
    fn default() -> Self {
        Self {
            mount: "/mnt/1wire".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Analog {
    /// IIO device directory holding `in_voltage<N>_raw` channels
    pub iio_root: String,
}

impl Default for Analog {
    fn default() -> Self {
        Self {
            iio_root: "/sys/bus/iio/devices/iio:device0".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Poll {
    /// Interval between reading updates (ms)
    pub interval_ms: u64,
}

impl Default for Poll {
    fn default() -> Self {
        Self { interval_ms: 5000 }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CalibrationCfg {
    /// Non-zero samples averaged per pH calculation
    pub samples: u32,
    /// Upper bound on reads per calculation, zero readings included
    pub max_attempts: u32,
}

impl Default for CalibrationCfg {
    fn default() -> Self {
        Self {
            samples: 4,
            max_attempts: 12,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

/// Largest accepted |calibration_offset|: the width of the pH scale.
pub const MAX_CALIBRATION_OFFSET: f64 = 14.0;

fn default_sensor_name() -> String {
    "pH Sensor".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct SensorCfg {
    #[serde(default = "default_sensor_name")]
    pub name: String,
    /// Calibration model key, e.g. "SEN0161". Empty = uncalibrated.
    #[serde(default, alias = "type")]
    pub model: String,
    /// Additive pH correction
    #[serde(default)]
    pub calibration_offset: f64,
    pub analog_pin: Option<u32>,
    /// One-wire device address, e.g. "20.1A2B3C000000"
    pub bus_address: Option<String>,
    /// Channel letter on the device, e.g. "A"
    pub bus_offset: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FermentStepCfg {
    /// "Primary" | "Secondary" | "Clearing" | "Ageing"
    #[serde(rename = "type")]
    pub kind: String,
    /// Duration in days
    pub time: i32,
    pub temp: f64,
    /// "C" or "F"
    #[serde(default = "default_temp_unit")]
    pub temp_unit: String,
}

fn default_temp_unit() -> String {
    "C".to_string()
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub owfs: Owfs,
    pub analog: Analog,
    pub poll: Poll,
    pub calibration: CalibrationCfg,
    pub logging: Logging,
    pub sensors: Vec<SensorCfg>,
    /// Fermentation schedule
    pub ferment: Vec<FermentStepCfg>,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Poll
        if self.poll.interval_ms == 0 {
            eyre::bail!("poll.interval_ms must be >= 1");
        }
        if self.poll.interval_ms > 24 * 60 * 60 * 1000 {
            eyre::bail!("poll.interval_ms is unreasonably large (>24h)");
        }

        // Calibration sampling
        if self.calibration.samples == 0 {
            eyre::bail!("calibration.samples must be >= 1");
        }
        if self.calibration.max_attempts < self.calibration.samples {
            eyre::bail!("calibration.max_attempts must be >= calibration.samples");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly, got {rot:?}");
        }

        // Sensors
        let mut seen = HashSet::new();
        for (i, s) in self.sensors.iter().enumerate() {
            if s.name.trim().is_empty() {
                eyre::bail!("sensors[{i}].name must not be empty");
            }
            if !seen.insert(s.name.as_str()) {
                eyre::bail!("sensors[{i}].name {:?} is duplicated", s.name);
            }
            if !s.calibration_offset.is_finite() {
                eyre::bail!("sensors[{i}].calibration_offset must be finite");
            }
            if s.calibration_offset.abs() > MAX_CALIBRATION_OFFSET {
                eyre::bail!(
                    "sensors[{i}].calibration_offset must be within ±{MAX_CALIBRATION_OFFSET} pH"
                );
            }
            let has_bus = match (&s.bus_address, &s.bus_offset) {
                (None, None) => false,
                (Some(a), Some(o)) => {
                    if a.is_empty() || o.is_empty() {
                        eyre::bail!("sensors[{i}] bus_address and bus_offset must not be empty");
                    }
                    true
                }
                _ => eyre::bail!("sensors[{i}] bus_address and bus_offset must be set together"),
            };
            if has_bus && s.analog_pin.is_some() {
                eyre::bail!("sensors[{i}] binds both analog_pin and bus_address; pick one");
            }
        }

        // Fermentation
        for (i, f) in self.ferment.iter().enumerate() {
            if !f.temp_unit.eq_ignore_ascii_case("C") && !f.temp_unit.eq_ignore_ascii_case("F") {
                eyre::bail!("ferment[{i}].temp_unit must be C or F");
            }
            if f.time < 0 {
                eyre::bail!("ferment[{i}].time must be >= 0");
            }
            if !f.temp.is_finite() {
                eyre::bail!("ferment[{i}].temp must be finite");
            }
        }

        Ok(())
    }
}
