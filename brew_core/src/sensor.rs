//! The pH sensor reader: input binding, fault tracking, calibration dispatch.

use std::sync::Arc;

use brew_traits::{AnalogPin, OneWireBus};
use tracing::{debug, error, info};

use crate::builder::PhSensorBuilder;
use crate::calibration::{CalibrationRegistry, SamplingPolicy};
use crate::error::{CalibrationError, SensorError};
use crate::fixed_point::Fixed;
use crate::hw_error::{InputKind, map_hw_error};
use crate::status::{FaultState, StatusSnapshot};

pub const DEFAULT_NAME: &str = "pH Sensor";

/// Where a sensor takes its raw value from. At most one input is bound.
pub enum Source {
    Unbound,
    Analog {
        pin: u32,
        input: Box<dyn AnalogPin + Send>,
    },
    /// Reads `<address>/volt.<offset>` from the attached bus.
    Bus { address: String, offset: String },
}

impl core::fmt::Debug for Source {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Source::Unbound => f.write_str("Unbound"),
            Source::Analog { pin, .. } => f.debug_struct("Analog").field("pin", pin).finish(),
            Source::Bus { address, offset } => f
                .debug_struct("Bus")
                .field("address", address)
                .field("offset", offset)
                .finish(),
        }
    }
}

pub struct PhSensorReader {
    pub(crate) name: String,
    pub(crate) model: String,
    pub(crate) last_reading: Fixed,
    pub(crate) calibration_offset: Fixed,
    pub(crate) state: FaultState,
    pub(crate) source: Source,
    /// Read path for `Source::Bus`, reset hook for every source.
    pub(crate) bus: Option<Arc<dyn OneWireBus>>,
    pub(crate) registry: Arc<CalibrationRegistry>,
    pub(crate) sampling: SamplingPolicy,
}

impl core::fmt::Debug for PhSensorReader {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PhSensorReader")
            .field("name", &self.name)
            .field("model", &self.model)
            .field("last_reading", &self.last_reading)
            .field("calibration_offset", &self.calibration_offset)
            .field("state", &self.state)
            .field("source", &self.source)
            .finish()
    }
}

impl PhSensorReader {
    pub fn builder() -> PhSensorBuilder {
        PhSensorBuilder::default()
    }

    /// A sensor with no input; every update yields sentinel-zero.
    pub fn blank() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            model: String::new(),
            last_reading: Fixed::ZERO,
            calibration_offset: Fixed::ZERO,
            state: FaultState::Ok,
            source: Source::Unbound,
            bus: None,
            registry: CalibrationRegistry::builtin(),
            sampling: SamplingPolicy::default(),
        }
    }

    /// Bind to an analog pin, opening it through `open`.
    ///
    /// Any failure to open the pin in analog-input mode is reported as
    /// `SensorError::InvalidPin`.
    pub fn from_analog_pin<P, E, F>(pin: u32, open: F) -> Result<Self, SensorError>
    where
        P: AnalogPin + Send + 'static,
        E: std::error::Error + 'static,
        F: FnOnce(u32) -> Result<P, E>,
    {
        let input = open(pin).map_err(|e| match map_hw_error(&e, InputKind::Analog) {
            invalid @ SensorError::InvalidPin(_) => invalid,
            other => SensorError::InvalidPin(format!("pin {pin}: {other}")),
        })?;
        Ok(Self {
            source: Source::Analog {
                pin,
                input: Box::new(input),
            },
            ..Self::blank()
        })
    }

    /// Attach the one-wire bus whose reset hook runs when this sensor faults.
    ///
    /// For bus-bound sensors this also replaces the read path.
    pub fn with_reset_bus(mut self, bus: Arc<dyn OneWireBus>) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Bind to a one-wire device channel. Nothing is validated up front; the
    /// bus may come online later.
    pub fn from_bus_address(
        address: impl Into<String>,
        offset: impl Into<String>,
        bus: Arc<dyn OneWireBus>,
    ) -> Self {
        Self {
            source: Source::Bus {
                address: address.into(),
                offset: offset.into(),
            },
            bus: Some(bus),
            ..Self::blank()
        }
    }

    /// Sample the bound input.
    ///
    /// On success the value is stored and returned. On failure the previous
    /// reading is kept and sentinel-zero is returned; the first failure of a
    /// run logs once and resets the bus, the first success after it logs the
    /// recovery. Unbound sensors return zero without touching any state.
    pub fn update_reading(&mut self) -> Fixed {
        let (kind, result) = match &mut self.source {
            Source::Unbound => return Fixed::ZERO,
            Source::Analog { input, .. } => (InputKind::Analog, read_analog(input.as_mut())),
            Source::Bus { address, offset } => {
                let path = format!("{address}/volt.{offset}");
                (InputKind::Bus, read_bus(self.bus.as_deref(), &path))
            }
        };

        match result {
            Ok(v) => {
                debug!(sensor = %self.name, reading = %v, "pH input sampled");
                self.last_reading = v;
                if self.state == FaultState::Faulted {
                    info!(sensor = %self.name, "pH reading recovered");
                    self.state = FaultState::Ok;
                }
                v
            }
            Err(e) => {
                if self.state == FaultState::Ok {
                    error!(
                        sensor = %self.name,
                        input = kind.as_str(),
                        error = %e,
                        "pH reading failed; suppressing further errors until recovery"
                    );
                    if let Some(bus) = &self.bus {
                        info!(sensor = %self.name, "reconnecting one-wire bus");
                        bus.reset();
                    }
                    self.state = FaultState::Faulted;
                }
                Fixed::ZERO
            }
        }
    }

    /// pH according to the formula registered for the current model.
    ///
    /// `Ok(None)` means no formula matches the model (uncalibrated).
    pub fn ph_value(&mut self) -> Result<Option<Fixed>, CalibrationError> {
        let Some(formula) = self.registry.lookup(&self.model) else {
            debug!(sensor = %self.name, model = %self.model, "no calibration for model");
            return Ok(None);
        };
        formula(self).map(Some)
    }

    /// Models with a registered formula, in registration order.
    pub fn available_models(&self) -> Vec<&str> {
        self.registry.models().collect()
    }

    pub fn status_snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            reading: self.last_reading,
            name: self.name.clone(),
            model: self.model.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), SensorError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SensorError::Config("sensor name must not be empty".into()));
        }
        self.name = name;
        Ok(())
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Empty clears the model, leaving the sensor uncalibrated.
    pub fn set_model(&mut self, model: impl Into<String>) {
        self.model = model.into();
    }

    pub fn calibration_offset(&self) -> Fixed {
        self.calibration_offset
    }

    pub fn set_calibration_offset(&mut self, offset: Fixed) {
        self.calibration_offset = offset;
    }

    pub fn last_reading(&self) -> Fixed {
        self.last_reading
    }

    pub fn fault_state(&self) -> FaultState {
        self.state
    }

    pub fn is_faulted(&self) -> bool {
        self.state == FaultState::Faulted
    }

    pub fn sampling_policy(&self) -> SamplingPolicy {
        self.sampling
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn analog_pin(&self) -> Option<u32> {
        match self.source {
            Source::Analog { pin, .. } => Some(pin),
            _ => None,
        }
    }

    /// Pin number as text for form fields; empty when not pin-bound.
    pub fn analog_pin_text(&self) -> String {
        self.analog_pin().map(|p| p.to_string()).unwrap_or_default()
    }

    pub fn bus_address(&self) -> Option<&str> {
        match &self.source {
            Source::Bus { address, .. } => Some(address),
            _ => None,
        }
    }

    pub fn bus_offset(&self) -> Option<&str> {
        match &self.source {
            Source::Bus { offset, .. } => Some(offset),
            _ => None,
        }
    }
}

fn read_analog(input: &mut (dyn AnalogPin + Send)) -> Result<Fixed, SensorError> {
    let raw = input
        .read_value()
        .map_err(|e| map_hw_error(e.as_ref(), InputKind::Analog))?;
    Fixed::from_int(i64::from(raw))
        .ok_or_else(|| SensorError::PinRead(format!("raw value {raw} out of range")))
}

fn read_bus(bus: Option<&dyn OneWireBus>, path: &str) -> Result<Fixed, SensorError> {
    let bus = bus.ok_or_else(|| SensorError::BusRead("no one-wire bus attached".into()))?;
    let text = bus
        .read_path(path)
        .map_err(|e| map_hw_error(e.as_ref(), InputKind::Bus))?;
    text.parse::<Fixed>()
        .map_err(|e| SensorError::BusRead(format!("{path}: {e}")))
}
