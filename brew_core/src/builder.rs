//! Builder for `PhSensorReader`.
//!
//! `try_build()` rejects conflicting inputs: a sensor reads either an analog
//! pin or a one-wire bus channel, never both.

use std::sync::Arc;

use brew_traits::{AnalogPin, OneWireBus};

use crate::calibration::{CalibrationRegistry, SamplingPolicy};
use crate::error::{BuildError, Result};
use crate::fixed_point::Fixed;
use crate::sensor::{DEFAULT_NAME, PhSensorReader, Source};

#[derive(Default)]
pub struct PhSensorBuilder {
    name: Option<String>,
    model: Option<String>,
    calibration_offset: Option<Fixed>,
    analog: Option<(u32, Box<dyn AnalogPin + Send>)>,
    bus_device: Option<(String, String)>,
    bus: Option<Arc<dyn OneWireBus>>,
    registry: Option<Arc<CalibrationRegistry>>,
    sampling: Option<SamplingPolicy>,
}

impl PhSensorBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn calibration_offset(mut self, offset: Fixed) -> Self {
        self.calibration_offset = Some(offset);
        self
    }

    /// Read from an already opened analog input.
    pub fn analog_pin(mut self, pin: u32, input: impl AnalogPin + Send + 'static) -> Self {
        self.analog = Some((pin, Box::new(input)));
        self
    }

    /// Read `<address>/volt.<offset>` from the bus given to `with_bus`.
    pub fn bus_device(mut self, address: impl Into<String>, offset: impl Into<String>) -> Self {
        self.bus_device = Some((address.into(), offset.into()));
        self
    }

    /// Attach the one-wire bus. Also used as the reset hook for analog inputs.
    pub fn with_bus(mut self, bus: Arc<dyn OneWireBus>) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn with_registry(mut self, registry: Arc<CalibrationRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_sampling(mut self, sampling: SamplingPolicy) -> Self {
        self.sampling = Some(sampling);
        self
    }

    pub fn try_build(self) -> Result<PhSensorReader> {
        let name = self.name.unwrap_or_else(|| DEFAULT_NAME.to_string());
        if name.trim().is_empty() {
            return Err(eyre::Report::new(BuildError::EmptyName));
        }

        let source = match (self.analog, self.bus_device) {
            (Some(_), Some(_)) => return Err(eyre::Report::new(BuildError::ConflictingSources)),
            (Some((pin, input)), None) => Source::Analog { pin, input },
            (None, Some((address, offset))) => {
                if address.is_empty() || offset.is_empty() {
                    return Err(eyre::Report::new(BuildError::EmptyBusAddress));
                }
                if self.bus.is_none() {
                    return Err(eyre::Report::new(BuildError::MissingBus));
                }
                Source::Bus { address, offset }
            }
            (None, None) => Source::Unbound,
        };

        let mut reader = PhSensorReader::blank();
        reader.name = name;
        reader.model = self.model.unwrap_or_default();
        reader.calibration_offset = self.calibration_offset.unwrap_or(Fixed::ZERO);
        reader.source = source;
        reader.bus = self.bus;
        if let Some(registry) = self.registry {
            reader.registry = registry;
        }
        if let Some(sampling) = self.sampling {
            reader.sampling = sampling;
        }
        Ok(reader)
    }
}
