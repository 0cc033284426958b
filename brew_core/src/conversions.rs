//! `From` implementations bridging `brew_config` types to `brew_core` types.

use std::time::Duration;

use crate::calibration::SamplingPolicy;
use crate::config::{Binding, PollCfg, SensorSettings};
use crate::error::SensorError;
use crate::ferment::{FermentKind, FermentStep, TempUnit, UnknownUnit};
use crate::fixed_point::Fixed;

// ── SensorSettings ───────────────────────────────────────────────────────────

impl TryFrom<&brew_config::SensorCfg> for SensorSettings {
    type Error = SensorError;

    fn try_from(c: &brew_config::SensorCfg) -> Result<Self, Self::Error> {
        // Analog wins if validation was skipped and both are present.
        let binding = match (c.analog_pin, &c.bus_address, &c.bus_offset) {
            (Some(pin), _, _) => Binding::Analog(pin),
            (None, Some(address), Some(offset)) => Binding::Bus {
                address: address.clone(),
                offset: offset.clone(),
            },
            _ => Binding::None,
        };
        let calibration_offset = Fixed::from_f64(c.calibration_offset).ok_or_else(|| {
            SensorError::Config(format!(
                "calibration_offset {} of sensor {:?} is out of range",
                c.calibration_offset, c.name
            ))
        })?;
        Ok(Self {
            name: c.name.clone(),
            model: c.model.clone(),
            calibration_offset,
            binding,
        })
    }
}

// ── SamplingPolicy ───────────────────────────────────────────────────────────

impl From<&brew_config::CalibrationCfg> for SamplingPolicy {
    fn from(c: &brew_config::CalibrationCfg) -> Self {
        Self {
            samples: c.samples,
            max_attempts: c.max_attempts,
        }
    }
}

// ── PollCfg ──────────────────────────────────────────────────────────────────

impl From<&brew_config::Poll> for PollCfg {
    fn from(c: &brew_config::Poll) -> Self {
        Self {
            interval: Duration::from_millis(c.interval_ms),
        }
    }
}

// ── FermentStep ──────────────────────────────────────────────────────────────

impl TryFrom<&brew_config::FermentStepCfg> for FermentStep {
    type Error = UnknownUnit;

    fn try_from(c: &brew_config::FermentStepCfg) -> Result<Self, Self::Error> {
        let unit: TempUnit = c.temp_unit.parse()?;
        Ok(FermentStep::new(
            FermentKind::from_name(&c.kind),
            c.time,
            c.temp,
            unit,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sensor_cfg_maps_bus_binding_and_offset() {
        let cfg = brew_config::load_toml(
            r#"
[[sensors]]
name = "Boil"
model = "sen0161"
bus_address = "20.1A2B3C000000"
bus_offset = "B"
calibration_offset = -0.12
"#,
        )
        .unwrap();
        let s = SensorSettings::try_from(&cfg.sensors[0]).unwrap();
        assert_eq!(s.name, "Boil");
        assert_eq!(s.calibration_offset, Fixed::from_micros(-120_000));
        assert_eq!(
            s.binding,
            Binding::Bus {
                address: "20.1A2B3C000000".into(),
                offset: "B".into()
            }
        );
    }

    #[test]
    fn ferment_cfg_maps_kind_and_unit() {
        let cfg = brew_config::load_toml(
            "[[ferment]]\ntype = \"secondary\"\ntime = 14\ntemp = 64.0\ntemp_unit = \"f\"\n",
        )
        .unwrap();
        let step = FermentStep::try_from(&cfg.ferment[0]).unwrap();
        assert_eq!(step.kind, FermentKind::Secondary);
        assert_eq!(step.unit, TempUnit::Fahrenheit);
        assert_eq!(step.time_days, 14);
    }

    #[test]
    fn offset_outside_fixed_range_is_an_error() {
        let cfg = brew_config::load_toml(
            "[[sensors]]\nanalog_pin = 0\ncalibration_offset = 1e13\n",
        )
        .unwrap();
        assert!(matches!(
            SensorSettings::try_from(&cfg.sensors[0]),
            Err(SensorError::Config(_))
        ));
    }
}
