//! Sensor assembly: config → opened inputs → `PhSensorReader`s.
//!
//! With the `hardware` feature inputs are sysfs ADC channels and the OWFS
//! mount; otherwise they are simulated, scripted through
//! `BREWCTL_SIM_COUNTS` (analog, comma separated, `x` = failed read) and
//! `BREWCTL_SIM_VOLTS` (bus).

use std::sync::Arc;

use brew_core::hw_error::{InputKind, map_hw_error};
use brew_core::{Binding, PhSensorReader, SamplingPolicy, SensorSettings};
use brew_traits::{AnalogPin, OneWireBus};
use eyre::WrapErr;

pub fn make_bus(cfg: &brew_config::Config) -> Arc<dyn OneWireBus> {
    #[cfg(feature = "hardware")]
    {
        Arc::new(brew_hardware::OwfsBus::new(&cfg.owfs.mount))
    }
    #[cfg(not(feature = "hardware"))]
    {
        let bus = brew_hardware::SimulatedBus::new();
        let volts = std::env::var("BREWCTL_SIM_VOLTS").unwrap_or_else(|_| "2.5".to_string());
        for s in &cfg.sensors {
            if let (Some(address), Some(offset)) = (&s.bus_address, &s.bus_offset) {
                let path = format!("{address}/volt.{offset}");
                for v in volts.split(',') {
                    let v = v.trim();
                    if v == "x" {
                        bus.push(&path, Err("simulated bus failure"));
                    } else {
                        bus.push(&path, Ok(v));
                    }
                }
            }
        }
        Arc::new(bus)
    }
}

#[cfg(feature = "hardware")]
fn open_pin(cfg: &brew_config::Config, pin: u32) -> eyre::Result<Box<dyn AnalogPin + Send>> {
    let p = brew_hardware::SysfsAnalogPin::open(&cfg.analog.iio_root, pin)
        .map_err(|e| map_hw_error(&e, InputKind::Analog))
        .wrap_err_with(|| format!("open analog pin {pin}"))?;
    Ok(Box::new(p))
}

#[cfg(not(feature = "hardware"))]
fn open_pin(_cfg: &brew_config::Config, pin: u32) -> eyre::Result<Box<dyn AnalogPin + Send>> {
    let Ok(counts) = std::env::var("BREWCTL_SIM_COUNTS") else {
        return Ok(Box::new(brew_hardware::SimulatedAnalogPin::new(612)));
    };
    let mut script = Vec::new();
    for tok in counts.split(',').map(str::trim) {
        if tok == "x" {
            script.push(None);
        } else {
            let v = tok
                .parse::<i32>()
                .map_err(|e| {
                    map_hw_error(&std::io::Error::other(format!("{tok:?}: {e}")), InputKind::Analog)
                })
                .wrap_err_with(|| format!("open analog pin {pin}: bad BREWCTL_SIM_COUNTS"))?;
            script.push(Some(v));
        }
    }
    let base = script.iter().rev().find_map(|v| *v).unwrap_or(0);
    Ok(Box::new(brew_hardware::SimulatedAnalogPin::scripted(script, base)))
}

/// Build the reader for one configured sensor.
pub fn open_sensor(
    cfg: &brew_config::Config,
    settings: &SensorSettings,
    bus: &Arc<dyn OneWireBus>,
) -> eyre::Result<PhSensorReader> {
    let mut builder = PhSensorReader::builder()
        .name(settings.name.clone())
        .model(settings.model.clone())
        .calibration_offset(settings.calibration_offset)
        .with_sampling(SamplingPolicy::from(&cfg.calibration))
        .with_bus(Arc::clone(bus));
    builder = match &settings.binding {
        Binding::None => builder,
        Binding::Analog(pin) => builder.analog_pin(*pin, open_pin(cfg, *pin)?),
        Binding::Bus { address, offset } => builder.bus_device(address.clone(), offset.clone()),
    };
    builder
        .try_build()
        .wrap_err_with(|| format!("build sensor {:?}", settings.name))
}

pub fn open_all(cfg: &brew_config::Config) -> eyre::Result<Vec<PhSensorReader>> {
    let bus = make_bus(cfg);
    cfg.sensors
        .iter()
        .map(|s| {
            let settings = SensorSettings::try_from(s)?;
            open_sensor(cfg, &settings, &bus)
        })
        .collect()
}
