//! Human-readable error descriptions and structured JSON error formatting.

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    use brew_core::error::{BuildError, CalibrationError, SensorError};

    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::ConflictingSources => {
                "What happened: A sensor binds both an analog pin and a bus address.\nLikely causes: Both analog_pin and bus_address are set in one [[sensors]] entry.\nHow to fix: Keep exactly one input per sensor.".to_string()
            }
            BuildError::MissingBus | BuildError::EmptyBusAddress => format!(
                "What happened: Bus sensor is incomplete ({be}).\nLikely causes: Missing or empty bus_address/bus_offset.\nHow to fix: Set both bus_address and bus_offset for the sensor."
            ),
            BuildError::EmptyName => {
                "What happened: A sensor has an empty name.\nLikely causes: name = \"\" in the config.\nHow to fix: Give every sensor a non-empty, unique name.".to_string()
            }
        };
    }

    if let Some(se) = err.downcast_ref::<SensorError>() {
        return match se {
            SensorError::InvalidPin(msg) => format!(
                "What happened: Could not open the analog pin ({msg}).\nLikely causes: Wrong pin number, ADC overlay not loaded, or insufficient permissions.\nHow to fix: Check analog_pin and [analog].iio_root in the config and that the channel file exists."
            ),
            SensorError::Config(msg) => format!(
                "What happened: Sensor settings are invalid ({msg}).\nLikely causes: Out-of-range value in a [[sensors]] entry.\nHow to fix: Correct the entry in the config file."
            ),
            other => format!(
                "What happened: {other}.\nLikely causes: Sensor disconnected or bus offline.\nHow to fix: Check wiring and the OWFS mount, then retry."
            ),
        };
    }

    if let Some(ce) = err.downcast_ref::<CalibrationError>() {
        if let CalibrationError::InsufficientSamples { .. } = ce {
            return format!(
                "What happened: {ce}.\nLikely causes: Probe unplugged or reading zero.\nHow to fix: Check the probe, or raise calibration.max_attempts in the config."
            );
        }
        return format!(
            "What happened: {ce}.\nLikely causes: Calibration table misconfigured.\nHow to fix: Re-run with --log-level=debug for details."
        );
    }

    // String-based heuristics for errors coming from init or config
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("read config") {
        return format!(
            "What happened: Could not read the config file ({msg}).\nLikely causes: Wrong --config path.\nHow to fix: Pass --config <FILE> pointing at a readable TOML file."
        );
    }

    if lower.contains("invalid configuration") {
        let cause = err
            .chain()
            .skip(1)
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(": ");
        return format!(
            "What happened: Configuration is invalid ({cause}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes per error family; anything else is 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    use brew_core::error::{BuildError, CalibrationError, SensorError};
    if err.downcast_ref::<BuildError>().is_some() {
        return 3;
    }
    if let Some(SensorError::InvalidPin(_)) = err.downcast_ref::<SensorError>() {
        return 4;
    }
    if err.downcast_ref::<CalibrationError>().is_some() {
        return 5;
    }
    1
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use brew_core::error::{BuildError, CalibrationError, SensorError};
    use serde_json::json;

    let reason = if err.downcast_ref::<BuildError>().is_some() {
        "Build"
    } else if err.downcast_ref::<SensorError>().is_some() {
        "Sensor"
    } else if err.downcast_ref::<CalibrationError>().is_some() {
        "Calibration"
    } else {
        "Error"
    };
    json!({ "reason": reason, "message": humanize(err) }).to_string()
}
