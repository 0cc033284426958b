//! Subcommand handlers.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use brew_config::Config;
use brew_core::{
    CalibrationRegistry, FermentStep, Fixed, PhSensorReader, PollCfg, Poller,
    SharedSensor, StatusSnapshot, TempUnit, ferment::sort_schedule, ferment_schedule_xml,
};
use brew_traits::MonotonicClock;
use eyre::WrapErr;
use serde_json::json;

use crate::cli::UnitArg;
use crate::hw;

/// pH for one sensor. A calibration failure is confined to that sensor and
/// reported as unavailable.
fn ph_or_unavailable(reader: &mut PhSensorReader) -> Option<Fixed> {
    match reader.ph_value() {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(sensor = %reader.name(), error = %e, "pH unavailable");
            None
        }
    }
}

fn print_status(snap: &StatusSnapshot, ph: Option<Fixed>, faulted: bool, json: bool) {
    if json {
        let line = json!({
            "phReading": snap.reading,
            "name": snap.name,
            "deviceType": snap.model,
            "ph": ph,
            "faulted": faulted,
        });
        println!("{line}");
    } else {
        let ph = ph.map_or_else(|| "n/a".to_string(), |v| v.to_string());
        let model = if snap.model.is_empty() {
            "uncalibrated"
        } else {
            snap.model.as_str()
        };
        let flag = if faulted { " (faulted)" } else { "" };
        println!(
            "{}: reading={} pH={} [{}]{}",
            snap.name, snap.reading, ph, model, flag
        );
    }
}

pub fn read(cfg: &Config, json: bool) -> eyre::Result<()> {
    let mut sensors = hw::open_all(cfg)?;
    if sensors.is_empty() {
        tracing::warn!("no sensors configured");
    }
    for reader in &mut sensors {
        reader.update_reading();
        let ph = ph_or_unavailable(reader);
        print_status(&reader.status_snapshot(), ph, reader.is_faulted(), json);
    }
    Ok(())
}

pub fn poll(
    cfg: &Config,
    json: bool,
    count: Option<u64>,
    interval_ms: Option<u64>,
) -> eyre::Result<()> {
    let mut poll_cfg = PollCfg::from(&cfg.poll);
    if let Some(ms) = interval_ms {
        if ms == 0 {
            eyre::bail!("--interval-ms must be >= 1");
        }
        poll_cfg.interval = Duration::from_millis(ms);
    }

    let sensors: Vec<SharedSensor> = hw::open_all(cfg)?
        .into_iter()
        .map(SharedSensor::new)
        .collect();
    if sensors.is_empty() {
        eyre::bail!("no sensors configured; nothing to poll");
    }

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = Arc::clone(&stop);
        ctrlc::set_handler(move || stop.store(true, Ordering::Relaxed))
            .wrap_err("install Ctrl-C handler")?;
    }

    tracing::info!(
        sensors = sensors.len(),
        interval_ms = poll_cfg.interval.as_millis() as u64,
        "polling started"
    );
    let poller = Poller::spawn(sensors.clone(), poll_cfg.interval, MonotonicClock::new());
    let mut printed = 0u64;
    while !stop.load(Ordering::Relaxed) && count.is_none_or(|n| printed < n) {
        if poller.recv_timeout(Duration::from_millis(200)).is_none() {
            continue;
        }
        // pH sampling moves the reading on, so report the state after it.
        for sensor in &sensors {
            let mut reader = sensor.lock();
            let ph = ph_or_unavailable(&mut reader);
            print_status(&reader.status_snapshot(), ph, reader.is_faulted(), json);
        }
        printed += 1;
    }
    drop(poller);
    tracing::info!(batches = printed, "polling stopped");
    Ok(())
}

pub fn models(json: bool) {
    let registry = CalibrationRegistry::builtin();
    if json {
        let models: Vec<&str> = registry.models().collect();
        println!("{}", json!({ "models": models }));
    } else {
        for m in registry.models() {
            println!("{m}");
        }
    }
}

pub fn ferment_xml(cfg: &Config, unit: Option<UnitArg>) -> eyre::Result<()> {
    let mut steps = cfg
        .ferment
        .iter()
        .enumerate()
        .map(|(i, c)| FermentStep::try_from(c).wrap_err_with(|| format!("ferment[{i}]")))
        .collect::<eyre::Result<Vec<_>>>()?;
    sort_schedule(&mut steps);
    if let Some(unit) = unit {
        let unit = match unit {
            UnitArg::C => TempUnit::Celsius,
            UnitArg::F => TempUnit::Fahrenheit,
        };
        for s in &mut steps {
            s.convert_to(unit);
        }
    }
    print!("{}", ferment_schedule_xml(&steps));
    Ok(())
}

pub fn self_check(cfg: &Config, json: bool) -> eyre::Result<()> {
    let sensors = hw::open_all(cfg)?;
    if json {
        println!("{}", json!({ "status": "ok", "sensors": sensors.len() }));
    } else {
        println!("ok ({} sensors)", sensors.len());
    }
    Ok(())
}
