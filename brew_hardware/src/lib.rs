pub mod error;
pub mod owfs;
pub mod sysfs;
pub mod util;

use brew_traits::{AnalogPin, BoxError, OneWireBus};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub use owfs::OwfsBus;
pub use sysfs::SysfsAnalogPin;

/// Simulated analog pin.
///
/// Plays back a script of readings (`None` = read failure), then returns
/// `base`: steady for scripted pins, drifting by a few counts otherwise.
pub struct SimulatedAnalogPin {
    script: VecDeque<Option<i32>>,
    base: i32,
    drift: bool,
    tick: u32,
}

impl SimulatedAnalogPin {
    pub fn new(base: i32) -> Self {
        Self {
            script: VecDeque::new(),
            base,
            drift: true,
            tick: 0,
        }
    }

    pub fn scripted(script: impl IntoIterator<Item = Option<i32>>, base: i32) -> Self {
        Self {
            script: script.into_iter().collect(),
            base,
            drift: false,
            tick: 0,
        }
    }
}

impl AnalogPin for SimulatedAnalogPin {
    fn read_value(&mut self) -> Result<i32, BoxError> {
        if let Some(next) = self.script.pop_front() {
            return next.ok_or_else(|| "simulated analog read failure".into());
        }
        if !self.drift {
            return Ok(self.base);
        }
        self.tick = self.tick.wrapping_add(1);
        let v = self.base + (self.tick % 5) as i32 - 2;
        tracing::trace!(raw = v, "simulated adc sample");
        Ok(v)
    }
}

/// Simulated one-wire bus keyed by path.
///
/// Each path holds a queue of values; the last value repeats once the queue
/// drains. An `Err` entry simulates a read failure.
#[derive(Default)]
pub struct SimulatedBus {
    values: Mutex<HashMap<String, VecDeque<Result<String, String>>>>,
    resets: AtomicUsize,
}

impl SimulatedBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append values for `path`.
    pub fn push(&self, path: &str, value: Result<&str, &str>) {
        if let Ok(mut map) = self.values.lock() {
            map.entry(path.to_string())
                .or_default()
                .push_back(value.map(str::to_string).map_err(str::to_string));
        }
    }

    pub fn reset_count(&self) -> usize {
        self.resets.load(Ordering::Relaxed)
    }
}

impl OneWireBus for SimulatedBus {
    fn read_path(&self, path: &str) -> Result<String, BoxError> {
        let mut map = self
            .values
            .lock()
            .map_err(|_| "simulated bus lock poisoned")?;
        let queue = map
            .get_mut(path)
            .ok_or_else(|| format!("no such path: {path}"))?;
        let next = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        match next {
            Some(Ok(v)) => Ok(v),
            Some(Err(e)) => Err(e.into()),
            None => Err(format!("no value at {path}").into()),
        }
    }

    fn reset(&self) {
        self.resets.fetch_add(1, Ordering::Relaxed);
        tracing::info!("simulated bus reset");
    }
}
