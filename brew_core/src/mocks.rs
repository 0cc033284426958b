//! Test and helper mocks for brew_core

use std::sync::atomic::{AtomicUsize, Ordering};

use brew_traits::{AnalogPin, BoxError, OneWireBus};

/// An analog pin whose every read fails.
pub struct DeadPin;

impl AnalogPin for DeadPin {
    fn read_value(&mut self) -> Result<i32, BoxError> {
        Err(Box::new(std::io::Error::other("dead pin")))
    }
}

/// A pin that returns the same count forever.
pub struct ConstPin(pub i32);

impl AnalogPin for ConstPin {
    fn read_value(&mut self) -> Result<i32, BoxError> {
        Ok(self.0)
    }
}

/// A bus with nothing on it that counts reset requests.
#[derive(Default)]
pub struct CountingBus {
    resets: AtomicUsize,
}

impl CountingBus {
    pub fn resets(&self) -> usize {
        self.resets.load(Ordering::Relaxed)
    }
}

impl OneWireBus for CountingBus {
    fn read_path(&self, path: &str) -> Result<String, BoxError> {
        Err(format!("no device at {path}").into())
    }

    fn reset(&self) {
        self.resets.fetch_add(1, Ordering::Relaxed);
    }
}
