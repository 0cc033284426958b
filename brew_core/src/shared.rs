//! Shared ownership of a sensor between the poller and status readers.
//!
//! The whole sensor record sits behind one mutex; callers never lock
//! individual fields.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::CalibrationError;
use crate::fixed_point::Fixed;
use crate::sensor::PhSensorReader;
use crate::status::StatusSnapshot;

#[derive(Clone)]
pub struct SharedSensor {
    inner: Arc<Mutex<PhSensorReader>>,
}

impl SharedSensor {
    pub fn new(reader: PhSensorReader) -> Self {
        Self {
            inner: Arc::new(Mutex::new(reader)),
        }
    }

    /// Lock the sensor, recovering a poisoned lock.
    pub fn lock(&self) -> MutexGuard<'_, PhSensorReader> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn update_reading(&self) -> Fixed {
        self.lock().update_reading()
    }

    pub fn ph_value(&self) -> Result<Option<Fixed>, CalibrationError> {
        self.lock().ph_value()
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        self.lock().status_snapshot()
    }
}

impl core::fmt::Debug for SharedSensor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("SharedSensor").field(&*self.lock()).finish()
    }
}
