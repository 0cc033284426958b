//! Model-keyed pH calibration formulas.
//!
//! A `CalibrationRegistry` is an ordered table mapping a sensor model name
//! (matched case-insensitively) to the formula that turns raw analog samples
//! into a pH value. The built-in table is assembled once at startup.

use std::sync::{Arc, LazyLock};

use tracing::{debug, warn};

use crate::error::CalibrationError;
use crate::fixed_point::Fixed;
use crate::sensor::PhSensorReader;

/// A calibration formula. Formulas may sample the sensor through
/// `update_reading` and read its calibration offset.
pub type Formula = fn(&mut PhSensorReader) -> Result<Fixed, CalibrationError>;

/// Bounds on the retry-on-zero sampling loop used by averaging formulas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingPolicy {
    /// Non-zero samples averaged per calculation.
    pub samples: u32,
    /// Upper bound on reads, zero readings included.
    pub max_attempts: u32,
}

impl Default for SamplingPolicy {
    fn default() -> Self {
        Self {
            samples: 4,
            max_attempts: 12,
        }
    }
}

#[derive(Clone, Default)]
pub struct CalibrationRegistry {
    entries: Vec<(String, Formula)>,
}

impl core::fmt::Debug for CalibrationRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(m, _)| m))
            .finish()
    }
}

static BUILTIN: LazyLock<Arc<CalibrationRegistry>> = LazyLock::new(|| {
    let mut reg = CalibrationRegistry::new();
    for (model, formula) in [("SEN0161", sen0161 as Formula)] {
        if let Err(e) = reg.register(model, formula) {
            warn!(error = %e, "skipping built-in calibration entry");
        }
    }
    Arc::new(reg)
});

impl CalibrationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The table of formulas shipped with the crate.
    pub fn builtin() -> Arc<CalibrationRegistry> {
        Arc::clone(&BUILTIN)
    }

    /// Add a formula. Model names must be non-empty and unique ignoring case.
    pub fn register(
        &mut self,
        model: impl Into<String>,
        formula: Formula,
    ) -> Result<(), CalibrationError> {
        let model = model.into();
        if model.trim().is_empty() {
            return Err(CalibrationError::EmptyModel);
        }
        if self.lookup(&model).is_some() {
            return Err(CalibrationError::DuplicateModel(model));
        }
        self.entries.push((model, formula));
        Ok(())
    }

    /// Formula registered for `model`, ignoring case.
    pub fn lookup(&self, model: &str) -> Option<Formula> {
        self.entries
            .iter()
            .find(|(m, _)| m.eq_ignore_ascii_case(model))
            .map(|(_, f)| *f)
    }

    /// Registered model names in registration order.
    pub fn models(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(m, _)| m.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Sum `policy.samples` non-zero readings, skipping sentinel-zero reads.
///
/// Gives up after `policy.max_attempts` reads in total.
pub fn sum_nonzero_samples(
    reader: &mut PhSensorReader,
    policy: SamplingPolicy,
) -> Result<Fixed, CalibrationError> {
    let mut sum = Fixed::ZERO;
    let mut got = 0u32;
    let mut attempts = 0u32;
    while got < policy.samples {
        if attempts >= policy.max_attempts {
            return Err(CalibrationError::InsufficientSamples {
                wanted: policy.samples,
                got,
                attempts,
            });
        }
        attempts += 1;
        let v = reader.update_reading();
        if v.is_zero() {
            debug!(sensor = %reader.name(), attempts, "zero sample discarded");
            continue;
        }
        sum = sum.checked_add(v).ok_or(CalibrationError::Overflow)?;
        got += 1;
    }
    Ok(sum)
}

/// DFRobot SEN0161 analog pH probe on a 10-bit, 5 V ADC.
///
/// `pH = avg * (5 / 1024) * 3.5 + offset`, evaluated as one rational step
/// (`sum * 35 / (2048 * n)`) so the only rounding is the final one.
pub fn sen0161(reader: &mut PhSensorReader) -> Result<Fixed, CalibrationError> {
    let policy = reader.sampling_policy();
    let sum = sum_nonzero_samples(reader, policy)?;
    let den = 2048i64
        .checked_mul(i64::from(policy.samples))
        .ok_or(CalibrationError::Overflow)?;
    let ph = sum.mul_ratio(35, den).ok_or(CalibrationError::Overflow)?;
    ph.checked_add(reader.calibration_offset())
        .ok_or(CalibrationError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(_: &mut PhSensorReader) -> Result<Fixed, CalibrationError> {
        Ok(Fixed::from_micros(7_000_000))
    }

    #[test]
    fn builtin_registers_sen0161() {
        let reg = CalibrationRegistry::builtin();
        assert_eq!(reg.models().collect::<Vec<_>>(), vec!["SEN0161"]);
        assert!(reg.lookup("sen0161").is_some());
        assert!(reg.lookup("SEN0169").is_none());
        assert!(reg.lookup("").is_none());
    }

    #[test]
    fn register_rejects_duplicates_ignoring_case() {
        let mut reg = CalibrationRegistry::new();
        reg.register("Probe-A", constant).unwrap();
        assert_eq!(
            reg.register("probe-a", constant),
            Err(CalibrationError::DuplicateModel("probe-a".into()))
        );
        assert_eq!(reg.register(" ", constant), Err(CalibrationError::EmptyModel));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn models_keep_registration_order() {
        let mut reg = CalibrationRegistry::new();
        for m in ["Zeta", "alpha", "Mid"] {
            reg.register(m, constant).unwrap();
        }
        let first: Vec<_> = reg.models().collect();
        let second: Vec<_> = reg.models().collect();
        assert_eq!(first, vec!["Zeta", "alpha", "Mid"]);
        assert_eq!(first, second);
    }
}
