use thiserror::Error;

/// Failures of a single sensor input.
///
/// Read errors never escape `update_reading`; they are absorbed into the
/// fault flag and surface here only through logs and the mapping helpers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SensorError {
    #[error("invalid analog pin: {0}")]
    InvalidPin(String),
    #[error("analog pin read failed: {0}")]
    PinRead(String),
    #[error("one-wire bus read failed: {0}")]
    BusRead(String),
    #[error("configuration error: {0}")]
    Config(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("sensor cannot bind both an analog pin and a bus address")]
    ConflictingSources,
    #[error("bus address given without a one-wire bus")]
    MissingBus,
    #[error("bus address and offset must not be empty")]
    EmptyBusAddress,
    #[error("sensor name must not be empty")]
    EmptyName,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalibrationError {
    #[error("collected {got} of {wanted} non-zero samples in {attempts} reads")]
    InsufficientSamples { wanted: u32, got: u32, attempts: u32 },
    #[error("calibration model {0:?} is registered twice")]
    DuplicateModel(String),
    #[error("calibration model name must not be empty")]
    EmptyModel,
    #[error("calibration arithmetic overflowed")]
    Overflow,
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
