pub mod clock;

pub use clock::{Clock, MonotonicClock};

/// Error type used at every collaborator boundary.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A single analog input channel (ADC pin).
pub trait AnalogPin {
    /// Read the current raw ADC count.
    fn read_value(&mut self) -> Result<i32, BoxError>;
}

/// A one-wire bus exposed as a path tree (e.g. an OWFS mount).
///
/// Methods take `&self`: one bus is shared by every sensor hanging off it,
/// so implementations own their interior synchronization.
pub trait OneWireBus: Send + Sync {
    /// Read the text value stored at `path`, relative to the bus root.
    fn read_path(&self, path: &str) -> Result<String, BoxError>;

    /// Ask the bus to reconnect. Fire-and-forget: callers never wait on it.
    fn reset(&self);
}

impl<T: AnalogPin + ?Sized> AnalogPin for Box<T> {
    fn read_value(&mut self) -> Result<i32, BoxError> {
        (**self).read_value()
    }
}

impl<T: OneWireBus + ?Sized> OneWireBus for std::sync::Arc<T> {
    fn read_path(&self, path: &str) -> Result<String, BoxError> {
        (**self).read_path(path)
    }

    fn reset(&self) {
        (**self).reset();
    }
}
