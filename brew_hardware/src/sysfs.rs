//! Analog input through the Linux IIO sysfs interface.

use std::path::{Path, PathBuf};

use brew_traits::{AnalogPin, BoxError};
use tracing::trace;

use crate::error::{HwError, Result};
use crate::util::read_trimmed;

/// Default IIO device exposing the SoC ADC channels.
pub const DEFAULT_IIO_ROOT: &str = "/sys/bus/iio/devices/iio:device0";

/// One ADC channel, read from `<root>/in_voltage<pin>_raw`.
#[derive(Debug)]
pub struct SysfsAnalogPin {
    pin: u32,
    path: PathBuf,
}

impl SysfsAnalogPin {
    /// Bind to `pin` under `root`. The channel is read once so a missing or
    /// unreadable channel fails here rather than on the first poll.
    pub fn open(root: impl AsRef<Path>, pin: u32) -> Result<Self> {
        let path = root.as_ref().join(format!("in_voltage{pin}_raw"));
        if let Err(e) = read_trimmed(&path) {
            return Err(HwError::InvalidPin {
                pin,
                reason: e.to_string(),
            });
        }
        Ok(Self { pin, path })
    }

    pub fn pin(&self) -> u32 {
        self.pin
    }
}

impl AnalogPin for SysfsAnalogPin {
    fn read_value(&mut self) -> std::result::Result<i32, BoxError> {
        let text = read_trimmed(&self.path)?;
        let raw = text.parse::<i32>().map_err(|_| HwError::Parse {
            path: self.path.display().to_string(),
            value: text.clone(),
        })?;
        trace!(pin = self.pin, raw, "adc sample");
        Ok(raw)
    }
}
