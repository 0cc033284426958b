//! Maps `Box<dyn Error>` from trait boundaries to typed `SensorError`.
//!
//! The traits in `brew_traits` use `Box<dyn Error + Send + Sync>`; this module
//! converts those to our typed error enum, with an optional feature-gated
//! path for `brew_hardware::HwError` downcasting.

use crate::error::SensorError;

/// Which input produced the error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Analog,
    Bus,
}

impl InputKind {
    pub fn as_str(self) -> &'static str {
        match self {
            InputKind::Analog => "analog",
            InputKind::Bus => "one-wire bus",
        }
    }

    fn read_error(self, msg: String) -> SensorError {
        match self {
            InputKind::Analog => SensorError::PinRead(msg),
            InputKind::Bus => SensorError::BusRead(msg),
        }
    }
}

/// Map a trait-boundary error to a typed `SensorError`.
pub fn map_hw_error(e: &(dyn std::error::Error + 'static), kind: InputKind) -> SensorError {
    #[cfg(feature = "hardware-errors")]
    {
        if let Some(hw) = e.downcast_ref::<brew_hardware::error::HwError>() {
            return match hw {
                brew_hardware::error::HwError::InvalidPin { .. } => {
                    SensorError::InvalidPin(hw.to_string())
                }
                other => kind.read_error(other.to_string()),
            };
        }
    }

    kind.read_error(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_errors_map_by_input_kind() {
        let e: Box<dyn std::error::Error + Send + Sync> = "wire unplugged".into();
        assert_eq!(
            map_hw_error(e.as_ref(), InputKind::Bus),
            SensorError::BusRead("wire unplugged".into())
        );
        assert_eq!(
            map_hw_error(e.as_ref(), InputKind::Analog),
            SensorError::PinRead("wire unplugged".into())
        );
    }

    #[cfg(feature = "hardware-errors")]
    #[test]
    fn invalid_pin_is_downcast() {
        let e = brew_hardware::error::HwError::InvalidPin {
            pin: 9,
            reason: "missing".into(),
        };
        assert!(matches!(
            map_hw_error(&e, InputKind::Analog),
            SensorError::InvalidPin(_)
        ));
    }
}
