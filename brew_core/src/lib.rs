#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! pH sensor core (hardware-agnostic).
//!
//! All input goes through the `brew_traits::AnalogPin` and
//! `brew_traits::OneWireBus` traits.
//!
//! ## Architecture
//!
//! - **Sensor**: input binding, reading updates, fault tracking (`sensor` module)
//! - **Calibration**: model-keyed formula table (`calibration` module)
//! - **Sharing**: whole-record locking for concurrent pollers/readers (`shared`)
//! - **Polling**: background update loop publishing snapshots (`poller`)
//! - **Status**: fault state and reporting projection (`status` module)
//! - **Fermentation**: schedule steps and XML export (`ferment` module)
//!
//! ## Fixed-Point Arithmetic
//!
//! Readings and pH values are `Fixed` decimals with 6 fractional digits;
//! see `fixed_point` for the rounding rule.

pub mod builder;
pub mod calibration;
pub mod config;
pub mod conversions;
pub mod error;
pub mod ferment;
pub mod fixed_point;
pub mod hw_error;
pub mod mocks;
pub mod poller;
pub mod sensor;
pub mod shared;
pub mod status;

pub use builder::PhSensorBuilder;
pub use calibration::{CalibrationRegistry, Formula, SamplingPolicy};
pub use config::{Binding, PollCfg, SensorSettings};
pub use error::{BuildError, CalibrationError, SensorError};
pub use ferment::{FermentKind, FermentStep, TempUnit, ferment_schedule_xml};
pub use fixed_point::Fixed;
pub use poller::Poller;
pub use sensor::{PhSensorReader, Source};
pub use shared::SharedSensor;
pub use status::{FaultState, StatusSnapshot};
