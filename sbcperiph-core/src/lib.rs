//! Board-agnostic core types for the sbcperiph drivers
//!
//! This crate contains everything the drivers share that does not depend
//! on a register transport:
//!
//! - Configuration type definitions (sensor bus address, GPIO bank)
//! - Driver-facing traits (barometric sensor, GPIO controller)
//! - The GPIO error taxonomy

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod traits;

pub use config::{BoardConfig, GpioConfig, SensorConfig};
pub use traits::{BarometricSensor, GpioController, GpioError, Measurement};
