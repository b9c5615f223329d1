//! Driver-facing traits
//!
//! These traits define the interface between board bring-up code and the
//! peripheral driver implementations.

pub mod gpio;
pub mod sensor;

pub use gpio::{GpioController, GpioError};
pub use sensor::{BarometricSensor, Measurement};
