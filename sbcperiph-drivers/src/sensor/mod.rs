//! Sensor drivers

pub mod bmp280;
pub mod calibration;

pub use bmp280::{Bmp280, Bmp280Error};
pub use calibration::{Calibration, Compensator, RawSample};
