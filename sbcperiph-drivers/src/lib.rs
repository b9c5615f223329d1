//! Peripheral driver implementations
//!
//! This crate provides the drivers behind the traits defined in
//! sbcperiph-core:
//!
//! - Barometric sensor (BMP280 over a register channel)
//! - GPIO controller (BCM2835 memory-mapped register bank)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod gpio;
pub mod sensor;

pub use gpio::{GpioInput, GpioOutput, GpioRegisterMap, PinFunction};
pub use sensor::{Bmp280, Bmp280Error, Calibration, Compensator, RawSample};
