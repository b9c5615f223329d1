//! GPIO controller drivers

pub mod bcm2835;

pub use bcm2835::{GpioInput, GpioOutput, GpioRegisterMap, PinFunction};
