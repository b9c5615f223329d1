//! sbcperiph Hardware Abstraction Layer
//!
//! This crate defines the narrow capabilities the peripheral drivers need
//! from their environment. Drivers never touch a bus or a mapped register
//! window directly; they go through one of these traits, which keeps them
//! testable on the host against mock register banks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  sbcperiph-drivers (Bmp280, GPIO map)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  sbcperiph-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ embedded-hal  │       │ mapped MMIO   │
//! │  I2C master   │       │    window     │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`register::RegisterChannel`] - Byte-addressed device registers
//! - [`mmio::MemoryRegisterChannel`] - 32-bit memory-mapped registers
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod gpio;
pub mod mmio;
pub mod register;

// Re-export key traits at crate root for convenience
pub use gpio::{InputPin, OutputPin};
pub use mmio::{MemoryRegisterChannel, MmioRegion};
pub use register::{I2cRegisterChannel, RegisterChannel};
