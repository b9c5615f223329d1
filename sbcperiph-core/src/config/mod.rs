//! Configuration types
//!
//! Board description for the peripherals, loadable from TOML on the host
//! when the `serde` feature is enabled.

pub mod hardware;

pub use hardware::*;
