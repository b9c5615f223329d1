//! Hardware configuration types
//!
//! These types describe where the peripherals live and how the drivers
//! bring them up. The sensor operating mode itself is fixed by the driver.

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum length of a controller label
pub const MAX_LABEL_LEN: usize = 16;

/// BMP280 address with SDO tied low
pub const DEFAULT_SENSOR_ADDRESS: u8 = 0x76;

/// Delay between bring-up register writes
pub const DEFAULT_SETTLE_DELAY_MS: u32 = 10;

/// Default GPIO controller label
pub const DEFAULT_GPIO_LABEL: &str = "custom-gpio";

/// Pins exposed by the BCM2835 GPIO block
pub const DEFAULT_PIN_COUNT: u32 = 54;

/// Barometric sensor bus configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SensorConfig {
    /// 7-bit I2C address (0x76 or 0x77 depending on SDO)
    pub address: u8,
    /// Delay inserted after each bring-up step, in milliseconds
    pub settle_delay_ms: u32,
    /// Reject devices whose chip id is not a known BMP280/BME280 id
    pub verify_chip_id: bool,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_SENSOR_ADDRESS,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            verify_chip_id: true,
        }
    }
}

impl SensorConfig {
    /// Config for a sensor at a non-default address
    pub fn at_address(address: u8) -> Self {
        Self {
            address,
            ..Self::default()
        }
    }
}

/// Memory-mapped GPIO controller configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GpioConfig {
    /// Controller label reported to consumers
    pub label: String<MAX_LABEL_LEN>,
    /// Number of pins exposed (at most 54 on BCM2835)
    pub pin_count: u32,
}

impl Default for GpioConfig {
    fn default() -> Self {
        let mut label = String::new();
        let _ = label.push_str(DEFAULT_GPIO_LABEL);
        Self {
            label,
            pin_count: DEFAULT_PIN_COUNT,
        }
    }
}

impl GpioConfig {
    /// Config exposing only the first `pin_count` pins
    pub fn with_pin_count(pin_count: u32) -> Self {
        Self {
            pin_count,
            ..Self::default()
        }
    }
}

/// Complete board description
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BoardConfig {
    /// Barometric sensor on the I2C bus
    pub sensor: SensorConfig,
    /// On-chip GPIO controller
    pub gpio: GpioConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BoardConfig::default();
        assert_eq!(config.sensor.address, 0x76);
        assert_eq!(config.sensor.settle_delay_ms, 10);
        assert!(config.sensor.verify_chip_id);
        assert_eq!(config.gpio.label.as_str(), "custom-gpio");
        assert_eq!(config.gpio.pin_count, 54);
    }

    #[test]
    fn test_builders() {
        let sensor = SensorConfig::at_address(0x77);
        assert_eq!(sensor.address, 0x77);
        assert_eq!(sensor.settle_delay_ms, DEFAULT_SETTLE_DELAY_MS);

        let gpio = GpioConfig::with_pin_count(32);
        assert_eq!(gpio.pin_count, 32);
        assert_eq!(gpio.label.as_str(), DEFAULT_GPIO_LABEL);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: BoardConfig = toml::from_str(
            r#"
            [sensor]
            address = 0x77

            [gpio]
            label = "bank0"
            "#,
        )
        .unwrap();

        assert_eq!(config.sensor.address, 0x77);
        assert_eq!(config.sensor.settle_delay_ms, 10);
        assert_eq!(config.gpio.label.as_str(), "bank0");
        assert_eq!(config.gpio.pin_count, 54);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_empty_toml_is_default() {
        let config: BoardConfig = toml::from_str("").unwrap();
        assert_eq!(config, BoardConfig::default());
    }
}
