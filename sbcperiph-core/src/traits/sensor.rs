//! Barometric sensor trait

use core::fmt;

/// One compensated temperature/pressure pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Measurement {
    /// Temperature in centi-degrees Celsius (2508 = 25.08°C)
    pub temperature_centi: i32,
    /// Pressure in pascals (100656 = 1006.56 hPa)
    pub pressure_pa: u32,
}

impl Measurement {
    /// Whole degrees and hundredths, sign carried on the whole part
    pub fn temperature_parts(&self) -> (i32, u32) {
        (
            self.temperature_centi / 100,
            (self.temperature_centi % 100).unsigned_abs(),
        )
    }

    /// Whole hectopascals and hundredths
    pub fn pressure_hpa_parts(&self) -> (u32, u32) {
        (self.pressure_pa / 100, self.pressure_pa % 100)
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (whole, frac) = self.temperature_parts();
        // -0.05 has a zero whole part, so the sign has to come from the raw value
        if self.temperature_centi < 0 && whole == 0 {
            write!(f, "-")?;
        }
        let (hpa, hpa_frac) = self.pressure_hpa_parts();
        write!(f, "{}.{:02} C, {}.{:02} hPa", whole, frac, hpa, hpa_frac)
    }
}

/// Trait for combined temperature/pressure sensors
///
/// Implementations must compensate temperature and pressure from the same
/// raw sample, temperature first.
pub trait BarometricSensor {
    /// Error type for sensor reads
    type Error;

    /// Take one sample and compensate it
    fn measure(&mut self) -> Result<Measurement, Self::Error>;

    /// Read the current temperature in centi-degrees Celsius
    fn read_temperature_centi(&mut self) -> Result<i32, Self::Error> {
        self.measure().map(|m| m.temperature_centi)
    }

    /// Read the current pressure in pascals
    fn read_pressure_pa(&mut self) -> Result<u32, Self::Error> {
        self.measure().map(|m| m.pressure_pa)
    }
}
