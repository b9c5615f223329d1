//! BMP280 barometric pressure / temperature sensor
//!
//! The BMP280 is a Bosch digital pressure sensor with an on-die temperature
//! sensor. Raw 20-bit ADC counts are converted to physical units with
//! factory calibration constants stored in the device.
//!
//! # Operating mode
//!
//! The driver uses a single configuration: temperature and pressure
//! oversampling x1, normal (free-running) mode, 0.5 ms standby, IIR filter
//! off. The latest conversion is always available in the data registers.
//!
//! # Concurrency
//!
//! Every operation is a blocking round-trip on the register channel. The
//! driver is not safe to share: only one measurement cycle may be in flight
//! per device, and callers sharing a bus must serialize access themselves.

use embedded_hal::delay::DelayNs;
use sbcperiph_core::config::SensorConfig;
use sbcperiph_core::traits::{BarometricSensor, Measurement};
use sbcperiph_hal::RegisterChannel;

use super::calibration::{Calibration, Compensator, RawSample, CALIBRATION_LEN, SAMPLE_LEN};

/// BMP280 register addresses
pub mod reg {
    /// Chip identification
    pub const CHIP_ID: u8 = 0xD0;
    /// Soft reset
    pub const RESET: u8 = 0xE0;
    /// Measuring / NVM copy status
    pub const STATUS: u8 = 0xF3;
    /// Oversampling and power mode
    pub const CTRL_MEAS: u8 = 0xF4;
    /// Standby time and IIR filter
    pub const CONFIG: u8 = 0xF5;
    /// First byte of the pressure + temperature data block
    pub const PRESS_MSB: u8 = 0xF7;
    /// First byte of the calibration block (0x88..=0x9F)
    pub const CALIB00: u8 = 0x88;
}

/// Chip ids accepted by the driver (BMP280 samples, BMP280, BME280)
pub const CHIP_IDS: [u8; 4] = [0x56, 0x57, 0x58, 0x60];

/// Value written to [`reg::RESET`] to trigger a power-on reset
pub const SOFT_RESET: u8 = 0xB6;

/// ctrl_meas: osrs_t = x1, osrs_p = x1, mode = normal
pub const CTRL_MEAS_NORMAL: u8 = 0x27;

/// config: t_sb = 0.5 ms, filter off
pub const CONFIG_DEFAULT: u8 = 0x00;

/// BMP280 driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bmp280Error<E> {
    /// Register channel transaction failed
    Bus(E),
    /// Channel delivered fewer bytes than requested
    ShortRead {
        /// Bytes requested
        expected: usize,
        /// Bytes delivered
        actual: usize,
    },
    /// Chip id register held an unknown value
    UnexpectedChipId(u8),
    /// Measurement requested before calibration was read
    NotCalibrated,
}

impl<E> Bmp280Error<E> {
    /// Whether this is a transport failure (including short reads)
    pub fn is_io(&self) -> bool {
        matches!(self, Bmp280Error::Bus(_) | Bmp280Error::ShortRead { .. })
    }
}

/// BMP280 driver over a register channel
pub struct Bmp280<C> {
    channel: C,
    config: SensorConfig,
    compensator: Option<Compensator>,
}

impl<C: RegisterChannel> Bmp280<C> {
    /// Create a driver; no bus traffic until [`Bmp280::init`]
    pub fn new(channel: C, config: SensorConfig) -> Self {
        Self {
            channel,
            config,
            compensator: None,
        }
    }

    /// Release the register channel
    pub fn release(self) -> C {
        self.channel
    }

    /// Bring the sensor up and load its calibration
    ///
    /// Reads the chip id, switches the sensor to normal mode, clears the
    /// filter configuration and reads the calibration block, settling for
    /// `settle_delay_ms` between steps.
    ///
    /// # Returns
    /// The detected chip id.
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<u8, Bmp280Error<C::Error>> {
        let chip_id = self.chip_id()?;
        info!("bmp280: detected chip id {=u8:#x}", chip_id);
        if self.config.verify_chip_id && !CHIP_IDS.contains(&chip_id) {
            return Err(Bmp280Error::UnexpectedChipId(chip_id));
        }
        delay.delay_ms(self.config.settle_delay_ms);

        self.write_register(reg::CTRL_MEAS, CTRL_MEAS_NORMAL)?;
        delay.delay_ms(self.config.settle_delay_ms);

        self.write_register(reg::CONFIG, CONFIG_DEFAULT)?;
        delay.delay_ms(self.config.settle_delay_ms);

        self.read_calibration()?;
        Ok(chip_id)
    }

    /// Read the chip id register
    pub fn chip_id(&mut self) -> Result<u8, Bmp280Error<C::Error>> {
        let mut buf = [0u8; 1];
        self.read_block(reg::CHIP_ID, &mut buf)?;
        Ok(buf[0])
    }

    /// Trigger a soft reset
    ///
    /// The device reloads its defaults; [`Bmp280::init`] must run again
    /// before measuring.
    pub fn reset(&mut self) -> Result<(), Bmp280Error<C::Error>> {
        self.write_register(reg::RESET, SOFT_RESET)?;
        self.compensator = None;
        Ok(())
    }

    /// Read and store the calibration block
    ///
    /// The 24 bytes are fetched in one transaction. On failure nothing is
    /// stored and a previously loaded calibration is kept.
    pub fn read_calibration(&mut self) -> Result<Calibration, Bmp280Error<C::Error>> {
        let mut buf = [0u8; CALIBRATION_LEN];
        self.read_block(reg::CALIB00, &mut buf)?;

        let calibration = Calibration::from_bytes(&buf);
        self.compensator = Some(Compensator::new(calibration));
        info!("bmp280: calibration read");
        Ok(calibration)
    }

    /// Read one raw pressure/temperature sample
    pub fn read_raw_sample(&mut self) -> Result<RawSample, Bmp280Error<C::Error>> {
        let mut buf = [0u8; SAMPLE_LEN];
        self.read_block(reg::PRESS_MSB, &mut buf)?;

        let sample = RawSample::from_bytes(&buf);
        debug!(
            "bmp280: raw ADC T={=u32} P={=u32}",
            sample.temperature,
            sample.pressure
        );
        Ok(sample)
    }

    /// Loaded calibration, if any
    pub fn calibration(&self) -> Option<&Calibration> {
        self.compensator.as_ref().map(Compensator::calibration)
    }

    /// Compensator for callers that drive the conversion themselves
    pub fn compensator_mut(&mut self) -> Option<&mut Compensator> {
        self.compensator.as_mut()
    }

    /// Read one sample and compensate it, temperature first
    pub fn measure(&mut self) -> Result<Measurement, Bmp280Error<C::Error>> {
        if self.compensator.is_none() {
            return Err(Bmp280Error::NotCalibrated);
        }
        let sample = self.read_raw_sample()?;
        let compensator = self
            .compensator
            .as_mut()
            .ok_or(Bmp280Error::NotCalibrated)?;
        let measurement = compensator.compensate(sample);

        info!(
            "bmp280: compensated temp={=i32} cC pressure={=u32} Pa",
            measurement.temperature_centi,
            measurement.pressure_pa
        );
        Ok(measurement)
    }

    /// Block read that rejects partial transfers
    fn read_block(&mut self, start: u8, buf: &mut [u8]) -> Result<(), Bmp280Error<C::Error>> {
        let actual = self
            .channel
            .read_registers(start, buf)
            .map_err(Bmp280Error::Bus)?;
        if actual < buf.len() {
            return Err(Bmp280Error::ShortRead {
                expected: buf.len(),
                actual,
            });
        }
        Ok(())
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), Bmp280Error<C::Error>> {
        self.channel.write_register(register, value).map_err(|e| {
            error!("bmp280: register write failed at {=u8:#x}", register);
            Bmp280Error::Bus(e)
        })
    }
}

impl<C: RegisterChannel> BarometricSensor for Bmp280<C> {
    type Error = Bmp280Error<C::Error>;

    fn measure(&mut self) -> Result<Measurement, Self::Error> {
        Bmp280::measure(self)
    }
}
