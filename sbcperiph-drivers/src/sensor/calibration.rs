//! BMP280 calibration constants and integer compensation
//!
//! The compensation formulas are the 32-bit fixed-point versions from the
//! BMP280 datasheet (section 3.11.3). Every intermediate is a 32-bit
//! integer and truncates at each shift, so the operation order below is
//! part of the output. All arithmetic wraps like the reference C code
//! rather than trapping on overflow.

use sbcperiph_core::traits::Measurement;

/// Size of the calibration block at 0x88
pub const CALIBRATION_LEN: usize = 24;

/// Size of the pressure + temperature data block at 0xF7
pub const SAMPLE_LEN: usize = 6;

/// Factory trimming parameters
///
/// Read once from the calibration block; all values are little-endian
/// 16-bit, with `dig_t1` and `dig_p1` unsigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    pub dig_t1: u16,
    pub dig_t2: i16,
    pub dig_t3: i16,
    pub dig_p1: u16,
    pub dig_p2: i16,
    pub dig_p3: i16,
    pub dig_p4: i16,
    pub dig_p5: i16,
    pub dig_p6: i16,
    pub dig_p7: i16,
    pub dig_p8: i16,
    pub dig_p9: i16,
}

impl Calibration {
    /// Parse the 24-byte calibration block
    pub fn from_bytes(buf: &[u8; CALIBRATION_LEN]) -> Self {
        let u = |i: usize| u16::from_le_bytes([buf[i], buf[i + 1]]);
        let s = |i: usize| i16::from_le_bytes([buf[i], buf[i + 1]]);

        Self {
            dig_t1: u(0),
            dig_t2: s(2),
            dig_t3: s(4),
            dig_p1: u(6),
            dig_p2: s(8),
            dig_p3: s(10),
            dig_p4: s(12),
            dig_p5: s(14),
            dig_p6: s(16),
            dig_p7: s(18),
            dig_p8: s(20),
            dig_p9: s(22),
        }
    }

    /// Compensate a raw temperature count
    ///
    /// Returns `(temperature, t_fine)` with the temperature in centi-degrees
    /// Celsius. `t_fine` feeds [`Calibration::compensate_pressure`].
    pub fn compensate_temperature(&self, adc_t: u32) -> (i32, i32) {
        let adc_t = adc_t as i32;
        let t1 = self.dig_t1 as i32;
        let t2 = self.dig_t2 as i32;
        let t3 = self.dig_t3 as i32;

        let var1 = ((adc_t >> 3).wrapping_sub(t1 << 1)).wrapping_mul(t2) >> 11;
        let delta = (adc_t >> 4).wrapping_sub(t1);
        let var2 = ((delta.wrapping_mul(delta) >> 12).wrapping_mul(t3)) >> 14;

        let t_fine = var1.wrapping_add(var2);
        let temperature = t_fine.wrapping_mul(5).wrapping_add(128) >> 8;

        (temperature, t_fine)
    }

    /// Compensate a raw pressure count against `t_fine`
    ///
    /// Returns pascals (100656 = 1006.56 hPa). A zero divisor term yields 0.
    pub fn compensate_pressure(&self, adc_p: u32, t_fine: i32) -> u32 {
        let adc_p = adc_p as i32;
        let p1 = self.dig_p1 as i32;
        let p2 = self.dig_p2 as i32;
        let p3 = self.dig_p3 as i32;
        let p4 = self.dig_p4 as i32;
        let p5 = self.dig_p5 as i32;
        let p6 = self.dig_p6 as i32;
        let p7 = self.dig_p7 as i32;
        let p8 = self.dig_p8 as i32;
        let p9 = self.dig_p9 as i32;

        let mut var1 = (t_fine >> 1).wrapping_sub(64000);
        let quarter = var1 >> 2;
        let square = quarter.wrapping_mul(quarter);

        let mut var2 = (square >> 11).wrapping_mul(p6);
        var2 = var2.wrapping_add(var1.wrapping_mul(p5) << 1);
        var2 = (var2 >> 2).wrapping_add(p4 << 16);

        var1 = ((p3.wrapping_mul(square >> 13) >> 3).wrapping_add(p2.wrapping_mul(var1) >> 1)) >> 18;
        var1 = 32768i32.wrapping_add(var1).wrapping_mul(p1) >> 15;
        if var1 == 0 {
            return 0;
        }
        let divisor = var1 as u32;

        let mut p = (1_048_576i32.wrapping_sub(adc_p) as u32)
            .wrapping_sub((var2 >> 12) as u32)
            .wrapping_mul(3125);
        // Doubling first would overflow past bit 31
        if p < 0x8000_0000 {
            p = (p << 1) / divisor;
        } else {
            p = (p / divisor).wrapping_mul(2);
        }

        let var1 = p9.wrapping_mul(((p >> 3).wrapping_mul(p >> 3) >> 13) as i32) >> 12;
        let var2 = ((p >> 2) as i32).wrapping_mul(p8) >> 13;

        (p as i32).wrapping_add(var1.wrapping_add(var2).wrapping_add(p7) >> 4) as u32
    }
}

/// Raw 20-bit ADC counts from one data block read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample {
    /// Uncompensated temperature count
    pub temperature: u32,
    /// Uncompensated pressure count
    pub pressure: u32,
}

impl RawSample {
    /// Parse the data block; pressure bytes come first
    pub fn from_bytes(buf: &[u8; SAMPLE_LEN]) -> Self {
        Self {
            pressure: adc20(buf[0], buf[1], buf[2]),
            temperature: adc20(buf[3], buf[4], buf[5]),
        }
    }
}

/// Assemble MSB, LSB and the top nibble of XLSB into a 20-bit count
fn adc20(msb: u8, lsb: u8, xlsb: u8) -> u32 {
    ((msb as u32) << 12) | ((lsb as u32) << 4) | ((xlsb as u32) >> 4)
}

/// Calibration plus the fine temperature carried between compensations
///
/// Pressure compensation reads the `t_fine` left behind by the most recent
/// temperature compensation. For correct output, compensate the temperature
/// of a sample immediately before its pressure, or use
/// [`Compensator::compensate`] which does both in order.
#[derive(Debug, Clone)]
pub struct Compensator {
    calibration: Calibration,
    t_fine: i32,
}

impl Compensator {
    /// Create a compensator with no temperature history
    pub fn new(calibration: Calibration) -> Self {
        Self {
            calibration,
            t_fine: 0,
        }
    }

    /// Calibration constants in use
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Fine temperature from the last temperature compensation
    pub fn t_fine(&self) -> i32 {
        self.t_fine
    }

    /// Compensate temperature, returning centi-degrees Celsius
    ///
    /// Updates the stored `t_fine`.
    pub fn compensate_temperature(&mut self, adc_t: u32) -> i32 {
        let (temperature, t_fine) = self.calibration.compensate_temperature(adc_t);
        self.t_fine = t_fine;
        temperature
    }

    /// Compensate pressure against the stored `t_fine`, returning pascals
    pub fn compensate_pressure(&self, adc_p: u32) -> u32 {
        self.calibration.compensate_pressure(adc_p, self.t_fine)
    }

    /// Compensate both halves of one sample, temperature first
    pub fn compensate(&mut self, sample: RawSample) -> Measurement {
        let temperature_centi = self.compensate_temperature(sample.temperature);
        let pressure_pa = self.compensate_pressure(sample.pressure);
        Measurement {
            temperature_centi,
            pressure_pa,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Calibration block from the datasheet's worked example
    pub(crate) const DATASHEET_CALIBRATION: [u8; CALIBRATION_LEN] = [
        0x70, 0x6B, 0x43, 0x67, 0x18, 0xFC, 0x7D, 0x8E, 0x43, 0xD6, 0xD0, 0x0B, 0x27, 0x0B, 0x8C,
        0x00, 0xF9, 0xFF, 0x8C, 0x3C, 0xF8, 0xC6, 0x70, 0x17,
    ];

    /// Data block encoding adc_P = 415148, adc_T = 519888
    pub(crate) const DATASHEET_SAMPLE: [u8; SAMPLE_LEN] = [0x65, 0x5A, 0xC0, 0x7E, 0xED, 0x00];

    fn datasheet() -> Calibration {
        Calibration::from_bytes(&DATASHEET_CALIBRATION)
    }

    #[test]
    fn test_calibration_layout() {
        let cal = datasheet();
        assert_eq!(cal.dig_t1, 27504);
        assert_eq!(cal.dig_t2, 26435);
        assert_eq!(cal.dig_t3, -1000);
        assert_eq!(cal.dig_p1, 36477);
        assert_eq!(cal.dig_p2, -10685);
        assert_eq!(cal.dig_p3, 3024);
        assert_eq!(cal.dig_p4, 2855);
        assert_eq!(cal.dig_p5, 140);
        assert_eq!(cal.dig_p6, -7);
        assert_eq!(cal.dig_p7, 15500);
        assert_eq!(cal.dig_p8, -14600);
        assert_eq!(cal.dig_p9, 6000);
    }

    #[test]
    fn test_unsigned_fields_do_not_sign_extend() {
        let mut block = [0u8; CALIBRATION_LEN];
        block[0] = 0xFF;
        block[1] = 0xFF;
        block[6] = 0x00;
        block[7] = 0x80;
        block[2] = 0xFF;
        block[3] = 0xFF;

        let cal = Calibration::from_bytes(&block);
        assert_eq!(cal.dig_t1, 0xFFFF);
        assert_eq!(cal.dig_p1, 0x8000);
        assert_eq!(cal.dig_t2, -1);
    }

    #[test]
    fn test_raw_sample_layout() {
        let sample = RawSample::from_bytes(&DATASHEET_SAMPLE);
        assert_eq!(sample.pressure, 415_148);
        assert_eq!(sample.temperature, 519_888);

        // Low nibble of XLSB is not part of the count
        let sample = RawSample::from_bytes(&[0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x0F]);
        assert_eq!(sample.pressure, 0xF_FFFF);
        assert_eq!(sample.temperature, 0);
    }

    #[test]
    fn test_datasheet_temperature() {
        let (temperature, t_fine) = datasheet().compensate_temperature(519_888);
        assert_eq!(t_fine, 128_422);
        assert_eq!(temperature, 2508);
    }

    #[test]
    fn test_datasheet_pressure() {
        let mut comp = Compensator::new(datasheet());
        assert_eq!(comp.compensate_temperature(519_888), 2508);
        assert_eq!(comp.t_fine(), 128_422);
        // Datasheet float result is 100653.27 Pa; the 32-bit path lands at 100656
        assert_eq!(comp.compensate_pressure(415_148), 100_656);
    }

    #[test]
    fn test_large_dividend_branch() {
        // adc_P = 0 pushes the dividend past 0x8000_0000
        assert_eq!(datasheet().compensate_pressure(0, 128_422), 173_204);
    }

    #[test]
    fn test_zero_divisor_returns_zero() {
        let mut cal = datasheet();
        cal.dig_p1 = 0;
        let mut comp = Compensator::new(cal);
        comp.compensate_temperature(519_888);
        assert_eq!(comp.compensate_pressure(415_148), 0);
    }

    #[test]
    fn test_temperature_extremes() {
        let cal = datasheet();
        assert_eq!(cal.compensate_temperature(0), (-14_088, -721_301));
        assert_eq!(cal.compensate_temperature(0xF_FFFF), (18_755, 960_246));
    }

    #[test]
    fn test_compensate_orders_temperature_first() {
        let mut comp = Compensator::new(datasheet());
        // Stale t_fine from an unrelated sample
        comp.compensate_temperature(300_000);

        let m = comp.compensate(RawSample::from_bytes(&DATASHEET_SAMPLE));
        assert_eq!(m.temperature_centi, 2508);
        assert_eq!(m.pressure_pa, 100_656);
    }

    proptest! {
        #[test]
        fn prop_fresh_compensators_agree(
            block in proptest::array::uniform24(any::<u8>()),
            adc_t in 0u32..=0xF_FFFF,
            adc_p in 0u32..=0xF_FFFF,
        ) {
            let cal = Calibration::from_bytes(&block);
            let mut a = Compensator::new(cal);
            let mut b = Compensator::new(cal);

            let sample = RawSample { temperature: adc_t, pressure: adc_p };
            prop_assert_eq!(a.compensate(sample), b.compensate(sample));
            prop_assert_eq!(a.t_fine(), b.t_fine());
        }

        #[test]
        fn prop_pressure_only_depends_on_t_fine(
            adc_t in 0u32..=0xF_FFFF,
            adc_p in 0u32..=0xF_FFFF,
        ) {
            let cal = datasheet();
            let (_, t_fine) = cal.compensate_temperature(adc_t);

            let mut comp = Compensator::new(cal);
            comp.compensate_temperature(adc_t);
            prop_assert_eq!(comp.compensate_pressure(adc_p), cal.compensate_pressure(adc_p, t_fine));
        }
    }
}
