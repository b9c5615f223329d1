//! Register channel abstractions
//!
//! A register channel performs addressed transactions against a device's
//! 8-bit register file, independent of the physical transport.

use embedded_hal::i2c::I2c;

/// Byte-addressed device register access
///
/// Each call is one atomic bus transaction. Implementations report how many
/// bytes the device actually delivered so the caller can reject partial
/// transfers.
pub trait RegisterChannel {
    /// Error type for channel transactions
    type Error;

    /// Read consecutive registers starting at `start` into `buf`
    ///
    /// # Returns
    /// The number of bytes transferred. Anything less than `buf.len()` is a
    /// short read and must not be treated as valid data.
    fn read_registers(&mut self, start: u8, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Write a single register
    fn write_register(&mut self, register: u8, value: u8) -> Result<(), Self::Error>;
}

impl<T: RegisterChannel + ?Sized> RegisterChannel for &mut T {
    type Error = T::Error;

    fn read_registers(&mut self, start: u8, buf: &mut [u8]) -> Result<usize, Self::Error> {
        (**self).read_registers(start, buf)
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), Self::Error> {
        (**self).write_register(register, value)
    }
}

/// Register channel over an `embedded-hal` I2C master
///
/// Reads are a register-address write followed by a repeated-start read;
/// writes send the register address and value in one transaction.
pub struct I2cRegisterChannel<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> I2cRegisterChannel<I2C> {
    /// Create a channel for the device at the given 7-bit address
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// 7-bit device address
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Release the underlying bus
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> RegisterChannel for I2cRegisterChannel<I2C> {
    type Error = I2C::Error;

    fn read_registers(&mut self, start: u8, buf: &mut [u8]) -> Result<usize, Self::Error> {
        // embedded-hal transfers are all-or-error
        self.i2c.write_read(self.address, &[start], buf)?;
        Ok(buf.len())
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), Self::Error> {
        self.i2c.write(self.address, &[register, value])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    #[test]
    fn test_block_read_is_single_write_read() {
        let expectations = [I2cTransaction::write_read(
            0x76,
            vec![0xF7],
            vec![0x65, 0x5A, 0xC0, 0x7E, 0xED, 0x00],
        )];
        let mut channel = I2cRegisterChannel::new(I2cMock::new(&expectations), 0x76);

        let mut buf = [0u8; 6];
        let n = channel.read_registers(0xF7, &mut buf).unwrap();
        assert_eq!(n, 6);
        assert_eq!(buf, [0x65, 0x5A, 0xC0, 0x7E, 0xED, 0x00]);

        channel.release().done();
    }

    #[test]
    fn test_register_write_sends_address_then_value() {
        let expectations = [I2cTransaction::write(0x77, vec![0xF4, 0x27])];
        let mut channel = I2cRegisterChannel::new(I2cMock::new(&expectations), 0x77);

        channel.write_register(0xF4, 0x27).unwrap();
        assert_eq!(channel.address(), 0x77);

        channel.release().done();
    }

    #[test]
    fn test_bus_error_is_propagated() {
        let expectations =
            [I2cTransaction::write_read(0x76, vec![0xD0], vec![0x00]).with_error(ErrorKind::Other)];
        let mut channel = I2cRegisterChannel::new(I2cMock::new(&expectations), 0x76);

        let mut buf = [0u8; 1];
        assert_eq!(channel.read_registers(0xD0, &mut buf), Err(ErrorKind::Other));

        channel.release().done();
    }
}
