//! BCM2835 GPIO register bank
//!
//! Maps logical pin numbers onto the memory-mapped GPIO block:
//!
//! | Block  | Offset | Layout                          |
//! |--------|--------|---------------------------------|
//! | GPFSEL | 0x00   | 3 bits per pin, 10 pins / word  |
//! | GPSET  | 0x1C   | write-1-to-set, 32 pins / word  |
//! | GPCLR  | 0x28   | write-1-to-clear, 32 pins / word|
//! | GPLEV  | 0x34   | read-only level, 32 pins / word |
//!
//! # Concurrency
//!
//! Level writes go to the self-masking set/clear registers and need no
//! locking. Direction changes are a read-modify-write of a function-select
//! word shared by ten pins: the caller must hold exclusive access to the
//! register bank for the duration of the call. `&mut self` enforces this
//! within one owner; across owners it is the host's job.

use sbcperiph_core::config::{GpioConfig, MAX_LABEL_LEN};
use sbcperiph_core::traits::{GpioController, GpioError};
use heapless::String;
use sbcperiph_hal::{InputPin, MemoryRegisterChannel, OutputPin};

/// GPIO register block offsets
pub mod reg {
    /// Function select, pins 0-9
    pub const GPFSEL0: u32 = 0x00;
    /// Output set, pins 0-31
    pub const GPSET0: u32 = 0x1C;
    /// Output clear, pins 0-31
    pub const GPCLR0: u32 = 0x28;
    /// Pin level, pins 0-31
    pub const GPLEV0: u32 = 0x34;
}

/// Pins addressable by the register bank
pub const GPIO_COUNT: u32 = 54;

const PINS_PER_FSEL_WORD: u32 = 10;
const FSEL_WIDTH: u32 = 3;
const FSEL_MASK: u32 = 0b111;
const PINS_PER_WORD: u32 = 32;

const FSEL_INPUT: u32 = 0b000;
const FSEL_OUTPUT: u32 = 0b001;

/// Decoded function-select field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinFunction {
    /// 0b000
    Input,
    /// 0b001
    Output,
    /// Alternate function 0-5
    Alternate(u8),
}

impl PinFunction {
    /// Decode a 3-bit function-select field
    pub fn from_bits(bits: u32) -> Self {
        match bits & FSEL_MASK {
            0b000 => PinFunction::Input,
            0b001 => PinFunction::Output,
            0b100 => PinFunction::Alternate(0),
            0b101 => PinFunction::Alternate(1),
            0b110 => PinFunction::Alternate(2),
            0b111 => PinFunction::Alternate(3),
            0b011 => PinFunction::Alternate(4),
            _ => PinFunction::Alternate(5),
        }
    }
}

/// Byte offset of the function-select word for `pin` and the field shift
fn fsel_location(pin: u32) -> (u32, u32) {
    let word = pin / PINS_PER_FSEL_WORD;
    let shift = (pin % PINS_PER_FSEL_WORD) * FSEL_WIDTH;
    (reg::GPFSEL0 + word * 4, shift)
}

/// Byte offset within a 1-bit-per-pin block and the pin's mask
fn bit_location(block: u32, pin: u32) -> (u32, u32) {
    let word = pin / PINS_PER_WORD;
    let bit = pin % PINS_PER_WORD;
    (block + word * 4, 1 << bit)
}

/// GPIO controller over a memory-mapped register bank
pub struct GpioRegisterMap<M> {
    regs: M,
    label: String<MAX_LABEL_LEN>,
    pin_count: u32,
}

impl<M: MemoryRegisterChannel> GpioRegisterMap<M> {
    /// Create a controller over an already-mapped register bank
    ///
    /// Fails with [`GpioError::InvalidPinCount`] if the config exposes more
    /// pins than the bank addresses.
    pub fn new(regs: M, config: GpioConfig) -> Result<Self, GpioError> {
        if config.pin_count > GPIO_COUNT {
            return Err(GpioError::InvalidPinCount(config.pin_count));
        }
        info!(
            "gpio: {=str} registered with {=u32} pins",
            config.label.as_str(),
            config.pin_count
        );
        Ok(Self {
            regs,
            label: config.label,
            pin_count: config.pin_count,
        })
    }

    /// Release the register bank
    pub fn release(self) -> M {
        self.regs
    }

    /// Drive a pin high or low
    ///
    /// A single write to GPSET or GPCLR; no read-modify-write.
    pub fn set_level(&mut self, pin: u32, high: bool) -> Result<(), GpioError> {
        let pin = self.check(pin)?;
        self.write_level(pin, high);
        Ok(())
    }

    /// Read a pin's level from GPLEV
    pub fn get_level(&self, pin: u32) -> Result<bool, GpioError> {
        let pin = self.check(pin)?;
        Ok(self.read_level(pin))
    }

    /// Configure a pin as an input
    ///
    /// Read-modify-write of the shared function-select word; requires
    /// exclusive access to the register bank.
    pub fn set_direction_input(&mut self, pin: u32) -> Result<(), GpioError> {
        let pin = self.check(pin)?;
        self.write_function(pin, FSEL_INPUT);
        Ok(())
    }

    /// Configure a pin as an output and drive `initial`
    ///
    /// Two separate writes: the function-select change lands first, so the
    /// pin briefly drives whatever its output latch held before `initial`
    /// is applied. This window cannot be closed on this hardware.
    pub fn set_direction_output(&mut self, pin: u32, initial: bool) -> Result<(), GpioError> {
        let pin = self.check(pin)?;
        debug!("gpio: pin {=u32} output, initial {=bool}", pin, initial);
        self.write_function(pin, FSEL_OUTPUT);
        self.write_level(pin, initial);
        Ok(())
    }

    /// Decode a pin's current function-select field
    pub fn function(&self, pin: u32) -> Result<PinFunction, GpioError> {
        let pin = self.check(pin)?;
        let (offset, shift) = fsel_location(pin);
        Ok(PinFunction::from_bits(self.regs.read_word(offset) >> shift))
    }

    /// Configure a pin as an output and borrow it as an [`OutputPin`]
    pub fn output_pin(&mut self, pin: u32, initial: bool) -> Result<GpioOutput<'_, M>, GpioError> {
        self.set_direction_output(pin, initial)?;
        Ok(GpioOutput { map: self, pin })
    }

    /// Configure a pin as an input and borrow it as an [`InputPin`]
    pub fn input_pin(&mut self, pin: u32) -> Result<GpioInput<'_, M>, GpioError> {
        self.set_direction_input(pin)?;
        Ok(GpioInput { map: self, pin })
    }

    fn check(&self, pin: u32) -> Result<u32, GpioError> {
        if pin < self.pin_count {
            Ok(pin)
        } else {
            warn!("gpio: rejected pin {=u32} of {=u32}", pin, self.pin_count);
            Err(GpioError::InvalidPin {
                pin,
                pin_count: self.pin_count,
            })
        }
    }

    fn write_level(&mut self, pin: u32, high: bool) {
        let block = if high { reg::GPSET0 } else { reg::GPCLR0 };
        let (offset, mask) = bit_location(block, pin);
        self.regs.write_word(offset, mask);
    }

    fn read_level(&self, pin: u32) -> bool {
        let (offset, mask) = bit_location(reg::GPLEV0, pin);
        self.regs.read_word(offset) & mask != 0
    }

    fn write_function(&mut self, pin: u32, bits: u32) {
        let (offset, shift) = fsel_location(pin);
        let mut value = self.regs.read_word(offset);
        value &= !(FSEL_MASK << shift);
        value |= bits << shift;
        self.regs.write_word(offset, value);
    }
}

impl<M: MemoryRegisterChannel> GpioController for GpioRegisterMap<M> {
    fn label(&self) -> &str {
        self.label.as_str()
    }

    fn pin_count(&self) -> u32 {
        self.pin_count
    }

    fn get(&self, pin: u32) -> Result<bool, GpioError> {
        self.get_level(pin)
    }

    fn set(&mut self, pin: u32, high: bool) -> Result<(), GpioError> {
        self.set_level(pin, high)
    }

    fn direction_input(&mut self, pin: u32) -> Result<(), GpioError> {
        self.set_direction_input(pin)
    }

    fn direction_output(&mut self, pin: u32, high: bool) -> Result<(), GpioError> {
        self.set_direction_output(pin, high)
    }
}

/// A validated output pin borrowed from a [`GpioRegisterMap`]
pub struct GpioOutput<'a, M> {
    map: &'a mut GpioRegisterMap<M>,
    pin: u32,
}

impl<M> GpioOutput<'_, M> {
    /// Logical pin number
    pub fn pin(&self) -> u32 {
        self.pin
    }
}

impl<M: MemoryRegisterChannel> OutputPin for GpioOutput<'_, M> {
    fn set_high(&mut self) {
        self.map.write_level(self.pin, true);
    }

    fn set_low(&mut self) {
        self.map.write_level(self.pin, false);
    }

    fn is_set_high(&self) -> bool {
        self.map.read_level(self.pin)
    }
}

/// A validated input pin borrowed from a [`GpioRegisterMap`]
pub struct GpioInput<'a, M> {
    map: &'a GpioRegisterMap<M>,
    pin: u32,
}

impl<M> GpioInput<'_, M> {
    /// Logical pin number
    pub fn pin(&self) -> u32 {
        self.pin
    }
}

impl<M: MemoryRegisterChannel> InputPin for GpioInput<'_, M> {
    fn is_high(&self) -> bool {
        self.map.read_level(self.pin)
    }
}
