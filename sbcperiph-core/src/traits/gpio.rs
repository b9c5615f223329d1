//! GPIO controller trait and errors

/// Errors from GPIO controller operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioError {
    /// Pin index outside `0..pin_count`
    InvalidPin {
        /// Requested pin
        pin: u32,
        /// Pins exposed by the controller
        pin_count: u32,
    },
    /// Controller configured with more pins than its register bank addresses
    InvalidPinCount(u32),
}

/// A bank of GPIO lines addressed by logical pin number
///
/// Mirrors the callbacks a platform gpio-chip registration expects.
/// Every operation rejects pins outside `0..pin_count()` with
/// [`GpioError::InvalidPin`].
pub trait GpioController {
    /// Label reported to consumers
    fn label(&self) -> &str;

    /// Number of pins exposed
    fn pin_count(&self) -> u32;

    /// Whether operations may block
    fn can_sleep(&self) -> bool {
        false
    }

    /// Read the input level of a pin
    fn get(&self, pin: u32) -> Result<bool, GpioError>;

    /// Drive an output pin high or low
    fn set(&mut self, pin: u32, high: bool) -> Result<(), GpioError>;

    /// Configure a pin as an input
    fn direction_input(&mut self, pin: u32) -> Result<(), GpioError>;

    /// Configure a pin as an output driving `high`
    fn direction_output(&mut self, pin: u32, high: bool) -> Result<(), GpioError>;
}
