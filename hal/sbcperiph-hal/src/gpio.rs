//! GPIO pin abstractions
//!
//! Single-pin views over a GPIO controller. Handles are validated when they
//! are created, so the operations themselves cannot fail.

/// Digital output pin
pub trait OutputPin {
    /// Drive the pin high (logic 1)
    fn set_high(&mut self);

    /// Drive the pin low (logic 0)
    fn set_low(&mut self);

    /// Drive the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin currently reads high
    fn is_set_high(&self) -> bool;

    /// Check if the pin currently reads low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }

    /// Invert the current level
    fn toggle(&mut self) {
        let high = self.is_set_high();
        self.set_state(!high);
    }
}

/// Digital input pin
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}
