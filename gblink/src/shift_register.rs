//! 8-bit shift registers for the link
//!
//! Bits travel most significant bit first in both directions.

/// Receiving shift register
///
/// Collects one bit per clock and reports the assembled byte once the eighth bit has arrived.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ShiftIn {
    value: u8,
    bits: u8,
}

impl ShiftIn {
    pub const fn new() -> Self {
        ShiftIn { value: 0, bits: 0 }
    }

    /// Shift `bit` in at the least significant position
    ///
    /// Returns the completed byte on the eighth call, after which the register is empty again.
    pub fn shift_in(&mut self, bit: bool) -> Option<u8> {
        self.value = (self.value << 1) | u8::from(bit);
        self.bits += 1;
        if self.bits == 8 {
            let byte = self.value;
            self.reset();
            Some(byte)
        } else {
            None
        }
    }

    /// Bits accumulated since the last byte boundary (0..=7)
    pub fn bit_count(&self) -> u8 {
        self.bits
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Transmitting shift register
///
/// The bit presented on the line is always the most significant bit of the register.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ShiftOut {
    value: u8,
}

impl ShiftOut {
    pub const fn new() -> Self {
        ShiftOut { value: 0 }
    }

    /// Replace the register contents with the next byte to send
    pub fn load(&mut self, byte: u8) {
        self.value = byte;
    }

    /// The bit currently presented on the line
    pub fn current_bit(&self) -> bool {
        self.value & 0x80 != 0
    }

    /// Move the next bit into the presented position
    pub fn shift(&mut self) {
        self.value <<= 1;
    }

    pub fn byte(&self) -> u8 {
        self.value
    }
}
