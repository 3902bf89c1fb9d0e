/// Operations the button state machines need from a button/lamp board.
///
/// Button and lamp numbers are sequential across the chain: bit 0 of board 0 is number 0, bit 0
/// of board 1 is number 8.
pub trait ButtonDriver {
    type Error;

    /// Run one combined input/output transaction.
    fn update(&mut self) -> Result<(), Self::Error>;

    /// Whether every accessor runs [`ButtonDriver::update`] on its own.
    fn auto_update(&self) -> bool;

    /// Read a button, updating first when auto update is on.
    ///
    /// Numbers outside the chain read as released.
    fn button(&mut self, number: usize) -> Result<bool, Self::Error>;

    /// Set a lamp, updating afterwards when auto update is on.
    ///
    /// Numbers outside the chain are ignored.
    fn set_lamp(&mut self, number: usize, state: bool) -> Result<(), Self::Error>;

    /// Current lamp state in the output buffer.  Does not touch the hardware.
    fn lamp(&self, number: usize) -> bool;

    /// Number of buttons (and lamps) on the chain.
    fn button_count(&self) -> usize;

    fn update_if_manual(&mut self) -> Result<(), Self::Error> {
        if self.auto_update() {
            Ok(())
        } else {
            self.update()
        }
    }
}

/// Operations digit groups need from a seven-segment chain.
pub trait SegmentDriver {
    type Error;

    /// One segment pattern per digit, index 0 first in the chain buffer.
    fn segments_mut(&mut self) -> &mut [u8];

    fn auto_update(&self) -> bool;

    /// Send the segment buffer to the chain.
    fn update(&mut self) -> Result<(), Self::Error>;

    fn update_if_auto(&mut self) -> Result<(), Self::Error> {
        if self.auto_update() {
            self.update()
        } else {
            Ok(())
        }
    }
}

/// Split a sequential bit number into board index and bit mask.
pub(crate) fn bit_position(number: usize) -> (usize, u8) {
    (number / 8, 1 << (number % 8))
}

#[cfg(test)]
mod tests {
    #[test]
    fn bit_position() {
        assert_eq!(super::bit_position(0), (0, 0x01));
        assert_eq!(super::bit_position(7), (0, 0x80));
        assert_eq!(super::bit_position(8), (1, 0x01));
        assert_eq!(super::bit_position(21), (2, 0x20));
    }
}
