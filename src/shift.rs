//! Bit-level shift register protocol.
//!
//! Every driver in this crate talks to its chain through these primitives: bytes go out most
//! significant bit first, each bit held on the data line while the clock is pulsed high then low,
//! and a separate latch pulse commits (or captures) the shifted data.
use embedded_hal::digital::{InputPin, OutputPin, PinState};

/// Data and clock lines of an output shift register chain.
pub struct ShiftOut<DATA, CLK> {
    data: DATA,
    clock: CLK,
}

impl<DATA, CLK, E> ShiftOut<DATA, CLK>
where
    DATA: OutputPin<Error = E>,
    CLK: OutputPin<Error = E>,
{
    /// Take ownership of the two lines and park the clock low.
    pub fn new(data: DATA, mut clock: CLK) -> Result<Self, E> {
        clock.set_low()?;
        Ok(Self { data, clock })
    }

    pub fn write_byte(&mut self, value: u8) -> Result<(), E> {
        for bit in (0..8).rev() {
            self.data
                .set_state(PinState::from(value & (1 << bit) != 0))?;
            pulse(&mut self.clock)?;
        }
        Ok(())
    }

    pub fn write_all(&mut self, bytes: &[u8]) -> Result<(), E> {
        for b in bytes {
            self.write_byte(*b)?;
        }
        Ok(())
    }

    pub fn release(self) -> (DATA, CLK) {
        (self.data, self.clock)
    }
}

/// Pulse a line high then low.  Used for clocks and for latches.
pub fn pulse<P: OutputPin>(pin: &mut P) -> Result<(), P::Error> {
    pin.set_high()?;
    pin.set_low()
}

/// Shift one byte in, most significant bit first.
///
/// Each bit is sampled before the clock pulse that advances the chain to the next one.
pub fn shift_in<DATA, CLK, E>(data: &mut DATA, clock: &mut CLK) -> Result<u8, E>
where
    DATA: InputPin<Error = E>,
    CLK: OutputPin<Error = E>,
{
    let mut value = 0u8;
    for _ in 0..8 {
        value <<= 1;
        if data.is_high()? {
            value |= 1;
        }
        pulse(clock)?;
    }
    Ok(value)
}

/// Shift one byte out and one byte in on the same clock.
pub fn exchange<OUT, IN, CLK, E>(
    data_out: &mut OUT,
    data_in: &mut IN,
    clock: &mut CLK,
    value: u8,
) -> Result<u8, E>
where
    OUT: OutputPin<Error = E>,
    IN: InputPin<Error = E>,
    CLK: OutputPin<Error = E>,
{
    let mut out = value;
    let mut received = 0u8;
    for _ in 0..8 {
        data_out.set_state(PinState::from(out & 0x80 != 0))?;
        out <<= 1;
        received <<= 1;
        if data_in.is_high()? {
            received |= 1;
        }
        pulse(clock)?;
    }
    Ok(received)
}

/// Builders for pin-mock expectations of the protocol above.
#[cfg(test)]
pub(crate) mod expect {
    use embedded_hal_mock::eh1::digital::{State, Transaction as PinTransaction};

    fn level(high: bool) -> State {
        if high {
            State::High
        } else {
            State::Low
        }
    }

    /// Data line writes for `bytes`, MSB first.
    pub(crate) fn data_out(bytes: &[u8]) -> Vec<PinTransaction> {
        bytes
            .iter()
            .flat_map(|b| (0..8).rev().map(move |bit| b & (1 << bit) != 0))
            .map(|high| PinTransaction::set(level(high)))
            .collect()
    }

    /// Data line reads producing `bytes`, MSB first.
    pub(crate) fn data_in(bytes: &[u8]) -> Vec<PinTransaction> {
        bytes
            .iter()
            .flat_map(|b| (0..8).rev().map(move |bit| b & (1 << bit) != 0))
            .map(|high| PinTransaction::get(level(high)))
            .collect()
    }

    pub(crate) fn pulses(count: usize) -> Vec<PinTransaction> {
        (0..count)
            .flat_map(|_| {
                [
                    PinTransaction::set(State::High),
                    PinTransaction::set(State::Low),
                ]
            })
            .collect()
    }

    pub(crate) fn low() -> PinTransaction {
        PinTransaction::set(State::Low)
    }

    pub(crate) fn high() -> PinTransaction {
        PinTransaction::set(State::High)
    }
}
