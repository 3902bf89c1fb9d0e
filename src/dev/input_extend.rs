//! Support for input-only chains of 74HC165 parallel-in/serial-out registers.
use crate::common::bit_position;
use crate::fmt::{debug, trace};
use crate::shift;
use crate::UpdateHook;
use embedded_hal::digital::{InputPin, OutputPin};

/// `BOARDS` chained 74HC165s, eight inputs each.
///
/// Input numbers are sequential: bit 0 of the first board is input 0.  The first board is the
/// one whose serial output feeds the data line, so its bits arrive first.  Inputs are reported
/// as the raw line levels.
pub struct InputExtend<DATA, CLK, LATCH, const BOARDS: usize> {
    data: DATA,
    clock: CLK,
    latch: LATCH,
    inputs: [u8; BOARDS],
    auto_update: bool,
    hook: UpdateHook,
}

impl<DATA, CLK, LATCH, E, const BOARDS: usize> InputExtend<DATA, CLK, LATCH, BOARDS>
where
    DATA: InputPin<Error = E>,
    CLK: OutputPin<Error = E>,
    LATCH: OutputPin<Error = E>,
{
    pub fn new(data: DATA, mut clock: CLK, mut latch: LATCH) -> Result<Self, E> {
        latch.set_high()?;
        clock.set_low()?;
        Ok(Self {
            data,
            clock,
            latch,
            inputs: [0; BOARDS],
            auto_update: true,
            hook: UpdateHook::new(),
        })
    }

    /// Level of one input.  Numbers outside the chain read low.
    pub fn read_bit(&mut self, number: usize) -> Result<bool, E> {
        self.auto()?;
        let (board, mask) = bit_position(number);
        match self.inputs.get(board) {
            Some(byte) => Ok(byte & mask != 0),
            None => {
                debug!("input extend: input {} out of range", number);
                Ok(false)
            }
        }
    }

    /// All eight inputs of one board.  Boards outside the chain read `0`.
    pub fn read_byte(&mut self, board: usize) -> Result<u8, E> {
        self.auto()?;
        Ok(self.inputs.get(board).copied().unwrap_or(0))
    }

    /// Every input, first board first.
    pub fn read_all(&mut self) -> Result<&[u8; BOARDS], E> {
        self.auto()?;
        Ok(&self.inputs)
    }

    /// Input buffer as of the last update.
    pub fn inputs(&self) -> &[u8; BOARDS] {
        &self.inputs
    }

    pub fn size(&self) -> usize {
        BOARDS
    }

    pub fn auto_update(&self) -> bool {
        self.auto_update
    }

    pub fn set_auto_update(&mut self, auto_update: bool) {
        self.auto_update = auto_update;
    }

    pub fn set_hook(&mut self, hook: fn()) {
        self.hook.set(hook);
    }

    pub fn clear_hook(&mut self) {
        self.hook.clear();
    }

    /// Capture every input and shift the chain in.
    ///
    /// The registers load their inputs while the latch line is low and shift while it is high.
    pub fn update(&mut self) -> Result<(), E> {
        self.latch.set_high()?;
        for input in self.inputs.iter_mut() {
            *input = shift::shift_in(&mut self.data, &mut self.clock)?;
        }
        self.latch.set_low()?;

        trace!("input extend: read {} boards", BOARDS);
        self.hook.call();
        Ok(())
    }

    pub fn release(self) -> (DATA, CLK, LATCH) {
        (self.data, self.clock, self.latch)
    }

    fn auto(&mut self) -> Result<(), E> {
        if self.auto_update {
            self.update()
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::shift::expect;
    use core::sync::atomic::{AtomicUsize, Ordering};
    use embedded_hal_mock::eh1::digital::Mock as PinMock;

    struct Pins {
        data: PinMock,
        clock: PinMock,
        latch: PinMock,
    }

    impl Pins {
        /// Expectations for construction followed by one read per `boards` bytes of `frames`.
        fn new(boards: usize, frames: &[u8]) -> Self {
            let mut clock = vec![expect::low()];
            clock.extend(expect::pulses(frames.len() * 8));
            let mut latch = vec![expect::high()];
            for _ in 0..frames.len() / boards {
                latch.extend([expect::high(), expect::low()]);
            }

            Self {
                data: PinMock::new(&expect::data_in(frames)),
                clock: PinMock::new(&clock),
                latch: PinMock::new(&latch),
            }
        }

        fn done(mut self) {
            self.data.done();
            self.clock.done();
            self.latch.done();
        }
    }

    #[test]
    fn input_extend_first_board_first() {
        let pins = Pins::new(2, &[0x81, 0x04]);
        let mut inputs = super::InputExtend::<_, _, _, 2>::new(
            pins.data.clone(),
            pins.clock.clone(),
            pins.latch.clone(),
        )
        .unwrap();
        inputs.set_auto_update(false);

        inputs.update().unwrap();
        assert_eq!(inputs.inputs(), &[0x81, 0x04]);
        assert!(inputs.read_bit(0).unwrap());
        assert!(inputs.read_bit(7).unwrap());
        assert!(inputs.read_bit(10).unwrap());
        assert!(!inputs.read_bit(8).unwrap());
        assert!(!inputs.read_bit(16).unwrap());
        assert_eq!(inputs.read_byte(1).unwrap(), 0x04);
        assert_eq!(inputs.read_byte(2).unwrap(), 0x00);
        assert_eq!(inputs.size(), 2);

        pins.done();
    }

    static HOOK_CALLS: AtomicUsize = AtomicUsize::new(0);

    fn on_update() {
        HOOK_CALLS.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn input_extend_auto_update() {
        let pins = Pins::new(1, &[0x10, 0x20, 0x40]);
        let mut inputs = super::InputExtend::<_, _, _, 1>::new(
            pins.data.clone(),
            pins.clock.clone(),
            pins.latch.clone(),
        )
        .unwrap();
        inputs.set_hook(on_update);

        assert!(inputs.read_bit(4).unwrap());
        assert_eq!(inputs.read_byte(0).unwrap(), 0x20);
        assert_eq!(inputs.read_all().unwrap(), &[0x40]);
        assert_eq!(HOOK_CALLS.load(Ordering::SeqCst), 3);

        inputs.clear_hook();
        let (_, _, _) = inputs.release();
        pins.done();
    }
}
