//! Support for chains of seven-segment digits, each driven by one 74HC595.
use crate::fmt::{debug, trace};
use crate::segment::{self, DECIMAL_POINT};
use crate::shift::{self, ShiftOut};
use crate::{ChainMutex, DigitGroup, SegmentDriver, UpdateHook};
use embedded_hal::digital::OutputPin;

/// Chain of `DIGITS` seven-segment digits.
///
/// Split the chain into independent displays with [`Digits::group`].
pub struct Digits<M>(M);

impl<DATA, CLK, LATCH, E, const DIGITS: usize>
    Digits<core::cell::RefCell<Driver<DATA, CLK, LATCH, DIGITS>>>
where
    DATA: OutputPin<Error = E>,
    CLK: OutputPin<Error = E>,
    LATCH: OutputPin<Error = E>,
{
    /// Create a digit chain and blank it.
    pub fn new(data: DATA, clock: CLK, latch: LATCH) -> Result<Self, E> {
        Self::with_mutex(data, clock, latch)
    }
}

impl<DATA, CLK, LATCH, E, M, const DIGITS: usize> Digits<M>
where
    DATA: OutputPin<Error = E>,
    CLK: OutputPin<Error = E>,
    LATCH: OutputPin<Error = E>,
    M: ChainMutex<Chain = Driver<DATA, CLK, LATCH, DIGITS>>,
{
    pub fn with_mutex(data: DATA, clock: CLK, latch: LATCH) -> Result<Self, E> {
        Ok(Self(M::create(Driver::new(data, clock, latch)?)))
    }

    pub fn set_digit(&self, pos: usize, value: u8, dp: bool) -> Result<(), E> {
        self.0.lock(|drv| drv.set_digit(pos, value, dp))
    }

    pub fn copy_section(&self, from: usize, to: usize, len: usize) {
        self.0.lock(|drv| drv.copy_section(from, to, len))
    }
}

impl<M> Digits<M>
where
    M: ChainMutex,
    M::Chain: SegmentDriver,
{
    /// Display over the digits `offset..offset + len`, clamped to the chain.
    ///
    /// Groups may overlap; whatever was written last wins.
    pub fn group(&self, offset: usize, len: usize) -> DigitGroup<'_, M> {
        DigitGroup::new(&self.0, offset, len)
    }

    pub fn update(&self) -> Result<(), <M::Chain as SegmentDriver>::Error> {
        self.0.lock(|drv| drv.update())
    }

    /// Run `f` with exclusive access to the driver.
    pub fn lock<R, F: FnOnce(&mut M::Chain) -> R>(&self, f: F) -> R {
        self.0.lock(f)
    }

    pub fn into_inner(self) -> M {
        self.0
    }
}

pub struct Driver<DATA, CLK, LATCH, const DIGITS: usize> {
    out: ShiftOut<DATA, CLK>,
    latch: LATCH,
    segments: [u8; DIGITS],
    auto_update: bool,
    hook: UpdateHook,
}

impl<DATA, CLK, LATCH, E, const DIGITS: usize> Driver<DATA, CLK, LATCH, DIGITS>
where
    DATA: OutputPin<Error = E>,
    CLK: OutputPin<Error = E>,
    LATCH: OutputPin<Error = E>,
{
    pub fn new(data: DATA, clock: CLK, mut latch: LATCH) -> Result<Self, E> {
        let out = ShiftOut::new(data, clock)?;
        latch.set_low()?;
        let mut driver = Self {
            out,
            latch,
            segments: [0; DIGITS],
            auto_update: true,
            hook: UpdateHook::new(),
        };
        driver.update()?;
        Ok(driver)
    }

    /// Show decimal `value` (10 and up blank the digit) at `pos`, with or without its point.
    pub fn set_digit(&mut self, pos: usize, value: u8, dp: bool) -> Result<(), E> {
        let Some(seg) = self.segments.get_mut(pos) else {
            debug!("digits: position {} out of range", pos);
            return Ok(());
        };
        *seg = segment::digit(value);
        if dp {
            *seg |= DECIMAL_POINT;
        }
        self.auto()
    }

    /// Copy `len` digits from `from` to `to` in the buffer, without sending.
    ///
    /// Ranges past the end of the chain, and a source running into the destination, are
    /// rejected and leave the buffer untouched.
    pub fn copy_section(&mut self, from: usize, to: usize, len: usize) {
        let (Some(src_end), Some(dst_end)) = (from.checked_add(len), to.checked_add(len)) else {
            return;
        };
        if src_end > DIGITS || dst_end > DIGITS || src_end > to {
            debug!("digits: rejected copy of {} from {} to {}", len, from, to);
            return;
        }
        self.segments.copy_within(from..src_end, to);
    }

    pub fn segments(&self) -> &[u8; DIGITS] {
        &self.segments
    }

    /// Raw segment patterns, index 0 first.  Changes are sent on the next update.
    pub fn segments_mut(&mut self) -> &mut [u8; DIGITS] {
        &mut self.segments
    }

    pub fn size(&self) -> usize {
        DIGITS
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

    /// Shift the buffer out, highest index first, and latch it.
    pub fn update(&mut self) -> Result<(), E> {
        for seg in self.segments.iter().rev() {
            self.out.write_byte(*seg)?;
        }
        shift::pulse(&mut self.latch)?;

        trace!("digits: sent {} digits", DIGITS);
        self.hook.call();
        Ok(())
    }

    pub fn release(self) -> (DATA, CLK, LATCH) {
        let (data, clock) = self.out.release();
        (data, clock, self.latch)
    }

    fn auto(&mut self) -> Result<(), E> {
        if self.auto_update {
            self.update()
        } else {
            Ok(())
        }
    }
}

impl<DATA, CLK, LATCH, E, const DIGITS: usize> SegmentDriver for Driver<DATA, CLK, LATCH, DIGITS>
where
    DATA: OutputPin<Error = E>,
    CLK: OutputPin<Error = E>,
    LATCH: OutputPin<Error = E>,
{
    type Error = E;

    fn segments_mut(&mut self) -> &mut [u8] {
        &mut self.segments
    }

    fn auto_update(&self) -> bool {
        self.auto_update
    }

    fn update(&mut self) -> Result<(), Self::Error> {
        Driver::update(self)
    }
}
