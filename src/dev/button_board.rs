//! Support for the `buttonBoard`: 8 buttons on a 74HC165 and 8 lamps on a 74HC595 per board,
//! with any number of boards daisy-chained on one shared clock.
use crate::common::bit_position;
use crate::fmt::{debug, trace};
use crate::shift;
use crate::{ButtonDriver, ChainMutex, SelectGroup, ToggleButton, ToggleButtonNoLamp, UpdateHook};
use embedded_hal::digital::{InputPin, OutputPin};

/// Chain of `BOARDS` button boards.
///
/// The driver sits inside a mutex so that button state machines created from this board can
/// poll it while the board itself stays usable.
pub struct ButtonBoard<M>(M);

impl<DO, DI, CLK, ILT, OLT, E, const BOARDS: usize>
    ButtonBoard<core::cell::RefCell<Driver<DO, DI, CLK, ILT, OLT, BOARDS>>>
where
    DO: OutputPin<Error = E>,
    DI: InputPin<Error = E>,
    CLK: OutputPin<Error = E>,
    ILT: OutputPin<Error = E>,
    OLT: OutputPin<Error = E>,
{
    /// Create a board chain from its five lines.
    ///
    /// * `data_out`: DI on the board (lamp data)
    /// * `data_in`: DO on the board (button data), needs a pull-up
    /// * `clock`: CLK
    /// * `in_latch`: ILT
    /// * `out_latch`: OLT
    pub fn new(
        data_out: DO,
        data_in: DI,
        clock: CLK,
        in_latch: ILT,
        out_latch: OLT,
    ) -> Result<Self, E> {
        Self::with_mutex(data_out, data_in, clock, in_latch, out_latch)
    }
}

impl<DO, DI, CLK, ILT, OLT, E, M, const BOARDS: usize> ButtonBoard<M>
where
    DO: OutputPin<Error = E>,
    DI: InputPin<Error = E>,
    CLK: OutputPin<Error = E>,
    ILT: OutputPin<Error = E>,
    OLT: OutputPin<Error = E>,
    M: ChainMutex<Chain = Driver<DO, DI, CLK, ILT, OLT, BOARDS>>,
{
    pub fn with_mutex(
        data_out: DO,
        data_in: DI,
        clock: CLK,
        in_latch: ILT,
        out_latch: OLT,
    ) -> Result<Self, E> {
        Ok(Self(M::create(Driver::new(
            data_out, data_in, clock, in_latch, out_latch,
        )?)))
    }
}

impl<M> ButtonBoard<M>
where
    M: ChainMutex,
    M::Chain: ButtonDriver,
{
    /// Single button that flips its lamp on every press.
    pub fn toggle(&self, number: usize) -> ToggleButton<'_, M> {
        ToggleButton::new(number, &self.0)
    }

    /// Radio-button group over `offset..offset + count`.
    pub fn select(&self, offset: usize, count: usize, default_state: bool) -> SelectGroup<'_, M> {
        SelectGroup::new(offset, count, default_state, &self.0)
    }

    /// Button cycling through `states` values without driving its lamp.
    pub fn toggle_no_lamp(&self, number: usize, states: u8) -> ToggleButtonNoLamp<'_, M> {
        ToggleButtonNoLamp::new(number, states, &self.0)
    }

    pub fn update(&self) -> Result<(), <M::Chain as ButtonDriver>::Error> {
        self.0.lock(|drv| drv.update())
    }

    pub fn button(&self, number: usize) -> Result<bool, <M::Chain as ButtonDriver>::Error> {
        self.0.lock(|drv| drv.button(number))
    }

    pub fn set_lamp(
        &self,
        number: usize,
        state: bool,
    ) -> Result<(), <M::Chain as ButtonDriver>::Error> {
        self.0.lock(|drv| drv.set_lamp(number, state))
    }

    pub fn lamp(&self, number: usize) -> bool {
        self.0.lock(|drv| drv.lamp(number))
    }

    /// Run `f` with exclusive access to the driver, for everything not forwarded above.
    pub fn lock<R, F: FnOnce(&mut M::Chain) -> R>(&self, f: F) -> R {
        self.0.lock(f)
    }

    pub fn into_inner(self) -> M {
        self.0
    }
}

pub struct Driver<DO, DI, CLK, ILT, OLT, const BOARDS: usize> {
    data_out: DO,
    data_in: DI,
    clock: CLK,
    in_latch: ILT,
    out_latch: OLT,
    inputs: [u8; BOARDS],
    outputs: [u8; BOARDS],
    input_invert: bool,
    output_invert: bool,
    auto_update: bool,
    hook: UpdateHook,
}

impl<DO, DI, CLK, ILT, OLT, E, const BOARDS: usize> Driver<DO, DI, CLK, ILT, OLT, BOARDS>
where
    DO: OutputPin<Error = E>,
    DI: InputPin<Error = E>,
    CLK: OutputPin<Error = E>,
    ILT: OutputPin<Error = E>,
    OLT: OutputPin<Error = E>,
{
    pub fn new(
        data_out: DO,
        data_in: DI,
        mut clock: CLK,
        mut in_latch: ILT,
        mut out_latch: OLT,
    ) -> Result<Self, E> {
        clock.set_low()?;
        out_latch.set_low()?;
        in_latch.set_high()?;
        Ok(Self {
            data_out,
            data_in,
            clock,
            in_latch,
            out_latch,
            inputs: [0; BOARDS],
            outputs: [0; BOARDS],
            input_invert: false,
            output_invert: false,
            auto_update: true,
            hook: UpdateHook::new(),
        })
    }

    pub fn set_lamp(&mut self, number: usize, state: bool) -> Result<(), E> {
        let (board, mask) = bit_position(number);
        match self.outputs.get_mut(board) {
            Some(byte) if state => *byte |= mask,
            Some(byte) => *byte &= !mask,
            None => {
                debug!("button board: lamp {} out of range", number);
                return Ok(());
            }
        }
        self.auto()
    }

    pub fn set_all_lamps(&mut self, state: bool) -> Result<(), E> {
        self.outputs.fill(if state { 0xff } else { 0x00 });
        self.auto()
    }

    pub fn lamp(&self, number: usize) -> bool {
        let (board, mask) = bit_position(number);
        self.outputs.get(board).is_some_and(|b| b & mask != 0)
    }

    /// State of a button, `true` when pressed.
    pub fn button(&mut self, number: usize) -> Result<bool, E> {
        self.auto()?;
        Ok(self.input_bit(number))
    }

    /// Number of buttons pressed on the whole chain.
    pub fn count_pressed(&mut self) -> Result<usize, E> {
        self.auto()?;
        Ok(self.inputs.iter().map(|b| b.count_ones() as usize).sum())
    }

    /// Number of buttons pressed in `offset..offset + count`.
    pub fn count_pressed_in(&mut self, offset: usize, count: usize) -> Result<usize, E> {
        self.auto()?;
        let end = offset.saturating_add(count).min(BOARDS * 8);
        Ok((offset..end).filter(|n| self.input_bit(*n)).count())
    }

    /// Write all eight lamps of one board (`0xff` turns them all on).
    pub fn write_byte(&mut self, board: usize, value: u8) -> Result<(), E> {
        match self.outputs.get_mut(board) {
            Some(byte) => *byte = value,
            None => {
                debug!("button board: board {} out of range", board);
                return Ok(());
            }
        }
        self.auto()
    }

    /// Read all eight buttons of one board (`0x00` is nothing pressed).
    pub fn read_byte(&mut self, board: usize) -> Result<u8, E> {
        self.auto()?;
        Ok(self.inputs.get(board).copied().unwrap_or(0))
    }

    pub fn inputs(&self) -> &[u8; BOARDS] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[u8; BOARDS] {
        &self.outputs
    }

    pub fn outputs_mut(&mut self) -> &mut [u8; BOARDS] {
        &mut self.outputs
    }

    /// Number of boards, which is also the size of each buffer.
    pub fn size(&self) -> usize {
        BOARDS
    }

    /// Declare the button inputs electrically inverted (pressed reads high).
    pub fn set_input_invert(&mut self, invert: bool) {
        self.input_invert = invert;
    }

    /// Declare the lamp outputs electrically inverted (low turns a lamp on).
    pub fn set_output_invert(&mut self, invert: bool) {
        self.output_invert = invert;
    }

    pub fn auto_update(&self) -> bool {
        self.auto_update
    }

    /// When enabled (the default) every accessor runs a transaction.  Disable it and call
    /// [`Driver::update`] manually to batch several changes into one.
    pub fn set_auto_update(&mut self, auto_update: bool) {
        self.auto_update = auto_update;
    }

    pub fn set_hook(&mut self, hook: fn()) {
        self.hook.set(hook);
    }

    pub fn clear_hook(&mut self) {
        self.hook.clear();
    }

    /// Latch the buttons, shift lamps out while shifting buttons in, then latch the lamps.
    ///
    /// The last board in the chain receives the first byte shifted out, so lamp bytes go out
    /// last board first.  Button bytes arrive first board first.
    pub fn update(&mut self) -> Result<(), E> {
        self.in_latch.set_high()?;
        for (input, output) in self.inputs.iter_mut().zip(self.outputs.iter().rev()) {
            let out = if self.output_invert { !*output } else { *output };
            let received =
                shift::exchange(&mut self.data_out, &mut self.data_in, &mut self.clock, out)?;
            // buttons pull the line low unless the board inverts them
            *input = if self.input_invert { received } else { !received };
        }
        self.in_latch.set_low()?;
        shift::pulse(&mut self.out_latch)?;

        trace!("button board: transaction on {} boards", BOARDS);
        self.hook.call();
        Ok(())
    }

    pub fn release(self) -> (DO, DI, CLK, ILT, OLT) {
        (
            self.data_out,
            self.data_in,
            self.clock,
            self.in_latch,
            self.out_latch,
        )
    }

    fn input_bit(&self, number: usize) -> bool {
        let (board, mask) = bit_position(number);
        self.inputs.get(board).is_some_and(|b| b & mask != 0)
    }

    fn auto(&mut self) -> Result<(), E> {
        if self.auto_update {
            self.update()
        } else {
            Ok(())
        }
    }
}

impl<DO, DI, CLK, ILT, OLT, E, const BOARDS: usize> ButtonDriver
    for Driver<DO, DI, CLK, ILT, OLT, BOARDS>
where
    DO: OutputPin<Error = E>,
    DI: InputPin<Error = E>,
    CLK: OutputPin<Error = E>,
    ILT: OutputPin<Error = E>,
    OLT: OutputPin<Error = E>,
{
    type Error = E;

    fn update(&mut self) -> Result<(), Self::Error> {
        Driver::update(self)
    }

    fn auto_update(&self) -> bool {
        self.auto_update
    }

    fn button(&mut self, number: usize) -> Result<bool, Self::Error> {
        Driver::button(self, number)
    }

    fn set_lamp(&mut self, number: usize, state: bool) -> Result<(), Self::Error> {
        Driver::set_lamp(self, number, state)
    }

    fn lamp(&self, number: usize) -> bool {
        Driver::lamp(self, number)
    }

    fn button_count(&self) -> usize {
        BOARDS * 8
    }
}
