//! Button behaviours built on a [`ButtonDriver`].
//!
//! All of these are meant to be polled every 10 to 50 ms.  Polling faster lets contact bounce
//! through as extra presses, polling slower can miss a short press.
use crate::{ButtonDriver, ChainMutex};

type DriverError<M> = <<M as ChainMutex>::Chain as ButtonDriver>::Error;

/// A push button acting as an on/off switch, with its lamp showing the state.
pub struct ToggleButton<'a, M> {
    number: usize,
    board: &'a M,
    state: bool,
    latch: bool,
    event: bool,
}

impl<'a, M> ToggleButton<'a, M>
where
    M: ChainMutex,
    M::Chain: ButtonDriver,
{
    pub(crate) fn new(number: usize, board: &'a M) -> Self {
        Self {
            number,
            board,
            state: false,
            latch: false,
            event: false,
        }
    }

    pub fn state(&self) -> bool {
        self.state
    }

    pub fn set_state(&mut self, state: bool) -> Result<(), DriverError<M>> {
        self.state = state;
        let number = self.number;
        self.board.lock(|drv| {
            drv.set_lamp(number, state)?;
            drv.update_if_manual()
        })
    }

    /// Sample the button.  Returns `true` if this poll changed the state.
    ///
    /// Only the press edge counts: holding the button down across several polls toggles once.
    pub fn poll(&mut self) -> Result<bool, DriverError<M>> {
        let board = self.board;
        board.lock(|drv| {
            drv.update_if_manual()?;
            let pressed = drv.button(self.number)?;
            let mut changed = false;
            if pressed && !self.latch {
                self.state = !self.state;
                self.latch = true;
                self.event = true;
                changed = true;
            }
            if !pressed {
                self.latch = false;
            }
            drv.set_lamp(self.number, self.state)?;
            drv.update_if_manual()?;
            Ok(changed)
        })
    }

    /// Whether the state changed since the last call.
    pub fn take_event(&mut self) -> bool {
        core::mem::take(&mut self.event)
    }
}

/// A group of buttons of which at most one is selected, like radio buttons.
///
/// The group starts out in the reset state with nothing selected.  In the reset state every lamp
/// shows `default_state`, otherwise only the selected button's lamp is lit.
pub struct SelectGroup<'a, M> {
    offset: usize,
    count: usize,
    default_state: bool,
    board: &'a M,
    selected: Option<usize>,
    event: bool,
}

impl<'a, M> SelectGroup<'a, M>
where
    M: ChainMutex,
    M::Chain: ButtonDriver,
{
    pub(crate) fn new(offset: usize, count: usize, default_state: bool, board: &'a M) -> Self {
        Self {
            offset,
            count,
            default_state,
            board,
            selected: None,
            event: false,
        }
    }

    /// Selected button relative to the group offset, `None` in the reset state.
    pub fn state(&self) -> Option<usize> {
        self.selected.map(|n| n - self.offset)
    }

    /// Select a button (relative to the group offset) or return to the reset state with `None`.
    ///
    /// Buttons outside the group are ignored.
    pub fn set_state(&mut self, state: Option<usize>) -> Result<(), DriverError<M>> {
        match state {
            Some(n) if n >= self.count => return Ok(()),
            Some(n) => self.selected = Some(self.offset + n),
            None => self.selected = None,
        }
        let board = self.board;
        board.lock(|drv| self.refresh_lamps(drv))
    }

    pub fn default_state(&self) -> bool {
        self.default_state
    }

    /// Lamp state shown by every button while the group is reset.
    pub fn set_default_state(&mut self, default_state: bool) {
        self.default_state = default_state;
    }

    /// Sample the group.  Returns `true` if the selection changed.
    ///
    /// When several buttons are held at once the highest numbered one wins.  The lamps are
    /// refreshed on every poll, so a reset group shows `default_state` from the first poll on.
    pub fn poll(&mut self) -> Result<bool, DriverError<M>> {
        let board = self.board;
        board.lock(|drv| {
            drv.update_if_manual()?;
            let mut pressed = None;
            for n in self.range(drv.button_count()) {
                if drv.button(n)? {
                    pressed = Some(n);
                }
            }
            let changed = match pressed {
                Some(n) if self.selected != Some(n) => {
                    self.selected = Some(n);
                    self.event = true;
                    true
                }
                _ => false,
            };
            self.refresh_lamps(drv)?;
            Ok(changed)
        })
    }

    /// Whether the selection changed since the last call.
    pub fn take_event(&mut self) -> bool {
        core::mem::take(&mut self.event)
    }

    /// Group buttons that exist on a chain of `limit` buttons.
    fn range(&self, limit: usize) -> core::ops::Range<usize> {
        let end = self.offset.saturating_add(self.count).min(limit);
        self.offset.min(end)..end
    }

    fn refresh_lamps(&self, drv: &mut M::Chain) -> Result<(), DriverError<M>> {
        for n in self.range(drv.button_count()) {
            let lit = match self.selected {
                None => self.default_state,
                Some(selected) => selected == n,
            };
            drv.set_lamp(n, lit)?;
        }
        drv.update_if_manual()
    }
}

/// A push button stepping through `states` values, leaving its lamp alone.
///
/// With the default of two states this is a plain toggle whose lamp the application drives
/// itself.
pub struct ToggleButtonNoLamp<'a, M> {
    number: usize,
    states: u8,
    board: &'a M,
    state: u8,
    latch: bool,
    event: bool,
}

impl<'a, M> ToggleButtonNoLamp<'a, M>
where
    M: ChainMutex,
    M::Chain: ButtonDriver,
{
    pub(crate) fn new(number: usize, states: u8, board: &'a M) -> Self {
        Self {
            number,
            states: states.max(1),
            board,
            state: 0,
            latch: false,
            event: false,
        }
    }

    pub fn state(&self) -> u8 {
        self.state
    }

    /// Set the state, wrapped to the number of states.
    pub fn set_state(&mut self, state: u8) {
        self.state = state % self.states;
    }

    pub fn states(&self) -> u8 {
        self.states
    }

    /// Sample the button.  Returns `true` if this poll advanced the state.
    pub fn poll(&mut self) -> Result<bool, DriverError<M>> {
        let board = self.board;
        board.lock(|drv| {
            drv.update_if_manual()?;
            let pressed = drv.button(self.number)?;
            let mut changed = false;
            if pressed && !self.latch {
                self.state = (self.state + 1) % self.states;
                self.latch = true;
                self.event = true;
                changed = true;
            }
            if !pressed {
                self.latch = false;
            }
            drv.update_if_manual()?;
            Ok(changed)
        })
    }

    /// Whether the state changed since the last call.
    pub fn take_event(&mut self) -> bool {
        core::mem::take(&mut self.event)
    }
}
