//! Drivers for daisy-chained shift register peripherals: WS2801 pixel strips, button/lamp
//! boards, seven-segment digit chains and input extenders.
#![cfg_attr(not(test), no_std)]

#[cfg(feature = "std")]
extern crate std;

mod fmt;

mod bus;
mod button;
pub mod color;
mod common;
pub mod dev;
mod group;
mod hook;
mod mutex;
pub mod segment;
pub mod shift;
mod smooth;

pub use bus::{BitBangBus, PixelBus, SpiPixelBus, WS2801_SPI_MODE};
pub use button::{SelectGroup, ToggleButton, ToggleButtonNoLamp};
pub use color::ColorOrder;
pub use common::{ButtonDriver, SegmentDriver};
pub use group::DigitGroup;
pub use hook::UpdateHook;
pub use mutex::ChainMutex;
pub use segment::Symbol;
pub use smooth::Smooth;

pub use dev::button_board::ButtonBoard;
pub use dev::digits::Digits;
pub use dev::input_extend::InputExtend;
pub use dev::ws2801::Ws2801;
