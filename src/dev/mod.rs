//! The device module contains the driver for each supported chain.
//!
//! In most cases you will not need anything from here explicitly, the exposed types at the root of
//! the crate should be enough.  The `Driver` types are what [`ButtonBoard`](crate::ButtonBoard)
//! and [`Digits`](crate::Digits) lock; reach them through their `lock` methods.

pub mod button_board;
pub mod digits;
pub mod input_extend;
pub mod ws2801;
