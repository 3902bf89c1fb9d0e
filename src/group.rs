//! Independent displays carved out of one digit chain.
use crate::segment::{self, Symbol};
use crate::{ChainMutex, SegmentDriver};

type DriverError<M> = <<M as ChainMutex>::Chain as SegmentDriver>::Error;

/// A run of consecutive digits on a chain, used as one display.
///
/// Position 0 of the group is its rightmost (least significant) digit.  Every operation sends the
/// chain when auto update is on.
pub struct DigitGroup<'a, M> {
    chain: &'a M,
    offset: usize,
    len: usize,
    chase_pos: u8,
    chase8_pos: u8,
}

impl<'a, M> DigitGroup<'a, M>
where
    M: ChainMutex,
    M::Chain: SegmentDriver,
{
    pub(crate) fn new(chain: &'a M, offset: usize, len: usize) -> Self {
        let size = chain.lock(|drv| drv.segments_mut().len());
        let offset = offset.min(size);
        Self {
            chain,
            offset,
            len: len.min(size - offset),
            chase_pos: 0,
            chase8_pos: 0,
        }
    }

    /// Number of digits in the group.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Show `value` with a decimal point on digit `dp_pos` (counted from 1, 0 for none).
    ///
    /// Returns the number of digits in use, which is where a sign would go.
    pub fn show_number(&mut self, value: u32, dp_pos: u8) -> Result<u8, DriverError<M>> {
        self.draw(|digits| segment::write_decimal(value, dp_pos, digits))
    }

    /// Show a signed value.  Returns `true` if the number is negative and the minus sign did not
    /// fit; the digits are shown regardless.
    pub fn show_signed_number(&mut self, value: i32, dp_pos: u8) -> Result<bool, DriverError<M>> {
        self.draw(|digits| segment::write_signed(value, dp_pos, digits))
    }

    pub fn show_symbol(&mut self, symbol: Symbol) -> Result<(), DriverError<M>> {
        self.draw(|digits| segment::write_symbol(symbol, digits))
    }

    /// Show the next frame of the spinning animation on every digit.
    pub fn chase(&mut self) -> Result<(), DriverError<M>> {
        let pos = self.chase_pos;
        self.chase_pos = (pos + 1) % 6;
        self.chase_at(pos)
    }

    pub fn chase_at(&mut self, pos: u8) -> Result<(), DriverError<M>> {
        self.draw(|digits| digits.fill(segment::chase(pos)))
    }

    /// Show the next frame of the figure-eight animation on every digit.
    pub fn chase8(&mut self) -> Result<(), DriverError<M>> {
        let pos = self.chase8_pos;
        self.chase8_pos = (pos + 1) % 8;
        self.chase8_at(pos)
    }

    pub fn chase8_at(&mut self, pos: u8) -> Result<(), DriverError<M>> {
        self.draw(|digits| digits.fill(segment::chase8(pos)))
    }

    /// Run `f` on this group's slice of the buffer, then send it if auto update is on.
    fn draw<R>(&self, f: impl FnOnce(&mut [u8]) -> R) -> Result<R, DriverError<M>> {
        let range = self.offset..self.offset + self.len;
        self.chain.lock(|drv| {
            let result = match drv.segments_mut().get_mut(range) {
                Some(digits) => f(digits),
                None => f(&mut []),
            };
            drv.update_if_auto()?;
            Ok(result)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::DigitGroup;
    use crate::segment::{digit, Symbol, DASH, DECIMAL_POINT};
    use crate::SegmentDriver;
    use core::cell::RefCell;
    use core::convert::Infallible;

    struct FakeChain {
        segments: [u8; 8],
        auto: bool,
        updates: usize,
    }

    impl FakeChain {
        fn new(auto: bool) -> RefCell<Self> {
            RefCell::new(Self {
                segments: [0xaa; 8],
                auto,
                updates: 0,
            })
        }
    }

    impl SegmentDriver for FakeChain {
        type Error = Infallible;

        fn segments_mut(&mut self) -> &mut [u8] {
            &mut self.segments
        }

        fn auto_update(&self) -> bool {
            self.auto
        }

        fn update(&mut self) -> Result<(), Self::Error> {
            self.updates += 1;
            Ok(())
        }
    }

    #[test]
    fn numbers_stay_inside_the_group() {
        let chain = FakeChain::new(true);
        let mut group = DigitGroup::new(&chain, 2, 3);

        assert_eq!(group.show_number(1234, 0).unwrap(), 3);
        assert_eq!(
            chain.borrow().segments,
            [0xaa, 0xaa, digit(4), digit(3), digit(2), 0xaa, 0xaa, 0xaa]
        );
        assert_eq!(chain.borrow().updates, 1);

        assert_eq!(group.show_number(0, 0).unwrap(), 1);
        assert_eq!(chain.borrow().segments[2..5], [digit(0), 0x00, 0x00]);

        assert_eq!(group.show_number(5, 3).unwrap(), 3);
        assert_eq!(
            chain.borrow().segments[2..5],
            [digit(5), digit(0), digit(0) | DECIMAL_POINT]
        );
    }

    #[test]
    fn signed_overflow() {
        let chain = FakeChain::new(false);
        let mut group = DigitGroup::new(&chain, 0, 2);

        assert!(!group.show_signed_number(-7, 0).unwrap());
        assert_eq!(chain.borrow().segments[..2], [digit(7), DASH]);

        assert!(group.show_signed_number(-42, 0).unwrap());
        assert_eq!(chain.borrow().segments[..2], [digit(2), digit(4)]);
        assert_eq!(chain.borrow().segments[2], 0xaa);
        assert_eq!(chain.borrow().updates, 0);
    }

    #[test]
    fn symbols_are_centred() {
        let chain = FakeChain::new(false);
        let mut group = DigitGroup::new(&chain, 1, 6);

        group.show_symbol(Symbol::Foul).unwrap();
        assert_eq!(
            chain.borrow().segments[1..7],
            [0x00, 0x0c, 0x38, 0xb8, 0xe2, 0x00]
        );

        group.show_symbol(Symbol::Dash).unwrap();
        assert!(chain.borrow().segments[1..7].iter().all(|s| *s == DASH));
        assert_eq!(chain.borrow().segments[0], 0xaa);
        assert_eq!(chain.borrow().segments[7], 0xaa);
    }

    #[test]
    fn animations_step_per_group() {
        let chain = FakeChain::new(true);
        let mut a = DigitGroup::new(&chain, 0, 2);
        let mut b = DigitGroup::new(&chain, 2, 2);

        for expected in [0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x02] {
            a.chase().unwrap();
            assert_eq!(chain.borrow().segments[..2], [expected; 2]);
        }
        b.chase().unwrap();
        assert_eq!(chain.borrow().segments[2..4], [0x02; 2]);

        for expected in [0x02, 0x04, 0x80, 0x20, 0x10, 0x08, 0x80, 0x40, 0x02] {
            b.chase8().unwrap();
            assert_eq!(chain.borrow().segments[2..4], [expected; 2]);
        }

        a.chase_at(8).unwrap();
        assert_eq!(chain.borrow().segments[..2], [0x08; 2]);
        a.chase8_at(15).unwrap();
        assert_eq!(chain.borrow().segments[..2], [0x40; 2]);
        assert_eq!(chain.borrow().updates, 7 + 1 + 9 + 2);
    }

    #[test]
    fn range_is_clamped() {
        let chain = FakeChain::new(true);
        let group = DigitGroup::new(&chain, 6, 10);
        assert_eq!((group.offset(), group.len()), (6, 2));

        let mut empty = DigitGroup::new(&chain, 20, 3);
        assert!(empty.is_empty());
        assert_eq!(empty.offset(), 8);
        assert_eq!(empty.show_number(99, 0).unwrap(), 0);
        assert!(empty.show_signed_number(-1, 0).unwrap());
        assert_eq!(chain.borrow().segments, [0xaa; 8]);
    }
}
