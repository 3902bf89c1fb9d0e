//! Support for `WS2801` "3-channel constant current LED driver" pixel strips
use crate::bus::{BitBangBus, PixelBus, SpiPixelBus};
use crate::color::{self, ColorOrder};
use crate::fmt::{debug, trace};
use crate::UpdateHook;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

/// Idle time after a frame.  The WS2801 latches once the clock has been quiet for 500 µs, the
/// extra margin covers slow oscillators.
const LATCH_DELAY_MS: u32 = 1;

/// `WS2801` pixel strip with `PIXELS` logical pixels.
///
/// Each logical pixel can drive several physical WS2801 chips (`group_size`), for fixtures where
/// more than one driver IC lights the same lamp.
pub struct Ws2801<BUS, D, const PIXELS: usize> {
    bus: BUS,
    delay: D,
    pixels: [[u8; 3]; PIXELS],
    group_size: u8,
    order: ColorOrder,
    auto_update: bool,
    hook: UpdateHook,
}

impl<DATA, CLK, D, E, const PIXELS: usize> Ws2801<BitBangBus<DATA, CLK>, D, PIXELS>
where
    DATA: OutputPin<Error = E>,
    CLK: OutputPin<Error = E>,
    D: DelayNs,
{
    /// Create a strip driven by bit-banging two GPIO lines.
    pub fn new_bit_bang(data: DATA, clock: CLK, delay: D) -> Result<Self, E> {
        Ok(Self::new(BitBangBus::new(data, clock)?, delay))
    }
}

impl<SPI, D, const PIXELS: usize> Ws2801<SpiPixelBus<SPI>, D, PIXELS>
where
    SPI: SpiBus<u8>,
    D: DelayNs,
{
    /// Create a strip on a hardware SPI peripheral.
    ///
    /// Example:
    /// ```
    /// use shift_chain::Ws2801;
    /// # use embedded_hal_mock::eh1::{delay::NoopDelay, spi};
    /// let spi_mock = spi::Mock::new(&[]);
    /// let mut strip = Ws2801::<_, _, 16>::new_spi(spi_mock, NoopDelay::new());
    /// strip.set_auto_update(false);
    /// strip.set_pixel(3, 0x00_ff_80_00).unwrap();
    /// assert_eq!(strip.pixels()[3], [0xff, 0x80, 0x00]);
    /// # let (mut spi_mock, _) = strip.release();
    /// # spi_mock.0.done();
    /// ```
    pub fn new_spi(spi: SPI, delay: D) -> Self {
        Self::new(SpiPixelBus(spi), delay)
    }
}

impl<BUS, D, const PIXELS: usize> Ws2801<BUS, D, PIXELS>
where
    BUS: PixelBus,
    D: DelayNs,
{
    pub fn new(bus: BUS, delay: D) -> Self {
        Self::with_group_size(bus, delay, 1)
    }

    pub fn with_group_size(bus: BUS, delay: D, group_size: u8) -> Self {
        Self {
            bus,
            delay,
            pixels: [[0; 3]; PIXELS],
            group_size,
            order: ColorOrder::Rgb,
            auto_update: true,
            hook: UpdateHook::new(),
        }
    }

    /// Set one pixel to a `0x00RRGGBB` colour.  Indices past the end are ignored.
    pub fn set_pixel(&mut self, index: usize, color: u32) -> Result<(), BUS::BusError> {
        let lanes = color::lanes(self.order.apply(color));
        match self.pixels.get_mut(index) {
            Some(pixel) => *pixel = lanes,
            None => {
                debug!("ws2801: pixel {} out of range", index);
                return Ok(());
            }
        }
        self.auto()
    }

    pub fn set_all(&mut self, color: u32) -> Result<(), BUS::BusError> {
        let lanes = color::lanes(self.order.apply(color));
        self.pixels.fill(lanes);
        self.auto()
    }

    /// Write `level` to every byte of the buffer, ignoring the colour order.
    pub fn fill_raw(&mut self, level: u8) -> Result<(), BUS::BusError> {
        self.pixels.fill([level; 3]);
        self.auto()
    }

    /// Change the colour order.  Pixels already in the buffer keep their byte layout.
    pub fn set_color_order(&mut self, order: ColorOrder) {
        self.order = order;
    }

    pub fn color_order(&self) -> ColorOrder {
        self.order
    }

    /// Apply the current colour order to `color`.
    pub fn reorder(&self, color: u32) -> u32 {
        self.order.apply(color)
    }

    pub fn reorder_rgb(&self, r: u8, g: u8, b: u8) -> u32 {
        self.order.apply(color::rgb(r, g, b))
    }

    /// The buffer in wire order, one entry per logical pixel.
    pub fn pixels(&self) -> &[[u8; 3]; PIXELS] {
        &self.pixels
    }

    /// Mutable access to the raw buffer.  Changes are sent on the next [`Ws2801::update`].
    pub fn pixels_mut(&mut self) -> &mut [[u8; 3]; PIXELS] {
        &mut self.pixels
    }

    pub fn byte_count(&self) -> usize {
        PIXELS * 3
    }

    pub fn group_size(&self) -> u8 {
        self.group_size
    }

    pub fn auto_update(&self) -> bool {
        self.auto_update
    }

    /// When enabled (the default) every buffer change is sent immediately.
    pub fn set_auto_update(&mut self, auto_update: bool) {
        self.auto_update = auto_update;
    }

    pub fn set_hook(&mut self, hook: fn()) {
        self.hook.set(hook);
    }

    pub fn clear_hook(&mut self) {
        self.hook.clear();
    }

    /// Send the whole buffer to the strip and wait for it to latch.
    ///
    /// Shifting happens inside a critical section: an interrupt stalling the clock for more
    /// than about 0.7 ms would latch a half-written frame.  The previous interrupt state is
    /// restored when the section ends, whatever the outcome.
    pub fn update(&mut self) -> Result<(), BUS::BusError> {
        let pixels = &self.pixels;
        let bus = &mut self.bus;
        let group_size = self.group_size;

        critical_section::with(|_| {
            for pixel in pixels.iter() {
                for _ in 0..group_size {
                    bus.write(pixel)?;
                }
            }
            bus.flush()
        })?;

        self.delay.delay_ms(LATCH_DELAY_MS);
        trace!("ws2801: sent {} pixels x{}", PIXELS, group_size);
        self.hook.call();
        Ok(())
    }

    pub fn release(self) -> (BUS, D) {
        (self.bus, self.delay)
    }

    fn auto(&mut self) -> Result<(), BUS::BusError> {
        if self.auto_update {
            self.update()
        } else {
            Ok(())
        }
    }
}
