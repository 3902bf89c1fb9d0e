use crate::shift::ShiftOut;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::{self as hal_spi, SpiBus};

/// SPI mode the WS2801 expects: data sampled on the rising clock edge, clock idle low.
pub const WS2801_SPI_MODE: hal_spi::Mode = hal_spi::MODE_0;

/// Byte transport feeding a pixel strip.
///
/// Bytes are sent most significant bit first.  [`PixelBus::flush`] must block until the last byte
/// has left the wire, the strip latches on the idle time that follows.
pub trait PixelBus {
    type BusError;

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::BusError>;

    fn flush(&mut self) -> Result<(), Self::BusError>;
}

/// Bit-banged transport on two GPIO lines.
pub struct BitBangBus<DATA, CLK>(ShiftOut<DATA, CLK>);

impl<DATA, CLK, E> BitBangBus<DATA, CLK>
where
    DATA: OutputPin<Error = E>,
    CLK: OutputPin<Error = E>,
{
    pub fn new(data: DATA, clock: CLK) -> Result<Self, E> {
        Ok(Self(ShiftOut::new(data, clock)?))
    }

    pub fn release(self) -> (DATA, CLK) {
        self.0.release()
    }
}

impl<DATA, CLK, E> PixelBus for BitBangBus<DATA, CLK>
where
    DATA: OutputPin<Error = E>,
    CLK: OutputPin<Error = E>,
{
    type BusError = E;

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::BusError> {
        self.0.write_all(bytes)
    }

    fn flush(&mut self) -> Result<(), Self::BusError> {
        Ok(())
    }
}

/// Transport on a hardware SPI peripheral.
///
/// The peripheral must already be configured for [`WS2801_SPI_MODE`], MSB first.  2 MHz is a
/// safe clock for strips of a few metres.
pub struct SpiPixelBus<SPI>(pub SPI);

impl<SPI: SpiBus<u8>> PixelBus for SpiPixelBus<SPI> {
    type BusError = SPI::Error;

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::BusError> {
        self.0.write(bytes)
    }

    fn flush(&mut self) -> Result<(), Self::BusError> {
        self.0.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::PixelBus;
    use crate::shift::expect;
    use embedded_hal_mock::eh1::digital::Mock as PinMock;
    use embedded_hal_mock::eh1::spi as mock_spi;

    #[test]
    fn bit_bang_bus() {
        let mut data = PinMock::new(&expect::data_out(&[0xf0, 0x0f]));
        let mut clock_expectations = vec![expect::low()];
        clock_expectations.extend(expect::pulses(16));
        let mut clock = PinMock::new(&clock_expectations);

        let mut bus = super::BitBangBus::new(data.clone(), clock.clone()).unwrap();
        bus.write(&[0xf0, 0x0f]).unwrap();
        bus.flush().unwrap();

        data.done();
        clock.done();
    }

    #[test]
    fn spi_bus_flushes() {
        let expectations = [
            mock_spi::Transaction::write_vec(vec![0x01, 0x02, 0x03]),
            mock_spi::Transaction::flush(),
        ];
        let mut spi = mock_spi::Mock::new(&expectations);

        let mut bus = super::SpiPixelBus(spi.clone());
        bus.write(&[0x01, 0x02, 0x03]).unwrap();
        bus.flush().unwrap();

        spi.done();
    }
}
