//! Adapters from `embedded-hal` 1.0 peripherals
//!
//! Chip HALs (embassy-rp, esp-hal, ...) hand out `embedded-hal` pins and
//! buses. Wrapping them here lets the drivers stay on the tubeclock traits.

use core::convert::Infallible;

use embedded_hal::digital::OutputPin as EhOutputPin;
use embedded_hal::spi::SpiBus as EhSpiBus;

use crate::gpio::OutputPin;
use crate::spi::SpiBus;

/// Output pin wrapper
///
/// Tracks the last written level so `is_set_high` does not need `&mut`.
pub struct EhOutput<P> {
    pin: P,
    high: bool,
}

impl<P> EhOutput<P>
where
    P: EhOutputPin<Error = Infallible>,
{
    /// Wrap a pin and drive it to `initial_high`
    pub fn new(pin: P, initial_high: bool) -> Self {
        let mut out = Self { pin, high: initial_high };
        out.set_state(initial_high);
        out
    }

    /// Release the wrapped pin
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P> OutputPin for EhOutput<P>
where
    P: EhOutputPin<Error = Infallible>,
{
    fn set_high(&mut self) {
        let _ = self.pin.set_high();
        self.high = true;
    }

    fn set_low(&mut self) {
        let _ = self.pin.set_low();
        self.high = false;
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

/// SPI bus wrapper
pub struct EhSpi<B> {
    bus: B,
}

impl<B: EhSpiBus<u8>> EhSpi<B> {
    /// Wrap an SPI bus
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Release the wrapped bus
    pub fn into_inner(self) -> B {
        self.bus
    }
}

impl<B: EhSpiBus<u8>> SpiBus for EhSpi<B> {
    type Error = B::Error;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        EhSpiBus::write(&mut self.bus, data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        EhSpiBus::flush(&mut self.bus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::digital::ErrorType;

    struct Pin {
        high: bool,
    }

    impl ErrorType for Pin {
        type Error = Infallible;
    }

    impl EhOutputPin for Pin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.high = true;
            Ok(())
        }
    }

    #[derive(Default)]
    struct Bus {
        sent: std::vec::Vec<u8>,
        flushes: usize,
    }

    impl embedded_hal::spi::ErrorType for Bus {
        type Error = Infallible;
    }

    impl EhSpiBus<u8> for Bus {
        fn read(&mut self, words: &mut [u8]) -> Result<(), Infallible> {
            words.fill(0);
            Ok(())
        }

        fn write(&mut self, words: &[u8]) -> Result<(), Infallible> {
            self.sent.extend_from_slice(words);
            Ok(())
        }

        fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Infallible> {
            read.fill(0);
            self.sent.extend_from_slice(write);
            Ok(())
        }

        fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Infallible> {
            self.sent.extend_from_slice(words);
            Ok(())
        }

        fn flush(&mut self) -> Result<(), Infallible> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[test]
    fn test_spi_wrapper_forwards_writes() {
        let mut spi = EhSpi::new(Bus::default());
        SpiBus::write(&mut spi, &[0x2A, 0x00]).unwrap();
        SpiBus::flush(&mut spi).unwrap();
        let bus = spi.into_inner();
        assert_eq!(bus.sent, [0x2A, 0x00]);
        assert_eq!(bus.flushes, 1);
    }

    #[test]
    fn test_output_wrapper_tracks_level() {
        let mut out = EhOutput::new(Pin { high: false }, true);
        assert!(out.is_set_high());
        out.set_low();
        assert!(out.is_set_low());
        assert!(!out.into_inner().high);
    }
}
