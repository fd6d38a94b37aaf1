//! SPI bus abstractions
//!
//! The six panels share one SPI bus. Which panel latches the traffic is
//! decided by the chip-select arbiter, not by the bus, so this trait has no
//! notion of a device or a CS line.

/// Write-only SPI bus master
///
/// TFT panels are never read back, so only the write half is modelled.
pub trait SpiBus {
    /// Error type for SPI operations
    type Error;

    /// Write data without reading
    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Wait until all queued words have left the shift register
    ///
    /// Must be called before the chip select changes, otherwise the tail of
    /// a transfer can land on the next panel.
    fn flush(&mut self) -> Result<(), Self::Error>;
}
