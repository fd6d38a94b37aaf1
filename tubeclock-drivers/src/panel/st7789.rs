//! ST7789 TFT controller
//!
//! Write-only driver for the 135x240 IPS panels. Commands go out with D/C
//! low, parameters and pixel data with D/C high. Pixels are RGB565,
//! big-endian on the wire.

use embedded_hal::delay::DelayNs;
use tubeclock_core::config::PanelConfig;
use tubeclock_core::traits::{Area, Panel, TransferError};
use tubeclock_hal::{OutputPin, SpiBus};

/// Controller commands
pub mod cmd {
    pub const SWRESET: u8 = 0x01;
    pub const SLPOUT: u8 = 0x11;
    pub const NORON: u8 = 0x13;
    pub const INVON: u8 = 0x21;
    pub const DISPON: u8 = 0x29;
    pub const CASET: u8 = 0x2A;
    pub const RASET: u8 = 0x2B;
    pub const RAMWR: u8 = 0x2C;
    pub const MADCTL: u8 = 0x36;
    pub const COLMOD: u8 = 0x3A;
}

/// 16 bit/pixel interface format
const COLMOD_RGB565: u8 = 0x55;

/// Pixels staged per SPI write
const CHUNK_PIXELS: usize = 64;

/// ST7789 panel on the shared bus
pub struct St7789<B, DC, D> {
    bus: B,
    dc: DC,
    delay: D,
    width: u16,
    height: u16,
    x_offset: u16,
    y_offset: u16,
}

impl<B, DC, D> St7789<B, DC, D>
where
    B: SpiBus,
    DC: OutputPin,
    D: DelayNs,
{
    /// Create a driver; call [`Panel::init`] before drawing
    pub fn new(bus: B, dc: DC, delay: D, config: &PanelConfig) -> Self {
        Self {
            bus,
            dc,
            delay,
            width: config.width,
            height: config.height,
            x_offset: config.x_offset,
            y_offset: config.y_offset,
        }
    }

    /// Give back the bus, D/C pin and delay
    pub fn release(self) -> (B, DC, D) {
        (self.bus, self.dc, self.delay)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), TransferError> {
        self.bus.write(bytes).map_err(|_| TransferError::Bus)
    }

    fn flush(&mut self) -> Result<(), TransferError> {
        self.bus.flush().map_err(|_| TransferError::Bus)
    }

    /// Send a command and its parameters
    ///
    /// The bus is flushed before each D/C change.
    fn command(&mut self, command: u8, params: &[u8]) -> Result<(), TransferError> {
        self.dc.set_low();
        self.write(&[command])?;
        self.flush()?;
        if !params.is_empty() {
            self.dc.set_high();
            self.write(params)?;
            self.flush()?;
        }
        Ok(())
    }

    /// Set the RAM window to `area` and start a memory write
    ///
    /// Leaves D/C high, ready for pixel data.
    fn set_window(&mut self, area: Area) -> Result<(), TransferError> {
        let [x0, x1, y0, y1] = self.window(area)?;

        let [x0h, x0l] = x0.to_be_bytes();
        let [x1h, x1l] = x1.to_be_bytes();
        self.command(cmd::CASET, &[x0h, x0l, x1h, x1l])?;

        let [y0h, y0l] = y0.to_be_bytes();
        let [y1h, y1l] = y1.to_be_bytes();
        self.command(cmd::RASET, &[y0h, y0l, y1h, y1l])?;

        self.command(cmd::RAMWR, &[])?;
        self.dc.set_high();
        Ok(())
    }

    /// Inclusive controller RAM bounds `[x0, x1, y0, y1]` of `area`
    fn window(&self, area: Area) -> Result<[u16; 4], TransferError> {
        let span = |start: u16, offset: u16, len: u16| -> Option<(u16, u16)> {
            let first = start.checked_add(offset)?;
            let last = first.checked_add(len.checked_sub(1)?)?;
            Some((first, last))
        };
        let x = span(area.x, self.x_offset, area.width);
        let y = span(area.y, self.y_offset, area.height);
        match (x, y) {
            (Some((x0, x1)), Some((y0, y1))) => Ok([x0, x1, y0, y1]),
            _ => Err(TransferError::OutOfBounds),
        }
    }

    fn check(&self, area: Area) -> Result<(), TransferError> {
        if area.fits(self.width, self.height) {
            Ok(())
        } else {
            Err(TransferError::OutOfBounds)
        }
    }
}

impl<B, DC, D> Panel for St7789<B, DC, D>
where
    B: SpiBus,
    DC: OutputPin,
    D: DelayNs,
{
    fn init(&mut self) -> Result<(), TransferError> {
        self.command(cmd::SWRESET, &[])?;
        self.delay.delay_ms(150);
        self.command(cmd::SLPOUT, &[])?;
        self.delay.delay_ms(120);
        self.command(cmd::COLMOD, &[COLMOD_RGB565])?;
        self.delay.delay_ms(10);
        // Row/column order top-left, RGB
        self.command(cmd::MADCTL, &[0x00])?;
        // IPS panels need inversion for correct colours
        self.command(cmd::INVON, &[])?;
        self.command(cmd::NORON, &[])?;
        self.delay.delay_ms(10);
        self.command(cmd::DISPON, &[])?;
        self.delay.delay_ms(20);
        Ok(())
    }

    fn width(&self) -> u16 {
        self.width
    }

    fn height(&self) -> u16 {
        self.height
    }

    fn write_pixels(&mut self, area: Area, pixels: &[u16]) -> Result<(), TransferError> {
        self.check(area)?;
        if pixels.len() != area.pixel_count() {
            return Err(TransferError::OutOfBounds);
        }
        if area.is_empty() {
            return Ok(());
        }

        self.set_window(area)?;
        let mut staging = [0u8; CHUNK_PIXELS * 2];
        for chunk in pixels.chunks(CHUNK_PIXELS) {
            for (dst, px) in staging.chunks_exact_mut(2).zip(chunk) {
                dst.copy_from_slice(&px.to_be_bytes());
            }
            self.write(&staging[..chunk.len() * 2])?;
        }
        self.flush()
    }

    fn fill(&mut self, area: Area, color: u16) -> Result<(), TransferError> {
        self.check(area)?;
        if area.is_empty() {
            return Ok(());
        }

        self.set_window(area)?;
        let [hi, lo] = color.to_be_bytes();
        let mut staging = [0u8; CHUNK_PIXELS * 2];
        for px in staging.chunks_exact_mut(2) {
            px[0] = hi;
            px[1] = lo;
        }

        let mut remaining = area.pixel_count();
        while remaining > 0 {
            let n = remaining.min(CHUNK_PIXELS);
            self.write(&staging[..n * 2])?;
            remaining -= n;
        }
        self.flush()
    }
}
