//! Status overlays
//!
//! A short line of text drawn over the bottom of one digit panel after its
//! image, e.g. "NO WIFI !" on the seconds panel. The text is rendered with
//! `embedded-graphics` into a strip buffer (black background) and pushed as
//! one window, so the cached digit image is never modified.

use core::convert::Infallible;
use core::fmt::Write;

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_8X13};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use heapless::String;
use tubeclock_core::traits::Area;
use tubeclock_core::DigitPosition;
use tubeclock_image::BLACK;

/// Longest overlay text
pub const MAX_OVERLAY_TEXT: usize = 16;

/// Tallest overlay strip in pixels
pub const MAX_STRIP_HEIGHT: u8 = 32;

/// Left margin of the text inside the strip
const TEXT_X: i32 = 5;

/// Lowest temperature reading still shown, in tenths of a degree
///
/// Sensors report -127 °C when absent; anything at or below -30 °C is
/// treated as no reading.
const MIN_TEMPERATURE_X10: i16 = -300;

pub const RED: u16 = 0xF800;
pub const CYAN: u16 = 0x07FF;

/// Text drawn over the bottom of one digit panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    position: DigitPosition,
    text: String<MAX_OVERLAY_TEXT>,
    color: u16,
    strip_height: u8,
}

impl Overlay {
    /// Create an overlay
    ///
    /// Text longer than [`MAX_OVERLAY_TEXT`] is cut; the strip height is
    /// clamped to 1..=[`MAX_STRIP_HEIGHT`].
    pub fn new(position: DigitPosition, text: &str, color: u16, strip_height: u8) -> Self {
        let mut s = String::new();
        for ch in text.chars() {
            if s.push(ch).is_err() {
                break;
            }
        }
        Self {
            position,
            text: s,
            color,
            strip_height: strip_height.clamp(1, MAX_STRIP_HEIGHT),
        }
    }

    /// Wi-Fi connection lost
    pub fn no_wifi() -> Self {
        Self::new(DigitPosition::SecondsOnes, "NO WIFI !", RED, 27)
    }

    /// MQTT broker unreachable
    pub fn no_mqtt() -> Self {
        Self::new(DigitPosition::SecondsTens, "NO MQTT !", RED, 27)
    }

    /// Temperature in tenths of a degree Celsius, e.g. `215` for "T: 21.5 C"
    ///
    /// `None` for readings at or below -30 °C.
    pub fn temperature(celsius_x10: i16) -> Option<Self> {
        if celsius_x10 <= MIN_TEMPERATURE_X10 {
            return None;
        }
        let sign = if celsius_x10 < 0 { "-" } else { "" };
        let abs = celsius_x10.unsigned_abs();
        let mut text: String<MAX_OVERLAY_TEXT> = String::new();
        // At most "T: -29.9 C"
        let _ = write!(text, "T: {}{}.{} C", sign, abs / 10, abs % 10);
        Some(Self::new(DigitPosition::HoursOnes, &text, CYAN, 17))
    }

    pub fn position(&self) -> DigitPosition {
        self.position
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn color(&self) -> u16 {
        self.color
    }

    pub fn strip_height(&self) -> u8 {
        self.strip_height
    }

    /// Large font for full strips, small for narrow ones
    fn font(&self) -> &'static MonoFont<'static> {
        if self.strip_height >= 24 {
            &FONT_10X20
        } else {
            &FONT_8X13
        }
    }
}

/// Pixel strip an overlay is rendered into before transfer
///
/// `W` matches the panel width. Holds up to [`MAX_STRIP_HEIGHT`] rows.
pub struct OverlayStrip<const W: usize> {
    rows: [[u16; W]; MAX_STRIP_HEIGHT as usize],
    height: usize,
}

impl<const W: usize> Default for OverlayStrip<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize> OverlayStrip<W> {
    pub const fn new() -> Self {
        Self {
            rows: [[BLACK; W]; MAX_STRIP_HEIGHT as usize],
            height: 0,
        }
    }

    /// Render `overlay` and return where it goes on a panel `panel_height` tall
    pub fn render(&mut self, overlay: &Overlay, panel_height: u16) -> Area {
        self.height = (overlay.strip_height as usize).min(panel_height as usize);
        for row in self.rows[..self.height].iter_mut() {
            row.fill(BLACK);
        }

        let font = overlay.font();
        let style = MonoTextStyle::new(font, Rgb565::from(RawU16::new(overlay.color)));
        let y = (self.height as i32 - font.character_size.height as i32).max(0) / 2;
        // Drawing into the strip cannot fail
        let _ = Text::with_baseline(&overlay.text, Point::new(TEXT_X, y), style, Baseline::Top)
            .draw(self);

        let height = self.height as u16;
        Area::new(0, panel_height - height, W as u16, height)
    }

    /// Rendered pixels, row-major
    pub fn pixels(&self) -> &[u16] {
        self.rows[..self.height].as_flattened()
    }

    /// Read one rendered pixel
    pub fn pixel(&self, x: usize, y: usize) -> Option<u16> {
        if y >= self.height {
            return None;
        }
        self.rows.get(y).and_then(|row| row.get(x)).copied()
    }
}

impl<const W: usize> OriginDimensions for OverlayStrip<W> {
    fn size(&self) -> Size {
        Size::new(W as u32, self.height as u32)
    }
}

impl<const W: usize> DrawTarget for OverlayStrip<W> {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Rgb565>>,
    {
        for Pixel(p, color) in pixels {
            if p.x < 0 || p.y < 0 {
                continue;
            }
            let (x, y) = (p.x as usize, p.y as usize);
            if x >= W || y >= self.height {
                continue;
            }
            self.rows[y][x] = color.into_storage();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_overlays() {
        let wifi = Overlay::no_wifi();
        assert_eq!(wifi.position(), DigitPosition::SecondsOnes);
        assert_eq!(wifi.text(), "NO WIFI !");
        assert_eq!(wifi.color(), RED);
        assert_eq!(wifi.strip_height(), 27);

        let mqtt = Overlay::no_mqtt();
        assert_eq!(mqtt.position(), DigitPosition::SecondsTens);
        assert_eq!(mqtt.text(), "NO MQTT !");
    }

    #[test]
    fn test_temperature_text() {
        let t = Overlay::temperature(215).unwrap();
        assert_eq!(t.position(), DigitPosition::HoursOnes);
        assert_eq!(t.text(), "T: 21.5 C");
        assert_eq!(t.color(), CYAN);
        assert_eq!(t.strip_height(), 17);

        assert_eq!(Overlay::temperature(-55).unwrap().text(), "T: -5.5 C");
        assert_eq!(Overlay::temperature(0).unwrap().text(), "T: 0.0 C");
        assert_eq!(Overlay::temperature(-299).unwrap().text(), "T: -29.9 C");
    }

    #[test]
    fn test_temperature_absent_sensor() {
        assert!(Overlay::temperature(-300).is_none());
        assert!(Overlay::temperature(-1270).is_none());
    }

    #[test]
    fn test_text_and_height_limits() {
        let o = Overlay::new(DigitPosition::HoursTens, "0123456789ABCDEFGHIJ", 0xFFFF, 200);
        assert_eq!(o.text(), "0123456789ABCDEF");
        assert_eq!(o.strip_height(), MAX_STRIP_HEIGHT);
        assert_eq!(Overlay::new(DigitPosition::HoursTens, "", 0, 0).strip_height(), 1);
    }

    #[test]
    fn test_strip_area_at_panel_bottom() {
        let mut strip: OverlayStrip<135> = OverlayStrip::new();
        let area = strip.render(&Overlay::no_wifi(), 240);
        assert_eq!(area, Area::new(0, 213, 135, 27));
        assert_eq!(strip.pixels().len(), area.pixel_count());
    }

    #[test]
    fn test_strip_draws_text_on_black() {
        let mut strip: OverlayStrip<135> = OverlayStrip::new();
        strip.render(&Overlay::no_wifi(), 240);

        let px = strip.pixels();
        assert!(px.iter().any(|&p| p == RED));
        assert!(px.iter().all(|&p| p == RED || p == BLACK));
        // Left margin stays clear
        for y in 0..27 {
            for x in 0..TEXT_X as usize {
                assert_eq!(strip.pixel(x, y), Some(BLACK));
            }
        }
    }

    #[test]
    fn test_strip_reuse_clears_previous_text() {
        let mut strip: OverlayStrip<135> = OverlayStrip::new();
        strip.render(&Overlay::no_wifi(), 240);
        strip.render(&Overlay::new(DigitPosition::SecondsOnes, "", RED, 27), 240);
        assert!(strip.pixels().iter().all(|&p| p == BLACK));
    }
}
